//! # regsync-client
//!
//! Talks to a document register over HTTP and builds the run-level
//! operations on top of it:
//!
//! - [`RegisterApi`]: the four remote calls (schema, search, download, upload)
//! - [`RegisterClient`]: the HTTP implementation with Basic auth
//! - [`Register`]: schema cache, run scoping, listing, polling and transfer
//!
//! The `testing` feature exposes [`fake::InMemoryRegister`] for downstream
//! tests.

pub mod api;
pub mod cache;
pub mod client;
pub mod directory;
pub mod error;
mod http;
mod multipart;
pub mod poll;
pub mod register;
pub mod transfer;
pub mod wire;

#[cfg(any(test, feature = "testing"))]
pub mod fake;

pub use api::{DocumentFile, RegisterApi, UploadReceipt, UploadTarget};
pub use cache::SchemaCache;
pub use client::{ClientSettings, RegisterClient};
pub use directory::to_record;
pub use error::RegisterError;
pub use poll::{PollPolicy, poll_until};
pub use register::{Register, RegisterSettings};
pub use transfer::TransferReport;
