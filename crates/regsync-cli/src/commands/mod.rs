pub mod dispatch;
pub mod generate;
pub mod list;
pub mod run;
pub mod schema;
pub mod transfer;
