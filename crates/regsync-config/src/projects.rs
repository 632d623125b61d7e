//! Source and destination projects for the transfer scenario.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectsConfig {
    /// Project the fixtures are uploaded to and superseded in.
    #[serde(default)]
    pub source: String,

    /// Project documents are transferred into.
    #[serde(default)]
    pub destination: String,
}

impl ProjectsConfig {
    pub fn is_configured(&self) -> bool {
        !self.source.trim().is_empty() && !self.destination.trim().is_empty()
    }
}
