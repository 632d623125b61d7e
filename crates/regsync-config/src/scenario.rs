//! Fixture settings for the end-to-end scenario.

use serde::{Deserialize, Serialize};

fn default_fixtures_dir() -> String {
    "files".to_string()
}

fn default_fixtures() -> Vec<String> {
    vec![
        "document.txt".to_string(),
        "blank.pdf".to_string(),
        "Empty.png".to_string(),
    ]
}

fn default_supersede_fixture() -> String {
    "editedDocument.txt".to_string()
}

fn default_run_prefix() -> String {
    "regsync".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioConfig {
    /// Directory the fixture files are read from.
    #[serde(default = "default_fixtures_dir")]
    pub fixtures_dir: String,

    /// Files uploaded to the source project, in order.
    #[serde(default = "default_fixtures")]
    pub fixtures: Vec<String>,

    /// File uploaded as the new version of the first source document.
    #[serde(default = "default_supersede_fixture")]
    pub supersede_fixture: String,

    /// Prefix of the per-run identifier.
    #[serde(default = "default_run_prefix")]
    pub run_prefix: String,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            fixtures_dir: default_fixtures_dir(),
            fixtures: default_fixtures(),
            supersede_fixture: default_supersede_fixture(),
            run_prefix: default_run_prefix(),
        }
    }
}
