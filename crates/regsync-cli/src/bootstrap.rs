use anyhow::Context;
use regsync_config::RegsyncConfig;
use regsync_core::RunId;

use crate::cli::GlobalFlags;

pub fn load_config() -> anyhow::Result<RegsyncConfig> {
    RegsyncConfig::load_with_dotenv().context("failed to load regsync configuration")
}

/// The run id for this process: `--run-id` when given, otherwise a new one.
pub fn run_id(flags: &GlobalFlags, config: &RegsyncConfig) -> anyhow::Result<RunId> {
    match flags.run_id.as_deref() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid --run-id '{raw}'")),
        None => Ok(RunId::generate(&config.scenario.run_prefix)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn flags(run_id: Option<&str>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            quiet: true,
            run_id: run_id.map(str::to_string),
        }
    }

    #[test]
    fn run_id_uses_configured_prefix() {
        let mut config = RegsyncConfig::default();
        config.scenario.run_prefix = "it".into();
        let run = run_id(&flags(None), &config).unwrap();
        assert!(run.as_str().starts_with("it-"));
    }

    #[test]
    fn run_id_flag_wins() {
        let run = run_id(&flags(Some("regsync-20261018-4821")), &RegsyncConfig::default()).unwrap();
        assert_eq!(run.as_str(), "regsync-20261018-4821");
    }

    #[test]
    fn blank_run_id_flag_is_rejected() {
        assert!(run_id(&flags(Some("  ")), &RegsyncConfig::default()).is_err());
    }
}
