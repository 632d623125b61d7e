use std::time::Duration;

use anyhow::Context;
use regsync_client::{ClientSettings, PollPolicy, Register, RegisterClient, RegisterSettings};
use regsync_config::{ApiConfig, PacingConfig, RegsyncConfig};
use regsync_core::{ProjectId, RunId};

/// Everything a command needs: configuration and a connected register.
pub struct AppContext {
    pub config: RegsyncConfig,
    pub register: Register<RegisterClient>,
}

impl AppContext {
    pub fn init(config: RegsyncConfig, run: RunId) -> anyhow::Result<Self> {
        let api = config.require_api()?;
        let client = RegisterClient::new(&client_settings(api))
            .context("failed to build register HTTP client")?;
        tracing::debug!(base_url = api.base_url_trimmed(), run = %run, "register client ready");

        let register = Register::new(client, register_settings(&config.pacing, run));
        Ok(Self { config, register })
    }

    /// `explicit` if given, otherwise the configured fallback.
    pub fn project(explicit: Option<&str>, configured: &str, key: &str) -> anyhow::Result<ProjectId> {
        let raw = explicit.unwrap_or(configured);
        if raw.trim().is_empty() {
            anyhow::bail!("no project given and {key} is not configured");
        }
        raw.parse()
            .with_context(|| format!("invalid project id '{raw}'"))
    }
}

pub fn client_settings(api: &ApiConfig) -> ClientSettings {
    ClientSettings {
        base_url: api.base_url_trimmed().to_string(),
        username: api.username.clone(),
        password: api.password.clone(),
        timeout: Duration::from_secs(api.timeout_secs),
        user_agent: api.user_agent.clone(),
    }
}

pub fn register_settings(pacing: &PacingConfig, run: RunId) -> RegisterSettings {
    RegisterSettings {
        run,
        settle: pacing.settle(),
        transfer_pause: pacing.transfer_pause(),
        poll: PollPolicy {
            max_attempts: pacing.poll_attempts,
            initial_delay: pacing.poll_initial(),
            max_delay: pacing.poll_max(),
        },
        schema_ttl: pacing.schema_ttl(),
    }
}
