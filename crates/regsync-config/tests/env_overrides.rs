use figment::Jail;
use regsync_config::RegsyncConfig;

#[test]
fn env_vars_fill_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("REGSYNC_API__USERNAME", "poleary");
        jail.set_env("REGSYNC_API__PASSWORD", "from-env");
        jail.set_env("REGSYNC_PROJECTS__SOURCE", "1879048422");
        jail.set_env("REGSYNC_PACING__SETTLE_MS", "0");

        let config = RegsyncConfig::load().expect("config loads");
        assert!(config.api.is_configured());
        assert_eq!(config.api.password, "from-env");
        assert_eq!(config.projects.source, "1879048422");
        assert_eq!(config.pacing.settle_ms, 0);
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".regsync")?;
        jail.create_file(
            ".regsync/config.toml",
            r#"
[api]
base_url = "https://from-file.example.com/api"
"#,
        )?;
        jail.set_env("REGSYNC_API__BASE_URL", "https://from-env.example.com/api");

        let config = RegsyncConfig::load().expect("config loads");
        assert_eq!(config.api.base_url, "https://from-env.example.com/api");
        Ok(())
    });
}
