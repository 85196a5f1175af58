use figment::Jail;
use gradebot_config::GradebotConfig;

#[test]
fn plain_github_token_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.set_env("GITHUB_TOKEN", "ghp_plain");
        let config = GradebotConfig::load(None).expect("config loads");
        assert_eq!(config.github.token, "ghp_plain");
        assert!(config.require_github().is_ok());
        Ok(())
    });
}

#[test]
fn prefixed_env_beats_plain_token() {
    Jail::expect_with(|jail| {
        jail.set_env("GITHUB_TOKEN", "ghp_plain");
        jail.set_env("GRADEBOT_GITHUB__TOKEN", "ghp_prefixed");
        let config = GradebotConfig::load(None).expect("config loads");
        assert_eq!(config.github.token, "ghp_prefixed");
        Ok(())
    });
}

#[test]
fn env_beats_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "gradebot.toml",
            "[grading]\nmax_concurrent_requests = 2\ncache_file = \"from_toml.json\"\n",
        )?;
        jail.set_env("GRADEBOT_GRADING__MAX_CONCURRENT_REQUESTS", "8");

        let config = GradebotConfig::load(None).expect("config loads");
        assert_eq!(config.grading.max_concurrent_requests, 8);
        assert_eq!(config.grading.cache_file, "from_toml.json");
        Ok(())
    });
}
