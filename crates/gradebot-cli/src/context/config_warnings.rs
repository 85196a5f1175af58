use gradebot_config::GradebotConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &GradebotConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &GradebotConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.github.is_configured() && has_single_underscore(&env_keys, "GRADEBOT_GITHUB") {
        warnings.push(
            "GitHub token is empty while GRADEBOT_GITHUB_* env vars exist. Use double underscores (example: GRADEBOT_GITHUB__TOKEN)."
                .to_string(),
        );
    }

    if config.github.organization.is_empty() && has_single_underscore(&env_keys, "GRADEBOT_GITHUB")
    {
        warnings.push(
            "GitHub organization is empty while GRADEBOT_GITHUB_* env vars exist. Use double underscores (example: GRADEBOT_GITHUB__ORGANIZATION)."
                .to_string(),
        );
    }

    for section in ["GRADEBOT_GRADING", "GRADEBOT_TRACKER", "GRADEBOT_SERVER"] {
        if has_single_underscore(&env_keys, section) {
            warnings.push(format!(
                "{section}_* env vars are ignored. Use double underscores (example: {section}__<FIELD>)."
            ));
        }
    }

    warnings
}

fn has_single_underscore(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| {
        key.strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('_') && !rest.starts_with("__"))
    })
}
