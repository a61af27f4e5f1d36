use rd_domain::config::{Config, ConfigSeverity};

/// Print every validation issue. Returns `false` when any is an error.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();

    if issues.is_empty() {
        println!("Config OK ({config_path})");
        return true;
    }

    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    for issue in &issues {
        println!("{issue}");
    }

    println!("\n{error_count} error(s), {warning_count} warning(s) in {config_path}");

    !config.has_errors()
}

/// Dump the resolved config (with all defaults filled in) as TOML.
///
/// A plaintext `platform.auth.key` is masked.
pub fn show(config: &Config) -> anyhow::Result<()> {
    print!("{}", render(config)?);
    Ok(())
}

fn render(config: &Config) -> anyhow::Result<String> {
    let mut config = config.clone();
    if let Some(key) = config.platform.auth.key.as_mut() {
        *key = mask(key);
    }
    Ok(toml::to_string_pretty(&config)?)
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(3).collect();
    format!("{visible}***")
}
