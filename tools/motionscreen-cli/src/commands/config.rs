//! Show the effective configuration.

use std::path::PathBuf;

use motionscreen_common::config::{config_file_path, AppConfig};

pub fn run(config: Option<PathBuf>, init: bool) -> anyhow::Result<()> {
    if init {
        let path = config_file_path();
        if path.exists() {
            anyhow::bail!("Config already exists: {}", path.display());
        }
        AppConfig::default().save()?;
        println!("Wrote default config to: {}", path.display());
        return Ok(());
    }

    let app_config = super::load_config(config.as_deref())?;
    app_config.engine.validate()?;

    let origin = match &config {
        Some(path) => path.display().to_string(),
        None if config_file_path().exists() => config_file_path().display().to_string(),
        None => "built-in defaults".to_string(),
    };
    println!("# Effective configuration ({origin})");
    println!("{}", serde_json::to_string_pretty(&app_config)?);

    Ok(())
}
