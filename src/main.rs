#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use log::{error, info};
use std::process;
use winview_strip::PanelConfig;

const CONFIG_ENV: &str = "WINVIEW_CONFIG";

/// Config file named by WINVIEW_CONFIG, else defaults with env overrides
fn load_config() -> winview_strip::PreviewResult<PanelConfig> {
    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            info!("📄 Loading config from {}", path);
            PanelConfig::load_from_file(&path)?
        }
        Err(_) => PanelConfig::from_env(),
    };
    config.validate()?;
    Ok(config)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Invalid configuration: {}", e);
            process::exit(2);
        }
    };

    #[cfg(windows)]
    {
        match winview_strip::platform::win32::run(config) {
            Ok(code) => process::exit(code),
            Err(e) => {
                error!("❌ {}", e);
                process::exit(1);
            }
        }
    }

    #[cfg(not(windows))]
    {
        let _ = config;
        error!("❌ The preview strip needs the Windows desktop compositor");
        process::exit(1);
    }
}
