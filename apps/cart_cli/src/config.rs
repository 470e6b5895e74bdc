use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use cart_client::{CheckoutConfig, ControllerOptions};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: Option<String>,
    pub phone_number: Option<String>,
    pub cookies: String,
    pub greeting: Option<String>,
    pub sync_quantities: bool,
    pub notification_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: None,
            phone_number: None,
            cookies: String::new(),
            greeting: None,
            sync_quantities: false,
            notification_timeout_ms: 3000,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    phone_number: Option<String>,
    cookies: Option<String>,
    greeting: Option<String>,
    sync_quantities: Option<bool>,
    notification_timeout_ms: Option<u64>,
}

impl Settings {
    pub fn checkout_config(&self) -> Result<CheckoutConfig> {
        let phone_number = self
            .phone_number
            .as_deref()
            .context("phone number not configured; set phone_number or CART_PHONE_NUMBER")?;
        let config = CheckoutConfig::new(phone_number)?;
        Ok(match &self.greeting {
            Some(greeting) => config.with_greeting(greeting.clone()),
            None => config,
        })
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            sync_quantities: self.sync_quantities,
            notification_display: Duration::from_millis(self.notification_timeout_ms),
        }
    }
}

/// Defaults, then the TOML file if present, then environment overrides.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let file_contents = match fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };
    resolve_settings(file_contents.as_deref(), |key| std::env::var(key).ok())
        .with_context(|| format!("invalid settings in '{}'", path.display()))
}

pub fn resolve_settings(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file_contents {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.base_url {
            settings.base_url = Some(v);
        }
        if let Some(v) = file_cfg.phone_number {
            settings.phone_number = Some(v);
        }
        if let Some(v) = file_cfg.cookies {
            settings.cookies = v;
        }
        if let Some(v) = file_cfg.greeting {
            settings.greeting = Some(v);
        }
        if let Some(v) = file_cfg.sync_quantities {
            settings.sync_quantities = v;
        }
        if let Some(v) = file_cfg.notification_timeout_ms {
            settings.notification_timeout_ms = v;
        }
    }

    if let Some(v) = env("CART_BASE_URL") {
        settings.base_url = Some(v);
    }
    if let Some(v) = env("APP__BASE_URL") {
        settings.base_url = Some(v);
    }

    if let Some(v) = env("CART_PHONE_NUMBER") {
        settings.phone_number = Some(v);
    }
    if let Some(v) = env("APP__PHONE_NUMBER") {
        settings.phone_number = Some(v);
    }

    if let Some(v) = env("CART_COOKIES") {
        settings.cookies = v;
    }
    if let Some(v) = env("APP__COOKIES") {
        settings.cookies = v;
    }

    if let Some(v) = env("APP__SYNC_QUANTITIES") {
        if let Ok(parsed) = v.trim().parse::<bool>() {
            settings.sync_quantities = parsed;
        }
    }

    if let Some(v) = env("APP__NOTIFICATION_TIMEOUT_MS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.notification_timeout_ms = parsed;
        }
    }

    settings.base_url = settings
        .base_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
