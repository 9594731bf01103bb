pub mod chat;
pub mod onboard;
pub mod serve;

use careerchat_config::AppConfig;
use std::path::Path;

/// Load config, turning errors into a user-facing message.
pub(crate) fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load(path).map_err(|e| format!("Failed to load config: {e}"))?)
}
