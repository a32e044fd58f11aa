use crate::app_config::AppConfig;
use crate::ConfigError;

/// Default Nominatim endpoint for reverse geocoding.
const DEFAULT_GEOCODER_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let geocoder_base_url = or_default("MEDFINDER_GEOCODER_BASE_URL", DEFAULT_GEOCODER_BASE_URL);
    let geocoder_fallback_url = lookup("MEDFINDER_GEOCODER_FALLBACK_URL").ok();
    let geocoder_fallback_api_key = lookup("MEDFINDER_GEOCODER_FALLBACK_API_KEY").ok();
    let geocoder_timeout_secs = parse_u64("MEDFINDER_GEOCODER_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("MEDFINDER_USER_AGENT", "medfinder/0.1 (pharmacy-discovery)");

    let device_timeout_secs = parse_u64("MEDFINDER_DEVICE_TIMEOUT_SECS", "30")?;
    // A fresh high-accuracy fix can legitimately take a while; anything under
    // 15s produces spurious Timeout failures on real hardware.
    if device_timeout_secs < 15 {
        return Err(ConfigError::InvalidEnvVar {
            var: "MEDFINDER_DEVICE_TIMEOUT_SECS".to_string(),
            reason: format!("must be at least 15 seconds, got {device_timeout_secs}"),
        });
    }

    let max_retry_attempts = parse_u32("MEDFINDER_MAX_RETRY_ATTEMPTS", "3")?;
    let retry_base_delay_ms = parse_u64("MEDFINDER_RETRY_BASE_DELAY_MS", "500")?;

    Ok(AppConfig {
        geocoder_base_url,
        geocoder_fallback_url,
        geocoder_fallback_api_key,
        geocoder_timeout_secs,
        user_agent,
        device_timeout_secs,
        max_retry_attempts,
        retry_base_delay_ms,
    })
}
