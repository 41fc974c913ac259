use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so the only failure mode is a value that
/// does not parse.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_timeout = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let secs = parse_u64(var, default)?;
        if secs == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "timeout must be at least one second".to_string(),
            });
        }
        Ok(secs)
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("GRUBLINE_ENV", "development"))?;
    let log_level = or_default("GRUBLINE_LOG_LEVEL", "info");

    let api_base_url = or_default("GRUBLINE_API_BASE_URL", "http://localhost:5000");
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "GRUBLINE_API_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got \"{api_base_url}\""),
        });
    }

    let listing_path = normalize_path(&or_default("GRUBLINE_LISTING_PATH", "/api/restaurants"));
    let menu_path = normalize_path(&or_default("GRUBLINE_MENU_PATH", "/api/restaurant/menu"));

    let request_timeout_secs = parse_timeout("GRUBLINE_REQUEST_TIMEOUT_SECS", "30")?;
    let connect_timeout_secs = parse_timeout("GRUBLINE_CONNECT_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("GRUBLINE_USER_AGENT", "grubline/0.1 (catalog-browser)");
    let description_limit = parse_usize("GRUBLINE_DESCRIPTION_LIMIT", "145")?;

    Ok(AppConfig {
        env,
        log_level,
        api_base_url,
        listing_path,
        menu_path,
        request_timeout_secs,
        connect_timeout_secs,
        user_agent,
        description_limit,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GRUBLINE_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

/// Ensures a path has exactly one leading slash and no trailing slash.
fn normalize_path(raw: &str) -> String {
    format!("/{}", raw.trim().trim_matches('/'))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
