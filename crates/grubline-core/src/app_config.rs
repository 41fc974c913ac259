#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime settings for the catalog pipeline and the CLI that drives it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Scheme + host of the catalog backend, e.g. `http://localhost:5000`.
    pub api_base_url: String,
    /// Path of the restaurant listing document, relative to `api_base_url`.
    pub listing_path: String,
    /// Path prefix of the menu-detail documents; the restaurant id is
    /// appended as one more path segment.
    pub menu_path: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    /// Character budget for collapsed item descriptions.
    pub description_limit: usize,
}
