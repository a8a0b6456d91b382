//! Client configuration

/// Dev backend's default address; mirrors the service's default port.
const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Where to find the companion backend
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
}

impl BackendConfig {
    pub fn from_env() -> Self {
        Self::from_var(std::env::var("COMPANION_BACKEND_URL").ok())
    }

    fn from_var(var: Option<String>) -> Self {
        let base_url = var
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        Self { base_url }
    }
}
