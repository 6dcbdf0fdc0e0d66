//! HTTP server configuration, read from the environment at startup.

/// Server-level settings. Pipeline settings live in
/// `persona_core::config::Settings`; this covers only the HTTP surface.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Read configuration from `PERSONA_HOST`, `PERSONA_PORT`, and
    /// `PERSONA_CORS_ORIGINS` (comma-separated), with dev defaults.
    pub fn from_env() -> Self {
        let host = std::env::var("PERSONA_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PERSONA_PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(8080);
        let cors_origins = std::env::var("PERSONA_CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| vec!["http://localhost:5173".to_string()]);

        Self {
            host,
            port,
            cors_origins,
        }
    }
}
