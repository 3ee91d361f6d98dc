use std::path::PathBuf;

/// API service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for access tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// TCP port for the HTTP server (default 8000). Env var: `API_PORT`.
    pub api_port: u16,
    /// Directory uploaded images are written under (default `media`).
    pub media_root: PathBuf,
    /// Public URL prefix for stored images (default `/media/`).
    pub media_url: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            api_port: std::env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            media_root: std::env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("media")),
            media_url: std::env::var("MEDIA_URL")
                .map(normalize_media_url)
                .unwrap_or_else(|_| "/media/".to_owned()),
        }
    }
}

/// Ensure the prefix ends with exactly one `/` so `media_url + path` joins cleanly.
fn normalize_media_url(url: String) -> String {
    format!("{}/", url.trim_end_matches('/'))
}
