use crate::auth::JwtConfig;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/store | working directory for database and logs |
/// | HTTP_PORT | 3000 | HTTP listen port |
/// | ENVIRONMENT | development | runtime environment |
/// | ADMIN_SECRET_KEY | (unset) | secret required by the admin bootstrap endpoint |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/store HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT auth configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Secret key required by POST /api/auth/create-admin.
    /// When unset, admin bootstrap is disabled.
    pub admin_secret_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/store".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            admin_secret_key: std::env::var("ADMIN_SECRET_KEY").ok().filter(|s| !s.is_empty()),
        }
    }

    /// Override the working directory and port, typically for tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Database file path under the working directory
    pub fn database_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir)
            .join("database")
            .join("store.db")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
