use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub portfolio: PortfolioConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub connection_string: Option<String>,
    pub max_connections: Option<u32>,
    /// Load the demo portfolio when the store is empty
    pub seed_demo_data: bool,
}

/// Branding and version information served to the frontend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    pub version: String,
    pub app_name: String,
    pub subtitle: String,
    pub organization: String,
    pub description: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            allowed_origins: vec!["http://localhost:8000".to_string()],
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
            max_connections: Some(5),
            seed_demo_data: true,
        }
    }
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            version: "V001".to_string(),
            app_name: "MPX AppPort".to_string(),
            subtitle: "EA PORTFOLIO".to_string(),
            organization: "MPX".to_string(),
            description: "Enterprise Application Portfolio Management".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, `appport.config.*` and `APPPORT__` env vars
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Add default configuration
        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        // Add config file if it exists
        config = config.add_source(config::File::with_name("appport.config").required(false));

        // Add environment variables, e.g. APPPORT__SERVER__PORT=9000
        config = config.add_source(
            config::Environment::with_prefix("APPPORT")
                .prefix_separator("__")
                .separator("__"),
        );

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Get the database URL from config or environment
    pub fn database_url(&self) -> String {
        if let Some(connection_string) = &self.database.connection_string {
            return connection_string.clone();
        }

        // Fall back to environment variable
        if let Ok(url) = std::env::var("DATABASE_URL") {
            return url;
        }

        // Default: database file next to the working directory
        "sqlite://appport.db".to_string()
    }

    pub fn max_connections(&self) -> u32 {
        self.database.max_connections.unwrap_or(5)
    }

    /// CORS origins; a comma separated `ALLOWED_ORIGINS` env var takes precedence
    pub fn allowed_origins(&self) -> Vec<String> {
        match std::env::var("ALLOWED_ORIGINS") {
            Ok(raw) => parse_origins(&raw),
            Err(_) => self.server.allowed_origins.clone(),
        }
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server_address(), "127.0.0.1:8000");
        assert_eq!(config.max_connections(), 5);
        assert!(config.database.seed_demo_data);
        assert_eq!(config.portfolio.version, "V001");
        assert_eq!(config.portfolio.app_name, "MPX AppPort");
    }

    #[test]
    fn test_explicit_connection_string_wins() {
        let mut config = AppConfig::default();
        config.database.connection_string = Some("sqlite::memory:".to_string());
        assert_eq!(config.database_url(), "sqlite::memory:");
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://a.example, ,http://b.example"),
            vec!["http://a.example".to_string(), "http://b.example".to_string()]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_defaults_survive_config_round_trip() {
        let built = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default()).unwrap())
            .build()
            .unwrap();
        let config: AppConfig = built.try_deserialize().unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.portfolio, PortfolioConfig::default());
    }
}
