// Configuration module entry point
// Manages application configuration and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, StaticFilesConfig,
};

impl Config {
    /// Load configuration from "config.toml" with the `PORT` environment
    /// variable overriding the listen port
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config", std::env::var("PORT").ok())
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The config file is optional; every key has a baked-in default.
    /// `port_override` takes precedence over both file and defaults.
    pub fn load_from(
        config_path: &str,
        port_override: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "demo-api-server/0.1")?
            .set_default("http.enable_cors", false)?
            .set_default("static_files.enabled", true)?
            .set_default("static_files.dir", "public")?
            .set_default(
                "static_files.index_files",
                vec!["index.html".to_string(), "index.htm".to_string()],
            )?;

        if let Some(port) = port_override {
            builder = builder.set_override("server.port", port)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("no-such-config-file", None).unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 3000);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "common");
        assert!(cfg.static_files.enabled);
        assert_eq!(cfg.static_files.dir, "public");
    }

    #[test]
    fn test_port_override() {
        let cfg = Config::load_from("no-such-config-file", Some("8081".to_string())).unwrap();
        assert_eq!(cfg.server.port, 8081);
    }

    #[test]
    fn test_invalid_port_override_rejected() {
        let result = Config::load_from("no-such-config-file", Some("not-a-port".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load_from("no-such-config-file", None).unwrap();
        let addr = cfg.get_socket_addr().unwrap();
        assert_eq!(addr.port(), 3000);
        assert!(addr.ip().is_unspecified());
    }
}
