use clap::Parser;

/// Serve the current directory over HTTP for local testing.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ServerConfig {
    /// Port to listen on (loopback interface only)
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8000 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_defaults_to_8000() {
        let config = ServerConfig::parse_from(["ui-server"]);
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn long_flag_overrides_port() {
        let config = ServerConfig::parse_from(["ui-server", "--port", "9090"]);
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn short_flag_overrides_port() {
        let config = ServerConfig::parse_from(["ui-server", "-p", "9090"]);
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        assert!(ServerConfig::try_parse_from(["ui-server", "--port", "http"]).is_err());
    }
}
