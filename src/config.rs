//! Process configuration: command-line flags with environment fallbacks.

use std::net::SocketAddr;

use clap::Parser;

use crate::api::AuthPolicy;

/// In-memory product catalogue API.
#[derive(Debug, Parser)]
#[command(name = "stockroom", version, about)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "ADDR", default_value = "0.0.0.0:3000")]
    pub addr: SocketAddr,

    /// Shared secret expected in the `api-key` header.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Which routes require the API key.
    #[arg(long = "auth", env = "AUTH_POLICY", value_enum, default_value_t = AuthPolicy::Writes)]
    pub auth_policy: AuthPolicy,

    /// Start with an empty catalogue instead of the demo products.
    #[arg(long, env = "NO_SEED")]
    pub no_seed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["stockroom", "--api-key", "k"]).unwrap();
        assert_eq!(config.addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.api_key, "k");
        assert_eq!(config.auth_policy, AuthPolicy::Writes);
        assert!(!config.no_seed);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "stockroom", "--api-key", "k", "--addr", "127.0.0.1:8080", "--auth", "all", "--no-seed",
        ])
        .unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.auth_policy, AuthPolicy::All);
        assert!(config.no_seed);
    }

    #[test]
    fn bad_policy_is_rejected() {
        assert!(Config::try_parse_from(["stockroom", "--api-key", "k", "--auth", "some"]).is_err());
    }
}
