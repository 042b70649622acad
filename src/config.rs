//! Startup configuration.
//!
//! Both structs deserialize with serde, so they can be embedded in whatever
//! configuration file an application already has, or read from the
//! environment with `from_env`:
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `RESTIVE_ADDR` | listen address | `0.0.0.0:8080` |
//! | `RESTIVE_PRIVATE_KEY` | PEM private key path | `keys/private.pem` |
//! | `RESTIVE_PUBLIC_KEY` | PEM public key path | `keys/public.pem` |
//! | `RESTIVE_TOKEN_LIFETIME_SECS` | token lifetime | `86400` (24 h) |

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Error;

/// 24 hours.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24);

/// Where to find the signing keys and how long tokens live.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AuthConfig {
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
    #[serde(with = "secs")]
    pub token_lifetime: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            private_key_path: PathBuf::from("keys/private.pem"),
            public_key_path: PathBuf::from("keys/public.pem"),
            token_lifetime: DEFAULT_TOKEN_LIFETIME,
        }
    }
}

impl AuthConfig {
    /// Reads `RESTIVE_PRIVATE_KEY`, `RESTIVE_PUBLIC_KEY` and
    /// `RESTIVE_TOKEN_LIFETIME_SECS`, falling back to the defaults.
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("RESTIVE_PRIVATE_KEY") {
            config.private_key_path = path.into();
        }
        if let Ok(path) = std::env::var("RESTIVE_PUBLIC_KEY") {
            config.public_key_path = path.into();
        }
        if let Ok(secs) = std::env::var("RESTIVE_TOKEN_LIFETIME_SECS") {
            config.token_lifetime = parse_secs(&secs)?;
        }
        Ok(config)
    }
}

/// Listener settings.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: "0.0.0.0:8080".to_owned() }
    }
}

impl ServerConfig {
    /// Reads `RESTIVE_ADDR`, falling back to `0.0.0.0:8080`.
    pub fn from_env() -> Self {
        std::env::var("RESTIVE_ADDR").map_or_else(|_| Self::default(), |addr| Self { addr })
    }
}

fn parse_secs(s: &str) -> Result<Duration, Error> {
    s.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| Error::Config(format!("RESTIVE_TOKEN_LIFETIME_SECS `{s}`: {e}")))
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
