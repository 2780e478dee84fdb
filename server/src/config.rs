use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub data_file: Option<PathBuf>,
    pub cors_origin: Option<HeaderValue>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let data_file = lookup("DATA_FILE").map(PathBuf::from);
        if data_file.is_none() {
            warn!("DATA_FILE not set, todo lists will not survive a restart");
        }

        let cors_origin = lookup("CORS_ORIGIN")
            .map(|origin| {
                HeaderValue::from_str(&origin).map_err(|e| ConfigError::Invalid {
                    key: "CORS_ORIGIN",
                    reason: e.to_string(),
                    value: origin,
                })
            })
            .transpose()?;

        Ok(Self {
            host: try_load(&lookup, "HOST", "0.0.0.0")?,
            port: try_load(&lookup, "PORT", "5000")?,
            jwt_secret,
            data_file,
            cors_origin,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Browser access policy. Without `CORS_ORIGIN` any origin may call.
    pub fn cors_layer(&self) -> CorsLayer {
        let origin = match &self.cors_origin {
            Some(origin) => AllowOrigin::exact(origin.clone()),
            None => AllowOrigin::any(),
        };
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE, AUTHORIZATION])
            .max_age(Duration::from_secs(60 * 60))
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    match value.parse() {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            warn!("Invalid {key} value: {e}");
            Err(ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            })
        }
    }
}
