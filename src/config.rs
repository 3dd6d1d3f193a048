use std::{env, net::SocketAddr};

use axum::http::HeaderValue;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    /// Single allowed CORS origin. `None` allows any origin.
    pub cors_origin: Option<HeaderValue>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3001".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let cors_origin = match env::var("APP_CORS_ORIGIN") {
            Ok(origin) if !origin.trim().is_empty() => Some(
                HeaderValue::from_str(origin.trim())
                    .map_err(|err| AppError::Config(format!("invalid APP_CORS_ORIGIN: {err}")))?,
            ),
            _ => None,
        };

        Ok(Self {
            listen_addr,
            cors_origin,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            cors_origin: None,
        }
    }
}
