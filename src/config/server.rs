//! Listening-port configuration from the environment.

use crate::errors::AppError;

pub const DEFAULT_PORT: u16 = 50051;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl ServerConfig {
    /// Read `PORT` from the environment, falling back to the default.
    pub fn from_env() -> Result<Self, AppError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::config(format!("PORT must be a port number, got '{raw}'")))?,
            Err(_) => DEFAULT_PORT,
        };
        Ok(Self { port })
    }
}
