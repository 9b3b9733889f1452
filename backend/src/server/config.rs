//! Server configuration loaded via OrthoConfig.
//!
//! Every value may come from `FINTRACK_*` environment variables, a
//! configuration file or the command line; unset values fall back to
//! `0.0.0.0:8080`, 60 minute sessions and 15 minute reset codes.

use std::net::SocketAddr;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::AccountSettings;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_MINUTES: u32 = 60;
const DEFAULT_RESET_CODE_MINUTES: u32 = 15;

/// Error returned when a configured value cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The bind address is not `host:port`.
    #[error("bind address {value:?} is not a socket address")]
    BindAddr {
        /// Rejected value.
        value: String,
    },
    /// A lifetime was zero.
    #[error("{name} must be at least one minute")]
    ZeroLifetime {
        /// Setting name.
        name: &'static str,
    },
}

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FINTRACK")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Lifetime of bearer sessions, in minutes.
    #[ortho_config(default = 60)]
    pub session_minutes: u32,
    /// Lifetime of password reset codes, in minutes.
    #[ortho_config(default = 15)]
    pub reset_code_minutes: u32,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: None,
            session_minutes: DEFAULT_SESSION_MINUTES,
            reset_code_minutes: DEFAULT_RESET_CODE_MINUTES,
        }
    }
}

fn lifetime(name: &'static str, minutes: u32) -> Result<TimeDelta, SettingsError> {
    if minutes == 0 {
        return Err(SettingsError::ZeroLifetime { name });
    }
    Ok(TimeDelta::minutes(i64::from(minutes)))
}

impl ServerSettings {
    /// Address to bind, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::BindAddr {
            value: raw.to_owned(),
        })
    }

    /// Session and reset code lifetimes for the account service.
    pub fn account_settings(&self) -> Result<AccountSettings, SettingsError> {
        Ok(AccountSettings {
            session_ttl: lifetime("session_minutes", self.session_minutes)?,
            reset_code_ttl: lifetime("reset_code_minutes", self.reset_code_minutes)?,
        })
    }
}
