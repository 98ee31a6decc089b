// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TOKEN_SCHEME` | `local` (sealed tokens) or `jwt` (HS256) | `local` |
//! | `TOKEN_SYMMETRIC_KEY` | Token key; exactly 32 bytes for `local`, at least 32 for `jwt` | Required |
//! | `ACCESS_TOKEN_DURATION_SECS` | Access token lifetime in seconds | `900` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, SocketAddr};

use chrono::Duration;
use thiserror::Error;

use crate::token::TokenScheme;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TOKEN_SCHEME_ENV: &str = "TOKEN_SCHEME";

/// Secret for the token maker. Never logged.
pub const TOKEN_SYMMETRIC_KEY_ENV: &str = "TOKEN_SYMMETRIC_KEY";
pub const ACCESS_TOKEN_DURATION_ENV: &str = "ACCESS_TOKEN_DURATION_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default `RUST_LOG` filter.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ACCESS_TOKEN_DURATION_SECS: i64 = 15 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Process configuration.
#[derive(Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub token_scheme: TokenScheme,
    pub token_symmetric_key: String,
    pub access_token_duration: Duration,
    pub log_format: LogFormat,
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host: IpAddr = parse_or(&lookup, HOST_ENV, DEFAULT_HOST.parse().ok())?;
        let port: u16 = parse_or(&lookup, PORT_ENV, Some(DEFAULT_PORT))?;

        let token_scheme = match lookup(TOKEN_SCHEME_ENV) {
            Some(value) => value
                .parse::<TokenScheme>()
                .map_err(|reason| ConfigError::Invalid {
                    name: TOKEN_SCHEME_ENV,
                    reason,
                })?,
            None => TokenScheme::default(),
        };

        let token_symmetric_key = lookup(TOKEN_SYMMETRIC_KEY_ENV)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::Missing(TOKEN_SYMMETRIC_KEY_ENV))?;

        let duration_secs: i64 = parse_or(
            &lookup,
            ACCESS_TOKEN_DURATION_ENV,
            Some(DEFAULT_ACCESS_TOKEN_DURATION_SECS),
        )?;
        if duration_secs <= 0 {
            return Err(ConfigError::Invalid {
                name: ACCESS_TOKEN_DURATION_ENV,
                reason: "must be a positive number of seconds".to_string(),
            });
        }
        let access_token_duration =
            Duration::try_seconds(duration_secs).ok_or_else(|| ConfigError::Invalid {
                name: ACCESS_TOKEN_DURATION_ENV,
                reason: "out of range".to_string(),
            })?;

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    reason: format!("expected 'json' or 'pretty', got '{other}'"),
                })
            }
        };

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            token_scheme,
            token_symmetric_key,
            access_token_duration,
            log_format,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_addr", &self.bind_addr)
            .field("token_scheme", &self.token_scheme)
            .field("token_symmetric_key", &"<redacted>")
            .field("access_token_duration", &self.access_token_duration)
            .field("log_format", &self.log_format)
            .finish()
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: Option<T>) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => default.ok_or(ConfigError::Missing(name)),
    }
}
