//! Configuration types and structures.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Name of the session cookie set at login.
pub const SESSION_COOKIE: &str = "taskpad_session";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub tasks: TasksConfig,
}

/// Server-specific configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Address to bind the HTTP listener to.
    #[serde(default = "default_bind")]
    pub bind: IpAddr,

    /// HTTP port. `0` picks a free port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            bind: default_bind(),
            port: default_port(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("taskpad/taskpad.db")
}

fn default_bind() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Lifetime of a login session (default: 24 hours).
    #[serde(default = "default_session_ttl_seconds")]
    pub session_ttl_seconds: i64,

    /// Mark the session cookie `Secure` (set when served over HTTPS).
    #[serde(default)]
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_seconds: default_session_ttl_seconds(),
            cookie_secure: false,
        }
    }
}

fn default_session_ttl_seconds() -> i64 {
    86_400
}

/// Task view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Days ahead that count as "due soon".
    #[serde(default = "default_due_soon_days")]
    pub due_soon_days: i64,

    /// Page size when `page` is given without `limit`.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            due_soon_days: default_due_soon_days(),
            default_page_size: default_page_size(),
        }
    }
}

fn default_due_soon_days() -> i64 {
    crate::views::dates::DEFAULT_DUE_SOON_DAYS
}

fn default_page_size() -> u32 {
    50
}
