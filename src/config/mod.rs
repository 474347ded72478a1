//! Service Configuration
//!
//! Every option can be given on the command line or through the environment.
//! A `.env` file in the working directory is loaded before parsing, so local
//! development only needs the database credentials written there once.

use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

/// Cluster host used when `DB_CLUSTER` is not set.
pub const DEFAULT_CLUSTER: &str = "trackmetacluster.hgvsm.mongodb.net";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Parser)]
#[command(name = "track-meta-api", about = "Song metadata lookup service")]
pub struct Config {
    /// Database user (ignored when `MONGODB_URI` is given).
    #[arg(long, env = "DB_USERNAME")]
    pub db_username: Option<String>,

    /// Database password (ignored when `MONGODB_URI` is given).
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Database holding the `songs` collection.
    #[arg(long, env = "DB_NAME")]
    pub db_name: String,

    /// Application name reported to the database.
    #[arg(long, env = "APP_NAME", default_value = "track-meta-api")]
    pub app_name: String,

    /// SRV host of the database cluster.
    #[arg(long, env = "DB_CLUSTER", default_value = DEFAULT_CLUSTER)]
    pub db_cluster: String,

    /// Full connection string, overriding the assembled one.
    #[arg(long, env = "MONGODB_URI", hide_env_values = true)]
    pub mongodb_uri: Option<String>,

    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// File receiving one JSON line per unmatched lookup.
    #[arg(long, env = "MISSING_SONGS_LOG", default_value = "admin/missing_songs.jsonl")]
    pub missing_log: PathBuf,
}

impl Config {
    /// Loads `.env` (if present) and parses arguments and environment.
    pub fn load() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                eprintln!("Ignoring unreadable .env file: {}", e);
            }
        }
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mongodb_uri.is_some() {
            return Ok(());
        }
        if self.db_username.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::Missing("DB_USERNAME"));
        }
        if self.db_password.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::Missing("DB_PASSWORD"));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Connection string for the document store.
    ///
    /// Credentials are percent-encoded so passwords containing `@` or `:`
    /// survive URI parsing.
    pub fn connection_uri(&self) -> Result<String, ConfigError> {
        if let Some(uri) = &self.mongodb_uri {
            return Ok(uri.clone());
        }
        self.validate()?;

        let username = self.db_username.as_deref().unwrap_or_default();
        let password = self.db_password.as_deref().unwrap_or_default();

        Ok(format!(
            "mongodb+srv://{}:{}@{}/{}?retryWrites=true&w=majority&appName={}",
            urlencoding::encode(username),
            urlencoding::encode(password),
            self.db_cluster,
            self.db_name,
            urlencoding::encode(&self.app_name),
        ))
    }
}
