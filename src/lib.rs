//! Track Meta API Library
//!
//! Song metadata lookup service. The binary (`main.rs`) wires these modules
//! together; tests drive them with an in-memory store.
//!
//! ## Modules
//! - **`config`**: Command line and environment configuration, including the
//!   database connection string.
//! - **`server`**: Router construction and graceful shutdown.
//! - **`songs`**: The lookup endpoint, the song record and the miss log.
//! - **`storage`**: The `SongStore` abstraction with MongoDB and in-memory backends.

pub mod config;
pub mod server;
pub mod songs;
pub mod storage;
