//! Song Lookup Module
//!
//! The public face of the service: resolves a title/artist query to a stored
//! song document and records every unmatched query for later curation.
//!
//! ## Submodules
//! - **`handlers`**: HTTP request handlers for the Axum web server.
//! - **`misslog`**: Append-only JSON Lines log of unmatched lookups.
//! - **`protocol`**: Endpoint paths and request/response DTOs.
//! - **`types`**: The song record as stored in the document store.

pub mod handlers;
pub mod misslog;
pub mod protocol;
pub mod types;
