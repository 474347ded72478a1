//! Lookup HTTP Protocol
//!
//! Endpoint paths and the Data Transfer Objects exchanged with clients.

use super::types::Song;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// --- API Endpoints ---

/// Liveness text.
pub const ENDPOINT_ROOT: &str = "/";
/// Song lookup by `title` and `artist` query parameters.
pub const ENDPOINT_SONG: &str = "/api/song";

// --- Messages ---

pub const MSG_PARAMS_REQUIRED: &str =
    "Both song title and artist name are required for the search.";
pub const MSG_SEARCH_FAILED: &str = "An error occurred while searching for the song.";

pub fn not_found_message(title: &str, artist: &str) -> String {
    format!(
        "Sorry, we couldn't find the song \"{}\" by {}. We'll update our database soon!",
        title, artist
    )
}

// --- Data Transfer Objects ---

/// Query string of a lookup. Both fields are optional at the parsing stage so
/// that a missing one is answered with our own message.
#[derive(Debug, Default)]
pub struct LookupParams {
    pub title: Option<String>,
    pub artist: Option<String>,
}

impl LookupParams {
    /// Picks the lookup fields out of a decoded query string. A key repeated in
    /// the query string has already been collapsed to its last value.
    pub fn from_query(mut query: HashMap<String, String>) -> Self {
        Self {
            title: query.remove("title"),
            artist: query.remove("artist"),
        }
    }

    /// Returns `(title, artist)` when both are present and non-empty.
    pub fn required(&self) -> Option<(&str, &str)> {
        let title = self.title.as_deref().filter(|t| !t.is_empty())?;
        let artist = self.artist.as_deref().filter(|a| !a.is_empty())?;
        Some((title, artist))
    }
}

/// Human-readable outcome for anything other than a hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of `GET /api/song`: the stored document on a hit, a message otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LookupResponse {
    Found(Song),
    Message(MessageResponse),
}

impl LookupResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(MessageResponse::new(message))
    }
}
