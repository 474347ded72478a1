//! Song Storage Module
//!
//! Abstracts the document store that holds song records behind the
//! [`SongStore`] trait, so the lookup service receives an explicit handle
//! instead of reaching for process-wide connection state.
//!
//! ## Backends
//! - **`mongo`**: The production backend. Connects to a MongoDB deployment and
//!   queries the `songs` collection.
//! - **`memory`**: A process-local store used by tests and local development.
//!
//! ## Matching
//! Both backends share [`SongQuery`]: each query value is matched against its
//! field case-insensitively and unanchored, so "San" matches "Sanko".

pub mod memory;
pub mod mongo;

use crate::config::ConfigError;
use crate::songs::types::Song;
use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Fields covered by the compound lookup index, in index order.
pub const SONG_INDEX_FIELDS: [&str; 2] = ["title", "artist"];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("stored document could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("query could not be compiled: {0}")]
    Query(#[from] regex::Error),
}

/// Read access to song records.
#[async_trait]
pub trait SongStore: Send + Sync {
    /// Returns the first record, in the store's natural order, whose title and
    /// artist both match `query`.
    async fn find_one(&self, query: &SongQuery) -> Result<Option<Song>, StoreError>;
}

/// A compiled title/artist lookup.
///
/// Query text is taken literally: regex metacharacters are escaped, then the
/// value is matched as a case-insensitive substring of the stored field.
#[derive(Debug, Clone)]
pub struct SongQuery {
    title: String,
    artist: String,
    title_re: Regex,
    artist_re: Regex,
}

impl SongQuery {
    pub fn new(title: &str, artist: &str) -> Result<Self, StoreError> {
        Ok(Self {
            title: title.to_string(),
            artist: artist.to_string(),
            title_re: compile(title)?,
            artist_re: compile(artist)?,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    /// Escaped pattern for the title field, usable by a `$regex` filter.
    pub fn title_pattern(&self) -> String {
        regex::escape(&self.title)
    }

    /// Escaped pattern for the artist field, usable by a `$regex` filter.
    pub fn artist_pattern(&self) -> String {
        regex::escape(&self.artist)
    }

    pub fn matches(&self, song: &Song) -> bool {
        self.title_re.is_match(&song.title) && self.artist_re.is_match(&song.artist)
    }
}

fn compile(value: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(value))
        .case_insensitive(true)
        .build()
}

#[cfg(test)]
mod tests;
