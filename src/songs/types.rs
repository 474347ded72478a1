use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A song document.
///
/// Only `title` and `artist` are typed and validated. Everything else found on
/// a stored record (album, year, bpm, genre, the store's `_id`) is carried in
/// `extra` and serialized back at the top level, untouched.
///
/// Stored documents are read as they are; trimming happens in [`Song::new`],
/// when a record is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    pub artist: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Song {
    pub fn new(title: &str, artist: &str) -> Self {
        Self {
            title: title.trim().to_string(),
            artist: artist.trim().to_string(),
            extra: Map::new(),
        }
    }

    /// Adds a passthrough attribute. `title` and `artist` cannot be set here.
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        if key != "title" && key != "artist" {
            self.extra.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}
