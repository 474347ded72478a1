use super::{SongQuery, SongStore, StoreError};
use crate::songs::types::Song;

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Song store kept in process memory.
///
/// Records are keyed by an insertion sequence number; lookups return the
/// matching record with the lowest sequence, which makes insertion order the
/// natural order of this store.
#[derive(Debug, Default)]
pub struct InMemorySongStore {
    songs: DashMap<u64, Song>,
    next_seq: AtomicU64,
}

impl InMemorySongStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_songs(songs: impl IntoIterator<Item = Song>) -> Self {
        let store = Self::new();
        for song in songs {
            store.insert(song);
        }
        store
    }

    /// Adds a record and returns its sequence number.
    ///
    /// Duplicate title/artist pairs are accepted.
    pub fn insert(&self, song: Song) -> u64 {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.songs.insert(seq, song);
        seq
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

#[async_trait]
impl SongStore for InMemorySongStore {
    async fn find_one(&self, query: &SongQuery) -> Result<Option<Song>, StoreError> {
        let found = self
            .songs
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .min_by_key(|entry| *entry.key())
            .map(|entry| entry.value().clone());

        Ok(found)
    }
}
