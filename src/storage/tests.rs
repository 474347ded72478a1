//! Storage Module Tests
//!
//! Validates query matching and the in-memory backend, plus the MongoDB filter
//! and document decoding that do not need a live database.
//!
//! ## Test Scopes
//! - **SongQuery**: Case-insensitive, unanchored, literal matching on both fields.
//! - **InMemorySongStore**: Natural (insertion) order and duplicate handling.
//! - **Mongo helpers**: `$regex` filter shape and document decoding.
//! - **connect**: Startup failures surface as errors instead of panics or exits.

#[cfg(test)]
mod tests {
    use crate::config::{Config, ConfigError, DEFAULT_CLUSTER};
    use crate::songs::types::Song;
    use crate::storage::memory::InMemorySongStore;
    use crate::storage::mongo::{connect, decode_document, lookup_filter};
    use crate::storage::{SONG_INDEX_FIELDS, SongQuery, SongStore, StoreError};
    use mongodb::bson::{DateTime, doc, oid::ObjectId};
    use serde_json::json;
    use std::path::PathBuf;

    fn sanko() -> Song {
        Song::new("Sanko", "Timaya")
            .with_field("album", "Epiphany")
            .with_field("year", 2014)
            .with_field("bpm", 103.004)
            .with_field("genre", "Afrobeats")
    }

    // ============================================================
    // SONG QUERY TESTS
    // ============================================================

    #[test]
    fn test_query_exact_match() {
        let query = SongQuery::new("Sanko", "Timaya").unwrap();
        assert!(query.matches(&sanko()));
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let query = SongQuery::new("sAnKo", "tIMayA").unwrap();
        assert!(query.matches(&sanko()));
    }

    #[test]
    fn test_query_matches_substrings() {
        let prefix = SongQuery::new("San", "Tim").unwrap();
        let inner = SongQuery::new("ank", "may").unwrap();

        assert!(prefix.matches(&sanko()));
        assert!(inner.matches(&sanko()));
        assert!(prefix.matches(&Song::new("Sankofa", "Timaya")));
    }

    #[test]
    fn test_query_requires_both_fields() {
        let wrong_artist = SongQuery::new("Sanko", "Burna Boy").unwrap();
        let wrong_title = SongQuery::new("Ye", "Timaya").unwrap();

        assert!(!wrong_artist.matches(&sanko()));
        assert!(!wrong_title.matches(&sanko()));
    }

    #[test]
    fn test_query_treats_metacharacters_literally() {
        let song = Song::new("Why? (Remix)", "A.B.");

        let literal = SongQuery::new("Why? (Remix)", "A.B.").unwrap();
        assert!(literal.matches(&song));

        // "." must not act as a wildcard
        let dotted = SongQuery::new("Sanko", "T.maya").unwrap();
        assert!(!dotted.matches(&sanko()));

        // An unbalanced paren is just text, not a compile error
        assert!(SongQuery::new("(", "[").is_ok());
    }

    #[test]
    fn test_query_patterns_are_escaped() {
        let query = SongQuery::new("a+b", "c.d").unwrap();

        assert_eq!(query.title_pattern(), r"a\+b");
        assert_eq!(query.artist_pattern(), r"c\.d");
        assert_eq!(query.title(), "a+b");
        assert_eq!(query.artist(), "c.d");
    }

    // ============================================================
    // IN-MEMORY STORE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_memory_store_finds_record() {
        let store = InMemorySongStore::with_songs([sanko()]);
        let query = SongQuery::new("Sanko", "Timaya").unwrap();

        let found = store.find_one(&query).await.unwrap();
        assert_eq!(found, Some(sanko()));
    }

    #[tokio::test]
    async fn test_memory_store_miss_returns_none() {
        let store = InMemorySongStore::with_songs([sanko()]);
        let query = SongQuery::new("Nonexistent Song", "Unknown Artist").unwrap();

        assert_eq!(store.find_one(&query).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_returns_first_inserted_match() {
        let store = InMemorySongStore::new();
        store.insert(Song::new("Sankofa", "Timaya").with_field("year", 2020));
        store.insert(sanko());

        let query = SongQuery::new("San", "Timaya").unwrap();
        let found = store.find_one(&query).await.unwrap().unwrap();

        assert_eq!(found.title, "Sankofa");
    }

    #[tokio::test]
    async fn test_memory_store_accepts_duplicates() {
        let store = InMemorySongStore::new();
        let first = store.insert(sanko());
        let second = store.insert(sanko().with_field("album", "Deluxe"));

        assert_ne!(first, second);
        assert_eq!(store.len(), 2);

        let query = SongQuery::new("Sanko", "Timaya").unwrap();
        let found = store.find_one(&query).await.unwrap().unwrap();
        assert_eq!(found.field("album"), Some(&json!("Epiphany")));
    }

    #[tokio::test]
    async fn test_memory_store_empty() {
        let store = InMemorySongStore::new();
        let query = SongQuery::new("Sanko", "Timaya").unwrap();

        assert!(store.is_empty());
        assert_eq!(store.find_one(&query).await.unwrap(), None);
    }

    // ============================================================
    // MONGO HELPER TESTS
    // ============================================================

    #[test]
    fn test_lookup_filter_shape() {
        let query = SongQuery::new("Why?", "Timaya").unwrap();
        let filter = lookup_filter(&query);

        assert_eq!(
            filter,
            doc! {
                "title": { "$regex": r"Why\?", "$options": "i" },
                "artist": { "$regex": "Timaya", "$options": "i" },
            }
        );
    }

    #[test]
    fn test_index_fields_order() {
        assert_eq!(SONG_INDEX_FIELDS, ["title", "artist"]);
    }

    #[test]
    fn test_decode_document_keeps_extra_fields() {
        let id = ObjectId::new();
        let document = doc! {
            "_id": id,
            "title": "Sanko",
            "artist": "Timaya",
            "album": "Epiphany",
            "year": 2014,
            "bpm": 103.004,
            "genre": "Afrobeats",
        };

        let song = decode_document(document).unwrap();

        assert_eq!(song.title, "Sanko");
        assert_eq!(song.artist, "Timaya");
        assert_eq!(song.field("album"), Some(&json!("Epiphany")));
        assert_eq!(song.field("year"), Some(&json!(2014)));
        assert_eq!(song.field("bpm"), Some(&json!(103.004)));
        assert_eq!(song.field("genre"), Some(&json!("Afrobeats")));
        assert_eq!(song.field("_id"), Some(&json!(id.to_hex())));
    }

    #[test]
    fn test_decode_document_renders_dates_and_nested_ids() {
        let released = DateTime::from_millis(1_388_534_400_000);
        let document = doc! {
            "title": "Sanko",
            "artist": "Timaya",
            "released": released,
            "credits": [ { "producer": ObjectId::new() } ],
        };

        let song = decode_document(document).unwrap();

        let released = song.field("released").and_then(|v| v.as_str()).unwrap();
        let parsed = chrono::DateTime::parse_from_rfc3339(released).unwrap();
        assert_eq!(parsed.timestamp_millis(), 1_388_534_400_000);

        let producer = &song.field("credits").unwrap()[0]["producer"];
        assert!(producer.is_string(), "nested ids are hex strings: {}", producer);
    }

    #[test]
    fn test_decode_document_keeps_stored_whitespace() {
        let document = doc! { "title": " Sanko ", "artist": "Timaya" };

        let song = decode_document(document).unwrap();
        assert_eq!(song.title, " Sanko ");
    }

    // ============================================================
    // CONNECT TESTS
    // ============================================================

    fn config() -> Config {
        Config {
            db_username: Some("curator".to_string()),
            db_password: Some("s3cret".to_string()),
            db_name: "trackmeta".to_string(),
            app_name: "TrackMeta".to_string(),
            db_cluster: DEFAULT_CLUSTER.to_string(),
            mongodb_uri: None,
            bind: "127.0.0.1".parse().unwrap(),
            port: 3000,
            missing_log: PathBuf::from("admin/missing_songs.jsonl"),
        }
    }

    #[tokio::test]
    async fn test_connect_fails_on_invalid_uri() {
        let mut cfg = config();
        cfg.mongodb_uri = Some("not-a-uri".to_string());

        let result = connect(&cfg).await;
        assert!(
            matches!(result, Err(StoreError::Mongo(_))),
            "expected a database error, got {:?}",
            result
        );
    }

    #[tokio::test]
    async fn test_connect_fails_on_missing_credentials() {
        let mut cfg = config();
        cfg.db_username = None;

        let result = connect(&cfg).await;
        assert!(
            matches!(result, Err(StoreError::Config(ConfigError::Missing("DB_USERNAME")))),
            "expected a configuration error, got {:?}",
            result
        );
    }

    #[test]
    fn test_decode_document_requires_title_and_artist() {
        let document = doc! { "title": "Sanko", "album": "Epiphany" };
        assert!(decode_document(document).is_err());
    }
}
