use super::{SONG_INDEX_FIELDS, SongQuery, SongStore, StoreError};
use crate::config::Config;
use crate::songs::types::Song;

use async_trait::async_trait;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Client, Collection, IndexModel};
use serde_json::Value;

/// Collection holding song documents.
pub const SONGS_COLLECTION: &str = "songs";

/// Opens a client for the configured deployment and verifies it with a `ping`.
///
/// There is no retry: a failure here is meant to stop the process at startup.
pub async fn connect(config: &Config) -> Result<MongoSongStore, StoreError> {
    let uri = config.connection_uri()?;
    let client = Client::with_uri_str(&uri).await?;
    let database = client.database(&config.db_name);

    database.run_command(doc! { "ping": 1 }).await?;
    tracing::info!("MongoDB connected successfully (database: {})", config.db_name);

    Ok(MongoSongStore::new(database.collection(SONGS_COLLECTION)))
}

#[derive(Debug, Clone)]
pub struct MongoSongStore {
    collection: Collection<Document>,
}

impl MongoSongStore {
    pub fn new(collection: Collection<Document>) -> Self {
        Self { collection }
    }

    /// Creates the compound `(title, artist)` index if it does not exist yet.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let mut keys = Document::new();
        for field in SONG_INDEX_FIELDS {
            keys.insert(field, 1);
        }

        let index = IndexModel::builder().keys(keys).build();
        let created = self.collection.create_index(index).await?;
        tracing::debug!("Song lookup index ready: {}", created.index_name);
        Ok(())
    }
}

/// Builds the `$regex` filter for a lookup: both fields must match.
pub fn lookup_filter(query: &SongQuery) -> Document {
    doc! {
        "title": { "$regex": query.title_pattern(), "$options": "i" },
        "artist": { "$regex": query.artist_pattern(), "$options": "i" },
    }
}

/// Converts a stored document into a [`Song`], keeping every extra field.
///
/// Values are rendered the way a plain JSON client expects them: object ids as
/// hex strings, dates as RFC 3339 strings, numbers as JSON numbers.
pub fn decode_document(document: Document) -> Result<Song, StoreError> {
    let value = bson_to_json(Bson::Document(document));
    Ok(serde_json::from_value(value)?)
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::DateTime(date) => match date.try_to_rfc3339_string() {
            Ok(text) => Value::String(text),
            Err(_) => Bson::DateTime(date).into_relaxed_extjson(),
        },
        Bson::Document(document) => Value::Object(
            document
                .into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

#[async_trait]
impl SongStore for MongoSongStore {
    async fn find_one(&self, query: &SongQuery) -> Result<Option<Song>, StoreError> {
        let filter = lookup_filter(query);

        match self.collection.find_one(filter).await? {
            Some(document) => Ok(Some(decode_document(document)?)),
            None => Ok(None),
        }
    }
}
