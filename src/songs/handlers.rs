use super::misslog::{MissEntry, MissLog};
use super::protocol::{
    LookupParams, LookupResponse, MSG_PARAMS_REQUIRED, MSG_SEARCH_FAILED, not_found_message,
};
use crate::storage::{SongQuery, SongStore};

use axum::extract::Query;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::collections::HashMap;
use std::sync::Arc;

pub const WELCOME_MESSAGE: &str = "Welcome to Track Meta API!";

pub async fn handle_root() -> &'static str {
    WELCOME_MESSAGE
}

pub async fn handle_get_song(
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    Extension(store): Extension<Arc<dyn SongStore>>,
    Extension(miss_log): Extension<Arc<MissLog>>,
) -> (StatusCode, Json<LookupResponse>) {
    let params = match query {
        Ok(Query(query)) => LookupParams::from_query(query),
        Err(e) => {
            tracing::debug!("Unreadable lookup query string: {}", e);
            LookupParams::default()
        }
    };

    let Some((title, artist)) = params.required() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(LookupResponse::message(MSG_PARAMS_REQUIRED)),
        );
    };

    let query = match SongQuery::new(title, artist) {
        Ok(query) => query,
        Err(e) => {
            tracing::error!("Failed to build song query: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LookupResponse::message(MSG_SEARCH_FAILED)),
            );
        }
    };

    match store.find_one(&query).await {
        Ok(Some(song)) => {
            tracing::debug!("Found \"{}\" by {}", song.title, song.artist);
            (StatusCode::OK, Json(LookupResponse::Found(song)))
        }
        Ok(None) => {
            record_miss(&miss_log, title, artist).await;
            (
                StatusCode::NOT_FOUND,
                Json(LookupResponse::message(not_found_message(title, artist))),
            )
        }
        Err(e) => {
            tracing::error!("Error during song search: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LookupResponse::message(MSG_SEARCH_FAILED)),
            )
        }
    }
}

/// Best effort: a failed append is logged and otherwise ignored.
async fn record_miss(miss_log: &MissLog, title: &str, artist: &str) {
    let entry = MissEntry::new(title, artist);

    match miss_log.append(&entry).await {
        Ok(()) => tracing::info!("Missing song logged: \"{}\" by {}", title, artist),
        Err(e) => tracing::error!(
            "Error logging missing song to {}: {}",
            miss_log.path().display(),
            e
        ),
    }
}
