use std::path::PathBuf;

use rusqlite::Connection;
use serde::Deserialize;

use crate::store::Store;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// An open workspace: the durable medium plus the in-memory store hydrated
/// from it. The store is the single owner of all collections; handlers
/// mutate it and persist through the connection.
pub struct Session {
    pub workspace: PathBuf,
    pub conn: Connection,
    pub store: Store,
}

#[derive(Default)]
pub struct AppState {
    pub session: Option<Session>,
}
