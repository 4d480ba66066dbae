use crate::auth::AdminCredentials;
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub admin: Arc<AdminCredentials>,
    pub sessions: Arc<RwLock<HashSet<String>>>,
}
