use sea_orm::DatabaseConnection;

/// Shared handler state: one connection pool for the whole process
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}
