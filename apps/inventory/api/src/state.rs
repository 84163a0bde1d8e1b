//! Shared application state.

/// Cloned into the readiness handler; domain routers receive their own
/// services built from `db`.
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
}
