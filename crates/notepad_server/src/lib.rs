//! HTTP surface for the notepad feature.
//!
//! # Responsibility
//! - Map notepad routes onto `notepad_core` use-cases.
//! - Own server bootstrap: database open, listener bind, graceful shutdown.
//!
//! # Invariants
//! - Requests without a valid user identity never reach storage.
//! - Handlers never expose another user's notepad; such ids answer 404.

use axum::routing::{get, post};
use axum::Router;
use log::{error, info};
use notepad_core::db::{open_db, DbError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub mod config;
mod error;
pub mod handlers;
mod identity;
mod payload;
mod render;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use identity::{CurrentUser, USER_ID_HEADER};
pub use render::EMPTY_LIST_MESSAGE;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a migrated connection for use by handlers.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }
}

/// Builds the notepad router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(handlers::LIST_PATH, get(handlers::list_notepads))
        .route(
            "/notepad/create",
            get(handlers::create_form).post(handlers::create_notepad),
        )
        .route("/notepad/{id}", get(handlers::show_notepad))
        .route(
            "/notepad/edit/{id}",
            get(handlers::edit_form).post(handlers::edit_notepad),
        )
        .route("/notepad/delete/{id}", post(handlers::delete_notepad))
        .with_state(state)
}

#[derive(Debug)]
pub enum ServeError {
    Db(DbError),
    Bind { address: String, source: std::io::Error },
    Io(std::io::Error),
}

impl Display for ServeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "failed to open database: {err}"),
            Self::Bind { address, source } => write!(f, "failed to bind {address}: {source}"),
            Self::Io(err) => write!(f, "server error: {err}"),
        }
    }
}

impl Error for ServeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Bind { source, .. } => Some(source),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<DbError> for ServeError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Opens the configured database and serves HTTP until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), ServeError> {
    let conn = open_db(&config.db_path)?;
    if config.uses_in_memory_db() {
        info!("event=server_start module=http status=ok db=memory note=data_is_not_persisted");
    }

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await.map_err(|source| {
        error!("event=server_bind module=http status=error address={address} error={source}");
        ServeError::Bind {
            address: address.clone(),
            source,
        }
    })?;
    info!("event=server_bind module=http status=ok address={address}");

    axum::serve(listener, router(AppState::new(conn)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServeError::Io)?;

    info!("event=server_stop module=http status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=shutdown_signal module=http status=error error={err}");
        std::future::pending::<()>().await;
    }
}
