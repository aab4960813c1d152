//! Vet clinic backend: CRUD REST API for consultations, veterinarians, animals and
//! secretaries over PostgreSQL, plus the typed client and list-page state used by the
//! frontend.

pub mod client;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod openapi;
pub mod resource;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;
pub mod ui;

pub use client::{ClientError, HttpClient, ResourceApi};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use resource::Resource;
pub use routes::app_router;
pub use service::CrudService;
pub use settings::{Settings, StoreBackend};
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, PgStore, Store};
pub use ui::{ListPage, MutationOutcome, Notification, Severity, TableView};
