//! ACRN gateway: introspecting CRUD-over-HTTP service for the ACRN administration database.

pub mod config;
pub mod describe;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;
pub mod workflow;

pub use config::Settings;
pub use describe::{DescribedQuery, DescribedResult, FieldDescriptions, HeuristicProvenance, ProvenanceResolver, Screen};
pub use error::{AppError, ConfigError};
pub use response::{created, error_body, no_content, ok};
pub use routes::{app, capteur_routes, common_routes, profile_routes, table_routes};
pub use schema::{describe_table, list_tables, ColumnMeta, TableMeta};
pub use service::{RecordAccessor, RequestValidator};
pub use state::AppState;
pub use store::{connect, connect_options};
pub use workflow::ProfileWorkflow;
