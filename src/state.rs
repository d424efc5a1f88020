//! Shared application state for all routes. Read-only once serving starts.

use crate::describe::{DescribedQuery, FieldDescriptions, HeuristicProvenance, ProvenanceResolver};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// Loaded once at startup; a change in the description table needs a restart.
    pub descriptions: Arc<FieldDescriptions>,
    pub provenance: Arc<dyn ProvenanceResolver>,
}

impl AppState {
    pub fn new(pool: SqlitePool, descriptions: FieldDescriptions) -> Self {
        AppState {
            pool,
            descriptions: Arc::new(descriptions),
            provenance: Arc::new(HeuristicProvenance),
        }
    }

    pub fn described_query(&self) -> DescribedQuery<'_> {
        DescribedQuery::new(&self.descriptions, self.provenance.as_ref())
    }
}
