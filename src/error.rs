//! Error types for routing and detail lookups
//!
//! Infrastructure failures (I/O, CSV parsing, configuration) travel as
//! `anyhow::Error`; the types here describe the recoverable outcomes of
//! navigation that callers are expected to match on.

use thiserror::Error;

use crate::schema::EntityType;

/// A query that does not describe a detail page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("unknown entity type: {0:?}")]
    UnknownType(String),

    #[error("invalid id: {0:?}")]
    InvalidId(String),

    #[error("missing query parameter: {0}")]
    MissingParameter(&'static str),
}

/// A valid entity type with no row carrying the requested id
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} {id} not found")]
pub struct NotFound {
    pub kind: EntityType,
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    NotFound(#[from] NotFound),
}
