//! SQLite-backed storage for tessera
//!
//! [`SqliteStore`] implements both engine ports durably: metadata rows in a
//! main database file, one ATTACH-ed database file per tenant namespace,
//! JSON payload columns with type-aware expression indexes per attribute.
//!
//! Note: SQLite caps simultaneously attached databases (10 by default, 125
//! with a raised compile-time limit), which bounds the number of tenant
//! namespaces one store handle can serve.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod store;

pub use store::{SqliteConfig, SqliteStore};
