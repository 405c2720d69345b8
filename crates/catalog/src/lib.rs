//! Catalog taxonomy services: brand-scoped category trees, catalog items,
//! and the archive/restore protocol for both.
//!
//! The services are written against the [`store::CatalogStore`] traits.
//! [`store::PgCatalogStore`] backs them with Postgres via `carta-db`;
//! [`store::MemoryCatalogStore`] backs them with in-process tables for
//! tests and embedded use.

pub mod category;
pub mod item;
pub mod resolver;
pub mod store;
