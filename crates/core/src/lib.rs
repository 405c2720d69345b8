//! Domain rules for the carta catalog taxonomy.
//!
//! Pure logic only: id and timestamp aliases, the domain error type,
//! group-path string handling, and the validation/derivation rules for
//! category trees and catalog items. Persistence lives in `carta-db`,
//! orchestration in `carta-catalog`.

pub mod category;
pub mod error;
pub mod item;
pub mod path;
pub mod types;
