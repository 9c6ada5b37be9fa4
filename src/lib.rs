//! Offline LC-MS compound identification by mass or molecular formula.
//!
//! A consolidated compound table (HMDB, ChEBI, LipidMaps) is opened once
//! into an immutable, indexed [`core::store::CompoundStore`]; queries are
//! then answered synchronously by the [`engine::search::SearchEngine`].
//!
//! # Examples
//!
//! In-memory usage:
//! ```
//! use masslookup::{
//!     adduct::AdductMode,
//!     compound::Compound,
//!     core::store::CompoundStore,
//!     engine::search::search,
//!     query::SearchQuery,
//!     types::Source,
//! };
//!
//! let store = CompoundStore::from_compounds(vec![Compound {
//!     id: "HMDB0000122".to_string(),
//!     name: "D-Glucose".to_string(),
//!     formula: "C6H12O6".to_string(),
//!     monoisotopic_mass: 180.063388,
//!     source: Source::Hmdb,
//!     source_url: Source::Hmdb.reference_url("HMDB0000122"),
//! }]);
//!
//! let query = SearchQuery::mass(181.0707, AdductMode::MPlusH.into()).with_tolerance(0.01);
//! let hits = search(&store, &query).expect("valid query");
//! assert_eq!(hits[0].compound.name, "D-Glucose");
//! assert!(hits[0].mass_error_da().unwrap().abs() < 0.001);
//! ```
//!
//! Against a consolidated SQLite file:
//! ```no_run
//! use masslookup::{open_store, query::SearchQuery, search};
//!
//! let store = open_store("database/compounds.db").expect("open store");
//! let hits = search(&store, &SearchQuery::formula("C6H12O6")).expect("search");
//! for hit in hits {
//!     println!("{} {}", hit.compound.source, hit.compound.name);
//! }
//! ```
#![deny(missing_docs)]

/// Adduct species and mass conversion.
pub mod adduct;
/// Compound record.
pub mod compound;
/// Session configuration.
pub mod config;
/// In-memory compound store and index helpers.
pub mod core;
/// Search orchestration and ranking.
pub mod engine;
/// Error kinds.
pub mod error;
/// Molecular formula grammar.
pub mod formula;
/// Consolidated file access.
pub mod persist;
/// Query model and validation.
pub mod query;
/// Shared primitive types and enums.
pub mod types;

pub use engine::search::search;
pub use persist::sqlite::open_store;
