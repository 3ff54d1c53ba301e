//! Searchable, paginated video gallery engine.
//!
//! The library holds the catalog in memory, filters it per query, pages the
//! result and describes every visible change as a [`reconcile::Patch`] that a
//! host [`document::Document`] applies. The `vidwall` binary hosts it in a
//! terminal.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod controller;
pub mod debounce;
pub mod document;
pub mod filter;
pub mod logging;
pub mod pagination;
pub mod preference;
pub mod reconcile;
