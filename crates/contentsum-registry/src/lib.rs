//! # Contentsum Registry
//!
//! Owns the authoritative content table for one category and aggregates the
//! checksum peers compare.
//!
//! ## Overview
//!
//! A [`ContentRegistry`] holds a [`ContentTable`] behind an atomic pointer.
//! The content loader delivers a complete table, either directly through
//! [`ContentRegistry::replace`] or asynchronously through a [`Pending`]
//! handle that the registry polls without blocking.
//!
//! ## Key Types
//!
//! - [`ContentRegistry`] - Snapshot-swapping owner of one category's content
//! - [`ContentTable`] - Immutable, name-sorted set of items
//! - [`ContentRef`] - Handle to one item that pins its snapshot
//! - [`Pending`] - A table that is still being produced
//! - [`ContentLoader`] - The async boundary to the content parser
//!
//! ## Usage
//!
//! ```rust
//! use contentsum_core::ShipHull;
//! use contentsum_registry::{ContentRegistry, ContentTable, RegistryConfig};
//!
//! let registry = ContentRegistry::new(RegistryConfig::for_category("hulls"));
//! assert_eq!(registry.checksum(), 0);
//!
//! let table = ContentTable::from_items(vec![ShipHull::builder("SH_BASIC").build()]).unwrap();
//! registry.replace(table);
//!
//! assert!(registry.lookup("SH_BASIC").is_some());
//! let checksum = registry.checksum();
//! # let _ = checksum;
//! ```
//!
//! ## Design Notes
//!
//! - **Whole-table swaps**: entries are immutable, so no per-entry locking
//! - **Non-blocking delivery**: reads poll the pending table, never wait on it
//! - **No error state**: a failed load leaves the previous table authoritative

pub mod error;
pub mod loader;
pub mod pending;
pub mod registry;
pub mod table;

pub use error::{RegistryError, Result};
pub use loader::{spawn_load, ContentLoader, StaticLoader};
pub use pending::{Pending, PendingSender};
pub use registry::{ContentRef, ContentRegistry, RegistryConfig, RegistryState};
pub use table::{ContentItem, ContentTable};
