//! # Contentsum Testkit
//!
//! Testing utilities for content checksums.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Fixed inputs with exact expected checksums
//! - **Generators**: Proptest strategies for slots, hulls, and tables
//! - **Fixtures**: Sample hulls and pre-populated registries
//!
//! ## Golden Vectors
//!
//! ```rust
//! use contentsum_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, actual) in verify_all_vectors() {
//!     assert!(matches, "{name}: {actual}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use contentsum_testkit::generators::{hull_from_params, HullParams};
//!
//! proptest! {
//!     #[test]
//!     fn hull_checksum_is_deterministic(params: HullParams) {
//!         let h1 = hull_from_params(&params);
//!         let h2 = hull_from_params(&params);
//!         prop_assert_eq!(h1.checksum(), h2.checksum());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use contentsum_testkit::fixtures::populated_registry;
//!
//! let registry = populated_registry("hulls");
//! assert!(registry.lookup("SH_BASIC_SMALL").is_some());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{generated_hulls, populated_registry, sample_hulls, sample_table, table_of};
pub use generators::{hull_from_params, HullParams};
pub use vectors::{all_vectors, minimal_hull, verify_all_vectors, GoldenVector};
