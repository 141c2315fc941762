//! # Contentsum
//!
//! The unified API for content checksums: every process computes one number
//! per content category, and peers compare those numbers before a session
//! starts so that diverging rule sets are caught early.
//!
//! ## Overview
//!
//! - **Combine engine**: folds typed values into a bounded running sum
//! - **Registries**: own one category's named items and aggregate a checksum
//! - **Manifests**: the per-category checksums one process reports
//! - **Consistency**: local-versus-remote comparison with a structured report
//!
//! ## Usage
//!
//! ```rust
//! use contentsum::{ContentTable, GameContent, ShipHull, ShipSlotType, Slot};
//!
//! let content = GameContent::default();
//! let hull = ShipHull::builder("SH_BASIC_SMALL")
//!     .slot(Slot::new(ShipSlotType::External, 0.5, 0.5))
//!     .build();
//! content
//!     .hulls()
//!     .replace(ContentTable::from_items(vec![hull]).unwrap());
//!
//! let local = content.manifest();
//!
//! // ... the session layer hands the manifest to the peer, which runs:
//! let report = content.verify_against(&local);
//! assert!(report.is_consistent());
//! ```
//!
//! ## Re-exports
//!
//! - `contentsum::core` - The combine engine and content model
//! - `contentsum::registry` - Content tables and registries

pub mod consistency;
pub mod content;
pub mod error;
pub mod manifest;

// Re-export component crates
pub use contentsum_core as core;
pub use contentsum_registry as registry;

// Re-export main types for convenience
pub use consistency::{verify, ConsistencyReport, Mismatch};
pub use content::{GameContent, GameContentConfig, HULLS};
pub use error::{ContentError, Result};
pub use manifest::ChecksumManifest;

// Re-export commonly used component types
pub use contentsum_core::{
    checksum_of, CheckSum, ChecksumEnum, Combine, RunningSum, ShipHull, ShipHullBuilder,
    ShipSlotType, Slot, CHECKSUM_MODULUS,
};
pub use contentsum_registry::{
    ContentLoader, ContentRef, ContentRegistry, ContentTable, RegistryConfig, RegistryError,
};
