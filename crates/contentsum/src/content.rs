//! GameContent: the process-wide owner of every content registry.
//!
//! Each content category has one registry. `GameContent` aggregates their
//! checksums into a [`ChecksumManifest`] and compares it against a peer's.

use contentsum_core::ShipHull;
use contentsum_registry::{ContentRegistry, RegistryConfig};

use crate::consistency::{verify, ConsistencyReport};
use crate::manifest::ChecksumManifest;

/// Category label for ship hulls.
pub const HULLS: &str = "hulls";

/// Configuration for [`GameContent`].
#[derive(Debug, Clone)]
pub struct GameContentConfig {
    /// Hull registry configuration.
    pub hulls: RegistryConfig,
}

impl Default for GameContentConfig {
    fn default() -> Self {
        Self {
            hulls: RegistryConfig::for_category(HULLS),
        }
    }
}

/// The content context.
///
/// Construct one per process and share it by reference; registries are
/// internally synchronized.
#[derive(Debug)]
pub struct GameContent {
    /// Ship hull definitions.
    hulls: ContentRegistry<ShipHull>,
}

impl GameContent {
    pub fn new(config: GameContentConfig) -> Self {
        Self {
            hulls: ContentRegistry::new(config.hulls),
        }
    }

    pub fn hulls(&self) -> &ContentRegistry<ShipHull> {
        &self.hulls
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Consistency
    // ─────────────────────────────────────────────────────────────────────────

    /// Checksums of every category, keyed by category label.
    pub fn manifest(&self) -> ChecksumManifest {
        let manifest = ChecksumManifest::new().with(self.hulls.category(), self.hulls.checksum());
        tracing::debug!(categories = manifest.len(), "built content manifest");
        manifest
    }

    /// Compare local content against a peer's manifest.
    pub fn verify_against(&self, remote: &ChecksumManifest) -> ConsistencyReport {
        verify(&self.manifest(), remote)
    }
}

impl Default for GameContent {
    fn default() -> Self {
        Self::new(GameContentConfig::default())
    }
}
