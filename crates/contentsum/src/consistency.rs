//! Comparing local checksums against a peer's manifest.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ContentError, Result};
use crate::manifest::ChecksumManifest;

/// One disagreement between local and remote content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mismatch {
    /// Both sides know the category but computed different checksums.
    Checksum {
        category: String,
        local: u32,
        remote: u32,
    },
    /// The remote reports a category this process does not have.
    MissingLocal { category: String, remote: u32 },
    /// This process has a category the remote did not report.
    MissingRemote { category: String, local: u32 },
}

impl Mismatch {
    pub fn category(&self) -> &str {
        match self {
            Mismatch::Checksum { category, .. }
            | Mismatch::MissingLocal { category, .. }
            | Mismatch::MissingRemote { category, .. } => category,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Checksum {
                category,
                local,
                remote,
            } => write!(f, "{category}: local {local} != remote {remote}"),
            Mismatch::MissingLocal { category, remote } => {
                write!(f, "{category}: missing locally (remote {remote})")
            }
            Mismatch::MissingRemote { category, local } => {
                write!(f, "{category}: missing remotely (local {local})")
            }
        }
    }
}

/// Outcome of comparing two manifests.
///
/// Mismatches are listed in ascending category order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub matched: usize,
    pub mismatches: Vec<Mismatch>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Turn an inconsistent report into [`ContentError::Mismatch`].
    pub fn ensure_consistent(self) -> Result<()> {
        if self.is_consistent() {
            Ok(())
        } else {
            Err(ContentError::Mismatch(self))
        }
    }
}

impl fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_consistent() {
            return write!(f, "{} categories consistent", self.matched);
        }
        write!(f, "{} mismatched", self.mismatches.len())?;
        for mismatch in &self.mismatches {
            write!(f, "; {mismatch}")?;
        }
        Ok(())
    }
}

/// Compare a local manifest against a remote one.
///
/// Both manifests iterate in ascending category order, so this is a single
/// merge pass.
pub fn verify(local: &ChecksumManifest, remote: &ChecksumManifest) -> ConsistencyReport {
    let mut report = ConsistencyReport::default();
    let mut locals = local.iter().peekable();
    let mut remotes = remote.iter().peekable();

    loop {
        let mismatch = match (locals.peek().copied(), remotes.peek().copied()) {
            (None, None) => break,
            (Some((category, local)), None) => {
                locals.next();
                Mismatch::MissingRemote {
                    category: category.to_owned(),
                    local,
                }
            }
            (None, Some((category, remote))) => {
                remotes.next();
                Mismatch::MissingLocal {
                    category: category.to_owned(),
                    remote,
                }
            }
            (Some((lc, local)), Some((rc, remote))) => match lc.cmp(rc) {
                std::cmp::Ordering::Less => {
                    locals.next();
                    Mismatch::MissingRemote {
                        category: lc.to_owned(),
                        local,
                    }
                }
                std::cmp::Ordering::Greater => {
                    remotes.next();
                    Mismatch::MissingLocal {
                        category: rc.to_owned(),
                        remote,
                    }
                }
                std::cmp::Ordering::Equal => {
                    locals.next();
                    remotes.next();
                    if local == remote {
                        report.matched += 1;
                        continue;
                    }
                    Mismatch::Checksum {
                        category: lc.to_owned(),
                        local,
                        remote,
                    }
                }
            },
        };
        tracing::warn!(category = mismatch.category(), %mismatch, "content checksum mismatch");
        report.mismatches.push(mismatch);
    }

    tracing::debug!(
        matched = report.matched,
        mismatched = report.mismatches.len(),
        "verified content manifest"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn manifest() -> impl Strategy<Value = ChecksumManifest> {
        prop::collection::btree_map("[a-z]{1,10}", 0u32..10_000_000, 0..8)
            .prop_map(|entries| entries.into_iter().collect::<ChecksumManifest>())
    }

    #[test]
    fn test_identical_manifests_are_consistent() {
        let m = ChecksumManifest::new().with("hulls", 5).with("parts", 7);
        let report = verify(&m, &m.clone());
        assert!(report.is_consistent());
        assert_eq!(report.matched, 2);
        assert!(report.ensure_consistent().is_ok());
    }

    #[test]
    fn test_empty_manifests_are_consistent() {
        let report = verify(&ChecksumManifest::new(), &ChecksumManifest::new());
        assert!(report.is_consistent());
        assert_eq!(report.matched, 0);
    }

    #[test]
    fn test_checksum_mismatch() {
        let local = ChecksumManifest::new().with("hulls", 5);
        let remote = ChecksumManifest::new().with("hulls", 6);
        let report = verify(&local, &remote);
        assert_eq!(
            report.mismatches,
            vec![Mismatch::Checksum {
                category: "hulls".into(),
                local: 5,
                remote: 6
            }]
        );
        assert!(matches!(
            report.ensure_consistent(),
            Err(ContentError::Mismatch(_))
        ));
    }

    #[test]
    fn test_missing_categories_in_order() {
        let local = ChecksumManifest::new()
            .with("buildings", 1)
            .with("hulls", 2);
        let remote = ChecksumManifest::new().with("hulls", 2).with("parts", 3);
        let report = verify(&local, &remote);
        assert_eq!(report.matched, 1);
        assert_eq!(
            report.mismatches,
            vec![
                Mismatch::MissingRemote {
                    category: "buildings".into(),
                    local: 1
                },
                Mismatch::MissingLocal {
                    category: "parts".into(),
                    remote: 3
                },
            ]
        );
    }

    #[test]
    fn test_report_display() {
        let report = verify(
            &ChecksumManifest::new().with("hulls", 1),
            &ChecksumManifest::new().with("hulls", 2),
        );
        assert_eq!(report.to_string(), "1 mismatched; hulls: local 1 != remote 2");
    }

    proptest! {
        #[test]
        fn test_self_comparison_is_consistent(m in manifest()) {
            let report = verify(&m, &m);
            prop_assert!(report.is_consistent());
            prop_assert_eq!(report.matched, m.len());
        }

        #[test]
        fn test_every_category_accounted_for(local in manifest(), remote in manifest()) {
            let report = verify(&local, &remote);
            let mut categories: Vec<&str> =
                local.categories().chain(remote.categories()).collect();
            categories.sort_unstable();
            categories.dedup();
            prop_assert_eq!(report.matched + report.mismatches.len(), categories.len());
        }
    }
}
