//! Campaign snapshots for external persistence.
//!
//! Provides binary serialization of a [`CampaignState`] via `bitcode` with a
//! versioned header, plus validation of a decoded campaign against the
//! catalog it will be used with.

use crate::campaign::CampaignState;
use crate::catalog::Catalog;
use crate::id::{ItemId, ProjectId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a campaign snapshot.
pub const SNAPSHOT_MAGIC: u32 = 0xC0A1_0001;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur while writing or restoring a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", SNAPSHOT_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("snapshot from future version {} (this build supports up to {})", .0, FORMAT_VERSION)]
    FutureVersion(u32),
    #[error("snapshot references unknown project {0:?}")]
    UnknownProject(ProjectId),
    #[error("snapshot references unknown item {0:?}")]
    UnknownItem(ItemId),
    #[error("snapshot stores a zero quantity for item {0:?}")]
    ZeroQuantity(ItemId),
    #[error("completed project {project:?} is missing prerequisite {prerequisite:?}")]
    MissingPrerequisite {
        project: ProjectId,
        prerequisite: ProjectId,
    },
    #[error("project {0:?} is marked revealed but is not hidden")]
    NotHidden(ProjectId),
    #[error("hidden project {0:?} is completed but was never revealed")]
    CompletedWhileHidden(ProjectId),
}

// ---------------------------------------------------------------------------
// Snapshot header
// ---------------------------------------------------------------------------

/// Header prepended to every snapshot. Enables format detection and version
/// checking before the campaign is trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic: u32,
    pub version: u32,
}

impl SnapshotHeader {
    pub fn new() -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
        }
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(SnapshotError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(SnapshotError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CampaignSnapshot {
    header: SnapshotHeader,
    campaign: CampaignState,
}

// ---------------------------------------------------------------------------
// Encode / decode
// ---------------------------------------------------------------------------

/// Serialize a campaign to bytes.
pub fn serialize_campaign(campaign: &CampaignState) -> Result<Vec<u8>, SnapshotError> {
    let snapshot = CampaignSnapshot {
        header: SnapshotHeader::new(),
        campaign: campaign.clone(),
    };
    bitcode::serialize(&snapshot).map_err(|e| SnapshotError::Encode(e.to_string()))
}

/// Deserialize a campaign from bytes, checking the header. The result is not
/// yet checked against a catalog; see [`validate_campaign`].
pub fn deserialize_campaign(data: &[u8]) -> Result<CampaignState, SnapshotError> {
    let snapshot: CampaignSnapshot =
        bitcode::deserialize(data).map_err(|e| SnapshotError::Decode(e.to_string()))?;
    snapshot.header.validate()?;
    Ok(snapshot.campaign)
}

/// Check a restored campaign against `catalog`: every referenced id exists,
/// no inventory entry is zero, every completed project has its direct
/// prerequisites completed and, if hidden, revealed, and only hidden projects
/// are marked revealed.
pub fn validate_campaign(catalog: &Catalog, campaign: &CampaignState) -> Result<(), SnapshotError> {
    for &project in campaign.completed() {
        let def = catalog
            .project(project)
            .ok_or(SnapshotError::UnknownProject(project))?;
        if let Some(&prerequisite) = def
            .prerequisites
            .iter()
            .find(|prereq| !campaign.is_completed(**prereq))
        {
            return Err(SnapshotError::MissingPrerequisite {
                project,
                prerequisite,
            });
        }
        if def.hidden && !campaign.is_unlocked(project) {
            return Err(SnapshotError::CompletedWhileHidden(project));
        }
    }

    for &project in campaign.unlocked_hidden() {
        let def = catalog
            .project(project)
            .ok_or(SnapshotError::UnknownProject(project))?;
        if !def.hidden {
            return Err(SnapshotError::NotHidden(project));
        }
    }

    for (item, quantity) in campaign.inventory() {
        if catalog.item(item).is_none() {
            return Err(SnapshotError::UnknownItem(item));
        }
        if quantity == 0 {
            return Err(SnapshotError::ZeroQuantity(item));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::CampaignId;
    use crate::progression::{acquire_item, advance_research};
    use crate::test_utils::*;

    fn played_campaign(catalog: &Catalog) -> CampaignState {
        let mut campaign = CampaignState::new(CampaignId(4), "Gatecrasher");
        advance_research(catalog, &mut campaign, project(catalog, "Alien Biotech")).unwrap();
        acquire_item(catalog, &mut campaign, item(catalog, "Sectoid Corpse"), 2).unwrap();
        acquire_item(catalog, &mut campaign, item(catalog, "Supplies"), 40).unwrap();
        campaign
    }

    #[test]
    fn snapshot_restores_identical_campaign() {
        let catalog = xcom_catalog();
        let campaign = played_campaign(&catalog);

        let bytes = serialize_campaign(&campaign).unwrap();
        let restored = deserialize_campaign(&bytes).unwrap();

        assert_eq!(restored, campaign);
        validate_campaign(&catalog, &restored).unwrap();
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let result = deserialize_campaign(&[0xFF, 0x01, 0x02]);
        assert!(matches!(result, Err(SnapshotError::Decode(_))));
    }

    #[test]
    fn header_rejects_wrong_magic_and_versions() {
        let bad_magic = SnapshotHeader {
            magic: 0xDEAD_BEEF,
            version: FORMAT_VERSION,
        };
        assert_eq!(
            bad_magic.validate(),
            Err(SnapshotError::InvalidMagic(0xDEAD_BEEF))
        );

        let future = SnapshotHeader {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION + 1,
        };
        assert_eq!(
            future.validate(),
            Err(SnapshotError::FutureVersion(FORMAT_VERSION + 1))
        );

        let old = SnapshotHeader {
            magic: SNAPSHOT_MAGIC,
            version: 0,
        };
        assert_eq!(old.validate(), Err(SnapshotError::UnsupportedVersion(0)));
    }

    #[test]
    fn validation_rejects_campaign_from_other_catalog() {
        let catalog = xcom_catalog();
        let campaign = played_campaign(&catalog);
        let small = flat_catalog(1, 0);
        assert!(validate_campaign(&small, &campaign).is_err());
    }

    #[test]
    fn validation_rejects_completed_project_without_prerequisites() {
        let catalog = xcom_catalog();
        let mut campaign = CampaignState::new(CampaignId(1), "Tampered");
        let gauss = project(&catalog, "Gauss Weapons");
        campaign.mark_completed(gauss);
        assert_eq!(
            validate_campaign(&catalog, &campaign),
            Err(SnapshotError::MissingPrerequisite {
                project: gauss,
                prerequisite: project(&catalog, "Magnetic Weapons"),
            })
        );
    }

    #[test]
    fn validation_rejects_revealed_visible_project() {
        let catalog = xcom_catalog();
        let mut campaign = CampaignState::new(CampaignId(1), "Tampered");
        let modular = project(&catalog, "Modular Weapons");
        campaign.unlock_hidden(modular);
        assert_eq!(
            validate_campaign(&catalog, &campaign),
            Err(SnapshotError::NotHidden(modular))
        );
    }

    #[test]
    fn validation_rejects_completed_unrevealed_project() {
        let catalog = xcom_catalog();
        let mut campaign = CampaignState::new(CampaignId(1), "Tampered");
        let autopsy = project(&catalog, "Sectoid Autopsy");
        campaign.mark_completed(project(&catalog, "Alien Biotech"));
        campaign.mark_completed(autopsy);
        assert_eq!(
            validate_campaign(&catalog, &campaign),
            Err(SnapshotError::CompletedWhileHidden(autopsy))
        );

        campaign.unlock_hidden(autopsy);
        assert_eq!(validate_campaign(&catalog, &campaign), Ok(()));
    }
}
