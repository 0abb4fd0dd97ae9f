use serde::{Deserialize, Serialize};

/// Identifies a research project in the catalog. Cheap to copy and compare.
///
/// The wrapped value is the project's position in catalog load order, so
/// sorting by `ProjectId` is sorting by catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub u32);

/// Identifies an item in the catalog. Ordered by catalog load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// Identifies a campaign by its creation sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CampaignId(pub u64);

impl ProjectId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl ItemId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
