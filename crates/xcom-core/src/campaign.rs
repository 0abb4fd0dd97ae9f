//! Per-campaign mutable state.
//!
//! A [`CampaignState`] is created empty and only changes through the
//! progression operations in [`crate::progression`], which validate every
//! transition before touching it. Read access is unrestricted.

use crate::id::{CampaignId, ItemId, ProjectId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Research and inventory state of one campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignState {
    id: CampaignId,
    name: String,
    completed: BTreeSet<ProjectId>,
    /// Owned quantities. Entries are never zero.
    inventory: BTreeMap<ItemId, u32>,
    /// Hidden projects revealed by item acquisition. Separate from `completed`.
    unlocked_hidden: BTreeSet<ProjectId>,
}

impl CampaignState {
    /// A fresh campaign with nothing researched and an empty inventory.
    pub fn new(id: CampaignId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            completed: BTreeSet::new(),
            inventory: BTreeMap::new(),
            unlocked_hidden: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> CampaignId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_completed(&self, project: ProjectId) -> bool {
        self.completed.contains(&project)
    }

    /// Whether a hidden project has been revealed for this campaign.
    pub fn is_unlocked(&self, project: ProjectId) -> bool {
        self.unlocked_hidden.contains(&project)
    }

    /// Owned quantity of `item`; 0 if none.
    pub fn inventory_of(&self, item: ItemId) -> u32 {
        self.inventory.get(&item).copied().unwrap_or(0)
    }

    /// Completed projects in catalog order.
    pub fn completed(&self) -> &BTreeSet<ProjectId> {
        &self.completed
    }

    pub fn unlocked_hidden(&self) -> &BTreeSet<ProjectId> {
        &self.unlocked_hidden
    }

    /// Owned items with their quantities, in catalog order. Items the
    /// campaign holds none of are omitted.
    pub fn inventory(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.inventory.iter().map(|(&item, &qty)| (item, qty))
    }

    // -- Crate-private mutation, driven by progression --

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn mark_completed(&mut self, project: ProjectId) -> bool {
        self.completed.insert(project)
    }

    pub(crate) fn unlock_hidden(&mut self, project: ProjectId) -> bool {
        self.unlocked_hidden.insert(project)
    }

    /// Set the owned quantity of `item`, dropping the entry at zero.
    pub(crate) fn set_quantity(&mut self, item: ItemId, quantity: u32) {
        if quantity == 0 {
            self.inventory.remove(&item);
        } else {
            self.inventory.insert(item, quantity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_campaign_is_empty() {
        let campaign = CampaignState::new(CampaignId(1), "Gatecrasher");
        assert_eq!(campaign.id(), CampaignId(1));
        assert_eq!(campaign.name(), "Gatecrasher");
        assert!(campaign.completed().is_empty());
        assert!(campaign.unlocked_hidden().is_empty());
        assert_eq!(campaign.inventory().count(), 0);
        assert_eq!(campaign.inventory_of(ItemId(0)), 0);
    }

    #[test]
    fn zero_quantity_removes_inventory_entry() {
        let mut campaign = CampaignState::new(CampaignId(1), "Gatecrasher");
        campaign.set_quantity(ItemId(2), 5);
        assert_eq!(campaign.inventory_of(ItemId(2)), 5);
        campaign.set_quantity(ItemId(2), 0);
        assert_eq!(campaign.inventory_of(ItemId(2)), 0);
        assert_eq!(campaign.inventory().count(), 0);
    }

    #[test]
    fn inventory_lists_in_item_order() {
        let mut campaign = CampaignState::new(CampaignId(1), "Gatecrasher");
        campaign.set_quantity(ItemId(4), 1);
        campaign.set_quantity(ItemId(1), 3);
        let listed: Vec<(ItemId, u32)> = campaign.inventory().collect();
        assert_eq!(listed, vec![(ItemId(1), 3), (ItemId(4), 1)]);
    }

    #[test]
    fn completion_and_unlock_sets_are_separate() {
        let mut campaign = CampaignState::new(CampaignId(1), "Gatecrasher");
        assert!(campaign.unlock_hidden(ProjectId(3)));
        assert!(!campaign.unlock_hidden(ProjectId(3)));
        assert!(campaign.is_unlocked(ProjectId(3)));
        assert!(!campaign.is_completed(ProjectId(3)));
        assert!(campaign.mark_completed(ProjectId(0)));
        assert!(campaign.is_completed(ProjectId(0)));
    }
}
