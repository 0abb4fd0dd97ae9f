//! The campaign engine: one shared catalog, any number of campaigns.
//!
//! [`Engine`] routes the research operations to campaigns by
//! [`CampaignId`]. Campaigns share no mutable state, so each is an
//! independent unit of mutation; the catalog is held behind an [`Arc`] and
//! may be shared with other engines or threads.

use crate::campaign::CampaignState;
use crate::catalog::Catalog;
use crate::eligibility::available_research;
use crate::id::{CampaignId, ItemId, ProjectId};
use crate::progression::{self, ItemAcquired, ProgressionError, ResearchCompleted};
use crate::snapshot::{self, SnapshotError};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by [`Engine`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("unknown campaign: {0:?}")]
    UnknownCampaign(CampaignId),
    #[error("a campaign named {0:?} already exists")]
    DuplicateCampaign(String),
    #[error("campaign id {0:?} is already in use")]
    DuplicateCampaignId(CampaignId),
    #[error("campaign name must not be empty")]
    EmptyCampaignName,
    #[error(transparent)]
    Progression(#[from] ProgressionError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Engine {
    catalog: Arc<Catalog>,
    /// Keyed by creation sequence number, so iteration is creation order.
    campaigns: BTreeMap<CampaignId, CampaignState>,
    next_campaign: u64,
}

impl Engine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            campaigns: BTreeMap::new(),
            next_campaign: 1,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// A handle to the shared catalog.
    pub fn shared_catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    // -- Campaign management --

    /// Start a new campaign with nothing researched and an empty inventory.
    /// Names are trimmed and must be unique across the engine.
    pub fn start_campaign(&mut self, name: &str) -> Result<CampaignId, EngineError> {
        let name = self.check_new_name(name)?;

        let id = CampaignId(self.next_campaign);
        self.next_campaign += 1;
        self.campaigns.insert(id, CampaignState::new(id, name));

        tracing::info!(campaign = %name, id = id.0, "campaign started");
        Ok(id)
    }

    pub fn campaign(&self, id: CampaignId) -> Option<&CampaignState> {
        self.campaigns.get(&id)
    }

    pub fn campaign_by_name(&self, name: &str) -> Option<&CampaignState> {
        self.campaigns.values().find(|c| c.name() == name)
    }

    /// All campaigns in creation order.
    pub fn campaigns(&self) -> impl ExactSizeIterator<Item = &CampaignState> {
        self.campaigns.values()
    }

    pub fn campaign_count(&self) -> usize {
        self.campaigns.len()
    }

    // -- Queries --

    /// Projects the campaign may start, in catalog order.
    pub fn available_research(&self, id: CampaignId) -> Result<Vec<ProjectId>, EngineError> {
        let campaign = self.get(id)?;
        Ok(available_research(&self.catalog, campaign))
    }

    /// Owned items with quantities, in catalog order.
    pub fn inventory(&self, id: CampaignId) -> Result<Vec<(ItemId, u32)>, EngineError> {
        Ok(self.get(id)?.inventory().collect())
    }

    /// Full prerequisite set of `project`. Not campaign-scoped.
    pub fn tech_requirements(&self, project: ProjectId) -> Result<&BTreeSet<ProjectId>, EngineError> {
        Ok(progression::tech_requirements(&self.catalog, project)?)
    }

    /// Available research for every campaign, in creation order. Campaigns
    /// are evaluated in parallel.
    #[cfg(feature = "parallel")]
    pub fn available_research_all(&self) -> Vec<(CampaignId, Vec<ProjectId>)> {
        use rayon::prelude::*;

        self.campaigns
            .par_iter()
            .map(|(&id, campaign)| (id, available_research(&self.catalog, campaign)))
            .collect()
    }

    /// Available research for every campaign, in creation order.
    #[cfg(not(feature = "parallel"))]
    pub fn available_research_all(&self) -> Vec<(CampaignId, Vec<ProjectId>)> {
        self.campaigns
            .iter()
            .map(|(&id, campaign)| (id, available_research(&self.catalog, campaign)))
            .collect()
    }

    // -- Actions --

    pub fn advance_research(
        &mut self,
        id: CampaignId,
        project: ProjectId,
    ) -> Result<ResearchCompleted, EngineError> {
        let campaign = self
            .campaigns
            .get_mut(&id)
            .ok_or(EngineError::UnknownCampaign(id))?;
        Ok(progression::advance_research(&self.catalog, campaign, project)?)
    }

    pub fn acquire_item(
        &mut self,
        id: CampaignId,
        item: ItemId,
        quantity: i64,
    ) -> Result<ItemAcquired, EngineError> {
        let campaign = self
            .campaigns
            .get_mut(&id)
            .ok_or(EngineError::UnknownCampaign(id))?;
        Ok(progression::acquire_item(&self.catalog, campaign, item, quantity)?)
    }

    // -- Persistence --

    /// Encode a campaign for an external store.
    pub fn snapshot_campaign(&self, id: CampaignId) -> Result<Vec<u8>, EngineError> {
        Ok(snapshot::serialize_campaign(self.get(id)?)?)
    }

    /// Restore a campaign previously written by [`snapshot_campaign`]. The
    /// campaign keeps its original id; later campaigns are numbered after it.
    ///
    /// [`snapshot_campaign`]: Self::snapshot_campaign
    pub fn restore_campaign(&mut self, data: &[u8]) -> Result<CampaignId, EngineError> {
        let mut campaign = snapshot::deserialize_campaign(data)?;
        snapshot::validate_campaign(&self.catalog, &campaign)?;

        let id = campaign.id();
        if self.campaigns.contains_key(&id) {
            return Err(EngineError::DuplicateCampaignId(id));
        }
        let name = self.check_new_name(campaign.name())?.to_string();
        campaign.set_name(name);

        self.next_campaign = self.next_campaign.max(id.0.saturating_add(1));
        tracing::info!(campaign = %campaign.name(), id = id.0, "campaign restored");
        self.campaigns.insert(id, campaign);
        Ok(id)
    }

    /// Trimmed `name`, if it is non-empty and not used by a held campaign.
    fn check_new_name<'n>(&self, name: &'n str) -> Result<&'n str, EngineError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::EmptyCampaignName);
        }
        if self.campaign_by_name(name).is_some() {
            return Err(EngineError::DuplicateCampaign(name.to_string()));
        }
        Ok(name)
    }

    fn get(&self, id: CampaignId) -> Result<&CampaignState, EngineError> {
        self.campaigns
            .get(&id)
            .ok_or(EngineError::UnknownCampaign(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn engine() -> Engine {
        Engine::new(Arc::new(xcom_catalog()))
    }

    #[test]
    fn campaigns_numbered_in_creation_order() {
        let mut engine = engine();
        let first = engine.start_campaign("Gatecrasher").unwrap();
        let second = engine.start_campaign("Lost and Abandoned").unwrap();
        assert_eq!(first, CampaignId(1));
        assert_eq!(second, CampaignId(2));

        let names: Vec<&str> = engine.campaigns().map(CampaignState::name).collect();
        assert_eq!(names, vec!["Gatecrasher", "Lost and Abandoned"]);
        assert_eq!(engine.campaign_by_name("Gatecrasher").unwrap().id(), first);
    }

    #[test]
    fn duplicate_and_empty_names_rejected() {
        let mut engine = engine();
        engine.start_campaign("Gatecrasher").unwrap();
        assert_eq!(
            engine.start_campaign("Gatecrasher"),
            Err(EngineError::DuplicateCampaign("Gatecrasher".to_string()))
        );
        assert_eq!(engine.start_campaign("   "), Err(EngineError::EmptyCampaignName));
        assert_eq!(engine.campaign_count(), 1);
    }

    #[test]
    fn unknown_campaign_rejected() {
        let mut engine = engine();
        let biotech = project(engine.catalog(), "Alien Biotech");
        assert_eq!(
            engine.available_research(CampaignId(9)),
            Err(EngineError::UnknownCampaign(CampaignId(9)))
        );
        assert_eq!(
            engine.advance_research(CampaignId(9), biotech),
            Err(EngineError::UnknownCampaign(CampaignId(9)))
        );
    }

    #[test]
    fn campaigns_progress_independently() {
        let mut engine = engine();
        let a = engine.start_campaign("Gatecrasher").unwrap();
        let b = engine.start_campaign("Operation Blind Spot").unwrap();
        let biotech = project(engine.catalog(), "Alien Biotech");

        engine.advance_research(a, biotech).unwrap();
        assert_eq!(engine.available_research(a).unwrap().len(), 4);
        assert_eq!(engine.available_research(b).unwrap().len(), 5);

        let all = engine.available_research_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].0, a);
        assert_eq!(all[0].1.len(), 4);
        assert_eq!(all[1].1.len(), 5);
    }

    #[test]
    fn progression_errors_pass_through() {
        let mut engine = engine();
        let id = engine.start_campaign("Gatecrasher").unwrap();
        let corpse = item(engine.catalog(), "Sectoid Corpse");
        let err = engine.acquire_item(id, corpse, 0).unwrap_err();
        assert_eq!(
            err,
            EngineError::Progression(ProgressionError::InvalidQuantity(0))
        );
        assert!(engine.inventory(id).unwrap().is_empty());
    }

    #[test]
    fn snapshot_moves_campaign_between_engines() {
        let mut source = engine();
        let id = source.start_campaign("Gatecrasher").unwrap();
        let supplies = item(source.catalog(), "Supplies");
        source.acquire_item(id, supplies, 12).unwrap();
        let bytes = source.snapshot_campaign(id).unwrap();

        let mut target = Engine::new(source.shared_catalog());
        assert_eq!(target.restore_campaign(&bytes).unwrap(), id);
        assert_eq!(target.inventory(id).unwrap(), vec![(supplies, 12)]);

        // Numbering continues after the restored id.
        assert_eq!(target.start_campaign("Second").unwrap(), CampaignId(2));

        assert_eq!(
            target.restore_campaign(&bytes),
            Err(EngineError::DuplicateCampaignId(id))
        );
    }

    #[test]
    fn restore_applies_campaign_name_rules() {
        let mut engine = engine();
        engine.start_campaign("Gatecrasher").unwrap();

        let padded = CampaignState::new(CampaignId(7), "Gatecrasher ");
        let bytes = snapshot::serialize_campaign(&padded).unwrap();
        assert_eq!(
            engine.restore_campaign(&bytes),
            Err(EngineError::DuplicateCampaign("Gatecrasher".to_string()))
        );

        let blank = CampaignState::new(CampaignId(8), "  ");
        let bytes = snapshot::serialize_campaign(&blank).unwrap();
        assert_eq!(
            engine.restore_campaign(&bytes),
            Err(EngineError::EmptyCampaignName)
        );

        let spaced = CampaignState::new(CampaignId(9), "  Lost and Abandoned ");
        let bytes = snapshot::serialize_campaign(&spaced).unwrap();
        assert_eq!(engine.restore_campaign(&bytes), Ok(CampaignId(9)));
        assert_eq!(engine.campaign(CampaignId(9)).unwrap().name(), "Lost and Abandoned");

        let names: Vec<&str> = engine.campaigns().map(CampaignState::name).collect();
        assert_eq!(names, vec!["Gatecrasher", "Lost and Abandoned"]);
    }

    #[test]
    fn requirements_are_campaign_independent() {
        let engine = engine();
        let gauss = project(engine.catalog(), "Gauss Weapons");
        assert_eq!(engine.tech_requirements(gauss).unwrap().len(), 2);
    }
}
