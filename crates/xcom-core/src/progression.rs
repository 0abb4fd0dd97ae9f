//! State-changing campaign actions.
//!
//! Every action validates completely before it mutates: a rejected action
//! leaves the [`CampaignState`] exactly as it was.

use crate::campaign::CampaignState;
use crate::catalog::Catalog;
use crate::eligibility::{Ineligibility, check_eligible};
use crate::id::{ItemId, ProjectId};
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A research project was completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchCompleted {
    pub project: ProjectId,
    /// Items deducted from the inventory, in cost declaration order.
    pub consumed: Vec<(ItemId, u32)>,
}

/// Items were added to the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAcquired {
    pub item: ItemId,
    pub quantity: u32,
    /// Owned quantity after the acquisition.
    pub total: u32,
    /// Hidden projects revealed by this acquisition. Empty when every project
    /// the item triggers was already revealed.
    pub unlocked: Vec<ProjectId>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a campaign action is rejected. None of them change state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressionError {
    #[error("unknown project: {0:?}")]
    UnknownProject(ProjectId),

    #[error("unknown item: {0:?}")]
    UnknownItem(ItemId),

    #[error("project {project:?} is not available: {reason}")]
    Ineligible {
        project: ProjectId,
        reason: Ineligibility,
    },

    #[error(
        "insufficient resources for {project:?}: need {required} of {item:?}, have {available}"
    )]
    InsufficientResources {
        project: ProjectId,
        item: ItemId,
        required: u32,
        available: u32,
    },

    #[error("invalid quantity {0}: must be between 1 and {max}", max = u32::MAX)]
    InvalidQuantity(i64),

    #[error("inventory overflow: holding {held} of {item:?}, cannot add {added}")]
    InventoryOverflow { item: ItemId, held: u32, added: u32 },
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Complete `project` for the campaign, consuming its resource cost.
///
/// Fails if the project is unknown, not currently available, or the
/// inventory cannot cover every cost entry. Costs are one-way: completed
/// research is never refunded.
pub fn advance_research(
    catalog: &Catalog,
    campaign: &mut CampaignState,
    project: ProjectId,
) -> Result<ResearchCompleted, ProgressionError> {
    let def = catalog
        .project(project)
        .ok_or(ProgressionError::UnknownProject(project))?;

    check_eligible(catalog, campaign, project)
        .map_err(|reason| ProgressionError::Ineligible { project, reason })?;

    // Validate every cost before deducting any of them.
    let mut remaining = Vec::with_capacity(def.costs.len());
    for &(item, required) in &def.costs {
        let available = campaign.inventory_of(item);
        let left = available
            .checked_sub(required)
            .ok_or(ProgressionError::InsufficientResources {
                project,
                item,
                required,
                available,
            })?;
        remaining.push((item, left));
    }

    for (item, left) in remaining {
        campaign.set_quantity(item, left);
    }
    campaign.mark_completed(project);

    tracing::debug!(
        campaign = %campaign.name(),
        project = %def.name,
        "research completed"
    );

    Ok(ResearchCompleted {
        project,
        consumed: def.costs.clone(),
    })
}

/// Add `quantity` of `item` to the campaign inventory and reveal every
/// hidden project the item triggers.
///
/// `quantity` must be positive and fit in a `u32`. Revealing is idempotent:
/// acquiring the same item again never reports a project twice.
pub fn acquire_item(
    catalog: &Catalog,
    campaign: &mut CampaignState,
    item: ItemId,
    quantity: i64,
) -> Result<ItemAcquired, ProgressionError> {
    let quantity = u32::try_from(quantity)
        .ok()
        .filter(|q| *q > 0)
        .ok_or(ProgressionError::InvalidQuantity(quantity))?;

    if catalog.item(item).is_none() {
        return Err(ProgressionError::UnknownItem(item));
    }

    let held = campaign.inventory_of(item);
    let total = held
        .checked_add(quantity)
        .ok_or(ProgressionError::InventoryOverflow {
            item,
            held,
            added: quantity,
        })?;

    campaign.set_quantity(item, total);

    let unlocked: Vec<ProjectId> = catalog
        .hidden_unlocked_by(item)
        .iter()
        .copied()
        .filter(|&project| campaign.unlock_hidden(project))
        .collect();

    tracing::debug!(
        campaign = %campaign.name(),
        item = ?item,
        quantity,
        total,
        unlocked = unlocked.len(),
        "item acquired"
    );

    Ok(ItemAcquired {
        item,
        quantity,
        total,
        unlocked,
    })
}

/// Every project that must be completed, directly or transitively, before
/// `project` can be researched. Independent of any campaign.
pub fn tech_requirements(
    catalog: &Catalog,
    project: ProjectId,
) -> Result<&BTreeSet<ProjectId>, ProgressionError> {
    if catalog.project(project).is_none() {
        return Err(ProgressionError::UnknownProject(project));
    }
    Ok(catalog.graph().transitive_closure(project))
}
