//! Which research projects a campaign may start.
//!
//! A project is available when it is not yet completed, every direct
//! prerequisite is completed, and it is either visible or has been revealed
//! for the campaign. Resource costs are not considered here; they are only
//! checked when research is advanced.

use crate::campaign::CampaignState;
use crate::catalog::Catalog;
use crate::id::ProjectId;

/// Why a project is not currently available to a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    /// The project id does not exist in the catalog.
    NotInCatalog,
    AlreadyCompleted,
    /// The first direct prerequisite (in declaration order) not yet completed.
    MissingPrerequisite(ProjectId),
    /// Hidden and not yet revealed by acquiring a trigger item.
    Hidden,
}

impl std::fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ineligibility::NotInCatalog => write!(f, "not in catalog"),
            Ineligibility::AlreadyCompleted => write!(f, "already completed"),
            Ineligibility::MissingPrerequisite(p) => write!(f, "requires {p:?}"),
            Ineligibility::Hidden => write!(f, "not yet revealed"),
        }
    }
}

/// Check whether `project` is available, reporting the first failing rule.
pub fn check_eligible(
    catalog: &Catalog,
    campaign: &CampaignState,
    project: ProjectId,
) -> Result<(), Ineligibility> {
    let def = catalog.project(project).ok_or(Ineligibility::NotInCatalog)?;

    if campaign.is_completed(project) {
        return Err(Ineligibility::AlreadyCompleted);
    }

    // Direct prerequisites suffice: each completed prerequisite had its own
    // prerequisites completed when it was researched.
    if let Some(missing) = catalog
        .graph()
        .direct_prerequisites(project)
        .iter()
        .find(|prereq| !campaign.is_completed(**prereq))
    {
        return Err(Ineligibility::MissingPrerequisite(*missing));
    }

    if def.hidden && !campaign.is_unlocked(project) {
        return Err(Ineligibility::Hidden);
    }

    Ok(())
}

pub fn is_available(catalog: &Catalog, campaign: &CampaignState, project: ProjectId) -> bool {
    check_eligible(catalog, campaign, project).is_ok()
}

/// Every project the campaign may start, in catalog order. Identical state
/// always yields the identical sequence, so callers may address entries by
/// position.
pub fn available_research(catalog: &Catalog, campaign: &CampaignState) -> Vec<ProjectId> {
    catalog
        .all_projects()
        .map(|(id, _)| id)
        .filter(|&id| is_available(catalog, campaign, id))
        .collect()
}
