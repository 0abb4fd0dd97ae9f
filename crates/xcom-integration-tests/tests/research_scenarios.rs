//! Research scenarios exercised through the public campaign API, using both
//! the in-code fixtures and the bundled dataset.

use std::collections::BTreeSet;
use std::sync::Arc;

use xcom_core::campaign::CampaignState;
use xcom_core::eligibility::{Ineligibility, available_research, check_eligible};
use xcom_core::engine::{Engine, EngineError};
use xcom_core::id::{CampaignId, ProjectId};
use xcom_core::progression::{ProgressionError, acquire_item, advance_research, tech_requirements};
use xcom_core::test_utils::*;
use xcom_data::{load_catalog, xcom_data_dir};

fn fresh(name: &str) -> CampaignState {
    CampaignState::new(CampaignId(1), name)
}

#[test]
fn costly_top_level_project_needs_resources() {
    let catalog = flat_catalog(5, 10);
    let mut campaign = fresh("Gatecrasher");

    let available = available_research(&catalog, &campaign);
    assert_eq!(available.len(), 5);

    let first = available[0];
    let supplies = item(&catalog, "Supplies");
    let before = campaign.clone();
    assert_eq!(
        advance_research(&catalog, &mut campaign, first),
        Err(ProgressionError::InsufficientResources {
            project: first,
            item: supplies,
            required: 10,
            available: 0,
        })
    );
    assert_eq!(campaign, before);

    acquire_item(&catalog, &mut campaign, supplies, 15).unwrap();
    advance_research(&catalog, &mut campaign, first).unwrap();
    assert_eq!(campaign.inventory_of(supplies), 5);
    assert_eq!(available_research(&catalog, &campaign).len(), 4);
}

#[test]
fn hidden_autopsy_needs_its_corpse() {
    let catalog = xcom_catalog();
    let mut campaign = fresh("Gatecrasher");
    let biotech = project(&catalog, "Alien Biotech");
    let autopsy = project(&catalog, "Sectoid Autopsy");
    let corpse = item(&catalog, "Sectoid Corpse");

    advance_research(&catalog, &mut campaign, biotech).unwrap();
    assert_eq!(
        check_eligible(&catalog, &campaign, autopsy),
        Err(Ineligibility::Hidden)
    );
    assert!(matches!(
        advance_research(&catalog, &mut campaign, autopsy),
        Err(ProgressionError::Ineligible {
            reason: Ineligibility::Hidden,
            ..
        })
    ));

    let acquired = acquire_item(&catalog, &mut campaign, corpse, 1).unwrap();
    assert_eq!(acquired.unlocked, vec![autopsy]);
    assert!(available_research(&catalog, &campaign).contains(&autopsy));
}

#[test]
fn free_project_completes_and_feeds_dependents() {
    let catalog = xcom_catalog();
    let mut campaign = fresh("Gatecrasher");
    let biotech = project(&catalog, "Alien Biotech");

    advance_research(&catalog, &mut campaign, biotech).unwrap();
    assert!(!available_research(&catalog, &campaign).contains(&biotech));
    assert_eq!(
        advance_research(&catalog, &mut campaign, biotech),
        Err(ProgressionError::Ineligible {
            project: biotech,
            reason: Ineligibility::AlreadyCompleted,
        })
    );

    for (dependent, def) in catalog.all_projects() {
        if def.prerequisites.contains(&biotech) {
            assert!(tech_requirements(&catalog, dependent).unwrap().contains(&biotech));
        }
    }
    let psionics = project(&catalog, "Psionics");
    assert!(tech_requirements(&catalog, psionics).unwrap().contains(&biotech));
}

#[test]
fn zero_quantity_is_rejected_without_change() {
    let catalog = load_catalog(&xcom_data_dir()).unwrap();
    let mut campaign = fresh("Gatecrasher");
    let corpse = item(&catalog, "Sectoid Corpse");

    for quantity in [0, -3] {
        assert_eq!(
            acquire_item(&catalog, &mut campaign, corpse, quantity),
            Err(ProgressionError::InvalidQuantity(quantity))
        );
    }
    assert!(campaign.inventory().next().is_none());
    assert!(campaign.unlocked_hidden().is_empty());
}

#[test]
fn diamond_requirements() {
    let catalog = diamond_catalog();
    let a = project(&catalog, "A");
    let expected: BTreeSet<ProjectId> = ["B", "C", "D"]
        .into_iter()
        .map(|name| project(&catalog, name))
        .collect();
    assert_eq!(tech_requirements(&catalog, a).unwrap(), &expected);
    assert!(tech_requirements(&catalog, project(&catalog, "D")).unwrap().is_empty());

    // A becomes available only once both branches are done.
    let mut campaign = fresh("Diamond");
    for name in ["D", "B"] {
        advance_research(&catalog, &mut campaign, project(&catalog, name)).unwrap();
    }
    assert_eq!(
        check_eligible(&catalog, &campaign, a),
        Err(Ineligibility::MissingPrerequisite(project(&catalog, "C")))
    );
    advance_research(&catalog, &mut campaign, project(&catalog, "C")).unwrap();
    assert_eq!(available_research(&catalog, &campaign), vec![a]);
}

#[test]
fn unknown_ids_are_reported() {
    let catalog = load_catalog(&xcom_data_dir()).unwrap();
    let mut engine = Engine::new(Arc::new(catalog));
    let id = engine.start_campaign("Gatecrasher").unwrap();
    let missing = ProjectId(9_999);

    assert_eq!(
        engine.advance_research(id, missing),
        Err(EngineError::Progression(ProgressionError::UnknownProject(missing)))
    );
    assert_eq!(
        engine.tech_requirements(missing),
        Err(EngineError::Progression(ProgressionError::UnknownProject(missing)))
    );
}

#[test]
fn availability_is_stable_across_campaigns() {
    let catalog = Arc::new(load_catalog(&xcom_data_dir()).unwrap());
    let mut engine = Engine::new(Arc::clone(&catalog));
    let a = engine.start_campaign("Gatecrasher").unwrap();
    let b = engine.start_campaign("Lost and Abandoned").unwrap();

    let first = engine.available_research(a).unwrap();
    assert_eq!(first, engine.available_research(a).unwrap());
    assert_eq!(first, engine.available_research(b).unwrap());

    let ordered: Vec<ProjectId> = catalog
        .all_projects()
        .map(|(id, _)| id)
        .filter(|id| first.contains(id))
        .collect();
    assert_eq!(first, ordered);
}
