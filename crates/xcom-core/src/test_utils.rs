//! Shared test helpers for unit tests, integration tests and examples.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available to other crates via the `test-utils` feature.

use crate::catalog::{Catalog, CatalogBuilder};
use crate::id::{ItemId, ProjectId};

// ===========================================================================
// Name lookups
// ===========================================================================

/// Look up a project by name. Panics if the fixture does not define it.
pub fn project(catalog: &Catalog, name: &str) -> ProjectId {
    catalog
        .project_id(name)
        .unwrap_or_else(|| panic!("fixture has no project named {name:?}"))
}

/// Look up an item by name. Panics if the fixture does not define it.
pub fn item(catalog: &Catalog, name: &str) -> ItemId {
    catalog
        .item_id(name)
        .unwrap_or_else(|| panic!("fixture has no item named {name:?}"))
}

/// Resolve project ids back to names, preserving order.
pub fn project_names(catalog: &Catalog, ids: impl IntoIterator<Item = ProjectId>) -> Vec<String> {
    ids.into_iter()
        .map(|id| catalog.project_name(id).unwrap_or("<unknown>").to_string())
        .collect()
}

// ===========================================================================
// XCOM fixture
// ===========================================================================

pub const XCOM_ITEMS: &[&str] = &[
    "Supplies",
    "Elerium Crystal",
    "Alien Alloy",
    "Elerium Core",
    "Sectoid Corpse",
    "ADVENT Officer Corpse",
    "ADVENT Trooper Corpse",
    "Viper Corpse",
    "Muton Corpse",
    "ADVENT MEC Wreck",
];

/// (name, hidden, prerequisites, costs, unlock triggers)
type ProjectRow = (
    &'static str,
    bool,
    &'static [&'static str],
    &'static [(&'static str, u32)],
    &'static [&'static str],
);

pub const XCOM_PROJECTS: &[ProjectRow] = &[
    ("Modular Weapons", false, &[], &[], &[]),
    ("Alien Biotech", false, &[], &[], &[]),
    ("Resistance Communications", false, &[], &[("Supplies", 25)], &[]),
    ("Hybrid Materials", false, &[], &[("Alien Alloy", 5)], &[]),
    ("Alien Encryption", false, &[], &[], &[]),
    (
        "Magnetic Weapons",
        false,
        &["Modular Weapons"],
        &[("Supplies", 50), ("Alien Alloy", 10)],
        &[],
    ),
    (
        "Gauss Weapons",
        false,
        &["Magnetic Weapons"],
        &[("Supplies", 75), ("Elerium Crystal", 10), ("Alien Alloy", 15)],
        &[],
    ),
    ("Elerium", false, &["Hybrid Materials"], &[("Elerium Crystal", 5)], &[]),
    (
        "Plasma Rifle",
        false,
        &["Gauss Weapons", "Elerium"],
        &[("Elerium Core", 1), ("Elerium Crystal", 20)],
        &[],
    ),
    (
        "Sectoid Autopsy",
        true,
        &["Alien Biotech"],
        &[("Sectoid Corpse", 1)],
        &["Sectoid Corpse"],
    ),
    (
        "ADVENT Trooper Autopsy",
        true,
        &["Alien Biotech"],
        &[("ADVENT Trooper Corpse", 1)],
        &["ADVENT Trooper Corpse"],
    ),
    (
        "ADVENT Officer Autopsy",
        true,
        &["Alien Biotech"],
        &[("ADVENT Officer Corpse", 1)],
        &["ADVENT Officer Corpse"],
    ),
    (
        "Viper Autopsy",
        true,
        &["Alien Biotech"],
        &[("Viper Corpse", 1)],
        &["Viper Corpse"],
    ),
    (
        "Muton Autopsy",
        true,
        &["Alien Biotech"],
        &[("Muton Corpse", 1)],
        &["Muton Corpse"],
    ),
    (
        "ADVENT Robotics",
        true,
        &["Modular Weapons"],
        &[("ADVENT MEC Wreck", 1)],
        &["ADVENT MEC Wreck"],
    ),
    ("Psionics", false, &["Sectoid Autopsy"], &[("Supplies", 100)], &[]),
    ("Plated Armor", false, &["Hybrid Materials"], &[("Alien Alloy", 10)], &[]),
    (
        "Powered Armor",
        false,
        &["Plated Armor", "Elerium"],
        &[("Alien Alloy", 20), ("Elerium Crystal", 10)],
        &[],
    ),
];

/// A small XCOM 2 research catalog. Five projects are available to a fresh
/// campaign; autopsies are hidden until the matching corpse is acquired.
pub fn xcom_catalog() -> Catalog {
    let mut b = CatalogBuilder::new();
    for name in XCOM_ITEMS {
        b.register_item(name).unwrap();
    }
    for (name, hidden, ..) in XCOM_PROJECTS {
        b.register_project(name, *hidden).unwrap();
    }
    for (name, _, prereqs, costs, triggers) in XCOM_PROJECTS {
        let id = b.project_id(name).unwrap();
        for prereq in *prereqs {
            let prereq = b.project_id(prereq).unwrap();
            b.add_prerequisite(id, prereq);
        }
        for (cost_item, qty) in *costs {
            let cost_item = b.item_id(cost_item).unwrap();
            b.add_cost(id, cost_item, *qty);
        }
        for trigger in *triggers {
            let trigger = b.item_id(trigger).unwrap();
            b.add_unlock_trigger(id, trigger);
        }
    }
    b.build().unwrap()
}

// ===========================================================================
// Synthetic shapes
// ===========================================================================

/// Four projects A, B, C, D: A requires B and C; B and C both require D.
/// No costs, nothing hidden.
pub fn diamond_catalog() -> Catalog {
    let mut b = CatalogBuilder::new();
    let a = b.register_project("A", false).unwrap();
    let pb = b.register_project("B", false).unwrap();
    let c = b.register_project("C", false).unwrap();
    let d = b.register_project("D", false).unwrap();
    b.add_prerequisite(a, pb)
        .add_prerequisite(a, c)
        .add_prerequisite(pb, d)
        .add_prerequisite(c, d);
    b.build().unwrap()
}

/// `count` top-level projects named `Project N`, each costing `cost` of a
/// single item named `Supplies` (no cost entry when `cost` is 0).
pub fn flat_catalog(count: u32, cost: u32) -> Catalog {
    let mut b = CatalogBuilder::new();
    let supplies = b.register_item("Supplies").unwrap();
    for i in 0..count {
        let id = b.register_project(&format!("Project {i}"), false).unwrap();
        if cost > 0 {
            b.add_cost(id, supplies, cost);
        }
    }
    b.build().unwrap()
}
