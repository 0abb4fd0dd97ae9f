//! Serde data file structs for catalog content.
//!
//! These structs define the on-disk format for items and research projects.
//! They reference each other by name and are deserialized from RON, JSON, or
//! TOML files, then resolved into a [`xcom_core::catalog::CatalogData`] by
//! the loader.

use serde::Deserialize;

// ===========================================================================
// Items
// ===========================================================================

/// An item definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub name: String,
}

// ===========================================================================
// Research
// ===========================================================================

/// A resource cost entry, supporting both a short tuple form and a full form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CostData {
    /// Short form: `("item_name", quantity)`.
    Short(String, u32),
    Full { item: String, quantity: u32 },
}

impl CostData {
    pub fn item(&self) -> &str {
        match self {
            CostData::Short(item, _) | CostData::Full { item, .. } => item,
        }
    }

    pub fn quantity(&self) -> u32 {
        match self {
            CostData::Short(_, quantity) | CostData::Full { quantity, .. } => *quantity,
        }
    }
}

/// A research project definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ResearchData {
    pub name: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub costs: Vec<CostData>,
    #[serde(default)]
    pub hidden: bool,
    /// Items whose acquisition reveals this project. A hidden project with
    /// no entries here is revealed by the items it costs.
    #[serde(default)]
    pub unlocked_by: Vec<String>,
}

// ===========================================================================
// TOML wrappers (TOML does not support top-level arrays)
// ===========================================================================

/// Wrapper for a list of items in TOML format.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlItems {
    pub items: Vec<ItemData>,
}

/// Wrapper for a list of research projects in TOML format.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlResearch {
    pub research: Vec<ResearchData>,
}
