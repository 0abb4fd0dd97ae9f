//! Immutable reference data: research projects, items, and the static
//! relationships between them.
//!
//! A [`Catalog`] is assembled through a [`CatalogBuilder`] (registration, then
//! validation in [`CatalogBuilder::build`]) or bulk-loaded from a
//! [`CatalogData`] record set with [`Catalog::load`]. Once built it is never
//! mutated and may be shared freely between threads.

use crate::graph::{DependencyGraph, GraphError};
use crate::id::{ItemId, ProjectId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// An item definition in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDef {
    pub name: String,
}

/// A research project definition in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDef {
    pub name: String,
    /// Projects that must be completed first, in declaration order.
    pub prerequisites: Vec<ProjectId>,
    /// Items consumed when the project is completed. Quantities are positive.
    pub costs: Vec<(ItemId, u32)>,
    /// Hidden projects are not offered until one of `unlock_triggers` has
    /// been acquired by the campaign.
    pub hidden: bool,
    pub unlock_triggers: Vec<ItemId>,
}

impl ProjectDef {
    /// Required quantity of `item`, or 0 if the project does not cost it.
    pub fn cost_of(&self, item: ItemId) -> u32 {
        self.costs
            .iter()
            .find(|(cost_item, _)| *cost_item == item)
            .map(|(_, qty)| *qty)
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Validation failures while building a catalog. All are fatal at load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("empty name for {kind}")]
    EmptyName { kind: &'static str },
    #[error("duplicate project name: {0}")]
    DuplicateProjectName(String),
    #[error("duplicate item name: {0}")]
    DuplicateItemName(String),
    #[error("project records must be numbered in load order: expected {expected:?}, found {found:?}")]
    NonSequentialProjectId { expected: ProjectId, found: ProjectId },
    #[error("item records must be numbered in load order: expected {expected:?}, found {found:?}")]
    NonSequentialItemId { expected: ItemId, found: ItemId },
    #[error("unknown project reference: {0:?}")]
    UnknownProject(ProjectId),
    #[error("unknown item reference: {0:?}")]
    UnknownItem(ItemId),
    #[error("project {project:?} has a zero cost for item {item:?}")]
    ZeroCost { project: ProjectId, item: ItemId },
    #[error("project {project:?} lists item {item:?} as a cost more than once")]
    DuplicateCost { project: ProjectId, item: ItemId },
    #[error("invalid prerequisite graph: {0}")]
    Graph(#[from] GraphError),
}

// ---------------------------------------------------------------------------
// Bulk-load records
// ---------------------------------------------------------------------------

/// An item row as produced by an external store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub name: String,
}

/// A research project row as produced by an external store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub hidden: bool,
}

/// `project` requires `requires` to be completed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisiteEdge {
    pub project: ProjectId,
    pub requires: ProjectId,
}

/// `project` consumes `quantity` of `item` on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEdge {
    pub project: ProjectId,
    pub item: ItemId,
    pub quantity: u32,
}

/// Acquiring `item` reveals the hidden `project`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockTriggerEdge {
    pub project: ProjectId,
    pub item: ItemId,
}

/// The one-time bulk load that reconstructs a catalog. Record ids must be
/// numbered `0..n` in load order; edges reference those ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub items: Vec<ItemRecord>,
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
    #[serde(default)]
    pub prerequisites: Vec<PrerequisiteEdge>,
    #[serde(default)]
    pub costs: Vec<CostEdge>,
    #[serde(default)]
    pub unlock_triggers: Vec<UnlockTriggerEdge>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct PendingProject {
    name: String,
    hidden: bool,
}

/// Builder for constructing an immutable [`Catalog`].
///
/// Entities are registered first; relationships may reference any id and
/// are checked when [`build`](Self::build) runs.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    items: Vec<ItemDef>,
    item_name_to_id: HashMap<String, ItemId>,
    projects: Vec<PendingProject>,
    project_name_to_id: HashMap<String, ProjectId>,
    prerequisite_edges: Vec<(ProjectId, ProjectId)>,
    cost_edges: Vec<(ProjectId, ItemId, u32)>,
    unlock_edges: Vec<(ProjectId, ItemId)>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item. Returns its ID.
    pub fn register_item(&mut self, name: &str) -> Result<ItemId, CatalogError> {
        if name.trim().is_empty() {
            return Err(CatalogError::EmptyName { kind: "item" });
        }
        if self.item_name_to_id.contains_key(name) {
            return Err(CatalogError::DuplicateItemName(name.to_string()));
        }
        let id = ItemId(self.items.len() as u32);
        self.items.push(ItemDef {
            name: name.to_string(),
        });
        self.item_name_to_id.insert(name.to_string(), id);
        Ok(id)
    }

    /// Register a research project. Returns its ID.
    pub fn register_project(&mut self, name: &str, hidden: bool) -> Result<ProjectId, CatalogError> {
        if name.trim().is_empty() {
            return Err(CatalogError::EmptyName { kind: "project" });
        }
        if self.project_name_to_id.contains_key(name) {
            return Err(CatalogError::DuplicateProjectName(name.to_string()));
        }
        let id = ProjectId(self.projects.len() as u32);
        self.projects.push(PendingProject {
            name: name.to_string(),
            hidden,
        });
        self.project_name_to_id.insert(name.to_string(), id);
        Ok(id)
    }

    /// Declare that `project` requires `requires` to be completed first.
    pub fn add_prerequisite(&mut self, project: ProjectId, requires: ProjectId) -> &mut Self {
        self.prerequisite_edges.push((project, requires));
        self
    }

    /// Declare that completing `project` consumes `quantity` of `item`.
    pub fn add_cost(&mut self, project: ProjectId, item: ItemId, quantity: u32) -> &mut Self {
        self.cost_edges.push((project, item, quantity));
        self
    }

    /// Declare that acquiring `item` reveals the hidden `project`.
    pub fn add_unlock_trigger(&mut self, project: ProjectId, item: ItemId) -> &mut Self {
        self.unlock_edges.push((project, item));
        self
    }

    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.item_name_to_id.get(name).copied()
    }

    pub fn project_id(&self, name: &str) -> Option<ProjectId> {
        self.project_name_to_id.get(name).copied()
    }

    /// Validate every relationship and freeze the catalog.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let project_count = self.projects.len();
        let item_count = self.items.len();
        let check_project = |id: ProjectId| {
            if id.index() < project_count {
                Ok(())
            } else {
                Err(CatalogError::UnknownProject(id))
            }
        };
        let check_item = |id: ItemId| {
            if id.index() < item_count {
                Ok(())
            } else {
                Err(CatalogError::UnknownItem(id))
            }
        };

        for &(project, requires) in &self.prerequisite_edges {
            check_project(project)?;
            check_project(requires)?;
        }

        let mut costs: Vec<Vec<(ItemId, u32)>> = vec![Vec::new(); project_count];
        for &(project, item, quantity) in &self.cost_edges {
            check_project(project)?;
            check_item(item)?;
            if quantity == 0 {
                return Err(CatalogError::ZeroCost { project, item });
            }
            let entry = &mut costs[project.index()];
            if entry.iter().any(|(existing, _)| *existing == item) {
                return Err(CatalogError::DuplicateCost { project, item });
            }
            entry.push((item, quantity));
        }

        let mut triggers: Vec<Vec<ItemId>> = vec![Vec::new(); project_count];
        let mut hidden_by_trigger: Vec<Vec<ProjectId>> = vec![Vec::new(); item_count];
        for &(project, item) in &self.unlock_edges {
            check_project(project)?;
            check_item(item)?;
            let entry = &mut triggers[project.index()];
            if !entry.contains(&item) {
                entry.push(item);
            }
        }

        let graph = DependencyGraph::build(project_count, &self.prerequisite_edges)?;

        let projects: Vec<ProjectDef> = self
            .projects
            .into_iter()
            .zip(costs.into_iter().zip(triggers))
            .enumerate()
            .map(|(index, (pending, (costs, unlock_triggers)))| {
                let id = ProjectId(index as u32);
                if pending.hidden {
                    if unlock_triggers.is_empty() {
                        tracing::warn!(
                            project = %pending.name,
                            "hidden project has no unlock trigger and can never become available"
                        );
                    }
                    for item in &unlock_triggers {
                        hidden_by_trigger[item.index()].push(id);
                    }
                } else if !unlock_triggers.is_empty() {
                    tracing::debug!(
                        project = %pending.name,
                        "unlock triggers on a visible project are ignored"
                    );
                }
                ProjectDef {
                    name: pending.name,
                    prerequisites: graph.direct_prerequisites(id).to_vec(),
                    costs,
                    hidden: pending.hidden,
                    unlock_triggers,
                }
            })
            .collect();

        tracing::info!(
            projects = projects.len(),
            items = self.items.len(),
            prerequisites = graph.edge_count(),
            "catalog loaded"
        );

        Ok(Catalog {
            items: self.items,
            item_name_to_id: self.item_name_to_id,
            projects,
            project_name_to_id: self.project_name_to_id,
            graph,
            hidden_by_trigger,
        })
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Immutable catalog. Frozen after build. Thread-safe to share.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<ItemDef>,
    item_name_to_id: HashMap<String, ItemId>,
    projects: Vec<ProjectDef>,
    project_name_to_id: HashMap<String, ProjectId>,
    graph: DependencyGraph,
    /// Hidden projects revealed by each item, in catalog order.
    hidden_by_trigger: Vec<Vec<ProjectId>>,
}

impl Catalog {
    /// Build a catalog from a bulk-loaded record set.
    pub fn load(data: CatalogData) -> Result<Self, CatalogError> {
        let mut builder = CatalogBuilder::new();

        for (index, record) in data.items.iter().enumerate() {
            let expected = ItemId(index as u32);
            if record.id != expected {
                return Err(CatalogError::NonSequentialItemId {
                    expected,
                    found: record.id,
                });
            }
            builder.register_item(&record.name)?;
        }

        for (index, record) in data.projects.iter().enumerate() {
            let expected = ProjectId(index as u32);
            if record.id != expected {
                return Err(CatalogError::NonSequentialProjectId {
                    expected,
                    found: record.id,
                });
            }
            builder.register_project(&record.name, record.hidden)?;
        }

        for edge in &data.prerequisites {
            builder.add_prerequisite(edge.project, edge.requires);
        }
        for edge in &data.costs {
            builder.add_cost(edge.project, edge.item, edge.quantity);
        }
        for edge in &data.unlock_triggers {
            builder.add_unlock_trigger(edge.project, edge.item);
        }

        builder.build()
    }

    /// Export the catalog in the bulk-load shape accepted by [`load`](Self::load).
    pub fn to_data(&self) -> CatalogData {
        let mut data = CatalogData {
            items: self
                .all_items()
                .map(|(id, def)| ItemRecord {
                    id,
                    name: def.name.clone(),
                })
                .collect(),
            ..CatalogData::default()
        };

        for (id, def) in self.all_projects() {
            data.projects.push(ProjectRecord {
                id,
                name: def.name.clone(),
                hidden: def.hidden,
            });
            data.prerequisites
                .extend(def.prerequisites.iter().map(|&requires| PrerequisiteEdge {
                    project: id,
                    requires,
                }));
            data.costs
                .extend(def.costs.iter().map(|&(item, quantity)| CostEdge {
                    project: id,
                    item,
                    quantity,
                }));
            data.unlock_triggers
                .extend(def.unlock_triggers.iter().map(|&item| UnlockTriggerEdge {
                    project: id,
                    item,
                }));
        }

        data
    }

    pub fn project(&self, id: ProjectId) -> Option<&ProjectDef> {
        self.projects.get(id.index())
    }

    pub fn item(&self, id: ItemId) -> Option<&ItemDef> {
        self.items.get(id.index())
    }

    pub fn project_id(&self, name: &str) -> Option<ProjectId> {
        self.project_name_to_id.get(name).copied()
    }

    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.item_name_to_id.get(name).copied()
    }

    pub fn project_name(&self, id: ProjectId) -> Option<&str> {
        self.project(id).map(|def| def.name.as_str())
    }

    pub fn item_name(&self, id: ItemId) -> Option<&str> {
        self.item(id).map(|def| def.name.as_str())
    }

    /// All projects in load order. Repeated calls yield the same sequence.
    pub fn all_projects(&self) -> impl ExactSizeIterator<Item = (ProjectId, &ProjectDef)> {
        self.projects
            .iter()
            .enumerate()
            .map(|(i, def)| (ProjectId(i as u32), def))
    }

    /// All items in load order. Repeated calls yield the same sequence.
    pub fn all_items(&self) -> impl ExactSizeIterator<Item = (ItemId, &ItemDef)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, def)| (ItemId(i as u32), def))
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// The prerequisite graph derived from this catalog.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Hidden projects revealed by acquiring `item`, in catalog order.
    pub fn hidden_unlocked_by(&self, item: ItemId) -> &[ProjectId] {
        self.hidden_by_trigger
            .get(item.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
