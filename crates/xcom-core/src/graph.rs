use crate::id::ProjectId;
use std::collections::{BTreeSet, VecDeque};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur while building the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("cycle detected in prerequisite graph involving {involved:?}")]
    CycleDetected { involved: Vec<ProjectId> },
    #[error("project not found: {0:?}")]
    ProjectNotFound(ProjectId),
    #[error("project {0:?} lists itself as a prerequisite")]
    SelfPrerequisite(ProjectId),
}

static EMPTY_CLOSURE: BTreeSet<ProjectId> = BTreeSet::new();

// ---------------------------------------------------------------------------
// DependencyGraph
// ---------------------------------------------------------------------------

/// Read-only view over the catalog's prerequisite edges.
///
/// An edge `(source, target)` means "source requires target to be completed
/// first". The graph is validated acyclic at construction and never mutated
/// afterwards, so transitive closures are memoized per project on first use.
/// Shared readers on different threads may query it concurrently.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Direct prerequisites per project, in declaration order.
    prerequisites: Vec<Vec<ProjectId>>,
    /// Direct dependents per project (reverse edges), in catalog order.
    dependents: Vec<Vec<ProjectId>>,
    /// Prerequisites always precede their dependents.
    topo_order: Vec<ProjectId>,
    /// Lazily computed ancestor sets.
    closures: Vec<OnceLock<BTreeSet<ProjectId>>>,
    edge_count: usize,
}

impl DependencyGraph {
    /// Build the graph over `project_count` projects from `(source, target)`
    /// prerequisite edges. Duplicate edges are collapsed.
    ///
    /// Fails if an edge references a project outside `0..project_count`, if
    /// a project requires itself, or if the edges contain a cycle.
    pub fn build(
        project_count: usize,
        edges: &[(ProjectId, ProjectId)],
    ) -> Result<Self, GraphError> {
        let mut prerequisites: Vec<Vec<ProjectId>> = vec![Vec::new(); project_count];
        let mut dependents: Vec<Vec<ProjectId>> = vec![Vec::new(); project_count];
        let mut edge_count = 0;

        for &(source, target) in edges {
            if source.index() >= project_count {
                return Err(GraphError::ProjectNotFound(source));
            }
            if target.index() >= project_count {
                return Err(GraphError::ProjectNotFound(target));
            }
            if source == target {
                return Err(GraphError::SelfPrerequisite(source));
            }
            let prereqs = &mut prerequisites[source.index()];
            if prereqs.contains(&target) {
                continue;
            }
            prereqs.push(target);
            dependents[target.index()].push(source);
            edge_count += 1;
        }

        for list in &mut dependents {
            list.sort();
        }

        let topo_order = topological_order(&prerequisites, &dependents)?;
        let closures = (0..project_count).map(|_| OnceLock::new()).collect();

        Ok(Self {
            prerequisites,
            dependents,
            topo_order,
            closures,
            edge_count,
        })
    }

    /// Number of projects (nodes) in the graph.
    pub fn project_count(&self) -> usize {
        self.prerequisites.len()
    }

    /// Number of distinct prerequisite edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn contains(&self, project: ProjectId) -> bool {
        project.index() < self.prerequisites.len()
    }

    /// Projects that must be completed directly before `project` can start.
    /// Returns an empty slice for unknown projects.
    pub fn direct_prerequisites(&self, project: ProjectId) -> &[ProjectId] {
        self.prerequisites
            .get(project.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Projects that list `project` as a direct prerequisite.
    pub fn dependents(&self, project: ProjectId) -> &[ProjectId] {
        self.dependents
            .get(project.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every project reachable by following prerequisite edges from
    /// `project`, excluding `project` itself. A project required through
    /// several paths appears once. Returns an empty set for unknown projects.
    ///
    /// O(V+E) on first call for a project, O(1) afterwards.
    pub fn transitive_closure(&self, project: ProjectId) -> &BTreeSet<ProjectId> {
        match self.closures.get(project.index()) {
            Some(cell) => cell.get_or_init(|| self.compute_closure(project)),
            None => &EMPTY_CLOSURE,
        }
    }

    /// Whether `project` transitively requires `other`.
    pub fn requires(&self, project: ProjectId, other: ProjectId) -> bool {
        self.transitive_closure(project).contains(&other)
    }

    /// All projects ordered so that every prerequisite precedes its
    /// dependents. Deterministic for a given catalog.
    pub fn topological_order(&self) -> &[ProjectId] {
        &self.topo_order
    }

    /// Depth-first walk over prerequisite edges with a visited set. Closures
    /// already memoized for intermediate nodes are merged without descending.
    fn compute_closure(&self, project: ProjectId) -> BTreeSet<ProjectId> {
        let mut visited = BTreeSet::new();
        let mut stack: Vec<ProjectId> = self.direct_prerequisites(project).to_vec();

        while let Some(next) = stack.pop() {
            if !visited.insert(next) {
                continue;
            }
            if let Some(known) = self.closures.get(next.index()).and_then(OnceLock::get) {
                visited.extend(known.iter().copied());
                continue;
            }
            stack.extend(
                self.direct_prerequisites(next)
                    .iter()
                    .copied()
                    .filter(|p| !visited.contains(p)),
            );
        }

        visited
    }
}

/// Kahn's algorithm over the prerequisite edges. Projects left over once the
/// queue drains are on (or downstream of) a cycle.
fn topological_order(
    prerequisites: &[Vec<ProjectId>],
    dependents: &[Vec<ProjectId>],
) -> Result<Vec<ProjectId>, GraphError> {
    let mut in_degree: Vec<usize> = prerequisites.iter().map(Vec::len).collect();

    let mut queue: VecDeque<ProjectId> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, deg)| **deg == 0)
        .map(|(i, _)| ProjectId(i as u32))
        .collect();

    let mut order = Vec::with_capacity(prerequisites.len());

    while let Some(project) = queue.pop_front() {
        order.push(project);
        for &dependent in &dependents[project.index()] {
            let deg = &mut in_degree[dependent.index()];
            *deg -= 1;
            if *deg == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if order.len() != prerequisites.len() {
        let involved = in_degree
            .iter()
            .enumerate()
            .filter(|(_, deg)| **deg > 0)
            .map(|(i, _)| ProjectId(i as u32))
            .collect();
        return Err(GraphError::CycleDetected { involved });
    }

    Ok(order)
}
