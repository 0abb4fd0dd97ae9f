//! XCOM Core -- the research decision engine for XCOM-style campaigns.
//!
//! This crate tracks each campaign's completed research and inventory and
//! answers two kinds of question: which research projects a campaign may
//! start right now, and which projects must be completed, transitively,
//! before a given project unlocks.
//!
//! # Layers
//!
//! 1. **Catalog** -- immutable projects, items, prerequisite edges, resource
//!    costs and hidden-project unlock triggers. Cyclic or dangling data is
//!    rejected at load.
//! 2. **Dependency graph** -- derived from the catalog; direct lookups,
//!    memoized transitive closures and a topological order.
//! 3. **Campaign state** -- completed set, inventory, revealed hidden
//!    projects. Mutated only by progression.
//! 4. **Eligibility** -- the ordered list of startable projects.
//! 5. **Progression** -- advance research (consuming costs) and acquire
//!    items (revealing hidden projects), validated before any mutation.
//!
//! # Key Types
//!
//! - [`catalog::Catalog`] -- Frozen reference data, built via
//!   [`catalog::CatalogBuilder`] or [`catalog::Catalog::load`].
//! - [`graph::DependencyGraph`] -- Prerequisite DAG queries.
//! - [`campaign::CampaignState`] -- Per-campaign state.
//! - [`engine::Engine`] -- Holds a shared catalog and many campaigns.
//! - [`snapshot`] -- Versioned campaign serialization via bitcode.
//!
//! ```rust,ignore
//! let mut engine = Engine::new(Arc::new(catalog));
//! let campaign = engine.start_campaign("Gatecrasher")?;
//! let options = engine.available_research(campaign)?;
//! engine.advance_research(campaign, options[0])?;
//! ```

pub mod campaign;
pub mod catalog;
pub mod eligibility;
pub mod engine;
pub mod graph;
pub mod id;
pub mod progression;
pub mod snapshot;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
