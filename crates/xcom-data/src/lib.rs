//! Data-driven catalog loading for the XCOM research engine.
//!
//! Items and research projects are described in RON, JSON, or TOML files
//! that reference each other by name. [`load_catalog`] reads a directory
//! containing `items.*` and `research.*`, resolves the names, and builds a
//! validated [`xcom_core::catalog::Catalog`].
//!
//! The XCOM 2 dataset bundled with this crate lives under [`xcom_data_dir`].

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, load_catalog, load_catalog_data, xcom_data_dir};
