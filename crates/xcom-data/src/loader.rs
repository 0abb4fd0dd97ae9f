//! Turns a directory of data files into a validated [`Catalog`].
//!
//! A catalog directory holds exactly one `items` file and one `research`
//! file, each in RON, JSON, or TOML. Entries refer to each other by name;
//! the loader assigns ids in file order, resolves every name, and hands the
//! resulting [`CatalogData`] to [`Catalog::load`] for graph validation.

use crate::schema::{ItemData, ResearchData, TomlItems, TomlResearch};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use xcom_core::catalog::{
    Catalog, CatalogData, CatalogError, CostEdge, ItemRecord, PrerequisiteEdge, ProjectRecord,
    UnlockTriggerEdge,
};
use xcom_core::id::{ItemId, ProjectId};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("no {file} file (.ron, .json or .toml) in {}", .dir.display())]
    MissingFile { file: DataFile, dir: PathBuf },

    #[error("{} is not a RON, JSON or TOML file", .path.display())]
    UnsupportedFormat { path: PathBuf },

    /// More than one format present for the same data file.
    #[error("ambiguous data file, found {paths:?}")]
    AmbiguousFormat { paths: Vec<PathBuf> },

    #[error("cannot parse {}: {detail}", .path.display())]
    Parse { path: PathBuf, detail: String },

    #[error("{} references unknown {kind} \"{name}\"", .path.display())]
    UnresolvedName {
        path: PathBuf,
        kind: &'static str,
        name: String,
    },

    #[error("{} defines {kind} \"{name}\" twice", .path.display())]
    DuplicateName {
        path: PathBuf,
        kind: &'static str,
        name: String,
    },

    /// Names resolved, but the catalog itself is invalid (cycle, zero cost).
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Files and formats
// ---------------------------------------------------------------------------

/// The data files that make up a catalog directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFile {
    Items,
    Research,
}

impl DataFile {
    /// File name without extension.
    pub fn base_name(self) -> &'static str {
        match self {
            DataFile::Items => "items",
            DataFile::Research => "research",
        }
    }
}

impl fmt::Display for DataFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Json,
    Toml,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Ron, Format::Json, Format::Toml];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Ron => "ron",
            Format::Json => "json",
            Format::Toml => "toml",
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, DataLoadError> {
        let ext = path.extension().and_then(|e| e.to_str());
        Self::ALL
            .into_iter()
            .find(|format| Some(format.extension()) == ext)
            .ok_or_else(|| DataLoadError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
    }
}

/// Find `file` in `dir`. Exactly one format must be present.
pub fn locate(dir: &Path, file: DataFile) -> Result<PathBuf, DataLoadError> {
    let mut present: Vec<PathBuf> = Format::ALL
        .into_iter()
        .map(|format| dir.join(format!("{}.{}", file.base_name(), format.extension())))
        .filter(|path| path.is_file())
        .collect();

    match present.len() {
        0 => Err(DataLoadError::MissingFile {
            file,
            dir: dir.to_path_buf(),
        }),
        1 => Ok(present.swap_remove(0)),
        _ => Err(DataLoadError::AmbiguousFormat { paths: present }),
    }
}

/// Read a list of entries from `path`. TOML has no top-level arrays, so TOML
/// files are read as the wrapper `W` and unwrapped with `from_table`.
pub fn read_list<T, W>(
    path: &Path,
    from_table: impl FnOnce(W) -> Vec<T>,
) -> Result<Vec<T>, DataLoadError>
where
    T: DeserializeOwned,
    W: DeserializeOwned,
{
    let text = std::fs::read_to_string(path)?;
    let parse_error = |detail: String| DataLoadError::Parse {
        path: path.to_path_buf(),
        detail,
    };

    match Format::from_path(path)? {
        Format::Ron => ron::from_str(&text).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(&text).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str::<W>(&text)
            .map(from_table)
            .map_err(|e| parse_error(e.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Name resolution
// ---------------------------------------------------------------------------

/// Name-to-id table for one data file.
struct NameTable<'a, Id> {
    path: &'a Path,
    kind: &'static str,
    ids: HashMap<&'a str, Id>,
}

impl<'a, Id: Copy> NameTable<'a, Id> {
    fn new(path: &'a Path, kind: &'static str) -> Self {
        Self {
            path,
            kind,
            ids: HashMap::new(),
        }
    }

    fn define(&mut self, name: &'a str, id: Id) -> Result<(), DataLoadError> {
        if self.ids.insert(name, id).is_some() {
            return Err(DataLoadError::DuplicateName {
                path: self.path.to_path_buf(),
                kind: self.kind,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn resolve(&self, referenced_from: &Path, name: &str) -> Result<Id, DataLoadError> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| DataLoadError::UnresolvedName {
                path: referenced_from.to_path_buf(),
                kind: self.kind,
                name: name.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Read and resolve a catalog directory into the bulk-load record set,
/// without building the catalog.
pub fn load_catalog_data(dir: &Path) -> Result<CatalogData, DataLoadError> {
    let items_path = locate(dir, DataFile::Items)?;
    let research_path = locate(dir, DataFile::Research)?;

    let items: Vec<ItemData> = read_list(&items_path, |t: TomlItems| t.items)?;
    let research: Vec<ResearchData> = read_list(&research_path, |t: TomlResearch| t.research)?;

    tracing::debug!(
        items = items.len(),
        research = research.len(),
        dir = %dir.display(),
        "data files read"
    );

    resolve(&items, &items_path, &research, &research_path)
}

/// Load, resolve and validate the catalog in `dir`.
pub fn load_catalog(dir: &Path) -> Result<Catalog, DataLoadError> {
    let catalog = Catalog::load(load_catalog_data(dir)?)?;
    tracing::info!(dir = %dir.display(), "catalog directory loaded");
    Ok(catalog)
}

/// The XCOM 2 catalog shipped with this crate.
pub fn xcom_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join("xcom")
}

fn resolve(
    items: &[ItemData],
    items_path: &Path,
    research: &[ResearchData],
    research_path: &Path,
) -> Result<CatalogData, DataLoadError> {
    let mut data = CatalogData::default();

    let mut item_names = NameTable::new(items_path, "item");
    for (index, entry) in items.iter().enumerate() {
        let id = ItemId(index as u32);
        item_names.define(&entry.name, id)?;
        data.items.push(ItemRecord {
            id,
            name: entry.name.clone(),
        });
    }

    let mut project_names = NameTable::new(research_path, "research project");
    for (index, entry) in research.iter().enumerate() {
        let id = ProjectId(index as u32);
        project_names.define(&entry.name, id)?;
        data.projects.push(ProjectRecord {
            id,
            name: entry.name.clone(),
            hidden: entry.hidden,
        });
    }

    for (index, entry) in research.iter().enumerate() {
        let project = ProjectId(index as u32);

        for name in &entry.prerequisites {
            data.prerequisites.push(PrerequisiteEdge {
                project,
                requires: project_names.resolve(research_path, name)?,
            });
        }

        for cost in &entry.costs {
            data.costs.push(CostEdge {
                project,
                item: item_names.resolve(research_path, cost.item())?,
                quantity: cost.quantity(),
            });
        }

        // A hidden project without explicit triggers is revealed by what it costs.
        let triggers: Vec<&str> = if entry.hidden && entry.unlocked_by.is_empty() {
            entry.costs.iter().map(|cost| cost.item()).collect()
        } else {
            entry.unlocked_by.iter().map(String::as_str).collect()
        };
        for name in triggers {
            data.unlock_triggers.push(UnlockTriggerEdge {
                project,
                item: item_names.resolve(research_path, name)?,
            });
        }
    }

    Ok(data)
}
