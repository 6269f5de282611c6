//! Catalog loading
//!
//! A catalog is one YAML file or a directory tree of YAML files. Every file
//! is a partial catalog; files are merged in path order and duplicate ids of
//! the same record kind are rejected.

use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use walkdir::WalkDir;

use crate::core::cache::HardwareCache;
use crate::core::entity::{find_record, CatalogRecord};
use crate::core::settings::GlobalSettings;
use crate::entities::{
    CabinetPart, CabinetType, ColorSpec, DoorStyleSpec, FinishSpec, HardwareSet, MaterialSpec,
};
use crate::yaml::{parse_yaml, YamlSyntaxError};

/// Material used when a cabinet type names none
pub const DEFAULT_MATERIAL_ID: &str = "hmr";

/// Errors that can occur while loading a catalog
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("catalog path not found: {0:?}")]
    #[diagnostic(
        code(cabprice::catalog::not_found),
        help("Pass --catalog, set CABPRICE_CATALOG, or add `catalog:` to .cabprice.yaml")
    )]
    PathNotFound(PathBuf),

    #[error("no catalog files (*.yaml, *.yml) under {0:?}")]
    #[diagnostic(code(cabprice::catalog::empty))]
    NoCatalogFiles(PathBuf),

    #[error("failed to read {path:?}: {source}")]
    #[diagnostic(code(cabprice::catalog::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlSyntaxError),

    #[error("duplicate {kind} id '{id}'")]
    #[diagnostic(
        code(cabprice::catalog::duplicate_id),
        help("Each record id must be unique across all catalog files")
    )]
    DuplicateId { kind: &'static str, id: String },

    #[error("unknown {kind} '{id}'")]
    #[diagnostic(
        code(cabprice::catalog::unknown_record),
        help("Run 'cabprice catalog list' or 'cabprice hardware list' to see available ids")
    )]
    UnknownRecord { kind: &'static str, id: String },
}

impl CatalogError {
    /// An id given by the caller that the catalog does not hold
    pub fn unknown<T: CatalogRecord>(id: impl Into<String>) -> Self {
        CatalogError::UnknownRecord {
            kind: T::KIND,
            id: id.into(),
        }
    }
}

/// In-memory catalog supplying records to the pricing engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Catalog {
    pub settings: GlobalSettings,
    pub materials: Vec<MaterialSpec>,
    pub door_styles: Vec<DoorStyleSpec>,
    pub colors: Vec<ColorSpec>,
    pub finishes: Vec<FinishSpec>,
    pub hardware_sets: Vec<HardwareSet>,
    pub cabinets: Vec<CabinetType>,
    pub parts: Vec<CabinetPart>,
}

impl Catalog {
    /// Load a catalog file or directory
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::PathNotFound(path.to_path_buf()));
        }

        if path.is_file() {
            return Self::load_file(path);
        }

        let mut files: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| is_yaml(p))
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(CatalogError::NoCatalogFiles(path.to_path_buf()));
        }

        let mut catalog = Catalog::default();
        for file in &files {
            catalog.merge(Self::load_file(file)?)?;
        }

        log::debug!(
            "Loaded catalog from {} files under {}",
            files.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Load a single catalog file
    pub fn load_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents, &path.display().to_string())
    }

    /// Parse a catalog from YAML text; an empty document is an empty catalog
    pub fn from_yaml(contents: &str, filename: &str) -> Result<Self, CatalogError> {
        if contents.trim().is_empty() {
            return Ok(Catalog::default());
        }
        let catalog: Catalog = parse_yaml(contents, filename)?;
        catalog.check_unique()?;
        Ok(catalog)
    }

    /// Merge another catalog into this one
    pub fn merge(&mut self, other: Catalog) -> Result<(), CatalogError> {
        self.settings.merge(other.settings);
        append_unique(&mut self.materials, other.materials)?;
        append_unique(&mut self.door_styles, other.door_styles)?;
        append_unique(&mut self.colors, other.colors)?;
        append_unique(&mut self.finishes, other.finishes)?;
        append_unique(&mut self.hardware_sets, other.hardware_sets)?;
        append_unique(&mut self.cabinets, other.cabinets)?;
        self.parts.extend(other.parts);
        Ok(())
    }

    fn check_unique(&self) -> Result<(), CatalogError> {
        check_unique(&self.materials)?;
        check_unique(&self.door_styles)?;
        check_unique(&self.colors)?;
        check_unique(&self.finishes)?;
        check_unique(&self.hardware_sets)?;
        check_unique(&self.cabinets)
    }

    pub fn cabinet(&self, id: &str) -> Option<&CabinetType> {
        find_record(&self.cabinets, id)
    }

    /// Parts belonging to a cabinet type, in catalog order
    pub fn parts_for(&self, cabinet_id: &str) -> Vec<CabinetPart> {
        self.parts
            .iter()
            .filter(|p| p.cabinet_type_id.eq_ignore_ascii_case(cabinet_id))
            .cloned()
            .collect()
    }

    pub fn material(&self, id: &str) -> Option<&MaterialSpec> {
        find_record(&self.materials, id)
    }

    /// Carcass material assigned to a cabinet type
    pub fn material_for(&self, cabinet: &CabinetType) -> Option<&MaterialSpec> {
        let id = cabinet.material_id.as_deref().unwrap_or(DEFAULT_MATERIAL_ID);
        self.material(id)
    }

    pub fn door_style(&self, id: &str) -> Option<&DoorStyleSpec> {
        find_record(&self.door_styles, id)
    }

    pub fn color(&self, id: &str) -> Option<&ColorSpec> {
        find_record(&self.colors, id)
    }

    pub fn finish(&self, id: &str) -> Option<&FinishSpec> {
        find_record(&self.finishes, id)
    }

    pub fn hardware_set(&self, id: &str) -> Option<&HardwareSet> {
        find_record(&self.hardware_sets, id)
    }

    /// Snapshot cache over this catalog's hardware sets and settings
    pub fn hardware_cache(&self) -> HardwareCache {
        HardwareCache::with_data(self.hardware_sets.clone(), self.settings.clone())
    }

    /// Consistency problems that do not prevent loading
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for part in &self.parts {
            if self.cabinet(&part.cabinet_type_id).is_none() {
                warnings.push(format!(
                    "part '{}' references unknown cabinet '{}'",
                    part.part_name, part.cabinet_type_id
                ));
            }
        }

        for cabinet in &self.cabinets {
            if self.material_for(cabinet).is_none() {
                warnings.push(format!(
                    "cabinet '{}' has no carcass material ('{}' not found)",
                    cabinet.id,
                    cabinet.material_id.as_deref().unwrap_or(DEFAULT_MATERIAL_ID)
                ));
            }
            let has_parts = self
                .parts
                .iter()
                .any(|p| p.cabinet_type_id.eq_ignore_ascii_case(&cabinet.id));
            if !has_parts
                && cabinet.sides_qty == 0
                && cabinet.backs_qty == 0
                && cabinet.bottoms_qty == 0
            {
                warnings.push(format!("cabinet '{}' has no parts", cabinet.id));
            }
        }

        let defaults = [
            self.settings.default_hinge_set_id(),
            self.settings.default_runner_set_id(),
        ];
        for id in defaults.into_iter().flatten() {
            if self.hardware_set(&id).is_none() {
                warnings.push(format!("default hardware set '{}' not found", id));
            }
        }

        warnings
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

fn check_unique<T: CatalogRecord>(records: &[T]) -> Result<(), CatalogError> {
    for (i, record) in records.iter().enumerate() {
        if records[..i].iter().any(|r| r.id() == record.id()) {
            return Err(CatalogError::DuplicateId {
                kind: T::KIND,
                id: record.id().to_string(),
            });
        }
    }
    Ok(())
}

fn append_unique<T: CatalogRecord>(target: &mut Vec<T>, incoming: Vec<T>) -> Result<(), CatalogError> {
    for record in incoming {
        if target.iter().any(|r| r.id() == record.id()) {
            return Err(CatalogError::DuplicateId {
                kind: T::KIND,
                id: record.id().to_string(),
            });
        }
        target.push(record);
    }
    Ok(())
}
