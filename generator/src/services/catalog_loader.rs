//! JSON catalog loader
//!
//! Reads `{ "pools": { "<pool_id>": [row, ...] } }` where every row carries
//! the raw authored cells as strings. Every cell of every row is validated and
//! all issues are reported together.

use async_trait::async_trait;
use serde::Deserialize;
use shared::{
    Category, CatalogErrors, CatalogIssue, Distribution, Gender, OptionPool, SharedError, SpeciesLock, TraitOption,
};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::str::FromStr;
use tokio::fs;

use crate::catalog::{Catalog, PoolId};
use crate::error::GeneratorResult;
use crate::traits::CatalogLoader;

/// File key marking a pool's opt-out row
pub const OPT_OUT_FILE: &str = "NA";

/// One authored row, cells kept verbatim
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawRow {
    pub file: String,
    pub value: String,
    pub category: String,
    pub gender: String,
    pub combined: String,
    pub must_not_include: String,
    pub species_locked: String,
    pub distribution: String,
    pub must_include: String,
    pub rarity_locked: String,
    pub stackable: String,
    pub halo_and_horns_only: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCatalog {
    pub pools: BTreeMap<PoolId, Vec<RawRow>>,
}

/// Collects issues for one row while its cells are converted
struct RowParser<'a> {
    pool: PoolId,
    row: usize,
    errors: &'a mut CatalogErrors,
}

impl RowParser<'_> {
    fn issue(&mut self, field: &'static str, value: &str, reason: impl ToString) {
        self.errors.push(CatalogIssue {
            pool: self.pool.to_string(),
            row: self.row,
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        });
    }

    fn parse<T: FromStr<Err = SharedError>>(&mut self, field: &'static str, cell: &str) -> Option<T> {
        match cell.parse::<T>() {
            Ok(value) => Some(value),
            Err(err) => {
                self.issue(field, cell, err);
                None
            }
        }
    }

    /// Comma list, empty entries skipped
    fn list<T: FromStr<Err = SharedError>>(&mut self, field: &'static str, cell: &str) -> Vec<T> {
        cell.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| self.parse(field, entry))
            .collect()
    }

    fn tags(cell: &str) -> Vec<String> {
        cell.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Tri-state flag: `yes` is true, `""` and `NA` are false
    fn flag(&mut self, field: &'static str, cell: &str, yes: &str) -> bool {
        match cell {
            c if c == yes => true,
            "" | "NA" => false,
            other => {
                self.issue(field, other, format!("expected {yes:?}, \"NA\" or empty"));
                false
            }
        }
    }

    fn option(&mut self, raw: &RawRow) -> TraitOption {
        let categories = self.list::<Category>("category", &raw.category);
        let gender = match raw.gender.trim() {
            "" => None,
            cell => self.parse::<Gender>("gender", cell),
        };
        let combined = self.flag("combined", raw.combined.trim(), "YES");

        // An empty entry is the "no species" sentinel, so an empty cell locks to it
        let species_locked = raw
            .species_locked
            .split(',')
            .map(str::trim)
            .filter_map(|entry| self.parse::<SpeciesLock>("species_locked", entry))
            .collect();
        let distribution = self
            .parse::<Distribution>("distribution", raw.distribution.trim())
            .unwrap_or_default();
        let rarity_locked = self.flag("rarity_locked", raw.rarity_locked.trim(), "Y");

        TraitOption {
            file: raw.file.trim().to_string(),
            value: raw.value.trim().to_string(),
            categories,
            gender,
            combined,
            must_not_include: Self::tags(&raw.must_not_include),
            species_locked,
            distribution,
            must_include: Self::tags(&raw.must_include),
            rarity_locked,
            stackable: raw.stackable.trim() == "Y",
            halo_and_horns_only: raw.halo_and_horns_only.trim() == "Y",
        }
    }
}

impl RawCatalog {
    /// Convert every pool, collecting all authoring issues
    pub fn into_catalog(self) -> GeneratorResult<Catalog> {
        let mut errors = CatalogErrors::default();
        let mut pools = HashMap::new();

        for (id, rows) in self.pools {
            let mut pool = OptionPool::default();
            for (offset, raw) in rows.iter().enumerate() {
                let mut parser = RowParser {
                    pool: id,
                    row: offset + 1,
                    errors: &mut errors,
                };
                let option = parser.option(raw);
                if option.file == OPT_OUT_FILE {
                    pool.set_na(option);
                } else {
                    pool.push(option);
                }
            }
            pools.insert(id, pool);
        }

        errors.into_result()?;
        Catalog::from_pools(pools)
    }
}

/// Parse a catalog document held in memory
pub fn parse_catalog(json: &str) -> GeneratorResult<Catalog> {
    let raw: RawCatalog = serde_json::from_str(json)?;
    raw.into_catalog()
}

/// Catalog loader backed by a JSON file
pub struct JsonCatalogLoader {
    path: PathBuf,
}

impl JsonCatalogLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogLoader for JsonCatalogLoader {
    async fn load(&self) -> GeneratorResult<Catalog> {
        let content = fs::read_to_string(&self.path).await?;
        let catalog = parse_catalog(&content)?;
        tracing::info!(
            path = %self.path.display(),
            options = catalog.option_count(),
            "📚 Loaded catalog"
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneratorError;
    use shared::Species;

    const CATALOG: &str = r#"{
        "pools": {
            "droplets": [{ "file": "5D", "value": "Common" }],
            "bodies": [
                { "file": "NA", "value": "NA", "distribution": "10%" },
                {
                    "file": "1B",
                    "value": "Light Elven",
                    "category": "COOL, CUTE",
                    "gender": "U",
                    "combined": "YES",
                    "must_not_include": "NOSE, EYES",
                    "species_locked": "ELVEN,",
                    "distribution": "12.5%",
                    "rarity_locked": "NA",
                    "stackable": "Y"
                }
            ]
        }
    }"#;

    #[test]
    fn test_parses_rows_and_opt_out() {
        let catalog = parse_catalog(CATALOG).unwrap();
        let bodies = catalog.pool(PoolId::Bodies);
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies.na().unwrap().distribution, Distribution::Percent(10.0));

        let body = &bodies.options()[0];
        assert_eq!(body.categories, vec![Category::Cool, Category::Cute]);
        assert_eq!(body.gender, Some(Gender::Unisex));
        assert!(body.combined);
        assert_eq!(body.must_not_include, vec!["NOSE", "EYES"]);
        assert_eq!(
            body.species_locked,
            vec![SpeciesLock::Only(Species::Elven), SpeciesLock::NoSpecies]
        );
        assert!(!body.rarity_locked);
        assert!(body.stackable);
    }

    #[test]
    fn test_empty_species_cell_is_the_sentinel() {
        let catalog = parse_catalog(r#"{"pools": {"droplets": [], "bodies": [{"file": "1B", "value": "Plain"}]}}"#).unwrap();
        let body = &catalog.pool(PoolId::Bodies).options()[0];
        assert_eq!(body.species_locked, vec![SpeciesLock::NoSpecies]);
        assert!(body.categories.is_empty());
    }

    #[test]
    fn test_reports_every_invalid_cell() {
        let json = r#"{
            "pools": {
                "droplets": [{ "file": "5D", "value": "Common", "combined": "MAYBE" }],
                "bodies": [
                    { "file": "1B", "value": "A", "category": "COOL,WEIRD", "gender": "X" },
                    { "file": "2B", "value": "B", "species_locked": "DRAGON", "distribution": "ten" }
                ]
            }
        }"#;

        let err = parse_catalog(json).unwrap_err();
        let GeneratorError::Catalog(errors) = err else {
            panic!("expected catalog errors, got {err}");
        };
        let fields: Vec<_> = errors.issues.iter().map(|issue| (issue.pool.as_str(), issue.row, issue.field)).collect();
        assert_eq!(
            fields,
            vec![
                ("droplets", 1, "combined"),
                ("bodies", 1, "category"),
                ("bodies", 1, "gender"),
                ("bodies", 2, "species_locked"),
                ("bodies", 2, "distribution"),
            ]
        );
    }

    #[test]
    fn test_unknown_pool_is_rejected() {
        let err = parse_catalog(r#"{"pools": {"dragons": []}}"#).unwrap_err();
        assert!(matches!(err, GeneratorError::JsonError(_)));
    }

    #[tokio::test]
    async fn test_loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, CATALOG).unwrap();

        let catalog = JsonCatalogLoader::new(&path).load().await.unwrap();
        assert_eq!(catalog.pool(PoolId::Droplets).len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonCatalogLoader::new(dir.path().join("absent.json")).load().await.unwrap_err();
        assert!(matches!(err, GeneratorError::IoError(_)));
    }
}
