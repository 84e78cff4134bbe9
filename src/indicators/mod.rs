//! Keyword tables used to classify bills.
//!
//! An [`IndicatorSet`] is plain immutable data handed to the classifier, so
//! tests and sites with unusual suppliers can swap in their own tables.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{config::Config, error::IndicatorError};

const DEFAULT_GAS: &[&str] = &[
    "mprn",
    "therms",
    "gas bill",
    "gas usage",
    "gas supply",
    "natural gas",
    "calorific value",
    "conversion factor",
];

const DEFAULT_ELECTRICITY: &[&str] = &[
    "mpan",
    "kwh",
    "electricity bill",
    "electricity usage",
    "electricity supply",
    "day units",
    "night units",
    "maximum import capacity",
];

/// Checked top to bottom; the first hit names the supplier.
const DEFAULT_SUPPLIERS: &[(&str, &str)] = &[
    ("flogas", "Flogas"),
    ("electric ireland", "Electric Ireland"),
    ("bord gáis", "Bord Gáis Energy"),
    ("bord gais", "Bord Gáis Energy"),
    ("sse airtricity", "SSE Airtricity"),
    ("energia", "Energia"),
    ("panda power", "Panda Power"),
    ("pinergy", "Pinergy"),
    ("yuno energy", "Yuno Energy"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierMarker {
    pub marker: String,
    pub supplier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorSet {
    gas_indicators: Vec<String>,
    electricity_indicators: Vec<String>,
    supplier_markers: Vec<SupplierMarker>,
}

/// On-disk shape; goes through [`IndicatorSet::new`] so files get the same checks.
#[derive(Debug, Deserialize)]
struct IndicatorFile {
    gas_indicators: Vec<String>,
    electricity_indicators: Vec<String>,
    #[serde(default)]
    supplier_markers: Vec<SupplierMarker>,
}

impl IndicatorSet {
    /// Trims and lowercases every entry. Gas and electricity lists must be disjoint.
    pub fn new(
        gas: Vec<String>,
        electricity: Vec<String>,
        markers: Vec<SupplierMarker>,
    ) -> Result<Self, IndicatorError> {
        let gas_indicators = normalize_list(gas, "gas indicators")?;
        let electricity_indicators = normalize_list(electricity, "electricity indicators")?;

        if let Some(dup) = gas_indicators
            .iter()
            .find(|g| electricity_indicators.contains(g))
        {
            return Err(IndicatorError::Overlap(dup.clone()));
        }

        let mut supplier_markers = Vec::with_capacity(markers.len());
        for m in markers {
            let marker = m.marker.trim().to_lowercase();
            let supplier = m.supplier.trim().to_string();
            if marker.is_empty() || supplier.is_empty() {
                return Err(IndicatorError::EmptyEntry("supplier markers"));
            }
            supplier_markers.push(SupplierMarker { marker, supplier });
        }

        Ok(Self { gas_indicators, electricity_indicators, supplier_markers })
    }

    pub fn from_json_str(text: &str, origin: &Path) -> Result<Self, IndicatorError> {
        let file: IndicatorFile = serde_json::from_str(text).map_err(|source| IndicatorError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        Self::new(file.gas_indicators, file.electricity_indicators, file.supplier_markers)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, IndicatorError> {
        let text = fs::read_to_string(path).map_err(|source| IndicatorError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text, path)
    }

    /// `INDICATORS_PATH` when configured, built-in tables otherwise.
    pub fn load(cfg: &Config) -> Result<Self, IndicatorError> {
        match cfg.indicators_path() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading indicator tables");
                Self::from_json_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn gas_indicators(&self) -> &[String] {
        &self.gas_indicators
    }

    pub fn electricity_indicators(&self) -> &[String] {
        &self.electricity_indicators
    }

    pub fn supplier_markers(&self) -> &[SupplierMarker] {
        &self.supplier_markers
    }
}

impl Default for IndicatorSet {
    fn default() -> Self {
        Self {
            gas_indicators: DEFAULT_GAS.iter().map(|s| s.to_string()).collect(),
            electricity_indicators: DEFAULT_ELECTRICITY.iter().map(|s| s.to_string()).collect(),
            supplier_markers: DEFAULT_SUPPLIERS
                .iter()
                .map(|(marker, supplier)| SupplierMarker {
                    marker: marker.to_string(),
                    supplier: supplier.to_string(),
                })
                .collect(),
        }
    }
}

fn normalize_list(items: Vec<String>, what: &'static str) -> Result<Vec<String>, IndicatorError> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim().to_lowercase();
        if item.is_empty() {
            return Err(IndicatorError::EmptyEntry(what));
        }
        // Repeats would count twice in the vote
        if !out.contains(&item) {
            out.push(item);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_are_valid_and_disjoint() {
        let d = IndicatorSet::default();
        let rebuilt = IndicatorSet::new(
            d.gas_indicators().to_vec(),
            d.electricity_indicators().to_vec(),
            d.supplier_markers().to_vec(),
        )
        .expect("defaults pass validation");
        assert_eq!(rebuilt, d);
    }

    #[test]
    fn no_default_indicator_hides_inside_a_supplier_marker() {
        let d = IndicatorSet::default();
        for m in d.supplier_markers() {
            for ind in d.gas_indicators().iter().chain(d.electricity_indicators()) {
                assert!(!m.marker.contains(ind.as_str()), "{} matches marker {}", ind, m.marker);
            }
        }
    }

    #[test]
    fn entries_are_normalized() {
        let set = IndicatorSet::new(
            strings(&["  MPRN ", "mprn", "Therms"]),
            strings(&["KWh"]),
            vec![SupplierMarker { marker: " FloGas ".into(), supplier: " Flogas ".into() }],
        )
        .unwrap();
        assert_eq!(set.gas_indicators(), &["mprn".to_string(), "therms".to_string()]);
        assert_eq!(set.electricity_indicators(), &["kwh".to_string()]);
        assert_eq!(set.supplier_markers()[0].marker, "flogas");
        assert_eq!(set.supplier_markers()[0].supplier, "Flogas");
    }

    #[test]
    fn overlapping_tables_are_rejected() {
        let err = IndicatorSet::new(strings(&["units"]), strings(&["UNITS"]), vec![]).unwrap_err();
        assert!(matches!(err, IndicatorError::Overlap(ref s) if s == "units"));
    }

    #[test]
    fn empty_entries_are_rejected() {
        assert!(matches!(
            IndicatorSet::new(strings(&["mprn", " "]), vec![], vec![]),
            Err(IndicatorError::EmptyEntry("gas indicators"))
        ));
        assert!(matches!(
            IndicatorSet::new(vec![], vec![], vec![SupplierMarker { marker: "x".into(), supplier: "".into() }]),
            Err(IndicatorError::EmptyEntry("supplier markers"))
        ));
    }

    #[test]
    fn loads_json_tables() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("indicators.json");
        fs::write(
            &path,
            r#"{
                "gas_indicators": ["lpg tank"],
                "electricity_indicators": ["solar export"],
                "supplier_markers": [{"marker": "acme power", "supplier": "Acme"}]
            }"#,
        )?;

        let set = IndicatorSet::from_json_file(&path)?;
        assert_eq!(set.gas_indicators(), &["lpg tank".to_string()]);
        assert_eq!(set.supplier_markers().len(), 1);
        Ok(())
    }

    #[test]
    fn markers_are_optional_in_json() -> anyhow::Result<()> {
        let set = IndicatorSet::from_json_str(
            r#"{"gas_indicators": ["a"], "electricity_indicators": ["b"]}"#,
            Path::new("inline.json"),
        )?;
        assert!(set.supplier_markers().is_empty());
        Ok(())
    }

    #[test]
    fn bad_json_reports_the_path() {
        let err = IndicatorSet::from_json_str("{", Path::new("broken.json")).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn load_uses_configured_path_or_defaults() -> anyhow::Result<()> {
        let mut cfg = Config::load_from(Path::new("/nonexistent/.billsortrc"));
        cfg.set("INDICATORS_PATH", "");
        assert_eq!(IndicatorSet::load(&cfg)?, IndicatorSet::default());

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("site.json");
        fs::write(&path, r#"{"gas_indicators": ["Bulk LPG"], "electricity_indicators": ["pv export"]}"#)?;
        cfg.set("INDICATORS_PATH", path.to_string_lossy());
        let set = IndicatorSet::load(&cfg)?;
        assert_eq!(set.gas_indicators(), &["bulk lpg".to_string()]);
        assert!(set.supplier_markers().is_empty());

        cfg.set("INDICATORS_PATH", dir.path().join("missing.json").to_string_lossy());
        assert!(matches!(IndicatorSet::load(&cfg), Err(IndicatorError::Read { .. })));
        Ok(())
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = IndicatorSet::from_json_file(Path::new("/nonexistent/indicators.json")).unwrap_err();
        assert!(matches!(err, IndicatorError::Read { .. }));
    }
}
