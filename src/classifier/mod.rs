//! Supplier and utility-type detection by keyword matching.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::ExtractionFailure,
    indicators::IndicatorSet,
    utils::pdf::{extract_document_text, TextExtractor},
};

pub const UNKNOWN_SUPPLIER: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillType {
    Gas,
    Electricity,
    Unknown,
}

impl BillType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gas => "Gas",
            Self::Electricity => "Electricity",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for BillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub supplier: String,
    pub bill_type: BillType,
    /// Distinct gas indicators found.
    pub gas_hits: usize,
    /// Distinct electricity indicators found.
    pub electricity_hits: usize,
}

impl Classification {
    /// No winner in the vote; the caller has to warn before submitting.
    pub fn is_ambiguous(&self) -> bool {
        self.bill_type == BillType::Unknown
    }

    pub fn supplier_known(&self) -> bool {
        self.supplier != UNKNOWN_SUPPLIER
    }
}

/// First marker in priority order contained in `text`, else `"Unknown"`.
/// Matching is case-insensitive.
pub fn detect_supplier(text: &str, set: &IndicatorSet) -> String {
    supplier_in(&text.to_lowercase(), set)
}

/// Counts distinct indicators of each kind; the strictly larger count wins.
/// Matching is case-insensitive.
pub fn detect_bill_type(text: &str, set: &IndicatorSet) -> (BillType, usize, usize) {
    bill_type_in(&text.to_lowercase(), set)
}

pub fn classify_text(text: &str, set: &IndicatorSet) -> Classification {
    let lower = text.to_lowercase();
    let supplier = supplier_in(&lower, set);
    let (bill_type, gas_hits, electricity_hits) = bill_type_in(&lower, set);
    Classification { supplier, bill_type, gas_hits, electricity_hits }
}

/// Stand-in for a bill whose text could not be read.
pub fn unknown_classification() -> Classification {
    Classification {
        supplier: UNKNOWN_SUPPLIER.to_string(),
        bill_type: BillType::Unknown,
        gas_hits: 0,
        electricity_hits: 0,
    }
}

// `lower` is already lowercase; markers and indicators are lowercased by IndicatorSet.
fn supplier_in(lower: &str, set: &IndicatorSet) -> String {
    set.supplier_markers()
        .iter()
        .find(|m| lower.contains(m.marker.as_str()))
        .map(|m| m.supplier.clone())
        .unwrap_or_else(|| UNKNOWN_SUPPLIER.to_string())
}

fn bill_type_in(lower: &str, set: &IndicatorSet) -> (BillType, usize, usize) {
    let gas = count_present(lower, set.gas_indicators());
    let electricity = count_present(lower, set.electricity_indicators());

    let bill_type = if gas > electricity {
        BillType::Gas
    } else if electricity > gas {
        BillType::Electricity
    } else {
        BillType::Unknown
    };
    (bill_type, gas, electricity)
}

fn count_present(text: &str, indicators: &[String]) -> usize {
    indicators
        .iter()
        .filter(|ind| text.contains(ind.as_str()))
        .count()
}

/// Extract the bill's text and classify it. Extraction errors are returned as-is.
pub fn classify_pdf(
    bytes: &[u8],
    set: &IndicatorSet,
    extractor: &dyn TextExtractor,
) -> Result<Classification, ExtractionFailure> {
    let text = extract_document_text(bytes, extractor)?;
    Ok(classify_text(&text, set))
}
