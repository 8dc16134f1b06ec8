use serde::{Deserialize, Serialize};

/// Sentinel for elements without any material association.
pub const NOT_DEFINED: &str = "Nicht definiert";

/// Sentinel for associations or parts whose material name cannot be found.
pub const UNKNOWN: &str = "Unbekannt";

/// One material share of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct DecompositionRow {
    pub material: String,
    pub volume: f64,
    pub area: f64,
}

/// A decomposition row after naming and valuation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuedRow {
    pub element_type: String,
    pub material: String,
    pub volume: f64,
    pub area: f64,
    pub total_co2: f64,
    pub total_cost: f64,
}

/// A material found in the model with its candidate database names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialReplacement {
    pub original: String,
    pub replacement: Option<String>,
    pub suggestions: Vec<String>,
}
