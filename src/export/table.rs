//! Aggregation of valued rows into the semicolon-delimited material table.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::model::ValuedRow;

/// Column names of the output table, in order.
pub const HEADER: [&str; 6] = [
    "Typ",
    "Material",
    "Volumen_m3",
    "Flaeche_m2",
    "Total_CO2",
    "Total_Cost",
];

/// Running sums for one `(type, material)` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRow {
    #[serde(rename = "type")]
    pub element_type: String,
    pub material: String,
    pub volume_m3: f64,
    pub area_m2: f64,
    pub total_co2: f64,
    pub total_cost: f64,
}

impl AggregatedRow {
    fn fields(&self) -> [String; 6] {
        [
            self.element_type.clone(),
            self.material.clone(),
            self.volume_m3.to_string(),
            self.area_m2.to_string(),
            self.total_co2.to_string(),
            self.total_cost.to_string(),
        ]
    }

    fn absorb(&mut self, other: &AggregatedRow) {
        self.volume_m3 += other.volume_m3;
        self.area_m2 += other.area_m2;
        self.total_co2 += other.total_co2;
        self.total_cost += other.total_cost;
    }
}

impl From<&ValuedRow> for AggregatedRow {
    fn from(row: &ValuedRow) -> Self {
        Self {
            element_type: row.element_type.clone(),
            material: row.material.clone(),
            volume_m3: row.volume,
            area_m2: row.area,
            total_co2: row.total_co2,
            total_cost: row.total_cost,
        }
    }
}

/// Rows grouped by exact, case-sensitive `(type, material)`.
///
/// Groups are kept sorted by key, so the output does not depend on the
/// order rows were added in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialTable {
    groups: BTreeMap<(String, String), AggregatedRow>,
}

impl MaterialTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, row: &ValuedRow) {
        self.absorb(AggregatedRow::from(row));
    }

    fn absorb(&mut self, row: AggregatedRow) {
        let key = (row.element_type.clone(), row.material.clone());
        match self.groups.get_mut(&key) {
            Some(existing) => existing.absorb(&row),
            None => {
                self.groups.insert(key, row);
            }
        }
    }

    /// Folds another table's sums into this one.
    pub fn merge(&mut self, other: MaterialTable) {
        for row in other.groups.into_values() {
            self.absorb(row);
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &AggregatedRow> {
        self.groups.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Header plus one line per group, fields joined by `;`.
    #[must_use]
    pub fn to_delimited(&self) -> String {
        self.to_string()
    }

    pub(crate) fn records(&self) -> impl Iterator<Item = [String; 6]> + '_ {
        self.rows().map(AggregatedRow::fields)
    }
}

impl<'r> FromIterator<&'r ValuedRow> for MaterialTable {
    fn from_iter<I: IntoIterator<Item = &'r ValuedRow>>(iter: I) -> Self {
        let mut table = MaterialTable::new();
        for row in iter {
            table.add(row);
        }
        table
    }
}

impl fmt::Display for MaterialTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", HEADER.join(";"))?;
        for record in self.records() {
            write!(f, "\n{}", record.join(";"))?;
        }
        Ok(())
    }
}
