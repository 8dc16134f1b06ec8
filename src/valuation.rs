//! Names and values decomposition rows against the reference database.
//!
//! With an approved replacement map only mapped materials are renamed and
//! valued, by exact lookup of the mapped name. Unmapped materials keep their
//! name and get no database entry. Without a map every row is valued from
//! its best fuzzy match. In both modes an explicit element GWP replaces the
//! database GWP.

use std::collections::HashMap;

use crate::decompose::decompose_element;
use crate::model::{DecompositionRow, ElementRecord, ValuedRow};
use crate::reference::{best_match, ReferenceDatabase, ReferenceMaterial};

/// Approved `original name → replacement name` pairs.
pub type ReplacementMap = HashMap<String, String>;

/// Final name and database entry for one material name.
fn resolve_entry<'d>(
    material: &str,
    db: &'d ReferenceDatabase,
    replacements: Option<&ReplacementMap>,
) -> (String, Option<&'d ReferenceMaterial>) {
    match replacements {
        Some(map) => match map.get(material) {
            Some(replacement) => (replacement.clone(), db.get(replacement)),
            None => (material.to_string(), None),
        },
        None => (material.to_string(), best_match(material, db)),
    }
}

/// Values one decomposition row of an element.
#[must_use]
pub fn value_row(
    element_type: &str,
    element_gwp: Option<f64>,
    row: &DecompositionRow,
    db: &ReferenceDatabase,
    replacements: Option<&ReplacementMap>,
) -> ValuedRow {
    let (material, entry) = resolve_entry(&row.material, db, replacements);
    let gwp = element_gwp
        .or(entry.map(|e| e.gwp_value))
        .unwrap_or(0.0);
    let price = entry.map_or(0.0, |e| e.price_per_m3);

    ValuedRow {
        element_type: element_type.to_string(),
        material,
        volume: row.volume,
        area: row.area,
        total_co2: row.volume * gwp,
        total_cost: row.volume * price,
    }
}

/// Decomposes and values every element.
#[must_use]
pub fn value_elements(
    elements: &[ElementRecord],
    db: &ReferenceDatabase,
    replacements: Option<&ReplacementMap>,
) -> Vec<ValuedRow> {
    elements
        .iter()
        .flat_map(|element| {
            decompose_element(element)
                .into_iter()
                .map(|row| value_row(&element.element_type, element.gwp, &row, db, replacements))
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(material: &str, volume: f64) -> DecompositionRow {
        DecompositionRow {
            material: material.to_string(),
            volume,
            area: 1.0,
        }
    }

    fn map(pairs: &[(&str, &str)]) -> ReplacementMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn unmapped_material_is_left_alone() {
        let db = ReferenceDatabase::defaults();
        let replacements = map(&[("Beton", "Stahlbeton C25/30")]);
        let valued = value_row("Wall", None, &row("Holz", 2.0), &db, Some(&replacements));

        assert_eq!(valued.material, "Holz");
        assert_eq!(valued.total_cost, 0.0);
        assert_eq!(valued.total_co2, 0.0);
    }

    #[test]
    fn unmapped_material_keeps_element_gwp() {
        let db = ReferenceDatabase::defaults();
        let valued = value_row("Wall", Some(50.0), &row("Holz", 2.0), &db, Some(&map(&[])));
        assert_eq!(valued.total_co2, 100.0);
        assert_eq!(valued.total_cost, 0.0);
    }

    #[test]
    fn mapped_material_uses_exact_entry() {
        let db = ReferenceDatabase::defaults();
        let replacements = map(&[("Holz", "Brettsperrholz (CLT)")]);
        let valued = value_row("Slab", None, &row("Holz", 2.0), &db, Some(&replacements));

        assert_eq!(valued.material, "Brettsperrholz (CLT)");
        assert_eq!(valued.total_co2, 220.0);
        assert_eq!(valued.total_cost, 1900.0);
    }

    #[test]
    fn mapped_to_unknown_name_has_no_entry() {
        let db = ReferenceDatabase::defaults();
        let replacements = map(&[("Holz", "Holz")]);
        let valued = value_row("Slab", None, &row("Holz", 2.0), &db, Some(&replacements));

        assert_eq!(valued.material, "Holz");
        assert_eq!(valued.total_cost, 0.0);
    }

    #[test]
    fn element_gwp_overrides_database() {
        let db = ReferenceDatabase::defaults();
        let replacements = map(&[("Z", "Ziegel")]);
        let valued = value_row("Wall", Some(10.0), &row("Z", 3.0), &db, Some(&replacements));

        assert_eq!(valued.total_co2, 30.0);
        assert_eq!(valued.total_cost, 750.0);
    }

    #[test]
    fn without_map_best_match_values_the_row() {
        let db = ReferenceDatabase::defaults();
        let valued = value_row("Wall", None, &row("Beton", 6.0), &db, None);

        assert_eq!(valued.material, "Beton");
        assert_eq!(valued.total_co2, 1920.0);
        assert_eq!(valued.total_cost, 1680.0);
    }
}
