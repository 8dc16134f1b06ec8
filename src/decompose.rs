//! Splits one element's volume and area across its materials.
//!
//! Of all shapes attached to an element only the most specific one is used:
//! constituent set (3), layer set (2), material list (1), single material (0).
//! Ties keep the first shape found. Area follows the same share as volume.

use crate::model::{
    ConstituentPart, DecompositionRow, ElementRecord, LayerPart, MaterialShape, NOT_DEFINED,
    UNKNOWN,
};

/// Decomposes an element into material rows.
///
/// Without any material association the element becomes a single
/// `"Nicht definiert"` row; with associations that resolve to nothing it
/// becomes a single `"Unbekannt"` row. Both carry the full volume and area.
#[must_use]
pub fn decompose_element(element: &ElementRecord) -> Vec<DecompositionRow> {
    decompose(
        &element.shapes,
        element.material_relations,
        element.volume,
        element.area,
    )
}

#[must_use]
pub fn decompose(
    shapes: &[MaterialShape],
    material_relations: usize,
    volume: f64,
    area: f64,
) -> Vec<DecompositionRow> {
    if material_relations == 0 && shapes.is_empty() {
        return vec![sentinel(NOT_DEFINED, volume, area)];
    }

    let rows = match select_shape(shapes) {
        Some(MaterialShape::ConstituentSet(parts)) => split_constituents(parts, volume, area),
        Some(MaterialShape::LayerSet(layers)) => split_layers(layers, volume, area),
        Some(MaterialShape::List(names)) => split_evenly(names, volume, area),
        Some(MaterialShape::Single(name)) => vec![row(Some(name), volume, area)],
        None => Vec::new(),
    };

    if rows.is_empty() {
        vec![sentinel(UNKNOWN, volume, area)]
    } else {
        rows
    }
}

/// The highest-priority shape; the earliest wins among equals.
#[must_use]
pub fn select_shape(shapes: &[MaterialShape]) -> Option<&MaterialShape> {
    shapes.iter().fold(None::<&MaterialShape>, |best, shape| match best {
        Some(current) if current.priority() >= shape.priority() => Some(current),
        _ => Some(shape),
    })
}

fn sentinel(name: &str, volume: f64, area: f64) -> DecompositionRow {
    DecompositionRow {
        material: name.to_string(),
        volume,
        area,
    }
}

fn row(name: Option<&String>, volume: f64, area: f64) -> DecompositionRow {
    DecompositionRow {
        material: name.map_or_else(|| UNKNOWN.to_string(), Clone::clone),
        volume,
        area,
    }
}

/// Defined fractions take their share; the remainder (floored at zero) is
/// split evenly among constituents without a fraction.
fn split_constituents(parts: &[ConstituentPart], volume: f64, area: f64) -> Vec<DecompositionRow> {
    let defined: f64 = parts.iter().filter_map(|c| c.fraction).sum();
    let undefined = parts.iter().filter(|c| c.fraction.is_none()).count();

    let (rest_volume, rest_area) = if undefined == 0 {
        (0.0, 0.0)
    } else {
        let n = undefined as f64;
        (
            (volume - defined * volume).max(0.0) / n,
            (area - defined * area).max(0.0) / n,
        )
    };

    parts
        .iter()
        .map(|c| match c.fraction {
            Some(f) => row(c.name.as_ref(), f * volume, f * area),
            None => row(c.name.as_ref(), rest_volume, rest_area),
        })
        .collect()
}

/// Proportional to thickness; even when no layer has a positive thickness.
fn split_layers(layers: &[LayerPart], volume: f64, area: f64) -> Vec<DecompositionRow> {
    let total: f64 = layers
        .iter()
        .map(|l| l.thickness.unwrap_or(0.0).max(0.0))
        .sum();

    if total <= 0.0 {
        let names: Vec<Option<String>> = layers.iter().map(|l| l.name.clone()).collect();
        return split_evenly(&names, volume, area);
    }

    layers
        .iter()
        .map(|l| {
            let share = l.thickness.unwrap_or(0.0).max(0.0) / total;
            row(l.name.as_ref(), share * volume, share * area)
        })
        .collect()
}

fn split_evenly(names: &[Option<String>], volume: f64, area: f64) -> Vec<DecompositionRow> {
    if names.is_empty() {
        return Vec::new();
    }
    let n = names.len() as f64;
    names
        .iter()
        .map(|name| row(name.as_ref(), volume / n, area / n))
        .collect()
}
