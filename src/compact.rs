//! Pre-parsed JSON element lists from an external IFC loader.
//!
//! The loader has already resolved material associations to names, so each
//! element maps directly onto an [`ElementRecord`] and then goes through the
//! same decomposition as STEP input.
//!
//! A malformed element is dropped on its own, and a material entry that
//! cannot be read counts as an unresolved association.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::model::{element_type_name, ConstituentPart, ElementRecord, LayerPart, MaterialShape};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompactModel {
    #[serde(deserialize_with = "skip_malformed_elements")]
    pub elements: Vec<CompactElement>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompactElement {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub gwp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_materials")]
    pub materials: Vec<CompactMaterial>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CompactMaterial {
    Material {
        #[serde(default)]
        name: Option<String>,
    },
    List {
        #[serde(default)]
        materials: Vec<Option<String>>,
    },
    LayerSet {
        #[serde(default)]
        layers: Vec<CompactLayer>,
    },
    ConstituentSet {
        #[serde(default)]
        constituents: Vec<CompactConstituent>,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompactLayer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub thickness: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompactConstituent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fraction: Option<f64>,
}

fn skip_malformed_elements<'de, D>(deserializer: D) -> Result<Vec<CompactElement>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(element) => Some(element),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed compact element");
                None
            }
        })
        .collect())
}

/// `null` reads as no materials; unreadable entries become `Unsupported`.
fn lenient_materials<'de, D>(deserializer: D) -> Result<Vec<CompactMaterial>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .map(|value| {
            serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Unreadable compact material entry");
                CompactMaterial::Unsupported
            })
        })
        .collect())
}

impl CompactMaterial {
    fn to_shape(&self) -> Option<MaterialShape> {
        match self {
            CompactMaterial::Material { name } => name.clone().map(MaterialShape::Single),
            CompactMaterial::List { materials } => Some(MaterialShape::List(materials.clone())),
            CompactMaterial::LayerSet { layers } => Some(MaterialShape::LayerSet(
                layers
                    .iter()
                    .map(|l| LayerPart {
                        name: l.name.clone(),
                        thickness: l.thickness,
                    })
                    .collect(),
            )),
            CompactMaterial::ConstituentSet { constituents } => {
                Some(MaterialShape::ConstituentSet(
                    constituents
                        .iter()
                        .map(|c| ConstituentPart {
                            name: c.name.clone(),
                            fraction: c.fraction,
                        })
                        .collect(),
                ))
            }
            CompactMaterial::Unsupported => None,
        }
    }
}

impl CompactModel {
    /// Elements in input order; missing ids are numbered by position.
    #[must_use]
    pub fn to_elements(&self) -> Vec<ElementRecord> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, element)| ElementRecord {
                id: element.id.unwrap_or(i as u64),
                element_type: element_type_name(&element.element_type),
                volume: element.volume.unwrap_or(0.0),
                area: element.area.unwrap_or(0.0),
                gwp: element.gwp,
                material_relations: element.materials.len(),
                shapes: element
                    .materials
                    .iter()
                    .filter_map(CompactMaterial::to_shape)
                    .collect(),
            })
            .collect()
    }

    /// Distinct material names in order of first appearance.
    #[must_use]
    pub fn material_names(&self) -> Vec<String> {
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut names: Vec<String> = Vec::new();
        for shape in self
            .elements
            .iter()
            .flat_map(|e| &e.materials)
            .filter_map(CompactMaterial::to_shape)
        {
            for name in shape.names() {
                if seen.insert(name.to_string()) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }
}
