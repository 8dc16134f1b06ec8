use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;

use super::extract::{
    extract_constituent_sets, extract_constituents, extract_element_quantities,
    extract_layer_set_usages, extract_layer_sets, extract_layers, extract_material_lists,
    extract_materials, extract_property_sets, extract_property_values, extract_quantity_values,
    ElementQuantity, PropertySet,
};
use super::relations::{
    extract_material_relations, extract_property_relations, extract_quantity_relations,
    ElementLinks,
};
use super::step::EntityTable;
use crate::error::ReadError;
use crate::model::{
    element_type_name, ConstituentPart, ElementRecord, LayerPart, Material, MaterialConstituent,
    MaterialConstituentSet, MaterialLayer, MaterialLayerSet, MaterialLayerSetUsage, MaterialList,
    MaterialShape, Quantities, ELEMENT_KINDS,
};

/// Reads an IFC file as text.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected; STEP
/// text encodes non-ASCII names with escape sequences anyway.
///
/// # Example
///
/// ```no_run
/// use ifc_compressor::parser::{read_ifc_file, parse_step_elements};
///
/// let content = read_ifc_file("model.ifc")?;
/// for element in parse_step_elements(&content) {
///     println!("#{} {}: {:.2} m³", element.id, element.element_type, element.volume);
/// }
/// # Ok::<(), ifc_compressor::error::ReadError>(())
/// ```
pub fn read_ifc_file<P: AsRef<Path>>(path: P) -> Result<String, ReadError> {
    let bytes = std::fs::read(&path).map_err(|source| ReadError::FileRead {
        path: path.as_ref().to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Every material-bearing entity of a file, keyed by entity id.
#[derive(Debug, Default)]
pub struct MaterialCatalog {
    pub materials: FxHashMap<u64, Material>,
    pub layers: FxHashMap<u64, MaterialLayer>,
    pub layer_sets: FxHashMap<u64, MaterialLayerSet>,
    pub layer_set_usages: FxHashMap<u64, MaterialLayerSetUsage>,
    pub lists: FxHashMap<u64, MaterialList>,
    pub constituents: FxHashMap<u64, MaterialConstituent>,
    pub constituent_sets: FxHashMap<u64, MaterialConstituentSet>,
}

impl MaterialCatalog {
    #[must_use]
    pub fn extract(table: &EntityTable) -> Self {
        let catalog = Self {
            materials: extract_materials(table),
            layers: extract_layers(table),
            layer_sets: extract_layer_sets(table),
            layer_set_usages: extract_layer_set_usages(table),
            lists: extract_material_lists(table),
            constituents: extract_constituents(table),
            constituent_sets: extract_constituent_sets(table),
        };
        tracing::debug!(
            materials = catalog.materials.len(),
            layer_sets = catalog.layer_sets.len(),
            lists = catalog.lists.len(),
            constituent_sets = catalog.constituent_sets.len(),
            "Extracted material catalog"
        );
        catalog
    }

    #[must_use]
    pub fn material_name(&self, material_id: u64) -> Option<&str> {
        self.materials.get(&material_id).map(|m| m.name.as_str())
    }

    fn owned_name(&self, material_id: Option<u64>) -> Option<String> {
        material_id
            .and_then(|id| self.material_name(id))
            .map(str::to_string)
    }

    /// What an association target is, or `None` if it resolves to nothing.
    #[must_use]
    pub fn resolve(&self, target: u64) -> Option<MaterialShape> {
        if let Some(set) = self.constituent_sets.get(&target) {
            let parts = set
                .constituent_ids
                .iter()
                .map(|id| match self.constituents.get(id) {
                    Some(c) => ConstituentPart {
                        name: self.owned_name(c.material_id),
                        fraction: c.fraction,
                    },
                    None => ConstituentPart {
                        name: None,
                        fraction: None,
                    },
                })
                .collect();
            return Some(MaterialShape::ConstituentSet(parts));
        }
        if let Some(usage) = self.layer_set_usages.get(&target) {
            return self.layer_set_shape(usage.layer_set_id);
        }
        if self.layer_sets.contains_key(&target) {
            return self.layer_set_shape(target);
        }
        if let Some(list) = self.lists.get(&target) {
            let names = list
                .material_ids
                .iter()
                .map(|id| self.owned_name(Some(*id)))
                .collect();
            return Some(MaterialShape::List(names));
        }
        if let Some(name) = self.material_name(target) {
            return Some(MaterialShape::Single(name.to_string()));
        }
        // A bare layer stands in for its material.
        self.layers
            .get(&target)
            .and_then(|layer| self.owned_name(layer.material_id))
            .map(MaterialShape::Single)
    }

    fn layer_set_shape(&self, layer_set_id: u64) -> Option<MaterialShape> {
        let set = self.layer_sets.get(&layer_set_id)?;
        let layers = set
            .layer_ids
            .iter()
            .map(|id| match self.layers.get(id) {
                Some(layer) => LayerPart {
                    name: self.owned_name(layer.material_id),
                    thickness: layer.thickness,
                },
                None => LayerPart {
                    name: None,
                    thickness: None,
                },
            })
            .collect();
        Some(MaterialShape::LayerSet(layers))
    }

    /// Distinct material names in entity id order.
    #[must_use]
    pub fn distinct_names(&self) -> Vec<String> {
        let mut materials: Vec<&Material> = self.materials.values().collect();
        materials.sort_by_key(|m| m.id);

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        materials
            .into_iter()
            .filter(|&m| seen.insert(m.name.as_str()))
            .map(|m| m.name.clone())
            .collect()
    }
}

/// Parses STEP text into decomposable building elements, in id order.
#[must_use]
pub fn parse_step_elements(content: &str) -> Vec<ElementRecord> {
    let table = EntityTable::parse(content);
    let catalog = MaterialCatalog::extract(&table);

    let quantity_values = extract_quantity_values(&table);
    let quantity_sets = extract_element_quantities(&table, &quantity_values);
    let property_values = extract_property_values(&table);
    let property_sets = extract_property_sets(&table, &property_values);

    let material_relations = extract_material_relations(&table);
    let quantity_relations = extract_quantity_relations(&table);
    let property_relations = extract_property_relations(&table);
    tracing::debug!(
        materials = material_relations.len(),
        quantities = quantity_relations.len(),
        properties = property_relations.len(),
        "Resolved relations"
    );

    let links = ElementLinks::build(
        &material_relations,
        &quantity_relations,
        &property_relations,
        |id| quantity_sets.contains_key(&id),
    );

    let mut elements: Vec<ElementRecord> = ELEMENT_KINDS
        .iter()
        .flat_map(|(keyword, _)| table.of_type(keyword))
        .map(|entity| {
            build_element(
                entity.id,
                entity.entity_type,
                &links,
                &catalog,
                &quantity_sets,
                &property_sets,
            )
        })
        .collect();
    elements.sort_by_key(|e| e.id);

    tracing::debug!(elements = elements.len(), "Assembled building elements");
    elements
}

fn build_element(
    id: u64,
    entity_type: &str,
    links: &ElementLinks,
    catalog: &MaterialCatalog,
    quantity_sets: &FxHashMap<u64, ElementQuantity>,
    property_sets: &FxHashMap<u64, PropertySet>,
) -> ElementRecord {
    let mut quantities = Quantities::default();
    for set_id in links.quantity_sets_of(id) {
        if let Some(set) = quantity_sets.get(set_id) {
            quantities.merge_missing(&set.values);
        }
    }

    let gwp = links
        .property_sets_of(id)
        .iter()
        .find_map(|set_id| property_sets.get(set_id).and_then(PropertySet::gwp));

    let targets = links.materials_of(id);
    let shapes = targets
        .iter()
        .filter_map(|target| catalog.resolve(*target))
        .collect();

    ElementRecord {
        id,
        element_type: element_type_name(entity_type),
        volume: quantities.volume(),
        area: quantities.area(),
        gwp,
        material_relations: targets.len(),
        shapes,
    }
}

/// Distinct `IFCMATERIAL` names of a STEP text, without resolving elements.
#[must_use]
pub fn step_material_names(content: &str) -> Vec<String> {
    let table = EntityTable::parse(content);
    MaterialCatalog {
        materials: extract_materials(&table),
        ..MaterialCatalog::default()
    }
    .distinct_names()
}
