//! Typed extractors, one per IFC entity kind the compressor reads.
//!
//! Each walks only its own type in the entity table and keeps entities it
//! can decode; anything else is skipped without failing the parse.

use rustc_hash::FxHashMap;

use super::layout::{Decoded, Field};
use super::step::EntityTable;
use crate::model::{
    Material, MaterialConstituent, MaterialConstituentSet, MaterialLayer, MaterialLayerSet,
    MaterialLayerSetUsage, MaterialList, QuantityKind, Quantities,
};

/// Property names treated as global warming potential (substring match).
const GWP_PROPERTY_NAMES: &[&str] = &["globalwarmingpotential", "gwp", "co2"];

const QUANTITY_TYPES: &[&str] = &["IFCQUANTITYVOLUME", "IFCQUANTITYAREA"];

/// A whitelisted `IFCQUANTITYVOLUME` / `IFCQUANTITYAREA`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantityValue {
    pub id: u64,
    pub kind: QuantityKind,
    pub value: f64,
}

/// `IFCELEMENTQUANTITY` with its quantities resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementQuantity {
    pub id: u64,
    pub values: Quantities,
}

/// A GWP-whitelisted `IFCPROPERTYSINGLEVALUE`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValue {
    pub id: u64,
    pub name: String,
    pub value: f64,
}

/// `IFCPROPERTYSET` reduced to its GWP properties, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySet {
    pub id: u64,
    pub values: Vec<(String, f64)>,
}

impl PropertySet {
    #[must_use]
    pub fn gwp(&self) -> Option<f64> {
        self.values.first().map(|(_, value)| *value)
    }
}

#[must_use]
pub fn is_gwp_property(name: &str) -> bool {
    let lower = name.to_lowercase();
    GWP_PROPERTY_NAMES.iter().any(|p| lower.contains(p))
}

pub fn extract_materials(table: &EntityTable) -> FxHashMap<u64, Material> {
    table
        .of_type("IFCMATERIAL")
        .filter_map(|entity| {
            let decoded = Decoded::new(entity);
            decoded.string(Field::Name).map(|name| {
                (
                    entity.id,
                    Material {
                        id: entity.id,
                        name,
                    },
                )
            })
        })
        .collect()
}

pub fn extract_layers(table: &EntityTable) -> FxHashMap<u64, MaterialLayer> {
    table
        .of_type("IFCMATERIALLAYER")
        .map(|entity| {
            let decoded = Decoded::new(entity);
            let layer = MaterialLayer {
                id: entity.id,
                material_id: decoded.reference(Field::Material),
                thickness: decoded.number(Field::Thickness),
            };
            (entity.id, layer)
        })
        .collect()
}

pub fn extract_layer_sets(table: &EntityTable) -> FxHashMap<u64, MaterialLayerSet> {
    table
        .of_type("IFCMATERIALLAYERSET")
        .map(|entity| {
            let layer_ids = Decoded::new(entity).references(Field::Layers);
            (
                entity.id,
                MaterialLayerSet {
                    id: entity.id,
                    layer_ids,
                },
            )
        })
        .collect()
}

pub fn extract_layer_set_usages(table: &EntityTable) -> FxHashMap<u64, MaterialLayerSetUsage> {
    table
        .of_type("IFCMATERIALLAYERSETUSAGE")
        .filter_map(|entity| {
            let layer_set_id = Decoded::new(entity).reference(Field::LayerSet)?;
            Some((
                entity.id,
                MaterialLayerSetUsage {
                    id: entity.id,
                    layer_set_id,
                },
            ))
        })
        .collect()
}

pub fn extract_material_lists(table: &EntityTable) -> FxHashMap<u64, MaterialList> {
    table
        .of_type("IFCMATERIALLIST")
        .map(|entity| {
            let material_ids = Decoded::new(entity).references(Field::Materials);
            (
                entity.id,
                MaterialList {
                    id: entity.id,
                    material_ids,
                },
            )
        })
        .collect()
}

pub fn extract_constituents(table: &EntityTable) -> FxHashMap<u64, MaterialConstituent> {
    table
        .of_type("IFCMATERIALCONSTITUENT")
        .map(|entity| {
            let decoded = Decoded::new(entity);
            let constituent = MaterialConstituent {
                id: entity.id,
                material_id: decoded.reference(Field::Material),
                fraction: decoded.number(Field::Fraction),
            };
            (entity.id, constituent)
        })
        .collect()
}

pub fn extract_constituent_sets(table: &EntityTable) -> FxHashMap<u64, MaterialConstituentSet> {
    table
        .of_type("IFCMATERIALCONSTITUENTSET")
        .map(|entity| {
            let constituent_ids = Decoded::new(entity).references(Field::Constituents);
            (
                entity.id,
                MaterialConstituentSet {
                    id: entity.id,
                    constituent_ids,
                },
            )
        })
        .collect()
}

pub fn extract_quantity_values(table: &EntityTable) -> FxHashMap<u64, QuantityValue> {
    let mut values = FxHashMap::default();

    for keyword in QUANTITY_TYPES {
        for entity in table.of_type(keyword) {
            let decoded = Decoded::new(entity);
            let Some(kind) = decoded
                .string(Field::Name)
                .as_deref()
                .and_then(QuantityKind::classify)
            else {
                continue;
            };
            if let Some(value) = decoded.number(Field::QuantityValue) {
                values.insert(
                    entity.id,
                    QuantityValue {
                        id: entity.id,
                        kind,
                        value,
                    },
                );
            }
        }
    }

    values
}

/// Element quantity sets with their whitelisted values resolved.
pub fn extract_element_quantities(
    table: &EntityTable,
    quantity_values: &FxHashMap<u64, QuantityValue>,
) -> FxHashMap<u64, ElementQuantity> {
    table
        .of_type("IFCELEMENTQUANTITY")
        .map(|entity| {
            let mut values = Quantities::default();
            for quantity_id in Decoded::new(entity).references(Field::Quantities) {
                if let Some(q) = quantity_values.get(&quantity_id) {
                    values.insert_first(q.kind, q.value);
                }
            }
            (
                entity.id,
                ElementQuantity {
                    id: entity.id,
                    values,
                },
            )
        })
        .collect()
}

pub fn extract_property_values(table: &EntityTable) -> FxHashMap<u64, PropertyValue> {
    table
        .of_type("IFCPROPERTYSINGLEVALUE")
        .filter_map(|entity| {
            let decoded = Decoded::new(entity);
            let name = decoded.string(Field::Name).filter(|n| is_gwp_property(n))?;
            let value = decoded.number(Field::NominalValue)?;
            Some((
                entity.id,
                PropertyValue {
                    id: entity.id,
                    name,
                    value,
                },
            ))
        })
        .collect()
}

/// Property sets reduced to GWP values. Sets without any are dropped.
pub fn extract_property_sets(
    table: &EntityTable,
    property_values: &FxHashMap<u64, PropertyValue>,
) -> FxHashMap<u64, PropertySet> {
    table
        .of_type("IFCPROPERTYSET")
        .filter_map(|entity| {
            let values: Vec<(String, f64)> = Decoded::new(entity)
                .references(Field::Properties)
                .into_iter()
                .filter_map(|id| property_values.get(&id))
                .map(|p| (p.name.clone(), p.value))
                .collect();
            if values.is_empty() {
                return None;
            }
            Some((entity.id, PropertySet { id: entity.id, values }))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MATERIALS: &str = "\
#1=IFCMATERIAL('Beton',$,$);
#2=IFCMATERIAL($);
#3=IFCMATERIALLAYER(#1,IFCPOSITIVELENGTHMEASURE(0.2),$);
#4=IFCMATERIALLAYER(#1,$,$);
#5=IFCMATERIALLAYERSET((#3,#4),'Wand',$);
#6=IFCMATERIALLAYERSETUSAGE(#5,.AXIS2.,.POSITIVE.,0.,$);
#7=IFCMATERIALLIST((#1,#99));
#8=IFCMATERIALCONSTITUENT('Kern',$,#1,0.5,$);
#9=IFCMATERIALCONSTITUENTSET('Mix',$,(#8));
";

    #[test]
    fn material_family() {
        let table = EntityTable::parse(MATERIALS);

        let materials = extract_materials(&table);
        assert_eq!(materials.len(), 1);
        assert_eq!(materials[&1].name, "Beton");

        let layers = extract_layers(&table);
        assert_eq!(layers[&3].thickness, Some(0.2));
        assert_eq!(layers[&4].thickness, None);
        assert_eq!(layers[&4].material_id, Some(1));

        assert_eq!(extract_layer_sets(&table)[&5].layer_ids, vec![3, 4]);
        assert_eq!(extract_layer_set_usages(&table)[&6].layer_set_id, 5);
        assert_eq!(extract_material_lists(&table)[&7].material_ids, vec![1, 99]);

        let constituent = &extract_constituents(&table)[&8];
        assert_eq!(constituent.material_id, Some(1));
        assert_eq!(constituent.fraction, Some(0.5));
        assert_eq!(extract_constituent_sets(&table)[&9].constituent_ids, vec![8]);
    }

    #[test]
    fn quantities_are_whitelisted_and_resolved() {
        let table = EntityTable::parse(
            "#1=IFCQUANTITYVOLUME('NetVolume',$,$,6.,$);\n\
             #2=IFCQUANTITYAREA('NetSideArea',$,$,3.5,$);\n\
             #3=IFCQUANTITYLENGTH('Length',$,$,4.,$);\n\
             #4=IFCQUANTITYVOLUME('GrossVolume',$,$,7.,$);\n\
             #5=IFCELEMENTQUANTITY('g',$,'Qto_WallBaseQuantities',$,$,(#1,#2,#3,#4));",
        );
        let values = extract_quantity_values(&table);
        assert_eq!(values.len(), 3);

        let sets = extract_element_quantities(&table, &values);
        let q = sets[&5].values;
        assert_eq!(q.volume(), 6.0);
        assert_eq!(q.get(QuantityKind::GrossVolume), Some(7.0));
        assert_eq!(q.area(), 3.5);
    }

    #[test]
    fn property_sets_keep_only_gwp() {
        let table = EntityTable::parse(
            "#1=IFCPROPERTYSINGLEVALUE('GWP_A1_A3',$,IFCREAL(250.),$);\n\
             #2=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('F90'),$);\n\
             #3=IFCPROPERTYSINGLEVALUE('co2 equivalent',$,IFCREAL(10.),$);\n\
             #4=IFCPROPERTYSET('g',$,'Pset_Eco',$,(#2,#1,#3));\n\
             #5=IFCPROPERTYSET('g',$,'Pset_Fire',$,(#2));",
        );
        let props = extract_property_values(&table);
        let sets = extract_property_sets(&table, &props);

        assert_eq!(sets.len(), 1);
        assert_eq!(
            sets[&4].values,
            vec![("GWP_A1_A3".to_string(), 250.0), ("co2 equivalent".to_string(), 10.0)]
        );
        assert_eq!(sets[&4].gwp(), Some(250.0));
    }

    #[test]
    fn gwp_names() {
        assert!(is_gwp_property("GlobalWarmingPotential"));
        assert!(is_gwp_property("gwp"));
        assert!(is_gwp_property("CO2_Total"));
        assert!(!is_gwp_property("Density"));
    }
}
