//! Element associations from the three STEP relationship entities.
//!
//! All three share the rooted-relationship shape: index 4 lists the related
//! objects, index 5 is the single relating target. One tuple is produced per
//! related object.

use rustc_hash::FxHashMap;

use super::layout::{Decoded, Field};
use super::step::EntityTable;

/// Relationship arity below which an entity is treated as malformed.
const MIN_RELATION_ARGS: usize = 6;

/// `elementId → materialId` from `IFCRELASSOCIATESMATERIAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialRelation {
    pub element_id: u64,
    pub material_id: u64,
}

/// `elementId → quantitySetId` from `IFCRELDEFINESBYQUANTITY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityRelation {
    pub element_id: u64,
    pub quantity_set_id: u64,
}

/// `elementId → propertySetId` from `IFCRELDEFINESBYPROPERTIES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyRelation {
    pub element_id: u64,
    pub property_set_id: u64,
}

/// Fans every relationship of `keyword` out into `(element, target)` pairs.
fn fan_out(table: &EntityTable, keyword: &str) -> Vec<(u64, u64)> {
    let mut pairs = Vec::new();

    for entity in table.of_type(keyword) {
        let decoded = Decoded::new(entity);
        if decoded.arg_count() < MIN_RELATION_ARGS {
            tracing::debug!(id = entity.id, keyword, "Skipping malformed relationship");
            continue;
        }
        let Some(target) = decoded.reference(Field::Relating) else {
            continue;
        };
        pairs.extend(
            decoded
                .references(Field::RelatedObjects)
                .into_iter()
                .map(|element| (element, target)),
        );
    }

    pairs
}

pub fn extract_material_relations(table: &EntityTable) -> Vec<MaterialRelation> {
    fan_out(table, "IFCRELASSOCIATESMATERIAL")
        .into_iter()
        .map(|(element_id, material_id)| MaterialRelation {
            element_id,
            material_id,
        })
        .collect()
}

pub fn extract_quantity_relations(table: &EntityTable) -> Vec<QuantityRelation> {
    fan_out(table, "IFCRELDEFINESBYQUANTITY")
        .into_iter()
        .map(|(element_id, quantity_set_id)| QuantityRelation {
            element_id,
            quantity_set_id,
        })
        .collect()
}

pub fn extract_property_relations(table: &EntityTable) -> Vec<PropertyRelation> {
    fan_out(table, "IFCRELDEFINESBYPROPERTIES")
        .into_iter()
        .map(|(element_id, property_set_id)| PropertyRelation {
            element_id,
            property_set_id,
        })
        .collect()
}

/// Relation targets grouped per element, in relation order.
#[derive(Debug, Default)]
pub struct ElementLinks {
    pub materials: FxHashMap<u64, Vec<u64>>,
    pub quantity_sets: FxHashMap<u64, Vec<u64>>,
    pub property_sets: FxHashMap<u64, Vec<u64>>,
}

impl ElementLinks {
    /// Groups all three relation kinds. Property relations whose target is
    /// a known quantity set also count as quantity links, since some
    /// exporters attach element quantities that way.
    #[must_use]
    pub fn build(
        materials: &[MaterialRelation],
        quantities: &[QuantityRelation],
        properties: &[PropertyRelation],
        is_quantity_set: impl Fn(u64) -> bool,
    ) -> Self {
        let mut links = ElementLinks::default();

        for rel in materials {
            links
                .materials
                .entry(rel.element_id)
                .or_default()
                .push(rel.material_id);
        }
        for rel in quantities {
            links
                .quantity_sets
                .entry(rel.element_id)
                .or_default()
                .push(rel.quantity_set_id);
        }
        for rel in properties {
            let target = if is_quantity_set(rel.property_set_id) {
                &mut links.quantity_sets
            } else {
                &mut links.property_sets
            };
            target
                .entry(rel.element_id)
                .or_default()
                .push(rel.property_set_id);
        }

        links
    }

    #[must_use]
    pub fn materials_of(&self, element_id: u64) -> &[u64] {
        self.materials.get(&element_id).map_or(&[][..], Vec::as_slice)
    }

    #[must_use]
    pub fn quantity_sets_of(&self, element_id: u64) -> &[u64] {
        self.quantity_sets.get(&element_id).map_or(&[][..], Vec::as_slice)
    }

    #[must_use]
    pub fn property_sets_of(&self, element_id: u64) -> &[u64] {
        self.property_sets.get(&element_id).map_or(&[][..], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn material_relation_fans_out_per_element() {
        let table = EntityTable::parse(
            "#50=IFCRELASSOCIATESMATERIAL('g',$,$,$,(#10,#11),#20);\n\
             #51=IFCRELASSOCIATESMATERIAL('g',$,$,(#12),#21);",
        );
        let relations = extract_material_relations(&table);

        assert_eq!(
            relations,
            vec![
                MaterialRelation { element_id: 10, material_id: 20 },
                MaterialRelation { element_id: 11, material_id: 20 },
            ]
        );
    }

    #[test]
    fn quantity_and_property_relations() {
        let table = EntityTable::parse(
            "#60=IFCRELDEFINESBYQUANTITY('g',$,$,$,(#10),#30);\n\
             #61=IFCRELDEFINESBYPROPERTIES('g',$,$,$,(#10,#11),#40);",
        );

        assert_eq!(
            extract_quantity_relations(&table),
            vec![QuantityRelation { element_id: 10, quantity_set_id: 30 }]
        );
        assert_eq!(extract_property_relations(&table).len(), 2);
    }

    #[test]
    fn quantity_sets_attached_as_properties_are_linked_as_quantities() {
        let properties = [
            PropertyRelation { element_id: 10, property_set_id: 30 },
            PropertyRelation { element_id: 10, property_set_id: 40 },
        ];
        let links = ElementLinks::build(&[], &[], &properties, |id| id == 30);

        assert_eq!(links.quantity_sets_of(10), &[30]);
        assert_eq!(links.property_sets_of(10), &[40]);
        assert!(links.materials_of(10).is_empty());
    }
}
