//! Fixed argument positions of the IFC entities the compressor reads.
//!
//! Each extractor names the fields it needs; the index comes from this one
//! table instead of being scattered through the extraction code.

use super::step::{parse_number, parse_ref, parse_ref_list, parse_string, RawEntity};

/// Named positional field of an IFC entity constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Material,
    Thickness,
    Layers,
    LayerSet,
    Materials,
    Fraction,
    Constituents,
    Quantities,
    QuantityValue,
    NominalValue,
    Properties,
    RelatedObjects,
    Relating,
}

type Layout = (&'static str, &'static [(Field, usize)]);

const LAYOUTS: &[Layout] = &[
    ("IFCMATERIAL", &[(Field::Name, 0)]),
    (
        "IFCMATERIALLAYER",
        &[(Field::Material, 0), (Field::Thickness, 1)],
    ),
    ("IFCMATERIALLAYERSET", &[(Field::Layers, 0)]),
    ("IFCMATERIALLAYERSETUSAGE", &[(Field::LayerSet, 0)]),
    ("IFCMATERIALLIST", &[(Field::Materials, 0)]),
    (
        "IFCMATERIALCONSTITUENT",
        &[(Field::Name, 0), (Field::Material, 2), (Field::Fraction, 3)],
    ),
    ("IFCMATERIALCONSTITUENTSET", &[(Field::Constituents, 2)]),
    (
        "IFCELEMENTQUANTITY",
        &[(Field::Name, 2), (Field::Quantities, 5)],
    ),
    (
        "IFCQUANTITYVOLUME",
        &[(Field::Name, 0), (Field::QuantityValue, 3)],
    ),
    (
        "IFCQUANTITYAREA",
        &[(Field::Name, 0), (Field::QuantityValue, 3)],
    ),
    (
        "IFCPROPERTYSINGLEVALUE",
        &[(Field::Name, 0), (Field::NominalValue, 2)],
    ),
    (
        "IFCPROPERTYSET",
        &[(Field::Name, 2), (Field::Properties, 4)],
    ),
    (
        "IFCRELASSOCIATESMATERIAL",
        &[(Field::RelatedObjects, 4), (Field::Relating, 5)],
    ),
    (
        "IFCRELDEFINESBYQUANTITY",
        &[(Field::RelatedObjects, 4), (Field::Relating, 5)],
    ),
    (
        "IFCRELDEFINESBYPROPERTIES",
        &[(Field::RelatedObjects, 4), (Field::Relating, 5)],
    ),
];

/// Argument index of `field` for the entity type `keyword`.
#[must_use]
pub fn field_index(keyword: &str, field: Field) -> Option<usize> {
    LAYOUTS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(keyword))
        .and_then(|(_, fields)| fields.iter().find(|(f, _)| *f == field))
        .map(|(_, index)| *index)
}

/// An entity with its arguments split once, read by field name.
#[derive(Debug)]
pub struct Decoded<'a> {
    pub id: u64,
    entity_type: &'a str,
    args: Vec<&'a str>,
}

impl<'a> Decoded<'a> {
    #[must_use]
    pub fn new(entity: &RawEntity<'a>) -> Self {
        Self {
            id: entity.id,
            entity_type: entity.entity_type,
            args: entity.fields(),
        }
    }

    #[must_use]
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Raw text of a field, if the layout knows it and the entity has it.
    #[must_use]
    pub fn raw(&self, field: Field) -> Option<&'a str> {
        field_index(self.entity_type, field).and_then(|i| self.args.get(i).copied())
    }

    #[must_use]
    pub fn string(&self, field: Field) -> Option<String> {
        self.raw(field).and_then(parse_string)
    }

    #[must_use]
    pub fn number(&self, field: Field) -> Option<f64> {
        self.raw(field).and_then(parse_number)
    }

    #[must_use]
    pub fn reference(&self, field: Field) -> Option<u64> {
        self.raw(field).and_then(parse_ref)
    }

    #[must_use]
    pub fn references(&self, field: Field) -> Vec<u64> {
        self.raw(field).map(parse_ref_list).unwrap_or_default()
    }
}
