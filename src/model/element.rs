use super::material::MaterialShape;

/// Building element keywords worth decomposing, with their output type name.
pub const ELEMENT_KINDS: &[(&str, &str)] = &[
    ("IFCWALL", "Wall"),
    ("IFCWALLSTANDARDCASE", "Wall"),
    ("IFCSLAB", "Slab"),
    ("IFCBEAM", "Beam"),
    ("IFCCOLUMN", "Column"),
    ("IFCROOF", "Roof"),
    ("IFCDOOR", "Door"),
    ("IFCWINDOW", "Window"),
    ("IFCSTAIR", "Stair"),
    ("IFCSTAIRFLIGHT", "StairFlight"),
    ("IFCRAMP", "Ramp"),
    ("IFCRAILING", "Railing"),
    ("IFCCOVERING", "Covering"),
    ("IFCCURTAINWALL", "CurtainWall"),
    ("IFCPLATE", "Plate"),
    ("IFCMEMBER", "Member"),
    ("IFCFOOTING", "Footing"),
    ("IFCPILE", "Pile"),
    ("IFCBUILDINGELEMENTPROXY", "BuildingElementProxy"),
];

/// Output type name for a STEP keyword (`IFCWALL`) or schema name (`IfcWall`).
///
/// Unknown types keep their own spelling minus any `Ifc` prefix.
#[must_use]
pub fn element_type_name(entity_type: &str) -> String {
    if let Some((_, name)) = ELEMENT_KINDS
        .iter()
        .find(|(keyword, _)| keyword.eq_ignore_ascii_case(entity_type))
    {
        return (*name).to_string();
    }
    match entity_type.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("ifc") && entity_type.len() > 3 => {
            entity_type[3..].to_string()
        }
        _ => entity_type.to_string(),
    }
}

/// Whitelisted quantity names, matched by case-insensitive substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityKind {
    NetVolume,
    GrossVolume,
    Volume,
    NetArea,
    GrossArea,
    Area,
}

// Specific names first so "NetVolume" is not filed under "Volume".
const QUANTITY_PATTERNS: &[(&str, QuantityKind)] = &[
    ("netvolume", QuantityKind::NetVolume),
    ("grossvolume", QuantityKind::GrossVolume),
    ("volume", QuantityKind::Volume),
    ("netarea", QuantityKind::NetArea),
    ("grossarea", QuantityKind::GrossArea),
    ("area", QuantityKind::Area),
];

impl QuantityKind {
    #[must_use]
    pub fn classify(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        QUANTITY_PATTERNS
            .iter()
            .find(|(pattern, _)| lower.contains(pattern))
            .map(|(_, kind)| *kind)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Whitelisted quantities of one element; the first value per kind wins.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Quantities {
    values: [Option<f64>; 6],
}

impl Quantities {
    #[must_use]
    pub fn get(&self, kind: QuantityKind) -> Option<f64> {
        self.values[kind.slot()]
    }

    pub fn insert_first(&mut self, kind: QuantityKind, value: f64) {
        let slot = &mut self.values[kind.slot()];
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    /// Fills kinds still missing here from `other`.
    pub fn merge_missing(&mut self, other: &Quantities) {
        for (mine, theirs) in self.values.iter_mut().zip(other.values) {
            if mine.is_none() {
                *mine = theirs;
            }
        }
    }

    /// NetVolume, else GrossVolume, else Volume, else 0.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.get(QuantityKind::NetVolume)
            .or(self.get(QuantityKind::GrossVolume))
            .or(self.get(QuantityKind::Volume))
            .unwrap_or(0.0)
    }

    /// NetArea, else GrossArea, else Area, else 0.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.get(QuantityKind::NetArea)
            .or(self.get(QuantityKind::GrossArea))
            .or(self.get(QuantityKind::Area))
            .unwrap_or(0.0)
    }
}

/// A building element ready for decomposition, from either input path.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRecord {
    pub id: u64,
    /// Output type name, e.g. `Wall`.
    pub element_type: String,
    pub volume: f64,
    pub area: f64,
    /// Explicit GWP from the element's own property sets.
    pub gwp: Option<f64>,
    /// Number of material associations, resolved or not.
    pub material_relations: usize,
    pub shapes: Vec<MaterialShape>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn type_names() {
        assert_eq!(element_type_name("IFCWALL"), "Wall");
        assert_eq!(element_type_name("IFCWALLSTANDARDCASE"), "Wall");
        assert_eq!(element_type_name("IfcSlab"), "Slab");
        assert_eq!(element_type_name("IfcFurnishingElement"), "FurnishingElement");
        assert_eq!(element_type_name("Pipe"), "Pipe");
    }

    #[test]
    fn classification_prefers_specific_names() {
        assert_eq!(QuantityKind::classify("NetVolume"), Some(QuantityKind::NetVolume));
        assert_eq!(QuantityKind::classify("grossvolume"), Some(QuantityKind::GrossVolume));
        assert_eq!(QuantityKind::classify("Volume"), Some(QuantityKind::Volume));
        assert_eq!(QuantityKind::classify("NetSideArea"), Some(QuantityKind::Area));
        assert_eq!(QuantityKind::classify("Length"), None);
    }

    #[test]
    fn volume_falls_back_through_kinds() {
        let mut q = Quantities::default();
        assert_eq!(q.volume(), 0.0);
        q.insert_first(QuantityKind::Volume, 3.0);
        q.insert_first(QuantityKind::GrossVolume, 2.0);
        assert_eq!(q.volume(), 2.0);
        q.insert_first(QuantityKind::GrossVolume, 9.0);
        assert_eq!(q.get(QuantityKind::GrossVolume), Some(2.0));
    }

    #[test]
    fn merge_keeps_existing_values() {
        let mut a = Quantities::default();
        a.insert_first(QuantityKind::NetArea, 1.0);
        let mut b = Quantities::default();
        b.insert_first(QuantityKind::NetArea, 5.0);
        b.insert_first(QuantityKind::NetVolume, 4.0);

        a.merge_missing(&b);
        assert_eq!(a.area(), 1.0);
        assert_eq!(a.volume(), 4.0);
    }
}
