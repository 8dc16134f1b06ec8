//! Material records extracted from STEP entities, and the normalized
//! material shapes both input paths hand to the decomposition resolver.

/// `IFCMATERIAL`.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub id: u64,
    pub name: String,
}

/// `IFCMATERIALLAYER`.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialLayer {
    pub id: u64,
    pub material_id: Option<u64>,
    pub thickness: Option<f64>,
}

/// `IFCMATERIALLAYERSET`. Layer order is significant.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialLayerSet {
    pub id: u64,
    pub layer_ids: Vec<u64>,
}

/// `IFCMATERIALLAYERSETUSAGE`, an indirection to a layer set.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialLayerSetUsage {
    pub id: u64,
    pub layer_set_id: u64,
}

/// `IFCMATERIALLIST`.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialList {
    pub id: u64,
    pub material_ids: Vec<u64>,
}

/// `IFCMATERIALCONSTITUENT`. `fraction` lies in [0, 1] when present.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialConstituent {
    pub id: u64,
    pub material_id: Option<u64>,
    pub fraction: Option<f64>,
}

/// `IFCMATERIALCONSTITUENTSET`.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialConstituentSet {
    pub id: u64,
    pub constituent_ids: Vec<u64>,
}

/// One layer of a resolved layer set. `None` names are dangling references.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPart {
    pub name: Option<String>,
    pub thickness: Option<f64>,
}

/// One constituent of a resolved constituent set.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstituentPart {
    pub name: Option<String>,
    pub fraction: Option<f64>,
}

/// What a material association resolved to, independent of input format.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialShape {
    Single(String),
    List(Vec<Option<String>>),
    LayerSet(Vec<LayerPart>),
    ConstituentSet(Vec<ConstituentPart>),
}

impl MaterialShape {
    /// Higher wins when an element carries several associations.
    #[must_use]
    pub fn priority(&self) -> u8 {
        match self {
            MaterialShape::Single(_) => 0,
            MaterialShape::List(_) => 1,
            MaterialShape::LayerSet(_) => 2,
            MaterialShape::ConstituentSet(_) => 3,
        }
    }

    /// Every material name the shape mentions, dangling parts skipped.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        match self {
            MaterialShape::Single(name) => vec![name.as_str()],
            MaterialShape::List(names) => names.iter().flatten().map(String::as_str).collect(),
            MaterialShape::LayerSet(layers) => {
                layers.iter().filter_map(|l| l.name.as_deref()).collect()
            }
            MaterialShape::ConstituentSet(parts) => {
                parts.iter().filter_map(|c| c.name.as_deref()).collect()
            }
        }
    }
}
