pub mod element;
pub mod material;
pub mod row;

pub use element::{element_type_name, ElementRecord, QuantityKind, Quantities, ELEMENT_KINDS};
pub use material::{
    ConstituentPart, LayerPart, Material, MaterialConstituent, MaterialConstituentSet,
    MaterialLayer, MaterialLayerSet, MaterialLayerSetUsage, MaterialList, MaterialShape,
};
pub use row::{DecompositionRow, MaterialReplacement, ValuedRow, NOT_DEFINED, UNKNOWN};
