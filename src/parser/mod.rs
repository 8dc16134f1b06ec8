pub mod extract;
pub mod ifc;
pub mod layout;
pub mod relations;
pub mod step;

pub use crate::error::ReadError;
pub use ifc::{parse_step_elements, read_ifc_file, step_material_names, MaterialCatalog};
pub use step::{split_args, EntityTable, RawEntity};
