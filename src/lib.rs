//! # IFC Compressor
//!
//! Compresses IFC building models into a per-material table of volume,
//! area, embodied CO2 and cost.
//!
//! ## Features
//!
//! - Parse IFC STEP text (IFC2x3 and IFC4 material entities)
//! - Accept pre-parsed compact JSON models and base64 data URIs
//! - Split element quantities over layer sets, constituent sets and lists
//! - Fuzzy-match material names against a reference database
//! - Rewrite approved material names back into the IFC file
//! - Review replacements in a terminal UI
//!
//! ## Example
//!
//! ```
//! use ifc_compressor::{compress, ReferenceDatabase};
//!
//! let ifc = "DATA;\n\
//!     #1=IFCSLAB('g',$,$,$,$,$,$,$);\n\
//!     #2=IFCMATERIAL('Gips');\n\
//!     #3=IFCRELASSOCIATESMATERIAL('r',$,$,$,(#1),#2);";
//! let table = compress(ifc, &ReferenceDatabase::defaults(), None);
//! assert_eq!(
//!     table,
//!     "Typ;Material;Volumen_m3;Flaeche_m2;Total_CO2;Total_Cost\nSlab;Gips;0;0;0;0"
//! );
//! ```

pub mod compact;
pub mod decompose;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod reference;
pub mod rewrite;
pub mod ui;
pub mod valuation;

pub use model::MaterialReplacement;
pub use pipeline::{
    compress, compress_all, compress_table, detect_input, suggest_replacements,
};
pub use reference::ReferenceDatabase;
pub use rewrite::rewrite_material_names;
pub use valuation::ReplacementMap;
