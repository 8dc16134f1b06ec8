//! Top-level entry points: input detection, compression and suggestions.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

use crate::compact::CompactModel;
use crate::export::MaterialTable;
use crate::model::{ElementRecord, MaterialReplacement};
use crate::parser::{parse_step_elements, step_material_names};
use crate::reference::{suggest, ReferenceDatabase};
use crate::valuation::{value_elements, ReplacementMap};

static STEP_RECORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)#\d+\s*=\s*IFC").expect("valid record pattern"));

/// What an input turned out to be.
#[derive(Debug)]
pub enum DetectedInput<'a> {
    /// A JSON object with an `elements` array.
    Compact(CompactModel),
    /// ISO-10303-21 text.
    Step(Cow<'a, str>),
    Unrecognized,
}

/// Classifies an input, decoding a `data:` URI first.
#[must_use]
pub fn detect_input(input: &str) -> DetectedInput<'_> {
    let text: Cow<'_, str> = if input.starts_with("data:") {
        match decode_data_uri(input) {
            Some(decoded) => Cow::Owned(decoded),
            None => {
                tracing::warn!("Data URI payload is not valid base64");
                return DetectedInput::Unrecognized;
            }
        }
    } else {
        Cow::Borrowed(input)
    };

    let trimmed = text.trim_start();
    if trimmed.starts_with('{') {
        if let Ok(model) = serde_json::from_str::<CompactModel>(trimmed) {
            return DetectedInput::Compact(model);
        }
    }

    if text.contains("ISO-10303-21") || text.contains("DATA;") || STEP_RECORD.is_match(&text) {
        return DetectedInput::Step(text);
    }

    DetectedInput::Unrecognized
}

/// Base64 payload after the first comma, as (lossy) UTF-8 text.
fn decode_data_uri(input: &str) -> Option<String> {
    let (_, payload) = input.split_once(',')?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Building elements of a recognized input.
#[must_use]
pub fn input_elements(input: &DetectedInput) -> Vec<ElementRecord> {
    match input {
        DetectedInput::Compact(model) => model.to_elements(),
        DetectedInput::Step(text) => parse_step_elements(text),
        DetectedInput::Unrecognized => Vec::new(),
    }
}

/// Aggregated material table of an input.
///
/// Unrecognized input is returned unchanged, so callers can pass through
/// whatever they were given.
///
/// # Example
///
/// ```
/// use ifc_compressor::{compress, ReferenceDatabase};
///
/// let ifc = "DATA;\n#10=IFCWALL('g',$,$,$,$,$,$,$);\n#20=IFCMATERIAL('Ziegel');\n\
///            #30=IFCRELASSOCIATESMATERIAL('r',$,$,$,(#10),#20);";
/// let table = compress(ifc, &ReferenceDatabase::defaults(), None);
/// assert!(table.ends_with("Wall;Ziegel;0;0;0;0"));
/// ```
#[must_use]
pub fn compress(
    input: &str,
    db: &ReferenceDatabase,
    replacements: Option<&ReplacementMap>,
) -> String {
    match compress_table(input, db, replacements) {
        Some(table) => table.to_delimited(),
        None => input.to_string(),
    }
}

/// Like [`compress`], but returns the table itself, or `None` when the
/// input is not recognized.
#[must_use]
pub fn compress_table(
    input: &str,
    db: &ReferenceDatabase,
    replacements: Option<&ReplacementMap>,
) -> Option<MaterialTable> {
    let detected = detect_input(input);
    if matches!(detected, DetectedInput::Unrecognized) {
        tracing::warn!(
            input_len = input.len(),
            "Input is neither IFC STEP text nor a compact model, passing through"
        );
        return None;
    }

    let elements = input_elements(&detected);
    let rows = value_elements(&elements, db, replacements);
    let table: MaterialTable = rows.iter().collect();

    tracing::info!(
        elements = elements.len(),
        rows = rows.len(),
        groups = table.len(),
        replacements = replacements.map(ReplacementMap::len),
        "Compressed model"
    );
    Some(table)
}

/// One table over several models, e.g. the discipline files of a project.
///
/// Unrecognized inputs are skipped; the result is empty when none is
/// recognized.
#[must_use]
pub fn compress_all<'i, I>(
    inputs: I,
    db: &ReferenceDatabase,
    replacements: Option<&ReplacementMap>,
) -> MaterialTable
where
    I: IntoIterator<Item = &'i str>,
{
    let mut combined = MaterialTable::new();
    for table in inputs
        .into_iter()
        .filter_map(|input| compress_table(input, db, replacements))
    {
        combined.merge(table);
    }
    combined
}

/// Every distinct material name of an input with its fuzzy matches.
#[must_use]
pub fn suggest_replacements(input: &str, db: &ReferenceDatabase) -> Vec<MaterialReplacement> {
    let names = match detect_input(input) {
        DetectedInput::Compact(model) => model.material_names(),
        DetectedInput::Step(text) => step_material_names(&text),
        DetectedInput::Unrecognized => {
            tracing::warn!("Input is not recognized, no materials to suggest for");
            Vec::new()
        }
    };
    tracing::debug!(materials = names.len(), "Collected material names");
    suggest(&names, db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WALL: &str = "ISO-10303-21;\nDATA;\n\
        #10=IFCWALL('g',$,'W',$,$,$,$,$);\n\
        #20=IFCMATERIAL('Beton',$,$);\n\
        #30=IFCQUANTITYVOLUME('NetVolume',$,$,6.,$);\n\
        #31=IFCQUANTITYAREA('NetArea',$,$,3.,$);\n\
        #32=IFCELEMENTQUANTITY('q',$,'Qto',$,$,(#30,#31));\n\
        #40=IFCRELDEFINESBYPROPERTIES('r',$,$,$,(#10),#32);\n\
        #50=IFCRELASSOCIATESMATERIAL('r',$,$,$,(#10),#20);\n\
        ENDSEC;\nEND-ISO-10303-21;";

    #[test]
    fn detects_step_text() {
        assert!(matches!(detect_input(WALL), DetectedInput::Step(_)));
        assert!(matches!(detect_input("#1= IFCWALL()"), DetectedInput::Step(_)));
    }

    #[test]
    fn detects_compact_json() {
        let json = r#"{"elements":[{"type":"IfcWall"}]}"#;
        assert!(matches!(detect_input(json), DetectedInput::Compact(_)));
        assert!(matches!(detect_input(r#"{"other":1}"#), DetectedInput::Unrecognized));
    }

    #[test]
    fn decodes_data_uri_before_detection() {
        let uri = format!("data:application/octet-stream;base64,{}", STANDARD.encode(WALL));
        assert!(matches!(detect_input(&uri), DetectedInput::Step(_)));
        assert!(matches!(detect_input("data:text/plain;base64,%%%"), DetectedInput::Unrecognized));
    }

    #[test]
    fn unrecognized_input_passes_through() {
        let db = ReferenceDatabase::defaults();
        assert_eq!(compress("hello world", &db, None), "hello world");
    }

    #[test]
    fn step_wall_is_valued_from_best_match() {
        let db = ReferenceDatabase::defaults();
        assert_eq!(
            compress(WALL, &db, None),
            "Typ;Material;Volumen_m3;Flaeche_m2;Total_CO2;Total_Cost\nWall;Beton;6;3;1920;1680"
        );
    }

    #[test]
    fn several_models_merge_into_one_table() {
        let db = ReferenceDatabase::defaults();
        let json = r#"{"elements":[{"type":"IfcWall","volume":4.0,"area":1.0,
            "materials":[{"kind":"material","name":"Beton"}]}]}"#;
        let table = compress_all([WALL, "not a model", json], &db, None);

        assert_eq!(
            table.to_delimited(),
            "Typ;Material;Volumen_m3;Flaeche_m2;Total_CO2;Total_Cost\nWall;Beton;10;4;3200;2800"
        );
        assert!(compress_all(["nothing"], &db, None).is_empty());
    }

    #[test]
    fn suggestions_for_step_and_compact() {
        let db = ReferenceDatabase::defaults();
        let step = suggest_replacements(WALL, &db);
        assert_eq!(step.len(), 1);
        assert_eq!(step[0].original, "Beton");
        assert_eq!(step[0].suggestions, vec!["Stahlbeton C25/30"]);

        let json = r#"{"elements":[{"type":"IfcSlab","materials":[{"kind":"material","name":"Gips"}]}]}"#;
        let compact = suggest_replacements(json, &db);
        assert_eq!(compact[0].suggestions, vec!["Gipskarton"]);
    }
}
