use rustc_hash::FxHashMap;
use serde::Serialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::DatabaseError;

/// Where the optional reference file is looked up when none is given.
pub const DEFAULT_DATABASE_PATH: &str = "data/reference_materials.csv";

// name, GWP [kg CO2e/m³], price [EUR/m³]
const DEFAULT_MATERIALS: &[(&str, f64, f64)] = &[
    ("Stahlbeton C25/30", 320.0, 280.0),
    ("Mauerwerk Kalksandstein", 180.0, 220.0),
    ("Ziegel", 160.0, 250.0),
    ("Brettsperrholz (CLT)", 110.0, 950.0),
    ("Konstruktionsvollholz (KVH)", 90.0, 650.0),
    ("Baustahl S235", 11500.0, 9400.0),
    ("Mineralwolle", 45.0, 90.0),
    ("Floatglas", 3500.0, 2600.0),
    ("Gipskarton", 240.0, 310.0),
];

const PRICE_HEADERS: &[&str] = &["price", "preis", "kosten", "cost"];

/// One reference material. GWP and price are per cubic metre.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceMaterial {
    pub name: String,
    pub gwp_value: f64,
    pub price_per_m3: f64,
}

/// Reference materials keyed by name, in stable insertion order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDatabase {
    entries: Vec<ReferenceMaterial>,
    index: FxHashMap<String, usize>,
}

impl ReferenceDatabase {
    /// The built-in table alone.
    #[must_use]
    pub fn defaults() -> Self {
        let mut db = Self::default();
        for (name, gwp, price) in DEFAULT_MATERIALS {
            db.upsert(name, *gwp, Some(*price));
        }
        db
    }

    /// Defaults merged with the file at `path`, if it exists and is usable.
    ///
    /// A missing file is normal; an unreadable or malformed one is logged
    /// and the defaults are returned unchanged.
    #[must_use]
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let defaults = Self::defaults();

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No reference file, using defaults");
                return defaults;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Reference file unreadable, using defaults");
                return defaults;
            }
        };

        let mut db = defaults.clone();
        match db.merge_delimited(file) {
            Ok(merged) => {
                tracing::info!(path = %path.display(), merged, total = db.len(), "Loaded reference materials");
                db
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Reference file rejected, using defaults");
                defaults
            }
        }
    }

    /// Merges `;`-delimited rows whose header names a `name` and a `gwp`
    /// column. Returns the number of rows taken over.
    ///
    /// Fields are read as UTF-8 and fall back to Latin-1 per field, so a
    /// spreadsheet export with umlauts never rejects its neighbours.
    pub fn merge_delimited<R: Read>(&mut self, reader: R) -> Result<usize, DatabaseError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .byte_headers()?
            .iter()
            .map(|h| decode_field(h).to_lowercase())
            .collect();
        let find = |needles: &[&str]| {
            headers
                .iter()
                .position(|h| needles.iter().any(|n| h.contains(n)))
        };
        let name_col = find(&["name"]).ok_or(DatabaseError::MissingColumn { column: "name" })?;
        let gwp_col = find(&["gwp"]).ok_or(DatabaseError::MissingColumn { column: "gwp" })?;
        let price_col = find(PRICE_HEADERS);

        let mut merged = 0;
        for (line, record) in reader.byte_records().enumerate() {
            let record = record?;
            let field = |col: usize| record.get(col).map(decode_field);

            let name = field(name_col).unwrap_or_default();
            let Some(gwp) = field(gwp_col).as_deref().and_then(parse_decimal) else {
                tracing::debug!(line = line + 2, "Skipping reference row without GWP");
                continue;
            };
            if name.is_empty() {
                tracing::debug!(line = line + 2, "Skipping reference row without name");
                continue;
            }
            let price = price_col
                .and_then(field)
                .as_deref()
                .and_then(parse_decimal);
            self.upsert(&name, gwp, price);
            merged += 1;
        }

        Ok(merged)
    }

    /// Inserts or overwrites by name. An overwrite without a price keeps
    /// the previous one; a new entry without a price costs nothing.
    pub fn upsert(&mut self, name: &str, gwp_value: f64, price_per_m3: Option<f64>) {
        if let Some(&i) = self.index.get(name) {
            let entry = &mut self.entries[i];
            entry.gwp_value = gwp_value;
            if let Some(price) = price_per_m3 {
                entry.price_per_m3 = price;
            }
            return;
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push(ReferenceMaterial {
            name: name.to_string(),
            gwp_value,
            price_per_m3: price_per_m3.unwrap_or(0.0),
        });
    }

    /// Exact, case-sensitive lookup.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ReferenceMaterial> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceMaterial> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn decode_field(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().copied().map(char::from).collect()),
    }
}

/// Parses `12.5` as well as the decimal-comma form `12,5`.
fn parse_decimal(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.replace(',', ".").parse().ok()
}
