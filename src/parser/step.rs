//! Zero-copy STEP entity scanning and positional argument decoding.

use memchr::memchr;
use regex::Regex;
use rustc_hash::FxHashMap;
use std::sync::LazyLock;

static REF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\d+)").expect("valid reference pattern"));

static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-?[0-9]+(?:\.[0-9]*)?(?:[Ee][+-]?[0-9]+)?").expect("valid number pattern")
});

/// One `#id=TYPE(args);` record, borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEntity<'a> {
    pub id: u64,
    pub entity_type: &'a str,
    /// Text between the outermost parentheses.
    pub args: &'a str,
}

impl<'a> RawEntity<'a> {
    /// Splits the argument text into top-level fields.
    #[must_use]
    pub fn fields(&self) -> Vec<&'a str> {
        split_args(self.args)
    }
}

/// Every entity of a STEP file keyed by id, with a per-type index.
#[derive(Debug, Default)]
pub struct EntityTable<'a> {
    entities: FxHashMap<u64, RawEntity<'a>>,
    by_type: FxHashMap<String, Vec<u64>>,
}

impl<'a> EntityTable<'a> {
    /// Scans `content` once, left to right, collecting every well-formed
    /// entity. Stray `#` characters and unterminated records are skipped.
    #[must_use]
    pub fn parse(content: &'a str) -> Self {
        let bytes = content.as_bytes();
        let mut table = EntityTable::default();
        let mut pos = 0;

        while let Some(offset) = memchr(b'#', &bytes[pos..]) {
            let start = pos + offset;
            let Some(header) = match_header(bytes, start) else {
                pos = start + 1;
                continue;
            };
            match find_close(bytes, header.open) {
                Some(close) => {
                    table.insert(RawEntity {
                        id: header.id,
                        entity_type: &content[header.type_start..header.type_end],
                        args: &content[header.open + 1..close],
                    });
                    pos = close + 1;
                }
                None => pos = start + 1,
            }
        }

        for ids in table.by_type.values_mut() {
            ids.sort_unstable();
        }

        tracing::debug!(
            entities = table.entities.len(),
            types = table.by_type.len(),
            "Built entity table"
        );
        table
    }

    fn insert(&mut self, entity: RawEntity<'a>) {
        let key = entity.entity_type.to_ascii_uppercase();
        if let Some(previous) = self.entities.insert(entity.id, entity) {
            // Later duplicates win; drop the stale index entry.
            if let Some(ids) = self
                .by_type
                .get_mut(&previous.entity_type.to_ascii_uppercase())
            {
                ids.retain(|id| *id != previous.id);
            }
        }
        self.by_type.entry(key).or_default().push(entity.id);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<&RawEntity<'a>> {
        self.entities.get(&id)
    }

    /// Entities whose type equals `keyword` case-insensitively, in id order.
    pub fn of_type<'t>(&'t self, keyword: &str) -> impl Iterator<Item = &'t RawEntity<'a>> + 't {
        self.by_type
            .get(&keyword.to_ascii_uppercase())
            .into_iter()
            .flatten()
            .filter_map(|id| self.entities.get(id))
    }
}

struct Header {
    id: u64,
    type_start: usize,
    type_end: usize,
    open: usize,
}

/// Matches `#<digits>=<TYPE>(` at `start`, tolerating blanks around `=`.
fn match_header(bytes: &[u8], start: usize) -> Option<Header> {
    let mut i = start + 1;
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits_start {
        return None;
    }
    let id = std::str::from_utf8(&bytes[digits_start..i])
        .ok()?
        .parse()
        .ok()?;

    i = skip_blanks(bytes, i);
    if bytes.get(i) != Some(&b'=') {
        return None;
    }
    i = skip_blanks(bytes, i + 1);

    let type_start = i;
    if !bytes.get(i).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    let type_end = i;

    i = skip_blanks(bytes, i);
    if bytes.get(i) != Some(&b'(') {
        return None;
    }

    Some(Header {
        id,
        type_start,
        type_end,
        open: i,
    })
}

fn skip_blanks(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Finds the paren closing the one at `open`, ignoring quoted text.
///
/// Gives up at the start of the next record, so an unterminated entity
/// never scans past its neighbour.
fn find_close(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            // '' escapes toggle twice and cancel out
            b'\'' => in_string = !in_string,
            b'(' if !in_string => depth += 1,
            b')' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            b';' if starts_next_record(bytes, i + 1) => return None,
            _ => {}
        }
    }

    None
}

/// A line break followed by `#<digits>=<TYPE>(`.
fn starts_next_record(bytes: &[u8], from: usize) -> bool {
    let next = skip_blanks(bytes, from);
    bytes[from..next].contains(&b'\n')
        && bytes.get(next) == Some(&b'#')
        && match_header(bytes, next).is_some()
}

/// Splits an argument list on top-level commas.
///
/// Quoted strings and nested parentheses are kept intact; a quote preceded
/// by a backslash does not end a string. Fields are trimmed but otherwise
/// verbatim. Malformed input degrades to a best-effort split.
#[must_use]
pub fn split_args(s: &str) -> Vec<&str> {
    if s.trim().is_empty() {
        return Vec::new();
    }

    let bytes = s.as_bytes();
    let mut fields = Vec::new();
    let mut in_string = false;
    let mut depth = 0i32;
    let mut field_start = 0;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'\'' if i == 0 || bytes[i - 1] != b'\\' => in_string = !in_string,
            b'(' if !in_string => depth += 1,
            b')' if !in_string => depth -= 1,
            b',' if !in_string && depth == 0 => {
                fields.push(s[field_start..i].trim());
                field_start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(s[field_start..].trim());

    fields
}

/// First `#digits` reference in a field.
#[must_use]
pub fn parse_ref(field: &str) -> Option<u64> {
    REF_PATTERN
        .captures(field)
        .and_then(|caps| caps[1].parse().ok())
}

/// Every `#digits` reference in a field, in order.
#[must_use]
pub fn parse_ref_list(field: &str) -> Vec<u64> {
    REF_PATTERN
        .captures_iter(field)
        .filter_map(|caps| caps[1].parse().ok())
        .collect()
}

/// First number in a field, bare (`0.25`) or wrapped (`IFCREAL(2.5E-1)`).
#[must_use]
pub fn parse_number(field: &str) -> Option<f64> {
    NUMBER_PATTERN
        .find(field)
        .and_then(|m| m.as_str().parse().ok())
}

/// Decodes a quoted STEP string field; `None` for `$` and other non-strings.
#[must_use]
pub fn parse_string(field: &str) -> Option<String> {
    let field = field.trim();
    if field.len() >= 2 && field.starts_with('\'') && field.ends_with('\'') {
        Some(decode_step_string(&field[1..field.len() - 1]))
    } else {
        None
    }
}

/// Decode STEP/IFC encoded strings with Unicode escape sequences.
/// Supports:
/// - `\X2\XXXX\X0\` - 2-byte Unicode (BMP), can have multiple 4-char hex codes
/// - `\X4\XXXXXXXX\X0\` - 4-byte Unicode
/// - `\X\XX` - 1-byte ISO 8859-1
/// - `\S\X` - high-bit shift
/// - `\\` - escaped backslash
/// - `''` - escaped apostrophe
#[must_use]
pub fn decode_step_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.peek() {
                Some('X') => {
                    chars.next(); // consume 'X'
                    match chars.peek().copied() {
                        Some(width @ ('2' | '4')) => {
                            chars.next(); // consume width
                            chars.next(); // consume '\'

                            let mut hex = String::new();
                            while let Some(&c) = chars.peek() {
                                if c == '\\' {
                                    break;
                                }
                                hex.push(c);
                                chars.next();
                            }
                            // Skip \X0\
                            if chars.peek() == Some(&'\\') {
                                for _ in 0..4 {
                                    chars.next();
                                }
                            }
                            let chunk_len = if width == '2' { 4 } else { 8 };
                            for chunk in hex.as_bytes().chunks(chunk_len) {
                                let decoded = std::str::from_utf8(chunk)
                                    .ok()
                                    .and_then(|s| u32::from_str_radix(s, 16).ok())
                                    .and_then(char::from_u32);
                                if let Some(c) = decoded {
                                    result.push(c);
                                }
                            }
                        }
                        Some('\\') => {
                            // \X\ followed by 2 hex digits - ISO 8859-1
                            chars.next(); // consume '\'
                            let mut hex = String::new();
                            for _ in 0..2 {
                                if let Some(&c) = chars.peek() {
                                    hex.push(c);
                                    chars.next();
                                }
                            }
                            if let Ok(code) = u8::from_str_radix(&hex, 16) {
                                result.push(char::from(code));
                            }
                        }
                        _ => {
                            result.push('\\');
                            result.push('X');
                        }
                    }
                }
                Some('\\') => {
                    chars.next();
                    result.push('\\');
                }
                Some('S') => {
                    chars.next(); // 'S'
                    chars.next(); // '\'
                    if let Some(c) = chars.next() {
                        if let Some(shifted) = char::from_u32(u32::from(c) + 128) {
                            result.push(shifted);
                        }
                    }
                }
                _ => result.push('\\'),
            }
        } else if ch == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
            }
            result.push('\'');
        } else {
            result.push(ch);
        }
    }

    result
}

/// Inverse of [`decode_step_string`], without the surrounding quotes.
#[must_use]
pub fn encode_step_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for ch in s.chars() {
        match ch {
            '\'' => result.push_str("''"),
            '\\' => result.push_str("\\\\"),
            c if c.is_ascii() => result.push(c),
            c if u32::from(c) <= 0xFFFF => {
                result.push_str(&format!("\\X2\\{:04X}\\X0\\", u32::from(c)));
            }
            c => result.push_str(&format!("\\X4\\{:08X}\\X0\\", u32::from(c))),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn split_respects_quotes_and_parens() {
        assert_eq!(split_args("'a, b', (c,d), e"), vec!["'a, b'", "(c,d)", "e"]);
    }

    #[test]
    fn split_counts_top_level_commas() {
        let fields = split_args("'x',$,(#1,#2,(#3,#4)),IFCLABEL('y,z'),.T.");
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[2], "(#1,#2,(#3,#4))");
        assert_eq!(fields[3], "IFCLABEL('y,z')");
    }

    #[test]
    fn split_keeps_backslash_escaped_quote_inside_string() {
        assert_eq!(split_args(r"'it\'s, fine',1"), vec![r"'it\'s, fine'", "1"]);
    }

    #[test]
    fn split_empty_has_no_fields() {
        assert!(split_args("  ").is_empty());
    }

    #[test]
    fn table_collects_every_record() {
        let text = "ISO-10303-21;\nDATA;\n\
            #1=IFCMATERIAL('Beton',$,$);\n\
            #2 = IFCMATERIALLAYER(#1,0.2,$);\n\
            #30=IFCMATERIALLIST((#1));\n\
            ENDSEC;";
        let table = EntityTable::parse(text);

        assert_eq!(table.len(), 3);
        let layer = table.get(2).expect("layer");
        assert_eq!(layer.entity_type, "IFCMATERIALLAYER");
        assert_eq!(layer.args, "#1,0.2,$");
        assert_eq!(table.get(30).map(|e| e.args), Some("(#1)"));
    }

    #[test]
    fn table_ignores_parens_in_strings_and_stray_hashes() {
        let text = "/* #not an entity */\n#5=IFCWALL('g',$,'Wall (north) #x',$);\n#6=IFCSLAB('a');";
        let table = EntityTable::parse(text);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(5).map(|e| e.args), Some("'g',$,'Wall (north) #x',$"));
    }

    #[test]
    fn table_skips_unterminated_entity() {
        let table = EntityTable::parse("#1=IFCMATERIAL('A');\n#2=IFCMATERIAL('B'");
        assert_eq!(table.len(), 1);
        assert!(table.get(2).is_none());
    }

    #[test]
    fn unterminated_entity_stops_at_next_record() {
        let text = "#1=IFCMATERIAL('A;\n#2=IFCMATERIAL('B');\n#3=IFCWALL((#2;\n#4=IFCMATERIAL('C');";
        let table = EntityTable::parse(text);

        let ids: Vec<u64> = table.of_type("IFCMATERIAL").map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 4]);
        assert!(table.get(1).is_none());
        assert!(table.get(3).is_none());
    }

    #[test]
    fn semicolons_inside_strings_do_not_end_a_record() {
        let table = EntityTable::parse("#1=IFCMATERIAL('Putz; innen',$,$);\n#2=IFCMATERIAL('B');");
        assert_eq!(table.get(1).map(|e| e.args), Some("'Putz; innen',$,$"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn of_type_is_case_insensitive_and_ordered() {
        let table = EntityTable::parse("#9=IfcMaterial('C');#3=IFCMATERIAL('A');#4=IFCWALL();");
        let ids: Vec<u64> = table.of_type("ifcmaterial").map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 9]);
    }

    #[test]
    fn numbers_bare_or_wrapped() {
        assert_eq!(parse_number("0.25"), Some(0.25));
        assert_eq!(parse_number("IFCVOLUMEMEASURE(6.)"), Some(6.0));
        assert_eq!(parse_number("IFCREAL(2.5E-1)"), Some(0.25));
        assert_eq!(parse_number("-12.5"), Some(-12.5));
        assert_eq!(parse_number("$"), None);
    }

    #[test]
    fn references() {
        assert_eq!(parse_ref("#42"), Some(42));
        assert_eq!(parse_ref("$"), None);
        assert_eq!(parse_ref_list("(#1, #22,#333)"), vec![1, 22, 333]);
    }

    #[test]
    fn strings_decode_escapes() {
        assert_eq!(parse_string("'Beton'"), Some("Beton".to_string()));
        assert_eq!(parse_string("'O''Neil'"), Some("O'Neil".to_string()));
        assert_eq!(
            parse_string(r"'D\X2\00E4\X0\mmung'"),
            Some("Dämmung".to_string())
        );
        assert_eq!(parse_string("$"), None);
    }

    #[test]
    fn encoding_reverses_decoding() {
        let name = "Dämmung 'WLG 035' \\ 🌲";
        assert_eq!(decode_step_string(&encode_step_string(name)), name);
    }
}
