//! Writes approved material names back into STEP text.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::parser::step::{decode_step_string, encode_step_string};
use crate::valuation::ReplacementMap;

// Keyword is case-insensitive; the quoted name is compared exactly later.
static MATERIAL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\bIFCMATERIAL\s*\(\s*)'((?:[^']|'')*)'").expect("valid material pattern")
});

/// Replaces the quoted name of every `IFCMATERIAL('<name>'` whose name is a
/// key of `replacements`. No other entity text is touched.
///
/// Names are compared after STEP string decoding, so a key `Dämmung` also
/// matches `'D\X2\00E4\X0\mmung'`; the replacement is written encoded.
#[must_use]
pub fn rewrite_material_names(text: &str, replacements: &ReplacementMap) -> String {
    if replacements.is_empty() {
        return text.to_string();
    }

    let mut rewritten = 0usize;
    let result = MATERIAL_NAME.replace_all(text, |caps: &Captures| {
        let name = decode_step_string(&caps[2]);
        match replacements.get(&name) {
            Some(replacement) => {
                rewritten += 1;
                format!("{}'{}'", &caps[1], encode_step_string(replacement))
            }
            None => caps[0].to_string(),
        }
    });

    tracing::info!(rewritten, "Rewrote material names");
    result.into_owned()
}
