//! Fuzzy material name matching against the reference database.

use super::database::{ReferenceDatabase, ReferenceMaterial};
use crate::model::MaterialReplacement;

/// Lower-cases, drops everything from the first `(` on, and keeps only
/// alphanumeric characters: `"Beton (C25/30)"` becomes `"beton"`.
#[must_use]
pub fn normalize(name: &str) -> String {
    let head = name.find('(').map_or(name, |i| &name[..i]);
    head.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Equal, or one contains the other. Empty names never match.
#[must_use]
pub fn is_match(a: &str, b: &str) -> bool {
    let a = normalize(a);
    let b = normalize(b);
    normalized_match(&a, &b)
}

fn normalized_match(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a == b || a.contains(b) || b.contains(a))
}

/// Every matching database entry, in database order.
#[must_use]
pub fn match_materials<'d>(name: &str, db: &'d ReferenceDatabase) -> Vec<&'d ReferenceMaterial> {
    let query = normalize(name);
    db.iter()
        .filter(|entry| normalized_match(&query, &normalize(&entry.name)))
        .collect()
}

/// The first matching database entry.
#[must_use]
pub fn best_match<'d>(name: &str, db: &'d ReferenceDatabase) -> Option<&'d ReferenceMaterial> {
    let query = normalize(name);
    db.iter()
        .find(|entry| normalized_match(&query, &normalize(&entry.name)))
}

/// Suggestions for each name, proposing the first match as replacement.
#[must_use]
pub fn suggest(names: &[String], db: &ReferenceDatabase) -> Vec<MaterialReplacement> {
    names
        .iter()
        .map(|name| {
            let suggestions: Vec<String> = match_materials(name, db)
                .into_iter()
                .map(|entry| entry.name.clone())
                .collect();
            MaterialReplacement {
                original: name.clone(),
                replacement: suggestions.first().cloned(),
                suggestions,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalization() {
        assert_eq!(normalize("Beton (C25/30)"), "beton");
        assert_eq!(normalize("Stahlbeton C25/30"), "stahlbetonc2530");
        assert_eq!(normalize("Dämm-Stoff_035"), "dämmstoff035");
        assert_eq!(normalize("(nur Klammer)"), "");
    }

    #[test]
    fn matching_is_symmetric() {
        assert!(is_match("Beton (C25/30)", "beton"));
        assert!(is_match("beton", "Beton (C25/30)"));
        assert!(is_match("Beton", "Stahlbeton C25/30"));
        assert!(!is_match("Holz", "Beton"));
        assert!(!is_match("", "Beton"));
    }

    #[test]
    fn all_matches_in_database_order() {
        let db = ReferenceDatabase::defaults();
        let names: Vec<&str> = match_materials("Holz", &db)
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["Brettsperrholz (CLT)", "Konstruktionsvollholz (KVH)"]);

        assert_eq!(
            best_match("Beton", &db).map(|m| m.name.as_str()),
            Some("Stahlbeton C25/30")
        );
        assert!(match_materials("Kupfer", &db).is_empty());
    }

    #[test]
    fn suggestions_propose_first_match() {
        let db = ReferenceDatabase::defaults();
        let suggestions = suggest(&["Ziegel".to_string(), "Kupfer".to_string()], &db);

        assert_eq!(suggestions[0].replacement.as_deref(), Some("Ziegel"));
        assert_eq!(suggestions[0].suggestions, vec!["Ziegel"]);
        assert_eq!(suggestions[1].replacement, None);
        assert!(suggestions[1].suggestions.is_empty());
    }
}
