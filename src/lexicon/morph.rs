//! English morphology helpers for lexicon construction.
//!
//! Lightweight rule-based pluralization — not a full NLP morphology engine.
//! Extraction packs can ask for automatic plural forms of nouns so that
//! "album" also registers "albums" without the extraction step shipping
//! both.

/// Pluralize an English noun.
///
/// Covers the regular patterns plus the irregulars that actually occur in
/// the extracted vocabulary. Multi-word nouns pluralize their last word.
pub fn plural_noun(noun: &str) -> String {
    if let Some(space) = noun.rfind(' ') {
        let (head, last) = noun.split_at(space + 1);
        return format!("{head}{}", plural_noun(last));
    }

    match noun {
        "person" => return "people".to_string(),
        "man" => return "men".to_string(),
        "woman" => return "women".to_string(),
        "child" => return "children".to_string(),
        "foot" => return "feet".to_string(),
        "series" | "species" | "fish" => return noun.to_string(),
        _ => {}
    }

    if let Some(stem) = noun.strip_suffix('y') {
        let before = stem.chars().next_back().unwrap_or('a');
        if !matches!(before, 'a' | 'e' | 'i' | 'o' | 'u') {
            return format!("{stem}ies");
        }
    }

    if noun.ends_with('s')
        || noun.ends_with('x')
        || noun.ends_with('z')
        || noun.ends_with("ch")
        || noun.ends_with("sh")
    {
        return format!("{noun}es");
    }

    if let Some(stem) = noun.strip_suffix("fe") {
        return format!("{stem}ves");
    }
    if let Some(stem) = noun.strip_suffix('f') {
        // "chief" and friends stay regular; the common -lf/-rf nouns don't.
        if stem.ends_with('l') || stem.ends_with('r') {
            return format!("{stem}ves");
        }
    }

    format!("{noun}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_plurals() {
        assert_eq!(plural_noun("album"), "albums");
        assert_eq!(plural_noun("author"), "authors");
        assert_eq!(plural_noun("place"), "places");
    }

    #[test]
    fn sibilant_plurals() {
        assert_eq!(plural_noun("actress"), "actresses");
        assert_eq!(plural_noun("church"), "churches");
        assert_eq!(plural_noun("box"), "boxes");
    }

    #[test]
    fn y_plurals() {
        assert_eq!(plural_noun("country"), "countries");
        assert_eq!(plural_noun("day"), "days");
    }

    #[test]
    fn irregular_plurals() {
        assert_eq!(plural_noun("person"), "people");
        assert_eq!(plural_noun("woman"), "women");
        assert_eq!(plural_noun("child"), "children");
        assert_eq!(plural_noun("series"), "series");
    }

    #[test]
    fn multiword_pluralizes_last_word() {
        assert_eq!(plural_noun("written work"), "written works");
        assert_eq!(plural_noun("fictional character"), "fictional characters");
    }
}
