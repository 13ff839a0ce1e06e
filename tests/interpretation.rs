//! End-to-end interpretation tests over the bundled extraction pack.
//!
//! These exercise the full pipeline: bracketed tree → interpreter →
//! ranked meanings and wire queries, validating scoring, pruning,
//! relational composition, and the suggestion survey together.

use seshat::engine::{Engine, EngineConfig};
use seshat::interpret::Suggestion;
use seshat::typeset::TypeSet;

fn engine() -> Engine {
    Engine::new(EngineConfig::default()).unwrap()
}

/// Collect every namespace prefix appearing in a wire query, recursively.
fn collect_ns_prefixes(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, nested) in map {
                if let Some(rest) = key.strip_prefix("ns") {
                    if let Some((digits, _)) = rest.split_once(':') {
                        if digits.chars().all(|c| c.is_ascii_digit()) {
                            out.push(format!("ns{digits}"));
                        }
                    }
                }
                collect_ns_prefixes(nested, out);
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                collect_ns_prefixes(item, out);
            }
        }
        _ => {}
    }
}

#[test]
fn bare_literal_name_yields_exact_and_alias_readings() {
    let outcome = engine().interpret_sexpr("(DP Canada)").unwrap();

    assert!(outcome.meanings.len() >= 2);
    assert_eq!(outcome.meanings[0].fit, 1.0);
    assert!(outcome.meanings[1].fit < 1.0);
    assert!(outcome.meanings.iter().all(|m| m.fit > 0.0));

    let exact = outcome.meanings[0].fragment.to_wire().unwrap();
    assert_eq!(exact["name"], "Canada");
    let alias = outcome.meanings[1].fragment.to_wire().unwrap();
    assert_eq!(alias["/common/topic/alias"], "Canada");
}

#[test]
fn incompatible_adjective_and_noun_yield_zero_candidates() {
    // Countries never intersect cuisines, and restaurants never intersect
    // people, so no attachment rule accepts "Canadian restaurants".
    let outcome = engine()
        .interpret_sexpr("(NP (A Canadian) (NP (NBar (N restaurants))))")
        .unwrap();
    assert!(outcome.meanings.is_empty());
    assert!(!outcome.accuracy_cuts);
}

#[test]
fn compatible_adjective_attaches_through_rule_property() {
    let outcome = engine()
        .interpret_sexpr("(NP (A Canadian) (NP (NBar (N people))))")
        .unwrap();
    assert_eq!(outcome.meanings.len(), 1);

    let meaning = &outcome.meanings[0];
    assert!(meaning.types.contains(&"/people/person".into()));
    let wire = meaning.fragment.to_wire().unwrap();
    let nationality = &wire["/people/person/nationality"];
    assert!(nationality.is_array());
    assert_eq!(nationality[0]["mid"], "/m/0d060g");
}

#[test]
fn relational_author_of_written_work_nests_object_once() {
    let outcome = engine()
        .interpret_sexpr("(NBar (N author) (OF of) (DP (NP (NBar (N book)))))")
        .unwrap();

    // Exactly one composed fragment, nesting the object beneath the
    // authorship path, with fit equal to the object phrase's fit.
    assert_eq!(outcome.meanings.len(), 1);
    let meaning = &outcome.meanings[0];
    assert_eq!(meaning.fit, 1.0);
    assert_eq!(meaning.types, TypeSet::single("/book/author"));

    let wire = meaning.fragment.to_wire().unwrap();
    let works = &wire["/book/author/works_written"];
    assert!(works.is_array());
    assert_eq!(works[0]["type"], "/book/book");
}

#[test]
fn relational_noun_without_object_keeps_its_head() {
    let outcome = engine()
        .interpret_sexpr("(DP (NP (NBar (N authors))))")
        .unwrap();
    assert!(
        outcome
            .meanings
            .iter()
            .any(|m| m.head.as_deref() == Some("author"))
    );
}

#[test]
fn mayor_of_city_routes_through_office_template() {
    let outcome = engine()
        .interpret_sexpr("(NBar (N mayor) (OF of) (DP (NP (NBar (N city)))))")
        .unwrap();
    assert_eq!(outcome.meanings.len(), 1);
    let wire = outcome.meanings[0].fragment.to_wire().unwrap();
    let held = &wire["!/government/government_position_held/office_holder"];
    assert!(held.is_array());
    let title = &held[0]["/government/government_position_held/basic_title"];
    assert_eq!(title[0]["name"], "Mayor");
    let jurisdiction = &held[0]["/government/government_position_held/jurisdiction_of_office"];
    assert_eq!(jurisdiction[0]["type"], "/location/citytown");
}

#[test]
fn compound_merges_types_and_namespaces_the_modifier() {
    let outcome = engine()
        .interpret_sexpr("(NBar (N woman) (NBar (N authors)))")
        .unwrap();
    assert_eq!(outcome.meanings.len(), 1);

    let meaning = &outcome.meanings[0];
    assert!(meaning.types.contains(&"/people/person".into()));
    assert!(meaning.types.contains(&"/book/author".into()));
    // The relational head survives compounding.
    assert_eq!(meaning.head.as_deref(), Some("author"));

    let wire = meaning.fragment.to_wire().unwrap();
    let mut prefixes = Vec::new();
    collect_ns_prefixes(&wire, &mut prefixes);
    assert!(!prefixes.is_empty());
}

#[test]
fn preposition_composes_every_compatible_sense() {
    let outcome = engine()
        .interpret_sexpr("(NBar (NBar (N people)) (P from) (DP Canada))")
        .unwrap();

    // Two From senses over the exact and alias readings of the name.
    assert_eq!(outcome.meanings.len(), 4);
    let wires: Vec<serde_json::Value> = outcome
        .meanings
        .iter()
        .map(|m| m.fragment.to_wire().unwrap())
        .collect();
    let rendered = serde_json::to_string(&wires).unwrap();
    assert!(rendered.contains("/people/person/place_of_birth"));
    assert!(rendered.contains("/people/person/nationality"));
}

#[test]
fn multi_segment_paths_nest_one_level_per_segment() {
    let outcome = engine()
        .interpret_sexpr("(NBar (NBar (N songs)) (P on) (DP Thriller))")
        .unwrap();
    assert!(!outcome.meanings.is_empty());

    let wire = outcome.meanings[0].fragment.to_wire().unwrap();
    let tracks = wire
        .as_object()
        .unwrap()
        .iter()
        .find(|(k, _)| k.ends_with(":/music/recording/tracks"))
        .map(|(_, v)| v)
        .unwrap();
    let release = tracks[0]
        .as_object()
        .unwrap()
        .iter()
        .find(|(k, _)| k.ends_with(":/music/release_track/release"))
        .map(|(_, v)| v)
        .unwrap();
    let album = release[0]
        .as_object()
        .unwrap()
        .iter()
        .find(|(k, _)| k.ends_with(":/music/release/album"))
        .map(|(_, v)| v)
        .unwrap();
    assert_eq!(album[0]["name"], "Thriller");
}

#[test]
fn with_attaches_relational_object_inversely() {
    let outcome = engine()
        .interpret_sexpr("(NBar (NBar (N books)) (P with) (DP (NP (NBar (N authors)))))")
        .unwrap();
    assert!(!outcome.meanings.is_empty());
    let meaning = &outcome.meanings[0];
    assert!(meaning.types.contains(&"/book/written_work".into()));
    let wire = meaning.fragment.to_wire().unwrap();
    let author = &wire["/book/written_work/author"];
    assert!(author.is_array());
    assert_eq!(author[0]["type"], "/book/author");
}

#[test]
fn namespace_prefixes_are_pairwise_distinct_per_request() {
    let outcome = engine()
        .interpret_sexpr("(NBar (N woman) (NBar (NBar (N people)) (P from) (DP Canada)))")
        .unwrap();
    assert!(!outcome.meanings.is_empty());

    for meaning in &outcome.meanings {
        let wire = meaning.fragment.to_wire().unwrap();
        let mut prefixes = Vec::new();
        collect_ns_prefixes(&wire, &mut prefixes);
        let total = prefixes.len();
        prefixes.sort();
        prefixes.dedup();
        assert_eq!(prefixes.len(), total, "duplicate namespace in one query");
    }
}

#[test]
fn relation_marker_surveys_compatible_predicates() {
    let outcome = engine()
        .interpret_sexpr("(NBar (NBar (N books)) (P rel) (DP (NP (NBar (N people)))))")
        .unwrap();

    assert!(outcome.meanings.is_empty());
    assert!(outcome.suggestions.len() >= 3);

    // Descending fit, no duplicate rendered strings.
    for pair in outcome.suggestions.windows(2) {
        assert!(pair[0].fit >= pair[1].fit);
    }
    let mut rendered: Vec<String> = outcome
        .suggestions
        .iter()
        .map(Suggestion::rendered)
        .collect();
    let total = rendered.len();
    rendered.sort();
    rendered.dedup();
    assert_eq!(rendered.len(), total);

    // Labels come from the extracted display-name tables.
    assert!(
        outcome
            .suggestions
            .iter()
            .any(|s| s.rendered() == "written work 'by' author")
    );
}

#[test]
fn composition_fits_never_exceed_their_factors() {
    let outcome = engine()
        .interpret_sexpr("(NBar (N politician) (NBar (N writers)))")
        .unwrap();
    assert_eq!(outcome.meanings.len(), 1);
    // Politicians who write are rare; the composed fit reflects that and
    // stays strictly below either contributing reading's fit of 1.
    let fit = outcome.meanings[0].fit;
    assert!(fit > 0.0 && fit < 1.0);
}

#[test]
fn unknown_words_resolve_to_no_interpretation() {
    let outcome = engine()
        .interpret_sexpr("(DP (NP (NBar (N unicorns))))")
        .unwrap();
    assert!(outcome.meanings.is_empty());
    assert!(outcome.suggestions.is_empty());
}

#[test]
fn unsupported_shape_is_a_fatal_diagnostic() {
    let err = engine()
        .interpret_sexpr("(NP (Det the) (Det a))")
        .unwrap_err();
    let rendered = format!("{err}");
    assert!(rendered.contains("unsupported"), "got: {rendered}");
}

#[test]
fn fuzzy_names_stay_opt_in() {
    let outcome = engine().interpret_sexpr("(DP Canada)").unwrap();
    assert_eq!(outcome.meanings.len(), 2);

    let fuzzy_engine = Engine::new(EngineConfig {
        fuzzy_names: true,
        ..Default::default()
    })
    .unwrap();
    let outcome = fuzzy_engine.interpret_sexpr("(DP Canada)").unwrap();
    assert_eq!(outcome.meanings.len(), 4);
    let loosest = outcome.meanings.last().unwrap().fragment.to_wire().unwrap();
    assert!(loosest.get("/common/topic/alias~=").is_some());
}
