//! Hand-authored lexicon overrides.
//!
//! Applied after all extraction packs, these add words the extraction cannot
//! see (relational nouns, nouns whose meaning goes beyond a bare type) and
//! extra senses of already-registered predicates. Overrides only append;
//! they never replace an extracted sense.

use crate::error::LexiconError;
use crate::query::Fragment;
use crate::typeset::TypeSet;

use super::predicate::{Lexicalization, PredicateSense};
use super::{AdjSense, AdjectiveRule, Lexicon, NounSense, RelationalNoun, WithAttachment};

/// Apply every override group to a lexicon under construction.
pub fn apply(lexicon: &mut Lexicon) -> Result<(), LexiconError> {
    add_nouns(lexicon);
    add_relational_nouns(lexicon);
    add_adjectives(lexicon);
    add_adjective_rules(lexicon);
    add_predicates(lexicon)?;
    Ok(())
}

/// Nouns beyond the extracted type tables: new words, and new senses of
/// existing words.
fn add_nouns(lexicon: &mut Lexicon) {
    let mut add = |word: &str, types: &[&str], plural: bool| {
        let senses: Vec<NounSense> = if types.is_empty() {
            vec![NounSense::untyped()]
        } else {
            types.iter().map(|ty| NounSense::typed(*ty)).collect()
        };
        for sense in senses {
            if plural {
                lexicon.add_noun_with_plural(word, sense);
            } else {
                lexicon.add_noun(word, sense);
            }
        }
    };

    add("actor", &["/film/actor", "/tv/actor"], true);
    add("album", &["/music/album"], true);
    add("anyone", &["/people/person"], false);
    add("anything", &[], false);
    add("anywhere", &["/location/location"], false);
    add("artist", &["/music/artist"], true);
    add("character", &["/fictional_universe/fictional_character"], true);
    add("director", &["/film/director"], true);
    add("place", &["/location/location"], true);
    add("thing", &[], true);
    add("recording", &["/music/recording"], true);
    add("release", &["/music/release"], true);
    add("someone", &["/people/person"], false);
    add("something", &[], false);
    add("somewhere", &["/location/location"], false);
    add("work", &["/visual_art/artwork"], true);

    // Nouns whose meaning carries a property constraint on top of a type.
    let man = NounSense::custom(
        TypeSet::single("/people/person"),
        Fragment::new()
            .with_null("mid")
            .with_null("name")
            .with_text("type", "/people/person")
            .with_nested(
                "/people/person/gender",
                Fragment::new().with_text("mid", "/m/05zppz"),
            ),
    );
    lexicon.add_noun("man", man.clone());
    lexicon.add_noun("men", man);

    let woman = NounSense::custom(
        TypeSet::single("/people/person"),
        Fragment::new()
            .with_null("mid")
            .with_null("name")
            .with_text("type", "/people/person")
            .with_nested(
                "/people/person/gender",
                Fragment::new().with_text("mid", "/m/02zsn"),
            ),
    );
    lexicon.add_noun("woman", woman.clone());
    lexicon.add_noun("women", woman);

    let novel = NounSense::custom(
        TypeSet::single("/book/book"),
        Fragment::new()
            .with_null("mid")
            .with_null("name")
            .with_text("type", "/book/book")
            .with_nested(
                "/book/book/genre",
                Fragment::new().with_text("mid", "/m/05hgj"),
            ),
    );
    lexicon.add_noun_with_plural("novel", novel);
}

/// Relational nouns: bare senses plus the attachment templates used by
/// `N of DP` and `NBar with DP`.
fn add_relational_nouns(lexicon: &mut Lexicon) {
    // author of <written work> / <written work> with author <person>
    let author = NounSense::custom(
        TypeSet::single("/book/author"),
        Fragment::new()
            .with_null("mid")
            .with_null("name")
            .with_text("type", "/book/author"),
    )
    .relational("author");
    lexicon.add_noun_with_plural("author", author);
    lexicon.add_relational(RelationalNoun {
        head: "author".into(),
        object_types: TypeSet::single("/book/written_work"),
        of_template: Fragment::new()
            .with_null("mid")
            .with_null("name")
            .with_hole("/book/author/works_written"),
        with_attachment: Some(WithAttachment {
            subject_types: TypeSet::single("/book/written_work"),
            object_types: TypeSet::single("/book/author"),
            result_types: TypeSet::single("/book/written_work"),
            attachment: Fragment::new().with_hole("/book/written_work/author"),
        }),
    });

    // child of <person> / <person> with child <person>
    let child =
        NounSense::custom(TypeSet::single("/people/person"), Fragment::new().with_null("mid").with_null("name"))
            .relational("child");
    for form in ["child", "children", "kid", "kids"] {
        lexicon.add_noun(form, child.clone());
    }
    lexicon.add_relational(RelationalNoun {
        head: "child".into(),
        object_types: TypeSet::single("/people/person"),
        of_template: Fragment::new()
            .with_null("mid")
            .with_null("name")
            .with_hole("!/people/person/children"),
        with_attachment: Some(WithAttachment {
            subject_types: TypeSet::single("/people/person"),
            object_types: TypeSet::single("/people/person"),
            result_types: TypeSet::single("/people/person"),
            attachment: Fragment::new().with_hole("/people/person/children"),
        }),
    });

    // mayor of <city> / <city> with mayor <politician>
    // A mayor is whoever holds an office titled "Mayor", so both templates
    // route through the office-holding mediator node.
    let position = "/government/government_position_held";
    let mayor = NounSense::custom(
        TypeSet::single("/government/politician"),
        Fragment::new()
            .with_null("mid")
            .with_null("name")
            .with_nested(
                format!("!{position}/office_holder"),
                Fragment::new()
                    .with_nested(
                        format!("{position}/jurisdiction_of_office"),
                        Fragment::new().with_null("name").with_null("mid"),
                    )
                    .with_nested(
                        format!("{position}/basic_title"),
                        Fragment::new().with_text("name", "Mayor"),
                    ),
            ),
    )
    .relational("mayor");
    lexicon.add_noun_with_plural("mayor", mayor);
    lexicon.add_relational(RelationalNoun {
        head: "mayor".into(),
        object_types: TypeSet::single("/location/citytown"),
        of_template: Fragment::new()
            .with_null("mid")
            .with_null("name")
            .with_nested(
                format!("!{position}/office_holder"),
                Fragment::new()
                    .with_hole(format!("{position}/jurisdiction_of_office"))
                    .with_nested(
                        format!("{position}/basic_title"),
                        Fragment::new().with_text("name", "Mayor"),
                    ),
            ),
        with_attachment: Some(WithAttachment {
            subject_types: TypeSet::single("/location/citytown"),
            object_types: TypeSet::single("/government/politician"),
            result_types: TypeSet::single("/location/citytown"),
            attachment: Fragment::new().with_nested(
                format!("!{position}/jurisdiction_of_office"),
                Fragment::new()
                    .with_hole(format!("{position}/office_holder"))
                    .with_nested(
                        format!("{position}/basic_title"),
                        Fragment::new().with_text("name", "Mayor"),
                    ),
            ),
        }),
    });
}

/// Adjectives beyond the extracted country tables.
fn add_adjectives(lexicon: &mut Lexicon) {
    lexicon.add_adjective("Mexican", AdjSense::entity("/dining/cuisine", "/m/051zk"));
    lexicon.add_adjective("female", AdjSense::entity("/people/gender", "/m/02zsn"));
    lexicon.add_adjective("male", AdjSense::entity("/people/gender", "/m/05zppz"));
}

/// Which attribute types modify which phrase types, and through which
/// property.
fn add_adjective_rules(lexicon: &mut Lexicon) {
    let rules = [
        (
            "/dining/cuisine",
            "/dining/restaurant",
            "/dining/restaurant",
            "/dining/restaurant/cuisine",
        ),
        (
            "/location/country",
            "/people/person",
            "/people/person",
            "/people/person/nationality",
        ),
        (
            "/people/ethnicity",
            "/people/person",
            "/people/person",
            "/people/person/ethnicity",
        ),
        (
            "/people/gender",
            "/people/person",
            "/people/person",
            "/people/person/gender",
        ),
        (
            "/fictional_universe/character_gender",
            "/fictional_universe/fictional_character",
            "/fictional_universe/fictional_character",
            "/fictional_universe/fictional_character/gender",
        ),
    ];
    for (attribute, phrase, result, property) in rules {
        lexicon.add_adjective_rule(AdjectiveRule {
            attribute_types: TypeSet::single(attribute),
            phrase_types: TypeSet::single(phrase),
            result_type: result.into(),
            property: property.into(),
        });
    }
}

/// Extra predicate surface forms and senses on top of the metaschema.
fn add_predicates(lexicon: &mut Lexicon) -> Result<(), LexiconError> {
    let preds = lexicon.predicates_mut();

    preds.add_sense(
        "CreatedBy",
        PredicateSense::new("/film/film", "/film/director", ["/film/film/directed_by"]),
    )?;
    preds.add_sense(
        "HasChild",
        PredicateSense::new(
            "/fictional_universe/fictional_character",
            "/fictional_universe/fictional_character",
            ["/fictional_universe/fictional_character/children"],
        ),
    )?;

    preds.add_lexicalization("RecordingOnAlbum", Lexicalization::prep("on"));
    preds.add_sense(
        "RecordingOnAlbum",
        PredicateSense::new(
            "/music/recording",
            "/music/album",
            [
                "/music/recording/tracks",
                "/music/release_track/release",
                "/music/release/album",
            ],
        ),
    )?;

    preds.add_lexicalization("BasedOn", Lexicalization::prep("based on"));
    preds.add_sense(
        "BasedOn",
        PredicateSense::new(
            "/fictional_universe/fictional_character",
            "/fictional_universe/person_in_fiction",
            ["/fictional_universe/fictional_character/based_on"],
        ),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::CompatibilityMatrix;
    use crate::lexicon::ExtractionPack;

    fn built_lexicon() -> Lexicon {
        let mut lexicon = Lexicon::new();
        let mut matrix = CompatibilityMatrix::new();
        ExtractionPack::bundled_base()
            .unwrap()
            .apply(&mut lexicon, &mut matrix)
            .unwrap();
        apply(&mut lexicon).unwrap();
        lexicon
    }

    #[test]
    fn relational_nouns_carry_heads() {
        let lexicon = built_lexicon();
        let senses = lexicon.noun_senses("author");
        assert!(senses.iter().any(|s| s.head.as_deref() == Some("author")));
        assert!(lexicon.relational("author").is_some());
        assert!(lexicon.relational("mayor").is_some());
    }

    #[test]
    fn relational_templates_have_open_holes() {
        let lexicon = built_lexicon();
        for head in ["author", "child", "mayor"] {
            let rel = lexicon.relational(head).unwrap();
            assert!(rel.of_template.has_hole(), "{head} of-template");
            let with = rel.with_attachment.as_ref().unwrap();
            assert!(with.attachment.has_hole(), "{head} with-attachment");
        }
    }

    #[test]
    fn kid_forms_share_the_child_sense() {
        let lexicon = built_lexicon();
        assert_eq!(lexicon.noun_senses("kid"), lexicon.noun_senses("children"));
    }

    #[test]
    fn override_senses_append_to_extracted_words() {
        let lexicon = built_lexicon();
        // "work" has the extracted written-work reading and the override
        // artwork reading.
        let senses = lexicon.noun_senses("work");
        assert!(senses.len() >= 2);
    }

    #[test]
    fn applying_overrides_twice_changes_nothing() {
        let mut lexicon = built_lexicon();
        let before = lexicon.noun_senses("author").len();
        apply(&mut lexicon).unwrap();
        assert_eq!(lexicon.noun_senses("author").len(), before);
    }

    #[test]
    fn predicate_overrides_extend_metaschema_predicates() {
        let lexicon = built_lexicon();
        let created_by = lexicon.predicates().get("CreatedBy").unwrap();
        assert!(
            created_by
                .senses
                .iter()
                .any(|s| s.subject.as_str() == "/film/film")
        );
        assert!(lexicon.predicates().get("BasedOn").unwrap().expressed_by("based on"));
    }
}
