//! The semantic interpreter: syntax trees to ranked candidate meanings.
//!
//! A recursive, synchronous walk over the parser's tree. Each production
//! handler interprets its children, crosses the (already pruned) candidate
//! sets, filters combinations by type compatibility, and composes query
//! fragments according to the production's template — allocating fresh
//! namespace prefixes wherever a composition could repeat a field name.
//! The ranker trims every handler's output, which is what keeps the
//! cross-products bounded on long phrases.
//!
//! All mutable state of a request — the namespace counter, the
//! pruned-candidates flag, and collected relation suggestions — lives on a
//! per-request [`Context`] threaded through the recursion, so concurrent
//! interpretations over the same shared lexicon and matrix cannot interfere.

pub mod meaning;
pub mod ranker;
pub mod suggest;

pub use meaning::TypedMeaning;
pub use suggest::Suggestion;

use crate::compat::CompatibilityMatrix;
use crate::error::InterpretError;
use crate::lexicon::Lexicon;
use crate::query::{Constraint, Fragment, MatchOp, Value};
use crate::syntax::{Cat, SynTree};
use crate::typeset::TypeSet;

use meaning::{ALIAS_FIT, EXACT_NAME_FIT, FUZZY_ALIAS_FIT, FUZZY_NAME_FIT};

/// The generic relation marker that triggers suggestion mode instead of a
/// concrete relation.
const RELATION_MARKER: &str = "rel";

/// Knobs of one interpretation run.
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// How many candidates survive each composition step (plus ties).
    pub accuracy: usize,
    /// Also mint whole-word name/alias match candidates for literal names.
    /// Loose by design — a word can match inside an unrelated longer name —
    /// so this stays opt-in.
    pub fuzzy_names: bool,
    /// Cap on reported relation suggestions (plus near-top ties).
    pub suggestion_limit: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            accuracy: 10,
            fuzzy_names: false,
            suggestion_limit: 20,
        }
    }
}

/// The outcome of one interpretation request.
#[derive(Debug, Clone)]
pub struct Interpretation {
    /// Surviving candidate meanings, best fit first. Empty when the phrase
    /// admits no type-consistent reading — a normal outcome, not an error.
    pub meanings: Vec<TypedMeaning>,
    /// Relation suggestions, present when the phrase used the generic
    /// relation marker.
    pub suggestions: Vec<Suggestion>,
    /// Whether the ranker dropped candidates anywhere in this request;
    /// re-running with a larger accuracy could then change the result.
    pub accuracy_cuts: bool,
}

/// Per-request mutable state, threaded through the recursion.
#[derive(Debug, Default)]
struct Context {
    next_ns: u32,
    made_cuts: bool,
    suggestions: Vec<Suggestion>,
}

impl Context {
    /// Mint a namespace prefix unique within this request.
    fn fresh_ns(&mut self) -> u32 {
        let ns = self.next_ns;
        self.next_ns += 1;
        ns
    }
}

/// The recursive interpreter. Borrows the shared read-only tables; all
/// per-request state lives in a [`Context`].
pub struct Interpreter<'a> {
    lexicon: &'a Lexicon,
    matrix: &'a CompatibilityMatrix,
    config: InterpreterConfig,
}

impl<'a> Interpreter<'a> {
    pub fn new(
        lexicon: &'a Lexicon,
        matrix: &'a CompatibilityMatrix,
        config: InterpreterConfig,
    ) -> Self {
        Self {
            lexicon,
            matrix,
            config,
        }
    }

    /// Interpret one syntax tree.
    pub fn interpret(&self, tree: &SynTree) -> Result<Interpretation, InterpretError> {
        let mut ctx = Context::default();
        let meanings = match tree.cat() {
            Some(Cat::Dp) => self.dp(tree, &mut ctx)?,
            Some(Cat::Np) => self.np(tree, &mut ctx)?,
            Some(Cat::NBar) => self.nbar(tree, &mut ctx)?,
            Some(Cat::Noun) => self.noun(tree)?,
            Some(Cat::Adj) => self.adjective(tree)?,
            Some(other) => {
                return Err(InterpretError::UnsupportedRoot {
                    shape: other.to_string(),
                });
            }
            None => {
                return Err(InterpretError::UnsupportedRoot {
                    shape: "<word>".to_string(),
                });
            }
        };
        let suggestions =
            suggest::finalize(std::mem::take(&mut ctx.suggestions), self.config.suggestion_limit);
        tracing::debug!(
            meanings = meanings.len(),
            suggestions = suggestions.len(),
            accuracy_cuts = ctx.made_cuts,
            "interpretation complete"
        );
        Ok(Interpretation {
            meanings,
            suggestions,
            accuracy_cuts: ctx.made_cuts,
        })
    }

    // -- determiner phrases -------------------------------------------------

    fn dp(&self, node: &SynTree, ctx: &mut Context) -> Result<Vec<TypedMeaning>, InterpretError> {
        let results = match node.children() {
            // Literal entity name.
            [SynTree::Word(name)] => self.literal_name(name),
            [np] if np.cat() == Some(Cat::Np) => self.np(np, ctx)?,
            // Determiners are semantically vacuous here.
            [det, np] if det.cat() == Some(Cat::Det) && np.cat() == Some(Cat::Np) => {
                self.np(np, ctx)?
            }
            [l, inner, r]
                if l.cat() == Some(Cat::LBracket)
                    && inner.cat() == Some(Cat::Dp)
                    && r.cat() == Some(Cat::RBracket) =>
            {
                self.dp(inner, ctx)?
            }
            _ => {
                return Err(InterpretError::UnsupportedProduction {
                    cat: Cat::Dp,
                    shape: node.child_shape(),
                });
            }
        };
        Ok(ranker::best(self.config.accuracy, results, &mut ctx.made_cuts))
    }

    /// Candidate readings of a literal name, in order of preference: exact
    /// name match, exact alias match, then (fuzzy mode only) whole-word
    /// containment in name and alias. Fixed, strictly decreasing fits let
    /// compatibility checks and ranking decide which reading survives.
    fn literal_name(&self, name: &str) -> Vec<TypedMeaning> {
        let mut results = vec![
            TypedMeaning::new(
                TypeSet::empty(),
                Fragment::new().with_null("mid").with_text("name", name),
            )
            .with_fit(EXACT_NAME_FIT),
            TypedMeaning::new(
                TypeSet::empty(),
                Fragment::new()
                    .with_null("mid")
                    .with_null("name")
                    .with_text("/common/topic/alias", name),
            )
            .with_fit(ALIAS_FIT),
        ];
        if self.config.fuzzy_names {
            let word_match = |field: &str| {
                let mut c = Constraint::new(field, Value::Text(name.to_string()));
                c.op = MatchOp::Word;
                c
            };
            results.push(
                TypedMeaning::new(
                    TypeSet::empty(),
                    Fragment::new()
                        .with_null("mid")
                        .with_null("name")
                        .with(word_match("name")),
                )
                .with_fit(FUZZY_NAME_FIT),
            );
            results.push(
                TypedMeaning::new(
                    TypeSet::empty(),
                    Fragment::new()
                        .with_null("mid")
                        .with_null("name")
                        .with(word_match("/common/topic/alias")),
                )
                .with_fit(FUZZY_ALIAS_FIT),
            );
        }
        results
    }

    // -- noun phrases -------------------------------------------------------

    fn np(&self, node: &SynTree, ctx: &mut Context) -> Result<Vec<TypedMeaning>, InterpretError> {
        let results = match node.children() {
            [nbar] if nbar.cat() == Some(Cat::NBar) => self.nbar(nbar, ctx)?,
            [l, inner, r]
                if l.cat() == Some(Cat::LBracket)
                    && inner.cat() == Some(Cat::Np)
                    && r.cat() == Some(Cat::RBracket) =>
            {
                self.np(inner, ctx)?
            }
            [a, np] if a.cat() == Some(Cat::Adj) && np.cat() == Some(Cat::Np) => {
                self.adjective_modifier(a, np, ctx)?
            }
            _ => {
                return Err(InterpretError::UnsupportedProduction {
                    cat: Cat::Np,
                    shape: node.child_shape(),
                });
            }
        };
        Ok(ranker::best(self.config.accuracy, results, &mut ctx.made_cuts))
    }

    /// `NP -> A NP`: attach an attribute entity to the phrase through every
    /// attachment rule whose types fit both sides.
    fn adjective_modifier(
        &self,
        a: &SynTree,
        np: &SynTree,
        ctx: &mut Context,
    ) -> Result<Vec<TypedMeaning>, InterpretError> {
        let a_meanings = self.adjective(a)?;
        let np_meanings = self.np(np, ctx)?;
        let mut results = Vec::new();
        for a_m in &a_meanings {
            for np_m in &np_meanings {
                for rule in self.lexicon.adjective_rules() {
                    let comp_a = self.matrix.compatible(&a_m.types, &rule.attribute_types);
                    let comp_np = self.matrix.compatible(&np_m.types, &rule.phrase_types);
                    if comp_a <= 0.0 || comp_np <= 0.0 {
                        continue;
                    }
                    let mut fragment = np_m.fragment.clone();
                    fragment.push(Constraint::new(
                        rule.property.clone(),
                        Value::Nested(a_m.fragment.clone()),
                    ));
                    results.push(TypedMeaning {
                        types: np_m.types.union(&TypeSet::single(rule.result_type.clone())),
                        fragment,
                        head: np_m.head.clone(),
                        fit: comp_np * np_m.fit * a_m.fit,
                    });
                }
            }
        }
        Ok(results)
    }

    // -- noun bars ----------------------------------------------------------

    fn nbar(&self, node: &SynTree, ctx: &mut Context) -> Result<Vec<TypedMeaning>, InterpretError> {
        let results = match node.children() {
            [n] if n.cat() == Some(Cat::Noun) => self.noun(n)?,
            [l, inner, r]
                if l.cat() == Some(Cat::LBracket)
                    && inner.cat() == Some(Cat::NBar)
                    && r.cat() == Some(Cat::RBracket) =>
            {
                self.nbar(inner, ctx)?
            }
            [n, nbar] if n.cat() == Some(Cat::Noun) && nbar.cat() == Some(Cat::NBar) => {
                self.compound(n, nbar, ctx)?
            }
            [n, of, dp]
                if n.cat() == Some(Cat::Noun)
                    && of.cat() == Some(Cat::Of)
                    && dp.cat() == Some(Cat::Dp) =>
            {
                self.relational_of(n, dp, ctx)?
            }
            [nbar, p, dp]
                if nbar.cat() == Some(Cat::NBar)
                    && p.cat() == Some(Cat::Prep)
                    && dp.cat() == Some(Cat::Dp) =>
            {
                self.preposition_modifier(nbar, p, dp, ctx)?
            }
            _ => {
                return Err(InterpretError::UnsupportedProduction {
                    cat: Cat::NBar,
                    shape: node.child_shape(),
                });
            }
        };
        Ok(ranker::best(self.config.accuracy, results, &mut ctx.made_cuts))
    }

    /// `NBar -> N NBar`: noun compounding ("woman authors"). The modifier
    /// noun's fragment drops its redundant `name`/`mid` request fields and
    /// namespaces its `type` so two sibling type constraints cannot collide.
    fn compound(
        &self,
        n: &SynTree,
        nbar: &SynTree,
        ctx: &mut Context,
    ) -> Result<Vec<TypedMeaning>, InterpretError> {
        let n_meanings = self.noun(n)?;
        let nbar_meanings = self.nbar(nbar, ctx)?;
        let mut results = Vec::new();
        for n_m in &n_meanings {
            let mut modifier = n_m.fragment.clone();
            modifier.strip_null_field("name");
            modifier.strip_null_field("mid");
            modifier.namespace_field("type", ctx.fresh_ns());
            for nbar_m in &nbar_meanings {
                let comp = self.matrix.compatible(&n_m.types, &nbar_m.types);
                if comp <= 0.0 {
                    continue;
                }
                let mut fragment = modifier.clone();
                fragment.merge(&nbar_m.fragment);
                results.push(TypedMeaning {
                    types: n_m.types.union(&nbar_m.types),
                    fragment,
                    head: nbar_m.head.clone(),
                    fit: comp * n_m.fit * nbar_m.fit,
                });
            }
        }
        Ok(results)
    }

    /// `NBar -> N OF DP`: a relational noun takes its object ("author of
    /// Hamlet"). Valid only for noun senses carrying a relational head with
    /// a registered template; the object fragment fills the template's hole.
    /// The relation itself is treated as certain, so the composed fit is the
    /// object's fit times the type-compatibility factor alone.
    fn relational_of(
        &self,
        n: &SynTree,
        dp: &SynTree,
        ctx: &mut Context,
    ) -> Result<Vec<TypedMeaning>, InterpretError> {
        let n_meanings = self.noun(n)?;
        let dp_meanings = self.dp(dp, ctx)?;
        let mut results = Vec::new();
        for n_m in &n_meanings {
            let Some(head) = &n_m.head else { continue };
            let Some(rel) = self.lexicon.relational(head) else {
                continue;
            };
            for dp_m in &dp_meanings {
                let comp_dp = self.matrix.compatible(&dp_m.types, &rel.object_types);
                if comp_dp <= 0.0 {
                    continue;
                }
                results.push(TypedMeaning {
                    types: n_m.types.clone(),
                    fragment: rel.of_template.fill(&dp_m.fragment),
                    head: None,
                    fit: comp_dp * dp_m.fit,
                });
            }
        }
        Ok(results)
    }

    /// `NBar -> NBar P DP`: prepositional modification ("people from
    /// Canada"), the generic relation marker (suggestion mode), and the
    /// inverse relational attachment ("books with author Tolkien").
    fn preposition_modifier(
        &self,
        nbar: &SynTree,
        p: &SynTree,
        dp: &SynTree,
        ctx: &mut Context,
    ) -> Result<Vec<TypedMeaning>, InterpretError> {
        let word = p
            .leaf_word()
            .ok_or(InterpretError::MissingWord { cat: Cat::Prep })?
            .to_string();
        let nbar_meanings = self.nbar(nbar, ctx)?;
        let dp_meanings = self.dp(dp, ctx)?;
        let suggest_mode = word.eq_ignore_ascii_case(RELATION_MARKER);

        let mut results = Vec::new();
        for nbar_m in &nbar_meanings {
            for dp_m in &dp_meanings {
                // Senses of every predicate this surface form can express.
                for (_key, predicate) in self.lexicon.predicates().iter() {
                    if !predicate.expressed_by(&word) {
                        continue;
                    }
                    for sense in &predicate.senses {
                        if let Some(m) = self.predicate_meaning(sense, nbar_m, dp_m, ctx) {
                            results.push(m);
                        }
                    }
                }

                // The generic marker surveys every sense of every predicate
                // and reports the compatible ones instead of interpreting.
                if suggest_mode {
                    for (_key, predicate) in self.lexicon.predicates().iter() {
                        for sense in &predicate.senses {
                            if let Some(m) = self.predicate_meaning(sense, nbar_m, dp_m, ctx) {
                                ctx.suggestions.push(suggest::from_sense(
                                    self.lexicon,
                                    predicate,
                                    sense,
                                    m.fit,
                                ));
                            }
                        }
                    }
                }

                // Inverse relational attachment: the object phrase is headed
                // by a relational noun ("... with author X").
                if word == "with" {
                    if let Some(m) = self.with_attachment(nbar_m, dp_m) {
                        results.push(m);
                    }
                }
            }
        }
        Ok(results)
    }

    /// Compose one predicate sense around a noun-bar and its object. The
    /// sense's subject type joins the noun-bar fragment under a fresh
    /// namespace; the object fragment nests under the property path, one
    /// structural level per segment.
    fn predicate_meaning(
        &self,
        sense: &crate::lexicon::PredicateSense,
        nbar_m: &TypedMeaning,
        dp_m: &TypedMeaning,
        ctx: &mut Context,
    ) -> Option<TypedMeaning> {
        let subject_set = TypeSet::single(sense.subject.clone());
        let object_set = TypeSet::single(sense.object.clone());
        let comp_nbar = self.matrix.compatible(&nbar_m.types, &subject_set);
        let comp_dp = self.matrix.compatible(&dp_m.types, &object_set);
        if comp_nbar <= 0.0 || comp_dp <= 0.0 {
            return None;
        }

        let mut fragment = nbar_m.fragment.clone();
        let mut type_constraint =
            Constraint::new("type", Value::Text(sense.subject.as_str().to_string()));
        type_constraint.ns = Some(ctx.fresh_ns());
        fragment.push(type_constraint);

        let path_ns = ctx.fresh_ns();
        if sense.path.is_empty() {
            fragment.merge(&dp_m.fragment);
        } else {
            let mut inner = dp_m.fragment.clone();
            for property in sense.path.iter().rev() {
                let mut c = Constraint::new(property.clone(), Value::Nested(inner));
                c.ns = Some(path_ns);
                inner = Fragment::new().with(c);
            }
            fragment.merge(&inner);
        }

        Some(TypedMeaning {
            types: subject_set.union(&nbar_m.types),
            fragment,
            head: nbar_m.head.clone(),
            fit: comp_nbar * comp_dp * nbar_m.fit * dp_m.fit,
        })
    }

    fn with_attachment(&self, nbar_m: &TypedMeaning, dp_m: &TypedMeaning) -> Option<TypedMeaning> {
        let head = dp_m.head.as_deref()?;
        let rel = self.lexicon.relational(head)?;
        let with = rel.with_attachment.as_ref()?;

        let comp_nbar = self.matrix.compatible(&nbar_m.types, &with.subject_types);
        let comp_dp = self.matrix.compatible(&dp_m.types, &with.object_types);
        if comp_nbar <= 0.0 || comp_dp <= 0.0 {
            return None;
        }

        let mut fragment = nbar_m.fragment.clone();
        fragment.merge(&with.attachment.fill(&dp_m.fragment));
        Some(TypedMeaning {
            types: with.result_types.union(&nbar_m.types),
            fragment,
            head: nbar_m.head.clone(),
            fit: comp_nbar * comp_dp * nbar_m.fit * dp_m.fit,
        })
    }

    // -- terminals ----------------------------------------------------------

    /// `N -> word`: every lexicon sense of the noun becomes one candidate.
    /// Unknown nouns have no senses and therefore no candidates.
    fn noun(&self, node: &SynTree) -> Result<Vec<TypedMeaning>, InterpretError> {
        let word = node
            .leaf_word()
            .ok_or(InterpretError::MissingWord { cat: Cat::Noun })?;
        Ok(self
            .lexicon
            .noun_senses(word)
            .iter()
            .map(|sense| {
                TypedMeaning::new(sense.types.clone(), sense.base.clone())
                    .with_head(sense.head.clone())
            })
            .collect())
    }

    /// `A -> word`: each adjective sense references a fixed entity.
    fn adjective(&self, node: &SynTree) -> Result<Vec<TypedMeaning>, InterpretError> {
        let word = node
            .leaf_word()
            .ok_or(InterpretError::MissingWord { cat: Cat::Adj })?;
        Ok(self
            .lexicon
            .adjective_senses(word)
            .iter()
            .map(|sense| TypedMeaning::new(sense.types.clone(), sense.reference.clone()))
            .collect())
    }
}
