//! Structured query fragments.
//!
//! A [`Fragment`] is the composable query piece attached to every candidate
//! meaning: an ordered list of field constraints, each pairing a field
//! identifier (optionally namespace-prefixed, optionally traversed in
//! reverse) with a value — null, literal text, or a nested fragment.
//!
//! Fragments are an explicit tree, never spliced strings. The backend's
//! MQL-style JSON dialect (`"ns3:type"`, `"!/people/person/children"`,
//! `"name~="`, single-element-array nesting) is rendered only at the
//! boundary by [`Fragment::to_wire`].
//!
//! Lexicon templates for relational nouns carry a [`Value::Hole`] where the
//! object phrase's fragment will be substituted; a hole surviving to wire
//! serialization is a data error, not a silently empty query.

use std::fmt;

use crate::error::QueryError;

/// How a literal field constraint matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOp {
    /// Exact field equality.
    Exact,
    /// Whole-word containment (the backend's `~=` operator). Only minted by
    /// the fuzzy name-matching mode.
    Word,
}

/// The value side of a constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Request the field without constraining it (`null` on the wire).
    Null,
    /// A literal string: an entity name, identifier, or type id.
    Text(String),
    /// A nested sub-query, rendered as a single-element object array.
    Nested(Fragment),
    /// An open template slot awaiting an object fragment.
    Hole,
}

/// One field constraint inside a fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Namespace prefix minted by the interpreter to keep repeated field
    /// names distinct within one composed query.
    pub ns: Option<u32>,
    /// Traverse the property from object to subject (`!` on the wire).
    pub reversed: bool,
    pub field: String,
    pub op: MatchOp,
    pub value: Value,
}

impl Constraint {
    /// A plain `field: value` constraint. A leading `!` on the field is
    /// parsed as the reversed-traversal marker.
    pub fn new(field: impl Into<String>, value: Value) -> Self {
        let field = field.into();
        let (reversed, field) = match field.strip_prefix('!') {
            Some(rest) => (true, rest.to_string()),
            None => (false, field),
        };
        Self {
            ns: None,
            reversed,
            field,
            op: MatchOp::Exact,
            value,
        }
    }

    fn wire_key(&self) -> String {
        let mut key = String::new();
        if let Some(ns) = self.ns {
            key.push_str(&format!("ns{ns}:"));
        }
        if self.reversed {
            key.push('!');
        }
        key.push_str(&self.field);
        if self.op == MatchOp::Word {
            key.push_str("~=");
        }
        key
    }
}

/// An ordered, composable set of field constraints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    constraints: Vec<Constraint>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a constraint, builder-style.
    pub fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Append `field: null`.
    pub fn with_null(self, field: impl Into<String>) -> Self {
        self.with(Constraint::new(field, Value::Null))
    }

    /// Append `field: "text"`.
    pub fn with_text(self, field: impl Into<String>, text: impl Into<String>) -> Self {
        self.with(Constraint::new(field, Value::Text(text.into())))
    }

    /// Append `field: [{ nested }]`.
    pub fn with_nested(self, field: impl Into<String>, nested: Fragment) -> Self {
        self.with(Constraint::new(field, Value::Nested(nested)))
    }

    /// Append an open template slot under `field`.
    pub fn with_hole(self, field: impl Into<String>) -> Self {
        self.with(Constraint::new(field, Value::Hole))
    }

    pub fn push(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Append all of `other`'s constraints after this fragment's own.
    pub fn merge(&mut self, other: &Fragment) {
        self.constraints.extend(other.constraints.iter().cloned());
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Drop top-level `field: null` constraints with the given name.
    ///
    /// Used when a fragment becomes a modifier: the redundant `name`/`mid`
    /// request fields belong only on the head of the composed query.
    pub fn strip_null_field(&mut self, field: &str) {
        self.constraints
            .retain(|c| !(c.field == field && c.value == Value::Null && c.ns.is_none()));
    }

    /// Give every top-level un-prefixed occurrence of `field` the namespace
    /// prefix `ns`.
    pub fn namespace_field(&mut self, field: &str, ns: u32) {
        for c in &mut self.constraints {
            if c.field == field && c.ns.is_none() {
                c.ns = Some(ns);
            }
        }
    }

    /// Whether any constraint (at any depth) is an open hole.
    pub fn has_hole(&self) -> bool {
        self.constraints.iter().any(|c| match &c.value {
            Value::Hole => true,
            Value::Nested(inner) => inner.has_hole(),
            _ => false,
        })
    }

    /// Substitute `object` into every open hole, at any depth.
    ///
    /// Templates carry exactly one hole by construction, so "every" is a
    /// single substitution in practice.
    pub fn fill(&self, object: &Fragment) -> Fragment {
        let constraints = self
            .constraints
            .iter()
            .map(|c| {
                let value = match &c.value {
                    Value::Hole => Value::Nested(object.clone()),
                    Value::Nested(inner) => Value::Nested(inner.fill(object)),
                    other => other.clone(),
                };
                Constraint {
                    value,
                    ..c.clone()
                }
            })
            .collect();
        Fragment { constraints }
    }

    /// Render the backend wire dialect: a JSON object whose keys carry the
    /// `ns:`, `!`, and `~=` markers, with nested fragments as one-element
    /// object arrays.
    ///
    /// Fails on an unfilled template hole.
    pub fn to_wire(&self) -> Result<serde_json::Value, QueryError> {
        let mut map = serde_json::Map::new();
        for c in &self.constraints {
            let value = match &c.value {
                Value::Null => serde_json::Value::Null,
                Value::Text(text) => serde_json::Value::String(text.clone()),
                Value::Nested(inner) => serde_json::Value::Array(vec![inner.to_wire()?]),
                Value::Hole => {
                    return Err(QueryError::UnfilledSlot {
                        field: c.field.clone(),
                    });
                }
            };
            map.insert(c.wire_key(), value);
        }
        Ok(serde_json::Value::Object(map))
    }
}

impl fmt::Display for Fragment {
    /// Compact single-line rendering for logs and CLI output. Holes render
    /// as `_` rather than failing, so partially built templates can be shown
    /// in diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for (i, c) in self.constraints.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}': ", c.wire_key())?;
            match &c.value {
                Value::Null => write!(f, "null")?,
                Value::Text(text) => write!(f, "'{text}'")?,
                Value::Nested(inner) => write!(f, "[{inner}]")?,
                Value::Hole => write!(f, "_")?,
            }
        }
        write!(f, " }}")
    }
}
