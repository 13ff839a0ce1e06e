//! Syntax trees from the external noun-phrase parser.
//!
//! The interpreter does not parse English. Its input is a category-tagged
//! tree produced by an external grammar/parser and exchanged in the parser's
//! bracketed s-expression format:
//!
//! ```text
//! (NBar (N author) (OF of) (DP (NP (NBar (N book)))))
//! ```
//!
//! Leaves under a terminal category are words; a leaf directly under `DP` is
//! a literal entity name (multi-word names stay one leaf: `(DP United States)`).

use serde::{Deserialize, Serialize};

use crate::error::SyntaxError;

/// Syntactic category of a tree node, matching the noun-phrase grammar the
/// external parser is generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cat {
    /// Determiner phrase — the grammar's start symbol.
    #[serde(rename = "DP")]
    Dp,
    /// Noun phrase.
    #[serde(rename = "NP")]
    Np,
    /// Intermediate noun projection (noun plus modifiers).
    #[serde(rename = "NBar")]
    NBar,
    /// Noun terminal.
    #[serde(rename = "N")]
    Noun,
    /// Adjective terminal.
    #[serde(rename = "A")]
    Adj,
    /// Preposition terminal.
    #[serde(rename = "P")]
    Prep,
    /// Determiner terminal ("a", "which", ...) — semantically vacuous here.
    #[serde(rename = "Det")]
    Det,
    /// The relational-noun linker "of".
    #[serde(rename = "OF")]
    Of,
    /// Explicit grouping brackets, passed through unchanged.
    #[serde(rename = "LBR")]
    LBracket,
    #[serde(rename = "RBR")]
    RBracket,
}

impl Cat {
    /// Parse a category label from the exchange format.
    pub fn from_label(label: &str) -> Option<Cat> {
        match label {
            "DP" => Some(Cat::Dp),
            "NP" => Some(Cat::Np),
            "NBar" => Some(Cat::NBar),
            "N" => Some(Cat::Noun),
            "A" => Some(Cat::Adj),
            "P" => Some(Cat::Prep),
            "Det" => Some(Cat::Det),
            "OF" => Some(Cat::Of),
            "LBR" => Some(Cat::LBracket),
            "RBR" => Some(Cat::RBracket),
            _ => None,
        }
    }

    /// Whether this category's node contains a word leaf rather than
    /// phrase children.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Cat::Noun | Cat::Adj | Cat::Prep | Cat::Det | Cat::Of | Cat::LBracket | Cat::RBracket
        )
    }
}

impl std::fmt::Display for Cat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Cat::Dp => "DP",
            Cat::Np => "NP",
            Cat::NBar => "NBar",
            Cat::Noun => "N",
            Cat::Adj => "A",
            Cat::Prep => "P",
            Cat::Det => "Det",
            Cat::Of => "OF",
            Cat::LBracket => "LBR",
            Cat::RBracket => "RBR",
        };
        f.write_str(label)
    }
}

/// A node in the parser's output tree: either a word leaf or a
/// category-tagged node with ordered children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SynTree {
    Word(String),
    Node { cat: Cat, children: Vec<SynTree> },
}

impl SynTree {
    pub fn node(cat: Cat, children: Vec<SynTree>) -> Self {
        SynTree::Node { cat, children }
    }

    pub fn word(text: impl Into<String>) -> Self {
        SynTree::Word(text.into())
    }

    /// A terminal node wrapping a single word, e.g. `(N author)`.
    pub fn terminal(cat: Cat, text: impl Into<String>) -> Self {
        SynTree::Node {
            cat,
            children: vec![SynTree::Word(text.into())],
        }
    }

    /// The node's category; `None` for a bare word leaf.
    pub fn cat(&self) -> Option<Cat> {
        match self {
            SynTree::Word(_) => None,
            SynTree::Node { cat, .. } => Some(*cat),
        }
    }

    pub fn children(&self) -> &[SynTree] {
        match self {
            SynTree::Word(_) => &[],
            SynTree::Node { children, .. } => children,
        }
    }

    /// The word under a terminal node, if its only child is a leaf.
    pub fn leaf_word(&self) -> Option<&str> {
        match self {
            SynTree::Node { children, .. } => match children.as_slice() {
                [SynTree::Word(text)] => Some(text),
                _ => None,
            },
            SynTree::Word(_) => None,
        }
    }

    /// A compact shape description of the children, for diagnostics:
    /// `"N OF DP"`, `"Det Det"`, `"<word>"`.
    pub fn child_shape(&self) -> String {
        let parts: Vec<String> = self
            .children()
            .iter()
            .map(|child| match child {
                SynTree::Word(_) => "<word>".to_string(),
                SynTree::Node { cat, .. } => cat.to_string(),
            })
            .collect();
        parts.join(" ")
    }

    /// Read a tree from the parser's bracketed exchange format.
    ///
    /// Consecutive word tokens collapse into one multi-word leaf, so
    /// `(DP United States)` carries the single name "United States".
    pub fn from_sexpr(input: &str) -> Result<SynTree, SyntaxError> {
        let mut tokens = tokenize(input);
        let tree = parse_node(&mut tokens)?;
        match tokens.next() {
            Some((offset, _)) => Err(SyntaxError::Unbalanced { offset }),
            None => Ok(tree),
        }
    }

    /// Render back to the exchange format.
    pub fn to_sexpr(&self) -> String {
        match self {
            SynTree::Word(text) => text.clone(),
            SynTree::Node { cat, children } => {
                let inner: Vec<String> = children.iter().map(SynTree::to_sexpr).collect();
                format!("({cat} {})", inner.join(" "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open,
    Close,
    Atom(String),
}

fn tokenize(input: &str) -> std::iter::Peekable<std::vec::IntoIter<(usize, Token)>> {
    let mut tokens = Vec::new();
    let mut atom_start = None;
    for (i, ch) in input.char_indices() {
        if ch == '(' || ch == ')' || ch.is_whitespace() {
            if let Some(start) = atom_start.take() {
                tokens.push((start, Token::Atom(input[start..i].to_string())));
            }
            match ch {
                '(' => tokens.push((i, Token::Open)),
                ')' => tokens.push((i, Token::Close)),
                _ => {}
            }
        } else if atom_start.is_none() {
            atom_start = Some(i);
        }
    }
    if let Some(start) = atom_start {
        tokens.push((start, Token::Atom(input[start..].to_string())));
    }
    tokens.into_iter().peekable()
}

fn parse_node(
    tokens: &mut std::iter::Peekable<std::vec::IntoIter<(usize, Token)>>,
) -> Result<SynTree, SyntaxError> {
    match tokens.next() {
        Some((_, Token::Open)) => {}
        Some((offset, _)) => return Err(SyntaxError::Unbalanced { offset }),
        None => return Err(SyntaxError::Empty),
    }

    let cat = match tokens.next() {
        Some((_, Token::Atom(label))) => {
            Cat::from_label(&label).ok_or(SyntaxError::UnknownCategory { label })?
        }
        Some((offset, _)) => return Err(SyntaxError::Unbalanced { offset }),
        None => return Err(SyntaxError::Empty),
    };

    let mut children = Vec::new();
    let mut words: Vec<String> = Vec::new();
    loop {
        match tokens.peek() {
            Some((_, Token::Open)) => {
                children.push(parse_node(tokens)?);
            }
            Some((_, Token::Atom(_))) => {
                let Some((_, Token::Atom(atom))) = tokens.next() else {
                    unreachable!()
                };
                words.push(atom);
            }
            Some((_, Token::Close)) => {
                tokens.next();
                break;
            }
            None => return Err(SyntaxError::Unbalanced { offset: 0 }),
        }
    }

    if !words.is_empty() {
        // Multi-word leaves (literal names) stay one token.
        children.push(SynTree::Word(words.join(" ")));
    }
    Ok(SynTree::Node { cat, children })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_terminal() {
        let tree = SynTree::from_sexpr("(N author)").unwrap();
        assert_eq!(tree, SynTree::terminal(Cat::Noun, "author"));
        assert_eq!(tree.leaf_word(), Some("author"));
    }

    #[test]
    fn parse_nested_phrase() {
        let tree = SynTree::from_sexpr("(DP (NP (NBar (N books))))").unwrap();
        assert_eq!(tree.cat(), Some(Cat::Dp));
        let np = &tree.children()[0];
        assert_eq!(np.cat(), Some(Cat::Np));
    }

    #[test]
    fn multiword_name_is_one_leaf() {
        let tree = SynTree::from_sexpr("(DP United States)").unwrap();
        assert_eq!(tree.leaf_word(), Some("United States"));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = SynTree::from_sexpr("(VP (V runs))").unwrap_err();
        assert!(matches!(err, SyntaxError::UnknownCategory { .. }));
    }

    #[test]
    fn unbalanced_input_is_rejected() {
        assert!(SynTree::from_sexpr("(DP (NP (NBar (N books)))").is_err());
        assert!(SynTree::from_sexpr("(DP Canada))").is_err());
        assert!(SynTree::from_sexpr("").is_err());
    }

    #[test]
    fn sexpr_round_trip() {
        let text = "(NBar (N author) (OF of) (DP Tolkien))";
        let tree = SynTree::from_sexpr(text).unwrap();
        assert_eq!(tree.to_sexpr(), text);
    }

    #[test]
    fn child_shape_names_categories() {
        let tree = SynTree::from_sexpr("(NBar (N author) (OF of) (DP Tolkien))").unwrap();
        assert_eq!(tree.child_shape(), "N OF DP");
    }

    #[test]
    fn json_round_trip() {
        let tree = SynTree::from_sexpr("(DP (Det which) (NP (NBar (N books))))").unwrap();
        let json = serde_json::to_string(&tree).unwrap();
        let back: SynTree = serde_json::from_str(&json).unwrap();
        assert_eq!(tree, back);
    }
}
