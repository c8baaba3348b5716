//! Pattern trees for regular expressions
//!
//! The parser builds [`Pattern`] values exactly as written, so a tree may
//! contain redundant nodes such as `(alt ε ε)`. The smart constructors
//! ([`Pattern::concat`], [`Pattern::alternation`], [`Pattern::star`], ...)
//! apply the absorbing rules of `Null` and `Empty` as they build, and
//! [`Pattern::simplify`] rebuilds a whole tree through them.

use crate::charclass::CharClass;
use std::fmt;

/// A regular expression over character classes
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Any single character of the class
    Literal(CharClass),

    /// The patterns one after another
    Concat(Vec<Pattern>),

    /// Either side
    Alternation(Box<Pattern>, Box<Pattern>),

    /// Zero or more repetitions
    KleeneStar(Box<Pattern>),

    /// The zero-length string
    Empty,

    /// The empty language; matches nothing
    Null,
}

/// Binding strength of the surrounding context when rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Alternation,
    Concat,
    Postfix,
}

impl Pattern {
    /// Create the zero-length pattern
    pub fn empty() -> Self {
        Pattern::Empty
    }

    /// Create the pattern matching nothing
    pub fn null() -> Self {
        Pattern::Null
    }

    /// Create a literal; an empty class matches nothing and becomes `Null`
    pub fn literal(class: impl Into<CharClass>) -> Self {
        let class = class.into();
        if class.is_empty() {
            Pattern::Null
        } else {
            Pattern::Literal(class)
        }
    }

    /// Concatenate patterns.
    ///
    /// Any `Null` part makes the whole concatenation `Null`. `Empty` parts are
    /// dropped and nested concatenations are flattened. Zero remaining parts
    /// give `Empty`; a single part is returned as is.
    pub fn concat(parts: impl IntoIterator<Item = Pattern>) -> Self {
        let mut flat = Vec::new();
        for part in parts {
            match part {
                Pattern::Null => return Pattern::Null,
                Pattern::Empty => {}
                Pattern::Concat(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }

        match flat.len() {
            0 => Pattern::Empty,
            1 => flat.pop().unwrap_or(Pattern::Empty),
            _ => Pattern::Concat(flat),
        }
    }

    /// Alternate two patterns; a `Null` side yields the other side
    pub fn alternation(left: Pattern, right: Pattern) -> Self {
        match (left, right) {
            (Pattern::Null, other) | (other, Pattern::Null) => other,
            (left, right) => Pattern::Alternation(Box::new(left), Box::new(right)),
        }
    }

    /// Repeat a pattern zero or more times; the star of `Empty` or `Null` is `Empty`
    pub fn star(base: Pattern) -> Self {
        match base {
            Pattern::Empty | Pattern::Null => Pattern::Empty,
            base => Pattern::KleeneStar(Box::new(base)),
        }
    }

    /// `p?`, i.e. `p | ε`
    pub fn optional(base: Pattern) -> Self {
        Pattern::alternation(base, Pattern::Empty)
    }

    /// `p+`, i.e. `p p*`
    pub fn plus(base: Pattern) -> Self {
        Pattern::concat([base.clone(), Pattern::star(base)])
    }

    /// Rebuild the tree bottom-up through the smart constructors
    pub fn simplify(&self) -> Pattern {
        match self {
            Pattern::Literal(class) => Pattern::literal(class.clone()),
            Pattern::Concat(parts) => Pattern::concat(parts.iter().map(Pattern::simplify)),
            Pattern::Alternation(left, right) => {
                Pattern::alternation(left.simplify(), right.simplify())
            }
            Pattern::KleeneStar(base) => Pattern::star(base.simplify()),
            Pattern::Empty => Pattern::Empty,
            Pattern::Null => Pattern::Null,
        }
    }

    /// Render in regex syntax with as few parentheses as the grammar allows.
    ///
    /// Parsing the result gives a pattern for the same language, though not
    /// necessarily the same tree: `p | ε` is written `p?`, and `Null` is
    /// written as the empty class `[]`.
    pub fn to_regex_string(&self) -> String {
        let mut out = String::new();
        self.write_regex(&mut out, Precedence::Alternation);
        out
    }

    fn write_regex(&self, out: &mut String, context: Precedence) {
        match self {
            Pattern::Literal(class) => out.push_str(&class.to_regex_string()),
            Pattern::Null => out.push_str("[]"),
            Pattern::Empty => {
                if context > Precedence::Alternation {
                    out.push_str("()");
                }
            }
            Pattern::Concat(parts) => match parts.as_slice() {
                [] => Pattern::Empty.write_regex(out, context),
                [only] => only.write_regex(out, context),
                parts => {
                    let parens = context > Precedence::Concat;
                    if parens {
                        out.push('(');
                    }
                    for part in parts {
                        part.write_regex(out, Precedence::Concat);
                    }
                    if parens {
                        out.push(')');
                    }
                }
            },
            Pattern::Alternation(left, right) => match (left.as_ref(), right.as_ref()) {
                (base, Pattern::Empty) | (Pattern::Empty, base) => {
                    base.write_regex(out, Precedence::Postfix);
                    out.push('?');
                }
                (left, right) => {
                    let parens = context > Precedence::Alternation;
                    if parens {
                        out.push('(');
                    }
                    left.write_regex(out, Precedence::Alternation);
                    out.push('|');
                    right.write_regex(out, Precedence::Alternation);
                    if parens {
                        out.push(')');
                    }
                }
            },
            Pattern::KleeneStar(base) => {
                base.write_regex(out, Precedence::Postfix);
                out.push('*');
            }
        }
    }

    /// Render as an s-expression, e.g. `(alt (lit 'a') ε)`
    pub fn to_tree_string(&self) -> String {
        match self {
            Pattern::Literal(class) => format!("(lit '{}')", class),
            Pattern::Concat(parts) => {
                let mut out = String::from("(concat");
                for part in parts {
                    out.push(' ');
                    out.push_str(&part.to_tree_string());
                }
                out.push(')');
                out
            }
            Pattern::Alternation(left, right) => {
                format!("(alt {} {})", left.to_tree_string(), right.to_tree_string())
            }
            Pattern::KleeneStar(base) => format!("(kleene {})", base.to_tree_string()),
            Pattern::Empty => "ε".to_string(),
            Pattern::Null => "∅".to_string(),
        }
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Pattern::Empty
    }
}

impl From<CharClass> for Pattern {
    fn from(class: CharClass) -> Self {
        Pattern::literal(class)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_regex_string())
    }
}
