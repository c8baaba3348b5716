//! Character ranges and character classes
//!
//! A [`CharClass`] is a set of `char`s stored as a sorted union of disjoint
//! [`CharRange`]s plus an `inverted` flag. Inverted classes describe sets
//! such as "everything except `a`" without enumerating the scalar-value
//! domain, so union and intersection never look at individual characters
//! except at range boundaries.

use std::cmp::Ordering;
use std::fmt;

/// The scalar value following `c`, stepping over the surrogate gap
pub(crate) fn next_char(c: char) -> Option<char> {
    match c {
        '\u{D7FF}' => Some('\u{E000}'),
        char::MAX => None,
        _ => char::from_u32(c as u32 + 1),
    }
}

/// The scalar value preceding `c`, stepping over the surrogate gap
pub(crate) fn prev_char(c: char) -> Option<char> {
    match c {
        '\u{E000}' => Some('\u{D7FF}'),
        '\0' => None,
        _ => char::from_u32(c as u32 - 1),
    }
}

/// Characters that must be escaped outside of a class
fn is_syntax_char(c: char) -> bool {
    matches!(c, '(' | ')' | '|' | '*' | '?' | '+' | '.' | '[' | ']' | '\\')
}

/// Characters that must be escaped inside a class
fn is_class_syntax_char(c: char) -> bool {
    matches!(c, ']' | '[' | '\\' | '^' | '-')
}

/// A range of characters, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CharRange {
    start: char,
    end: char,
}

impl CharRange {
    /// Create the range `start..=end`
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn range(start: char, end: char) -> Self {
        assert!(start <= end, "invalid char range {:?}-{:?}", start, end);
        CharRange { start, end }
    }

    /// Create a range holding a single character
    pub fn single(c: char) -> Self {
        CharRange { start: c, end: c }
    }

    /// First character of the range
    pub fn start(&self) -> char {
        self.start
    }

    /// Last character of the range
    pub fn end(&self) -> char {
        self.end
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    pub fn includes(&self, c: char) -> bool {
        self.start <= c && c <= self.end
    }

    /// Whether `other` lies entirely within this range
    pub fn includes_range(&self, other: &CharRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: &CharRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    fn write_in_class(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write_class_char(f, self.start)?;
        if !self.is_single() {
            f.write_char('-')?;
            write_class_char(f, self.end)?;
        }
        Ok(())
    }
}

impl fmt::Display for CharRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_in_class(f)
    }
}

fn write_class_char(f: &mut impl fmt::Write, c: char) -> fmt::Result {
    if is_class_syntax_char(c) {
        f.write_char('\\')?;
    }
    f.write_char(c)
}

/// A set of characters
///
/// The represented set is the union of `parts`, or its complement when the
/// class is inverted. `parts` is kept sorted, disjoint and maximally merged.
/// Because an inverted and a plain class can denote the same set, equality
/// is decided semantically rather than by comparing `parts`.
#[derive(Debug, Clone)]
pub struct CharClass {
    parts: Vec<CharRange>,
    inverted: bool,
}

impl CharClass {
    /// The class matching every character
    pub fn universal() -> Self {
        CharClass {
            parts: Vec::new(),
            inverted: true,
        }
    }

    /// The class matching nothing
    pub fn empty() -> Self {
        CharClass {
            parts: Vec::new(),
            inverted: false,
        }
    }

    /// The class matching exactly `c`
    pub fn single(c: char) -> Self {
        CharClass {
            parts: vec![CharRange::single(c)],
            inverted: false,
        }
    }

    /// The class matching `start..=end`
    pub fn range(start: char, end: char) -> Self {
        CharClass {
            parts: vec![CharRange::range(start, end)],
            inverted: false,
        }
    }

    /// Build a class from arbitrary, possibly overlapping ranges
    pub fn from_ranges(ranges: impl IntoIterator<Item = CharRange>, inverted: bool) -> Self {
        Self::normalized(ranges.into_iter().collect(), inverted)
    }

    /// Union of every class in `classes`
    pub fn union_of<'a>(classes: impl IntoIterator<Item = &'a CharClass>) -> Self {
        classes
            .into_iter()
            .fold(CharClass::empty(), |acc, c| acc.union(c))
    }

    fn normalized(mut ranges: Vec<CharRange>, mut inverted: bool) -> Self {
        ranges.sort_unstable();

        let mut parts: Vec<CharRange> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match parts.last_mut() {
                Some(last) if next_char(last.end).is_none_or(|n| range.start <= n) => {
                    last.end = last.end.max(range.end);
                }
                _ => parts.push(range),
            }
        }

        // A single range over the whole domain is written as an inverted empty set.
        if let [only] = parts.as_slice()
            && only.start == '\0'
            && only.end == char::MAX
        {
            parts.clear();
            inverted = !inverted;
        }

        CharClass { parts, inverted }
    }

    /// The ranges of this class, before applying `is_inverted`
    pub fn parts(&self) -> &[CharRange] {
        &self.parts
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Whether the class matches no character at all
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty() && !self.inverted
    }

    /// Whether the class matches every character
    pub fn is_universal(&self) -> bool {
        self.parts.is_empty() && self.inverted
    }

    /// Whether `c` belongs to the class
    pub fn includes(&self, c: char) -> bool {
        let in_parts = self
            .parts
            .binary_search_by(|r| {
                if r.end < c {
                    Ordering::Less
                } else if r.start > c {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .is_ok();
        in_parts != self.inverted
    }

    pub fn union(&self, other: &CharClass) -> CharClass {
        self.combine(other, |a, b| a || b)
    }

    pub fn intersection(&self, other: &CharClass) -> CharClass {
        self.combine(other, |a, b| a && b)
    }

    /// The characters of `self` that are not in `other`
    pub fn difference(&self, other: &CharClass) -> CharClass {
        self.intersection(&other.complement())
    }

    pub fn complement(&self) -> CharClass {
        CharClass {
            parts: self.parts.clone(),
            inverted: !self.inverted,
        }
    }

    pub fn overlaps(&self, other: &CharClass) -> bool {
        !self.intersection(other).is_empty()
    }

    /// Whether every character of `self` is also in `other`
    pub fn is_subset(&self, other: &CharClass) -> bool {
        self.difference(other).is_empty()
    }

    /// Sweep over the critical points of both operands.
    ///
    /// Membership in either operand can only change at a range start or just
    /// past a range end. Between two consecutive critical points membership
    /// is constant, so each segment is classified by probing its first
    /// character and consecutive kept segments are merged. Outside every
    /// critical point both operands fall back to their `inverted` flag, which
    /// is why the result's flag is `op` applied to the operands' flags and
    /// `parts` records the segments that disagree with it.
    fn combine(&self, other: &CharClass, op: impl Fn(bool, bool) -> bool) -> CharClass {
        let inverted = op(self.inverted, other.inverted);

        let mut points: Vec<char> = self
            .parts
            .iter()
            .chain(&other.parts)
            .flat_map(|r| std::iter::once(r.start).chain(next_char(r.end)))
            .collect();
        points.sort_unstable();
        points.dedup();

        let mut parts = Vec::new();
        let mut current: Option<CharRange> = None;
        for (i, &lo) in points.iter().enumerate() {
            let hi = match points.get(i + 1) {
                Some(&next) => prev_char(next).unwrap_or(lo),
                None => char::MAX,
            };

            if op(self.includes(lo), other.includes(lo)) != inverted {
                current = Some(match current {
                    Some(open) => CharRange {
                        start: open.start,
                        end: hi,
                    },
                    None => CharRange { start: lo, end: hi },
                });
            } else if let Some(open) = current.take() {
                parts.push(open);
            }
        }
        parts.extend(current);

        Self::normalized(parts, inverted)
    }

    /// Render in the surface syntax accepted by the parser
    pub fn to_regex_string(&self) -> String {
        let mut out = String::new();
        match self.parts.as_slice() {
            [] if self.inverted => out.push('.'),
            [] => out.push_str("[]"),
            [only] if !self.inverted && only.is_single() => {
                if is_syntax_char(only.start) {
                    out.push('\\');
                }
                out.push(only.start);
            }
            parts => {
                out.push('[');
                if self.inverted {
                    out.push('^');
                }
                for part in parts {
                    // Writing into a String cannot fail.
                    let _ = part.write_in_class(&mut out);
                }
                out.push(']');
            }
        }
        out
    }
}

impl PartialEq for CharClass {
    fn eq(&self, other: &Self) -> bool {
        self.difference(other).is_empty() && other.difference(self).is_empty()
    }
}

impl Eq for CharClass {}

impl Default for CharClass {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<char> for CharClass {
    fn from(c: char) -> Self {
        CharClass::single(c)
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("∅")
        } else {
            f.write_str(&self.to_regex_string())
        }
    }
}
