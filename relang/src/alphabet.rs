//! The input alphabet of an automaton
//!
//! Instead of labelling transitions with raw characters, automata label them
//! with *symbols*: the blocks of a partition of the whole character domain.
//! The partition starts as the single universal block and is refined every
//! time a transition mentions a class that straddles a block boundary, so
//! any class ever added is exactly a union of blocks.

use crate::charclass::CharClass;
use log::trace;

/// Index of a block in an [`Alphabet`]
///
/// Symbol ids are only meaningful for the alphabet that produced them and are
/// renumbered whenever the alphabet is refined.
pub type SymbolId = usize;

/// A partition of the character domain into disjoint [`CharClass`] blocks
#[derive(Debug, Clone)]
pub struct Alphabet {
    symbols: Vec<CharClass>,
}

impl Alphabet {
    /// Create the trivial alphabet with one universal block
    pub fn new() -> Self {
        Alphabet {
            symbols: vec![CharClass::universal()],
        }
    }

    /// All blocks, indexed by [`SymbolId`]
    pub fn symbols(&self) -> &[CharClass] {
        &self.symbols
    }

    /// The block with the given id
    pub fn class(&self, symbol: SymbolId) -> &CharClass {
        &self.symbols[symbol]
    }

    /// Number of blocks in the partition
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false: the partition covers the whole domain
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The block containing `c`
    ///
    /// # Panics
    ///
    /// Panics if the blocks no longer cover the whole domain.
    pub fn symbol(&self, c: char) -> SymbolId {
        self.symbols
            .iter()
            .position(|s| s.includes(c))
            .expect("alphabet blocks cover every character")
    }

    /// Any block overlapping `class`
    pub fn symbol_for_class(&self, class: &CharClass) -> Option<SymbolId> {
        self.symbols.iter().position(|s| s.overlaps(class))
    }

    /// Every block overlapping `class`
    ///
    /// Once `class` is representable in this alphabet, the union of these
    /// blocks is exactly `class`.
    pub fn constituent_classes(&self, class: &CharClass) -> Vec<SymbolId> {
        self.symbols
            .iter()
            .enumerate()
            .filter(|(_, s)| s.overlaps(class))
            .map(|(id, _)| id)
            .collect()
    }

    /// Whether `class` straddles a block boundary
    pub fn requires_expanding_alphabet(&self, class: &CharClass) -> bool {
        let constituents = self.constituent_classes(class);
        let covered = CharClass::union_of(constituents.iter().map(|&id| &self.symbols[id]));
        covered != *class
    }

    /// Refine the partition so that `class` is a union of blocks.
    ///
    /// Every block that is neither disjoint from nor contained in `class` is
    /// split into its part inside `class` and its part outside. The returned
    /// vector maps each new symbol id to the id of the block it came from,
    /// which is what automata need to rebuild their transition tables.
    pub fn expand_to_include(&mut self, class: &CharClass) -> Vec<SymbolId> {
        let before = self.symbols.len();
        let mut symbols = Vec::with_capacity(before + 1);
        let mut origins = Vec::with_capacity(before + 1);

        for (id, symbol) in self.symbols.drain(..).enumerate() {
            let inside = symbol.intersection(class);
            if inside.is_empty() || inside == symbol {
                symbols.push(symbol);
                origins.push(id);
            } else {
                let outside = symbol.difference(&inside);
                symbols.push(inside);
                symbols.push(outside);
                origins.push(id);
                origins.push(id);
            }
        }

        self.symbols = symbols;
        trace!(
            "alphabet refined for {}: {} -> {} symbols",
            class,
            before,
            self.symbols.len()
        );
        origins
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new()
    }
}
