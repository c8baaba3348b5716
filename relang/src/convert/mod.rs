//! Conversions between the representations of a regular language
//!
//! ```text
//! Pattern --thompson--> Nfa --subset--> Dfa
//!    ^                   ^               |
//!    +---elimination-----+-----embed-----+
//! ```
//!
//! Every conversion is a total function: it always terminates and never
//! fails.

mod elimination;
mod embed;
mod subset;
mod thompson;

pub use elimination::nfa_to_regex;
pub use embed::dfa_to_nfa;
pub use subset::nfa_to_dfa;
pub use thompson::regex_to_nfa;
