pub use dfa::{Dfa, DfaState, DfaStateId};
pub use error::{RegexError, RegexErrorKind};
pub use nfa::{Nfa, State, StateId, StateSet, Transition};
pub use shunting_yard::{insert_concatenation, to_postfix};
pub use thompson::{compile, compile_postfix};
pub use token::{CONCAT_MARKER, Token};

mod dfa;
mod error;
mod nfa;
mod shunting_yard;
mod thompson;
mod token;

/// A compiled pattern matched against whole strings.
pub struct Regex {
    pattern: String,
    nfa: Nfa,
}

impl Regex {
    pub fn new(pattern: &str) -> Result<Self, RegexError> {
        let nfa = compile(pattern)?;

        Ok(Self {
            pattern: pattern.to_string(),
            nfa,
        })
    }

    pub fn is_exact_match(&self, s: &str) -> bool {
        self.nfa.accepts(s)
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }
}
