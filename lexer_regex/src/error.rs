use crate::dfa::DfaStateId;
use crate::token::Token;
#[cfg(test)]
use serde::Serialize;
use std::fmt::{Display, Formatter};
use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(test, derive(Serialize))]
pub enum RegexErrorKind {
    #[error("unclosed '('")]
    UnclosedParenthesis,
    #[error("unexpected ')' without a matching '('")]
    UnexpectedClosingParenthesis,
    #[error("parentheses are not allowed in postfix notation")]
    UnexpectedParenthesis,
    #[error("operator '{0}' is missing an operand")]
    MissingOperand(Token),
    #[error("{0} sub-expressions are not joined by any operator")]
    DanglingOperands(usize),
    #[error("DFA state {0} does not exist")]
    UnknownDfaState(DfaStateId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(test, derive(Serialize))]
pub struct RegexError {
    kind: RegexErrorKind,
    position: Option<usize>,
}

impl RegexError {
    pub fn new(kind: RegexErrorKind, position: usize) -> Self {
        RegexError {
            kind,
            position: Some(position),
        }
    }

    pub fn new_general(kind: RegexErrorKind) -> Self {
        RegexError {
            kind,
            position: None,
        }
    }

    pub fn kind(&self) -> &RegexErrorKind {
        &self.kind
    }

    /// Character index of the offending symbol, in whichever notation
    /// (infix or postfix) was being processed when the error was raised.
    pub fn position(&self) -> Option<usize> {
        self.position
    }
}

impl Display for RegexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(pos) = self.position {
            write!(f, " at position {pos}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RegexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
