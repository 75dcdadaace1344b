#[cfg(test)]
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Explicit concatenation operator. Implicit concatenations are rewritten to
/// it before the infix to postfix conversion.
pub const CONCAT_MARKER: char = '·';

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Serialize))]
pub enum Token {
    Literal(char),
    Star,
    Plus,
    QuestionMark,
    Pipe,
    Concat,
    LParen,
    RParen,
}

impl Token {
    pub fn is_quantifier(&self) -> bool {
        matches!(self, Token::Star | Token::Plus | Token::QuestionMark)
    }

    pub fn is_operand(&self) -> bool {
        matches!(self, Token::Literal(_))
    }

    pub fn is_operator(&self) -> bool {
        self.precedence().is_some()
    }

    /// Binding strength used by the shunting-yard conversion. All operators
    /// are left-associative.
    pub fn precedence(&self) -> Option<u8> {
        match self {
            Token::Star | Token::Plus | Token::QuestionMark => Some(2),
            Token::Concat => Some(1),
            Token::Pipe => Some(0),
            Token::Literal(_) | Token::LParen | Token::RParen => None,
        }
    }

    /// No concatenation may follow a token that still waits for its right
    /// hand side.
    pub(crate) fn opens_operand(&self) -> bool {
        matches!(self, Token::LParen | Token::Pipe | Token::Concat)
    }

    /// No concatenation may precede a token that binds to what is on its
    /// left.
    pub(crate) fn closes_operand(&self) -> bool {
        matches!(
            self,
            Token::RParen
                | Token::Star
                | Token::Plus
                | Token::QuestionMark
                | Token::Pipe
                | Token::Concat
        )
    }
}

/// Splits a pattern into tokens, each paired with its char index.
pub fn tokenize(pattern: &str) -> Vec<(usize, Token)> {
    pattern.chars().map(Token::from).enumerate().collect()
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", char::from(self))
    }
}

impl From<Token> for char {
    fn from(value: Token) -> Self {
        char::from(&value)
    }
}

impl From<&Token> for char {
    fn from(value: &Token) -> Self {
        match value {
            Token::Literal(c) => *c,
            Token::Star => '*',
            Token::Plus => '+',
            Token::QuestionMark => '?',
            Token::Pipe => '|',
            Token::Concat => CONCAT_MARKER,
            Token::LParen => '(',
            Token::RParen => ')',
        }
    }
}

impl From<char> for Token {
    fn from(value: char) -> Self {
        match value {
            '*' => Token::Star,
            '+' => Token::Plus,
            '?' => Token::QuestionMark,
            '|' => Token::Pipe,
            CONCAT_MARKER => Token::Concat,
            '(' => Token::LParen,
            ')' => Token::RParen,
            _ => Token::Literal(value),
        }
    }
}
