use crate::error::{RegexError, RegexErrorKind};
use crate::token::{Token, tokenize};
#[cfg(feature = "logging")]
use log::*;

type PositionedToken = (usize, Token);

/// Makes every implicit concatenation explicit with [`crate::CONCAT_MARKER`].
///
/// `a(b|c)*d` becomes `a·(b|c)*·d`.
pub fn insert_concatenation(regex: &str) -> String {
    to_string(with_explicit_concatenation(tokenize(regex)))
}

/// Converts an infix pattern to postfix notation.
///
/// Operators are emitted after their operands, parentheses are dropped.
/// `a(b|c)*` becomes `abc|*·`. Fails on unbalanced parentheses.
pub fn to_postfix(infix: &str) -> Result<String, RegexError> {
    let postfix = to_string(postfix_tokens(infix)?);

    #[cfg(feature = "logging")]
    debug!("rewrote {infix:?} to postfix {postfix:?}");

    Ok(postfix)
}

/// Same as [`to_postfix`], but keeps every token paired with the position of
/// the infix character it came from. Inserted concatenations take the
/// position of the character they precede.
pub(crate) fn postfix_tokens(infix: &str) -> Result<Vec<PositionedToken>, RegexError> {
    let tokens = with_explicit_concatenation(tokenize(infix));
    let mut output = Vec::with_capacity(tokens.len());
    let mut operators: Vec<PositionedToken> = Vec::new();

    for (pos, token) in tokens {
        match token {
            Token::Literal(_) => output.push((pos, token)),
            Token::LParen => operators.push((pos, token)),
            Token::RParen => loop {
                match operators.pop() {
                    Some((_, Token::LParen)) => break,
                    Some(operator) => output.push(operator),
                    None => {
                        return Err(RegexError::new(
                            RegexErrorKind::UnexpectedClosingParenthesis,
                            pos,
                        ));
                    }
                }
            },
            operator => {
                // only operators and '(' ever sit on the stack
                while let Some(&(_, top)) = operators.last() {
                    if top == Token::LParen || top.precedence() < operator.precedence() {
                        break;
                    }
                    output.extend(operators.pop());
                }
                operators.push((pos, operator));
            }
        }
    }

    while let Some((pos, operator)) = operators.pop() {
        if operator == Token::LParen {
            return Err(RegexError::new(RegexErrorKind::UnclosedParenthesis, pos));
        }
        output.push((pos, operator));
    }

    Ok(output)
}

fn with_explicit_concatenation(tokens: Vec<PositionedToken>) -> Vec<PositionedToken> {
    let mut res = Vec::with_capacity(tokens.len() * 2);
    let mut tokens = tokens.into_iter().peekable();

    while let Some((pos, cur)) = tokens.next() {
        res.push((pos, cur));
        if let Some(&(next_pos, next)) = tokens.peek() {
            if !cur.opens_operand() && !next.closes_operand() {
                res.push((next_pos, Token::Concat));
            }
        }
    }

    res
}

fn to_string(tokens: Vec<PositionedToken>) -> String {
    tokens.into_iter().map(|(_, token)| char::from(token)).collect()
}
