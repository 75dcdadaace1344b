//! Thompson's construction: builds an [`Nfa`] out of a postfix pattern.
//!
//! Postfix symbols are processed left to right on a stack of automata. An
//! operand pushes a two-state automaton, an operator pops its operands,
//! combines them, and pushes the result back. For binary operators the
//! right hand side sits on top of the stack and is popped first.

use crate::error::{RegexError, RegexErrorKind};
use crate::nfa::Nfa;
use crate::shunting_yard::postfix_tokens;
use crate::token::{Token, tokenize};
#[cfg(feature = "logging")]
use log::*;

/// Compiles an infix pattern such as `a(b|c)*`.
///
/// Error positions refer to characters of `regex`.
pub fn compile(regex: &str) -> Result<Nfa, RegexError> {
    build(postfix_tokens(regex)?)
}

/// Compiles a pattern already in postfix notation, such as `abc|*·`.
///
/// Error positions refer to characters of `postfix`.
pub fn compile_postfix(postfix: &str) -> Result<Nfa, RegexError> {
    build(tokenize(postfix))
}

fn build<I>(postfix: I) -> Result<Nfa, RegexError>
where
    I: IntoIterator<Item = (usize, Token)>,
{
    let mut stack: Vec<Nfa> = Vec::new();

    for (pos, token) in postfix {
        #[cfg(feature = "logging")]
        trace!("thompson: '{token}' at {pos}, {} on stack", stack.len());

        let missing_operand = || RegexError::new(RegexErrorKind::MissingOperand(token), pos);

        match token {
            Token::Literal(c) => stack.push(Nfa::from_char(c)),
            Token::Concat | Token::Pipe => {
                let right = stack.pop().ok_or_else(missing_operand)?;
                let mut left = stack.pop().ok_or_else(missing_operand)?;
                if token == Token::Concat {
                    left.concatenate(right);
                } else {
                    left.alternate(right);
                }
                stack.push(left);
            }
            Token::Star | Token::Plus | Token::QuestionMark => {
                let mut operand = stack.pop().ok_or_else(missing_operand)?;
                match token {
                    Token::Star => operand.kleene_star(),
                    Token::Plus => operand.one_or_more(),
                    _ => operand.zero_or_one(),
                }
                stack.push(operand);
            }
            Token::LParen | Token::RParen => {
                return Err(RegexError::new(RegexErrorKind::UnexpectedParenthesis, pos));
            }
        }
    }

    let nfa = match stack.len() {
        0 => Nfa::empty(),
        1 => stack.pop().unwrap_or_else(Nfa::empty),
        n => {
            return Err(RegexError::new_general(
                RegexErrorKind::DanglingOperands(n),
            ));
        }
    };

    #[cfg(feature = "logging")]
    debug!("thompson: built NFA with {} states", nfa.state_count());

    Ok(nfa)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;
    use rstest::*;

    const SNAPSHOT_PATH: &str = "../tests/thompson/";

    lazy_static! {
        static ref INSTA_SETTINGS: insta::Settings = {
            let mut set = insta::Settings::clone_current();
            set.set_snapshot_path(SNAPSHOT_PATH);
            set.set_prepend_module_to_snapshot(false);
            set
        };
    }

    fn assert_language(pattern: &str, accepted: &[&str], rejected: &[&str]) {
        let nfa = compile(pattern).unwrap();
        for s in accepted {
            assert!(nfa.accepts(s), "{pattern:?} should accept {s:?}");
        }
        for s in rejected {
            assert!(!nfa.accepts(s), "{pattern:?} should reject {s:?}");
        }
    }

    mod languages {
        use super::*;

        #[test]
        fn single_literal_matches_only_itself() {
            for c in ['a', 'z', '0', '.', '$', ' '] {
                let nfa = compile(&c.to_string()).unwrap();
                assert!(nfa.accepts(&c.to_string()));
                assert!(!nfa.accepts(""));
                assert!(!nfa.accepts(&format!("{c}{c}")));
                assert!(!nfa.accepts("b"));
            }
        }

        #[test]
        fn empty_pattern_matches_only_empty_string() {
            assert_language("", &[""], &["a", "aa", " "]);
        }

        #[test]
        fn empty_group_matches_only_empty_string() {
            assert_language("()", &[""], &["a"]);
        }

        #[test]
        fn concatenation_is_order_sensitive() {
            assert_language("ab", &["ab"], &["ba", "a", "b", "", "abb"]);
            assert_language("ba", &["ba"], &["ab"]);
        }

        #[test]
        fn union_accepts_either_side() {
            assert_language("a|b", &["a", "b"], &["", "ab", "c"]);
        }

        #[test]
        fn star_accepts_any_repetition() {
            assert_language("a*", &["", "a", "aa", "aaa", "aaaaaaaa"], &["b", "ab"]);
        }

        #[test]
        fn optional_accepts_zero_or_one() {
            assert_language("a?", &["", "a"], &["aa", "b"]);
        }

        #[test]
        fn plus_excludes_zero_occurrences() {
            assert_language("a+", &["a", "aa", "aaa"], &["", "b"]);
        }

        #[test]
        fn composed_pattern() {
            assert_language(
                "a(b|c)*",
                &["a", "ab", "ac", "abc", "acbcb"],
                &["", "b", "ba", "abd"],
            );
        }

        #[rstest]
        #[case("(a|b)*abb", &["abb", "aabb", "babb", "ababb"], &["", "ab", "abba", "abab"])]
        #[case("ab|cd", &["ab", "cd"], &["ad", "abcd", "a"])]
        #[case("a|b*", &["", "a", "b", "bbb"], &["ab", "aa"])]
        #[case("(ab)+c?", &["ab", "abab", "abc", "ababc"], &["", "c", "abcc", "aba"])]
        #[case("a·b", &["ab"], &["a·b", "ba"])]
        #[case("((a))", &["a"], &["", "aa"])]
        #[case("a**", &["", "aaa"], &["b"])]
        #[case("(a?)+", &["", "a", "aa"], &["b"])]
        fn precedence_and_grouping(
            #[case] pattern: &str,
            #[case] accepted: &[&str],
            #[case] rejected: &[&str],
        ) {
            assert_language(pattern, accepted, rejected);
        }

        #[test]
        fn repeated_simulation_is_stable() {
            // given
            let nfa = compile("a(b|c)*").unwrap();

            // when && then
            for _ in 0..3 {
                assert!(nfa.accepts("abcb"));
                assert!(!nfa.accepts("ba"));
            }
        }
    }

    mod postfix {
        use super::*;

        #[rstest]
        #[case("ab·", "ab", "ba")]
        #[case("ba·", "ba", "ab")]
        #[case("ab|", "b", "ab")]
        #[case("a*", "aaa", "b")]
        #[case("a+", "a", "")]
        #[case("a?", "", "aa")]
        #[case("abc|*·", "acb", "b")]
        fn compiles_postfix_directly(
            #[case] postfix: &str,
            #[case] accepted: &str,
            #[case] rejected: &str,
        ) {
            // when
            let nfa = compile_postfix(postfix).unwrap();

            // then
            assert!(nfa.accepts(accepted));
            assert!(!nfa.accepts(rejected));
        }

        #[test]
        fn binary_operands_are_popped_right_first() {
            // given
            let nfa = compile_postfix("ab·").unwrap();

            // then: 'a' is the first operand, its start is the automaton start
            let start = nfa.state(nfa.start()).unwrap();
            assert_eq!(start.transitions_on('a').count(), 1);
            assert_eq!(start.transitions_on('b').count(), 0);
        }

        #[test]
        fn empty_postfix_is_the_empty_language_automaton() {
            // when
            let nfa = compile_postfix("").unwrap();

            // then
            assert_eq!(nfa.state_count(), 1);
            assert_eq!(nfa.start(), nfa.accept());
        }
    }

    mod structure {
        use super::*;

        #[rstest]
        #[case("structure_concatenation", "ab")]
        #[case("structure_union", "a|b")]
        #[case("structure_star", "a*")]
        fn dumps_construction(#[case] name: &str, #[case] pattern: &str) {
            // when
            let nfa = compile(pattern).unwrap();

            // then
            INSTA_SETTINGS.bind(|| insta::assert_snapshot!(name, nfa.to_string()));
        }
    }

    mod errors {
        use super::*;

        #[rstest]
        #[case("missing_operand_for_union", "a|")]
        #[case("missing_operand_for_leading_union", "|a")]
        #[case("missing_operand_for_double_union", "a||b")]
        #[case("missing_operand_for_star", "*")]
        #[case("missing_operand_for_plus", "+a")]
        #[case("missing_operand_in_group", "(*a)")]
        #[case("unclosed_parenthesis", "a(b")]
        #[case("unexpected_closing_parenthesis", "a)b")]
        fn malformed_infix_fails(#[case] name: &str, #[case] pattern: &str) {
            // when
            let err = compile(pattern).unwrap_err();

            // then
            INSTA_SETTINGS.bind(|| insta::assert_yaml_snapshot!(name, err));
        }

        #[test]
        fn leftover_operands_fail() {
            // when
            let res = compile_postfix("ab");

            // then
            assert_eq!(
                res,
                Err(RegexError::new_general(RegexErrorKind::DanglingOperands(2)))
            );
        }

        #[test]
        fn parentheses_are_rejected_in_postfix() {
            // when
            let res = compile_postfix("(a)");

            // then
            assert_eq!(
                res,
                Err(RegexError::new(RegexErrorKind::UnexpectedParenthesis, 0))
            );
        }

        #[test]
        fn concatenation_missing_left_operand() {
            // when
            let res = compile_postfix("a·");

            // then
            assert_eq!(
                res,
                Err(RegexError::new(
                    RegexErrorKind::MissingOperand(Token::Concat),
                    1
                ))
            );
        }
    }
}
