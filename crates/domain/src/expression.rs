//! Evaluator for user-composed arithmetic line items such as `20+5*2`.
//!
//! A character whitelist is applied before parsing so that everything other
//! than plain arithmetic is rejected up front. A valid expression must
//! resolve to a single positive finite magnitude to be usable as a
//! calculation item value.

use std::{iter::Peekable, str::Chars};

/// Evaluates a restricted arithmetic expression.
///
/// Supports `+`, `-`, `*`, `/`, unary sign, parenthesis nesting and the
/// usual operator precedence. Never panics.
pub fn evaluate_expression(text: &str) -> Result<f32, ExpressionError> {
    if let Some(char) = text
        .chars()
        .find(|c| !matches!(c, '0'..='9' | '+' | '-' | '*' | '/' | '(' | ')' | '.') && !c.is_whitespace())
    {
        return Err(ExpressionError::ForbiddenCharacter(char));
    }

    let mut parser = Parser::new(text);
    let result = parser.expression()?;
    parser.end()?;

    if !result.is_finite() || result <= 0.0 {
        return Err(ExpressionError::NonPositive(result));
    }

    #[allow(clippy::cast_possible_truncation)]
    let value = result as f32;
    Ok(value)
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ExpressionError {
    #[error("Expression contains forbidden character: {0:?}")]
    ForbiddenCharacter(char),
    #[error("Expression is malformed")]
    Syntax,
    #[error("Expression must result in a positive number (got {0})")]
    NonPositive(f64),
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
        }
    }

    fn expression(&mut self) -> Result<f64, ExpressionError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some('+') => {
                    self.chars.next();
                    value += self.term()?;
                }
                Some('-') => {
                    self.chars.next();
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, ExpressionError> {
        let mut value = self.factor()?;
        loop {
            match self.peek() {
                Some('*') => {
                    self.chars.next();
                    value *= self.factor()?;
                }
                Some('/') => {
                    self.chars.next();
                    value /= self.factor()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn factor(&mut self) -> Result<f64, ExpressionError> {
        match self.peek() {
            Some('-') => {
                self.chars.next();
                Ok(-self.factor()?)
            }
            Some('+') => {
                self.chars.next();
                self.factor()
            }
            Some('(') => {
                self.chars.next();
                let value = self.expression()?;
                if self.peek() == Some(')') {
                    self.chars.next();
                    Ok(value)
                } else {
                    Err(ExpressionError::Syntax)
                }
            }
            _ => self.number(),
        }
    }

    fn number(&mut self) -> Result<f64, ExpressionError> {
        let mut literal = String::new();
        while let Some(&char) = self.chars.peek() {
            if char.is_ascii_digit() || char == '.' {
                literal.push(char);
                self.chars.next();
            } else {
                break;
            }
        }
        if literal.is_empty() || literal.chars().filter(|&c| c == '.').count() > 1 {
            return Err(ExpressionError::Syntax);
        }
        literal.parse().map_err(|_| ExpressionError::Syntax)
    }

    fn end(&mut self) -> Result<(), ExpressionError> {
        if self.peek().is_none() {
            Ok(())
        } else {
            Err(ExpressionError::Syntax)
        }
    }

    fn peek(&mut self) -> Option<char> {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
        self.chars.peek().copied()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("2+2", 4.0)]
    #[case("20+5*2", 30.0)]
    #[case("(20+5)*2", 50.0)]
    #[case("100/4", 25.0)]
    #[case("2.5 * 4", 10.0)]
    #[case("-(-5)", 5.0)]
    #[case("((1+2)*(3+4))", 21.0)]
    #[case("7", 7.0)]
    fn test_evaluate_expression_valid(#[case] text: &str, #[case] expected: f32) {
        assert_eq!(evaluate_expression(text), Ok(expected));
    }

    #[rstest]
    #[case("2+", ExpressionError::Syntax)]
    #[case("(2+3", ExpressionError::Syntax)]
    #[case("2+3)", ExpressionError::Syntax)]
    #[case("1..5", ExpressionError::Syntax)]
    #[case("2 3", ExpressionError::Syntax)]
    #[case("", ExpressionError::Syntax)]
    #[case("*2", ExpressionError::Syntax)]
    fn test_evaluate_expression_malformed(#[case] text: &str, #[case] expected: ExpressionError) {
        assert_eq!(evaluate_expression(text), Err(expected));
    }

    #[rstest]
    #[case("DROP TABLE", 'D')]
    #[case("2+x", 'x')]
    #[case("1e3", 'e')]
    #[case("2^3", '^')]
    fn test_evaluate_expression_forbidden_character(#[case] text: &str, #[case] char: char) {
        assert_eq!(
            evaluate_expression(text),
            Err(ExpressionError::ForbiddenCharacter(char))
        );
    }

    #[rstest]
    #[case("0-5", -5.0)]
    #[case("0", 0.0)]
    #[case("2-2", 0.0)]
    #[case("5/0", f64::INFINITY)]
    fn test_evaluate_expression_non_positive(#[case] text: &str, #[case] result: f64) {
        assert_eq!(
            evaluate_expression(text),
            Err(ExpressionError::NonPositive(result))
        );
    }
}
