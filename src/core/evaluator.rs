//! Amount expressions such as `37.95*12`.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EvalError {
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("division by zero")]
    DivisionByZero,
    #[error("result is not a finite number")]
    NotFinite,
    #[error("expression nests deeper than {MAX_DEPTH} levels")]
    TooDeep,
}

pub const MAX_DEPTH: usize = 256;

#[async_trait]
pub trait ExpressionEvaluator: Send + Sync {
    async fn evaluate(&self, expression: &str) -> Result<f64, EvalError>;
}

/// Evaluates `+ - * / % ^` and parentheses over decimal numbers.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArithmeticEvaluator;

#[async_trait]
impl ExpressionEvaluator for ArithmeticEvaluator {
    async fn evaluate(&self, expression: &str) -> Result<f64, EvalError> {
        evaluate(expression)
    }
}

pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    let mut parser = Parser {
        chars: expression.chars().collect(),
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    parser.skip_whitespace();
    if let Some(c) = parser.peek() {
        return Err(EvalError::UnexpectedChar(c, parser.pos));
    }
    if !value.is_finite() {
        return Err(EvalError::NotFinite);
    }
    Ok(value)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn enter(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::TooDeep);
        }
        Ok(())
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        loop {
            if self.eat('+') {
                value += self.term()?;
            } else if self.eat('-') {
                value -= self.term()?;
            } else {
                return Ok(value);
            }
        }
    }

    // term := power (('*' | '/' | '%') power)*
    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.power()?;
        loop {
            if self.eat('*') {
                value *= self.power()?;
            } else if self.eat('/') {
                let rhs = self.power()?;
                if rhs == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                value /= rhs;
            } else if self.eat('%') {
                let rhs = self.power()?;
                if rhs == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                value %= rhs;
            } else {
                return Ok(value);
            }
        }
    }

    // power := unary ('^' power)?
    fn power(&mut self) -> Result<f64, EvalError> {
        let base = self.unary()?;
        if self.eat('^') {
            self.enter()?;
            let exponent = self.power()?;
            self.depth -= 1;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    // Signs are folded iteratively so long runs of them don't recurse.
    fn unary(&mut self) -> Result<f64, EvalError> {
        let mut negate = false;
        loop {
            if self.eat('-') {
                negate = !negate;
            } else if !self.eat('+') {
                break;
            }
        }
        let value = self.atom()?;
        Ok(if negate { -value } else { value })
    }

    fn atom(&mut self) -> Result<f64, EvalError> {
        if self.eat('(') {
            self.enter()?;
            let value = self.expr()?;
            if !self.eat(')') {
                return match self.peek() {
                    Some(c) => Err(EvalError::UnexpectedChar(c, self.pos)),
                    None => Err(EvalError::UnexpectedEnd),
                };
            }
            self.depth -= 1;
            return Ok(value);
        }
        self.number()
    }

    fn number(&mut self) -> Result<f64, EvalError> {
        self.skip_whitespace();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || c == '.')
        {
            self.pos += 1;
        }
        if start == self.pos {
            return match self.peek() {
                Some(c) => Err(EvalError::UnexpectedChar(c, self.pos)),
                None => Err(EvalError::UnexpectedEnd),
            };
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        literal
            .parse()
            .map_err(|_| EvalError::UnexpectedChar('.', start))
    }
}
