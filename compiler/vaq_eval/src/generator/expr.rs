//! Expression rules, from assignment down to primary.

use vaq_diagnostic::ErrorContext;
use vaq_lexer::TokenKind;
use vaq_runtime::Value;

use super::{Generator, Operand, Place};
use crate::error::FatalError;

type EvalResult = Result<Operand, FatalError>;

impl Generator<'_, '_> {
    pub(super) fn expression(&mut self) -> EvalResult {
        self.nested(Self::assignment)
    }

    fn assignment(&mut self) -> EvalResult {
        let target = self.equality()?;
        if !self.match_token(TokenKind::Equal) {
            return Ok(target);
        }
        let equals = self.previous;
        let value = self.nested(Self::assignment)?.value;

        match target.place {
            Some(place) => {
                if !self.panic_mode {
                    self.assign(place, value);
                }
            }
            None => self.error_at(equals, ErrorContext::Syntax, "Invalid assignment target."),
        }
        Ok(Operand::value(value))
    }

    fn equality(&mut self) -> EvalResult {
        let mut lhs = self.comparison()?;
        while self.match_token(TokenKind::EqualEqual) || self.match_token(TokenKind::BangEqual) {
            let op = self.previous.kind;
            let rhs = self.comparison()?;
            let equal = lhs
                .value
                .equals(rhs.value)
                .map_err(|err| self.internal_error(err.to_string()))?;
            lhs = Operand::value(Value::Bool(equal == (op == TokenKind::EqualEqual)));
        }
        Ok(lhs)
    }

    fn comparison(&mut self) -> EvalResult {
        let mut lhs = self.term()?;
        loop {
            let op = self.current;
            if !matches!(
                op.kind,
                TokenKind::Less | TokenKind::LessEqual | TokenKind::Greater | TokenKind::GreaterEqual
            ) {
                break;
            }
            self.advance();
            let rhs = self.term()?;

            let (Value::Number(_), Value::Number(_)) = (lhs.value, rhs.value) else {
                self.error_at(op, ErrorContext::User, "Expected numbers for comparison operation.");
                lhs = Operand::nil();
                continue;
            };
            // NaN orders with nothing; every comparison with it is false.
            let result = lhs.value.compare(rhs.value).is_some_and(|ord| match op.kind {
                TokenKind::Less => ord.is_lt(),
                TokenKind::LessEqual => ord.is_le(),
                TokenKind::Greater => ord.is_gt(),
                _ => ord.is_ge(),
            });
            lhs = Operand::value(Value::Bool(result));
        }
        Ok(lhs)
    }

    fn term(&mut self) -> EvalResult {
        let mut lhs = self.factor()?;
        loop {
            let op = self.current;
            if !matches!(op.kind, TokenKind::Plus | TokenKind::Minus) {
                break;
            }
            self.advance();
            let rhs = self.factor()?;

            lhs = match (op.kind, lhs.value, rhs.value) {
                (TokenKind::Plus, Value::Number(a), Value::Number(b)) => Operand::value(Value::Number(a + b)),
                (TokenKind::Minus, Value::Number(a), Value::Number(b)) => Operand::value(Value::Number(a - b)),
                (TokenKind::Plus, Value::Object(a), Value::Object(b)) => match self.rt.heap.concat(a, b) {
                    Some(joined) => Operand::value(Value::Object(joined)),
                    None => {
                        self.error_at(op, ErrorContext::User, "Expected numbers or strings for addition.");
                        Operand::nil()
                    }
                },
                (TokenKind::Plus, _, _) => {
                    self.error_at(op, ErrorContext::User, "Expected numbers or strings for addition.");
                    Operand::nil()
                }
                _ => {
                    self.error_at(op, ErrorContext::User, "Expected numbers for subtraction.");
                    Operand::nil()
                }
            };
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> EvalResult {
        let mut lhs = self.unary()?;
        loop {
            let op = self.current;
            if !matches!(op.kind, TokenKind::Star | TokenKind::Slash) {
                break;
            }
            self.advance();
            let rhs = self.unary()?;

            lhs = match (lhs.value, rhs.value) {
                (Value::Number(a), Value::Number(b)) if op.kind == TokenKind::Star => {
                    Operand::value(Value::Number(a * b))
                }
                (Value::Number(a), Value::Number(b)) => Operand::value(Value::Number(a / b)),
                _ => {
                    self.error_at(
                        op,
                        ErrorContext::User,
                        "Expected numbers for multiplication or division.",
                    );
                    Operand::nil()
                }
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> EvalResult {
        let op = self.current;
        match op.kind {
            TokenKind::Bang => {
                self.advance();
                let operand = self.nested(Self::unary)?;
                match operand.value {
                    Value::Bool(b) => Ok(Operand::value(Value::Bool(!b))),
                    _ => {
                        self.error_at(op, ErrorContext::User, "Expected boolean for logical not.");
                        Ok(Operand::nil())
                    }
                }
            }
            TokenKind::Minus => {
                self.advance();
                let operand = self.nested(Self::unary)?;
                match operand.value {
                    Value::Number(n) => Ok(Operand::value(Value::Number(-n))),
                    _ => {
                        self.error_at(op, ErrorContext::User, "Expected number for unary minus.");
                        Ok(Operand::nil())
                    }
                }
            }
            _ => self.subscript(),
        }
    }

    fn subscript(&mut self) -> EvalResult {
        let mut operand = self.call()?;
        while self.match_token(TokenKind::LeftBracket) {
            let bracket = self.previous;
            let index = self.expression()?.value;
            self.consume(TokenKind::RightBracket, "Expected ']' after array subscript.");
            operand = self.index_into(operand, index, bracket);
        }
        Ok(operand)
    }

    /// `target[index]`. The element is assignable only when `target` itself is.
    fn index_into(&mut self, target: Operand, index: Value, bracket: vaq_lexer::Token<'_>) -> Operand {
        let assignable = target.place.is_some();
        let target = target.value;
        if target.is_nil() {
            self.error_at(bracket, ErrorContext::User, "Cannot index into nil value.");
            return Operand::nil();
        }
        let Value::Number(n) = index else {
            let found = self.rt.heap.display(index).to_string();
            self.error_at(
                bracket,
                ErrorContext::User,
                format!("Expected number for array subscript, found '{found}' instead."),
            );
            return Operand::nil();
        };
        let Some(index) = array_index(n) else {
            self.error_at(
                bracket,
                ErrorContext::User,
                format!("Invalid number for array subscript {n}."),
            );
            return Operand::nil();
        };
        let array = match target {
            Value::Object(r) if self.rt.heap.as_array(r).is_some() => r,
            _ => {
                let found = self.rt.heap.display(target).to_string();
                self.error_at(
                    bracket,
                    ErrorContext::User,
                    format!("Expected array as subscript target, found '{found}' instead."),
                );
                return Operand::nil();
            }
        };
        let len = self.rt.heap.as_array(array).map_or(0, <[Value]>::len);
        if index >= len {
            self.error_at(
                bracket,
                ErrorContext::User,
                format!("Array subscript index {index} is too big for array of size {len}."),
            );
            return Operand::nil();
        }

        let place = Place::Element { array, index };
        let value = self.read(place);
        Operand {
            value,
            place: assignable.then_some(place),
        }
    }

    pub(super) fn primary(&mut self) -> EvalResult {
        let token = self.current;
        match token.kind {
            TokenKind::False => {
                self.advance();
                Ok(Operand::value(Value::Bool(false)))
            }
            TokenKind::True => {
                self.advance();
                Ok(Operand::value(Value::Bool(true)))
            }
            TokenKind::Nil => {
                self.advance();
                Ok(Operand::nil())
            }
            TokenKind::Number => {
                self.advance();
                let n = token
                    .text
                    .parse::<f64>()
                    .map_err(|err| self.internal_error(format!("Invalid number literal: {err}.")))?;
                Ok(Operand::value(Value::Number(n)))
            }
            TokenKind::String => {
                self.advance();
                let string = self.rt.heap.intern(token.text);
                Ok(Operand::value(Value::Object(string)))
            }
            TokenKind::LeftBracket => {
                self.advance();
                self.array_literal()
            }
            TokenKind::LeftParen => {
                self.advance();
                self.grouping()
            }
            TokenKind::Identifier => {
                self.advance();
                let name = self.rt.heap.intern(token.text);
                let place = self.resolve(name);
                Ok(Operand {
                    value: self.read(place),
                    place: Some(place),
                })
            }
            _ => {
                self.error_at(token, ErrorContext::Syntax, "Expected expression.");
                Ok(Operand::nil())
            }
        }
    }

    /// `( expression )`; the opening parenthesis is already consumed.
    pub(super) fn grouping(&mut self) -> EvalResult {
        let inner = self.expression()?;
        self.consume(TokenKind::RightParen, "Expected ')' after expression.");
        Ok(Operand::value(inner.value))
    }

    /// `[a, b, ...]`; the opening bracket is already consumed.
    fn array_literal(&mut self) -> EvalResult {
        let mut elements = Vec::new();
        if !self.check(TokenKind::RightBracket) {
            loop {
                elements.push(self.expression()?.value);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightBracket, "Expected ']' after array.");
        Ok(Operand::value(Value::Object(self.rt.heap.new_array(elements))))
    }
}

/// `n` as an array index, if it is a non-negative integer in range.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn array_index(n: f64) -> Option<usize> {
    (n >= 0.0 && n.fract() == 0.0 && n <= usize::MAX as f64).then(|| n as usize)
}

#[cfg(test)]
mod tests {
    use super::array_index;

    #[test]
    fn test_array_index() {
        assert_eq!(array_index(0.0), Some(0));
        assert_eq!(array_index(3.0), Some(3));
        assert_eq!(array_index(-1.0), None);
        assert_eq!(array_index(1.5), None);
        assert_eq!(array_index(f64::NAN), None);
        assert_eq!(array_index(f64::INFINITY), None);
    }
}
