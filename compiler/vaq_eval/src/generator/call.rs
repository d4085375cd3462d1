//! Calls, arguments and property access.

use vaq_diagnostic::ErrorContext;
use vaq_lexer::{Token, TokenKind};
use vaq_runtime::{Arguments, NativeError, ObjRef, Object, Value};

use super::{Generator, Operand};
use crate::error::FatalError;

impl<'src> Generator<'_, 'src> {
    pub(super) fn call(&mut self) -> Result<Operand, FatalError> {
        let mut operand = self.primary()?;
        loop {
            if self.match_token(TokenKind::LeftParen) {
                let paren = self.previous;
                let args = self.arguments()?;
                operand = Operand::value(self.call_value(operand.value, &args, paren)?);
            } else if self.match_token(TokenKind::Dot) {
                self.consume(TokenKind::Identifier, "Expected property name after '.'.");
                let name = self.previous;
                if name.kind != TokenKind::Identifier {
                    return Ok(Operand::nil());
                }
                operand = self.property(operand.value, name)?;
            } else {
                break;
            }
        }
        Ok(operand)
    }

    /// Argument list after `(`, through the closing `)`.
    ///
    /// `name = value` pairs become keyword arguments; once one is seen every
    /// later argument must be a keyword argument too.
    fn arguments(&mut self) -> Result<Arguments, FatalError> {
        let mut args = Arguments::new();
        if !self.check(TokenKind::RightParen) {
            let mut keywords = false;
            loop {
                if self.check(TokenKind::Identifier) && self.peek_next() == TokenKind::Equal {
                    let name = self.current;
                    self.advance();
                    self.advance();
                    let value = self.expression()?.value;
                    let key = self.rt.heap.intern(name.text);
                    if !args.keywords.put(Value::Object(key), value) {
                        self.error_at(
                            name,
                            ErrorContext::User,
                            format!("Duplicate keyword argument '{}'.", name.text),
                        );
                    }
                    keywords = true;
                } else {
                    let start = self.current;
                    let value = self.expression()?.value;
                    if keywords {
                        self.error_at(
                            start,
                            ErrorContext::Syntax,
                            "Positional argument cannot follow keyword arguments.",
                        );
                    } else {
                        args.positional.push(value);
                    }
                }
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expected ')' after arguments.");
        Ok(args)
    }

    fn call_value(&mut self, callee: Value, args: &Arguments, paren: Token<'src>) -> Result<Value, FatalError> {
        let native = match callee {
            Value::Object(r) => match self.rt.heap.get(r) {
                Object::Native(native) => Some(native.clone()),
                _ => None,
            },
            _ => None,
        };
        let Some(native) = native else {
            self.error_at(paren, ErrorContext::User, "Can only call functions.");
            return Ok(Value::Nil);
        };

        if args.arity() != native.arity {
            let name = self.rt.heap.as_str(native.name).unwrap_or_default().to_owned();
            self.error_at(
                paren,
                ErrorContext::User,
                format!(
                    "Expected {} arguments for native function '{name}' but found {} instead.",
                    native.arity,
                    args.arity()
                ),
            );
            return Ok(Value::Nil);
        }
        if self.panic_mode {
            return Ok(Value::Nil);
        }

        let result = (native.function)(self.rt, args);
        result.map_err(|err| self.native_error(&err, paren))
    }

    /// `receiver.name`, calling it if it names a method.
    fn property(&mut self, receiver: Value, name: Token<'src>) -> Result<Operand, FatalError> {
        let instance = match receiver {
            Value::Object(r) if self.rt.heap.as_instance(r).is_some() => r,
            _ => {
                let found = self.rt.heap.type_name(receiver);
                self.error_at(
                    name,
                    ErrorContext::User,
                    format!("Only instances have properties, found {found}."),
                );
                return Ok(Operand::nil());
            }
        };

        let key = Value::Object(self.rt.heap.intern(name.text));
        let Some(found) = self.rt.heap.as_instance(instance) else {
            return Ok(Operand::nil());
        };
        if let Some(&field) = found.fields.get(key) {
            return Ok(Operand::value(field));
        }

        let method = match self.rt.heap.get(found.class) {
            Object::Class(class) => class.methods.get(key).copied().and_then(Value::as_object),
            _ => None,
        };
        let Some(method) = method else {
            let class = self.rt.heap.class_name(instance).unwrap_or_default().to_owned();
            self.error_at(
                name,
                ErrorContext::User,
                format!("Undefined property '{}' on '{class}'.", name.text),
            );
            return Ok(Operand::nil());
        };

        if !self.match_token(TokenKind::LeftParen) {
            self.error_at(name, ErrorContext::Syntax, "Methods must be called immediately.");
            return Ok(Operand::nil());
        }
        let paren = self.previous;
        let args = self.arguments()?;
        self.call_method(instance, method, &args, paren).map(Operand::value)
    }

    fn call_method(
        &mut self,
        receiver: ObjRef,
        method: ObjRef,
        args: &Arguments,
        paren: Token<'src>,
    ) -> Result<Value, FatalError> {
        let Object::Method(method) = self.rt.heap.get(method) else {
            return Err(self.internal_error("Class method table holds a non-method."));
        };
        let method = method.clone();

        if args.arity() != method.arity {
            let name = self.rt.heap.as_str(method.name).unwrap_or_default().to_owned();
            self.error_at(
                paren,
                ErrorContext::User,
                format!(
                    "Expected {} arguments for method '{name}' but found {} instead.",
                    method.arity,
                    args.arity()
                ),
            );
            return Ok(Value::Nil);
        }
        if self.panic_mode {
            return Ok(Value::Nil);
        }

        let result = (method.method)(self.rt, receiver, args);
        result.map_err(|err| self.native_error(&err, paren))
    }

    fn native_error(&self, error: &NativeError, at: Token<'_>) -> FatalError {
        FatalError::native(self.diagnostic(at, ErrorContext::Native, error.message()))
    }
}
