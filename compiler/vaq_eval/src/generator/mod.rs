//! Single-pass parser and evaluator.
//!
//! There is no syntax tree: each grammar rule evaluates as it parses and
//! returns an [`Operand`], the value plus the [`Place`] it was read from when
//! the expression is assignable. Assignment writes through that place.
//!
//! Precedence, loosest to tightest: assignment, equality, comparison, term,
//! factor, unary, subscript, call/property, primary.
//!
//! Syntax and User errors are reported to the runtime and put the generator
//! in panic mode until the next statement boundary. While panicking, further
//! errors are suppressed and the statement performs no side effects. Fatal
//! errors are returned as [`FatalError`].

mod call;
mod expr;
mod stmt;

use std::path::PathBuf;

use smallvec::SmallVec;
use vaq_diagnostic::{Anchor, Diagnostic, ErrorContext};
use vaq_lexer::{Scanner, Token, TokenKind};
use vaq_runtime::{ObjRef, Object, Value};

use crate::error::FatalError;
use crate::runtime::Runtime;
use crate::stack::ensure_sufficient_stack;

/// Maximum depth of nested sub-expressions.
pub const MAX_NESTING: usize = 256;

/// Storage an expression's value was read from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Place {
    Global(ObjRef),
    /// Index into the generator's locals.
    Local(usize),
    Element { array: ObjRef, index: usize },
}

/// Result of evaluating an expression.
#[derive(Copy, Clone, Debug)]
pub struct Operand {
    pub value: Value,
    pub place: Option<Place>,
}

impl Operand {
    /// A computed value that cannot be assigned to.
    #[inline]
    pub fn value(value: Value) -> Self {
        Operand { value, place: None }
    }

    #[inline]
    pub fn nil() -> Self {
        Operand::value(Value::Nil)
    }
}

#[derive(Copy, Clone, Debug)]
struct Local {
    name: ObjRef,
    value: Value,
    depth: u32,
}

pub struct Generator<'rt, 'src> {
    rt: &'rt mut Runtime,
    scanner: Scanner<'src>,
    file: PathBuf,
    previous: Token<'src>,
    current: Token<'src>,
    /// Token after `current`, scanned on demand to spot `name =` keyword
    /// arguments.
    lookahead: Option<Token<'src>>,
    locals: SmallVec<[Local; 8]>,
    scope_depth: u32,
    panic_mode: bool,
    nesting: usize,
}

impl<'rt, 'src> Generator<'rt, 'src> {
    /// Generator over `source`, the contents of `file`. `file` must already
    /// be on the runtime's include stack.
    pub fn new(rt: &'rt mut Runtime, file: PathBuf, source: &'src str) -> Self {
        let mut generator = Generator {
            rt,
            scanner: Scanner::new(source),
            file,
            previous: Token::none(),
            current: Token::none(),
            lookahead: None,
            locals: SmallVec::new(),
            scope_depth: 0,
            panic_mode: false,
            nesting: 0,
        };
        generator.advance();
        generator
    }

    /// Evaluate every remaining statement.
    pub fn run(mut self) -> Result<(), FatalError> {
        while !self.is_at_end() {
            self.declaration()?;
        }
        Ok(())
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current.is(TokenKind::Eof)
    }

    pub fn begin_scope(&mut self) {
        self.scope_depth += 1;
    }

    /// Leave the innermost scope, dropping its locals.
    pub fn end_scope(&mut self) {
        self.scope_depth = self.scope_depth.saturating_sub(1);
        while self
            .locals
            .last()
            .is_some_and(|local| local.depth > self.scope_depth)
        {
            self.locals.pop();
        }
    }

    // Token stream

    fn advance(&mut self) {
        self.previous = self.current;
        loop {
            self.current = match self.lookahead.take() {
                Some(token) => token,
                None => self.scanner.scan_token(),
            };
            let TokenKind::Error(error) = self.current.kind else {
                break;
            };
            self.error_at(self.current, ErrorContext::Syntax, error.to_string());
        }
    }

    /// Kind of the token after `current`.
    fn peek_next(&mut self) -> TokenKind {
        let scanner = &mut self.scanner;
        self.lookahead.get_or_insert_with(|| scanner.scan_token()).kind
    }

    #[inline]
    fn check(&self, kind: TokenKind) -> bool {
        self.current.is(kind)
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if !self.check(kind) {
            return false;
        }
        self.advance();
        true
    }

    fn consume(&mut self, kind: TokenKind, message: &str) {
        if !self.match_token(kind) {
            self.error_at(self.current, ErrorContext::Syntax, message);
        }
    }

    /// Skip to a statement boundary and leave panic mode.
    fn synchronize(&mut self) {
        self.panic_mode = false;
        while !self.is_at_end() {
            if self.previous.is(TokenKind::Semicolon) || self.current.kind.starts_statement() {
                return;
            }
            self.advance();
        }
    }

    // Diagnostics

    fn diagnostic(&self, token: Token<'_>, context: ErrorContext, message: impl Into<String>) -> Diagnostic {
        let anchor = match token.kind {
            TokenKind::Eof => Anchor::End,
            TokenKind::Error(_) => Anchor::None,
            _ => Anchor::Lexeme(token.text.to_owned()),
        };
        Diagnostic::new(context, message)
            .with_file(self.file.clone())
            .at(token.line, anchor)
            .with_include_trace(self.rt.include_trace())
    }

    /// Report a recoverable error unless already panicking.
    fn error_at(&mut self, token: Token<'_>, context: ErrorContext, message: impl Into<String>) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        let diagnostic = self.diagnostic(token, context, message);
        self.rt.report(diagnostic);
    }

    fn internal_error(&self, message: impl Into<String>) -> FatalError {
        FatalError::internal(self.diagnostic(self.previous, ErrorContext::Internal, message))
    }

    // Nesting

    /// Run a nested rule, bounding the nesting depth and growing the stack
    /// as needed.
    fn nested(&mut self, rule: fn(&mut Self) -> Result<Operand, FatalError>) -> Result<Operand, FatalError> {
        if self.nesting >= MAX_NESTING {
            return Err(self.internal_error("Expression nesting too deep."));
        }
        self.nesting += 1;
        let result = ensure_sufficient_stack(|| rule(self));
        self.nesting -= 1;
        result
    }

    // Places

    fn read(&self, place: Place) -> Value {
        match place {
            Place::Global(name) => self
                .rt
                .globals
                .get(Value::Object(name))
                .copied()
                .unwrap_or_default(),
            Place::Local(index) => self.locals.get(index).map_or(Value::Nil, |local| local.value),
            Place::Element { array, index } => self
                .rt
                .heap
                .as_array(array)
                .and_then(|elements| elements.get(index).copied())
                .unwrap_or_default(),
        }
    }

    fn assign(&mut self, place: Place, value: Value) {
        match place {
            Place::Global(name) => {
                self.rt.globals.put(Value::Object(name), value);
            }
            Place::Local(index) => {
                if let Some(local) = self.locals.get_mut(index) {
                    local.value = value;
                }
            }
            Place::Element { array, index } => {
                if let Object::Array(elements) = self.rt.heap.get_mut(array) {
                    if let Some(slot) = elements.get_mut(index) {
                        *slot = value;
                    }
                }
            }
        }
    }

    /// Resolve an identifier to its storage, creating it if needed.
    ///
    /// At depth 0 names live in the globals. Inside a scope the most recent
    /// local wins, then a global, and otherwise a new local is declared.
    fn resolve(&mut self, name: ObjRef) -> Place {
        let key = Value::Object(name);
        if self.scope_depth == 0 {
            if !self.rt.globals.has(key) {
                self.rt.globals.put(key, Value::Nil);
            }
            return Place::Global(name);
        }

        if let Some(index) = self.locals.iter().rposition(|local| local.name == name) {
            return Place::Local(index);
        }
        if self.rt.globals.has(key) {
            return Place::Global(name);
        }
        self.locals.push(Local {
            name,
            value: Value::Nil,
            depth: self.scope_depth,
        });
        Place::Local(self.locals.len() - 1)
    }
}
