//! Statements.

use vaq_diagnostic::ErrorContext;
use vaq_lexer::TokenKind;

use super::Generator;
use crate::error::FatalError;

impl Generator<'_, '_> {
    /// Evaluate one statement, resynchronizing if it reported an error.
    pub fn declaration(&mut self) -> Result<(), FatalError> {
        self.statement()?;
        if self.panic_mode {
            self.synchronize();
        }
        Ok(())
    }

    fn statement(&mut self) -> Result<(), FatalError> {
        if self.match_token(TokenKind::Print) {
            self.print_statement()
        } else if self.match_token(TokenKind::Include) {
            self.include_statement()
        } else {
            self.expression_statement()
        }
    }

    /// `print(expression);`
    fn print_statement(&mut self) -> Result<(), FatalError> {
        self.consume(TokenKind::LeftParen, "Expected '(' after 'print'.");
        let value = self.grouping()?.value;
        if !self.panic_mode {
            let text = self.rt.heap.display(value).to_string();
            self.rt.print_handler().println(&text);
        }
        self.consume(TokenKind::Semicolon, "Expected ';' after print ')'.");
        Ok(())
    }

    /// `include "path";`, evaluated relative to the current file.
    fn include_statement(&mut self) -> Result<(), FatalError> {
        let start = self.current;
        let value = self.expression()?.value;
        let Some(path) = self.rt.heap.value_str(value).map(str::to_owned) else {
            self.error_at(start, ErrorContext::User, "Expected string after 'include'.");
            return Ok(());
        };
        self.consume(TokenKind::Semicolon, "Expected ';' after include string.");
        if self.panic_mode {
            return Ok(());
        }

        let resolved = match self.rt.loader.resolve(&self.file, &path) {
            Ok(resolved) => resolved,
            Err(_) => {
                self.error_at(
                    start,
                    ErrorContext::User,
                    format!("No file with path '{path}' was found."),
                );
                return Ok(());
            }
        };
        tracing::debug!(from = %self.file.display(), path = %resolved.display(), "including");
        self.rt.process_file(&resolved)
    }

    /// `expression;`
    fn expression_statement(&mut self) -> Result<(), FatalError> {
        self.expression()?;
        self.consume(TokenKind::Semicolon, "Expected ';' after expression.");
        Ok(())
    }
}
