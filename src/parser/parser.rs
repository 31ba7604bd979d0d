use anyhow::{Result, bail};
use colored::Colorize;

use crate::lexer::token::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn current_token(&self) -> &Token {
        let idx = self.pos.min(self.tokens.len().saturating_sub(1));
        &self.tokens[idx]
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len().saturating_sub(1));
        self.tokens[idx].kind
    }

    pub fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    pub fn has_tokens(&self) -> bool {
        self.pos < self.tokens.len() && self.current_token_kind() != TokenKind::Eof
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.current_token_kind() == kind
    }

    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            return true;
        }
        false
    }

    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token> {
        let kind = self.current_token_kind();

        if kind != expected_kind {
            bail!(
                "{}",
                format!("Expected {:?} but received {:?} instead", expected_kind, kind)
                    .red()
                    .bold()
            );
        }

        Ok(self.advance())
    }

    /// Consumes a balanced `open`..`close` group, starting at `open`.
    /// Returns the closing token.
    pub fn skip_balanced(&mut self, open: TokenKind, close: TokenKind) -> Result<Token> {
        self.expect(open)?;
        let mut depth = 1usize;

        loop {
            let kind = self.current_token_kind();
            if kind == TokenKind::Eof {
                bail!(
                    "{}",
                    format!("Unexpected end of file, expected {:?}", close)
                        .red()
                        .bold()
                );
            }

            let token = self.advance();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(token);
                }
            }
        }
    }

    /// Consumes up to and including the next semicolon at nesting depth
    /// zero. Initializer braces and grouping parens are stepped over.
    pub fn skip_to_semicolon(&mut self) -> Result<()> {
        let mut depth = 0usize;

        loop {
            match self.current_token_kind() {
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return Ok(());
                }
                TokenKind::OpenCurly | TokenKind::OpenParen | TokenKind::OpenBracket => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::CloseCurly | TokenKind::CloseParen | TokenKind::CloseBracket => {
                    depth = depth.saturating_sub(1);
                    self.advance();
                }
                TokenKind::Eof => {
                    bail!("{}", "Unexpected end of file in declaration".red().bold())
                }
                _ => {
                    self.advance();
                }
            }
        }
    }
}
