use anyhow::{Result, anyhow};
use colored::Colorize;
use lazy_static::lazy_static;
use regex::Regex;

use crate::lexer::token::{Token, TokenKind, lookup_keyword};
use crate::span::{FileId, Span};

type TokenHandler = Box<dyn Fn(&str) -> Option<(TokenKind, Box<str>)> + Send + Sync>;

#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    file_id: FileId,
    pos: usize,
    line: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, file_id: FileId) -> Self {
        Self {
            source,
            file_id,
            pos: 0,
            line: 1,
        }
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn advance(&mut self, len: usize) {
        let advanced_text = &self.source[self.pos..self.pos + len];
        self.line += advanced_text.matches('\n').count();
        self.pos += len;
    }

    fn remaining_input(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens: Vec<Token> = vec![];

        while !self.at_eof() {
            let remaining = self.remaining_input();
            let mut matched = false;
            let mut match_len = 0;

            for handler in REGEXES.iter() {
                if let Some(mat) = handler.regex.find(remaining) {
                    if mat.start() == 0 {
                        let matched_text = mat.as_str();
                        if let Some((kind, value)) = (handler.handler)(matched_text) {
                            let span = Span::new(
                                self.pos as u32,
                                (self.pos + matched_text.len()) as u32,
                            );
                            tokens.push(Token::new(kind, value, span, self.file_id));
                        }
                        match_len = matched_text.len();
                        matched = true;
                        break;
                    }
                }
            }

            if !matched {
                let next_char = remaining.chars().next().unwrap_or('\0');
                return Err(anyhow!(
                    "{}",
                    format!(
                        "Unexpected character at line {}, position {}: '{}'",
                        self.line, self.pos, next_char,
                    )
                    .red()
                    .bold()
                ));
            }

            self.advance(match_len);
        }

        let end = self.source.len() as u32;
        tokens.push(Token::new(
            TokenKind::Eof,
            "",
            Span::new(end, end),
            self.file_id,
        ));

        Ok(tokens)
    }
}

pub fn tokenize(source: &str, file_id: FileId) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(source, file_id);
    lexer.tokenize()
}

fn token_handler(kind: TokenKind) -> TokenHandler {
    Box::new(move |val| Some((kind, val.into())))
}

fn skip_handler() -> TokenHandler {
    Box::new(|_| None)
}

fn quoted_literal_handler(kind: TokenKind) -> TokenHandler {
    Box::new(move |val: &str| {
        let inner = &val[1..val.len() - 1];
        Some((kind, inner.into()))
    })
}

fn identifier_handler() -> TokenHandler {
    Box::new(|val| {
        if let Some(kind) = lookup_keyword(val) {
            Some((kind, val.into()))
        } else {
            Some((TokenKind::Identifier, val.into()))
        }
    })
}

struct RegexHandler {
    regex: Regex,
    handler: TokenHandler,
}

impl RegexHandler {
    fn new(regex: Regex, handler: TokenHandler) -> Self {
        Self { regex, handler }
    }
}

macro_rules! regex_handler {
    // For special handlers like skip_handler(), identifier_handler()
    ($pattern:expr, $handler:expr) => {
        RegexHandler::new(Regex::new($pattern).unwrap(), $handler)
    };

    // For plain token handlers with a TokenKind
    ($pattern:expr, token $kind:expr) => {
        RegexHandler::new(Regex::new($pattern).unwrap(), token_handler($kind))
    };
}

use TokenKind as T;
lazy_static! {
    static ref REGEXES: Vec<RegexHandler> = vec![
        // Whitespace (check first to skip efficiently)
        regex_handler!(r"^\s+", skip_handler()),

        // Preprocessor lines. Linemarkers are consumed here as plain
        // directives; the source map records their effect separately.
        regex_handler!(r"^#[^\n]*", skip_handler()),

        // Comments
        regex_handler!(r"^//[^\n]*", skip_handler()),
        regex_handler!(r"^/\*[\s\S]*?\*/", skip_handler()),

        // Three-character operators
        regex_handler!(r"^\.\.\.", token T::Ellipsis),
        regex_handler!(r"^<<=", token T::ShiftLeftEquals),
        regex_handler!(r"^>>=", token T::ShiftRightEquals),

        // Two-character operators (must come before single chars)
        regex_handler!(r"^->", token T::Arrow),
        regex_handler!(r"^\+\+", token T::PlusPlus),
        regex_handler!(r"^--", token T::DashDash),
        regex_handler!(r"^<<", token T::ShiftLeft),
        regex_handler!(r"^>>", token T::ShiftRight),
        regex_handler!(r"^<=", token T::LessEquals),
        regex_handler!(r"^>=", token T::MoreEquals),
        regex_handler!(r"^==", token T::EqualsEquals),
        regex_handler!(r"^!=", token T::NotEquals),
        regex_handler!(r"^&&", token T::AndAnd),
        regex_handler!(r"^\|\|", token T::OrOr),
        regex_handler!(r"^\+=", token T::PlusEquals),
        regex_handler!(r"^-=", token T::DashEquals),
        regex_handler!(r"^\*=", token T::StarEquals),
        regex_handler!(r"^/=", token T::SlashEquals),
        regex_handler!(r"^%=", token T::PercentEquals),
        regex_handler!(r"^&=", token T::AmpEquals),
        regex_handler!(r"^\|=", token T::PipeEquals),
        regex_handler!(r"^\^=", token T::CaretEquals),

        // String and character literals
        regex_handler!(r#"^"(?:[^"\\\n]|\\.)*""#, quoted_literal_handler(T::StringLiteral)),
        regex_handler!(r"^'(?:[^'\\\n]|\\.)*'", quoted_literal_handler(T::CharLiteral)),

        // Numbers (decimal, hex, float, with C suffixes)
        regex_handler!(
            r"^(?:0[xX][0-9a-fA-F]+|[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?)[uUlLfF]*",
            token T::Number
        ),

        // Identifiers (keyword lookup happens in the handler)
        regex_handler!(r"^[a-zA-Z_][a-zA-Z0-9_]*", identifier_handler()),

        // Single character tokens
        regex_handler!(r"^\(", token T::OpenParen),
        regex_handler!(r"^\)", token T::CloseParen),
        regex_handler!(r"^\{", token T::OpenCurly),
        regex_handler!(r"^\}", token T::CloseCurly),
        regex_handler!(r"^\[", token T::OpenBracket),
        regex_handler!(r"^\]", token T::CloseBracket),
        regex_handler!(r"^;", token T::Semicolon),
        regex_handler!(r"^,", token T::Comma),
        regex_handler!(r"^\*", token T::Star),
        regex_handler!(r"^\.", token T::Dot),
        regex_handler!(r"^\+", token T::Plus),
        regex_handler!(r"^-", token T::Dash),
        regex_handler!(r"^/", token T::Slash),
        regex_handler!(r"^%", token T::Percent),
        regex_handler!(r"^&", token T::Amp),
        regex_handler!(r"^\|", token T::Pipe),
        regex_handler!(r"^\^", token T::Caret),
        regex_handler!(r"^~", token T::Tilde),
        regex_handler!(r"^!", token T::Bang),
        regex_handler!(r"^\?", token T::Question),
        regex_handler!(r"^:", token T::Colon),
        regex_handler!(r"^<", token T::Less),
        regex_handler!(r"^>", token T::More),
        regex_handler!(r"^=", token T::Equals),
    ];
}
