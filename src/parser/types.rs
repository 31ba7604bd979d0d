use std::collections::HashSet;

use anyhow::{Result, bail};
use colored::Colorize;
use lazy_static::lazy_static;

use crate::{
    ast::{
        Ident, Type, TypeKind,
        types::{EnumType, PointerType, RecordKeyword, RecordType, ScalarType},
    },
    lexer::token::TokenKind as T,
    parser::Parser,
    span::Span,
};

lazy_static! {
    // Specifiers and qualifiers that carry no type information for our
    // purposes, including the GCC spellings preprocessed sources contain.
    static ref QUALIFIERS: HashSet<&'static str> = HashSet::from([
        "const",
        "volatile",
        "static",
        "extern",
        "inline",
        "register",
        "auto",
        "restrict",
        "_Atomic",
        "_Noreturn",
        "_Thread_local",
        "__thread",
        "__restrict",
        "__restrict__",
        "__inline",
        "__inline__",
        "__extension__",
        "__volatile__",
    ]);

    // Words that combine into one arithmetic type name
    // (`unsigned long long int` is a single scalar).
    static ref ARITHMETIC_WORDS: HashSet<&'static str> = HashSet::from([
        "int",
        "char",
        "float",
        "double",
        "signed",
        "unsigned",
        "short",
        "long",
        "_Bool",
        "_Complex",
        "__int128",
    ]);
}

pub fn is_qualifier(name: &str) -> bool {
    QUALIFIERS.contains(name)
}

/// Parses declaration specifiers down to one base type. Qualifiers are
/// folded away; `__attribute__((...))` groups are skipped.
pub fn parse_declaration_specifiers(parser: &mut Parser) -> Result<Type> {
    let start = parser.current_token().span;
    let mut arithmetic: Vec<Box<str>> = Vec::new();
    let mut arithmetic_end = start;
    let mut base: Option<Type> = None;

    loop {
        match parser.current_token_kind() {
            T::Struct | T::Union if base.is_none() && arithmetic.is_empty() => {
                base = Some(parse_record_specifier(parser)?);
            }
            T::Enum if base.is_none() && arithmetic.is_empty() => {
                base = Some(parse_enum_specifier(parser)?);
            }
            T::Void if base.is_none() && arithmetic.is_empty() => {
                let token = parser.advance();
                base = Some(Type {
                    kind: TypeKind::Void,
                    span: token.span,
                });
            }
            T::Identifier => {
                let name = parser.current_token().value.clone();
                if QUALIFIERS.contains(&*name) {
                    parser.advance();
                } else if &*name == "__attribute__" {
                    parser.advance();
                    parser.skip_balanced(T::OpenParen, T::CloseParen)?;
                } else if base.is_none() && ARITHMETIC_WORDS.contains(&*name) {
                    let token = parser.advance();
                    arithmetic_end = token.span;
                    arithmetic.push(token.value);
                } else if base.is_none() && arithmetic.is_empty() {
                    // A typedef name in type position. Carried by name,
                    // never resolved.
                    let token = parser.advance();
                    base = Some(Type {
                        kind: TypeKind::Scalar(ScalarType { name: token.value }),
                        span: token.span,
                    });
                } else {
                    break;
                }
            }
            _ => break,
        }
    }

    if let Some(base) = base {
        return Ok(base);
    }

    if !arithmetic.is_empty() {
        let name = arithmetic.join(" ");
        return Ok(Type {
            kind: TypeKind::Scalar(ScalarType { name: name.into() }),
            span: Span::new(start.start(), arithmetic_end.end()),
        });
    }

    bail!(
        "{}",
        format!(
            "Expected type specifier, found {:?}",
            parser.current_token_kind()
        )
        .red()
        .bold()
    )
}

fn parse_record_specifier(parser: &mut Parser) -> Result<Type> {
    let keyword_token = parser.advance();
    let keyword = match keyword_token.kind {
        T::Union => RecordKeyword::Union,
        _ => RecordKeyword::Struct,
    };

    let (tag, mut end) = parse_tag(parser, keyword_token.span)?;

    if parser.at(T::OpenCurly) {
        let close = parser.skip_balanced(T::OpenCurly, T::CloseCurly)?;
        end = close.span;
    }

    Ok(Type {
        kind: TypeKind::Record(RecordType { keyword, tag }),
        span: Span::new(keyword_token.span.start(), end.end()),
    })
}

fn parse_enum_specifier(parser: &mut Parser) -> Result<Type> {
    let keyword_token = parser.advance();

    let (tag, mut end) = parse_tag(parser, keyword_token.span)?;

    if parser.at(T::OpenCurly) {
        let close = parser.skip_balanced(T::OpenCurly, T::CloseCurly)?;
        end = close.span;
    }

    Ok(Type {
        kind: TypeKind::Enum(EnumType { tag }),
        span: Span::new(keyword_token.span.start(), end.end()),
    })
}

fn parse_tag(parser: &mut Parser, default_end: Span) -> Result<(Option<Ident>, Span)> {
    while parser.at(T::Identifier) && &*parser.current_token().value == "__attribute__" {
        parser.advance();
        parser.skip_balanced(T::OpenParen, T::CloseParen)?;
    }

    if parser.at(T::Identifier) && !is_qualifier(&parser.current_token().value) {
        let token = parser.advance();
        let span = token.span;
        Ok((
            Some(Ident {
                name: token.value,
                span,
            }),
            span,
        ))
    } else {
        Ok((None, default_end))
    }
}

/// Wraps `base` in one pointer layer per `*`, folding away qualifiers
/// between the stars (`int *const *p`).
pub fn parse_pointer_suffix(parser: &mut Parser, base: Type) -> Type {
    let mut ty = base;

    while parser.at(T::Star) {
        let star = parser.advance();
        while parser.at(T::Identifier) && is_qualifier(&parser.current_token().value) {
            parser.advance();
        }

        let span = Span::new(ty.span.start(), star.span.end());
        ty = Type {
            kind: TypeKind::Pointer(PointerType {
                underlying: Box::new(ty),
            }),
            span,
        };
    }

    ty
}
