use anyhow::{Result, bail};
use colored::Colorize;
use thin_vec::ThinVec;

use crate::{
    ast::{
        FnBody, FunctionDecl, Ident, Param, TranslationUnit, Type, TypeKind,
        types::{FunctionType, PointerType},
    },
    lexer::token::{Token, TokenKind as T},
    parser::{
        Parser,
        types::{parse_declaration_specifiers, parse_pointer_suffix},
    },
    span::{Span, locate},
};

pub fn parse(tokens: Vec<Token>) -> Result<TranslationUnit> {
    let mut parser = Parser::new(tokens);
    let mut functions = ThinVec::new();

    while parser.has_tokens() {
        if let Some(function) = parse_external_declaration(&mut parser)? {
            functions.push(function);
        }
    }

    Ok(TranslationUnit { functions })
}

/// One external declaration. Only function declarations produce a value;
/// typedefs, tag definitions, file-scope variables, and top-level asm are
/// consumed and dropped.
fn parse_external_declaration(parser: &mut Parser) -> Result<Option<FunctionDecl>> {
    match parser.current_token_kind() {
        T::Semicolon => {
            parser.advance();
            Ok(None)
        }
        T::Typedef => {
            parser.skip_to_semicolon()?;
            Ok(None)
        }
        T::Identifier
            if matches!(
                &*parser.current_token().value,
                "asm" | "__asm" | "__asm__" | "_Static_assert"
            ) =>
        {
            parser.skip_to_semicolon()?;
            Ok(None)
        }
        _ => parse_declaration(parser),
    }
}

fn parse_declaration(parser: &mut Parser) -> Result<Option<FunctionDecl>> {
    let base = parse_declaration_specifiers(parser)?;

    // `struct S { ... };` and friends: a bare tag declaration.
    if parser.at(T::Semicolon) {
        parser.advance();
        return Ok(None);
    }

    let return_type = parse_pointer_suffix(parser, base);

    if !parser.at(T::Identifier) {
        // Parenthesized declarators at file scope (function-pointer
        // variables and the like) are not function declarations.
        parser.skip_to_semicolon()?;
        return Ok(None);
    }

    let name_token = parser.advance();

    if !parser.at(T::OpenParen) {
        // File-scope variable, possibly with an initializer.
        parser.skip_to_semicolon()?;
        return Ok(None);
    }

    let (parameters, parameter_types, variadic) = parse_parameter_list(parser)?;

    // Attributes and asm labels between declarator and body/semicolon.
    while parser.at(T::Identifier)
        && matches!(
            &*parser.current_token().value,
            "__attribute__" | "asm" | "__asm" | "__asm__"
        )
    {
        parser.advance();
        parser.skip_balanced(T::OpenParen, T::CloseParen)?;
    }

    let body = match parser.current_token_kind() {
        T::Semicolon => {
            parser.advance();
            None
        }
        T::OpenCurly => Some(parse_function_body(parser)?),
        other => bail!(
            "{}",
            format!("Expected ';' or function body after declarator, got {:?}", other)
                .red()
                .bold()
        ),
    };

    let location = locate(name_token.file_id, name_token.span)?;

    Ok(Some(FunctionDecl {
        name: Ident {
            name: name_token.value,
            span: name_token.span,
        },
        location,
        parameters,
        ty: FunctionType {
            parameter_types,
            return_type: Box::new(return_type),
            variadic,
        },
        body,
    }))
}

fn parse_parameter_list(parser: &mut Parser) -> Result<(ThinVec<Param>, ThinVec<Type>, bool)> {
    parser.expect(T::OpenParen)?;

    let mut parameters = ThinVec::new();
    let mut parameter_types = ThinVec::new();
    let mut variadic = false;

    if parser.eat(T::CloseParen) {
        return Ok((parameters, parameter_types, variadic));
    }

    // `(void)` declares no parameters.
    if parser.at(T::Void) && parser.peek_kind(1) == T::CloseParen {
        parser.advance();
        parser.advance();
        return Ok((parameters, parameter_types, variadic));
    }

    loop {
        if parser.at(T::Ellipsis) {
            parser.advance();
            variadic = true;
            parser.expect(T::CloseParen)?;
            break;
        }

        let (param, ty) = parse_parameter(parser)?;
        parameters.push(param);
        parameter_types.push(ty);

        if parser.eat(T::Comma) {
            continue;
        }
        parser.expect(T::CloseParen)?;
        break;
    }

    Ok((parameters, parameter_types, variadic))
}

fn parse_parameter(parser: &mut Parser) -> Result<(Param, Type)> {
    let file_id = parser.current_token().file_id;

    let base = parse_declaration_specifiers(parser)?;
    let mut ty = parse_pointer_suffix(parser, base);

    let mut name = None;
    let mut location_span = ty.span;

    if parser.at(T::Identifier) {
        let token = parser.advance();
        location_span = token.span;
        name = Some(Ident {
            name: token.value,
            span: token.span,
        });
    } else if parser.at(T::OpenParen) {
        // Function-pointer declarator: `ret (*cb)(args)`.
        let (inner_name, inner_span) = parse_fn_pointer_declarator(parser)?;
        if let Some(ident) = inner_name {
            location_span = ident.span;
            name = Some(ident);
        } else {
            location_span = inner_span;
        }

        let (inner_types, inner_variadic) = if parser.at(T::OpenParen) {
            let (_, types, inner_variadic) = parse_parameter_list(parser)?;
            (types, inner_variadic)
        } else {
            (ThinVec::new(), false)
        };

        let span = Span::new(ty.span.start(), location_span.end());
        let function = Type {
            kind: TypeKind::Function(FunctionType {
                parameter_types: inner_types,
                return_type: Box::new(ty),
                variadic: inner_variadic,
            }),
            span,
        };
        ty = Type {
            kind: TypeKind::Pointer(PointerType {
                underlying: Box::new(function),
            }),
            span,
        };
    }

    // Array parameters decay to pointers, as in C. Extra dimensions add
    // no further indirection.
    let mut decayed = false;
    while parser.at(T::OpenBracket) {
        parser.skip_balanced(T::OpenBracket, T::CloseBracket)?;
        if !decayed {
            let span = ty.span;
            ty = Type {
                kind: TypeKind::Pointer(PointerType {
                    underlying: Box::new(ty),
                }),
                span,
            };
            decayed = true;
        }
    }

    let location = locate(file_id, location_span)?;

    Ok((Param { name, location }, ty))
}

/// Consumes `(*name)` (stars and name both optional) and returns the
/// declared name, if any, along with the group's span.
fn parse_fn_pointer_declarator(parser: &mut Parser) -> Result<(Option<Ident>, Span)> {
    let open = parser.expect(T::OpenParen)?;
    let mut name = None;

    while parser.at(T::Star) {
        parser.advance();
    }

    if parser.at(T::Identifier) {
        let token = parser.advance();
        name = Some(Ident {
            name: token.value,
            span: token.span,
        });
    }

    let mut depth = 1usize;
    let mut end = open.span;
    while depth > 0 {
        match parser.current_token_kind() {
            T::OpenParen => {
                depth += 1;
                parser.advance();
            }
            T::CloseParen => {
                depth -= 1;
                end = parser.advance().span;
            }
            T::Eof => bail!(
                "{}",
                "Unexpected end of file in parameter declarator".red().bold()
            ),
            _ => {
                parser.advance();
            }
        }
    }

    Ok((name, Span::new(open.span.start(), end.end())))
}

/// Skips a definition body by brace matching, noting whether any `return`
/// token occurs.
fn parse_function_body(parser: &mut Parser) -> Result<FnBody> {
    let open = parser.expect(T::OpenCurly)?;
    let start = open.span.start();
    let mut end = open.span.end();
    let mut depth = 1usize;
    let mut has_return = false;

    while depth > 0 {
        match parser.current_token_kind() {
            T::OpenCurly => {
                depth += 1;
                parser.advance();
            }
            T::CloseCurly => {
                depth -= 1;
                end = parser.advance().span.end();
            }
            T::Return => {
                has_return = true;
                parser.advance();
            }
            T::Eof => bail!("{}", "Unterminated function body".red().bold()),
            _ => {
                parser.advance();
            }
        }
    }

    Ok(FnBody {
        span: Span::new(start, end),
        has_return,
    })
}
