pub mod types;

use thin_vec::ThinVec;

use crate::{
    ast::types::FunctionType,
    span::{SourceLocation, Span},
};

#[derive(Debug, Clone)]
pub struct TranslationUnit {
    pub functions: ThinVec<FunctionDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: Box<str>,
    pub span: Span,
}

/// A function declaration as the front end handed it over.
///
/// `parameters` and `ty.parameter_types` are parallel sequences: equal
/// length, same order, the i-th parameter's declared type is the i-th
/// entry of `parameter_types`. Parameters do not carry their own type;
/// consumers zip the two sequences by position.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: Ident,
    pub location: SourceLocation,
    pub parameters: ThinVec<Param>,
    pub ty: FunctionType,
    pub body: Option<FnBody>,
}

impl FunctionDecl {
    pub fn is_definition(&self) -> bool {
        self.body.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: Option<Ident>,
    pub location: SourceLocation,
}

/// Body summary recorded while the parser skipped a definition.
/// `has_return` is a token-level fact; no flow analysis behind it.
#[derive(Debug, Clone)]
pub struct FnBody {
    pub span: Span,
    pub has_return: bool,
}

#[derive(Debug, Clone)]
pub struct Type {
    pub kind: TypeKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    Void,
    Scalar(types::ScalarType),
    Record(types::RecordType),
    Enum(types::EnumType),
    Pointer(types::PointerType),
    Function(FunctionType),
}

impl TypeKind {
    /// True only for the exact record variant. Pointers to records, enums,
    /// and typedef names never count.
    pub fn is_record(&self) -> bool {
        matches!(self, TypeKind::Record(_))
    }
}
