use thin_vec::ThinVec;

use crate::ast::{Ident, Type};

/// Builtin arithmetic types and typedef names. Typedefs are carried by
/// name, never resolved.
#[derive(Debug, Clone)]
pub struct ScalarType {
    pub name: Box<str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKeyword {
    Struct,
    Union,
}

#[derive(Debug, Clone)]
pub struct RecordType {
    pub keyword: RecordKeyword,
    pub tag: Option<Ident>,
}

#[derive(Debug, Clone)]
pub struct EnumType {
    pub tag: Option<Ident>,
}

#[derive(Debug, Clone)]
pub struct PointerType {
    pub underlying: Box<Type>,
}

#[derive(Debug, Clone)]
pub struct FunctionType {
    pub parameter_types: ThinVec<Type>,
    pub return_type: Box<Type>,
    pub variadic: bool,
}
