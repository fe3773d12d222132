//! STABS type-graph representation.
//!
//! This is the output contract of the external STABS tokenizer and the input
//! of the translator. A [`StabsType`] either carries a body (a definition)
//! or is a bare reference that has to be resolved through the per-file
//! [`StabsTypeMap`] by its [`TypeNumber`].
//!
//! The graph is cyclic in the source language sense (a struct can point at
//! itself), but the tokenizer reifies back-edges as bodyless references, so
//! the in-memory structure is a tree.

use std::collections::BTreeMap;

use mdray_types::{ForwardDeclaredKind, MemberFunctionModifier};

/// The `(file, type)` pair that identifies a type within one translation
/// unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TypeNumber {
    pub file: i32,
    pub type_index: i32,
}

impl TypeNumber {
    pub fn new(file: i32, type_index: i32) -> Self {
        Self { file, type_index }
    }
}

/// Map from type number to the node that defines it. References without
/// bodies are resolved through this; anonymous types are never registered.
pub type StabsTypeMap<'a> = BTreeMap<TypeNumber, &'a StabsType>;

/// One symbol string tokenized into a type graph.
#[derive(Debug, Clone, PartialEq)]
pub struct StabsSymbol {
    pub name: String,
    pub ty: StabsType,
}

/// A node in the STABS type graph.
#[derive(Debug, Clone, PartialEq)]
pub struct StabsType {
    /// Name attached to this node, when the symbol string carried one.
    pub name: Option<String>,
    /// Type number, or `None` for anonymous nodes.
    pub type_number: Option<TypeNumber>,
    /// Whether this node is the root of a symbol's type graph.
    pub is_root: bool,
    /// The definition, or `None` when this node just references a type
    /// defined elsewhere.
    pub body: Option<StabsTypeBody>,
}

impl StabsType {
    /// A definition node.
    pub fn with_body(type_number: Option<TypeNumber>, body: StabsTypeBody) -> Self {
        Self {
            name: None,
            type_number,
            is_root: false,
            body: Some(body),
        }
    }

    /// A bodyless reference to a previously defined type.
    pub fn reference(type_number: TypeNumber) -> Self {
        Self {
            name: None,
            type_number: Some(type_number),
            is_root: false,
            body: None,
        }
    }

    /// Attaches a name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Marks this node as the root of a symbol's type graph.
    pub fn as_root(mut self) -> Self {
        self.is_root = true;
        self
    }

    pub fn is_anonymous(&self) -> bool {
        self.type_number.is_none()
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}

/// The descriptor-specific payload of a STABS type node.
#[derive(Debug, Clone, PartialEq)]
pub enum StabsTypeBody {
    /// A reference to another type node, possibly itself (the void idiom).
    TypeReference { inner: Box<StabsType> },
    /// An array with a range index type.
    Array {
        index_type: Box<StabsType>,
        element_type: Box<StabsType>,
    },
    /// An enum with (name, value) constants.
    Enum { constants: Vec<(String, i64)> },
    /// A function; only the return type is described at this level.
    Function { return_type: Box<StabsType> },
    VolatileQualifier { inner: Box<StabsType> },
    ConstQualifier { inner: Box<StabsType> },
    /// A numeric range with textual bounds (decimal or octal).
    Range { low: String, high: String },
    Struct(StabsStructOrUnion),
    Union(StabsStructOrUnion),
    /// A forward declaration of a type defined in another symbol.
    CrossReference {
        kind: ForwardDeclaredKind,
        identifier: String,
    },
    /// A builtin described by a floating-point class and a byte width.
    FloatingPointBuiltin { class: i32, bytes: i32 },
    /// A member-function type with explicit parameters.
    Method {
        class_type: Option<Box<StabsType>>,
        return_type: Box<StabsType>,
        parameter_types: Vec<StabsType>,
    },
    Pointer { value_type: Box<StabsType> },
    Reference { value_type: Box<StabsType> },
    /// A size attribute wrapped around another type.
    TypeAttribute {
        size_bits: i64,
        inner: Box<StabsType>,
    },
    PointerToDataMember {
        class_type: Box<StabsType>,
        member_type: Box<StabsType>,
    },
    /// A builtin identified by a bare type id.
    Builtin { type_id: i64 },
}

/// The shared payload of struct and union descriptors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StabsStructOrUnion {
    pub size_bytes: i64,
    pub base_classes: Vec<StabsBaseClass>,
    pub fields: Vec<StabsField>,
    pub member_functions: Vec<StabsMemberFunctionSet>,
}

/// A base class of a struct.
#[derive(Debug, Clone, PartialEq)]
pub struct StabsBaseClass {
    pub visibility: StabsVisibility,
    pub offset_bytes: i64,
    pub ty: StabsType,
}

/// A data member of a struct or union.
#[derive(Debug, Clone, PartialEq)]
pub struct StabsField {
    pub name: String,
    pub visibility: StabsVisibility,
    pub ty: StabsType,
    /// Offset of the field from the start of the aggregate, in bits.
    pub offset_bits: i32,
    /// Declared size of the field, in bits.
    pub size_bits: i32,
    pub is_static: bool,
}

/// All overloads of one member-function name.
#[derive(Debug, Clone, PartialEq)]
pub struct StabsMemberFunctionSet {
    pub name: String,
    pub overloads: Vec<StabsMemberFunction>,
}

/// One member-function overload.
#[derive(Debug, Clone, PartialEq)]
pub struct StabsMemberFunction {
    pub ty: StabsType,
    pub visibility: StabsVisibility,
    pub is_const: bool,
    pub is_volatile: bool,
    pub modifier: MemberFunctionModifier,
    /// Index into the vtable, for virtual member functions.
    pub vtable_index: Option<u32>,
}

/// Member visibility as encoded in the symbol string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StabsVisibility {
    #[default]
    None,
    Private,
    Protected,
    Public,
    /// Public, on a member the compiler optimized out.
    PublicOptimizedOut,
}
