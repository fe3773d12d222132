//! AST node representation.
//!
//! Every node carries the same metadata block regardless of its kind, because
//! any node can appear as a struct field, a base class or a member function
//! and pick up a name, an offset and qualifiers from that position.

use serde::{Deserialize, Serialize};

use crate::builtin::BuiltInClass;

/// An AST node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Name given to this node by the position it appears in (field name,
    /// member function name, type name). `None` for unnamed nodes.
    pub name: Option<String>,
    /// Size in bits, or -1 when not known at this node.
    pub size_bits: i32,
    /// Offset in bytes within the enclosing aggregate, or -1 when this node
    /// is not a field.
    pub offset_bytes: i32,
    pub is_const: bool,
    pub is_volatile: bool,
    /// Field holds the vtable pointer of its enclosing class.
    pub is_vtable_pointer: bool,
    pub is_base_class: bool,
    pub is_constructor_or_destructor: bool,
    pub is_special_member_function: bool,
    pub is_operator_member_function: bool,
    pub access_specifier: AccessSpecifier,
    pub storage_class: StorageClass,
    pub kind: NodeKind,
}

impl Node {
    /// Creates a node of the given kind with all metadata unset.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            size_bits: -1,
            offset_bytes: -1,
            is_const: false,
            is_volatile: false,
            is_vtable_pointer: false,
            is_base_class: false,
            is_constructor_or_destructor: false,
            is_special_member_function: false,
            is_operator_member_function: false,
            access_specifier: AccessSpecifier::Public,
            storage_class: StorageClass::None,
            kind,
        }
    }

    /// Creates a built-in node of the given class.
    pub fn built_in(class: BuiltInClass) -> Self {
        Self::new(NodeKind::BuiltIn(BuiltIn { class }))
    }

    /// Creates an error node carrying a diagnostic message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NodeKind::Error(ErrorNode {
            message: message.into(),
        }))
    }
}

/// The kind-specific payload of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    BuiltIn(BuiltIn),
    Array(Array),
    Enum(Enum),
    Function(Function),
    StructOrUnion(StructOrUnion),
    TypeName(TypeName),
    PointerOrReference(PointerOrReference),
    PointerToDataMember(PointerToDataMember),
    BitField(BitField),
    Error(ErrorNode),
}

/// A built-in numeric type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltIn {
    pub class: BuiltInClass,
}

/// A fixed-length array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Array {
    pub element_type: Box<Node>,
    pub element_count: i32,
}

/// An enumeration. Constants are (name, value) pairs in the order the
/// debug information listed them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enum {
    pub constants: Vec<(String, i64)>,
}

/// A function or member-function type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub return_type: Box<Node>,
    /// Parameter types in declaration order. `None` when the debug
    /// information does not describe parameters at this level.
    pub parameters: Option<Vec<Node>>,
    pub modifier: MemberFunctionModifier,
    /// Index into the owning class's vtable, for virtual member functions.
    pub vtable_index: Option<u32>,
}

/// A struct or union definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructOrUnion {
    pub is_struct: bool,
    pub base_classes: Vec<Node>,
    pub fields: Vec<Node>,
    pub member_functions: Vec<Node>,
}

/// A reference to a type by name and/or coordinates, left unresolved for a
/// later resolution pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeName {
    pub source: TypeNameSource,
    pub unresolved_stabs: UnresolvedStabs,
}

/// Why a `TypeName` node was emitted instead of an inline definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeNameSource {
    /// A named type was referenced at a point where expanding the definition
    /// would lose the user-written name.
    Reference,
    /// A forward declaration of a type defined elsewhere.
    CrossReference,
    /// A reference back to the enclosing type, e.g. the this parameter of a
    /// generated member function.
    This,
}

/// Coordinates of an unresolved type reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedStabs {
    /// Referenced type name, when one was written in the source.
    pub type_name: Option<String>,
    /// Handle of the translation unit the reference appeared in.
    pub referenced_file_handle: Option<u32>,
    /// `(file, type)` number pair of the referenced definition.
    pub type_number: Option<(i32, i32)>,
    /// What kind of type a forward declaration referred to.
    pub forward_declared_kind: Option<ForwardDeclaredKind>,
}

/// The kind of type named by a forward declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardDeclaredKind {
    Struct,
    Union,
    Enum,
}

/// A pointer or a C++ reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerOrReference {
    pub is_pointer: bool,
    pub value_type: Box<Node>,
}

/// A C++ pointer-to-data-member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerToDataMember {
    pub class_type: Box<Node>,
    pub member_type: Box<Node>,
}

/// A struct field narrower than its underlying type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitField {
    /// Bit offset of the field within the byte at `offset_bytes`.
    pub bitfield_offset_bits: i32,
    pub underlying_type: Box<Node>,
}

/// A placeholder emitted in lenient mode where translation failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorNode {
    pub message: String,
}

/// C++ access specifier. Defaults to public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessSpecifier {
    #[default]
    Public,
    Protected,
    Private,
}

/// Storage class of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageClass {
    #[default]
    None,
    Typedef,
    Extern,
    Static,
    Auto,
    Register,
}

/// Member-function dispatch kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberFunctionModifier {
    #[default]
    None,
    Static,
    Virtual,
}
