//! # mdray-types
//!
//! Language-neutral AST model for source-level types recovered from legacy
//! debug sections.
//!
//! This crate provides:
//! - The [`Node`] tree: structs, unions, enums, functions, arrays, pointers,
//!   bitfields and built-in types, each carrying the metadata a downstream
//!   decompiler needs (size, offset, qualifiers, access, storage class)
//! - [`BuiltInClass`]: the numeric classes a compiler range or builtin
//!   descriptor can resolve to
//! - [`UnresolvedStabs`]: coordinates of references that a later resolution
//!   pass links to concrete definitions
//!
//! Nodes are plain data and serialize with serde, so two translations of the
//! same input can be compared byte-for-byte.

pub mod builtin;
pub mod node;

pub use builtin::BuiltInClass;
pub use node::{
    AccessSpecifier, Array, BitField, BuiltIn, Enum, ErrorNode, ForwardDeclaredKind, Function,
    MemberFunctionModifier, Node, NodeKind, PointerOrReference, PointerToDataMember, StorageClass,
    StructOrUnion, TypeName, TypeNameSource, UnresolvedStabs,
};
