//! STABS-to-AST translation.
//!
//! [`stabs_type_to_ast`] recursively converts a tokenized STABS type graph
//! into an AST [`Node`]. The grammar is ambiguous and compiler-dependent, so
//! most of what happens here is policy: when to substitute a type name for a
//! definition, how to break recursion cycles, and how to reproduce the
//! conventions of the compilers that emitted the data.

use mdray_types::{
    AccessSpecifier, Array, BitField, BuiltInClass, Enum, Function, MemberFunctionModifier, Node,
    NodeKind, PointerOrReference, PointerToDataMember, StorageClass, StructOrUnion, TypeName,
    TypeNameSource, UnresolvedStabs,
};

use crate::bitfield::detect_bitfield;
use crate::error::TranslateError;
use crate::member_function::{check_member_function, strip_template_args, DemanglerFunctions};
use crate::range::classify_range;
use crate::types::{
    StabsField, StabsStructOrUnion, StabsType, StabsTypeBody, StabsTypeMap, StabsVisibility,
};

/// Hard cap on translation recursion depth.
pub const MAX_TRANSLATION_DEPTH: u32 = 200;

/// Switches that alter how the translator handles errors and member
/// functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserFlags {
    /// Fail fast instead of substituting error nodes.
    pub strict_parsing: bool,
    /// Drop all member functions.
    pub no_member_functions: bool,
    /// Drop member-function lists that consist only of compiler-generated
    /// special functions.
    pub no_generated_member_functions: bool,
}

/// Per-file state threaded through the translation.
#[derive(Debug, Clone, Copy)]
pub struct TranslatorState<'a> {
    /// Handle of the translation unit being translated.
    pub file_handle: u32,
    /// The per-file map resolving type numbers to definitions.
    pub stabs_types: &'a StabsTypeMap<'a>,
    pub flags: ParserFlags,
    pub demangler: DemanglerFunctions,
}

/// Recursively converts a STABS type node into an AST node.
///
/// `enclosing_struct` is the struct or union whose members are currently
/// being translated, if any. `substitute_type_name` asks for a [`TypeName`]
/// instead of an expanded definition; `force_substitute` additionally breaks
/// self-references back to `enclosing_struct`.
pub fn stabs_type_to_ast(
    ty: &StabsType,
    enclosing_struct: Option<&StabsType>,
    state: &TranslatorState,
    depth: u32,
    substitute_type_name: bool,
    force_substitute: bool,
) -> Result<Node, TranslateError> {
    if depth > MAX_TRANSLATION_DEPTH {
        let error = TranslateError::RecursionDepthExceeded {
            depth: MAX_TRANSLATION_DEPTH,
        };
        if state.flags.strict_parsing {
            return Err(error);
        }
        tracing::warn!("{error}");
        return Ok(Node::error(error.to_string()));
    }

    // This makes sure that types are replaced with their type name in cases
    // where that would be more appropriate.
    if let Some(name) = &ty.name {
        let try_substitute = depth > 0
            && (ty.is_root
                || matches!(ty.body, Some(StabsTypeBody::Range { .. }))
                || matches!(ty.body, Some(StabsTypeBody::Builtin { .. })));
        // GCC emits anonymous enums with a name of " " since apparently some
        // debuggers can't handle zero-length names.
        let is_name_empty = name.is_empty() || name == " ";
        // Cross references are handled by their own dispatch arm.
        let is_cross_reference = matches!(ty.body, Some(StabsTypeBody::CrossReference { .. }));
        // A common case is that __builtin_va_list is indistinguishable from
        // void*, so it is suppressed along with void to avoid confusion.
        let is_void = name == "void" || name == "__builtin_va_list";
        if (substitute_type_name || try_substitute)
            && !is_name_empty
            && !is_cross_reference
            && !is_void
        {
            return Ok(Node::new(NodeKind::TypeName(TypeName {
                source: TypeNameSource::Reference,
                unresolved_stabs: UnresolvedStabs {
                    type_name: Some(name.clone()),
                    referenced_file_handle: Some(state.file_handle),
                    type_number: ty.type_number.map(|number| (number.file, number.type_index)),
                    forward_declared_kind: None,
                },
            })));
        }
    }

    // This prevents infinite recursion when an automatically generated
    // member function references an unnamed type.
    if force_substitute {
        if let (Some(number), Some(enclosing_number)) = (
            ty.type_number,
            enclosing_struct.and_then(|enclosing| enclosing.type_number),
        ) {
            if number == enclosing_number {
                // It's probably a this parameter (or return type) for an
                // unnamed type.
                return Ok(Node::new(NodeKind::TypeName(TypeName {
                    source: TypeNameSource::This,
                    unresolved_stabs: UnresolvedStabs {
                        type_name: None,
                        referenced_file_handle: Some(state.file_handle),
                        type_number: Some((number.file, number.type_index)),
                        forward_declared_kind: None,
                    },
                })));
            }
        }
    }

    let Some(body) = &ty.body else {
        // The definition of the type was given previously, so it has to be
        // looked up by its type number.
        let Some(number) = ty.type_number else {
            return Err(TranslateError::AnonymousTypeLookup);
        };
        let Some(&resolved) = state.stabs_types.get(&number) else {
            let error = TranslateError::UnresolvedTypeNumber {
                file: number.file,
                type_index: number.type_index,
            };
            if state.flags.strict_parsing {
                return Err(error);
            }
            tracing::warn!("{error}");
            return Ok(Node::error(error.to_string()));
        };
        return stabs_type_to_ast(
            resolved,
            enclosing_struct,
            state,
            depth + 1,
            substitute_type_name,
            force_substitute,
        );
    };

    let node = match body {
        StabsTypeBody::TypeReference { inner } => {
            if ty.is_anonymous() || inner.is_anonymous() || inner.type_number != ty.type_number {
                stabs_type_to_ast(
                    inner,
                    enclosing_struct,
                    state,
                    depth + 1,
                    substitute_type_name,
                    force_substitute,
                )?
            } else {
                // In STABS, void is a reference to itself.
                Node::built_in(BuiltInClass::Void)
            }
        }
        StabsTypeBody::Array {
            index_type,
            element_type,
        } => {
            let element = stabs_type_to_ast(
                element_type,
                enclosing_struct,
                state,
                depth + 1,
                true,
                force_substitute,
            )?;

            let Some(StabsTypeBody::Range { low, high }) = &index_type.body else {
                return Err(TranslateError::InvalidArrayIndex);
            };
            let low_value = parse_array_bound(low, "low")?;
            if low_value != 0 {
                return Err(TranslateError::InvalidArrayIndex);
            }
            let high_value = parse_array_bound(high, "high")?;

            // Some compilers wrote out a wrapped around value here for zero
            // (or variable?) length arrays.
            let element_count = if high_value == 4294967295 {
                0
            } else {
                high_value.wrapping_add(1) as i32
            };

            Node::new(NodeKind::Array(Array {
                element_type: Box::new(element),
                element_count,
            }))
        }
        StabsTypeBody::Enum { constants } => Node::new(NodeKind::Enum(Enum {
            constants: constants.clone(),
        })),
        StabsTypeBody::Function { return_type } => {
            let return_node = stabs_type_to_ast(
                return_type,
                enclosing_struct,
                state,
                depth + 1,
                true,
                force_substitute,
            )?;
            Node::new(NodeKind::Function(Function {
                return_type: Box::new(return_node),
                parameters: None,
                modifier: MemberFunctionModifier::None,
                vtable_index: None,
            }))
        }
        StabsTypeBody::VolatileQualifier { inner } => {
            let mut node = stabs_type_to_ast(
                inner,
                enclosing_struct,
                state,
                depth + 1,
                substitute_type_name,
                force_substitute,
            )?;
            node.is_volatile = true;
            node
        }
        StabsTypeBody::ConstQualifier { inner } => {
            let mut node = stabs_type_to_ast(
                inner,
                enclosing_struct,
                state,
                depth + 1,
                substitute_type_name,
                force_substitute,
            )?;
            node.is_const = true;
            node
        }
        StabsTypeBody::Range { low, high } => Node::built_in(classify_range(low, high)?),
        StabsTypeBody::Struct(struct_or_union) | StabsTypeBody::Union(struct_or_union) => {
            let is_struct = matches!(body, StabsTypeBody::Struct(_));

            let mut base_classes = Vec::with_capacity(struct_or_union.base_classes.len());
            for stabs_base_class in &struct_or_union.base_classes {
                let mut base_class = stabs_type_to_ast(
                    &stabs_base_class.ty,
                    Some(ty),
                    state,
                    depth + 1,
                    true,
                    force_substitute,
                )?;
                base_class.is_base_class = true;
                base_class.offset_bytes = stabs_base_class.offset_bytes as i32;
                base_class.access_specifier =
                    visibility_to_access_specifier(stabs_base_class.visibility);
                base_classes.push(base_class);
            }

            let mut fields = Vec::with_capacity(struct_or_union.fields.len());
            for field in &struct_or_union.fields {
                fields.push(field_to_ast(field, ty, state, depth)?);
            }

            let member_functions = member_functions_to_ast(ty, struct_or_union, state, depth)?;

            let mut node = Node::new(NodeKind::StructOrUnion(StructOrUnion {
                is_struct,
                base_classes,
                fields,
                member_functions,
            }));
            node.size_bits = (struct_or_union.size_bytes * 8) as i32;
            node
        }
        StabsTypeBody::CrossReference { kind, identifier } => {
            Node::new(NodeKind::TypeName(TypeName {
                source: TypeNameSource::CrossReference,
                unresolved_stabs: UnresolvedStabs {
                    type_name: Some(identifier.clone()),
                    referenced_file_handle: None,
                    type_number: None,
                    forward_declared_kind: Some(*kind),
                },
            }))
        }
        StabsTypeBody::FloatingPointBuiltin { bytes, .. } => {
            let class = match *bytes {
                1 => BuiltInClass::Unsigned8,
                2 => BuiltInClass::Unsigned16,
                4 => BuiltInClass::Unsigned32,
                8 => BuiltInClass::Unsigned64,
                16 => BuiltInClass::Unsigned128,
                _ => BuiltInClass::Unsigned8,
            };
            Node::built_in(class)
        }
        StabsTypeBody::Method {
            return_type,
            parameter_types,
            ..
        } => {
            let return_node = stabs_type_to_ast(
                return_type,
                enclosing_struct,
                state,
                depth + 1,
                true,
                true,
            )?;

            let mut parameters = Vec::with_capacity(parameter_types.len());
            for parameter_type in parameter_types {
                parameters.push(stabs_type_to_ast(
                    parameter_type,
                    enclosing_struct,
                    state,
                    depth + 1,
                    true,
                    true,
                )?);
            }

            Node::new(NodeKind::Function(Function {
                return_type: Box::new(return_node),
                parameters: Some(parameters),
                modifier: MemberFunctionModifier::None,
                vtable_index: None,
            }))
        }
        StabsTypeBody::Pointer { value_type } => {
            let value_node = stabs_type_to_ast(
                value_type,
                enclosing_struct,
                state,
                depth + 1,
                true,
                force_substitute,
            )?;
            Node::new(NodeKind::PointerOrReference(PointerOrReference {
                is_pointer: true,
                value_type: Box::new(value_node),
            }))
        }
        StabsTypeBody::Reference { value_type } => {
            let value_node = stabs_type_to_ast(
                value_type,
                enclosing_struct,
                state,
                depth + 1,
                true,
                force_substitute,
            )?;
            Node::new(NodeKind::PointerOrReference(PointerOrReference {
                is_pointer: false,
                value_type: Box::new(value_node),
            }))
        }
        StabsTypeBody::TypeAttribute { size_bits, inner } => {
            let mut node = stabs_type_to_ast(
                inner,
                enclosing_struct,
                state,
                depth + 1,
                substitute_type_name,
                force_substitute,
            )?;
            node.size_bits = *size_bits as i32;
            node
        }
        StabsTypeBody::PointerToDataMember {
            class_type,
            member_type,
        } => {
            let class_node = stabs_type_to_ast(
                class_type,
                enclosing_struct,
                state,
                depth + 1,
                true,
                true,
            )?;
            let member_node = stabs_type_to_ast(
                member_type,
                enclosing_struct,
                state,
                depth + 1,
                true,
                true,
            )?;
            Node::new(NodeKind::PointerToDataMember(PointerToDataMember {
                class_type: Box::new(class_node),
                member_type: Box::new(member_node),
            }))
        }
        StabsTypeBody::Builtin { type_id } => {
            if *type_id != 16 {
                return Err(TranslateError::UnknownBuiltin(*type_id));
            }
            Node::built_in(BuiltInClass::Bool8)
        }
    };

    Ok(node)
}

/// Translates one struct or union field, as either a bitfield or a normal
/// field.
fn field_to_ast(
    field: &StabsField,
    enclosing_struct: &StabsType,
    state: &TranslatorState,
    depth: u32,
) -> Result<Node, TranslateError> {
    if detect_bitfield(field, state.stabs_types)? {
        let underlying = stabs_type_to_ast(
            &field.ty,
            Some(enclosing_struct),
            state,
            depth + 1,
            true,
            false,
        )?;

        let mut bitfield = Node::new(NodeKind::BitField(BitField {
            bitfield_offset_bits: field.offset_bits % 8,
            underlying_type: Box::new(underlying),
        }));
        bitfield.name = normalize_field_name(&field.name);
        bitfield.offset_bytes = field.offset_bits / 8;
        bitfield.size_bits = field.size_bits;
        bitfield.access_specifier = visibility_to_access_specifier(field.visibility);
        Ok(bitfield)
    } else {
        let mut node = stabs_type_to_ast(
            &field.ty,
            Some(enclosing_struct),
            state,
            depth + 1,
            true,
            false,
        )?;
        node.name = normalize_field_name(&field.name);
        node.offset_bytes = field.offset_bits / 8;
        node.size_bits = field.size_bits;
        node.access_specifier = visibility_to_access_specifier(field.visibility);

        if field.name.starts_with("$vf")
            || field.name.starts_with("_vptr$")
            || field.name.starts_with("_vptr.")
        {
            node.is_vtable_pointer = true;
        }

        if field.is_static {
            node.storage_class = StorageClass::Static;
        }

        Ok(node)
    }
}

/// Translates the member functions of a struct or union, honoring the
/// member-function parser flags.
fn member_functions_to_ast(
    enclosing_struct: &StabsType,
    struct_or_union: &StabsStructOrUnion,
    state: &TranslatorState,
    depth: u32,
) -> Result<Vec<Node>, TranslateError> {
    if state.flags.no_member_functions {
        return Ok(Vec::new());
    }

    let type_name_no_template_args = enclosing_struct
        .name
        .as_deref()
        .map(strip_template_args)
        .unwrap_or("");

    // Skip types that only have compiler-generated member functions, before
    // paying for any translation.
    if state.flags.no_generated_member_functions
        && only_special_functions(struct_or_union, type_name_no_template_args)
    {
        return Ok(Vec::new());
    }

    let mut member_functions = Vec::new();
    let mut only_special = true;

    for function_set in &struct_or_union.member_functions {
        let info = check_member_function(
            &function_set.name,
            type_name_no_template_args,
            &state.demangler,
        );

        if !info.is_special_member_function {
            only_special = false;
        }

        for overload in &function_set.overloads {
            let mut node = stabs_type_to_ast(
                &overload.ty,
                Some(enclosing_struct),
                state,
                depth + 1,
                true,
                true,
            )?;

            node.is_constructor_or_destructor = info.is_constructor_or_destructor;
            node.is_special_member_function = info.is_special_member_function;
            node.is_operator_member_function = info.is_operator_member_function;
            node.name = Some(info.name.clone());
            node.access_specifier = visibility_to_access_specifier(overload.visibility);

            if let NodeKind::Function(function) = &mut node.kind {
                function.modifier = overload.modifier;
                function.vtable_index = overload.vtable_index;
            }

            member_functions.push(node);
        }
    }

    if only_special && state.flags.no_generated_member_functions {
        return Ok(Vec::new());
    }

    Ok(member_functions)
}

/// Whether every member function of the type looks compiler-generated:
/// assignment operators, `$`-prefixed internals, and zero-parameter named
/// constructors.
fn only_special_functions(
    struct_or_union: &StabsStructOrUnion,
    type_name_no_template_args: &str,
) -> bool {
    for function_set in &struct_or_union.member_functions {
        for overload in &function_set.overloads {
            let parameter_count = match &overload.ty.body {
                Some(StabsTypeBody::Function { .. }) => 0,
                Some(StabsTypeBody::Method {
                    parameter_types, ..
                }) => parameter_types.len(),
                _ => continue,
            };
            let is_special = function_set.name == "__as"
                || function_set.name == "operator="
                || function_set.name.starts_with('$')
                || (function_set.name == type_name_no_template_args && parameter_count == 0);
            if !is_special {
                return false;
            }
        }
    }
    true
}

/// Maps member visibility onto an access specifier. Anything that isn't
/// explicitly protected or private is public.
pub fn visibility_to_access_specifier(visibility: StabsVisibility) -> AccessSpecifier {
    match visibility {
        StabsVisibility::None | StabsVisibility::Public | StabsVisibility::PublicOptimizedOut => {
            AccessSpecifier::Public
        }
        StabsVisibility::Protected => AccessSpecifier::Protected,
        StabsVisibility::Private => AccessSpecifier::Private,
    }
}

/// Array index bounds are always decimal.
fn parse_array_bound(value: &str, bound: &'static str) -> Result<i64, TranslateError> {
    value.parse::<i64>().map_err(|source| TranslateError::IntegerParse {
        bound,
        value: value.to_string(),
        source,
    })
}

/// The single-space names GCC uses as an anonymous sentinel are dropped.
fn normalize_field_name(name: &str) -> Option<String> {
    if name.is_empty() || name == " " {
        None
    } else {
        Some(name.to_string())
    }
}
