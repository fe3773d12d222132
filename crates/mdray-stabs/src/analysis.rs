//! Per-file type analysis.
//!
//! Glue between the mdebug symbol table and the translator: collect the
//! STABS strings out of a file's symbols, hand them to the external
//! tokenizer, register every numbered definition in the per-file type map,
//! and translate each root into the AST.

use std::collections::BTreeMap;

use mdray_formats::mdebug::{SymFileDescriptor, SymbolClass, SymbolTable, SymbolType};
use mdray_types::Node;

use crate::error::{TokenizeError, TranslateError};
use crate::member_function::DemanglerFunctions;
use crate::translate::{stabs_type_to_ast, ParserFlags, TranslatorState};
use crate::types::{StabsSymbol, StabsType, StabsTypeBody, StabsTypeMap, TypeNumber};

/// The external STABS tokenizer capability: turns one reassembled symbol
/// string into a type graph.
pub trait StabsTokenizer {
    fn tokenize(&self, symbol: &str) -> Result<StabsSymbol, TokenizeError>;
}

/// The translated types of one file, keyed by type number.
#[derive(Debug)]
pub struct FileAnalysis {
    pub file_handle: u32,
    pub types: BTreeMap<TypeNumber, Node>,
}

/// Reassembles the STABS strings of a file's symbol list.
///
/// STABS strings live in symbols with nil storage type and class. Long
/// entries are split over multiple strings, each but the last ending in a
/// backslash; an empty string resets the accumulator, and reassembled
/// strings beginning with `$` are internal labels to skip.
pub fn gather_stabs_strings(file: &SymFileDescriptor) -> Vec<String> {
    let mut strings = Vec::new();
    let mut prefix = String::new();

    for symbol in &file.symbols {
        if symbol.storage_type != SymbolType::Nil || symbol.storage_class != SymbolClass::Nil {
            continue;
        }
        if symbol.string.is_empty() {
            prefix.clear();
            continue;
        }
        if let Some(stem) = symbol.string.strip_suffix('\\') {
            prefix.push_str(stem);
            continue;
        }

        let full = format!("{}{}", prefix, symbol.string);
        if full.starts_with('$') {
            continue;
        }
        strings.push(full);
        prefix.clear();
    }

    strings
}

/// Registers every numbered definition reachable from `ty` in the map.
/// First definition wins; anonymous nodes are never registered.
fn register_numbered_types<'a>(ty: &'a StabsType, map: &mut StabsTypeMap<'a>) {
    if ty.has_body() {
        if let Some(number) = ty.type_number {
            map.entry(number).or_insert(ty);
        }
    }

    let Some(body) = &ty.body else {
        return;
    };
    match body {
        StabsTypeBody::TypeReference { inner }
        | StabsTypeBody::VolatileQualifier { inner }
        | StabsTypeBody::ConstQualifier { inner }
        | StabsTypeBody::TypeAttribute { inner, .. } => register_numbered_types(inner, map),
        StabsTypeBody::Array {
            index_type,
            element_type,
        } => {
            register_numbered_types(index_type, map);
            register_numbered_types(element_type, map);
        }
        StabsTypeBody::Function { return_type } => register_numbered_types(return_type, map),
        StabsTypeBody::Struct(struct_or_union) | StabsTypeBody::Union(struct_or_union) => {
            for base_class in &struct_or_union.base_classes {
                register_numbered_types(&base_class.ty, map);
            }
            for field in &struct_or_union.fields {
                register_numbered_types(&field.ty, map);
            }
            for function_set in &struct_or_union.member_functions {
                for overload in &function_set.overloads {
                    register_numbered_types(&overload.ty, map);
                }
            }
        }
        StabsTypeBody::Method {
            class_type,
            return_type,
            parameter_types,
        } => {
            if let Some(class_type) = class_type {
                register_numbered_types(class_type, map);
            }
            register_numbered_types(return_type, map);
            for parameter_type in parameter_types {
                register_numbered_types(parameter_type, map);
            }
        }
        StabsTypeBody::Pointer { value_type } | StabsTypeBody::Reference { value_type } => {
            register_numbered_types(value_type, map);
        }
        StabsTypeBody::PointerToDataMember {
            class_type,
            member_type,
        } => {
            register_numbered_types(class_type, map);
            register_numbered_types(member_type, map);
        }
        StabsTypeBody::Enum { .. }
        | StabsTypeBody::Range { .. }
        | StabsTypeBody::CrossReference { .. }
        | StabsTypeBody::FloatingPointBuiltin { .. }
        | StabsTypeBody::Builtin { .. } => {}
    }
}

/// Analyses one file: tokenize, build the type map, translate every root.
///
/// In lenient mode tokenizer and translation failures are demoted to
/// warnings and `Error` nodes; in strict mode they propagate.
pub fn analyse_file(
    file: &SymFileDescriptor,
    file_handle: u32,
    tokenizer: &dyn StabsTokenizer,
    flags: ParserFlags,
    demangler: DemanglerFunctions,
) -> Result<FileAnalysis, TranslateError> {
    let mut parsed = Vec::new();
    for string in gather_stabs_strings(file) {
        match tokenizer.tokenize(&string) {
            Ok(symbol) => parsed.push(symbol),
            Err(error) => {
                if flags.strict_parsing {
                    return Err(error.into());
                }
                tracing::warn!("{error}");
            }
        }
    }

    let mut stabs_types: StabsTypeMap = BTreeMap::new();
    for symbol in &parsed {
        register_numbered_types(&symbol.ty, &mut stabs_types);
    }

    let state = TranslatorState {
        file_handle,
        stabs_types: &stabs_types,
        flags,
        demangler,
    };

    let mut types = BTreeMap::new();
    for symbol in &parsed {
        let Some(number) = symbol.ty.type_number else {
            continue;
        };
        if !symbol.ty.has_body() {
            continue;
        }

        let mut node = match stabs_type_to_ast(&symbol.ty, None, &state, 0, false, false) {
            Ok(node) => node,
            Err(error) => {
                if flags.strict_parsing {
                    return Err(error);
                }
                tracing::warn!("{error}");
                Node::error(error.to_string())
            }
        };
        if node.name.is_none() && !symbol.name.is_empty() && symbol.name != " " {
            node.name = Some(symbol.name.clone());
        }
        types.entry(number).or_insert(node);
    }

    Ok(FileAnalysis { file_handle, types })
}

/// Analyses every file of a parsed symbol table. File handles are assigned
/// by file-descriptor index.
pub fn analyse_symbol_table(
    table: &SymbolTable,
    tokenizer: &dyn StabsTokenizer,
    flags: ParserFlags,
    demangler: DemanglerFunctions,
) -> Result<Vec<FileAnalysis>, TranslateError> {
    table
        .files
        .iter()
        .enumerate()
        .map(|(index, file)| analyse_file(file, index as u32, tokenizer, flags, demangler))
        .collect()
}
