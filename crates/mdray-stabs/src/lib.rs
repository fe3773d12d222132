//! # mdray-stabs
//!
//! Translation of STABS type graphs into a language-neutral AST.
//!
//! STABS type descriptions are extracted from mdebug symbol tables (see
//! `mdray-formats`) and tokenized by an external tokenizer into the
//! [`types::StabsType`] graph this crate consumes. The pipeline here:
//!
//! - [`analysis::gather_stabs_strings`] reassembles the per-file symbol
//!   strings (including backslash continuations)
//! - [`analysis::analyse_file`] drives a [`analysis::StabsTokenizer`]
//!   capability over them, registers every numbered definition in a
//!   per-file type map and translates each root
//! - [`translate::stabs_type_to_ast`] is the recursive transform itself,
//!   with the range classifier, bitfield detector and member-function
//!   analyzer as its helpers
//!
//! Translation is bounded: recursion depth is capped at 200 and reference
//! chases at 50 hops, so malformed input terminates. By default the
//! translator is lenient and converts recoverable failures into `Error` AST
//! nodes plus a `tracing` warning; [`translate::ParserFlags::strict_parsing`]
//! makes them fail fast instead.

pub mod analysis;
pub mod bitfield;
pub mod error;
pub mod member_function;
pub mod range;
pub mod translate;
pub mod types;

pub use analysis::{analyse_file, analyse_symbol_table, FileAnalysis, StabsTokenizer};
pub use bitfield::detect_bitfield;
pub use error::{TokenizeError, TranslateError};
pub use member_function::{check_member_function, DemangleFn, DemanglerFunctions};
pub use range::classify_range;
pub use translate::{
    stabs_type_to_ast, ParserFlags, TranslatorState, MAX_TRANSLATION_DEPTH,
};
pub use types::{StabsSymbol, StabsType, StabsTypeBody, StabsTypeMap, TypeNumber};
