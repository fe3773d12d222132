//! Error types for STABS translation.

use thiserror::Error;

/// Error type for STABS-to-AST translation.
#[derive(Error, Debug)]
pub enum TranslateError {
    /// The translation recursed deeper than the hard cap.
    #[error("call depth greater than {depth} while translating the type graph, probably infinite recursion")]
    RecursionDepthExceeded { depth: u32 },

    /// A type number had no entry in the per-file type map.
    #[error("failed to look up STABS type by its type number ({file},{type_index})")]
    UnresolvedTypeNumber { file: i32, type_index: i32 },

    /// A bodyless anonymous type cannot be looked up by number.
    #[error("cannot look up type (type is anonymous)")]
    AnonymousTypeLookup,

    /// Neither the pattern table nor the integer table matched a range.
    #[error("failed to classify range ({low}, {high})")]
    UnclassifiedRange { low: String, high: String },

    /// A range bound failed to parse as an integer.
    #[error("failed to parse {bound} bound of range as integer: {value:?}")]
    IntegerParse {
        bound: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// An array index type was not a zero-based range.
    #[error("invalid index type for array")]
    InvalidArrayIndex,

    /// An unrecognized builtin type id.
    #[error("unknown built-in type id {0}")]
    UnknownBuiltin(i64),

    /// The external tokenizer rejected a symbol string.
    #[error("failed to tokenize STABS symbol: {0}")]
    Tokenize(#[from] TokenizeError),
}

/// Error reported by an external STABS tokenizer.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TokenizeError {
    pub message: String,
}

impl TokenizeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
