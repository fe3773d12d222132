//! Built-in numeric classes.

use serde::{Deserialize, Serialize};

/// The numeric class of a built-in type.
///
/// These are the classes a compiler-emitted range or builtin descriptor can
/// resolve to. "Unqualified" classes are emitted by toolchains that encode a
/// width without a signedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltInClass {
    Void,
    Unsigned8,
    Signed8,
    Unqualified8,
    Bool8,
    Unsigned16,
    Signed16,
    Unsigned32,
    Signed32,
    Float32,
    Unsigned64,
    Signed64,
    Float64,
    Unsigned128,
    Signed128,
    Unqualified128,
    Float128,
}

impl BuiltInClass {
    /// Storage size of this class in bytes.
    pub fn size_bytes(self) -> u32 {
        match self {
            BuiltInClass::Void => 0,
            BuiltInClass::Unsigned8
            | BuiltInClass::Signed8
            | BuiltInClass::Unqualified8
            | BuiltInClass::Bool8 => 1,
            BuiltInClass::Unsigned16 | BuiltInClass::Signed16 => 2,
            BuiltInClass::Unsigned32 | BuiltInClass::Signed32 | BuiltInClass::Float32 => 4,
            BuiltInClass::Unsigned64 | BuiltInClass::Signed64 | BuiltInClass::Float64 => 8,
            BuiltInClass::Unsigned128
            | BuiltInClass::Signed128
            | BuiltInClass::Unqualified128
            | BuiltInClass::Float128 => 16,
        }
    }

    /// C-ish display name, for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            BuiltInClass::Void => "void",
            BuiltInClass::Unsigned8 => "unsigned 8-bit integer",
            BuiltInClass::Signed8 => "signed 8-bit integer",
            BuiltInClass::Unqualified8 => "8-bit integer",
            BuiltInClass::Bool8 => "8-bit boolean",
            BuiltInClass::Unsigned16 => "unsigned 16-bit integer",
            BuiltInClass::Signed16 => "signed 16-bit integer",
            BuiltInClass::Unsigned32 => "unsigned 32-bit integer",
            BuiltInClass::Signed32 => "signed 32-bit integer",
            BuiltInClass::Float32 => "32-bit floating point",
            BuiltInClass::Unsigned64 => "unsigned 64-bit integer",
            BuiltInClass::Signed64 => "signed 64-bit integer",
            BuiltInClass::Float64 => "64-bit floating point",
            BuiltInClass::Unsigned128 => "unsigned 128-bit integer",
            BuiltInClass::Signed128 => "signed 128-bit integer",
            BuiltInClass::Unqualified128 => "128-bit integer",
            BuiltInClass::Float128 => "128-bit floating point",
        }
    }
}
