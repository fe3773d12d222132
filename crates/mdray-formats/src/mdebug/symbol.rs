//! Local symbol and procedure descriptor parsing.

use crate::ParseError;

/// A raw local symbol entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSymbol {
    /// Offset of the symbol's string within the unit's string-table slice.
    pub iss: u32,
    /// Symbol value (address, offset or constant, depending on type).
    pub value: i32,
    /// The packed `st:6, sc:5, reserved:1, index:20` word.
    packed: u32,
}

impl LocalSymbol {
    /// Size of a local symbol entry in bytes.
    pub const SIZE: usize = 0x0c;

    /// Parse a local symbol from the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < Self::SIZE {
            return Err(ParseError::too_short(Self::SIZE, data.len()));
        }

        let read_u32 = |offset: usize| -> u32 {
            u32::from_le_bytes([
                data[offset],
                data[offset + 1],
                data[offset + 2],
                data[offset + 3],
            ])
        };

        Ok(Self {
            iss: read_u32(0),
            value: read_u32(4) as i32,
            packed: read_u32(8),
        })
    }

    /// Symbol type from the packed word (bits 0..6).
    pub fn symbol_type(&self) -> SymbolType {
        SymbolType::from_raw((self.packed & 0x3f) as u8)
    }

    /// Storage class from the packed word (bits 6..11).
    pub fn symbol_class(&self) -> SymbolClass {
        SymbolClass::from_raw(((self.packed >> 6) & 0x1f) as u8)
    }

    /// Index into the auxiliary tables (bits 12..32).
    pub fn index(&self) -> u32 {
        self.packed >> 12
    }
}

/// Symbol type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolType {
    Nil,
    Global,
    Static,
    Param,
    Local,
    Label,
    Proc,
    Block,
    End,
    Member,
    Typedef,
    File,
    StaticProc,
    Constant,
    Other(u8),
}

impl SymbolType {
    pub fn from_raw(value: u8) -> Self {
        match value {
            0 => Self::Nil,
            1 => Self::Global,
            2 => Self::Static,
            3 => Self::Param,
            4 => Self::Local,
            5 => Self::Label,
            6 => Self::Proc,
            7 => Self::Block,
            8 => Self::End,
            9 => Self::Member,
            10 => Self::Typedef,
            11 => Self::File,
            14 => Self::StaticProc,
            15 => Self::Constant,
            other => Self::Other(other),
        }
    }
}

/// Storage class codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolClass {
    Nil,
    Text,
    Data,
    Bss,
    Register,
    Abs,
    Undefined,
    Local,
    Bits,
    Dbx,
    RegImage,
    Info,
    UserStruct,
    SData,
    SBss,
    RData,
    Var,
    Common,
    SCommon,
    VarRegister,
    Variant,
    SUndefined,
    Init,
    BasedVar,
    XData,
    PData,
    Fini,
    NonGp,
    Other(u8),
}

impl SymbolClass {
    pub fn from_raw(value: u8) -> Self {
        match value {
            0 => Self::Nil,
            1 => Self::Text,
            2 => Self::Data,
            3 => Self::Bss,
            4 => Self::Register,
            5 => Self::Abs,
            6 => Self::Undefined,
            7 => Self::Local,
            8 => Self::Bits,
            9 => Self::Dbx,
            10 => Self::RegImage,
            11 => Self::Info,
            12 => Self::UserStruct,
            13 => Self::SData,
            14 => Self::SBss,
            15 => Self::RData,
            16 => Self::Var,
            17 => Self::Common,
            18 => Self::SCommon,
            19 => Self::VarRegister,
            20 => Self::Variant,
            21 => Self::SUndefined,
            22 => Self::Init,
            23 => Self::BasedVar,
            24 => Self::XData,
            25 => Self::PData,
            26 => Self::Fini,
            27 => Self::NonGp,
            other => Self::Other(other),
        }
    }
}

/// A symbol with its string resolved from the local string table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub string: String,
    pub value: i32,
    pub storage_type: SymbolType,
    pub storage_class: SymbolClass,
    /// Index into the auxiliary tables.
    pub index: u32,
    /// The raw string-table offset the string was read from.
    pub iss: u32,
}

/// A raw procedure descriptor entry.
///
/// The per-file traversal of this table is not performed (the offsets
/// involved have not been cross-validated against real samples), but the
/// layout is part of the section format and is decoded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcedureDescriptor {
    pub address: u32,
    pub isym: i32,
    pub iline: i32,
    pub regmask: i32,
    pub regoffset: i32,
    pub iopt: i32,
    pub fregmask: i32,
    pub fregoffset: i32,
    pub frameoffset: i32,
    pub framereg: i16,
    pub pcreg: i16,
    pub ln_low: i32,
    pub ln_high: i32,
    pub cb_line_offset: i32,
}

impl ProcedureDescriptor {
    /// Size of a procedure descriptor entry in bytes.
    pub const SIZE: usize = 0x34;

    /// Parse a procedure descriptor from the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < Self::SIZE {
            return Err(ParseError::too_short(Self::SIZE, data.len()));
        }

        let read_i16 = |offset: usize| -> i16 {
            i16::from_le_bytes([data[offset], data[offset + 1]])
        };

        let read_u32 = |offset: usize| -> u32 {
            u32::from_le_bytes([
                data[offset],
                data[offset + 1],
                data[offset + 2],
                data[offset + 3],
            ])
        };

        let read_i32 = |offset: usize| -> i32 { read_u32(offset) as i32 };

        Ok(Self {
            address: read_u32(0x00),
            isym: read_i32(0x04),
            iline: read_i32(0x08),
            regmask: read_i32(0x0c),
            regoffset: read_i32(0x10),
            iopt: read_i32(0x14),
            fregmask: read_i32(0x18),
            fregoffset: read_i32(0x1c),
            frameoffset: read_i32(0x20),
            framereg: read_i16(0x24),
            pcreg: read_i16(0x26),
            ln_low: read_i32(0x28),
            ln_high: read_i32(0x2c),
            cb_line_offset: read_i32(0x30),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_symbol_word() {
        let mut data = vec![0u8; LocalSymbol::SIZE];
        data[0..4].copy_from_slice(&0x1234u32.to_le_bytes());
        data[4..8].copy_from_slice(&(-16i32).to_le_bytes());
        // st = Label (5), sc = Text (1), index = 0x45678
        let packed: u32 = 5 | (1 << 6) | (0x45678 << 12);
        data[8..12].copy_from_slice(&packed.to_le_bytes());

        let sym = LocalSymbol::parse(&data).unwrap();
        assert_eq!(sym.iss, 0x1234);
        assert_eq!(sym.value, -16);
        assert_eq!(sym.symbol_type(), SymbolType::Label);
        assert_eq!(sym.symbol_class(), SymbolClass::Text);
        assert_eq!(sym.index(), 0x45678);
    }

    #[test]
    fn test_symbol_type_catch_all() {
        assert_eq!(SymbolType::from_raw(12), SymbolType::Other(12));
        assert_eq!(SymbolType::from_raw(63), SymbolType::Other(63));
        assert_eq!(SymbolClass::from_raw(31), SymbolClass::Other(31));
    }

    #[test]
    fn test_procedure_descriptor_layout() {
        let mut data = vec![0u8; ProcedureDescriptor::SIZE];
        data[0x00..0x04].copy_from_slice(&0x0010_8000u32.to_le_bytes());
        data[0x04..0x08].copy_from_slice(&42i32.to_le_bytes());
        data[0x24..0x26].copy_from_slice(&30i16.to_le_bytes());
        data[0x30..0x34].copy_from_slice(&0x100i32.to_le_bytes());

        let pd = ProcedureDescriptor::parse(&data).unwrap();
        assert_eq!(pd.address, 0x0010_8000);
        assert_eq!(pd.isym, 42);
        assert_eq!(pd.framereg, 30);
        assert_eq!(pd.cb_line_offset, 0x100);
    }

    #[test]
    fn test_reject_too_short() {
        assert!(matches!(
            LocalSymbol::parse(&[0u8; 4]),
            Err(ParseError::TooShort { .. })
        ));
        assert!(matches!(
            ProcedureDescriptor::parse(&[0u8; 0x20]),
            Err(ParseError::TooShort { .. })
        ));
    }
}
