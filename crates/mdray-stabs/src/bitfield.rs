//! Bitfield detection.
//!
//! STABS does not mark bitfields explicitly. A field is modeled as a
//! bitfield when its declared size in bits differs from the size of its
//! underlying type, which first has to be dug out from behind references
//! and qualifiers.

use mdray_types::ForwardDeclaredKind;

use crate::error::TranslateError;
use crate::range::classify_range;
use crate::types::{StabsField, StabsType, StabsTypeBody, StabsTypeMap};

/// Maximum number of reference hops followed before giving up on a cycle.
const MAX_REFERENCE_HOPS: usize = 50;

/// Decides whether a struct or union field should be modeled as a bitfield.
pub fn detect_bitfield(field: &StabsField, stabs_types: &StabsTypeMap) -> Result<bool, TranslateError> {
    // Static fields can't be bitfields.
    if field.is_static {
        return Ok(false);
    }

    // Resolve type references.
    let mut ty: &StabsType = &field.ty;
    for hop in 0..MAX_REFERENCE_HOPS {
        match &ty.body {
            None => {
                let Some(number) = ty.type_number else {
                    return Ok(false);
                };
                match stabs_types.get(&number) {
                    Some(&next) if !std::ptr::eq(next, ty) => ty = next,
                    _ => return Ok(false),
                }
            }
            Some(StabsTypeBody::TypeReference { inner }) => ty = inner,
            Some(StabsTypeBody::ConstQualifier { inner }) => ty = inner,
            Some(StabsTypeBody::VolatileQualifier { inner }) => ty = inner,
            Some(_) => break,
        }

        // Give up if there's a cycle.
        if hop == MAX_REFERENCE_HOPS - 1 {
            return Ok(false);
        }
    }

    // Determine the size of the underlying type.
    let underlying_size_bits: i32 = match &ty.body {
        Some(StabsTypeBody::Range { low, high }) => {
            classify_range(low, high)?.size_bytes() as i32 * 8
        }
        Some(StabsTypeBody::CrossReference { kind, .. }) => {
            if *kind == ForwardDeclaredKind::Enum {
                32
            } else {
                return Ok(false);
            }
        }
        Some(StabsTypeBody::TypeAttribute { size_bits, .. }) => *size_bits as i32,
        // bool
        Some(StabsTypeBody::Builtin { .. }) => 8,
        _ => return Ok(false),
    };

    if underlying_size_bits == 0 {
        return Ok(false);
    }

    Ok(field.size_bits != underlying_size_bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{StabsVisibility, TypeNumber};
    use std::collections::BTreeMap;

    fn range(low: &str, high: &str) -> StabsType {
        StabsType::with_body(
            None,
            StabsTypeBody::Range {
                low: low.to_string(),
                high: high.to_string(),
            },
        )
    }

    fn field(ty: StabsType, size_bits: i32) -> StabsField {
        StabsField {
            name: "flags".to_string(),
            visibility: StabsVisibility::Public,
            ty,
            offset_bits: 0,
            size_bits,
            is_static: false,
        }
    }

    #[test]
    fn test_narrowed_int_is_bitfield() {
        let map = BTreeMap::new();
        let f = field(range("0", "4294967295"), 3);
        assert!(detect_bitfield(&f, &map).unwrap());
    }

    #[test]
    fn test_full_width_int_is_not_bitfield() {
        let map = BTreeMap::new();
        let f = field(range("0", "4294967295"), 32);
        assert!(!detect_bitfield(&f, &map).unwrap());
    }

    #[test]
    fn test_static_field_is_never_bitfield() {
        let map = BTreeMap::new();
        let mut f = field(range("0", "255"), 3);
        f.is_static = true;
        assert!(!detect_bitfield(&f, &map).unwrap());
    }

    #[test]
    fn test_resolves_through_qualifiers_and_references() {
        let map = BTreeMap::new();
        let inner = StabsType::with_body(
            None,
            StabsTypeBody::ConstQualifier {
                inner: Box::new(StabsType::with_body(
                    None,
                    StabsTypeBody::VolatileQualifier {
                        inner: Box::new(range("0", "65535")),
                    },
                )),
            },
        );
        let f = field(inner, 5);
        assert!(detect_bitfield(&f, &map).unwrap());
    }

    #[test]
    fn test_resolves_through_type_map() {
        let target = range("0", "255");
        let mut map: StabsTypeMap = BTreeMap::new();
        map.insert(TypeNumber::new(0, 7), &target);

        let f = field(StabsType::reference(TypeNumber::new(0, 7)), 2);
        assert!(detect_bitfield(&f, &map).unwrap());
    }

    #[test]
    fn test_missing_map_entry_is_not_bitfield() {
        let map = BTreeMap::new();
        let f = field(StabsType::reference(TypeNumber::new(0, 9)), 2);
        assert!(!detect_bitfield(&f, &map).unwrap());
    }

    #[test]
    fn test_reference_cycle_terminates() {
        // Two bodyless references that point at each other through the map.
        let a = StabsType::reference(TypeNumber::new(0, 2));
        let b = StabsType::reference(TypeNumber::new(0, 1));
        let mut map: StabsTypeMap = BTreeMap::new();
        map.insert(TypeNumber::new(0, 1), &a);
        map.insert(TypeNumber::new(0, 2), &b);

        let f = field(StabsType::reference(TypeNumber::new(0, 1)), 2);
        assert!(!detect_bitfield(&f, &map).unwrap());
    }

    #[test]
    fn test_self_referential_map_entry_is_not_bitfield() {
        let node = StabsType::reference(TypeNumber::new(0, 3));
        let mut map: StabsTypeMap = BTreeMap::new();
        map.insert(TypeNumber::new(0, 3), &node);

        let f = field(StabsType::reference(TypeNumber::new(0, 3)), 2);
        assert!(!detect_bitfield(&f, &map).unwrap());
    }

    #[test]
    fn test_enum_cross_reference_is_32_bits() {
        let map = BTreeMap::new();
        let xref = StabsType::with_body(
            None,
            StabsTypeBody::CrossReference {
                kind: ForwardDeclaredKind::Enum,
                identifier: "Flags".to_string(),
            },
        );
        assert!(detect_bitfield(&field(xref.clone(), 4), &map).unwrap());
        assert!(!detect_bitfield(&field(xref, 32), &map).unwrap());
    }

    #[test]
    fn test_struct_cross_reference_is_not_bitfield() {
        let map = BTreeMap::new();
        let xref = StabsType::with_body(
            None,
            StabsTypeBody::CrossReference {
                kind: ForwardDeclaredKind::Struct,
                identifier: "Vec3".to_string(),
            },
        );
        assert!(!detect_bitfield(&field(xref, 4), &map).unwrap());
    }

    #[test]
    fn test_type_attribute_size() {
        let map = BTreeMap::new();
        let attr = StabsType::with_body(
            None,
            StabsTypeBody::TypeAttribute {
                size_bits: 16,
                inner: Box::new(range("0", "65535")),
            },
        );
        assert!(detect_bitfield(&field(attr.clone(), 9), &map).unwrap());
        assert!(!detect_bitfield(&field(attr, 16), &map).unwrap());
    }

    #[test]
    fn test_bool_builtin_is_8_bits() {
        let map = BTreeMap::new();
        let builtin = StabsType::with_body(None, StabsTypeBody::Builtin { type_id: 16 });
        assert!(detect_bitfield(&field(builtin.clone(), 1), &map).unwrap());
        assert!(!detect_bitfield(&field(builtin, 8), &map).unwrap());
    }
}
