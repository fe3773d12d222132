//! Member-function name analysis.
//!
//! Legacy GCC toolchains emit member functions under internal names
//! (`__ct`, `__dt`, gcc opnames for operators, ...). This module classifies
//! those names so the translator can mark constructors, destructors and
//! operators on the AST.

/// A demangler entry point. Returns the demangled name, or `None` when the
/// input is not mangled in the expected scheme.
pub type DemangleFn = fn(name: &str, options: i32) -> Option<String>;

/// Optional demangler entry points supplied by the caller.
///
/// Both default to `None`; without them, raw names are used as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemanglerFunctions {
    pub cplus_demangle: Option<DemangleFn>,
    pub cplus_demangle_opname: Option<DemangleFn>,
}

/// Classification of one member-function name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberFunctionInfo {
    pub name: String,
    pub is_constructor_or_destructor: bool,
    pub is_special_member_function: bool,
    pub is_operator_member_function: bool,
}

/// Strips template arguments from a type name: everything from the first
/// `<` onwards.
pub fn strip_template_args(name: &str) -> &str {
    match name.find('<') {
        Some(position) => &name[..position],
        None => name,
    }
}

/// Classifies a member-function name against the name of its owning type
/// (already stripped of template arguments).
pub fn check_member_function(
    mangled_name: &str,
    type_name_no_template_args: &str,
    demangler: &DemanglerFunctions,
) -> MemberFunctionInfo {
    // Some compiler versions output gcc opnames for overloaded operators
    // instead of their proper names.
    let mut name = String::new();
    let mut is_operator_member_function = false;
    if let Some(demangle_opname) = demangler.cplus_demangle_opname {
        if let Some(demangled) = demangle_opname(mangled_name, 0) {
            is_operator_member_function = demangled.starts_with("operator");
            name = demangled;
        }
    }
    if name.is_empty() {
        name = mangled_name.to_string();
    }

    let mut is_constructor = name == "__ct" // Takes a parameter to decide whether or not to construct virtual base classes.
        || name == "__comp_ctor" // Constructs virtual base classes.
        || name == "__base_ctor"; // Does not construct virtual base classes.

    if !is_constructor && !type_name_no_template_args.is_empty() {
        // Named constructor.
        is_constructor |= name == type_name_no_template_args;
    }

    let mut is_destructor = name == "__dt" // Takes parameters to decide to construct virtual base classes and/or delete the object.
        || name == "__comp_dtor" // Destructs virtual base classes.
        || name == "__base_dtor" // Does not destruct virtual base classes.
        || name == "__deleting_dtor"; // Destructs virtual base classes then deletes the entire object.

    if !is_destructor && !name.is_empty() {
        // Named destructor.
        is_destructor |=
            name.starts_with('~') && name[1..] == *type_name_no_template_args;
    }

    let is_constructor_or_destructor =
        is_constructor || is_destructor || name.starts_with("$_");
    let is_special_member_function = is_constructor_or_destructor || name == "operator=";

    MemberFunctionInfo {
        name,
        is_constructor_or_destructor,
        is_special_member_function,
        is_operator_member_function,
    }
}
