use super::helpers::strip_library_prefix;
use ffi_types::{FunctionType, NamedTypeRef, ReferenceKind, TypeDescriptor};

/* Rendered for shapes with no ctypes counterpart; also the ctypes `restype` for void */
pub const UNKNOWN_TYPE: &str = "None";

/// Where an exact type expression is used.
///
/// Pointers to `char` are the only shape whose rendering depends on the position: a
/// buffer the native side allocated must not be converted into a Python-owned string,
/// and a callback result must stay an opaque pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExactPosition {
    Plain,
    /// Result or argument that carries a natively allocated buffer.
    OwnedBuffer,
    /// Result of a callback prototype. Takes precedence over `OwnedBuffer`.
    Callback,
}

/// Maps type descriptors to ctypes expressions.
///
/// Both renderings are pure: the output depends only on the descriptor, the position
/// and the library prefix.
#[derive(Debug, Clone)]
pub struct TypeRenderer {
    name_prefix: String,
}

impl TypeRenderer {
    pub fn new(name_prefix: impl Into<String>) -> Self {
        Self {
            name_prefix: name_prefix.into(),
        }
    }

    /// Python-side name of an enumeration, with the library prefix stripped.
    pub fn enum_name<'a>(&self, name: &'a str) -> &'a str {
        strip_library_prefix(name, &self.name_prefix)
    }

    /// Layout-exact form used in native signatures and structure fields.
    pub fn exact(&self, ty: &TypeDescriptor, position: ExactPosition) -> String {
        match ty {
            TypeDescriptor::Bool => "ctypes.c_bool".to_string(),
            TypeDescriptor::Integer { width, signed } => integer_type(*width, *signed).to_string(),
            TypeDescriptor::Float { width } => float_type(*width).to_string(),
            TypeDescriptor::NamedTypeReference(named) => self.named(named),
            TypeDescriptor::Pointer(child) => self.exact_pointer(child, position),
            TypeDescriptor::Array { element, count } => self.array(element, *count),
            _ => UNKNOWN_TYPE.to_string(),
        }
    }

    /// Caller-facing form used in wrapper annotations.
    pub fn swizzled(&self, ty: &TypeDescriptor) -> String {
        match ty {
            TypeDescriptor::Bool => "bool".to_string(),
            TypeDescriptor::Integer { .. } => "int".to_string(),
            TypeDescriptor::Float { .. } => "float".to_string(),
            TypeDescriptor::NamedTypeReference(named) => self.named(named),
            TypeDescriptor::Pointer(child) => match child.as_ref() {
                TypeDescriptor::Void => "Optional[ctypes.c_void_p]".to_string(),
                child if child.is_signed_byte() => "Optional[str]".to_string(),
                TypeDescriptor::Function(function) => self.function_prototype(function),
                child => format!("ctypes.POINTER({})", self.exact(child, ExactPosition::Plain)),
            },
            TypeDescriptor::Array { element, count } => self.array(element, *count),
            _ => UNKNOWN_TYPE.to_string(),
        }
    }

    fn named(&self, named: &NamedTypeRef) -> String {
        let name = named.name.to_string();
        if named.kind == ReferenceKind::Enumeration {
            format!("{}Enum", self.enum_name(&name))
        } else {
            name
        }
    }

    fn exact_pointer(&self, child: &TypeDescriptor, position: ExactPosition) -> String {
        if position == ExactPosition::Callback || child.is_void() {
            return "ctypes.c_void_p".to_string();
        }

        if child.is_signed_byte() {
            return match position {
                ExactPosition::OwnedBuffer => "ctypes.POINTER(ctypes.c_byte)".to_string(),
                _ => "ctypes.c_char_p".to_string(),
            };
        }

        match child {
            TypeDescriptor::Function(function) => self.function_prototype(function),
            _ => format!("ctypes.POINTER({})", self.exact(child, ExactPosition::Plain)),
        }
    }

    /* ctypes.CFUNCTYPE(result, params...) */
    fn function_prototype(&self, function: &FunctionType) -> String {
        let mut out = String::from("ctypes.CFUNCTYPE(");
        out.push_str(&self.exact(&function.return_type, ExactPosition::Callback));
        for param in &function.parameters {
            out.push_str(", ");
            out.push_str(&self.exact(&param.ty, ExactPosition::Plain));
        }
        out.push(')');
        out
    }

    fn array(&self, element: &TypeDescriptor, count: u64) -> String {
        format!("{} * {}", self.exact(element, ExactPosition::Plain), count)
    }
}

fn integer_type(width: u32, signed: bool) -> &'static str {
    match (width, signed) {
        (1, true) => "ctypes.c_byte",
        (1, false) => "ctypes.c_ubyte",
        (2, true) => "ctypes.c_short",
        (2, false) => "ctypes.c_ushort",
        (4, true) => "ctypes.c_int",
        (4, false) => "ctypes.c_uint",
        (_, true) => "ctypes.c_longlong",
        (_, false) => "ctypes.c_ulonglong",
    }
}

fn float_type(width: u32) -> &'static str {
    if width == 4 {
        "ctypes.c_float"
    } else {
        "ctypes.c_double"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffi_types::FunctionParameter;

    fn renderer() -> TypeRenderer {
        TypeRenderer::new("BN")
    }

    fn callback(return_type: TypeDescriptor, params: Vec<TypeDescriptor>) -> TypeDescriptor {
        TypeDescriptor::pointer(TypeDescriptor::Function(FunctionType {
            return_type: Box::new(return_type),
            parameters: params
                .into_iter()
                .map(|ty| FunctionParameter {
                    name: String::new(),
                    ty,
                })
                .collect(),
            variadic: false,
        }))
    }

    #[test]
    fn test_integer_widths() {
        let r = renderer();
        assert_eq!(r.exact(&TypeDescriptor::integer(1, true), ExactPosition::Plain), "ctypes.c_byte");
        assert_eq!(r.exact(&TypeDescriptor::integer(2, false), ExactPosition::Plain), "ctypes.c_ushort");
        assert_eq!(r.exact(&TypeDescriptor::integer(4, true), ExactPosition::Plain), "ctypes.c_int");
        assert_eq!(r.exact(&TypeDescriptor::integer(8, false), ExactPosition::Plain), "ctypes.c_ulonglong");
        /* Odd widths fall into the widest bucket */
        assert_eq!(r.exact(&TypeDescriptor::integer(16, true), ExactPosition::Plain), "ctypes.c_longlong");
    }

    #[test]
    fn test_float_widths() {
        let r = renderer();
        assert_eq!(r.exact(&TypeDescriptor::Float { width: 4 }, ExactPosition::Plain), "ctypes.c_float");
        assert_eq!(r.exact(&TypeDescriptor::Float { width: 8 }, ExactPosition::Plain), "ctypes.c_double");
        assert_eq!(r.swizzled(&TypeDescriptor::Float { width: 10 }), "float");
    }

    #[test]
    fn test_char_pointer_depends_on_position() {
        let r = renderer();
        let string = TypeDescriptor::c_string();
        assert_eq!(r.exact(&string, ExactPosition::Plain), "ctypes.c_char_p");
        assert_eq!(r.exact(&string, ExactPosition::OwnedBuffer), "ctypes.POINTER(ctypes.c_byte)");
        assert_eq!(r.exact(&string, ExactPosition::Callback), "ctypes.c_void_p");
        assert_eq!(r.swizzled(&string), "Optional[str]");
    }

    #[test]
    fn test_unsigned_char_pointer_is_a_plain_pointer() {
        let r = renderer();
        let bytes = TypeDescriptor::pointer(TypeDescriptor::integer(1, false));
        assert_eq!(r.exact(&bytes, ExactPosition::OwnedBuffer), "ctypes.POINTER(ctypes.c_ubyte)");
        assert_eq!(r.swizzled(&bytes), "ctypes.POINTER(ctypes.c_ubyte)");
    }

    #[test]
    fn test_void_pointer() {
        let r = renderer();
        let opaque = TypeDescriptor::pointer(TypeDescriptor::Void);
        assert_eq!(r.exact(&opaque, ExactPosition::Plain), "ctypes.c_void_p");
        assert_eq!(r.swizzled(&opaque), "Optional[ctypes.c_void_p]");
    }

    #[test]
    fn test_enumeration_references_use_enum_alias() {
        let r = renderer();
        let level = TypeDescriptor::named("BNLogLevel", ReferenceKind::Enumeration);
        assert_eq!(r.exact(&level, ExactPosition::Plain), "LogLevelEnum");
        assert_eq!(r.swizzled(&level), "LogLevelEnum");

        let view = TypeDescriptor::named("BNBinaryView", ReferenceKind::Structure);
        assert_eq!(r.exact(&view, ExactPosition::Plain), "BNBinaryView");
    }

    #[test]
    fn test_function_pointer_prototype() {
        let r = renderer();
        let ty = callback(
            TypeDescriptor::c_string(),
            vec![
                TypeDescriptor::pointer(TypeDescriptor::Void),
                TypeDescriptor::c_string(),
                TypeDescriptor::Bool,
            ],
        );
        let expected = "ctypes.CFUNCTYPE(ctypes.c_void_p, ctypes.c_void_p, ctypes.c_char_p, ctypes.c_bool)";
        assert_eq!(r.exact(&ty, ExactPosition::Plain), expected);
        assert_eq!(r.swizzled(&ty), expected);
    }

    #[test]
    fn test_void_returning_callback() {
        let r = renderer();
        let ty = callback(TypeDescriptor::Void, vec![]);
        assert_eq!(r.exact(&ty, ExactPosition::Plain), "ctypes.CFUNCTYPE(None)");
    }

    #[test]
    fn test_arrays_and_nested_pointers() {
        let r = renderer();
        let grid = TypeDescriptor::array(TypeDescriptor::integer(1, false), 16);
        assert_eq!(r.exact(&grid, ExactPosition::Plain), "ctypes.c_ubyte * 16");
        assert_eq!(r.swizzled(&grid), "ctypes.c_ubyte * 16");

        let handles = TypeDescriptor::pointer(TypeDescriptor::pointer(TypeDescriptor::named(
            "BNFunction",
            ReferenceKind::Structure,
        )));
        assert_eq!(
            r.exact(&handles, ExactPosition::Plain),
            "ctypes.POINTER(ctypes.POINTER(BNFunction))"
        );

        let names = TypeDescriptor::pointer(TypeDescriptor::c_string());
        assert_eq!(r.exact(&names, ExactPosition::OwnedBuffer), "ctypes.POINTER(ctypes.c_char_p)");
    }

    #[test]
    fn test_unmappable_shapes_render_unknown() {
        let r = renderer();
        assert_eq!(r.exact(&TypeDescriptor::Void, ExactPosition::Plain), UNKNOWN_TYPE);
        assert_eq!(
            r.exact(&TypeDescriptor::Structure(Default::default()), ExactPosition::Plain),
            UNKNOWN_TYPE
        );
        assert_eq!(r.swizzled(&TypeDescriptor::Void), UNKNOWN_TYPE);
    }

    #[test]
    fn test_rendering_is_pure() {
        let r = renderer();
        let ty = callback(TypeDescriptor::integer(8, false), vec![TypeDescriptor::c_string()]);
        for position in [ExactPosition::Plain, ExactPosition::OwnedBuffer, ExactPosition::Callback] {
            assert_eq!(r.exact(&ty, position), r.exact(&ty, position));
        }
        assert_eq!(r.swizzled(&ty), r.swizzled(&ty));
    }
}
