use crate::name::QualifiedName;
use serde_derive::{Deserialize, Serialize};

/// Which kind of declaration a named type reference points at.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceKind {
    Unknown,
    #[default]
    Typedef,
    Class,
    Structure,
    Union,
    Enumeration,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct NamedTypeRef {
    pub name: QualifiedName,
    #[serde(default)]
    pub kind: ReferenceKind,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct StructureMember {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct StructureType {
    #[serde(default)]
    pub members: Vec<StructureMember>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct EnumerationMember {
    pub name: String,
    pub value: i64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct EnumerationType {
    #[serde(default)]
    pub members: Vec<EnumerationMember>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct FunctionParameter {
    /// Empty when the header leaves the parameter unnamed.
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct FunctionType {
    pub return_type: Box<TypeDescriptor>,
    #[serde(default)]
    pub parameters: Vec<FunctionParameter>,
    #[serde(default)]
    pub variadic: bool,
}

/// A parsed native type, as handed over by the header front end.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub enum TypeDescriptor {
    Void,
    Bool,
    /// `width` is in bytes.
    Integer { width: u32, signed: bool },
    Float { width: u32 },
    Pointer(Box<TypeDescriptor>),
    Array {
        element: Box<TypeDescriptor>,
        count: u64,
    },
    Function(FunctionType),
    #[serde(rename = "named")]
    NamedTypeReference(NamedTypeRef),
    Structure(StructureType),
    Enumeration(EnumerationType),
}

impl TypeDescriptor {
    pub fn integer(width: u32, signed: bool) -> Self {
        TypeDescriptor::Integer { width, signed }
    }

    pub fn pointer(child: TypeDescriptor) -> Self {
        TypeDescriptor::Pointer(Box::new(child))
    }

    pub fn array(element: TypeDescriptor, count: u64) -> Self {
        TypeDescriptor::Array {
            element: Box::new(element),
            count,
        }
    }

    pub fn named(name: impl Into<QualifiedName>, kind: ReferenceKind) -> Self {
        TypeDescriptor::NamedTypeReference(NamedTypeRef {
            name: name.into(),
            kind,
        })
    }

    /// The C `char *` shape: a pointer to a signed one-byte integer.
    pub fn c_string() -> Self {
        TypeDescriptor::pointer(TypeDescriptor::integer(1, true))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeDescriptor::Void)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeDescriptor::Pointer(_))
    }

    /// Signed one-byte integer, i.e. C `char` on the platforms the bindings target.
    pub fn is_signed_byte(&self) -> bool {
        matches!(self, TypeDescriptor::Integer { width: 1, signed: true })
    }

    /// Pointer whose pointee is a signed one-byte integer.
    pub fn is_char_pointer(&self) -> bool {
        match self {
            TypeDescriptor::Pointer(child) => child.is_signed_byte(),
            _ => false,
        }
    }

    pub fn pointee(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Pointer(child) => Some(child),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            TypeDescriptor::Function(function) => Some(function),
            _ => None,
        }
    }

    /// The callable shape of a function declaration.
    ///
    /// Declarations may arrive either as a function type or as a pointer to one; one
    /// pointer layer is unwrapped, never more.
    pub fn callable(&self) -> Option<&FunctionType> {
        match self {
            TypeDescriptor::Function(function) => Some(function),
            TypeDescriptor::Pointer(child) => child.as_function(),
            _ => None,
        }
    }

    pub fn as_structure(&self) -> Option<&StructureType> {
        match self {
            TypeDescriptor::Structure(structure) => Some(structure),
            _ => None,
        }
    }

    pub fn as_enumeration(&self) -> Option<&EnumerationType> {
        match self {
            TypeDescriptor::Enumeration(enumeration) => Some(enumeration),
            _ => None,
        }
    }

    pub fn as_named(&self) -> Option<&NamedTypeRef> {
        match self {
            TypeDescriptor::NamedTypeReference(named) => Some(named),
            _ => None,
        }
    }
}
