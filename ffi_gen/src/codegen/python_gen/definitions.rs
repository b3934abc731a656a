use super::helpers::escape_python_keyword;
use super::types::{ExactPosition, TypeRenderer};
use crate::dependency::EmissionStep;
use crate::error::GenError;
use ffi_types::{NamedTypeRef, ParsedResult, QualifiedName, StructureType, TypeDescriptor};
use std::collections::HashSet;
use std::fmt::Write;
use tracing::{debug, warn};

/* Emit the `# Type definitions` section: one class per structure, enum aliases and scalar typedefs */
pub fn emit_type_definitions(model: &ParsedResult, renderer: &TypeRenderer) -> String {
    let mut out = String::from("# Type definitions\n");

    for (qualified, ty) in &model.types {
        let Some(name) = qualified.single() else {
            warn!("skipping namespaced type {}", qualified);
            continue;
        };

        match ty {
            TypeDescriptor::Structure(structure) => emit_structure_class(&mut out, name, structure),
            TypeDescriptor::Enumeration(_) => {
                writeln!(out, "{}Enum = ctypes.c_int", renderer.enum_name(name)).unwrap();
            }
            TypeDescriptor::Bool
            | TypeDescriptor::Integer { .. }
            | TypeDescriptor::Float { .. }
            | TypeDescriptor::Array { .. } => {
                writeln!(out, "{} = {}", name, renderer.exact(ty, ExactPosition::Plain)).unwrap();
            }
            TypeDescriptor::NamedTypeReference(_) => {
                /* Aliases are emitted with the structure layouts */
            }
            _ => debug!("no type definition emitted for {}", name),
        }
    }

    out
}

/* Class body only; `_fields_` is assigned later so self-referencing pointers resolve */
fn emit_structure_class(out: &mut String, name: &str, structure: &StructureType) {
    writeln!(out, "class {}(ctypes.Structure):", name).unwrap();

    /* Python works with str, the native side with byte buffers */
    let mut string_fields = 0usize;
    for member in &structure.members {
        if !member.ty.is_char_pointer() {
            continue;
        }
        let property = escape_python_keyword(&member.name);
        write!(
            out,
            "\t@property\n\tdef {prop}(self):\n\t\treturn pyNativeStr(self._{field})\n",
            prop = property,
            field = member.name
        )
        .unwrap();
        write!(
            out,
            "\t@{prop}.setter\n\tdef {prop}(self, value):\n\t\tself._{field} = cstr(value)\n",
            prop = property,
            field = member.name
        )
        .unwrap();
        string_fields += 1;
    }

    if string_fields == 0 {
        out.push_str("\tpass\n");
    }

    write!(out, "\n\n{}Handle = ctypes.POINTER({})\n\n\n", name, name).unwrap();
}

/* Emit the `# Structure definitions` section in resolver order */
pub fn emit_structure_definitions(
    steps: &[EmissionStep<'_>],
    model: &ParsedResult,
    renderer: &TypeRenderer,
) -> Result<String, GenError> {
    let mut out = String::from("\n# Structure definitions\n");

    for step in steps {
        match step {
            EmissionStep::Layout { name, structure } => emit_layout(&mut out, name, structure, renderer),
            EmissionStep::Alias { name, target } => emit_alias(&mut out, name, target, model, renderer)?,
            EmissionStep::Empty { name } => debug!("{} has no members, leaving layout empty", name),
        }
    }

    Ok(out)
}

fn emit_layout(out: &mut String, name: &str, structure: &StructureType, renderer: &TypeRenderer) {
    writeln!(out, "{}._fields_ = [", name).unwrap();
    for member in &structure.members {
        let field = if member.ty.is_char_pointer() {
            format!("_{}", member.name)
        } else {
            member.name.clone()
        };
        writeln!(
            out,
            "\t\t(\"{}\", {}),",
            field,
            renderer.exact(&member.ty, ExactPosition::Plain)
        )
        .unwrap();
    }
    out.push_str("\t]\n");
}

/* What an alias chain ends at */
enum AliasTarget<'a> {
    Structure(&'a QualifiedName),
    Enumeration(&'a QualifiedName),
    Value(&'a QualifiedName),
    /* Pointer and function typedefs get no Python definition */
    Undefined,
}

fn emit_alias(
    out: &mut String,
    name: &str,
    target: &NamedTypeRef,
    model: &ParsedResult,
    renderer: &TypeRenderer,
) -> Result<(), GenError> {
    match follow_alias(name, target, model)? {
        AliasTarget::Structure(final_name) => {
            writeln!(out, "{} = {}", name, final_name).unwrap();
            writeln!(out, "{}Handle = {}Handle", name, final_name).unwrap();
        }
        AliasTarget::Enumeration(final_name) => {
            let final_name = final_name.to_string();
            writeln!(
                out,
                "{}Enum = {}Enum",
                renderer.enum_name(name),
                renderer.enum_name(&final_name)
            )
            .unwrap();
        }
        AliasTarget::Value(final_name) => {
            writeln!(out, "{} = {}", name, final_name).unwrap();
        }
        AliasTarget::Undefined => debug!("alias {} targets a type without a Python definition", name),
    }
    Ok(())
}

/* Walk an alias chain to the declaration it finally names */
fn follow_alias<'a>(
    name: &str,
    target: &'a NamedTypeRef,
    model: &'a ParsedResult,
) -> Result<AliasTarget<'a>, GenError> {
    let mut current = &target.name;
    let mut seen = HashSet::new();

    while seen.insert(current) {
        let ty = model.get_type(current).ok_or_else(|| GenError::UnresolvedType {
            name: current.to_string(),
            referrer: name.to_string(),
        })?;

        match ty {
            TypeDescriptor::NamedTypeReference(next) => current = &next.name,
            TypeDescriptor::Structure(_) => return Ok(AliasTarget::Structure(current)),
            TypeDescriptor::Enumeration(_) => return Ok(AliasTarget::Enumeration(current)),
            TypeDescriptor::Bool
            | TypeDescriptor::Integer { .. }
            | TypeDescriptor::Float { .. }
            | TypeDescriptor::Array { .. } => return Ok(AliasTarget::Value(current)),
            _ => return Ok(AliasTarget::Undefined),
        }
    }

    warn!("alias {} refers back to itself", name);
    Ok(AliasTarget::Undefined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::StructureResolver;
    use ffi_types::{EnumerationType, ReferenceKind, StructureMember};

    fn member(name: &str, ty: TypeDescriptor) -> StructureMember {
        StructureMember {
            name: name.to_string(),
            ty,
        }
    }

    #[test]
    fn test_string_fields_get_properties() {
        let mut model = ParsedResult::new();
        model.add_type(
            "BNPluginInfo",
            TypeDescriptor::Structure(StructureType {
                members: vec![
                    member("name", TypeDescriptor::c_string()),
                    member("from", TypeDescriptor::c_string()),
                    member("version", TypeDescriptor::integer(4, false)),
                ],
            }),
        );

        let out = emit_type_definitions(&model, &TypeRenderer::new("BN"));

        assert!(out.contains("class BNPluginInfo(ctypes.Structure):\n"));
        assert!(out.contains("\t@property\n\tdef name(self):\n\t\treturn pyNativeStr(self._name)\n"));
        assert!(out.contains("\t@name.setter\n\tdef name(self, value):\n\t\tself._name = cstr(value)\n"));
        assert!(out.contains("\tdef from_(self):\n\t\treturn pyNativeStr(self._from)\n"));
        assert!(!out.contains("\tpass\n"));
        assert!(out.contains("\n\nBNPluginInfoHandle = ctypes.POINTER(BNPluginInfo)\n\n\n"));
    }

    #[test]
    fn test_scalar_and_enum_definitions() {
        let mut model = ParsedResult::new();
        model.add_type("BNLogLevel", TypeDescriptor::Enumeration(EnumerationType::default()));
        model.add_type("BNAddress", TypeDescriptor::integer(8, false));
        model.add_type("BNDigest", TypeDescriptor::array(TypeDescriptor::integer(1, false), 20));
        model.add_type(
            "BNProgress",
            TypeDescriptor::pointer(TypeDescriptor::Function(ffi_types::FunctionType {
                return_type: Box::new(TypeDescriptor::Bool),
                parameters: Vec::new(),
                variadic: false,
            })),
        );

        let out = emit_type_definitions(&model, &TypeRenderer::new("BN"));

        assert_eq!(
            out,
            "# Type definitions\nLogLevelEnum = ctypes.c_int\nBNAddress = ctypes.c_ulonglong\nBNDigest = ctypes.c_ubyte * 20\n"
        );
    }

    #[test]
    fn test_layout_renames_string_fields() {
        let mut model = ParsedResult::new();
        model.add_type(
            "BNSettings",
            TypeDescriptor::Structure(StructureType {
                members: vec![
                    member("key", TypeDescriptor::c_string()),
                    member("count", TypeDescriptor::integer(8, false)),
                ],
            }),
        );

        let steps = StructureResolver::new(&model).resolve().unwrap();
        let out = emit_structure_definitions(&steps, &model, &TypeRenderer::new("BN")).unwrap();

        assert_eq!(
            out,
            "\n# Structure definitions\nBNSettings._fields_ = [\n\t\t(\"_key\", ctypes.c_char_p),\n\t\t(\"count\", ctypes.c_ulonglong),\n\t]\n"
        );
    }

    #[test]
    fn test_alias_emission_follows_target_kind() {
        let mut model = ParsedResult::new();
        model.add_type("BNObject", TypeDescriptor::Structure(StructureType::default()));
        model.add_type("BNHandle", TypeDescriptor::named("BNObject", ReferenceKind::Structure));
        model.add_type("BNOtherHandle", TypeDescriptor::named("BNHandle", ReferenceKind::Typedef));
        model.add_type("BNMode", TypeDescriptor::Enumeration(EnumerationType::default()));
        model.add_type("BNModeAlias", TypeDescriptor::named("BNMode", ReferenceKind::Enumeration));
        model.add_type("BNSize", TypeDescriptor::integer(8, false));
        model.add_type("BNLength", TypeDescriptor::named("BNSize", ReferenceKind::Typedef));

        let steps = StructureResolver::new(&model).resolve().unwrap();
        let out = emit_structure_definitions(&steps, &model, &TypeRenderer::new("BN")).unwrap();

        assert!(out.contains("BNHandle = BNObject\nBNHandleHandle = BNObjectHandle\n"));
        /* Chains collapse onto the structure at the end */
        assert!(out.contains("BNOtherHandle = BNObject\nBNOtherHandleHandle = BNObjectHandle\n"));
        assert!(out.contains("ModeAliasEnum = ModeEnum\n"));
        assert!(out.contains("BNLength = BNSize\n"));
        assert!(!out.contains("_fields_"));
    }

    #[test]
    fn test_alias_to_missing_type_is_unresolved() {
        let mut model = ParsedResult::new();
        model.add_type("BNGhostHandle", TypeDescriptor::named("BNGhost", ReferenceKind::Structure));

        let steps = StructureResolver::new(&model).resolve().unwrap();
        let err = emit_structure_definitions(&steps, &model, &TypeRenderer::new("BN")).unwrap_err();

        assert!(matches!(err, GenError::UnresolvedType { ref name, .. } if name == "BNGhost"));
    }
}
