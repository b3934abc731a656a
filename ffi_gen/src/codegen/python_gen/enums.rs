use super::helpers::escape_python_keyword;
use super::types::TypeRenderer;
use ffi_types::{EnumerationType, ParsedResult, TypeDescriptor};
use std::fmt::Write;

/* Emit the enumeration module: one `enum.IntEnum` class per enumeration, members in declaration order */
pub fn emit_enum_module(model: &ParsedResult, renderer: &TypeRenderer) -> String {
    let mut out = String::from("import enum\n");

    for (qualified, ty) in &model.types {
        let (Some(name), TypeDescriptor::Enumeration(enumeration)) = (qualified.single(), ty) else {
            continue;
        };
        emit_enum_class(&mut out, renderer.enum_name(name), enumeration);
    }

    out
}

fn emit_enum_class(out: &mut String, name: &str, enumeration: &EnumerationType) {
    write!(out, "\n\nclass {}(enum.IntEnum):\n", name).unwrap();

    if enumeration.members.is_empty() {
        out.push_str("\tpass\n");
        return;
    }

    /* Values are explicit, so duplicates become aliases rather than new members */
    for member in &enumeration.members {
        writeln!(out, "\t{} = {}", escape_python_keyword(&member.name), member.value).unwrap();
    }
}
