use super::helpers::py_string_literal;
use crate::config::{LibraryConfig, PlatformLibrary};
use std::fmt::Write;

/* Imports, platform-specific library load and the string helpers */
pub fn emit_prelude(library: &LibraryConfig, string_free_routine: &str) -> String {
    let mut out = String::new();

    out.push_str("import ctypes, os\n\n");
    out.push_str("from typing import Optional, AnyStr\n\n");

    out.push_str("# Load core module\n");
    out.push_str("import platform\n");
    out.push_str("core = None\n");
    out.push_str("_base_path = None\n");
    out.push_str("core_platform = platform.system()\n");
    out.push_str("if core_platform == \"Darwin\":\n");
    emit_library_load(&mut out, &library.darwin);
    out.push('\n');
    out.push_str("elif core_platform == \"Linux\":\n");
    emit_library_load(&mut out, &library.linux);
    out.push('\n');
    out.push_str("elif (core_platform == \"Windows\") or (core_platform.find(\"CYGWIN_NT\") == 0):\n");
    emit_library_load(&mut out, &library.windows);
    out.push_str("else:\n");
    out.push_str("\traise Exception(\"OS not supported\")\n\n\n");

    out.push_str("def cstr(var: Optional[AnyStr]) -> Optional[bytes]:\n");
    out.push_str("\tif var is None:\n");
    out.push_str("\t\treturn None\n");
    out.push_str("\tif isinstance(var, bytes):\n");
    out.push_str("\t\treturn var\n");
    out.push_str("\treturn var.encode(\"utf-8\")\n\n\n");

    out.push_str("def pyNativeStr(arg: AnyStr) -> str:\n");
    out.push_str("\tif isinstance(arg, str):\n");
    out.push_str("\t\treturn arg\n");
    out.push_str("\telse:\n");
    out.push_str("\t\treturn arg.decode('utf8')\n\n\n");

    out.push_str("def free_string(value:ctypes.c_char_p) -> None:\n");
    writeln!(
        out,
        "\t{}(ctypes.cast(value, ctypes.POINTER(ctypes.c_byte)))\n",
        string_free_routine
    )
    .unwrap();

    out
}

fn emit_library_load(out: &mut String, platform: &PlatformLibrary) {
    let mut base = String::from("os.path.dirname(__file__)");
    if !platform.directory.is_empty() {
        let segments: Vec<String> = platform.directory.iter().map(|s| py_string_literal(s)).collect();
        base = format!("os.path.join({}, {})", base, segments.join(", "));
    }
    writeln!(out, "\t_base_path = {}", base).unwrap();
    writeln!(
        out,
        "\tcore = ctypes.CDLL(os.path.join(_base_path, {}))",
        py_string_literal(&platform.file_name)
    )
    .unwrap();
}

/* `max_confidence`, `handle_of_type` and the optional plugin directory bootstrap */
pub fn emit_epilogue(library: &LibraryConfig) -> String {
    let mut out = String::new();

    writeln!(out, "max_confidence = {}\n", library.max_confidence).unwrap();

    out.push_str("\n# Helper functions\n");
    out.push_str("def handle_of_type(value, handle_type):\n");
    out.push_str(
        "\tif isinstance(value, ctypes.POINTER(handle_type)) or isinstance(value, ctypes.c_void_p):\n",
    );
    out.push_str("\t\treturn ctypes.cast(value, ctypes.POINTER(handle_type))\n");
    out.push_str("\traise ValueError('expected pointer to %s' % str(handle_type))\n");

    if let Some(setter) = &library.plugin_directory_setter {
        out.push_str("\n# Set path for core plugins\n");
        writeln!(out, "{}(os.path.join(_base_path, \"plugins\"))", setter).unwrap();
    }

    out
}
