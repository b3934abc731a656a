use super::helpers::parameter_names;
use super::types::{ExactPosition, TypeRenderer};
use ffi_types::{FunctionConventions, FunctionType, LoggingConvention, ParsedResult};
use std::fmt::Write;
use tracing::warn;

/* Emit the `# Function definitions` section */
pub fn emit_function_definitions(model: &ParsedResult, renderer: &TypeRenderer, default_free: &str) -> String {
    let mut out = String::from("\n# Function definitions\n");

    for (qualified, decl) in &model.functions {
        let Some(name) = qualified.single() else {
            warn!("skipping namespaced function {}", qualified);
            continue;
        };
        let Some(function) = decl.ty.callable() else {
            warn!("skipping {}: declaration is not a function", name);
            continue;
        };

        let emitter = FunctionEmitter {
            name,
            function,
            conventions: &decl.conventions,
            renderer,
            default_free,
        };
        out.push_str(&emitter.emit());
    }

    out
}

/// Emits the raw native declaration and the Python wrapper for one function.
pub struct FunctionEmitter<'a> {
    pub name: &'a str,
    pub function: &'a FunctionType,
    pub conventions: &'a FunctionConventions,
    pub renderer: &'a TypeRenderer,
    /// Release routine for string results without an explicit `release_with`.
    pub default_free: &'a str,
}

impl<'a> FunctionEmitter<'a> {
    /* The allocator hands its buffer to a callback, so it is never decoded */
    fn is_string_result(&self) -> bool {
        !self.conventions.is_allocator() && self.function.return_type.is_char_pointer()
    }

    fn is_pointer_result(&self) -> bool {
        self.function.return_type.is_pointer()
    }

    /* Release routines take the native buffer as-is */
    fn swizzles(&self) -> bool {
        !self.conventions.is_string_free()
    }

    fn parameter_names(&self) -> Vec<String> {
        parameter_names(self.function.parameters.iter().map(|param| param.name.as_str()))
    }

    fn raw_name(&self) -> String {
        format!("_{}", self.name)
    }

    pub fn emit(&self) -> String {
        let mut out = self.emit_raw_declaration();

        match (self.function.variadic, self.conventions.logging) {
            (true, Some(logging)) => self.emit_logging_wrapper(&mut out, logging),
            _ => self.emit_wrapper(&mut out),
        }

        out
    }

    pub fn emit_raw_declaration(&self) -> String {
        let raw = self.raw_name();
        let mut out = String::new();

        writeln!(out, "# -------------------------------------------------------").unwrap();
        writeln!(out, "# {}\n", raw).unwrap();
        writeln!(out, "{} = core.{}", raw, self.name).unwrap();

        let result_position = if self.conventions.is_allocator() {
            ExactPosition::Callback
        } else {
            ExactPosition::OwnedBuffer
        };
        writeln!(
            out,
            "{}.restype = {}",
            raw,
            self.renderer.exact(&self.function.return_type, result_position)
        )
        .unwrap();

        /* ctypes cannot describe a variable argument list */
        if !self.function.variadic {
            let param_position = if self.swizzles() {
                ExactPosition::Plain
            } else {
                ExactPosition::OwnedBuffer
            };
            writeln!(out, "{}.argtypes = [", raw).unwrap();
            for param in &self.function.parameters {
                writeln!(out, "\t\t{},", self.renderer.exact(&param.ty, param_position)).unwrap();
            }
            writeln!(out, "\t]").unwrap();
        }

        out
    }

    fn emit_logging_wrapper(&self, out: &mut String, logging: LoggingConvention) {
        let raw = self.raw_name();
        out.push_str("\n\n");
        match logging {
            LoggingConvention::Plain => {
                writeln!(out, "def {}(*args):", self.name).unwrap();
                writeln!(out, "\treturn {}(*[cstr(arg) for arg in args])\n", raw).unwrap();
            }
            LoggingConvention::Leveled => {
                let level = self
                    .parameter_names()
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| "level".to_string());
                writeln!(out, "def {}({}, *args):", self.name, level).unwrap();
                writeln!(out, "\treturn {}({}, *[cstr(arg) for arg in args])\n", raw, level).unwrap();
            }
        }
    }

    fn emit_wrapper(&self, out: &mut String) {
        out.push_str("\n\n# noinspection PyPep8Naming\n");
        write!(out, "def {}(", self.name).unwrap();

        let mut signature = Vec::with_capacity(self.function.parameters.len() + 1);
        let mut call_args = Vec::with_capacity(self.function.parameters.len() + 1);
        for (param, name) in self.function.parameters.iter().zip(self.parameter_names()) {
            let annotation = if self.swizzles() {
                self.renderer.swizzled(&param.ty)
            } else {
                self.renderer.exact(&param.ty, ExactPosition::OwnedBuffer)
            };
            signature.push(format!("\n\t\t{}: {}", name, annotation));

            if self.swizzles() && param.ty.is_char_pointer() {
                call_args.push(format!("cstr({})", name));
            } else {
                call_args.push(name);
            }
        }
        if self.function.variadic {
            signature.push("\n\t\t*args".to_string());
            call_args.push("*[cstr(arg) if isinstance(arg, str) else arg for arg in args]".to_string());
        }

        out.push_str(&signature.join(", "));
        writeln!(out, "\n\t\t) -> {}:", self.return_annotation()).unwrap();

        let call = format!("{}({})", self.raw_name(), call_args.join(", "));
        if self.is_string_result() {
            let free = self
                .conventions
                .release_with
                .as_deref()
                .unwrap_or(self.default_free);
            writeln!(out, "\tresult = {}", call).unwrap();
            writeln!(out, "\tif not result:").unwrap();
            writeln!(out, "\t\treturn None").unwrap();
            writeln!(
                out,
                "\tstring = str(pyNativeStr(ctypes.cast(result, ctypes.c_char_p).value))"
            )
            .unwrap();
            writeln!(out, "\t{}(result)", free).unwrap();
            writeln!(out, "\treturn string").unwrap();
        } else if self.is_pointer_result() {
            writeln!(out, "\tresult = {}", call).unwrap();
            writeln!(out, "\tif not result:").unwrap();
            writeln!(out, "\t\treturn None").unwrap();
            writeln!(out, "\treturn result").unwrap();
        } else {
            writeln!(out, "\treturn {}", call).unwrap();
        }
        out.push_str("\n\n");
    }

    fn return_annotation(&self) -> String {
        if self.conventions.is_allocator() {
            return "Optional[ctypes.c_void_p]".to_string();
        }

        let annotation = self.renderer.swizzled(&self.function.return_type);
        if (self.is_string_result() || self.is_pointer_result()) && !annotation.starts_with("Optional[") {
            format!("Optional[{}]", annotation)
        } else {
            annotation
        }
    }
}
