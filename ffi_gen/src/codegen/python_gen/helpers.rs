use std::collections::HashSet;

/* Identifiers that cannot be used as Python names */
pub const PYTHON_KEYWORDS: &[&str] = &[
    "False", "True", "None", "and", "as", "assert", "async", "await", "break", "class", "continue",
    "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if", "import",
    "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
    "with", "yield",
];

pub fn is_python_keyword(name: &str) -> bool {
    PYTHON_KEYWORDS.contains(&name)
}

/* Append an underscore to names that collide with a Python keyword */
pub fn escape_python_keyword(name: &str) -> String {
    if is_python_keyword(name) {
        format!("{}_", name)
    } else {
        name.to_string()
    }
}

/* Wrapper parameter name: keywords escaped, unnamed parameters numbered by position */
pub fn parameter_name(name: &str, index: usize) -> String {
    if name.is_empty() {
        format!("arg{}", index)
    } else {
        escape_python_keyword(name)
    }
}

/* Wrapper parameter names for one signature; a generated name that collides is padded with `_` */
pub fn parameter_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let names: Vec<&str> = names.into_iter().collect();
    let declared: HashSet<&str> = names
        .iter()
        .copied()
        .filter(|name| !name.is_empty() && !is_python_keyword(name))
        .collect();

    let mut taken = HashSet::new();
    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let mut candidate = parameter_name(name, index);
            let generated = candidate != *name;
            while taken.contains(&candidate) || (generated && declared.contains(candidate.as_str())) {
                candidate.push('_');
            }
            taken.insert(candidate.clone());
            candidate
        })
        .collect()
}

/* `BNLogLevel` -> `LogLevel`; names no longer than the prefix are kept whole */
pub fn strip_library_prefix<'a>(name: &'a str, prefix: &str) -> &'a str {
    if !prefix.is_empty() && name.len() > prefix.len() {
        if let Some(stripped) = name.strip_prefix(prefix) {
            return stripped;
        }
    }
    name
}

/* Double-quoted Python string literal */
pub fn py_string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '\\' => literal.push_str("\\\\"),
            '"' => literal.push_str("\\\""),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            c if c.is_control() => literal.push_str(&format!("\\x{:02x}", c as u32)),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}
