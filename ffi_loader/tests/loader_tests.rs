use ffi_loader::{ConventionRules, DeclarationParser, HeaderParser, LoadError};
use ffi_types::{LoggingConvention, QualifiedName, Severity, TypeDescriptor};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const COMMON: &str = r#"
header:
  name: common.h
types:
  - name: BNPoint
    type:
      structure:
        members:
          - name: x
            type:
              integer: { width: 4, signed: true }
          - name: y
            type:
              integer: { width: 4, signed: true }
"#;

const CORE: &str = r#"
header:
  name: core.h
imports:
  - path: common.yaml
types:
  - name: BNRect
    type:
      structure:
        members:
          - name: origin
            type:
              named: { name: BNPoint, kind: structure }
functions:
  - name: BNFreeString
    type:
      function:
        return-type: void
        parameters:
          - name: str
            type:
              pointer:
                integer: { width: 1, signed: true }
  - name: BNLog
    type:
      function:
        return-type: void
        parameters:
          - name: level
            type:
              named: { name: BNLogLevel, kind: enumeration }
        variadic: true
diagnostics:
  - severity: warning
    file: core.h
    line: 12
    column: 3
    message: "unused macro"
"#;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn parser(include_dirs: Vec<std::path::PathBuf>) -> DeclarationParser {
    DeclarationParser::new(include_dirs, ConventionRules::default())
}

#[test]
fn test_imports_resolve_through_include_dirs() {
    let headers = TempDir::new().unwrap();
    let includes = TempDir::new().unwrap();
    write(includes.path(), "common.yaml", COMMON);
    let root = write(headers.path(), "core.yaml", CORE);

    let result = parser(vec![includes.path().to_path_buf()]).parse(&root).unwrap();

    assert!(!result.has_errors(), "{:?}", result.diagnostics);
    let names: Vec<String> = result.types.keys().map(|n| n.to_string()).collect();
    /* Imported declarations precede the importing file's */
    assert_eq!(names, vec!["BNPoint", "BNRect"]);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].severity, Severity::Warning);
}

#[test]
fn test_missing_import_is_an_error_diagnostic() {
    let headers = TempDir::new().unwrap();
    let root = write(headers.path(), "core.yaml", CORE);

    let result = parser(Vec::new()).parse(&root).unwrap();

    assert!(result.has_errors());
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Error && d.message.contains("common.yaml")));
}

#[test]
fn test_unreadable_root_is_fatal() {
    let headers = TempDir::new().unwrap();
    let missing = headers.path().join("missing.yaml");

    let err = parser(Vec::new()).parse(&missing).unwrap_err();
    assert!(matches!(err, LoadError::Unreadable { .. }));
}

#[test]
fn test_malformed_yaml_reports_location() {
    let headers = TempDir::new().unwrap();
    let root = write(headers.path(), "bad.yaml", "types:\n  - name: BNPoint\n    type: [unclosed\n");

    let result = parser(Vec::new()).parse(&root).unwrap();

    assert_eq!(result.error_count(), 1);
    let diagnostic = &result.diagnostics[0];
    assert!(diagnostic.file.ends_with("bad.yaml"));
    assert!(diagnostic.line > 0);
}

#[test]
fn test_circular_imports_load_once() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.yaml", "imports:\n  - path: b.yaml\ntypes:\n  - name: A\n    type: bool\n");
    write(dir.path(), "b.yaml", "imports:\n  - path: a.yaml\ntypes:\n  - name: B\n    type: bool\n");

    let result = parser(Vec::new()).parse(&dir.path().join("a.yaml")).unwrap();

    assert!(!result.has_errors(), "{:?}", result.diagnostics);
    assert_eq!(result.types.len(), 2);
    assert_eq!(result.types[&QualifiedName::from("B")], TypeDescriptor::Bool);
}

#[test]
fn test_conflicting_redefinition_is_reported() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.yaml", "types:\n  - name: Handle\n    type: bool\n");
    let root = write(
        dir.path(),
        "b.yaml",
        "imports:\n  - path: a.yaml\n  - path: a.yaml\ntypes:\n  - name: Handle\n    type:\n      float: { width: 4 }\n",
    );

    let result = parser(Vec::new()).parse(&root).unwrap();

    assert_eq!(result.error_count(), 1);
    assert!(result.diagnostics[0].message.contains("Handle"));
}

#[test]
fn test_conventions_are_attached_while_parsing() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "common.yaml", COMMON);
    let root = write(dir.path(), "core.yaml", CORE);

    let result = parser(Vec::new()).parse(&root).unwrap();

    let free = &result.functions[&QualifiedName::from("BNFreeString")];
    assert!(free.conventions.is_string_free());
    let log = &result.functions[&QualifiedName::from("BNLog")];
    assert_eq!(log.conventions.logging, Some(LoggingConvention::Leveled));
}

#[test]
fn test_declared_string_free_false_is_kept() {
    let dir = TempDir::new().unwrap();
    let root = write(
        dir.path(),
        "core.yaml",
        r#"
header:
  name: core.h
functions:
  - name: BNFreeString
    type:
      function:
        return-type: void
        parameters:
          - name: str
            type:
              pointer:
                integer: { width: 1, signed: true }
    conventions:
      string-free: false
"#,
    );

    let result = parser(Vec::new()).parse(&root).unwrap();

    let free = &result.functions[&QualifiedName::from("BNFreeString")];
    assert_eq!(free.conventions.string_free, Some(false));
    assert!(!free.conventions.is_string_free());
}
