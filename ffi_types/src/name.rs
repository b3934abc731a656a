use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Separator used by the textual form of a qualified name.
pub const NAME_SEPARATOR: &str = "::";

/// An ordered sequence of identifier segments naming a type, variable or function.
///
/// Only single-segment names take part in binding emission; namespaced names are
/// carried through the model but skipped by the generators.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(from = "QualifiedNameRepr", into = "String")]
pub struct QualifiedName {
    segments: Vec<String>,
}

/* Accepted on-disk shapes: "ns::Name" or [ns, Name] */
#[derive(Deserialize)]
#[serde(untagged)]
enum QualifiedNameRepr {
    Text(String),
    Segments(Vec<String>),
}

impl From<QualifiedNameRepr> for QualifiedName {
    fn from(repr: QualifiedNameRepr) -> Self {
        match repr {
            QualifiedNameRepr::Text(text) => QualifiedName::parse(&text),
            QualifiedNameRepr::Segments(segments) => QualifiedName::new(segments),
        }
    }
}

impl From<QualifiedName> for String {
    fn from(name: QualifiedName) -> Self {
        name.to_string()
    }
}

impl QualifiedName {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Split a `::`-separated name into its segments.
    pub fn parse(text: &str) -> Self {
        Self {
            segments: text.split(NAME_SEPARATOR).map(str::to_string).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The bare identifier when the name has exactly one segment.
    pub fn single(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(text: &str) -> Self {
        QualifiedName::parse(text)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join(NAME_SEPARATOR))
    }
}
