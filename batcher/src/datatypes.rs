//! Datatype registry.
//!
//! Maps the three logical response types onto file extensions and comparison semantics. The
//! registry is built once (from the seeded defaults or from persisted rows) and never mutated.

use crate::error::BatcherError;
use serde::{Deserialize, Serialize};

/// The comparison semantics a datatype selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatatypeKind {
    /// Comma-delimited matrix, compared element-wise within a tolerance.
    Numeric,
    /// Free text, compared exactly.
    Text,
    /// Symbolic expression, compared exactly.
    Symbolic,
}

impl DatatypeKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "numeric" => Some(DatatypeKind::Numeric),
            "text" => Some(DatatypeKind::Text),
            "symbolic" => Some(DatatypeKind::Symbolic),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DatatypeKind::Numeric => "numeric",
            DatatypeKind::Text => "text",
            DatatypeKind::Symbolic => "symbolic",
        }
    }
}

/// The datatypes every fresh database is seeded with: `(id, name, extension)`.
pub const DEFAULT_DATATYPES: [(i64, &str, &str); 3] = [
    (1, "numeric", "csv"),
    (2, "text", "txt"),
    (3, "symbolic", "sym"),
];

/// One registered datatype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datatype {
    pub id: i64,
    pub name: String,
    pub extension: String,
}

impl Datatype {
    pub fn new(id: i64, name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            extension: extension.into(),
        }
    }

    /// The comparison kind, or `None` for a name the batcher does not know how to compare.
    pub fn kind(&self) -> Option<DatatypeKind> {
        DatatypeKind::from_name(&self.name)
    }
}

/// Immutable lookup table of datatypes.
#[derive(Debug, Clone, Default)]
pub struct DatatypeRegistry {
    datatypes: Vec<Datatype>,
}

impl DatatypeRegistry {
    pub fn new(datatypes: impl IntoIterator<Item = Datatype>) -> Self {
        Self {
            datatypes: datatypes.into_iter().collect(),
        }
    }

    /// A registry holding [`DEFAULT_DATATYPES`].
    pub fn seeded() -> Self {
        Self::new(
            DEFAULT_DATATYPES
                .iter()
                .map(|(id, name, ext)| Datatype::new(*id, *name, *ext)),
        )
    }

    pub fn by_id(&self, id: i64) -> Option<&Datatype> {
        self.datatypes.iter().find(|d| d.id == id)
    }

    /// Resolve the datatype of a discovered file.
    ///
    /// # Errors
    ///
    /// Returns [`BatcherError::UnknownExtension`] when no datatype uses `extension`.
    pub fn by_extension(&self, extension: &str) -> Result<&Datatype, BatcherError> {
        self.datatypes
            .iter()
            .find(|d| d.extension == extension)
            .ok_or_else(|| BatcherError::UnknownExtension(extension.to_string()))
    }
}
