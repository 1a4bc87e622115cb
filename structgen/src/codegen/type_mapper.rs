//! MySQL declared type to Go type mapping

/// A Go type for generated struct fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoType {
    String,
    Int,
    Float64,
    Bytes,
    /// The declared type matched no classification
    Unknown,
}

impl GoType {
    /// Get the type token for code generation (empty for `Unknown`)
    pub fn as_go(&self) -> &'static str {
        match self {
            GoType::String => "string",
            GoType::Int => "int",
            GoType::Float64 => "float64",
            GoType::Bytes => "[]byte",
            GoType::Unknown => "",
        }
    }

    /// Check if this is the unknown marker
    pub fn is_unknown(&self) -> bool {
        matches!(self, GoType::Unknown)
    }
}

/// How a classification's patterns are matched against the declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Prefix,
    Suffix,
}

/// One row of the classification table
#[derive(Debug, Clone, Copy)]
pub struct TypeClass {
    pub target: GoType,
    pub kind: MatchKind,
    pub patterns: &'static [&'static str],
}

impl TypeClass {
    fn matches(&self, declared: &str) -> bool {
        self.patterns.iter().any(|pattern| match self.kind {
            MatchKind::Prefix => declared.starts_with(pattern),
            MatchKind::Suffix => declared.ends_with(pattern),
        })
    }
}

/// Classification table, checked in order; the first matching row wins.
pub const CLASSIFICATION: &[TypeClass] = &[
    TypeClass {
        target: GoType::String,
        kind: MatchKind::Prefix,
        patterns: &["text", "varchar", "json", "char"],
    },
    TypeClass {
        target: GoType::Int,
        kind: MatchKind::Prefix,
        patterns: &[
            "tinyint",
            "smallint",
            "mediumint",
            "integer",
            "int",
            "bigint",
            "bool",
            "boolean",
        ],
    },
    TypeClass {
        target: GoType::Float64,
        kind: MatchKind::Prefix,
        patterns: &["float", "double", "decimal", "dec"],
    },
    TypeClass {
        target: GoType::Bytes,
        kind: MatchKind::Suffix,
        patterns: &["tinyblob", "blob", "mediumblob", "longblob"],
    },
];

/// Map a declared MySQL type (e.g. `"decimal(10,2)"`) to a Go type.
///
/// The raw string is matched by prefix/suffix, ignoring ASCII case; size
/// and precision annotations are never parsed out.
pub fn map_type(declared_type: &str) -> GoType {
    let declared = declared_type.trim().to_ascii_lowercase();
    CLASSIFICATION
        .iter()
        .find(|class| class.matches(&declared))
        .map(|class| class.target)
        .unwrap_or(GoType::Unknown)
}
