use serde::Serialize;

use crate::lexer::token::TokenKind;
use crate::span::{LineRange, TokenRange};

/// One import of a `use` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UseStatement {
    pub import: String,
    pub alias: Option<String>,
}

impl UseStatement {
    pub fn new(import: impl Into<String>, alias: Option<&str>) -> Self {
        Self {
            import: import.into(),
            alias: alias.map(str::to_string),
        }
    }

    /// The name this import is visible under in the current file.
    pub fn local_name(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.import.rsplit('\\').next().unwrap_or(&self.import),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeKind {
    Include,
    IncludeOnce,
    Require,
    RequireOnce,
}

impl IncludeKind {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Include => Some(IncludeKind::Include),
            TokenKind::IncludeOnce => Some(IncludeKind::IncludeOnce),
            TokenKind::Require => Some(IncludeKind::Require),
            TokenKind::RequireOnce => Some(IncludeKind::RequireOnce),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IncludeKind::Include => "include",
            IncludeKind::IncludeOnce => "include_once",
            IncludeKind::Require => "require",
            IncludeKind::RequireOnce => "require_once",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Class,
    Interface,
    Trait,
}

impl ClassKind {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Class => Some(ClassKind::Class),
            TokenKind::Interface => Some(ClassKind::Interface),
            TokenKind::Trait => Some(ClassKind::Trait),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Trait => "trait",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Public => Some(Visibility::Public),
            TokenKind::Protected => Some(Visibility::Protected),
            TokenKind::Private => Some(Visibility::Private),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceRecord {
    /// `None` for the global `namespace { }` block.
    pub name: Option<String>,
    pub token_range: TokenRange,
    pub line_range: LineRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UseRecord {
    pub namespace: Option<String>,
    pub statements: Vec<UseStatement>,
    pub token_range: TokenRange,
    pub line_range: LineRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncludeRecord {
    pub kind: IncludeKind,
    /// The path expression as written, not evaluated.
    pub path: String,
    pub token_range: TokenRange,
    pub line_range: LineRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassRecord {
    pub kind: ClassKind,
    /// Namespace-qualified name.
    pub name: String,
    pub short_name: String,
    pub namespace: Option<String>,
    /// Use statements of the enclosing namespace seen before the declaration.
    pub uses: Vec<UseStatement>,
    pub is_final: bool,
    pub is_abstract: bool,
    pub token_range: TokenRange,
    pub line_range: LineRange,
    /// The stream ended before the closing brace.
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionRecord {
    pub name: String,
    pub short_name: String,
    pub namespace: Option<String>,
    pub uses: Vec<UseStatement>,
    pub token_range: TokenRange,
    pub line_range: LineRange,
    pub truncated: bool,
}

/// A top-level construct recognised by the token array scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructuralRecord {
    Namespace(NamespaceRecord),
    Use(UseRecord),
    Include(IncludeRecord),
    ClassLike(ClassRecord),
    Function(FunctionRecord),
}

impl StructuralRecord {
    pub fn token_range(&self) -> TokenRange {
        match self {
            StructuralRecord::Namespace(record) => record.token_range,
            StructuralRecord::Use(record) => record.token_range,
            StructuralRecord::Include(record) => record.token_range,
            StructuralRecord::ClassLike(record) => record.token_range,
            StructuralRecord::Function(record) => record.token_range,
        }
    }

    pub fn line_range(&self) -> LineRange {
        match self {
            StructuralRecord::Namespace(record) => record.line_range,
            StructuralRecord::Use(record) => record.line_range,
            StructuralRecord::Include(record) => record.line_range,
            StructuralRecord::ClassLike(record) => record.line_range,
            StructuralRecord::Function(record) => record.line_range,
        }
    }
}
