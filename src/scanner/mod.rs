//! Token scanners.
//!
//! Every scanner borrows a slice of tokens, walks it once on the first query
//! and caches the result. Child scanners (class, member, parameter) borrow
//! sub-slices of their parent's tokens.

pub mod class;
pub mod constant;
pub mod cursor;
pub mod doc_block;
pub mod error;
pub mod file;
pub mod member;
pub mod name_information;
pub mod parameter;
pub mod property;
pub mod record;
pub mod token_array;

pub use class::{ClassInfo, ClassScanner, TraitAlias, TraitPrecedence, TraitUse};
pub use constant::{ConstantRecord, ConstantScanner};
pub use cursor::TokenCursor;
pub use doc_block::{DocBlock, DocTag};
pub use error::{FileScanError, ScanError, ScanResult};
pub use file::{DirectoryIndex, DirectoryScanner, FileScanner};
pub use member::{MemberRecord, MemberScanner};
pub use name_information::NameInformation;
pub use parameter::{ParameterRecord, ParameterScanner};
pub use property::{PropertyRecord, PropertyScanner, ValueKind};
pub use record::{
    ClassKind, ClassRecord, FunctionRecord, IncludeKind, IncludeRecord, NamespaceRecord,
    StructuralRecord, UseRecord, UseStatement, Visibility,
};
pub use token_array::TokenArrayScanner;

use tracing::warn;

use crate::config::{ScanConfig, UnbalancedPolicy};

/// Key for getters that accept either a name or a declaration-order index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Name(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for Lookup<'a> {
    fn from(name: &'a str) -> Self {
        Lookup::Name(name)
    }
}

impl<'a> From<&'a String> for Lookup<'a> {
    fn from(name: &'a String) -> Self {
        Lookup::Name(name)
    }
}

impl From<usize> for Lookup<'_> {
    fn from(index: usize) -> Self {
        Lookup::Index(index)
    }
}

/// Resolve a lookup against `items`, matching names with `matches`.
pub(crate) fn find<'r, T>(
    items: &'r [T],
    key: Lookup<'_>,
    kind: &'static str,
    matches: impl Fn(&T, &str) -> bool,
) -> ScanResult<(usize, &'r T)> {
    match key {
        Lookup::Index(index) => items.get(index).map(|item| (index, item)).ok_or(
            ScanError::IndexOutOfRange {
                kind,
                index,
                len: items.len(),
            },
        ),
        Lookup::Name(name) => items
            .iter()
            .enumerate()
            .find(|(_, item)| matches(item, name))
            .ok_or_else(|| ScanError::NotFound {
                kind,
                name: name.to_string(),
            }),
    }
}

/// Apply the configured policy to a record the stream ended inside of.
pub(crate) fn unbalanced(
    config: &ScanConfig,
    delimiter: char,
    context: &'static str,
    line: u32,
) -> ScanResult<()> {
    match config.unbalanced {
        UnbalancedPolicy::Truncate => {
            warn!(context, line, %delimiter, "token stream ended before the closing delimiter; record truncated");
            Ok(())
        }
        UnbalancedPolicy::Reject => Err(ScanError::Unbalanced {
            delimiter,
            context,
            line,
        }),
    }
}

/// Concatenate the text of a token slice.
pub(crate) fn join_text(tokens: &[crate::lexer::token::Token]) -> String {
    tokens.iter().map(|token| token.text()).collect()
}
