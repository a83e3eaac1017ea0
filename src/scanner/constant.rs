use std::cell::OnceCell;

use serde::Serialize;

use crate::lexer::token::{Token, TokenKind};

use super::cursor::TokenCursor;
use super::doc_block::DocBlock;
use super::record::Visibility;
use super::{ScanError, ScanResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstantRecord {
    pub name: String,
    pub visibility: Visibility,
    pub is_final: bool,
    /// Value as written, trimmed.
    pub value: Option<String>,
    pub doc_comment: Option<String>,
}

/// One class constant: the shared `[doc] [modifiers] const` prefix and one
/// `NAME = value` item.
pub struct ConstantScanner<'t> {
    prefix: &'t [Token],
    item: &'t [Token],
    scanned: OnceCell<ScanResult<ConstantRecord>>,
}

impl<'t> ConstantScanner<'t> {
    pub fn new(prefix: &'t [Token], item: &'t [Token]) -> Self {
        Self {
            prefix,
            item,
            scanned: OnceCell::new(),
        }
    }

    pub fn record(&self) -> ScanResult<&ConstantRecord> {
        if self.item.is_empty() {
            return Err(ScanError::NoTokens);
        }
        self.scanned
            .get_or_init(|| Ok(self.scan()))
            .as_ref()
            .map_err(ScanError::clone)
    }

    pub fn name(&self) -> ScanResult<&str> {
        Ok(&self.record()?.name)
    }

    pub fn value(&self) -> ScanResult<Option<&str>> {
        Ok(self.record()?.value.as_deref())
    }

    pub fn visibility(&self) -> ScanResult<Visibility> {
        Ok(self.record()?.visibility)
    }

    pub fn doc_block(&self) -> ScanResult<Option<DocBlock>> {
        Ok(self.record()?.doc_comment.as_deref().map(DocBlock::parse))
    }

    fn scan(&self) -> ConstantRecord {
        let mut record = ConstantRecord {
            name: String::new(),
            visibility: Visibility::Public,
            is_final: false,
            value: None,
            doc_comment: None,
        };

        for token in self.prefix {
            match token.kind() {
                Some(TokenKind::DocComment) => record.doc_comment = Some(token.text().to_string()),
                Some(TokenKind::Final) => record.is_final = true,
                Some(kind) => {
                    if let Some(visibility) = Visibility::from_token(kind) {
                        record.visibility = visibility;
                    }
                }
                None => {}
            }
        }

        let mut cursor = TokenCursor::new(self.item);
        let mut value: Option<String> = None;
        while cursor.advance() {
            match value.as_mut() {
                Some(value) => value.push_str(cursor.text()),
                None if cursor.is_raw("=") => value = Some(String::new()),
                // A typed constant puts its type first; the name is the last word before `=`.
                None if !cursor.is_trivia() => record.name = cursor.text().to_string(),
                None => {}
            }
        }
        record.value = value.map(|value| value.trim().to_string());
        record
    }
}
