use std::cell::OnceCell;

use serde::Serialize;

use crate::config::ScanConfig;
use crate::lexer::token::{Token, TokenKind};

use super::cursor::TokenCursor;
use super::doc_block::DocBlock;
use super::name_information::NameInformation;
use super::record::Visibility;
use super::{ScanError, ScanResult};

/// Rough classification of a default value by its leading literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    String,
    Int,
    Float,
    Array,
    Bool,
    Null,
    /// A constant or class constant reference such as `self::FOO`.
    Constant,
    Unknown,
}

impl ValueKind {
    /// Classify by the first significant token of a value. A unary sign is
    /// skipped by returning `None`.
    fn from_leading(kind: Option<TokenKind>, text: &str) -> Option<Self> {
        let value_kind = match kind {
            Some(TokenKind::StringLiteral | TokenKind::StartHeredoc) => ValueKind::String,
            Some(TokenKind::LNumber) => ValueKind::Int,
            Some(TokenKind::DNumber) => ValueKind::Float,
            Some(TokenKind::Array) => ValueKind::Array,
            Some(TokenKind::TypeTrue | TokenKind::TypeFalse) => ValueKind::Bool,
            Some(TokenKind::TypeNull) => ValueKind::Null,
            Some(TokenKind::Identifier | TokenKind::NsSeparator | TokenKind::Static) => {
                ValueKind::Constant
            }
            None if text == "-" || text == "+" => return None,
            None if text == "[" => ValueKind::Array,
            _ => ValueKind::Unknown,
        };
        Some(value_kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyRecord {
    /// Without the leading `$`.
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_readonly: bool,
    pub type_hint: Option<String>,
    pub default_value: Option<String>,
    pub value_kind: Option<ValueKind>,
    pub doc_comment: Option<String>,
}

/// One property of a declaration. The prefix (doc comment, modifiers, type)
/// is shared by every property of a `public $a, $b;` list.
pub struct PropertyScanner<'t> {
    prefix: &'t [Token],
    item: &'t [Token],
    config: ScanConfig,
    name_information: Option<NameInformation>,
    scanned: OnceCell<ScanResult<PropertyRecord>>,
}

impl<'t> PropertyScanner<'t> {
    pub fn new(prefix: &'t [Token], item: &'t [Token]) -> Self {
        Self::with_config(prefix, item, ScanConfig::default())
    }

    pub fn with_config(prefix: &'t [Token], item: &'t [Token], config: ScanConfig) -> Self {
        Self {
            prefix,
            item,
            config,
            name_information: None,
            scanned: OnceCell::new(),
        }
    }

    pub fn with_name_information(mut self, name_information: NameInformation) -> Self {
        self.name_information = Some(name_information);
        self
    }

    pub fn record(&self) -> ScanResult<&PropertyRecord> {
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

    pub fn visibility(&self) -> ScanResult<Visibility> {
        Ok(self.record()?.visibility)
    }

    pub fn is_static(&self) -> ScanResult<bool> {
        Ok(self.record()?.is_static)
    }

    pub fn is_readonly(&self) -> ScanResult<bool> {
        Ok(self.record()?.is_readonly)
    }

    pub fn type_hint(&self) -> ScanResult<Option<&str>> {
        Ok(self.record()?.type_hint.as_deref())
    }

    pub fn default_value(&self) -> ScanResult<Option<&str>> {
        Ok(self.record()?.default_value.as_deref())
    }

    pub fn value_kind(&self) -> ScanResult<Option<ValueKind>> {
        Ok(self.record()?.value_kind)
    }

    pub fn doc_block(&self) -> ScanResult<Option<DocBlock>> {
        Ok(self.record()?.doc_comment.as_deref().map(DocBlock::parse))
    }

    fn scan(&self) -> PropertyRecord {
        let mut record = PropertyRecord {
            name: String::new(),
            visibility: Visibility::Public,
            is_static: false,
            is_readonly: false,
            type_hint: None,
            default_value: None,
            value_kind: None,
            doc_comment: None,
        };

        let mut type_hint = String::new();
        let mut attribute_depth = 0usize;
        let mut cursor = TokenCursor::new(self.prefix);
        while cursor.advance() {
            if attribute_depth > 0 {
                if cursor.is_raw("[") {
                    attribute_depth += 1;
                } else if cursor.is_raw("]") {
                    attribute_depth -= 1;
                }
                continue;
            }
            match cursor.kind() {
                Some(TokenKind::DocComment) => record.doc_comment = Some(cursor.text().to_string()),
                Some(TokenKind::Attribute) => attribute_depth = 1,
                Some(kind @ (TokenKind::Public | TokenKind::Protected | TokenKind::Private)) => {
                    record.visibility = Visibility::from_token(kind).unwrap_or_default();
                }
                Some(TokenKind::Static) => record.is_static = true,
                Some(TokenKind::Readonly) => record.is_readonly = true,
                Some(kind) if kind.is_type() => type_hint.push_str(cursor.text()),
                None if cursor.is_raw("?") || cursor.is_raw("|") || cursor.is_raw("&") => {
                    type_hint.push_str(cursor.text());
                }
                _ => {}
            }
        }
        if !type_hint.is_empty() {
            record.type_hint = Some(self.resolve_type(&type_hint));
        }

        let mut default_value: Option<String> = None;
        let mut leading = None;
        let mut depth = 0usize;
        let mut cursor = TokenCursor::new(self.item);
        while cursor.advance() {
            if cursor.is_raw("(") || cursor.is_raw("[") {
                depth += 1;
            } else if cursor.is_raw(")") || cursor.is_raw("]") {
                depth = depth.saturating_sub(1);
            } else if cursor.is_raw("{") && depth == 0 {
                // Property hooks follow; they are not part of the value.
                break;
            }

            match default_value.as_mut() {
                Some(value) => {
                    if leading.is_none() && !cursor.is_trivia() {
                        leading = ValueKind::from_leading(cursor.kind(), cursor.text());
                    }
                    value.push_str(cursor.text());
                }
                None if cursor.is(TokenKind::Variable) && record.name.is_empty() => {
                    record.name = cursor.text().trim_start_matches('$').to_string();
                }
                None if cursor.is_raw("=") => default_value = Some(String::new()),
                None => {}
            }
        }

        record.default_value = default_value.map(|value| value.trim().to_string());
        record.value_kind = record
            .default_value
            .as_ref()
            .map(|_| leading.unwrap_or(ValueKind::Unknown));
        record
    }

    fn resolve_type(&self, type_hint: &str) -> String {
        match self.name_information.as_ref() {
            Some(name_information) if self.config.resolve_type_hints => {
                let (nullable, bare) = match type_hint.strip_prefix('?') {
                    Some(bare) => ("?", bare),
                    None => ("", type_hint),
                };
                let resolved = bare
                    .split('|')
                    .map(|name| name_information.resolve_name(name))
                    .collect::<Vec<_>>()
                    .join("|");
                format!("{nullable}{resolved}")
            }
            _ => type_hint.to_string(),
        }
    }
}
