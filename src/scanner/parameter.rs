use std::cell::OnceCell;

use serde::Serialize;

use crate::config::ScanConfig;
use crate::lexer::token::{Token, TokenKind};
use crate::span::TokenRange;

use super::cursor::TokenCursor;
use super::name_information::NameInformation;
use super::{ScanError, ScanResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterRecord {
    /// Without the leading `$`.
    pub name: String,
    /// Zero-based position in the parameter list.
    pub position: usize,
    pub type_hint: Option<String>,
    pub is_nullable: bool,
    pub is_array: bool,
    pub is_callable: bool,
    pub is_passed_by_reference: bool,
    pub is_variadic: bool,
    pub is_optional: bool,
    pub is_default_value_available: bool,
    /// Default value exactly as written, trimmed.
    pub default_value: Option<String>,
    /// Within the member's tokens when read through a `MemberScanner`,
    /// otherwise the whole slice handed to the scanner.
    pub token_range: TokenRange,
}

/// Scans the tokens of a single parameter, from its first token up to (not
/// including) the `,` or `)` that ends it.
pub struct ParameterScanner<'t> {
    tokens: &'t [Token],
    position: usize,
    config: ScanConfig,
    name_information: Option<NameInformation>,
    scanned: OnceCell<ScanResult<ParameterRecord>>,
}

impl<'t> ParameterScanner<'t> {
    pub fn new(tokens: &'t [Token], position: usize) -> Self {
        Self::with_config(tokens, position, ScanConfig::default())
    }

    pub fn with_config(tokens: &'t [Token], position: usize, config: ScanConfig) -> Self {
        Self {
            tokens,
            position,
            config,
            name_information: None,
            scanned: OnceCell::new(),
        }
    }

    pub fn with_name_information(mut self, name_information: NameInformation) -> Self {
        self.name_information = Some(name_information);
        self
    }

    pub fn record(&self) -> ScanResult<&ParameterRecord> {
        if self.tokens.is_empty() {
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

    pub fn type_hint(&self) -> ScanResult<Option<&str>> {
        Ok(self.record()?.type_hint.as_deref())
    }

    pub fn default_value(&self) -> ScanResult<Option<&str>> {
        Ok(self.record()?.default_value.as_deref())
    }

    fn scan(&self) -> ParameterRecord {
        let mut cursor = TokenCursor::new(self.tokens);
        let mut name = None;
        let mut type_hint = String::new();
        let mut default_value: Option<String> = None;
        let mut is_nullable = false;
        let mut is_array = false;
        let mut is_callable = false;
        let mut by_reference = false;
        let mut is_variadic = false;
        let mut attribute_depth = 0usize;

        while cursor.advance() {
            if let Some(default_value) = default_value.as_mut() {
                default_value.push_str(cursor.text());
                continue;
            }

            if attribute_depth > 0 {
                if cursor.is_raw("[") || cursor.is(TokenKind::Attribute) {
                    attribute_depth += 1;
                } else if cursor.is_raw("]") {
                    attribute_depth -= 1;
                }
                continue;
            }

            let Some(kind) = cursor.kind() else {
                match cursor.text() {
                    "=" => default_value = Some(String::new()),
                    "?" => is_nullable = true,
                    "|" => type_hint.push('|'),
                    // `&` in front of the variable passes by reference; anywhere
                    // else it joins an intersection type.
                    "&" => match cursor.peek_significant().and_then(Token::kind) {
                        Some(TokenKind::Variable | TokenKind::Ellipsis) => by_reference = true,
                        _ => type_hint.push('&'),
                    },
                    _ => {}
                }
                continue;
            };

            match kind {
                TokenKind::Attribute => attribute_depth = 1,
                TokenKind::Ellipsis => is_variadic = true,
                TokenKind::Variable => {
                    name = Some(cursor.text().trim_start_matches('$').to_string());
                }
                // Promoted constructor parameters.
                TokenKind::Public | TokenKind::Protected | TokenKind::Private | TokenKind::Readonly => {}
                kind if kind.is_type() && name.is_none() => {
                    match kind {
                        TokenKind::Array => is_array = true,
                        TokenKind::TypeCallable => is_callable = true,
                        _ => {}
                    }
                    type_hint.push_str(cursor.text());
                }
                _ => {}
            }
        }

        let default_value = if is_variadic {
            None
        } else {
            default_value.map(|value| value.trim().to_string())
        };
        let type_hint = (!type_hint.is_empty()).then(|| self.resolve_type(&type_hint));

        ParameterRecord {
            name: name.unwrap_or_default(),
            position: self.position,
            type_hint,
            is_nullable,
            is_array,
            is_callable,
            is_passed_by_reference: by_reference,
            is_variadic,
            is_optional: default_value.is_some() || is_variadic,
            is_default_value_available: default_value.is_some(),
            default_value,
            token_range: TokenRange::new(0, self.tokens.len() - 1),
        }
    }

    /// Expand every class name of a (possibly union) type through the name
    /// information. Runs once, after the whole parameter was read.
    fn resolve_type(&self, type_hint: &str) -> String {
        let Some(name_information) = self
            .name_information
            .as_ref()
            .filter(|_| self.config.resolve_type_hints)
        else {
            return type_hint.to_string();
        };
        type_hint
            .split('|')
            .map(|part| {
                part.split('&')
                    .map(|name| name_information.resolve_name(name))
                    .collect::<Vec<_>>()
                    .join("&")
            })
            .collect::<Vec<_>>()
            .join("|")
    }
}
