//! Scanner for one method or function.

use std::cell::OnceCell;

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::ScanConfig;
use crate::lexer::token::{Token, TokenKind};
use crate::span::{LineRange, TokenRange};

use super::cursor::TokenCursor;
use super::doc_block::DocBlock;
use super::name_information::NameInformation;
use super::parameter::{ParameterRecord, ParameterScanner};
use super::record::Visibility;
use super::{Lookup, ScanError, ScanResult, find, join_text, unbalanced};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRecord {
    pub name: String,
    pub doc_comment: Option<String>,
    pub is_final: bool,
    pub is_abstract: bool,
    pub visibility: Visibility,
    pub is_static: bool,
    /// `function &name()`.
    pub returns_reference: bool,
    pub return_type: Option<String>,
    /// Text strictly between the outermost braces; empty without a body.
    pub body: String,
    pub has_body: bool,
    pub line_range: LineRange,
    /// Position in the token slice the member was cut from (see
    /// [`MemberScanner::with_offset`]).
    pub token_range: TokenRange,
    pub parameters: Vec<ParameterRecord>,
    pub truncated: bool,
}

pub struct MemberScanner<'t> {
    tokens: &'t [Token],
    config: ScanConfig,
    name_information: Option<NameInformation>,
    offset: usize,
    scanned: OnceCell<ScanResult<MemberRecord>>,
}

impl<'t> MemberScanner<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self::with_config(tokens, ScanConfig::default())
    }

    pub fn with_config(tokens: &'t [Token], config: ScanConfig) -> Self {
        Self {
            tokens,
            config,
            name_information: None,
            offset: 0,
            scanned: OnceCell::new(),
        }
    }

    pub fn with_name_information(mut self, name_information: NameInformation) -> Self {
        self.name_information = Some(name_information);
        self
    }

    /// Index of the first token within the enclosing class or file tokens.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn tokens(&self) -> &'t [Token] {
        self.tokens
    }

    pub fn record(&self) -> ScanResult<&MemberRecord> {
        if self.tokens.is_empty() {
            return Err(ScanError::NoTokens);
        }
        self.scanned
            .get_or_init(|| {
                MemberWalk::new(self.tokens, self.config, self.name_information.as_ref())
                    .run(self.offset)
            })
            .as_ref()
            .map_err(ScanError::clone)
    }

    pub fn name(&self) -> ScanResult<&str> {
        Ok(&self.record()?.name)
    }

    pub fn visibility(&self) -> ScanResult<Visibility> {
        Ok(self.record()?.visibility)
    }

    pub fn is_public(&self) -> ScanResult<bool> {
        Ok(self.record()?.visibility == Visibility::Public)
    }

    pub fn is_protected(&self) -> ScanResult<bool> {
        Ok(self.record()?.visibility == Visibility::Protected)
    }

    pub fn is_private(&self) -> ScanResult<bool> {
        Ok(self.record()?.visibility == Visibility::Private)
    }

    pub fn is_static(&self) -> ScanResult<bool> {
        Ok(self.record()?.is_static)
    }

    pub fn is_final(&self) -> ScanResult<bool> {
        Ok(self.record()?.is_final)
    }

    pub fn is_abstract(&self) -> ScanResult<bool> {
        Ok(self.record()?.is_abstract)
    }

    pub fn returns_reference(&self) -> ScanResult<bool> {
        Ok(self.record()?.returns_reference)
    }

    pub fn return_type(&self) -> ScanResult<Option<&str>> {
        Ok(self.record()?.return_type.as_deref())
    }

    pub fn body(&self) -> ScanResult<&str> {
        Ok(&self.record()?.body)
    }

    pub fn has_body(&self) -> ScanResult<bool> {
        Ok(self.record()?.has_body)
    }

    pub fn line_range(&self) -> ScanResult<LineRange> {
        Ok(self.record()?.line_range)
    }

    pub fn doc_comment(&self) -> ScanResult<Option<&str>> {
        Ok(self.record()?.doc_comment.as_deref())
    }

    pub fn doc_block(&self) -> ScanResult<Option<DocBlock>> {
        Ok(self.doc_comment()?.map(DocBlock::parse))
    }

    pub fn parameter_names(&self) -> ScanResult<Vec<&str>> {
        Ok(self
            .record()?
            .parameters
            .iter()
            .map(|parameter| parameter.name.as_str())
            .collect())
    }

    pub fn parameters(&self) -> ScanResult<&[ParameterRecord]> {
        Ok(&self.record()?.parameters)
    }

    /// A parameter by name (with or without `$`) or by position.
    pub fn parameter<'k>(&self, key: impl Into<Lookup<'k>>) -> ScanResult<&ParameterRecord> {
        let (_, parameter) = find(&self.record()?.parameters, key.into(), "parameter", |parameter, name| {
            parameter.name == name.trim_start_matches('$')
        })?;
        Ok(parameter)
    }

    pub fn has_parameter(&self, name: &str) -> ScanResult<bool> {
        let name = name.trim_start_matches('$');
        Ok(self
            .record()?
            .parameters
            .iter()
            .any(|parameter| parameter.name == name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Signature,
    Parameters,
    AfterParameters,
    Body,
    Done,
}

struct MemberWalk<'t, 'n> {
    cursor: TokenCursor<'t>,
    config: ScanConfig,
    name_information: Option<&'n NameInformation>,

    name: Option<String>,
    doc_comment: Option<String>,
    is_final: bool,
    is_abstract: bool,
    visibility: Visibility,
    is_static: bool,
    seen_function: bool,
    returns_reference: bool,
    return_type: Option<String>,
    body_start: Option<usize>,
    body: String,
    has_body: bool,
    line_start: u32,

    attribute: usize,
    paren: usize,
    bracket: usize,
    brace: usize,
    parameter_start: Option<usize>,
    parameter_ranges: Vec<TokenRange>,
}

impl<'t, 'n> MemberWalk<'t, 'n> {
    fn new(tokens: &'t [Token], config: ScanConfig, name_information: Option<&'n NameInformation>) -> Self {
        let cursor = TokenCursor::new(tokens);
        let line_start = cursor.line();
        Self {
            cursor,
            config,
            name_information,
            name: None,
            doc_comment: None,
            is_final: false,
            is_abstract: false,
            visibility: Visibility::Public,
            is_static: false,
            seen_function: false,
            returns_reference: false,
            return_type: None,
            body_start: None,
            body: String::new(),
            has_body: false,
            line_start,
            attribute: 0,
            paren: 0,
            bracket: 0,
            brace: 0,
            parameter_start: None,
            parameter_ranges: Vec::new(),
        }
    }

    fn run(mut self, offset: usize) -> ScanResult<MemberRecord> {
        let mut context = Context::Signature;
        while context != Context::Done && self.cursor.advance() {
            context = match context {
                Context::Signature => self.signature(),
                Context::Parameters => self.parameters(),
                Context::AfterParameters => self.after_parameters(),
                Context::Body => self.body(),
                Context::Done => Context::Done,
            };
        }

        let truncated = match context {
            // A signature without body or `;` leaves nothing open.
            Context::Done | Context::AfterParameters => false,
            Context::Signature | Context::Parameters => {
                unbalanced(&self.config, ')', "parameter list", self.line_start)?;
                true
            }
            Context::Body => {
                unbalanced(&self.config, '}', "function body", self.line_start)?;
                if let Some(start) = self.body_start {
                    self.body = join_text(&self.cursor.tokens()[start..]);
                }
                true
            }
        };

        let tokens = self.cursor.tokens();
        let parameters = self
            .parameter_ranges
            .iter()
            .enumerate()
            .map(|(position, range)| {
                let mut scanner = ParameterScanner::with_config(range.slice(tokens), position, self.config);
                if let Some(name_information) = self.name_information {
                    scanner = scanner.with_name_information(name_information.clone());
                }
                let mut record = scanner.record()?.clone();
                record.token_range = *range;
                Ok(record)
            })
            .collect::<ScanResult<Vec<_>>>()?;

        let name = self.name.unwrap_or_default();
        debug!(member = %name, parameters = parameters.len(), truncated, "member scanned");

        Ok(MemberRecord {
            name,
            doc_comment: self.doc_comment,
            is_final: self.is_final,
            is_abstract: self.is_abstract,
            visibility: self.visibility,
            is_static: self.is_static,
            returns_reference: self.returns_reference,
            return_type: self.return_type,
            body: self.body,
            has_body: self.has_body,
            line_range: LineRange::new(self.line_start, self.cursor.line()),
            token_range: TokenRange::new(offset, offset + tokens.len() - 1),
            parameters,
            truncated,
        })
    }

    fn signature(&mut self) -> Context {
        // `#[Attr(...)]` in front of the member; its parentheses are not the
        // parameter list.
        if self.attribute > 0 {
            if self.cursor.is(TokenKind::Attribute) || self.cursor.is_raw("[") {
                self.attribute += 1;
            } else if self.cursor.is_raw("]") {
                self.attribute -= 1;
            }
            return Context::Signature;
        }

        if let Some(kind) = self.cursor.kind() {
            match kind {
                TokenKind::Attribute if !self.seen_function => self.attribute = 1,
                TokenKind::DocComment if !self.seen_function => {
                    self.doc_comment = Some(self.cursor.text().to_string());
                }
                TokenKind::Final => self.is_final = true,
                TokenKind::Abstract => self.is_abstract = true,
                TokenKind::Static => self.is_static = true,
                TokenKind::Public | TokenKind::Protected | TokenKind::Private => {
                    self.visibility = Visibility::from_token(kind).unwrap_or_default();
                }
                TokenKind::Function if !self.seen_function => {
                    self.seen_function = true;
                    self.line_start = self.cursor.line();
                }
                _ if self.seen_function && self.name.is_none() && !self.cursor.is_trivia() => {
                    self.name = Some(self.cursor.text().to_string());
                }
                _ => {}
            }
            return Context::Signature;
        }

        if self.seen_function && self.name.is_none() && self.cursor.is_raw("&") {
            self.returns_reference = true;
        } else if self.cursor.is_raw("(") && self.seen_function {
            trace!(line = self.cursor.line(), "entering parameter list");
            self.paren = 1;
            return Context::Parameters;
        }
        Context::Signature
    }

    fn parameters(&mut self) -> Context {
        let index = self.cursor.index();
        if self.cursor.is(TokenKind::Attribute) {
            self.bracket += 1;
        } else if self.cursor.kind().is_none() {
            if self.cursor.is_raw("(") {
                self.paren += 1;
            } else if self.cursor.is_raw("[") {
                self.bracket += 1;
            } else if self.cursor.is_raw("]") {
                self.bracket = self.bracket.saturating_sub(1);
            } else if self.cursor.is_raw(")") {
                self.paren -= 1;
                if self.paren == 0 {
                    self.close_parameter(index);
                    return Context::AfterParameters;
                }
            } else if self.cursor.is_raw(",") && self.paren == 1 && self.bracket == 0 {
                self.close_parameter(index);
                return Context::Parameters;
            }
        }
        if self.parameter_start.is_none() && !self.cursor.is_trivia() {
            self.parameter_start = Some(self.cursor.start_index());
        }
        Context::Parameters
    }

    /// Close the parameter that ends just before the delimiter at `index`.
    fn close_parameter(&mut self, index: usize) {
        if let Some(start) = self.parameter_start.take() {
            self.parameter_ranges.push(TokenRange::new(start, (index - 1).max(start)));
        }
    }

    fn after_parameters(&mut self) -> Context {
        if self.cursor.is_raw("{") {
            self.brace = 1;
            self.has_body = true;
            self.body_start = Some(self.cursor.index() + 1);
            return Context::Body;
        }
        if self.cursor.is_raw(";") {
            return Context::Done;
        }
        if self.cursor.is_raw(":") {
            self.return_type = Some(String::new());
        } else if let Some(return_type) = self.return_type.as_mut() {
            if !self.cursor.is_trivia() {
                return_type.push_str(self.cursor.text());
            }
        }
        Context::AfterParameters
    }

    fn body(&mut self) -> Context {
        if self.cursor.is_raw("{") {
            self.brace += 1;
        } else if self.cursor.is_raw("}") {
            self.brace -= 1;
            if self.brace == 0 {
                let end = self.cursor.index();
                if let Some(start) = self.body_start {
                    self.body = join_text(&self.cursor.tokens()[start..end]);
                }
                return Context::Done;
            }
        }
        Context::Body
    }
}
