//! Top-level structural scan of a token stream.

use std::borrow::Cow;
use std::cell::OnceCell;
use std::mem;

use tracing::{debug, trace};

use crate::config::ScanConfig;
use crate::lexer::token::{Token, TokenKind};
use crate::span::{LineRange, TokenRange};

use super::class::ClassScanner;
use super::cursor::TokenCursor;
use super::doc_block::DocBlock;
use super::member::MemberScanner;
use super::name_information::NameInformation;
use super::record::{
    ClassKind, ClassRecord, FunctionRecord, IncludeKind, IncludeRecord, NamespaceRecord,
    StructuralRecord, UseRecord, UseStatement,
};
use super::{Lookup, ScanError, ScanResult, find, unbalanced};

/// Scans a whole token stream for namespaces, use statements, includes,
/// class-like declarations and functions.
///
/// Nothing happens until the first query; the records are then computed in a
/// single forward pass and cached for the lifetime of the scanner.
pub struct TokenArrayScanner<'t> {
    tokens: Cow<'t, [Token]>,
    config: ScanConfig,
    records: OnceCell<ScanResult<Vec<StructuralRecord>>>,
}

impl<'t> TokenArrayScanner<'t> {
    pub fn new(tokens: impl Into<Cow<'t, [Token]>>) -> Self {
        Self::with_config(tokens, ScanConfig::default())
    }

    pub fn with_config(tokens: impl Into<Cow<'t, [Token]>>, config: ScanConfig) -> Self {
        Self {
            tokens: tokens.into(),
            config,
            records: OnceCell::new(),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn config(&self) -> ScanConfig {
        self.config
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// All structural records in source order.
    pub fn records(&self) -> ScanResult<&[StructuralRecord]> {
        if self.tokens.is_empty() {
            return Err(ScanError::NoTokens);
        }
        self.records
            .get_or_init(|| StructuralScan::new(&self.tokens, self.config).run())
            .as_deref()
            .map_err(ScanError::clone)
    }

    /// Declared namespace names; the global `namespace { }` block is `""`.
    pub fn namespaces(&self) -> ScanResult<Vec<&str>> {
        Ok(self
            .records()?
            .iter()
            .filter_map(|record| match record {
                StructuralRecord::Namespace(ns) => Some(ns.name.as_deref().unwrap_or("")),
                _ => None,
            })
            .collect())
    }

    /// Use statements declared inside `namespace` (`None` for code outside any namespace).
    pub fn uses(&self, namespace: Option<&str>) -> ScanResult<Vec<&UseStatement>> {
        Ok(self
            .records()?
            .iter()
            .filter_map(|record| match record {
                StructuralRecord::Use(use_record) if use_record.namespace.as_deref() == namespace => {
                    Some(use_record.statements.iter())
                }
                _ => None,
            })
            .flatten()
            .collect())
    }

    pub fn includes(&self) -> ScanResult<Vec<&IncludeRecord>> {
        Ok(self
            .records()?
            .iter()
            .filter_map(|record| match record {
                StructuralRecord::Include(include) => Some(include),
                _ => None,
            })
            .collect())
    }

    fn class_records(&self) -> ScanResult<Vec<&ClassRecord>> {
        Ok(self
            .records()?
            .iter()
            .filter_map(|record| match record {
                StructuralRecord::ClassLike(class) => Some(class),
                _ => None,
            })
            .collect())
    }

    fn function_records(&self) -> ScanResult<Vec<&FunctionRecord>> {
        Ok(self
            .records()?
            .iter()
            .filter_map(|record| match record {
                StructuralRecord::Function(function) => Some(function),
                _ => None,
            })
            .collect())
    }

    pub fn class_names(&self) -> ScanResult<Vec<&str>> {
        Ok(self.class_records()?.into_iter().map(|class| class.name.as_str()).collect())
    }

    pub fn classes(&self) -> ScanResult<Vec<ClassScanner<'_>>> {
        Ok(self
            .class_records()?
            .into_iter()
            .map(|record| self.class_scanner(record))
            .collect())
    }

    /// A class by fully-qualified name (case-insensitive) or by position.
    pub fn class<'k>(&self, key: impl Into<Lookup<'k>>) -> ScanResult<ClassScanner<'_>> {
        let records = self.class_records()?;
        let (_, record) = find(&records, key.into(), "class", |record, name| {
            names_match(&record.name, name)
        })?;
        Ok(self.class_scanner(record))
    }

    pub fn has_class(&self, name: &str) -> ScanResult<bool> {
        Ok(self
            .class_records()?
            .iter()
            .any(|record| names_match(&record.name, name)))
    }

    /// Namespace and imports in effect at a class declaration.
    pub fn class_name_information(&self, name: &str) -> ScanResult<NameInformation> {
        let records = self.class_records()?;
        let (_, record) = find(&records, Lookup::Name(name), "class", |record, name| {
            names_match(&record.name, name)
        })?;
        Ok(NameInformation::new(record.namespace.clone(), record.uses.clone()))
    }

    pub fn function_names(&self) -> ScanResult<Vec<&str>> {
        Ok(self
            .function_records()?
            .into_iter()
            .map(|function| function.name.as_str())
            .collect())
    }

    pub fn functions(&self) -> ScanResult<Vec<MemberScanner<'_>>> {
        Ok(self
            .function_records()?
            .into_iter()
            .map(|record| self.function_scanner(record))
            .collect())
    }

    pub fn function<'k>(&self, key: impl Into<Lookup<'k>>) -> ScanResult<MemberScanner<'_>> {
        let records = self.function_records()?;
        let (_, record) = find(&records, key.into(), "function", |record, name| {
            names_match(&record.name, name)
        })?;
        Ok(self.function_scanner(record))
    }

    pub fn has_function(&self, name: &str) -> ScanResult<bool> {
        Ok(self
            .function_records()?
            .iter()
            .any(|record| names_match(&record.name, name)))
    }

    /// The file-level doc comment: the first token after the open tag and
    /// whitespace, if it is a doc comment.
    pub fn doc_comment(&self) -> ScanResult<Option<&str>> {
        if self.tokens.is_empty() {
            return Err(ScanError::NoTokens);
        }
        for token in self.tokens.iter() {
            match token.kind() {
                Some(TokenKind::OpenTag | TokenKind::Whitespace) => continue,
                Some(TokenKind::DocComment) => return Ok(Some(token.text())),
                _ => return Ok(None),
            }
        }
        Ok(None)
    }

    pub fn doc_block(&self) -> ScanResult<Option<DocBlock>> {
        Ok(self.doc_comment()?.map(DocBlock::parse))
    }

    fn class_scanner(&self, record: &ClassRecord) -> ClassScanner<'_> {
        ClassScanner::with_config(record.token_range.slice(&self.tokens), self.config)
            .with_name_information(NameInformation::new(record.namespace.clone(), record.uses.clone()))
    }

    fn function_scanner(&self, record: &FunctionRecord) -> MemberScanner<'_> {
        MemberScanner::with_config(record.token_range.slice(&self.tokens), self.config)
            .with_name_information(NameInformation::new(record.namespace.clone(), record.uses.clone()))
            .with_offset(record.token_range.start)
    }
}

fn names_match(declared: &str, requested: &str) -> bool {
    declared.eq_ignore_ascii_case(requested.trim_start_matches('\\'))
}

/// Tokens that keep a pending doc comment attachable.
fn attaches_doc_comment(kind: Option<TokenKind>) -> bool {
    matches!(
        kind,
        Some(
            TokenKind::Whitespace
                | TokenKind::Final
                | TokenKind::Abstract
                | TokenKind::Interface
                | TokenKind::Class
                | TokenKind::Trait
                | TokenKind::Function
        )
    )
}

enum State {
    Top,
    Namespace(NamespaceRecord),
    Use(UseState),
    Include(IncludeRecord),
    Body(Declaration),
}

struct UseState {
    record: UseRecord,
    current: String,
    alias: Option<String>,
    alias_context: bool,
    group_prefix: Option<String>,
}

impl UseState {
    fn new(record: UseRecord) -> Self {
        Self {
            record,
            current: String::new(),
            alias: None,
            alias_context: false,
            group_prefix: None,
        }
    }

    fn push_name(&mut self, text: &str) {
        if self.alias_context {
            self.alias = Some(text.to_string());
            return;
        }
        if self.current.is_empty() {
            if let Some(prefix) = &self.group_prefix {
                self.current.push_str(prefix);
            }
        }
        self.current.push_str(text);
    }

    fn flush(&mut self) {
        let import = mem::take(&mut self.current);
        let alias = self.alias.take();
        self.alias_context = false;

        let import = import.trim_start_matches('\\');
        if !import.is_empty() {
            self.record.statements.push(UseStatement {
                import: import.to_string(),
                alias,
            });
        }
    }
}

/// A class-like or function declaration whose closing brace is still ahead.
struct Declaration {
    is_function: bool,
    /// Closures and anonymous classes: braces are tracked, nothing is recorded.
    anonymous: bool,
    kind: Option<ClassKind>,
    short_name: Option<String>,
    is_final: bool,
    is_abstract: bool,
    start: usize,
    line_start: u32,
    depth: usize,
}

struct StructuralScan<'t> {
    cursor: TokenCursor<'t>,
    config: ScanConfig,
    records: Vec<StructuralRecord>,
    namespace: Option<String>,
    doc_comment: Option<usize>,
}

impl<'t> StructuralScan<'t> {
    fn new(tokens: &'t [Token], config: ScanConfig) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            config,
            records: Vec::new(),
            namespace: None,
            doc_comment: None,
        }
    }

    fn run(mut self) -> ScanResult<Vec<StructuralRecord>> {
        debug!(tokens = self.cursor.tokens().len(), "scanning token array");

        let mut state = State::Top;
        while self.cursor.advance() {
            state = match state {
                State::Top => self.top(),
                State::Namespace(record) => self.namespace(record),
                State::Use(use_state) => self.use_statement(use_state),
                State::Include(record) => self.include(record),
                State::Body(declaration) => self.body(declaration),
            };
        }
        self.finish(state)?;

        debug!(records = self.records.len(), "token array scanned");
        Ok(self.records)
    }

    /// First token of a new record: the attached doc comment if there is one.
    fn logical_start(&mut self) -> usize {
        self.doc_comment.take().unwrap_or(self.cursor.start_index())
    }

    fn open_ranges(&mut self) -> (TokenRange, LineRange) {
        let start = self.logical_start();
        let line = self.line_of(start);
        (TokenRange::new(start, start), LineRange::new(line, line))
    }

    /// Line of the token at `index`; raw tokens fall back to the cursor's line.
    fn line_of(&self, index: usize) -> u32 {
        self.cursor
            .tokens()
            .get(index)
            .and_then(Token::line)
            .unwrap_or_else(|| self.cursor.line())
    }

    /// The declared name two tokens after a `class`/`function` keyword,
    /// past a by-reference `&`. `None` for closures and anonymous classes.
    fn declared_name(&self) -> Option<&'t Token> {
        let mut offset = 2;
        let mut token = self.cursor.peek(offset)?;
        if token.is_raw("&") {
            loop {
                offset += 1;
                token = self.cursor.peek(offset)?;
                if !token.is_trivia() {
                    break;
                }
            }
        }
        token.is(TokenKind::Identifier).then_some(token)
    }

    fn close(&self, token_range: &mut TokenRange, line_range: &mut LineRange) {
        token_range.end = self.cursor.index().max(token_range.start);
        line_range.end = self.cursor.line();
    }

    fn top(&mut self) -> State {
        let kind = self.cursor.kind();
        if self.doc_comment.is_some() && !attaches_doc_comment(kind) {
            trace!(index = self.cursor.index(), "doc comment not followed by a declaration; dropped");
            self.doc_comment = None;
        }

        let Some(kind) = kind else {
            return State::Top;
        };

        match kind {
            TokenKind::DocComment => {
                self.doc_comment = Some(self.cursor.index());
                State::Top
            }
            TokenKind::Namespace => {
                let (token_range, line_range) = self.open_ranges();
                State::Namespace(NamespaceRecord {
                    name: None,
                    token_range,
                    line_range,
                })
            }
            TokenKind::Use => {
                let (token_range, line_range) = self.open_ranges();
                State::Use(UseState::new(UseRecord {
                    namespace: self.namespace.clone(),
                    statements: Vec::new(),
                    token_range,
                    line_range,
                }))
            }
            TokenKind::Include => self.open_include(IncludeKind::Include),
            TokenKind::IncludeOnce => self.open_include(IncludeKind::IncludeOnce),
            TokenKind::Require => self.open_include(IncludeKind::Require),
            TokenKind::RequireOnce => self.open_include(IncludeKind::RequireOnce),
            TokenKind::Function
            | TokenKind::Final
            | TokenKind::Abstract
            | TokenKind::Class
            | TokenKind::Interface
            | TokenKind::Trait => {
                let start = self.logical_start();
                let declaration = Declaration {
                    is_function: kind == TokenKind::Function,
                    anonymous: matches!(kind, TokenKind::Function | TokenKind::Class)
                        && self.declared_name().is_none(),
                    kind: None,
                    short_name: None,
                    is_final: false,
                    is_abstract: false,
                    start,
                    line_start: self.line_of(start),
                    depth: 0,
                };
                trace!(start = declaration.start, line = declaration.line_start, "entering declaration body");
                self.body(declaration)
            }
            _ => State::Top,
        }
    }

    fn open_include(&mut self, kind: IncludeKind) -> State {
        let (token_range, line_range) = self.open_ranges();
        State::Include(IncludeRecord {
            kind,
            path: String::new(),
            token_range,
            line_range,
        })
    }

    fn namespace(&mut self, mut record: NamespaceRecord) -> State {
        if self.cursor.is_raw(";") || self.cursor.is_raw("{") {
            self.namespace = record.name.clone();
            self.close(&mut record.token_range, &mut record.line_range);
            self.records.push(StructuralRecord::Namespace(record));
            return State::Top;
        }
        if self.cursor.kind().is_some_and(TokenKind::is_name_part) {
            record
                .name
                .get_or_insert_with(String::new)
                .push_str(self.cursor.text());
        }
        State::Namespace(record)
    }

    fn use_statement(&mut self, mut state: UseState) -> State {
        match self.cursor.kind() {
            Some(TokenKind::As) => state.alias_context = true,
            Some(kind) if kind.is_name_part() => state.push_name(self.cursor.text()),
            Some(_) => {}
            None if self.cursor.is_raw(";") => {
                state.flush();
                let mut record = state.record;
                self.close(&mut record.token_range, &mut record.line_range);
                self.records.push(StructuralRecord::Use(record));
                return State::Top;
            }
            None if self.cursor.is_raw(",") => state.flush(),
            None if self.cursor.is_raw("{") => {
                state.group_prefix = Some(mem::take(&mut state.current));
            }
            None if self.cursor.is_raw("}") => {
                state.flush();
                state.group_prefix = None;
            }
            None => {}
        }
        State::Use(state)
    }

    fn include(&mut self, mut record: IncludeRecord) -> State {
        if self.cursor.is_raw(";") || self.cursor.is(TokenKind::CloseTag) {
            record.path = record.path.trim().to_string();
            self.close(&mut record.token_range, &mut record.line_range);
            self.records.push(StructuralRecord::Include(record));
            return State::Top;
        }
        record.path.push_str(self.cursor.text());
        State::Include(record)
    }

    fn body(&mut self, mut declaration: Declaration) -> State {
        let kind = self.cursor.kind();
        match kind {
            Some(TokenKind::Final) => declaration.is_final = true,
            Some(TokenKind::Abstract) => declaration.is_abstract = true,
            _ => {}
        }

        if declaration.short_name.is_none() {
            let class_kind = kind.and_then(ClassKind::from_token);
            let names_declaration = if declaration.is_function {
                kind == Some(TokenKind::Function)
            } else {
                class_kind.is_some()
            };
            if names_declaration {
                declaration.kind = class_kind;
                // keyword, whitespace, name
                let short_name = self
                    .declared_name()
                    .or_else(|| self.cursor.peek(2))
                    .map(|token| token.text().to_string());
                declaration.short_name = Some(short_name.unwrap_or_default());
            }
        }

        if self.cursor.is_raw("{") {
            declaration.depth += 1;
        } else if self.cursor.is_raw("}") && declaration.depth > 0 {
            declaration.depth -= 1;
            if declaration.depth == 0 {
                self.close_declaration(declaration, false);
                return State::Top;
            }
        }
        State::Body(declaration)
    }

    fn close_declaration(&mut self, declaration: Declaration, truncated: bool) {
        if declaration.anonymous {
            trace!(start = declaration.start, "anonymous function or class skipped");
            return;
        }
        let token_range = TokenRange::new(
            declaration.start,
            self.cursor.index().max(declaration.start),
        );
        let line_range = LineRange::new(declaration.line_start, self.cursor.line());
        let short_name = declaration.short_name.unwrap_or_default();
        let name = match self.namespace.as_deref() {
            Some(namespace) if !namespace.is_empty() => format!("{namespace}\\{short_name}"),
            _ => short_name.clone(),
        };
        let uses = self.uses_in(self.namespace.as_deref());

        let record = if declaration.is_function {
            StructuralRecord::Function(FunctionRecord {
                name,
                short_name,
                namespace: self.namespace.clone(),
                uses,
                token_range,
                line_range,
                truncated,
            })
        } else {
            StructuralRecord::ClassLike(ClassRecord {
                kind: declaration.kind.unwrap_or(ClassKind::Class),
                name,
                short_name,
                namespace: self.namespace.clone(),
                uses,
                is_final: declaration.is_final,
                is_abstract: declaration.is_abstract,
                token_range,
                line_range,
                truncated,
            })
        };
        self.records.push(record);
    }

    fn uses_in(&self, namespace: Option<&str>) -> Vec<UseStatement> {
        self.records
            .iter()
            .filter_map(|record| match record {
                StructuralRecord::Use(use_record) if use_record.namespace.as_deref() == namespace => {
                    Some(use_record.statements.iter().cloned())
                }
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Close whatever record the stream ended inside of.
    fn finish(&mut self, state: State) -> ScanResult<()> {
        match state {
            State::Top => {}
            State::Namespace(mut record) => {
                unbalanced(&self.config, ';', "namespace declaration", record.line_range.start)?;
                self.namespace = record.name.clone();
                self.close(&mut record.token_range, &mut record.line_range);
                self.records.push(StructuralRecord::Namespace(record));
            }
            State::Use(mut state) => {
                unbalanced(&self.config, ';', "use statement", state.record.line_range.start)?;
                state.flush();
                let mut record = state.record;
                self.close(&mut record.token_range, &mut record.line_range);
                self.records.push(StructuralRecord::Use(record));
            }
            State::Include(mut record) => {
                unbalanced(&self.config, ';', "include", record.line_range.start)?;
                record.path = record.path.trim().to_string();
                self.close(&mut record.token_range, &mut record.line_range);
                self.records.push(StructuralRecord::Include(record));
            }
            State::Body(declaration) => {
                let context = if declaration.is_function { "function" } else { "class" };
                unbalanced(&self.config, '}', context, declaration.line_start)?;
                self.close_declaration(declaration, true);
            }
        }
        Ok(())
    }
}
