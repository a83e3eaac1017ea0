//! Scanner for a single class, interface or trait declaration.

use std::cell::OnceCell;
use std::mem;

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::ScanConfig;
use crate::lexer::token::{Token, TokenKind};
use crate::span::{LineRange, TokenRange};

use super::constant::ConstantScanner;
use super::cursor::TokenCursor;
use super::doc_block::DocBlock;
use super::member::MemberScanner;
use super::name_information::NameInformation;
use super::property::PropertyScanner;
use super::record::{ClassKind, Visibility};
use super::{Lookup, ScanError, ScanResult, find, unbalanced};

/// Header-level facts about a class-like declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassInfo {
    pub kind: ClassKind,
    /// Namespace-qualified name.
    pub name: String,
    pub short_name: String,
    pub namespace: Option<String>,
    pub doc_comment: Option<String>,
    pub is_final: bool,
    pub is_abstract: bool,
    /// Resolved parent class. Interfaces report their parents in `interfaces`.
    pub parent_class: Option<String>,
    pub interfaces: Vec<String>,
    pub trait_uses: Vec<TraitUse>,
    pub line_range: LineRange,
    pub truncated: bool,
}

/// One `use A, B { ... }` statement inside a class body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraitUse {
    pub traits: Vec<String>,
    pub aliases: Vec<TraitAlias>,
    pub precedences: Vec<TraitPrecedence>,
}

/// `[Trait::]method as [visibility] [alias];`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraitAlias {
    pub trait_name: Option<String>,
    pub method: String,
    pub alias: Option<String>,
    pub visibility: Option<Visibility>,
}

/// `Trait::method insteadof Other, ...;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraitPrecedence {
    pub trait_name: String,
    pub method: String,
    pub instead_of: Vec<String>,
}

/// A named sub-range of the class body.
#[derive(Debug, Clone)]
struct MemberSlot {
    name: String,
    /// Modifiers, type and doc comment shared by every item of a declaration.
    prefix: Option<TokenRange>,
    range: TokenRange,
}

#[derive(Debug, Clone)]
struct ClassScan {
    info: ClassInfo,
    constants: Vec<MemberSlot>,
    properties: Vec<MemberSlot>,
    methods: Vec<MemberSlot>,
}

pub struct ClassScanner<'t> {
    tokens: &'t [Token],
    config: ScanConfig,
    name_information: NameInformation,
    scanned: OnceCell<ScanResult<ClassScan>>,
}

impl<'t> ClassScanner<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self::with_config(tokens, ScanConfig::default())
    }

    pub fn with_config(tokens: &'t [Token], config: ScanConfig) -> Self {
        Self {
            tokens,
            config,
            name_information: NameInformation::default(),
            scanned: OnceCell::new(),
        }
    }

    pub fn with_name_information(mut self, name_information: NameInformation) -> Self {
        self.name_information = name_information;
        self
    }

    pub fn tokens(&self) -> &'t [Token] {
        self.tokens
    }

    pub fn name_information(&self) -> &NameInformation {
        &self.name_information
    }

    fn scan(&self) -> ScanResult<&ClassScan> {
        if self.tokens.is_empty() {
            return Err(ScanError::NoTokens);
        }
        self.scanned
            .get_or_init(|| ClassWalk::new(self.tokens, self.config, &self.name_information).run())
            .as_ref()
            .map_err(ScanError::clone)
    }

    pub fn info(&self) -> ScanResult<&ClassInfo> {
        Ok(&self.scan()?.info)
    }

    pub fn name(&self) -> ScanResult<&str> {
        Ok(&self.info()?.name)
    }

    pub fn short_name(&self) -> ScanResult<&str> {
        Ok(&self.info()?.short_name)
    }

    pub fn namespace(&self) -> ScanResult<Option<&str>> {
        Ok(self.info()?.namespace.as_deref())
    }

    pub fn kind(&self) -> ScanResult<ClassKind> {
        Ok(self.info()?.kind)
    }

    pub fn is_final(&self) -> ScanResult<bool> {
        Ok(self.info()?.is_final)
    }

    pub fn is_abstract(&self) -> ScanResult<bool> {
        Ok(self.info()?.is_abstract)
    }

    pub fn is_interface(&self) -> ScanResult<bool> {
        Ok(self.info()?.kind == ClassKind::Interface)
    }

    pub fn is_trait(&self) -> ScanResult<bool> {
        Ok(self.info()?.kind == ClassKind::Trait)
    }

    /// A concrete class: neither abstract, an interface nor a trait.
    pub fn is_instantiable(&self) -> ScanResult<bool> {
        let info = self.info()?;
        Ok(info.kind == ClassKind::Class && !info.is_abstract)
    }

    pub fn doc_comment(&self) -> ScanResult<Option<&str>> {
        Ok(self.info()?.doc_comment.as_deref())
    }

    pub fn doc_block(&self) -> ScanResult<Option<DocBlock>> {
        Ok(self.doc_comment()?.map(DocBlock::parse))
    }

    pub fn parent_class(&self) -> ScanResult<Option<&str>> {
        Ok(self.info()?.parent_class.as_deref())
    }

    pub fn has_parent_class(&self) -> ScanResult<bool> {
        Ok(self.info()?.parent_class.is_some())
    }

    pub fn interfaces(&self) -> ScanResult<&[String]> {
        Ok(&self.info()?.interfaces)
    }

    /// Every trait pulled in by the class, across all `use` statements.
    pub fn traits(&self) -> ScanResult<Vec<&str>> {
        Ok(self
            .info()?
            .trait_uses
            .iter()
            .flat_map(|trait_use| trait_use.traits.iter().map(String::as_str))
            .collect())
    }

    pub fn trait_uses(&self) -> ScanResult<&[TraitUse]> {
        Ok(&self.info()?.trait_uses)
    }

    pub fn line_range(&self) -> ScanResult<LineRange> {
        Ok(self.info()?.line_range)
    }

    pub fn constant_names(&self) -> ScanResult<Vec<&str>> {
        Ok(self.scan()?.constants.iter().map(|slot| slot.name.as_str()).collect())
    }

    pub fn constants(&self) -> ScanResult<Vec<ConstantScanner<'t>>> {
        Ok(self
            .scan()?
            .constants
            .iter()
            .map(|slot| self.constant_scanner(slot))
            .collect())
    }

    pub fn constant<'k>(&self, key: impl Into<Lookup<'k>>) -> ScanResult<ConstantScanner<'t>> {
        let (_, slot) = find(&self.scan()?.constants, key.into(), "constant", |slot, name| {
            slot.name == name
        })?;
        Ok(self.constant_scanner(slot))
    }

    pub fn has_constant(&self, name: &str) -> ScanResult<bool> {
        Ok(self.scan()?.constants.iter().any(|slot| slot.name == name))
    }

    /// Property names without the leading `$`.
    pub fn property_names(&self) -> ScanResult<Vec<&str>> {
        Ok(self.scan()?.properties.iter().map(|slot| slot.name.as_str()).collect())
    }

    pub fn properties(&self) -> ScanResult<Vec<PropertyScanner<'t>>> {
        Ok(self
            .scan()?
            .properties
            .iter()
            .map(|slot| self.property_scanner(slot))
            .collect())
    }

    pub fn property<'k>(&self, key: impl Into<Lookup<'k>>) -> ScanResult<PropertyScanner<'t>> {
        let (_, slot) = find(&self.scan()?.properties, key.into(), "property", |slot, name| {
            slot.name == name.trim_start_matches('$')
        })?;
        Ok(self.property_scanner(slot))
    }

    pub fn has_property(&self, name: &str) -> ScanResult<bool> {
        let name = name.trim_start_matches('$');
        Ok(self.scan()?.properties.iter().any(|slot| slot.name == name))
    }

    pub fn method_names(&self) -> ScanResult<Vec<&str>> {
        Ok(self.scan()?.methods.iter().map(|slot| slot.name.as_str()).collect())
    }

    pub fn methods(&self) -> ScanResult<Vec<MemberScanner<'t>>> {
        Ok(self
            .scan()?
            .methods
            .iter()
            .map(|slot| self.method_scanner(slot))
            .collect())
    }

    /// A method by name (case-insensitive, as PHP resolves them) or position.
    pub fn method<'k>(&self, key: impl Into<Lookup<'k>>) -> ScanResult<MemberScanner<'t>> {
        let (_, slot) = find(&self.scan()?.methods, key.into(), "method", |slot, name| {
            slot.name.eq_ignore_ascii_case(name)
        })?;
        Ok(self.method_scanner(slot))
    }

    pub fn has_method(&self, name: &str) -> ScanResult<bool> {
        Ok(self
            .scan()?
            .methods
            .iter()
            .any(|slot| slot.name.eq_ignore_ascii_case(name)))
    }

    fn prefix(&self, slot: &MemberSlot) -> &'t [Token] {
        slot.prefix.map_or(&[][..], |prefix| prefix.slice(self.tokens))
    }

    fn constant_scanner(&self, slot: &MemberSlot) -> ConstantScanner<'t> {
        ConstantScanner::new(self.prefix(slot), slot.range.slice(self.tokens))
    }

    fn property_scanner(&self, slot: &MemberSlot) -> PropertyScanner<'t> {
        PropertyScanner::with_config(self.prefix(slot), slot.range.slice(self.tokens), self.config)
            .with_name_information(self.name_information.clone())
    }

    fn method_scanner(&self, slot: &MemberSlot) -> MemberScanner<'t> {
        MemberScanner::with_config(slot.range.slice(self.tokens), self.config)
            .with_name_information(self.name_information.clone())
            .with_offset(slot.range.start)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderContext {
    Declaration,
    Extends,
    Implements,
}

#[derive(Default)]
struct TraitUseState {
    trait_use: TraitUse,
    current: String,
    in_block: bool,
    rule: Vec<(Option<TokenKind>, String)>,
}

/// A constant or property declaration; items are split on top-level commas.
struct ItemState {
    prefix: Option<TokenRange>,
    item_start: Option<usize>,
    paren: usize,
    bracket: usize,
    brace: usize,
}

impl ItemState {
    fn new(prefix: Option<TokenRange>) -> Self {
        Self {
            prefix,
            item_start: None,
            paren: 0,
            bracket: 0,
            brace: 0,
        }
    }

    fn is_top_level(&self) -> bool {
        self.paren == 0 && self.bracket == 0 && self.brace == 0
    }

    fn track(&mut self, text: &str) {
        match text {
            "(" => self.paren += 1,
            ")" => self.paren = self.paren.saturating_sub(1),
            "[" => self.bracket += 1,
            "]" => self.bracket = self.bracket.saturating_sub(1),
            "{" => self.brace += 1,
            _ => {}
        }
    }
}

struct MethodState {
    start: usize,
    name: Option<String>,
    paren: usize,
    brace: usize,
}

enum ClassState {
    Header(HeaderContext),
    Body,
    TraitUse(TraitUseState),
    Constant(ItemState),
    Property(ItemState),
    Method(MethodState),
    Done,
}

struct ClassWalk<'t, 'n> {
    cursor: TokenCursor<'t>,
    config: ScanConfig,
    name_information: &'n NameInformation,

    kind: Option<ClassKind>,
    short_name: String,
    doc_comment: Option<String>,
    is_final: bool,
    is_abstract: bool,
    parent_class: Option<String>,
    interfaces: Vec<String>,
    trait_uses: Vec<TraitUse>,
    current_name: String,
    line_start: u32,
    line_end: u32,

    depth: usize,
    member_start: Option<usize>,
    constants: Vec<MemberSlot>,
    properties: Vec<MemberSlot>,
    methods: Vec<MemberSlot>,
}

impl<'t, 'n> ClassWalk<'t, 'n> {
    fn new(tokens: &'t [Token], config: ScanConfig, name_information: &'n NameInformation) -> Self {
        let cursor = TokenCursor::new(tokens);
        let line = cursor.line();
        Self {
            cursor,
            config,
            name_information,
            kind: None,
            short_name: String::new(),
            doc_comment: None,
            is_final: false,
            is_abstract: false,
            parent_class: None,
            interfaces: Vec::new(),
            trait_uses: Vec::new(),
            current_name: String::new(),
            line_start: line,
            line_end: line,
            depth: 0,
            member_start: None,
            constants: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    fn run(mut self) -> ScanResult<ClassScan> {
        let mut state = ClassState::Header(HeaderContext::Declaration);
        while !matches!(state, ClassState::Done) && self.cursor.advance() {
            state = match state {
                ClassState::Header(context) => self.header(context),
                ClassState::Body => self.body(),
                ClassState::TraitUse(trait_use) => self.trait_use(trait_use),
                ClassState::Constant(item) => self.constant(item),
                ClassState::Property(item) => self.property(item),
                ClassState::Method(method) => self.method(method),
                ClassState::Done => ClassState::Done,
            };
        }

        let truncated = !matches!(state, ClassState::Done);
        if truncated {
            unbalanced(&self.config, '}', "class", self.line_start)?;
            self.line_end = self.cursor.line();
        }

        let namespace = self.name_information.namespace().map(str::to_string);
        let name = match namespace.as_deref() {
            Some(namespace) if !namespace.is_empty() => format!("{namespace}\\{}", self.short_name),
            _ => self.short_name.clone(),
        };
        debug!(
            class = %name,
            methods = self.methods.len(),
            properties = self.properties.len(),
            constants = self.constants.len(),
            "class scanned"
        );

        Ok(ClassScan {
            info: ClassInfo {
                kind: self.kind.unwrap_or(ClassKind::Class),
                name,
                short_name: self.short_name,
                namespace,
                doc_comment: self.doc_comment,
                is_final: self.is_final,
                is_abstract: self.is_abstract,
                parent_class: self.parent_class,
                interfaces: self.interfaces,
                trait_uses: self.trait_uses,
                line_range: LineRange::new(self.line_start, self.line_end),
                truncated,
            },
            constants: self.constants,
            properties: self.properties,
            methods: self.methods,
        })
    }

    fn header(&mut self, mut context: HeaderContext) -> ClassState {
        let Some(kind) = self.cursor.kind() else {
            if self.cursor.is_raw(",") {
                self.flush_header_name(context);
            } else if self.cursor.is_raw("{") {
                self.flush_header_name(context);
                self.depth = 1;
                return ClassState::Body;
            }
            return ClassState::Header(context);
        };

        match kind {
            TokenKind::DocComment if self.kind.is_none() => {
                self.doc_comment = Some(self.cursor.text().to_string());
            }
            TokenKind::Final => self.is_final = true,
            TokenKind::Abstract => self.is_abstract = true,
            TokenKind::Class | TokenKind::Interface | TokenKind::Trait if self.kind.is_none() => {
                self.kind = ClassKind::from_token(kind);
                self.line_start = self.cursor.line();
                self.short_name = self
                    .cursor
                    .peek_significant()
                    .map(|token| token.text().to_string())
                    .unwrap_or_default();
            }
            TokenKind::Extends => {
                self.flush_header_name(context);
                context = HeaderContext::Extends;
            }
            TokenKind::Implements => {
                self.flush_header_name(context);
                context = HeaderContext::Implements;
            }
            kind if kind.is_name_part() && context != HeaderContext::Declaration => {
                self.current_name.push_str(self.cursor.text());
            }
            _ => {}
        }
        ClassState::Header(context)
    }

    fn flush_header_name(&mut self, context: HeaderContext) {
        let name = mem::take(&mut self.current_name);
        if name.is_empty() {
            return;
        }
        let resolved = self.name_information.resolve_name(&name);
        match context {
            HeaderContext::Extends if self.kind == Some(ClassKind::Interface) => {
                self.interfaces.push(resolved);
            }
            HeaderContext::Extends => self.parent_class = Some(resolved),
            HeaderContext::Implements => self.interfaces.push(resolved),
            HeaderContext::Declaration => {}
        }
    }

    fn body(&mut self) -> ClassState {
        let index = self.cursor.index();
        let Some(kind) = self.cursor.kind() else {
            if self.cursor.is_raw("{") {
                self.depth += 1;
            } else if self.cursor.is_raw("}") {
                self.depth = self.depth.saturating_sub(1);
                if self.depth == 0 {
                    self.line_end = self.cursor.line();
                    return ClassState::Done;
                }
            } else if self.cursor.is_raw("?") || self.cursor.is_raw("|") {
                self.member_start.get_or_insert(index);
            } else if self.cursor.is_raw(";") {
                self.member_start = None;
            }
            return ClassState::Body;
        };

        match kind {
            TokenKind::Whitespace | TokenKind::Comment => ClassState::Body,
            TokenKind::Use => {
                self.member_start = None;
                ClassState::TraitUse(TraitUseState::default())
            }
            TokenKind::Const => {
                let start = self.member_start.take().unwrap_or(index);
                ClassState::Constant(ItemState::new(Some(TokenRange::new(start, index))))
            }
            TokenKind::Variable => {
                let prefix = self
                    .member_start
                    .take()
                    .map(|start| TokenRange::new(start, index - 1));
                let mut item = ItemState::new(prefix);
                item.item_start = Some(index);
                ClassState::Property(item)
            }
            TokenKind::Function => ClassState::Method(MethodState {
                start: self.member_start.take().unwrap_or(index),
                name: None,
                paren: 0,
                brace: 0,
            }),
            kind => {
                if kind == TokenKind::DocComment
                    || kind == TokenKind::Attribute
                    || kind.is_modifier()
                    || kind.is_type()
                {
                    self.member_start.get_or_insert(index);
                }
                ClassState::Body
            }
        }
    }

    fn trait_use(&mut self, mut state: TraitUseState) -> ClassState {
        if state.in_block {
            if self.cursor.is_raw("}") {
                self.finish_rule(&mut state);
                self.trait_uses.push(state.trait_use);
                return ClassState::Body;
            }
            if self.cursor.is_raw(";") {
                self.finish_rule(&mut state);
            } else if !self.cursor.is_trivia() {
                state
                    .rule
                    .push((self.cursor.kind(), self.cursor.text().to_string()));
            }
            return ClassState::TraitUse(state);
        }

        if self.cursor.kind().is_some_and(TokenKind::is_name_part) {
            state.current.push_str(self.cursor.text());
        } else if self.cursor.is_raw(",") {
            self.flush_trait(&mut state);
        } else if self.cursor.is_raw("{") {
            self.flush_trait(&mut state);
            state.in_block = true;
        } else if self.cursor.is_raw(";") {
            self.flush_trait(&mut state);
            self.trait_uses.push(state.trait_use);
            return ClassState::Body;
        }
        ClassState::TraitUse(state)
    }

    fn flush_trait(&self, state: &mut TraitUseState) {
        let name = mem::take(&mut state.current);
        if !name.is_empty() {
            state.trait_use.traits.push(self.name_information.resolve_name(&name));
        }
    }

    /// Parse one `... as ...;` or `... insteadof ...;` rule of a trait block.
    fn finish_rule(&self, state: &mut TraitUseState) {
        let rule = mem::take(&mut state.rule);
        let Some(split) = rule
            .iter()
            .position(|(kind, _)| matches!(kind, Some(TokenKind::As | TokenKind::Insteadof)))
        else {
            return;
        };
        let (target, rest) = rule.split_at(split);
        let target: String = target.iter().map(|(_, text)| text.as_str()).collect();
        let (trait_name, method) = match target.split_once("::") {
            Some((trait_name, method)) => (
                Some(self.name_information.resolve_name(trait_name)),
                method.to_string(),
            ),
            None => (None, target),
        };

        if rest[0].0 == Some(TokenKind::As) {
            let mut visibility = None;
            let mut alias = None;
            for (kind, text) in &rest[1..] {
                match kind.and_then(Visibility::from_token) {
                    Some(found) => visibility = Some(found),
                    None => alias = Some(text.clone()),
                }
            }
            trace!(%method, ?alias, "trait alias");
            state.trait_use.aliases.push(TraitAlias {
                trait_name,
                method,
                alias,
                visibility,
            });
            return;
        }

        let mut instead_of = Vec::new();
        let mut current = String::new();
        for (kind, text) in &rest[1..] {
            if kind.is_some_and(TokenKind::is_name_part) {
                current.push_str(text);
            } else if kind.is_none() && text == "," && !current.is_empty() {
                instead_of.push(self.name_information.resolve_name(&mem::take(&mut current)));
            }
        }
        if !current.is_empty() {
            instead_of.push(self.name_information.resolve_name(&current));
        }
        if let Some(trait_name) = trait_name {
            state.trait_use.precedences.push(TraitPrecedence {
                trait_name,
                method,
                instead_of,
            });
        }
    }

    fn constant(&mut self, mut state: ItemState) -> ClassState {
        let index = self.cursor.index();
        if self.cursor.kind().is_none() {
            let text = self.cursor.text();
            state.track(text);
            if text == "}" {
                state.brace = state.brace.saturating_sub(1);
            }
            let ends = self.cursor.is_raw(";");
            if state.is_top_level() && (ends || self.cursor.is_raw(",")) {
                if let Some(start) = state.item_start.take() {
                    let range = TokenRange::new(start, index - 1);
                    self.constants.push(MemberSlot {
                        name: constant_name(range.slice(self.cursor.tokens())),
                        prefix: state.prefix,
                        range,
                    });
                }
                return if ends { ClassState::Body } else { ClassState::Constant(state) };
            }
        }
        if state.item_start.is_none() && !self.cursor.is_trivia() {
            state.item_start = Some(self.cursor.start_index());
        }
        ClassState::Constant(state)
    }

    fn property(&mut self, mut state: ItemState) -> ClassState {
        let index = self.cursor.index();
        if self.cursor.kind().is_none() {
            if self.cursor.is_raw("}") {
                if state.brace == 0 {
                    // Declaration never terminated; the brace belongs to the class.
                    self.close_property(&mut state, index - 1);
                    return self.body();
                }
                state.brace -= 1;
                if state.is_top_level() {
                    // Property hooks end the declaration without a `;`.
                    self.close_property(&mut state, index);
                    return ClassState::Body;
                }
                return ClassState::Property(state);
            }
            state.track(self.cursor.text());
            let ends = self.cursor.is_raw(";");
            if state.is_top_level() && (ends || self.cursor.is_raw(",")) {
                self.close_property(&mut state, index - 1);
                return if ends { ClassState::Body } else { ClassState::Property(state) };
            }
        }
        if state.item_start.is_none() && self.cursor.is(TokenKind::Variable) {
            state.item_start = Some(index);
        }
        ClassState::Property(state)
    }

    fn close_property(&mut self, state: &mut ItemState, end: usize) {
        let Some(start) = state.item_start.take() else {
            return;
        };
        let range = TokenRange::new(start, end.max(start));
        let name = self.cursor.tokens()[start].text().trim_start_matches('$').to_string();
        self.properties.push(MemberSlot {
            name,
            prefix: state.prefix,
            range,
        });
    }

    fn method(&mut self, mut state: MethodState) -> ClassState {
        let index = self.cursor.index();
        if state.name.is_none() && !self.cursor.is_trivia() && !self.cursor.is_raw("&") {
            state.name = Some(self.cursor.text().to_string());
        }

        if self.cursor.kind().is_some() {
            return ClassState::Method(state);
        }

        if self.cursor.is_raw("(") {
            state.paren += 1;
        } else if self.cursor.is_raw(")") {
            state.paren = state.paren.saturating_sub(1);
        } else if self.cursor.is_raw("{") {
            state.brace += 1;
        } else if self.cursor.is_raw("}") {
            if state.brace == 0 {
                self.close_method(state, index - 1);
                return self.body();
            }
            state.brace -= 1;
            if state.brace == 0 {
                self.close_method(state, index);
                return ClassState::Body;
            }
        } else if self.cursor.is_raw(";") && state.brace == 0 && state.paren == 0 {
            self.close_method(state, index);
            return ClassState::Body;
        }
        ClassState::Method(state)
    }

    fn close_method(&mut self, state: MethodState, end: usize) {
        let name = state.name.unwrap_or_default();
        trace!(method = %name, start = state.start, end, "method found");
        self.methods.push(MemberSlot {
            name,
            prefix: None,
            range: TokenRange::new(state.start, end.max(state.start)),
        });
    }
}

/// The constant's name: the last significant token before `=`.
fn constant_name(tokens: &[Token]) -> String {
    tokens
        .iter()
        .take_while(|token| !token.is_raw("="))
        .filter(|token| !token.is_trivia())
        .last()
        .map(|token| token.text().to_string())
        .unwrap_or_default()
}
