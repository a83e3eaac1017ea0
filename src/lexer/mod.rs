pub mod token;

use memchr::memchr_iter;
use token::{Token, TokenKind};
use crate::span::Span;

/// A lexeme before its text and line are attached. `kind` is `None` for
/// single-character punctuation, which the token stream leaves unclassified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: Option<TokenKind>,
    pub span: Span,
}

impl Lexeme {
    fn new(kind: Option<TokenKind>, start: usize, end: usize) -> Self {
        Self { kind, span: Span::new(start, end) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LexerMode {
    Standard,
    /// After `->`, `?->`, `::` and `\` the next word is a name, never a keyword.
    LookingForName,
}

#[derive(Debug, Clone, PartialEq)]
enum LexerState {
    Initial,
    Scripting,
    Quoted(u8),
    Heredoc(Vec<u8>),
}

pub struct Lexer<'src> {
    input: &'src [u8],
    cursor: usize,
    state_stack: Vec<LexerState>,
    mode: LexerMode,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src [u8]) -> Self {
        Self {
            input,
            cursor: 0,
            state_stack: vec![LexerState::Initial],
            mode: LexerMode::Standard,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.cursor).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.cursor + offset).copied()
    }

    fn advance(&mut self) {
        self.cursor += 1;
    }

    fn advance_n(&mut self, n: usize) {
        self.cursor = (self.cursor + n).min(self.input.len());
    }

    fn eat(&mut self, c: u8) -> bool {
        if self.peek() == Some(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn replace_state(&mut self, state: LexerState) {
        self.state_stack.pop();
        self.state_stack.push(state);
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.advance();
        }
    }

    fn read_identifier(&mut self) {
        while let Some(c) = self.peek() {
            if is_ident_char(c) {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> TokenKind {
        if self.peek() == Some(b'0') {
            if let Some(radix @ (b'x' | b'X' | b'b' | b'B' | b'o' | b'O')) = self.peek_at(1) {
                self.advance_n(2);
                while self.peek().is_some_and(|c| c == b'_' || is_radix_digit(radix, c)) {
                    self.advance();
                }
                return TokenKind::LNumber;
            }
        }

        let mut is_float = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == b'_' {
                self.advance();
            } else if c == b'.' && !is_float {
                is_float = true;
                self.advance();
            } else if c == b'e' || c == b'E' {
                is_float = true;
                self.advance();
                if matches!(self.peek(), Some(b'+' | b'-')) {
                    self.advance();
                }
            } else {
                break;
            }
        }

        if is_float { TokenKind::DNumber } else { TokenKind::LNumber }
    }

    fn consume_single_line_comment(&mut self) -> TokenKind {
        while let Some(c) = self.peek() {
            if c == b'\n' || c == b'\r' {
                break;
            }
            // The closing tag ends the comment.
            if c == b'?' && self.peek_at(1) == Some(b'>') {
                break;
            }
            self.advance();
        }
        TokenKind::Comment
    }

    fn consume_multi_line_comment(&mut self) -> TokenKind {
        let is_doc = self.peek() == Some(b'*') && self.peek_at(1) != Some(b'/');
        if is_doc {
            self.advance();
        }

        while let Some(c) = self.peek() {
            self.advance();
            if c == b'*' && self.eat(b'/') {
                return if is_doc { TokenKind::DocComment } else { TokenKind::Comment };
            }
        }

        // Unterminated comments run to the end of input.
        TokenKind::Comment
    }

    fn read_single_quoted(&mut self) -> TokenKind {
        while let Some(c) = self.peek() {
            self.advance();
            if c == b'\'' {
                break;
            }
            if c == b'\\' && self.peek().is_some() {
                self.advance();
            }
        }
        TokenKind::StringLiteral
    }

    /// Reads a `"` or `` ` `` string. Strings without interpolation become a
    /// single literal; interpolated ones rewind to just after the opening quote
    /// and return `None` so the quote is emitted on its own.
    fn read_double_quoted(&mut self, quote: u8, start: usize) -> Option<TokenKind> {
        while let Some(c) = self.peek() {
            if c == quote {
                self.advance();
                return Some(TokenKind::StringLiteral);
            }
            if c == b'\\' {
                self.advance();
                if self.peek().is_some() {
                    self.advance();
                }
                continue;
            }
            if self.starts_interpolation() {
                self.cursor = start + 1;
                self.state_stack.push(LexerState::Quoted(quote));
                return None;
            }
            self.advance();
        }
        Some(TokenKind::StringLiteral)
    }

    fn starts_interpolation(&self) -> bool {
        match (self.peek(), self.peek_at(1)) {
            (Some(b'$'), Some(next)) => is_ident_start(next) || next == b'{',
            (Some(b'{'), Some(b'$')) => true,
            _ => false,
        }
    }

    fn next_in_quotes(&mut self, quote: u8) -> Lexeme {
        let start = self.cursor;
        let c = self.input[start];

        if c == quote {
            self.advance();
            self.state_stack.pop();
            return Lexeme::new(None, start, self.cursor);
        }

        if c == b'$' {
            match self.peek_at(1) {
                Some(next) if is_ident_start(next) => {
                    self.advance();
                    self.read_identifier();
                    return Lexeme::new(Some(TokenKind::Variable), start, self.cursor);
                }
                Some(b'{') => {
                    self.advance_n(2);
                    self.state_stack.push(LexerState::Scripting);
                    return Lexeme::new(Some(TokenKind::DollarOpenCurlyBraces), start, self.cursor);
                }
                _ => {}
            }
        }

        if c == b'{' && self.peek_at(1) == Some(b'$') {
            // Only the brace; the variable is lexed in scripting state.
            self.advance();
            self.state_stack.push(LexerState::Scripting);
            return Lexeme::new(Some(TokenKind::CurlyOpen), start, self.cursor);
        }

        while let Some(c) = self.peek() {
            if c == quote || self.starts_interpolation() {
                break;
            }
            self.advance();
            if c == b'\\' && self.peek().is_some() {
                self.advance();
            }
        }
        Lexeme::new(Some(TokenKind::EncapsedAndWhitespace), start, self.cursor)
    }

    fn read_heredoc_start(&mut self) -> TokenKind {
        self.skip_blanks();

        let quote = match self.peek() {
            Some(q @ (b'\'' | b'"')) => {
                self.advance();
                Some(q)
            }
            _ => None,
        };

        let label_start = self.cursor;
        self.read_identifier();
        let label = self.input[label_start..self.cursor].to_vec();

        if let Some(q) = quote {
            self.eat(q);
        }
        if self.eat(b'\r') {
            self.eat(b'\n');
        } else {
            self.eat(b'\n');
        }

        self.state_stack.push(LexerState::Heredoc(label));
        TokenKind::StartHeredoc
    }

    /// Length from the cursor through the closing label, if the cursor sits
    /// at the start of the closing line.
    fn heredoc_end_len(&self, label: &[u8]) -> Option<usize> {
        let mut current = self.cursor;
        while matches!(self.input.get(current), Some(b' ' | b'\t')) {
            current += 1;
        }

        let after = current + label.len();
        if self.input.get(current..after) != Some(label) {
            return None;
        }
        match self.input.get(after) {
            Some(&c) if is_ident_char(c) => None,
            _ => Some(after - self.cursor),
        }
    }

    fn next_in_heredoc(&mut self, label: &[u8]) -> Lexeme {
        let start = self.cursor;

        if let Some(len) = self.heredoc_end_len(label) {
            self.advance_n(len);
            self.state_stack.pop();
            return Lexeme::new(Some(TokenKind::EndHeredoc), start, self.cursor);
        }

        while let Some(c) = self.peek() {
            self.advance();
            if c == b'\n' && self.heredoc_end_len(label).is_some() {
                break;
            }
        }
        Lexeme::new(Some(TokenKind::EncapsedAndWhitespace), start, self.cursor)
    }

    fn next_inline_html(&mut self) -> Lexeme {
        let start = self.cursor;
        while self.cursor < self.input.len() {
            let rest = &self.input[self.cursor..];
            let tag = if rest.starts_with(b"<?php") {
                Some((5, TokenKind::OpenTag))
            } else if rest.starts_with(b"<?=") {
                Some((3, TokenKind::OpenTagEcho))
            } else {
                None
            };

            if let Some((len, kind)) = tag {
                if self.cursor > start {
                    return Lexeme::new(Some(TokenKind::InlineHtml), start, self.cursor);
                }
                self.advance_n(len);
                // `<?php` owns one trailing newline or blank.
                if kind == TokenKind::OpenTag {
                    if self.eat(b'\r') {
                        self.eat(b'\n');
                    } else if self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
                        self.advance();
                    }
                }
                self.replace_state(LexerState::Scripting);
                return Lexeme::new(Some(kind), start, self.cursor);
            }
            self.advance();
        }
        Lexeme::new(Some(TokenKind::InlineHtml), start, self.cursor)
    }

    fn read_cast(&mut self) -> Option<TokenKind> {
        let saved = self.cursor;
        self.skip_blanks();
        let ident_start = self.cursor;
        self.read_identifier();
        let ident = self.input[ident_start..self.cursor].to_ascii_lowercase();
        self.skip_blanks();

        let cast = match ident.as_slice() {
            b"int" | b"integer" => Some(TokenKind::IntCast),
            b"bool" | b"boolean" => Some(TokenKind::BoolCast),
            b"float" | b"double" | b"real" => Some(TokenKind::FloatCast),
            b"string" | b"binary" => Some(TokenKind::StringCast),
            b"array" => Some(TokenKind::ArrayCast),
            b"object" => Some(TokenKind::ObjectCast),
            b"unset" => Some(TokenKind::UnsetCast),
            _ => None,
        };

        if cast.is_some() && self.eat(b')') {
            return cast;
        }
        self.cursor = saved;
        None
    }

    fn read_word(&mut self, start: usize, looking_for_name: bool) -> TokenKind {
        self.read_identifier();
        if looking_for_name {
            return TokenKind::Identifier;
        }

        match keyword(&self.input[start..self.cursor]) {
            Some(TokenKind::Yield) => {
                let rest = &self.input[self.cursor..];
                let blanks = rest.iter().take_while(|c| c.is_ascii_whitespace()).count();
                let is_from = blanks > 0
                    && rest.get(blanks..blanks + 4).is_some_and(|w| w.eq_ignore_ascii_case(b"from"))
                    && !rest.get(blanks + 4).is_some_and(|c| is_ident_char(*c));
                if is_from {
                    self.advance_n(blanks + 4);
                    TokenKind::YieldFrom
                } else {
                    TokenKind::Yield
                }
            }
            Some(kind) => kind,
            None => TokenKind::Identifier,
        }
    }

    fn next_in_scripting(&mut self) -> Lexeme {
        let start = self.cursor;
        let c = self.input[start];

        if c.is_ascii_whitespace() {
            self.skip_whitespace();
            return Lexeme::new(Some(TokenKind::Whitespace), start, self.cursor);
        }

        self.advance();
        let looking_for_name = self.mode == LexerMode::LookingForName;
        self.mode = LexerMode::Standard;

        let kind = match c {
            b'$' => {
                if self.peek().is_some_and(is_ident_start) {
                    self.read_identifier();
                    Some(TokenKind::Variable)
                } else {
                    None
                }
            }
            b'\\' => {
                self.mode = LexerMode::LookingForName;
                Some(TokenKind::NsSeparator)
            }
            b'\'' => Some(self.read_single_quoted()),
            b'"' | b'`' => self.read_double_quoted(c, start),
            b'#' => {
                if self.eat(b'[') {
                    Some(TokenKind::Attribute)
                } else {
                    Some(self.consume_single_line_comment())
                }
            }
            b'/' => {
                if self.eat(b'/') {
                    Some(self.consume_single_line_comment())
                } else if self.eat(b'*') {
                    Some(self.consume_multi_line_comment())
                } else if self.eat(b'=') {
                    Some(TokenKind::DivEq)
                } else {
                    None
                }
            }
            b'{' => {
                self.state_stack.push(LexerState::Scripting);
                None
            }
            b'}' => {
                if self.state_stack.len() > 1 {
                    self.state_stack.pop();
                }
                None
            }
            b'(' => self.read_cast(),
            b':' => {
                if self.eat(b':') {
                    self.mode = LexerMode::LookingForName;
                    Some(TokenKind::DoubleColon)
                } else {
                    None
                }
            }
            b'+' => {
                if self.eat(b'+') {
                    Some(TokenKind::Inc)
                } else if self.eat(b'=') {
                    Some(TokenKind::PlusEq)
                } else {
                    None
                }
            }
            b'-' => {
                if self.eat(b'>') {
                    self.mode = LexerMode::LookingForName;
                    Some(TokenKind::Arrow)
                } else if self.eat(b'-') {
                    Some(TokenKind::Dec)
                } else if self.eat(b'=') {
                    Some(TokenKind::MinusEq)
                } else {
                    None
                }
            }
            b'*' => {
                if self.eat(b'*') {
                    if self.eat(b'=') { Some(TokenKind::PowEq) } else { Some(TokenKind::Pow) }
                } else if self.eat(b'=') {
                    Some(TokenKind::MulEq)
                } else {
                    None
                }
            }
            b'%' => self.eat(b'=').then_some(TokenKind::ModEq),
            b'^' => self.eat(b'=').then_some(TokenKind::XorEq),
            b'.' => {
                if self.eat(b'=') {
                    Some(TokenKind::ConcatEq)
                } else if self.peek() == Some(b'.') && self.peek_at(1) == Some(b'.') {
                    self.advance_n(2);
                    Some(TokenKind::Ellipsis)
                } else if self.peek().is_some_and(|d| d.is_ascii_digit()) {
                    self.cursor = start;
                    Some(self.read_number())
                } else {
                    None
                }
            }
            b'=' => {
                if self.eat(b'=') {
                    if self.eat(b'=') { Some(TokenKind::EqEqEq) } else { Some(TokenKind::EqEq) }
                } else if self.eat(b'>') {
                    Some(TokenKind::DoubleArrow)
                } else {
                    None
                }
            }
            b'!' => {
                if self.eat(b'=') {
                    if self.eat(b'=') { Some(TokenKind::BangEqEq) } else { Some(TokenKind::BangEq) }
                } else {
                    None
                }
            }
            b'<' => {
                if self.peek() == Some(b'<') && self.peek_at(1) == Some(b'<') {
                    self.advance_n(2);
                    Some(self.read_heredoc_start())
                } else if self.eat(b'=') {
                    if self.eat(b'>') { Some(TokenKind::Spaceship) } else { Some(TokenKind::LtEq) }
                } else if self.eat(b'<') {
                    if self.eat(b'=') { Some(TokenKind::SlEq) } else { Some(TokenKind::Sl) }
                } else if self.eat(b'>') {
                    Some(TokenKind::BangEq)
                } else {
                    None
                }
            }
            b'>' => {
                if self.eat(b'=') {
                    Some(TokenKind::GtEq)
                } else if self.eat(b'>') {
                    if self.eat(b'=') { Some(TokenKind::SrEq) } else { Some(TokenKind::Sr) }
                } else {
                    None
                }
            }
            b'&' => {
                if self.eat(b'&') {
                    Some(TokenKind::BooleanAnd)
                } else if self.eat(b'=') {
                    Some(TokenKind::AndEq)
                } else {
                    None
                }
            }
            b'|' => {
                if self.eat(b'|') {
                    Some(TokenKind::BooleanOr)
                } else if self.eat(b'=') {
                    Some(TokenKind::OrEq)
                } else {
                    None
                }
            }
            b'?' => {
                if self.eat(b'>') {
                    // `?>` owns a single trailing newline.
                    if self.eat(b'\r') {
                        self.eat(b'\n');
                    } else {
                        self.eat(b'\n');
                    }
                    self.replace_state(LexerState::Initial);
                    Some(TokenKind::CloseTag)
                } else if self.peek() == Some(b'-') && self.peek_at(1) == Some(b'>') {
                    self.advance_n(2);
                    self.mode = LexerMode::LookingForName;
                    Some(TokenKind::NullSafeArrow)
                } else if self.eat(b'?') {
                    if self.eat(b'=') { Some(TokenKind::CoalesceEq) } else { Some(TokenKind::Coalesce) }
                } else {
                    None
                }
            }
            c if c.is_ascii_digit() => {
                self.cursor = start;
                Some(self.read_number())
            }
            c if is_ident_start(c) => Some(self.read_word(start, looking_for_name)),
            _ => None,
        };

        Lexeme::new(kind, start, self.cursor)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Lexeme;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.input.len() {
            return None;
        }

        let lexeme = match self.state_stack.last() {
            Some(LexerState::Initial) => self.next_inline_html(),
            Some(LexerState::Quoted(quote)) => {
                let quote = *quote;
                self.next_in_quotes(quote)
            }
            Some(LexerState::Heredoc(label)) => {
                let label = label.clone();
                self.next_in_heredoc(&label)
            }
            Some(LexerState::Scripting) | None => self.next_in_scripting(),
        };
        Some(lexeme)
    }
}

/// Tokenize PHP source into the stream the scanners consume.
///
/// Classified tokens get the line they start on; punctuation comes out as raw
/// single-character tokens without a line.
pub fn tokenize(source: &str) -> Vec<Token> {
    let input = source.as_bytes();
    let mut line = 1;
    let mut counted = 0;

    Lexer::new(input)
        .map(|lexeme| {
            let text = String::from_utf8_lossy(lexeme.span.as_str(input)).into_owned();
            match lexeme.kind {
                Some(kind) => {
                    line += count_newlines(&input[counted..lexeme.span.start]);
                    counted = lexeme.span.start;
                    Token::Classified { kind, text, line }
                }
                None => Token::Raw(text),
            }
        })
        .collect()
}

pub(crate) fn count_newlines(bytes: &[u8]) -> u32 {
    memchr_iter(b'\n', bytes).count() as u32
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c >= 0x80
}

fn is_ident_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c >= 0x80
}

fn is_radix_digit(radix: u8, c: u8) -> bool {
    match radix {
        b'x' | b'X' => c.is_ascii_hexdigit(),
        b'b' | b'B' => c == b'0' || c == b'1',
        _ => (b'0'..=b'7').contains(&c),
    }
}

fn keyword(word: &[u8]) -> Option<TokenKind> {
    let kind = match word.to_ascii_lowercase().as_slice() {
        b"abstract" => TokenKind::Abstract,
        b"and" => TokenKind::LogicalAnd,
        b"array" => TokenKind::Array,
        b"as" => TokenKind::As,
        b"bool" => TokenKind::TypeBool,
        b"break" => TokenKind::Break,
        b"callable" => TokenKind::TypeCallable,
        b"case" => TokenKind::Case,
        b"catch" => TokenKind::Catch,
        b"class" => TokenKind::Class,
        b"clone" => TokenKind::Clone,
        b"const" => TokenKind::Const,
        b"continue" => TokenKind::Continue,
        b"declare" => TokenKind::Declare,
        b"default" => TokenKind::Default,
        b"die" | b"exit" => TokenKind::Exit,
        b"do" => TokenKind::Do,
        b"echo" => TokenKind::Echo,
        b"else" => TokenKind::Else,
        b"elseif" => TokenKind::ElseIf,
        b"empty" => TokenKind::Empty,
        b"enddeclare" => TokenKind::EndDeclare,
        b"endfor" => TokenKind::EndFor,
        b"endforeach" => TokenKind::EndForeach,
        b"endif" => TokenKind::EndIf,
        b"endswitch" => TokenKind::EndSwitch,
        b"endwhile" => TokenKind::EndWhile,
        b"enum" => TokenKind::Enum,
        b"eval" => TokenKind::Eval,
        b"extends" => TokenKind::Extends,
        b"false" => TokenKind::TypeFalse,
        b"final" => TokenKind::Final,
        b"finally" => TokenKind::Finally,
        b"float" => TokenKind::TypeFloat,
        b"fn" => TokenKind::Fn,
        b"for" => TokenKind::For,
        b"foreach" => TokenKind::Foreach,
        b"function" => TokenKind::Function,
        b"global" => TokenKind::Global,
        b"goto" => TokenKind::Goto,
        b"if" => TokenKind::If,
        b"implements" => TokenKind::Implements,
        b"include" => TokenKind::Include,
        b"include_once" => TokenKind::IncludeOnce,
        b"instanceof" => TokenKind::InstanceOf,
        b"insteadof" => TokenKind::Insteadof,
        b"int" => TokenKind::TypeInt,
        b"interface" => TokenKind::Interface,
        b"isset" => TokenKind::Isset,
        b"iterable" => TokenKind::TypeIterable,
        b"list" => TokenKind::List,
        b"match" => TokenKind::Match,
        b"mixed" => TokenKind::TypeMixed,
        b"namespace" => TokenKind::Namespace,
        b"never" => TokenKind::TypeNever,
        b"new" => TokenKind::New,
        b"null" => TokenKind::TypeNull,
        b"object" => TokenKind::TypeObject,
        b"or" => TokenKind::LogicalOr,
        b"print" => TokenKind::Print,
        b"private" => TokenKind::Private,
        b"protected" => TokenKind::Protected,
        b"public" | b"var" => TokenKind::Public,
        b"readonly" => TokenKind::Readonly,
        b"require" => TokenKind::Require,
        b"require_once" => TokenKind::RequireOnce,
        b"return" => TokenKind::Return,
        b"static" => TokenKind::Static,
        b"string" => TokenKind::TypeString,
        b"switch" => TokenKind::Switch,
        b"throw" => TokenKind::Throw,
        b"trait" => TokenKind::Trait,
        b"true" => TokenKind::TypeTrue,
        b"try" => TokenKind::Try,
        b"unset" => TokenKind::Unset,
        b"use" => TokenKind::Use,
        b"void" => TokenKind::TypeVoid,
        b"while" => TokenKind::While,
        b"xor" => TokenKind::LogicalXor,
        b"yield" => TokenKind::Yield,
        b"__halt_compiler" => TokenKind::HaltCompiler,
        b"__class__" => TokenKind::ClassC,
        b"__dir__" => TokenKind::Dir,
        b"__file__" => TokenKind::File,
        b"__function__" => TokenKind::FuncC,
        b"__line__" => TokenKind::Line,
        b"__method__" => TokenKind::MethodC,
        b"__namespace__" => TokenKind::NsC,
        b"__trait__" => TokenKind::TraitC,
        _ => return None,
    };
    Some(kind)
}
