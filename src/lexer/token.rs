/// A token as handed to the scanners.
///
/// Classified tokens carry a kind and the line they start on. Single-character
/// punctuation (`;`, `{`, `(`, `,`, `=`, `&`, `"` ...) is left unclassified and
/// has no line of its own; the cursor derives one from the surrounding tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Classified {
        kind: TokenKind,
        text: String,
        line: u32,
    },
    Raw(String),
}

impl Token {
    pub fn classified(kind: TokenKind, text: impl Into<String>, line: u32) -> Self {
        Token::Classified { kind, text: text.into(), line }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Token::Raw(text.into())
    }

    pub fn kind(&self) -> Option<TokenKind> {
        match self {
            Token::Classified { kind, .. } => Some(*kind),
            Token::Raw(_) => None,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Token::Classified { text, .. } => text,
            Token::Raw(text) => text,
        }
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            Token::Classified { line, .. } => Some(*line),
            Token::Raw(_) => None,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind() == Some(kind)
    }

    /// True for an unclassified token with exactly this text.
    pub fn is_raw(&self, text: &str) -> bool {
        matches!(self, Token::Raw(raw) if raw == text)
    }

    /// Whitespace and plain comments. Doc comments are significant.
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind(), Some(TokenKind::Whitespace | TokenKind::Comment))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash)]
pub enum TokenKind {
    // Keywords
    Function, Fn, Class, Interface, Trait, Enum, Extends, Implements, Insteadof,
    If, Else, ElseIf, EndIf, Return, Echo, Print,
    While, Do, For, Foreach, EndWhile, EndFor, EndForeach, As, Switch, EndSwitch, Case, Default, Break, Continue, Goto,
    Try, Catch, Finally, Throw,
    Public, Protected, Private, Static, Abstract, Final, Readonly,
    Namespace, Use, Global,
    New, Clone, InstanceOf,
    Array, Const,
    Include, IncludeOnce, Require, RequireOnce, Eval, Exit,
    Empty, Isset, Unset, List,
    Yield, YieldFrom,
    Declare, EndDeclare, Match,
    HaltCompiler,
    Attribute, // #[

    // Magic constants
    Line, File, Dir, ClassC, TraitC, MethodC, FuncC, NsC,

    // Types
    TypeBool, TypeInt, TypeFloat, TypeString, TypeObject, TypeVoid, TypeIterable, TypeCallable, TypeMixed, TypeNever, TypeNull, TypeFalse, TypeTrue,

    // Casts
    IntCast, FloatCast, StringCast, ArrayCast, ObjectCast, BoolCast, UnsetCast,

    // Identifiers & literals
    Identifier,
    LNumber,
    DNumber,
    StringLiteral,
    Variable,
    InlineHtml,
    EncapsedAndWhitespace,
    DollarOpenCurlyBraces, // ${
    CurlyOpen, // {$
    StartHeredoc, // <<<
    EndHeredoc,
    NsSeparator, // \

    // Trivia
    Whitespace,
    Comment,
    DocComment,

    // Multi-character operators
    Arrow, // ->
    NullSafeArrow, // ?->
    DoubleArrow, // =>
    DoubleColon, // ::
    Ellipsis, // ...
    Pow, // **
    Inc, Dec, // ++, --
    PlusEq, MinusEq, MulEq, DivEq, ModEq, ConcatEq, PowEq,
    AndEq, OrEq, XorEq, SlEq, SrEq, CoalesceEq,
    EqEq, // ==
    EqEqEq, // ===
    BangEq, // != and <>
    BangEqEq, // !==
    LtEq, // <=
    GtEq, // >=
    Spaceship, // <=>
    Sl, // <<
    Sr, // >>
    BooleanAnd, // &&
    BooleanOr, // ||
    LogicalAnd, // and
    LogicalOr, // or
    LogicalXor, // xor
    Coalesce, // ??

    OpenTag, // <?php
    OpenTagEcho, // <?=
    CloseTag, // ?>
}

impl TokenKind {
    /// Kinds that can appear inside a type declaration.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::NsSeparator
                | TokenKind::Array
                | TokenKind::Static
                | TokenKind::TypeBool
                | TokenKind::TypeInt
                | TokenKind::TypeFloat
                | TokenKind::TypeString
                | TokenKind::TypeObject
                | TokenKind::TypeVoid
                | TokenKind::TypeIterable
                | TokenKind::TypeCallable
                | TokenKind::TypeMixed
                | TokenKind::TypeNever
                | TokenKind::TypeNull
                | TokenKind::TypeFalse
                | TokenKind::TypeTrue
        )
    }

    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            TokenKind::Public
                | TokenKind::Protected
                | TokenKind::Private
                | TokenKind::Static
                | TokenKind::Abstract
                | TokenKind::Final
                | TokenKind::Readonly
        )
    }

    pub fn is_name_part(self) -> bool {
        matches!(self, TokenKind::Identifier | TokenKind::NsSeparator)
    }
}
