use serde::Serialize;

/// Byte span into lexer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self { Self { start, end } }

    pub fn as_str<'src>(&self, source: &'src [u8]) -> &'src [u8] {
        &source[self.start..self.end]
    }
}

/// Inclusive `[start, end]` range of token indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
pub struct TokenRange {
    pub start: usize,
    pub end: usize,
}

impl TokenRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(end >= start, "token range ends before it starts");
        Self { start, end }
    }

    /// Borrow the tokens covered by this range. Out-of-bounds ranges yield an
    /// empty slice instead of panicking.
    pub fn slice<'t, T>(&self, tokens: &'t [T]) -> &'t [T] {
        tokens.get(self.start..=self.end).unwrap_or(&[])
    }
}

/// Inclusive `[start, end]` range of 1-based source lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn new(start: u32, end: u32) -> Self { Self { start, end } }
}
