//! Forward-only cursor over a token slice.

use crate::lexer::count_newlines;
use crate::lexer::token::{Token, TokenKind};

/// A mutable cursor over a token slice.
///
/// Starts before the first token; every successful [`advance`](Self::advance)
/// makes the next token current. A raw `"` is joined with everything up to
/// the matching raw `"` and presented as one string literal, so braces inside
/// interpolated strings never reach the scanners.
///
/// Lines: classified tokens report their own line. Raw tokens have none, so
/// the cursor keeps a running line, the previous token's line plus the
/// newlines in its text.
pub struct TokenCursor<'t> {
    tokens: &'t [Token],
    position: Option<usize>,
    start: usize,
    line: u32,
    next_line: u32,
    joined: Option<String>,
    exhausted: bool,
}

impl<'t> TokenCursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        let first_line = initial_line(tokens);
        Self {
            tokens,
            position: None,
            start: 0,
            line: first_line,
            next_line: first_line,
            joined: None,
            exhausted: tokens.is_empty(),
        }
    }

    /// Move to the next token. Returns `false` once the stream is exhausted.
    pub fn advance(&mut self) -> bool {
        if self.exhausted {
            return false;
        }

        let next = self.position.map_or(0, |index| index + 1);
        let Some(token) = self.tokens.get(next) else {
            self.exhausted = true;
            return false;
        };

        self.joined = None;
        self.start = next;
        self.line = token.line().unwrap_or(self.next_line);

        if token.is_raw("\"") {
            let mut text = String::from("\"");
            let mut end = next + 1;
            loop {
                let Some(inner) = self.tokens.get(end) else {
                    // No closing quote: nothing after the opening one is usable.
                    self.exhausted = true;
                    return false;
                };
                text.push_str(inner.text());
                if inner.is_raw("\"") {
                    break;
                }
                end += 1;
            }
            self.next_line = self.line + count_newlines(text.as_bytes());
            self.position = Some(end);
            self.joined = Some(text);
            return true;
        }

        self.next_line = self.line + count_newlines(token.text().as_bytes());
        self.position = Some(next);
        true
    }

    /// Index of the current token. For a joined string this is the closing quote.
    pub fn index(&self) -> usize {
        self.position.unwrap_or(0)
    }

    /// Index where the current token starts; differs from [`index`](Self::index)
    /// only for joined strings.
    pub fn start_index(&self) -> usize {
        self.start
    }

    pub fn kind(&self) -> Option<TokenKind> {
        if self.joined.is_some() {
            return Some(TokenKind::StringLiteral);
        }
        self.current().and_then(Token::kind)
    }

    pub fn text(&self) -> &str {
        match &self.joined {
            Some(text) => text,
            None => self.current().map_or("", Token::text),
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind() == Some(kind)
    }

    pub fn is_raw(&self, text: &str) -> bool {
        self.joined.is_none() && self.current().is_some_and(|token| token.is_raw(text))
    }

    pub fn is_trivia(&self) -> bool {
        matches!(self.kind(), Some(TokenKind::Whitespace | TokenKind::Comment))
    }

    /// The token `offset` positions after the current one, without moving.
    pub fn peek(&self, offset: usize) -> Option<&'t Token> {
        self.tokens.get(self.index() + offset)
    }

    /// The next token after the current one that is not whitespace or a comment.
    pub fn peek_significant(&self) -> Option<&'t Token> {
        self.tokens[(self.index() + 1).min(self.tokens.len())..]
            .iter()
            .find(|token| !token.is_trivia())
    }

    pub fn tokens(&self) -> &'t [Token] {
        self.tokens
    }

    fn current(&self) -> Option<&'t Token> {
        self.position.and_then(|index| self.tokens.get(index))
    }
}

/// Line of the first token in a slice. A child slice can start on a raw token,
/// so the line is taken from the first classified token and walked back over
/// the newlines in front of it.
fn initial_line(tokens: &[Token]) -> u32 {
    let Some(first) = tokens.iter().position(|token| token.line().is_some()) else {
        return 1;
    };
    let line = tokens[first].line().unwrap_or(1);
    let before: u32 = tokens[..first]
        .iter()
        .map(|token| count_newlines(token.text().as_bytes()))
        .sum();
    line.saturating_sub(before).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_slice_starting_on_raw_token_inherits_line() {
        let tokens = vec![
            Token::raw("{"),
            Token::classified(TokenKind::Whitespace, "\n    ", 7),
            Token::classified(TokenKind::Return, "return", 8),
        ];
        let mut cursor = TokenCursor::new(&tokens);
        assert!(cursor.advance());
        assert_eq!(cursor.line(), 7);
    }
}
