use core::tokens::{LexErrorKind, Token, TokenKind};

use crate::Lexer;

impl<'a> Lexer<'a> {
  /// Scans a character constant: `$` followed by exactly one character,
  /// taken literally (even if it's whitespace or punctuation).
  pub(crate) fn make_char_token(&mut self) -> Token {
    if self.is_at_end() {
      return self.make_error_token(LexErrorKind::UnterminatedCharConstant);
    }
    if self.get_current() == '\n' {
      self.line += 1;
    }
    self.advance();
    self.make_token(TokenKind::CHAR_LIT)
  }

  /// Scans a symbol literal after the leading `#` has been consumed:
  /// `#foo`, `#at:put:`, or `#+`. `#(` is handled by the caller before this
  /// is ever reached.
  pub(crate) fn make_symbol_token(&mut self) -> Token {
    if self.get_current().is_alphabetic() || self.get_current() == '_' {
      while !self.is_at_end() && (self.get_current().is_alphanumeric() || self.get_current() == '_') {
        self.advance();
      }
      // A symbol may chain several keyword parts: #at:put:.
      while self.get_current() == ':' {
        self.advance();
        while !self.is_at_end() && (self.get_current().is_alphanumeric() || self.get_current() == '_') {
          self.advance();
        }
      }
      return self.make_token(TokenKind::SYMBOL_LIT);
    }

    if crate::BINARY_CHARS.contains(&self.get_current()) {
      while !self.is_at_end() && crate::BINARY_CHARS.contains(&self.get_current()) {
        self.advance();
      }
      return self.make_token(TokenKind::SYMBOL_LIT);
    }

    self.make_error_token(LexErrorKind::InvalidCharacter)
  }
}
