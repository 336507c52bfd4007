use core::tokens::{LexErrorKind, Token, TokenKind};

use crate::Lexer;

impl<'a> Lexer<'a> {
  /// Scans an integer or floating-point literal. A `.` only continues the
  /// number when it is immediately followed by another digit -- `3.` as a
  /// statement terminator and `3.foo` as a (degenerate) unary send must
  /// both leave the number as `3` and the `.` untouched.
  pub(crate) fn make_numeric_token(&mut self) -> Token {
    while !self.is_at_end() && self.get_current().is_ascii_digit() {
      self.advance();
    }

    let mut is_float = false;
    if self.get_current() == '.' && self.get_next().is_ascii_digit() {
      is_float = true;
      self.advance();
      while !self.is_at_end() && self.get_current().is_ascii_digit() {
        self.advance();
      }
    }

    // Smalltalk exponent form: 1e3, 3.5e-2.
    if (self.get_current() == 'e' || self.get_current() == 'E')
      && (self.get_next().is_ascii_digit()
        || ((self.get_next() == '-' || self.get_next() == '+')
          && self.current + 2 < self.source.len()
          && self.source[self.current + 2].is_ascii_digit()))
    {
      is_float = true;
      self.advance();
      if self.get_current() == '-' || self.get_current() == '+' {
        self.advance();
      }
      while !self.is_at_end() && self.get_current().is_ascii_digit() {
        self.advance();
      }
    }

    if self.get_current().is_alphabetic() {
      return self.make_error_token(LexErrorKind::MalformedNumber);
    }

    self.make_token(if is_float { TokenKind::FLOAT_LIT } else { TokenKind::INT_LIT })
  }
}
