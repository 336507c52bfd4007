use core::tokens::{LexErrorKind, Token, TokenKind};

use crate::Lexer;

impl<'a> Lexer<'a> {
  /// Scans a single-quoted string literal. A doubled quote `''` inside the
  /// literal is an escaped quote, not the terminator -- mirrors the
  /// original scanner's quoting convention.
  pub(crate) fn make_string_token(&mut self) -> Token {
    loop {
      if self.is_at_end() {
        return self.make_error_token(LexErrorKind::UnterminatedString);
      }

      if self.get_current() == '\'' {
        if self.get_next() == '\'' {
          self.advance();
          self.advance();
          continue;
        }
        break;
      }

      if self.advance() == '\n' {
        self.line += 1;
      }
    }

    self.advance();
    self.make_token(TokenKind::STRING_LIT)
  }
}
