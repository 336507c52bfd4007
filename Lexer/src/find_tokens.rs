use core::tokens::{LexErrorKind, Token, TokenKind};

use crate::Lexer;

impl<'a> Lexer<'a> {
  /// Drives the scanner to the end of the source, pushing one token at a
  /// time onto `self.tokens`.
  pub(crate) fn find_tokens(&mut self) {
    loop {
      self.skip_whitespace_and_comments();

      if self.is_at_end() {
        self.token_start = self.current;
        self.tokens.push(self.make_token(TokenKind::EOF));
        return;
      }

      self.token_start = self.current;
      let tok = self.next_token();
      self.tokens.push(tok);
    }
  }

  fn next_token(&mut self) -> Token {
    match self.advance() {
      '^' => self.make_token(TokenKind::CARET),
      '.' => self.make_token(TokenKind::DOT),
      ';' => self.make_token(TokenKind::SEMICOLON),
      '|' => self.make_token(TokenKind::PIPE),
      '(' => self.make_token(TokenKind::L_PAREN),
      ')' => self.make_token(TokenKind::R_PAREN),
      '[' => self.make_token(TokenKind::L_BRACKET),
      ']' => self.make_token(TokenKind::R_BRACKET),

      ':' if self.matches('=') => self.make_token(TokenKind::ASSIGN),
      ':' => self.make_token(TokenKind::COLON),

      '#' if self.matches('(') => self.make_token(TokenKind::HASH_PAREN),
      '#' => self.make_symbol_token(),

      '\'' => self.make_string_token(),
      '$' => self.make_char_token(),

      c if c.is_ascii_digit() => self.make_numeric_token(),
      c if c.is_alphabetic() || c == '_' => self.make_identifier_token(),
      c if crate::BINARY_CHARS.contains(&c) => self.make_binary_selector_token(),

      _ => self.make_error_token(LexErrorKind::InvalidCharacter),
    }
  }
}
