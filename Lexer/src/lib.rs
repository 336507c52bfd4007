use core::tokens::{LexErrorKind, Token, TokenKind};

mod find_tokens;
mod lex_numbers;
mod lex_strings;
mod lex_symbols;

/// Characters a binary selector may be built from. Smalltalk proper allows
/// an open-ended set of "special characters"; this is the subset MiniTalk
/// method bodies are expected to use.
pub(crate) const BINARY_CHARS: &[char] =
  &['+', '-', '*', '/', '~', '<', '>', '=', '&', '|', '@', '%', ',', '?', '\\'];

/// Converts a scanned identifier's text into its token kind: one of the five
/// pseudo-variable keywords if it matches exactly, `IDENTIFIER` otherwise.
/// Whether it's actually a `KEYWORD` (identifier immediately followed by
/// `:`) is decided by the caller, since that depends on lookahead this
/// function doesn't have.
fn classify_identifier(text: &str) -> TokenKind {
  match text {
    "self" => TokenKind::SELF_KW,
    "super" => TokenKind::SUPER_KW,
    "nil" => TokenKind::NIL_KW,
    "true" => TokenKind::TRUE_KW,
    "false" => TokenKind::FALSE_KW,
    _ => TokenKind::IDENTIFIER,
  }
}

/// Scans a MiniTalk method body into a flat token list. Mirrors the shape of
/// a hand-written recursive-descent scanner: a cursor over a flat character
/// slice, with `token_start`/`current` bracketing the lexeme under
/// construction.
pub struct Lexer<'a> {
  source: &'a [char],
  tokens: Vec<Token>,
  current: usize,
  line: usize,
  token_start: usize,
}

impl<'a> Lexer<'a> {
  /// Scans `source` in full and returns every token, always ending in
  /// exactly one `EOF`.
  pub fn lex(source: &'a [char]) -> Vec<Token> {
    let mut lexer = Lexer { source, tokens: Vec::new(), current: 0, line: 1, token_start: 0 };
    lexer.find_tokens();
    lexer.tokens
  }

  fn is_at_end(&self) -> bool {
    self.current >= self.source.len()
  }

  fn get_previous(&self) -> char {
    self.source[self.current - 1]
  }

  fn get_current(&self) -> char {
    if self.is_at_end() {
      '\0'
    } else {
      self.source[self.current]
    }
  }

  fn get_next(&self) -> char {
    if self.current + 1 >= self.source.len() {
      '\0'
    } else {
      self.source[self.current + 1]
    }
  }

  fn advance(&mut self) -> char {
    self.current += 1;
    self.get_previous()
  }

  fn matches(&mut self, expected: char) -> bool {
    if self.is_at_end() || self.get_current() != expected {
      return false;
    }
    self.current += 1;
    true
  }

  fn skip_whitespace_and_comments(&mut self) {
    loop {
      match self.get_current() {
        ' ' | '\r' | '\t' => {
          self.current += 1;
        }
        '\n' => {
          self.line += 1;
          self.current += 1;
        }
        '"' => self.skip_comment(),
        _ => break,
      }
      if self.is_at_end() {
        break;
      }
    }
  }

  /// Smalltalk comments are delimited by double quotes, not `//` or `/* */`:
  /// `"this is a comment"`. They may span multiple lines.
  fn skip_comment(&mut self) {
    self.advance();
    while !self.is_at_end() && self.get_current() != '"' {
      if self.get_current() == '\n' {
        self.line += 1;
      }
      self.advance();
    }
    if !self.is_at_end() {
      self.advance();
    }
  }

  fn make_token(&self, kind: TokenKind) -> Token {
    Token { kind, line: self.line, span: (self.token_start, self.current) }
  }

  fn make_error_token(&self, err: LexErrorKind) -> Token {
    Token { kind: TokenKind::ERROR(err), line: self.line, span: (self.token_start, self.current) }
  }

  fn make_identifier_token(&mut self) -> Token {
    while !self.is_at_end() && (self.get_current().is_alphanumeric() || self.get_current() == '_') {
      self.advance();
    }

    let text: String = self.source[self.token_start..self.current].iter().collect();

    // An identifier immediately followed by ':' -- with no '=' right after
    // it, which would instead make it the start of an ASSIGN token -- is a
    // keyword-message part, e.g. `at:`.
    if self.get_current() == ':' && self.get_next() != '=' {
      self.advance();
      return self.make_token(TokenKind::KEYWORD);
    }

    self.make_token(classify_identifier(&text))
  }

  fn make_binary_selector_token(&mut self) -> Token {
    while !self.is_at_end() && BINARY_CHARS.contains(&self.get_current()) {
      self.advance();
    }
    self.make_token(TokenKind::BINARY_SELECTOR)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn kinds(src: &str) -> Vec<TokenKind> {
    let chars: Vec<char> = src.chars().collect();
    Lexer::lex(&chars).into_iter().map(|t| t.kind).collect()
  }

  #[test]
  fn lexes_a_simple_return_method() {
    assert_eq!(
      kinds("foo ^ 42"),
      vec![TokenKind::IDENTIFIER, TokenKind::CARET, TokenKind::INT_LIT, TokenKind::EOF]
    );
  }

  #[test]
  fn lexes_keyword_parts_distinctly_from_assignment() {
    assert_eq!(
      kinds("at: x put: y"),
      vec![
        TokenKind::KEYWORD,
        TokenKind::IDENTIFIER,
        TokenKind::KEYWORD,
        TokenKind::IDENTIFIER,
        TokenKind::EOF,
      ]
    );
  }

  #[test]
  fn distinguishes_assign_from_keyword() {
    assert_eq!(kinds("x := 1"), vec![TokenKind::IDENTIFIER, TokenKind::ASSIGN, TokenKind::INT_LIT, TokenKind::EOF]);
  }

  #[test]
  fn lexes_pseudo_variables() {
    assert_eq!(
      kinds("self nil true false super"),
      vec![
        TokenKind::SELF_KW,
        TokenKind::NIL_KW,
        TokenKind::TRUE_KW,
        TokenKind::FALSE_KW,
        TokenKind::SUPER_KW,
        TokenKind::EOF,
      ]
    );
  }

  #[test]
  fn lexes_binary_selector_runs() {
    assert_eq!(
      kinds("3 + 4"),
      vec![TokenKind::INT_LIT, TokenKind::BINARY_SELECTOR, TokenKind::INT_LIT, TokenKind::EOF]
    );
    assert_eq!(kinds("3 ~= 4").len(), 4);
  }

  #[test]
  fn lexes_float_literal_but_not_a_trailing_dot() {
    assert_eq!(kinds("3.5"), vec![TokenKind::FLOAT_LIT, TokenKind::EOF]);
    assert_eq!(kinds("3."), vec![TokenKind::INT_LIT, TokenKind::DOT, TokenKind::EOF]);
  }

  #[test]
  fn lexes_string_with_escaped_quote() {
    assert_eq!(kinds("'it''s ok'"), vec![TokenKind::STRING_LIT, TokenKind::EOF]);
  }

  #[test]
  fn lexes_char_and_symbol_and_array_literals() {
    assert_eq!(
      kinds("$a #foo #at:put: #( 1 2 )"),
      vec![
        TokenKind::CHAR_LIT,
        TokenKind::SYMBOL_LIT,
        TokenKind::SYMBOL_LIT,
        TokenKind::HASH_PAREN,
        TokenKind::INT_LIT,
        TokenKind::INT_LIT,
        TokenKind::R_PAREN,
        TokenKind::EOF,
      ]
    );
  }

  #[test]
  fn skips_smalltalk_style_comments() {
    assert_eq!(kinds("\"a comment\" foo"), vec![TokenKind::IDENTIFIER, TokenKind::EOF]);
  }

  #[test]
  fn unterminated_string_is_an_error_token() {
    let ks = kinds("'oops");
    assert!(matches!(ks[0], TokenKind::ERROR(LexErrorKind::UnterminatedString)));
  }
}
