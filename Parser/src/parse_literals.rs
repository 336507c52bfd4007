use core::ast::{AstNode, BlockNode, NodeIdx};
use core::tokens::TokenIdx;
use core::tokens::TokenKind::*;

use crate::{check_tok, curr_tk, match_tok, NodeResult, Parser};

impl<'a> Parser<'a> {
  /// Parses an `INT_LIT` or `FLOAT_LIT` token into an `IntNum`/`FloNum`
  /// node. The lexer has already decided which of the two this is; this
  /// only has to parse the lexeme's text.
  pub(super) fn parse_number_literal(&mut self) -> NodeResult<NodeIdx> {
    let is_float = check_tok![self, FLOAT_LIT];
    let idx: TokenIdx = self.current_pos;
    let text = self.tokens.lexeme(idx);
    self.advance();

    if is_float {
      match text.parse::<f64>() {
        Ok(v) => Ok(self.emit(AstNode::FloNum(v))),
        Err(_) => Err(self.error_at_tok(idx, "Malformed float literal.")),
      }
    } else {
      match text.parse::<i64>() {
        Ok(v) => Ok(self.emit(AstNode::IntNum(v))),
        Err(_) => Err(self.error_at_tok(idx, "Malformed integer literal.")),
      }
    }
  }

  /// Parses a `'...'` string literal, unescaping the Smalltalk convention
  /// of a doubled quote (`''`) standing for one literal quote character.
  pub(super) fn parse_string_literal(&mut self) -> NodeResult<NodeIdx> {
    let idx = self.current_pos;
    let text = self.tokens.lexeme(idx);
    self.advance();
    let inner = &text[1..text.len() - 1];
    Ok(self.emit(AstNode::Str(inner.replace("''", "'"))))
  }

  /// Parses a `$c` character constant.
  pub(super) fn parse_char_literal(&mut self) -> NodeResult<NodeIdx> {
    let idx = self.current_pos;
    let text = self.tokens.lexeme(idx);
    self.advance();
    match text.chars().nth(1) {
      Some(c) => Ok(self.emit(AstNode::CharCon(c))),
      None => Err(self.error_at_tok(idx, "Empty character constant.")),
    }
  }

  /// Parses a `#foo`, `#at:put:`, or `#+` symbol literal, stripping the
  /// leading `#`.
  pub(super) fn parse_symbol_literal(&mut self) -> NodeResult<NodeIdx> {
    let idx = self.current_pos;
    let text = self.tokens.lexeme(idx);
    self.advance();
    Ok(self.emit(AstNode::Symbol(text[1..].to_string())))
  }

  /// Parses the body of a `#( ... )` literal array, one pure-literal
  /// element at a time, after the leading `#(` has already been consumed.
  /// Unlike ordinary expressions, every element here is taken literally --
  /// a bare word denotes a `Symbol`, not a variable reference, matching
  /// Smalltalk's literal-array convention.
  pub(super) fn parse_array_literal(&mut self) -> NodeResult<NodeIdx> {
    let mut elements = vec![];
    while !check_tok![self, R_PAREN] {
      elements.push(self.parse_array_literal_element()?);
    }
    self.consume(&R_PAREN, "Expected closing ')' for literal array.")?;
    Ok(self.emit(AstNode::Array(elements)))
  }

  fn parse_array_literal_element(&mut self) -> NodeResult<NodeIdx> {
    match curr_tk![self] {
      INT_LIT | FLOAT_LIT => self.parse_number_literal(),
      STRING_LIT => self.parse_string_literal(),
      CHAR_LIT => self.parse_char_literal(),
      SYMBOL_LIT => self.parse_symbol_literal(),
      BINARY_SELECTOR => {
        let text = self.tokens.lexeme(self.current_pos);
        self.advance();
        Ok(self.emit(AstNode::Symbol(text)))
      }
      IDENTIFIER => {
        let (name, _) = self.consume_identifier("Expected a literal array element.")?;
        Ok(self.emit(AstNode::Symbol(name)))
      }
      SELF_KW | SUPER_KW | NIL_KW | TRUE_KW | FALSE_KW => {
        let name = self.tokens.lexeme(self.current_pos);
        self.advance();
        Ok(self.emit(AstNode::Symbol(name)))
      }
      // Consecutive keyword parts with no intervening space chain into one
      // compound symbol, e.g. the bare `at:put:` inside `#(foo at:put: 1)`.
      KEYWORD => {
        let mut text = String::new();
        while match_tok![self, KEYWORD] {
          text.push_str(&self.tokens.lexeme(self.current_pos - 1));
        }
        Ok(self.emit(AstNode::Symbol(text)))
      }
      HASH_PAREN => {
        self.advance();
        self.parse_array_literal()
      }
      // A nested literal array may drop the leading '#': inside `#(...)`,
      // every element is already a literal.
      L_PAREN => {
        self.advance();
        self.parse_array_literal()
      }
      _ => Err(self.error_at_current("Expected a literal array element.")),
    }
  }

  /// Parses a block body after the leading `[` has been consumed:
  /// `[:a :b | | t | statements]` (spec §3's `Block` node). Arguments and
  /// temporaries share one declaration list and one slot range -- the
  /// resolver is what actually assigns them -- `arg_count` just remembers
  /// how many of `variables`' leading entries are arguments.
  pub(super) fn parse_block_literal(&mut self) -> NodeResult<NodeIdx> {
    let mut arg_names = vec![];
    while match_tok![self, COLON] {
      arg_names.push(self.consume_identifier("Expected a block argument name after ':'.")?);
    }
    if !arg_names.is_empty() {
      self.consume(&PIPE, "Expected '|' after the block's argument list.")?;
    }
    let arg_count = arg_names.len() as u8;

    let temp_names = self.parse_temp_decls()?;

    let mut variables = vec![];
    for (name, idx) in arg_names.into_iter().chain(temp_names) {
      variables.push(self.emit(AstNode::Identifier(name, idx)));
    }
    let number_variables = variables.len() as u8;

    let statements = self.parse_statement_sequence(&R_BRACKET)?;
    self.consume(&R_BRACKET, "Expected closing ']' for block.")?;

    Ok(self.emit(AstNode::Block(BlockNode { number_variables, arg_count, variables, statements })))
  }
}
