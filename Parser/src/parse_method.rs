use core::ast::{AstNode, MethodNode, MethodSignature, NodeIdx};
use core::tokens::TokenKind::*;

use crate::{check_tok, match_tok, NodeResult, Parser};

impl<'a> Parser<'a> {
  /// Parses a whole method: pattern, optional `<primitive: n>` pragma,
  /// temporary declarations, and the statement sequence that makes up its
  /// body (spec §6.1 steps 2-3). Returns the `Method` node alongside the
  /// `MethodSignature` the resolver needs to bind argument/temporary
  /// names to slots.
  pub(super) fn parse_method(&mut self) -> NodeResult<(NodeIdx, MethodSignature)> {
    let mut sig = self.parse_message_pattern()?;
    sig.primitive = self.parse_primitive_pragma()?;

    let temp_decls = self.parse_temp_decls()?;
    sig.temporary_names = temp_decls.into_iter().map(|(name, _)| name).collect();

    let statements = self.parse_statement_sequence(&EOF)?;

    let selector = self.emit(AstNode::Symbol(sig.selector.clone()));
    let method = self.emit(AstNode::Method(MethodNode {
      selector,
      number_arguments: sig.argument_names.len() as u8,
      number_temporaries: sig.temporary_names.len() as u8,
      primitive: sig.primitive,
      statements,
    }));

    Ok((method, sig))
  }

  /// Parses a method's message pattern: unary (`foo`), binary (`+ aNumber`),
  /// or keyword (`at: i put: v`). Whichever form is present, the resulting
  /// selector and formal parameter names are recorded on the signature;
  /// `primitive`/`temporary_names` are filled in by the caller.
  fn parse_message_pattern(&mut self) -> NodeResult<MethodSignature> {
    if check_tok![self, KEYWORD] {
      let mut selector = String::new();
      let mut argument_names = vec![];
      while check_tok![self, KEYWORD] {
        selector.push_str(&self.tokens.lexeme(self.current_pos));
        self.advance();
        let (name, _) = self.consume_identifier("Expected a parameter name after a keyword part.")?;
        argument_names.push(name);
      }
      return Ok(MethodSignature { selector, argument_names, temporary_names: vec![], primitive: -1 });
    }

    if check_tok![self, BINARY_SELECTOR] {
      let selector = self.tokens.lexeme(self.current_pos);
      self.advance();
      let (name, _) = self.consume_identifier("Expected a parameter name after the binary selector.")?;
      return Ok(MethodSignature { selector, argument_names: vec![name], temporary_names: vec![], primitive: -1 });
    }

    let (selector, _) = self.consume_identifier("Expected a method selector.")?;
    Ok(MethodSignature { selector, argument_names: vec![], temporary_names: vec![], primitive: -1 })
  }

  /// Parses an optional `<primitive: n>` pragma, returning `n`, or `-1`
  /// when none is present (spec §3's `Method.primitive`). The lexer has no
  /// dedicated `<`/`>` tokens -- they scan as one-character binary
  /// selectors -- so the pragma is recognized by lexeme rather than kind.
  fn parse_primitive_pragma(&mut self) -> NodeResult<i32> {
    if !self.check_binary_lexeme("<") {
      return Ok(-1);
    }
    self.advance();

    if self.tokens.lexeme(self.current_pos) != "primitive:" {
      return Err(self.error_at_current("Expected 'primitive:' inside '<...>' pragma."));
    }
    self.consume(&KEYWORD, "Expected 'primitive:' inside '<...>' pragma.")?;

    let num_idx = self.consume(&INT_LIT, "Expected a primitive number.")?;
    let value: i32 = self
      .tokens
      .lexeme(num_idx)
      .parse()
      .map_err(|_| self.error_at_tok(num_idx, "Malformed primitive number."))?;

    if !self.check_binary_lexeme(">") {
      return Err(self.error_at_current("Expected closing '>' for '<primitive: n>' pragma."));
    }
    self.advance();

    Ok(value)
  }
}
