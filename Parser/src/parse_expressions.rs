use core::ast::{AssignNode, AstNode, CascadeNode, MessageNode, NodeIdx};
use core::tokens::TokenKind::*;

use crate::{check_tok, curr_tk, match_tok, NodeResult, Parser};

impl<'a> Parser<'a> {
  /// Parses a general expression: an optional chain of assignment targets
  /// followed by a cascade (spec §3's `Assign`/`Cascade`/`Message` nodes).
  ///
  /// ```bnf
  /// EXPRESSION ::= (IDENTIFIER ":=")* CASCADE_EXPR
  /// ```
  pub(super) fn parse_expr(&mut self) -> NodeResult<NodeIdx> {
    let mut targets = vec![];
    while check_tok![self, IDENTIFIER] && self.check_next(&ASSIGN) {
      let (name, idx) = self.consume_identifier("Expected an assignment target.")?;
      targets.push(self.emit(AstNode::Identifier(name, idx)));
      self.consume(&ASSIGN, "Expected ':=' after assignment target.")?;
    }

    let expression = self.parse_cascade_expr()?;

    if targets.is_empty() {
      Ok(expression)
    } else {
      Ok(self.emit(AstNode::Assign(AssignNode { variables: targets, expression })))
    }
  }

  /// Parses a cascade: a keyword/binary/unary message send, optionally
  /// followed by `;`-separated further messages sent to the same
  /// receiver (spec §3's `Cascade` node, GLOSSARY "Cascade").
  ///
  /// ```bnf
  /// CASCADE_EXPR ::= KEYWORD_EXPR (";" CASCADED_MESSAGE)*
  /// ```
  fn parse_cascade_expr(&mut self) -> NodeResult<NodeIdx> {
    let first = self.parse_keyword_expr()?;
    if !check_tok![self, SEMICOLON] {
      return Ok(first);
    }

    let (receiver, first_message) = self.split_into_cascade_receiver(first)?;
    let mut messages = vec![first_message];
    while match_tok![self, SEMICOLON] {
      messages.push(self.parse_cascaded_message()?);
    }

    Ok(self.emit(AstNode::Cascade(CascadeNode { receiver, messages })))
  }

  /// `first` was just parsed as an ordinary message send with its own
  /// receiver; a cascade reuses that same node as its first cascaded
  /// message (after clearing its receiver field, since the cascade's
  /// `Cascade.receiver` now owns that expression) and extracts the
  /// receiver for the cascade node itself.
  fn split_into_cascade_receiver(&mut self, first: NodeIdx) -> NodeResult<(NodeIdx, NodeIdx)> {
    match self.ast.get(first).clone() {
      AstNode::Message(msg) => {
        let receiver = msg.receiver.ok_or_else(|| {
          self.error_at_current("A cascade's first message must have an explicit receiver.")
        })?;
        self.ast.replace(first, AstNode::Message(MessageNode { receiver: None, ..msg }));
        Ok((receiver, first))
      }
      _ => Err(self.error_at_current("A cascade must follow a message send.")),
    }
  }

  /// Parses one cascaded message -- a keyword, binary, or unary send with
  /// no receiver of its own (the cascade supplies it via `DUP` at codegen
  /// time, spec §4.5 "Cascade").
  fn parse_cascaded_message(&mut self) -> NodeResult<NodeIdx> {
    if check_tok![self, KEYWORD] {
      let mut selector = String::new();
      let mut arguments = vec![];
      while check_tok![self, KEYWORD] {
        selector.push_str(&self.tokens.lexeme(self.current_pos));
        self.advance();
        arguments.push(self.parse_binary_expr()?.0);
      }
      let selector = self.emit(AstNode::Symbol(selector));
      return Ok(self.emit(AstNode::Message(MessageNode { receiver: None, selector, arguments, super_flag: false })));
    }

    if check_tok![self, BINARY_SELECTOR] {
      let text = self.tokens.lexeme(self.current_pos);
      self.advance();
      let selector = self.emit(AstNode::Symbol(text));
      let (argument, _) = self.parse_unary_expr()?;
      return Ok(self.emit(AstNode::Message(MessageNode {
        receiver: None,
        selector,
        arguments: vec![argument],
        super_flag: false,
      })));
    }

    if check_tok![self, IDENTIFIER] {
      let (name, _) = self.consume_identifier("Expected a cascaded message selector.")?;
      let selector = self.emit(AstNode::Symbol(name));
      return Ok(self.emit(AstNode::Message(MessageNode {
        receiver: None,
        selector,
        arguments: vec![],
        super_flag: false,
      })));
    }

    Err(self.error_at_current("Expected a cascaded message after ';'."))
  }

  /// Parses a keyword message send, the lowest-precedence message form.
  ///
  /// ```bnf
  /// KEYWORD_EXPR ::= BINARY_EXPR (KEYWORD BINARY_EXPR)*
  /// ```
  fn parse_keyword_expr(&mut self) -> NodeResult<NodeIdx> {
    let (receiver, is_super) = self.parse_binary_expr()?;
    if !check_tok![self, KEYWORD] {
      return Ok(receiver);
    }

    let mut selector = String::new();
    let mut arguments = vec![];
    while check_tok![self, KEYWORD] {
      selector.push_str(&self.tokens.lexeme(self.current_pos));
      self.advance();
      arguments.push(self.parse_binary_expr()?.0);
    }

    let selector = self.emit(AstNode::Symbol(selector));
    Ok(self.emit(AstNode::Message(MessageNode { receiver: Some(receiver), selector, arguments, super_flag: is_super })))
  }

  /// Parses a left-associative run of binary message sends.
  ///
  /// ```bnf
  /// BINARY_EXPR ::= UNARY_EXPR (BINARY_SELECTOR UNARY_EXPR)*
  /// ```
  fn parse_binary_expr(&mut self) -> NodeResult<(NodeIdx, bool)> {
    let (mut receiver, mut is_super) = self.parse_unary_expr()?;

    while check_tok![self, BINARY_SELECTOR] {
      let text = self.tokens.lexeme(self.current_pos);
      self.advance();
      let selector = self.emit(AstNode::Symbol(text));
      let (argument, _) = self.parse_unary_expr()?;
      receiver = self.emit(AstNode::Message(MessageNode {
        receiver: Some(receiver),
        selector,
        arguments: vec![argument],
        super_flag: is_super,
      }));
      is_super = false;
    }

    Ok((receiver, is_super))
  }

  /// Parses a left-associative run of unary message sends.
  ///
  /// ```bnf
  /// UNARY_EXPR ::= PRIMARY_EXPR IDENTIFIER*
  /// ```
  ///
  /// The returned `bool` is true only when `receiver` is still exactly the
  /// bare `super` pseudo-variable -- i.e. no message has been sent to it
  /// yet -- so the caller can mark the *next* message sent to it as a
  /// super-send (spec §3 `VariableRecord`'s `SUPER`, GLOSSARY "Receiver").
  fn parse_unary_expr(&mut self) -> NodeResult<(NodeIdx, bool)> {
    let (mut receiver, mut is_super) = self.parse_primary()?;

    while check_tok![self, IDENTIFIER] {
      let (name, _) = self.consume_identifier("Expected a unary message selector.")?;
      let selector = self.emit(AstNode::Symbol(name));
      receiver = self.emit(AstNode::Message(MessageNode {
        receiver: Some(receiver),
        selector,
        arguments: vec![],
        super_flag: is_super,
      }));
      is_super = false;
    }

    Ok((receiver, is_super))
  }

  /// Parses a primary expression: a variable reference, a literal, a
  /// parenthesized expression, a literal array, or a block.
  ///
  /// ```bnf
  /// PRIMARY_EXPR ::= IDENTIFIER | SELF_KW | SUPER_KW | NIL_KW | TRUE_KW | FALSE_KW
  ///               | INT_LIT | FLOAT_LIT | STRING_LIT | CHAR_LIT | SYMBOL_LIT
  ///               | "#(" ARRAY_ELEMENTS ")" | "(" EXPRESSION ")" | "[" BLOCK_BODY "]"
  /// ```
  fn parse_primary(&mut self) -> NodeResult<(NodeIdx, bool)> {
    match curr_tk![self] {
      SELF_KW => {
        let idx = self.current_pos;
        self.advance();
        Ok((self.emit(AstNode::Identifier("self".to_string(), idx)), false))
      }
      SUPER_KW => {
        let idx = self.current_pos;
        self.advance();
        Ok((self.emit(AstNode::Identifier("super".to_string(), idx)), true))
      }
      NIL_KW => {
        let idx = self.current_pos;
        self.advance();
        Ok((self.emit(AstNode::Identifier("nil".to_string(), idx)), false))
      }
      TRUE_KW => {
        let idx = self.current_pos;
        self.advance();
        Ok((self.emit(AstNode::Identifier("true".to_string(), idx)), false))
      }
      FALSE_KW => {
        let idx = self.current_pos;
        self.advance();
        Ok((self.emit(AstNode::Identifier("false".to_string(), idx)), false))
      }
      IDENTIFIER => {
        let (name, idx) = self.consume_identifier("Expected an identifier.")?;
        Ok((self.emit(AstNode::Identifier(name, idx)), false))
      }
      INT_LIT | FLOAT_LIT => Ok((self.parse_number_literal()?, false)),
      STRING_LIT => Ok((self.parse_string_literal()?, false)),
      CHAR_LIT => Ok((self.parse_char_literal()?, false)),
      SYMBOL_LIT => Ok((self.parse_symbol_literal()?, false)),
      HASH_PAREN => {
        self.advance();
        Ok((self.parse_array_literal()?, false))
      }
      L_PAREN => {
        self.advance();
        let inner = self.parse_expr()?;
        self.consume(&R_PAREN, "Expected closing ')'.")?;
        Ok((inner, false))
      }
      L_BRACKET => {
        self.advance();
        Ok((self.parse_block_literal()?, false))
      }
      _ => Err(self.error_at_current("Expected an expression.")),
    }
  }
}
