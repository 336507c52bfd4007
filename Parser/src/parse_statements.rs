use core::ast::{AstNode, NodeIdx};
use core::tokens::TokenKind::*;

use crate::{check_tok, match_tok, NodeResult, Parser};

impl<'a> Parser<'a> {
  /// Parses a dot-separated sequence of statements, stopping at whatever
  /// terminator the caller expects (end of method: `EOF`; end of a block:
  /// `]`). A trailing `.` before the terminator is permitted and produces
  /// no extra statement, matching the source grammar's `STATEMENTS` rule.
  ///
  /// ```bnf
  /// STATEMENTS ::= (STATEMENT ("." STATEMENT)* "."?)?
  /// ```
  pub(super) fn parse_statement_sequence(&mut self, terminator: &core::tokens::TokenKind) -> NodeResult<Vec<NodeIdx>> {
    let mut statements = vec![];

    while !self.check(terminator) {
      statements.push(self.parse_statement()?);

      if !match_tok![self, DOT] {
        break;
      }
    }

    Ok(statements)
  }

  /// A single statement: either a `^`-return or a bare expression.
  ///
  /// ```bnf
  /// STATEMENT ::= "^" EXPRESSION | EXPRESSION
  /// ```
  pub(super) fn parse_statement(&mut self) -> NodeResult<NodeIdx> {
    if match_tok![self, CARET] {
      let expr = self.parse_expr()?;
      return Ok(self.emit(AstNode::RetExp(expr)));
    }
    self.parse_expr()
  }

  /// Parses `| t1 t2 ... |`, returning the declared names alongside the
  /// token each was declared at (for diagnostics). An empty `| |` is legal
  /// and yields no names; the pipes themselves are optional when there are
  /// no temporaries to declare.
  pub(super) fn parse_temp_decls(&mut self) -> NodeResult<Vec<(String, core::tokens::TokenIdx)>> {
    if !match_tok![self, PIPE] {
      return Ok(vec![]);
    }

    let mut names = vec![];
    while check_tok![self, IDENTIFIER] {
      names.push(self.consume_identifier("Expected temporary variable name.")?);
    }
    self.consume(&PIPE, "Expected closing '|' after temporary variable declarations.")?;
    Ok(names)
  }
}
