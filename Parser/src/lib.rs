use core::ast::*;
use core::errors::ErrorReport;
use core::tokens::TokenKind::*;
use core::tokens::*;

mod parse_expressions;
mod parse_literals;
mod parse_method;
mod parse_statements;

/// If the current token matches any of the provided kinds, consume it and
/// return true; otherwise return false without consuming.
#[macro_export]
macro_rules! match_tok {
  ($s:expr, $id:ident $(| $ids:ident)*) => {
    $s.matches(&$id) $(|| $s.matches(&$ids))*
  };
}

/// True if the current token matches any of the provided kinds, without
/// consuming it.
#[macro_export]
macro_rules! check_tok {
  ($s:expr, $id:ident $(| $ids:ident)*) => {
    $s.check(&$id) $(|| $s.check(&$ids))*
  };
}

/// A reference to the current token's kind.
#[macro_export]
macro_rules! curr_tk {
  ($s:ident) => {
    $s.get_curr_tk()
  };
}

/// The result of parsing a node or part of a node.
pub type NodeResult<T> = Result<T, ErrorReport>;

/// Converts MiniTalk method source text into an AST, following the same
/// recursive-descent, macro-assisted consume/match style used elsewhere in
/// this workspace's front end.
pub struct Parser<'a> {
  tokens: &'a TokenList<'a>,
  current_pos: usize,
  pub ast: AstArena,
  errors: Vec<ErrorReport>,
}

impl<'a> Parser<'a> {
  /// Parses a single method body. Returns the arena, the method node's
  /// index, and its signature (pattern + temporaries), or the first error
  /// encountered -- MiniTalk method parsing does not attempt recovery past
  /// the first syntax error since there is no meaningful "rest of the
  /// method" to keep compiling once the pattern is broken.
  pub fn parse(tokens: &'a TokenList<'a>) -> NodeResult<(AstArena, NodeIdx, MethodSignature)> {
    let mut parser = Parser { tokens, current_pos: 0, ast: AstArena::default(), errors: vec![] };

    let (method_idx, sig) = parser.parse_method()?;

    if !check_tok![parser, EOF] {
      return Err(parser.error_at_current("additional characters after end of method"));
    }

    Ok((parser.ast, method_idx, sig))
  }

  pub fn get_errors_list(&self) -> &[ErrorReport] {
    &self.errors
  }

  fn curr_tok(&self) -> &Token {
    &self.tokens[self.current_pos]
  }

  fn get_curr_tk(&self) -> &TokenKind {
    &self.curr_tok().kind
  }

  fn check(&self, tk: &TokenKind) -> bool {
    self.get_curr_tk().type_match(tk)
  }

  /// Lookahead of one token past the current one, without consuming
  /// anything. Used to tell an assignment target (`x :=`) apart from a
  /// plain variable reference.
  fn check_next(&self, tk: &TokenKind) -> bool {
    let next_pos = self.current_pos + 1;
    if next_pos >= self.tokens.tokens.len() {
      return false;
    }
    self.tokens.tokens[next_pos].kind.type_match(tk)
  }

  /// Whether the current token is a `BINARY_SELECTOR` whose lexeme is
  /// exactly `text`. Used to spot the `<`/`>` brackets of a
  /// `<primitive: n>` pragma, which the lexer has no dedicated tokens for
  /// -- they scan as ordinary one-character binary selectors.
  fn check_binary_lexeme(&self, text: &str) -> bool {
    self.check(&BINARY_SELECTOR) && self.tokens.lexeme(self.current_pos) == text
  }

  fn matches(&mut self, tk: &TokenKind) -> bool {
    if self.check(tk) {
      self.advance();
      true
    } else {
      false
    }
  }

  fn advance(&mut self) -> bool {
    if !self.check(&EOF) {
      self.current_pos += 1;
    }
    true
  }

  /// Consumes the current token only if it matches `tk`; otherwise reports
  /// `message` at the current position.
  fn consume(&mut self, tk: &TokenKind, message: &str) -> NodeResult<TokenIdx> {
    if self.check(tk) {
      let idx = self.current_pos;
      self.advance();
      return Ok(idx);
    }
    Err(self.error_at_current(message))
  }

  /// Consumes an identifier, returning its lexeme alongside its token index.
  fn consume_identifier(&mut self, message: &str) -> NodeResult<(String, TokenIdx)> {
    let idx = self.consume(&IDENTIFIER, message)?;
    Ok((self.tokens.lexeme(idx), idx))
  }

  fn emit(&mut self, node: AstNode) -> NodeIdx {
    self.ast.push(node)
  }

  fn error_at_current(&mut self, message: &str) -> ErrorReport {
    self.error_at_tok(self.current_pos, message)
  }

  fn error_at_tok(&mut self, tok_idx: TokenIdx, message: &str) -> ErrorReport {
    let lexeme = self.tokens.lexeme(tok_idx);
    let full = format!("{} (near '{}')", message, lexeme);
    let report = ErrorReport::new(tok_idx, full);
    self.errors.push(report.clone());
    report
  }
}

#[cfg(test)]
mod tests {
  use lexer::Lexer;

  use super::*;

  fn parse(src: &str) -> NodeResult<(AstArena, NodeIdx, MethodSignature)> {
    let chars: Vec<char> = src.chars().collect();
    let tokens = Lexer::lex(&chars);
    let list = TokenList::new(tokens, &chars);
    Parser::parse(&list)
  }

  #[test]
  fn parses_a_unary_pattern_and_a_return_statement() {
    let (ast, method, sig) = parse("foo ^ 42").unwrap();
    assert_eq!(sig.selector, "foo");
    assert!(sig.argument_names.is_empty());
    match ast.get(method) {
      AstNode::Method(m) => assert_eq!(m.statements.len(), 1),
      _ => panic!("expected a Method node"),
    }
  }

  #[test]
  fn parses_a_keyword_pattern_with_two_arguments() {
    let (_, _, sig) = parse("at: i put: v v").unwrap();
    assert_eq!(sig.selector, "at:put:");
    assert_eq!(sig.argument_names, vec!["i".to_string(), "v".to_string()]);
  }

  #[test]
  fn parses_a_binary_pattern() {
    let (_, _, sig) = parse("+ aNumber ^ self").unwrap();
    assert_eq!(sig.selector, "+");
    assert_eq!(sig.argument_names, vec!["aNumber".to_string()]);
  }

  #[test]
  fn parses_a_primitive_pragma() {
    let (ast, method, sig) = parse("foo <primitive: 61> ^ self").unwrap();
    assert_eq!(sig.primitive, 61);
    assert_eq!(ast_method(&ast, method).primitive, 61);
  }

  fn ast_method(ast: &AstArena, idx: NodeIdx) -> &MethodNode {
    match ast.get(idx) {
      AstNode::Method(m) => m,
      _ => panic!("expected a Method node"),
    }
  }

  #[test]
  fn parses_temporaries_and_an_assignment_chain() {
    let (ast, method, sig) = parse("foo | a b | a := b := 5").unwrap();
    assert_eq!(sig.temporary_names, vec!["a".to_string(), "b".to_string()]);
    let m = ast_method(&ast, method);
    match ast.get(m.statements[0]) {
      AstNode::Assign(assign) => assert_eq!(assign.variables.len(), 2),
      _ => panic!("expected an Assign node"),
    }
  }

  #[test]
  fn parses_a_unary_binary_and_keyword_send_by_precedence() {
    let (ast, method, _) = parse("foo ^ 3 factorial + 4 max: 10").unwrap();
    let m = ast_method(&ast, method);
    match ast.get(m.statements[0]) {
      AstNode::RetExp(expr) => match ast.get(*expr) {
        AstNode::Message(msg) => match ast.get(msg.selector) {
          AstNode::Symbol(s) => assert_eq!(s, "max:"),
          _ => panic!("expected a Symbol selector"),
        },
        _ => panic!("expected a Message node"),
      },
      _ => panic!("expected a RetExp"),
    }
  }

  #[test]
  fn parses_a_cascade_splitting_receiver_from_first_message() {
    let (ast, method, _) = parse("foo Transcript show: 'a'; show: 'b'").unwrap();
    let m = ast_method(&ast, method);
    match ast.get(m.statements[0]) {
      AstNode::Cascade(cascade) => {
        assert_eq!(cascade.messages.len(), 2);
        match ast.get(cascade.messages[0]) {
          AstNode::Message(msg) => assert!(msg.receiver.is_none()),
          _ => panic!("expected a Message node"),
        }
      }
      _ => panic!("expected a Cascade node"),
    }
  }

  #[test]
  fn parses_a_block_with_arguments_and_temporaries() {
    let (ast, method, _) = parse("foo ^ [:x | | t | t := x + 1. t]").unwrap();
    let m = ast_method(&ast, method);
    match ast.get(m.statements[0]) {
      AstNode::RetExp(expr) => match ast.get(*expr) {
        AstNode::Block(block) => {
          assert_eq!(block.arg_count, 1);
          assert_eq!(block.number_variables, 2);
          assert_eq!(block.statements.len(), 2);
        }
        _ => panic!("expected a Block node"),
      },
      _ => panic!("expected a RetExp"),
    }
  }

  #[test]
  fn parses_a_literal_array_with_nested_symbols_and_numbers() {
    let (ast, method, _) = parse("foo ^ #(1 2.5 'str' $c #sym at:put: (nested 1))").unwrap();
    let m = ast_method(&ast, method);
    match ast.get(m.statements[0]) {
      AstNode::RetExp(expr) => match ast.get(*expr) {
        AstNode::Array(elements) => assert_eq!(elements.len(), 7),
        _ => panic!("expected an Array node"),
      },
      _ => panic!("expected a RetExp"),
    }
  }

  #[test]
  fn super_send_flag_applies_only_to_the_first_message() {
    let (ast, method, _) = parse("foo ^ super printString size").unwrap();
    let m = ast_method(&ast, method);
    match ast.get(m.statements[0]) {
      AstNode::RetExp(expr) => match ast.get(*expr) {
        AstNode::Message(outer) => {
          assert!(!outer.super_flag, "the outer 'size' send is not a super-send");
          match ast.get(outer.receiver.unwrap()) {
            AstNode::Message(inner) => assert!(inner.super_flag, "the inner 'printString' send is a super-send"),
            _ => panic!("expected a Message node"),
          }
        }
        _ => panic!("expected a Message node"),
      },
      _ => panic!("expected a RetExp"),
    }
  }

  #[test]
  fn rejects_trailing_garbage_after_the_method_body() {
    assert!(parse("foo ^ 1 )").is_err());
  }
}
