use core::ast::{AssignNode, AstArena, AstNode, BlockNode, CascadeNode, MessageNode, NodeIdx, VarKind, VariableRef};
use core::bytecode::{OpCode, OP_EXTENDED, PUSHBLOCK_FRAME_BASE};
use core::chunk::Chunk;
use core::errors::GenError;
use core::MAX_LITERAL_SIZE;

/// Per-compile emitter state (spec §3 "Emitter state", §9's note to group
/// the source's module globals into an explicit context). One `Generator`
/// lives for exactly one `codeMethod` call.
pub struct Generator<'a> {
  ast: &'a AstArena,
  pub(crate) chunk: Chunk,
  pub(crate) literals: Vec<NodeIdx>,
  current_stack: i32,
  pub(crate) max_stack: i32,
}

impl<'a> Generator<'a> {
  pub fn new(ast: &'a AstArena) -> Self {
    Generator { ast, chunk: Chunk::default(), literals: Vec::new(), current_stack: 0, max_stack: 0 }
  }

  /// Generates the whole method body (spec §4.5.2) into this generator's
  /// buffer.
  pub fn generate_method(&mut self, method_idx: NodeIdx, last_value_needed: bool) -> Result<(), GenError> {
    let statements = match self.ast.get(method_idx) {
      AstNode::Method(method) => method.statements.clone(),
      _ => return Err(GenError::IllegalTreeNode),
    };
    self.code_method_body(&statements, last_value_needed)
  }

  fn update_stack(&mut self, delta: i32) -> Result<(), GenError> {
    self.current_stack += delta;
    if self.current_stack < 0 {
      return Err(GenError::StackUnderflow);
    }
    if self.current_stack > self.max_stack {
      self.max_stack = self.current_stack;
    }
    Ok(())
  }

  /// Bare opcode, no operand (spec §4.1/§4.4, the source's `code0`).
  fn code0(&mut self, op: OpCode, delta: i32) -> Result<(), GenError> {
    self.chunk.emit_byte(op.base_byte())?;
    self.update_stack(delta)
  }

  /// A single packed operand, short or extended form (the source's `code1`).
  fn code1(&mut self, op: OpCode, value: u8, delta: i32) -> Result<(), GenError> {
    self.emit_packed(op, value)?;
    self.update_stack(delta)
  }

  /// A packed operand plus a trailing plain parameter byte (`code2`): used
  /// by `SEND`/`SENDSUPER`'s selector index and `PUSHBLOCK`'s frame base.
  fn code2(&mut self, op: OpCode, value: u8, param: u8, delta: i32) -> Result<(), GenError> {
    self.emit_packed(op, value)?;
    self.chunk.emit_byte(param)?;
    self.update_stack(delta)
  }

  /// A bare opcode followed by a 16-bit big-endian offset (`code3`).
  /// Returns the address the offset was written at, for later patching.
  fn code3(&mut self, op: OpCode, offset: u16, delta: i32) -> Result<u16, GenError> {
    self.chunk.emit_byte(op.base_byte())?;
    let address = self.chunk.current_offset();
    self.chunk.emit_offset(offset)?;
    self.update_stack(delta)?;
    Ok(address)
  }

  fn emit_packed(&mut self, op: OpCode, value: u8) -> Result<(), GenError> {
    if value < 16 {
      self.chunk.emit_byte(op.base_byte() | value)
    } else {
      self.chunk.emit_byte(OP_EXTENDED | (op.base_byte() >> 4))?;
      self.chunk.emit_byte(value)
    }
  }

  /// Appends `node` to the literal table (spec §4.3).
  fn intern(&mut self, node: NodeIdx) -> Result<u8, GenError> {
    if self.literals.len() >= MAX_LITERAL_SIZE {
      return Err(GenError::LiteralTableFull);
    }
    self.literals.push(node);
    Ok((self.literals.len() - 1) as u8)
  }

  /// Loads a resolved variable's value onto the stack (spec §4.5,
  /// "Variable reference").
  fn code_load(&mut self, node: NodeIdx, var: &VariableRef) -> Result<(), GenError> {
    match var.kind {
      VarKind::SelfVar | VarKind::Super => self.code0(OpCode::PushSelf, 1),
      VarKind::Nil => self.code0(OpCode::PushNil, 1),
      VarKind::False => self.code0(OpCode::PushFalse, 1),
      VarKind::True => self.code0(OpCode::PushTrue, 1),
      VarKind::Instance(offset) => self.code1(OpCode::PushInst, offset, 1),
      VarKind::Argument(offset) | VarKind::Temporary(offset) => self.code1(OpCode::PushTemp, offset, 1),
      VarKind::Shared(_) => {
        let index = self.intern(node)?;
        self.code1(OpCode::PushAssoc, index, 1)
      }
    }
  }

  /// Pops the stack top into a resolved variable (spec §4.5,
  /// "Assignment"). Only instance/temporary/shared targets are storable;
  /// `self`/`super`/the pseudo-constants are not, matching the original's
  /// `codeStore` switch having no case for them.
  fn code_store(&mut self, node: NodeIdx, var: &VariableRef) -> Result<(), GenError> {
    match var.kind {
      VarKind::Instance(offset) => self.code1(OpCode::StoreInst, offset, -1),
      VarKind::Temporary(offset) => self.code1(OpCode::StoreTemp, offset, -1),
      VarKind::Shared(_) => {
        let index = self.intern(node)?;
        self.code1(OpCode::StoreAssoc, index, -1)
      }
      _ => Err(GenError::IllegalVariableStore),
    }
  }

  fn code_store_var_node(&mut self, idx: NodeIdx) -> Result<(), GenError> {
    let var = self.expect_variable(idx)?;
    self.code_store(idx, &var)
  }

  fn expect_variable(&self, idx: NodeIdx) -> Result<VariableRef, GenError> {
    match self.ast.get(idx) {
      AstNode::Variable(var) => Ok(var.clone()),
      _ => Err(GenError::IllegalTreeNode),
    }
  }

  /// The recursive heart (spec §4.5). `value_needed` controls whether the
  /// expression's result must remain on the stack once this call returns.
  pub fn code_expression(&mut self, idx: NodeIdx, value_needed: bool) -> Result<(), GenError> {
    let node = self.ast.get(idx).clone();
    match node {
      AstNode::Symbol(_) | AstNode::IntNum(_) | AstNode::FloNum(_) | AstNode::Str(_) | AstNode::CharCon(_) | AstNode::Array(_) => {
        if value_needed {
          let index = self.intern(idx)?;
          self.code1(OpCode::PushLtrl, index, 1)?;
        }
        Ok(())
      }
      AstNode::Variable(var) => {
        if value_needed {
          self.code_load(idx, &var)?;
        }
        Ok(())
      }
      AstNode::Block(block) => {
        // Unlike the other literal-bearing variants, a block literal is
        // always materialized (the VM has to build the closure regardless
        // of whether its value sticks around), so a discarded block still
        // gets its `PUSHBLOCK`/body pair and an explicit trailing `POP`,
        // mirroring the message-send discard convention (spec §8's
        // `foo [ :x | x + 1 ]` end-to-end example).
        self.code_block(block)?;
        if !value_needed {
          self.code0(OpCode::Pop, -1)?;
        }
        Ok(())
      }
      AstNode::Message(msg) => self.code_message(msg, value_needed),
      AstNode::Cascade(cascade) => self.code_cascade(cascade, value_needed),
      AstNode::Assign(assign) => self.code_assign(assign, value_needed),
      AstNode::Identifier(..) | AstNode::RetExp(_) | AstNode::Method(_) => Err(GenError::IllegalTreeNode),
    }
  }

  fn code_block(&mut self, block: BlockNode) -> Result<(), GenError> {
    self.code2(OpCode::PushBlock, block.number_variables, PUSHBLOCK_FRAME_BASE, 1)?;
    let patch_address = self.code3(OpCode::Jump, 0, 0)?;
    self.update_stack(block.number_variables as i32)?;

    for &var_idx in &block.variables {
      self.code_store_var_node(var_idx)?;
    }

    self.code_block_body(&block.statements)?;
    self.chunk.patch_offset(patch_address, self.chunk.current_offset());
    Ok(())
  }

  fn code_message(&mut self, msg: MessageNode, value_needed: bool) -> Result<(), GenError> {
    if let Some(receiver) = msg.receiver {
      self.code_expression(receiver, true)?;
    }
    for &arg in &msg.arguments {
      self.code_expression(arg, true)?;
    }
    let nargs = msg.arguments.len() as u8;
    let selector_index = self.intern(msg.selector)?;
    let op = if msg.super_flag { OpCode::SendSuper } else { OpCode::Send };
    self.code2(op, nargs, selector_index, -(nargs as i32))?;
    if !value_needed {
      self.code0(OpCode::Pop, -1)?;
    }
    Ok(())
  }

  fn code_cascade(&mut self, cascade: CascadeNode, value_needed: bool) -> Result<(), GenError> {
    self.code_expression(cascade.receiver, true)?;
    let (last, rest) = cascade.messages.split_last().expect("Cascade always carries at least one message");
    for &message in rest {
      self.code0(OpCode::Dup, 1)?;
      self.code_expression(message, false)?;
    }
    self.code_expression(*last, value_needed)
  }

  fn code_assign(&mut self, assign: AssignNode, value_needed: bool) -> Result<(), GenError> {
    self.code_expression(assign.expression, true)?;
    let (last, rest) = assign.variables.split_last().expect("Assign always carries at least one target");
    for &target in rest {
      self.code0(OpCode::Dup, 1)?;
      self.code_store_var_node(target)?;
    }
    if value_needed {
      self.code0(OpCode::Dup, 1)?;
    }
    self.code_store_var_node(*last)
  }

  /// Codes every statement but the last with `valueNeeded=false`, returning
  /// the last one (or `None` for an empty sequence), per spec §4.5.1/4.5.2's
  /// shared prefix discipline.
  fn code_statement_prefix(&mut self, statements: &[NodeIdx]) -> Result<Option<NodeIdx>, GenError> {
    let (last, rest) = match statements.split_last() {
      Some(split) => split,
      None => return Ok(None),
    };
    for &stmt in rest {
      self.code_expression(stmt, false)?;
    }
    Ok(Some(*last))
  }

  /// Statement sequence within a block (spec §4.5.1).
  fn code_block_body(&mut self, statements: &[NodeIdx]) -> Result<(), GenError> {
    match self.code_statement_prefix(statements)? {
      None => {
        self.code0(OpCode::PushNil, 1)?;
        self.code0(OpCode::RetBlock, -1)
      }
      Some(last) => match self.ast.get(last).clone() {
        AstNode::RetExp(inner) => {
          self.code_expression(inner, true)?;
          self.code0(OpCode::Ret, -1)
        }
        _ => {
          self.code_expression(last, true)?;
          self.code0(OpCode::RetBlock, -1)
        }
      },
    }
  }

  /// Method body (spec §4.5.2): same prefix discipline, always terminated
  /// by `RET`, and the last non-return statement's value is kept only when
  /// the caller (an interactive "doIt") asked for it.
  fn code_method_body(&mut self, statements: &[NodeIdx], last_value_needed: bool) -> Result<(), GenError> {
    match self.code_statement_prefix(statements)? {
      None => {
        self.code0(OpCode::PushSelf, 1)?;
        self.code0(OpCode::Ret, -1)
      }
      Some(last) => match self.ast.get(last).clone() {
        AstNode::RetExp(inner) => {
          self.code_expression(inner, true)?;
          self.code0(OpCode::Ret, -1)
        }
        _ if last_value_needed => {
          self.code_expression(last, true)?;
          self.code0(OpCode::Ret, -1)
        }
        _ => {
          self.code_expression(last, false)?;
          self.code0(OpCode::PushSelf, 1)?;
          self.code0(OpCode::Ret, -1)
        }
      },
    }
  }

  pub fn max_stack(&self) -> i32 {
    self.max_stack
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use core::ast::MethodNode;

  fn variable(arena: &mut AstArena, name: &str, kind: VarKind) -> NodeIdx {
    arena.push(AstNode::Variable(VariableRef { name: name.into(), kind }))
  }

  fn method(arena: &mut AstArena, statements: Vec<NodeIdx>) -> NodeIdx {
    let selector = arena.push(AstNode::Symbol("foo".into()));
    arena.push(AstNode::Method(MethodNode {
      selector,
      number_arguments: 0,
      number_temporaries: 0,
      primitive: -1,
      statements,
    }))
  }

  fn generate(arena: &AstArena, method_idx: NodeIdx, last_value_needed: bool) -> Generator<'_> {
    let mut gen = Generator::new(arena);
    gen.generate_method(method_idx, last_value_needed).unwrap();
    gen
  }

  /// `foo ^ 42` (spec §8).
  #[test]
  fn return_of_a_literal() {
    let mut arena = AstArena::default();
    let lit = arena.push(AstNode::IntNum(42));
    let ret = arena.push(AstNode::RetExp(lit));
    let m = method(&mut arena, vec![ret]);

    let gen = generate(&arena, m, false);
    assert_eq!(gen.chunk.bytes(), &[OpCode::PushLtrl.base_byte(), OpCode::Ret.base_byte()]);
    assert_eq!(gen.literals.len(), 1);
    assert_eq!(gen.max_stack(), 1);
  }

  /// `foo ^ self` (spec §8).
  #[test]
  fn return_of_self() {
    let mut arena = AstArena::default();
    let slf = variable(&mut arena, "self", VarKind::SelfVar);
    let ret = arena.push(AstNode::RetExp(slf));
    let m = method(&mut arena, vec![ret]);

    let gen = generate(&arena, m, false);
    assert_eq!(gen.chunk.bytes(), &[OpCode::PushSelf.base_byte(), OpCode::Ret.base_byte()]);
    assert!(gen.literals.is_empty());
    assert_eq!(gen.max_stack(), 1);
  }

  /// `foo x := 1. ^ x` with `x` at temp 0 (spec §8).
  #[test]
  fn assign_then_return_temporary() {
    let mut arena = AstArena::default();
    let one = arena.push(AstNode::IntNum(1));
    let target = variable(&mut arena, "x", VarKind::Temporary(0));
    let assign = arena.push(AstNode::Assign(AssignNode { variables: vec![target], expression: one }));
    let load = variable(&mut arena, "x", VarKind::Temporary(0));
    let ret = arena.push(AstNode::RetExp(load));
    let m = method(&mut arena, vec![assign, ret]);

    let gen = generate(&arena, m, false);
    assert_eq!(
      gen.chunk.bytes(),
      &[
        OpCode::PushLtrl.base_byte(),
        OpCode::StoreTemp.base_byte(),
        OpCode::PushTemp.base_byte(),
        OpCode::Ret.base_byte(),
      ]
    );
    assert_eq!(gen.max_stack(), 1);
  }

  /// `foo 3 + 4` with no explicit return (spec §8).
  #[test]
  fn discarded_send_falls_back_to_self_return() {
    let mut arena = AstArena::default();
    let three = arena.push(AstNode::IntNum(3));
    let four = arena.push(AstNode::IntNum(4));
    let plus = arena.push(AstNode::Symbol("+".into()));
    let send = arena.push(AstNode::Message(MessageNode {
      receiver: Some(three),
      selector: plus,
      arguments: vec![four],
      super_flag: false,
    }));
    let m = method(&mut arena, vec![send]);

    let gen = generate(&arena, m, false);
    assert_eq!(
      gen.chunk.bytes(),
      &[
        OpCode::PushLtrl.base_byte(),
        OpCode::PushLtrl.base_byte() | 1,
        OpCode::Send.base_byte() | 1,
        2,
        OpCode::Pop.base_byte(),
        OpCode::PushSelf.base_byte(),
        OpCode::Ret.base_byte(),
      ]
    );
    assert_eq!(gen.literals.len(), 3);
    assert_eq!(gen.max_stack(), 2);
  }

  /// `foo a := b := 5` with a=temp 0, b=temp 1, `lastValueNeeded=false` (spec §8).
  #[test]
  fn chained_assignment_discarded() {
    let mut arena = AstArena::default();
    let five = arena.push(AstNode::IntNum(5));
    let a = variable(&mut arena, "a", VarKind::Temporary(0));
    let b = variable(&mut arena, "b", VarKind::Temporary(1));
    let assign = arena.push(AstNode::Assign(AssignNode { variables: vec![a, b], expression: five }));
    let m = method(&mut arena, vec![assign]);

    let gen = generate(&arena, m, false);
    assert_eq!(
      gen.chunk.bytes(),
      &[
        OpCode::PushLtrl.base_byte(),
        OpCode::Dup.base_byte(),
        OpCode::StoreTemp.base_byte() | 1,
        OpCode::StoreTemp.base_byte(),
        OpCode::PushSelf.base_byte(),
        OpCode::Ret.base_byte(),
      ]
    );
  }

  /// `foo [ :x | x + 1 ]` with the block's value discarded at the top level,
  /// `x` bound at temp 0 (spec §8).
  #[test]
  fn block_literal_discarded_at_top_level() {
    let mut arena = AstArena::default();
    let arg = variable(&mut arena, "x", VarKind::Temporary(0));
    let load = variable(&mut arena, "x", VarKind::Temporary(0));
    let one = arena.push(AstNode::IntNum(1));
    let plus = arena.push(AstNode::Symbol("+".into()));
    let send = arena.push(AstNode::Message(MessageNode {
      receiver: Some(load),
      selector: plus,
      arguments: vec![one],
      super_flag: false,
    }));
    let block = arena.push(AstNode::Block(BlockNode {
      number_variables: 1,
      arg_count: 1,
      variables: vec![arg],
      statements: vec![send],
    }));
    let m = method(&mut arena, vec![block]);

    let gen = generate(&arena, m, false);
    let bytes = gen.chunk.bytes();
    assert_eq!(bytes[0], OpCode::PushBlock.base_byte() | 1);
    assert_eq!(bytes[1], PUSHBLOCK_FRAME_BASE);
    assert_eq!(bytes[2], OpCode::Jump.base_byte());
    let patch_target = u16::from_be_bytes([bytes[3], bytes[4]]);
    assert_eq!(bytes[5], OpCode::StoreTemp.base_byte());
    assert_eq!(&bytes[6..], &[
      OpCode::PushTemp.base_byte(),
      OpCode::PushLtrl.base_byte(),
      OpCode::Send.base_byte() | 1,
      0,
      OpCode::RetBlock.base_byte(),
      OpCode::Pop.base_byte(),
      OpCode::PushSelf.base_byte(),
      OpCode::Ret.base_byte(),
    ]);
    // the jump skips the inline body and lands exactly where the trailing
    // POP/PUSHSELF/RET begins (spec §8's `L:` label).
    assert_eq!(patch_target as usize, 11);
    assert_eq!(bytes[patch_target as usize], OpCode::Pop.base_byte());
  }

  /// Operand encoding (spec §8 property 4): values < 16 emit one byte,
  /// values >= 16 emit the extended two-byte form.
  #[test]
  fn operand_encoding_switches_to_extended_form_at_sixteen() {
    let mut arena = AstArena::default();
    let var = variable(&mut arena, "t", VarKind::Temporary(15));
    let load = arena.push(AstNode::RetExp(var));
    let m = method(&mut arena, vec![load]);
    let gen = generate(&arena, m, false);
    assert_eq!(gen.chunk.bytes(), &[OpCode::PushTemp.base_byte() | 15, OpCode::Ret.base_byte()]);

    let mut arena = AstArena::default();
    let var = variable(&mut arena, "t", VarKind::Temporary(16));
    let load = arena.push(AstNode::RetExp(var));
    let m = method(&mut arena, vec![load]);
    let gen = generate(&arena, m, false);
    assert_eq!(
      gen.chunk.bytes(),
      &[OP_EXTENDED | (OpCode::PushTemp.base_byte() >> 4), 16, OpCode::Ret.base_byte()]
    );
  }

  /// Empty method body: spec §4.5.2's "Empty statements" case.
  #[test]
  fn empty_method_pushes_self_and_returns() {
    let mut arena = AstArena::default();
    let m = method(&mut arena, vec![]);
    let gen = generate(&arena, m, false);
    assert_eq!(gen.chunk.bytes(), &[OpCode::PushSelf.base_byte(), OpCode::Ret.base_byte()]);
    assert_eq!(gen.max_stack(), 1);
  }

  /// Cascade: receiver pushed once, duplicated per intermediate message.
  #[test]
  fn cascade_dups_receiver_for_every_message_but_the_last() {
    let mut arena = AstArena::default();
    let recv = variable(&mut arena, "self", VarKind::SelfVar);
    let sel_a = arena.push(AstNode::Symbol("a".into()));
    let msg_a = arena.push(AstNode::Message(MessageNode { receiver: None, selector: sel_a, arguments: vec![], super_flag: false }));
    let sel_b = arena.push(AstNode::Symbol("b".into()));
    let msg_b = arena.push(AstNode::Message(MessageNode { receiver: None, selector: sel_b, arguments: vec![], super_flag: false }));
    let cascade = arena.push(AstNode::Cascade(CascadeNode { receiver: recv, messages: vec![msg_a, msg_b] }));
    let ret = arena.push(AstNode::RetExp(cascade));
    let m = method(&mut arena, vec![ret]);

    let gen = generate(&arena, m, false);
    assert_eq!(
      gen.chunk.bytes(),
      &[
        OpCode::PushSelf.base_byte(),
        OpCode::Dup.base_byte(),
        OpCode::Send.base_byte(),
        0,
        OpCode::Pop.base_byte(),
        OpCode::Send.base_byte(),
        1,
        OpCode::Ret.base_byte(),
      ]
    );
  }

  /// Stack never goes negative; an ill-formed store on a non-storable
  /// variable kind surfaces as a generator invariant error, not a panic.
  #[test]
  fn storing_into_self_is_an_illegal_variable_store() {
    let mut arena = AstArena::default();
    let one = arena.push(AstNode::IntNum(1));
    let target = variable(&mut arena, "self", VarKind::SelfVar);
    let assign = arena.push(AstNode::Assign(AssignNode { variables: vec![target], expression: one }));
    let m = method(&mut arena, vec![assign]);

    let mut gen = Generator::new(&arena);
    let err = gen.generate_method(m, false).unwrap_err();
    assert_eq!(err, GenError::IllegalVariableStore);
  }
}
