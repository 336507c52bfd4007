use core::ast::{AstArena, AstNode, NodeIdx, VarKind};
use core::errors::GenError;
use objects::gc::Heap;
use objects::roots::{CompilerRoots, RootGuard, RootSlot};
use objects::Value;

/// Turns one literal-table entry's AST node into a heap value (spec §4.6).
/// Every allocation here is parked at `RootSlot::Literals` before the next
/// one runs, so a multi-step materialization (an array of arrays, say)
/// never leaves a half-built object unreachable; `RootGuard` restores the
/// slot's prior occupant automatically when a nested array's materializer
/// returns (on success or, via `?`, on the first error), matching the
/// original's discipline of resetting `compilerLiterals` around each
/// recursive call without trusting every exit path to do it by hand.
pub fn materialize_literal(
  ast: &AstArena,
  idx: NodeIdx,
  heap: &mut Heap,
  roots: &mut CompilerRoots,
) -> Result<Value, GenError> {
  match ast.get(idx) {
    AstNode::Symbol(name) => Ok(heap.new_symbol(name.clone())),
    AstNode::IntNum(n) => Ok(heap.new_small_integer(*n)),
    AstNode::FloNum(f) => Ok(heap.new_float(*f)),
    AstNode::Str(s) => Ok(heap.new_string(s.clone())),
    AstNode::CharCon(c) => Ok(heap.new_character(*c)),
    AstNode::Array(elements) => materialize_array(ast, elements, heap, roots),
    AstNode::Variable(var) => match &var.kind {
      VarKind::Shared(name) => Ok(heap.lookup_global(name).map(Value::Object).unwrap_or(Value::Nil)),
      _ => Err(GenError::IllegalLiteralNode),
    },
    _ => Err(GenError::IllegalLiteralNode),
  }
}

fn materialize_array(
  ast: &AstArena,
  elements: &[NodeIdx],
  heap: &mut Heap,
  roots: &mut CompilerRoots,
) -> Result<Value, GenError> {
  let array_id = heap.new_array(elements.len());
  let mut guard = RootGuard::new(roots, RootSlot::Literals, Value::Object(array_id));

  for (i, &element) in elements.iter().enumerate() {
    let value = materialize_literal(ast, element, heap, guard.roots_mut())?;
    guard.set(Value::Object(array_id));
    heap.array_at_put(array_id, i, value);
  }

  Ok(Value::Object(array_id))
}
