use core::ast::{AstArena, MethodSignature};
use core::errors::GenError;
use objects::gc::{GcId, Heap};
use objects::method_obj::CompiledMethodObj;
use objects::roots::{CompilerRoots, RootGuard, RootSlot};
use objects::Value;

use crate::generator::Generator;
use crate::literal_materializer::materialize_literal;

/// The four heap objects a finished compile hands back to the driver (spec
/// §4.7, §6.3): the method's bytecode and literal table, the
/// `CompiledMethod` itself, and the `Association` that binds it under its
/// selector in the class's method dictionary.
pub struct MethodAssembly {
  pub bytecodes: Value,
  pub literals: Value,
  pub method: GcId,
  pub association: GcId,
}

/// Builds the four objects above out of a finished `Generator`'s buffer and
/// literal table (spec §4.7's four steps), parking each as it's built.
///
/// `frame_size` is the resolver's final argument+temporary slot count
/// (`resolve_method`'s return value), not `sig.argument_names.len() +
/// sig.temporary_names.len()`: nested blocks claim further slots out of
/// the same shared frame (spec.md:80), so `frame_size` is the only count
/// that covers every `PUSHTEMP`/`STORETEMP` offset the generator actually
/// emitted. `sig`'s own argument count is still the method's calling
/// convention -- block arguments are bound by the generator's own
/// `codeStore` prologue, not by `SEND`'s argument count -- so
/// `numberArguments` stays `sig`'s count and `tempSize` absorbs the rest
/// of `frame_size`.
pub fn assemble(
  ast: &AstArena,
  sig: &MethodSignature,
  frame_size: u8,
  gen: Generator,
  heap: &mut Heap,
  roots: &mut CompilerRoots,
) -> Result<MethodAssembly, GenError> {
  let bytecodes = if gen.chunk.is_empty() {
    Value::Nil
  } else {
    Value::Object(heap.new_byte_array(gen.chunk.bytes().to_vec()))
  };
  let mut code_root = RootGuard::new(roots, RootSlot::Code, bytecodes);

  let mut literals_root = RootGuard::new(code_root.roots_mut(), RootSlot::Literals, Value::Nil);
  let literals = if gen.literals.is_empty() {
    Value::Nil
  } else {
    let array_id = heap.new_array(gen.literals.len());
    literals_root.set(Value::Object(array_id));
    for (i, &node) in gen.literals.iter().enumerate() {
      let value = materialize_literal(ast, node, heap, literals_root.roots_mut())?;
      heap.array_at_put(array_id, i, value);
    }
    Value::Object(array_id)
  };
  literals_root.set(literals);

  let selector = heap.new_symbol(sig.selector.clone());
  let number_arguments = sig.argument_names.len() as u8;
  let method_obj = CompiledMethodObj {
    selector,
    primitive: if sig.primitive == -1 { None } else { Some(sig.primitive) },
    number_arguments,
    temp_size: frame_size - number_arguments,
    stack_size: gen.max_stack() as u16,
    bytecodes,
    literals,
  };
  let method_id = heap.new_compiled_method(method_obj);
  let mut method_root = RootGuard::new(literals_root.roots_mut(), RootSlot::Method, Value::Object(method_id));

  let association_id = heap.new_association(selector, Value::Object(method_id));
  let _association_root = RootGuard::new(method_root.roots_mut(), RootSlot::Association, Value::Object(association_id));

  Ok(MethodAssembly { bytecodes, literals, method: method_id, association: association_id })
}
