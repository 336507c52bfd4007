use core::errors::CompileError;
use core::tokens::TokenList;
use lexer::Lexer;
use objects::gc::Heap;
use objects::roots::{CompilerRoots, RootSlot};
use objects::Value;
use parser::Parser;

mod assembler;
mod generator;
mod literal_materializer;

pub use assembler::MethodAssembly;
pub use generator::Generator;

/// Compiles one MiniTalk method's source text into a `CompiledMethod`
/// (spec §6.1's driver entry point). Lexes, parses, resolves variables
/// against `class`, generates bytecode, and assembles the resulting heap
/// objects, leaving `roots` cleared whether the compile succeeds or fails
/// (spec §5: no scratch root may outlive its own compile).
///
/// `last_value_needed` controls whether the method's final non-`^`
/// statement keeps its value on the stack before the implicit `^self`
/// (spec §4.5.2) -- interactive "doIt" evaluation wants the value; a
/// normal method install does not.
pub fn compile(
  source: &str,
  class: &analyzers::ClassDef,
  last_value_needed: bool,
  heap: &mut Heap,
  roots: &mut CompilerRoots,
) -> Result<MethodAssembly, CompileError> {
  let result = compile_inner(source, class, last_value_needed, heap, roots);
  roots.clear();
  result
}

fn compile_inner(
  source: &str,
  class: &analyzers::ClassDef,
  last_value_needed: bool,
  heap: &mut Heap,
  roots: &mut CompilerRoots,
) -> Result<MethodAssembly, CompileError> {
  roots.set(RootSlot::Class, Value::Object(class.class));

  let chars: Vec<char> = source.chars().collect();
  let tokens = Lexer::lex(&chars);
  let token_list = TokenList::new(tokens, &chars);

  let (mut ast, method_idx, sig) = Parser::parse(&token_list)?;
  let frame_size = analyzers::resolve_method(&mut ast, method_idx, class, &sig)?;

  let mut gen = Generator::new(&ast);
  gen.generate_method(method_idx, last_value_needed)?;

  let assembly = assembler::assemble(&ast, &sig, frame_size, gen, heap, roots)?;
  Ok(assembly)
}
