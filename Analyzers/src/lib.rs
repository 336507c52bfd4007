pub mod class_def;
pub mod resolver;

pub use class_def::ClassDef;
pub use resolver::resolve_method;

#[cfg(test)]
mod tests {
  use core::ast::*;
  use core::tokens::TokenIdx;
  use objects::gc::Heap;

  use crate::{resolve_method, ClassDef};

  fn ident(ast: &mut AstArena, name: &str) -> NodeIdx {
    ast.push(AstNode::Identifier(name.to_string(), 0 as TokenIdx))
  }

  #[test]
  fn classifies_pseudo_variables_arguments_temporaries_and_instance_vars() {
    let mut ast = AstArena::default();
    let self_ref = ident(&mut ast, "self");
    let arg_ref = ident(&mut ast, "x");
    let temp_ref = ident(&mut ast, "t");
    let ivar_ref = ident(&mut ast, "size");
    let ret = ast.push(AstNode::RetExp(self_ref));

    let selector = ast.push(AstNode::Symbol("foo:".to_string()));
    let method = ast.push(AstNode::Method(MethodNode {
      selector,
      number_arguments: 1,
      number_temporaries: 1,
      primitive: -1,
      statements: vec![arg_ref, temp_ref, ivar_ref, ret],
    }));

    let sig = MethodSignature {
      selector: "foo:".to_string(),
      argument_names: vec!["x".to_string()],
      temporary_names: vec!["t".to_string()],
      primitive: -1,
    };
    let mut heap = Heap::default();
    let class_obj = heap.new_symbol("Point");
    let class = ClassDef::new(
      match class_obj {
        objects::Value::Object(id) => id,
        _ => unreachable!(),
      },
      vec!["size".to_string()],
    );

    let frame_size = resolve_method(&mut ast, method, &class, &sig).unwrap();

    assert!(matches!(ast.get(self_ref), AstNode::Variable(v) if v.kind == VarKind::SelfVar));
    assert!(matches!(ast.get(arg_ref), AstNode::Variable(v) if v.kind == VarKind::Argument(0)));
    assert!(matches!(ast.get(temp_ref), AstNode::Variable(v) if v.kind == VarKind::Temporary(1)));
    assert!(matches!(ast.get(ivar_ref), AstNode::Variable(v) if v.kind == VarKind::Instance(0)));
    // one argument slot + one temporary slot, no nested blocks
    assert_eq!(frame_size, 2);
  }

  #[test]
  fn unknown_names_resolve_to_shared() {
    let mut ast = AstArena::default();
    let global_ref = ident(&mut ast, "Transcript");
    let selector = ast.push(AstNode::Symbol("foo".to_string()));
    let method = ast.push(AstNode::Method(MethodNode {
      selector,
      number_arguments: 0,
      number_temporaries: 0,
      primitive: -1,
      statements: vec![global_ref],
    }));

    let sig = MethodSignature::default();
    let mut heap = Heap::default();
    let class_obj = heap.new_symbol("Object");
    let class = ClassDef::new(
      match class_obj {
        objects::Value::Object(id) => id,
        _ => unreachable!(),
      },
      vec![],
    );

    resolve_method(&mut ast, method, &class, &sig).unwrap();
    assert!(matches!(
      ast.get(global_ref),
      AstNode::Variable(VariableRef { kind: VarKind::Shared(name), .. }) if name == "Transcript"
    ));
  }

  #[test]
  fn block_locals_share_the_method_frame_and_shadow_outer_names() {
    let mut ast = AstArena::default();
    let block_arg = ast.push(AstNode::Identifier("x".to_string(), 0 as TokenIdx));
    let outer_temp_ref = ident(&mut ast, "x");
    let inner_use = ident(&mut ast, "x");

    let block = ast.push(AstNode::Block(BlockNode {
      number_variables: 1,
      arg_count: 1,
      variables: vec![block_arg],
      statements: vec![inner_use],
    }));

    let selector = ast.push(AstNode::Symbol("foo".to_string()));
    let method = ast.push(AstNode::Method(MethodNode {
      selector,
      number_arguments: 0,
      number_temporaries: 1,
      primitive: -1,
      statements: vec![outer_temp_ref, block],
    }));

    let sig = MethodSignature {
      selector: "foo".to_string(),
      argument_names: vec![],
      temporary_names: vec!["x".to_string()],
      primitive: -1,
    };
    let mut heap = Heap::default();
    let class_obj = heap.new_symbol("Object");
    let class = ClassDef::new(
      match class_obj {
        objects::Value::Object(id) => id,
        _ => unreachable!(),
      },
      vec![],
    );

    let frame_size = resolve_method(&mut ast, method, &class, &sig).unwrap();

    // outer `x` is method temporary 0
    assert!(matches!(ast.get(outer_temp_ref), AstNode::Variable(v) if v.kind == VarKind::Temporary(0)));
    // the block's own `x` argument takes the next free slot, 1, and shadows the outer one
    assert!(matches!(ast.get(block_arg), AstNode::Variable(v) if v.kind == VarKind::Argument(1)));
    assert!(matches!(ast.get(inner_use), AstNode::Variable(v) if v.kind == VarKind::Argument(1)));
    // the returned frame size covers the block's slot 1 too, not just `sig`'s
    // own one declared temporary -- this is what `assemble()` needs for
    // `tempSize` to actually cover every offset the generator emitted.
    assert_eq!(frame_size, 2);
  }
}
