use core::ast::{AstArena, AstNode, BlockNode, MethodSignature, NodeIdx, VarKind, VariableRef};
use core::errors::ErrorReport;

use crate::class_def::ClassDef;

/// Walks a parsed method tree and replaces every `Identifier` node with a
/// resolved `Variable` node (spec §6.1 steps 1 and 3: "initialize variable
/// scope from class" / "compute instance/argument/temporary offsets").
///
/// Lexical scoping is modeled as a flat, appendable stack searched from the
/// back, rather than a tree of per-block maps: instance variables and the
/// method's own arguments/temporaries are pushed once up front and never
/// popped; each nested block pushes its own declarations on entry and pops
/// them on exit, so an inner declaration naturally shadows an outer one of
/// the same name.
pub struct Resolver<'a> {
  ast: &'a mut AstArena,
  scope: Vec<(String, VarKind)>,
  next_slot: u8,
}

/// Resolves every variable reference in `method_idx`'s subtree. `class`
/// supplies the instance variable list; `sig` supplies the method's own
/// argument and temporary names (kept off the `Method` AST node itself,
/// per `MethodSignature`'s doc comment in `core::ast`).
///
/// Returns the final size of the shared argument+temporary frame: `sig`'s
/// own argument/temporary counts plus every block-local `:arg`/`| temp |`
/// declaration nested anywhere in the method, since `resolve_block` keeps
/// allocating fresh slots out of the same counter (spec.md's "arguments
/// and temporaries share a frame" rule). This is the count the method
/// assembler needs for `CompiledMethod`'s `tempSize` -- `sig`'s raw
/// name-list lengths alone don't cover slots a nested block claims.
pub fn resolve_method(
  ast: &mut AstArena,
  method_idx: NodeIdx,
  class: &ClassDef,
  sig: &MethodSignature,
) -> Result<u8, ErrorReport> {
  let mut resolver = Resolver { ast, scope: Vec::new(), next_slot: 0 };

  for (i, name) in class.instance_var_names.iter().enumerate() {
    resolver.scope.push((name.clone(), VarKind::Instance(i as u8)));
  }
  for name in &sig.argument_names {
    resolver.declare(name.clone(), |slot| VarKind::Argument(slot))?;
  }
  for name in &sig.temporary_names {
    resolver.declare(name.clone(), |slot| VarKind::Temporary(slot))?;
  }

  let statements = match ast_get(resolver.ast, method_idx) {
    AstNode::Method(method) => method.statements.clone(),
    _ => panic!("resolve_method called on a non-Method node"),
  };
  for stmt in statements {
    resolver.resolve_expr(stmt)?;
  }
  Ok(resolver.next_slot)
}

fn ast_get(ast: &AstArena, idx: NodeIdx) -> &AstNode {
  ast.get(idx)
}

impl<'a> Resolver<'a> {
  fn declare(&mut self, name: String, kind: impl FnOnce(u8) -> VarKind) -> Result<(), ErrorReport> {
    let slot = self.next_slot;
    self.next_slot =
      self.next_slot.checked_add(1).ok_or_else(|| ErrorReport::new(0, "too many arguments and temporaries"))?;
    self.scope.push((name, kind(slot)));
    Ok(())
  }

  fn classify(&self, name: &str) -> VarKind {
    match name {
      "self" => return VarKind::SelfVar,
      "super" => return VarKind::Super,
      "nil" => return VarKind::Nil,
      "true" => return VarKind::True,
      "false" => return VarKind::False,
      _ => {}
    }
    for (candidate, kind) in self.scope.iter().rev() {
      if candidate == name {
        return kind.clone();
      }
    }
    VarKind::Shared(name.to_string())
  }

  fn resolve_expr(&mut self, idx: NodeIdx) -> Result<(), ErrorReport> {
    let node = self.ast.get(idx).clone();
    match node {
      AstNode::Symbol(_)
      | AstNode::IntNum(_)
      | AstNode::FloNum(_)
      | AstNode::Str(_)
      | AstNode::CharCon(_)
      | AstNode::Variable(_) => Ok(()),
      AstNode::Array(elements) => {
        for element in elements {
          self.resolve_expr(element)?;
        }
        Ok(())
      }
      AstNode::Identifier(name, _) => {
        let kind = self.classify(&name);
        self.ast.replace(idx, AstNode::Variable(VariableRef { name, kind }));
        Ok(())
      }
      AstNode::Block(block) => self.resolve_block(block),
      AstNode::Message(msg) => {
        if let Some(receiver) = msg.receiver {
          self.resolve_expr(receiver)?;
        }
        for arg in msg.arguments {
          self.resolve_expr(arg)?;
        }
        Ok(())
      }
      AstNode::Cascade(cascade) => {
        self.resolve_expr(cascade.receiver)?;
        for message in cascade.messages {
          self.resolve_expr(message)?;
        }
        Ok(())
      }
      AstNode::Assign(assign) => {
        for target in &assign.variables {
          self.resolve_expr(*target)?;
        }
        self.resolve_expr(assign.expression)
      }
      AstNode::RetExp(inner) => self.resolve_expr(inner),
      AstNode::Method(_) => panic!("nested Method nodes do not occur"),
    }
  }

  fn resolve_block(&mut self, block: BlockNode) -> Result<(), ErrorReport> {
    let scope_mark = self.scope.len();

    for (i, &var_idx) in block.variables.iter().enumerate() {
      let name = match self.ast.get(var_idx) {
        AstNode::Identifier(name, _) => name.clone(),
        _ => continue,
      };
      let slot = self.next_slot;
      self.next_slot =
        self.next_slot.checked_add(1).ok_or_else(|| ErrorReport::new(0, "too many arguments and temporaries"))?;
      let kind = if (i as u8) < block.arg_count { VarKind::Argument(slot) } else { VarKind::Temporary(slot) };
      self.scope.push((name.clone(), kind.clone()));
      self.ast.replace(var_idx, AstNode::Variable(VariableRef { name, kind }));
    }

    for stmt in &block.statements {
      self.resolve_expr(*stmt)?;
    }

    self.scope.truncate(scope_mark);
    Ok(())
  }
}
