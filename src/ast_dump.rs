use core::ast::{AstArena, AstNode, NodeIdx};

/// Renders the tree rooted at `idx` as indented text: the `--dump-ast`/
/// `--dump-vars` debug views' counterpart to `disassemble`'s bytecode view.
/// Grounded in the original `minitalk` compiler's unconditional
/// `showTree`/`showVariables` dumps (spec.md's `compiler.c`), gated here
/// behind explicit flags instead of always running. Run before resolution
/// it shows raw `Identifier` names; run after, it shows each one's resolved
/// `VarKind` and slot.
pub fn dump_ast(ast: &AstArena, idx: NodeIdx) -> String {
  let mut out = String::new();
  write_node(ast, idx, 0, &mut out);
  out
}

fn write_node(ast: &AstArena, idx: NodeIdx, depth: usize, out: &mut String) {
  out.push_str(&"  ".repeat(depth));
  match ast.get(idx) {
    AstNode::Symbol(s) => out.push_str(&format!("Symbol(#{})\n", s)),
    AstNode::IntNum(n) => out.push_str(&format!("IntNum({})\n", n)),
    AstNode::FloNum(f) => out.push_str(&format!("FloNum({})\n", f)),
    AstNode::Str(s) => out.push_str(&format!("Str({:?})\n", s)),
    AstNode::CharCon(c) => out.push_str(&format!("CharCon(${})\n", c)),
    AstNode::Array(elements) => {
      out.push_str("Array\n");
      for &e in elements {
        write_node(ast, e, depth + 1, out);
      }
    }
    AstNode::Identifier(name, _) => out.push_str(&format!("Identifier({})\n", name)),
    AstNode::Variable(var) => out.push_str(&format!("Variable({}, {:?})\n", var.name, var.kind)),
    AstNode::Block(block) => {
      out.push_str(&format!("Block(args={}, vars={})\n", block.arg_count, block.number_variables));
      for &stmt in &block.statements {
        write_node(ast, stmt, depth + 1, out);
      }
    }
    AstNode::Message(msg) => {
      out.push_str(&format!("Message(super={})\n", msg.super_flag));
      if let Some(receiver) = msg.receiver {
        write_node(ast, receiver, depth + 1, out);
      }
      write_node(ast, msg.selector, depth + 1, out);
      for &arg in &msg.arguments {
        write_node(ast, arg, depth + 1, out);
      }
    }
    AstNode::Cascade(cascade) => {
      out.push_str("Cascade\n");
      write_node(ast, cascade.receiver, depth + 1, out);
      for &message in &cascade.messages {
        write_node(ast, message, depth + 1, out);
      }
    }
    AstNode::Assign(assign) => {
      out.push_str("Assign\n");
      for &target in &assign.variables {
        write_node(ast, target, depth + 1, out);
      }
      write_node(ast, assign.expression, depth + 1, out);
    }
    AstNode::RetExp(expr) => {
      out.push_str("RetExp\n");
      write_node(ast, *expr, depth + 1, out);
    }
    AstNode::Method(method) => {
      out.push_str(&format!(
        "Method(args={}, temps={}, primitive={})\n",
        method.number_arguments, method.number_temporaries, method.primitive
      ));
      for &stmt in &method.statements {
        write_node(ast, stmt, depth + 1, out);
      }
    }
  }
}
