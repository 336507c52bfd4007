use crate::tokens::TokenIdx;

/// Index of a node in an `AstArena`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeIdx(pub usize);

impl From<usize> for NodeIdx {
  fn from(x: usize) -> Self {
    NodeIdx(x)
  }
}

/// The kind of a resolved variable reference (spec §3, `VariableRecord`).
/// Produced by the `analyzers` resolution pass; the generator only reads it.
#[derive(Debug, Clone, PartialEq)]
pub enum VarKind {
  SelfVar,
  Super,
  Nil,
  False,
  True,
  /// Instance variable, slot offset in the receiver.
  Instance(u8),
  /// Method/block argument, slot offset in the shared argument+temporary frame.
  Argument(u8),
  /// Method/block temporary, slot offset in the same shared frame.
  Temporary(u8),
  /// Reference to a global binding, resolved through an `Association` at
  /// materialization time. Carries the name for `lookup_global`.
  Shared(String),
}

/// A resolved variable reference. Mirrors the original's `Variable` struct:
/// non-owning by convention (the AST never constructs one; only the
/// resolver does, once per identifier occurrence).
#[derive(Debug, Clone, PartialEq)]
pub struct VariableRef {
  pub name: String,
  pub kind: VarKind,
}

/// A single element of a `Block`'s argument/temporary declaration list, or
/// of a cascade/assignment target list: always a `Variable` node index once
/// resolved.
pub type VarNodeIdx = NodeIdx;

/// One AST node. Mirrors spec §3's tagged-variant `AST node` exactly: every
/// case named there has a corresponding variant here, plus `Identifier`,
/// which exists only between parsing and resolution (the resolver replaces
/// every `Identifier` with a `Variable` before the generator ever sees the
/// tree).
#[derive(Debug, Clone)]
pub enum AstNode {
  Symbol(String),
  IntNum(i64),
  FloNum(f64),
  Str(String),
  CharCon(char),
  Array(Vec<NodeIdx>),

  /// An unresolved identifier reference. Never reaches the generator.
  Identifier(String, TokenIdx),
  Variable(VariableRef),

  Block(BlockNode),
  Message(MessageNode),
  Cascade(CascadeNode),
  Assign(AssignNode),
  RetExp(NodeIdx),
  Method(MethodNode),
}

#[derive(Debug, Clone)]
pub struct BlockNode {
  pub number_variables: u8,
  /// How many of `variables`' leading entries are block arguments (`:x`)
  /// rather than temporaries (`| t |`). Codegen doesn't care -- both kinds
  /// load/store through `PUSHTEMP`/`STORETEMP` -- but the resolver needs it
  /// to classify each one as `VarKind::Argument` vs `VarKind::Temporary`.
  pub arg_count: u8,
  /// Argument and temporary declarations, in declaration order. Each entry
  /// is a `Variable` node once resolved.
  pub variables: Vec<VarNodeIdx>,
  pub statements: Vec<NodeIdx>,
}

#[derive(Debug, Clone)]
pub struct MessageNode {
  /// `None` only for a message inside a `Cascade` (the receiver is already
  /// on the stack from the cascade's own receiver expression).
  pub receiver: Option<NodeIdx>,
  /// Index of the `Symbol` node naming the selector. Kept as a node (rather
  /// than a bare `String`) so it interns into the literal table like any
  /// other literal-bearing node.
  pub selector: NodeIdx,
  pub arguments: Vec<NodeIdx>,
  pub super_flag: bool,
}

#[derive(Debug, Clone)]
pub struct CascadeNode {
  pub receiver: NodeIdx,
  /// At least one message; every message here has `receiver: None`.
  pub messages: Vec<NodeIdx>,
}

#[derive(Debug, Clone)]
pub struct AssignNode {
  /// At least one target; `a := b := c` resolves to two entries.
  pub variables: Vec<VarNodeIdx>,
  pub expression: NodeIdx,
}

#[derive(Debug, Clone)]
pub struct MethodNode {
  pub selector: NodeIdx,
  pub number_arguments: u8,
  pub number_temporaries: u8,
  /// `-1` when no `<primitive: n>` pragma is present.
  pub primitive: i32,
  pub statements: Vec<NodeIdx>,
}

/// An arena of AST nodes for a single method compile. Owned by the driver
/// for the lifetime of the compile; the generator only ever borrows it.
#[derive(Default)]
pub struct AstArena {
  nodes: Vec<AstNode>,
}

impl AstArena {
  pub fn push(&mut self, node: AstNode) -> NodeIdx {
    self.nodes.push(node);
    NodeIdx(self.nodes.len() - 1)
  }

  pub fn get(&self, idx: NodeIdx) -> &AstNode {
    &self.nodes[idx.0]
  }

  pub fn get_mut(&mut self, idx: NodeIdx) -> &mut AstNode {
    &mut self.nodes[idx.0]
  }

  /// Replaces the node at `idx` in place. Used by the resolver to turn an
  /// `Identifier` into a `Variable` without disturbing any other node's
  /// `NodeIdx` (children reference nodes by index, not by pointer, so
  /// replacement never invalidates a sibling reference).
  pub fn replace(&mut self, idx: NodeIdx, node: AstNode) {
    self.nodes[idx.0] = node;
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }
}

/// A method's pattern and temporary declarations, carried alongside the
/// parsed tree rather than inside it: spec §3's `Method` node only records
/// the *counts* of arguments and temporaries, not their names, so the
/// parser hands these off separately for the resolution pass to bind.
#[derive(Debug, Clone, Default)]
pub struct MethodSignature {
  pub selector: String,
  pub argument_names: Vec<String>,
  pub temporary_names: Vec<String>,
  /// `-1` when no `<primitive: n>` pragma is present.
  pub primitive: i32,
}
