use crate::Value;

/// The generator's scratch GC roots (spec §3, §5: `compilerLiteral`,
/// `compilerLiterals`, `compilerCode`, `compilerMethod`,
/// `compilerAssociation`, `compilerClass`). Every allocation the generator
/// performs must be reachable from one of these -- or from a chain whose
/// head is one of them -- so nothing partially built is lost between
/// allocations.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RootSlot {
  Literal,
  Literals,
  Code,
  Method,
  Association,
  Class,
}

#[derive(Default)]
pub struct CompilerRoots {
  literal: Value,
  literals: Value,
  code: Value,
  method: Value,
  association: Value,
  class: Value,
}

impl CompilerRoots {
  pub fn get(&self, slot: RootSlot) -> Value {
    match slot {
      RootSlot::Literal => self.literal,
      RootSlot::Literals => self.literals,
      RootSlot::Code => self.code,
      RootSlot::Method => self.method,
      RootSlot::Association => self.association,
      RootSlot::Class => self.class,
    }
  }

  pub fn set(&mut self, slot: RootSlot, value: Value) -> Value {
    let field = match slot {
      RootSlot::Literal => &mut self.literal,
      RootSlot::Literals => &mut self.literals,
      RootSlot::Code => &mut self.code,
      RootSlot::Method => &mut self.method,
      RootSlot::Association => &mut self.association,
      RootSlot::Class => &mut self.class,
    };
    std::mem::replace(field, value)
  }

  /// Clears every root back to nil. The driver calls this between compiles
  /// (spec §5) so a failed or finished compile doesn't retain dead objects.
  pub fn clear(&mut self) {
    *self = CompilerRoots::default();
  }
}

/// Parks `value` in `slot` for the lifetime of the guard, restoring
/// whatever was there before on drop. Spec §9's suggested fix for the
/// original's habit of setting a root field directly and trusting every
/// exit path to clear it again.
pub struct RootGuard<'a> {
  roots: &'a mut CompilerRoots,
  slot: RootSlot,
  prev: Value,
}

impl<'a> RootGuard<'a> {
  pub fn new(roots: &'a mut CompilerRoots, slot: RootSlot, value: Value) -> Self {
    let prev = roots.set(slot, value);
    RootGuard { roots, slot, prev }
  }

  pub fn get(&self) -> Value {
    self.roots.get(self.slot)
  }

  pub fn set(&mut self, value: Value) {
    self.roots.set(self.slot, value);
  }

  /// Reborrows the underlying root set, for a call site that needs a plain
  /// `&mut CompilerRoots` (e.g. to hand to a function that parks its own
  /// nested guard on a different slot) without releasing this guard's own
  /// slot early.
  pub fn roots_mut(&mut self) -> &mut CompilerRoots {
    self.roots
  }
}

impl Drop for RootGuard<'_> {
  fn drop(&mut self) {
    self.roots.set(self.slot, self.prev);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::gc::Heap;

  #[test]
  fn guard_restores_the_previous_occupant_on_drop() {
    let mut roots = CompilerRoots::default();
    let mut heap = Heap::default();
    let outer = heap.new_string("outer");
    roots.set(RootSlot::Literals, outer);

    {
      let inner = heap.new_string("inner");
      let guard = RootGuard::new(&mut roots, RootSlot::Literals, inner);
      assert_eq!(guard.get(), inner);
    }

    assert_eq!(roots.get(RootSlot::Literals), outer);
  }

  #[test]
  fn clear_resets_every_slot_to_nil() {
    let mut roots = CompilerRoots::default();
    let mut heap = Heap::default();
    roots.set(RootSlot::Class, heap.new_string("SomeClass"));
    roots.clear();
    assert_eq!(roots.get(RootSlot::Class), Value::Nil);
  }
}
