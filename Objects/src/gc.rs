use crate::array_obj::ArrayObj;
use crate::assoc_obj::AssocObj;
use crate::linked_obj::LinkedObj;
use crate::method_obj::CompiledMethodObj;
use crate::str_obj::StrObj;
use crate::Value;

/// A heap-resident object. Mirrors the teacher's `GcObject` variant set,
/// trimmed to MiniTalk's literal/method universe (no functions, ranges,
/// or tuples -- there is no runtime here to make them meaningful).
#[derive(Debug, Clone)]
pub enum GcObject {
  Symbol(String),
  Str(StrObj),
  Array(ArrayObj),
  ByteArray(Vec<u8>),
  Association(AssocObj),
  CompiledMethod(CompiledMethodObj),
  LinkedObject(LinkedObj),
}

/// An index into the heap's object table. Stable across allocation: the
/// arena never moves a live object (spec §9's "cyclic references" note
/// explicitly permits this as an implementation choice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GcId(usize);

/// The VM's managed heap (spec §3's `machine`/object-memory collaborator).
/// A non-moving, `Vec`-backed arena with tombstone reuse, the same shape as
/// the teacher's `GarbageCollector`, renamed to match this crate's
/// narrower purpose: it only ever grows objects the generator builds, it
/// never runs a collection cycle (there is no mutator to collect after).
#[derive(Default)]
pub struct Heap {
  objects: Vec<Option<GcObject>>,
  tombstones: Vec<usize>,
  /// Head of the `MiniTalk` system dictionary's `LinkedObject` chain
  /// (spec §4.6). `Value::Nil` when empty.
  globals_head: Value,
}

impl Heap {
  /// Places `obj` in the first free slot (a tombstone, else a fresh one),
  /// returning a stable handle to it. Symbols are interned by name -- two
  /// `newSymbol` calls for the same text return the same `GcId`, matching
  /// a VM where symbols are always identity-comparable.
  pub fn push(&mut self, obj: GcObject) -> GcId {
    if let GcObject::Symbol(name) = &obj {
      if let Some(id) = self.find_symbol(name) {
        return id;
      }
    }
    if let Some(idx) = self.tombstones.pop() {
      self.objects[idx] = Some(obj);
      GcId(idx)
    } else {
      self.objects.push(Some(obj));
      GcId(self.objects.len() - 1)
    }
  }

  fn find_symbol(&self, name: &str) -> Option<GcId> {
    self
      .objects
      .iter()
      .position(|slot| matches!(slot, Some(GcObject::Symbol(n)) if n == name))
      .map(GcId)
  }

  pub fn get(&self, id: GcId) -> &GcObject {
    self.objects[id.0].as_ref().expect("GcId referenced a freed slot")
  }

  pub fn get_mut(&mut self, id: GcId) -> &mut GcObject {
    self.objects[id.0].as_mut().expect("GcId referenced a freed slot")
  }

  /// Frees the slot at `id`, making it eligible for reuse. The driver has
  /// no use for this today (this crate never collects a live method's
  /// objects), but it's kept as the natural dual of `push` for a
  /// non-moving arena and for tests that want to exercise tombstone reuse.
  pub fn free(&mut self, id: GcId) {
    self.objects[id.0] = None;
    self.tombstones.push(id.0);
  }

  pub fn new_symbol(&mut self, name: impl Into<String>) -> Value {
    Value::Object(self.push(GcObject::Symbol(name.into())))
  }

  pub fn new_string(&mut self, s: impl Into<String>) -> Value {
    Value::Object(self.push(GcObject::Str(StrObj(s.into()))))
  }

  pub fn new_small_integer(&self, n: i64) -> Value {
    Value::SmallInteger(n)
  }

  pub fn new_float(&self, f: f64) -> Value {
    Value::Float(f)
  }

  pub fn new_character(&self, c: char) -> Value {
    Value::Character(c)
  }

  /// Allocates an `Array` of `len` nil slots. The caller fills it in with
  /// `array_at_put` while the returned id is parked in a GC root (spec
  /// §4.6's recursive array materialization).
  pub fn new_array(&mut self, len: usize) -> GcId {
    self.push(GcObject::Array(ArrayObj::new(len)))
  }

  pub fn array_at_put(&mut self, id: GcId, index: usize, value: Value) {
    match self.get_mut(id) {
      GcObject::Array(array) => array.0[index] = value,
      _ => panic!("array_at_put on a non-Array object"),
    }
  }

  pub fn new_byte_array(&mut self, bytes: Vec<u8>) -> GcId {
    self.push(GcObject::ByteArray(bytes))
  }

  pub fn new_association(&mut self, key: Value, value: Value) -> GcId {
    self.push(GcObject::Association(AssocObj { key, value }))
  }

  pub fn new_compiled_method(&mut self, method: CompiledMethodObj) -> GcId {
    self.push(GcObject::CompiledMethod(method))
  }

  /// Binds `name` to `value` by chaining a fresh `Association` onto the
  /// system dictionary's `LinkedObject` chain. Returns the association's
  /// id, the same handle `lookup_global` later returns.
  pub fn define_global(&mut self, name: impl Into<String>, value: Value) -> GcId {
    let key = self.new_symbol(name);
    let assoc_id = self.new_association(key, value);
    let link_id =
      self.push(GcObject::LinkedObject(LinkedObj { object: Value::Object(assoc_id), next: self.globals_head }));
    self.globals_head = Value::Object(link_id);
    assoc_id
  }

  /// Linear scan over the association chain anchored at the system
  /// dictionary (spec §4.6, GLOSSARY's "Association"). Uses full-length
  /// key equality, not the original `lookupGlobal`'s prefix-length
  /// `strncmp` comparison (see DESIGN.md for why that's a bug worth
  /// fixing rather than preserving).
  pub fn lookup_global(&self, name: &str) -> Option<GcId> {
    let mut cursor = self.globals_head;
    loop {
      let link_id = match cursor {
        Value::Object(id) => id,
        _ => return None,
      };
      let link = match self.get(link_id) {
        GcObject::LinkedObject(link) => link,
        _ => return None,
      };
      if let Value::Object(assoc_id) = link.object {
        if let GcObject::Association(assoc) = self.get(assoc_id) {
          if let Value::Object(key_id) = assoc.key {
            if let GcObject::Symbol(key_name) = self.get(key_id) {
              if key_name == name {
                return Some(assoc_id);
              }
            }
          }
        }
      }
      cursor = link.next;
    }
  }
}
