use crate::gc::Heap;
use crate::Value;

/// A MiniTalk `Array` object: a fixed-length, heap-allocated indexable
/// object. The literal materializer (spec §4.6) allocates one of the
/// declared length and fills it element-by-element; there is no runtime
/// indexing protocol in this crate.
#[derive(Debug, Clone)]
pub struct ArrayObj(pub Vec<Value>);

impl ArrayObj {
  pub fn new(len: usize) -> Self {
    ArrayObj(vec![Value::Nil; len])
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn display_plain(&self, heap: &Heap) -> String {
    let parts: Vec<String> = self.0.iter().map(|v| v.display_plain(heap)).collect();
    format!("({})", parts.join(" "))
  }
}
