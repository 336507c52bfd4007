use crate::Value;

/// One link of the `MiniTalk` system dictionary's association chain
/// (spec §4.6, `Heap::lookup_global`'s search list): each global binding
/// is a fresh `LinkedObj` chained onto `Heap`'s `globals_head`, `object`
/// pointing at the `Association` and `next` at the rest of the chain.
#[derive(Debug, Clone)]
pub struct LinkedObj {
  pub object: Value,
  pub next: Value,
}
