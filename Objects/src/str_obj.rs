/// A MiniTalk `String` object: a mutable, heap-allocated run of characters.
/// Trimmed to what the literal materializer (spec §4.6) needs -- there is
/// no runtime string protocol in this crate, only construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrObj(pub String);

impl StrObj {
  pub fn display_plain(&self) -> String {
    format!("'{}'", self.0.replace('\'', "''"))
  }
}
