use crate::Value;

/// A `(key, value)` pair (spec §3, `Association`; GLOSSARY). Globals are
/// bound through associations rather than by raw value so that rebinding a
/// global is visible to every holder of the association, and so a
/// `CompiledMethod`'s selector/value pair can be handed to a class's method
/// dictionary as a single unit (spec §4.7 step 4).
#[derive(Debug, Clone)]
pub struct AssocObj {
  pub key: Value,
  pub value: Value,
}
