use crate::Value;

/// The VM-resident `CompiledMethod` object (spec §3, §6.3). `bytecodes` and
/// `literals` are `Value::Nil` when the method has no code or no literals
/// (spec §4.7 step 1-2), mirroring the `ByteArray or nil` / `Array or nil`
/// slot typing.
#[derive(Debug, Clone)]
pub struct CompiledMethodObj {
  pub selector: Value,
  /// `None` when the method carries no `<primitive: n>` pragma.
  pub primitive: Option<i32>,
  pub number_arguments: u8,
  pub temp_size: u8,
  pub stack_size: u16,
  pub bytecodes: Value,
  pub literals: Value,
}
