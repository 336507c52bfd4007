pub mod ast;
pub mod bytecode;
pub mod chunk;
pub mod errors;
pub mod tokens;

/// Maximum size, in bytes, of a single method's bytecode array.
/// Mirrors `MAX_CODE_SIZE` in the original MiniTalk compiler.
pub const MAX_CODE_SIZE: usize = 5000;

/// Maximum number of literals a single method's literal frame may hold.
/// Mirrors `MAX_LITERAL_SIZE` in the original MiniTalk compiler.
pub const MAX_LITERAL_SIZE: usize = 256;
