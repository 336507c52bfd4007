use core::errors::{CompileError, GenError};
use core::tokens::TokenList;
use lexer::Lexer;

/// Prints a compile error to stderr. For a `Source` error this re-lexes
/// `source` to recover the offending token's line and column and prints a
/// caret-under-token snippet, the same shape as
/// `examples/hinton-lang-Hinton/src/errors.rs`'s `report_runtime_error` --
/// `compile()` only hands back the token's bare index, not the token list
/// it came from, so the driver (which owns `source` for exactly this
/// reason) rebuilds it. `Generator` errors carry no token at all: they mean
/// a bug in this crate rather than bad input, so they print with no
/// snippet.
pub fn print_compile_error(source: &str, err: &CompileError) {
  match err {
    CompileError::Source(report) => {
      eprintln!("\x1b[31;1merror:\x1b[0m {}", report.message);

      let chars: Vec<char> = source.chars().collect();
      let tokens = Lexer::lex(&chars);
      let list = TokenList::new(tokens, &chars);

      if report.token < list.tokens.len() {
        let line = list.tokens[report.token].line;
        let col = list.col_start(report.token);
        let text = list.line_text(report.token);
        eprintln!("  {:>4} | {}", line, text);
        eprintln!("       | {}^", " ".repeat(col));
      }
    }
    CompileError::Generator(e) => print_generator_error(e),
  }
}

fn print_generator_error(e: &GenError) {
  eprintln!("\x1b[31;1minternal compiler error:\x1b[0m {}", e);
}
