use std::{env, fs, process};

use analyzers::ClassDef;
use core::tokens::TokenList;
use lexer::Lexer;
use objects::gc::Heap;
use objects::roots::CompilerRoots;
use objects::Value;
use parser::Parser;

mod ast_dump;
mod disassemble;
mod report;

enum Input {
  File(String),
  Literal(String),
}

/// Parsed argv, in the spirit of `Hinton/src/main.rs`'s plain `env::args`
/// driver rather than a dedicated flag-parsing crate (no example repo in
/// the pack reaches for one for a single-binary compiler CLI).
struct Options {
  input: Input,
  class_name: String,
  ivars: Vec<String>,
  want_value: bool,
  dump_ast: bool,
  dump_vars: bool,
}

impl Default for Options {
  fn default() -> Self {
    Options {
      input: Input::File(String::new()),
      class_name: "Object".to_string(),
      ivars: vec![],
      want_value: false,
      dump_ast: false,
      dump_vars: false,
    }
  }
}

fn usage() -> &'static str {
  "usage: minitalkc [--want-value] [--class NAME] [--ivar NAME]... [--dump-ast] [--dump-vars] (FILE | -e SOURCE)"
}

fn parse_args(args: &[String]) -> Result<Options, String> {
  let mut options = Options::default();
  let mut input = None;
  let mut i = 0;

  while i < args.len() {
    match args[i].as_str() {
      "--want-value" => options.want_value = true,
      "--dump-ast" => options.dump_ast = true,
      "--dump-vars" => options.dump_vars = true,
      "--class" => {
        i += 1;
        options.class_name = args.get(i).ok_or("--class requires a class name")?.clone();
      }
      "--ivar" => {
        i += 1;
        options.ivars.push(args.get(i).ok_or("--ivar requires a variable name")?.clone());
      }
      "-e" => {
        i += 1;
        input = Some(Input::Literal(args.get(i).ok_or("-e requires a source string")?.clone()));
      }
      other if input.is_none() => input = Some(Input::File(other.to_string())),
      other => return Err(format!("unexpected argument '{}'\n{}", other, usage())),
    }
    i += 1;
  }

  options.input = input.ok_or_else(|| usage().to_string())?;
  Ok(options)
}

fn read_source(input: &Input) -> String {
  match input {
    Input::Literal(src) => src.clone(),
    Input::File(path) => fs::read_to_string(path).unwrap_or_else(|e| {
      eprintln!("could not read '{}': {}", path, e);
      process::exit(66);
    }),
  }
}

/// Runs the front end (lex, parse, resolve) a second time, purely to print
/// `--dump-ast`/`--dump-vars` output; `compile()` doesn't hand its
/// intermediate `AstArena` back out on success, and re-lexing a single
/// method body is cheap.
fn dump_front_end(source: &str, class: &ClassDef, options: &Options) {
  let chars: Vec<char> = source.chars().collect();
  let tokens = Lexer::lex(&chars);
  let token_list = TokenList::new(tokens, &chars);

  let (mut ast, method_idx, sig) = match Parser::parse(&token_list) {
    Ok(parsed) => parsed,
    Err(_) => return, // the real compile() below will report the same error
  };

  if options.dump_ast {
    println!("-- ast --");
    println!("{}", ast_dump::dump_ast(&ast, method_idx));
  }

  if options.dump_vars {
    if analyzers::resolve_method(&mut ast, method_idx, class, &sig).is_ok() {
      println!("-- resolved variables --");
      println!("{}", ast_dump::dump_ast(&ast, method_idx));
    }
  }
}

fn main() {
  let argv: Vec<String> = env::args().collect();
  let options = parse_args(&argv[1..]).unwrap_or_else(|msg| {
    eprintln!("{}", msg);
    process::exit(64);
  });

  let source = read_source(&options.input);

  let mut heap = Heap::default();
  let mut roots = CompilerRoots::default();
  let class_id = match heap.new_symbol(options.class_name.clone()) {
    Value::Object(id) => id,
    _ => unreachable!("new_symbol always returns Value::Object"),
  };
  let class = ClassDef::new(class_id, options.ivars.clone());

  if options.dump_ast || options.dump_vars {
    dump_front_end(&source, &class, &options);
  }

  match compiler::compile(&source, &class, options.want_value, &mut heap, &mut roots) {
    Ok(assembly) => println!("{}", disassemble::disassemble_method(&heap, assembly.method)),
    Err(err) => {
      report::print_compile_error(&source, &err);
      process::exit(65);
    }
  }
}
