use std::fmt::Write as FmtWrite;

use core::bytecode::{OpCode, OP_EXTENDED};
use objects::gc::{GcId, GcObject, Heap};
use objects::Value;

/// One decoded bytecode instruction: where it starts, which opcode it is,
/// and whichever operand(s) it carries -- the lead byte's packed nibble (or
/// extended byte), and `Send`/`SendSuper`/`PushBlock`'s trailing parameter
/// byte. Mirrors the generator's `code0`/`code1`/`code2`/`code3` quartet in
/// reverse (spec §4.4, §6.2).
struct Instr {
  offset: usize,
  op: OpCode,
  operand: Option<u32>,
  param: Option<u8>,
}

/// Walks `code` one instruction at a time.
fn decode(code: &[u8]) -> Vec<Instr> {
  let mut out = vec![];
  let mut ip = 0;

  while ip < code.len() {
    let start = ip;
    let lead = code[ip];

    // JUMP is the one fixed-width, non-packed opcode with an operand: a
    // bare lead byte followed by a 16-bit big-endian absolute offset.
    if lead == OpCode::Jump.base_byte() {
      let operand = u16::from_be_bytes([code[ip + 1], code[ip + 2]]) as u32;
      out.push(Instr { offset: start, op: OpCode::Jump, operand: Some(operand), param: None });
      ip += 3;
      continue;
    }

    if lead & 0xF0 == OP_EXTENDED {
      let family_base = (lead & 0x0F) << 4;
      let op = OpCode::from_base_byte(family_base).expect("malformed extended opcode byte");
      let operand = code[ip + 1] as u32;
      ip += 2;
      let param = if op.has_trailing_param() {
        let p = code[ip];
        ip += 1;
        Some(p)
      } else {
        None
      };
      out.push(Instr { offset: start, op, operand: Some(operand), param });
      continue;
    }

    match OpCode::from_base_byte(lead & 0xF0).filter(|op| op.is_parameterized()) {
      Some(op) => {
        let operand = (lead & 0x0F) as u32;
        ip += 1;
        let param = if op.has_trailing_param() {
          let p = code[ip];
          ip += 1;
          Some(p)
        } else {
          None
        };
        out.push(Instr { offset: start, op, operand: Some(operand), param });
      }
      None => {
        let op = OpCode::from_base_byte(lead).unwrap_or_else(|| panic!("unrecognized opcode byte {:#04x}", lead));
        ip += 1;
        out.push(Instr { offset: start, op, operand: None, param: None });
      }
    }
  }

  out
}

fn mnemonic(op: OpCode) -> &'static str {
  match op {
    OpCode::PushInst => "PUSH_INST",
    OpCode::PushTemp => "PUSH_TEMP",
    OpCode::PushLtrl => "PUSH_LTRL",
    OpCode::PushAssoc => "PUSH_ASSOC",
    OpCode::StoreInst => "STORE_INST",
    OpCode::StoreTemp => "STORE_TEMP",
    OpCode::StoreAssoc => "STORE_ASSOC",
    OpCode::Send => "SEND",
    OpCode::SendSuper => "SEND_SUPER",
    OpCode::PushBlock => "PUSH_BLOCK",
    OpCode::PushSelf => "PUSH_SELF",
    OpCode::PushNil => "PUSH_NIL",
    OpCode::PushFalse => "PUSH_FALSE",
    OpCode::PushTrue => "PUSH_TRUE",
    OpCode::Dup => "DUP",
    OpCode::Pop => "POP",
    OpCode::Ret => "RET",
    OpCode::RetBlock => "RET_BLOCK",
    OpCode::Jump => "JUMP",
  }
}

/// A trailing note for instructions whose operand indexes into the literal
/// table: the literal's plain-text value for `PUSH_LTRL`/`PUSH_ASSOC`, the
/// selector for `SEND`/`SEND_SUPER` (carried in the trailing param byte, not
/// the packed operand), and the absolute target for `JUMP`.
fn note(instr: &Instr, literals: &[Value], heap: &Heap) -> String {
  match instr.op {
    OpCode::PushLtrl | OpCode::PushAssoc | OpCode::StoreAssoc => match instr.operand {
      Some(idx) => match literals.get(idx as usize) {
        Some(v) => format!("--> {}", v.display_plain(heap)),
        None => String::new(),
      },
      None => String::new(),
    },
    OpCode::Send | OpCode::SendSuper => match instr.param {
      Some(idx) => match literals.get(idx as usize) {
        Some(v) => format!("--> {}", v.display_plain(heap)),
        None => String::new(),
      },
      None => String::new(),
    },
    OpCode::Jump => format!("--> {:05}", instr.operand.unwrap_or(0)),
    _ => String::new(),
  }
}

/// Column-aligned `[ip] NAME operand note` disassembly, adapted from
/// `PLV/src/disassembler.rs`'s `disassemble_fn` column layout.
fn disassemble(name: &str, bytecodes: &[u8], literals: &[Value], heap: &Heap) -> String {
  let mut out = String::new();
  writeln!(out, "{} ------------", name).unwrap();

  let instrs = decode(bytecodes);
  let max_name = instrs.iter().map(|i| mnemonic(i.op).len()).max().unwrap_or(0);

  for instr in &instrs {
    let operand_col = match (instr.operand, instr.param) {
      (Some(n), Some(p)) => format!("{} {}", n, p),
      (Some(n), None) => n.to_string(),
      (None, _) => String::new(),
    };
    writeln!(
      out,
      "{:05} {:w$} {:>5} {}",
      instr.offset,
      mnemonic(instr.op),
      operand_col,
      note(instr, literals, heap),
      w = max_name
    )
    .unwrap();
  }

  out
}

fn as_object(v: Value) -> Option<GcId> {
  match v {
    Value::Object(id) => Some(id),
    _ => None,
  }
}

/// Disassembles the `CompiledMethod` at `method`, reading its selector,
/// bytecodes, and literal table back out of `heap`.
pub fn disassemble_method(heap: &Heap, method: GcId) -> String {
  let m = match heap.get(method) {
    GcObject::CompiledMethod(m) => m.clone(),
    _ => panic!("disassemble_method given a non-CompiledMethod id"),
  };

  let name = match as_object(m.selector).map(|id| heap.get(id)) {
    Some(GcObject::Symbol(s)) => s.clone(),
    _ => "?".to_string(),
  };

  let bytecodes: Vec<u8> = match as_object(m.bytecodes).map(|id| heap.get(id)) {
    Some(GcObject::ByteArray(bytes)) => bytes.clone(),
    _ => vec![],
  };

  let literals: Vec<Value> = match as_object(m.literals).map(|id| heap.get(id)) {
    Some(GcObject::Array(a)) => a.0.clone(),
    _ => vec![],
  };

  disassemble(&name, &bytecodes, &literals, heap)
}
