//! Module encoding.

use std::collections::HashMap;
use std::rc::Rc;

use stream::ByteWriter;
use wire::{encode_header, encode_section, BlobHeader, SectionTag};

use crate::code::{CodeObject, Constant, CONST_CODE, CONST_INT, CONST_NONE};
use crate::error::CodecResult;
use crate::types::{CompiledBlob, Strategy};

/// Encodes a module code object tree into a blob.
///
/// The header records `strategy` as the preferred load strategy and
/// `source_hash` as provenance. Encoding is deterministic: the same tree
/// always produces the same bytes. Pending nested code is materialized on
/// the way.
pub fn encode_module(
    module: &CodeObject,
    strategy: Strategy,
    source_hash: u64,
) -> CodecResult<CompiledBlob> {
    let mut interner = Interner::default();
    let mut code = ByteWriter::new();
    encode_code(module, &mut interner, &mut code)?;
    let code = code.finish();

    let mut names = ByteWriter::new();
    names.write_len(interner.names.len())?;
    for name in &interner.names {
        names.write_str(name)?;
    }
    let names = names.finish();

    let mut payload = Vec::with_capacity(names.len() + code.len() + 10);
    encode_section(SectionTag::Names, &names, &mut payload)?;
    encode_section(SectionTag::Code, &code, &mut payload)?;

    let payload_len = u32::try_from(payload.len()).map_err(|_| wire::EncodeError::LengthOverflow {
        length: payload.len(),
    })?;
    let header = BlobHeader::new(strategy.flags(), source_hash, payload_len);
    let mut out = Vec::with_capacity(wire::HEADER_SIZE + payload.len());
    encode_header(&header, &mut out);
    out.extend_from_slice(&payload);

    Ok(CompiledBlob::new(out))
}

#[derive(Default)]
struct Interner {
    names: Vec<Rc<str>>,
    indices: HashMap<Rc<str>, u32>,
}

impl Interner {
    fn intern(&mut self, name: &Rc<str>) -> u32 {
        if let Some(&index) = self.indices.get(name) {
            return index;
        }
        let index = self.names.len() as u32;
        self.names.push(Rc::clone(name));
        self.indices.insert(Rc::clone(name), index);
        index
    }
}

fn encode_code(
    code: &CodeObject,
    interner: &mut Interner,
    writer: &mut ByteWriter,
) -> CodecResult<()> {
    writer.write_varu32(interner.intern(&code.name));
    writer.write_varu32(code.first_line);

    writer.write_len(code.consts.len())?;
    for constant in &code.consts {
        match constant {
            Constant::None => writer.write_u8(CONST_NONE),
            Constant::Int(value) => {
                writer.write_u8(CONST_INT);
                writer.write_vars64(*value);
            }
            Constant::Code(nested) => {
                let mut body = ByteWriter::new();
                encode_code(nested.get()?, interner, &mut body)?;
                writer.write_u8(CONST_CODE);
                writer.write_len_prefixed(&body.finish())?;
            }
        }
    }

    writer.write_len(code.names.len())?;
    for name in &code.names {
        writer.write_varu32(interner.intern(name));
    }
    writer.write_len(code.locals.len())?;
    for local in &code.locals {
        writer.write_varu32(interner.intern(local));
    }

    writer.write_len(code.code.len())?;
    for instr in &code.code {
        instr.write(writer);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{CodeRef, Instr};

    fn function(name: &str) -> CodeObject {
        let mut code = CodeObject::new(name, 2);
        code.consts.push(Constant::Int(0));
        code.code = vec![Instr::LoadConst(0), Instr::Return];
        code
    }

    #[test]
    fn encode_is_deterministic() {
        let mut module = CodeObject::new("<module>", 1);
        module.consts.push(Constant::Code(CodeRef::ready(function("f_0"))));
        module.consts.push(Constant::None);
        module.names.push(Rc::from("f_0"));
        module.code = vec![
            Instr::LoadConst(0),
            Instr::MakeFunction,
            Instr::StoreName(0),
            Instr::LoadConst(1),
            Instr::Return,
        ];

        let first = encode_module(&module, Strategy::Lazy, 7).unwrap();
        let second = encode_module(&module, Strategy::Lazy, 7).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn strategy_only_changes_header_flags() {
        let module = function("<module>");
        let eager = encode_module(&module, Strategy::Eager, 1).unwrap();
        let lazy = encode_module(&module, Strategy::Lazy, 1).unwrap();
        assert_eq!(eager.len(), lazy.len());
        assert_ne!(eager.as_bytes()[6..8], lazy.as_bytes()[6..8]);
        assert_eq!(eager.as_bytes()[8..], lazy.as_bytes()[8..]);
    }

    #[test]
    fn names_are_interned_once() {
        let mut interner = Interner::default();
        let a: Rc<str> = Rc::from("v_0");
        let b: Rc<str> = Rc::from("v_0");
        assert_eq!(interner.intern(&a), 0);
        assert_eq!(interner.intern(&Rc::from("v_1")), 1);
        assert_eq!(interner.intern(&b), 0);
        assert_eq!(interner.names.len(), 2);
    }
}
