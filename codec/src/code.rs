//! Code-object model.

use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::rc::Rc;

use stream::{ByteReader, ByteWriter};

use crate::error::{CodecError, CodecResult};
use crate::limits::CodecLimits;
use crate::load::Decoder;
use crate::names::NameTable;
use crate::types::{CompiledBlob, Strategy};

/// A compiled unit: the module body or a function body.
#[derive(Debug, Clone)]
pub struct CodeObject {
    pub name: Rc<str>,
    pub first_line: u32,
    pub consts: Vec<Constant>,
    /// Global names referenced by `LoadName`/`StoreName`.
    pub names: Vec<Rc<str>>,
    /// Local slots referenced by `LoadFast`/`StoreFast`.
    pub locals: Vec<Rc<str>>,
    pub code: Vec<Instr>,
}

impl CodeObject {
    /// Creates an empty code object.
    #[must_use]
    pub fn new(name: &str, first_line: u32) -> Self {
        Self {
            name: Rc::from(name),
            first_line,
            consts: Vec::new(),
            names: Vec::new(),
            locals: Vec::new(),
            code: Vec::new(),
        }
    }

    /// Iterates over the nested code objects among the constants.
    pub fn nested(&self) -> impl Iterator<Item = &CodeRef> {
        self.consts.iter().filter_map(|constant| match constant {
            Constant::Code(code) => Some(code),
            _ => None,
        })
    }

    /// Checks that every instruction operand indexes into its table.
    pub fn validate(&self) -> CodecResult<()> {
        for instr in &self.code {
            let (operand, len) = match *instr {
                Instr::LoadConst(index) => (index, self.consts.len()),
                Instr::LoadName(index) | Instr::StoreName(index) => (index, self.names.len()),
                Instr::LoadFast(index) | Instr::StoreFast(index) => (index, self.locals.len()),
                _ => continue,
            };
            if operand as usize >= len {
                return Err(CodecError::OperandOutOfRange {
                    instr: instr.mnemonic(),
                    operand,
                    len,
                });
            }
        }
        Ok(())
    }
}

/// A constant stored in a code object.
#[derive(Debug, Clone)]
pub enum Constant {
    None,
    Int(i64),
    Code(CodeRef),
}

pub(crate) const CONST_NONE: u8 = 0;
pub(crate) const CONST_INT: u8 = 1;
pub(crate) const CONST_CODE: u8 = 2;

/// A stack-machine instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instr {
    /// Push `consts[i]`.
    LoadConst(u32),
    /// Push the global named `names[i]`.
    LoadName(u32),
    /// Pop into the global named `names[i]`.
    StoreName(u32),
    /// Push local slot `i`.
    LoadFast(u32),
    /// Pop into local slot `i`.
    StoreFast(u32),
    /// Pop two integers, push their sum.
    Add,
    /// Pop a code constant, push a function wrapping it.
    MakeFunction,
    /// Pop a function, call it with no arguments, push its result.
    Call,
    /// Discard the top of stack.
    Pop,
    /// Pop the return value and leave the frame.
    Return,
}

impl Instr {
    /// Returns the instruction name.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::LoadConst(_) => "LoadConst",
            Self::LoadName(_) => "LoadName",
            Self::StoreName(_) => "StoreName",
            Self::LoadFast(_) => "LoadFast",
            Self::StoreFast(_) => "StoreFast",
            Self::Add => "Add",
            Self::MakeFunction => "MakeFunction",
            Self::Call => "Call",
            Self::Pop => "Pop",
            Self::Return => "Return",
        }
    }

    pub(crate) const fn opcode(self) -> u8 {
        match self {
            Self::LoadConst(_) => 1,
            Self::LoadName(_) => 2,
            Self::StoreName(_) => 3,
            Self::LoadFast(_) => 4,
            Self::StoreFast(_) => 5,
            Self::Add => 6,
            Self::MakeFunction => 7,
            Self::Call => 8,
            Self::Pop => 9,
            Self::Return => 10,
        }
    }

    pub(crate) const fn operand(self) -> Option<u32> {
        match self {
            Self::LoadConst(i)
            | Self::LoadName(i)
            | Self::StoreName(i)
            | Self::LoadFast(i)
            | Self::StoreFast(i) => Some(i),
            _ => None,
        }
    }

    pub(crate) fn write(self, writer: &mut ByteWriter) {
        writer.write_u8(self.opcode());
        if let Some(operand) = self.operand() {
            writer.write_varu32(operand);
        }
    }

    /// Reads one instruction; `base` is the reader's offset within the blob.
    pub(crate) fn read(reader: &mut ByteReader<'_>, base: usize) -> CodecResult<Self> {
        let offset = base + reader.position();
        let opcode = reader.read_u8()?;
        let instr = match opcode {
            1 => Self::LoadConst(reader.read_varu32()?),
            2 => Self::LoadName(reader.read_varu32()?),
            3 => Self::StoreName(reader.read_varu32()?),
            4 => Self::LoadFast(reader.read_varu32()?),
            5 => Self::StoreFast(reader.read_varu32()?),
            6 => Self::Add,
            7 => Self::MakeFunction,
            8 => Self::Call,
            9 => Self::Pop,
            10 => Self::Return,
            _ => return Err(CodecError::UnknownOpcode { opcode, offset }),
        };
        Ok(instr)
    }
}

/// Shared handle to a nested code object.
///
/// A handle is either materialized or pending. A pending handle remembers
/// the blob span holding the encoded object and decodes it on the first
/// [`CodeRef::get`]. Clones share the same slot, so materialization happens
/// at most once per loaded module.
#[derive(Clone)]
pub struct CodeRef(Rc<CodeSlot>);

struct CodeSlot {
    code: OnceCell<CodeObject>,
    pending: RefCell<Option<PendingCode>>,
}

/// Everything needed to decode a deferred code object.
pub(crate) struct PendingCode {
    pub blob: CompiledBlob,
    pub start: usize,
    pub end: usize,
    pub names: Rc<NameTable>,
    pub limits: Rc<CodecLimits>,
    pub depth: usize,
}

impl CodeRef {
    /// Wraps an already materialized code object.
    #[must_use]
    pub fn ready(code: CodeObject) -> Self {
        Self(Rc::new(CodeSlot {
            code: OnceCell::from(code),
            pending: RefCell::new(None),
        }))
    }

    pub(crate) fn pending(pending: PendingCode) -> Self {
        Self(Rc::new(CodeSlot {
            code: OnceCell::new(),
            pending: RefCell::new(Some(pending)),
        }))
    }

    /// Returns `true` once the code object has been decoded.
    #[must_use]
    pub fn is_materialized(&self) -> bool {
        self.0.code.get().is_some()
    }

    /// Returns the code object, decoding it from the blob on first use.
    ///
    /// A successful decode releases the handle's reference to the blob.
    /// A failed decode leaves the handle pending.
    pub fn get(&self) -> CodecResult<&CodeObject> {
        if let Some(code) = self.0.code.get() {
            return Ok(code);
        }
        let decoded = {
            let pending = self.0.pending.borrow();
            let pending = pending.as_ref().ok_or(CodecError::DetachedCode)?;
            let decoder = Decoder {
                blob: &pending.blob,
                names: &pending.names,
                limits: &pending.limits,
                strategy: Strategy::Lazy,
            };
            decoder.decode_code(pending.start, pending.end, pending.depth)?
        };
        self.0.pending.replace(None);
        Ok(self.0.code.get_or_init(|| decoded))
    }
}

impl fmt::Debug for CodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.0.code.get() {
            return f.debug_tuple("CodeRef").field(&code.name).finish();
        }
        match self.0.pending.borrow().as_ref() {
            Some(pending) => write!(f, "CodeRef(pending {}..{})", pending.start, pending.end),
            None => f.write_str("CodeRef(detached)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CodeObject {
        let mut code = CodeObject::new("f_0", 3);
        code.consts.push(Constant::Int(0));
        code.locals.push(Rc::from("v_0"));
        code.names.push(Rc::from("v_1"));
        code.code = vec![
            Instr::LoadConst(0),
            Instr::LoadFast(0),
            Instr::Add,
            Instr::LoadName(0),
            Instr::Add,
            Instr::Return,
        ];
        code
    }

    #[test]
    fn validate_accepts_in_range_operands() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_const_index() {
        let mut code = sample();
        code.code.push(Instr::LoadConst(1));
        let err = code.validate().unwrap_err();
        assert_eq!(
            err,
            CodecError::OperandOutOfRange {
                instr: "LoadConst",
                operand: 1,
                len: 1,
            }
        );
    }

    #[test]
    fn validate_rejects_bad_local_index() {
        let mut code = sample();
        code.code.insert(0, Instr::StoreFast(3));
        assert!(matches!(
            code.validate(),
            Err(CodecError::OperandOutOfRange {
                instr: "StoreFast",
                ..
            })
        ));
    }

    #[test]
    fn instr_write_read_all_opcodes() {
        let all = [
            Instr::LoadConst(300),
            Instr::LoadName(1),
            Instr::StoreName(2),
            Instr::LoadFast(3),
            Instr::StoreFast(4),
            Instr::Add,
            Instr::MakeFunction,
            Instr::Call,
            Instr::Pop,
            Instr::Return,
        ];
        let mut writer = ByteWriter::new();
        for instr in all {
            instr.write(&mut writer);
        }
        let bytes = writer.finish();
        let mut reader = ByteReader::new(&bytes);
        for instr in all {
            assert_eq!(Instr::read(&mut reader, 0).unwrap(), instr);
        }
        assert!(reader.is_empty());
    }

    #[test]
    fn instr_read_unknown_opcode() {
        let mut reader = ByteReader::new(&[0x7F]);
        let err = Instr::read(&mut reader, 10).unwrap_err();
        assert_eq!(
            err,
            CodecError::UnknownOpcode {
                opcode: 0x7F,
                offset: 10
            }
        );
    }

    #[test]
    fn ready_ref_is_materialized() {
        let code = CodeRef::ready(sample());
        assert!(code.is_materialized());
        assert_eq!(&*code.get().unwrap().name, "f_0");
        assert_eq!(code.clone().get().unwrap().first_line, 3);
    }

    #[test]
    fn nested_lists_code_constants() {
        let mut module = CodeObject::new("<module>", 1);
        module.consts.push(Constant::Int(1));
        module.consts.push(Constant::Code(CodeRef::ready(sample())));
        module.consts.push(Constant::None);
        assert_eq!(module.nested().count(), 1);
    }
}
