//! Eager and lazy module loading.

use std::rc::Rc;

use stream::ByteReader;
use wire::{decode_blob, BlobHeader, SectionTag, WireSection};

use crate::code::{CodeObject, CodeRef, Constant, Instr, PendingCode};
use crate::code::{CONST_CODE, CONST_INT, CONST_NONE};
use crate::error::{CodecError, CodecResult, LimitKind};
use crate::limits::CodecLimits;
use crate::names::NameTable;
use crate::types::{CompiledBlob, LoadMode, Strategy};

/// A loaded module: the materialized module code plus its name table.
#[derive(Debug)]
pub struct Module {
    header: BlobHeader,
    strategy: Strategy,
    names: Rc<NameTable>,
    code: CodeObject,
}

impl Module {
    /// Returns the module-level code object.
    #[must_use]
    pub const fn code(&self) -> &CodeObject {
        &self.code
    }

    /// Returns the strategy this module was loaded with.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns the header of the blob this module was loaded from.
    #[must_use]
    pub const fn header(&self) -> &BlobHeader {
        &self.header
    }

    /// Returns the name table shared by all code objects of this module.
    #[must_use]
    pub fn names(&self) -> &NameTable {
        &self.names
    }

    /// Materializes every nested code object, returning how many exist.
    pub fn materialize_all(&self) -> CodecResult<usize> {
        let mut count = 0;
        let mut stack: Vec<&CodeObject> = vec![&self.code];
        while let Some(code) = stack.pop() {
            for nested in code.nested() {
                stack.push(nested.get()?);
                count += 1;
            }
        }
        Ok(count)
    }

    /// Counts nested code objects that are already materialized.
    ///
    /// Pending objects are not descended into, so nothing is decoded.
    #[must_use]
    pub fn materialized_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&CodeObject> = vec![&self.code];
        while let Some(code) = stack.pop() {
            for nested in code.nested() {
                if nested.is_materialized() {
                    count += 1;
                    if let Ok(inner) = nested.get() {
                        stack.push(inner);
                    }
                }
            }
        }
        count
    }
}

/// Loads a module from a blob.
///
/// `LoadMode::Default` follows the strategy hint in the blob header. The
/// module code object is always decoded immediately; under the lazy strategy
/// nested code objects and name table entries are decoded on first use.
pub fn load_module(
    blob: &CompiledBlob,
    mode: LoadMode,
    wire_limits: &wire::Limits,
    limits: &CodecLimits,
) -> CodecResult<Module> {
    let parsed = decode_blob(blob.as_bytes(), wire_limits)?;
    let strategy = mode.resolve(parsed.header.flags);

    let mut names_section = None;
    let mut code_section = None;
    for section in &parsed.sections {
        let slot = match section.tag {
            SectionTag::Names => &mut names_section,
            SectionTag::Code => &mut code_section,
            _ => continue,
        };
        if slot.is_some() {
            return Err(CodecError::DuplicateSection {
                section: section.tag,
            });
        }
        *slot = Some(*section);
    }
    let names_section: WireSection<'_> = names_section.ok_or(CodecError::MissingSection {
        section: SectionTag::Names,
    })?;
    let code_section: WireSection<'_> = code_section.ok_or(CodecError::MissingSection {
        section: SectionTag::Code,
    })?;

    let names = Rc::new(match strategy {
        Strategy::Eager => NameTable::decode_eager(names_section.body, limits)?,
        Strategy::Lazy => {
            NameTable::scan_lazy(blob, names_section.body, names_section.offset, limits)?
        }
    });
    let limits = Rc::new(limits.clone());

    let decoder = Decoder {
        blob,
        names: &names,
        limits: &limits,
        strategy,
    };
    let start = code_section.offset;
    let code = decoder.decode_code(start, start + code_section.body.len(), 0)?;

    Ok(Module {
        header: parsed.header,
        strategy,
        names,
        code,
    })
}

/// Decodes code objects out of one blob.
pub(crate) struct Decoder<'a> {
    pub blob: &'a CompiledBlob,
    pub names: &'a Rc<NameTable>,
    pub limits: &'a Rc<CodecLimits>,
    pub strategy: Strategy,
}

impl Decoder<'_> {
    /// Decodes the code object stored at `start..end` of the blob.
    pub fn decode_code(&self, start: usize, end: usize, depth: usize) -> CodecResult<CodeObject> {
        if depth > self.limits.max_depth {
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::Depth,
                limit: self.limits.max_depth,
                actual: depth,
            });
        }
        let bytes = self
            .blob
            .as_bytes()
            .get(start..end)
            .ok_or(CodecError::SpanOutOfRange {
                start,
                end,
                len: self.blob.len(),
            })?;
        let mut reader = ByteReader::new(bytes);

        let name = self.names.get(reader.read_varu32()?)?;
        let first_line = reader.read_varu32()?;

        let const_count = read_count(&mut reader, LimitKind::Consts, self.limits.max_consts)?;
        let mut consts = Vec::with_capacity(const_count);
        for _ in 0..const_count {
            consts.push(self.decode_const(&mut reader, start, depth)?);
        }

        let names = self.decode_name_list(&mut reader, LimitKind::Names, self.limits.max_names)?;
        let locals =
            self.decode_name_list(&mut reader, LimitKind::Locals, self.limits.max_locals)?;

        let instr_count = read_count(&mut reader, LimitKind::Instrs, self.limits.max_instrs)?;
        let mut code = Vec::with_capacity(instr_count);
        for _ in 0..instr_count {
            code.push(Instr::read(&mut reader, start)?);
        }

        if !reader.is_empty() {
            return Err(CodecError::TrailingCodeData {
                offset: start,
                remaining: reader.remaining(),
            });
        }

        let object = CodeObject {
            name,
            first_line,
            consts,
            names,
            locals,
            code,
        };
        object.validate()?;
        Ok(object)
    }

    fn decode_const(
        &self,
        reader: &mut ByteReader<'_>,
        base: usize,
        depth: usize,
    ) -> CodecResult<Constant> {
        let offset = base + reader.position();
        match reader.read_u8()? {
            CONST_NONE => Ok(Constant::None),
            CONST_INT => Ok(Constant::Int(reader.read_vars64()?)),
            CONST_CODE => {
                let len = reader.read_len()?;
                let start = base + reader.position();
                reader.skip(len)?;
                let end = start + len;
                let code = match self.strategy {
                    Strategy::Eager => CodeRef::ready(self.decode_code(start, end, depth + 1)?),
                    Strategy::Lazy => CodeRef::pending(PendingCode {
                        blob: self.blob.clone(),
                        start,
                        end,
                        names: Rc::clone(self.names),
                        limits: Rc::clone(self.limits),
                        depth: depth + 1,
                    }),
                };
                Ok(Constant::Code(code))
            }
            tag => Err(CodecError::UnknownConstTag { tag, offset }),
        }
    }

    fn decode_name_list(
        &self,
        reader: &mut ByteReader<'_>,
        kind: LimitKind,
        limit: usize,
    ) -> CodecResult<Vec<Rc<str>>> {
        let count = read_count(reader, kind, limit)?;
        let mut list = Vec::with_capacity(count);
        for _ in 0..count {
            list.push(self.names.get(reader.read_varu32()?)?);
        }
        Ok(list)
    }
}

fn read_count(reader: &mut ByteReader<'_>, kind: LimitKind, limit: usize) -> CodecResult<usize> {
    let count = reader.read_len()?;
    if count > limit {
        return Err(CodecError::LimitsExceeded {
            kind,
            limit,
            actual: count,
        });
    }
    Ok(count)
}
