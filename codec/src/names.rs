//! The blob's interned identifier table.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use stream::ByteReader;

use crate::error::{CodecError, CodecResult, LimitKind};
use crate::limits::CodecLimits;
use crate::types::CompiledBlob;

/// Identifier table shared by every code object in a blob.
///
/// An eager table holds every decoded name. A lazy table only records where
/// each entry lives in the blob and decodes it on first access.
pub struct NameTable {
    entries: Entries,
}

enum Entries {
    Eager(Vec<Rc<str>>),
    Lazy {
        blob: CompiledBlob,
        spans: Vec<(usize, usize)>,
        cells: Vec<OnceCell<Rc<str>>>,
    },
}

impl NameTable {
    /// Decodes every entry of a names section body.
    pub(crate) fn decode_eager(body: &[u8], limits: &CodecLimits) -> CodecResult<Self> {
        let mut reader = ByteReader::new(body);
        let count = read_count(&mut reader, limits)?;
        let mut names = Vec::with_capacity(count);
        for index in 0..count {
            let name = reader
                .read_str()
                .map_err(|err| utf8_or_stream(err, index))?;
            names.push(Rc::from(name));
        }
        ensure_consumed(&reader)?;
        Ok(Self {
            entries: Entries::Eager(names),
        })
    }

    /// Records entry spans of a names section body starting at `offset` in `blob`.
    pub(crate) fn scan_lazy(
        blob: &CompiledBlob,
        body: &[u8],
        offset: usize,
        limits: &CodecLimits,
    ) -> CodecResult<Self> {
        let mut reader = ByteReader::new(body);
        let count = read_count(&mut reader, limits)?;
        let mut spans = Vec::with_capacity(count);
        for _ in 0..count {
            let len = reader.read_len()?;
            let start = offset + reader.position();
            reader.skip(len)?;
            spans.push((start, start + len));
        }
        ensure_consumed(&reader)?;
        Ok(Self {
            entries: Entries::Lazy {
                blob: blob.clone(),
                cells: (0..count).map(|_| OnceCell::new()).collect(),
                spans,
            },
        })
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.entries {
            Entries::Eager(names) => names.len(),
            Entries::Lazy { spans, .. } => spans.len(),
        }
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if entries are decoded on first access.
    #[must_use]
    pub const fn is_lazy(&self) -> bool {
        matches!(self.entries, Entries::Lazy { .. })
    }

    /// Returns how many entries have been decoded so far.
    #[must_use]
    pub fn decoded_count(&self) -> usize {
        match &self.entries {
            Entries::Eager(names) => names.len(),
            Entries::Lazy { cells, .. } => cells.iter().filter(|c| c.get().is_some()).count(),
        }
    }

    /// Returns the entry at `index`, decoding it if needed.
    pub fn get(&self, index: u32) -> CodecResult<Rc<str>> {
        let len = self.len();
        let out_of_range = || CodecError::NameOutOfRange { index, len };
        let slot = index as usize;
        match &self.entries {
            Entries::Eager(names) => names.get(slot).cloned().ok_or_else(out_of_range),
            Entries::Lazy { blob, spans, cells } => {
                let cell = cells.get(slot).ok_or_else(out_of_range)?;
                if let Some(name) = cell.get() {
                    return Ok(name.clone());
                }
                let &(start, end) = spans.get(slot).ok_or_else(out_of_range)?;
                let bytes = blob
                    .as_bytes()
                    .get(start..end)
                    .ok_or(CodecError::SpanOutOfRange {
                        start,
                        end,
                        len: blob.len(),
                    })?;
                let name = std::str::from_utf8(bytes)
                    .map_err(|_| CodecError::InvalidName { index })?;
                Ok(cell.get_or_init(|| Rc::from(name)).clone())
            }
        }
    }
}

impl fmt::Debug for NameTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameTable")
            .field("lazy", &self.is_lazy())
            .field("len", &self.len())
            .field("decoded", &self.decoded_count())
            .finish()
    }
}

fn read_count(reader: &mut ByteReader<'_>, limits: &CodecLimits) -> CodecResult<usize> {
    let count = reader.read_len()?;
    if count > limits.max_names {
        return Err(CodecError::LimitsExceeded {
            kind: LimitKind::Names,
            limit: limits.max_names,
            actual: count,
        });
    }
    Ok(count)
}

fn ensure_consumed(reader: &ByteReader<'_>) -> CodecResult<()> {
    if reader.is_empty() {
        Ok(())
    } else {
        Err(CodecError::TrailingSectionData {
            section: wire::SectionTag::Names,
            remaining: reader.remaining(),
        })
    }
}

fn utf8_or_stream(err: stream::StreamError, index: usize) -> CodecError {
    match err {
        stream::StreamError::InvalidUtf8 { .. } => CodecError::InvalidName {
            index: index as u32,
        },
        other => CodecError::Stream(other),
    }
}
