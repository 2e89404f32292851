//! Blob decoding and section framing.

use stream::{varu32_len, ByteReader, ByteWriter, StreamError};

use crate::error::{DecodeError, EncodeError, LimitKind, SectionFramingError, WireResult};
use crate::header::{BlobFlags, BlobHeader, HEADER_SIZE, MAGIC, VERSION};
use crate::limits::Limits;

/// Section tags for version 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
#[repr(u8)]
pub enum SectionTag {
    /// Shared name table referenced by every code object.
    Names = 1,
    /// The module code object, with nested function bodies.
    Code = 2,
}

impl SectionTag {
    /// Parses a section tag from a raw byte.
    pub fn parse(tag: u8) -> Result<Self, DecodeError> {
        match tag {
            1 => Ok(Self::Names),
            2 => Ok(Self::Code),
            _ => Err(DecodeError::UnknownSectionTag { tag }),
        }
    }
}

/// A section within a blob.
///
/// `offset` is the absolute position of `body` within the blob, so a loader
/// holding the whole blob can record spans and come back to them later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireSection<'a> {
    pub tag: SectionTag,
    pub offset: usize,
    pub body: &'a [u8],
}

/// A decoded blob: header plus section slices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireBlob<'a> {
    pub header: BlobHeader,
    pub sections: Vec<WireSection<'a>>,
}

impl<'a> WireBlob<'a> {
    /// Returns the first section with the given tag.
    #[must_use]
    pub fn section(&self, tag: SectionTag) -> Option<&WireSection<'a>> {
        self.sections.iter().find(|section| section.tag == tag)
    }
}

/// Decodes a blob into header + section slices.
pub fn decode_blob<'a>(buf: &'a [u8], limits: &Limits) -> WireResult<WireBlob<'a>> {
    if buf.len() < HEADER_SIZE {
        return Err(DecodeError::BlobTooSmall {
            actual: buf.len(),
            required: HEADER_SIZE,
        });
    }
    if buf.len() > limits.max_blob_bytes {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::BlobBytes,
            limit: limits.max_blob_bytes,
            actual: buf.len(),
        });
    }

    let header = decode_header(buf)?;

    let actual_payload_len = buf.len() - HEADER_SIZE;
    if header.payload_len as usize != actual_payload_len {
        return Err(DecodeError::PayloadLengthMismatch {
            header_len: header.payload_len,
            actual_len: actual_payload_len,
        });
    }

    let mut sections = decode_sections(&buf[HEADER_SIZE..], limits)?;
    for section in &mut sections {
        section.offset += HEADER_SIZE;
    }

    Ok(WireBlob { header, sections })
}

/// Decodes and validates the fixed-size header at the start of `buf`.
pub fn decode_header(buf: &[u8]) -> WireResult<BlobHeader> {
    let mut reader = ByteReader::new(buf);
    let too_small = |_: StreamError| DecodeError::BlobTooSmall {
        actual: buf.len(),
        required: HEADER_SIZE,
    };

    let magic = reader.read_u32().map_err(too_small)?;
    if magic != MAGIC {
        return Err(DecodeError::InvalidMagic { found: magic });
    }

    let version = reader.read_u16().map_err(too_small)?;
    if version != VERSION {
        return Err(DecodeError::UnsupportedVersion { found: version });
    }

    let flags_raw = reader.read_u16().map_err(too_small)?;
    let flags = BlobFlags::from_raw(flags_raw);
    if !flags.is_valid_v1() {
        return Err(DecodeError::InvalidFlags { flags: flags_raw });
    }

    let source_hash = reader.read_u64().map_err(too_small)?;
    let payload_len = reader.read_u32().map_err(too_small)?;

    Ok(BlobHeader {
        version,
        flags,
        source_hash,
        payload_len,
    })
}

/// Decodes sections from a payload buffer (no blob header).
///
/// Section offsets are relative to `payload`.
pub fn decode_sections<'a>(payload: &'a [u8], limits: &Limits) -> WireResult<Vec<WireSection<'a>>> {
    let mut reader = ByteReader::new(payload);
    let mut sections = Vec::new();

    while !reader.is_empty() {
        if sections.len() >= limits.max_sections {
            return Err(DecodeError::LimitsExceeded {
                kind: LimitKind::SectionCount,
                limit: limits.max_sections,
                actual: sections.len() + 1,
            });
        }

        let tag = reader.read_u8().map_err(framing_error)?;
        let len = reader.read_len().map_err(framing_error)?;

        if len > limits.max_section_len {
            return Err(DecodeError::LimitsExceeded {
                kind: LimitKind::SectionLength,
                limit: limits.max_section_len,
                actual: len,
            });
        }

        let offset = reader.position();
        let body = reader.read_bytes(len).map_err(|_| {
            DecodeError::SectionFraming(SectionFramingError::Truncated {
                needed: offset + len,
                available: payload.len(),
            })
        })?;

        let tag = SectionTag::parse(tag)?;
        sections.push(WireSection { tag, offset, body });
    }

    Ok(sections)
}

/// Appends an encoded blob header to `out`.
pub fn encode_header(header: &BlobHeader, out: &mut Vec<u8>) -> usize {
    out.extend_from_slice(&MAGIC.to_le_bytes());
    out.extend_from_slice(&header.version.to_le_bytes());
    out.extend_from_slice(&header.flags.raw().to_le_bytes());
    out.extend_from_slice(&header.source_hash.to_le_bytes());
    out.extend_from_slice(&header.payload_len.to_le_bytes());
    HEADER_SIZE
}

/// Appends a single framed section to `out`, returning the bytes written.
pub fn encode_section(tag: SectionTag, body: &[u8], out: &mut Vec<u8>) -> Result<usize, EncodeError> {
    let len_u32 = u32::try_from(body.len())
        .map_err(|_| EncodeError::LengthOverflow { length: body.len() })?;
    let needed = 1 + varu32_len(len_u32) + body.len();
    out.reserve(needed);

    let mut prefix = ByteWriter::with_capacity(needed - body.len());
    prefix.write_u8(tag as u8);
    prefix.write_varu32(len_u32);
    prefix.finish_into(out);
    out.extend_from_slice(body);
    Ok(needed)
}

fn framing_error(err: StreamError) -> DecodeError {
    match err {
        StreamError::UnexpectedEof {
            requested,
            available,
        } => DecodeError::SectionFraming(SectionFramingError::Truncated {
            needed: requested,
            available,
        }),
        _ => DecodeError::SectionFraming(SectionFramingError::InvalidVarint),
    }
}
