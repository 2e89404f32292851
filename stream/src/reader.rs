//! Byte-level reader with bounded operations.

use crate::error::{StreamError, StreamResult};

const VARU32_MAX_BYTES: usize = 5;
const VARU64_MAX_BYTES: usize = 10;

/// A byte-level reader for decoding blob bodies.
///
/// All read operations are bounds-checked and return errors on failure.
/// The reader never panics on malformed input.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the number of bytes remaining to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> StreamResult<u8> {
        self.ensure(1)?;
        let value = self.data[self.pos];
        self.pos += 1;
        Ok(value)
    }

    /// Reads a little-endian `u16`.
    pub fn read_u16(&mut self) -> StreamResult<u16> {
        Ok(u16::from_le_bytes(self.read_array::<2>()?))
    }

    /// Reads a little-endian `u32`.
    pub fn read_u32(&mut self) -> StreamResult<u32> {
        Ok(u32::from_le_bytes(self.read_array::<4>()?))
    }

    /// Reads a little-endian `u64`.
    pub fn read_u64(&mut self) -> StreamResult<u64> {
        Ok(u64::from_le_bytes(self.read_array::<8>()?))
    }

    /// Reads an unsigned LEB128 varint `u32`.
    pub fn read_varu32(&mut self) -> StreamResult<u32> {
        let start = self.pos;
        let value = self.read_varint(VARU32_MAX_BYTES)?;
        u32::try_from(value).map_err(|_| {
            self.pos = start;
            StreamError::InvalidVarint { position: start }
        })
    }

    /// Reads an unsigned LEB128 varint `u64`.
    pub fn read_varu64(&mut self) -> StreamResult<u64> {
        self.read_varint(VARU64_MAX_BYTES)
    }

    /// Reads a zigzag-encoded varint `i64`.
    pub fn read_vars64(&mut self) -> StreamResult<i64> {
        let value = self.read_varu64()?;
        Ok(((value >> 1) as i64) ^ -((value & 1) as i64))
    }

    /// Reads a varint length prefix.
    pub fn read_len(&mut self) -> StreamResult<usize> {
        Ok(self.read_varu32()? as usize)
    }

    /// Reads `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> StreamResult<&'a [u8]> {
        self.ensure(len)?;
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Reads a length-prefixed byte slice.
    pub fn read_len_prefixed(&mut self) -> StreamResult<&'a [u8]> {
        let len = self.read_len()?;
        self.read_bytes(len)
    }

    /// Reads a length-prefixed UTF-8 string.
    ///
    /// On failure the position is left where the length prefix started.
    pub fn read_str(&mut self) -> StreamResult<&'a str> {
        let start = self.pos;
        let result = self.read_str_inner();
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    fn read_str_inner(&mut self) -> StreamResult<&'a str> {
        let len = self.read_len()?;
        let position = self.pos;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes).map_err(|_| StreamError::InvalidUtf8 { position })
    }

    /// Skips `len` bytes without inspecting them.
    pub fn skip(&mut self, len: usize) -> StreamResult<()> {
        self.ensure(len)?;
        self.pos += len;
        Ok(())
    }

    fn read_varint(&mut self, max_bytes: usize) -> StreamResult<u64> {
        let start = self.pos;
        let result = self.read_varint_inner(max_bytes, start);
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    fn read_varint_inner(&mut self, max_bytes: usize, start: usize) -> StreamResult<u64> {
        let mut result = 0u64;
        for index in 0..max_bytes {
            let byte = self.read_u8()?;
            let shift = index * 7;
            let chunk = u64::from(byte & 0x7F);
            if shift == 63 && chunk > 1 {
                return Err(StreamError::InvalidVarint { position: start });
            }
            result |= chunk << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
        Err(StreamError::InvalidVarint { position: start })
    }

    fn ensure(&self, bytes: usize) -> StreamResult<()> {
        let available = self.remaining();
        if bytes > available {
            return Err(StreamError::UnexpectedEof {
                requested: bytes,
                available,
            });
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> StreamResult<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reader() {
        let reader = ByteReader::new(&[]);
        assert!(reader.is_empty());
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn read_from_empty_fails() {
        let mut reader = ByteReader::new(&[]);
        let result = reader.read_u8();
        assert!(matches!(
            result,
            Err(StreamError::UnexpectedEof {
                requested: 1,
                available: 0
            })
        ));
    }

    #[test]
    fn read_u32_little_endian() {
        let mut reader = ByteReader::new(&[0x78, 0x56, 0x34, 0x12]);
        assert_eq!(reader.read_u32().unwrap(), 0x1234_5678);
        assert!(reader.is_empty());
    }

    #[test]
    fn read_u64_truncated() {
        let mut reader = ByteReader::new(&[0x01, 0x02, 0x03]);
        let err = reader.read_u64().unwrap_err();
        assert_eq!(
            err,
            StreamError::UnexpectedEof {
                requested: 8,
                available: 3
            }
        );
        assert_eq!(reader.position(), 0, "failed reads must not advance");
    }

    #[test]
    fn read_varu32() {
        let mut reader = ByteReader::new(&[0xAC, 0x02]);
        assert_eq!(reader.read_varu32().unwrap(), 300);
    }

    #[test]
    fn read_vars64() {
        let mut reader = ByteReader::new(&[0x01, 0x02]);
        assert_eq!(reader.read_vars64().unwrap(), -1);
        assert_eq!(reader.read_vars64().unwrap(), 1);
    }

    #[test]
    fn read_varu32_too_long() {
        let mut reader = ByteReader::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]);
        let err = reader.read_varu32().unwrap_err();
        assert!(matches!(err, StreamError::InvalidVarint { position: 0 }));
    }

    #[test]
    fn read_varu32_value_overflow() {
        // Five bytes, but the last carries bits above u32::MAX.
        let mut reader = ByteReader::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F]);
        let err = reader.read_varu32().unwrap_err();
        assert!(matches!(err, StreamError::InvalidVarint { .. }));
    }

    #[test]
    fn read_varu32_overflow_keeps_position() {
        let mut reader = ByteReader::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F, 0x05]);
        assert!(reader.read_varu32().is_err());
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_varu64().unwrap(), 0x7_FFFF_FFFF);
        assert_eq!(reader.read_u8().unwrap(), 0x05);
    }

    #[test]
    fn read_str_invalid_utf8_keeps_position() {
        let mut reader = ByteReader::new(&[0x00, 0x02, 0xC3, 0x28]);
        reader.skip(1).unwrap();
        let err = reader.read_str().unwrap_err();
        assert!(matches!(err, StreamError::InvalidUtf8 { position: 2 }));
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.read_len_prefixed().unwrap(), &[0xC3, 0x28]);
    }

    #[test]
    fn read_str_truncated_keeps_position() {
        let mut reader = ByteReader::new(&[0x05, b'a', b'b']);
        assert!(reader.read_str().is_err());
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn read_varu64_max() {
        let mut bytes = vec![0xFF; 9];
        bytes.push(0x01);
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_varu64().unwrap(), u64::MAX);
    }

    #[test]
    fn read_str_invalid_utf8() {
        let mut reader = ByteReader::new(&[2, 0xC3, 0x28]);
        let err = reader.read_str().unwrap_err();
        assert_eq!(err, StreamError::InvalidUtf8 { position: 1 });
    }

    #[test]
    fn skip_advances_and_checks_bounds() {
        let mut reader = ByteReader::new(&[1, 2, 3, 4]);
        reader.skip(3).unwrap();
        assert_eq!(reader.read_u8().unwrap(), 4);
        assert!(reader.skip(1).is_err());
    }
}
