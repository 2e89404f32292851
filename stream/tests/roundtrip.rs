use stream::{ByteReader, ByteWriter, StreamError};

#[test]
fn nested_length_prefixed_body_can_be_skipped() {
    let mut inner = ByteWriter::new();
    inner.write_varu32(42);
    inner.write_str("f_1").unwrap();
    let inner = inner.finish();

    let mut outer = ByteWriter::new();
    outer.write_u8(2);
    outer.write_len_prefixed(&inner).unwrap();
    outer.write_u8(9);
    let bytes = outer.finish();

    let mut reader = ByteReader::new(&bytes);
    assert_eq!(reader.read_u8().unwrap(), 2);
    let len = reader.read_len().unwrap();
    let body_start = reader.position();
    reader.skip(len).unwrap();
    assert_eq!(reader.read_u8().unwrap(), 9);

    let mut body = ByteReader::new(&bytes[body_start..body_start + len]);
    assert_eq!(body.read_varu32().unwrap(), 42);
    assert_eq!(body.read_str().unwrap(), "f_1");
    assert!(body.is_empty());
}

#[test]
fn truncated_string_reports_eof() {
    let mut writer = ByteWriter::new();
    writer.write_str("return").unwrap();
    let mut bytes = writer.finish();
    bytes.truncate(4);

    let mut reader = ByteReader::new(&bytes);
    let err = reader.read_str().unwrap_err();
    assert_eq!(
        err,
        StreamError::UnexpectedEof {
            requested: 6,
            available: 3
        }
    );
}
