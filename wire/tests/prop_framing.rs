use proptest::prelude::*;
use wire::{
    decode_blob, encode_header, encode_section, BlobFlags, BlobHeader, Limits, SectionTag,
    HEADER_SIZE,
};

fn tag_strategy() -> impl Strategy<Value = SectionTag> {
    prop_oneof![Just(SectionTag::Names), Just(SectionTag::Code)]
}

proptest! {
    #[test]
    fn prop_sections_survive_framing(
        sections in prop::collection::vec(
            (tag_strategy(), prop::collection::vec(any::<u8>(), 0..400)),
            0..6,
        ),
        lazy in any::<bool>(),
        source_hash in any::<u64>(),
    ) {
        let mut payload = Vec::new();
        for (tag, body) in &sections {
            encode_section(*tag, body, &mut payload).unwrap();
        }
        let flags = if lazy { BlobFlags::lazy() } else { BlobFlags::eager() };
        let header = BlobHeader::new(flags, source_hash, payload.len() as u32);
        let mut buf = Vec::new();
        encode_header(&header, &mut buf);
        buf.extend_from_slice(&payload);

        let blob = decode_blob(&buf, &Limits::default()).unwrap();
        prop_assert_eq!(blob.header, header);
        prop_assert_eq!(blob.sections.len(), sections.len());
        for (decoded, (tag, body)) in blob.sections.iter().zip(&sections) {
            prop_assert_eq!(decoded.tag, *tag);
            prop_assert_eq!(decoded.body, body.as_slice());
            prop_assert!(decoded.offset >= HEADER_SIZE);
            prop_assert_eq!(&buf[decoded.offset..decoded.offset + body.len()], body.as_slice());
        }
    }

    #[test]
    fn prop_decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        let _ = decode_blob(&bytes, &Limits::for_testing());
    }
}
