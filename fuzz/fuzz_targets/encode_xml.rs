#![no_main]
use finfo::EncoderConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Beliebige Bytes als XML: Fehler ok, Panics nicht.
    let mut serializer = finfo::Serializer::new(Vec::new(), EncoderConfig::default());
    if finfo::encode_xml(data, &mut serializer).is_ok() {
        let bytes = serializer.into_inner().unwrap();
        assert!(bytes.starts_with(&[0xE0, 0x00, 0x00, 0x01]));
    }
});
