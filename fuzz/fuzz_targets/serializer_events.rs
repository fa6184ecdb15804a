#![no_main]
use finfo::{Attribute, EncoderConfig, QName, Serializer};
use libfuzzer_sys::fuzz_target;

const NAMES: [&str; 4] = ["a", "b", "long-name", "x"];
const TEXTS: [&str; 4] = ["", " ", "value", "some longer character content chunk that exceeds the table limit"];

fuzz_target!(|data: &[u8]| {
    // Jedes Byte ist ein Event; ungueltige Sequenzen duerfen fehlschlagen, nicht paniken.
    let config = EncoderConfig::default().attribute_value_size(0, 8).character_content_chunk_size(0, 8);
    let mut s = Serializer::new(Vec::new(), config);
    if s.start_document().is_err() {
        return;
    }
    for &op in data {
        let name = QName::local(NAMES[(op >> 2) as usize & 3]);
        let text = TEXTS[(op >> 4) as usize & 3];
        let _ = match op & 3 {
            0 => s.start_element(name, &[], &[]),
            1 => s.start_element(name, &[], &[Attribute::text(QName::local("v"), text)]),
            2 => s.characters(text),
            _ => s.end_element(),
        };
    }
    while s.depth() > 0 {
        let _ = s.end_element();
    }
    let _ = s.end_document();
});
