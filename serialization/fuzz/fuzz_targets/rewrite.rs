#![no_main]

use libfuzzer_sys::fuzz_target;

// Anything that decodes and re-encodes must decode again. Tagged leaves can
// nest one level deeper than their source, so the limit is relaxed.
fuzz_target!(|data: &[u8]| {
    let Ok(node) = modelcbor::ParseNode::new(data) else {
        return;
    };
    let mut writer = modelcbor::SerializationWriter::new();
    if node.write_to(&mut writer).is_ok() {
        let rewritten = writer.get_serialized_content().unwrap();
        let config = modelcbor::Config {
            max_recursion: 256,
            ..Default::default()
        };
        modelcbor::ParseNode::with_config(&rewritten, &config).unwrap();
    }
});
