#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(node) = modelcbor::ParseNode::new(data) {
        _ = format!("{node:?}");
        _ = modelcbor::infer_any_value(node.node());
    }
});
