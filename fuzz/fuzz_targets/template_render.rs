#![no_main]

use libfuzzer_sys::fuzz_target;
use lithos_manifest::{Overrides, Processor, Resolver, SimpleProcessor};
use once_cell::sync::Lazy;

static OVERRIDES: Lazy<Overrides> = Lazy::new(|| {
    [("A", "alpha"), ("B", "${A}"), ("EMPTY", "")]
        .into_iter()
        .collect()
});

fuzz_target!(|data: &[u8]| {
    let Ok(defaults) = SimpleProcessor.get_variable_map(data) else {
        return;
    };
    let Ok(expressions) = SimpleProcessor.get_default_expressions(data) else {
        return;
    };
    let resolver = Resolver::new(defaults, &OVERRIDES).with_default_expressions(expressions);
    let _ = SimpleProcessor.process(data, &|name| resolver.lookup(name));
});
