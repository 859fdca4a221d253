#![no_main]

use libfuzzer_sys::fuzz_target;
use lithos_envsubst::Template;

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        if let Ok(template) = Template::parse_legacy("fuzz-template", source) {
            let canonical = template.to_template_string();
            let reparsed = Template::parse_str("fuzz-template", &canonical)
                .expect("canonical form must parse");
            assert_eq!(reparsed.variable_names(), template.variable_names());
        }
    }
});
