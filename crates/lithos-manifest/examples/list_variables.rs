// SPDX-License-Identifier: Apache-2.0 OR MIT
use std::env;

use lithos_envsubst::Template;
use lithos_manifest::source::{ArtifactSource, FileSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: list_variables <template.yaml>");
        return Ok(());
    };

    let raw = FileSource.read(&path)?;
    let template = Template::parse_legacy(&path, std::str::from_utf8(&raw)?)?;
    let analysis = template.analyze();

    for usage in &analysis.placeholders {
        println!(
            "{}{} @ {:?} (operator={:?})",
            "  ".repeat(usage.depth),
            usage.name,
            usage.span,
            usage.operator
        );
    }
    println!("required or defaulted: {:?}", template.variable_names());
    println!("only referenced from defaults: {:?}", analysis.nested_only);
    Ok(())
}
