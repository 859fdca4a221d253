// SPDX-License-Identifier: Apache-2.0 OR MIT
use lithos_manifest::{Overrides, RenderedTemplate, TemplateInput};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let raw = b"apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: ${ CLUSTER_NAME }-config\ndata:\n  endpoint: ${ENDPOINT:-https://${CLUSTER_NAME}.internal}\n";

    let listing = RenderedTemplate::new(
        TemplateInput::new(raw, &Overrides::new()).list_variables_only(true),
    )?;
    for (name, default) in listing.variable_map() {
        println!("variable {name} (default: {default:?})");
    }

    let overrides = Overrides::layered(
        Overrides::from_env(),
        [("CLUSTER_NAME", "prod")].into_iter().collect(),
    );
    let template = RenderedTemplate::new(
        TemplateInput::new(raw, &overrides)
            .with_target_namespace("cluster-manager")
            .apply_target_namespace(true),
    )?;

    for record in template.records() {
        println!("record: {}", serde_json::to_string_pretty(record)?);
    }
    Ok(())
}
