// SPDX-License-Identifier: Apache-2.0 OR MIT
use lithos_envsubst::{DefaultOperator, Span, Template};

#[test]
fn analysis_reports_every_occurrence_with_spans() {
    let tmpl = Template::parse_str(
        "analysis",
        "image: ${REGISTRY:-docker.io}/${IMAGE}:${TAG-${VERSION}}\n",
    )
    .expect("parse template");

    let report = tmpl.analyze();
    let names: Vec<_> = report
        .placeholders
        .iter()
        .map(|usage| usage.name.as_str())
        .collect();
    assert_eq!(names, vec!["REGISTRY", "IMAGE", "TAG", "VERSION"]);

    let registry = &report.placeholders[0];
    assert_eq!(registry.span, Span::new(7, 29));
    assert_eq!(registry.operator, Some(DefaultOperator::UnsetOrEmpty));
    assert_eq!(registry.depth, 0);

    let version = &report.placeholders[3];
    assert_eq!(version.depth, 1);
    assert_eq!(report.nested_only, vec!["VERSION"]);
    assert_eq!(report.max_depth, 1);
}

#[test]
fn analysis_and_discovery_disagree_only_on_nested_names() {
    let tmpl = Template::parse_str("nested", "${A:-${B}} ${C}").expect("parse template");
    let report = tmpl.analyze();

    assert_eq!(tmpl.variable_names(), vec!["A", "C"]);
    assert_eq!(report.referenced, vec!["A", "B", "C"]);
    assert_eq!(report.nested_only, vec!["B"]);
}

#[test]
fn analysis_of_plain_text_is_empty() {
    let tmpl = Template::parse_str("plain", "kind: Namespace\n").expect("parse template");
    let report = tmpl.analyze();
    assert!(report.placeholders.is_empty());
    assert!(report.referenced.is_empty());
    assert_eq!(report.max_depth, 0);
}
