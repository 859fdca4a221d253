// SPDX-License-Identifier: Apache-2.0 OR MIT
use lithos_envsubst::{Template, VariableMap};

use crate::error::Error;

/// Name to value lookup used while processing; `None` means "not found".
pub type Lookup<'a> = dyn Fn(&str) -> Option<String> + 'a;

/// Discovers and substitutes the placeholders of a raw artifact.
pub trait Processor {
    /// Discovered variable names, sorted.
    fn get_variables(&self, raw_artifact: &[u8]) -> Result<Vec<String>, Error>;

    /// Discovered variables mapped to their in-document default, `None` when
    /// the placeholder declares none.
    fn get_variable_map(&self, raw_artifact: &[u8]) -> Result<VariableMap, Error>;

    /// Discovered variables mapped to a default expression that the resolver
    /// expands. Processors that keep nested defaults return them here; the
    /// flat variable map is used otherwise.
    fn get_default_expressions(&self, raw_artifact: &[u8]) -> Result<VariableMap, Error> {
        self.get_variable_map(raw_artifact)
    }

    /// Substitutes every placeholder through `lookup`.
    ///
    /// Fails with [`Error::MissingVariables`] listing every variable that the
    /// lookup cannot find and that has no default; nothing is substituted in
    /// that case.
    fn process(&self, raw_artifact: &[u8], lookup: &Lookup<'_>) -> Result<Vec<u8>, Error>;
}

/// Default processor: accepts the legacy `${ NAME }` dialect and the strict
/// `${NAME:-default}` grammar of `lithos-envsubst`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleProcessor;

impl SimpleProcessor {
    pub fn new() -> Self {
        Self
    }

    fn parse(&self, raw_artifact: &[u8]) -> Result<Template, Error> {
        let source = std::str::from_utf8(raw_artifact).map_err(Error::Encoding)?;
        Ok(Template::parse_legacy("artifact", source)?)
    }
}

impl Processor for SimpleProcessor {
    fn get_variables(&self, raw_artifact: &[u8]) -> Result<Vec<String>, Error> {
        Ok(self.parse(raw_artifact)?.variable_names())
    }

    fn get_variable_map(&self, raw_artifact: &[u8]) -> Result<VariableMap, Error> {
        Ok(self.parse(raw_artifact)?.variables().to_variable_map())
    }

    fn get_default_expressions(&self, raw_artifact: &[u8]) -> Result<VariableMap, Error> {
        Ok(self.parse(raw_artifact)?.variables().to_expression_map())
    }

    fn process(&self, raw_artifact: &[u8], lookup: &Lookup<'_>) -> Result<Vec<u8>, Error> {
        let template = self.parse(raw_artifact)?;

        let missing: Vec<String> = template
            .variables()
            .iter()
            .filter(|(name, default)| default.is_empty() && lookup(*name).is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::missing(missing));
        }

        Ok(template.substitute(lookup).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const DOC: &[u8] = b"name: ${CLUSTER_NAME}\nns: ${NS:-default-ns}\n";

    #[test]
    fn lists_sorted_variables() {
        let processor = SimpleProcessor::new();
        let names = processor.get_variables(b"${b} ${ a } ${C:-c}").unwrap();
        assert_eq!(names, vec!["C", "a", "b"]);
    }

    #[test]
    fn variable_map_distinguishes_missing_defaults() {
        let map = SimpleProcessor.get_variable_map(DOC).unwrap();
        assert_eq!(map["CLUSTER_NAME"], None);
        assert_eq!(map["NS"].as_deref(), Some("default-ns"));
    }

    #[test]
    fn default_expressions_keep_nested_defaults() {
        let raw = b"url: ${URL:-http://${HOST:-localhost}:8080}\n";
        let expressions = SimpleProcessor.get_default_expressions(raw).unwrap();
        assert_eq!(
            expressions["URL"].as_deref(),
            Some("http://${HOST:-localhost}:8080")
        );
        let map = SimpleProcessor.get_variable_map(raw).unwrap();
        assert_eq!(map["URL"].as_deref(), Some("http://${HOST}:8080"));
    }

    #[test]
    fn reports_only_variables_without_default() {
        let err = SimpleProcessor.process(DOC, &|_| None).unwrap_err();
        assert_eq!(
            err.missing_variables(),
            Some(&["CLUSTER_NAME".to_string()][..])
        );
    }

    #[test]
    fn reports_all_missing_variables_sorted() {
        let err = SimpleProcessor
            .process(b"${Z} ${A} ${M:-m} ${A}", &|_| None)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "value for variables [A, Z] is not set. Please set the value using os environment variables or the env config file"
        );
    }

    #[test]
    fn substitutes_when_everything_resolves() {
        let values: HashMap<&str, &str> = [("CLUSTER_NAME", "prod")].into_iter().collect();
        let lookup = |name: &str| values.get(name).map(|value| value.to_string());
        let output = SimpleProcessor.process(DOC, &lookup).unwrap();
        assert_eq!(output, b"name: prod\nns: default-ns\n");
    }

    #[test]
    fn parse_errors_propagate() {
        let err = SimpleProcessor.process(b"${A", &|_| None).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        let err = SimpleProcessor.get_variables(b"${A B}").unwrap_err();
        assert!(err.to_string().contains("bad substitution"));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let err = SimpleProcessor.get_variables(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }
}
