// SPDX-License-Identifier: Apache-2.0 OR MIT
use lithos_envsubst::VariableMap;

use crate::decode::{self, Decoder, Record, YamlDecoder};
use crate::error::Error;
use crate::overrides::Overrides;
use crate::processor::{Processor, SimpleProcessor};
use crate::resolver::Resolver;
use crate::telemetry;

/// Inputs for [`RenderedTemplate::new`].
#[derive(Clone, Copy)]
pub struct TemplateInput<'a> {
    pub raw_artifact: &'a [u8],
    pub overrides: &'a Overrides,
    pub processor: &'a dyn Processor,
    pub decoder: &'a dyn Decoder,
    pub target_namespace: &'a str,
    /// Only discover variables: skip the missing check, substitution and
    /// decoding.
    pub list_variables_only: bool,
    /// Set `metadata.namespace` on decoded namespaced records.
    pub apply_target_namespace: bool,
}

impl<'a> TemplateInput<'a> {
    /// Input using [`SimpleProcessor`] and [`YamlDecoder`], with no target
    /// namespace.
    pub fn new(raw_artifact: &'a [u8], overrides: &'a Overrides) -> Self {
        Self {
            raw_artifact,
            overrides,
            processor: &SimpleProcessor,
            decoder: &YamlDecoder,
            target_namespace: "",
            list_variables_only: false,
            apply_target_namespace: false,
        }
    }

    pub fn with_processor(mut self, processor: &'a dyn Processor) -> Self {
        self.processor = processor;
        self
    }

    pub fn with_decoder(mut self, decoder: &'a dyn Decoder) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_target_namespace(mut self, target_namespace: &'a str) -> Self {
        self.target_namespace = target_namespace;
        self
    }

    pub fn list_variables_only(mut self, enabled: bool) -> Self {
        self.list_variables_only = enabled;
        self
    }

    pub fn apply_target_namespace(mut self, enabled: bool) -> Self {
        self.apply_target_namespace = enabled;
        self
    }
}

/// Fully resolved manifest: variable metadata plus the decoded records.
///
/// Immutable once built; every record was decoded from text in which every
/// required placeholder had a value.
#[derive(Debug, Clone)]
pub struct RenderedTemplate {
    variables: Vec<String>,
    variable_map: VariableMap,
    target_namespace: String,
    records: Vec<Record>,
}

impl RenderedTemplate {
    /// Discovers variables, merges overrides, substitutes and decodes.
    ///
    /// Fails with [`Error::MissingVariables`] before anything is substituted
    /// when a variable has neither an override nor a default.
    pub fn new(input: TemplateInput<'_>) -> Result<Self, Error> {
        let result = Self::assemble(input);
        match &result {
            Ok(template) => telemetry::record_assembly(
                template.variables.len(),
                0,
                template.records.len(),
                true,
            ),
            Err(err) => telemetry::record_assembly(
                0,
                err.missing_variables().map_or(0, <[String]>::len),
                0,
                false,
            ),
        }
        result
    }

    fn assemble(input: TemplateInput<'_>) -> Result<Self, Error> {
        let variables = input.processor.get_variables(input.raw_artifact)?;
        let defaults = input.processor.get_variable_map(input.raw_artifact)?;
        let expressions = input.processor.get_default_expressions(input.raw_artifact)?;
        let resolver =
            Resolver::new(defaults, input.overrides).with_default_expressions(expressions);

        if input.list_variables_only {
            return Ok(Self {
                variables,
                variable_map: resolver.into_variable_map(),
                target_namespace: input.target_namespace.to_string(),
                records: Vec::new(),
            });
        }

        let processed = input
            .processor
            .process(input.raw_artifact, &|name| resolver.lookup(name))?;
        let mut records = input.decoder.decode(&processed)?;
        if input.apply_target_namespace {
            decode::apply_target_namespace(&mut records, input.target_namespace);
        }

        Ok(Self {
            variables,
            variable_map: resolver.into_variable_map(),
            target_namespace: input.target_namespace.to_string(),
            records,
        })
    }

    /// Discovered variable names, sorted.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Discovered defaults merged with the overrides.
    pub fn variable_map(&self) -> &VariableMap {
        &self.variable_map
    }

    pub fn target_namespace(&self) -> &str {
        &self.target_namespace
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}
