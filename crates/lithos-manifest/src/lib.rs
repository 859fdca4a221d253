#![forbid(unsafe_code)]
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Renders parameterized manifests: discovers `${NAME}` placeholders, merges
//! caller overrides over in-document defaults, refuses to render while any
//! required variable is unset, and decodes the result into records.
//!
//! ```
//! use lithos_manifest::{Overrides, RenderedTemplate, TemplateInput};
//!
//! let overrides: Overrides = [("CLUSTER_NAME", "prod")].into_iter().collect();
//! let raw = b"name: ${CLUSTER_NAME}\nns: ${NS:-default-ns}\n";
//! let template = RenderedTemplate::new(TemplateInput::new(raw, &overrides))?;
//! assert_eq!(template.variables(), ["CLUSTER_NAME", "NS"]);
//! # Ok::<(), lithos_manifest::Error>(())
//! ```

mod decode;
mod error;
mod overrides;
mod processor;
mod resolver;
pub mod source;
pub mod telemetry;
mod template;

pub use decode::{apply_target_namespace, Decoder, Record, YamlDecoder};
pub use error::Error;
pub use lithos_envsubst::{normalize_legacy, VariableMap};
pub use overrides::Overrides;
pub use processor::{Lookup, Processor, SimpleProcessor};
pub use resolver::Resolver;
pub use source::{
    get_from_location, parse_env_lines, ArtifactSource, EnvFileSource, FileSource, OverrideSource,
};
pub use template::{RenderedTemplate, TemplateInput};
