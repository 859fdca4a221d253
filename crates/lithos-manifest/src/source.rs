// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Collaborators that fetch raw artifacts and override values.

use std::fs;
use std::io;

use crate::error::Error;
use crate::overrides::Overrides;
use crate::template::{RenderedTemplate, TemplateInput};

/// Reads raw artifact bytes from a location.
pub trait ArtifactSource {
    fn read(&self, location: &str) -> io::Result<Vec<u8>>;
}

/// Loads override values from a location.
pub trait OverrideSource {
    fn load(&self, location: &str) -> io::Result<Overrides>;
}

/// Treats locations as local file paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl ArtifactSource for FileSource {
    fn read(&self, location: &str) -> io::Result<Vec<u8>> {
        fs::read(location)
    }
}

/// Reads `key=value` files from local paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvFileSource;

impl OverrideSource for EnvFileSource {
    fn load(&self, location: &str) -> io::Result<Overrides> {
        let content = fs::read_to_string(location)?;
        Ok(parse_env_lines(&content))
    }
}

/// Parses line-oriented `key=value` text.
///
/// Blank lines and lines starting with `#` are ignored, the first `=` splits
/// key from value, and both sides are trimmed. Lines without `=` are skipped.
/// A later line for the same key replaces an earlier one.
pub fn parse_env_lines(content: &str) -> Overrides {
    content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .collect()
}

/// Loads the artifact and overrides from their locations and assembles the
/// rendered template.
///
/// Both locations must be non-empty. Read failures carry the location that
/// failed, and failures while rendering are wrapped with the artifact
/// location.
pub fn get_from_location(
    artifacts: &dyn ArtifactSource,
    location: &str,
    target_namespace: &str,
    overrides: &dyn OverrideSource,
    env_location: &str,
) -> Result<RenderedTemplate, Error> {
    if location.is_empty() {
        return Err(Error::InvalidInput(
            "missing template location".to_string(),
        ));
    }
    let raw_artifact = artifacts
        .read(location)
        .map_err(|err| Error::read(location, err))?;

    if env_location.is_empty() {
        return Err(Error::InvalidInput(
            "missing override source location".to_string(),
        ));
    }
    let env = overrides
        .load(env_location)
        .map_err(|err| Error::read(env_location, err))?;

    let input = TemplateInput::new(&raw_artifact, &env).with_target_namespace(target_namespace);
    RenderedTemplate::new(input).map_err(|err| Error::Template {
        location: location.to_string(),
        source: Box::new(err),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_lines() {
        let overrides = parse_env_lines(
            "# comment\n\nCLUSTER_NAME = prod\nURL=https://x?a=b\n  \nnot a pair\nEMPTY=\n",
        );
        assert_eq!(overrides.get("CLUSTER_NAME"), Some("prod"));
        assert_eq!(overrides.get("URL"), Some("https://x?a=b"));
        assert_eq!(overrides.get("EMPTY"), Some(""));
        assert_eq!(overrides.len(), 3);
    }

    #[test]
    fn later_lines_replace_earlier_ones() {
        let overrides = parse_env_lines("A=1\nA=2\n");
        assert_eq!(overrides.get("A"), Some("2"));
    }

    #[test]
    fn only_leading_hash_marks_a_comment() {
        let overrides = parse_env_lines("  #A=1\nB=#2\n");
        assert_eq!(overrides.get("#A"), Some("1"));
        assert_eq!(overrides.get("B"), Some("#2"));
    }
}
