// SPDX-License-Identifier: Apache-2.0 OR MIT
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::Error;

/// One decoded document: a mapping from field name to structured value.
pub type Record = Map<String, Value>;

/// Turns fully substituted bytes into structured records.
pub trait Decoder {
    fn decode(&self, resolved: &[u8]) -> Result<Vec<Record>, Error>;
}

/// Decodes multi-document YAML (`---` separated).
///
/// Empty documents are skipped; every other document must be a mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDecoder;

impl Decoder for YamlDecoder {
    fn decode(&self, resolved: &[u8]) -> Result<Vec<Record>, Error> {
        let mut records = Vec::new();
        for (index, document) in serde_yaml::Deserializer::from_slice(resolved).enumerate() {
            let value = Value::deserialize(document).map_err(|source| Error::Decode {
                document: index,
                message: source.to_string(),
                source: Some(source),
            })?;
            match value {
                Value::Null => {}
                Value::Object(record) => records.push(record),
                other => {
                    return Err(Error::decode(
                        index,
                        format!("expected a mapping, found {}", kind_of(&other)),
                    ));
                }
            }
        }
        Ok(records)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// Kinds that are never namespaced and keep their metadata untouched.
const CLUSTER_SCOPED_KINDS: &[&str] = &[
    "APIService",
    "ClusterRole",
    "ClusterRoleBinding",
    "CustomResourceDefinition",
    "MutatingWebhookConfiguration",
    "Namespace",
    "Node",
    "PersistentVolume",
    "PriorityClass",
    "StorageClass",
    "ValidatingWebhookConfiguration",
];

/// Sets `metadata.namespace` on every namespaced record that carries a
/// `metadata` mapping. Records without metadata are left alone.
pub fn apply_target_namespace(records: &mut [Record], namespace: &str) {
    if namespace.is_empty() {
        return;
    }
    for record in records.iter_mut() {
        let cluster_scoped = record
            .get("kind")
            .and_then(Value::as_str)
            .is_some_and(|kind| CLUSTER_SCOPED_KINDS.contains(&kind));
        if cluster_scoped {
            continue;
        }
        if let Some(Value::Object(metadata)) = record.get_mut("metadata") {
            metadata.insert("namespace".to_string(), Value::String(namespace.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_single_document() {
        let records = YamlDecoder.decode(b"name: prod\nns: default-ns\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], json!("prod"));
        assert_eq!(records[0]["ns"], json!("default-ns"));
    }

    #[test]
    fn decodes_multiple_documents_and_skips_empty_ones() {
        let source = b"---\nkind: A\n---\n---\nkind: B\nitems: [1, 2]\n";
        let records = YamlDecoder.decode(source).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["items"], json!([1, 2]));
    }

    #[test]
    fn empty_input_has_no_records() {
        assert!(YamlDecoder.decode(b"").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_mapping_documents() {
        let err = YamlDecoder.decode(b"kind: A\n---\n- 1\n- 2\n").unwrap_err();
        assert!(matches!(err, Error::Decode { document: 1, .. }));
        assert!(err.to_string().contains("expected a mapping, found a sequence"));
    }

    #[test]
    fn reports_syntax_errors() {
        let err = YamlDecoder.decode(b"key: [unclosed\n").unwrap_err();
        assert!(matches!(err, Error::Decode { document: 0, source: Some(_), .. }));
    }

    #[test]
    fn namespace_is_applied_to_namespaced_records_only() {
        let mut records = YamlDecoder
            .decode(
                b"kind: Deployment\nmetadata:\n  name: web\n---\nkind: Namespace\nmetadata:\n  name: prod\n---\nname: bare\n",
            )
            .unwrap();
        apply_target_namespace(&mut records, "prod");
        assert_eq!(records[0]["metadata"]["namespace"], json!("prod"));
        assert!(records[1]["metadata"].get("namespace").is_none());
        assert!(records[2].get("metadata").is_none());
    }
}
