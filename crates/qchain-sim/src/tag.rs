//! Annotation tag attachable to a fixed-width group of qubits.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A data-carrying tag marking a qubit group as holding tokenized quantum
/// data. Carries a unique identifier and a metadata map; both are handed out
/// by copy so a caller can never mutate a tag through its accessors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumTag {
    num_qubits: usize,
    token_id: String,
    metadata: BTreeMap<String, String>,
    label: Option<String>,
}

impl QuantumTag {
    pub fn new(num_qubits: usize, token_id: impl Into<String>) -> Self {
        Self {
            num_qubits,
            token_id: token_id.into(),
            metadata: BTreeMap::new(),
            label: None,
        }
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn token_id(&self) -> &str {
        &self.token_id
    }

    /// A copy of the metadata map.
    pub fn metadata(&self) -> BTreeMap<String, String> {
        self.metadata.clone()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Tags carry no unitary action, so the inverse of a tag is an
    /// equivalent tag.
    pub fn inverse(&self) -> Self {
        self.clone()
    }
}

impl fmt::Display for QuantumTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QuantumTag(num_qubits={}, token_id='{}')",
            self.num_qubits, self.token_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_defaults() {
        let tag = QuantumTag::new(2, "token_001");
        assert_eq!(tag.num_qubits(), 2);
        assert_eq!(tag.token_id(), "token_001");
        assert!(tag.metadata().is_empty());
        assert_eq!(tag.label(), None);
    }

    #[test]
    fn metadata_is_copied_out() {
        let mut metadata = BTreeMap::new();
        metadata.insert("name".to_string(), "MyToken".to_string());
        metadata.insert("creator".to_string(), "alice".to_string());
        let tag = QuantumTag::new(3, "token_002").with_metadata(metadata);

        let mut out = tag.metadata();
        out.insert("extra".to_string(), "test".to_string());
        assert!(!tag.metadata().contains_key("extra"));
    }

    #[test]
    fn inverse_is_equivalent() {
        let mut metadata = BTreeMap::new();
        metadata.insert("test".to_string(), "data".to_string());
        let tag = QuantumTag::new(2, "token_004")
            .with_metadata(metadata)
            .with_label("label");
        let inverse = tag.inverse();
        assert_eq!(inverse, tag);
        assert_eq!(inverse.label(), Some("label"));
    }

    #[test]
    fn display_shows_width_and_id() {
        let tag = QuantumTag::new(2, "token_005");
        assert_eq!(
            tag.to_string(),
            "QuantumTag(num_qubits=2, token_id='token_005')"
        );
    }
}
