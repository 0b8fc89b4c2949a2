//! Namespace prefix ↔ URI mapping shared by the renderer and the extractor.
//!
//! The registry is a plain immutable value handed to whoever needs it, so
//! two transformations with different namespace needs never interfere.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::BilanzError;

/// ELSTER envelope schema (serialized with the default prefix).
pub const ELSTER_NS: &str = "http://www.elster.de/elsterxml/schema/v11";
/// E-Bilanz business data schema.
pub const EBILANZ_NS: &str = "http://rzf.fin-nrw.de/RMS/EBilanz/2016/XMLSchema";

/// Local name of the filing root element in the eBilanz namespace.
pub const FILING_ROOT: &str = "EBilanz";

/// An element name resolved to its namespace URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName {
    pub namespace: Option<String>,
    pub local: String,
}

impl QualifiedName {
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }

    pub fn unqualified(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    /// The eBilanz filing root, `{EBILANZ_NS}EBilanz`.
    pub fn filing_root() -> Self {
        Self::new(EBILANZ_NS, FILING_ROOT)
    }
}

/// Clark notation: `{uri}local`, or just `local` without a namespace.
impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Binding {
    prefix: String,
    uri: String,
    /// Aliases are accepted when resolving tags but never produced.
    alias: bool,
}

/// Fixed mapping between short prefixes and namespace URIs.
///
/// The empty prefix denotes the default namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceRegistry {
    bindings: Vec<Binding>,
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        Self::ebilanz()
    }
}

impl NamespaceRegistry {
    /// A registry without any bindings.
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// ELSTER v11 envelope as default namespace, E-Bilanz as `ebilanz:`,
    /// and `elster:` accepted as an alias for the envelope.
    pub fn ebilanz() -> Self {
        Self::empty()
            .with_prefix("", ELSTER_NS)
            .with_prefix("ebilanz", EBILANZ_NS)
            .with_alias("elster", ELSTER_NS)
    }

    /// Add a prefix binding. The first prefix registered for a URI is the
    /// one used when compressing names.
    pub fn with_prefix(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.bindings.push(Binding {
            prefix: prefix.into(),
            uri: uri.into(),
            alias: false,
        });
        self
    }

    /// Add a prefix that resolves to `uri` but is never emitted.
    pub fn with_alias(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.bindings.push(Binding {
            prefix: prefix.into(),
            uri: uri.into(),
            alias: true,
        });
        self
    }

    pub fn uri_for_prefix(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.prefix == prefix)
            .map(|b| b.uri.as_str())
    }

    pub fn prefix_for_uri(&self, uri: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| !b.alias && b.uri == uri)
            .map(|b| b.prefix.as_str())
    }

    /// URI bound to the empty prefix, if any.
    pub fn default_namespace(&self) -> Option<&str> {
        self.uri_for_prefix("")
    }

    /// Resolve a `prefix:local` tag to a qualified name.
    ///
    /// An unknown prefix is an error. A tag without a prefix lands in the
    /// default namespace, or in no namespace if none is registered.
    pub fn resolve(&self, tag: &str) -> Result<QualifiedName, BilanzError> {
        match tag.split_once(':') {
            Some((prefix, local)) => {
                let uri = self.uri_for_prefix(prefix).ok_or_else(|| {
                    BilanzError::UnknownNamespacePrefix {
                        prefix: prefix.to_string(),
                        tag: tag.to_string(),
                    }
                })?;
                Ok(QualifiedName::new(uri, local))
            }
            None => Ok(QualifiedName {
                namespace: self.default_namespace().map(str::to_string),
                local: tag.to_string(),
            }),
        }
    }

    /// Compress a qualified name back to a readable tag.
    ///
    /// Unknown namespaces fall back to the bare local name.
    pub fn compress(&self, name: &QualifiedName) -> String {
        let prefix = name
            .namespace
            .as_deref()
            .and_then(|uri| self.prefix_for_uri(uri))
            .unwrap_or("");
        if prefix.is_empty() {
            name.local.clone()
        } else {
            format!("{prefix}:{}", name.local)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_known_prefixes() {
        let reg = NamespaceRegistry::ebilanz();
        assert_eq!(
            reg.resolve("ebilanz:bilanz.summeAktiva").unwrap(),
            QualifiedName::new(EBILANZ_NS, "bilanz.summeAktiva")
        );
        assert_eq!(
            reg.resolve("elster:TransferHeader").unwrap(),
            QualifiedName::new(ELSTER_NS, "TransferHeader")
        );
        assert_eq!(
            reg.resolve("Verfahren").unwrap(),
            QualifiedName::new(ELSTER_NS, "Verfahren")
        );
    }

    #[test]
    fn resolve_unknown_prefix_fails() {
        let reg = NamespaceRegistry::ebilanz();
        let err = reg.resolve("foo:bar").unwrap_err();
        assert!(matches!(
            err,
            BilanzError::UnknownNamespacePrefix { ref prefix, .. } if prefix == "foo"
        ));
    }

    #[test]
    fn compress_prefers_primary_prefix() {
        let reg = NamespaceRegistry::ebilanz();
        assert_eq!(
            reg.compress(&QualifiedName::new(ELSTER_NS, "Verfahren")),
            "Verfahren"
        );
        assert_eq!(
            reg.compress(&QualifiedName::new(EBILANZ_NS, "stichtag")),
            "ebilanz:stichtag"
        );
        assert_eq!(
            reg.compress(&QualifiedName::new("urn:other", "thing")),
            "thing"
        );
        assert_eq!(reg.compress(&QualifiedName::unqualified("x")), "x");
    }

    #[test]
    fn resolve_then_compress_is_identity_for_emitted_prefixes() {
        let reg = NamespaceRegistry::ebilanz();
        for tag in ["ebilanz:stichtag", "Verfahren", "ebilanz:gcd.genInfo"] {
            let qn = reg.resolve(tag).unwrap();
            assert_eq!(reg.compress(&qn), tag);
        }
    }

    #[test]
    fn clark_notation() {
        assert_eq!(
            QualifiedName::filing_root().to_string(),
            format!("{{{EBILANZ_NS}}}EBilanz")
        );
    }

    #[test]
    fn no_default_namespace_leaves_unprefixed_tags_unqualified() {
        let reg = NamespaceRegistry::empty().with_prefix("ebilanz", EBILANZ_NS);
        assert_eq!(reg.resolve("plain").unwrap(), QualifiedName::unqualified("plain"));
    }
}
