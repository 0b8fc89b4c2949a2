use std::path::Path;

use tracing::debug;

use super::xml_tree::XmlDocument;
use crate::core::*;

/// Flattens an XML document into `tag,value,context` rows.
///
/// Every element with non-blank text yields one row, in document order.
/// Names are compressed through the registry; elements in unknown
/// namespaces keep their bare local name. Context is not recovered.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    registry: NamespaceRegistry,
}

impl Extractor {
    pub fn new(registry: NamespaceRegistry) -> Self {
        Self { registry }
    }

    pub fn extract(&self, doc: &XmlDocument) -> Vec<TabularRow> {
        doc.root()
            .descendants()
            .into_iter()
            .filter_map(|el| {
                let text = el.text();
                let value = text.trim();
                (!value.is_empty()).then(|| TabularRow::new(self.registry.compress(el.name()), value))
            })
            .collect()
    }

    pub fn extract_str(&self, xml: &str) -> Result<Vec<TabularRow>, BilanzError> {
        Ok(self.extract(&XmlDocument::parse(xml)?))
    }

    pub fn extract_path(&self, path: &Path) -> Result<Vec<TabularRow>, BilanzError> {
        let rows = self.extract(&XmlDocument::from_path(path)?);
        debug!(path = %path.display(), rows = rows.len(), "extracted XML values");
        Ok(rows)
    }
}
