use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, trace, warn};

use super::xml_tree::{Element, XmlDocument};
use crate::core::*;

/// Merges a [`Document`] into an eBilanz XML template.
///
/// The template decides the shape of the output (envelope, comments,
/// ordering, seeded placeholders). Rendering finds the `EBilanz` filing
/// root, then for the cutoff date and every position either overwrites the
/// text of the matching direct child or appends a new child.
///
/// Elements are matched on the tag alone: two positions with the same tag
/// but different contexts end up as one element holding the last value.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    registry: NamespaceRegistry,
}

impl Renderer {
    pub fn new(registry: NamespaceRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }

    /// Load the template from `template_path` and populate it.
    pub fn render(&self, doc: &Document, template_path: &Path) -> Result<XmlDocument, BilanzError> {
        debug!(template = %template_path.display(), "loading eBilanz template");
        let template = XmlDocument::from_path(template_path)?;
        self.render_into(doc, template)
    }

    /// Populate a template given as a string.
    pub fn render_str(&self, doc: &Document, template: &str) -> Result<XmlDocument, BilanzError> {
        self.render_into(doc, XmlDocument::parse(template)?)
    }

    /// Populate an already parsed template.
    pub fn render_into(
        &self,
        doc: &Document,
        mut template: XmlDocument,
    ) -> Result<XmlDocument, BilanzError> {
        // Resolve every tag up front so a bad prefix leaves nothing half-written.
        let effective_date = self.registry.resolve(fields::EFFECTIVE_DATE_TAG)?;
        let resolved = doc
            .positions
            .iter()
            .map(|pos| self.registry.resolve(&pos.tag).map(|name| (name, pos)))
            .collect::<Result<Vec<_>, BilanzError>>()?;

        let filing_root = QualifiedName::filing_root();
        let root = template.root_mut().find_mut(&filing_root).ok_or_else(|| {
            BilanzError::TemplateStructure(format!("template is missing {filing_root} element"))
        })?;

        self.upsert(root, effective_date, &doc.master.effective_date);

        let mut written: HashMap<QualifiedName, Option<&str>> = HashMap::new();
        for (name, pos) in resolved {
            if let Some(previous) = written.insert(name.clone(), pos.context.as_deref()) {
                if previous != pos.context.as_deref() {
                    warn!(
                        tag = %pos.tag,
                        previous = ?previous,
                        context = ?pos.context,
                        "tag repeated with a different context; keeping the last value"
                    );
                }
            }
            trace!(tag = %pos.tag, "writing position");
            self.upsert(root, name, &pos.value);
        }

        debug!(positions = doc.positions.len(), "rendered eBilanz document");
        Ok(template)
    }

    fn upsert(&self, parent: &mut Element, name: QualifiedName, value: &str) {
        match parent.find_child_mut(&name) {
            Some(existing) => existing.set_text(value),
            None => {
                let prefix = name
                    .namespace
                    .as_deref()
                    .and_then(|uri| self.registry.prefix_for_uri(uri))
                    .map(str::to_string);
                let mut el = Element::new(name, prefix);
                el.set_text(value);
                parent.append_child(el);
            }
        }
    }
}

/// Render with the default eBilanz namespace registry.
pub fn render_ebilanz(doc: &Document, template_path: &Path) -> Result<XmlDocument, BilanzError> {
    Renderer::default().render(doc, template_path)
}
