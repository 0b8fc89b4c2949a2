use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::BilanzError;
use super::namespace::{NamespaceRegistry, QualifiedName};

/// Default currency/unit code for a filing.
pub const DEFAULT_UNIT: &str = "EUR";

/// Filing-level metadata (Stammdaten).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterData {
    /// Balance sheet cutoff date (Bilanzstichtag), as given in the source.
    pub effective_date: String,
    /// Filer identity key.
    pub identifier: String,
    /// Currency/unit code, `"EUR"` unless overridden.
    pub unit: String,
}

impl MasterData {
    pub fn new(effective_date: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            effective_date: effective_date.into(),
            identifier: identifier.into(),
            unit: DEFAULT_UNIT.to_string(),
        }
    }
}

/// One reported line-item value.
///
/// `tag` is a namespace-prefixed field identifier such as
/// `ebilanz:bilanz.summeAktiva`; `value` is kept untyped, numeric and date
/// formats are checked downstream by the validation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub tag: String,
    pub value: String,
    /// Disambiguating context identifier (e.g. a reporting period).
    pub context: Option<String>,
}

impl Position {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
            context: None,
        }
    }

    pub fn with_context(
        tag: impl Into<String>,
        value: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
            context: Some(context.into()),
        }
    }

    /// Namespace prefix of the tag, if it has one.
    pub fn prefix(&self) -> Option<&str> {
        self.tag.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Tag without its prefix.
    pub fn local_name(&self) -> &str {
        self.tag
            .split_once(':')
            .map_or(self.tag.as_str(), |(_, local)| local)
    }
}

/// One eBilanz filing: master data plus ordered positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub master: MasterData,
    pub positions: Vec<Position>,
}

impl Document {
    pub fn new(master: MasterData, positions: Vec<Position>) -> Self {
        Self { master, positions }
    }

    /// Blank document used to emit a template without any CSV input.
    pub fn template_only() -> Self {
        Self {
            master: MasterData::new("", ""),
            positions: Vec::new(),
        }
    }

    /// Elements written more than once with differing contexts.
    ///
    /// Tags are compared after resolution through `registry`, so `Foo` and
    /// `elster:Foo` count as the same element. The renderer keys elements on
    /// the name alone, so all but the last of these values are overwritten.
    pub fn tags_with_conflicting_context(
        &self,
        registry: &NamespaceRegistry,
    ) -> Result<Vec<QualifiedName>, BilanzError> {
        let mut contexts: BTreeMap<QualifiedName, Vec<Option<&str>>> = BTreeMap::new();
        for pos in &self.positions {
            let seen = contexts.entry(registry.resolve(&pos.tag)?).or_default();
            let ctx = pos.context.as_deref();
            if !seen.contains(&ctx) {
                seen.push(ctx);
            }
        }
        Ok(contexts
            .into_iter()
            .filter(|(_, ctxs)| ctxs.len() > 1)
            .map(|(name, _)| name)
            .collect())
    }
}

/// A row of the three-column tabular format (`tag,value,context`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularRow {
    pub tag: String,
    pub value: String,
    pub context: Option<String>,
}

impl TabularRow {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
            context: None,
        }
    }
}

impl From<&Position> for TabularRow {
    fn from(pos: &Position) -> Self {
        Self {
            tag: pos.tag.clone(),
            value: pos.value.clone(),
            context: pos.context.clone(),
        }
    }
}
