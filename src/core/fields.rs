//! Classification of tabular rows into master data and positions.

use serde::{Deserialize, Serialize};

/// Tag of the row carrying the balance sheet cutoff date.
pub const EFFECTIVE_DATE_TAG: &str = "ebilanz:stichtag";
/// Tag of the row carrying the filer identifier.
pub const IDENTIFIER_TAG: &str = "identifier";
/// Tag of the row overriding the unit.
pub const UNIT_TAG: &str = "unit";

/// Master-data fields that are populated from reserved rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservedField {
    EffectiveDate,
    Identifier,
    Unit,
}

impl ReservedField {
    /// The literal tag that selects this field.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::EffectiveDate => EFFECTIVE_DATE_TAG,
            Self::Identifier => IDENTIFIER_TAG,
            Self::Unit => UNIT_TAG,
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            EFFECTIVE_DATE_TAG => Some(Self::EffectiveDate),
            IDENTIFIER_TAG => Some(Self::Identifier),
            UNIT_TAG => Some(Self::Unit),
            _ => None,
        }
    }
}

/// What a single tabular row contributes to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowKind {
    Reserved(ReservedField),
    Position,
}

/// Classify a row by its tag. Blank tags yield `None` and are skipped.
pub fn classify(tag: &str) -> Option<RowKind> {
    let tag = tag.trim();
    if tag.is_empty() {
        return None;
    }
    Some(match ReservedField::from_tag(tag) {
        Some(field) => RowKind::Reserved(field),
        None => RowKind::Position,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_tags() {
        assert_eq!(
            classify("ebilanz:stichtag"),
            Some(RowKind::Reserved(ReservedField::EffectiveDate))
        );
        assert_eq!(
            classify("identifier"),
            Some(RowKind::Reserved(ReservedField::Identifier))
        );
        assert_eq!(
            classify(" unit "),
            Some(RowKind::Reserved(ReservedField::Unit))
        );
    }

    #[test]
    fn blank_and_business_tags() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("   "), None);
        assert_eq!(
            classify("ebilanz:bilanz.summeAktiva"),
            Some(RowKind::Position)
        );
        // Only the exact literal is reserved.
        assert_eq!(classify("Identifier"), Some(RowKind::Position));
        assert_eq!(classify("stichtag"), Some(RowKind::Position));
    }

    #[test]
    fn tag_roundtrip() {
        for field in [
            ReservedField::EffectiveDate,
            ReservedField::Identifier,
            ReservedField::Unit,
        ] {
            assert_eq!(ReservedField::from_tag(field.tag()), Some(field));
        }
    }
}
