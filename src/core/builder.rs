use super::error::BilanzError;
use super::fields::{EFFECTIVE_DATE_TAG, IDENTIFIER_TAG, ReservedField};
use super::types::*;

/// Builder for assembling a [`Document`] row by row.
///
/// ```
/// use taxel::core::*;
///
/// let doc = DocumentBuilder::new()
///     .effective_date("2022-12-31")
///     .identifier("00000")
///     .add_position(Position::new("ebilanz:bilanz.summeAktiva", "500000"))
///     .build()
///     .unwrap();
///
/// assert_eq!(doc.master.unit, "EUR");
/// assert_eq!(doc.positions.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    effective_date: Option<String>,
    identifier: Option<String>,
    unit: Option<String>,
    positions: Vec<Position>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effective_date(mut self, date: impl Into<String>) -> Self {
        self.effective_date = Some(date.into());
        self
    }

    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn add_position(mut self, position: Position) -> Self {
        self.positions.push(position);
        self
    }

    /// Set a reserved master-data field. A later value replaces an earlier one.
    pub fn set_reserved(&mut self, field: ReservedField, value: impl Into<String>) {
        let value = Some(value.into());
        match field {
            ReservedField::EffectiveDate => self.effective_date = value,
            ReservedField::Identifier => self.identifier = value,
            ReservedField::Unit => self.unit = value,
        }
    }

    pub fn push_position(&mut self, position: Position) {
        self.positions.push(position);
    }

    /// Number of positions collected so far.
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Finish the document. The cutoff date and the identifier are mandatory.
    pub fn build(self) -> Result<Document, BilanzError> {
        let effective_date = self
            .effective_date
            .ok_or_else(|| BilanzError::missing(EFFECTIVE_DATE_TAG))?;
        let identifier = self
            .identifier
            .ok_or_else(|| BilanzError::missing(IDENTIFIER_TAG))?;

        let mut master = MasterData::new(effective_date, identifier);
        if let Some(unit) = self.unit {
            master.unit = unit;
        }
        Ok(Document::new(master, self.positions))
    }
}
