use crate::application::{LoanApplication, Number};
use crate::schema::{CategoricalField, ColumnKind, FeatureSchema, NumericField};

/// One request's values, in schema column order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    columns: &'static [&'static str],
    cells: Vec<Number>,
}

impl FeatureRow {
    fn zeroed(schema: &FeatureSchema) -> Self {
        Self {
            columns: schema.columns(),
            cells: vec![Number::Int(0); schema.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Number] {
        &self.cells
    }

    pub fn get(&self, column: &str) -> Option<Number> {
        self.columns
            .iter()
            .position(|name| *name == column)
            .map(|index| self.cells[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Number)> + '_ {
        self.columns.iter().copied().zip(self.cells.iter().copied())
    }

    /// The dense matrix row handed to the scorer.
    pub fn to_f32(&self) -> Vec<f32> {
        self.cells.iter().map(|cell| cell.as_f64() as f32).collect()
    }

    /// Names of indicator columns that are set.
    pub fn active_indicators(&self) -> Vec<&'static str> {
        CategoricalField::ALL
            .iter()
            .flat_map(|field| field.columns())
            .filter(|index| self.cells[*index] == Number::Int(1))
            .map(|index| self.columns[index])
            .collect()
    }
}

/// A categorical value with no column in its field's block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedCategory {
    pub field: CategoricalField,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Encoding {
    pub row: FeatureRow,
    pub dropped: Vec<DroppedCategory>,
}

#[derive(Debug, Clone, Default)]
pub struct FeatureEncoder {
    schema: FeatureSchema,
}

impl FeatureEncoder {
    pub fn new(schema: FeatureSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Never fails. Unknown category labels set no indicator and are listed
    /// in `Encoding::dropped` instead.
    pub fn encode(&self, application: &LoanApplication) -> Encoding {
        let mut row = FeatureRow::zeroed(&self.schema);

        for field in NumericField::ALL {
            let value = application.numeric(field);
            row.cells[field.column()] = match self.schema.kind(field.column()) {
                Some(ColumnKind::Float) => Number::Float(value.as_f64()),
                _ => value,
            };
        }

        let mut dropped = Vec::new();
        for field in CategoricalField::ALL {
            let label = application.categorical(field);
            match self.schema.indicator(field, &label) {
                Some(index) => row.cells[index] = Number::Int(1),
                None => dropped.push(DroppedCategory {
                    field,
                    value: label.into_owned(),
                }),
            }
        }

        Encoding { row, dropped }
    }
}
