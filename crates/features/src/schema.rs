use std::collections::HashMap;
use std::ops::Range;
use thiserror::Error;

/// Column order the scoring model was trained on.
///
/// The model receives a bare numeric matrix, so this order is the only thing
/// tying a value to its meaning. Changing it requires retraining.
pub const FEATURE_COLUMNS: [&str; 73] = [
    "annual_inc",
    "pub_rec",
    "pub_rec_bankruptcies",
    "int_rate",
    "mort_acc",
    "funded_amnt_inv",
    "loan_amnt",
    "dti",
    "open_acc",
    "installment",
    "revol_bal",
    "revol_util",
    "fico",
    "A1",
    "A2",
    "A3",
    "A4",
    "A5",
    "B1",
    "B2",
    "B3",
    "B4",
    "B5",
    "C1",
    "C2",
    "C3",
    "C4",
    "C5",
    "D1",
    "D2",
    "D3",
    "D4",
    "D5",
    "E1",
    "E2",
    "E3",
    "E4",
    "E5",
    "F1",
    "F2",
    "F3",
    "F4",
    "F5",
    "G1",
    "G2",
    "G3",
    "G4",
    "G5",
    "MORTGAGE",
    "OTHER",
    "OWN",
    "RENT",
    "Individual",
    "Joint App",
    "car",
    "credit_card",
    "debt_consolidation",
    "educational",
    "home_improvement",
    "house",
    "major_purchase",
    "medical",
    "moving",
    "other",
    "renewable_energy",
    "small_business",
    "vacation",
    "wedding",
    "36",
    "60",
    "Not Verified",
    "Source Verified",
    "Verified",
];

pub const FEATURE_COUNT: usize = FEATURE_COLUMNS.len();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    /// Always written as a float, even when the request value is integral.
    Float,
    /// Written in the request field's declared type.
    Native,
    /// One-hot category column.
    Indicator,
}

/// Numeric request fields, declared in column order so the discriminant is
/// the column index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumericField {
    AnnualInc = 0,
    PubRec = 1,
    PubRecBankruptcies = 2,
    IntRate = 3,
    MortAcc = 4,
    FundedAmntInv = 5,
    LoanAmnt = 6,
    Dti = 7,
    OpenAcc = 8,
    Installment = 9,
    RevolBal = 10,
    RevolUtil = 11,
    Fico = 12,
}

impl NumericField {
    pub const ALL: [NumericField; 13] = [
        NumericField::AnnualInc,
        NumericField::PubRec,
        NumericField::PubRecBankruptcies,
        NumericField::IntRate,
        NumericField::MortAcc,
        NumericField::FundedAmntInv,
        NumericField::LoanAmnt,
        NumericField::Dti,
        NumericField::OpenAcc,
        NumericField::Installment,
        NumericField::RevolBal,
        NumericField::RevolUtil,
        NumericField::Fico,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NumericField::AnnualInc => "annual_inc",
            NumericField::PubRec => "pub_rec",
            NumericField::PubRecBankruptcies => "pub_rec_bankruptcies",
            NumericField::IntRate => "int_rate",
            NumericField::MortAcc => "mort_acc",
            NumericField::FundedAmntInv => "funded_amnt_inv",
            NumericField::LoanAmnt => "loan_amnt",
            NumericField::Dti => "dti",
            NumericField::OpenAcc => "open_acc",
            NumericField::Installment => "installment",
            NumericField::RevolBal => "revol_bal",
            NumericField::RevolUtil => "revol_util",
            NumericField::Fico => "fico",
        }
    }

    pub fn column(self) -> usize {
        self as usize
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            NumericField::AnnualInc
            | NumericField::IntRate
            | NumericField::FundedAmntInv
            | NumericField::Installment
            | NumericField::RevolUtil => ColumnKind::Float,
            _ => ColumnKind::Native,
        }
    }
}

/// Categorical request fields. Each owns a contiguous block of indicator
/// columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    SubGrade,
    HomeOwnership,
    ApplicationType,
    Purpose,
    Term,
    VerificationStatus,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 6] = [
        CategoricalField::SubGrade,
        CategoricalField::HomeOwnership,
        CategoricalField::ApplicationType,
        CategoricalField::Purpose,
        CategoricalField::Term,
        CategoricalField::VerificationStatus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CategoricalField::SubGrade => "sub_grade",
            CategoricalField::HomeOwnership => "home_ownership",
            CategoricalField::ApplicationType => "application_type",
            CategoricalField::Purpose => "purpose",
            CategoricalField::Term => "term",
            CategoricalField::VerificationStatus => "verification_status",
        }
    }

    pub fn columns(self) -> Range<usize> {
        match self {
            CategoricalField::SubGrade => 13..48,
            CategoricalField::HomeOwnership => 48..52,
            CategoricalField::ApplicationType => 52..54,
            CategoricalField::Purpose => 54..68,
            CategoricalField::Term => 68..70,
            CategoricalField::VerificationStatus => 70..73,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Ordered column list plus the per-field category lookups.
///
/// Built once at startup and shared by reference; lookups never allocate.
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    columns: &'static [&'static str],
    categories: [HashMap<&'static str, usize>; 6],
}

/// Disagreement between the enumerated fields and the column list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("column {index} is {found:?}, expected {expected:?}")]
    MisplacedField {
        index: usize,
        expected: &'static str,
        found: Option<&'static str>,
    },
    #[error("{field} block starts at column {start}, expected {expected}")]
    BlockGap {
        field: &'static str,
        start: usize,
        expected: usize,
    },
    #[error("category blocks end at column {end}, schema has {len} columns")]
    BlockOverrun { end: usize, len: usize },
    #[error("column {name:?} appears more than once")]
    DuplicateColumn { name: &'static str },
}

impl FeatureSchema {
    pub fn new() -> Self {
        Self::from_columns(&FEATURE_COLUMNS)
    }

    fn from_columns(columns: &'static [&'static str]) -> Self {
        let categories = CategoricalField::ALL.map(|field| {
            field
                .columns()
                .filter_map(|index| columns.get(index).map(|name| (*name, index)))
                .collect::<HashMap<_, _>>()
        });
        Self {
            columns,
            categories,
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Checks that every numeric field names its column and that the
    /// category blocks tile the rest of the list without gaps.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for field in NumericField::ALL {
            let index = field.column();
            let found = self.columns.get(index).copied();
            if found != Some(field.name()) {
                return Err(SchemaError::MisplacedField {
                    index,
                    expected: field.name(),
                    found,
                });
            }
        }

        let mut next = NumericField::ALL.len();
        for field in CategoricalField::ALL {
            let block = field.columns();
            if block.start != next {
                return Err(SchemaError::BlockGap {
                    field: field.name(),
                    start: block.start,
                    expected: next,
                });
            }
            next = block.end;
        }
        if next != self.columns.len() {
            return Err(SchemaError::BlockOverrun {
                end: next,
                len: self.columns.len(),
            });
        }

        for (index, name) in self.columns.iter().enumerate() {
            if self.index_of(name) != Some(index) {
                return Err(SchemaError::DuplicateColumn { name: *name });
            }
        }
        Ok(())
    }

    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| *name == column)
    }

    pub fn kind(&self, index: usize) -> Option<ColumnKind> {
        if index >= self.columns.len() {
            return None;
        }
        let kind = NumericField::ALL
            .iter()
            .find(|field| field.column() == index)
            .map(|field| field.kind())
            .unwrap_or(ColumnKind::Indicator);
        Some(kind)
    }

    /// Indicator column for `value` within `field`'s own block, if any.
    ///
    /// Labels never match outside the block, so a value such as `"fico"`
    /// cannot reach a numeric column, and a label from another field's
    /// block is dropped rather than set.
    pub fn indicator(&self, field: CategoricalField, value: &str) -> Option<usize> {
        self.categories[field.slot()].get(value).copied()
    }

    /// Known values for a categorical field, in column order.
    #[cfg(test)]
    pub(crate) fn categories(&self, field: CategoricalField) -> &'static [&'static str] {
        let columns = self.columns;
        &columns[field.columns()]
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::new()
    }
}
