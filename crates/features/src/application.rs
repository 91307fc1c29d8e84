use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

use crate::schema::{CategoricalField, NumericField};

/// A fully validated loan application.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanApplication {
    pub annual_inc: f64,
    pub pub_rec: i64,
    pub fico: i64,
    pub sub_grade: String,
    pub home_ownership: String,
    pub application_type: String,
    pub loan_amnt: i64,
    pub mort_acc: i64,
    pub funded_amnt_inv: f64,
    pub dti: f64,
    pub open_acc: i64,
    pub pub_rec_bankruptcies: i64,
    pub purpose: String,
    pub term: i64,
    pub revol_bal: i64,
    pub revol_util: f64,
    pub verification_status: String,
    pub int_rate: f64,
    pub installment: f64,
}

/// A numeric value in the type its field was declared with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(value) => value as f64,
            Number::Float(value) => value,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldErrorKind {
    Missing,
    NotFloat,
    NotInteger,
    NotString,
    NotObject,
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            FieldErrorKind::Missing => "field required",
            FieldErrorKind::NotFloat => "value is not a valid float",
            FieldErrorKind::NotInteger => "value is not a valid integer",
            FieldErrorKind::NotString => "value is not a valid string",
            FieldErrorKind::NotObject => "input should be a JSON object",
        };
        f.write_str(message)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} for LoanApplication\n{}", error_count(.errors), render_errors(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn mentions(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }
}

fn error_count(errors: &[FieldError]) -> String {
    match errors.len() {
        1 => "1 validation error".to_string(),
        count => format!("{count} validation errors"),
    }
}

fn render_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| format!("{}: {}", error.field, error.kind))
        .collect::<Vec<_>>()
        .join("\n")
}

impl LoanApplication {
    /// Validates a decoded JSON body. Either every field checks out or the
    /// returned error lists every field that did not.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let Some(object) = value.as_object() else {
            return Err(ValidationError {
                errors: vec![FieldError {
                    field: "body".to_string(),
                    kind: FieldErrorKind::NotObject,
                }],
            });
        };

        let mut reader = FieldReader::new(object);
        let application = Self {
            annual_inc: reader.float("annual_inc"),
            pub_rec: reader.int("pub_rec"),
            fico: reader.int("fico"),
            sub_grade: reader.string("sub_grade"),
            home_ownership: reader.string("home_ownership"),
            application_type: reader.string("application_type"),
            loan_amnt: reader.int("loan_amnt"),
            mort_acc: reader.int("mort_acc"),
            funded_amnt_inv: reader.float("funded_amnt_inv"),
            dti: reader.float("dti"),
            open_acc: reader.int("open_acc"),
            pub_rec_bankruptcies: reader.int("pub_rec_bankruptcies"),
            purpose: reader.string("purpose"),
            term: reader.int("term"),
            revol_bal: reader.int("revol_bal"),
            revol_util: reader.float("revol_util"),
            verification_status: reader.string("verification_status"),
            int_rate: reader.float("int_rate"),
            installment: reader.float("installment"),
        };
        reader.finish()?;
        Ok(application)
    }

    pub fn numeric(&self, field: NumericField) -> Number {
        match field {
            NumericField::AnnualInc => Number::Float(self.annual_inc),
            NumericField::PubRec => Number::Int(self.pub_rec),
            NumericField::PubRecBankruptcies => Number::Int(self.pub_rec_bankruptcies),
            NumericField::IntRate => Number::Float(self.int_rate),
            NumericField::MortAcc => Number::Int(self.mort_acc),
            NumericField::FundedAmntInv => Number::Float(self.funded_amnt_inv),
            NumericField::LoanAmnt => Number::Int(self.loan_amnt),
            NumericField::Dti => Number::Float(self.dti),
            NumericField::OpenAcc => Number::Int(self.open_acc),
            NumericField::Installment => Number::Float(self.installment),
            NumericField::RevolBal => Number::Int(self.revol_bal),
            NumericField::RevolUtil => Number::Float(self.revol_util),
            NumericField::Fico => Number::Int(self.fico),
        }
    }

    /// Category label as it is matched against the schema. `term` is an
    /// integer on the wire and is matched by its decimal form.
    pub fn categorical(&self, field: CategoricalField) -> Cow<'_, str> {
        match field {
            CategoricalField::SubGrade => Cow::Borrowed(self.sub_grade.as_str()),
            CategoricalField::HomeOwnership => Cow::Borrowed(self.home_ownership.as_str()),
            CategoricalField::ApplicationType => Cow::Borrowed(self.application_type.as_str()),
            CategoricalField::Purpose => Cow::Borrowed(self.purpose.as_str()),
            CategoricalField::Term => Cow::Owned(self.term.to_string()),
            CategoricalField::VerificationStatus => Cow::Borrowed(self.verification_status.as_str()),
        }
    }
}

struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    fn new(object: &'a Map<String, Value>) -> Self {
        Self {
            object,
            errors: Vec::new(),
        }
    }

    fn float(&mut self, field: &str) -> f64 {
        self.read(field, FieldErrorKind::NotFloat, coerce_float)
            .unwrap_or_default()
    }

    fn int(&mut self, field: &str) -> i64 {
        self.read(field, FieldErrorKind::NotInteger, coerce_int)
            .unwrap_or_default()
    }

    fn string(&mut self, field: &str) -> String {
        self.read(field, FieldErrorKind::NotString, |value| {
            value.as_str().map(str::to_string)
        })
        .unwrap_or_default()
    }

    fn read<T>(
        &mut self,
        field: &str,
        mismatch: FieldErrorKind,
        coerce: impl FnOnce(&Value) -> Option<T>,
    ) -> Option<T> {
        let Some(value) = self.object.get(field) else {
            self.reject(field, FieldErrorKind::Missing);
            return None;
        };
        let coerced = coerce(value);
        if coerced.is_none() {
            self.reject(field, mismatch);
        }
        coerced
    }

    fn reject(&mut self, field: &str, kind: FieldErrorKind) {
        self.errors.push(FieldError {
            field: field.to_string(),
            kind,
        });
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                errors: self.errors,
            })
        }
    }
}

fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Some(int);
            }
            let float = number.as_f64()?;
            let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
            (float.fract() == 0.0 && in_range).then_some(float as i64)
        }
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}
