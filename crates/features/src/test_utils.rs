use serde_json::{json, Value};

use crate::application::LoanApplication;

pub(crate) fn sample_body() -> Value {
    json!({
        "annual_inc": 60000,
        "pub_rec": 0,
        "fico": 700,
        "sub_grade": "B2",
        "home_ownership": "RENT",
        "application_type": "Individual",
        "loan_amnt": 10000,
        "mort_acc": 1,
        "funded_amnt_inv": 10000.0,
        "dti": 15.5,
        "open_acc": 8,
        "pub_rec_bankruptcies": 0,
        "purpose": "debt_consolidation",
        "term": 36,
        "revol_bal": 5000,
        "revol_util": 40.0,
        "verification_status": "Verified",
        "int_rate": 12.5,
        "installment": 300.0
    })
}

pub(crate) fn sample_application() -> LoanApplication {
    LoanApplication::from_json(&sample_body()).expect("sample body is valid")
}
