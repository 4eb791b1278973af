use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stored in every text field a provider leaves out.
pub const NO_DATA: &str = "N/A";

/// Canonical record of one job posting, normalized from either provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vacancy {
    pub id: i64,
    pub title: String,
    pub employer_name: String,
    pub requirement_snippet: String,
    pub salary_from: Option<Decimal>,
    pub salary_to: Option<Decimal>,
    pub currency: Option<String>,
    pub location_name: String,
    pub url: String,
}

/// Salary bounds after zero/null filtering.
///
/// A zero bound counts as "not provided", and the currency is dropped
/// whenever both bounds are missing, so the triple is never partial.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalaryRange {
    pub from: Option<Decimal>,
    pub to: Option<Decimal>,
    pub currency: Option<String>,
}

impl SalaryRange {
    pub fn new(from: Option<Decimal>, to: Option<Decimal>, currency: Option<String>) -> Self {
        let from = from.filter(|value| !value.is_zero());
        let to = to.filter(|value| !value.is_zero());
        let currency = if from.is_none() && to.is_none() {
            None
        } else {
            currency.filter(|code| !code.trim().is_empty())
        };

        Self { from, to, currency }
    }
}

pub fn text_or_placeholder(value: Option<String>) -> String {
    value.unwrap_or_else(|| NO_DATA.to_string())
}
