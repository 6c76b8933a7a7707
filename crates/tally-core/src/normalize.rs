//! Value Normalizer
//!
//! Coerces raw heterogeneous field values into the two canonical numeric
//! records. This is the one stage allowed to receive malformed data: the
//! extraction service is non-deterministic and schema-violating by nature,
//! so everything it produces is routed through [`coerce_amount`], a total
//! function that degrades bad values to 0 instead of failing. A single bad
//! field never aborts an extraction.

use serde::{Deserialize, Serialize};

use crate::models::{BusinessFinanceRecord, PersonalFinanceRecord, Provenance, RawFieldMap};

/// Canonical personal field names, in record order.
pub const PERSONAL_FIELDS: [&str; 13] = [
    "salary_income",
    "freelance_income",
    "investment_income",
    "rental_income",
    "capital_gains",
    "retirement_contributions",
    "mortgage_interest",
    "property_taxes",
    "charitable_donations",
    "medical_expenses",
    "childcare_costs",
    "education_expenses",
    "other_deductions",
];

/// Canonical business field names, in record order.
pub const BUSINESS_FIELDS: [&str; 11] = [
    "revenue",
    "employee_costs",
    "equipment",
    "rent",
    "utilities",
    "marketing",
    "travel_expenses",
    "office_supplies",
    "professional_services",
    "insurance",
    "other_expenses",
];

/// Both canonical records plus the provenance of the extraction event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecords {
    pub personal: PersonalFinanceRecord,
    pub business: BusinessFinanceRecord,
    pub provenance: Provenance,
}

/// Coerce one raw value into a finite number. Total: never fails.
///
/// Numbers pass through; strings are stripped of every character that is
/// not a digit, minus sign, or period, then parsed. Anything that does not
/// yield a finite number (null, missing, symbolic-only strings, multiple
/// separators) is exactly 0.
pub fn coerce_amount(value: &serde_json::Value) -> f64 {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
                .collect();
            cleaned.parse::<f64>().unwrap_or(0.0)
        }
        _ => 0.0,
    };

    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// Normalize a raw field map into both canonical records.
///
/// Always produces both records, even when the map only carries fields
/// relevant to one. Pure: no side effects, no failure path.
pub fn normalize(raw: &RawFieldMap, provenance: Provenance) -> NormalizedRecords {
    NormalizedRecords {
        personal: coerce_record(raw, &PERSONAL_FIELDS),
        business: coerce_record(raw, &BUSINESS_FIELDS),
        provenance,
    }
}

/// Coerce the listed fields into any `#[serde(default)]` record type.
fn coerce_record<T: serde::de::DeserializeOwned + Default>(raw: &RawFieldMap, fields: &[&str]) -> T {
    let mut coerced = serde_json::Map::new();
    for field in fields {
        let value = raw.get(*field).map(coerce_amount).unwrap_or(0.0);
        if let Some(number) = serde_json::Number::from_f64(value) {
            coerced.insert(field.to_string(), serde_json::Value::Number(number));
        }
    }
    // Fields are all f64 with defaults, so this cannot fail in practice;
    // fall back to the all-zero record rather than propagating.
    serde_json::from_value(serde_json::Value::Object(coerced)).unwrap_or_default()
}
