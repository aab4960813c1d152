//! Request validation from per-resource rules.

use crate::error::AppError;
use regex::Regex;
use serde_json::{Map, Value};

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// Rule for one body field. Built with const combinators so resources can keep their
/// rules in static slices.
#[derive(Clone, Debug, Default)]
pub struct ValidationRule {
    pub required: bool,
    /// Named format: "email" or "date-time".
    pub format: Option<&'static str>,
    pub max_length: Option<usize>,
    pub min_length: Option<usize>,
    pub pattern: Option<&'static str>,
    pub allowed: Option<&'static [&'static str]>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    /// Most digits allowed after the decimal point.
    pub decimals: Option<u32>,
}

impl ValidationRule {
    pub const fn new() -> Self {
        ValidationRule {
            required: false,
            format: None,
            max_length: None,
            min_length: None,
            pattern: None,
            allowed: None,
            minimum: None,
            maximum: None,
            decimals: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn format(mut self, format: &'static str) -> Self {
        self.format = Some(format);
        self
    }

    pub const fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub const fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub const fn pattern(mut self, pattern: &'static str) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub const fn allowed(mut self, values: &'static [&'static str]) -> Self {
        self.allowed = Some(values);
        self
    }

    pub const fn minimum(mut self, n: f64) -> Self {
        self.minimum = Some(n);
        self
    }

    pub const fn maximum(mut self, n: f64) -> Self {
        self.maximum = Some(n);
        self
    }

    pub const fn decimals(mut self, n: u32) -> Self {
        self.decimals = Some(n);
        self
    }
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate body against per-field rules. All required fields must be present and
    /// non-blank; present fields must satisfy their rule.
    pub fn validate(
        body: &Map<String, Value>,
        rules: &[(&'static str, ValidationRule)],
    ) -> Result<(), AppError> {
        for (field, rule) in rules {
            let val = body.get(*field);
            if rule.required && is_missing(val) {
                return Err(AppError::Validation(format!("{} is required", field)));
            }
            if let Some(v) = val {
                validate_field(field, v, rule)?;
            }
        }
        Ok(())
    }
}

fn is_missing(val: Option<&Value>) -> bool {
    match val {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn validate_field(field: &str, v: &Value, rule: &ValidationRule) -> Result<(), AppError> {
    if v.is_null() {
        return Ok(());
    }
    if let Some(format) = rule.format {
        validate_format(field, v, format)?;
    }
    if let Some(max) = rule.max_length {
        if let Some(s) = v.as_str() {
            if s.chars().count() > max {
                return Err(AppError::Validation(format!(
                    "{} must be at most {} characters",
                    field, max
                )));
            }
        }
    }
    if let Some(min) = rule.min_length {
        if let Some(s) = v.as_str() {
            if s.chars().count() < min {
                return Err(AppError::Validation(format!(
                    "{} must be at least {} characters",
                    field, min
                )));
            }
        }
    }
    if let Some(pattern) = rule.pattern {
        let re = Regex::new(pattern).map_err(|_| AppError::Validation(format!("invalid pattern for {}", field)))?;
        if let Some(s) = v.as_str() {
            if !re.is_match(s) {
                return Err(AppError::Validation(format!("{} does not match required pattern", field)));
            }
        }
    }
    if let Some(allowed) = rule.allowed {
        let ok = v.as_str().is_some_and(|s| allowed.contains(&s));
        if !ok {
            return Err(AppError::Validation(format!(
                "{} must be one of: {}",
                field,
                allowed.join(", ")
            )));
        }
    }
    if rule.minimum.is_some() || rule.maximum.is_some() || rule.decimals.is_some() {
        let n = v
            .as_f64()
            .ok_or_else(|| AppError::Validation(format!("{} must be a number", field)))?;
        if let Some(min) = rule.minimum {
            if n < min {
                return Err(AppError::Validation(format!("{} must be at least {}", field, min)));
            }
        }
        if let Some(max) = rule.maximum {
            if n > max {
                return Err(AppError::Validation(format!("{} must be at most {}", field, max)));
            }
        }
        if let Some(places) = rule.decimals {
            if !has_at_most_decimals(n, places) {
                return Err(AppError::Validation(format!(
                    "{} must have at most {} decimal places",
                    field, places
                )));
            }
        }
    }
    Ok(())
}

/// Tolerates binary rounding error: 10.55 passes at two places, 10.555 does not.
fn has_at_most_decimals(n: f64, places: u32) -> bool {
    let scaled = n * 10f64.powi(places as i32);
    (scaled - scaled.round()).abs() <= scaled.abs().max(1.0) * f64::EPSILON * 8.0
}

fn validate_format(field: &str, v: &Value, format: &str) -> Result<(), AppError> {
    let Some(s) = v.as_str() else {
        return Err(AppError::Validation(format!("{} must be a string", field)));
    };
    match format {
        "email" => {
            let re = Regex::new(EMAIL_PATTERN).map_err(|_| AppError::Validation(format!("invalid pattern for {}", field)))?;
            if !re.is_match(s) {
                return Err(AppError::Validation(format!("{} must be a valid email", field)));
            }
        }
        "date-time" => {
            if chrono::DateTime::parse_from_rfc3339(s).is_err() {
                return Err(AppError::Validation(format!(
                    "{} must be an RFC 3339 date-time",
                    field
                )));
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    const RULES: &[(&str, ValidationRule)] = &[
        ("nome", ValidationRule::new().required().max_length(5)),
        ("email", ValidationRule::new().format("email")),
        ("status", ValidationRule::new().allowed(&["A", "B"])),
        ("valor", ValidationRule::new().minimum(0.0).decimals(2)),
        ("dataHora", ValidationRule::new().format("date-time")),
    ];

    fn err_message(b: Value) -> String {
        match RequestValidator::validate(&body(b), RULES) {
            Err(AppError::Validation(m)) => m,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn accepts_valid_body() {
        let b = body(json!({
            "nome": "Rex",
            "email": "ana@vet.com.br",
            "status": "A",
            "valor": 0,
            "dataHora": "2024-05-01T10:00:00Z"
        }));
        assert!(RequestValidator::validate(&b, RULES).is_ok());
    }

    #[test]
    fn required_rejects_missing_null_and_blank() {
        assert_eq!(err_message(json!({})), "nome is required");
        assert_eq!(err_message(json!({"nome": null})), "nome is required");
        assert_eq!(err_message(json!({"nome": "   "})), "nome is required");
    }

    #[test]
    fn optional_null_is_accepted() {
        let b = body(json!({"nome": "Rex", "email": null, "valor": null}));
        assert!(RequestValidator::validate(&b, RULES).is_ok());
    }

    #[test]
    fn cents_are_accepted() {
        for valor in [json!(10.55), json!(150), json!(0.1), json!(1234.5), json!(9_999_999_999.99)] {
            let b = body(json!({"nome": "Rex", "valor": valor}));
            assert!(RequestValidator::validate(&b, RULES).is_ok(), "{valor}");
        }
    }

    #[test]
    fn field_rules() {
        assert!(err_message(json!({"nome": "Rexinho"})).contains("at most 5"));
        assert!(err_message(json!({"nome": "Rex", "email": "nope"})).contains("valid email"));
        assert!(err_message(json!({"nome": "Rex", "status": "C"})).contains("one of: A, B"));
        assert!(err_message(json!({"nome": "Rex", "valor": -1})).contains("at least 0"));
        assert!(err_message(json!({"nome": "Rex", "valor": "10"})).contains("must be a number"));
        assert!(err_message(json!({"nome": "Rex", "valor": 10.555})).contains("at most 2 decimal places"));
        assert!(err_message(json!({"nome": "Rex", "valor": 0.001})).contains("decimal places"));
        assert!(err_message(json!({"nome": "Rex", "dataHora": "01/05/2024"})).contains("RFC 3339"));
    }
}
