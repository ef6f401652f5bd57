//! Type-tagged scalar field validation for forms.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::validation::address::validate_address;

/// Validation applied to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    #[default]
    Text,
    Email,
    Url,
    Number,
    Address,
}

/// Raw field input.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.is_empty())
    }

    fn as_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n).filter(|n| !n.is_nan()),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

/// Constraints for one field. Bounds only apply to the matching type:
/// `min`/`max` to numbers, lengths and `pattern` to text.
#[derive(Debug, Clone, Default)]
pub struct FieldRule {
    pub field_type: FieldType,
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
}

impl FieldRule {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"))
}

pub fn validate_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub fn validate_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}

/// Validate a field. `Err` carries a message suitable for display next to
/// the field. Empty optional fields always pass.
pub fn validate_field(value: &FieldValue, rule: &FieldRule) -> Result<(), String> {
    if value.is_empty() {
        return if rule.required {
            Err("This field is required".to_string())
        } else {
            Ok(())
        };
    }

    match rule.field_type {
        FieldType::Email => {
            if !validate_email(&value.as_text()) {
                return Err("Invalid email address".to_string());
            }
        }
        FieldType::Url => {
            if !validate_url(&value.as_text()) {
                return Err("Invalid URL".to_string());
            }
        }
        FieldType::Number => {
            let number = value.as_number().ok_or_else(|| "Must be a number".to_string())?;
            if let Some(min) = rule.min.filter(|min| number < *min) {
                return Err(format!("Must be at least {}", min));
            }
            if let Some(max) = rule.max.filter(|max| number > *max) {
                return Err(format!("Must be at most {}", max));
            }
        }
        FieldType::Address => {
            if !validate_address(&value.as_text()) {
                return Err("Invalid Ethereum address".to_string());
            }
        }
        FieldType::Text => {
            let text = value.as_text();
            let length = text.chars().count();
            if let Some(min) = rule.min_length.filter(|min| length < *min) {
                return Err(format!("Must be at least {} characters", min));
            }
            if let Some(max) = rule.max_length.filter(|max| length > *max) {
                return Err(format!("Must be at most {} characters", max));
            }
            if let Some(pattern) = &rule.pattern {
                if !pattern.is_match(&text) {
                    return Err("Invalid format".to_string());
                }
            }
        }
    }

    Ok(())
}
