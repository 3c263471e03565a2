//! Attribute types shared by AWS resource schemas

use std::sync::LazyLock;

use cumulus_core::resource::Value;
use cumulus_core::schema::AttributeType;
use regex::Regex;

static ACCOUNT_ID_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\d{12}$").ok());

static ARN_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^arn:aws[a-z-]*:[a-z0-9-]+:[a-z0-9-]*:(\d{12})?:.+$").ok()
});

/// 12-digit AWS account ID
pub fn account_id() -> AttributeType {
    AttributeType::Custom {
        name: "AccountId".to_string(),
        base: Box::new(AttributeType::String),
        validate: validate_account_id,
    }
}

/// Amazon Resource Name
pub fn arn() -> AttributeType {
    AttributeType::Custom {
        name: "Arn".to_string(),
        base: Box::new(AttributeType::String),
        validate: validate_arn,
    }
}

/// Tag map (key -> value)
pub fn tags() -> AttributeType {
    AttributeType::Map(Box::new(AttributeType::String))
}

fn validate_account_id(value: &Value) -> Result<(), String> {
    validate_pattern(value, ACCOUNT_ID_RE.as_ref(), "a 12-digit AWS account ID")
}

fn validate_arn(value: &Value) -> Result<(), String> {
    validate_pattern(value, ARN_RE.as_ref(), "an ARN")
}

fn validate_pattern(value: &Value, re: Option<&Regex>, expected: &str) -> Result<(), String> {
    let Value::String(s) = value else {
        return Err(format!("Expected string, got {:?}", value));
    };
    let re = re.ok_or_else(|| format!("no pattern available to check {}", expected))?;
    if re.is_match(s) {
        Ok(())
    } else {
        Err(format!("'{}' is not {}", s, expected))
    }
}
