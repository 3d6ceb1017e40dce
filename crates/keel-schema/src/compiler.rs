//! JSON-Schema fragment compiler.
//!
//! A schema is compiled once into a tree of [`Node`]s. Validation walks the
//! tree, collects every issue it finds, and on success returns the value
//! reshaped to the schema's object graph (undeclared object properties are
//! dropped).

use crate::format::StringFormat;
use crate::issue::{IssueCode, ValidationIssue};
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Result of running a validator: the normalized value, or every issue found.
pub type ValidationOutcome = Result<Value, Vec<ValidationIssue>>;

/// Why a schema fragment could not be compiled.
#[derive(Debug, Error)]
pub enum SchemaDefect {
    /// A keyword carried a value of the wrong shape.
    #[error("keyword `{keyword}` at {path} must be {expected}")]
    InvalidKeyword {
        /// Keyword name.
        keyword: &'static str,
        /// Schema location.
        path: String,
        /// Expected shape.
        expected: &'static str,
    },

    /// A `pattern` keyword is not a valid regular expression.
    #[error("pattern `{pattern}` at {path} is not a valid regular expression: {source}")]
    InvalidPattern {
        /// The pattern text.
        pattern: String,
        /// Schema location.
        path: String,
        /// Regex compiler error.
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug)]
enum Node {
    Any,
    Choice(Vec<String>),
    Object {
        properties: Vec<(String, Node)>,
        required: Vec<String>,
    },
    String(StringRules),
    Number(NumberRules),
    Boolean,
    Array {
        items: Box<Node>,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
}

#[derive(Debug, Default)]
struct StringRules {
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Regex>,
    format: Option<StringFormat>,
    choices: Option<Vec<String>>,
}

#[derive(Debug, Default)]
struct NumberRules {
    integer: bool,
    minimum: Option<f64>,
    maximum: Option<f64>,
    exclusive_minimum: Option<f64>,
    exclusive_maximum: Option<f64>,
}

/// A compiled, immutable validator.
///
/// Cloning is cheap; the compiled tree is shared.
#[derive(Clone)]
pub struct Validator {
    root: Arc<Node>,
    defect: Option<Arc<SchemaDefect>>,
}

impl Validator {
    /// Compiles a schema fragment.
    ///
    /// Malformed fragments produce an accept-anything validator and a `warn`
    /// log entry; the defect stays available through [`Validator::defect`].
    #[must_use]
    pub fn compile(schema: &Value) -> Self {
        match compile_node(schema, "$") {
            Ok(node) => Self {
                root: Arc::new(node),
                defect: None,
            },
            Err(defect) => {
                warn!(error = %defect, "schema compilation failed, accepting any value");
                Self {
                    root: Arc::new(Node::Any),
                    defect: Some(Arc::new(defect)),
                }
            }
        }
    }

    /// A validator that accepts every value.
    #[must_use]
    pub fn any() -> Self {
        Self {
            root: Arc::new(Node::Any),
            defect: None,
        }
    }

    /// Returns the compilation defect, if the schema degraded.
    #[must_use]
    pub fn defect(&self) -> Option<&SchemaDefect> {
        self.defect.as_deref()
    }

    /// Returns true if this validator accepts every value.
    #[must_use]
    pub fn accepts_anything(&self) -> bool {
        matches!(*self.root, Node::Any)
    }

    /// Validates a value. Never panics; all issues are collected.
    pub fn validate(&self, value: &Value) -> ValidationOutcome {
        let mut issues = Vec::new();
        let data = check(&self.root, value, "$", &mut issues);
        if issues.is_empty() {
            Ok(data)
        } else {
            Err(issues)
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("root", &self.root)
            .field("degraded", &self.defect.is_some())
            .finish()
    }
}

/// A schema document paired with its compiled validator.
///
/// The declared document is kept for documentation output.
#[derive(Debug, Clone)]
pub struct ValidatorSchema {
    schema: Value,
    validator: Validator,
}

impl ValidatorSchema {
    /// Compiles `schema` and keeps it alongside the validator.
    #[must_use]
    pub fn compile(schema: Value) -> Self {
        let validator = Validator::compile(&schema);
        Self { schema, validator }
    }

    /// The schema document as declared.
    #[must_use]
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// The compiled validator.
    #[must_use]
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Shorthand for `self.validator().validate(value)`.
    pub fn validate(&self, value: &Value) -> ValidationOutcome {
        self.validator.validate(value)
    }
}

fn compile_node(schema: &Value, path: &str) -> Result<Node, SchemaDefect> {
    let Some(obj) = schema.as_object() else {
        return Ok(Node::Any);
    };

    let ty = obj.get("type").and_then(Value::as_str);

    if let Some(choices) = obj.get("enum") {
        let choices = enum_choices(choices, path)?;
        if ty == Some("string") {
            return Ok(Node::String(StringRules {
                choices: Some(choices),
                ..StringRules::default()
            }));
        }
        return Ok(Node::Choice(choices));
    }

    match ty {
        Some("object") => compile_object(obj, path),
        Some("string") => compile_string(obj, path),
        Some("number") => compile_number(obj, path, false),
        Some("integer") => compile_number(obj, path, true),
        Some("boolean") => Ok(Node::Boolean),
        Some("array") => {
            let items = match obj.get("items") {
                Some(items) => compile_node(items, &format!("{path}.items"))?,
                None => Node::Any,
            };
            Ok(Node::Array {
                items: Box::new(items),
                min_items: usize_keyword(obj, "minItems", path)?,
                max_items: usize_keyword(obj, "maxItems", path)?,
            })
        }
        _ => Ok(Node::Any),
    }
}

fn compile_object(obj: &Map<String, Value>, path: &str) -> Result<Node, SchemaDefect> {
    let properties = match obj.get("properties") {
        None => Vec::new(),
        Some(Value::Object(props)) => props
            .iter()
            .map(|(name, sub)| {
                compile_node(sub, &format!("{path}.properties.{name}")).map(|n| (name.clone(), n))
            })
            .collect::<Result<_, _>>()?,
        Some(_) => return Err(invalid("properties", path, "an object")),
    };

    let required = match obj.get("required") {
        None => Vec::new(),
        Some(Value::Array(names)) => names
            .iter()
            .map(|n| {
                n.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| invalid("required", path, "an array of strings"))
            })
            .collect::<Result<_, _>>()?,
        Some(_) => return Err(invalid("required", path, "an array of strings")),
    };

    Ok(Node::Object {
        properties,
        required,
    })
}

fn compile_string(obj: &Map<String, Value>, path: &str) -> Result<Node, SchemaDefect> {
    let pattern = match obj.get("pattern") {
        None => None,
        Some(Value::String(p)) => {
            Some(Regex::new(p).map_err(|source| SchemaDefect::InvalidPattern {
                pattern: p.clone(),
                path: path.to_string(),
                source,
            })?)
        }
        Some(_) => return Err(invalid("pattern", path, "a string")),
    };

    let format = match obj.get("format") {
        None => None,
        Some(Value::String(f)) => StringFormat::parse(f),
        Some(_) => return Err(invalid("format", path, "a string")),
    };

    Ok(Node::String(StringRules {
        min_length: usize_keyword(obj, "minLength", path)?,
        max_length: usize_keyword(obj, "maxLength", path)?,
        pattern,
        format,
        choices: None,
    }))
}

fn compile_number(
    obj: &Map<String, Value>,
    path: &str,
    integer: bool,
) -> Result<Node, SchemaDefect> {
    let mut rules = NumberRules {
        integer,
        minimum: f64_keyword(obj, "minimum", path)?,
        maximum: f64_keyword(obj, "maximum", path)?,
        ..NumberRules::default()
    };

    // Draft-4 style booleans turn the inclusive bound exclusive.
    match obj.get("exclusiveMinimum") {
        None => {}
        Some(Value::Bool(true)) => rules.exclusive_minimum = rules.minimum.take(),
        Some(Value::Bool(false)) => {}
        Some(v) => {
            rules.exclusive_minimum =
                Some(v.as_f64().ok_or_else(|| invalid("exclusiveMinimum", path, "a number"))?);
        }
    }
    match obj.get("exclusiveMaximum") {
        None => {}
        Some(Value::Bool(true)) => rules.exclusive_maximum = rules.maximum.take(),
        Some(Value::Bool(false)) => {}
        Some(v) => {
            rules.exclusive_maximum =
                Some(v.as_f64().ok_or_else(|| invalid("exclusiveMaximum", path, "a number"))?);
        }
    }

    Ok(Node::Number(rules))
}

fn enum_choices(value: &Value, path: &str) -> Result<Vec<String>, SchemaDefect> {
    match value {
        Value::Array(items) if !items.is_empty() => Ok(items.iter().map(coerce).collect()),
        _ => Err(invalid("enum", path, "a non-empty array")),
    }
}

fn usize_keyword(
    obj: &Map<String, Value>,
    keyword: &'static str,
    path: &str,
) -> Result<Option<usize>, SchemaDefect> {
    obj.get(keyword)
        .map(|v| {
            v.as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| invalid(keyword, path, "a non-negative integer"))
        })
        .transpose()
}

fn f64_keyword(
    obj: &Map<String, Value>,
    keyword: &'static str,
    path: &str,
) -> Result<Option<f64>, SchemaDefect> {
    obj.get(keyword)
        .map(|v| v.as_f64().ok_or_else(|| invalid(keyword, path, "a number")))
        .transpose()
}

fn invalid(keyword: &'static str, path: &str, expected: &'static str) -> SchemaDefect {
    SchemaDefect::InvalidKeyword {
        keyword,
        path: path.to_string(),
        expected,
    }
}

/// String form used for enum comparison: strings as-is, everything else as JSON.
fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn check(node: &Node, value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) -> Value {
    match node {
        Node::Any => value.clone(),

        Node::Choice(choices) => {
            if !choices.contains(&coerce(value)) {
                issues.push(not_in_enum(path, choices));
            }
            value.clone()
        }

        Node::Object {
            properties,
            required,
        } => {
            let Some(obj) = value.as_object() else {
                issues.push(wrong_type(path, "object", value));
                return value.clone();
            };

            for name in required {
                if !obj.contains_key(name) {
                    issues.push(ValidationIssue::new(
                        format!("{path}.{name}"),
                        IssueCode::Required,
                        "required property is missing",
                    ));
                }
            }

            let mut out = Map::new();
            for (name, sub) in properties {
                if let Some(v) = obj.get(name) {
                    let checked = check(sub, v, &format!("{path}.{name}"), issues);
                    out.insert(name.clone(), checked);
                }
            }
            Value::Object(out)
        }

        Node::String(rules) => {
            if let Some(s) = value.as_str() {
                check_string(rules, s, path, issues);
            } else {
                issues.push(wrong_type(path, "string", value));
            }
            value.clone()
        }

        Node::Number(rules) => {
            if let Some(n) = value.as_f64() {
                check_number(rules, n, path, issues);
            } else {
                let expected = if rules.integer { "integer" } else { "number" };
                issues.push(wrong_type(path, expected, value));
            }
            value.clone()
        }

        Node::Boolean => {
            if !value.is_boolean() {
                issues.push(wrong_type(path, "boolean", value));
            }
            value.clone()
        }

        Node::Array {
            items,
            min_items,
            max_items,
        } => {
            let Some(elements) = value.as_array() else {
                issues.push(wrong_type(path, "array", value));
                return value.clone();
            };

            if let Some(min) = min_items {
                if elements.len() < *min {
                    issues.push(ValidationIssue::new(
                        path,
                        IssueCode::TooFewItems,
                        format!("array has {} items, fewer than minimum {}", elements.len(), min),
                    ));
                }
            }
            if let Some(max) = max_items {
                if elements.len() > *max {
                    issues.push(ValidationIssue::new(
                        path,
                        IssueCode::TooManyItems,
                        format!("array has {} items, more than maximum {}", elements.len(), max),
                    ));
                }
            }

            Value::Array(
                elements
                    .iter()
                    .enumerate()
                    .map(|(i, v)| check(items, v, &format!("{path}[{i}]"), issues))
                    .collect(),
            )
        }
    }
}

fn check_string(rules: &StringRules, s: &str, path: &str, issues: &mut Vec<ValidationIssue>) {
    // An enum replaces every other string rule.
    if let Some(choices) = &rules.choices {
        if !choices.iter().any(|c| c == s) {
            issues.push(not_in_enum(path, choices));
        }
        return;
    }

    let len = s.chars().count();
    if let Some(min) = rules.min_length {
        if len < min {
            issues.push(ValidationIssue::new(
                path,
                IssueCode::TooShort,
                format!("string length {len} is less than minimum {min}"),
            ));
        }
    }
    if let Some(max) = rules.max_length {
        if len > max {
            issues.push(ValidationIssue::new(
                path,
                IssueCode::TooLong,
                format!("string length {len} is greater than maximum {max}"),
            ));
        }
    }
    if let Some(pattern) = &rules.pattern {
        if !pattern.is_match(s) {
            issues.push(ValidationIssue::new(
                path,
                IssueCode::PatternMismatch,
                format!("string does not match pattern {}", pattern.as_str()),
            ));
        }
    }
    if let Some(format) = rules.format {
        if !format.matches(s) {
            issues.push(ValidationIssue::new(
                path,
                IssueCode::InvalidFormat,
                format.failure_message(),
            ));
        }
    }
}

fn check_number(rules: &NumberRules, n: f64, path: &str, issues: &mut Vec<ValidationIssue>) {
    if rules.integer && n.fract() != 0.0 {
        issues.push(ValidationIssue::new(
            path,
            IssueCode::NotInteger,
            format!("expected integer, got {n}"),
        ));
    }
    if let Some(min) = rules.minimum {
        if n < min {
            issues.push(ValidationIssue::new(
                path,
                IssueCode::TooSmall,
                format!("value {n} is less than minimum {min}"),
            ));
        }
    }
    if let Some(min) = rules.exclusive_minimum {
        if n <= min {
            issues.push(ValidationIssue::new(
                path,
                IssueCode::TooSmall,
                format!("value {n} must be greater than {min}"),
            ));
        }
    }
    if let Some(max) = rules.maximum {
        if n > max {
            issues.push(ValidationIssue::new(
                path,
                IssueCode::TooLarge,
                format!("value {n} is greater than maximum {max}"),
            ));
        }
    }
    if let Some(max) = rules.exclusive_maximum {
        if n >= max {
            issues.push(ValidationIssue::new(
                path,
                IssueCode::TooLarge,
                format!("value {n} must be less than {max}"),
            ));
        }
    }
}

fn wrong_type(path: &str, expected: &str, value: &Value) -> ValidationIssue {
    ValidationIssue::new(
        path,
        IssueCode::InvalidType,
        format!("expected {expected}, got {}", value_type_name(value)),
    )
}

fn not_in_enum(path: &str, choices: &[String]) -> ValidationIssue {
    ValidationIssue::new(
        path,
        IssueCode::NotInEnum,
        format!("value must be one of: {}", choices.join(", ")),
    )
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn codes(outcome: ValidationOutcome) -> Vec<IssueCode> {
        outcome.unwrap_err().into_iter().map(|i| i.code).collect()
    }

    #[test]
    fn test_signup_body_accepts_valid_input() {
        let v = Validator::compile(&json!({
            "type": "object",
            "properties": {
                "email": { "type": "string", "format": "email" },
                "age": { "type": "number", "minimum": 18 }
            },
            "required": ["email", "age"]
        }));

        let data = v.validate(&json!({ "email": "a@b.com", "age": 25 })).unwrap();
        assert_eq!(data, json!({ "email": "a@b.com", "age": 25 }));
    }

    #[test]
    fn test_signup_body_reports_every_issue() {
        let v = Validator::compile(&json!({
            "type": "object",
            "properties": {
                "email": { "type": "string", "format": "email" },
                "age": { "type": "number", "minimum": 18 }
            },
            "required": ["email", "age"]
        }));

        let issues = v.validate(&json!({ "email": "x", "age": 15 })).unwrap_err();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].path, "$.email");
        assert_eq!(issues[0].code, IssueCode::InvalidFormat);
        assert_eq!(issues[1].path, "$.age");
        assert_eq!(issues[1].code, IssueCode::TooSmall);
    }

    #[test]
    fn test_properties_keep_declared_order() {
        let v = Validator::compile(&json!({
            "type": "object",
            "properties": {
                "zeta": { "type": "string" },
                "alpha": { "type": "string" }
            },
            "required": ["zeta", "alpha"]
        }));

        let paths: Vec<String> = v
            .validate(&json!({}))
            .unwrap_err()
            .into_iter()
            .map(|i| i.path)
            .collect();
        assert_eq!(paths, vec!["$.zeta", "$.alpha"]);

        let data = v.validate(&json!({ "alpha": "a", "zeta": "z" })).unwrap();
        let keys: Vec<&str> = data.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_object_drops_undeclared_properties() {
        let v = Validator::compile(&json!({
            "type": "object",
            "properties": { "id": { "type": "string" } }
        }));
        let data = v.validate(&json!({ "id": "1", "extra": true })).unwrap();
        assert_eq!(data, json!({ "id": "1" }));
    }

    #[test]
    fn test_missing_required() {
        let v = Validator::compile(&json!({
            "type": "object",
            "properties": { "id": { "type": "string" } },
            "required": ["id"]
        }));
        assert_eq!(codes(v.validate(&json!({}))), vec![IssueCode::Required]);
        assert_eq!(codes(v.validate(&json!("nope"))), vec![IssueCode::InvalidType]);
    }

    #[test]
    fn test_optional_property_may_be_absent() {
        let v = Validator::compile(&json!({
            "type": "object",
            "properties": { "nick": { "type": "string" } }
        }));
        assert!(v.validate(&json!({})).is_ok());
    }

    #[test]
    fn test_string_rules() {
        let v = Validator::compile(&json!({
            "type": "string", "minLength": 2, "maxLength": 4, "pattern": "^[a-z]+$"
        }));
        assert!(v.validate(&json!("abc")).is_ok());
        assert_eq!(codes(v.validate(&json!("a"))), vec![IssueCode::TooShort]);
        assert_eq!(codes(v.validate(&json!("abcde"))), vec![IssueCode::TooLong]);
        assert_eq!(codes(v.validate(&json!("AB"))), vec![IssueCode::PatternMismatch]);
        assert_eq!(codes(v.validate(&json!(12))), vec![IssueCode::InvalidType]);
    }

    #[test]
    fn test_format_is_checked_alongside_length_rules() {
        let v = Validator::compile(&json!({ "type": "string", "format": "email", "maxLength": 5 }));
        assert!(v.validate(&json!("a@b.c")).is_ok());
        assert_eq!(
            codes(v.validate(&json!("ada@example.com"))),
            vec![IssueCode::TooLong]
        );
        assert_eq!(
            codes(v.validate(&json!("abcdefgh"))),
            vec![IssueCode::TooLong, IssueCode::InvalidFormat]
        );
    }

    #[test]
    fn test_string_length_counts_characters() {
        let v = Validator::compile(&json!({ "type": "string", "maxLength": 3 }));
        assert!(v.validate(&json!("héé")).is_ok());
    }

    #[test]
    fn test_string_enum_overrides_other_rules() {
        let v = Validator::compile(&json!({
            "type": "string", "minLength": 10, "enum": ["red", "green"]
        }));
        assert!(v.validate(&json!("red")).is_ok());
        assert_eq!(codes(v.validate(&json!("blue"))), vec![IssueCode::NotInEnum]);
    }

    #[test]
    fn test_top_level_enum_coerces_to_string() {
        let v = Validator::compile(&json!({ "enum": ["1", 2, true] }));
        assert!(v.validate(&json!(1)).is_ok());
        assert!(v.validate(&json!("2")).is_ok());
        assert!(v.validate(&json!("true")).is_ok());
        assert_eq!(codes(v.validate(&json!(3))), vec![IssueCode::NotInEnum]);
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let v = Validator::compile(&json!({ "type": "integer", "minimum": 0 }));
        assert!(v.validate(&json!(3)).is_ok());
        assert_eq!(codes(v.validate(&json!(3.5))), vec![IssueCode::NotInteger]);
        assert_eq!(
            codes(v.validate(&json!(-1.5))),
            vec![IssueCode::NotInteger, IssueCode::TooSmall]
        );
    }

    #[test]
    fn test_exclusive_bounds() {
        let v = Validator::compile(&json!({
            "type": "number", "exclusiveMinimum": 0, "exclusiveMaximum": 10
        }));
        assert!(v.validate(&json!(5)).is_ok());
        assert_eq!(codes(v.validate(&json!(0))), vec![IssueCode::TooSmall]);
        assert_eq!(codes(v.validate(&json!(10))), vec![IssueCode::TooLarge]);
    }

    #[test]
    fn test_boolean_exclusive_bounds() {
        let v = Validator::compile(&json!({
            "type": "number", "minimum": 1, "exclusiveMinimum": true
        }));
        assert_eq!(codes(v.validate(&json!(1))), vec![IssueCode::TooSmall]);
        assert!(v.validate(&json!(1.01)).is_ok());
    }

    #[test]
    fn test_array_items_and_bounds() {
        let v = Validator::compile(&json!({
            "type": "array",
            "items": { "type": "integer" },
            "minItems": 1,
            "maxItems": 3
        }));
        assert!(v.validate(&json!([1, 2])).is_ok());
        assert_eq!(codes(v.validate(&json!([]))), vec![IssueCode::TooFewItems]);
        assert_eq!(codes(v.validate(&json!([1, 2, 3, 4]))), vec![IssueCode::TooManyItems]);

        let issues = v.validate(&json!([1, "two"])).unwrap_err();
        assert_eq!(issues[0].path, "$[1]");
    }

    #[test]
    fn test_array_without_items_accepts_anything() {
        let v = Validator::compile(&json!({ "type": "array" }));
        assert!(v.validate(&json!([1, "a", null, {}])).is_ok());
    }

    #[test]
    fn test_nested_paths() {
        let v = Validator::compile(&json!({
            "type": "object",
            "properties": {
                "items": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": { "sku": { "type": "string" } },
                        "required": ["sku"]
                    }
                }
            }
        }));
        let issues = v.validate(&json!({ "items": [{ "sku": "a" }, {}] })).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "$.items[1].sku");
    }

    #[test]
    fn test_unknown_or_absent_type_accepts_anything() {
        assert!(Validator::compile(&json!({})).accepts_anything());
        assert!(Validator::compile(&json!({ "type": "null" })).accepts_anything());
        assert!(Validator::compile(&json!(true)).accepts_anything());
    }

    #[test]
    fn test_malformed_schema_degrades() {
        let v = Validator::compile(&json!({ "type": "string", "pattern": "([" }));
        assert!(v.accepts_anything());
        assert!(matches!(v.defect(), Some(SchemaDefect::InvalidPattern { .. })));
        assert!(v.validate(&json!(42)).is_ok());

        let v = Validator::compile(&json!({
            "type": "object",
            "properties": { "n": { "type": "string", "minLength": "three" } }
        }));
        assert!(v.accepts_anything());
        assert!(v.defect().unwrap().to_string().contains("minLength"));
    }

    #[test]
    fn test_validator_schema_keeps_document() {
        let doc = json!({ "type": "boolean" });
        let schema = ValidatorSchema::compile(doc.clone());
        assert_eq!(schema.schema(), &doc);
        assert!(schema.validate(&json!(false)).is_ok());
        assert!(schema.validate(&json!("false")).is_err());
    }

    proptest! {
        #[test]
        fn prop_anything_passes_open_schema(n in any::<i64>(), s in ".*") {
            let v = Validator::compile(&json!({}));
            prop_assert_eq!(v.validate(&json!(n)).unwrap(), json!(n));
            prop_assert_eq!(v.validate(&json!(s.clone())).unwrap(), json!(s));
        }

        #[test]
        fn prop_minimum_is_inclusive(min in -1000i64..1000, delta in 0i64..1000) {
            let v = Validator::compile(&json!({ "type": "integer", "minimum": min }));
            prop_assert!(v.validate(&json!(min + delta)).is_ok());
            prop_assert!(v.validate(&json!(min - 1)).is_err());
        }
    }
}
