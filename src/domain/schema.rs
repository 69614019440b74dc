//! Tool parameter schemas and their compiled validators
//!
//! A schema is a closed set of tagged variants (`object`, `string`, `number`,
//! `boolean`), so every rule below is matched exhaustively. Validation never
//! stops at the first violation: all field errors are collected, in
//! property-declaration order, so failures are reproducible across runs.

use std::fmt;

use serde::{
    de::{self, MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SchemaDefinition {
    Object {
        #[serde(default)]
        properties: Properties,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        required: Vec<String>,
    },
    String,
    Number,
    Boolean,
}

/// Declared object properties, kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Vec<(String, SchemaDefinition)>);

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema root must be of type object, found {0}")]
    RootNotObject(&'static str),
    #[error("malformed schema: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct CompiledValidator {
    properties: Vec<CompiledProperty>,
    undeclared_required: Vec<String>,
}

#[derive(Debug, Clone)]
struct CompiledProperty {
    name: String,
    required: bool,
    constraint: Constraint,
}

#[derive(Debug, Clone)]
enum Constraint {
    String,
    Number,
    Boolean,
    Object(CompiledValidator),
}

impl SchemaDefinition {
    pub fn object<'a>(
        properties: impl IntoIterator<Item = (&'a str, SchemaDefinition)>,
        required: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self::Object {
            properties: Properties(
                properties
                    .into_iter()
                    .map(|(name, schema)| (name.to_string(), schema))
                    .collect(),
            ),
            required: required.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Object { .. } => "object",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

impl Properties {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaDefinition)> {
        self.0.iter().map(|(name, schema)| (name.as_str(), schema))
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, schema) in &self.0 {
            map.serialize_entry(name, schema)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PropertiesVisitor;

        impl<'de> Visitor<'de> for PropertiesVisitor {
            type Value = Properties;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of property names to schemas")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Properties, A::Error> {
                let mut entries: Vec<(String, SchemaDefinition)> = Vec::new();
                while let Some((name, schema)) = access.next_entry::<String, SchemaDefinition>()? {
                    if entries.iter().any(|(existing, _)| *existing == name) {
                        return Err(de::Error::custom(format!("duplicate property `{name}`")));
                    }
                    entries.push((name, schema));
                }
                Ok(Properties(entries))
            }
        }

        deserializer.deserialize_map(PropertiesVisitor)
    }
}

/// Compiles an object schema into a reusable validator.
pub fn compile(schema: &SchemaDefinition) -> Result<CompiledValidator, SchemaError> {
    match schema {
        SchemaDefinition::Object {
            properties,
            required,
        } => Ok(CompiledValidator::from_parts(properties, required)),
        other => Err(SchemaError::RootNotObject(other.type_name())),
    }
}

impl CompiledValidator {
    fn from_parts(properties: &Properties, required: &[String]) -> Self {
        let compiled = properties
            .iter()
            .map(|(name, schema)| CompiledProperty {
                name: name.to_string(),
                required: required.iter().any(|item| item == name),
                constraint: Constraint::from_schema(schema),
            })
            .collect::<Vec<_>>();

        let mut undeclared_required: Vec<String> = Vec::new();
        for name in required {
            let declared = compiled.iter().any(|property| property.name == *name);
            if !declared && !undeclared_required.contains(name) {
                undeclared_required.push(name.clone());
            }
        }

        Self {
            properties: compiled,
            undeclared_required,
        }
    }

    pub fn validate(&self, candidate: &Value) -> Result<(), Vec<FieldError>> {
        match candidate.as_object() {
            Some(object) => self.validate_object(object),
            None => Err(vec![FieldError::not_an_object(candidate)]),
        }
    }

    pub fn validate_object(&self, object: &Map<String, Value>) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        self.collect(object, None, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn collect(
        &self,
        object: &Map<String, Value>,
        path: Option<&str>,
        errors: &mut Vec<FieldError>,
    ) {
        for property in &self.properties {
            let field = join_path(path, &property.name);
            match object.get(&property.name) {
                Some(value) => property.constraint.check(value, field, errors),
                None if property.required => errors.push(FieldError::required(field)),
                None => {}
            }
        }

        for name in &self.undeclared_required {
            if !object.contains_key(name) {
                errors.push(FieldError::required(join_path(path, name)));
            }
        }
    }
}

impl Constraint {
    fn from_schema(schema: &SchemaDefinition) -> Self {
        match schema {
            SchemaDefinition::Object {
                properties,
                required,
            } => Self::Object(CompiledValidator::from_parts(properties, required)),
            SchemaDefinition::String => Self::String,
            SchemaDefinition::Number => Self::Number,
            SchemaDefinition::Boolean => Self::Boolean,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object(_) => "object",
        }
    }

    fn check(&self, value: &Value, field: String, errors: &mut Vec<FieldError>) {
        match (self, value) {
            (Self::String, Value::String(_))
            | (Self::Number, Value::Number(_))
            | (Self::Boolean, Value::Bool(_)) => {}
            (Self::Object(nested), Value::Object(object)) => {
                nested.collect(object, Some(&field), errors)
            }
            _ => errors.push(FieldError::type_mismatch(field, self.type_name(), value)),
        }
    }
}

impl FieldError {
    fn not_an_object(candidate: &Value) -> Self {
        Self {
            field: None,
            message: "params is not an object".to_string(),
            expected: Some("object"),
            actual: Some(value_kind(candidate)),
        }
    }

    pub fn required(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            message: format!("{field} is required"),
            field: Some(field),
            expected: None,
            actual: None,
        }
    }

    pub fn type_mismatch(field: impl Into<String>, expected: &'static str, value: &Value) -> Self {
        let field = field.into();
        let actual = value_kind(value);
        Self {
            message: format!("{field} must be of type {expected}, found {actual}"),
            field: Some(field),
            expected: Some(expected),
            actual: Some(actual),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join_path(path: Option<&str>, name: &str) -> String {
    match path {
        Some(prefix) => format!("{prefix}.{name}"),
        None => name.to_string(),
    }
}
