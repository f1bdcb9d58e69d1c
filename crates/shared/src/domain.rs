use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::protocol::ContextMenu;

/// Opaque inventory object identifier. The backend issues these; the client
/// never inspects their format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ObjUuid(pub String);

impl ObjUuid {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjUuid {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ObjUuid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

fn wildcard() -> String {
    "*".to_string()
}

fn default_loglevel() -> String {
    "20".to_string()
}

fn default_enabled() -> bool {
    true
}

/// Editable representation of a managed host as served by `inventory/get_object`.
///
/// Every field tolerates being absent on the wire. Keys this type does not
/// model are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostRecord {
    #[serde(default)]
    pub objuuid: ObjUuid,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_loglevel")]
    pub loglevel: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "wildcard")]
    pub seconds: String,
    #[serde(default = "wildcard")]
    pub minutes: String,
    #[serde(default = "wildcard")]
    pub hours: String,
    #[serde(default = "wildcard")]
    pub dayofmonth: String,
    #[serde(default = "wildcard")]
    pub dayofweek: String,
    #[serde(default = "wildcard")]
    pub year: String,
    #[serde(default)]
    pub parent: String,
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub context: ContextMenu,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for HostRecord {
    fn default() -> Self {
        Self {
            objuuid: ObjUuid::default(),
            name: String::new(),
            kind: String::new(),
            url: String::new(),
            loglevel: default_loglevel(),
            enabled: default_enabled(),
            seconds: wildcard(),
            minutes: wildcard(),
            hours: wildcard(),
            dayofmonth: wildcard(),
            dayofweek: wildcard(),
            year: wildcard(),
            parent: String::new(),
            children: Vec::new(),
            icon: String::new(),
            context: ContextMenu::new(),
            extra: Map::new(),
        }
    }
}

/// A form value bound to one record key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Flag(true) => f.write_str("[x]"),
            FieldValue::Flag(false) => f.write_str("[ ]"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("field `{key}` expects a boolean")]
    ExpectedFlag { key: String },
    #[error("field `{key}` expects text")]
    ExpectedText { key: String },
    #[error("field `{key}` is read-only")]
    ReadOnly { key: String },
}

impl HostRecord {
    /// Keyed read used by form binding. Unknown keys fall back to `extra`;
    /// a missing key reads as empty text.
    pub fn field(&self, key: &str) -> FieldValue {
        let text = match key {
            "objuuid" => self.objuuid.0.clone(),
            "name" => self.name.clone(),
            "type" => self.kind.clone(),
            "url" => self.url.clone(),
            "loglevel" => self.loglevel.clone(),
            "enabled" => return FieldValue::Flag(self.enabled),
            "seconds" => self.seconds.clone(),
            "minutes" => self.minutes.clone(),
            "hours" => self.hours.clone(),
            "dayofmonth" => self.dayofmonth.clone(),
            "dayofweek" => self.dayofweek.clone(),
            "year" => self.year.clone(),
            other => match self.extra.get(other) {
                Some(Value::Bool(flag)) => return FieldValue::Flag(*flag),
                Some(Value::String(text)) => text.clone(),
                Some(Value::Null) | None => String::new(),
                Some(value) => value.to_string(),
            },
        };
        FieldValue::Text(text)
    }

    /// Keyed write used by form binding.
    pub fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), FieldError> {
        if key == "objuuid" {
            return Err(FieldError::ReadOnly {
                key: key.to_string(),
            });
        }

        if key == "enabled" {
            let FieldValue::Flag(flag) = value else {
                return Err(FieldError::ExpectedFlag {
                    key: key.to_string(),
                });
            };
            self.enabled = flag;
            return Ok(());
        }

        let slot = match key {
            "name" => &mut self.name,
            "type" => &mut self.kind,
            "url" => &mut self.url,
            "loglevel" => &mut self.loglevel,
            "seconds" => &mut self.seconds,
            "minutes" => &mut self.minutes,
            "hours" => &mut self.hours,
            "dayofmonth" => &mut self.dayofmonth,
            "dayofweek" => &mut self.dayofweek,
            "year" => &mut self.year,
            other => {
                let json = match value {
                    FieldValue::Text(text) => Value::String(text),
                    FieldValue::Flag(flag) => Value::Bool(flag),
                };
                self.extra.insert(other.to_string(), json);
                return Ok(());
            }
        };

        match value {
            FieldValue::Text(text) => {
                *slot = text;
                Ok(())
            }
            FieldValue::Flag(_) => Err(FieldError::ExpectedText {
                key: key.to_string(),
            }),
        }
    }
}
