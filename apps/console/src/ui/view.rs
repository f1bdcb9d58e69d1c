//! Pure rendering of a host record into an attribute form.

use std::fmt;

use shared::domain::{FieldValue, HostRecord};

pub const ATTRIBUTES_TAB: &str = "attributes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Read-only labeled text.
    Text,
    TextBox,
    CheckBox,
}

impl AttributeKind {
    pub fn is_editable(self) -> bool {
        !matches!(self, AttributeKind::Text)
    }

    /// Converts raw user input into the value shape this widget binds.
    pub fn parse_input(self, raw: &str) -> Option<FieldValue> {
        match self {
            AttributeKind::Text | AttributeKind::TextBox => Some(FieldValue::Text(raw.to_string())),
            AttributeKind::CheckBox => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" | "x" => Some(FieldValue::Flag(true)),
                "false" | "no" | "off" | "0" | "" => Some(FieldValue::Flag(false)),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: AttributeKind,
    pub value: FieldValue,
}

const HOST_ATTRIBUTES: [(&str, &str, AttributeKind); 11] = [
    ("objuuid", "UUID", AttributeKind::Text),
    ("name", "Name", AttributeKind::TextBox),
    ("url", "Controller URL", AttributeKind::TextBox),
    ("loglevel", "Log Level", AttributeKind::TextBox),
    ("seconds", "Seconds", AttributeKind::TextBox),
    ("minutes", "Minutes", AttributeKind::TextBox),
    ("hours", "Hours", AttributeKind::TextBox),
    ("dayofmonth", "Day of Month", AttributeKind::TextBox),
    ("dayofweek", "Day of Week", AttributeKind::TextBox),
    ("year", "Year", AttributeKind::TextBox),
    ("enabled", "Enabled", AttributeKind::CheckBox),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostView {
    pub title: String,
    pub heading: String,
    pub active_tab: &'static str,
    pub attributes: Vec<Attribute>,
}

impl HostView {
    pub fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.key == key)
    }
}

/// Builds the host edit form. The attribute list is fixed; record content
/// only changes values, never which fields appear or their order.
pub fn render_host(record: &HostRecord) -> HostView {
    let attributes = HOST_ATTRIBUTES
        .iter()
        .map(|&(key, label, kind)| Attribute {
            key,
            label,
            kind,
            value: record.field(key),
        })
        .collect();

    HostView {
        title: record.name.clone(),
        heading: format!("{}: {}", record.kind.to_uppercase(), record.name),
        active_tab: ATTRIBUTES_TAB,
        attributes,
    }
}

impl fmt::Display for HostView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        writeln!(f, "[{}]", self.active_tab)?;
        let width = self
            .attributes
            .iter()
            .map(|attr| attr.label.len())
            .max()
            .unwrap_or(0);
        for attr in &self.attributes {
            let marker = if attr.kind.is_editable() { ' ' } else { '*' };
            writeln!(f, "{marker} {:<width$}  {}", attr.label, attr.value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
