//! Display fields and field groups.
//!
//! A [`FieldGroup`] is an ordered collection of [`Field`]s with unique keys.
//! Adding a field whose key already exists replaces the previous entry in
//! place, keeping its original position.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Value of a display field: free text or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Textual value, rendered as-is.
    Text(String),
    /// Numeric value, formatted by the platform according to the field's
    /// number or currency style.
    Number(f64),
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Number(v as f64)
    }
}

/// Horizontal alignment of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlignment {
    #[serde(rename = "PKTextAlignmentLeft")]
    Left,
    #[serde(rename = "PKTextAlignmentCenter")]
    Center,
    #[serde(rename = "PKTextAlignmentRight")]
    Right,
    #[serde(rename = "PKTextAlignmentNatural")]
    Natural,
}

/// Display style for date and time values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateTimeStyle {
    #[serde(rename = "PKDateStyleNone")]
    None,
    #[serde(rename = "PKDateStyleShort")]
    Short,
    #[serde(rename = "PKDateStyleMedium")]
    Medium,
    #[serde(rename = "PKDateStyleLong")]
    Long,
    #[serde(rename = "PKDateStyleFull")]
    Full,
}

/// A single display field: key, optional label, and a value, plus the
/// optional presentation attributes the platform understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Unique (within its group) identifier for the field.
    pub key: String,
    /// Label shown next to the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// The field value.
    pub value: FieldValue,
    /// Attributed variant of the value (may contain a single anchor tag).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributed_value: Option<FieldValue>,
    /// Format string for the change notification shown when the value
    /// updates. Must contain the `%@` placeholder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_alignment: Option<TextAlignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_style: Option<DateTimeStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_style: Option<DateTimeStyle>,
    /// ISO 4217 currency code; the value is then formatted as an amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
}

impl Field {
    /// Create a field with a key and value.
    pub fn new(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            label: None,
            value: value.into(),
            attributed_value: None,
            change_message: None,
            text_alignment: None,
            date_style: None,
            time_style: None,
            currency_code: None,
        }
    }

    /// Create a text field. Shorthand for `Field::new(key, text)`.
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, FieldValue::Text(value.into()))
    }

    /// Set the label shown next to the value.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the change-notification format string.
    pub fn change_message(mut self, message: impl Into<String>) -> Self {
        self.change_message = Some(message.into());
        self
    }

    /// Set the text alignment.
    pub fn text_alignment(mut self, alignment: TextAlignment) -> Self {
        self.text_alignment = Some(alignment);
        self
    }

    /// Set the ISO 4217 currency code.
    pub fn currency_code(mut self, code: impl Into<String>) -> Self {
        self.currency_code = Some(code.into());
        self
    }
}

/// Ordered, key-unique collection of display fields.
///
/// Serializes as a JSON array of fields. Deserializing collapses duplicate
/// keys through [`FieldGroup::add`], so the last occurrence of a key wins
/// while the first occurrence keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldGroup {
    fields: Vec<Field>,
}

impl FieldGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to the group.
    ///
    /// If a field with the same key already exists it is replaced in place;
    /// the group keeps its original ordering and length. Otherwise the field
    /// is appended.
    pub fn add(&mut self, field: Field) -> &mut Self {
        match self.fields.iter_mut().find(|f| f.key == field.key) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Look up a field by key.
    pub fn get(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Remove a field by key, returning it if present.
    pub fn remove(&mut self, key: &str) -> Option<Field> {
        let index = self.fields.iter().position(|f| f.key == key)?;
        Some(self.fields.remove(index))
    }

    /// Number of fields in the group.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the group holds no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over the fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }
}

impl<'a> IntoIterator for &'a FieldGroup {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl Serialize for FieldGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.fields.iter())
    }
}

impl<'de> Deserialize<'de> for FieldGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Vec::<Field>::deserialize(deserializer)?;
        let mut group = FieldGroup::new();
        for field in fields {
            group.add(field);
        }
        Ok(group)
    }
}
