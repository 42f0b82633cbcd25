use serde::Serialize;

use super::ExtensionSchema;
use crate::error::ParseError;
use crate::fields::{FieldMap, FieldValue};
use crate::tokenizer::parse_extensions;

/// Generic fallback variant for any (vendor, product) pair without a named
/// layout. Stores the tokenized map verbatim, keys exactly as found.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DefaultExtension {
    fields: FieldMap,
}

impl DefaultExtension {
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }
}

impl ExtensionSchema for DefaultExtension {
    fn populate(&mut self, extension: &str) -> FieldMap {
        self.fields = parse_extensions(extension);
        self.fields.clone()
    }

    fn as_json(&self) -> String {
        serde_json::to_string_pretty(&self.fields).unwrap_or_default()
    }

    fn to_map(&self) -> FieldMap {
        self.fields.clone()
    }

    fn field_names(&self) -> Vec<String> {
        self.fields.keys().map(str::to_owned).collect()
    }

    fn get_field(&self, name: &str) -> Result<FieldValue, ParseError> {
        self.fields
            .get(name)
            .map(FieldValue::from)
            .ok_or_else(|| ParseError::FieldNotFound(name.to_owned()))
    }
}
