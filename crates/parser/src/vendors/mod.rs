//! Vendor schema variants and the (vendor, product) dispatch table.
//!
//! Each variant consumes the generic extension map and exposes the same
//! capability set. Named variants drive everything off a static field
//! table (public name, extension-key alias, value kind, accessor pair)
//! built once at type-definition time — `get_field` is a table lookup,
//! never runtime reflection.

pub mod centrify;
pub mod default;
pub mod imperva;

// Re-export variant implementations
pub use centrify::CentrifyExtension;
pub use default::DefaultExtension;
pub use imperva::ImpervaExtension;

use serde::Serialize;

use crate::error::ParseError;
use crate::fields::{FieldMap, FieldValue};
use crate::tokenizer::parse_extensions;

/// Capability set shared by every schema variant.
pub trait ExtensionSchema {
    /// Tokenize `extension` and assign the variant's fields from the
    /// resulting generic map. The map itself is returned so callers can
    /// inspect keys the variant does not declare.
    fn populate(&mut self, extension: &str) -> FieldMap;

    /// Pretty JSON in the variant's stable field order.
    fn as_json(&self) -> String;

    /// Text-valued fields keyed by lower-cased field name for named
    /// variants; the verbatim generic map for the default variant.
    fn to_map(&self) -> FieldMap;

    /// Declared field names, declaration order (insertion order for the
    /// default variant).
    fn field_names(&self) -> Vec<String>;

    /// Look up a declared field by name.
    fn get_field(&self, name: &str) -> Result<FieldValue, ParseError>;
}

/// Closed set of extension layouts. The variant is chosen once per event
/// and fixed for the event's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Extension {
    Default(DefaultExtension),
    Imperva(ImpervaExtension),
    Centrify(CentrifyExtension),
}

impl Extension {
    /// Schema registry: total over a closed static table, exact string
    /// equality on the pair — no partial matches, no case normalization.
    pub fn for_device(vendor: &str, product: &str) -> Extension {
        match (vendor, product) {
            ("Incapsula", "SIEMintegration") => Extension::Imperva(ImpervaExtension::default()),
            ("Centrify", "Centrify_Cloud") => Extension::Centrify(CentrifyExtension::default()),
            _ => Extension::Default(DefaultExtension::default()),
        }
    }
}

impl ExtensionSchema for Extension {
    fn populate(&mut self, extension: &str) -> FieldMap {
        match self {
            Extension::Default(e) => e.populate(extension),
            Extension::Imperva(e) => e.populate(extension),
            Extension::Centrify(e) => e.populate(extension),
        }
    }

    fn as_json(&self) -> String {
        match self {
            Extension::Default(e) => e.as_json(),
            Extension::Imperva(e) => e.as_json(),
            Extension::Centrify(e) => e.as_json(),
        }
    }

    fn to_map(&self) -> FieldMap {
        match self {
            Extension::Default(e) => e.to_map(),
            Extension::Imperva(e) => e.to_map(),
            Extension::Centrify(e) => e.to_map(),
        }
    }

    fn field_names(&self) -> Vec<String> {
        match self {
            Extension::Default(e) => e.field_names(),
            Extension::Imperva(e) => e.field_names(),
            Extension::Centrify(e) => e.field_names(),
        }
    }

    fn get_field(&self, name: &str) -> Result<FieldValue, ParseError> {
        match self {
            Extension::Default(e) => e.get_field(name),
            Extension::Imperva(e) => e.get_field(name),
            Extension::Centrify(e) => e.get_field(name),
        }
    }
}

/// Kind of a declared field; decides `to_map` membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    /// Plain text; carried in `to_map`.
    Text,
    /// Ordered string list (Imperva XFF); not carried in `to_map`.
    List,
    /// JSON-prone; not carried in `to_map`.
    Json,
}

/// One row of a variant's static field table.
pub(crate) struct FieldDef<T> {
    pub name: &'static str,
    /// Extension-key alias, vendor casing as found on the wire.
    pub key: &'static str,
    pub kind: FieldKind,
    pub get: fn(&T) -> FieldValue,
    pub set: fn(&mut T, &str),
}

/// Populate every declared field from the tokenized map. An absent alias
/// assigns the empty value; that is never an error.
pub(crate) fn populate_from_table<T>(
    target: &mut T,
    table: &[FieldDef<T>],
    extension: &str,
) -> FieldMap {
    let fields = parse_extensions(extension);
    for def in table {
        (def.set)(target, fields.get(def.key).unwrap_or(""));
    }
    fields
}

pub(crate) fn table_to_map<T>(source: &T, table: &[FieldDef<T>]) -> FieldMap {
    let mut map = FieldMap::new();
    for def in table {
        if def.kind == FieldKind::Text {
            if let FieldValue::Text(value) = (def.get)(source) {
                map.insert(def.name.to_lowercase(), value);
            }
        }
    }
    map
}

pub(crate) fn table_field_names<T>(table: &[FieldDef<T>]) -> Vec<String> {
    table.iter().map(|def| def.name.to_owned()).collect()
}

pub(crate) fn table_get_field<T>(
    source: &T,
    table: &[FieldDef<T>],
    name: &str,
) -> Result<FieldValue, ParseError> {
    table
        .iter()
        .find(|def| def.name == name)
        .map(|def| (def.get)(source))
        .ok_or_else(|| ParseError::FieldNotFound(name.to_owned()))
}
