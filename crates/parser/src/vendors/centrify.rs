use serde::Serialize;

use super::{
    populate_from_table, table_field_names, table_get_field, table_to_map, ExtensionSchema,
    FieldDef, FieldKind,
};
use crate::error::ParseError;
use crate::fields::{FieldMap, FieldValue};

/// Fixed field layout for Centrify Cloud events
/// (`deviceVendor=Centrify`, `deviceProduct=Centrify_Cloud`).
///
/// All 26 fields are plain text; there is no post-processing beyond direct
/// assignment from the tokenized map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CentrifyExtension {
    #[serde(rename = "DHost")]
    pub dhost: String,
    #[serde(rename = "DUser")]
    pub duser: String,
    #[serde(rename = "Msg")]
    pub msg: String,
    #[serde(rename = "SHost")]
    pub shost: String,
    #[serde(rename = "Src")]
    pub src: String,
    #[serde(rename = "RT")]
    pub rt: String,
    #[serde(rename = "DeviceProcessName")]
    pub device_process_name: String,
    #[serde(rename = "DvcHost")]
    pub dvc_host: String,
    #[serde(rename = "DTZ")]
    pub dtz: String,
    #[serde(rename = "RequestContext")]
    pub request_context: String,
    #[serde(rename = "ExternalID")]
    pub external_id: String,
    #[serde(rename = "DPriv")]
    pub dpriv: String,
    #[serde(rename = "DestinationService")]
    pub destination_service: String,
    #[serde(rename = "SUID")]
    pub suid: String,
    #[serde(rename = "CS1")]
    pub cs1: String,
    #[serde(rename = "CS1Label")]
    pub cs1_label: String,
    #[serde(rename = "CS2")]
    pub cs2: String,
    #[serde(rename = "CS2Label")]
    pub cs2_label: String,
    #[serde(rename = "CS3")]
    pub cs3: String,
    #[serde(rename = "CS3Label")]
    pub cs3_label: String,
    #[serde(rename = "CS4")]
    pub cs4: String,
    #[serde(rename = "CS4Label")]
    pub cs4_label: String,
    #[serde(rename = "CS5")]
    pub cs5: String,
    #[serde(rename = "CS5Label")]
    pub cs5_label: String,
    #[serde(rename = "CS6")]
    pub cs6: String,
    #[serde(rename = "CS6Label")]
    pub cs6_label: String,
}

macro_rules! text {
    ($name:literal, $key:literal, $field:ident) => {
        FieldDef {
            name: $name,
            key: $key,
            kind: FieldKind::Text,
            get: |e: &CentrifyExtension| FieldValue::Text(e.$field.clone()),
            set: |e: &mut CentrifyExtension, v: &str| e.$field = v.to_owned(),
        }
    };
}

/// Field table, declaration order. Aliases carry the vendor's wire casing.
const FIELDS: &[FieldDef<CentrifyExtension>] = &[
    text!("DHost", "dhost", dhost),
    text!("DUser", "duser", duser),
    text!("Msg", "msg", msg),
    text!("SHost", "shost", shost),
    text!("Src", "src", src),
    text!("RT", "rt", rt),
    text!("DeviceProcessName", "deviceProcessName", device_process_name),
    text!("DvcHost", "dvchost", dvc_host),
    text!("DTZ", "dtz", dtz),
    text!("RequestContext", "requestContext", request_context),
    text!("ExternalID", "externalId", external_id),
    text!("DPriv", "dpriv", dpriv),
    text!(
        "DestinationService",
        "destinationServiceName",
        destination_service
    ),
    text!("SUID", "suid", suid),
    text!("CS1", "cs1", cs1),
    text!("CS1Label", "cs1Label", cs1_label),
    text!("CS2", "cs2", cs2),
    text!("CS2Label", "cs2Label", cs2_label),
    text!("CS3", "cs3", cs3),
    text!("CS3Label", "cs3Label", cs3_label),
    text!("CS4", "cs4", cs4),
    text!("CS4Label", "cs4Label", cs4_label),
    text!("CS5", "cs5", cs5),
    text!("CS5Label", "cs5Label", cs5_label),
    text!("CS6", "cs6", cs6),
    text!("CS6Label", "cs6Label", cs6_label),
];

impl ExtensionSchema for CentrifyExtension {
    fn populate(&mut self, extension: &str) -> FieldMap {
        populate_from_table(self, FIELDS, extension)
    }

    fn as_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    fn to_map(&self) -> FieldMap {
        table_to_map(self, FIELDS)
    }

    fn field_names(&self) -> Vec<String> {
        table_field_names(FIELDS)
    }

    fn get_field(&self, name: &str) -> Result<FieldValue, ParseError> {
        table_get_field(self, FIELDS, name)
    }
}
