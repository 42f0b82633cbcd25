use serde::Serialize;

use super::{
    populate_from_table, table_field_names, table_get_field, table_to_map, ExtensionSchema,
    FieldDef, FieldKind,
};
use crate::error::ParseError;
use crate::fields::{FieldMap, FieldValue};
use crate::json;

/// Fixed field layout for Imperva / Incapsula WAF events
/// (`deviceVendor=Incapsula`, `deviceProduct=SIEMintegration`).
///
/// Field order matches the vendor's documented layout and is the
/// serialization order. `XFF` is the comma-space-separated forwarded-for
/// chain; the four JSON-prone fields (`AdditionalReqHeaders`,
/// `AdditionalResHeaders`, `CS10`, `CS11`) hold a decoded structure when
/// the embedded payload parses, the raw text otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImpervaExtension {
    #[serde(rename = "FileID")]
    pub file_id: String,
    #[serde(rename = "SourceServiceName")]
    pub source_service_name: String,
    #[serde(rename = "SiteID")]
    pub site_id: String,
    #[serde(rename = "SUID")]
    pub suid: String,
    #[serde(rename = "RequestClientApplication")]
    pub request_client_application: String,
    #[serde(rename = "DeviceFacility")]
    pub device_facility: String,
    #[serde(rename = "CS2")]
    pub cs2: String,
    #[serde(rename = "CS2Label")]
    pub cs2_label: String,
    #[serde(rename = "CS3")]
    pub cs3: String,
    #[serde(rename = "CS3Label")]
    pub cs3_label: String,
    #[serde(rename = "CS1")]
    pub cs1: String,
    #[serde(rename = "CS1Label")]
    pub cs1_label: String,
    #[serde(rename = "CS4")]
    pub cs4: String,
    #[serde(rename = "CS4Label")]
    pub cs4_label: String,
    #[serde(rename = "CS5")]
    pub cs5: String,
    #[serde(rename = "CS5Label")]
    pub cs5_label: String,
    #[serde(rename = "DProc")]
    pub dproc: String,
    #[serde(rename = "CS6")]
    pub cs6: String,
    #[serde(rename = "CS6Label")]
    pub cs6_label: String,
    #[serde(rename = "CCCode")]
    pub cc_code: String,
    #[serde(rename = "CS7")]
    pub cs7: String,
    #[serde(rename = "CS7Label")]
    pub cs7_label: String,
    #[serde(rename = "CS8")]
    pub cs8: String,
    #[serde(rename = "CS8Label")]
    pub cs8_label: String,
    #[serde(rename = "CS9")]
    pub cs9: String,
    #[serde(rename = "CS9Label")]
    pub cs9_label: String,
    #[serde(rename = "AdditionalReqHeaders")]
    pub additional_req_headers: FieldValue,
    #[serde(rename = "AdditionalResHeaders")]
    pub additional_res_headers: FieldValue,
    #[serde(rename = "Customer")]
    pub customer: String,
    #[serde(rename = "Start")]
    pub start: String,
    #[serde(rename = "Request")]
    pub request: String,
    #[serde(rename = "Ref")]
    pub referrer: String,
    #[serde(rename = "RequestMethod")]
    pub request_method: String,
    #[serde(rename = "CN1")]
    pub cn1: String,
    #[serde(rename = "App")]
    pub app: String,
    #[serde(rename = "Act")]
    pub act: String,
    #[serde(rename = "DeviceExternalID")]
    pub device_external_id: String,
    #[serde(rename = "SIP")]
    pub sip: String,
    #[serde(rename = "SPT")]
    pub spt: String,
    #[serde(rename = "In")]
    pub in_bytes: String,
    #[serde(rename = "XFF")]
    pub xff: Vec<String>,
    #[serde(rename = "CS10")]
    pub cs10: FieldValue,
    #[serde(rename = "CS10Label")]
    pub cs10_label: String,
    #[serde(rename = "CS11")]
    pub cs11: FieldValue,
    #[serde(rename = "CS11Label")]
    pub cs11_label: String,
    #[serde(rename = "CPT")]
    pub cpt: String,
    #[serde(rename = "Src")]
    pub src: String,
    #[serde(rename = "Ver")]
    pub ver: String,
    #[serde(rename = "End")]
    pub end: String,
}

/// Plain text row: stored verbatim, carried in `to_map`.
macro_rules! text {
    ($name:literal, $key:literal, $field:ident) => {
        FieldDef {
            name: $name,
            key: $key,
            kind: FieldKind::Text,
            get: |e: &ImpervaExtension| FieldValue::Text(e.$field.clone()),
            set: |e: &mut ImpervaExtension, v: &str| e.$field = v.to_owned(),
        }
    };
}

/// JSON-prone row: runs the embedded-JSON normalizer on assignment.
macro_rules! json_prone {
    ($name:literal, $key:literal, $field:ident) => {
        FieldDef {
            name: $name,
            key: $key,
            kind: FieldKind::Json,
            get: |e: &ImpervaExtension| e.$field.clone(),
            set: |e: &mut ImpervaExtension, v: &str| e.$field = json::decode_lenient(v),
        }
    };
}

/// Field table, declaration order. Aliases use the vendor's wire casing
/// (`Customer` really is capitalized, `ccode` really is not camel-cased).
const FIELDS: &[FieldDef<ImpervaExtension>] = &[
    text!("FileID", "fileId", file_id),
    text!("SourceServiceName", "sourceServiceName", source_service_name),
    text!("SiteID", "siteid", site_id),
    text!("SUID", "suid", suid),
    text!(
        "RequestClientApplication",
        "requestClientApplication",
        request_client_application
    ),
    text!("DeviceFacility", "deviceFacility", device_facility),
    text!("CS2", "cs2", cs2),
    text!("CS2Label", "cs2Label", cs2_label),
    text!("CS3", "cs3", cs3),
    text!("CS3Label", "cs3Label", cs3_label),
    text!("CS1", "cs1", cs1),
    text!("CS1Label", "cs1Label", cs1_label),
    text!("CS4", "cs4", cs4),
    text!("CS4Label", "cs4Label", cs4_label),
    text!("CS5", "cs5", cs5),
    text!("CS5Label", "cs5Label", cs5_label),
    text!("DProc", "dproc", dproc),
    text!("CS6", "cs6", cs6),
    text!("CS6Label", "cs6Label", cs6_label),
    text!("CCCode", "ccode", cc_code),
    text!("CS7", "cs7", cs7),
    text!("CS7Label", "cs7Label", cs7_label),
    text!("CS8", "cs8", cs8),
    text!("CS8Label", "cs8Label", cs8_label),
    text!("CS9", "cs9", cs9),
    text!("CS9Label", "cs9Label", cs9_label),
    json_prone!(
        "AdditionalReqHeaders",
        "additionalReqHeaders",
        additional_req_headers
    ),
    json_prone!(
        "AdditionalResHeaders",
        "additionalResHeaders",
        additional_res_headers
    ),
    text!("Customer", "Customer", customer),
    text!("Start", "start", start),
    text!("Request", "request", request),
    text!("Ref", "ref", referrer),
    text!("RequestMethod", "requestMethod", request_method),
    text!("CN1", "cn1", cn1),
    text!("App", "app", app),
    text!("Act", "act", act),
    text!("DeviceExternalID", "deviceExternalId", device_external_id),
    text!("SIP", "sip", sip),
    text!("SPT", "spt", spt),
    text!("In", "in", in_bytes),
    FieldDef {
        name: "XFF",
        key: "xff",
        kind: FieldKind::List,
        get: |e: &ImpervaExtension| FieldValue::List(e.xff.clone()),
        set: |e: &mut ImpervaExtension, v: &str| e.xff = split_xff(v),
    },
    json_prone!("CS10", "cs10", cs10),
    text!("CS10Label", "cs10Label", cs10_label),
    json_prone!("CS11", "cs11", cs11),
    text!("CS11Label", "cs11Label", cs11_label),
    text!("CPT", "cpt", cpt),
    text!("Src", "src", src),
    text!("Ver", "ver", ver),
    text!("End", "end", end),
];

/// The forwarded-for chain splits on the literal `", "` delimiter. An
/// empty input yields a single empty-string entry (vendor quirk, kept).
fn split_xff(value: &str) -> Vec<String> {
    value.split(", ").map(str::to_owned).collect()
}

impl ExtensionSchema for ImpervaExtension {
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
