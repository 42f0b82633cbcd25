use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ParseError;
use crate::fields::{FieldMap, FieldValue};
use crate::header::split_header;
use crate::vendors::{Extension, ExtensionSchema};

/// A parsed CEF event: the 7 validated header fields plus the dispatched
/// extension variant. Built once per successful parse and not mutated
/// afterwards; the caller owns it exclusively.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CefEvent {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "DeviceVendor")]
    pub device_vendor: String,
    #[serde(rename = "DeviceProduct")]
    pub device_product: String,
    #[serde(rename = "DeviceVersion")]
    pub device_version: String,
    #[serde(rename = "SignatureID")]
    pub signature_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Severity")]
    pub severity: String,
    #[serde(rename = "Extensions")]
    pub extensions: Extension,
}

impl CefEvent {
    /// Parse a raw CEF line.
    pub fn parse(line: &str) -> Result<CefEvent, ParseError> {
        Self::parse_inner(line, None)
    }

    /// Parse a raw CEF line with a cancellation handle.
    ///
    /// The token is checked exactly once, after header validation and
    /// before extension tokenization. A token cancelled mid-tokenization
    /// is not observed until the next call — the checkpoint is
    /// deliberately coarse.
    pub fn parse_with_cancel(
        line: &str,
        cancel: &CancellationToken,
    ) -> Result<CefEvent, ParseError> {
        Self::parse_inner(line, Some(cancel))
    }

    fn parse_inner(
        line: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<CefEvent, ParseError> {
        let header = split_header(line)?;

        let mut extensions = Extension::for_device(header.device_vendor, header.device_product);
        debug!(
            vendor = header.device_vendor,
            product = header.device_product,
            "dispatched extension schema"
        );

        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(ParseError::Cancelled);
        }
        extensions.populate(header.extension);

        Ok(CefEvent {
            version: header.version.to_owned(),
            device_vendor: header.device_vendor.to_owned(),
            device_product: header.device_product.to_owned(),
            device_version: header.device_version.to_owned(),
            signature_id: header.signature_id.to_owned(),
            name: header.name.to_owned(),
            severity: header.severity.to_owned(),
            extensions,
        })
    }

    /// Pretty JSON: header fields plus an `Extensions` object shaped by the
    /// dispatched variant.
    pub fn as_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn get_field(&self, name: &str) -> Result<FieldValue, ParseError> {
        self.extensions.get_field(name)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.extensions.field_names()
    }

    pub fn to_map(&self) -> FieldMap {
        self.extensions.to_map()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const IMPERVA_LINE: &str =
        "CEF:0|Incapsula|SIEMintegration|1|1|Normal|0|fileId=123 xff=1.1.1.1, 2.2.2.2";

    #[test]
    fn test_end_to_end_imperva() {
        let event = CefEvent::parse(IMPERVA_LINE).unwrap();

        assert_eq!(event.version, "0");
        assert_eq!(event.device_vendor, "Incapsula");
        assert_eq!(event.device_product, "SIEMintegration");
        assert_eq!(event.device_version, "1");
        assert_eq!(event.signature_id, "1");
        assert_eq!(event.name, "Normal");
        assert_eq!(event.severity, "0");

        assert_eq!(
            event.get_field("FileID").unwrap(),
            FieldValue::Text("123".into())
        );
        assert_eq!(
            event.get_field("XFF").unwrap(),
            FieldValue::List(vec!["1.1.1.1".into(), "2.2.2.2".into()])
        );
    }

    #[test]
    fn test_end_to_end_imperva_json_field() {
        let line = r#"CEF:0|Incapsula|SIEMintegration|1|1|Normal|0|cs10=[{"a":"b"}] x=1"#;
        let event = CefEvent::parse(line).unwrap();

        assert_eq!(
            event.get_field("CS10").unwrap(),
            FieldValue::Json(serde_json::json!([{"a": "b"}]))
        );
    }

    #[test]
    fn test_end_to_end_centrify() {
        let line = "CEF:0|Centrify|Centrify_Cloud|1.0|Cloud.Saas.Application|Cloud.Saas.Application.SelfServiceAppLaunch|5|dhost=AAA0056 duser=admin@example.com cs1=Instagram cs1Label=applicationId";
        let event = CefEvent::parse(line).unwrap();

        assert!(matches!(event.extensions, Extension::Centrify(_)));
        assert_eq!(
            event.get_field("DHost").unwrap(),
            FieldValue::Text("AAA0056".into())
        );
        assert_eq!(
            event.get_field("CS1Label").unwrap(),
            FieldValue::Text("applicationId".into())
        );
    }

    #[test]
    fn test_end_to_end_unknown_vendor_gets_default() {
        let line = "CEF:0|Vendor|Product|1.0|1000|TestEvent|5|key1=value1 key2=value2";
        let event = CefEvent::parse(line).unwrap();

        assert!(matches!(event.extensions, Extension::Default(_)));
        assert_eq!(
            event.get_field("key1").unwrap(),
            FieldValue::Text("value1".into())
        );
        assert_eq!(event.field_names(), vec!["key1", "key2"]);
    }

    #[test]
    fn test_header_errors_propagate() {
        assert!(matches!(
            CefEvent::parse(""),
            Err(ParseError::InvalidLength(0))
        ));
        assert!(matches!(
            CefEvent::parse("InvalidCEFString"),
            Err(ParseError::InvalidFormat)
        ));
        assert!(matches!(
            CefEvent::parse("CEF:0|@InvalidVendor|SIEMintegration|1|1|Normal|0|key1=value1"),
            Err(ParseError::InvalidComponent("deviceVendor"))
        ));
    }

    #[test]
    fn test_cancelled_token_is_observed_before_tokenization() {
        let cancel = tokio_util::sync::CancellationToken::new();
        cancel.cancel();

        assert!(matches!(
            CefEvent::parse_with_cancel(IMPERVA_LINE, &cancel),
            Err(ParseError::Cancelled)
        ));
    }

    #[test]
    fn test_live_token_does_not_interfere() {
        let cancel = tokio_util::sync::CancellationToken::new();
        let event = CefEvent::parse_with_cancel(IMPERVA_LINE, &cancel).unwrap();
        assert_eq!(event.device_vendor, "Incapsula");
    }

    #[test]
    fn test_as_json_shape() {
        let event = CefEvent::parse(IMPERVA_LINE).unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&event.as_json()).unwrap();

        assert_eq!(decoded["Version"], "0");
        assert_eq!(decoded["DeviceVendor"], "Incapsula");
        assert_eq!(decoded["Extensions"]["FileID"], "123");
        assert_eq!(
            decoded["Extensions"]["XFF"],
            serde_json::json!(["1.1.1.1", "2.2.2.2"])
        );
    }

    #[test]
    fn test_as_json_default_variant_is_flat_map() {
        let event = CefEvent::parse("CEF:0|V|P|1|1|N|5|a=1 b=2").unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&event.as_json()).unwrap();

        assert_eq!(decoded["Extensions"], serde_json::json!({"a": "1", "b": "2"}));
    }

    #[test]
    fn test_round_trip_declared_names_resolve() {
        let event = CefEvent::parse(IMPERVA_LINE).unwrap();
        for name in event.field_names() {
            assert!(event.get_field(&name).is_ok());
        }
    }

    #[test]
    fn test_malformed_embedded_json_is_not_an_error() {
        let line = "CEF:0|Incapsula|SIEMintegration|1|1|Normal|0|cs10={not json}";
        let event = CefEvent::parse(line).unwrap();
        assert_eq!(
            event.get_field("CS10").unwrap(),
            FieldValue::Text("{not json}".into())
        );
    }

    proptest! {
        #[test]
        fn prop_parse_never_panics(input in "\\PC{0,300}") {
            let _ = CefEvent::parse(&input);
        }

        #[test]
        fn prop_valid_header_components_always_parse(
            vendor in "[A-Za-z0-9_.-]{1,20}",
            product in "[A-Za-z0-9_.-]{1,20}",
            name in "[A-Za-z0-9_. -]{1,30}",
        ) {
            let line = format!("CEF:0|{vendor}|{product}|1|1000|{name}|5|key=value");
            let event = CefEvent::parse(&line);
            prop_assert!(event.is_ok(), "line failed: {line}");
        }
    }
}
