use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;

/// Upper bound on raw input, in bytes, checked before grammar matching.
pub const MAX_LINE_LEN: usize = 10_000;

/// Upper bound on each of the 7 validated header components.
pub const MAX_COMPONENT_LEN: usize = 100;

static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^CEF:([^|]*)\|([^|]*)\|([^|]*)\|([^|]*)\|([^|]*)\|([^|]*)\|([^|]*)\|(.*)$")
        .expect("CEF header regex")
});

static COMPONENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_ .-]+$").expect("CEF component regex"));

const COMPONENT_NAMES: [&str; 7] = [
    "version",
    "deviceVendor",
    "deviceProduct",
    "deviceVersion",
    "signatureId",
    "name",
    "severity",
];

/// The 8 top-level segments of a CEF line, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawHeader<'a> {
    pub version: &'a str,
    pub device_vendor: &'a str,
    pub device_product: &'a str,
    pub device_version: &'a str,
    pub signature_id: &'a str,
    pub name: &'a str,
    pub severity: &'a str,
    /// Everything after the 7th pipe. Unconstrained; may be empty.
    pub extension: &'a str,
}

/// Split a raw line into the validated header plus the raw extension text.
///
/// Pure function: length gate first, then the pipe grammar, then the
/// per-component charset rule. The extension segment passes through
/// untouched.
pub fn split_header(line: &str) -> Result<RawHeader<'_>, ParseError> {
    if line.is_empty() || line.len() > MAX_LINE_LEN {
        return Err(ParseError::InvalidLength(line.len()));
    }

    let caps = HEADER_RE.captures(line).ok_or(ParseError::InvalidFormat)?;
    let segment = |i: usize| caps.get(i).map_or("", |m| m.as_str());

    let components = [
        segment(1),
        segment(2),
        segment(3),
        segment(4),
        segment(5),
        segment(6),
        segment(7),
    ];

    for (component, name) in components.iter().zip(COMPONENT_NAMES) {
        if component.len() > MAX_COMPONENT_LEN || !COMPONENT_RE.is_match(component) {
            return Err(ParseError::InvalidComponent(name));
        }
    }

    Ok(RawHeader {
        version: components[0],
        device_vendor: components[1],
        device_product: components[2],
        device_version: components[3],
        signature_id: components[4],
        name: components[5],
        severity: components[6],
        extension: segment(8),
    })
}
