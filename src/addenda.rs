//! Entry addenda record (record type 7, addenda type 05).

use crate::error::Result;
use crate::field::{assemble, FieldSpec};

pub const RECORD_TYPE: FieldSpec = FieldSpec::numeric("record type code", 1, 1);
pub const ADDENDA_TYPE: FieldSpec = FieldSpec::numeric("addenda type code", 2, 2);
pub const PAYMENT_INFO: FieldSpec =
    FieldSpec::alphanumeric("payment related information", 4, 80).optional();
pub const SEQUENCE_NUMBER: FieldSpec = FieldSpec::numeric("addenda sequence number", 84, 4);
pub const ENTRY_SEQUENCE: FieldSpec =
    FieldSpec::alphanumeric("entry detail sequence number", 88, 7);

/// Field layout of an addenda record.
pub const LAYOUT: [FieldSpec; 5] = [
    RECORD_TYPE,
    ADDENDA_TYPE,
    PAYMENT_INFO,
    SEQUENCE_NUMBER,
    ENTRY_SEQUENCE,
];

/// Free-text payment related information attached to a single entry.
///
/// Only one addenda per entry is supported, so the sequence number is always 1.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Addenda {
    info: Option<String>,
}

impl Addenda {
    pub const RECORD_TYPE_CODE: &'static str = "7";
    pub const ADDENDA_TYPE_CODE: &'static str = "05";
    pub const SEQUENCE: &'static str = "1";

    /// Creates an addenda, rejecting information wider than 80 characters.
    pub fn new(info: Option<&str>) -> Result<Self> {
        PAYMENT_INFO.validate_optional(info)?;
        Ok(Addenda {
            info: info.filter(|s| !s.is_empty()).map(str::to_string),
        })
    }

    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    /// Renders the record; `trace_suffix` is the parent entry's 7-digit sequence number.
    pub fn render(&self, trace_suffix: &str) -> String {
        assemble(
            &LAYOUT,
            &[
                Self::RECORD_TYPE_CODE,
                Self::ADDENDA_TYPE_CODE,
                self.info().unwrap_or(""),
                Self::SEQUENCE,
                trace_suffix,
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{assert_contiguous, LINE_LENGTH};

    #[test]
    fn test_layout_is_contiguous() {
        assert_contiguous(&LAYOUT);
    }

    #[test]
    fn test_render() {
        let addenda = Addenda::new(Some("Im a special boy")).unwrap();
        let line = addenda.render("0000002");

        assert_eq!(line.len(), LINE_LENGTH);
        assert!(line.starts_with("705Im a special boy "));
        assert!(line.ends_with("00010000002"));
    }

    #[test]
    fn test_render_without_info() {
        let line = Addenda::new(None).unwrap().render("0000001");
        assert_eq!(line, format!("705{}00010000001", " ".repeat(80)));
    }

    #[test]
    fn test_render_with_non_ascii_trace_suffix_keeps_width() {
        let suffix = "\u{e9}".repeat(7);
        let line = Addenda::new(None).unwrap().render(&suffix);
        assert_eq!(line.chars().count(), LINE_LENGTH);
        assert!(line.ends_with(&format!("0001{}", suffix)));
    }

    #[test]
    fn test_info_width_limit() {
        assert!(Addenda::new(Some(&"x".repeat(80))).is_ok());
        assert!(Addenda::new(Some(&"x".repeat(81))).is_err());
    }
}
