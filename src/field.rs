//! Fixed-width field layouts shared by every record kind.
//!
//! Each record kind declares a static table of [`FieldSpec`]s. The same table
//! drives construction-time validation and render-time padding.

use crate::error::{AchError, Result, ValidationReason};

/// Width of every rendered line.
pub const LINE_LENGTH: usize = 94;

/// Lines per block; files are padded to a multiple of this.
pub const BLOCKING_FACTOR: usize = 10;

/// What characters a field may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    /// ASCII digits only.
    Digits,
    /// Any printable ASCII.
    Text,
}

/// How a short value is padded to the field width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pad {
    /// Zeros on the left (numeric fields).
    ZeroLeft,
    /// Spaces on the left (immediate origin/destination).
    SpaceLeft,
    /// Spaces on the right (alphanumeric fields).
    SpaceRight,
}

/// Static description of one field in a 94-character record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Human readable name, used in error messages.
    pub name: &'static str,
    /// 1-based starting column.
    pub position: usize,
    pub width: usize,
    pub required: bool,
    /// Whether the value must fill the width exactly.
    pub fixed: bool,
    pub content: Content,
    pub pad: Pad,
}

impl FieldSpec {
    /// A required, zero-padded digits-only field.
    pub const fn numeric(name: &'static str, position: usize, width: usize) -> Self {
        FieldSpec {
            name,
            position,
            width,
            required: true,
            fixed: false,
            content: Content::Digits,
            pad: Pad::ZeroLeft,
        }
    }

    /// A required, space-padded free-text field.
    pub const fn alphanumeric(name: &'static str, position: usize, width: usize) -> Self {
        FieldSpec {
            name,
            position,
            width,
            required: true,
            fixed: false,
            content: Content::Text,
            pad: Pad::SpaceRight,
        }
    }

    /// A blank filler field.
    pub const fn reserved(position: usize, width: usize) -> Self {
        FieldSpec {
            required: false,
            ..FieldSpec::alphanumeric("reserved", position, width)
        }
    }

    pub const fn optional(self) -> Self {
        FieldSpec {
            required: false,
            ..self
        }
    }

    pub const fn fixed(self) -> Self {
        FieldSpec { fixed: true, ..self }
    }

    pub const fn content(self, content: Content) -> Self {
        FieldSpec { content, ..self }
    }

    pub const fn pad(self, pad: Pad) -> Self {
        FieldSpec { pad, ..self }
    }

    /// Checks a value against this field's required flag, content class and width.
    pub fn validate(&self, value: &str) -> Result<()> {
        if value.is_empty() {
            return if self.required {
                Err(self.error(ValidationReason::Missing))
            } else {
                Ok(())
            };
        }

        let valid_chars = match self.content {
            Content::Digits => value.bytes().all(|b| b.is_ascii_digit()),
            Content::Text => value.bytes().all(|b| (b' '..=b'~').contains(&b)),
        };
        if !valid_chars {
            return Err(self.error(match self.content {
                Content::Digits => ValidationReason::NotNumeric,
                Content::Text => ValidationReason::InvalidCharacters,
            }));
        }

        let actual = value.len();
        if self.fixed && actual != self.width {
            return Err(self.error(ValidationReason::WrongLength {
                expected: self.width,
                actual,
            }));
        }
        if actual > self.width {
            return Err(self.error(ValidationReason::TooLong {
                max: self.width,
                actual,
            }));
        }

        Ok(())
    }

    /// Validates an optional value; `None` is treated as empty.
    pub fn validate_optional(&self, value: Option<&str>) -> Result<()> {
        self.validate(value.unwrap_or(""))
    }

    /// Pads a value to the field width.
    ///
    /// Anything wider than the field keeps its least-significant end for
    /// right-aligned fields and its beginning for text, counted in characters,
    /// so the rendered width never changes.
    pub fn format(&self, value: &str) -> String {
        let width = self.width;
        match self.pad {
            Pad::ZeroLeft => format!("{:0>width$}", tail_chars(value, width), width = width),
            Pad::SpaceLeft => format!("{:>width$}", tail_chars(value, width), width = width),
            Pad::SpaceRight => {
                let head: String = value.chars().take(width).collect();
                format!("{:<width$}", head, width = width)
            }
        }
    }

    /// Largest number representable in this field.
    pub fn max_value(&self) -> u64 {
        10u64.saturating_pow(self.width as u32).saturating_sub(1)
    }

    fn error(&self, reason: ValidationReason) -> AchError {
        AchError::invalid(self.name, reason)
    }
}

fn tail_chars(value: &str, width: usize) -> String {
    let skip = value.chars().count().saturating_sub(width);
    value.chars().skip(skip).collect()
}

/// Assembles one record line from a layout and its values, in layout order.
pub fn assemble(layout: &[FieldSpec], values: &[&str]) -> String {
    debug_assert_eq!(layout.len(), values.len());

    let mut line = String::with_capacity(LINE_LENGTH);
    for (spec, value) in layout.iter().zip(values) {
        line.push_str(&spec.format(value));
    }

    debug_assert_eq!(line.chars().count(), LINE_LENGTH);
    line
}

/// Renders the filler line used to complete the final block.
pub fn filler_line() -> String {
    "9".repeat(LINE_LENGTH)
}

#[cfg(test)]
pub(crate) fn assert_contiguous(layout: &[FieldSpec]) {
    let mut expected = 1;
    for spec in layout {
        assert_eq!(spec.position, expected, "field {} out of place", spec.name);
        expected += spec.width;
    }
    assert_eq!(expected - 1, LINE_LENGTH);
}

#[cfg(test)]
mod tests {
    use super::*;

    const AMOUNT: FieldSpec = FieldSpec::numeric("amount", 1, 10);
    const NAME: FieldSpec = FieldSpec::alphanumeric("name", 1, 16);
    const ROUTING: FieldSpec = FieldSpec::numeric("routing", 1, 9).fixed();

    #[test]
    fn test_numeric_pads_left_with_zeros() {
        assert_eq!(AMOUNT.format("1234"), "0000001234");
    }

    #[test]
    fn test_alphanumeric_pads_right_with_spaces() {
        assert_eq!(NAME.format("Acme"), "Acme            ");
    }

    #[test]
    fn test_space_left_padding() {
        let spec = FieldSpec::numeric("destination", 1, 10).pad(Pad::SpaceLeft);
        assert_eq!(spec.format("091000019"), " 091000019");
    }

    #[test]
    fn test_validate_width_boundary() {
        assert!(NAME.validate("Your Company Inc").is_ok());
        let err = NAME.validate("Your Company Inc.").unwrap_err();
        assert!(matches!(
            err,
            AchError::Validation {
                field: "name",
                reason: ValidationReason::TooLong { max: 16, actual: 17 }
            }
        ));
    }

    #[test]
    fn test_validate_required() {
        assert!(matches!(
            NAME.validate(""),
            Err(AchError::Validation {
                reason: ValidationReason::Missing,
                ..
            })
        ));
        assert!(NAME.optional().validate("").is_ok());
        assert!(NAME.optional().validate_optional(None).is_ok());
    }

    #[test]
    fn test_validate_numeric_content() {
        assert!(AMOUNT.validate("12a").is_err());
        assert!(AMOUNT.validate(" 12").is_err());
        assert!(AMOUNT.validate("0012").is_ok());
    }

    #[test]
    fn test_validate_printable_ascii() {
        assert!(NAME.validate("Caf\u{e9}").is_err());
        assert!(NAME.validate("tab\there").is_err());
        assert!(NAME.validate("O'Brien & Sons").is_ok());
    }

    #[test]
    fn test_validate_fixed_width() {
        assert!(ROUTING.validate("091000019").is_ok());
        assert!(matches!(
            ROUTING.validate("09100001"),
            Err(AchError::Validation {
                reason: ValidationReason::WrongLength {
                    expected: 9,
                    actual: 8
                },
                ..
            })
        ));
    }

    #[test]
    fn test_format_cuts_on_character_boundaries() {
        let trace = FieldSpec::alphanumeric("trace", 1, 7);
        let accented = "\u{e9}".repeat(8);
        assert_eq!(trace.format(&accented).chars().count(), 7);
        assert_eq!(AMOUNT.format("\u{e9}12345678901").chars().count(), 10);
        assert_eq!(AMOUNT.format("12345678901"), "2345678901");
    }

    #[test]
    fn test_max_value() {
        assert_eq!(AMOUNT.max_value(), 9_999_999_999);
        assert_eq!(FieldSpec::numeric("count", 1, 6).max_value(), 999_999);
    }

    #[test]
    fn test_filler_line() {
        let line = filler_line();
        assert_eq!(line.len(), LINE_LENGTH);
        assert!(line.chars().all(|c| c == '9'));
    }
}
