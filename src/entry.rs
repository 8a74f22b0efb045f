//! Entry detail record (record type 6).
//!
//! An entry is one payment to or from a receiver's account. It carries its own
//! debit/credit classification and contributes its receiving DFI identifier to
//! the batch entry hash.

use crate::addenda::Addenda;
use crate::amount::Amount;
use crate::codes::TransactionCode;
use crate::error::{AchError, Result, ValidationReason};
use crate::field::{assemble, Content, FieldSpec};
use crate::routing;

pub const RECORD_TYPE: FieldSpec = FieldSpec::numeric("record type code", 1, 1);
pub const TRANSACTION_CODE: FieldSpec = FieldSpec::numeric("transaction code", 2, 2).fixed();
pub const ROUTING_NUMBER: FieldSpec =
    FieldSpec::numeric("destination routing number", 4, 9).fixed();
pub const ACCOUNT_NUMBER: FieldSpec =
    FieldSpec::alphanumeric("destination account number", 13, 17);
pub const AMOUNT: FieldSpec = FieldSpec::numeric("amount", 30, 10);
pub const TRANSACTION_ID: FieldSpec = FieldSpec::alphanumeric("transaction id", 40, 15)
    .optional()
    .content(Content::Digits);
pub const DESTINATION_NAME: FieldSpec = FieldSpec::alphanumeric("destination name", 55, 22);
pub const DISCRETIONARY_DATA: FieldSpec =
    FieldSpec::alphanumeric("discretionary data", 77, 2).optional();
pub const ADDENDA_INDICATOR: FieldSpec = FieldSpec::numeric("addenda record indicator", 79, 1);
pub const TRACE_NUMBER: FieldSpec = FieldSpec::numeric("trace number", 80, 15);

/// Field layout of an entry detail record.
pub const LAYOUT: [FieldSpec; 10] = [
    RECORD_TYPE,
    TRANSACTION_CODE,
    ROUTING_NUMBER,
    ACCOUNT_NUMBER,
    AMOUNT,
    TRANSACTION_ID,
    DESTINATION_NAME,
    DISCRETIONARY_DATA,
    ADDENDA_INDICATOR,
    TRACE_NUMBER,
];

/// Width of the per-batch sequence number at the end of the trace number.
pub const SEQUENCE_WIDTH: usize = 7;

/// Input for [`Entry::new`].
#[derive(Debug, Clone)]
pub struct EntryOptions {
    pub transaction_code: TransactionCode,
    /// 8-digit receiving DFI identifier followed by its check digit.
    pub destination_routing_number: String,
    pub destination_account_number: String,
    pub amount: Amount,
    /// Individual identification number; digits only.
    pub transaction_id: Option<String>,
    pub destination_name: String,
    pub discretionary_data: Option<String>,
}

/// A validated entry detail record with at most one addenda.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    transaction_code: TransactionCode,
    destination_routing_number: String,
    destination_account_number: String,
    amount: Amount,
    transaction_id: Option<String>,
    destination_name: String,
    discretionary_data: String,
    addenda: Option<Addenda>,
}

impl Entry {
    pub const RECORD_TYPE_CODE: &'static str = "6";

    /// Validates the options and builds an entry.
    pub fn new(options: EntryOptions) -> Result<Self> {
        ROUTING_NUMBER.validate(&options.destination_routing_number)?;
        ACCOUNT_NUMBER.validate(&options.destination_account_number)?;
        TRANSACTION_ID.validate_optional(options.transaction_id.as_deref())?;
        DESTINATION_NAME.validate(&options.destination_name)?;
        DISCRETIONARY_DATA.validate_optional(options.discretionary_data.as_deref())?;

        if !options.amount.is_positive() {
            return Err(AchError::invalid(
                AMOUNT.name,
                ValidationReason::NonPositiveAmount,
            ));
        }
        match options.amount.checked_cents() {
            Some(cents) if cents <= AMOUNT.max_value() => {}
            _ => {
                return Err(AchError::invalid(
                    AMOUNT.name,
                    ValidationReason::AmountTooLarge,
                ))
            }
        }

        Ok(Entry {
            transaction_code: options.transaction_code,
            destination_routing_number: options.destination_routing_number,
            destination_account_number: options.destination_account_number,
            amount: options.amount,
            transaction_id: options.transaction_id.filter(|id| !id.is_empty()),
            destination_name: options.destination_name,
            discretionary_data: options.discretionary_data.unwrap_or_default(),
            addenda: None,
        })
    }

    /// Attaches an addenda, replacing any previous one.
    pub fn set_addenda(&mut self, addenda: Addenda) {
        self.addenda = Some(addenda);
    }

    pub fn addenda(&self) -> Option<&Addenda> {
        self.addenda.as_ref()
    }

    pub fn has_addenda(&self) -> bool {
        self.addenda.is_some()
    }

    pub fn transaction_code(&self) -> TransactionCode {
        self.transaction_code
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn destination_routing_number(&self) -> &str {
        &self.destination_routing_number
    }

    pub fn destination_name(&self) -> &str {
        &self.destination_name
    }

    /// Returns `(credit, debit)`; exactly one equals the amount, the other is zero.
    pub fn classify(&self) -> (Amount, Amount) {
        if self.transaction_code.is_credit() {
            (self.amount, Amount::ZERO)
        } else {
            (Amount::ZERO, self.amount)
        }
    }

    pub fn credit_amount(&self) -> Amount {
        self.classify().0
    }

    pub fn debit_amount(&self) -> Amount {
        self.classify().1
    }

    /// First 8 digits of the destination routing number as an integer.
    pub fn dfi_identifier(&self) -> u64 {
        routing::dfi_identifier(&self.destination_routing_number)
    }

    /// The 15-digit trace number: originating DFI followed by the sequence number.
    pub fn trace_number(origin_dfi: &str, sequence_number: u32) -> String {
        format!(
            "{}{}",
            origin_dfi,
            format_sequence(sequence_number)
        )
    }

    /// Renders the entry detail line.
    pub fn render(&self, origin_dfi: &str, sequence_number: u32) -> String {
        let transaction_code = self.transaction_code.to_string();
        let amount = self.amount.cents().to_string();
        let trace = Self::trace_number(origin_dfi, sequence_number);

        assemble(
            &LAYOUT,
            &[
                Self::RECORD_TYPE_CODE,
                &transaction_code,
                &self.destination_routing_number,
                &self.destination_account_number,
                &amount,
                self.transaction_id.as_deref().unwrap_or(""),
                &self.destination_name,
                &self.discretionary_data,
                if self.has_addenda() { "1" } else { "0" },
                &trace,
            ],
        )
    }

    /// Renders the entry detail line followed by its addenda line, if any.
    pub fn render_all(&self, origin_dfi: &str, sequence_number: u32) -> Vec<String> {
        let mut lines = vec![self.render(origin_dfi, sequence_number)];
        if let Some(addenda) = &self.addenda {
            lines.push(addenda.render(&format_sequence(sequence_number)));
        }
        lines
    }

    /// Number of physical lines this entry renders to.
    pub fn line_count(&self) -> usize {
        1 + usize::from(self.has_addenda())
    }
}

fn format_sequence(sequence_number: u32) -> String {
    format!("{:0>width$}", sequence_number, width = SEQUENCE_WIDTH)
}
