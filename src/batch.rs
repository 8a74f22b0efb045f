//! Batch header/control records (record types 5 and 8) and the entries between them.

use crate::amount::Amount;
use crate::codes::{ServiceClass, StandardEntryClass};
use crate::entry::Entry;
use crate::error::{AchError, Result};
use crate::field::{assemble, FieldSpec};
use chrono::{Local, NaiveDate};
use log::debug;

pub mod header {
    use crate::field::FieldSpec;

    pub const RECORD_TYPE: FieldSpec = FieldSpec::numeric("record type code", 1, 1);
    pub const SERVICE_CLASS: FieldSpec = FieldSpec::numeric("service class code", 2, 3);
    pub const COMPANY_NAME: FieldSpec = FieldSpec::alphanumeric("company name", 5, 16);
    pub const DISCRETIONARY_DATA: FieldSpec =
        FieldSpec::alphanumeric("company discretionary data", 21, 20).optional();
    pub const COMPANY_ID: FieldSpec = FieldSpec::alphanumeric("company identification", 41, 10);
    pub const SEC_CODE: FieldSpec = FieldSpec::alphanumeric("standard entry class code", 51, 3);
    pub const DESCRIPTION: FieldSpec =
        FieldSpec::alphanumeric("company entry description", 54, 10);
    pub const DESCRIPTIVE_DATE: FieldSpec =
        FieldSpec::alphanumeric("company descriptive date", 64, 6).optional();
    pub const EFFECTIVE_DATE: FieldSpec = FieldSpec::numeric("effective entry date", 70, 6);
    pub const SETTLEMENT_DATE: FieldSpec = FieldSpec::reserved(76, 3);
    pub const ORIGIN_STATUS: FieldSpec = FieldSpec::numeric("originator status code", 79, 1)
        .optional()
        .fixed();
    pub const ORIGIN_DFI: FieldSpec =
        FieldSpec::numeric("originating DFI identification", 80, 8).fixed();
    pub const BATCH_NUMBER: FieldSpec = FieldSpec::numeric("batch number", 88, 7);
}

pub mod trailer {
    use crate::field::FieldSpec;

    pub const RECORD_TYPE: FieldSpec = FieldSpec::numeric("record type code", 1, 1);
    pub const SERVICE_CLASS: FieldSpec = FieldSpec::numeric("service class code", 2, 3);
    pub const ENTRY_ADDENDA_COUNT: FieldSpec =
        FieldSpec::numeric("batch entry/addenda count", 5, 6);
    pub const ENTRY_HASH: FieldSpec = FieldSpec::numeric("batch entry hash", 11, 10);
    pub const TOTAL_DEBIT: FieldSpec = FieldSpec::numeric("batch total debit amount", 21, 12);
    pub const TOTAL_CREDIT: FieldSpec = FieldSpec::numeric("batch total credit amount", 33, 12);
    pub const COMPANY_ID: FieldSpec = FieldSpec::alphanumeric("company identification", 45, 10);
    pub const MESSAGE_AUTH_CODE: FieldSpec =
        FieldSpec::alphanumeric("message authentication code", 55, 19)
            .optional()
            .fixed();
    pub const RESERVED: FieldSpec = FieldSpec::reserved(74, 6);
    pub const ORIGIN_DFI: FieldSpec =
        FieldSpec::numeric("originating DFI identification", 80, 8).fixed();
    pub const BATCH_NUMBER: FieldSpec = FieldSpec::numeric("batch number", 88, 7);
}

/// Field layout of a batch header record.
pub const HEADER_LAYOUT: [FieldSpec; 13] = [
    header::RECORD_TYPE,
    header::SERVICE_CLASS,
    header::COMPANY_NAME,
    header::DISCRETIONARY_DATA,
    header::COMPANY_ID,
    header::SEC_CODE,
    header::DESCRIPTION,
    header::DESCRIPTIVE_DATE,
    header::EFFECTIVE_DATE,
    header::SETTLEMENT_DATE,
    header::ORIGIN_STATUS,
    header::ORIGIN_DFI,
    header::BATCH_NUMBER,
];

/// Field layout of a batch control (trailer) record.
pub const TRAILER_LAYOUT: [FieldSpec; 11] = [
    trailer::RECORD_TYPE,
    trailer::SERVICE_CLASS,
    trailer::ENTRY_ADDENDA_COUNT,
    trailer::ENTRY_HASH,
    trailer::TOTAL_DEBIT,
    trailer::TOTAL_CREDIT,
    trailer::COMPANY_ID,
    trailer::MESSAGE_AUTH_CODE,
    trailer::RESERVED,
    trailer::ORIGIN_DFI,
    trailer::BATCH_NUMBER,
];

/// Entry hashes keep only their 10 least significant digits.
pub const HASH_MODULUS: u64 = 10_000_000_000;

/// Input for [`Batch::new`].
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub service_class: ServiceClass,
    pub company_name: String,
    pub company_discretionary_data: Option<String>,
    pub company_identification: String,
    pub standard_entry_class: StandardEntryClass,
    pub description: String,
    pub descriptive_date: Option<NaiveDate>,
    /// Defaults to today's date when absent.
    pub effective_entry_date: Option<NaiveDate>,
    /// Originating DFI identification (8 digits, no check digit).
    pub origin_dfi: String,
    /// Defaults to `1`.
    pub origin_status_code: Option<String>,
    pub message_authentication_code: Option<String>,
}

/// A batch of entries sharing one originator, SEC code and effective date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    service_class: ServiceClass,
    company_name: String,
    company_discretionary_data: String,
    company_identification: String,
    standard_entry_class: StandardEntryClass,
    description: String,
    descriptive_date: Option<NaiveDate>,
    effective_entry_date: NaiveDate,
    origin_dfi: String,
    origin_status_code: String,
    message_authentication_code: String,
    entries: Vec<Entry>,
}

impl Batch {
    pub const HEADER_RECORD_TYPE: &'static str = "5";
    pub const TRAILER_RECORD_TYPE: &'static str = "8";
    pub const DEFAULT_ORIGIN_STATUS_CODE: &'static str = "1";

    /// Validates the options and builds an empty batch.
    pub fn new(options: BatchOptions) -> Result<Self> {
        header::COMPANY_NAME.validate(&options.company_name)?;
        header::DISCRETIONARY_DATA
            .validate_optional(options.company_discretionary_data.as_deref())?;
        header::COMPANY_ID.validate(&options.company_identification)?;
        header::DESCRIPTION.validate(&options.description)?;
        header::ORIGIN_DFI.validate(&options.origin_dfi)?;
        header::ORIGIN_STATUS.validate_optional(options.origin_status_code.as_deref())?;
        trailer::MESSAGE_AUTH_CODE
            .validate_optional(options.message_authentication_code.as_deref())?;

        Ok(Batch {
            service_class: options.service_class,
            company_name: options.company_name,
            company_discretionary_data: options.company_discretionary_data.unwrap_or_default(),
            company_identification: options.company_identification,
            standard_entry_class: options.standard_entry_class,
            description: options.description,
            descriptive_date: options.descriptive_date,
            effective_entry_date: options
                .effective_entry_date
                .unwrap_or_else(|| Local::now().date_naive()),
            origin_dfi: options.origin_dfi,
            origin_status_code: options
                .origin_status_code
                .filter(|code| !code.is_empty())
                .unwrap_or_else(|| Self::DEFAULT_ORIGIN_STATUS_CODE.to_string()),
            message_authentication_code: options.message_authentication_code.unwrap_or_default(),
            entries: Vec::new(),
        })
    }

    /// Appends an entry. Its position becomes its sequence number within the batch.
    ///
    /// Fails if the batch's count or totals would no longer fit the control record.
    pub fn add_entry(&mut self, entry: Entry) -> Result<()> {
        let (credit, debit) = entry.classify();
        let count = self.entry_addenda_count() + entry.line_count() as u64;

        check_capacity(&trailer::ENTRY_ADDENDA_COUNT, count)?;
        check_capacity(
            &trailer::TOTAL_DEBIT,
            self.total_debit().cents() + debit.cents(),
        )?;
        check_capacity(
            &trailer::TOTAL_CREDIT,
            self.total_credit().cents() + credit.cents(),
        )?;

        debug!(
            "Batch {}: added {} entry of {} for {}",
            self.company_name,
            entry.transaction_code(),
            entry.amount(),
            entry.destination_name()
        );
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn service_class(&self) -> ServiceClass {
        self.service_class
    }

    pub fn standard_entry_class(&self) -> StandardEntryClass {
        self.standard_entry_class
    }

    pub fn origin_dfi(&self) -> &str {
        &self.origin_dfi
    }

    pub fn effective_entry_date(&self) -> NaiveDate {
        self.effective_entry_date
    }

    pub fn entry_count(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Number of entries carrying an addenda record.
    pub fn addenda_count(&self) -> u64 {
        self.entries.iter().filter(|e| e.has_addenda()).count() as u64
    }

    /// Entry plus addenda records, as reported in the control record.
    pub fn entry_addenda_count(&self) -> u64 {
        self.entry_count() + self.addenda_count()
    }

    /// Sum of receiving DFI identifiers, truncated to 10 digits.
    pub fn entries_hash(&self) -> u64 {
        self.entries
            .iter()
            .fold(0, |acc, e| (acc + e.dfi_identifier()) % HASH_MODULUS)
    }

    pub fn total_debit(&self) -> Amount {
        self.entries.iter().map(Entry::debit_amount).sum()
    }

    pub fn total_credit(&self) -> Amount {
        self.entries.iter().map(Entry::credit_amount).sum()
    }

    /// Number of physical lines this batch renders to.
    pub fn line_count(&self) -> usize {
        2 + self.entries.iter().map(Entry::line_count).sum::<usize>()
    }

    /// Renders the batch header record.
    pub fn header(&self, batch_number: u32) -> String {
        let service_class = self.service_class.to_string();
        let description = self.description.to_uppercase();
        let descriptive_date = self
            .descriptive_date
            .map(|d| d.format("%y%m%d").to_string())
            .unwrap_or_default();
        let effective_date = self.effective_entry_date.format("%y%m%d").to_string();
        let batch_number = batch_number.to_string();

        assemble(
            &HEADER_LAYOUT,
            &[
                Self::HEADER_RECORD_TYPE,
                &service_class,
                &self.company_name,
                &self.company_discretionary_data,
                &self.company_identification,
                self.standard_entry_class.as_str(),
                &description,
                &descriptive_date,
                &effective_date,
                "",
                &self.origin_status_code,
                &self.origin_dfi,
                &batch_number,
            ],
        )
    }

    /// Renders the batch control record.
    pub fn trailer(&self, batch_number: u32) -> String {
        let service_class = self.service_class.to_string();
        let count = self.entry_addenda_count().to_string();
        let hash = self.entries_hash().to_string();
        let debit = self.total_debit().cents().to_string();
        let credit = self.total_credit().cents().to_string();
        let batch_number = batch_number.to_string();

        assemble(
            &TRAILER_LAYOUT,
            &[
                Self::TRAILER_RECORD_TYPE,
                &service_class,
                &count,
                &hash,
                &debit,
                &credit,
                &self.company_identification,
                &self.message_authentication_code,
                "",
                &self.origin_dfi,
                &batch_number,
            ],
        )
    }

    /// Renders header, entries (sequenced from 1 within this batch) and trailer.
    pub fn render(&self, batch_number: u32) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.line_count());
        lines.push(self.header(batch_number));
        for (idx, entry) in self.entries.iter().enumerate() {
            lines.extend(entry.render_all(&self.origin_dfi, idx as u32 + 1));
        }
        lines.push(self.trailer(batch_number));
        lines
    }
}

pub(crate) fn check_capacity(spec: &FieldSpec, value: u64) -> Result<()> {
    let max = spec.max_value();
    if value > max {
        return Err(AchError::CapacityExceeded {
            field: spec.name,
            max,
        });
    }
    Ok(())
}
