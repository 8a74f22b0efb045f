//! File header/control records (record types 1 and 9) and whole-file assembly.

use crate::amount::Amount;
use crate::batch::{check_capacity, Batch, HASH_MODULUS};
use crate::error::{AchError, Result, ValidationReason};
use crate::field::{assemble, filler_line, FieldSpec, BLOCKING_FACTOR};
use chrono::{Local, NaiveDateTime};
use log::debug;
use std::io::Write;

pub mod header {
    use crate::field::{FieldSpec, Pad};

    pub const RECORD_TYPE: FieldSpec = FieldSpec::numeric("record type code", 1, 1);
    pub const PRIORITY_CODE: FieldSpec = FieldSpec::numeric("priority code", 2, 2);
    pub const DESTINATION_ROUTING: FieldSpec =
        FieldSpec::numeric("immediate destination", 4, 10).pad(Pad::SpaceLeft);
    pub const ORIGIN_ROUTING: FieldSpec =
        FieldSpec::numeric("immediate origin", 14, 10).pad(Pad::SpaceLeft);
    pub const CREATION_DATE: FieldSpec = FieldSpec::numeric("file creation date", 24, 6);
    pub const CREATION_TIME: FieldSpec = FieldSpec::numeric("file creation time", 30, 4);
    pub const FILE_ID_MODIFIER: FieldSpec =
        FieldSpec::alphanumeric("file id modifier", 34, 1).fixed();
    pub const RECORD_SIZE: FieldSpec = FieldSpec::numeric("record size", 35, 3);
    pub const BLOCKING_FACTOR: FieldSpec = FieldSpec::numeric("blocking factor", 38, 2);
    pub const FORMAT_CODE: FieldSpec = FieldSpec::numeric("format code", 40, 1);
    pub const DESTINATION_NAME: FieldSpec =
        FieldSpec::alphanumeric("immediate destination name", 41, 23).optional();
    pub const ORIGIN_NAME: FieldSpec =
        FieldSpec::alphanumeric("immediate origin name", 64, 23).optional();
    pub const REFERENCE_CODE: FieldSpec =
        FieldSpec::alphanumeric("reference code", 87, 8).optional();
}

pub mod trailer {
    use crate::field::FieldSpec;

    pub const RECORD_TYPE: FieldSpec = FieldSpec::numeric("record type code", 1, 1);
    pub const BATCH_COUNT: FieldSpec = FieldSpec::numeric("batch count", 2, 6);
    pub const BLOCK_COUNT: FieldSpec = FieldSpec::numeric("block count", 8, 6);
    pub const ENTRY_ADDENDA_COUNT: FieldSpec =
        FieldSpec::numeric("file entry/addenda count", 14, 8);
    pub const ENTRY_HASH: FieldSpec = FieldSpec::numeric("file entry hash", 22, 10);
    pub const TOTAL_DEBIT: FieldSpec = FieldSpec::numeric("file total debit amount", 32, 12);
    pub const TOTAL_CREDIT: FieldSpec = FieldSpec::numeric("file total credit amount", 44, 12);
    pub const RESERVED: FieldSpec = FieldSpec::reserved(56, 39);
}

const ROUTING_WIDTH: usize = 9;

/// Field layout of the file header record.
pub const HEADER_LAYOUT: [FieldSpec; 13] = [
    header::RECORD_TYPE,
    header::PRIORITY_CODE,
    header::DESTINATION_ROUTING,
    header::ORIGIN_ROUTING,
    header::CREATION_DATE,
    header::CREATION_TIME,
    header::FILE_ID_MODIFIER,
    header::RECORD_SIZE,
    header::BLOCKING_FACTOR,
    header::FORMAT_CODE,
    header::DESTINATION_NAME,
    header::ORIGIN_NAME,
    header::REFERENCE_CODE,
];

/// Field layout of the file control (trailer) record.
pub const TRAILER_LAYOUT: [FieldSpec; 8] = [
    trailer::RECORD_TYPE,
    trailer::BATCH_COUNT,
    trailer::BLOCK_COUNT,
    trailer::ENTRY_ADDENDA_COUNT,
    trailer::ENTRY_HASH,
    trailer::TOTAL_DEBIT,
    trailer::TOTAL_CREDIT,
    trailer::RESERVED,
];

/// Input for [`AchFile::new`].
#[derive(Debug, Clone, Default)]
pub struct FileOptions {
    /// Immediate origin routing number (9 digits).
    pub origin_routing_number: String,
    pub origin_name: Option<String>,
    /// Immediate destination routing number (9 digits).
    pub destination_routing_number: String,
    pub destination_name: Option<String>,
    /// Defaults to the local time at construction.
    pub file_creation: Option<NaiveDateTime>,
    /// Single character `A`-`Z` or `0`-`9`; defaults to `A`.
    pub file_id_modifier: Option<char>,
    pub reference_code: Option<String>,
}

/// A complete ACH file: header, batches, control record and block filler.
///
/// # Example
///
/// ```
/// use ach_encoder::{AchFile, FileOptions};
///
/// let file = AchFile::new(FileOptions {
///     origin_routing_number: "011401533".to_string(),
///     destination_routing_number: "091000019".to_string(),
///     ..Default::default()
/// })
/// .unwrap();
///
/// let output = file.render();
/// assert_eq!(output.lines().count(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchFile {
    origin_routing_number: String,
    origin_name: String,
    destination_routing_number: String,
    destination_name: String,
    file_creation: NaiveDateTime,
    file_id_modifier: char,
    reference_code: String,
    batches: Vec<Batch>,
}

impl AchFile {
    pub const HEADER_RECORD_TYPE: &'static str = "1";
    pub const TRAILER_RECORD_TYPE: &'static str = "9";
    pub const PRIORITY_CODE: &'static str = "01";
    pub const RECORD_SIZE: &'static str = "094";
    pub const BLOCKING_FACTOR: &'static str = "10";
    pub const FORMAT_CODE: &'static str = "1";
    pub const DEFAULT_FILE_ID_MODIFIER: char = 'A';

    /// Validates the options and builds an empty file.
    pub fn new(options: FileOptions) -> Result<Self> {
        validate_routing(header::ORIGIN_ROUTING, &options.origin_routing_number)?;
        validate_routing(
            header::DESTINATION_ROUTING,
            &options.destination_routing_number,
        )?;
        header::ORIGIN_NAME.validate_optional(options.origin_name.as_deref())?;
        header::DESTINATION_NAME.validate_optional(options.destination_name.as_deref())?;
        header::REFERENCE_CODE.validate_optional(options.reference_code.as_deref())?;

        let file_id_modifier = options
            .file_id_modifier
            .unwrap_or(Self::DEFAULT_FILE_ID_MODIFIER);
        if !(file_id_modifier.is_ascii_uppercase() || file_id_modifier.is_ascii_digit()) {
            return Err(AchError::invalid(
                header::FILE_ID_MODIFIER.name,
                ValidationReason::NotUppercaseAlphanumeric,
            ));
        }

        Ok(AchFile {
            origin_routing_number: options.origin_routing_number,
            origin_name: options.origin_name.unwrap_or_default(),
            destination_routing_number: options.destination_routing_number,
            destination_name: options.destination_name.unwrap_or_default(),
            file_creation: options
                .file_creation
                .unwrap_or_else(|| Local::now().naive_local()),
            file_id_modifier,
            reference_code: options.reference_code.unwrap_or_default(),
            batches: Vec::new(),
        })
    }

    /// Appends a batch. Its position becomes its batch number.
    ///
    /// Fails if the file's counts or totals would no longer fit the control record.
    pub fn add_batch(&mut self, batch: Batch) -> Result<()> {
        check_capacity(&trailer::BATCH_COUNT, self.batch_count() + 1)?;
        check_capacity(
            &trailer::ENTRY_ADDENDA_COUNT,
            self.entry_addenda_count() + batch.entry_addenda_count(),
        )?;
        check_capacity(
            &trailer::TOTAL_DEBIT,
            self.total_debit().cents() + batch.total_debit().cents(),
        )?;
        check_capacity(
            &trailer::TOTAL_CREDIT,
            self.total_credit().cents() + batch.total_credit().cents(),
        )?;

        debug!(
            "Added batch {} ({} {}) with {} entries",
            self.batches.len() + 1,
            batch.service_class(),
            batch.standard_entry_class(),
            batch.entry_count()
        );
        self.batches.push(batch);
        Ok(())
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn file_creation(&self) -> NaiveDateTime {
        self.file_creation
    }

    pub fn batch_count(&self) -> u64 {
        self.batches.len() as u64
    }

    pub fn entry_addenda_count(&self) -> u64 {
        self.batches.iter().map(Batch::entry_addenda_count).sum()
    }

    /// Sum of batch entry hashes, truncated to 10 digits.
    pub fn entries_hash(&self) -> u64 {
        self.batches
            .iter()
            .fold(0, |acc, b| (acc + b.entries_hash()) % HASH_MODULUS)
    }

    pub fn total_debit(&self) -> Amount {
        self.batches.iter().map(Batch::total_debit).sum()
    }

    pub fn total_credit(&self) -> Amount {
        self.batches.iter().map(Batch::total_credit).sum()
    }

    /// Renders the file header record.
    pub fn header(&self) -> String {
        let creation_date = self.file_creation.format("%y%m%d").to_string();
        let creation_time = self.file_creation.format("%H%M").to_string();
        let file_id_modifier = self.file_id_modifier.to_string();

        assemble(
            &HEADER_LAYOUT,
            &[
                Self::HEADER_RECORD_TYPE,
                Self::PRIORITY_CODE,
                &self.destination_routing_number,
                &self.origin_routing_number,
                &creation_date,
                &creation_time,
                &file_id_modifier,
                Self::RECORD_SIZE,
                Self::BLOCKING_FACTOR,
                Self::FORMAT_CODE,
                &self.destination_name,
                &self.origin_name,
                &self.reference_code,
            ],
        )
    }

    /// Renders the file control record; `total_lines` includes the control record itself.
    pub fn trailer(&self, total_lines: usize) -> String {
        let batch_count = self.batch_count().to_string();
        let block_count = total_lines.div_ceil(BLOCKING_FACTOR).to_string();
        let count = self.entry_addenda_count().to_string();
        let hash = self.entries_hash().to_string();
        let debit = self.total_debit().cents().to_string();
        let credit = self.total_credit().cents().to_string();

        assemble(
            &TRAILER_LAYOUT,
            &[
                Self::TRAILER_RECORD_TYPE,
                &batch_count,
                &block_count,
                &count,
                &hash,
                &debit,
                &credit,
                "",
            ],
        )
    }

    /// Renders every line of the file, including filler to the block boundary.
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = vec![self.header()];
        for (idx, batch) in self.batches.iter().enumerate() {
            lines.extend(batch.render(idx as u32 + 1));
        }

        let trailer = self.trailer(lines.len() + 1);
        lines.push(trailer);

        let remainder = lines.len() % BLOCKING_FACTOR;
        if remainder > 0 {
            let filler = filler_line();
            lines.extend(std::iter::repeat(filler).take(BLOCKING_FACTOR - remainder));
        }

        debug!(
            "Rendered {} lines in {} blocks for {} batches",
            lines.len(),
            lines.len() / BLOCKING_FACTOR,
            self.batches.len()
        );
        lines
    }

    /// Renders the file as newline-separated text with no trailing newline.
    pub fn render(&self) -> String {
        self.render_lines().join("\n")
    }

    /// Writes the rendered file to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// Routing numbers are 9 digits, rendered into a 10 character field.
fn validate_routing(spec: FieldSpec, value: &str) -> Result<()> {
    FieldSpec {
        width: ROUTING_WIDTH,
        ..spec
    }
    .fixed()
    .validate(value)
}
