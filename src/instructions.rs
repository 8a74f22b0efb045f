//! Payment instruction CSV loading.
//!
//! Builds an [`AchFile`] from two CSV inputs: a one-row file header and a
//! list of entries. Consecutive entry rows that share the same batch columns
//! form one batch. Any bad row aborts the load; rows are never skipped.

use crate::addenda::Addenda;
use crate::amount::Amount;
use crate::batch::{Batch, BatchOptions};
use crate::codes::{ServiceClass, StandardEntryClass, TransactionCode};
use crate::entry::{Entry, EntryOptions};
use crate::error::{AchError, Result};
use crate::file::{AchFile, FileOptions};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use log::{debug, info};
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Raw file header row as read from CSV.
#[derive(Debug, Deserialize)]
pub struct HeaderRecord {
    pub origin_routing: String,
    pub origin_name: Option<String>,
    pub destination_routing: String,
    pub destination_name: Option<String>,
    /// `YYYY-MM-DD HH:MM`; empty means now.
    pub creation: Option<String>,
    pub file_id_modifier: Option<String>,
    pub reference_code: Option<String>,
}

impl HeaderRecord {
    /// Converts the raw row into validated file options.
    pub fn parse(&self) -> std::result::Result<FileOptions, String> {
        let file_creation = non_empty(&self.creation)
            .map(|s| {
                NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT)
                    .map_err(|e| format!("invalid creation timestamp '{}': {}", s, e))
            })
            .transpose()?;

        let file_id_modifier = match non_empty(&self.file_id_modifier) {
            None => None,
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => return Err(format!("file id modifier '{}' must be one character", s)),
                }
            }
        };

        Ok(FileOptions {
            origin_routing_number: self.origin_routing.clone(),
            origin_name: non_empty(&self.origin_name).map(str::to_string),
            destination_routing_number: self.destination_routing.clone(),
            destination_name: non_empty(&self.destination_name).map(str::to_string),
            file_creation,
            file_id_modifier,
            reference_code: non_empty(&self.reference_code).map(str::to_string),
        })
    }
}

/// Raw entry row as read from CSV, carrying its batch columns.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryRecord {
    pub service_class: String,
    pub sec_code: String,
    pub company_name: String,
    pub company_data: Option<String>,
    pub company_id: String,
    pub description: String,
    pub descriptive_date: Option<String>,
    pub effective_date: Option<String>,
    pub origin_dfi: String,

    pub transaction_code: String,
    pub routing_number: String,
    pub account_number: String,
    pub amount: Amount,
    pub id_number: Option<String>,
    pub name: String,
    pub discretionary_data: Option<String>,
    pub addenda: Option<String>,
}

/// The columns that decide which batch an entry row belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BatchKey<'a> {
    service_class: &'a str,
    sec_code: &'a str,
    company_name: &'a str,
    company_data: Option<&'a str>,
    company_id: &'a str,
    description: &'a str,
    descriptive_date: Option<&'a str>,
    effective_date: Option<&'a str>,
    origin_dfi: &'a str,
}

impl EntryRecord {
    fn batch_key(&self) -> BatchKey<'_> {
        BatchKey {
            service_class: &self.service_class,
            sec_code: &self.sec_code,
            company_name: &self.company_name,
            company_data: non_empty(&self.company_data),
            company_id: &self.company_id,
            description: &self.description,
            descriptive_date: non_empty(&self.descriptive_date),
            effective_date: non_empty(&self.effective_date),
            origin_dfi: &self.origin_dfi,
        }
    }

    /// Builds the batch this row opens. `row` is the 1-based CSV line used
    /// in date errors.
    pub fn parse_batch(&self, row: usize) -> Result<Batch> {
        Batch::new(BatchOptions {
            service_class: ServiceClass::from_str(&self.service_class)?,
            company_name: self.company_name.clone(),
            company_discretionary_data: non_empty(&self.company_data).map(str::to_string),
            company_identification: self.company_id.clone(),
            standard_entry_class: StandardEntryClass::from_str(&self.sec_code)?,
            description: self.description.clone(),
            descriptive_date: parse_date(&self.descriptive_date, "descriptive date", row)?,
            effective_entry_date: parse_date(&self.effective_date, "effective date", row)?,
            origin_dfi: self.origin_dfi.clone(),
            origin_status_code: None,
            message_authentication_code: None,
        })
    }

    /// Builds the entry (and its addenda) described by this row.
    pub fn parse_entry(&self) -> Result<Entry> {
        let mut entry = Entry::new(EntryOptions {
            transaction_code: TransactionCode::from_str(&self.transaction_code)?,
            destination_routing_number: self.routing_number.clone(),
            destination_account_number: self.account_number.clone(),
            amount: self.amount,
            transaction_id: non_empty(&self.id_number).map(str::to_string),
            destination_name: self.name.clone(),
            discretionary_data: non_empty(&self.discretionary_data).map(str::to_string),
        })?;

        if let Some(info) = non_empty(&self.addenda) {
            entry.set_addenda(Addenda::new(Some(info))?);
        }

        Ok(entry)
    }
}

/// Reads the single file header row.
pub fn read_header<R: Read>(reader: R) -> Result<FileOptions> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = csv_reader.deserialize::<HeaderRecord>();
    let record = match records.next() {
        Some(result) => result?,
        None => {
            return Err(AchError::InvalidRecord {
                row: 2,
                message: "file header row is missing".to_string(),
            })
        }
    };

    if records.next().is_some() {
        return Err(AchError::InvalidRecord {
            row: 3,
            message: "expected exactly one file header row".to_string(),
        });
    }

    record
        .parse()
        .map_err(|message| AchError::InvalidRecord { row: 2, message })
}

/// Reads entry rows, grouping consecutive rows with identical batch columns.
pub fn read_batches<R: Read>(reader: R) -> Result<Vec<Batch>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut batches: Vec<Batch> = Vec::new();
    let mut previous: Option<EntryRecord> = None;

    for (row_idx, result) in csv_reader.deserialize::<EntryRecord>().enumerate() {
        let row = row_idx + 2; // 1-indexed, accounting for header row
        let record = result.map_err(|e| at_row(row, e.into()))?;

        let starts_batch = match &previous {
            Some(prev) => prev.batch_key() != record.batch_key(),
            None => true,
        };
        if starts_batch {
            debug!("Row {}: starting batch for {}", row, record.company_name);
            batches.push(record.parse_batch(row).map_err(|e| at_row(row, e))?);
        }

        let entry = record.parse_entry().map_err(|e| at_row(row, e))?;
        debug!(
            "Row {}: {} {} to {}",
            row,
            entry.transaction_code(),
            entry.amount(),
            entry.destination_name()
        );

        // a batch was pushed on the first row at the latest
        if let Some(batch) = batches.last_mut() {
            batch.add_entry(entry).map_err(|e| at_row(row, e))?;
        }
        previous = Some(record);
    }

    Ok(batches)
}

/// Loads a complete file from header and entry CSV readers.
pub fn load<H: Read, E: Read>(header: H, entries: E) -> Result<AchFile> {
    let mut file = AchFile::new(read_header(header)?)?;
    for batch in read_batches(entries)? {
        file.add_batch(batch)?;
    }

    info!(
        "Loaded {} batches with {} entry/addenda records",
        file.batch_count(),
        file.entry_addenda_count()
    );
    Ok(file)
}

fn at_row(row: usize, err: AchError) -> AchError {
    match err {
        err @ AchError::InvalidRecord { .. } => err,
        other => AchError::InvalidRecord {
            row,
            message: other.to_string(),
        },
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(value: &Option<String>, what: &str, row: usize) -> Result<Option<NaiveDate>> {
    non_empty(value)
        .map(|s| {
            NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| AchError::InvalidRecord {
                row,
                message: format!("invalid {} '{}': {}", what, s, e),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const COLUMNS: &str = "service_class,sec_code,company_name,company_data,company_id,description,descriptive_date,effective_date,origin_dfi,transaction_code,routing_number,account_number,amount,id_number,name,discretionary_data,addenda";

    fn batches(rows: &str) -> Result<Vec<Batch>> {
        read_batches(Cursor::new(format!("{}\n{}", COLUMNS, rows)))
    }

    #[test]
    fn test_read_header() {
        let csv = "origin_routing,origin_name,destination_routing,destination_name,creation,file_id_modifier,reference_code
011401533,Some Bank,091000019,Your Bank,2023-01-01 09:30,B,12";

        let options = read_header(Cursor::new(csv)).unwrap();
        assert_eq!(options.origin_routing_number, "011401533");
        assert_eq!(options.destination_name.as_deref(), Some("Your Bank"));
        assert_eq!(options.file_id_modifier, Some('B'));
        assert_eq!(
            options.file_creation.unwrap().format("%y%m%d%H%M").to_string(),
            "2301010930"
        );
    }

    #[test]
    fn test_read_header_optional_columns_empty() {
        let csv = "origin_routing,origin_name,destination_routing,destination_name,creation,file_id_modifier,reference_code
011401533,,091000019,,,,";

        let options = read_header(Cursor::new(csv)).unwrap();
        assert!(options.origin_name.is_none());
        assert!(options.file_creation.is_none());
        assert!(options.file_id_modifier.is_none());
    }

    #[test]
    fn test_read_header_requires_one_row() {
        let csv = "origin_routing,origin_name,destination_routing,destination_name,creation,file_id_modifier,reference_code\n";
        assert!(matches!(
            read_header(Cursor::new(csv)),
            Err(AchError::InvalidRecord { row: 2, .. })
        ));
    }

    #[test]
    fn test_groups_consecutive_rows_into_batches() {
        let rows = "\
220,CCD,Your Company Inc,A1,RAj2392,Payroll,2023-01-01,2023-01-01,01140153,22,091000019,1234567897,3521.00,000001309,Leroy Jenkins,,
220,CCD,Your Company Inc,A1,RAj2392,Payroll,2023-01-01,2023-01-01,01140153,22,091000019,1234567897,50.50,000001313,Leroy Jenkins,,Im a special boy
225,CCD,Your Company Inc,A1,Foobar,You Know,2024-04-01,2024-04-01,01140153,27,091000019,1234567897,3.50,5051309,Richard Branson,,";

        let batches = batches(rows).unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].entry_count(), 2);
        assert_eq!(batches[0].addenda_count(), 1);
        assert_eq!(batches[1].service_class(), ServiceClass::Debit);
        assert_eq!(batches[1].total_debit().cents(), 350);
    }

    #[test]
    fn test_unknown_sec_code_reports_row() {
        let rows = "220,XYZ,Co,,ID,Desc,,2023-01-01,01140153,22,091000019,123,1.00,,Name,,";
        let err = batches(rows).unwrap_err();
        match err {
            AchError::InvalidRecord { row, message } => {
                assert_eq!(row, 2);
                assert!(message.contains("XYZ"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_bad_amount_reports_row() {
        let rows = "\
220,CCD,Co,,ID,Desc,,2023-01-01,01140153,22,091000019,123,1.00,,Name,,
220,CCD,Co,,ID,Desc,,2023-01-01,01140153,22,091000019,123,abc,,Name,,";
        assert!(matches!(
            batches(rows),
            Err(AchError::InvalidRecord { row: 3, .. })
        ));
    }

    #[test]
    fn test_unknown_transaction_code_fails() {
        let rows = "220,CCD,Co,,ID,Desc,,2023-01-01,01140153,23,091000019,123,1.00,,Name,,";
        assert!(batches(rows).is_err());
    }

    #[test]
    fn test_bad_date_reports_row() {
        let rows = "\
220,CCD,Co,,ID,Desc,,2023-01-01,01140153,22,091000019,123,1.00,,Name,,
220,PPD,Co,,ID,Desc,,01/01/2023,01140153,22,091000019,123,1.00,,Name,,";
        match batches(rows).unwrap_err() {
            AchError::InvalidRecord { row, message } => {
                assert_eq!(row, 3);
                assert!(message.contains("effective date"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_parse_batch_date_error_carries_given_row() {
        let rows = "220,CCD,Co,,ID,Desc,13/99/23,2023-01-01,01140153,22,091000019,123,1.00,,Name,,";
        let record = ReaderBuilder::new()
            .from_reader(Cursor::new(format!("{}\n{}", COLUMNS, rows)))
            .deserialize::<EntryRecord>()
            .next()
            .unwrap()
            .unwrap();
        assert!(matches!(
            record.parse_batch(7),
            Err(AchError::InvalidRecord { row: 7, .. })
        ));
    }
}
