//! # ACH Encoder
//!
//! Encodes payment instructions into NACHA ACH files: fixed-width, 94-character
//! text records grouped as a file header, batches of entries, a file control
//! record and block filler.
//!
//! ## Design Principles
//!
//! - **Validate at construction**: every record checks its fields against a static
//!   layout table when built; rendering cannot fail
//! - **Cent-exact amounts**: currency is held as `rust_decimal` rounded to the cent
//! - **Derived totals**: counts, hashes and debit/credit sums are recomputed from
//!   entries on demand, never stored
//! - **Pure rendering**: `AchFile::render` is deterministic and may be called repeatedly
//!
//! ## Example
//!
//! ```
//! use ach_encoder::{
//!     AchFile, Amount, Batch, BatchOptions, Entry, EntryOptions, FileOptions, ServiceClass,
//!     StandardEntryClass, TransactionCode,
//! };
//! use std::str::FromStr;
//!
//! let mut file = AchFile::new(FileOptions {
//!     origin_routing_number: "011401533".to_string(),
//!     destination_routing_number: "091000019".to_string(),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let mut batch = Batch::new(BatchOptions {
//!     service_class: ServiceClass::Credit,
//!     company_name: "Your Company Inc".to_string(),
//!     company_discretionary_data: None,
//!     company_identification: "RAj2392".to_string(),
//!     standard_entry_class: StandardEntryClass::Ccd,
//!     description: "Payroll".to_string(),
//!     descriptive_date: None,
//!     effective_entry_date: None,
//!     origin_dfi: "01140153".to_string(),
//!     origin_status_code: None,
//!     message_authentication_code: None,
//! })
//! .unwrap();
//!
//! batch
//!     .add_entry(
//!         Entry::new(EntryOptions {
//!             transaction_code: TransactionCode::CheckingCredit,
//!             destination_routing_number: "091000019".to_string(),
//!             destination_account_number: "1234567897".to_string(),
//!             amount: Amount::from_str("3521.00").unwrap(),
//!             transaction_id: None,
//!             destination_name: "Leroy Jenkins".to_string(),
//!             discretionary_data: None,
//!         })
//!         .unwrap(),
//!     )
//!     .unwrap();
//! file.add_batch(batch).unwrap();
//!
//! let output = file.render();
//! assert!(output.lines().all(|line| line.len() == 94));
//! ```

pub mod addenda;
pub mod amount;
pub mod batch;
pub mod codes;
pub mod entry;
pub mod error;
pub mod field;
pub mod file;
pub mod instructions;
pub mod routing;

pub use addenda::Addenda;
pub use amount::Amount;
pub use batch::{Batch, BatchOptions};
pub use codes::{ServiceClass, StandardEntryClass, TransactionCode};
pub use entry::{Entry, EntryOptions};
pub use error::{AchError, Result, ValidationReason};
pub use field::{FieldSpec, LINE_LENGTH};
pub use file::{AchFile, FileOptions};
