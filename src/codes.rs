//! Enumerated NACHA codes.
//!
//! These are closed sets; anything arriving from an external representation
//! goes through `TryFrom`/`FromStr` here before a record can be built.

use crate::error::{AchError, ValidationReason};
use std::fmt;
use std::str::FromStr;

/// Batch service class code: which transaction directions a batch may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceClass {
    /// Mixed debits and credits (200).
    CreditDebit,
    /// Credits only (220).
    Credit,
    /// Debits only (225).
    Debit,
}

impl ServiceClass {
    pub fn code(&self) -> u16 {
        match self {
            ServiceClass::CreditDebit => 200,
            ServiceClass::Credit => 220,
            ServiceClass::Debit => 225,
        }
    }
}

impl TryFrom<u16> for ServiceClass {
    type Error = AchError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            200 => Ok(ServiceClass::CreditDebit),
            220 => Ok(ServiceClass::Credit),
            225 => Ok(ServiceClass::Debit),
            other => Err(AchError::invalid(
                "service class code",
                ValidationReason::UnknownCode(other.to_string()),
            )),
        }
    }
}

impl FromStr for ServiceClass {
    type Err = AchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<u16>()
            .map_err(|_| {
                AchError::invalid(
                    "service class code",
                    ValidationReason::UnknownCode(trimmed.to_string()),
                )
            })
            .and_then(ServiceClass::try_from)
    }
}

impl fmt::Display for ServiceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Entry transaction code. Only live checking/savings debits and credits are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionCode {
    CheckingCredit,
    CheckingDebit,
    SavingsCredit,
    SavingsDebit,
}

impl TransactionCode {
    pub fn code(&self) -> u8 {
        match self {
            TransactionCode::CheckingCredit => 22,
            TransactionCode::CheckingDebit => 27,
            TransactionCode::SavingsCredit => 32,
            TransactionCode::SavingsDebit => 37,
        }
    }

    /// Returns `true` for credit transaction codes.
    pub fn is_credit(&self) -> bool {
        matches!(
            self,
            TransactionCode::CheckingCredit | TransactionCode::SavingsCredit
        )
    }

    /// Returns `true` for debit transaction codes.
    pub fn is_debit(&self) -> bool {
        !self.is_credit()
    }
}

impl TryFrom<u8> for TransactionCode {
    type Error = AchError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            22 => Ok(TransactionCode::CheckingCredit),
            27 => Ok(TransactionCode::CheckingDebit),
            32 => Ok(TransactionCode::SavingsCredit),
            37 => Ok(TransactionCode::SavingsDebit),
            other => Err(AchError::invalid(
                "transaction code",
                ValidationReason::UnknownCode(other.to_string()),
            )),
        }
    }
}

impl FromStr for TransactionCode {
    type Err = AchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<u8>()
            .map_err(|_| {
                AchError::invalid(
                    "transaction code",
                    ValidationReason::UnknownCode(trimmed.to_string()),
                )
            })
            .and_then(TransactionCode::try_from)
    }
}

impl fmt::Display for TransactionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.code())
    }
}

/// Standard Entry Class code identifying the payment application of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardEntryClass {
    /// Accounts receivable check conversion
    Arc,
    /// Back office conversion
    Boc,
    /// Corporate credit or debit
    Ccd,
    /// Customer initiated entry
    Cie,
    /// Corporate trade exchange
    Ctx,
    /// International ACH transaction
    Iat,
    /// Point of purchase
    Pop,
    /// Point of sale
    Pos,
    /// Prearranged payment and deposit
    Ppd,
    /// Re-presented check
    Rck,
    /// Telephone initiated
    Tel,
    /// Internet initiated
    Web,
}

impl StandardEntryClass {
    pub const ALL: [StandardEntryClass; 12] = [
        StandardEntryClass::Arc,
        StandardEntryClass::Boc,
        StandardEntryClass::Ccd,
        StandardEntryClass::Cie,
        StandardEntryClass::Ctx,
        StandardEntryClass::Iat,
        StandardEntryClass::Pop,
        StandardEntryClass::Pos,
        StandardEntryClass::Ppd,
        StandardEntryClass::Rck,
        StandardEntryClass::Tel,
        StandardEntryClass::Web,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StandardEntryClass::Arc => "ARC",
            StandardEntryClass::Boc => "BOC",
            StandardEntryClass::Ccd => "CCD",
            StandardEntryClass::Cie => "CIE",
            StandardEntryClass::Ctx => "CTX",
            StandardEntryClass::Iat => "IAT",
            StandardEntryClass::Pop => "POP",
            StandardEntryClass::Pos => "POS",
            StandardEntryClass::Ppd => "PPD",
            StandardEntryClass::Rck => "RCK",
            StandardEntryClass::Tel => "TEL",
            StandardEntryClass::Web => "WEB",
        }
    }
}

impl FromStr for StandardEntryClass {
    type Err = AchError;

    /// Parses an exact, upper-case three letter code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        StandardEntryClass::ALL
            .into_iter()
            .find(|class| class.as_str() == trimmed)
            .ok_or_else(|| {
                AchError::invalid(
                    "standard entry class code",
                    ValidationReason::UnknownCode(trimmed.to_string()),
                )
            })
    }
}

impl fmt::Display for StandardEntryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
