//! Data structures and validation helpers shared by the storage adapter and
//! the HTTP API.

use std::fmt;

use strum_macros::AsRefStr;
use thiserror::Error;

/// Maximum number of characters allowed in a phone number.
pub const MAX_NUMBER_LENGTH: usize = 11;

/// Errors emitted when a user-supplied phone number fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NumberFormatError {
    #[error("phone number must be no more than {MAX_NUMBER_LENGTH} characters long (got {length})")]
    TooLong { length: usize },
}

/// Validates the length contract for phone numbers.
///
/// Length is measured in Unicode scalar values, so a character outside the
/// Basic Multilingual Plane counts once rather than as a surrogate pair.
pub fn validate_number(number: &str) -> Result<(), NumberFormatError> {
    let length = number.chars().count();
    if length > MAX_NUMBER_LENGTH {
        return Err(NumberFormatError::TooLong { length });
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(i32);

impl AccountId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for AccountId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhoneNumberId(i32);

impl PhoneNumberId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for PhoneNumberId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for PhoneNumberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Two-state account lifecycle. Accounts start out active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Active,
    Suspended,
}

impl AccountStatus {
    /// Returns the opposite status.
    pub fn toggled(self) -> Self {
        match self {
            AccountStatus::Active => AccountStatus::Suspended,
            AccountStatus::Suspended => AccountStatus::Active,
        }
    }

    pub fn is_suspended(self) -> bool {
        matches!(self, AccountStatus::Suspended)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub name: Option<String>,
    pub status: AccountStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAccount {
    pub name: Option<String>,
    pub status: AccountStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber {
    pub id: PhoneNumberId,
    pub number: String,
    pub account_id: Option<AccountId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhoneNumber {
    pub number: String,
    pub account_id: Option<AccountId>,
}
