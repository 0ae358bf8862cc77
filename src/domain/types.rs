//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce the identifier formats used during KYC onboarding
//! (PAN, Aadhaar, IFSC, pincode, mobile) so that once a value reaches the
//! domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::sync::LazyLock;

use phonenumber::country;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Phone number did not meet expected format.
    #[error("invalid mobile number")]
    InvalidPhone,
    #[error("invalid PAN")]
    InvalidPan,
    #[error("invalid Aadhaar number")]
    InvalidAadhaar,
    #[error("invalid IFSC code")]
    InvalidIfsc,
    #[error("invalid pincode")]
    InvalidPincode,
}

pub const PAN_PATTERN: &str = r"^[A-Z]{5}[0-9]{4}[A-Z]$";
pub const AADHAAR_PATTERN: &str = r"^[2-9][0-9]{11}$";
pub const IFSC_PATTERN: &str = r"^[A-Z]{4}0[A-Z0-9]{6}$";
pub const PINCODE_PATTERN: &str = r"^[1-9][0-9]{5}$";
pub const MOBILE_PATTERN: &str = r"^[6-9][0-9]{9}$";
pub const NAME_PATTERN: &str = r"^[A-Za-z][A-Za-z .'-]*$";
pub const CODE_PATTERN: &str = r"^[A-Z0-9_-]{1,30}$";

pub(crate) static PAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PAN_PATTERN).expect("valid PAN regex"));
pub(crate) static AADHAAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(AADHAAR_PATTERN).expect("valid Aadhaar regex"));
pub(crate) static IFSC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IFSC_PATTERN).expect("valid IFSC regex"));
pub(crate) static PINCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PINCODE_PATTERN).expect("valid pincode regex"));
pub(crate) static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MOBILE_PATTERN).expect("valid mobile regex"));
pub(crate) static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NAME_PATTERN).expect("valid name regex"));
pub(crate) static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CODE_PATTERN).expect("valid code regex"));

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(MasterRecordId, "Unique identifier for a master-data record.");
id_newtype!(SubmissionId, "Unique identifier for a stored form submission.");

/// Shared accessors and conversions for string-backed value objects.
macro_rules! string_value_impls {
    ($name:ident) => {
        impl $name {
            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }
}

string_value_impls!(NonEmptyString);

/// Master-data name, trimmed and non-empty.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MasterName(String);

impl MasterName {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        Ok(Self(NonEmptyString::new(value)?.into_inner()))
    }
}

string_value_impls!(MasterName);

/// Master-data code: upper-cased letters, digits, `_` and `-`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MasterCode(String);

impl MasterCode {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let code = NonEmptyString::new(value)?.into_inner().to_uppercase();
        if CODE_RE.is_match(&code) {
            Ok(Self(code))
        } else {
            Err(TypeConstraintError::InvalidValue(format!(
                "code `{code}` must use A-Z, 0-9, `_` or `-`"
            )))
        }
    }
}

string_value_impls!(MasterCode);

/// Permanent Account Number issued by the Indian tax department.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PanNumber(String);

impl PanNumber {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let pan = value.into().trim().to_uppercase();
        if PAN_RE.is_match(&pan) {
            Ok(Self(pan))
        } else {
            Err(TypeConstraintError::InvalidPan)
        }
    }
}

string_value_impls!(PanNumber);

/// Twelve digit Aadhaar number with grouping spaces removed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AadhaarNumber(String);

impl AadhaarNumber {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let digits: String = value.into().chars().filter(|c| !c.is_whitespace()).collect();
        if AADHAAR_RE.is_match(&digits) {
            Ok(Self(digits))
        } else {
            Err(TypeConstraintError::InvalidAadhaar)
        }
    }

    /// Aadhaar with all but the last four digits hidden.
    pub fn masked(&self) -> String {
        format!("XXXXXXXX{}", &self.0[8..])
    }
}

string_value_impls!(AadhaarNumber);

/// Bank branch IFSC code.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct IfscCode(String);

impl IfscCode {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let code = value.into().trim().to_uppercase();
        if IFSC_RE.is_match(&code) {
            Ok(Self(code))
        } else {
            Err(TypeConstraintError::InvalidIfsc)
        }
    }
}

string_value_impls!(IfscCode);

/// Six digit postal index number.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Pincode(String);

impl Pincode {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let pin = value.into().trim().to_string();
        if PINCODE_RE.is_match(&pin) {
            Ok(Self(pin))
        } else {
            Err(TypeConstraintError::InvalidPincode)
        }
    }
}

string_value_impls!(Pincode);

/// Normalizes a mobile number to its ten digit Indian national form.
pub fn normalize_mobile(value: &str) -> Result<String, TypeConstraintError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    let parsed = phonenumber::parse(Some(country::Id::IN), trimmed)
        .map_err(|_| TypeConstraintError::InvalidPhone)?;
    if !phonenumber::is_valid(&parsed) {
        return Err(TypeConstraintError::InvalidPhone);
    }
    let national = parsed.national().value().to_string();
    if MOBILE_RE.is_match(&national) {
        Ok(national)
    } else {
        Err(TypeConstraintError::InvalidPhone)
    }
}

/// Indian mobile number stored as ten national digits.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MobileNumber(String);

impl MobileNumber {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        Ok(Self(normalize_mobile(&value.into())?))
    }

    /// Formats the number as E.164 (`+91XXXXXXXXXX`).
    pub fn e164(&self) -> String {
        format!("+91{}", self.0)
    }
}

string_value_impls!(MobileNumber);

/// Lower-cased and validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = email.into().trim().to_lowercase();
        if normalized.validate_email() {
            Ok(Self(normalized))
        } else {
            Err(TypeConstraintError::InvalidEmail)
        }
    }
}

string_value_impls!(EmailAddress);
