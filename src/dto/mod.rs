//! Request/response shapes of the backend API, distinct from the camelCase
//! UI form shapes in [`crate::forms`].

pub mod additional_optional;
pub mod basic_info;
pub mod charge_master;
pub mod form60;
pub mod forms;
pub mod input;
pub mod kyc;
pub mod lead;
pub mod loan_scheme;
pub mod nominee;
