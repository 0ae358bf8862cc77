//! Domain entities and value objects shared by the form and persistence layers.

pub mod master_data;
pub mod submission;
pub mod types;
