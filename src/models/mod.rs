//! Database and configuration models of the back-office service.

pub mod config;
pub mod master_record;
pub mod submission;
