//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::validation::dynamic::FieldDescriptor;

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> usize {
    100
}

#[derive(Clone, Debug, Deserialize)]
/// Settings shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
    /// Descriptors of the `moreDetails` section of the additional details form.
    #[serde(default)]
    pub more_details: Vec<FieldDescriptor>,
    /// Descriptors of each entry of `additionalReferences`.
    #[serde(default)]
    pub additional_references: Vec<FieldDescriptor>,
}
