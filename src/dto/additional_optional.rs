use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Optional customer profile details, including the server-configured
/// `more_details` section and reference contacts.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdditionalOptionalDto {
    pub cust_id: String,
    pub annual_income: Option<f64>,
    pub net_worth: Option<f64>,
    pub income_source: String,
    pub education: String,
    pub employer_name: String,
    pub pep_flag: String,
    pub pep_details: String,
    pub foreign_tax_flag: String,
    pub tax_residency_country: String,
    pub foreign_tin: String,
    pub more_details: BTreeMap<String, String>,
    pub additional_references: Vec<BTreeMap<String, String>>,
}
