use serde::{Deserialize, Serialize};

use crate::dto::basic_info::AddressDto;

/// Form 60 declaration for customers without a PAN.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Form60Dto {
    pub cust_id: String,
    pub declarant_name: String,
    pub dob: String,
    pub father_name: String,
    pub address: AddressDto,
    pub txn_date: String,
    pub txn_amount: f64,
    pub txn_mode: String,
    pub aadhaar_no: String,
    pub pan_applied_flag: String,
    pub pan_ack_no: String,
    pub pan_applied_date: String,
    pub agri_income: f64,
    pub other_income: f64,
    pub doc_type: String,
    pub doc_id_no: String,
    pub doc_issuing_authority: String,
}
