use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AddressDto {
    pub addr_line1: String,
    pub addr_line2: String,
    pub city: String,
    pub state: String,
    pub pin_code: String,
    pub country: String,
}

/// Customer basic information as accepted by the customer service.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BasicInfoDto {
    pub cust_id: String,
    pub salutation: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub full_name: String,
    pub dob: String,
    pub gender: String,
    pub marital_status: String,
    pub spouse_name: String,
    pub father_name: String,
    pub mother_maiden_name: String,
    pub mobile_no: String,
    pub email_id: String,
    pub pan_no: String,
    /// `Y` or `N`.
    pub minor_flag: String,
    pub guardian_cust_id: String,
    pub guardian_relation: String,
    pub occupation_code: String,
    pub risk_category: String,
    pub nationality: String,
    pub address: AddressDto,
}
