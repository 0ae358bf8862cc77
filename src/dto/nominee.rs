use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NomineeDetailDto {
    pub nominee_name: String,
    pub relation_code: String,
    pub dob: String,
    pub minor_flag: String,
    pub guardian_name: String,
    pub guardian_relation: String,
    pub share_pct: f64,
    pub mobile_no: String,
    pub address_line: String,
}

/// Account nomination as accepted by the accounts service.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NomineeDto {
    pub cust_id: String,
    pub acct_no: String,
    /// `Y` when the customer opted to nominate.
    pub nomination_flag: String,
    pub nominees: Vec<NomineeDetailDto>,
}
