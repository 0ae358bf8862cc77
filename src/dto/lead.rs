use serde::{Deserialize, Serialize};

/// Sales lead as accepted by the lead management service.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LeadDto {
    pub lead_name: String,
    pub mobile_no: String,
    pub email_id: String,
    pub product_code: String,
    pub source_code: String,
    pub referred_by: String,
    pub referrer_cust_id: String,
    pub campaign_code: String,
    pub branch_code: String,
    pub assigned_to: String,
    pub expected_amt: Option<f64>,
    pub follow_up_date: String,
    pub remarks: String,
    pub consent_flag: String,
}
