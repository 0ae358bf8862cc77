use serde::{Deserialize, Serialize};

/// KYC document details as accepted by the customer service.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KycDto {
    pub cust_id: String,
    pub pan_no: String,
    /// `Y` when Form 60 was filed in place of a PAN.
    pub form60_flag: String,
    pub aadhaar_no: String,
    pub ckyc_no: String,
    pub id_proof_type: String,
    pub id_proof_no: String,
    pub addr_proof_type: String,
    pub addr_proof_no: String,
    pub addr_same_as_id: String,
    pub kyc_date: String,
    pub kyc_expiry_date: String,
    pub video_kyc_flag: String,
    pub video_kyc_ref: String,
    pub remarks: String,
}
