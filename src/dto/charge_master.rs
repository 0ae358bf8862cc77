use serde::{Deserialize, Serialize};

/// Service charge definition as accepted by the charges service.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChargeMasterDto {
    pub charge_code: String,
    pub charge_name: String,
    pub charge_type: String,
    pub fixed_amt: Option<f64>,
    pub charge_pct: Option<f64>,
    pub min_amt: Option<f64>,
    pub max_amt: Option<f64>,
    pub gst_flag: String,
    pub gst_rate: Option<f64>,
    pub frequency: String,
    pub eff_from_date: String,
    pub eff_to_date: String,
    pub active_flag: String,
    pub gl_code: String,
}
