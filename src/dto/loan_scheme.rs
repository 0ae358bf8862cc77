use serde::{Deserialize, Serialize};

/// Loan scheme configuration as accepted by the loan products service.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoanSchemeDto {
    pub scheme_code: String,
    pub scheme_name: String,
    pub product_code: String,
    pub min_loan_amt: f64,
    pub max_loan_amt: f64,
    pub min_tenure_months: u32,
    pub max_tenure_months: u32,
    /// `FIXED` or `FLOATING`.
    pub interest_type: String,
    pub fixed_roi: Option<f64>,
    pub benchmark_rate: Option<f64>,
    pub spread_rate: Option<f64>,
    pub effective_roi: Option<f64>,
    pub secured_flag: String,
    pub collateral_type: String,
    pub max_ltv_pct: Option<f64>,
    pub staff_flag: String,
    pub priority_sector_flag: String,
    pub processing_fee_code: String,
    pub prepayment_charge_code: String,
    pub eff_from_date: String,
    pub eff_to_date: String,
    pub active_flag: String,
}
