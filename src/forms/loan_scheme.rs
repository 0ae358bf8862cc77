use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::submission::FormKind;
use crate::domain::types::{CODE_PATTERN, CODE_RE};
use crate::dto::loan_scheme::LoanSchemeDto;
use crate::forms::{
    FormContext, FormSchema, check_date, check_order, format_rule, is_yes, lenient,
    required_when_equals, required_when_true, trimmed, upper, yes_no,
};
use crate::validation::FieldErrors;
use crate::validation::rules::ConditionalRule;

pub const INTEREST_TYPES: &str = "^(FIXED|FLOATING)$";
pub const MAX_INTEREST_RATE: f64 = 36.0;
pub const MAX_TENURE_MONTHS: u32 = 480;
pub const MIN_SPREAD: f64 = -5.0;
pub const MAX_SPREAD: f64 = 10.0;

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LoanSchemeForm {
    #[validate(
        length(min = 1, message = "Scheme code is required"),
        regex(path = *CODE_RE, message = "Scheme code may only contain A-Z, 0-9, _ and -")
    )]
    pub scheme_code: String,
    #[validate(length(min = 1, message = "Scheme name is required"))]
    pub scheme_name: String,
    #[validate(length(min = 1, message = "Loan product is required"))]
    pub product_code: String,
    #[serde(deserialize_with = "lenient::number")]
    #[validate(range(exclusive_min = 0.0, message = "Minimum loan amount must be greater than zero"))]
    pub min_amount: f64,
    #[serde(deserialize_with = "lenient::number")]
    #[validate(range(exclusive_min = 0.0, message = "Maximum loan amount must be greater than zero"))]
    pub max_amount: f64,
    #[serde(deserialize_with = "lenient::count")]
    #[validate(range(min = 1, max = MAX_TENURE_MONTHS, message = "Minimum tenure must be between 1 and 480 months"))]
    pub min_tenure_months: u32,
    #[serde(deserialize_with = "lenient::count")]
    #[validate(range(min = 1, max = MAX_TENURE_MONTHS, message = "Maximum tenure must be between 1 and 480 months"))]
    pub max_tenure_months: u32,
    #[validate(length(min = 1, message = "Interest type is required"))]
    pub interest_type: String,
    #[serde(deserialize_with = "lenient::optional_number")]
    #[validate(range(min = 0.0, max = MAX_INTEREST_RATE, message = "Interest rate must be between 0 and 36"))]
    pub fixed_rate: Option<f64>,
    #[serde(deserialize_with = "lenient::optional_number")]
    #[validate(range(min = 0.0, max = MAX_INTEREST_RATE, message = "Benchmark rate must be between 0 and 36"))]
    pub benchmark_rate: Option<f64>,
    #[serde(deserialize_with = "lenient::optional_number")]
    #[validate(range(min = MIN_SPREAD, max = MAX_SPREAD, message = "Spread must be between -5 and 10"))]
    pub spread: Option<f64>,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_secured: bool,
    pub collateral_type: String,
    #[serde(deserialize_with = "lenient::optional_number")]
    #[validate(range(exclusive_min = 0.0, max = 100.0, message = "Maximum LTV must be above 0 and at most 100"))]
    pub max_ltv_percentage: Option<f64>,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_staff_scheme: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_priority_sector: bool,
    pub processing_fee_charge_code: String,
    pub prepayment_charge_code: String,
    #[validate(length(min = 1, message = "Effective from date is required"))]
    pub effective_from: String,
    pub effective_to: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_active: bool,
}

impl LoanSchemeForm {
    /// Rate charged to the borrower: the fixed rate, or benchmark plus spread.
    pub fn effective_rate(&self) -> Option<f64> {
        match self.interest_type.as_str() {
            "FIXED" => self.fixed_rate,
            "FLOATING" => Some(self.benchmark_rate? + self.spread?),
            _ => None,
        }
    }
}

impl FormSchema for LoanSchemeForm {
    const KIND: FormKind = FormKind::LoanScheme;
    type Dto = LoanSchemeDto;

    fn conditional_rules() -> Vec<ConditionalRule> {
        vec![
            format_rule("interestType", INTEREST_TYPES, "Interest type must be FIXED or FLOATING"),
            required_when_equals(
                "fixedRate",
                "interestType",
                "FIXED",
                "Interest rate is required for fixed rate schemes",
            ),
            required_when_equals(
                "benchmarkRate",
                "interestType",
                "FLOATING",
                "Benchmark rate is required for floating rate schemes",
            ),
            required_when_equals(
                "spread",
                "interestType",
                "FLOATING",
                "Spread is required for floating rate schemes",
            ),
            required_when_true(
                "collateralType",
                "isSecured",
                "Collateral type is required for secured schemes",
            ),
            required_when_true(
                "maxLtvPercentage",
                "isSecured",
                "Maximum LTV is required for secured schemes",
            ),
            format_rule(
                "processingFeeChargeCode",
                CODE_PATTERN,
                "Processing fee charge code may only contain A-Z, 0-9, _ and -",
            ),
            format_rule(
                "prepaymentChargeCode",
                CODE_PATTERN,
                "Prepayment charge code may only contain A-Z, 0-9, _ and -",
            ),
        ]
    }

    fn cross_field(&self, _ctx: &FormContext, errors: &mut FieldErrors) {
        check_order(
            errors,
            "maxAmount",
            Some(self.min_amount),
            Some(self.max_amount),
            "Maximum loan amount cannot be less than the minimum loan amount",
        );
        check_order(
            errors,
            "maxTenureMonths",
            Some(self.min_tenure_months),
            Some(self.max_tenure_months),
            "Maximum tenure cannot be less than the minimum tenure",
        );

        if self.interest_type == "FLOATING"
            && let Some(rate) = self.effective_rate()
            && !(0.0..=MAX_INTEREST_RATE).contains(&rate)
        {
            errors.insert(
                "spread",
                format!("Benchmark plus spread must be between 0 and {MAX_INTEREST_RATE}"),
            );
        }

        if self.is_staff_scheme && self.is_priority_sector {
            errors.insert(
                "isPrioritySector",
                "A scheme cannot be both a staff scheme and a priority sector scheme",
            );
        }

        let from = check_date(errors, "effectiveFrom", "Effective from date", &self.effective_from);
        let to = check_date(errors, "effectiveTo", "Effective to date", &self.effective_to);
        check_order(
            errors,
            "effectiveTo",
            from,
            to,
            "Effective to date cannot be before the effective from date",
        );
    }

    fn normalize(self) -> Self {
        let interest_type = upper(&self.interest_type);
        let fixed = interest_type == "FIXED";
        let floating = interest_type == "FLOATING";
        Self {
            scheme_code: upper(&self.scheme_code),
            scheme_name: trimmed(&self.scheme_name),
            product_code: upper(&self.product_code),
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            min_tenure_months: self.min_tenure_months,
            max_tenure_months: self.max_tenure_months,
            interest_type,
            fixed_rate: self.fixed_rate.filter(|_| !floating),
            benchmark_rate: self.benchmark_rate.filter(|_| !fixed),
            spread: self.spread.filter(|_| !fixed),
            is_secured: self.is_secured,
            collateral_type: if self.is_secured {
                upper(&self.collateral_type)
            } else {
                String::new()
            },
            max_ltv_percentage: self.max_ltv_percentage.filter(|_| self.is_secured),
            is_staff_scheme: self.is_staff_scheme,
            is_priority_sector: self.is_priority_sector,
            processing_fee_charge_code: upper(&self.processing_fee_charge_code),
            prepayment_charge_code: upper(&self.prepayment_charge_code),
            effective_from: trimmed(&self.effective_from),
            effective_to: trimmed(&self.effective_to),
            is_active: self.is_active,
        }
    }

    fn to_dto(&self) -> LoanSchemeDto {
        LoanSchemeDto {
            scheme_code: self.scheme_code.clone(),
            scheme_name: self.scheme_name.clone(),
            product_code: self.product_code.clone(),
            min_loan_amt: self.min_amount,
            max_loan_amt: self.max_amount,
            min_tenure_months: self.min_tenure_months,
            max_tenure_months: self.max_tenure_months,
            interest_type: self.interest_type.clone(),
            fixed_roi: self.fixed_rate,
            benchmark_rate: self.benchmark_rate,
            spread_rate: self.spread,
            effective_roi: self.effective_rate(),
            secured_flag: yes_no(self.is_secured),
            collateral_type: self.collateral_type.clone(),
            max_ltv_pct: self.max_ltv_percentage,
            staff_flag: yes_no(self.is_staff_scheme),
            priority_sector_flag: yes_no(self.is_priority_sector),
            processing_fee_code: self.processing_fee_charge_code.clone(),
            prepayment_charge_code: self.prepayment_charge_code.clone(),
            eff_from_date: self.effective_from.clone(),
            eff_to_date: self.effective_to.clone(),
            active_flag: yes_no(self.is_active),
        }
    }

    fn from_dto(dto: LoanSchemeDto) -> Self {
        Self {
            scheme_code: dto.scheme_code,
            scheme_name: dto.scheme_name,
            product_code: dto.product_code,
            min_amount: dto.min_loan_amt,
            max_amount: dto.max_loan_amt,
            min_tenure_months: dto.min_tenure_months,
            max_tenure_months: dto.max_tenure_months,
            interest_type: dto.interest_type,
            fixed_rate: dto.fixed_roi,
            benchmark_rate: dto.benchmark_rate,
            spread: dto.spread_rate,
            is_secured: is_yes(&dto.secured_flag),
            collateral_type: dto.collateral_type,
            max_ltv_percentage: dto.max_ltv_pct,
            is_staff_scheme: is_yes(&dto.staff_flag),
            is_priority_sector: is_yes(&dto.priority_sector_flag),
            processing_fee_charge_code: dto.processing_fee_code,
            prepayment_charge_code: dto.prepayment_charge_code,
            effective_from: dto.eff_from_date,
            effective_to: dto.eff_to_date,
            is_active: is_yes(&dto.active_flag),
        }
    }

    fn reference(&self) -> String {
        self.scheme_code.clone()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::forms::test_support::ctx;
    use crate::forms::{FormError, validate_draft};

    fn draft() -> Value {
        json!({
            "schemeCode": "hl-salaried",
            "schemeName": "Home loan for salaried",
            "productCode": "home",
            "minAmount": "5,00,000",
            "maxAmount": "1,00,00,000",
            "minTenureMonths": 12,
            "maxTenureMonths": "360",
            "interestType": "floating",
            "fixedRate": 9,
            "benchmarkRate": 6.5,
            "spread": "2.25",
            "isSecured": true,
            "collateralType": "property",
            "maxLtvPercentage": 80,
            "processingFeeChargeCode": "pf_home",
            "effectiveFrom": "2025-04-01",
            "isActive": "Y"
        })
    }

    fn errors_for(draft: Value) -> FieldErrors {
        match validate_draft::<LoanSchemeForm>(draft, &ctx()) {
            Err(FormError::Validation(errors)) => errors,
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn floating_scheme_computes_effective_rate() {
        let form: LoanSchemeForm = validate_draft(draft(), &ctx()).unwrap();
        assert_eq!(form.fixed_rate, None);
        assert_eq!(form.effective_rate(), Some(8.75));
        let dto = form.to_dto();
        assert_eq!(dto.effective_roi, Some(8.75));
        assert_eq!(dto.secured_flag, "Y");
        assert_eq!(dto.processing_fee_code, "PF_HOME");
    }

    #[test]
    fn fixed_scheme_needs_rate() {
        let mut bad = draft();
        bad["interestType"] = json!("FIXED");
        bad["fixedRate"] = json!("");
        assert_eq!(
            errors_for(bad).get("fixedRate"),
            Some("Interest rate is required for fixed rate schemes")
        );
    }

    #[test]
    fn ranges_must_be_ordered() {
        let mut bad = draft();
        bad["maxAmount"] = json!(100000);
        bad["maxTenureMonths"] = json!(6);
        let errors = errors_for(bad);
        assert!(errors.contains("maxAmount"));
        assert_eq!(
            errors.get("maxTenureMonths"),
            Some("Maximum tenure cannot be less than the minimum tenure")
        );
    }

    #[test]
    fn staff_and_priority_sector_are_exclusive() {
        let mut bad = draft();
        bad["isStaffScheme"] = json!(true);
        bad["isPrioritySector"] = json!(true);
        assert!(errors_for(bad).contains("isPrioritySector"));
    }

    #[test]
    fn negative_floating_rate_is_rejected() {
        let mut bad = draft();
        bad["benchmarkRate"] = json!(1);
        bad["spread"] = json!(-4);
        assert_eq!(
            errors_for(bad).get("spread"),
            Some("Benchmark plus spread must be between 0 and 36")
        );
    }

    #[test]
    fn unsecured_scheme_drops_collateral() {
        let mut draft = draft();
        draft["isSecured"] = json!(false);
        let form: LoanSchemeForm = validate_draft(draft, &ctx()).unwrap();
        assert!(form.collateral_type.is_empty());
        assert_eq!(form.max_ltv_percentage, None);
    }
}
