use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::submission::FormKind;
use crate::domain::types::CODE_RE;
use crate::dto::charge_master::ChargeMasterDto;
use crate::forms::{
    FormContext, FormSchema, check_date, check_order, format_rule, is_yes, lenient,
    required_when_equals, required_when_true, trimmed, upper, yes_no,
};
use crate::validation::FieldErrors;
use crate::validation::rules::ConditionalRule;

pub const CHARGE_TYPES: &str = "^(FIXED|PERCENTAGE)$";
pub const FREQUENCIES: &str = "^(ONE_TIME|MONTHLY|QUARTERLY|HALF_YEARLY|ANNUALLY)$";
pub const MAX_GST_RATE: f64 = 28.0;

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChargeMasterForm {
    #[validate(
        length(min = 1, message = "Charge code is required"),
        regex(path = *CODE_RE, message = "Charge code may only contain A-Z, 0-9, _ and -")
    )]
    pub charge_code: String,
    #[validate(length(min = 1, max = 100, message = "Charge name is required (at most 100 characters)"))]
    pub charge_name: String,
    #[validate(length(min = 1, message = "Charge type is required"))]
    pub charge_type: String,
    #[serde(deserialize_with = "lenient::optional_number")]
    #[validate(range(exclusive_min = 0.0, message = "Fixed amount must be greater than zero"))]
    pub fixed_amount: Option<f64>,
    #[serde(deserialize_with = "lenient::optional_number")]
    #[validate(range(exclusive_min = 0.0, max = 100.0, message = "Percentage must be above 0 and at most 100"))]
    pub percentage: Option<f64>,
    #[serde(deserialize_with = "lenient::optional_number")]
    #[validate(range(min = 0.0, message = "Minimum charge cannot be negative"))]
    pub min_amount: Option<f64>,
    #[serde(deserialize_with = "lenient::optional_number")]
    #[validate(range(min = 0.0, message = "Maximum charge cannot be negative"))]
    pub max_amount: Option<f64>,
    #[serde(deserialize_with = "lenient::flag")]
    pub gst_applicable: bool,
    #[serde(deserialize_with = "lenient::optional_number")]
    #[validate(range(min = 0.0, max = MAX_GST_RATE, message = "GST rate must be between 0 and 28"))]
    pub gst_rate: Option<f64>,
    #[validate(length(min = 1, message = "Frequency is required"))]
    pub frequency: String,
    #[validate(length(min = 1, message = "Effective from date is required"))]
    pub effective_from: String,
    pub effective_to: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_active: bool,
    pub gl_account_code: String,
}

impl FormSchema for ChargeMasterForm {
    const KIND: FormKind = FormKind::ChargeMaster;
    type Dto = ChargeMasterDto;

    fn conditional_rules() -> Vec<ConditionalRule> {
        vec![
            format_rule("chargeType", CHARGE_TYPES, "Charge type must be FIXED or PERCENTAGE"),
            format_rule(
                "frequency",
                FREQUENCIES,
                "Frequency must be ONE_TIME, MONTHLY, QUARTERLY, HALF_YEARLY or ANNUALLY",
            ),
            required_when_equals(
                "fixedAmount",
                "chargeType",
                "FIXED",
                "Fixed amount is required for fixed charges",
            ),
            required_when_equals(
                "percentage",
                "chargeType",
                "PERCENTAGE",
                "Percentage is required for percentage charges",
            ),
            required_when_true(
                "gstRate",
                "gstApplicable",
                "GST rate is required when GST is applicable",
            ),
        ]
    }

    fn cross_field(&self, _ctx: &FormContext, errors: &mut FieldErrors) {
        check_order(
            errors,
            "maxAmount",
            self.min_amount,
            self.max_amount,
            "Maximum charge cannot be less than the minimum charge",
        );

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
        let charge_type = upper(&self.charge_type);
        Self {
            charge_code: upper(&self.charge_code),
            charge_name: trimmed(&self.charge_name),
            fixed_amount: self.fixed_amount.filter(|_| charge_type != "PERCENTAGE"),
            percentage: self.percentage.filter(|_| charge_type != "FIXED"),
            charge_type,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            gst_applicable: self.gst_applicable,
            gst_rate: self.gst_rate.filter(|_| self.gst_applicable),
            frequency: upper(&self.frequency).replace([' ', '-'], "_"),
            effective_from: trimmed(&self.effective_from),
            effective_to: trimmed(&self.effective_to),
            is_active: self.is_active,
            gl_account_code: upper(&self.gl_account_code),
        }
    }

    fn to_dto(&self) -> ChargeMasterDto {
        ChargeMasterDto {
            charge_code: self.charge_code.clone(),
            charge_name: self.charge_name.clone(),
            charge_type: self.charge_type.clone(),
            fixed_amt: self.fixed_amount,
            charge_pct: self.percentage,
            min_amt: self.min_amount,
            max_amt: self.max_amount,
            gst_flag: yes_no(self.gst_applicable),
            gst_rate: self.gst_rate,
            frequency: self.frequency.clone(),
            eff_from_date: self.effective_from.clone(),
            eff_to_date: self.effective_to.clone(),
            active_flag: yes_no(self.is_active),
            gl_code: self.gl_account_code.clone(),
        }
    }

    fn from_dto(dto: ChargeMasterDto) -> Self {
        Self {
            charge_code: dto.charge_code,
            charge_name: dto.charge_name,
            charge_type: dto.charge_type,
            fixed_amount: dto.fixed_amt,
            percentage: dto.charge_pct,
            min_amount: dto.min_amt,
            max_amount: dto.max_amt,
            gst_applicable: is_yes(&dto.gst_flag),
            gst_rate: dto.gst_rate,
            frequency: dto.frequency,
            effective_from: dto.eff_from_date,
            effective_to: dto.eff_to_date,
            is_active: is_yes(&dto.active_flag),
            gl_account_code: dto.gl_code,
        }
    }

    fn reference(&self) -> String {
        self.charge_code.clone()
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
            "chargeCode": "chq_book",
            "chargeName": "Cheque book issue",
            "chargeType": "percentage",
            "fixedAmount": "50",
            "percentage": "1.5",
            "minAmount": 25,
            "maxAmount": 500,
            "gstApplicable": "Y",
            "gstRate": 18,
            "frequency": "one time",
            "effectiveFrom": "2025-04-01",
            "isActive": true
        })
    }

    fn errors_for(draft: Value) -> FieldErrors {
        match validate_draft::<ChargeMasterForm>(draft, &ctx()) {
            Err(FormError::Validation(errors)) => errors,
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn percentage_charge_drops_fixed_amount() {
        let form: ChargeMasterForm = validate_draft(draft(), &ctx()).unwrap();
        assert_eq!(form.charge_code, "CHQ_BOOK");
        assert_eq!(form.fixed_amount, None);
        assert_eq!(form.percentage, Some(1.5));
        assert_eq!(form.frequency, "ONE_TIME");
        let dto = form.to_dto();
        assert_eq!(dto.gst_flag, "Y");
        assert_eq!(dto.charge_pct, Some(1.5));
    }

    #[test]
    fn fixed_charge_needs_amount() {
        let mut bad = draft();
        bad["chargeType"] = json!("FIXED");
        bad["fixedAmount"] = json!("");
        assert_eq!(
            errors_for(bad).get("fixedAmount"),
            Some("Fixed amount is required for fixed charges")
        );
    }

    #[test]
    fn gst_rate_required_and_bounded() {
        let mut missing = draft();
        missing["gstRate"] = json!(null);
        assert!(errors_for(missing).contains("gstRate"));

        let mut high = draft();
        high["gstRate"] = json!(40);
        assert_eq!(
            errors_for(high).get("gstRate"),
            Some("GST rate must be between 0 and 28")
        );
    }

    #[test]
    fn min_not_above_max_and_dates_ordered() {
        let mut bad = draft();
        bad["minAmount"] = json!(600);
        bad["effectiveTo"] = json!("2025-03-31");
        let errors = errors_for(bad);
        assert_eq!(
            errors.get("maxAmount"),
            Some("Maximum charge cannot be less than the minimum charge")
        );
        assert_eq!(
            errors.get("effectiveTo"),
            Some("Effective to date cannot be before the effective from date")
        );
    }
}
