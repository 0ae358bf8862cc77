use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::submission::FormKind;
use crate::domain::types::{MOBILE_RE, NAME_RE, normalize_mobile};
use crate::dto::lead::LeadDto;
use crate::forms::{
    FormContext, FormSchema, check_date, format_rule, is_yes, lenient, person_name,
    required_when_equals, sanitize, trimmed, upper, yes_no,
};
use crate::validation::FieldErrors;
use crate::validation::rules::{ConditionalRule, Requirement};

pub const LEAD_SOURCES: &str = "^(WALK_IN|REFERRAL|CAMPAIGN|WEBSITE|CALL_CENTER)$";

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadForm {
    #[validate(
        length(min = 1, message = "Lead name is required"),
        regex(path = *NAME_RE, message = "Lead name may only contain letters")
    )]
    pub lead_name: String,
    #[validate(
        length(min = 1, message = "Mobile number is required"),
        regex(path = *MOBILE_RE, message = "Mobile number must be a valid 10 digit number")
    )]
    pub mobile_number: String,
    pub email: String,
    #[validate(length(min = 1, message = "Product of interest is required"))]
    pub product_interest: String,
    #[validate(length(min = 1, message = "Lead source is required"))]
    pub lead_source: String,
    pub referred_by: String,
    pub referrer_customer_id: String,
    pub campaign_code: String,
    #[validate(length(min = 1, message = "Branch is required"))]
    pub branch_code: String,
    pub assigned_to: String,
    #[serde(deserialize_with = "lenient::optional_number")]
    #[validate(range(min = 0.0, message = "Expected amount cannot be negative"))]
    pub expected_amount: Option<f64>,
    pub follow_up_date: String,
    pub remarks: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub consent_given: bool,
}

impl FormSchema for LeadForm {
    const KIND: FormKind = FormKind::Lead;
    type Dto = LeadDto;

    fn conditional_rules() -> Vec<ConditionalRule> {
        vec![
            format_rule(
                "leadSource",
                LEAD_SOURCES,
                "Lead source must be WALK_IN, REFERRAL, CAMPAIGN, WEBSITE or CALL_CENTER",
            ),
            required_when_equals(
                "referredBy",
                "leadSource",
                "REFERRAL",
                "Referred by is required for referral leads",
            ),
            required_when_equals(
                "campaignCode",
                "leadSource",
                "CAMPAIGN",
                "Campaign code is required for campaign leads",
            ),
            ConditionalRule::always("email", Requirement::Email, "Email address is invalid"),
            ConditionalRule::always(
                "consentGiven",
                Requirement::MustBeTrue,
                "Customer consent is required to record a lead",
            ),
        ]
    }

    fn cross_field(&self, ctx: &FormContext, errors: &mut FieldErrors) {
        let follow_up = check_date(errors, "followUpDate", "Follow-up date", &self.follow_up_date);
        if follow_up.is_some_and(|date| date < ctx.today) {
            errors.insert("followUpDate", "Follow-up date cannot be in the past");
        }
    }

    fn normalize(self) -> Self {
        let source = upper(&self.lead_source).replace([' ', '-'], "_");
        Self {
            lead_name: person_name(&self.lead_name),
            mobile_number: normalize_mobile(&self.mobile_number)
                .unwrap_or_else(|_| trimmed(&self.mobile_number)),
            email: self.email.trim().to_lowercase(),
            product_interest: upper(&self.product_interest),
            referred_by: if source == "REFERRAL" {
                person_name(&self.referred_by)
            } else {
                String::new()
            },
            referrer_customer_id: if source == "REFERRAL" {
                upper(&self.referrer_customer_id)
            } else {
                String::new()
            },
            campaign_code: if source == "CAMPAIGN" {
                upper(&self.campaign_code)
            } else {
                String::new()
            },
            lead_source: source,
            branch_code: upper(&self.branch_code),
            assigned_to: trimmed(&self.assigned_to),
            expected_amount: self.expected_amount,
            follow_up_date: trimmed(&self.follow_up_date),
            remarks: sanitize(&self.remarks),
            consent_given: self.consent_given,
        }
    }

    fn to_dto(&self) -> LeadDto {
        LeadDto {
            lead_name: self.lead_name.clone(),
            mobile_no: self.mobile_number.clone(),
            email_id: self.email.clone(),
            product_code: self.product_interest.clone(),
            source_code: self.lead_source.clone(),
            referred_by: self.referred_by.clone(),
            referrer_cust_id: self.referrer_customer_id.clone(),
            campaign_code: self.campaign_code.clone(),
            branch_code: self.branch_code.clone(),
            assigned_to: self.assigned_to.clone(),
            expected_amt: self.expected_amount,
            follow_up_date: self.follow_up_date.clone(),
            remarks: self.remarks.clone(),
            consent_flag: yes_no(self.consent_given),
        }
    }

    fn from_dto(dto: LeadDto) -> Self {
        Self {
            lead_name: dto.lead_name,
            mobile_number: dto.mobile_no,
            email: dto.email_id,
            product_interest: dto.product_code,
            lead_source: dto.source_code,
            referred_by: dto.referred_by,
            referrer_customer_id: dto.referrer_cust_id,
            campaign_code: dto.campaign_code,
            branch_code: dto.branch_code,
            assigned_to: dto.assigned_to,
            expected_amount: dto.expected_amt,
            follow_up_date: dto.follow_up_date,
            remarks: dto.remarks,
            consent_given: is_yes(&dto.consent_flag),
        }
    }

    fn reference(&self) -> String {
        self.mobile_number.clone()
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
            "leadName": "kiran rao",
            "mobileNumber": "9123456780",
            "productInterest": "home-loan",
            "leadSource": "walk in",
            "branchCode": "pune01",
            "expectedAmount": "25,00,000",
            "followUpDate": "2025-06-20",
            "consentGiven": true
        })
    }

    fn errors_for(draft: Value) -> FieldErrors {
        match validate_draft::<LeadForm>(draft, &ctx()) {
            Err(FormError::Validation(errors)) => errors,
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn walk_in_lead() {
        let form: LeadForm = validate_draft(draft(), &ctx()).unwrap();
        assert_eq!(form.lead_source, "WALK_IN");
        assert_eq!(form.expected_amount, Some(2_500_000.0));
        assert_eq!(form.to_dto().consent_flag, "Y");
    }

    #[test]
    fn referral_requires_referrer() {
        let mut bad = draft();
        bad["leadSource"] = json!("REFERRAL");
        assert_eq!(
            errors_for(bad.clone()).get("referredBy"),
            Some("Referred by is required for referral leads")
        );
        bad["referredBy"] = json!("anil");
        assert!(validate_draft::<LeadForm>(bad, &ctx()).is_ok());
    }

    #[test]
    fn campaign_requires_code_and_other_sources_clear_it() {
        let mut bad = draft();
        bad["leadSource"] = json!("CAMPAIGN");
        assert!(errors_for(bad).contains("campaignCode"));

        let mut walk_in = draft();
        walk_in["campaignCode"] = json!("DIWALI25");
        let form: LeadForm = validate_draft(walk_in, &ctx()).unwrap();
        assert!(form.campaign_code.is_empty());
    }

    #[test]
    fn follow_up_cannot_be_in_the_past() {
        let mut bad = draft();
        bad["followUpDate"] = json!("2025-06-14");
        assert_eq!(
            errors_for(bad).get("followUpDate"),
            Some("Follow-up date cannot be in the past")
        );
    }

    #[test]
    fn consent_is_mandatory() {
        let mut bad = draft();
        bad["consentGiven"] = json!("N");
        assert!(errors_for(bad).contains("consentGiven"));
    }
}
