//! Account nomination with up to three nominees sharing the balance.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::submission::FormKind;
use crate::domain::types::{MOBILE_PATTERN, NAME_RE, normalize_mobile};
use crate::dto::nominee::{NomineeDetailDto, NomineeDto};
use crate::forms::{
    ADULT_AGE, FormContext, FormSchema, age_on, check_date, check_not_future, format_rule,
    is_yes, lenient, person_name, required_when_true, trimmed, upper, yes_no,
};
use crate::validation::FieldErrors;
use crate::validation::rules::{ConditionalRule, apply_rules};

pub const MAX_NOMINEES: usize = 3;
pub const TOTAL_SHARE: f64 = 100.0;
const SHARE_TOLERANCE: f64 = 0.01;

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NomineeEntry {
    #[validate(
        length(min = 1, message = "Nominee name is required"),
        regex(path = *NAME_RE, message = "Nominee name may only contain letters")
    )]
    pub name: String,
    #[validate(length(min = 1, message = "Relationship is required"))]
    pub relationship: String,
    pub date_of_birth: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_minor: bool,
    pub guardian_name: String,
    pub guardian_relation: String,
    #[serde(deserialize_with = "lenient::number")]
    #[validate(range(min = 0.0, max = 100.0, message = "Share must be between 0 and 100"))]
    pub share_percentage: f64,
    pub mobile_number: String,
    pub address: String,
}

impl NomineeEntry {
    /// Rules evaluated against each nominee on its own.
    pub fn rules() -> Vec<ConditionalRule> {
        vec![
            required_when_true(
                "guardianName",
                "isMinor",
                "Guardian name is required for a minor nominee",
            ),
            required_when_true(
                "guardianRelation",
                "isMinor",
                "Guardian relation is required for a minor nominee",
            ),
            required_when_true(
                "dateOfBirth",
                "isMinor",
                "Date of birth is required for a minor nominee",
            ),
            format_rule(
                "mobileNumber",
                MOBILE_PATTERN,
                "Mobile number must be a valid 10 digit number",
            ),
        ]
    }

    fn normalize(self) -> Self {
        Self {
            name: person_name(&self.name),
            relationship: upper(&self.relationship),
            date_of_birth: trimmed(&self.date_of_birth),
            is_minor: self.is_minor,
            guardian_name: if self.is_minor {
                person_name(&self.guardian_name)
            } else {
                String::new()
            },
            guardian_relation: if self.is_minor {
                upper(&self.guardian_relation)
            } else {
                String::new()
            },
            share_percentage: self.share_percentage,
            mobile_number: normalize_mobile(&self.mobile_number)
                .unwrap_or_else(|_| trimmed(&self.mobile_number)),
            address: trimmed(&self.address),
        }
    }

    fn check(&self, path: &str, ctx: &FormContext, errors: &mut FieldErrors) {
        match serde_json::to_value(self) {
            Ok(scope) => apply_rules(&Self::rules(), &scope, path, errors),
            Err(err) => log::error!("Failed to serialize nominee for rules: {err}"),
        }

        let dob_field = format!("{path}.dateOfBirth");
        let dob = check_date(errors, &dob_field, "Date of birth", &self.date_of_birth);
        check_not_future(errors, &dob_field, "Date of birth", dob, ctx.today);
        if let Some(dob) = dob.filter(|dob| *dob <= ctx.today)
            && age_on(dob, ctx.today) < ADULT_AGE
            && !self.is_minor
        {
            errors.insert(
                format!("{path}.isMinor"),
                "Nominee is under 18 and must be marked as a minor",
            );
        }
    }
}

impl From<&NomineeEntry> for NomineeDetailDto {
    fn from(entry: &NomineeEntry) -> Self {
        Self {
            nominee_name: entry.name.clone(),
            relation_code: entry.relationship.clone(),
            dob: entry.date_of_birth.clone(),
            minor_flag: yes_no(entry.is_minor),
            guardian_name: entry.guardian_name.clone(),
            guardian_relation: entry.guardian_relation.clone(),
            share_pct: entry.share_percentage,
            mobile_no: entry.mobile_number.clone(),
            address_line: entry.address.clone(),
        }
    }
}

impl From<NomineeDetailDto> for NomineeEntry {
    fn from(dto: NomineeDetailDto) -> Self {
        Self {
            name: dto.nominee_name,
            relationship: dto.relation_code,
            date_of_birth: dto.dob,
            is_minor: is_yes(&dto.minor_flag),
            guardian_name: dto.guardian_name,
            guardian_relation: dto.guardian_relation,
            share_percentage: dto.share_pct,
            mobile_number: dto.mobile_no,
            address: dto.address_line,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NomineeForm {
    #[validate(length(min = 1, message = "Customer ID is required"))]
    pub customer_id: String,
    #[validate(length(min = 1, message = "Account number is required"))]
    pub account_number: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub nomination_opted: bool,
    #[validate(nested)]
    pub nominees: Vec<NomineeEntry>,
}

impl FormSchema for NomineeForm {
    const KIND: FormKind = FormKind::Nominee;
    type Dto = NomineeDto;

    fn conditional_rules() -> Vec<ConditionalRule> {
        vec![required_when_true(
            "nominees",
            "nominationOpted",
            "At least one nominee is required",
        )]
    }

    fn cross_field(&self, ctx: &FormContext, errors: &mut FieldErrors) {
        if !self.nomination_opted {
            return;
        }
        if self.nominees.len() > MAX_NOMINEES {
            errors.insert(
                "nominees",
                format!("No more than {MAX_NOMINEES} nominees are allowed"),
            );
        }

        for (index, nominee) in self.nominees.iter().enumerate() {
            nominee.check(&format!("nominees[{index}]"), ctx, errors);
        }

        if !self.nominees.is_empty() {
            let total: f64 = self.nominees.iter().map(|n| n.share_percentage).sum();
            if (total - TOTAL_SHARE).abs() > SHARE_TOLERANCE {
                errors.insert(
                    "nominees",
                    format!("Nominee shares must add up to 100% (currently {total}%)"),
                );
            }
        }
    }

    fn normalize(self) -> Self {
        let nominees = if self.nomination_opted {
            self.nominees.into_iter().map(NomineeEntry::normalize).collect()
        } else {
            Vec::new()
        };
        Self {
            customer_id: upper(&self.customer_id),
            account_number: trimmed(&self.account_number),
            nomination_opted: self.nomination_opted,
            nominees,
        }
    }

    fn to_dto(&self) -> NomineeDto {
        NomineeDto {
            cust_id: self.customer_id.clone(),
            acct_no: self.account_number.clone(),
            nomination_flag: yes_no(self.nomination_opted),
            nominees: self.nominees.iter().map(NomineeDetailDto::from).collect(),
        }
    }

    fn from_dto(dto: NomineeDto) -> Self {
        Self {
            customer_id: dto.cust_id,
            account_number: dto.acct_no,
            nomination_opted: is_yes(&dto.nomination_flag),
            nominees: dto.nominees.into_iter().map(NomineeEntry::from).collect(),
        }
    }

    fn reference(&self) -> String {
        self.account_number.clone()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::forms::test_support::ctx;
    use crate::forms::{FormError, validate_draft, validate_field};

    fn draft() -> Value {
        json!({
            "customerId": "C1001",
            "accountNumber": "001234567890",
            "nominationOpted": true,
            "nominees": [
                { "name": "asha", "relationship": "spouse", "sharePercentage": "60" },
                {
                    "name": "rohan",
                    "relationship": "son",
                    "dateOfBirth": "2015-03-01",
                    "isMinor": true,
                    "guardianName": "asha",
                    "guardianRelation": "mother",
                    "sharePercentage": 40
                }
            ]
        })
    }

    fn errors_for(draft: Value) -> FieldErrors {
        match validate_draft::<NomineeForm>(draft, &ctx()) {
            Err(FormError::Validation(errors)) => errors,
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn valid_nomination() {
        let form: NomineeForm = validate_draft(draft(), &ctx()).unwrap();
        assert_eq!(form.nominees[1].guardian_name, "ASHA");
        let dto = form.to_dto();
        assert_eq!(dto.nominees[1].minor_flag, "Y");
        assert_eq!(dto.nominees[0].share_pct, 60.0);
    }

    #[test]
    fn shares_must_total_100() {
        let mut bad = draft();
        bad["nominees"][0]["sharePercentage"] = json!(50);
        assert_eq!(
            errors_for(bad).get("nominees"),
            Some("Nominee shares must add up to 100% (currently 90%)")
        );
    }

    #[test]
    fn share_out_of_range_is_reported_per_nominee() {
        let mut bad = draft();
        bad["nominees"][0]["sharePercentage"] = json!(160);
        bad["nominees"][1]["sharePercentage"] = json!(-60);
        let errors = errors_for(bad);
        assert_eq!(
            errors.get("nominees[0].sharePercentage"),
            Some("Share must be between 0 and 100")
        );
        assert!(errors.contains("nominees[1].sharePercentage"));
    }

    #[test]
    fn minor_nominee_needs_guardian() {
        let mut bad = draft();
        bad["nominees"][1]["guardianName"] = json!("");
        assert_eq!(
            errors_for(bad).get("nominees[1].guardianName"),
            Some("Guardian name is required for a minor nominee")
        );
    }

    #[test]
    fn under_age_nominee_must_be_flagged_minor() {
        let mut bad = draft();
        bad["nominees"][1]["isMinor"] = json!(false);
        assert_eq!(
            errors_for(bad).get("nominees[1].isMinor"),
            Some("Nominee is under 18 and must be marked as a minor")
        );
    }

    #[test]
    fn at_most_three_nominees() {
        let mut bad = draft();
        bad["nominees"] = json!([
            { "name": "a", "relationship": "x", "sharePercentage": 25 },
            { "name": "b", "relationship": "x", "sharePercentage": 25 },
            { "name": "c", "relationship": "x", "sharePercentage": 25 },
            { "name": "d", "relationship": "x", "sharePercentage": 25 }
        ]);
        assert_eq!(
            errors_for(bad).get("nominees"),
            Some("No more than 3 nominees are allowed")
        );
    }

    #[test]
    fn opting_out_clears_nominees() {
        let mut draft = draft();
        draft["nominationOpted"] = json!(false);
        draft["nominees"][0]["sharePercentage"] = json!(10);
        let form: NomineeForm = validate_draft(draft, &ctx()).unwrap();
        assert!(form.nominees.is_empty());
        assert_eq!(form.to_dto().nomination_flag, "N");
    }

    #[test]
    fn opting_in_requires_a_nominee() {
        let mut bad = draft();
        bad["nominees"] = json!([]);
        assert_eq!(errors_for(bad).get("nominees"), Some("At least one nominee is required"));
    }

    #[test]
    fn single_nominee_field_validation() {
        let message = validate_field::<NomineeForm>(
            &draft(),
            "nominees[1].guardianRelation",
            json!(""),
            &ctx(),
        )
        .unwrap();
        assert_eq!(
            message.as_deref(),
            Some("Guardian relation is required for a minor nominee")
        );
    }

    #[test]
    fn unreadable_share_is_keyed_by_nominee() {
        let mut bad = draft();
        bad["nominees"][1]["sharePercentage"] = json!("forty");
        let errors = errors_for(bad);
        assert_eq!(
            errors.get("nominees[1].sharePercentage"),
            Some("Share percentage must be a number")
        );
        assert!(!errors.contains("nominees[0].sharePercentage"));
    }
}
