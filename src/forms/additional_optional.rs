//! Optional profile details. `moreDetails` and each entry of
//! `additionalReferences` are checked against descriptor lists supplied by
//! configuration at runtime.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::submission::FormKind;
use crate::dto::additional_optional::AdditionalOptionalDto;
use crate::forms::{
    FormContext, FormSchema, is_yes, lenient, required_when_true, sanitize, trimmed, upper,
    yes_no,
};
use crate::validation::FieldErrors;
use crate::validation::rules::{ConditionalRule, Requirement};

pub const PEP_DETAILS_MAX: usize = 1000;
pub const MAX_REFERENCES: usize = 5;

fn clean_section(section: BTreeMap<String, String>) -> BTreeMap<String, String> {
    section
        .into_iter()
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .collect()
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalOptionalForm {
    #[validate(length(min = 1, message = "Customer ID is required"))]
    pub customer_id: String,
    #[serde(deserialize_with = "lenient::optional_number")]
    #[validate(range(min = 0.0, message = "Annual income cannot be negative"))]
    pub annual_income: Option<f64>,
    #[serde(deserialize_with = "lenient::optional_number")]
    #[validate(range(min = 0.0, message = "Net worth cannot be negative"))]
    pub net_worth: Option<f64>,
    pub income_source: String,
    pub education: String,
    pub employer_name: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_politically_exposed: bool,
    pub pep_details: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub has_foreign_tax_residency: bool,
    pub tax_residency_country: String,
    pub foreign_tin: String,
    #[serde(deserialize_with = "lenient::text_map")]
    pub more_details: BTreeMap<String, String>,
    #[serde(deserialize_with = "lenient::text_maps")]
    pub additional_references: Vec<BTreeMap<String, String>>,
}

impl FormSchema for AdditionalOptionalForm {
    const KIND: FormKind = FormKind::AdditionalOptional;
    type Dto = AdditionalOptionalDto;

    fn conditional_rules() -> Vec<ConditionalRule> {
        vec![
            required_when_true(
                "pepDetails",
                "isPoliticallyExposed",
                "PEP details are required for politically exposed persons",
            ),
            ConditionalRule::always(
                "pepDetails",
                Requirement::MaxLength {
                    max: PEP_DETAILS_MAX,
                },
                format!("PEP details must be at most {PEP_DETAILS_MAX} characters"),
            ),
            required_when_true(
                "taxResidencyCountry",
                "hasForeignTaxResidency",
                "Country of tax residency is required",
            ),
            required_when_true(
                "foreignTin",
                "hasForeignTaxResidency",
                "Foreign tax identification number is required",
            ),
        ]
    }

    fn cross_field(&self, ctx: &FormContext, errors: &mut FieldErrors) {
        ctx.more_details
            .validate(&self.more_details, "moreDetails", errors);

        if self.additional_references.len() > MAX_REFERENCES {
            errors.insert(
                "additionalReferences",
                format!("No more than {MAX_REFERENCES} references are allowed"),
            );
        }
        for (index, reference) in self.additional_references.iter().enumerate() {
            ctx.additional_references.validate(
                reference,
                &format!("additionalReferences[{index}]"),
                errors,
            );
        }
    }

    fn normalize(self) -> Self {
        let pep = self.is_politically_exposed;
        let foreign = self.has_foreign_tax_residency;
        Self {
            customer_id: upper(&self.customer_id),
            annual_income: self.annual_income,
            net_worth: self.net_worth,
            income_source: upper(&self.income_source),
            education: upper(&self.education),
            employer_name: trimmed(&self.employer_name),
            is_politically_exposed: pep,
            pep_details: if pep {
                sanitize(&self.pep_details)
            } else {
                String::new()
            },
            has_foreign_tax_residency: foreign,
            tax_residency_country: if foreign {
                upper(&self.tax_residency_country)
            } else {
                String::new()
            },
            foreign_tin: if foreign {
                upper(&self.foreign_tin)
            } else {
                String::new()
            },
            more_details: clean_section(self.more_details),
            additional_references: self
                .additional_references
                .into_iter()
                .map(clean_section)
                .filter(|reference| !reference.is_empty())
                .collect(),
        }
    }

    fn to_dto(&self) -> AdditionalOptionalDto {
        AdditionalOptionalDto {
            cust_id: self.customer_id.clone(),
            annual_income: self.annual_income,
            net_worth: self.net_worth,
            income_source: self.income_source.clone(),
            education: self.education.clone(),
            employer_name: self.employer_name.clone(),
            pep_flag: yes_no(self.is_politically_exposed),
            pep_details: self.pep_details.clone(),
            foreign_tax_flag: yes_no(self.has_foreign_tax_residency),
            tax_residency_country: self.tax_residency_country.clone(),
            foreign_tin: self.foreign_tin.clone(),
            more_details: self.more_details.clone(),
            additional_references: self.additional_references.clone(),
        }
    }

    fn from_dto(dto: AdditionalOptionalDto) -> Self {
        Self {
            customer_id: dto.cust_id,
            annual_income: dto.annual_income,
            net_worth: dto.net_worth,
            income_source: dto.income_source,
            education: dto.education,
            employer_name: dto.employer_name,
            is_politically_exposed: is_yes(&dto.pep_flag),
            pep_details: dto.pep_details,
            has_foreign_tax_residency: is_yes(&dto.foreign_tax_flag),
            tax_residency_country: dto.tax_residency_country,
            foreign_tin: dto.foreign_tin,
            more_details: dto.more_details,
            additional_references: dto.additional_references,
        }
    }

    fn reference(&self) -> String {
        self.customer_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::forms::test_support::today;
    use crate::forms::{FormError, validate_draft, validate_field};
    use crate::validation::dynamic::{CompiledSchema, FieldDescriptor};

    fn ctx() -> FormContext {
        let more: Vec<FieldDescriptor> = serde_json::from_value(json!([
            { "key": "employerAddress", "label": "Employer address", "mandatory": true },
            { "key": "yearsEmployed", "label": "Years employed", "kind": "number" }
        ]))
        .unwrap();
        let references: Vec<FieldDescriptor> = serde_json::from_value(json!([
            { "key": "name", "label": "Reference name", "mandatory": true },
            { "key": "mobile", "label": "Reference mobile", "kind": "phone", "mandatory": true }
        ]))
        .unwrap();
        FormContext::new(today()).with_dynamic_schemas(
            CompiledSchema::compile(&more),
            CompiledSchema::compile(&references),
        )
    }

    fn draft() -> Value {
        json!({
            "customerId": "c1001",
            "annualIncome": "9,00,000",
            "moreDetails": { "employerAddress": "Hinjewadi, Pune", "yearsEmployed": 4 },
            "additionalReferences": [
                { "name": "Sunil", "mobile": "9822012345" },
                { "name": " ", "mobile": "" }
            ]
        })
    }

    fn errors_for(draft: Value) -> FieldErrors {
        match validate_draft::<AdditionalOptionalForm>(draft, &ctx()) {
            Err(FormError::Validation(errors)) => errors,
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn dynamic_sections_pass_and_blank_references_drop() {
        let form: AdditionalOptionalForm = validate_draft(draft(), &ctx()).unwrap();
        assert_eq!(form.more_details["yearsEmployed"], "4");
        assert_eq!(form.additional_references.len(), 1);
        assert_eq!(form.annual_income, Some(900000.0));
    }

    #[test]
    fn dynamic_sections_report_prefixed_paths() {
        let mut bad = draft();
        bad["moreDetails"] = json!({ "yearsEmployed": "many" });
        bad["additionalReferences"] = json!([{ "name": "Sunil", "mobile": "12345" }]);
        let errors = errors_for(bad);
        assert_eq!(
            errors.get("moreDetails.employerAddress"),
            Some("Employer address is required")
        );
        assert!(errors.contains("moreDetails.yearsEmployed"));
        assert!(errors.contains("additionalReferences[0].mobile"));
    }

    #[test]
    fn pep_details_required_when_exposed() {
        let mut bad = draft();
        bad["isPoliticallyExposed"] = json!(true);
        assert_eq!(
            errors_for(bad).get("pepDetails"),
            Some("PEP details are required for politically exposed persons")
        );
    }

    #[test]
    fn foreign_tax_fields_cleared_when_not_applicable() {
        let mut draft = draft();
        draft["taxResidencyCountry"] = json!("US");
        let form: AdditionalOptionalForm = validate_draft(draft, &ctx()).unwrap();
        assert!(form.tax_residency_country.is_empty());
        assert_eq!(form.to_dto().foreign_tax_flag, "N");
    }

    #[test]
    fn without_descriptors_sections_are_free_form() {
        let form: AdditionalOptionalForm =
            validate_draft(json!({ "customerId": "C1", "moreDetails": { "x": "y" } }), &crate::forms::test_support::ctx())
                .unwrap();
        assert_eq!(form.more_details["x"], "y");
    }

    #[test]
    fn unreadable_income_is_a_field_error() {
        let mut bad = draft();
        bad["annualIncome"] = json!("ten");
        let errors = errors_for(bad);
        assert_eq!(errors.get("annualIncome"), Some("Annual income must be a number"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn unreadable_income_does_not_block_other_fields() {
        let draft = json!({ "customerId": "C1", "annualIncome": "ten" });

        let message = validate_field::<AdditionalOptionalForm>(
            &draft,
            "customerId",
            json!("C1"),
            &crate::forms::test_support::ctx(),
        )
        .unwrap();
        assert_eq!(message, None);

        let message = validate_field::<AdditionalOptionalForm>(
            &draft,
            "annualIncome",
            json!("12,0x"),
            &crate::forms::test_support::ctx(),
        )
        .unwrap();
        assert_eq!(message.as_deref(), Some("Annual income must be a number"));
    }
}
