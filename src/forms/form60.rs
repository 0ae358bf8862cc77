//! Form 60: declaration filed by customers who do not hold a PAN.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::submission::FormKind;
use crate::domain::types::{AadhaarNumber, NAME_RE};
use crate::dto::form60::Form60Dto;
use crate::forms::basic_info::AddressForm;
use crate::forms::{
    FormContext, FormSchema, check_date, check_not_future, check_order, format_rule, is_yes,
    lenient, person_name, required_when_true, trimmed, upper, yes_no,
};
use crate::validation::FieldErrors;
use crate::validation::rules::{Condition, ConditionalRule, Requirement};

pub const TRANSACTION_MODES: &str = "^(CASH|CHEQUE|CARD|DD|ONLINE|OTHERS)$";
pub const PAN_ACK_PATTERN: &str = r"^[0-9]{15}$";

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Form60Form {
    pub customer_id: String,
    #[validate(
        length(min = 1, message = "Declarant name is required"),
        regex(path = *NAME_RE, message = "Declarant name may only contain letters")
    )]
    pub declarant_name: String,
    #[validate(length(min = 1, message = "Date of birth is required"))]
    pub date_of_birth: String,
    pub father_name: String,
    #[validate(nested)]
    pub address: AddressForm,
    #[validate(length(min = 1, message = "Transaction date is required"))]
    pub transaction_date: String,
    #[serde(deserialize_with = "lenient::number")]
    #[validate(range(exclusive_min = 0.0, message = "Transaction amount must be greater than zero"))]
    pub transaction_amount: f64,
    #[validate(length(min = 1, message = "Mode of transaction is required"))]
    pub transaction_mode: String,
    pub aadhaar_number: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub applied_for_pan: bool,
    pub pan_acknowledgement_number: String,
    pub pan_application_date: String,
    #[serde(deserialize_with = "lenient::number")]
    #[validate(range(min = 0.0, message = "Agricultural income cannot be negative"))]
    pub agricultural_income: f64,
    #[serde(deserialize_with = "lenient::number")]
    #[validate(range(min = 0.0, message = "Other income cannot be negative"))]
    pub other_income: f64,
    pub document_type: String,
    pub document_identity_number: String,
    pub issuing_authority: String,
}

impl FormSchema for Form60Form {
    const KIND: FormKind = FormKind::Form60;
    type Dto = Form60Dto;

    fn conditional_rules() -> Vec<ConditionalRule> {
        vec![
            format_rule(
                "transactionMode",
                TRANSACTION_MODES,
                "Mode of transaction must be CASH, CHEQUE, CARD, DD, ONLINE or OTHERS",
            ),
            required_when_true(
                "panAcknowledgementNumber",
                "appliedForPan",
                "PAN acknowledgement number is required when PAN has been applied for",
            ),
            format_rule(
                "panAcknowledgementNumber",
                PAN_ACK_PATTERN,
                "PAN acknowledgement number must be 15 digits",
            ),
            required_when_true(
                "panApplicationDate",
                "appliedForPan",
                "PAN application date is required when PAN has been applied for",
            ),
            ConditionalRule::when(
                "documentIdentityNumber",
                "documentType",
                Condition::Present,
                Requirement::Required,
                "Document identity number is required when a document type is chosen",
            ),
        ]
    }

    fn cross_field(&self, ctx: &FormContext, errors: &mut FieldErrors) {
        let dob = check_date(errors, "dateOfBirth", "Date of birth", &self.date_of_birth);
        check_not_future(errors, "dateOfBirth", "Date of birth", dob, ctx.today);

        let transaction = check_date(
            errors,
            "transactionDate",
            "Transaction date",
            &self.transaction_date,
        );
        check_not_future(errors, "transactionDate", "Transaction date", transaction, ctx.today);
        check_order(
            errors,
            "transactionDate",
            dob,
            transaction,
            "Transaction date cannot be before the date of birth",
        );

        if self.applied_for_pan {
            let applied = check_date(
                errors,
                "panApplicationDate",
                "PAN application date",
                &self.pan_application_date,
            );
            check_not_future(
                errors,
                "panApplicationDate",
                "PAN application date",
                applied,
                ctx.today,
            );
        }

        if !self.aadhaar_number.is_empty() && AadhaarNumber::new(self.aadhaar_number.as_str()).is_err() {
            errors.insert("aadhaarNumber", "Aadhaar number must be 12 digits");
        }
    }

    fn normalize(self) -> Self {
        let applied = self.applied_for_pan;
        Self {
            customer_id: upper(&self.customer_id),
            declarant_name: person_name(&self.declarant_name),
            date_of_birth: trimmed(&self.date_of_birth),
            father_name: person_name(&self.father_name),
            address: self.address.normalize(),
            transaction_date: trimmed(&self.transaction_date),
            transaction_amount: self.transaction_amount,
            transaction_mode: upper(&self.transaction_mode),
            aadhaar_number: AadhaarNumber::new(self.aadhaar_number.as_str())
                .map(AadhaarNumber::into_inner)
                .unwrap_or_else(|_| trimmed(&self.aadhaar_number)),
            applied_for_pan: applied,
            pan_acknowledgement_number: if applied {
                trimmed(&self.pan_acknowledgement_number)
            } else {
                String::new()
            },
            pan_application_date: if applied {
                trimmed(&self.pan_application_date)
            } else {
                String::new()
            },
            agricultural_income: self.agricultural_income,
            other_income: self.other_income,
            document_type: upper(&self.document_type),
            document_identity_number: upper(&self.document_identity_number),
            issuing_authority: trimmed(&self.issuing_authority),
        }
    }

    fn to_dto(&self) -> Form60Dto {
        Form60Dto {
            cust_id: self.customer_id.clone(),
            declarant_name: self.declarant_name.clone(),
            dob: self.date_of_birth.clone(),
            father_name: self.father_name.clone(),
            address: (&self.address).into(),
            txn_date: self.transaction_date.clone(),
            txn_amount: self.transaction_amount,
            txn_mode: self.transaction_mode.clone(),
            aadhaar_no: self.aadhaar_number.clone(),
            pan_applied_flag: yes_no(self.applied_for_pan),
            pan_ack_no: self.pan_acknowledgement_number.clone(),
            pan_applied_date: self.pan_application_date.clone(),
            agri_income: self.agricultural_income,
            other_income: self.other_income,
            doc_type: self.document_type.clone(),
            doc_id_no: self.document_identity_number.clone(),
            doc_issuing_authority: self.issuing_authority.clone(),
        }
    }

    fn from_dto(dto: Form60Dto) -> Self {
        Self {
            customer_id: dto.cust_id,
            declarant_name: dto.declarant_name,
            date_of_birth: dto.dob,
            father_name: dto.father_name,
            address: dto.address.into(),
            transaction_date: dto.txn_date,
            transaction_amount: dto.txn_amount,
            transaction_mode: dto.txn_mode,
            aadhaar_number: dto.aadhaar_no,
            applied_for_pan: is_yes(&dto.pan_applied_flag),
            pan_acknowledgement_number: dto.pan_ack_no,
            pan_application_date: dto.pan_applied_date,
            agricultural_income: dto.agri_income,
            other_income: dto.other_income,
            document_type: dto.doc_type,
            document_identity_number: dto.doc_id_no,
            issuing_authority: dto.doc_issuing_authority,
        }
    }

    fn reference(&self) -> String {
        if self.customer_id.is_empty() {
            format!("{} {}", self.declarant_name, self.transaction_date)
        } else {
            self.customer_id.clone()
        }
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
            "declarantName": "meena devi",
            "dateOfBirth": "1975-08-01",
            "address": { "line1": "Ward 4", "city": "Nashik", "state": "MH", "pincode": "422001" },
            "transactionDate": "2025-06-01",
            "transactionAmount": "75,000",
            "transactionMode": "cash",
            "agriculturalIncome": "120000",
            "otherIncome": ""
        })
    }

    fn errors_for(draft: Value) -> FieldErrors {
        match validate_draft::<Form60Form>(draft, &ctx()) {
            Err(FormError::Validation(errors)) => errors,
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn accepts_formatted_amounts() {
        let form: Form60Form = validate_draft(draft(), &ctx()).unwrap();
        assert_eq!(form.transaction_amount, 75000.0);
        assert_eq!(form.transaction_mode, "CASH");
        assert_eq!(form.other_income, 0.0);
        assert_eq!(form.reference(), "MEENA DEVI 2025-06-01");
    }

    #[test]
    fn amount_must_be_positive_and_incomes_non_negative() {
        let mut bad = draft();
        bad["transactionAmount"] = json!(0);
        bad["otherIncome"] = json!(-5);
        let errors = errors_for(bad);
        assert_eq!(
            errors.get("transactionAmount"),
            Some("Transaction amount must be greater than zero")
        );
        assert_eq!(errors.get("otherIncome"), Some("Other income cannot be negative"));
    }

    #[test]
    fn pan_application_details_required_when_applied() {
        let mut bad = draft();
        bad["appliedForPan"] = json!(true);
        let errors = errors_for(bad);
        assert!(errors.contains("panAcknowledgementNumber"));
        assert!(errors.contains("panApplicationDate"));

        let mut good = draft();
        good["appliedForPan"] = json!("Y");
        good["panAcknowledgementNumber"] = json!("123456789012345");
        good["panApplicationDate"] = json!("2025-05-20");
        assert!(validate_draft::<Form60Form>(good, &ctx()).is_ok());
    }

    #[test]
    fn unknown_transaction_mode() {
        let mut bad = draft();
        bad["transactionMode"] = json!("barter");
        assert!(errors_for(bad).contains("transactionMode"));
    }

    #[test]
    fn pan_details_cleared_when_not_applied() {
        let mut stale = draft();
        stale["panAcknowledgementNumber"] = json!("123");
        let form: Form60Form = validate_draft(stale, &ctx()).unwrap();
        assert!(form.pan_acknowledgement_number.is_empty());
        assert_eq!(form.to_dto().pan_applied_flag, "N");
    }

    #[test]
    fn non_numeric_amount_is_reported_on_its_field() {
        let mut bad = draft();
        bad["transactionAmount"] = json!("lots");
        match validate_draft::<Form60Form>(bad, &ctx()) {
            Err(FormError::Validation(errors)) => assert_eq!(
                errors.get("transactionAmount"),
                Some("Transaction amount must be a number")
            ),
            other => panic!("expected validation errors, got {other:?}"),
        }
    }
}
