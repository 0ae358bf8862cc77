use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::submission::FormKind;
use crate::domain::types::{AadhaarNumber, PAN_PATTERN};
use crate::dto::kyc::KycDto;
use crate::forms::{
    FormContext, FormSchema, check_date, check_not_future, check_order, format_rule, is_yes,
    lenient, required_when_true, sanitize, trimmed, upper, yes_no,
};
use crate::validation::FieldErrors;
use crate::validation::rules::{Condition, ConditionalRule, Requirement};

pub const CKYC_PATTERN: &str = r"^[0-9]{14}$";
pub const REMARKS_MAX: usize = 500;

/// Identity and address proof details captured during KYC.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct KycForm {
    #[validate(length(min = 1, message = "Customer ID is required"))]
    pub customer_id: String,
    pub pan_number: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub form60_submitted: bool,
    pub aadhaar_number: String,
    pub ckyc_number: String,
    #[validate(length(min = 1, message = "Identity proof type is required"))]
    pub identity_proof_type: String,
    #[validate(length(min = 1, message = "Identity proof number is required"))]
    pub identity_proof_number: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub address_same_as_identity: bool,
    #[validate(length(min = 1, message = "Address proof type is required"))]
    pub address_proof_type: String,
    #[validate(length(min = 1, message = "Address proof number is required"))]
    pub address_proof_number: String,
    #[validate(length(min = 1, message = "KYC date is required"))]
    pub kyc_date: String,
    pub kyc_expiry_date: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub video_kyc_done: bool,
    pub video_kyc_reference: String,
    pub remarks: String,
}

impl FormSchema for KycForm {
    const KIND: FormKind = FormKind::Kyc;
    type Dto = KycDto;

    fn conditional_rules() -> Vec<ConditionalRule> {
        vec![
            ConditionalRule::when(
                "panNumber",
                "form60Submitted",
                Condition::IsFalse,
                Requirement::Required,
                "PAN is required unless Form 60 is submitted",
            ),
            format_rule("panNumber", PAN_PATTERN, "PAN must be in the format AAAAA9999A"),
            format_rule("ckycNumber", CKYC_PATTERN, "CKYC number must be 14 digits"),
            required_when_true(
                "videoKycReference",
                "videoKycDone",
                "Video KYC reference is required when video KYC is done",
            ),
            ConditionalRule::always(
                "remarks",
                Requirement::MaxLength { max: REMARKS_MAX },
                format!("Remarks must be at most {REMARKS_MAX} characters"),
            ),
        ]
    }

    fn cross_field(&self, ctx: &FormContext, errors: &mut FieldErrors) {
        if !self.aadhaar_number.is_empty() && AadhaarNumber::new(self.aadhaar_number.as_str()).is_err() {
            errors.insert("aadhaarNumber", "Aadhaar number must be 12 digits");
        }

        let kyc_date = check_date(errors, "kycDate", "KYC date", &self.kyc_date);
        check_not_future(errors, "kycDate", "KYC date", kyc_date, ctx.today);
        let expiry = check_date(errors, "kycExpiryDate", "KYC expiry date", &self.kyc_expiry_date);
        check_order(
            errors,
            "kycExpiryDate",
            kyc_date,
            expiry,
            "KYC expiry date cannot be before the KYC date",
        );
    }

    fn normalize(self) -> Self {
        let aadhaar_number = match AadhaarNumber::new(self.aadhaar_number.as_str()) {
            Ok(aadhaar) => aadhaar.into_inner(),
            Err(_) => trimmed(&self.aadhaar_number),
        };
        let (address_proof_type, address_proof_number) = if self.address_same_as_identity {
            (upper(&self.identity_proof_type), upper(&self.identity_proof_number))
        } else {
            (upper(&self.address_proof_type), upper(&self.address_proof_number))
        };

        Self {
            customer_id: upper(&self.customer_id),
            pan_number: if self.form60_submitted {
                String::new()
            } else {
                upper(&self.pan_number)
            },
            form60_submitted: self.form60_submitted,
            aadhaar_number,
            ckyc_number: trimmed(&self.ckyc_number),
            identity_proof_type: upper(&self.identity_proof_type),
            identity_proof_number: upper(&self.identity_proof_number),
            address_same_as_identity: self.address_same_as_identity,
            address_proof_type,
            address_proof_number,
            kyc_date: trimmed(&self.kyc_date),
            kyc_expiry_date: trimmed(&self.kyc_expiry_date),
            video_kyc_done: self.video_kyc_done,
            video_kyc_reference: if self.video_kyc_done {
                trimmed(&self.video_kyc_reference)
            } else {
                String::new()
            },
            remarks: sanitize(&self.remarks),
        }
    }

    fn to_dto(&self) -> KycDto {
        KycDto {
            cust_id: self.customer_id.clone(),
            pan_no: self.pan_number.clone(),
            form60_flag: yes_no(self.form60_submitted),
            aadhaar_no: self.aadhaar_number.clone(),
            ckyc_no: self.ckyc_number.clone(),
            id_proof_type: self.identity_proof_type.clone(),
            id_proof_no: self.identity_proof_number.clone(),
            addr_proof_type: self.address_proof_type.clone(),
            addr_proof_no: self.address_proof_number.clone(),
            addr_same_as_id: yes_no(self.address_same_as_identity),
            kyc_date: self.kyc_date.clone(),
            kyc_expiry_date: self.kyc_expiry_date.clone(),
            video_kyc_flag: yes_no(self.video_kyc_done),
            video_kyc_ref: self.video_kyc_reference.clone(),
            remarks: self.remarks.clone(),
        }
    }

    fn from_dto(dto: KycDto) -> Self {
        Self {
            customer_id: dto.cust_id,
            pan_number: dto.pan_no,
            form60_submitted: is_yes(&dto.form60_flag),
            aadhaar_number: dto.aadhaar_no,
            ckyc_number: dto.ckyc_no,
            identity_proof_type: dto.id_proof_type,
            identity_proof_number: dto.id_proof_no,
            address_same_as_identity: is_yes(&dto.addr_same_as_id),
            address_proof_type: dto.addr_proof_type,
            address_proof_number: dto.addr_proof_no,
            kyc_date: dto.kyc_date,
            kyc_expiry_date: dto.kyc_expiry_date,
            video_kyc_done: is_yes(&dto.video_kyc_flag),
            video_kyc_reference: dto.video_kyc_ref,
            remarks: dto.remarks,
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
    use crate::forms::test_support::ctx;
    use crate::forms::{FormError, validate_draft};

    fn draft() -> Value {
        json!({
            "customerId": "c1001",
            "panNumber": "abcde1234f",
            "aadhaarNumber": "2345 6789 0123",
            "identityProofType": "passport",
            "identityProofNumber": "z1234567",
            "addressSameAsIdentity": true,
            "kycDate": "2025-01-10",
            "kycExpiryDate": "2035-01-10",
            "remarks": "verified <script>alert(1)</script>in branch"
        })
    }

    fn errors_for(draft: Value) -> FieldErrors {
        match validate_draft::<KycForm>(draft, &ctx()) {
            Err(FormError::Validation(errors)) => errors,
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn normalizes_proofs_and_remarks() {
        let form: KycForm = validate_draft(draft(), &ctx()).unwrap();
        assert_eq!(form.aadhaar_number, "234567890123");
        assert_eq!(form.address_proof_type, "PASSPORT");
        assert_eq!(form.address_proof_number, "Z1234567");
        assert_eq!(form.remarks, "verified in branch");
    }

    #[test]
    fn pan_required_unless_form60() {
        let mut missing = draft();
        missing["panNumber"] = json!("");
        assert_eq!(
            errors_for(missing.clone()).get("panNumber"),
            Some("PAN is required unless Form 60 is submitted")
        );

        missing["form60Submitted"] = json!("Y");
        assert!(validate_draft::<KycForm>(missing, &ctx()).is_ok());
    }

    #[test]
    fn identifier_formats() {
        let mut bad = draft();
        bad["panNumber"] = json!("ABCDE12345");
        bad["aadhaarNumber"] = json!("1234 5678 9012");
        bad["ckycNumber"] = json!("12345");
        let errors = errors_for(bad);
        assert_eq!(errors.get("panNumber"), Some("PAN must be in the format AAAAA9999A"));
        assert_eq!(errors.get("aadhaarNumber"), Some("Aadhaar number must be 12 digits"));
        assert_eq!(errors.get("ckycNumber"), Some("CKYC number must be 14 digits"));
    }

    #[test]
    fn expiry_cannot_precede_kyc_date() {
        let mut bad = draft();
        bad["kycExpiryDate"] = json!("2024-12-31");
        assert_eq!(
            errors_for(bad).get("kycExpiryDate"),
            Some("KYC expiry date cannot be before the KYC date")
        );
    }

    #[test]
    fn video_kyc_needs_reference() {
        let mut bad = draft();
        bad["videoKycDone"] = json!(true);
        assert!(errors_for(bad).contains("videoKycReference"));
    }

    #[test]
    fn dto_flags() {
        let form: KycForm = validate_draft(draft(), &ctx()).unwrap();
        let dto = form.to_dto();
        assert_eq!(dto.form60_flag, "N");
        assert_eq!(dto.addr_same_as_id, "Y");
        assert_eq!(KycForm::from_dto(dto), form);
    }
}
