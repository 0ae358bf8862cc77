//! Customer basic information (first onboarding step).

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::submission::FormKind;
use crate::domain::types::{
    MOBILE_RE, NAME_PATTERN, NAME_RE, PAN_PATTERN, PINCODE_RE, normalize_mobile,
};
use crate::dto::basic_info::{AddressDto, BasicInfoDto};
use crate::forms::{
    ADULT_AGE, FormContext, FormSchema, age_on, check_date, check_not_future, format_rule,
    is_yes, lenient, person_name, required_when_equals, required_when_true, trimmed, upper,
    yes_no,
};
use crate::validation::FieldErrors;
use crate::validation::rules::{ConditionalRule, Requirement};

pub const GENDERS: &str = "^(MALE|FEMALE|TRANSGENDER)$";
pub const MARITAL_STATUSES: &str = "^(SINGLE|MARRIED|DIVORCED|WIDOWED)$";

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressForm {
    #[validate(length(min = 1, message = "Address line 1 is required"))]
    pub line1: String,
    pub line2: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    #[validate(
        length(min = 1, message = "Pincode is required"),
        regex(path = *PINCODE_RE, message = "Pincode must be a valid 6 digit number")
    )]
    pub pincode: String,
    pub country: String,
}

impl AddressForm {
    pub fn normalize(self) -> Self {
        let country = upper(&self.country);
        Self {
            line1: trimmed(&self.line1),
            line2: trimmed(&self.line2),
            city: upper(&self.city),
            state: upper(&self.state),
            pincode: trimmed(&self.pincode),
            country: if country.is_empty() { "IN".to_string() } else { country },
        }
    }
}

impl From<&AddressForm> for AddressDto {
    fn from(form: &AddressForm) -> Self {
        Self {
            addr_line1: form.line1.clone(),
            addr_line2: form.line2.clone(),
            city: form.city.clone(),
            state: form.state.clone(),
            pin_code: form.pincode.clone(),
            country: form.country.clone(),
        }
    }
}

impl From<AddressDto> for AddressForm {
    fn from(dto: AddressDto) -> Self {
        Self {
            line1: dto.addr_line1,
            line2: dto.addr_line2,
            city: dto.city,
            state: dto.state,
            pincode: dto.pin_code,
            country: dto.country,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase", default)]
/// Form data for a customer's basic information.
pub struct BasicInfoForm {
    /// Existing customer id when editing; blank for a new customer.
    pub customer_id: String,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(
        length(min = 1, message = "First name is required"),
        regex(path = *NAME_RE, message = "First name may only contain letters")
    )]
    pub first_name: String,
    pub middle_name: String,
    #[validate(
        length(min = 1, message = "Last name is required"),
        regex(path = *NAME_RE, message = "Last name may only contain letters")
    )]
    pub last_name: String,
    #[validate(length(min = 1, message = "Date of birth is required"))]
    pub date_of_birth: String,
    #[validate(length(min = 1, message = "Gender is required"))]
    pub gender: String,
    #[validate(length(min = 1, message = "Marital status is required"))]
    pub marital_status: String,
    pub spouse_name: String,
    #[validate(length(min = 1, message = "Father's name is required"))]
    pub father_name: String,
    pub mother_maiden_name: String,
    #[validate(
        length(min = 1, message = "Mobile number is required"),
        regex(path = *MOBILE_RE, message = "Mobile number must be a valid 10 digit number")
    )]
    pub mobile_number: String,
    pub email: String,
    pub pan_number: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_minor: bool,
    pub guardian_customer_id: String,
    pub guardian_relation: String,
    #[validate(length(min = 1, message = "Occupation is required"))]
    pub occupation_code: String,
    #[validate(length(min = 1, message = "Risk category is required"))]
    pub risk_category_code: String,
    pub nationality: String,
    #[validate(nested)]
    pub address: AddressForm,
}

impl FormSchema for BasicInfoForm {
    const KIND: FormKind = FormKind::BasicInfo;
    type Dto = BasicInfoDto;

    fn conditional_rules() -> Vec<ConditionalRule> {
        vec![
            required_when_true(
                "guardianCustomerId",
                "isMinor",
                "Guardian Customer ID is required for minor customers",
            ),
            required_when_true(
                "guardianRelation",
                "isMinor",
                "Guardian relation is required for minor customers",
            ),
            required_when_equals(
                "spouseName",
                "maritalStatus",
                "MARRIED",
                "Spouse name is required for married customers",
            ),
            format_rule("gender", GENDERS, "Gender must be MALE, FEMALE or TRANSGENDER"),
            format_rule(
                "maritalStatus",
                MARITAL_STATUSES,
                "Marital status must be SINGLE, MARRIED, DIVORCED or WIDOWED",
            ),
            format_rule("middleName", NAME_PATTERN, "Middle name may only contain letters"),
            format_rule("spouseName", NAME_PATTERN, "Spouse name may only contain letters"),
            format_rule("panNumber", PAN_PATTERN, "PAN must be in the format AAAAA9999A"),
            ConditionalRule::always("email", Requirement::Email, "Email address is invalid"),
        ]
    }

    fn cross_field(&self, ctx: &FormContext, errors: &mut FieldErrors) {
        let dob = check_date(errors, "dateOfBirth", "Date of birth", &self.date_of_birth);
        check_not_future(errors, "dateOfBirth", "Date of birth", dob, ctx.today);

        if let Some(dob) = dob.filter(|dob| *dob <= ctx.today) {
            let minor_by_age = age_on(dob, ctx.today) < ADULT_AGE;
            if minor_by_age != self.is_minor {
                let message = if minor_by_age {
                    "Customer is under 18 and must be marked as a minor"
                } else {
                    "Customer is 18 or older and cannot be marked as a minor"
                };
                errors.insert("isMinor", message);
            }
        }

        if !self.guardian_customer_id.is_empty()
            && self.guardian_customer_id == self.customer_id
        {
            errors.insert(
                "guardianCustomerId",
                "A customer cannot be their own guardian",
            );
        }
    }

    fn normalize(self) -> Self {
        let married = upper(&self.marital_status) == "MARRIED";
        let nationality = upper(&self.nationality);
        Self {
            customer_id: upper(&self.customer_id),
            title: upper(&self.title),
            first_name: person_name(&self.first_name),
            middle_name: person_name(&self.middle_name),
            last_name: person_name(&self.last_name),
            date_of_birth: trimmed(&self.date_of_birth),
            gender: upper(&self.gender),
            marital_status: upper(&self.marital_status),
            spouse_name: if married {
                person_name(&self.spouse_name)
            } else {
                String::new()
            },
            father_name: person_name(&self.father_name),
            mother_maiden_name: person_name(&self.mother_maiden_name),
            mobile_number: normalize_mobile(&self.mobile_number)
                .unwrap_or_else(|_| trimmed(&self.mobile_number)),
            email: self.email.trim().to_lowercase(),
            pan_number: upper(&self.pan_number),
            is_minor: self.is_minor,
            guardian_customer_id: if self.is_minor {
                upper(&self.guardian_customer_id)
            } else {
                String::new()
            },
            guardian_relation: if self.is_minor {
                upper(&self.guardian_relation)
            } else {
                String::new()
            },
            occupation_code: upper(&self.occupation_code),
            risk_category_code: upper(&self.risk_category_code),
            nationality: if nationality.is_empty() {
                "INDIAN".to_string()
            } else {
                nationality
            },
            address: self.address.normalize(),
        }
    }

    fn to_dto(&self) -> BasicInfoDto {
        let full_name = [&self.first_name, &self.middle_name, &self.last_name]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        BasicInfoDto {
            cust_id: self.customer_id.clone(),
            salutation: self.title.clone(),
            first_name: self.first_name.clone(),
            middle_name: self.middle_name.clone(),
            last_name: self.last_name.clone(),
            full_name,
            dob: self.date_of_birth.clone(),
            gender: self.gender.clone(),
            marital_status: self.marital_status.clone(),
            spouse_name: self.spouse_name.clone(),
            father_name: self.father_name.clone(),
            mother_maiden_name: self.mother_maiden_name.clone(),
            mobile_no: self.mobile_number.clone(),
            email_id: self.email.clone(),
            pan_no: self.pan_number.clone(),
            minor_flag: yes_no(self.is_minor),
            guardian_cust_id: self.guardian_customer_id.clone(),
            guardian_relation: self.guardian_relation.clone(),
            occupation_code: self.occupation_code.clone(),
            risk_category: self.risk_category_code.clone(),
            nationality: self.nationality.clone(),
            address: AddressDto::from(&self.address),
        }
    }

    fn from_dto(dto: BasicInfoDto) -> Self {
        Self {
            customer_id: dto.cust_id,
            title: dto.salutation,
            first_name: dto.first_name,
            middle_name: dto.middle_name,
            last_name: dto.last_name,
            date_of_birth: dto.dob,
            gender: dto.gender,
            marital_status: dto.marital_status,
            spouse_name: dto.spouse_name,
            father_name: dto.father_name,
            mother_maiden_name: dto.mother_maiden_name,
            mobile_number: dto.mobile_no,
            email: dto.email_id,
            pan_number: dto.pan_no,
            is_minor: is_yes(&dto.minor_flag),
            guardian_customer_id: dto.guardian_cust_id,
            guardian_relation: dto.guardian_relation,
            occupation_code: dto.occupation_code,
            risk_category_code: dto.risk_category,
            nationality: dto.nationality,
            address: dto.address.into(),
        }
    }

    fn reference(&self) -> String {
        if self.customer_id.is_empty() {
            self.mobile_number.clone()
        } else {
            self.customer_id.clone()
        }
    }
}
