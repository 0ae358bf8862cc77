//! Diesel models representing stored form submissions.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::submission::{
    NewSubmission as DomainNewSubmission, Submission as DomainSubmission,
};
use crate::domain::types::{SubmissionId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::form_submissions)]
/// Diesel model for [`crate::domain::submission::Submission`].
pub struct Submission {
    pub id: i32,
    pub form: String,
    pub reference: String,
    /// JSON encoded API DTO.
    pub payload: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::form_submissions)]
/// Insertable form of [`Submission`].
pub struct NewSubmission<'a> {
    pub form: &'a str,
    pub reference: &'a str,
    pub payload: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Submission> for DomainSubmission {
    type Error = TypeConstraintError;

    fn try_from(submission: Submission) -> Result<Self, Self::Error> {
        let payload = serde_json::from_str(&submission.payload)
            .map_err(|e| TypeConstraintError::InvalidValue(format!("stored payload: {e}")))?;
        Ok(Self {
            id: SubmissionId::try_from(submission.id)?,
            form: submission.form.parse()?,
            reference: submission.reference,
            payload,
            created_at: submission.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewSubmission> for NewSubmission<'a> {
    fn from(submission: &'a DomainNewSubmission) -> Self {
        Self {
            form: submission.form.as_str(),
            reference: submission.reference.as_str(),
            payload: submission.payload.to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::submission::FormKind;

    #[test]
    fn payload_is_stored_as_json_text() {
        let domain = DomainNewSubmission::new(FormKind::Lead, " 9123456780 ", json!({ "lead_name": "A" }));
        let new: NewSubmission = (&domain).into();
        assert_eq!(new.form, "lead");
        assert_eq!(new.reference, "9123456780");
        assert_eq!(new.payload, r#"{"lead_name":"A"}"#);
    }

    #[test]
    fn corrupt_payload_is_rejected() {
        let db = Submission {
            id: 1,
            form: "kyc".into(),
            reference: "C1".into(),
            payload: "{not json".into(),
            created_at: chrono::Utc::now().naive_utc(),
        };
        assert!(DomainSubmission::try_from(db).is_err());
    }
}
