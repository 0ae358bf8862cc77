//! Services behind the `/api/forms/{form}` endpoints.
//!
//! Each operation resolves the form kind from the path and dispatches to the
//! matching [`FormSchema`] implementation.

use serde::Serialize;
use serde_json::Value;

use crate::domain::submission::{FormKind, NewSubmission, Submission};
use crate::domain::types::SubmissionId;
use crate::dto::forms::{
    FieldValidationRequest, FieldValidationResponse, SubmissionListParams, ValidatedForm,
};
use crate::forms::additional_optional::AdditionalOptionalForm;
use crate::forms::basic_info::BasicInfoForm;
use crate::forms::charge_master::ChargeMasterForm;
use crate::forms::form60::Form60Form;
use crate::forms::kyc::KycForm;
use crate::forms::lead::LeadForm;
use crate::forms::loan_scheme::LoanSchemeForm;
use crate::forms::nominee::NomineeForm;
use crate::forms::{FormContext, FormSchema, draft_from_dto, validate_draft, validate_field};
use crate::notifications::{Level, NotificationManager};
use crate::pagination::Page;
use crate::repository::{SubmissionListQuery, SubmissionReader, SubmissionWriter};
use crate::services::master_data::PageLimits;
use crate::services::{ServiceError, ServiceResult};
use crate::validation::rules::ConditionalRule;

macro_rules! with_form {
    ($kind:expr, $func:ident($($arg:expr),*)) => {
        match $kind {
            FormKind::BasicInfo => $func::<BasicInfoForm>($($arg),*),
            FormKind::Kyc => $func::<KycForm>($($arg),*),
            FormKind::Form60 => $func::<Form60Form>($($arg),*),
            FormKind::Nominee => $func::<NomineeForm>($($arg),*),
            FormKind::Lead => $func::<LeadForm>($($arg),*),
            FormKind::AdditionalOptional => $func::<AdditionalOptionalForm>($($arg),*),
            FormKind::ChargeMaster => $func::<ChargeMasterForm>($($arg),*),
            FormKind::LoanScheme => $func::<LoanSchemeForm>($($arg),*),
        }
    };
}

/// Unknown form names are reported as missing resources.
pub fn parse_form(form: &str) -> ServiceResult<FormKind> {
    form.parse().map_err(|_| ServiceError::NotFound)
}

fn to_json<T: Serialize>(value: &T) -> ServiceResult<Value> {
    serde_json::to_value(value).map_err(|e| ServiceError::Internal(e.to_string()))
}

fn validate_as<F: FormSchema>(draft: Value, ctx: &FormContext) -> ServiceResult<ValidatedForm> {
    let form = validate_draft::<F>(draft, ctx)?;
    Ok(ValidatedForm {
        form: to_json(&form)?,
        dto: to_json(&form.to_dto())?,
        reference: form.reference(),
    })
}

fn validate_field_as<F: FormSchema>(
    request: &FieldValidationRequest,
    ctx: &FormContext,
) -> ServiceResult<Option<String>> {
    Ok(validate_field::<F>(
        &request.draft,
        &request.field,
        request.value.clone(),
        ctx,
    )?)
}

fn from_dto_as<F: FormSchema>(dto: Value) -> ServiceResult<Value> {
    Ok(draft_from_dto::<F>(dto)?)
}

fn rules_of<F: FormSchema>() -> Vec<ConditionalRule> {
    F::conditional_rules()
}

/// Normalizes and validates a full draft, returning the UI form and its DTO.
pub fn validate_form(form: &str, draft: Value, ctx: &FormContext) -> ServiceResult<ValidatedForm> {
    let kind = parse_form(form)?;
    with_form!(kind, validate_as(draft, ctx))
}

/// Validates a single field in the context of its draft.
pub fn validate_form_field(
    form: &str,
    request: FieldValidationRequest,
    ctx: &FormContext,
) -> ServiceResult<FieldValidationResponse> {
    let kind = parse_form(form)?;
    let error = with_form!(kind, validate_field_as(&request, ctx))?;
    Ok(FieldValidationResponse::new(request.field, error))
}

/// Maps a stored backend DTO back into the UI draft shape.
pub fn form_from_dto(form: &str, dto: Value) -> ServiceResult<Value> {
    let kind = parse_form(form)?;
    with_form!(kind, from_dto_as(dto))
}

/// Conditional rules of `form`, so clients can mirror them while typing.
pub fn form_rules(form: &str) -> ServiceResult<Vec<ConditionalRule>> {
    let kind = parse_form(form)?;
    Ok(with_form!(kind, rules_of()))
}

/// Validates the draft and records its DTO as a submission.
///
/// The outcome is also posted to `notifications`.
pub fn submit_form<R>(
    repo: &R,
    notifications: &NotificationManager,
    form: &str,
    draft: Value,
    ctx: &FormContext,
) -> ServiceResult<Submission>
where
    R: SubmissionWriter + ?Sized,
{
    let kind = parse_form(form)?;

    let validated = match with_form!(kind, validate_as(draft, ctx)) {
        Ok(validated) => validated,
        Err(ServiceError::Validation(errors)) => {
            notifications.notify(
                Level::Warning,
                format!(
                    "{} was not saved: {} field(s) need attention",
                    kind.label(),
                    errors.len()
                ),
            );
            return Err(ServiceError::Validation(errors));
        }
        Err(err) => return Err(err),
    };

    let new_submission = NewSubmission::new(kind, validated.reference, validated.dto);
    match repo.create_submission(&new_submission) {
        Ok(submission) => {
            log::info!(
                "Stored {kind} submission {} for {}",
                submission.id,
                submission.reference
            );
            notifications.success(format!("{} saved", kind.label()));
            Ok(submission)
        }
        Err(err) => {
            log::error!("Failed to store {kind} submission: {err}");
            notifications.error(format!("{} could not be saved", kind.label()));
            Err(err.into())
        }
    }
}

/// Lists stored submissions of `form`, newest first.
pub fn list_submissions<R>(
    repo: &R,
    form: &str,
    params: SubmissionListParams,
    limits: PageLimits,
) -> ServiceResult<Page<Submission>>
where
    R: SubmissionReader + ?Sized,
{
    let kind = parse_form(form)?;
    let pagination = limits.resolve(params.page, params.size);

    let mut query = SubmissionListQuery::new(kind).paginate(pagination);
    if let Some(reference) = params
        .reference
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
    {
        query = query.reference(reference);
    }

    let (total, submissions) = repo.list_submissions(query)?;
    Ok(Page::new(submissions, total, pagination))
}

pub fn get_submission<R>(repo: &R, form: &str, id: i32) -> ServiceResult<Submission>
where
    R: SubmissionReader + ?Sized,
{
    let kind = parse_form(form)?;
    let id = SubmissionId::new(id).map_err(|_| ServiceError::NotFound)?;

    repo.get_submission(id)?
        .filter(|submission| submission.form == kind)
        .ok_or(ServiceError::NotFound)
}
