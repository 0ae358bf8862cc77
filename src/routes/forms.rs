use actix_web::{HttpResponse, Responder, get, post, web};
use serde_json::Value;

use crate::dto::forms::{FieldValidationRequest, SubmissionListParams};
use crate::forms::FormContext;
use crate::models::config::ServerConfig;
use crate::notifications::NotificationManager;
use crate::repository::DieselRepository;
use crate::routes::{error_response, page_limits, today};
use crate::services::forms::{
    form_from_dto, form_rules, get_submission, list_submissions, submit_form, validate_form,
    validate_form_field,
};

#[get("/forms/{form}/rules")]
pub async fn rules(form: web::Path<String>) -> impl Responder {
    match form_rules(&form) {
        Ok(rules) => HttpResponse::Ok().json(rules),
        Err(err) => error_response(err),
    }
}

#[post("/forms/{form}/validate")]
pub async fn validate(
    form: web::Path<String>,
    ctx: web::Data<FormContext>,
    web::Json(draft): web::Json<Value>,
) -> impl Responder {
    match validate_form(&form, draft, &ctx.on(today())) {
        Ok(validated) => HttpResponse::Ok().json(validated),
        Err(err) => error_response(err),
    }
}

#[post("/forms/{form}/validate-field")]
pub async fn validate_field(
    form: web::Path<String>,
    ctx: web::Data<FormContext>,
    web::Json(request): web::Json<FieldValidationRequest>,
) -> impl Responder {
    match validate_form_field(&form, request, &ctx.on(today())) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}

#[post("/forms/{form}/submit")]
pub async fn submit(
    form: web::Path<String>,
    ctx: web::Data<FormContext>,
    repo: web::Data<DieselRepository>,
    notifications: web::Data<NotificationManager>,
    web::Json(draft): web::Json<Value>,
) -> impl Responder {
    match submit_form(
        repo.get_ref(),
        notifications.get_ref(),
        &form,
        draft,
        &ctx.on(today()),
    ) {
        Ok(submission) => HttpResponse::Created().json(submission),
        Err(err) => error_response(err),
    }
}

#[post("/forms/{form}/from-dto")]
pub async fn from_dto(form: web::Path<String>, web::Json(dto): web::Json<Value>) -> impl Responder {
    match form_from_dto(&form, dto) {
        Ok(draft) => HttpResponse::Ok().json(draft),
        Err(err) => error_response(err),
    }
}

#[get("/forms/{form}/submissions")]
pub async fn submissions(
    form: web::Path<String>,
    params: web::Query<SubmissionListParams>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match list_submissions(
        repo.get_ref(),
        &form,
        params.into_inner(),
        page_limits(&server_config),
    ) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err),
    }
}

#[get("/forms/{form}/submissions/{id}")]
pub async fn show_submission(
    path: web::Path<(String, i32)>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (form, id) = path.into_inner();
    match get_submission(repo.get_ref(), &form, id) {
        Ok(submission) => HttpResponse::Ok().json(submission),
        Err(err) => error_response(err),
    }
}
