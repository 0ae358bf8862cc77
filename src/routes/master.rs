use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::forms::master_data::MasterRecordForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{error_response, page_limits};
use crate::services::master_data::{
    MasterListParams, create_master_record, delete_master_record, get_master_record,
    list_master_records, master_options, update_master_record,
};

#[get("/master/{kind}")]
pub async fn list_records(
    kind: web::Path<String>,
    params: web::Query<MasterListParams>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match list_master_records(
        repo.get_ref(),
        &kind,
        params.into_inner(),
        page_limits(&server_config),
    ) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err),
    }
}

#[post("/master/{kind}")]
pub async fn create_record(
    kind: web::Path<String>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<MasterRecordForm>,
) -> impl Responder {
    match create_master_record(repo.get_ref(), &kind, form) {
        Ok(record) => HttpResponse::Created().json(record),
        Err(err) => error_response(err),
    }
}

#[get("/master/{kind}/options")]
pub async fn record_options(
    kind: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match master_options(repo.get_ref(), &kind) {
        Ok(options) => HttpResponse::Ok().json(options),
        Err(err) => error_response(err),
    }
}

#[get("/master/{kind}/{id}")]
pub async fn show_record(
    path: web::Path<(String, i32)>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (kind, id) = path.into_inner();
    match get_master_record(repo.get_ref(), &kind, id) {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(err) => error_response(err),
    }
}

#[put("/master/{kind}/{id}")]
pub async fn update_record(
    path: web::Path<(String, i32)>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<MasterRecordForm>,
) -> impl Responder {
    let (kind, id) = path.into_inner();
    match update_master_record(repo.get_ref(), &kind, id, form) {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(err) => error_response(err),
    }
}

#[delete("/master/{kind}/{id}")]
pub async fn delete_record(
    path: web::Path<(String, i32)>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (kind, id) = path.into_inner();
    match delete_master_record(repo.get_ref(), &kind, id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}
