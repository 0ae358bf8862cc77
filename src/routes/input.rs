use actix_web::{HttpResponse, Responder, post, web};

use crate::dto::input::{ChangeRequest, ClampRequest, DateRequest, KeyPressRequest};
use crate::services::input::{
    apply_change, check_key, clamp_value, display_date, format_date, parse_date,
};

#[post("/input/filter")]
pub async fn filter(web::Json(request): web::Json<ChangeRequest>) -> impl Responder {
    HttpResponse::Ok().json(apply_change(request))
}

#[post("/input/keypress")]
pub async fn keypress(web::Json(request): web::Json<KeyPressRequest>) -> impl Responder {
    HttpResponse::Ok().json(check_key(request))
}

#[post("/input/clamp")]
pub async fn clamp(web::Json(request): web::Json<ClampRequest>) -> impl Responder {
    HttpResponse::Ok().json(clamp_value(request))
}

#[post("/input/date/format")]
pub async fn date_format(web::Json(request): web::Json<DateRequest>) -> impl Responder {
    HttpResponse::Ok().json(format_date(request))
}

#[post("/input/date/parse")]
pub async fn date_parse(web::Json(request): web::Json<DateRequest>) -> impl Responder {
    HttpResponse::Ok().json(parse_date(request))
}

#[post("/input/date/display")]
pub async fn date_display(web::Json(request): web::Json<DateRequest>) -> impl Responder {
    HttpResponse::Ok().json(display_date(request))
}
