use actix_web::{HttpResponse, Responder, delete, get, web};
use uuid::Uuid;

use crate::notifications::NotificationManager;

#[get("/notifications")]
pub async fn list_notifications(notifications: web::Data<NotificationManager>) -> impl Responder {
    HttpResponse::Ok().json(notifications.active())
}

#[delete("/notifications/{id}")]
pub async fn dismiss_notification(
    id: web::Path<Uuid>,
    notifications: web::Data<NotificationManager>,
) -> impl Responder {
    if notifications.dismiss(id.into_inner()) {
        HttpResponse::NoContent().finish()
    } else {
        HttpResponse::NotFound().finish()
    }
}

#[delete("/notifications")]
pub async fn clear_notifications(notifications: web::Data<NotificationManager>) -> impl Responder {
    notifications.clear();
    HttpResponse::NoContent().finish()
}
