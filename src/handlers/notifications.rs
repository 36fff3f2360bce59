use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::database::models::UnreadCount;
use crate::database::repositories::NotificationRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::ViewerContext;

pub async fn get_notifications(
    viewer: ViewerContext,
    repo: web::Data<NotificationRepository>,
) -> Result<HttpResponse, AppError> {
    let notifications = repo.find_for_member(viewer.effective_member_id()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(notifications)))
}

pub async fn get_unread_count(
    viewer: ViewerContext,
    repo: web::Data<NotificationRepository>,
) -> Result<HttpResponse, AppError> {
    let unread = repo.unread_count(viewer.effective_member_id()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(UnreadCount { unread })))
}

// Read flags belong to the signed-in member, never to a viewed user.
pub async fn mark_read(
    viewer: ViewerContext,
    repo: web::Data<NotificationRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let notification = repo
        .mark_read(id, viewer.member_id())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Notification {} not found", id)))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(notification)))
}

pub async fn mark_all_read(
    viewer: ViewerContext,
    repo: web::Data<NotificationRepository>,
) -> Result<HttpResponse, AppError> {
    let updated = repo.mark_all_read(viewer.member_id()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({
        "updated": updated
    }))))
}
