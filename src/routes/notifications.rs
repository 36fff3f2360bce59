use actix_web::web;

use crate::handlers::notifications;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notifications")
            .route("", web::get().to(notifications::get_notifications))
            .route("/unread-count", web::get().to(notifications::get_unread_count))
            .route("/read-all", web::post().to(notifications::mark_all_read))
            .route("/{id}/read", web::post().to(notifications::mark_read)),
    );
}
