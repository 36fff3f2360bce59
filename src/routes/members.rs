use actix_web::web;

use crate::handlers::members;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/members")
            .route("", web::get().to(members::get_members))
            .route("/{id}/active", web::put().to(members::set_member_active)),
    );
}
