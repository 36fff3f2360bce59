use actix_web::web;

use crate::handlers::access;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/access")
            .route("", web::get().to(access::get_visible_features))
            .route("/{member_id}/{feature}", web::get().to(access::check_feature))
            .route("/{member_id}/{feature}", web::put().to(access::set_grant))
            .route("/{member_id}/{feature}", web::delete().to(access::clear_grant)),
    );
}
