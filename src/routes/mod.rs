use actix_web::web;

pub mod access;
pub mod auth;
pub mod earnings;
pub mod members;
pub mod notifications;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(auth::configure)
            .configure(earnings::configure)
            .configure(members::configure)
            .configure(access::configure)
            .configure(notifications::configure),
    );
}
