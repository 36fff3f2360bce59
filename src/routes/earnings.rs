use actix_web::web;

use crate::handlers::earnings;

pub fn configure(cfg: &mut web::ServiceConfig) {
    // static segments go before `/{id}`
    cfg.service(
        web::scope("/earnings")
            .route("/summary", web::get().to(earnings::get_summary))
            .route("/team", web::get().to(earnings::get_team_dashboard))
            .route("", web::get().to(earnings::get_earnings))
            .route("", web::post().to(earnings::create_earning))
            .route("/{id}", web::get().to(earnings::get_earning))
            .route("/{id}", web::put().to(earnings::update_earning))
            .route("/{id}", web::delete().to(earnings::delete_earning)),
    );
}
