use actix_web::{HttpResponse, web};

use crate::database::models::{LoginInput, MemberInfo, RegisterInput};
use crate::database::repositories::MemberRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{AuthService, Claims, EarningsService};

pub async fn register(
    auth_service: web::Data<AuthService>,
    earnings: web::Data<EarningsService>,
    input: web::Json<RegisterInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    if input.email.trim().is_empty() || input.display_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Email and display name are required".to_string(),
        ));
    }
    if input.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    match auth_service.register(input).await {
        Ok(response) => {
            // new active member joins the team roster
            earnings.invalidate_team_cache();
            Ok(HttpResponse::Created().json(ApiResponse::success(response)))
        }
        Err(e) if e.to_string().contains("already exists") => {
            Err(AppError::BadRequest(e.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn login(
    auth_service: web::Data<AuthService>,
    input: web::Json<LoginInput>,
) -> Result<HttpResponse, AppError> {
    match auth_service.login(input.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => {
            log::warn!("Login failed: {}", e);
            Err(AppError::Unauthorized)
        }
    }
}

pub async fn me(
    claims: Claims,
    member_repo: web::Data<MemberRepository>,
) -> Result<HttpResponse, AppError> {
    let member = member_repo
        .find_by_id(claims.member_id())
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(MemberInfo::from(member))))
}
