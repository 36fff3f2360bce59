use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::database::models::{MemberInfo, SetActiveInput};
use crate::database::repositories::MemberRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{Claims, EarningsService};

/// The active roster used for team totals.
pub async fn get_members(
    _claims: Claims,
    member_repo: web::Data<MemberRepository>,
) -> Result<HttpResponse, AppError> {
    let members: Vec<MemberInfo> = member_repo
        .find_active()
        .await?
        .into_iter()
        .map(MemberInfo::from)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(members)))
}

pub async fn set_member_active(
    claims: Claims,
    member_repo: web::Data<MemberRepository>,
    earnings: web::Data<EarningsService>,
    path: web::Path<Uuid>,
    input: web::Json<SetActiveInput>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    let member_id = path.into_inner();
    let member = member_repo
        .set_active(member_id, input.active)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))?;

    // roster changed, cached team totals are stale
    earnings.invalidate_team_cache();
    log::info!(
        "Member {} marked {} by {}",
        member.id,
        if member.active { "active" } else { "inactive" },
        claims.member_id()
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(MemberInfo::from(member))))
}
