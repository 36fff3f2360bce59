use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::database::models::{Feature, FeatureCheck, SetGrantInput};
use crate::database::repositories::{FeatureAccessRepository, MemberRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{ViewerContext, access_control};

fn parse_feature(raw: &str) -> Result<Feature, AppError> {
    raw.parse::<Feature>().map_err(AppError::BadRequest)
}

/// Features visible to the effective member.
pub async fn get_visible_features(
    viewer: ViewerContext,
    member_repo: web::Data<MemberRepository>,
    access_repo: web::Data<FeatureAccessRepository>,
) -> Result<HttpResponse, AppError> {
    let member_id = viewer.effective_member_id();
    let member = member_repo
        .find_by_id(member_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))?;
    let grants = access_repo.grants_for(member_id).await?;

    let features = access_control::visible_features(member.role, &grants);
    Ok(HttpResponse::Ok().json(ApiResponse::success(features)))
}

pub async fn check_feature(
    viewer: ViewerContext,
    member_repo: web::Data<MemberRepository>,
    access_repo: web::Data<FeatureAccessRepository>,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse, AppError> {
    let (member_id, feature) = path.into_inner();
    let feature = parse_feature(&feature)?;

    if member_id != viewer.member_id() && !viewer.is_admin() {
        return Err(AppError::Forbidden(
            "Only admins can check other members' access".to_string(),
        ));
    }

    let member = member_repo
        .find_by_id(member_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))?;
    let grants = access_repo.grants_for(member_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(FeatureCheck {
        member_id,
        feature,
        allowed: access_control::allows(member.role, &grants, feature),
    })))
}

pub async fn set_grant(
    viewer: ViewerContext,
    access_repo: web::Data<FeatureAccessRepository>,
    path: web::Path<(Uuid, String)>,
    input: web::Json<SetGrantInput>,
) -> Result<HttpResponse, AppError> {
    if !viewer.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    let (member_id, feature) = path.into_inner();
    let feature = parse_feature(&feature)?;

    let grant = access_repo
        .set_grant(member_id, feature, input.enabled)
        .await?;
    log::info!(
        "Feature {} {} for {} by {}",
        feature,
        if grant.enabled { "enabled" } else { "disabled" },
        member_id,
        viewer.member_id()
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(grant)))
}

pub async fn clear_grant(
    viewer: ViewerContext,
    access_repo: web::Data<FeatureAccessRepository>,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse, AppError> {
    if !viewer.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    let (member_id, feature) = path.into_inner();
    let feature = parse_feature(&feature)?;

    if !access_repo.clear_grant(member_id, feature).await? {
        return Err(AppError::NotFound(format!(
            "No {} grant for member {}",
            feature, member_id
        )));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
        None,
        "Grant cleared",
    )))
}
