use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use crate::database::models::{EarningInput, EarningListQuery, SummaryQuery};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{DateRange, EarningsService, ViewerContext};

/// Owner of a new or edited record: the effective member unless an admin
/// names someone else.
fn resolve_owner(viewer: &ViewerContext, requested: Option<Uuid>) -> Result<Uuid, AppError> {
    match requested {
        Some(owner) if owner != viewer.member_id() && !viewer.is_admin() => Err(
            AppError::Forbidden("Only admins can record earnings for other members".to_string()),
        ),
        Some(owner) => Ok(owner),
        None => Ok(viewer.effective_member_id()),
    }
}

/// Explicit bounds when given, otherwise the current calendar month with any
/// single given bound kept.
fn resolve_range(query: &SummaryQuery) -> Result<DateRange, AppError> {
    let month = DateRange::month_of(Utc::now().date_naive());
    let start = query.start_date.unwrap_or(month.start());
    let end = query.end_date.unwrap_or(month.end());
    Ok(DateRange::new(start, end)?)
}

pub async fn get_earnings(
    viewer: ViewerContext,
    service: web::Data<EarningsService>,
    query: web::Query<EarningListQuery>,
) -> Result<HttpResponse, AppError> {
    let involving = query.user_id.or(viewer.viewed_user);
    let records = service.list(involving).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(records)))
}

pub async fn get_earning(
    _viewer: ViewerContext,
    service: web::Data<EarningsService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let record = service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(record)))
}

pub async fn create_earning(
    viewer: ViewerContext,
    service: web::Data<EarningsService>,
    input: web::Json<EarningInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    let owner = resolve_owner(&viewer, input.user_id)?;

    let record = service.create(viewer.member_id(), owner, input).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(record)))
}

pub async fn update_earning(
    viewer: ViewerContext,
    service: web::Data<EarningsService>,
    path: web::Path<Uuid>,
    input: web::Json<EarningInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = input.into_inner();

    let existing = service.get(id).await?;
    if !viewer.can_modify(existing.user_id, existing.created_by) {
        return Err(AppError::Forbidden(
            "Only the owner, the author or an admin can edit this earning".to_string(),
        ));
    }

    let owner = match input.user_id {
        Some(_) => resolve_owner(&viewer, input.user_id)?,
        None => existing.user_id,
    };

    let record = service.update(id, owner, input).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(record)))
}

pub async fn delete_earning(
    viewer: ViewerContext,
    service: web::Data<EarningsService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let existing = service.get(id).await?;
    if !viewer.can_modify(existing.user_id, existing.created_by) {
        return Err(AppError::Forbidden(
            "Only the owner, the author or an admin can delete this earning".to_string(),
        ));
    }

    service.delete(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
        None,
        "Earning deleted",
    )))
}

pub async fn get_summary(
    viewer: ViewerContext,
    service: web::Data<EarningsService>,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse, AppError> {
    let range = resolve_range(&query)?;
    let summary = service
        .summary_for(viewer.effective_member_id(), &range)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}

pub async fn get_team_dashboard(
    _viewer: ViewerContext,
    service: web::Data<EarningsService>,
) -> Result<HttpResponse, AppError> {
    let dashboard = service.team_dashboard(Utc::now().date_naive()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(dashboard)))
}
