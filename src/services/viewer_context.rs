use actix_web::{FromRequest, HttpRequest, dev::Payload};
use std::future::{Ready, ready};
use uuid::Uuid;

use crate::error::AppError;
use crate::services::auth::Claims;

/// Header an admin sets to inspect another member's data.
pub const VIEWED_USER_HEADER: &str = "X-Viewed-User";

/// The authenticated member plus the optional viewed-user override.
/// Authentication identity never changes; only reads are redirected.
#[derive(Debug, Clone)]
pub struct ViewerContext {
    pub claims: Claims,
    pub viewed_user: Option<Uuid>,
}

impl ViewerContext {
    pub fn member_id(&self) -> Uuid {
        self.claims.member_id()
    }

    pub fn is_admin(&self) -> bool {
        self.claims.is_admin()
    }

    /// Whose data reads should return.
    pub fn effective_member_id(&self) -> Uuid {
        self.viewed_user.unwrap_or_else(|| self.member_id())
    }

    pub fn is_viewing_other(&self) -> bool {
        self.viewed_user.is_some_and(|id| id != self.member_id())
    }

    /// Members act on records they own or authored; admins on any record.
    pub fn can_modify(&self, owner_id: Uuid, author_id: Uuid) -> bool {
        self.is_admin() || self.member_id() == owner_id || self.member_id() == author_id
    }

    fn resolve(claims: Claims, header: Option<&str>) -> Result<Self, AppError> {
        let Some(raw) = header else {
            return Ok(Self {
                claims,
                viewed_user: None,
            });
        };

        let viewed = raw.trim().parse::<Uuid>().map_err(|_| {
            AppError::BadRequest(format!("{} must be a member id", VIEWED_USER_HEADER))
        })?;

        if viewed != claims.member_id() && !claims.is_admin() {
            return Err(AppError::Forbidden(
                "Only admins can view other members".to_string(),
            ));
        }

        Ok(Self {
            claims,
            viewed_user: Some(viewed),
        })
    }
}

impl FromRequest for ViewerContext {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let claims = match Claims::from_request(req, payload).into_inner() {
            Ok(claims) => claims,
            Err(e) => return ready(Err(e)),
        };

        let header = req
            .headers()
            .get(VIEWED_USER_HEADER)
            .and_then(|value| value.to_str().ok());

        ready(Self::resolve(claims, header))
    }
}
