use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use anyhow::{Result, anyhow};
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::{AuthResponse, LoginInput, Member, MemberRole, RegisterInput};
use crate::database::repositories::MemberRepository;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // member id
    pub email: String,
    pub role: MemberRole,
    pub exp: usize, // expiration time
}

impl Claims {
    pub fn member_id(&self) -> Uuid {
        self.sub
    }

    pub fn is_admin(&self) -> bool {
        self.role == MemberRole::Admin
    }
}

fn decode_claims(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )?;

    Ok(token_data.claims)
}

impl FromRequest for Claims {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(config) = req.app_data::<Data<Config>>() else {
            log::error!("Config missing from app data; cannot validate tokens");
            return ready(Err(AppError::internal_server_error()));
        };

        let token = req
            .headers()
            .get("Authorization")
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "));

        let claims = token.and_then(|token| match decode_claims(token, &config.jwt_secret) {
            Ok(claims) => Some(claims),
            Err(e) => {
                log::debug!("Rejected bearer token: {}", e);
                None
            }
        });

        ready(claims.ok_or(AppError::Unauthorized))
    }
}

#[derive(Clone)]
pub struct AuthService {
    member_repository: MemberRepository,
    config: Config,
}

impl AuthService {
    pub fn new(config: Config, member_repository: MemberRepository) -> Self {
        Self {
            member_repository,
            config,
        }
    }

    /// Registers a member. The very first member becomes the admin so a fresh
    /// deployment can be bootstrapped without manual SQL.
    pub async fn register(&self, request: RegisterInput) -> Result<AuthResponse> {
        if self.member_repository.email_exists(&request.email).await? {
            return Err(anyhow!("Email already exists"));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)?;
        let role = if self.member_repository.count().await? == 0 {
            MemberRole::Admin
        } else {
            MemberRole::Member
        };

        let member = self
            .member_repository
            .create(&request.email, &request.display_name, &password_hash, role)
            .await?;
        log::info!("Registered member {} as {}", member.id, member.role);

        let token = self.issue_token(&member)?;
        Ok(AuthResponse {
            token,
            member: member.into(),
        })
    }

    pub async fn login(&self, request: LoginInput) -> Result<AuthResponse> {
        let member = self
            .member_repository
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| anyhow!("Invalid email or password"))?;

        if !verify(&request.password, &member.password_hash)? {
            return Err(anyhow!("Invalid email or password"));
        }

        let token = self.issue_token(&member)?;
        Ok(AuthResponse {
            token,
            member: member.into(),
        })
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        decode_claims(token, &self.config.jwt_secret)
    }

    pub fn issue_token(&self, member: &Member) -> Result<String> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::days(self.config.jwt_expiration_days))
            .ok_or_else(|| anyhow!("Token expiration overflows"))?
            .timestamp() as usize;

        let claims = Claims {
            sub: member.id,
            email: member.email.clone(),
            role: member.role,
            exp: expiration,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )?;

        Ok(token)
    }
}
