//! Auth handlers.
//!
//! ```text
//! POST /api/auth/register -> 201 {"token": ..., "user": Profile}
//! POST /api/auth/login    -> 200 {"token": ..., "user": Profile}
//! ```
//!
//! Tokens are opaque bearer strings; how the client stores them is its own
//! concern.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Batch, CredentialsError, DomainError, LoginCredentials, Profile, Role, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::state::HttpState;

/// Registration request body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub age: u8,
    pub role: Role,
    pub batch: Option<Batch>,
    pub phone: String,
    pub emergency_contact: Option<String>,
    pub address: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token plus the profile it belongs to.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: Profile,
}

impl AuthResponse {
    fn new(token: impl ToString, user: &User) -> Self {
        Self {
            token: token.to_string(),
            user: user.profile().clone(),
        }
    }
}

/// Register an account and issue its first bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid profile", body = ApiError),
        (status = 409, description = "Username or email taken", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["auth"],
    operation_id = "register"
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        name,
        age,
        role,
        batch,
        phone,
        emergency_contact,
        address,
        username,
        email,
        password,
    } = payload.into_inner();
    let profile = Profile {
        name,
        age,
        role,
        batch,
        phone,
        emergency_contact,
        address,
        username,
        email,
    };
    let (token, user) = state.auth.register(profile, &password).await?;
    Ok(HttpResponse::Created().json(AuthResponse::new(token, &user)))
}

/// Authenticate by email and password.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse),
        (status = 400, description = "Malformed credentials", body = ApiError),
        (status = 401, description = "Invalid credentials", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let payload = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(payload.email, payload.password)
        .map_err(map_credentials_error)?;
    let (token, user) = state.auth.login(&credentials).await?;
    Ok(web::Json(AuthResponse::new(token, &user)))
}

fn map_credentials_error(error: CredentialsError) -> ApiError {
    let field = match error {
        CredentialsError::EmptyEmail => "email",
        CredentialsError::EmptyPassword => "password",
    };
    DomainError::invalid_request(error.to_string())
        .with_details(json!({ "field": field }))
        .into()
}
