use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::{SaltString, rand_core::OsRng}};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use tokio_util::task::TaskTracker;
use tracing::{error, info};
use uuid::Uuid;

use jsi_db::Database;
use jsi_tools::Toolbox;
use jsi_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use jsi_types::models::Role;

use crate::error::{ApiError, JsonBody};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub toolbox: Toolbox,
    /// Background scan-log writes still in flight.
    pub audit_tasks: TaskTracker,
}

impl AppStateInner {
    pub fn new(db: Database, jwt_secret: String, token_ttl: chrono::Duration) -> Self {
        Self {
            db,
            jwt_secret,
            token_ttl,
            toolbox: Toolbox::standard(),
            audit_tasks: TaskTracker::new(),
        }
    }

    pub fn with_toolbox(mut self, toolbox: Toolbox) -> Self {
        self.toolbox = toolbox;
        self
    }
}

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let resp = register_user(&state, req).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(login_user(&state, req).await?))
}

pub async fn register_user(
    state: &AppState,
    req: RegisterRequest,
) -> Result<RegisterResponse, ApiError> {
    let (Some(username), Some(password)) = (
        req.username.filter(|u| !u.is_empty()),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::bad_request("Username and password required"));
    };
    let role = Role::self_assigned(req.role.as_deref());

    // Check if username is taken
    let db = state.clone();
    let name = username.clone();
    let existing = tokio::task::spawn_blocking(move || db.db.get_user_by_username(&name))
        .await
        .map_err(|e| ApiError::internal("Registration failed", e))?
        .map_err(|e| ApiError::internal("Registration failed", e))?;
    if existing.is_some() {
        return Err(ApiError::bad_request("Username already exists"));
    }

    // Hash password with Argon2id
    let password_hash = tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
    })
    .await
    .map_err(|e| ApiError::internal("Registration failed", e))?
    .map_err(|e| ApiError::internal("Registration failed", e))?;

    let user_id = Uuid::new_v4();
    let db = state.clone();
    let name = username.clone();
    let created = tokio::task::spawn_blocking(move || {
        db.db
            .create_user(&user_id.to_string(), &name, &password_hash, role.as_str())
    })
    .await
    .map_err(|e| ApiError::internal("Registration failed", e))?
    .map_err(|e| ApiError::internal("Registration failed", e))?;

    // Lost a race with a concurrent registration of the same name.
    if !created {
        return Err(ApiError::bad_request("Username already exists"));
    }

    info!("Registered user {} with role {}", username, role);
    Ok(RegisterResponse {
        message: "User registered successfully",
    })
}

pub async fn login_user(state: &AppState, req: LoginRequest) -> Result<LoginResponse, ApiError> {
    let (Some(username), Some(password)) = (req.username, req.password) else {
        return Err(ApiError::bad_request(INVALID_CREDENTIALS));
    };

    let db = state.clone();
    let user = tokio::task::spawn_blocking(move || db.db.get_user_by_username(&username))
        .await
        .map_err(|e| ApiError::internal("Login failed", e))?
        .map_err(|e| ApiError::internal("Login failed", e))?
        .ok_or_else(|| ApiError::bad_request(INVALID_CREDENTIALS))?;

    // Verify password
    let stored = user.password.clone();
    let verified = tokio::task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&stored)?;
        Ok::<_, argon2::password_hash::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
        )
    })
    .await
    .map_err(|e| ApiError::internal("Login failed", e))?
    .map_err(|e| {
        error!("Stored hash for {} is unreadable: {}", user.username, e);
        ApiError::internal("Login failed", e)
    })?;
    if !verified {
        return Err(ApiError::bad_request(INVALID_CREDENTIALS));
    }

    let user_id: Uuid = user.id.parse().map_err(|e| ApiError::internal("Login failed", e))?;
    let role = Role::from_stored(&user.role);

    let token = create_token(&state.jwt_secret, user_id, &user.username, role, state.token_ttl)
        .map_err(|e| ApiError::internal("Login failed", e))?;

    info!("User {} logged in", user.username);
    Ok(LoginResponse {
        token,
        username: user.username,
        role,
    })
}

pub fn create_token(
    secret: &str,
    user_id: Uuid,
    username: &str,
    role: Role,
    ttl: chrono::Duration,
) -> anyhow::Result<String> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        role,
        iat: now.timestamp() as usize,
        exp: (now + ttl).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
