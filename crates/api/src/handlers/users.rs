//! Handlers for the `/users` resource: registration, login, logout, token
//! refresh, and account/profile management.

use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::response::AppendHeaders;
use axum::Json;
use serde::{Deserialize, Serialize};

use cliply_core::error::CoreError;
use cliply_core::validation::{normalize_identifier, required_field};
use cliply_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use cliply_db::repositories::{FollowRepo, PostRepo, UserRepo};

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::session::{self, TokenPair};
use crate::cookies::{
    build_clear_cookie, build_set_cookie, get_cookie, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /users/login`. Either identifier is accepted.
/// All fields are optional at the serde level so absence surfaces as the
/// standard 400 envelope rather than an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /users/refresh-token` (the token may come from
/// the cookie instead).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Request body for `POST /users/change-password`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Payload returned by login and refresh: the tokens are set as cookies
/// and echoed in the body for clients that store them locally.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

/// Channel profile returned by `GET /users/c/{username}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfile {
    #[serde(flatten)]
    pub user: UserResponse,
    pub follower_count: i64,
    pub following_count: i64,
    pub post_count: i64,
    pub is_following: bool,
}

/// One uploaded file pulled out of a multipart request.
struct UploadedFile {
    filename: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/users/register (multipart)
///
/// Text fields `fullName`, `email`, `username`, `password`; an `avatar`
/// file (required) and a `coverImage` file (optional).
pub async fn register(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    // 1. Pull fields and files out of the multipart stream.
    let mut full_name = None;
    let mut email = None;
    let mut username = None;
    let mut password = None;
    let mut avatar: Option<UploadedFile> = None;
    let mut cover_image: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "fullName" => full_name = Some(read_text(field).await?),
            "email" => email = Some(read_text(field).await?),
            "username" => username = Some(read_text(field).await?),
            "password" => password = Some(read_text(field).await?),
            "avatar" => avatar = Some(read_file(field, "avatar").await?),
            "coverImage" => cover_image = Some(read_file(field, "coverImage").await?),
            _ => {}
        }
    }

    // 2. Validate: every text field present and non-empty.
    let full_name = require(full_name.as_deref(), "fullName")?;
    let email = normalize_identifier(&require(email.as_deref(), "email")?);
    let username = normalize_identifier(&require(username.as_deref(), "username")?);
    let password = require(password.as_deref(), "password")?;
    validate_password_strength(&password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    // 3. Reject duplicate username or email up front.
    let existing =
        UserRepo::find_by_username_or_email(&state.pool, Some(&username), Some(&email)).await?;
    if existing.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "User with email or username already exists".into(),
        )));
    }

    // 4. Avatar is mandatory; the cover image is not.
    let avatar = avatar.ok_or_else(|| {
        AppError::Core(CoreError::Validation("Avatar file is required".into()))
    })?;

    // 5. Upload media before touching the database.
    let avatar_url = upload_file(&state, avatar).await?.url;
    let cover_image_url = match cover_image {
        Some(file) => Some(upload_file(&state, file).await?.url),
        None => None,
    };

    // 6. Hash the password and create the account.
    let password_hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let input = CreateUser {
        username,
        email,
        full_name,
        password_hash,
        avatar_url,
        cover_image_url,
    };
    let user = UserRepo::create(&state.pool, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            201,
            UserResponse::from(user),
            "User registered successfully",
        )),
    ))
}

/// POST /api/v1/users/login
///
/// Authenticate with username-or-email + password. On success, sets the
/// `accessToken` and `refreshToken` cookies and echoes both tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<(
    AppendHeaders<[(HeaderName, String); 2]>,
    Json<ApiResponse<SessionData>>,
)> {
    // 1. At least one identifier is required, and so is the password.
    let username = non_empty(input.username.as_deref()).map(normalize_identifier);
    let email = non_empty(input.email.as_deref()).map(normalize_identifier);
    if username.is_none() && email.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "Username or email is required".into(),
        )));
    }
    let password = require(input.password.as_deref(), "password")?;

    // 2. Verify the credential: 404 for an unknown account, 401 for a
    //    wrong password.
    let user = session::authenticate(
        &state.pool,
        username.as_deref(),
        email.as_deref(),
        &password,
    )
    .await?;

    // 3. Mint and persist a fresh token pair (rotation point).
    let pair = session::issue_token_pair(&state.pool, &user, &state.config.jwt).await?;

    Ok(session_response(user, pair, "User logged in successfully"))
}

/// POST /api/v1/users/refresh-token
///
/// Exchange a valid refresh token (cookie or body field) for a new pair.
/// The token just used becomes invalid immediately.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<(
    AppendHeaders<[(HeaderName, String); 2]>,
    Json<ApiResponse<SessionData>>,
)> {
    // 1. The token may arrive in the cookie or in a JSON body.
    let from_cookie = get_cookie(&headers, REFRESH_TOKEN_COOKIE);
    let from_body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice::<RefreshRequest>(&body)
            .ok()
            .and_then(|r| r.refresh_token)
    };

    let presented = from_cookie.or(from_body).ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("Unauthorized request".into()))
    })?;

    // 2. Verify, compare against the stored token, and rotate.
    let (pair, user) = session::refresh_session(&state.pool, &presented, &state.config.jwt).await?;

    Ok(session_response(user, pair, "Access token refreshed"))
}

/// POST /api/v1/users/logout
///
/// Clear the stored refresh token and both cookies.
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<(
    AppendHeaders<[(HeaderName, String); 2]>,
    Json<ApiResponse<serde_json::Value>>,
)> {
    session::logout(&state.pool, auth_user.user_id).await?;

    let headers = AppendHeaders([
        (SET_COOKIE, build_clear_cookie(ACCESS_TOKEN_COOKIE)),
        (SET_COOKIE, build_clear_cookie(REFRESH_TOKEN_COOKIE)),
    ]);

    Ok((
        headers,
        Json(ApiResponse::new(
            200,
            serde_json::json!({}),
            "User logged out",
        )),
    ))
}

/// POST /api/v1/users/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let user = find_account(&state, auth_user.user_id).await?;

    let old_valid = verify_password(&input.old_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !old_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid old password".into(),
        )));
    }

    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;

    Ok(Json(ApiResponse::new(
        200,
        serde_json::json!({}),
        "Password changed successfully",
    )))
}

/// GET /api/v1/users/current-user
pub async fn current_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = find_account(&state, auth_user.user_id).await?;

    Ok(Json(ApiResponse::new(
        200,
        UserResponse::from(user),
        "Current user fetched successfully",
    )))
}

/// PATCH /api/v1/users/update-account
///
/// Patch `fullName` and/or `email`.
pub async fn update_account(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(mut input): Json<UpdateUser>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    if input.full_name.is_none() && input.email.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "At least one field is required".into(),
        )));
    }
    input.email = input.email.as_deref().map(normalize_identifier);

    let user = UserRepo::update_account(&state.pool, auth_user.user_id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound("User does not exist".into())))?;

    Ok(Json(ApiResponse::new(
        200,
        UserResponse::from(user),
        "Account details updated successfully",
    )))
}

/// PATCH /api/v1/users/avatar (multipart, single `avatar` file)
pub async fn update_avatar(
    State(state): State<AppState>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let file = single_file(multipart, "avatar").await?;
    let uploaded = upload_file(&state, file).await?;

    let user = UserRepo::update_avatar(&state.pool, auth_user.user_id, &uploaded.url)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound("User does not exist".into())))?;

    Ok(Json(ApiResponse::new(
        200,
        UserResponse::from(user),
        "Avatar updated successfully",
    )))
}

/// PATCH /api/v1/users/cover-image (multipart, single `coverImage` file)
pub async fn update_cover_image(
    State(state): State<AppState>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let file = single_file(multipart, "coverImage").await?;
    let uploaded = upload_file(&state, file).await?;

    let user = UserRepo::update_cover_image(&state.pool, auth_user.user_id, &uploaded.url)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound("User does not exist".into())))?;

    Ok(Json(ApiResponse::new(
        200,
        UserResponse::from(user),
        "Cover image updated successfully",
    )))
}

/// GET /api/v1/users/c/{username}
///
/// Channel profile: the public user fields plus follower/following/post
/// counts and whether the caller follows the channel.
pub async fn channel_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(username): Path<String>,
) -> AppResult<Json<ApiResponse<ChannelProfile>>> {
    let channel = UserRepo::find_by_username(&state.pool, &normalize_identifier(&username))
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound("Channel does not exist".into())))?;

    let follower_count = FollowRepo::follower_count(&state.pool, channel.id).await?;
    let following_count = FollowRepo::following_count(&state.pool, channel.id).await?;
    let post_count = PostRepo::count_for_owner(&state.pool, channel.id).await?;
    let is_following =
        FollowRepo::is_following(&state.pool, auth_user.user_id, channel.id).await?;

    let profile = ChannelProfile {
        user: UserResponse::from(channel),
        follower_count,
        following_count,
        post_count,
        is_following,
    };

    Ok(Json(ApiResponse::new(
        200,
        profile,
        "Channel profile fetched successfully",
    )))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build the login/refresh response: both cookies plus the echoed tokens.
fn session_response(
    user: User,
    pair: TokenPair,
    message: &str,
) -> (
    AppendHeaders<[(HeaderName, String); 2]>,
    Json<ApiResponse<SessionData>>,
) {
    let headers = AppendHeaders([
        (
            SET_COOKIE,
            build_set_cookie(ACCESS_TOKEN_COOKIE, &pair.access_token),
        ),
        (
            SET_COOKIE,
            build_set_cookie(REFRESH_TOKEN_COOKIE, &pair.refresh_token),
        ),
    ]);

    let data = SessionData {
        user: UserResponse::from(user),
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    };

    (headers, Json(ApiResponse::new(200, data, message)))
}

/// Load the authenticated account, mapping a vanished row to 404.
async fn find_account(state: &AppState, user_id: cliply_core::types::DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound("User does not exist".into())))
}

/// Required-field check mapped into the 400 error class.
fn require(value: Option<&str>, field: &str) -> AppResult<String> {
    required_field(value, field).map_err(|msg| AppError::Core(CoreError::Validation(msg)))
}

/// Treat absent and whitespace-only strings alike.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Read a multipart text field.
async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {e}")))
}

/// Read a multipart file field into memory.
async fn read_file(
    field: axum::extract::multipart::Field<'_>,
    fallback_name: &str,
) -> AppResult<UploadedFile> {
    let filename = field
        .file_name()
        .unwrap_or(fallback_name)
        .to_string();
    let content_type = field.content_type().map(str::to_string);
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {e}")))?
        .to_vec();

    Ok(UploadedFile {
        filename,
        content_type,
        bytes,
    })
}

/// Extract exactly one named file from a multipart request.
async fn single_file(mut multipart: Multipart, name: &str) -> AppResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() == Some(name) {
            return read_file(field, name).await;
        }
    }
    Err(AppError::Core(CoreError::Validation(format!(
        "{name} file is required"
    ))))
}

/// Push a file to the media store.
async fn upload_file(state: &AppState, file: UploadedFile) -> AppResult<cliply_media::UploadedMedia> {
    let uploaded = state
        .media
        .upload(&file.filename, file.content_type.as_deref(), file.bytes)
        .await?;
    Ok(uploaded)
}
