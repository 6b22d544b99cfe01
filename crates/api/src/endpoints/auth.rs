//! Registration and login endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    routing::post,
};
use rateit_common::{AppError, AppResult};
use rateit_core::{LoginInput, ProfilePicture, RegisterInput};
use rateit_db::entities::user::AccountType;
use tracing::debug;

use super::users::UserProfileResponse;
use crate::{extractors::ApiJson, middleware::AppState};

fn parse_account_type(raw: &str) -> AppResult<Option<AccountType>> {
    match raw.trim() {
        "" => Ok(None),
        s if s.eq_ignore_ascii_case("public") => Ok(Some(AccountType::Public)),
        s if s.eq_ignore_ascii_case("private") => Ok(Some(AccountType::Private)),
        other => Err(AppError::Validation(format!(
            "Unknown accountType '{other}', expected public or private"
        ))),
    }
}

fn multipart_error(e: impl std::fmt::Display) -> AppError {
    AppError::BadRequest(e.to_string())
}

/// Register a new user from a multipart form.
async fn register(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<UserProfileResponse>)> {
    let mut multipart = multipart.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let mut username = String::new();
    let mut email = String::new();
    let mut password = String::new();
    let mut bio: Option<String> = None;
    let mut account_type: Option<AccountType> = None;
    let mut picture: Option<ProfilePicture> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "profilePicture" => {
                let file_name = field.file_name().unwrap_or("avatar").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(multipart_error)?.to_vec();
                if !data.is_empty() {
                    picture = Some(ProfilePicture {
                        file_name,
                        content_type,
                        data,
                    });
                }
            }
            "username" => username = field.text().await.map_err(multipart_error)?,
            "email" => email = field.text().await.map_err(multipart_error)?,
            "password" => password = field.text().await.map_err(multipart_error)?,
            "bio" => {
                let text = field.text().await.map_err(multipart_error)?;
                if !text.trim().is_empty() {
                    bio = Some(text);
                }
            }
            "accountType" => {
                let text = field.text().await.map_err(multipart_error)?;
                account_type = parse_account_type(&text)?;
            }
            other => debug!(field = other, "Ignoring unknown registration field"),
        }
    }

    let input = RegisterInput {
        username,
        email,
        password,
        bio,
        account_type,
    };

    let user = state.user_service.register(input, picture).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Check a username and password.
async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginInput>,
) -> AppResult<Json<UserProfileResponse>> {
    let user = state.user_service.login(input).await?;
    Ok(Json(user.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_account_type() {
        assert_eq!(parse_account_type("").unwrap(), None);
        assert_eq!(
            parse_account_type("Private").unwrap(),
            Some(AccountType::Private)
        );
        assert_eq!(
            parse_account_type(" public ").unwrap(),
            Some(AccountType::Public)
        );
        assert!(matches!(
            parse_account_type("secret"),
            Err(AppError::Validation(_))
        ));
    }
}
