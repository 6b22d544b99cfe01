//! User service.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use rateit_common::{AppError, AppResult, Config, StorageBackend, generate_storage_key};
use rateit_db::{
    entities::user::{self, AccountType},
    repositories::UserRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use tracing::{info, warn};
use validator::{Validate, ValidationError};

/// Usernames: letters, digits, `_`, `-` and `.`, not starting with `.`.
pub(crate) fn validate_username(username: &str) -> Result<(), ValidationError> {
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !valid_chars || username.starts_with('.') {
        return Err(ValidationError::new("invalid_username"));
    }
    Ok(())
}

/// Input for registering a new user.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 64), custom(function = "validate_username"))]
    pub username: String,

    #[validate(email, length(max = 256))]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,

    #[validate(length(max = 2048))]
    pub bio: Option<String>,

    pub account_type: Option<AccountType>,
}

/// Input for logging in.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// A profile picture uploaded with a registration.
#[derive(Debug, Clone)]
pub struct ProfilePicture {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    storage: Arc<dyn StorageBackend>,
    max_upload_bytes: usize,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(
        user_repo: UserRepository,
        storage: Arc<dyn StorageBackend>,
        config: &Config,
    ) -> Self {
        Self {
            user_repo,
            storage,
            max_upload_bytes: config.storage.max_upload_bytes,
        }
    }

    /// Register a new user.
    pub async fn register(
        &self,
        input: RegisterInput,
        picture: Option<ProfilePicture>,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let email = input.email.trim().to_lowercase();

        if self.user_repo.exists(&input.username).await? {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        if let Some(picture) = &picture {
            if !picture.content_type.starts_with("image/") {
                return Err(AppError::Validation(
                    "Profile picture must be an image".to_string(),
                ));
            }
            if picture.data.len() > self.max_upload_bytes {
                return Err(AppError::Validation(format!(
                    "Profile picture exceeds {} bytes",
                    self.max_upload_bytes
                )));
            }
        }

        let password_hash = hash_password(&input.password)?;

        let stored = match picture.filter(|p| !p.data.is_empty()) {
            Some(picture) => {
                let key = generate_storage_key(&picture.file_name);
                Some(
                    self.storage
                        .upload(&key, &picture.data, &picture.content_type)
                        .await?,
                )
            }
            None => None,
        };

        let model = user::ActiveModel {
            username: Set(input.username.clone()),
            email: Set(email),
            password_hash: Set(password_hash),
            bio: Set(input.bio.filter(|b| !b.trim().is_empty())),
            account_type: Set(input.account_type.unwrap_or(AccountType::Public)),
            pfp: Set(stored.as_ref().map(|f| f.url.clone())),
            post_count: Set(0),
            created_at: Set(Utc::now().into()),
        };

        match self.user_repo.create(model).await {
            Ok(user) => {
                info!(username = %user.username, "Registered user");
                Ok(user)
            }
            Err(e) => {
                if let Some(file) = stored {
                    if let Err(cleanup) = self.storage.delete(&file.key).await {
                        warn!(
                            key = %file.key,
                            error = %cleanup,
                            "Failed to remove orphaned upload"
                        );
                    }
                }
                Err(e)
            }
        }
    }

    /// Authenticate a user by username and password.
    ///
    /// Unknown users and wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, input: LoginInput) -> AppResult<user::Model> {
        input.validate().map_err(|_| AppError::Unauthorized)?;

        let user = self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// List every user.
    pub async fn list(&self) -> AppResult<Vec<user::Model>> {
        self.user_repo.find_all().await
    }

    /// Get a user by username.
    pub async fn get(&self, username: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_username(username).await
    }
}

/// Hash a password with Argon2id and a random salt.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rateit_common::LocalStorage;
    use rateit_db::test_utils::TestDatabase;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> UserService {
        let dir = std::env::temp_dir().join("rateit-user-service-tests");
        UserService::new(
            UserRepository::new(db),
            Arc::new(LocalStorage::new(dir, "/uploads".to_string())),
            &Config::with_database_url("sqlite::memory:"),
        )
    }

    fn register_input(username: &str, email: &str) -> RegisterInput {
        RegisterInput {
            username: username.to_string(),
            email: email.to_string(),
            password: "pw1".to_string(),
            bio: Some("film nerd".to_string()),
            account_type: None,
        }
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("pw1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("pw1", &hash).unwrap());
        assert!(!verify_password("PW1", &hash).unwrap());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("a.b-c").is_ok());
        assert!(validate_username(".hidden").is_err());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username("../etc").is_err());
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service(db)
            .register(register_input("alice", "not-an-email"), None)
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let db = TestDatabase::new().await.unwrap();
        let users = service(db.connection());

        let user = users
            .register(register_input("alice", "Alice@Example.com"), None)
            .await
            .unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.account_type, AccountType::Public);
        assert_ne!(user.password_hash, "pw1");

        let logged_in = users
            .login(LoginInput {
                username: "alice".to_string(),
                password: "pw1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.username, "alice");
    }

    #[tokio::test]
    async fn test_register_duplicates_conflict() {
        let db = TestDatabase::new().await.unwrap();
        let users = service(db.connection());

        users
            .register(register_input("alice", "alice@example.com"), None)
            .await
            .unwrap();

        let same_name = users
            .register(register_input("alice", "other@example.com"), None)
            .await;
        assert!(matches!(same_name, Err(AppError::Conflict(_))));

        let same_email = users
            .register(register_input("bob", "ALICE@example.com"), None)
            .await;
        assert!(matches!(same_email, Err(AppError::Conflict(_))));

        assert_eq!(users.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let db = TestDatabase::new().await.unwrap();
        let users = service(db.connection());
        users
            .register(register_input("alice", "alice@example.com"), None)
            .await
            .unwrap();

        let wrong_password = users
            .login(LoginInput {
                username: "alice".to_string(),
                password: "PW1".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_user = users
            .login(LoginInput {
                username: "mallory".to_string(),
                password: "pw1".to_string(),
            })
            .await
            .unwrap_err();
        let wrong_case_user = users
            .login(LoginInput {
                username: "Alice".to_string(),
                password: "pw1".to_string(),
            })
            .await
            .unwrap_err();

        for err in [&wrong_password, &unknown_user, &wrong_case_user] {
            assert!(matches!(err, AppError::Unauthorized));
        }
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_register_stores_profile_picture() {
        let db = TestDatabase::new().await.unwrap();
        let users = service(db.connection());

        let user = users
            .register(
                register_input("carol", "carol@example.com"),
                Some(ProfilePicture {
                    file_name: "me.PNG".to_string(),
                    content_type: "image/png".to_string(),
                    data: vec![0x89, b'P', b'N', b'G'],
                }),
            )
            .await
            .unwrap();

        let pfp = user.pfp.unwrap();
        assert!(pfp.starts_with("/uploads/avatars/"));
        assert!(pfp.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_register_rejects_non_image_upload() {
        let db = TestDatabase::new().await.unwrap();
        let users = service(db.connection());

        let result = users
            .register(
                register_input("dave", "dave@example.com"),
                Some(ProfilePicture {
                    file_name: "notes.txt".to_string(),
                    content_type: "text/plain".to_string(),
                    data: b"hello".to_vec(),
                }),
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
