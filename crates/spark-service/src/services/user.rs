//! User service
//!
//! Sign-up, sign-in, profile reads and edits, and avatar uploads.

use std::path::Path;

use spark_core::entities::{User, UserPatch};
use spark_core::{DomainError, GeoPoint, Snowflake};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{SignInRequest, SignUpRequest, UpdateProfileRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Avatar extensions accepted on upload
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn sign_up(&self, request: SignUpRequest) -> ServiceResult<User> {
        let email = normalize_email(&request.email);
        let location = GeoPoint::new(request.latitude, request.longitude);
        if !location.is_valid() {
            return Err(DomainError::InvalidLocation.into());
        }

        if self.ctx.user_repo().find_by_email(&email).await?.is_some() {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let password_hash = self.ctx.password_service().hash(&request.password)?;

        let mut user = User::new(
            self.ctx.generate_id(),
            email,
            request.name.trim().to_string(),
            request.birthday,
            request.sex,
            location,
        );
        if let Some(description) = request.description {
            user.description = description;
        }

        // The unique index still guards against a concurrent sign-up
        self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Check credentials and return the user's id
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn sign_in(&self, request: SignInRequest) -> ServiceResult<Snowflake> {
        let email = normalize_email(&request.email);
        let user = self
            .ctx
            .user_repo()
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                warn!("Sign-in failed: unknown email");
                DomainError::InvalidCredentials
            })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        self.ctx
            .password_service()
            .verify_or_reject(&request.password, &password_hash)
            .inspect_err(|_| warn!(user_id = %user.id, "Sign-in failed: wrong password"))?;

        info!(user_id = %user.id, "User signed in");
        Ok(user.id)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id).into())
    }

    /// Change only the fields present in `request`
    ///
    /// A lone latitude or longitude keeps the other coordinate.
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: Snowflake,
        request: UpdateProfileRequest,
    ) -> ServiceResult<User> {
        let mut user = self.get(user_id).await?;

        let location = match (request.latitude, request.longitude) {
            (None, None) => None,
            (latitude, longitude) => {
                let point = GeoPoint::new(
                    latitude.unwrap_or(user.location.latitude),
                    longitude.unwrap_or(user.location.longitude),
                );
                if !point.is_valid() {
                    return Err(DomainError::InvalidLocation.into());
                }
                Some(point)
            }
        };

        let patch = UserPatch {
            name: request.name.map(|name| name.trim().to_string()),
            birthday: request.birthday,
            sex: request.sex,
            location,
            description: request.description,
        };
        if patch.is_empty() {
            return Ok(user);
        }

        user.apply(patch);
        self.ctx.user_repo().update(&user).await?;

        info!(user_id = %user_id, "Profile updated");
        Ok(user)
    }

    /// Store a new avatar and delete the one it replaces
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn set_avatar(
        &self,
        user_id: Snowflake,
        filename: &str,
        bytes: &[u8],
    ) -> ServiceResult<User> {
        let media = self.ctx.media();
        if bytes.len() > media.max_upload_bytes {
            return Err(ServiceError::PayloadTooLarge {
                max: media.max_upload_bytes,
            });
        }
        if bytes.is_empty() {
            return Err(ServiceError::validation("avatar file is empty"));
        }
        let sanitized = sanitize_filename(filename)?;

        let mut user = self.get(user_id).await?;

        let stored = format!("{}_{sanitized}", Uuid::new_v4());
        tokio::fs::create_dir_all(&media.upload_dir).await?;
        let path = media.upload_dir.join(&stored);
        tokio::fs::write(&path, bytes).await?;

        let previous = user.replace_avatar(stored);
        if let Err(e) = self.ctx.user_repo().update(&user).await {
            remove_quietly(&path).await;
            return Err(e.into());
        }

        if let Some(previous) = previous.filter(|name| is_plain_file_name(name)) {
            remove_quietly(&media.upload_dir.join(previous)).await;
        }

        info!(user_id = %user_id, avatar = ?user.avatar, "Avatar replaced");
        Ok(user)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Keep the last path component and replace anything unusual with `_`
fn sanitize_filename(filename: &str) -> ServiceResult<String> {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let extension = Path::new(base)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| {
            ServiceError::validation(format!(
                "avatar must be one of: {}",
                IMAGE_EXTENSIONS.join(", ")
            ))
        })?;

    let stem: String = Path::new(base)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect();

    Ok(format!("{stem}.{extension}"))
}

fn is_plain_file_name(name: &str) -> bool {
    Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name)
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "Failed to remove avatar file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("me.PNG").unwrap(), "me.png");
        assert_eq!(
            sanitize_filename("../../etc/my photo.jpg").unwrap(),
            "my_photo.jpg"
        );
        assert_eq!(sanitize_filename("C:\\pics\\a.webp").unwrap(), "a.webp");
        assert_eq!(sanitize_filename("фото.jpg").unwrap(), "____.jpg");
        assert!(sanitize_filename("script.sh").is_err());
        assert!(sanitize_filename("noext").is_err());
    }

    #[test]
    fn test_plain_file_name() {
        assert!(is_plain_file_name("abc_me.png"));
        assert!(!is_plain_file_name("../secret"));
        assert!(!is_plain_file_name("dir/file.png"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ann@Example.COM "), "ann@example.com");
    }
}
