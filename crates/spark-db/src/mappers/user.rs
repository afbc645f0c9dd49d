//! User entity <-> model mapper

use spark_core::entities::{Sex, User};
use spark_core::error::DomainError;
use spark_core::value_objects::{GeoPoint, Snowflake};

use crate::models::UserModel;

/// `sex` is free text in the row, so conversion can fail on corrupt data
impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        let sex: Sex = model
            .sex
            .parse()
            .map_err(|e: String| DomainError::StorageError(format!("user {}: {e}", model.id)))?;

        Ok(User {
            id: Snowflake::new(model.id),
            email: model.email,
            name: model.name,
            birthday: model.birthday,
            sex,
            location: GeoPoint::new(model.latitude, model.longitude),
            description: model.description,
            avatar: model.avatar,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Borrowed column values for `INSERT INTO users`
pub struct UserInsert<'a> {
    pub id: i64,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub name: &'a str,
    pub sex: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub description: &'a str,
    pub avatar: Option<&'a str>,
}

impl<'a> UserInsert<'a> {
    pub fn new(user: &'a User, password_hash: &'a str) -> Self {
        Self {
            id: user.id.into_inner(),
            email: &user.email,
            password_hash,
            name: &user.name,
            sex: user.sex.as_str(),
            latitude: user.location.latitude,
            longitude: user.location.longitude,
            description: &user.description,
            avatar: user.avatar.as_deref(),
        }
    }
}
