//! User business logic - lookups, profile updates, and deletion.
//!
//! Account creation lives in [`crate::core::auth::register`].

use crate::{
    core::auth::{Authenticator, email_conflict, is_valid_email, validate_password},
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};

/// Profile update payload. Name and email are always overwritten; role and password only
/// when supplied.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    /// New display name
    pub name: String,
    /// New login email
    pub email: String,
    /// New role, if changing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// New plaintext password, if changing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Retrieves all users ordered by id.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a user by id.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a user by exact email.
pub async fn get_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(email.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Updates a user's profile.
///
/// # Errors
/// Returns an error if:
/// - The user does not exist
/// - The name is blank, the email is malformed, or a new password is too short
/// - The email belongs to another user
/// - The database update fails
pub async fn update_user(
    db: &DatabaseConnection,
    auth: &Authenticator,
    user_id: i64,
    update: UserUpdate,
) -> Result<user::Model> {
    let existing = User::find_by_id(user_id).one(db).await?.ok_or(Error::NotFound {
        entity: "User",
        id: user_id,
    })?;

    let email = update.email.trim().to_string();
    if update.name.trim().is_empty() {
        return Err(Error::validation("Name cannot be empty"));
    }
    if !is_valid_email(&email) {
        return Err(Error::validation("Invalid email format"));
    }
    if email != existing.email {
        if let Some(other) = get_user_by_email(db, &email).await? {
            if other.id != user_id {
                return Err(Error::DuplicateEmail { email });
            }
        }
    }

    let mut user: user::ActiveModel = existing.into();
    user.name = Set(update.name.trim().to_string());
    user.email = Set(email.clone());
    if let Some(role) = update
        .role
        .map(|role| role.trim().to_string())
        .filter(|role| !role.is_empty())
    {
        user.role = Set(role);
    }
    if let Some(password) = update.password {
        validate_password(&password)?;
        user.password = Set(auth.hash_password(password).await?);
    }

    user.update(db)
        .await
        .map_err(|e| email_conflict(e, &email))
}

/// Hard deletes a user. Their orders keep the dangling `user_id`.
///
/// # Errors
/// Returns an error if the user does not exist or the delete fails.
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let result = User::delete_by_id(user_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "User",
            id: user_id,
        });
    }
    Ok(())
}
