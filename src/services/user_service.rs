//! Staff accounts: IT registration/login and nurse management.
use std::sync::Arc;

use chrono::Duration;
use sqlx::PgPool;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::repos::user_repo::{self, NewUser, UserFilter, UserRow};
use crate::services::auth::{Role, TokenCodec, TokenError};
use crate::services::{new_id, password, password::PasswordError};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,
    #[error("NIP already exists")]
    NipAlreadyExists,
    #[error("password is not created")]
    PasswordNotCreated,
    #[error("wrong password")]
    WrongPassword,
    #[error(transparent)]
    Repo(RepoError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl From<RepoError> for UserError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => UserError::NipAlreadyExists,
            e => UserError::Repo(e),
        }
    }
}

/// A user together with a freshly issued access token, when one applies.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: UserRow,
    pub access_token: Option<String>,
}

#[derive(Clone, Debug)]
pub struct UserService {
    db: PgPool,
    tokens: Arc<TokenCodec>,
    token_ttl: Duration,
}

impl UserService {
    pub fn new(db: PgPool, tokens: Arc<TokenCodec>, token_ttl: Duration) -> Self {
        Self {
            db,
            tokens,
            token_ttl,
        }
    }

    fn issue(&self, user: &UserRow) -> Result<String, UserError> {
        Ok(self.tokens.issue(self.token_ttl, &user.id, user.user_type)?)
    }

    pub async fn register_it(
        &self,
        nip: i64,
        name: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, UserError> {
        let hashed = password::hash_blocking(password.to_string()).await?;
        let id = new_id();

        let user = user_repo::create(
            &self.db,
            &NewUser {
                id: &id,
                nip,
                name,
                user_type: Role::Operator,
                hashed_password: Some(&hashed),
                identity_card_url: None,
            },
        )
        .await?;

        let access_token = self.issue(&user)?;
        tracing::info!(user_id = %user.id, "IT user registered");

        Ok(AuthenticatedUser {
            user,
            access_token: Some(access_token),
        })
    }

    /// Nurses are created without a password; they cannot log in until an
    /// IT user grants access.
    pub async fn register_nurse(
        &self,
        nip: i64,
        name: &str,
        identity_card_url: &str,
    ) -> Result<UserRow, UserError> {
        let id = new_id();

        let user = user_repo::create(
            &self.db,
            &NewUser {
                id: &id,
                nip,
                name,
                user_type: Role::Caregiver,
                hashed_password: None,
                identity_card_url: Some(identity_card_url),
            },
        )
        .await?;

        tracing::info!(user_id = %user.id, "nurse registered");
        Ok(user)
    }

    /// Log in through the endpoint of `role`. A NIP belonging to the other
    /// role is reported as not found.
    pub async fn login(
        &self,
        role: Role,
        nip: i64,
        password: &str,
    ) -> Result<AuthenticatedUser, UserError> {
        let user = user_repo::get_by_nip(&self.db, nip)
            .await?
            .filter(|u| u.user_type == role)
            .ok_or(UserError::NotFound)?;

        let hashed = user
            .hashed_password
            .clone()
            .ok_or(UserError::PasswordNotCreated)?;

        if !password::matches_blocking(password.to_string(), hashed).await? {
            tracing::debug!(user_id = %user.id, "login rejected: wrong password");
            return Err(UserError::WrongPassword);
        }

        let access_token = self.issue(&user)?;
        Ok(AuthenticatedUser {
            user,
            access_token: Some(access_token),
        })
    }

    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<UserRow>, UserError> {
        Ok(user_repo::list(&self.db, filter).await?)
    }

    async fn get_nurse(&self, user_id: &str) -> Result<UserRow, UserError> {
        user_repo::get_by_id(&self.db, user_id)
            .await?
            .filter(|u| u.user_type == Role::Caregiver)
            .ok_or(UserError::NotFound)
    }

    pub async fn update_nurse(
        &self,
        user_id: &str,
        nip: i64,
        name: &str,
    ) -> Result<UserRow, UserError> {
        let nurse = self.get_nurse(user_id).await?;

        if let Some(holder) = user_repo::get_by_nip(&self.db, nip).await?
            && holder.id != nurse.id
        {
            return Err(UserError::NipAlreadyExists);
        }

        user_repo::update_profile(&self.db, &nurse.id, nip, name)
            .await?
            .ok_or(UserError::NotFound)
    }

    pub async fn delete_nurse(&self, user_id: &str) -> Result<(), UserError> {
        let nurse = self.get_nurse(user_id).await?;

        if !user_repo::delete(&self.db, &nurse.id).await? {
            return Err(UserError::NotFound);
        }
        tracing::info!(user_id = %nurse.id, "nurse deleted");
        Ok(())
    }

    pub async fn grant_nurse_access(&self, user_id: &str, password: &str) -> Result<(), UserError> {
        let nurse = self.get_nurse(user_id).await?;
        let hashed = password::hash_blocking(password.to_string()).await?;

        if !user_repo::set_password(&self.db, &nurse.id, &hashed).await? {
            return Err(UserError::NotFound);
        }
        tracing::info!(user_id = %nurse.id, "nurse access granted");
        Ok(())
    }
}
