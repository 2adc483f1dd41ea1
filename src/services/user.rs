use rusqlite::Connection;

use super::{on_unique, ServiceError, ServiceResult};
use crate::auth::{password, session};
use crate::config::AuthConfig;
use crate::db::models::User;
use crate::repositories::UserRepository;
use crate::schemas::user::{UserLogin, UserRegister};

const DEFAULT_ROLE: &str = "admin";
const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct UserService<'a> {
    conn: &'a Connection,
    auth: &'a AuthConfig,
}

impl<'a> UserService<'a> {
    pub fn new(conn: &'a Connection, auth: &'a AuthConfig) -> Self {
        Self { conn, auth }
    }

    pub fn register(&self, input: &UserRegister) -> ServiceResult<User> {
        input.validate()?;
        let users = UserRepository::new(self.conn);
        let duplicate = || ServiceError::Duplicate("User with this email already exists".into());

        if users.find_by_email(&input.email)?.is_some() {
            return Err(duplicate());
        }

        let name = match input.name.as_deref() {
            Some(name) => name,
            None => input.email.split('@').next().unwrap_or(&input.email),
        };
        let hash = password::hash(&input.password, self.auth.bcrypt_cost)?;
        let user = on_unique(
            users.insert(name, &input.email, &hash, DEFAULT_ROLE),
            duplicate,
        )?;

        tracing::info!(user_id = user.id, "Registered user");
        Ok(user)
    }

    /// Verify credentials and issue a bearer session token.
    pub fn login(&self, input: &UserLogin) -> ServiceResult<String> {
        let users = UserRepository::new(self.conn);

        let user = match users.find_by_email(&input.email)? {
            Some(user) if password::verify(&input.password, &user.password_hash) => user,
            found => {
                if found.is_none() {
                    password::verify_missing(&input.password, self.auth.bcrypt_cost);
                }
                tracing::warn!("Rejected login attempt");
                return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.into()));
            }
        };

        if !user.is_active {
            tracing::warn!(user_id = user.id, "Login attempt on inactive account");
            return Err(ServiceError::InactiveAccount(
                "User account is inactive".into(),
            ));
        }

        let tx = self.conn.unchecked_transaction()?;
        UserRepository::new(&tx).record_login(user.id)?;
        session::purge_expired(&tx)?;
        let token = session::create_session(&tx, user.id, self.auth.session_hours)?;
        tx.commit()?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok(token)
    }

    pub fn logout(&self, token: &str) -> ServiceResult<()> {
        session::delete_session(self.conn, token)?;
        Ok(())
    }

    /// Resolve a bearer token to an active user.
    pub fn authenticate(&self, token: &str) -> ServiceResult<User> {
        let unauthorized = || ServiceError::Unauthorized("Not authenticated".into());
        let user_id = session::session_user_id(self.conn, token)?.ok_or_else(unauthorized)?;
        match UserRepository::new(self.conn).find_by_id(user_id)? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(unauthorized()),
        }
    }
}
