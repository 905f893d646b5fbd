//! Accounts and sign-in.
//!
//! Password hashing is CPU-bound, so it runs on the blocking pool along with
//! the SQLite calls.

pub mod password;
pub mod session;

pub use session::{CurrentUser, session_token};

use crate::db::Database;
use crate::error::{ApiError, ApiResult};
use crate::types::{Session, User};
use crate::validation::Registration;
use std::sync::Arc;
use tracing::{info, warn};

/// Run blocking work off the async executor, flattening join and db errors.
pub(crate) async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::from)
}

/// Create an account. Fails with `AlreadyExists` when the email is taken.
pub async fn register(db: Arc<Database>, registration: Registration) -> ApiResult<User> {
    let user = blocking(move || {
        let hash = password::hash_password(&registration.password)?;
        db.create_user(&registration.name, &registration.email, &hash)
    })
    .await?;

    info!(user_id = %user.id, "User registered");
    Ok(user)
}

/// Check credentials and open a session.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(
    db: Arc<Database>,
    email: String,
    password: String,
    ttl_seconds: i64,
) -> ApiResult<(Session, User)> {
    blocking(move || {
        let purged = db.purge_expired_sessions()?;
        if purged > 0 {
            tracing::debug!(purged, "Purged expired sessions");
        }

        let Some((user, hash)) = db.find_credentials(&email)? else {
            warn!("Login failed: unknown email");
            return Err(ApiError::invalid_credentials().into());
        };
        if !password::verify_password(&password, &hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(ApiError::invalid_credentials().into());
        }

        let session = db.create_session(&user.id, ttl_seconds)?;
        info!(user_id = %user.id, "User logged in");
        Ok((session, user))
    })
    .await
}

/// Revoke a session token.
pub async fn logout(db: Arc<Database>, token: String) -> ApiResult<()> {
    let removed = blocking(move || db.delete_session(&token)).await?;
    tracing::debug!(removed, "Session revoked");
    Ok(())
}
