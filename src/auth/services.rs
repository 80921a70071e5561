use tracing::{debug, warn};

use crate::{
    auth::{
        dto::{Credentials, PublicUser, Registration},
        password::{hash_password, verify_against_dummy, verify_password},
        repo_types::NewUser,
    },
    error::ApiError,
    store::{Store, StoreError},
};

const REGISTER_FAILED: &str = "Error registering user";
const LOGIN_FAILED: &str = "Error during login";

/// Hash the password and insert the user. Returns the new user id.
pub async fn register_user(store: &dyn Store, reg: Registration) -> Result<i64, ApiError> {
    let password_hash =
        hash_password(&reg.password).map_err(|e| ApiError::internal(REGISTER_FAILED, e))?;
    debug!(username = %reg.username, "password hashed");

    let new_user = NewUser {
        username: reg.username,
        email: reg.email,
        password_hash,
    };

    match store.create_user(new_user).await {
        Ok(id) => Ok(id),
        Err(StoreError::DuplicateUser) => {
            Err(ApiError::Conflict("Username or email already exists".into()))
        }
        Err(e) => Err(ApiError::internal(REGISTER_FAILED, e)),
    }
}

/// Check credentials. Unknown user and wrong password are indistinguishable.
pub async fn authenticate(store: &dyn Store, creds: Credentials) -> Result<PublicUser, ApiError> {
    let user = store
        .find_user_by_username(&creds.username)
        .await
        .map_err(|e| ApiError::internal(LOGIN_FAILED, e))?;

    let Some(user) = user else {
        verify_against_dummy(&creds.password);
        warn!(username = %creds.username, "login unknown username");
        return Err(ApiError::InvalidCredentials);
    };

    let ok = verify_password(&creds.password, &user.password)
        .map_err(|e| ApiError::internal(LOGIN_FAILED, e))?;
    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    Ok(PublicUser {
        id: user.id,
        username: user.username,
    })
}
