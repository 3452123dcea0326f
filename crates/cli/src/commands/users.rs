//! User commands.

use secrecy::ExposeSecret;
use shopfront_core::{CreateUserDto, Email};
use tracing::info;

use shopfront_client::StoreApi;

use super::{CliError, emit, password};

/// Register a user.
pub async fn create(
    api: &StoreApi,
    name: String,
    email: &str,
    password_flag: Option<String>,
) -> Result<(), CliError> {
    let email = Email::parse(email).map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    let secret = password(password_flag)?;

    let user = api
        .users()
        .create(&CreateUserDto {
            name,
            email,
            password: secret.expose_secret().to_owned(),
            avatar: None,
        })
        .await?;
    info!(user_id = %user.id, "User created");
    emit(&user)
}

/// List users.
pub async fn list(api: &StoreApi) -> Result<(), CliError> {
    let users = api.users().list().await?;
    emit(&users)
}
