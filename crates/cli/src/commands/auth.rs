//! Authentication commands.

use shopfront_core::Email;
use tracing::info;

use shopfront_client::StoreApi;

use super::{CliError, emit, password};

/// Log in and print the profile fetched with the new token.
pub async fn login(api: &StoreApi, email: &str, password_flag: Option<String>) -> Result<(), CliError> {
    let email = Email::parse(email).map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    let secret = password(password_flag)?;

    let profile = api.auth().login_and_fetch_profile(&email, &secret).await?;
    info!(user_id = %profile.id, "Logged in");
    emit(&profile)
}
