// Login details acquisition.
// Served from the long-lived cache entry, otherwise prompted for and saved.

use crate::backend::LoginDetails;
use crate::cache::{CacheKey, CacheStore, LOGIN_TTL};
use crate::error::Result;
use crate::ui::Prompter;

/// Load cached login details or ask the user for them.
/// Returns `Ok(None)` if the user cancels any of the prompts.
pub fn get_credentials<U: Prompter>(
    store: &CacheStore,
    prompter: &mut U,
) -> Result<Option<LoginDetails>> {
    let lookup = store.load::<LoginDetails>(&CacheKey::LoginDetails, LOGIN_TTL);
    if let Some(warning) = lookup.warning() {
        prompter.error(&warning);
    }
    if let Some(details) = lookup.into_data() {
        tracing::debug!(username = %details.username, "using cached login details");
        return Ok(Some(details));
    }

    prompter.info("Login details not found. Please provide them.");
    let Some(username) = prompter.text("Username:")? else {
        return Ok(None);
    };
    let Some(id) = prompter.text("ID:")? else {
        return Ok(None);
    };
    let Some(password) = prompter.password("Password:")? else {
        return Ok(None);
    };

    let details = LoginDetails {
        username,
        id,
        password,
    };
    store.save(&CacheKey::LoginDetails, &details)?;
    tracing::info!(username = %details.username, "saved login details");

    Ok(Some(details))
}
