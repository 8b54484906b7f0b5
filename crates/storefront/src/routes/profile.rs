//! Profile route handlers: view, store, and clear the visitor's credential.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::services::{ClearOutcome, CredentialStore};

/// Credentials form data.
#[derive(Deserialize)]
pub struct CredentialsForm {
    pub token: String,
    pub user_id: String,
}

impl std::fmt::Debug for CredentialsForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsForm")
            .field("token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile/show.html")]
pub struct ProfileTemplate {
    pub authenticated: bool,
    pub user_id: Option<String>,
}

/// Display the profile page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> ProfileTemplate {
    let store = CredentialStore::new(session);
    let auth = store.get_auth().await;

    ProfileTemplate {
        authenticated: store.is_authenticated().await,
        user_id: auth.map(|auth| auth.credential.user_id().to_string()),
    }
}

/// Store a bearer token and user id.
#[instrument(skip(session))]
pub async fn credentials(
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Redirect, AppError> {
    let token = form.token.trim();
    let user_id = form.user_id.trim();
    if token.is_empty() || user_id.is_empty() {
        return Err(AppError::BadRequest(
            "Token and user id are required".to_string(),
        ));
    }

    CredentialStore::new(session)
        .set_authorization(token, user_id)
        .await?;
    set_sentry_user(&user_id);
    tracing::info!(user_id, "Credentials stored");

    Ok(Redirect::to("/profile"))
}

/// Clear the stored credential.
///
/// Redirects to the catalog once both values are gone. If clearing gives up
/// after its retries, responds with no content and no navigation.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    match CredentialStore::new(session).clear_auth().await {
        ClearOutcome::Cleared => {
            clear_sentry_user();
            Redirect::to("/products").into_response()
        }
        ClearOutcome::GaveUp => StatusCode::NO_CONTENT.into_response(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_form_debug_redacts_token() {
        let form = CredentialsForm {
            token: "super-secret".to_string(),
            user_id: "3".to_string(),
        };
        let debug = format!("{form:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_profile_template_states() {
        let html = ProfileTemplate {
            authenticated: false,
            user_id: None,
        }
        .render()
        .unwrap();
        assert!(html.contains("Not signed in"));

        let html = ProfileTemplate {
            authenticated: true,
            user_id: Some("42".to_string()),
        }
        .render()
        .unwrap();
        assert!(html.contains("42"));
        assert!(html.contains("/profile/logout"));
    }
}
