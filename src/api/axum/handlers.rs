//! HTTP handlers for the gate endpoints.

use axum::Form;
use axum::extract::State;
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use super::error::AppError;
use super::views;
use crate::api::LoginForm;
use crate::gate::{AuthGate, Challenge, GateResponse, Outcome, Page};

/// Landing page.
///
/// GET /
pub async fn index<C: Challenge>(
    State(gate): State<AuthGate<C>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    Ok(into_response(gate.index(&headers).await?))
}

/// Submit the access code.
///
/// POST /login
pub async fn login<C: Challenge>(
    State(gate): State<AuthGate<C>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let response = gate.login(&headers, &form.code, &form.username).await?;
    Ok(into_response(response))
}

/// GET /logout
pub async fn logout<C: Challenge>(
    State(gate): State<AuthGate<C>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    Ok(into_response(gate.logout(&headers).await?))
}

/// GET /secret
pub async fn secret<C: Challenge>(
    State(gate): State<AuthGate<C>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    Ok(into_response(gate.secret(&headers).await?))
}

/// Flash messages queued by earlier requests, shown once.
///
/// GET /forbidden
pub async fn forbidden<C: Challenge>(
    State(gate): State<AuthGate<C>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    Ok(into_response(gate.forbidden(&headers).await?))
}

fn into_response(gate_response: GateResponse) -> Response {
    let mut response = match &gate_response.outcome {
        Outcome::Redirect(location) => (
            StatusCode::FOUND,
            [(LOCATION, HeaderValue::from_static(*location))],
        )
            .into_response(),
        Outcome::Render(page) => Html(render(page)).into_response(),
    };

    for value in gate_response.set_cookies() {
        response.headers_mut().append(SET_COOKIE, value.clone());
    }
    response
}

fn render(page: &Page) -> String {
    match page {
        Page::Index(user) => views::index(user),
        Page::Secret { user_name } => views::secret(user_name),
        Page::Forbidden { messages } => views::forbidden(messages),
    }
}
