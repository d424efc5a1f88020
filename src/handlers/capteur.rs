//! Sensor-console tables: `{metadata, data}` payloads.

use crate::describe::Screen;
use crate::error::AppError;
use crate::response::ok;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

async fn screen(state: &AppState, screen: Screen) -> Result<impl IntoResponse, AppError> {
    tracing::info!(screen = ?screen, "described table");
    let mut conn = state.pool.acquire().await?;
    let result = screen.load(&mut conn, &state.described_query()).await?;
    Ok(ok(result))
}

pub async fn users(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    screen(&state, Screen::Utilisateurs).await
}

pub async fn overloads(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    screen(&state, Screen::Overloads).await
}

pub async fn rights(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    screen(&state, Screen::Droits).await
}

pub async fn sensors(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    screen(&state, Screen::Capteurs).await
}
