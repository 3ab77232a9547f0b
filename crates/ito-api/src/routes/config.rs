//! Runtime settings routes

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use ito_core::{AppConfig, ItoConfig};

use crate::dto::ApiError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_config))
        .route("/ito", get(get_ito_config).put(set_ito_config))
}

/// GET /config - Current configuration
async fn get_config(State(state): State<AppState>) -> Json<AppConfig> {
    Json(state.config().await)
}

/// GET /config/ito - Calculator settings
async fn get_ito_config(State(state): State<AppState>) -> Json<ItoConfig> {
    Json(state.ito_config().await)
}

/// PUT /config/ito - Replace calculator settings
async fn set_ito_config(
    State(state): State<AppState>,
    Json(request): Json<ItoConfig>,
) -> Result<Json<ItoConfig>, (StatusCode, Json<ApiError>)> {
    state.set_ito_config(request).await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(e.error_code(), e.to_string())),
        )
    })?;

    Ok(Json(state.ito_config().await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ito_core::SliderOverflow;

    #[tokio::test]
    async fn test_update_then_read() {
        let state = AppState::new();
        let Json(updated) = set_ito_config(
            State(state.clone()),
            Json(ItoConfig {
                slider_overflow: SliderOverflow::Clamp,
                unlock_display_digits: 6,
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.slider_overflow, SliderOverflow::Clamp);

        let Json(config) = get_config(State(state)).await;
        assert_eq!(config.ito.unlock_display_digits, 6);
    }

    #[tokio::test]
    async fn test_invalid_update_is_400() {
        let (status, Json(error)) = set_ito_config(
            State(AppState::new()),
            Json(ItoConfig {
                slider_overflow: SliderOverflow::Reject,
                unlock_display_digits: 1000,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error.code, "invalid_settings");
    }
}
