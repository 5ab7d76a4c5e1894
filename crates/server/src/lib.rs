use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{
    ServerState, app, app_with_origins, cors_layer, run_with_listener, spawn_with_listener,
};

mod budget;
mod expenses;
mod interac;
mod server;
mod shop;
mod validate;
mod wallet;

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
    /// Failures outside the engine's own taxonomy. Logged, never echoed.
    Internal(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::IndexOutOfRange { .. } => StatusCode::NOT_FOUND,
        EngineError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::NoBudget
        | EngineError::UnknownCategory(_)
        | EngineError::ExceedsRemaining { .. }
        | EngineError::InsufficientFunds(_)
        | EngineError::InsufficientWalletBalance { .. }
        | EngineError::NoExpenses => StatusCode::BAD_REQUEST,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Store(store_err) => {
            tracing::error!("store error: {store_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
            ServerError::Internal(err) => {
                tracing::error!("{err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_index_out_of_range_maps_to_404() {
        let res = ServerError::from(EngineError::IndexOutOfRange { index: 3, len: 1 })
            .into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::InvalidInput("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn engine_rejections_map_to_400() {
        for err in [
            EngineError::NoBudget,
            EngineError::UnknownCategory("travel".to_string()),
            EngineError::ExceedsRemaining {
                amount: 2.0,
                remaining: 1.0,
            },
            EngineError::InsufficientFunds("x".to_string()),
            EngineError::InsufficientWalletBalance {
                balance: 0.0,
                required: 1.0,
            },
            EngineError::NoExpenses,
        ] {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn store_failure_maps_to_500() {
        let io = std::io::Error::other("disk full");
        let res = ServerError::from(EngineError::Store(io.into())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_maps_to_500() {
        let res = ServerError::Internal("join failed".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
