use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::domain::QuotaResponse;
use super::quota::{self, ANNUAL_RATE_PERCENT};
use super::validation::validate;
use crate::error::AppError;
use crate::notify::{notification_for, Notifier};

/// State shared by the loan handlers: the outbound notification seam.
#[derive(Clone)]
pub struct LoanState {
    pub notifier: Arc<dyn Notifier>,
}

/// Router for the public loan endpoints.
pub fn loan_router(notifier: Arc<dyn Notifier>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/loan_cuota", post(loan_quota_endpoint))
        .route("/api-docs", get(api_docs))
        .with_state(LoanState { notifier })
}

async fn home() -> &'static str {
    "Microprestamos"
}

/// Validate the payload, compute the installment, dispatch the notification
/// and answer. The notification task is detached: the response never waits
/// on it and its failure is only logged.
pub(crate) async fn loan_quota_endpoint(
    State(state): State<LoanState>,
    Json(payload): Json<Value>,
) -> Response {
    let application = match validate(&payload) {
        Ok(application) => application,
        Err(errors) => {
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response();
        }
    };

    let quota = match quota::compute(
        application.amount as f64,
        ANNUAL_RATE_PERCENT,
        application.pay_time,
        application.frequency,
    ) {
        Ok(quota) => quota,
        Err(err) => return AppError::from(err).into_response(),
    };

    let notification = notification_for(&application, quota);
    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        match notifier.send(notification).await {
            Ok(()) => info!("notificación de solicitud enviada"),
            Err(err) => warn!(error = %err, "falló el envío de la notificación"),
        }
    });

    (StatusCode::OK, Json(QuotaResponse::build(&application, quota))).into_response()
}

/// Static OpenAPI document for the service. The legacy interactive schema
/// browser is out of scope; the schema itself stays discoverable.
async fn api_docs() -> Json<Value> {
    Json(json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Microprestamos api",
            "version": "1.0.0",
            "description": "API para calcular la cuota de un microprestamo que un cliente quiere solicitar y debe pagar mensualmente/quincenalmente."
        },
        "paths": {
            "/": {
                "get": {
                    "description": "Home page",
                    "responses": { "200": { "description": "A successful response" } }
                }
            },
            "/loan_cuota": {
                "post": {
                    "description": "Calcula la cuota de un prestamo",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "required": ["name", "email", "totalIngress", "sector", "workYears", "amount"],
                                    "properties": {
                                        "name": { "type": "string" },
                                        "email": { "type": "string", "format": "email" },
                                        "totalIngress": { "type": "number" },
                                        "sector": { "type": "string", "enum": ["publico", "privado"] },
                                        "workYears": { "type": "integer" },
                                        "amount": { "type": "integer", "minimum": 100, "maximum": 2000 },
                                        "frecuency": { "type": "string", "enum": ["mensual", "quincenal"], "default": "mensual" },
                                        "payTime": { "type": "integer", "default": 3 }
                                    }
                                },
                                "example": {
                                    "name": "Fredd",
                                    "email": "fredd.a14@hotmail.com",
                                    "totalIngress": 100000,
                                    "sector": "publico",
                                    "workYears": 5,
                                    "amount": 2000,
                                    "frecuency": "quincenal",
                                    "payTime": 24
                                }
                            }
                        }
                    },
                    "responses": {
                        "200": { "description": "Calculo realizado" },
                        "422": { "description": "Errores de validación por campo" }
                    }
                }
            }
        }
    }))
}
