//! Axum request handlers for all service endpoints.

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::{
    protocol::{
        AnswersResponse, ErrorResponse, FormListResponse, HealthResponse, SetAnswerRequest,
    },
    ServiceError,
};
use serde_json::Value;
use tracing::info;

use super::{error::ApiError, state::AppState};
use crate::forms::{FormDefinition, PdfFieldValues, RegistryError};

/// `GET /health`: liveness and readiness check.
///
/// Returns `200 OK` when at least one form is registered. The device key is
/// loaded lazily, so `key_ready` is informational.
pub async fn health(State(state): State<AppState>) -> Response {
    let key_ready = state.keys.is_ready();
    let forms_registered = state.forms.len();

    let (status_code, status_str) = if forms_registered > 0 {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status: status_str.into(),
        key_ready,
        forms_registered,
    };
    (status_code, Json(body)).into_response()
}

/// `GET /forms`: every supported form.
pub async fn list_forms(State(state): State<AppState>) -> Json<FormListResponse> {
    Json(FormListResponse {
        forms: state.forms.list(),
    })
}

/// `GET /answers`: decrypt every stored answer.
///
/// Unreadable fields are reported in `failedFields` and left out of
/// `answers`; the rest are still returned.
pub async fn get_answers(State(state): State<AppState>) -> Result<Json<AnswersResponse>, ApiError> {
    let key = state.keys.get_or_create_key().await?;
    let loaded = state.vault.load(&key).await?;

    let mut answers = serde_json::to_value(&loaded.answers)
        .map_err(|e| ServiceError::Internal(format!("answers could not be serialised: {e}")))?;
    if let Value::Object(map) = &mut answers {
        map.retain(|_, v| !v.is_null());
    }

    Ok(Json(AnswersResponse {
        answers,
        failed_fields: loaded.failed_fields,
    }))
}

/// `PUT /answers/:field`: encrypt and store one answer.
pub async fn put_answer(
    State(state): State<AppState>,
    Path(field): Path<String>,
    Json(req): Json<SetAnswerRequest>,
) -> Result<StatusCode, ApiError> {
    let key = state.keys.get_or_create_key().await?;
    state.vault.submit(&field, &req.value, &key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /forms/:jurisdiction/:code/preview`: the mapped field values, without a template.
pub async fn preview_form(
    State(state): State<AppState>,
    Path((jurisdiction, code)): Path<(String, String)>,
) -> Result<Json<PdfFieldValues>, ApiError> {
    let form = resolve_form(&state, &jurisdiction, &code)?;
    let key = state.keys.get_or_create_key().await?;
    let answers = state.vault.load(&key).await?.into_complete()?;
    Ok(Json(form.map(&answers)))
}

/// `POST /forms/:jurisdiction/:code/fill`: the filled PDF.
///
/// Refuses with `422` if any stored answer is unreadable. The assembly is
/// cancelled if the service starts shutting down.
pub async fn fill_form(
    State(state): State<AppState>,
    Path((jurisdiction, code)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let form = resolve_form(&state, &jurisdiction, &code)?;
    let key = state.keys.get_or_create_key().await?;
    let answers = state.vault.load(&key).await?.into_complete()?;

    let cancel = state.shutdown.child_token();
    let pdf = state.assembler.fill_pdf(&form, &answers, &cancel).await?;

    let disposition = format!("attachment; filename=\"{}.pdf\"", attachment_name(&form));
    let disposition = HeaderValue::from_str(&disposition)
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response())
}

/// `POST /session/sign-out`: drop the in-memory device key.
///
/// The persisted key is kept, so the next request reloads it.
pub async fn sign_out(State(state): State<AppState>) -> StatusCode {
    state.keys.invalidate().await;
    info!("session signed out");
    StatusCode::NO_CONTENT
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

/// Accept either the printed code (`cjp27`) or the ID's slug
/// (`cjp27-petition-to-change-name-of-adult`).
fn resolve_form(
    state: &AppState,
    jurisdiction: &str,
    code: &str,
) -> Result<FormDefinition, RegistryError> {
    if let Some(form) = state.forms.find(jurisdiction, code) {
        return Ok(*form);
    }
    state.forms.get(&format!("{jurisdiction}/{code}")).copied()
}

fn attachment_name(form: &FormDefinition) -> &str {
    form.id.rsplit('/').next().unwrap_or(form.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::{AnswerStore, AnswerVault, MemoryAnswerStore};
    use crate::assembler::fixtures::{template, FixtureField, CJP27_FIELDS, CJP34_FIELDS};
    use crate::assembler::MemoryTemplateSource;
    use crate::forms::ma::{cjp27, cjp34};
    use crate::server::router;
    use axum_test::TestServer;
    use common::protocol::{EncryptedAnswer, FormListResponse};
    use serde_json::json;
    use std::sync::Arc;

    fn templates() -> MemoryTemplateSource {
        let mut src = MemoryTemplateSource::new();
        src.insert(cjp34::DEFINITION.pdf_template_ref, template(CJP34_FIELDS));
        src.insert(cjp27::DEFINITION.pdf_template_ref, template(CJP27_FIELDS));
        src
    }

    fn server_with(state: AppState) -> TestServer {
        TestServer::new(router::build(state)).unwrap()
    }

    fn server() -> TestServer {
        server_with(AppState::for_tests(templates()))
    }

    #[tokio::test]
    async fn health_reports_registered_forms() {
        let server = server();
        let resp = server.get("/health").await;
        assert_eq!(resp.status_code(), StatusCode::OK);
        let body: HealthResponse = resp.json();
        assert_eq!(body.status, "ok");
        assert_eq!(body.forms_registered, 2);
        assert!(!body.key_ready);
    }

    #[tokio::test]
    async fn lists_builtin_forms() {
        let server = server();
        let body: FormListResponse = server.get("/forms").await.json();
        let codes: Vec<_> = body.forms.iter().map(|f| f.code.as_str()).collect();
        assert!(codes.contains(&"CJP 27"));
        assert!(codes.contains(&"CJP 34"));
    }

    #[tokio::test]
    async fn answers_round_trip_through_the_vault() {
        let server = server();
        let resp = server
            .put("/answers/oldFirstName")
            .json(&json!({"value": "Old"}))
            .await;
        assert_eq!(resp.status_code(), StatusCode::NO_CONTENT);
        server
            .put("/answers/pronouns")
            .json(&json!({"value": ["they", "them"]}))
            .await;

        let body: AnswersResponse = server.get("/answers").await.json();
        assert_eq!(
            body.answers,
            json!({"oldFirstName": "Old", "pronouns": ["they", "them"]})
        );
        assert!(body.failed_fields.is_empty());
    }

    #[tokio::test]
    async fn unknown_answer_field_is_rejected() {
        let server = server();
        let resp = server
            .put("/answers/shoeSize")
            .json(&json!({"value": "11"}))
            .await;
        assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = resp.json();
        assert_eq!(body.code, "bad_request");
    }

    #[tokio::test]
    async fn mistyped_answer_is_rejected() {
        let server = server();
        let resp = server
            .put("/answers/hasPreviousNameChange")
            .json(&json!({"value": "maybe"}))
            .await;
        assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn preview_by_code_returns_mapped_values() {
        let server = server();
        server
            .put("/answers/oldFirstName")
            .json(&json!({"value": "Old"}))
            .await;
        server
            .put("/answers/oldLastName")
            .json(&json!({"value": "Name"}))
            .await;

        let values: Value = server.get("/forms/ma/cjp34/preview").await.json();
        assert_eq!(values["oldName"], json!("Old Name"));
        assert_eq!(values["isChangeOfNameProceeding"], json!(true));
    }

    #[tokio::test]
    async fn preview_accepts_the_id_slug() {
        let server = server();
        let resp = server
            .get("/forms/ma/cjp27-petition-to-change-name-of-adult/preview")
            .await;
        assert_eq!(resp.status_code(), StatusCode::OK);
        let values: Value = resp.json();
        assert_eq!(values["county"], json!("Middlesex"));
    }

    #[tokio::test]
    async fn unknown_form_is_404() {
        let server = server();
        let resp = server.post("/forms/ny/cjp27/fill").await;
        assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn fill_returns_a_pdf_attachment() {
        let server = server();
        server
            .put("/answers/newFirstName")
            .json(&json!({"value": "New"}))
            .await;

        let resp = server.post("/forms/ma/cjp34/fill").await;
        assert_eq!(resp.status_code(), StatusCode::OK);
        assert_eq!(resp.header("content-type"), "application/pdf");
        assert_eq!(
            resp.header("content-disposition"),
            "attachment; filename=\"cjp34-cori-and-wanted-persons-request.pdf\""
        );
        assert!(resp.as_bytes().starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn fill_without_template_is_500() {
        let server = server_with(AppState::for_tests(MemoryTemplateSource::new()));
        let resp = server.post("/forms/ma/cjp34/fill").await;
        assert_eq!(resp.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = resp.json();
        assert_eq!(body.code, "internal_error");
    }

    #[tokio::test]
    async fn template_drift_is_422() {
        let mut src = MemoryTemplateSource::new();
        src.insert(
            cjp34::DEFINITION.pdf_template_ref,
            template(&[FixtureField::Text("oldName")]),
        );
        let server = server_with(AppState::for_tests(src));
        let resp = server.post("/forms/ma/cjp34/fill").await;
        assert_eq!(resp.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn fill_refuses_when_an_answer_is_unreadable() {
        let store = Arc::new(MemoryAnswerStore::new());
        let mut state = AppState::for_tests(templates());
        state.vault = AnswerVault::new(store.clone());
        let server = server_with(state);
        server
            .put("/answers/oldFirstName")
            .json(&json!({"value": "Old"}))
            .await;
        // Overwrite with a ciphertext that cannot authenticate.
        store
            .set(EncryptedAnswer {
                field: "email".into(),
                ciphertext: "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".into(),
            })
            .await
            .unwrap();

        let listed: AnswersResponse = server.get("/answers").await.json();
        assert_eq!(listed.failed_fields, vec!["email".to_owned()]);
        assert_eq!(listed.answers, json!({"oldFirstName": "Old"}));

        let resp = server.post("/forms/ma/cjp34/fill").await;
        assert_eq!(resp.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorResponse = resp.json();
        assert!(body.message.contains("email"));
    }

    #[tokio::test]
    async fn fill_is_refused_after_shutdown() {
        let state = AppState::for_tests(templates());
        state.shutdown.cancel();
        let server = server_with(state);
        let resp = server.post("/forms/ma/cjp34/fill").await;
        assert_eq!(resp.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn sign_out_drops_the_cached_key() {
        let state = AppState::for_tests(templates());
        let server = server_with(state.clone());
        server
            .put("/answers/email")
            .json(&json!({"value": "a@example.org"}))
            .await;
        assert!(state.keys.is_ready());

        let resp = server.post("/session/sign-out").await;
        assert_eq!(resp.status_code(), StatusCode::NO_CONTENT);
        assert!(!state.keys.is_ready());

        // The persisted key reloads and the answer still decrypts.
        let body: AnswersResponse = server.get("/answers").await.json();
        assert_eq!(body.answers, json!({"email": "a@example.org"}));
    }
}
