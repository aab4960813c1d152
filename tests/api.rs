mod support;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::json;
use support::*;
use tower::ServiceExt;
use vetclinic::model::ANIMAL_TABLE;

async fn seed(app: &axum::Router) -> (i64, i64) {
    let (status, animal) = post(app, "/animais", json!({"nome": "Rex", "especie": "dog"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, vet) = post(app, "/veterinarios", json!({"nome": "Dra. Ana"})).await;
    assert_eq!(status, StatusCode::CREATED);
    (id_of(&animal), id_of(&vet))
}

#[tokio::test]
async fn consultation_scenario_embeds_animal() {
    let (app, _) = app();
    let (animal_id, vet_id) = seed(&app).await;

    let (status, created) = post(
        &app,
        "/consultas",
        json!({
            "AnimalId": animal_id,
            "VeterinarioId": vet_id,
            "dataHora": "2024-05-01T10:00:00Z",
            "status": "Scheduled"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "Agendada");

    let (status, fetched) = get(&app, &format!("/consultas/{}", id_of(&created))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "Agendada");
    assert_eq!(fetched["Animal"]["nome"], "Rex");
    assert_eq!(fetched["Veterinario"]["nome"], "Dra. Ana");
    assert_eq!(fetched["AnimalId"], animal_id);
    assert!(fetched["createdAt"].is_string());
}

#[tokio::test]
async fn list_returns_records_in_id_order() {
    let (app, _) = app();
    for name in ["Ana", "Bia", "Caio"] {
        post(&app, "/secretarios", json!({"nome": name, "email": format!("{}@clinic.test", name.to_lowercase())})).await;
    }
    let (status, list) = get(&app, "/secretarios").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = list.as_array().unwrap().iter().map(|s| s["nome"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Ana", "Bia", "Caio"]);
}

#[tokio::test]
async fn invalid_status_is_unprocessable() {
    let (app, _) = app();
    let (animal_id, vet_id) = seed(&app).await;
    let (status, body) = post(
        &app,
        "/consultas",
        json!({
            "AnimalId": animal_id,
            "VeterinarioId": vet_id,
            "dataHora": "2024-05-01T10:00:00Z",
            "status": "Postponed"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn missing_required_field_is_unprocessable() {
    let (app, _) = app();
    let (status, body) = post(&app, "/veterinarios", json!({"especialidade": "Felinos"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["message"].as_str().unwrap().contains("nome"));
}

#[tokio::test]
async fn absent_ids_are_not_found() {
    let (app, _) = app();
    assert_eq!(get(&app, "/animais/99").await.0, StatusCode::NOT_FOUND);
    assert_eq!(put(&app, "/animais/99", json!({"nome": "Tom"})).await.0, StatusCode::NOT_FOUND);
    let (status, body) = delete(&app, "/animais/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let (app, _) = app();
    let (status, body) = get(&app, "/veterinarios/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn update_replaces_fields() {
    let (app, _) = app();
    let (_, vet) = post(&app, "/veterinarios", json!({"nome": "Dr. Bruno", "crmv": "SP-1"})).await;
    let uri = format!("/veterinarios/{}", id_of(&vet));
    let (status, updated) = put(&app, &uri, json!({"nome": "Dr. Bruno Lima", "especialidade": "Exóticos"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["nome"], "Dr. Bruno Lima");
    assert_eq!(updated["especialidade"], "Exóticos");
    assert!(updated["crmv"].is_null());
    assert_eq!(get(&app, &uri).await.1, updated);
}

#[tokio::test]
async fn delete_twice_is_not_found_the_second_time() {
    let (app, store) = app();
    let (_, animal) = post(&app, "/animais", json!({"nome": "Mia"})).await;
    let uri = format!("/animais/{}", id_of(&animal));
    let (status, body) = delete(&app, &uri).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
    assert!(store.is_empty(&ANIMAL_TABLE));
    assert_eq!(delete(&app, &uri).await.0, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/animais").await.1, json!([]));
}

#[tokio::test]
async fn referenced_veterinarian_cannot_be_deleted() {
    let (app, _) = app();
    let (animal_id, vet_id) = seed(&app).await;
    let (_, consultation) = post(
        &app,
        "/consultas",
        json!({"AnimalId": animal_id, "VeterinarioId": vet_id, "dataHora": "2024-05-01T10:00:00Z"}),
    )
    .await;

    let (status, body) = delete(&app, &format!("/veterinarios/{}", vet_id)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");
    assert_eq!(get(&app, &format!("/veterinarios/{}", vet_id)).await.0, StatusCode::OK);
    assert_eq!(get(&app, &format!("/consultas/{}", id_of(&consultation))).await.0, StatusCode::OK);
}

#[tokio::test]
async fn consultation_with_unknown_animal_is_not_found() {
    let (app, _) = app();
    let (_, vet_id) = seed(&app).await;
    let (status, body) = post(
        &app,
        "/consultas",
        json!({"AnimalId": 404, "VeterinarioId": vet_id, "dataHora": "2024-05-01T10:00:00Z"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"]["message"].as_str().unwrap().contains("animal 404"));
}

#[tokio::test]
async fn unavailable_store_is_503() {
    let (app, store) = app();
    store.set_available(false);
    let (status, body) = get(&app, "/consultas").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "service_unavailable");
    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["store"], "unavailable");

    store.set_available(true);
    assert_eq!(get(&app, "/ready").await.0, StatusCode::OK);
}

#[tokio::test]
async fn health_and_version() {
    let (app, _) = app();
    assert_eq!(get(&app, "/health").await.1, json!({"status": "ok"}));
    let (status, body) = get(&app, "/version").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "vetclinic");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (app, _) = app();
    let (status, doc) = get(&app, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["openapi"].as_str().unwrap().starts_with("3."));
    assert!(doc["paths"]["/consultas/{id}"]["put"].is_object());
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let (app, _) = app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/animais")
        .header("origin", ORIGIN)
        .header("access-control-request-method", "DELETE")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], ORIGIN);
    assert_eq!(headers["access-control-allow-credentials"], "true");
    assert!(headers["access-control-allow-methods"].to_str().unwrap().contains("DELETE"));
}

#[tokio::test]
async fn other_origins_never_see_their_origin_echoed() {
    let (app, _) = app();
    let request = Request::builder()
        .uri("/animais")
        .header("origin", "https://elsewhere.test")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let allowed = &response.headers()["access-control-allow-origin"];
    assert_eq!(allowed, ORIGIN);
    assert_ne!(allowed, "https://elsewhere.test");
}

async fn raw_post(app: &axum::Router, uri: &str, content_type: Option<&str>, body: &str) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).expect("JSON error body"))
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let (app, store) = app();
    let (status, body) = raw_post(&app, "/animais", Some("application/json"), "{not json").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(store.is_empty(&ANIMAL_TABLE));
}

#[tokio::test]
async fn missing_content_type_is_a_validation_error() {
    let (app, _) = app();
    let (status, body) = raw_post(&app, "/animais", None, r#"{"nome": "Rex"}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(body["error"]["message"].as_str().unwrap().contains("Content-Type"));
}

#[tokio::test]
async fn update_of_absent_id_is_not_found_even_with_incomplete_body() {
    let (app, _) = app();
    let (status, body) = put(&app, "/consultas/999", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(put(&app, "/animais/999", json!({"especie": "dog"})).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn value_is_limited_to_cents() {
    let (app, _) = app();
    let (animal_id, vet_id) = seed(&app).await;
    let body = |valor: f64| {
        json!({"AnimalId": animal_id, "VeterinarioId": vet_id, "dataHora": "2024-05-01T10:00:00Z", "valor": valor})
    };
    let (status, err) = post(&app, "/consultas", body(10.555)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"]["code"], "validation_error");
    let (status, created) = post(&app, "/consultas", body(10.55)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["valor"], 10.55);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let (app, _) = app();
    let big = "x".repeat(2 * 1024 * 1024);
    let (status, body) = post(&app, "/animais", json!({"nome": big})).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], "payload_too_large");
}
