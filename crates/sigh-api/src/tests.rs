//! Router-level integration tests against an in-memory store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use sigh_store_sqlite::SqliteStore;
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{AttachmentStore, api_router};

struct TestApp {
  router:      Router,
  attachments: Arc<AttachmentStore>,
}

async fn app() -> TestApp {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let root = std::env::temp_dir()
    .join(format!("sigh-api-test-{}", Uuid::new_v4().simple()));
  let attachments = Arc::new(AttachmentStore::new(root));
  TestApp {
    router: api_router(Arc::clone(&store), Arc::clone(&attachments)),
    attachments,
  }
}

async fn send(
  app: &TestApp,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = app
    .router
    .clone()
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

async fn lookup_id(app: &TestApp, uri: &str, key: &str, name: &str) -> i64 {
  let (status, body) = send(app, "GET", uri, None).await;
  assert_eq!(status, StatusCode::OK);
  body[key]
    .as_array()
    .unwrap()
    .iter()
    .find(|v| v["name"] == name || v["code"] == name)
    .unwrap_or_else(|| panic!("{name} missing from {uri}"))["id"]
    .as_i64()
    .unwrap()
}

async fn create_hunt(app: &TestApp, name: &str) -> i64 {
  let status_id = lookup_id(app, "/hunt-statuses", "statuses", "active").await;
  let (status, body) = send(
    app,
    "POST",
    "/hunts",
    Some(json!({
      "name": name,
      "huntStatusId": status_id,
      "startDate": "2024-05-01T00:00:00Z",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "create hunt: {body}");
  body["id"].as_i64().unwrap()
}

async fn create_role(app: &TestApp, hunt_id: i64, company: &str, title: &str) -> i64 {
  let (status, body) = send(
    app,
    "POST",
    "/roles",
    Some(json!({
      "title": title,
      "huntId": hunt_id,
      "companyName": company,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "create role: {body}");
  body["id"].as_i64().unwrap()
}

async fn create_interaction(
  app: &TestApp,
  role_id: i64,
  type_name: &str,
  occurred_at: &str,
) -> i64 {
  let type_id =
    lookup_id(app, "/interaction-types", "types", type_name).await;
  let (status, body) = send(
    app,
    "POST",
    "/interactions",
    Some(json!({
      "roleId": role_id,
      "interactionTypeId": type_id,
      "occurredAt": occurred_at,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "create interaction: {body}");
  body["id"].as_i64().unwrap()
}

// ─── Hunts ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn hunt_create_list_delete() {
  let app = app().await;
  let id = create_hunt(&app, "Summer search").await;

  let (status, body) = send(&app, "GET", "/hunts", None).await;
  assert_eq!(status, StatusCode::OK);
  let hunts = body["hunts"].as_array().unwrap();
  assert_eq!(hunts.len(), 1);
  assert_eq!(hunts[0]["name"], "Summer search");
  assert_eq!(hunts[0]["status"], "active");
  assert_eq!(hunts[0]["roleCount"], 0);

  let (status, _) = send(&app, "DELETE", &format!("/hunts/{id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = send(&app, "GET", &format!("/hunts/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn hunt_create_requires_name_and_known_status() {
  let app = app().await;
  let (status, body) =
    send(&app, "POST", "/hunts", Some(json!({ "huntStatusId": 1 }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("Name"));

  let (status, body) = send(
    &app,
    "POST",
    "/hunts",
    Some(json!({ "name": "x", "huntStatusId": 999 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("hunt status"));
}

#[tokio::test]
async fn hunt_patch_rejects_empty_and_inverted_dates() {
  let app = app().await;
  let id = create_hunt(&app, "Search").await;

  let (status, body) =
    send(&app, "PATCH", &format!("/hunts/{id}"), Some(json!({}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "No updates provided.");

  let (status, _) = send(
    &app,
    "PATCH",
    &format!("/hunts/{id}"),
    Some(json!({ "endDate": "2024-01-01T00:00:00Z" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  // Clearing the end date is fine.
  let (status, body) = send(
    &app,
    "PATCH",
    &format!("/hunts/{id}"),
    Some(json!({ "endDate": null })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["endDate"], Value::Null);
}

#[tokio::test]
async fn hunt_patch_rejects_malformed_end_date() {
  let app = app().await;
  let id = create_hunt(&app, "Search").await;

  let (status, body) = send(
    &app,
    "PATCH",
    &format!("/hunts/{id}"),
    Some(json!({ "endDate": "2024-06-01T00:00:00Z" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");

  // A non-empty string that is not a date is an error, not a clear.
  let (status, body) = send(
    &app,
    "PATCH",
    &format!("/hunts/{id}"),
    Some(json!({ "endDate": "not-a-date" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "End date must be a valid date.");

  // The stored value survives the rejected patch.
  let (_, detail) = send(&app, "GET", &format!("/hunts/{id}"), None).await;
  assert_eq!(detail["hunt"]["endDate"], "2024-06-01T00:00:00Z");

  // A blank string clears, like null.
  let (status, body) = send(
    &app,
    "PATCH",
    &format!("/hunts/{id}"),
    Some(json!({ "endDate": "" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["endDate"], Value::Null);
}

#[tokio::test]
async fn hunt_detail_aggregates_roles() {
  let app = app().await;
  let hunt = create_hunt(&app, "Search").await;
  let role = create_role(&app, hunt, "Acme", "Backend").await;
  create_interaction(&app, role, "Interviewed", "2024-05-02T00:00:00Z").await;
  create_interaction(&app, role, "Rejected", "2024-05-03T00:00:00Z").await;

  let (status, body) = send(&app, "GET", &format!("/hunts/{hunt}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["hunt"]["status"], "active");

  let roles = body["roles"].as_array().unwrap();
  assert_eq!(roles.len(), 1);
  assert_eq!(roles[0]["companyName"], "Acme");
  assert_eq!(roles[0]["status"], "Rejected");
  assert_eq!(roles[0]["lastInteractionType"], "Rejected");

  let counts = body["statusCounts"].as_array().unwrap();
  assert_eq!(counts.len(), 4);
  let rejected = counts
    .iter()
    .find(|c| c["status"] == "Rejected")
    .unwrap();
  assert_eq!(rejected["count"], 1);
}

// ─── Companies ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn company_create_is_get_or_create() {
  let app = app().await;
  let (status, first) = send(
    &app,
    "POST",
    "/companies",
    Some(json!({ "name": "Acme", "url": "https://acme.example" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, second) =
    send(&app, "POST", "/companies", Some(json!({ "name": "Acme" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(first["id"], second["id"]);
}

#[tokio::test]
async fn company_detail_includes_roles_with_status() {
  let app = app().await;
  let hunt = create_hunt(&app, "Search").await;
  let role = create_role(&app, hunt, "Acme", "Backend").await;
  create_interaction(&app, role, "Offer Accepted", "2024-05-02T00:00:00Z").await;

  let (_, companies) = send(&app, "GET", "/companies", None).await;
  let company_id =
    companies["companies"].as_array().unwrap()[0]["id"].as_i64().unwrap();

  let (status, body) =
    send(&app, "GET", &format!("/companies/{company_id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["company"]["name"], "Acme");
  let roles = body["roles"].as_array().unwrap();
  assert_eq!(roles.len(), 1);
  assert_eq!(roles[0]["status"], "Accepted");
  assert_eq!(body["interactions"].as_array().unwrap().len(), 1);
}

// ─── People ──────────────────────────────────────────────────────────────────

async fn create_person(app: &TestApp, company_id: i64, first: &str) -> i64 {
  let (status, body) = send(
    app,
    "POST",
    "/people",
    Some(json!({
      "companyId": company_id,
      "firstName": first,
      "lastName": "Lovelace",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "create person: {body}");
  body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn person_create_requires_existing_company() {
  let app = app().await;
  let (status, body) = send(
    &app,
    "POST",
    "/people",
    Some(json!({ "companyId": 999, "firstName": "Ada", "lastName": "L" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("company"));
}

#[tokio::test]
async fn person_tags_attach_and_detach() {
  let app = app().await;
  let (_, company) =
    send(&app, "POST", "/companies", Some(json!({ "name": "Acme" }))).await;
  let person = create_person(&app, company["id"].as_i64().unwrap(), "Ada").await;

  let (_, tag) =
    send(&app, "POST", "/tags", Some(json!({ "name": "warm-intro" }))).await;
  let tag_id = tag["id"].as_i64().unwrap();

  let (status, tags) = send(
    &app,
    "POST",
    &format!("/people/{person}/tags"),
    Some(json!({ "tagId": tag_id })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(tags.as_array().unwrap().len(), 1);

  let (_, people) = send(&app, "GET", "/people", None).await;
  assert_eq!(people["people"][0]["tagIds"], json!([tag_id]));

  let (status, tags) = send(
    &app,
    "DELETE",
    &format!("/people/{person}/tags"),
    Some(json!({ "tagId": tag_id })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert!(tags.as_array().unwrap().is_empty());

  let (status, _) = send(
    &app,
    "POST",
    &format!("/people/{person}/tags"),
    Some(json!({ "tagId": 999 })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn person_detail_merges_timeline() {
  let app = app().await;
  let hunt = create_hunt(&app, "Search").await;
  let role = create_role(&app, hunt, "Acme", "Backend").await;
  let (_, companies) = send(&app, "GET", "/companies", None).await;
  let company_id =
    companies["companies"].as_array().unwrap()[0]["id"].as_i64().unwrap();
  let person = create_person(&app, company_id, "Ada").await;

  // One attributed role interaction, one person interaction, newest first.
  let role_type = lookup_id(&app, "/interaction-types", "types", "Email").await;
  let (status, _) = send(
    &app,
    "POST",
    "/interactions",
    Some(json!({
      "roleId": role,
      "interactionTypeId": role_type,
      "personId": person,
      "occurredAt": "2024-05-01T00:00:00Z",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let person_type =
    lookup_id(&app, "/person-interaction-types", "types", "Phone Call").await;
  let (status, _) = send(
    &app,
    "POST",
    "/person-interactions",
    Some(json!({
      "personId": person,
      "interactionTypeId": person_type,
      "occurredAt": "2024-05-02T00:00:00Z",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, body) = send(&app, "GET", &format!("/people/{person}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["person"]["companyName"], "Acme");
  let timeline = body["timeline"].as_array().unwrap();
  assert_eq!(timeline.len(), 2);
  assert_eq!(timeline[0]["scope"], "person");
  assert_eq!(timeline[0]["typeName"], "Phone Call");
  assert_eq!(timeline[1]["scope"], "role");
  assert_eq!(timeline[1]["roleTitle"], "Backend");
}

// ─── Roles ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn role_create_validates_salary_and_company() {
  let app = app().await;
  let hunt = create_hunt(&app, "Search").await;

  let (status, body) = send(
    &app,
    "POST",
    "/roles",
    Some(json!({ "title": "Backend", "huntId": hunt, "companyId": 999 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("company"));

  let (status, body) = send(
    &app,
    "POST",
    "/roles",
    Some(json!({
      "title": "Backend",
      "huntId": hunt,
      "companyName": "Acme",
      "salaryLowerEnd": 200_000,
      "salaryHigherEnd": 100_000,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("Salary"));
}

#[tokio::test]
async fn role_detail_carries_context() {
  let app = app().await;
  let hunt = create_hunt(&app, "Search").await;
  let role = create_role(&app, hunt, "Acme", "Backend").await;
  create_interaction(&app, role, "Ghosted", "2024-05-02T00:00:00Z").await;

  let (status, body) = send(&app, "GET", &format!("/roles/{role}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["role"]["companyName"], "Acme");
  assert_eq!(body["role"]["huntName"], "Search");
  assert_eq!(body["role"]["status"], "Rejected");
  assert!(body["currencies"].as_array().unwrap().len() >= 4);
  assert_eq!(body["interactions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn role_patch_merges_salary_check() {
  let app = app().await;
  let hunt = create_hunt(&app, "Search").await;
  let role = create_role(&app, hunt, "Acme", "Backend").await;

  let (status, _) = send(
    &app,
    "PATCH",
    &format!("/roles/{role}"),
    Some(json!({ "salaryHigherEnd": 100_000 })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  // Patching the lower end above the stored higher end must fail.
  let (status, body) = send(
    &app,
    "PATCH",
    &format!("/roles/{role}"),
    Some(json!({ "salaryLowerEnd": 150_000 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}

// ─── Interactions ────────────────────────────────────────────────────────────

#[tokio::test]
async fn interaction_create_denormalises_company() {
  let app = app().await;
  let hunt = create_hunt(&app, "Search").await;
  let role = create_role(&app, hunt, "Acme", "Backend").await;
  let (_, companies) = send(&app, "GET", "/companies", None).await;
  let company_id =
    companies["companies"].as_array().unwrap()[0]["id"].as_i64().unwrap();

  let type_id = lookup_id(&app, "/interaction-types", "types", "Email").await;
  let (status, body) = send(
    &app,
    "POST",
    "/interactions",
    Some(json!({ "roleId": role, "interactionTypeId": type_id })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["companyId"], json!(company_id));

  let (status, body) = send(
    &app,
    "POST",
    "/interactions",
    Some(json!({ "roleId": role, "interactionTypeId": 999 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("interaction type"));
}

#[tokio::test]
async fn interaction_patch_drops_attribution() {
  let app = app().await;
  let hunt = create_hunt(&app, "Search").await;
  let role = create_role(&app, hunt, "Acme", "Backend").await;
  let (_, companies) = send(&app, "GET", "/companies", None).await;
  let company_id =
    companies["companies"].as_array().unwrap()[0]["id"].as_i64().unwrap();
  let person = create_person(&app, company_id, "Ada").await;

  let type_id = lookup_id(&app, "/interaction-types", "types", "Email").await;
  let (_, created) = send(
    &app,
    "POST",
    "/interactions",
    Some(json!({
      "roleId": role,
      "interactionTypeId": type_id,
      "personId": person,
    })),
  )
  .await;
  let id = created["id"].as_i64().unwrap();

  let (status, body) = send(
    &app,
    "PATCH",
    &format!("/interactions/{id}"),
    Some(json!({ "interactionTypeId": type_id })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["personId"], Value::Null);

  let (status, _) =
    send(&app, "DELETE", &format!("/interactions/{id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) =
    send(&app, "DELETE", &format!("/interactions/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Lookups ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn currency_post_uppercases_and_reuses() {
  let app = app().await;
  let (status, body) =
    send(&app, "POST", "/currencies", Some(json!({ "code": " usd " }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["code"], "USD");

  let seeded = lookup_id(&app, "/currencies", "currencies", "USD").await;
  assert_eq!(body["id"], json!(seeded));
}

#[tokio::test]
async fn tag_post_is_get_or_create() {
  let app = app().await;
  let (_, first) =
    send(&app, "POST", "/tags", Some(json!({ "name": "remote" }))).await;
  let (_, second) =
    send(&app, "POST", "/tags", Some(json!({ "name": "remote" }))).await;
  assert_eq!(first["id"], second["id"]);

  let (status, body) =
    send(&app, "POST", "/tags", Some(json!({ "name": "  " }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("Name"));
}

#[tokio::test]
async fn interaction_type_post_is_get_or_create_per_scope() {
  let app = app().await;
  let seeded = lookup_id(&app, "/interaction-types", "types", "Email").await;

  let (status, body) = send(
    &app,
    "POST",
    "/interaction-types",
    Some(json!({ "name": "Email" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["id"], json!(seeded));

  let (status, body) = send(
    &app,
    "POST",
    "/person-interaction-types",
    Some(json!({ "name": "Coffee Chat" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  let coffee = body["id"].as_i64().unwrap();

  // The catalogues are scoped; the new type only shows up person-side.
  let (_, body) = send(&app, "GET", "/interaction-types", None).await;
  assert!(
    body["types"]
      .as_array()
      .unwrap()
      .iter()
      .all(|t| t["name"] != "Coffee Chat")
  );
  let (_, body) = send(&app, "GET", "/person-interaction-types", None).await;
  assert!(
    body["types"]
      .as_array()
      .unwrap()
      .iter()
      .any(|t| t["id"] == json!(coffee))
  );
}

// ─── Attachments ─────────────────────────────────────────────────────────────

fn multipart_body(boundary: &str, filename: &str, contents: &str) -> String {
  format!(
    "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
     filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n\
     {contents}\r\n--{boundary}--\r\n"
  )
}

#[tokio::test]
async fn document_upload_serve_and_delete() {
  let app = app().await;
  let hunt = create_hunt(&app, "Search").await;
  let role = create_role(&app, hunt, "Acme", "Backend").await;

  let boundary = "sigh-test-boundary";
  let req = Request::builder()
    .method("POST")
    .uri(format!("/roles/{role}/description-document"))
    .header(
      header::CONTENT_TYPE,
      format!("multipart/form-data; boundary={boundary}"),
    )
    .body(Body::from(multipart_body(boundary, "job posting.pdf", "the posting")))
    .unwrap();
  let resp = app.router.clone().oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::CREATED);
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let uploaded: Value = serde_json::from_slice(&bytes).unwrap();
  assert_eq!(uploaded["name"], "job posting.pdf");
  let stored = uploaded["path"].as_str().unwrap().to_string();
  assert!(stored.ends_with("_job_posting.pdf"), "stored name: {stored}");

  // The role row points at the stored file.
  let (_, detail) = send(&app, "GET", &format!("/roles/{role}"), None).await;
  assert_eq!(detail["role"]["descriptionDocumentPath"], json!(stored));
  assert_eq!(detail["role"]["descriptionDocumentName"], "job posting.pdf");

  // Served back verbatim.
  let resp = app
    .router
    .clone()
    .oneshot(
      Request::builder()
        .uri(format!("/attachments/{stored}"))
        .body(Body::empty())
        .unwrap(),
    )
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  assert_eq!(&bytes[..], b"the posting");

  // Delete unlinks the file and clears the columns.
  let (status, _) = send(
    &app,
    "DELETE",
    &format!("/roles/{role}/description-document"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) =
    send(&app, "GET", &format!("/attachments/{stored}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (_, detail) = send(&app, "GET", &format!("/roles/{role}"), None).await;
  assert_eq!(detail["role"]["descriptionDocumentPath"], Value::Null);

  let _ = tokio::fs::remove_dir_all(app.attachments.root()).await;
}
