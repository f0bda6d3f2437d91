use serde_json::{json, Value};
use taskboard_api::TaskApi;

fn api() -> TaskApi {
    TaskApi::open_in_memory().unwrap()
}

fn create(api: &TaskApi, body: Value) -> Value {
    let response = api.create_task(&body.to_string());
    assert!(response.ok, "{}", response.message);
    assert_eq!(response.status, 201);
    response.body
}

#[test]
fn create_returns_view_with_derived_fields() {
    let api = api();
    let body = create(
        &api,
        json!({
            "title": "API Test Task @team #api",
            "status": "open",
            "priority": "normal",
            "is_public": false
        }),
    );

    assert_eq!(body["title"], "API Test Task @team #api");
    assert_eq!(body["mentions"], json!(["team"]));
    assert_eq!(body["hashtags"], json!(["api"]));
    assert_eq!(body["emails"], json!([]));
    assert_eq!(body["links"], json!([]));
    assert_eq!(body["description"], "");
    assert!(body["id"].is_string());
    assert!(body["created_at"].as_i64().unwrap() > 0);
}

#[test]
fn create_ignores_read_only_fields() {
    let api = api();
    let body = create(
        &api,
        json!({
            "id": "11111111-2222-4333-8444-555555555555",
            "title": "spoof",
            "created_at": 1,
            "updated_at": 2
        }),
    );

    assert_ne!(body["id"], "11111111-2222-4333-8444-555555555555");
    assert_ne!(body["created_at"], 1);
    assert_ne!(body["updated_at"], 2);
}

#[test]
fn create_with_blank_title_reports_title_field() {
    let api = api();
    let response = api.create_task(&json!({ "title": "   " }).to_string());

    assert!(!response.ok);
    assert_eq!(response.status, 400);
    assert_eq!(response.body, json!({ "title": ["title cannot be empty"] }));
    assert_eq!(api.list_tasks(None).body, json!([]));
}

#[test]
fn create_with_missing_title_is_a_bad_request() {
    let api = api();
    let response = api.create_task(&json!({ "status": "today" }).to_string());
    assert_eq!(response.status, 400);
}

#[test]
fn list_is_newest_first_and_filters_by_status() {
    let api = api();
    let first = create(&api, json!({ "title": "first" }));
    let second = create(&api, json!({ "title": "second", "status": "today" }));
    let third = create(&api, json!({ "title": "third" }));

    let all = api.list_tasks(None);
    assert!(all.ok);
    let ids: Vec<&Value> = all
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|item| &item["id"])
        .collect();
    assert_eq!(ids, vec![&third["id"], &second["id"], &first["id"]]);

    let today = api.list_tasks(Some("today")).body;
    assert_eq!(today.as_array().unwrap().len(), 1);
    assert_eq!(today[0]["id"], second["id"]);

    assert_eq!(api.list_tasks(Some("")).body.as_array().unwrap().len(), 3);

    let unknown = api.list_tasks(Some("archived"));
    assert!(unknown.ok);
    assert_eq!(unknown.body, json!([]));
}

#[test]
fn get_returns_view_or_not_found() {
    let api = api();
    let created = create(&api, json!({ "title": "Visit https://example.com" }));
    let id = created["id"].as_str().unwrap();

    let response = api.get_task(id);
    assert!(response.ok);
    assert_eq!(response.body, created);

    assert_eq!(api.get_task("not-a-uuid").status, 404);
    assert_eq!(
        api.get_task("11111111-2222-4333-8444-555555555555").status,
        404
    );
}

#[test]
fn update_replaces_fields_and_recomputes_derived_fields() {
    let api = api();
    let created = create(
        &api,
        json!({ "title": "ping @alice", "priority": "high", "is_public": true }),
    );
    let id = created["id"].as_str().unwrap();

    let response = api.update_task(
        id,
        &json!({
            "id": "11111111-2222-4333-8444-555555555555",
            "title": "mail bob@site.org #followup",
            "status": "today",
            "due_date": 1_700_000_000_000_i64
        })
        .to_string(),
    );
    assert!(response.ok, "{}", response.message);
    let body = response.body;

    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["created_at"], created["created_at"]);
    assert!(body["updated_at"].as_i64().unwrap() >= created["updated_at"].as_i64().unwrap());
    assert_eq!(body["status"], "today");
    assert_eq!(body["priority"], "normal");
    assert_eq!(body["is_public"], false);
    assert_eq!(body["due_date"], 1_700_000_000_000_i64);
    assert_eq!(body["mentions"], json!(["site"]));
    assert_eq!(body["hashtags"], json!(["followup"]));
    assert_eq!(body["emails"], json!(["bob@site.org"]));
}

#[test]
fn update_reports_validation_and_missing_task() {
    let api = api();
    let created = create(&api, json!({ "title": "keep" }));
    let id = created["id"].as_str().unwrap();

    let invalid = api.update_task(id, &json!({ "title": "" }).to_string());
    assert_eq!(invalid.status, 400);
    assert_eq!(invalid.body["title"], json!(["title cannot be empty"]));
    assert_eq!(api.get_task(id).body["title"], "keep");

    let missing = api.update_task(
        "11111111-2222-4333-8444-555555555555",
        &json!({ "title": "x" }).to_string(),
    );
    assert_eq!(missing.status, 404);
}

#[test]
fn delete_then_get_is_not_found() {
    let api = api();
    let created = create(&api, json!({ "title": "gone soon" }));
    let id = created["id"].as_str().unwrap();

    let response = api.delete_task(id);
    assert!(response.ok);
    assert_eq!(response.status, 204);
    assert!(response.body.is_null());

    assert_eq!(api.get_task(id).status, 404);
    assert_eq!(api.delete_task(id).status, 404);
}

#[test]
fn bulk_delete_removes_listed_ids_and_skips_unknown() {
    let api = api();
    let keep = create(&api, json!({ "title": "keep" }));
    let drop_a = create(&api, json!({ "title": "drop a" }));
    let drop_b = create(&api, json!({ "title": "drop b" }));

    let response = api.bulk_delete(
        &json!({
            "ids": [drop_a["id"], drop_b["id"], "bogus", 7, "11111111-2222-4333-8444-555555555555"]
        })
        .to_string(),
    );
    assert!(response.ok);
    assert_eq!(response.body, json!({ "status": "tasks deleted", "deleted": 2 }));

    let remaining = api.list_tasks(None).body;
    assert_eq!(remaining.as_array().unwrap().len(), 1);
    assert_eq!(remaining[0]["id"], keep["id"]);
}

#[test]
fn bulk_delete_without_ids_is_a_no_op_and_bad_body_is_rejected() {
    let api = api();
    create(&api, json!({ "title": "survivor" }));

    let response = api.bulk_delete("{}");
    assert!(response.ok);
    assert_eq!(response.body["deleted"], 0);

    assert_eq!(api.bulk_delete(r#"{"ids": "nope"}"#).status, 400);
    assert_eq!(api.list_tasks(None).body.as_array().unwrap().len(), 1);
}

#[test]
fn file_backed_api_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.sqlite3");

    let id = {
        let api = TaskApi::open(&path).unwrap();
        create(&api, json!({ "title": "durable #db" }))["id"].clone()
    };

    let api = TaskApi::open(&path).unwrap();
    let response = api.get_task(id.as_str().unwrap());
    assert!(response.ok);
    assert_eq!(response.body["hashtags"], json!(["db"]));
}
