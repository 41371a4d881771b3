use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App, Error};
use bizcuit::auth::TokenService;
use bizcuit::routes;
use bizcuit::state::AppState;
use chrono::Duration;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn test_state() -> AppState {
    AppState::in_memory(
        TokenService::new("integration_test_secret", Duration::hours(1)),
        4,
    )
}

/// Registers and logs in `username`, returning `(user_id, bearer header value)`.
async fn login_as<S, B>(app: &S, username: &str) -> (i64, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let credentials = json!({"username": username, "password": "bizcuit_password"});
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(&credentials)
        .to_request();
    assert_eq!(test::call_service(app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(&credentials)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let token = body["access_token"].as_str().unwrap();
    (
        body["user"]["id"].as_i64().unwrap(),
        format!("Bearer {}", token),
    )
}

#[test_log::test(actix_rt::test)]
async fn test_task_crud_flow() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;
    let (user_id, auth) = login_as(&app, "bizcuit_developer").await;

    // Create; a userId in the body is ignored
    let req = test::TestRequest::post()
        .uri("/tasks")
        .insert_header(("Authorization", auth.clone()))
        .set_json(json!({
            "title": "Buy groceries",
            "description": "Buy fruits and vegetables from the market",
            "dueDate": "2024-12-31",
            "userId": 999
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let task_id = created["id"].as_i64().unwrap();
    assert_eq!(created["title"], "Buy groceries");
    assert_eq!(created["userId"].as_i64().unwrap(), user_id);
    assert_eq!(created["category"], "General");
    assert_eq!(created["sharedUser"], "General");
    assert_eq!(created["sharedTask"], false);
    assert_eq!(created["completed"], false);
    assert_eq!(created["dueDate"], "2024-12-31T00:00:00Z");

    // Read back
    let req = test::TestRequest::get()
        .uri(&format!("/tasks/{}", task_id))
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = test::read_body_json(resp).await;
    assert_eq!(fetched, created);

    // Partial update
    let req = test::TestRequest::put()
        .uri(&format!("/tasks/{}", task_id))
        .insert_header(("Authorization", auth.clone()))
        .set_json(json!({"completed": true}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["title"], "Buy groceries");
    assert_eq!(updated["dueDate"], created["dueDate"]);

    // Owner listing
    let req = test::TestRequest::get()
        .uri(&format!("/tasks/userId/{}", user_id))
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let listed: Value = test::read_body_json(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["completed"], true);

    // Delete
    let req = test::TestRequest::delete()
        .uri(&format!("/tasks/{}", task_id))
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], format!("Task with ID {} was deleted", task_id));

    let req = test::TestRequest::get()
        .uri(&format!("/tasks/{}", task_id))
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], format!("Task with ID {} not found", task_id));

    // No tasks left for the owner
    let req = test::TestRequest::get()
        .uri(&format!("/tasks/userId/{}", user_id))
        .insert_header(("Authorization", auth))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[test_log::test(actix_rt::test)]
async fn test_tasks_are_scoped_to_their_owner() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;
    let (_, alice) = login_as(&app, "alice").await;
    let (_, mallory) = login_as(&app, "mallory").await;

    let req = test::TestRequest::post()
        .uri("/tasks")
        .insert_header(("Authorization", alice.clone()))
        .set_json(json!({"title": "Private", "description": "alice only"}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/tasks/{}", created["id"]);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(("Authorization", mallory.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(("Authorization", mallory.clone()))
        .set_json(json!({"title": "Hijacked"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(("Authorization", mallory))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    // Still intact for alice
    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(("Authorization", alice))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["title"], "Private");
}

#[test_log::test(actix_rt::test)]
async fn test_unscoped_and_shared_listings() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;
    let (alice_id, alice) = login_as(&app, "alice").await;
    let (_, bob) = login_as(&app, "bob").await;

    for (auth, payload) in [
        (
            &alice,
            json!({"title": "Plan", "description": "d", "sharedTask": true, "sharedUser": "developer_2"}),
        ),
        (&bob, json!({"title": "Own", "description": "d"})),
    ] {
        let req = test::TestRequest::post()
            .uri("/tasks")
            .insert_header(("Authorization", auth.clone()))
            .set_json(payload)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/tasks")
        .insert_header(("Authorization", bob.clone()))
        .to_request();
    let all: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri("/tasks/shared/developer_2")
        .insert_header(("Authorization", bob.clone()))
        .to_request();
    let shared: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(shared.as_array().unwrap().len(), 1);
    assert_eq!(shared[0]["userId"].as_i64().unwrap(), alice_id);

    let req = test::TestRequest::get()
        .uri("/tasks/shared/nobody")
        .insert_header(("Authorization", bob))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let none: Value = test::read_body_json(resp).await;
    assert_eq!(none, json!([]));
}

#[test_log::test(actix_rt::test)]
async fn test_task_input_errors() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;
    let (_, auth) = login_as(&app, "bizcuit_developer").await;

    let bad_bodies = [
        json!({"description": "no title"}),
        json!({"title": "no description"}),
        json!({"title": "", "description": "empty title"}),
        json!({"title": "t", "description": "d", "dueDate": "not-a-date"}),
    ];
    for payload in bad_bodies {
        let req = test::TestRequest::post()
            .uri("/tasks")
            .insert_header(("Authorization", auth.clone()))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", payload);
    }

    for uri in ["/tasks/abc", "/tasks/userId/abc"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(("Authorization", auth.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    let req = test::TestRequest::get()
        .uri("/tasks/9999")
        .insert_header(("Authorization", auth))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}
