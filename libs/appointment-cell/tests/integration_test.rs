use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use appointment_cell::router::appointment_routes;
use shared_database::{collections, DocumentStore, Filter, MemoryStore};
use shared_utils::test_utils::{appointment_option_fixtures, JwtTestUtils, TestConfig};

struct TestApp {
    app: Router,
    store: Arc<MemoryStore>,
    config: TestConfig,
}

async fn create_test_app() -> TestApp {
    let config = TestConfig::default();
    let (state, store) = config.to_state();
    store
        .seed(collections::APPOINTMENT_OPTIONS, appointment_option_fixtures())
        .await
        .unwrap();

    TestApp {
        app: appointment_routes(state),
        store,
        config,
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn booking(date: &str, email: &str, treatment: &str, slot: &str) -> Value {
    json!({
        "appointmentDate": date,
        "treatmentName": treatment,
        "patient": "Jane Roe",
        "slot": slot,
        "email": email,
        "phone": "555-0100",
        "price": 65
    })
}

fn slots_of<'a>(options: &'a Value, name: &str) -> Vec<&'a str> {
    options
        .as_array()
        .unwrap()
        .iter()
        .find(|option| option["name"] == name)
        .unwrap()["slots"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect()
}

#[tokio::test]
async fn test_options_without_bookings_show_every_slot() {
    let test = create_test_app().await;

    let response = test.app.oneshot(get("/appointmentoptions?date=Nov%203,%202022")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let options = body_json(response).await;
    assert_eq!(options.as_array().unwrap().len(), 3);
    assert_eq!(slots_of(&options, "Teeth Cleaning"), vec!["01.00 PM - 01.30 PM", "01.30 PM - 02.00 PM"]);
    assert_eq!(options[0]["price"], 65);
}

#[tokio::test]
async fn test_booked_slot_disappears_only_for_its_date_and_treatment() {
    let test = create_test_app().await;

    let response = test
        .app
        .clone()
        .oneshot(post_json(
            "/bookings",
            booking("Nov 3, 2022", "p@example.com", "Teeth Orthodontics", "08.30 AM - 09.00 AM"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["acknowledged"], true);
    assert!(created["insertedId"].is_string());

    let same_day = body_json(
        test.app.clone().oneshot(get("/appointmentoptions?date=Nov%203,%202022")).await.unwrap(),
    )
    .await;
    assert_eq!(
        slots_of(&same_day, "Teeth Orthodontics"),
        vec!["08.00 AM - 08.30 AM", "09.00 AM - 09.30 AM", "09.30 AM - 10.00 AM"]
    );
    assert_eq!(slots_of(&same_day, "Cosmetic Dentistry").len(), 3);

    let other_day = body_json(
        test.app.clone().oneshot(get("/appointmentoptions?date=Nov%204,%202022")).await.unwrap(),
    )
    .await;
    assert_eq!(slots_of(&other_day, "Teeth Orthodontics").len(), 4);

    let no_date = body_json(test.app.oneshot(get("/appointmentoptions")).await.unwrap()).await;
    assert_eq!(slots_of(&no_date, "Teeth Orthodontics").len(), 4);
}

#[tokio::test]
async fn test_duplicate_booking_is_acknowledged_false_with_status_ok() {
    let test = create_test_app().await;
    let body = booking("Nov 3, 2022", "p@example.com", "Teeth Cleaning", "01.00 PM - 01.30 PM");

    let first = test.app.clone().oneshot(post_json("/bookings", body.clone())).await.unwrap();
    assert_eq!(body_json(first).await["acknowledged"], true);

    let second = test.app.oneshot(post_json("/bookings", body)).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(
        body_json(second).await,
        json!({"acknowledged": false, "message": "you already have an appointment on Nov 3, 2022"})
    );

    let stored = test.store.find(collections::BOOKINGS, &Filter::new()).await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_invalid_booking_is_rejected_before_storage() {
    let test = create_test_app().await;

    let mut body = booking("Nov 3, 2022", "p@example.com", "Teeth Cleaning", "01.00 PM - 01.30 PM");
    body["treatmentName"] = json!("");

    let response = test.app.oneshot(post_json("/bookings", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "treatmentName is required");
    assert!(test.store.find(collections::BOOKINGS, &Filter::new()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_specialties_list_names_only() {
    let test = create_test_app().await;

    let response = test.app.oneshot(get("/appointmentspecialty")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let specialties = body_json(response).await;
    assert_eq!(specialties[0], json!({"_id": "opt-teeth-orthodontics", "name": "Teeth Orthodontics"}));
    assert!(specialties[1].get("slots").is_none());
}

#[tokio::test]
async fn test_user_bookings_require_token() {
    let test = create_test_app().await;

    let response = test.app.oneshot(get("/bookings?email=p@example.com")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_bookings_reject_bad_token_with_forbidden() {
    let test = create_test_app().await;

    let request = Request::builder()
        .uri("/bookings?email=p@example.com")
        .header("authorization", JwtTestUtils::bearer(&JwtTestUtils::create_invalid_signature_token("p@example.com")))
        .body(Body::empty())
        .unwrap();
    let response = test.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_bookings_only_for_token_owner() {
    let test = create_test_app().await;
    test.app
        .clone()
        .oneshot(post_json("/bookings", booking("Nov 3, 2022", "p@example.com", "Teeth Cleaning", "01.00 PM - 01.30 PM")))
        .await
        .unwrap();
    test.app
        .clone()
        .oneshot(post_json("/bookings", booking("Nov 3, 2022", "q@example.com", "Teeth Cleaning", "01.30 PM - 02.00 PM")))
        .await
        .unwrap();

    let token = JwtTestUtils::create_test_token("p@example.com", &test.config.access_token_secret, Some(1));

    let own = Request::builder()
        .uri("/bookings?email=p@example.com")
        .header("authorization", JwtTestUtils::bearer(&token))
        .body(Body::empty())
        .unwrap();
    let response = test.app.clone().oneshot(own).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bookings = body_json(response).await;
    assert_eq!(bookings.as_array().unwrap().len(), 1);
    assert_eq!(bookings[0]["email"], "p@example.com");

    let foreign = Request::builder()
        .uri("/bookings?email=q@example.com")
        .header("authorization", JwtTestUtils::bearer(&token))
        .body(Body::empty())
        .unwrap();
    let response = test.app.oneshot(foreign).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_booking_by_id_or_null() {
    let test = create_test_app().await;
    let created = body_json(
        test.app
            .clone()
            .oneshot(post_json("/bookings", booking("Nov 3, 2022", "p@example.com", "Teeth Cleaning", "01.00 PM - 01.30 PM")))
            .await
            .unwrap(),
    )
    .await;
    let id = created["insertedId"].as_str().unwrap();

    let found = body_json(test.app.clone().oneshot(get(&format!("/bookings/{}", id))).await.unwrap()).await;
    assert_eq!(found["_id"], id);
    assert_eq!(found["patient"], "Jane Roe");

    let response = test.app.oneshot(get("/bookings/does-not-exist")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, Value::Null);
}
