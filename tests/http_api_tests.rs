use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::{json, Value};
use tokio::sync::mpsc;

use vigovia_itinerary_server::handlers;
use vigovia_itinerary_server::persistence::{DraftStore, FileDraftStore};
use vigovia_itinerary_server::state::AppState;

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/itinerary")
            .route(web::get().to(handlers::get_itinerary))
            .route(web::put().to(handlers::import_json)),
    )
    .service(web::resource("/itinerary/commands").route(web::post().to(handlers::apply_command)))
    .service(web::resource("/itinerary/reset").route(web::post().to(handlers::reset_itinerary)))
    .service(web::resource("/itinerary/validation").route(web::get().to(handlers::get_validation)))
    .service(
        web::resource("/itinerary/validation/{section}")
            .route(web::get().to(handlers::get_section_validation)),
    )
    .service(web::resource("/itinerary/status").route(web::get().to(handlers::get_status)))
    .service(web::resource("/itinerary/json").route(web::get().to(handlers::export_json)))
    .service(web::resource("/itinerary/export").route(web::post().to(handlers::export_itinerary)))
    .service(
        web::resource("/itinerary/export/status")
            .route(web::get().to(handlers::get_export_status)),
    );
}

struct TestContext {
    state: web::Data<AppState>,
    _dir: tempfile::TempDir,
    _receiver: mpsc::Receiver<String>,
}

fn test_context() -> TestContext {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn DraftStore> = Arc::new(FileDraftStore::new(dir.path()));
    let (sender, receiver) = mpsc::channel(100);
    TestContext {
        state: web::Data::new(AppState::new(&store, sender)),
        _dir: dir,
        _receiver: receiver,
    }
}

macro_rules! init_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data($ctx.state.clone())
                .service(web::scope("/api").configure(routes)),
        )
        .await
    };
}

macro_rules! post_command {
    ($app:expr, $command:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/itinerary/commands")
            .set_json(&$command)
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        body
    }};
}

fn set_field(section: &str, field: &str, value: Value) -> Value {
    json!({ "op": "setField", "section": section, "field": field, "value": value })
}

fn set_item_field(section: &str, index: usize, field: &str, value: Value) -> Value {
    json!({ "op": "setItemField", "section": section, "index": index, "field": field, "value": value })
}

#[actix_web::test]
async fn test_get_itinerary_returns_seeded_record() {
    let ctx = test_context();
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/api/itinerary").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["dirty"], json!(false));
    assert_eq!(body["record"]["days"][0]["dayNumber"], json!(1));
    assert_eq!(
        body["record"]["payment"]["installments"][2]["amount"],
        json!("Remaining")
    );
    assert_eq!(
        body["record"]["company"]["name"],
        json!("Vigovia Tech Pvt. Ltd")
    );
}

#[actix_web::test]
async fn test_command_mutates_record_and_marks_dirty() {
    let ctx = test_context();
    let app = init_app!(ctx);

    let body = post_command!(app, set_field("customer", "name", json!("Rahul")));
    assert_eq!(body["record"]["customer"]["name"], json!("Rahul"));
    assert_eq!(body["dirty"], json!(true));
    assert_eq!(body["revision"], json!(1));
}

#[actix_web::test]
async fn test_trip_date_validation_flow() {
    let ctx = test_context();
    let app = init_app!(ctx);

    post_command!(app, set_field("customer", "name", json!("Rahul")));
    post_command!(app, set_field("customer", "destination", json!("Singapore")));
    post_command!(app, set_field("customer", "departureDate", json!("01/12/2024")));
    post_command!(app, set_field("customer", "arrivalDate", json!("05/12/2024")));

    let req = test::TestRequest::get()
        .uri("/api/itinerary/validation/customer")
        .to_request();
    let report: Value = test::call_and_read_body_json(&app, req).await;
    let keys: Vec<&str> = report["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["key"].as_str().unwrap())
        .collect();
    assert!(!keys.contains(&"departureDate"));
    assert!(!keys.contains(&"arrivalDate"));

    // arrival equal to departure flips to a date-order error
    post_command!(app, set_field("customer", "arrivalDate", json!("01/12/2024")));
    let req = test::TestRequest::get()
        .uri("/api/itinerary/validation/customer")
        .to_request();
    let report: Value = test::call_and_read_body_json(&app, req).await;
    let arrival = report["errors"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["key"] == json!("arrivalDate"))
        .unwrap();
    assert_eq!(
        arrival["message"],
        json!("Arrival date must be after departure date")
    );
}

#[actix_web::test]
async fn test_hotel_nights_and_installments_derive_over_http() {
    let ctx = test_context();
    let app = init_app!(ctx);

    post_command!(
        app,
        set_item_field("hotels", 0, "checkIn", json!("10/01/2025"))
    );
    let body = post_command!(
        app,
        set_item_field("hotels", 0, "checkOut", json!("13/01/2025"))
    );
    assert_eq!(body["record"]["hotels"][0]["nights"], json!(3));

    post_command!(app, set_field("payment", "totalAmount", json!(900000)));
    post_command!(
        app,
        json!({ "op": "setInstallmentField", "index": 0, "field": "amount", "value": 350000 })
    );
    let body = post_command!(
        app,
        json!({ "op": "setInstallmentField", "index": 1, "field": "amount", "value": 400000 })
    );
    assert_eq!(
        body["record"]["payment"]["installments"][2]["amount"],
        json!(150000.0)
    );
}

#[actix_web::test]
async fn test_remove_below_floor_is_rejected() {
    let ctx = test_context();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/itinerary/commands")
        .set_json(json!({ "op": "removeItem", "section": "days", "index": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], json!("At least one day is required"));

    // the record is untouched
    let req = test::TestRequest::get().uri("/api/itinerary").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["record"]["days"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_unknown_validation_section_is_rejected() {
    let ctx = test_context();
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/itinerary/validation/luggage")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_import_rejects_malformed_json() {
    let ctx = test_context();
    let app = init_app!(ctx);

    let req = test::TestRequest::put()
        .uri("/api/itinerary")
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_json_round_trip_over_http() {
    let ctx = test_context();
    let app = init_app!(ctx);

    post_command!(app, set_field("customer", "name", json!("Rahul")));

    let req = test::TestRequest::get().uri("/api/itinerary/json").to_request();
    let exported = test::call_and_read_body(&app, req).await;

    post_command!(app, set_field("customer", "name", json!("Someone Else")));

    let req = test::TestRequest::put()
        .uri("/api/itinerary")
        .set_payload(exported)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["record"]["customer"]["name"], json!("Rahul"));
    assert_eq!(body["dirty"], json!(false));
}

#[actix_web::test]
async fn test_reset_reseeds_record() {
    let ctx = test_context();
    let app = init_app!(ctx);

    post_command!(app, set_field("customer", "destination", json!("Singapore")));
    let req = test::TestRequest::post().uri("/api/itinerary/reset").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["record"]["customer"]["destination"], json!(""));
    assert_eq!(body["dirty"], json!(false));
}

#[actix_web::test]
async fn test_activities_status_thresholds() {
    let ctx = test_context();
    let app = init_app!(ctx);

    // fill six rows: advisory error, section invalid and incomplete
    for i in 0..6 {
        post_command!(app, set_item_field("activities", i, "city", json!("Singapore")));
        post_command!(
            app,
            set_item_field("activities", i, "name", json!(format!("Stop {i}")))
        );
        post_command!(app, set_item_field("activities", i, "type", json!("Adventure")));
        post_command!(app, set_item_field("activities", i, "time", json!("1 Hour")));
    }

    let req = test::TestRequest::get().uri("/api/itinerary/status").to_request();
    let status: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(status["activities"]["isValid"], json!(false));
    assert_eq!(status["activities"]["isComplete"], json!(false));

    // grow to fifteen filled rows: complete
    for i in 6..15 {
        post_command!(app, json!({ "op": "appendItem", "section": "activities" }));
        post_command!(app, set_item_field("activities", i, "city", json!("Singapore")));
        post_command!(
            app,
            set_item_field("activities", i, "name", json!(format!("Stop {i}")))
        );
        post_command!(app, set_item_field("activities", i, "type", json!("Cultural")));
        post_command!(app, set_item_field("activities", i, "time", json!("1 Hour")));
    }

    let req = test::TestRequest::get().uri("/api/itinerary/status").to_request();
    let status: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(status["activities"]["isValid"], json!(true));
    assert_eq!(status["activities"]["isComplete"], json!(true));
}

#[actix_web::test]
async fn test_export_gate_blocks_then_produces_document() {
    let ctx = test_context();
    let app = init_app!(ctx);

    let req = test::TestRequest::post().uri("/api/itinerary/export").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 422);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        json!("Please fill in customer name and destination")
    );

    let req = test::TestRequest::get()
        .uri("/api/itinerary/export/status")
        .to_request();
    let status: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(status["state"], json!("error"));

    // satisfy the gate
    post_command!(app, set_field("customer", "name", json!("Rahul")));
    post_command!(app, set_field("customer", "destination", json!("Singapore")));
    post_command!(app, set_item_field("days", 0, "title", json!("Arrival")));

    let req = test::TestRequest::post().uri("/api/itinerary/export").to_request();
    let status: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(status["state"], json!("done"));
    assert_eq!(
        status["document"]["fileName"],
        json!("Rahul_Singapore_Itinerary.pdf")
    );
    assert_eq!(status["document"]["pages"].as_array().unwrap().len(), 3);

    let req = test::TestRequest::get()
        .uri("/api/itinerary/export/status")
        .to_request();
    let status: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(status["state"], json!("done"));
}
