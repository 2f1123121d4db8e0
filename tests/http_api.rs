//! HTTP-level tests for the dashboard routes.
//!
//! These run the real actix handlers over the in-memory store and cache, so
//! the whole submit → validate → persist → invalidate → redirect loop is
//! exercised the way a browser drives it.

use actix_web::{http::StatusCode, test, web, App};
use invoice_desk::auth::StaticCredentialGate;
use invoice_desk::cache::InMemoryRouteCache;
use invoice_desk::form::FormState;
use invoice_desk::http;
use invoice_desk::model::{Customer, Invoice};
use invoice_desk::service::InvoiceService;
use invoice_desk::store::InMemoryStore;
use invoice_desk::InvoiceStore;
use std::collections::HashMap;
use std::sync::Arc;

fn form(fields: &[(&str, &str)]) -> HashMap<String, String> {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store.add_customer(Customer {
        id: "cus_1".to_string(),
        name: "Evil Rabbit".to_string(),
        email: "evil@rabbit.com".to_string(),
    });
    store
}

macro_rules! dashboard_app {
    ($store:expr) => {{
        let service = web::Data::new(InvoiceService::new($store, InMemoryRouteCache::new()));
        let gate = web::Data::new(StaticCredentialGate::new("user@nextmail.com", "123456"));
        test::init_service(
            App::new()
                .app_data(service)
                .app_data(gate)
                .configure(http::configure::<
                    InMemoryStore,
                    InMemoryRouteCache,
                    StaticCredentialGate,
                >),
        )
        .await
    }};
}

#[actix_web::test]
async fn health_check_reports_healthy() {
    let app = dashboard_app!(seeded_store());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn create_redirects_to_the_invoices_list() {
    let store = seeded_store();
    let app = dashboard_app!(store.clone());

    let req = test::TestRequest::post()
        .uri("/dashboard/invoices")
        .set_form(form(&[
            ("customerId", "cus_1"),
            ("amount", "99.50"),
            ("status", "pending"),
        ]))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp
        .headers()
        .get("location")
        .expect("Expected a Location header");
    assert_eq!(location, "/dashboard/invoices");
    assert_eq!(store.invoice_count(), 1);
}

#[actix_web::test]
async fn invalid_create_returns_form_state() {
    let store = seeded_store();
    let app = dashboard_app!(store.clone());

    let req = test::TestRequest::post()
        .uri("/dashboard/invoices")
        .set_form(form(&[("amount", "-1"), ("status", "nonsense")]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let state: FormState = test::read_body_json(resp).await;
    assert_eq!(
        state.message.as_deref(),
        Some("Missing Fields. Failed to Create Invoice.")
    );
    let errors = state.errors.expect("Expected field errors");
    assert!(errors.contains_key("customerId"));
    assert!(errors.contains_key("amount"));
    assert!(errors.contains_key("status"));
    assert_eq!(store.invoice_count(), 0);
}

#[actix_web::test]
async fn list_serves_created_invoices() {
    let store = seeded_store();
    let app = dashboard_app!(store.clone());

    let req = test::TestRequest::post()
        .uri("/dashboard/invoices")
        .set_form(form(&[
            ("customerId", "cus_1"),
            ("amount", "12.34"),
            ("status", "paid"),
        ]))
        .to_request();
    test::call_service(&app, req).await;

    let invoices: Vec<Invoice> = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/dashboard/invoices")
            .to_request(),
    )
    .await;

    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].amount, 1234);
}

#[actix_web::test]
async fn edit_hydration_of_unknown_invoice_is_404() {
    let app = dashboard_app!(seeded_store());

    let req = test::TestRequest::get()
        .uri(&format!(
            "/dashboard/invoices/{}/edit",
            uuid::Uuid::now_v7()
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn update_roundtrip_through_the_edit_route() {
    let store = seeded_store();
    let app = dashboard_app!(store.clone());

    let invoice = Invoice::new(
        "cus_1".to_string(),
        1000,
        invoice_desk::InvoiceStatus::Pending,
    );
    store.insert(&invoice).await.expect("Failed to insert");

    let req = test::TestRequest::post()
        .uri(&format!("/dashboard/invoices/{}/edit", invoice.id))
        .set_form(form(&[
            ("customerId", "cus_1"),
            ("amount", "20"),
            ("status", "paid"),
        ]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let updated = store
        .fetch_by_id(&invoice.id)
        .await
        .expect("Failed to fetch")
        .expect("Invoice missing");
    assert_eq!(updated.amount, 2000);
}

#[actix_web::test]
async fn delete_returns_confirmation_without_redirecting() {
    let store = seeded_store();
    let app = dashboard_app!(store.clone());

    let invoice = Invoice::new(
        "cus_1".to_string(),
        1000,
        invoice_desk::InvoiceStatus::Paid,
    );
    store.insert(&invoice).await.expect("Failed to insert");

    let req = test::TestRequest::post()
        .uri(&format!("/dashboard/invoices/{}/delete", invoice.id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let state: FormState = test::read_body_json(resp).await;
    assert_eq!(state.message.as_deref(), Some("Deleted Invoice."));
    assert_eq!(store.invoice_count(), 0);
}

#[actix_web::test]
async fn login_classifies_bad_credentials() {
    let app = dashboard_app!(seeded_store());

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(form(&[
            ("email", "user@nextmail.com"),
            ("password", "wrong"),
        ]))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let state: FormState = test::read_body_json(resp).await;
    assert_eq!(state.message.as_deref(), Some("Invalid credentials."));
}

#[actix_web::test]
async fn login_redirects_on_success() {
    let app = dashboard_app!(seeded_store());

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(form(&[
            ("email", "user@nextmail.com"),
            ("password", "123456"),
        ]))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get("location").expect("Location header"),
        "/dashboard"
    );
}
