//! Route handlers - clean HTTP layer, delegates to the service.

use actix_web::{http::header, web, HttpResponse};
use serde::Serialize;
use std::collections::HashMap;

use crate::auth::{authenticate, AuthOutcome, CredentialGate};
use crate::cache::RouteCache;
use crate::form::{FormState, RawForm};
use crate::http::error::Result;
use crate::model::{Customer, Invoice};
use crate::service::{InvoiceService, MutationOutcome};
use crate::store::{CustomerStore, InvoiceStore};

/// Everything the edit form needs to hydrate.
#[derive(Serialize)]
pub struct EditInvoiceView {
    pub invoice: Invoice,
    pub customers: Vec<Customer>,
}

/// Register all dashboard routes.
///
/// The caller supplies `web::Data<InvoiceService<S, C>>` and `web::Data<G>`
/// as app data; this only wires paths to handlers.
pub fn configure<S, C, G>(cfg: &mut web::ServiceConfig)
where
    S: InvoiceStore + CustomerStore + 'static,
    C: RouteCache + 'static,
    G: CredentialGate + 'static,
{
    cfg.route("/health", web::get().to(health_check))
        .route("/login", web::post().to(login::<G>))
        .route("/dashboard/invoices", web::get().to(list_invoices::<S, C>))
        .route("/dashboard/invoices", web::post().to(create_invoice::<S, C>))
        .route(
            "/dashboard/invoices/new",
            web::get().to(new_invoice_form::<S, C>),
        )
        .route(
            "/dashboard/invoices/{id}/edit",
            web::get().to(edit_invoice_form::<S, C>),
        )
        .route(
            "/dashboard/invoices/{id}/edit",
            web::post().to(update_invoice::<S, C>),
        )
        .route(
            "/dashboard/invoices/{id}/delete",
            web::post().to(delete_invoice::<S, C>),
        );
}

fn see_other(route: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header((header::LOCATION, route))
        .finish()
}

pub async fn health_check() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "invoice-desk",
        "version": crate::VERSION,
    })))
}

/// GET /dashboard/invoices - the cached list view
pub async fn list_invoices<S, C>(
    service: web::Data<InvoiceService<S, C>>,
) -> Result<HttpResponse>
where
    S: InvoiceStore + CustomerStore + 'static,
    C: RouteCache + 'static,
{
    let invoices = service.invoices().await?;
    Ok(HttpResponse::Ok().json(invoices))
}

/// GET /dashboard/invoices/new - customers for the create form's selector
pub async fn new_invoice_form<S, C>(
    service: web::Data<InvoiceService<S, C>>,
) -> Result<HttpResponse>
where
    S: InvoiceStore + CustomerStore + 'static,
    C: RouteCache + 'static,
{
    let customers = service.customers().await?;
    Ok(HttpResponse::Ok().json(customers))
}

/// GET /dashboard/invoices/{id}/edit - hydrate the edit form
///
/// Invoice and customer list are fetched concurrently; an unresolvable id
/// surfaces as a page-level 404.
pub async fn edit_invoice_form<S, C>(
    path: web::Path<String>,
    service: web::Data<InvoiceService<S, C>>,
) -> Result<HttpResponse>
where
    S: InvoiceStore + CustomerStore + 'static,
    C: RouteCache + 'static,
{
    let id = path.into_inner();
    let (invoice, customers) = futures::try_join!(service.invoice(&id), service.customers())?;

    Ok(HttpResponse::Ok().json(EditInvoiceView { invoice, customers }))
}

/// POST /dashboard/invoices - create from a form submission
///
/// 303 to the invoices list when the write lands; 422 with the next
/// Form-State otherwise.
pub async fn create_invoice<S, C>(
    form: web::Form<HashMap<String, String>>,
    service: web::Data<InvoiceService<S, C>>,
) -> Result<HttpResponse>
where
    S: InvoiceStore + CustomerStore + 'static,
    C: RouteCache + 'static,
{
    let raw = RawForm::from(form.into_inner());

    match service.create_invoice(&FormState::empty(), &raw).await {
        MutationOutcome::Redirect(route) => Ok(see_other(route)),
        MutationOutcome::Form(state) => Ok(HttpResponse::UnprocessableEntity().json(state)),
    }
}

/// POST /dashboard/invoices/{id}/edit - update from a form submission
pub async fn update_invoice<S, C>(
    path: web::Path<String>,
    form: web::Form<HashMap<String, String>>,
    service: web::Data<InvoiceService<S, C>>,
) -> Result<HttpResponse>
where
    S: InvoiceStore + CustomerStore + 'static,
    C: RouteCache + 'static,
{
    let id = path.into_inner();
    let raw = RawForm::from(form.into_inner());

    match service.update_invoice(&id, &FormState::empty(), &raw).await {
        MutationOutcome::Redirect(route) => Ok(see_other(route)),
        MutationOutcome::Form(state) => Ok(HttpResponse::UnprocessableEntity().json(state)),
    }
}

/// POST /dashboard/invoices/{id}/delete - delete from within the list view
///
/// Never redirects; the list re-renders in place with the returned message.
pub async fn delete_invoice<S, C>(
    path: web::Path<String>,
    service: web::Data<InvoiceService<S, C>>,
) -> Result<HttpResponse>
where
    S: InvoiceStore + CustomerStore + 'static,
    C: RouteCache + 'static,
{
    let id = path.into_inner();
    let state = service.delete_invoice(&id).await;
    Ok(HttpResponse::Ok().json(state))
}

/// POST /login - run the sign-in form through the credential gate
///
/// Invalid credentials come back as a 401 with a Form-State message; any
/// unclassified gate failure propagates as a 500.
pub async fn login<G>(
    form: web::Form<HashMap<String, String>>,
    gate: web::Data<G>,
) -> Result<HttpResponse>
where
    G: CredentialGate + 'static,
{
    let raw = RawForm::from(form.into_inner());

    match authenticate(gate.get_ref(), &raw).await? {
        AuthOutcome::SignedIn => Ok(see_other("/dashboard")),
        AuthOutcome::InvalidCredentials => Ok(HttpResponse::Unauthorized()
            .json(FormState::with_message("Invalid credentials."))),
    }
}
