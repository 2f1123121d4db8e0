//! HTTP layer: actix-web handlers over the invoice service.
//!
//! Handlers stay thin - they translate form posts into service calls and
//! service outcomes into responses (303 redirects for landed writes,
//! Form-State JSON for everything the form must re-render).

pub mod error;
pub mod routes;

pub use error::{ApiError, ErrorBody};
pub use routes::configure;
