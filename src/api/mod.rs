/// API routes and handlers
pub mod ccip;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new().merge(ccip::routes())
}
