mod admin;
pub mod calories;
mod dto;
mod error;
mod extract;
pub mod handlers;
pub mod matcher;
#[cfg(test)]
pub(crate) mod memory;
pub mod repo;
pub mod repo_types;
mod services;
pub mod store;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::routes())
        .merge(admin::routes())
}
