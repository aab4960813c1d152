//! CRUD routes for one resource type: `/{path}` and `/{path}/:id`.

use crate::handlers::resource::{create, delete as delete_handler, list, read, update};
use crate::resource::Resource;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn resource_routes<R: Resource>() -> Router<AppState> {
    Router::new()
        .route(&format!("/{}", R::PATH), get(list::<R>).post(create::<R>))
        .route(
            &format!("/{}/:id", R::PATH),
            get(read::<R>).put(update::<R>).delete(delete_handler::<R>),
        )
}
