//! The blog's RESTful routes.
//!
//! | Method | Path              | Action                                    |
//! |--------|-------------------|-------------------------------------------|
//! | GET    | `/`               | redirect to `/blogs`                      |
//! | GET    | `/blogs`          | list every post                           |
//! | GET    | `/blogs/new`      | empty form                                |
//! | POST   | `/blogs`          | sanitize, create, redirect to `/blogs`    |
//! | GET    | `/blogs/{id}`     | show one post                             |
//! | GET    | `/blogs/{id}/edit`| prefilled form                            |
//! | PUT    | `/blogs/{id}`     | sanitize, update, redirect to the post    |
//! | DELETE | `/blogs/{id}`     | delete, redirect to `/blogs`              |

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::form::PostForm;
use crate::handler::with_state;
use crate::health;
use crate::method::Method;
use crate::post::{NewPost, PostChanges, PostId};
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::router::Router;
use crate::status::Status;
use crate::store::{PostStore, StoreError};
use crate::views;

pub type Store = Arc<dyn PostStore>;

/// Why a request could not be served. Renders itself as an error page.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("post not found")]
    NotFound,

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound => Status::NotFound,
            Self::Store(e) => {
                error!(error = %e, "store operation failed");
                Status::InternalServerError
            }
        };
        Response::builder().status(status).html(views::error(status))
    }
}

/// Builds the full application router around `store`.
pub fn routes(store: Store) -> Router {
    Router::new()
        .on(Method::Get,    "/",                 root)
        .on(Method::Get,    "/blogs",            with_state(store.clone(), index))
        .on(Method::Get,    "/blogs/new",        new)
        .on(Method::Post,   "/blogs",            with_state(store.clone(), create))
        .on(Method::Get,    "/blogs/{id}",       with_state(store.clone(), show))
        .on(Method::Get,    "/blogs/{id}/edit",  with_state(store.clone(), edit))
        .on(Method::Put,    "/blogs/{id}",       with_state(store.clone(), update))
        .on(Method::Delete, "/blogs/{id}",       with_state(store.clone(), destroy))
        .on(Method::Get,    "/healthz",          health::liveness)
        .on(Method::Get,    "/readyz",           with_state(store, health::readiness))
}

/// An id that does not parse can never name a stored post.
fn post_id(req: &Request) -> Result<PostId, AppError> {
    req.param("id")
        .and_then(|id| id.parse().ok())
        .ok_or(AppError::NotFound)
}

async fn root(_req: Request) -> Response {
    Response::redirect("/blogs")
}

async fn index(_req: Request, store: Store) -> Result<Response, AppError> {
    let posts = store.list_all().await?;
    info!(count = posts.len(), "posts loaded from database");
    Ok(Response::html(views::index(&posts)))
}

async fn new(_req: Request) -> Response {
    Response::html(views::new_post())
}

async fn create(req: Request, store: Store) -> Result<Response, AppError> {
    let post = NewPost::from_form(PostForm::from(&req.form()));
    let post = store.create(post).await?;
    info!(post_id = %post.id, "post created");
    Ok(Response::redirect("/blogs"))
}

async fn show(req: Request, store: Store) -> Result<Response, AppError> {
    let post = store.get_by_id(post_id(&req)?).await?;
    info!(post_id = %post.id, "post retrieved from database");
    Ok(Response::html(views::show(&post)))
}

async fn edit(req: Request, store: Store) -> Result<Response, AppError> {
    let post = store.get_by_id(post_id(&req)?).await?;
    info!(post_id = %post.id, "post retrieved for editing");
    Ok(Response::html(views::edit(&post)))
}

async fn update(req: Request, store: Store) -> Result<Response, AppError> {
    let id = post_id(&req)?;
    let changes = PostChanges::from_form(PostForm::from(&req.form()));
    let post = store.update_by_id(id, changes).await?;
    info!(post_id = %post.id, "post updated");
    Ok(Response::redirect(&post.url()))
}

async fn destroy(req: Request, store: Store) -> Result<Response, AppError> {
    let id = post_id(&req)?;
    store.delete_by_id(id).await?;
    info!(post_id = %id, "post deleted");
    Ok(Response::redirect("/blogs"))
}
