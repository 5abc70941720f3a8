//! End-to-end behaviour of the blog routes, driven through `Router::call`
//! against the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use blogs::{
    MemoryStore, NewPost, Post, PostChanges, PostId, PostStore, Response, Router, Status,
    StoreError,
};
use bytes::Bytes;

fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (blogs::routes(store.clone()), store)
}

fn get(uri: &str) -> http::Request<Bytes> {
    http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(Bytes::new())
        .expect("valid request")
}

fn send(method: &str, uri: &str, form: &str) -> http::Request<Bytes> {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Bytes::from(form.to_owned()))
        .expect("valid request")
}

fn html(res: &Response) -> String {
    String::from_utf8(res.body().to_vec()).expect("utf-8 body")
}

async fn seed(store: &MemoryStore, title: &str) -> Post {
    store
        .create(NewPost {
            title: title.to_owned(),
            image: None,
            body: format!("{title} body"),
        })
        .await
        .expect("seed post")
}

#[tokio::test]
async fn root_redirects_to_index() {
    let (app, _) = app();
    let res = app.call(get("/")).await;
    assert_eq!(res.status_code(), Status::Found);
    assert_eq!(res.header("location"), Some("/blogs"));
}

#[tokio::test]
async fn create_sanitizes_and_show_renders_it() {
    let (app, store) = app();

    let res = app
        .call(send("POST", "/blogs", "blog%5Btitle%5D=Hi&blog%5Bbody%5D=%3Cb%3Ex%3C%2Fb%3E"))
        .await;
    assert_eq!(res.status_code(), Status::Found);
    assert_eq!(res.header("location"), Some("/blogs"));

    let posts = store.list_all().await.expect("list");
    assert_eq!(posts.len(), 1);
    let post = &posts[0];
    assert_eq!(post.title, "Hi");
    assert_eq!(post.body, "x");

    let res = app.call(get(&format!("/blogs/{}", post.id))).await;
    assert_eq!(res.status_code(), Status::Ok);
    let page = html(&res);
    assert!(page.contains("<h1>Hi</h1>"));
    assert!(page.contains(r#"<div class="body">x</div>"#));
}

#[tokio::test]
async fn flat_field_names_work_too() {
    let (app, store) = app();
    app.call(send("POST", "/blogs", "title=Hi&body=%3Cb%3Ex%3C%2Fb%3E")).await;

    let posts = store.list_all().await.expect("list");
    assert_eq!(posts[0].title, "Hi");
    assert_eq!(posts[0].body, "x");
}

#[tokio::test]
async fn script_never_reaches_the_store() {
    let (app, store) = app();
    app.call(send(
        "POST",
        "/blogs",
        "blog[title]=t&blog[body]=before%3Cscript%3Ealert(1)%3C%2Fscript%3Eafter",
    ))
    .await;

    let body = &store.list_all().await.expect("list")[0].body;
    assert_eq!(body, "beforeafter");
    assert!(!body.contains('<'));
}

#[tokio::test]
async fn spliced_tags_never_reach_the_store() {
    let (app, store) = app();
    app.call(send(
        "POST",
        "/blogs",
        "blog[title]=t&blog[body]=%3C%3Cb%3Eimg+src%3Dx+onerror%3Dalert(1)%3E",
    ))
    .await;

    let body = &store.list_all().await.expect("list")[0].body;
    assert!(!body.contains("<img"), "{body:?}");
    assert!(!body.contains("onerror"), "{body:?}");
}

#[tokio::test]
async fn index_lists_every_post() {
    let (app, store) = app();
    let a = seed(&store, "alpha").await;
    let b = seed(&store, "beta").await;

    let res = app.call(get("/blogs")).await;
    assert_eq!(res.status_code(), Status::Ok);
    let page = html(&res);
    assert!(page.contains(&format!("/blogs/{}", a.id)));
    assert!(page.contains(&format!("/blogs/{}", b.id)));
}

#[tokio::test]
async fn new_form_renders() {
    let (app, _) = app();
    let res = app.call(get("/blogs/new")).await;
    assert_eq!(res.status_code(), Status::Ok);
    assert!(html(&res).contains(r#"action="/blogs""#));
}

#[tokio::test]
async fn edit_form_is_prefilled() {
    let (app, store) = app();
    let post = seed(&store, "editable").await;

    let res = app.call(get(&format!("/blogs/{}/edit", post.id))).await;
    assert_eq!(res.status_code(), Status::Ok);
    assert!(html(&res).contains(r#"value="editable""#));
}

#[tokio::test]
async fn put_via_override_updates_and_redirects_to_post() {
    let (app, store) = app();
    let post = seed(&store, "old").await;

    let uri = format!("/blogs/{}?_method=PUT", post.id);
    let res = app
        .call(send("POST", &uri, "blog[title]=new&blog[body]=%3Ci%3Efresh%3C%2Fi%3E"))
        .await;
    assert_eq!(res.status_code(), Status::Found);
    assert_eq!(res.header("location"), Some(post.url().as_str()));

    let updated = store.get_by_id(post.id).await.expect("get");
    assert_eq!(updated.title, "new");
    assert_eq!(updated.body, "fresh");
    assert_eq!(updated.id, post.id);
    assert_eq!(updated.created, post.created);
}

#[tokio::test]
async fn real_put_is_routed_too() {
    let (app, store) = app();
    let post = seed(&store, "old").await;

    let res = app
        .call(send("PUT", &format!("/blogs/{}", post.id), "title=direct"))
        .await;
    assert_eq!(res.status_code(), Status::Found);
    let updated = store.get_by_id(post.id).await.expect("get");
    assert_eq!(updated.title, "direct");
    assert_eq!(updated.body, post.body);
}

#[tokio::test]
async fn delete_via_override_removes_post() {
    let (app, store) = app();
    let post = seed(&store, "doomed").await;

    let res = app
        .call(send("POST", &format!("/blogs/{}?_method=DELETE", post.id), ""))
        .await;
    assert_eq!(res.status_code(), Status::Found);
    assert_eq!(res.header("location"), Some("/blogs"));

    let res = app.call(get(&format!("/blogs/{}", post.id))).await;
    assert_eq!(res.status_code(), Status::NotFound);
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_404() {
    let (app, _) = app();
    let missing = PostId::new_v4();

    for uri in [
        format!("/blogs/{missing}"),
        format!("/blogs/{missing}/edit"),
        "/blogs/not-an-id".to_owned(),
    ] {
        let res = app.call(get(&uri)).await;
        assert_eq!(res.status_code(), Status::NotFound, "{uri}");
    }

    let res = app.call(send("DELETE", &format!("/blogs/{missing}"), "")).await;
    assert_eq!(res.status_code(), Status::NotFound);
    let res = app.call(send("PUT", "/blogs/nope", "title=x")).await;
    assert_eq!(res.status_code(), Status::NotFound);
}

#[tokio::test]
async fn health_probes() {
    let (app, _) = app();
    assert_eq!(app.call(get("/healthz")).await.status_code(), Status::Ok);
    assert_eq!(app.call(get("/readyz")).await.status_code(), Status::Ok);
}

/// A store whose backend is unreachable.
struct Unreachable;

#[async_trait]
impl PostStore for Unreachable {
    async fn list_all(&self) -> Result<Vec<Post>, StoreError> {
        Err(down())
    }
    async fn create(&self, _post: NewPost) -> Result<Post, StoreError> {
        Err(down())
    }
    async fn get_by_id(&self, _id: PostId) -> Result<Post, StoreError> {
        Err(down())
    }
    async fn update_by_id(&self, _id: PostId, _changes: PostChanges) -> Result<Post, StoreError> {
        Err(down())
    }
    async fn delete_by_id(&self, _id: PostId) -> Result<(), StoreError> {
        Err(down())
    }
    async fn ping(&self) -> Result<(), StoreError> {
        Err(down())
    }
}

fn down() -> StoreError {
    StoreError::Database("connection refused".to_owned())
}

#[tokio::test]
async fn database_errors_answer_500_instead_of_hanging() {
    let app = blogs::routes(Arc::new(Unreachable));
    let id = PostId::new_v4();

    let requests = [
        get("/blogs"),
        send("POST", "/blogs", "title=x"),
        get(&format!("/blogs/{id}")),
        get(&format!("/blogs/{id}/edit")),
        send("PUT", &format!("/blogs/{id}"), "title=x"),
        send("DELETE", &format!("/blogs/{id}"), ""),
    ];
    for req in requests {
        let res = app.call(req).await;
        assert_eq!(res.status_code(), Status::InternalServerError);
        assert!(!html(&res).contains("connection refused"));
    }

    assert_eq!(app.call(get("/readyz")).await.status_code(), Status::ServiceUnavailable);
}
