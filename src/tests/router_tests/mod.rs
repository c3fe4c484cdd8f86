mod write_tests;

use crate::router::App;
use crate::tests::utils::{init_test_db, seed, tower_snapshot};
use astra::{Body, Response};
use http::{Method, Request};
use std::io::Read;
use tempfile::TempDir;

/// A seeded app; keep the guard alive for the duration of the test.
pub fn seeded_app() -> (TempDir, App) {
    let (dir, db) = init_test_db();
    seed(&db, &tower_snapshot());
    (
        dir,
        App {
            db,
            trust_all: false,
        },
    )
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, permissions: &str, form: &[(&str, &str)]) -> Request<Body> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form.iter())
        .finish();
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("X-Permissions", permissions)
        .body(Body::from(body))
        .unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}
