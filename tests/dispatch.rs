mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::send;
use http::header::{CONTENT_TYPE, SET_COOKIE};
use http::{HeaderMap, HeaderValue, StatusCode};
use restive::middleware::{Next, Wrapper};
use restive::{Api, Body, JsonError, Method, Request, Resource, Response};
use serde_json::json;

const VERBS: [&str; 6] = ["GET", "POST", "PUT", "DELETE", "HEAD", "PATCH"];

async fn hello(_req: Request) -> (StatusCode, Body) {
    (StatusCode::OK, Body::data("hello"))
}

async fn echo_id(req: Request) -> (StatusCode, Body) {
    (StatusCode::OK, Body::data(req.param("id").unwrap_or_default().to_owned()))
}

/// Appends `name` to the `x-trace` response header on the way out.
fn stamp(name: &'static str) -> Wrapper {
    Wrapper::new(move |req: Request, next: Next| async move {
        let mut res = next.run(req).await;
        res.headers.append("x-trace", HeaderValue::from_static(name));
        res
    })
}

fn trace(headers: &HeaderMap) -> Vec<&str> {
    headers.get_all("x-trace").iter().map(|v| v.to_str().unwrap()).collect()
}

#[tokio::test]
async fn get_only_resource_rejects_other_verbs() {
    let api = Api::new(vec![]).resource("/hello", Resource::new().get(hello), &[]).unwrap();

    let ok = send(&api, "GET", "/hello", &[], "").await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.json, json!({"status": 200, "data": "hello"}));

    for verb in &VERBS[1..] {
        let res = send(&api, verb, "/hello", &[], "").await;
        assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED, "{verb}");
        assert_eq!(res.json, json!({"status": 405, "error": format!("{verb} method not allowed.")}));
    }
}

#[tokio::test]
async fn resource_without_handlers_allows_nothing() {
    let api = Api::new(vec![]).resource("/void", Resource::new(), &[]).unwrap();
    for verb in VERBS {
        assert_eq!(send(&api, verb, "/void", &[], "").await.status, StatusCode::METHOD_NOT_ALLOWED);
    }
}

#[tokio::test]
async fn unknown_paths_and_methods() {
    let api = Api::new(vec![]).resource("/hello", Resource::new().get(hello), &[]).unwrap();

    let missing = send(&api, "GET", "/nope", &[], "").await;
    assert_eq!(missing.json, json!({"status": 404, "error": "Page not found."}));

    let options = send(&api, "OPTIONS", "/hello", &[], "").await;
    assert_eq!(options.json, json!({"status": 405, "error": "OPTIONS method not allowed."}));

    let purge = send(&api, "PURGE", "/hello", &[], "").await;
    assert_eq!(purge.json, json!({"status": 405, "error": "PURGE method not allowed."}));
}

#[tokio::test]
async fn custom_not_found_runs_inside_global_wrappers() {
    let api = Api::new(vec![stamp("global")])
        .not_found(|req: Request| async move {
            JsonError::new(StatusCode::NOT_FOUND, format!("{} is not here.", req.path()))
        });

    let res = send(&api, "GET", "/lost", &[], "").await;
    assert_eq!(res.json, json!({"status": 404, "error": "/lost is not here."}));
    assert_eq!(trace(&res.headers), ["global"]);
}

#[tokio::test]
async fn path_params_reach_the_handler() {
    let api = Api::new(vec![]).resource("/items/{id}", Resource::new().get(echo_id), &[]).unwrap();
    let res = send(&api, "GET", "/items/42", &[], "").await;
    assert_eq!(res.json["data"], "42");
}

#[tokio::test]
async fn resource_wrappers_wrap_global_wrappers() {
    let api = Api::new(vec![stamp("global-a"), stamp("global-b")])
        .resource("/hello", Resource::new().get(hello), &[stamp("resource")])
        .unwrap();

    // Stamps are appended on the way out, so the innermost layer comes first.
    let res = send(&api, "GET", "/hello", &[], "").await;
    assert_eq!(trace(&res.headers), ["global-b", "global-a", "resource"]);

    let rejected = send(&api, "DELETE", "/hello", &[], "").await;
    assert_eq!(trace(&rejected.headers), ["global-b", "global-a"]);
}

#[tokio::test]
async fn plain_routes_skip_global_wrappers() {
    let api = Api::new(vec![stamp("global")])
        .route(Method::Get, "/raw", hello)
        .unwrap();
    let res = send(&api, "GET", "/raw", &[], "").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(trace(&res.headers).is_empty());
}

#[tokio::test]
async fn short_circuit_skips_the_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let handler = {
        let calls = Arc::clone(&calls);
        move |_req: Request| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { StatusCode::OK }
        }
    };
    let gate = Wrapper::new(|req: Request, next: Next| async move {
        if req.header("x-open").is_some() {
            next.run(req).await
        } else {
            JsonError::new(StatusCode::FORBIDDEN, "Closed.").into()
        }
    });
    let api = Api::new(vec![]).resource("/gate", Resource::new().get(handler), &[gate]).unwrap();

    let closed = send(&api, "GET", "/gate", &[], "").await;
    assert_eq!(closed.status, StatusCode::FORBIDDEN);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let open = send(&api, "GET", "/gate", &[("x-open", "1")], "").await;
    assert_eq!(open.status, StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn wire_format() {
    let api = Api::new(vec![])
        .route(Method::Get, "/cookies", |_req: Request| async {
            Response::builder()
                .status(StatusCode::CREATED)
                .header(SET_COOKIE, HeaderValue::from_static("a=1"))
                .header(SET_COOKIE, HeaderValue::from_static("b=2"))
                .header(CONTENT_TYPE, HeaderValue::from_static("text/html"))
                .body(Body::data(json!({"ok": true})))
        })
        .unwrap();

    let res = send(&api, "GET", "/cookies", &[], "").await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.headers[CONTENT_TYPE], "application/json; charset=UTF-8");
    assert_eq!(res.headers.get_all(SET_COOKIE).iter().count(), 2);
    assert_eq!(res.text, "{\n  \"status\": 201,\n  \"data\": {\n    \"ok\": true\n  }\n}\n");
}

#[tokio::test]
async fn envelope_status_is_the_wire_status() {
    let api = Api::new(vec![])
        .route(Method::Get, "/teapot", |_req: Request| async {
            (StatusCode::OK, JsonError::new(StatusCode::IM_A_TEAPOT, "Short and stout."))
        })
        .unwrap();

    let res = send(&api, "GET", "/teapot", &[], "").await;
    assert_eq!(res.status, StatusCode::IM_A_TEAPOT);
    assert_eq!(res.json["status"], 418);
}

#[tokio::test]
async fn unserializable_body_becomes_500() {
    let api = Api::new(vec![])
        .route(Method::Get, "/broken", |_req: Request| async {
            let mut map = HashMap::new();
            map.insert(vec![1u8], "sequence keys are not valid JSON object keys");
            let mut headers = HeaderMap::new();
            headers.insert("x-dropped", HeaderValue::from_static("yes"));
            (StatusCode::OK, Body::data(map), headers)
        })
        .unwrap();

    let res = send(&api, "GET", "/broken", &[], "").await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.headers.get("x-dropped").is_none());
    assert_eq!(res.json["status"], 500);
    assert!(res.json["error"].as_str().unwrap().starts_with("Internal server error. "));
}

#[tokio::test]
async fn conflicting_registration_is_an_error() {
    let err = Api::new(vec![])
        .resource("/dup", Resource::new().get(hello), &[])
        .unwrap()
        .route(Method::Get, "/dup", hello)
        .err()
        .unwrap();
    assert!(matches!(err, restive::Error::Route { .. }));
}
