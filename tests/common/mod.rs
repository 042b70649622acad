#![allow(dead_code)]

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use http_body_util::BodyExt;
use restive::Api;
use serde_json::Value;

pub const PRIVATE: &[u8] = include_bytes!("../fixtures/private.pem");
pub const PUBLIC: &[u8] = include_bytes!("../fixtures/public.pem");

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
    pub json: Value,
}

pub async fn send(api: &Api, method: &str, uri: &str, headers: &[(&str, &str)], body: &str) -> Reply {
    let mut req = http::Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        req = req.header(*name, *value);
    }
    let req = req.body(Bytes::copy_from_slice(body.as_bytes())).unwrap();

    let res = api.dispatch(req).await;
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let json = serde_json::from_str(&text).unwrap();

    Reply { status, headers, text, json }
}
