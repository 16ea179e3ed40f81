//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated response
//! bodies and expected parse results. Response status codes are recorded but
//! never consulted: decoding always runs on the body.

use newsblur_core::{
    Classifiers, Error, HttpMethod, HttpRequest, LoginOutput, NewsblurClient, Story,
};
use pretty_assertions::assert_eq;
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> NewsblurClient {
    NewsblurClient::new(BASE_URL)
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn expected_form(expected: &Value) -> Vec<(String, String)> {
    expected["form"]
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn check_post(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(
        req.url(),
        format!("{BASE_URL}{}", expected["path"].as_str().unwrap()),
        "{name}: url"
    );
    assert_eq!(req.form, expected_form(expected), "{name}: form");
}

fn body(case: &Value) -> &[u8] {
    case["simulated_response"]["body"].as_str().unwrap().as_bytes()
}

fn assert_error_kind(name: &str, err: &Error, kind: &str) {
    let matched = match kind {
        "Authentication" => matches!(err, Error::Authentication { .. }),
        "Decode" => matches!(err, Error::Decode(_)),
        other => panic!("{name}: unknown expected_error: {other}"),
    };
    assert!(matched, "{name}: expected {kind}, got {err:?}");
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[test]
fn login_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/login.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];

        let req = c.build_login(
            input["username"].as_str().unwrap(),
            input["password"].as_str().unwrap(),
        );
        check_post(name, &req, &case["expected_request"]);

        let result = c.parse_login(body(&case));
        if let Some(kind) = case.get("expected_error") {
            assert_error_kind(name, &result.unwrap_err(), kind.as_str().unwrap());
        } else {
            let expected: LoginOutput = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Feed stories
// ---------------------------------------------------------------------------

#[test]
fn reader_feed_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/reader_feed.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let expected_req = &case["expected_request"];

        let req = c.build_reader_feed(
            input["feed_id"].as_str().unwrap(),
            input["page"].as_u64().unwrap() as u32,
        );
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(
            req.url(),
            format!("{BASE_URL}{}", expected_req["url"].as_str().unwrap()),
            "{name}: url"
        );
        assert!(req.form.is_empty(), "{name}: GET carries no form");

        let result = c.parse_reader_feed(body(&case));
        if let Some(kind) = case.get("expected_error") {
            assert_error_kind(name, &result.unwrap_err(), kind.as_str().unwrap());
        } else {
            let expected: Vec<Story> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap().stories, expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// River
// ---------------------------------------------------------------------------

#[test]
fn river_stories_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/river_stories.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let feeds: Vec<&str> = input["feeds"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f.as_str().unwrap())
            .collect();

        let req = c.build_reader_river_stories(feeds.as_slice(), input["page"].as_u64().unwrap() as u32);
        check_post(name, &req, &case["expected_request"]);

        let out = c.parse_reader_river_stories(body(&case)).unwrap();
        let hashes: Vec<&str> = out.stories.iter().map(|s| s.story_hash.as_str()).collect();
        let expected: Vec<&str> = case["expected_hashes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| h.as_str().unwrap())
            .collect();
        assert_eq!(hashes, expected, "{name}: hashes");
    }
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

#[test]
fn classifier_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/classifier.json")) {
        let name = case["name"].as_str().unwrap();
        let feed_id = case["input_feed_id"].as_str().unwrap();

        let req = c.build_classifier(feed_id);
        assert_eq!(req.method, HttpMethod::Get, "{name}: method");
        assert_eq!(req.url(), format!("{BASE_URL}/classifier/{feed_id}"), "{name}: url");

        let out = c.parse_classifier(body(&case)).unwrap();
        let expected: Classifiers = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(out.payload, expected, "{name}: payload");
    }
}
