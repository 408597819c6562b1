mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{get, send, test_app, test_config, MemoryStudentStore};

async fn seed(store: &MemoryStudentStore) {
    store.seed("Juan dela Cruz", "BSIT", 2).await;
    store.seed("Maria Clara", "BSCS", 2).await;
    store.seed("Jose Rizal", "BSIT", 4).await;
    store.seed("Andres 100%", "BSCS", 1).await;
}

fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("array")
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn search_without_filters_equals_list() {
    let (app, store) = test_app(test_config());
    seed(&store).await;

    let all = send(&app, get("/students")).await.json();
    let searched = send(&app, get("/students/search")).await;

    assert_eq!(searched.status, StatusCode::OK);
    assert_eq!(searched.json(), all);
}

#[tokio::test]
async fn name_is_a_substring_match() {
    let (app, store) = test_app(test_config());
    seed(&store).await;

    let res = send(&app, get("/students/search?name=o")).await;
    assert_eq!(names(&res.json()), vec!["Jose Rizal"]);

    let res = send(&app, get("/students/search?name=dela")).await;
    assert_eq!(names(&res.json()), vec!["Juan dela Cruz"]);
}

#[tokio::test]
async fn course_and_year_level_are_exact_and_anded() {
    let (app, store) = test_app(test_config());
    seed(&store).await;

    let res = send(&app, get("/students/search?course=BSIT")).await;
    assert_eq!(names(&res.json()), vec!["Juan dela Cruz", "Jose Rizal"]);

    let res = send(&app, get("/students/search?course=BSIT&year_level=4")).await;
    assert_eq!(names(&res.json()), vec!["Jose Rizal"]);

    let res = send(&app, get("/students/search?course=BS")).await;
    assert_eq!(res.json(), json!([]));
}

#[tokio::test]
async fn no_match_is_empty_200_not_404() {
    let (app, store) = test_app(test_config());
    seed(&store).await;

    let res = send(&app, get("/students/search?name=Bonifacio&year_level=5")).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!([]));
}

#[tokio::test]
async fn blank_and_malformed_filters_are_ignored() {
    let (app, store) = test_app(test_config());
    seed(&store).await;

    let res = send(&app, get("/students/search?name=&course=&year_level=second")).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json().as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn percent_in_name_matches_literally() {
    let (app, store) = test_app(test_config());
    seed(&store).await;

    let res = send(&app, get("/students/search?name=100%25")).await;
    assert_eq!(names(&res.json()), vec!["Andres 100%"]);
}

#[tokio::test]
async fn search_is_not_mistaken_for_an_id() {
    let (app, _store) = test_app(test_config());

    let res = send(&app, get("/students/search")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.json().is_array());
}
