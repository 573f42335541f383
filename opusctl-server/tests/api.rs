//! End-to-end API tests through the full router.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p opusctl-server -- --ignored

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use opusctl_server::{build_router, ServerConfig};

struct Api {
    router: Router,
}

impl Api {
    fn new(pool: PgPool) -> Self {
        Self {
            router: build_router(pool, &ServerConfig::default()),
        }
    }

    async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_composer(&self, body: Value) -> String {
        let (status, created) = self.call("POST", "/composers", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{}", created);
        created["id"].as_str().unwrap().to_owned()
    }
}

fn names(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect()
}

#[sqlx::test(migrator = "opusctl_server::MIGRATOR")]
#[ignore = "requires database"]
async fn ravel_bolero_walkthrough(pool: PgPool) {
    let api = Api::new(pool);

    let (status, ravel) = api
        .call(
            "POST",
            "/composers",
            Some(json!({ "name": "Ravel", "born": 1875, "era": "Impressionist" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ravel["name"], "Ravel");
    assert_eq!(ravel["born"], 1875);
    assert_eq!(ravel["era"], "Impressionist");
    assert_eq!(ravel["notableWorks"], json!([]));

    let uri = format!("/composers/{}/works", ravel["id"].as_str().unwrap());
    for _ in 0..2 {
        let (status, updated) = api
            .call("POST", &uri, Some(json!({ "title": "Boléro" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["notableWorks"], json!(["Boléro"]));
    }

    let (status, updated) = api
        .call("DELETE", &uri, Some(json!({ "title": "Boléro" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["notableWorks"], json!([]));
}

#[sqlx::test(migrator = "opusctl_server::MIGRATOR")]
#[ignore = "requires database"]
async fn composer_crud(pool: PgPool) {
    let api = Api::new(pool);
    let id = api
        .create_composer(json!({ "name": "Bach", "born": 1685, "death": 1750 }))
        .await;

    let (status, fetched) = api.call("GET", &format!("/composers/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["death"], 1750);

    let (status, updated) = api
        .call(
            "PUT",
            &format!("/composers/{}", id),
            Some(json!({ "era": "Baroque" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["era"], "Baroque");
    assert_eq!(updated["born"], 1685);

    let (status, _) = api
        .call("POST", "/composers", Some(json!({ "name": "Bach", "born": 1700 })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    for _ in 0..2 {
        let (status, _) = api
            .call("DELETE", &format!("/composers/{}", id), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (status, body) = api.call("GET", &format!("/composers/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = api
        .call(
            "PUT",
            &format!("/composers/{}", id),
            Some(json!({ "era": "Baroque" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrator = "opusctl_server::MIGRATOR")]
#[ignore = "requires database"]
async fn composer_list_filters_and_sort(pool: PgPool) {
    let api = Api::new(pool);
    api.create_composer(json!({ "name": "Mozart", "born": 1756, "era": "Classical" }))
        .await;
    api.create_composer(json!({ "name": "Haydn", "born": 1732, "era": "Classical" }))
        .await;
    api.create_composer(json!({ "name": "Brahms", "born": 1833, "era": "Romantic" }))
        .await;

    let (_, list) = api.call("GET", "/composers?era=Classical&sort=born", None).await;
    assert_eq!(names(&list), ["Haydn", "Mozart"]);

    let (_, list) = api.call("GET", "/composers?sort=-born", None).await;
    assert_eq!(names(&list), ["Brahms", "Mozart", "Haydn"]);

    let (_, list) = api
        .call("GET", "/composers?bornAfter=1740&bornBefore=1900", None)
        .await;
    assert_eq!(names(&list), ["Brahms", "Mozart"]);

    let (_, list) = api.call("GET", "/composers?name=AHM", None).await;
    assert_eq!(names(&list), ["Brahms"]);

    let (_, list) = api.call("GET", "/composers?born=1756", None).await;
    assert_eq!(names(&list), ["Mozart"]);
}

#[sqlx::test(migrator = "opusctl_server::MIGRATOR")]
#[ignore = "requires database"]
async fn works_and_detail(pool: PgPool) {
    let api = Api::new(pool);
    let debussy = api
        .create_composer(json!({ "name": "Debussy", "born": 1862 }))
        .await;
    let satie = api
        .create_composer(json!({ "name": "Satie", "born": 1866 }))
        .await;

    let (status, work) = api
        .call(
            "POST",
            "/works",
            Some(json!({
                "title": "La mer",
                "composerId": debussy,
                "year": 1905,
                "type": "Orchestral",
                "durationMin": 23.5
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(work["type"], "Orchestral");
    assert_eq!(work["composerId"], debussy.as_str());

    api.call(
        "POST",
        "/works",
        Some(json!({ "title": "Gymnopédie No. 1", "composerId": satie, "year": 1888 })),
    )
    .await;

    let (status, body) = api
        .call(
            "POST",
            "/works",
            Some(json!({
                "title": "Ghost",
                "composerId": "67e55044-10b1-426f-9247-bb680e5fe0c8"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (_, all) = api.call("GET", "/works", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, by_year) = api.call("GET", "/works?year=1888", None).await;
    assert_eq!(by_year[0]["title"], "Gymnopédie No. 1");

    let (_, by_q) = api.call("GET", "/works?q=MER", None).await;
    assert_eq!(by_q.as_array().unwrap().len(), 1);

    let (status, by_composer) = api
        .call("GET", &format!("/works/by-composer/{}", debussy), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_composer.as_array().unwrap().len(), 1);

    let (status, detail) = api
        .call("GET", &format!("/composers/{}/detail", debussy), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["name"], "Debussy");
    assert_eq!(detail["works"].as_array().unwrap().len(), 1);
    assert_eq!(detail["works"][0]["title"], "La mer");

    let work_uri = format!("/works/{}", work["id"].as_str().unwrap());
    let (status, updated) = api
        .call("PUT", &work_uri, Some(json!({ "notes": "Three symphonic sketches" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["notes"], "Three symphonic sketches");

    let (status, _) = api.call("DELETE", &work_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = api.call("GET", &work_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrator = "opusctl_server::MIGRATOR")]
#[ignore = "requires database"]
async fn stats_endpoint(pool: PgPool) {
    let api = Api::new(pool);

    let (status, empty) = api.call("GET", "/composers/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty, json!({ "total": 0, "avgBorn": null, "byEra": [] }));

    api.create_composer(json!({ "name": "Chopin", "born": 1810, "era": "Romantic" }))
        .await;
    api.create_composer(json!({ "name": "Liszt", "born": 1811, "era": "Romantic" }))
        .await;
    api.create_composer(json!({ "name": "Mendelssohn", "born": 1809 }))
        .await;

    let (_, stats) = api.call("GET", "/composers/stats", None).await;
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["avgBorn"], 1810.0);

    let by_era = stats["byEra"].as_array().unwrap();
    let romantic = by_era.iter().find(|e| e["era"] == "Romantic").unwrap();
    assert_eq!(romantic["count"], 2);
    let unset = by_era.iter().find(|e| e["era"].is_null()).unwrap();
    assert_eq!(unset["count"], 1);
}

#[sqlx::test(migrator = "opusctl_server::MIGRATOR")]
#[ignore = "requires database"]
async fn names_round_trip_as_submitted(pool: PgPool) {
    let api = Api::new(pool);

    let (status, created) = api
        .call("POST", "/composers", Some(json!({ "name": "  Ravel ", "born": 1875 })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "  Ravel ");

    let uri = format!("/composers/{}", created["id"].as_str().unwrap());
    let (status, fetched) = api.call("GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "  Ravel ");

    // A different spelling is a different composer.
    let (status, _) = api
        .call("POST", "/composers", Some(json!({ "name": "Ravel", "born": 1875 })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[sqlx::test(migrator = "opusctl_server::MIGRATOR")]
#[ignore = "requires database"]
async fn long_text_and_late_death_are_accepted(pool: PgPool) {
    let api = Api::new(pool);
    let long_name = "N".repeat(300);
    let long_title = "T".repeat(300);

    let (status, composer) = api
        .call(
            "POST",
            "/composers",
            Some(json!({ "name": long_name, "born": 1990, "death": 2030 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", composer);
    assert_eq!(composer["name"], long_name);
    assert_eq!(composer["death"], 2030);
    let id = composer["id"].as_str().unwrap();

    let (status, updated) = api
        .call(
            "POST",
            &format!("/composers/{}/works", id),
            Some(json!({ "title": long_title })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["notableWorks"], json!([long_title]));

    let (status, work) = api
        .call(
            "POST",
            "/works",
            Some(json!({ "title": long_title, "composerId": id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", work);
    assert_eq!(work["title"], long_title);

    let (status, _) = api
        .call("PUT", &format!("/composers/{}", id), Some(json!({ "death": 2100 })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = api
        .call("POST", "/composers", Some(json!({ "name": "Future", "born": 2030 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "born");
}

#[sqlx::test(migrator = "opusctl_server::MIGRATOR")]
#[ignore = "requires database"]
async fn null_clears_and_absent_keeps(pool: PgPool) {
    let api = Api::new(pool);
    let id = api
        .create_composer(json!({
            "name": "Ravel",
            "born": 1875,
            "death": 1937,
            "era": "Impressionist",
        }))
        .await;
    let uri = format!("/composers/{}", id);

    let (status, updated) = api.call("PUT", &uri, Some(json!({ "death": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated.get("death").is_none(), "{}", updated);
    assert_eq!(updated["era"], "Impressionist");

    let (_, fetched) = api.call("GET", &uri, None).await;
    assert!(fetched.get("death").is_none());
    assert_eq!(fetched["born"], 1875);

    let (status, work) = api
        .call(
            "POST",
            "/works",
            Some(json!({ "title": "Boléro", "composerId": id, "year": 1928, "notes": "ballet" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let work_uri = format!("/works/{}", work["id"].as_str().unwrap());

    let (status, work) = api
        .call("PUT", &work_uri, Some(json!({ "year": null })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(work.get("year").is_none());
    assert_eq!(work["notes"], "ballet");
}

#[sqlx::test(migrator = "opusctl_server::MIGRATOR")]
#[ignore = "requires database"]
async fn health_reports_database(pool: PgPool) {
    let api = Api::new(pool);
    let (status, body) = api.call("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}
