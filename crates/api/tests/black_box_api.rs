use reqwest::{header, redirect, StatusCode};
use serde_json::{json, Value};

use stockroom_infra::DatabaseConfig;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, over a private in-memory database.
        let database = DatabaseConfig {
            seed_categories: true,
            ..DatabaseConfig::in_memory()
        };
        let app = stockroom_api::app::build_app(&database)
            .await
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            base_url,
            client,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, brand: &str, serial: &str, spec: &str, category_id: &str) -> reqwest::Response {
        self.client
            .post(self.url("/items"))
            .form(&[
                ("brand", brand),
                ("serial", serial),
                ("specification", spec),
                ("category_id", category_id),
            ])
            .send()
            .await
            .unwrap()
    }

    async fn view(&self, path: &str) -> (StatusCode, Value) {
        let res = self.client.get(self.url(path)).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }

    /// Id of the single listed item matching `serial`.
    async fn id_of(&self, serial: &str) -> i64 {
        let (_, body) = self.view(&format!("/items?search={serial}")).await;
        let rows = body["data"]["items"]["data"].as_array().unwrap();
        assert_eq!(rows.len(), 1, "expected one row for {serial}: {body}");
        rows[0]["id"].as_i64().unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn flash_cookie(res: &reqwest::Response) -> String {
    let raw = res
        .headers()
        .get(header::SET_COOKIE)
        .expect("missing set-cookie")
        .to_str()
        .unwrap();
    raw.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn health_is_ok() {
    let server = TestServer::spawn().await;
    let res = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_redirects_with_flash_shown_once_on_the_list() {
    let server = TestServer::spawn().await;

    let res = server.create("Dell", "SN001", "15in laptop", "1").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/items");
    let cookie = flash_cookie(&res);
    assert_eq!(cookie, "flash=item_saved");

    let res = server
        .client
        .get(server.url("/items"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = flash_cookie(&res);
    assert_eq!(cleared, "flash=");

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["view"], "items.index");
    assert_eq!(body["flash"]["level"], "success");
    assert_eq!(body["flash"]["message"], "Data saved successfully!");

    let items = &body["data"]["items"];
    assert_eq!(items["total"], 1);
    let row = &items["data"][0];
    assert_eq!(row["brand"], "Dell");
    assert_eq!(row["serial"], "SN001");
    assert_eq!(row["stock"], 0);
    assert_eq!(row["category_description"], "Capital Goods");

    let (_, body) = server.view("/items").await;
    assert_eq!(body["flash"], Value::Null);
}

#[tokio::test]
async fn unknown_flash_code_is_cleared_without_a_message() {
    let server = TestServer::spawn().await;

    let res = server
        .client
        .get(server.url("/items"))
        .header(header::COOKIE, "flash=bogus")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(flash_cookie(&res), "flash=");

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["flash"], Value::Null);
}

#[tokio::test]
async fn duplicate_serial_is_rejected_and_input_echoed() {
    let server = TestServer::spawn().await;
    assert_eq!(server.create("Dell", "SN001", "a", "1").await.status(), StatusCode::SEE_OTHER);

    let res = server.create("HP", "SN001", "b", "2").await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["errors"]["serial"], "serial already exists");
    assert_eq!(body["old"]["brand"], "HP");

    let (_, body) = server.view("/items").await;
    assert_eq!(body["data"]["items"]["total"], 1);
}

#[tokio::test]
async fn invalid_input_reports_each_field() {
    let server = TestServer::spawn().await;

    let res = server
        .client
        .post(server.url("/items"))
        .json(&json!({ "brand": "", "stock": -2, "category_id": 99 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let errors = res.json::<Value>().await.unwrap()["errors"].clone();
    assert_eq!(errors["brand"], "brand is required");
    assert_eq!(errors["serial"], "serial is required");
    assert_eq!(errors["specification"], "specification is required");
    assert_eq!(errors["stock"], "stock must be at least 0");
    assert_eq!(errors["category_id"], "selected category does not exist");
}

#[tokio::test]
async fn non_scalar_json_values_are_field_errors() {
    let server = TestServer::spawn().await;

    let res = server
        .client
        .post(server.url("/items"))
        .json(&json!({
            "brand": "Dell",
            "serial": "SN9",
            "specification": "x",
            "category_id": 1,
            "stock": true,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["errors"], json!({ "stock": "stock must be a number" }));
    assert_eq!(body["old"]["stock"], "true");
    assert_eq!(body["old"]["serial"], "SN9");

    let (_, body) = server.view("/items").await;
    assert_eq!(body["data"]["items"]["total"], 0);
}

#[tokio::test]
async fn json_create_with_null_stock_stores_zero() {
    let server = TestServer::spawn().await;

    let res = server
        .client
        .post(server.url("/items"))
        .json(&json!({
            "brand": "Epson",
            "serial": "EP-9",
            "specification": "inkjet",
            "category_id": 3,
            "stock": null,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let id = server.id_of("EP-9").await;
    let (status, body) = server.view(&format!("/items/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "items.show");
    assert_eq!(body["data"]["item"]["stock"], 0);
    assert_eq!(body["data"]["category_description"], "Consumable Supply");
}

#[tokio::test]
async fn missing_or_malformed_ids_are_not_found() {
    let server = TestServer::spawn().await;

    for path in ["/items/999", "/items/abc", "/items/999/edit"] {
        let (status, body) = server.view(path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(body["error"], "not_found");
    }

    let res = server
        .client
        .put(server.url("/items/999"))
        .form(&[
            ("brand", "Dell"),
            ("serial", "SN001"),
            ("specification", "a"),
            ("category_id", "1"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_via_put_and_via_method_override() {
    let server = TestServer::spawn().await;
    server.create("Dell", "SN001", "15in", "1").await;
    let id = server.id_of("SN001").await;

    let (status, body) = server.view(&format!("/items/{id}/edit")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "items.edit");
    assert_eq!(body["data"]["item"]["serial"], "SN001");
    assert_eq!(body["data"]["categories"].as_array().unwrap().len(), 4);

    let res = server
        .client
        .put(server.url(&format!("/items/{id}")))
        .form(&[
            ("brand", "Dell"),
            ("serial", "SN001"),
            ("specification", "15in, 16GB"),
            ("category_id", "2"),
            ("stock", "7"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(flash_cookie(&res), "flash=item_updated");

    let (_, body) = server.view(&format!("/items/{id}")).await;
    assert_eq!(body["data"]["item"]["specification"], "15in, 16GB");
    assert_eq!(body["data"]["item"]["stock"], 7);
    assert_eq!(body["data"]["category_description"], "Tool");

    let res = server
        .client
        .post(server.url(&format!("/items/{id}")))
        .form(&[
            ("_method", "PATCH"),
            ("brand", "Lenovo"),
            ("serial", "LN-1"),
            ("specification", "thinkpad"),
            ("category_id", "1"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let (_, body) = server.view(&format!("/items/{id}")).await;
    assert_eq!(body["data"]["item"]["brand"], "Lenovo");
    assert_eq!(body["data"]["item"]["serial"], "LN-1");
    assert_eq!(body["data"]["item"]["stock"], 0);
}

#[tokio::test]
async fn update_onto_another_items_serial_is_a_generic_failure() {
    let server = TestServer::spawn().await;
    server.create("Dell", "SN001", "a", "1").await;
    server.create("HP", "SN002", "b", "1").await;
    let id = server.id_of("SN002").await;

    let res = server
        .client
        .put(server.url(&format!("/items/{id}")))
        .form(&[
            ("brand", "HP"),
            ("serial", "SN001"),
            ("specification", "b"),
            ("category_id", "1"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let text = res.text().await.unwrap();
    assert!(!text.to_ascii_uppercase().contains("UNIQUE"), "store detail leaked: {text}");

    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["error"], "persistence_error");
    assert_eq!(body["message"], "An error occurred while updating data.");
    assert_eq!(body["old"]["serial"], "SN001");
    assert_eq!(body["old"]["brand"], "HP");

    let (_, body) = server.view(&format!("/items/{id}")).await;
    assert_eq!(body["data"]["item"]["serial"], "SN002");
}

#[tokio::test]
async fn unknown_spoofed_method_is_rejected() {
    let server = TestServer::spawn().await;
    server.create("Dell", "SN001", "15in", "1").await;
    let id = server.id_of("SN001").await;

    let res = server
        .client
        .post(server.url(&format!("/items/{id}")))
        .form(&[("_method", "GET")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn destroy_removes_the_item() {
    let server = TestServer::spawn().await;
    server.create("Dell", "SN001", "15in", "1").await;
    let id = server.id_of("SN001").await;

    let res = server
        .client
        .delete(server.url(&format!("/items/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(flash_cookie(&res), "flash=item_deleted");

    let (status, _) = server.view(&format!("/items/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A second delete, spoofed from a form, fails softly.
    let res = server
        .client
        .post(server.url(&format!("/items/{id}")))
        .form(&[("_method", "DELETE")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let cookie = flash_cookie(&res);
    assert_eq!(cookie, "flash=delete_failed");

    let res = server
        .client
        .get(server.url("/items"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["flash"]["level"], "error");
    assert_eq!(body["flash"]["message"], "Failed to delete data.");
}

#[tokio::test]
async fn twelve_items_paginate_five_per_page() {
    let server = TestServer::spawn().await;
    for i in 0..12 {
        let res = server.create("Dell", &format!("SN{i:02}"), "laptop", "1").await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
    }

    let mut seen = Vec::new();
    for page in 1..=3 {
        let (status, body) = server.view(&format!("/items?page={page}")).await;
        assert_eq!(status, StatusCode::OK);
        let items = &body["data"]["items"];
        assert_eq!(items["total"], 12);
        assert_eq!(items["total_pages"], 3);
        assert_eq!(items["current_page"], page);
        for row in items["data"].as_array().unwrap() {
            seen.push(row["id"].as_i64().unwrap());
        }
    }

    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), 12);

    let (_, body) = server.view("/items?page=4").await;
    assert_eq!(body["data"]["items"]["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn search_matches_category_description_and_is_echoed() {
    let server = TestServer::spawn().await;
    server.create("Dell", "SN001", "15in laptop", "1").await;
    server.create("Bosch", "BS-2", "drill", "2").await;
    server.create("Makita", "MK-3", "cordless drill", "2").await;

    let (_, body) = server.view("/items?search=tool").await;
    assert_eq!(body["data"]["search"], "tool");
    let rows = body["data"]["items"]["data"].as_array().unwrap();
    let serials: Vec<_> = rows.iter().map(|r| r["serial"].as_str().unwrap()).collect();
    assert_eq!(serials, vec!["BS-2", "MK-3"]);

    let (_, body) = server.view("/items?search=drill&page=1").await;
    assert_eq!(body["data"]["items"]["total"], 2);

    let (_, body) = server.view("/items?search=%25").await;
    assert_eq!(body["data"]["items"]["total"], 0);
}

#[tokio::test]
async fn create_form_lists_categories_and_types() {
    let server = TestServer::spawn().await;

    let (status, body) = server.view("/items/new").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "items.create");
    assert_eq!(body["data"]["categories"].as_array().unwrap().len(), 4);

    let types = body["data"]["category_types"].as_array().unwrap();
    let values: Vec<_> = types.iter().map(|t| t["value"].as_str().unwrap()).collect();
    assert_eq!(values, vec!["blank", "M", "A", "BHP", "BTHP"]);
}

#[tokio::test]
async fn request_id_is_generated_or_echoed() {
    let server = TestServer::spawn().await;

    let res = server.client.get(server.url("/health")).send().await.unwrap();
    let generated = res.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(!generated.is_empty());

    let res = server
        .client
        .get(server.url("/items"))
        .header("x-request-id", "req-42")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "req-42");
}
