//! API integration tests
//!
//! These drive a running server (with the default `admin`/`admin` superuser
//! bootstrapped on an empty database).

use chrono::{Duration, Utc};
use reqwest::{multipart, redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};

const SERVER_URL: &str = "http://localhost:8080";
const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an authenticated client
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Token and account id of the bootstrap superuser
async fn admin_login(client: &Client) -> (String, i64) {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": "admin", "password": "admin" }))
        .send()
        .await
        .expect("Failed to send login request");
    let body: Value = response.json().await.expect("Failed to parse login response");
    (
        body["token"].as_str().expect("No token in response").to_string(),
        body["account"]["id"].as_i64().expect("No account id in response"),
    )
}

async fn put_json(client: &Client, token: &str, path: &str, body: Value) -> Value {
    let response = client
        .put(format!("{}{}", BASE_URL, path))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success(), "PUT {}: {}", path, response.status());
    response.json().await.expect("Failed to parse response")
}

fn days_from_today(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days)).to_string()
}

fn short_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

async fn post_json(client: &Client, token: &str, path: &str, body: Value) -> Value {
    let response = client
        .post(format!("{}{}", BASE_URL, path))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED, "POST {}", path);
    response.json().await.expect("Failed to parse response")
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::new_rgb8(width, height);
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");

    let response = client.get(format!("{}/ready", BASE_URL)).send().await.unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["account"]["is_superuser"], true);
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], 2);
}

#[tokio::test]
#[ignore]
async fn test_admin_api_requires_auth() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_non_staff_account_is_forbidden() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let username = format!("reader{}", short_id());
    post_json(
        &client,
        &token,
        "/accounts",
        json!({ "username": username, "password": "reader-pass" }),
    )
    .await;

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": "reader-pass" }))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    let reader_token = body["token"].as_str().unwrap().to_string();

    let response = client
        .get(format!("{}/categories", BASE_URL))
        .bearer_auth(&reader_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_catalog_flow() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let category = post_json(&client, &token, "/categories", json!({ "name": format!("Sci {}", short_id()) })).await;
    assert_eq!(category["status"], 2);
    assert!(category["create_user_id"].is_number());

    let shelf = post_json(
        &client,
        &token,
        "/shelves",
        json!({ "category_id": category["id"], "code": short_id() }),
    )
    .await;
    assert_eq!(shelf["floors"], 4);
    assert_eq!(shelf["capacity"], 100);
    assert_eq!(shelf["category_name"], category["name"]);

    let book = post_json(
        &client,
        &token,
        "/books",
        json!({
            "name": "Dune",
            "author": "Frank Herbert",
            "press": "Chilton",
            "isbn": "9780441013593",
            "category_id": category["id"],
            "shelf_id": shelf["id"]
        }),
    )
    .await;
    assert_eq!(book["book_status"], "ON");
    assert_eq!(book["total_page"], 200);
    assert_eq!(book["cover_url"], "/media/book.png");
    assert_eq!(book["shelf_code"], shelf["code"]);

    let response = client
        .get(format!("{}/books?q=dune&category_id={}", BASE_URL, category["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let page: Value = response.json().await.unwrap();
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"], book["id"]);

    let form = multipart::Form::new().part(
        "file",
        multipart::Part::bytes(png(960, 480)).file_name("cover.png").mime_str("image/png").unwrap(),
    );
    let response = client
        .post(format!("{}/books/{}/cover", BASE_URL, book["id"]))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let book: Value = response.json().await.unwrap();
    let cover_url = book["cover_url"].as_str().unwrap().to_string();
    assert!(cover_url.starts_with("/media/book/"));

    let cover = client.get(format!("{}{}", SERVER_URL, cover_url)).send().await.unwrap();
    assert!(cover.status().is_success());
    let img = image::load_from_memory(&cover.bytes().await.unwrap()).unwrap();
    assert_eq!((img.width(), img.height()), (240, 120));
}

#[tokio::test]
#[ignore]
async fn test_checkout_return_flow() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let book = post_json(
        &client,
        &token,
        "/books",
        json!({ "name": "Emma", "author": "Jane Austen", "press": "Murray", "isbn": "9780141439587" }),
    )
    .await;
    let profile = post_json(&client, &token, "/user_profiles", json!({ "mobile": "13800000000" })).await;
    assert_eq!(profile["label"], "13800000000");
    assert_eq!(profile["fullname"], "Unknown");

    let checkout = post_json(
        &client,
        &token,
        "/checkouts",
        json!({ "book_id": book["id"], "user_profile_id": profile["id"] }),
    )
    .await;
    assert_eq!(checkout["type"], "SC");
    assert_eq!(checkout["allow_shift"], true);
    assert!(checkout["returned_time"].is_null());

    let response = client
        .post(format!("{}/checkouts/{}/return", BASE_URL, checkout["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let returned: Value = response.json().await.unwrap();
    assert_eq!(returned["book_status"], "RE");
    assert!(returned["returned_time"].is_string());

    // a second return is refused
    let response = client
        .post(format!("{}/checkouts/{}/return", BASE_URL, checkout["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    let comment = post_json(
        &client,
        &token,
        "/comments",
        json!({ "checkout_id": checkout["id"], "content": "Loved it" }),
    )
    .await;
    assert_eq!(comment["score"], 5.0);
    assert_eq!(comment["label"], "5.0");
}

#[tokio::test]
#[ignore]
async fn test_batch_disable_and_enable() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let a = post_json(&client, &token, "/categories", json!({ "name": format!("A {}", short_id()) })).await;
    let b = post_json(&client, &token, "/categories", json!({ "name": format!("B {}", short_id()) })).await;

    let response = client
        .post(format!("{}/batch/categories/disable", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "ids": [a["id"], b["id"], 0] }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["affected"], 2);
    assert_eq!(body["status"], -2);

    let response = client
        .get(format!("{}/categories/{}", BASE_URL, a["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let category: Value = response.json().await.unwrap();
    assert_eq!(category["status"], -2);

    let response = client
        .post(format!("{}/batch/categories/enable", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "ids": [a["id"]] }))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["affected"], 1);

    let response = client
        .post(format!("{}/batch/accounts/disable", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "ids": [1] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_pages_login_flow() {
    let client = Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap();

    let response = client.get(format!("{}/", SERVER_URL)).send().await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()["location"], "/admin/login");

    let response = client.get(format!("{}/return", SERVER_URL)).send().await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()["location"], "/admin/login?next=/return");

    let response = client
        .post(format!("{}/admin/login", SERVER_URL))
        .form(&[("username", "admin"), ("password", "admin"), ("next", "/return")])
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()["location"], "/return");
    let cookie = response.headers()["set-cookie"]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let response = client
        .get(format!("{}/return", SERVER_URL))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let html = response.text().await.unwrap();
    assert!(html.contains("Return a book"));
}

#[tokio::test]
#[ignore]
async fn test_update_stamps_audit_columns() {
    let client = Client::new();
    let (token, admin_id) = admin_login(&client).await;

    let category = post_json(&client, &token, "/categories", json!({ "name": format!("Hist {}", short_id()) })).await;
    assert_eq!(category["create_user_id"], admin_id);

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let updated = put_json(
        &client,
        &token,
        &format!("/categories/{}", category["id"]),
        json!({ "description": "Old things" }),
    )
    .await;

    assert_eq!(updated["description"], "Old things");
    assert_eq!(updated["name"], category["name"]);
    assert_eq!(updated["update_user_id"], admin_id);
    assert_eq!(updated["create_time"], category["create_time"]);
    let created: chrono::DateTime<Utc> = category["update_time"].as_str().unwrap().parse().unwrap();
    let stamped: chrono::DateTime<Utc> = updated["update_time"].as_str().unwrap().parse().unwrap();
    assert!(stamped > created);
}

#[tokio::test]
#[ignore]
async fn test_create_defaults() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let book = post_json(
        &client,
        &token,
        "/books",
        json!({ "name": "Ulysses", "author": "James Joyce", "press": "Shakespeare", "isbn": "9780199535675" }),
    )
    .await;
    let profile = post_json(&client, &token, "/user_profiles", json!({ "mobile": "13900000000" })).await;
    assert_eq!(profile["start_date"], days_from_today(0));
    assert_eq!(profile["end_date"], days_from_today(186));

    let checkout = post_json(
        &client,
        &token,
        "/checkouts",
        json!({ "book_id": book["id"], "user_profile_id": profile["id"] }),
    )
    .await;
    assert_eq!(checkout["return_date"], days_from_today(15));

    let rent = post_json(&client, &token, "/rents", json!({ "checkout_id": checkout["id"] })).await;
    assert_eq!(rent["days"], 1);
    assert_eq!(rent["amount"], "0.00");
    assert_eq!(rent["pay_status"], 1);
    assert_eq!(rent["label"], "Ulysses:0.00");

    let note = post_json(
        &client,
        &token,
        "/notes",
        json!({ "checkout_id": checkout["id"], "content": "Chapter one" }),
    )
    .await;
    assert_eq!(note["page"], 1.0);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_returns_close_once() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let book = post_json(
        &client,
        &token,
        "/books",
        json!({ "name": "Beloved", "author": "Toni Morrison", "press": "Knopf", "isbn": "9781400033416" }),
    )
    .await;

    for _ in 0..10 {
        let checkout = post_json(&client, &token, "/checkouts", json!({ "book_id": book["id"] })).await;
        let url = format!("{}/checkouts/{}/return", BASE_URL, checkout["id"]);

        let (a, b) = tokio::join!(
            client.post(&url).bearer_auth(&token).send(),
            client.post(&url).bearer_auth(&token).send(),
        );
        let mut statuses = [a.unwrap().status().as_u16(), b.unwrap().status().as_u16()];
        statuses.sort();
        assert_eq!(statuses, [200, 422]);
    }

    let response = client
        .post(format!("{}/checkouts/0/return", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_update_can_clear_nullable_fields() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let category = post_json(&client, &token, "/categories", json!({ "name": format!("Art {}", short_id()) })).await;
    let book = post_json(
        &client,
        &token,
        "/books",
        json!({
            "name": "Ways of Seeing",
            "author": "John Berger",
            "press": "Penguin",
            "isbn": "9780140135152",
            "category_id": category["id"]
        }),
    )
    .await;
    let checkout = post_json(&client, &token, "/checkouts", json!({ "book_id": book["id"] })).await;

    let response = client
        .post(format!("{}/checkouts/{}/return", BASE_URL, checkout["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    // an absent field is left alone
    let path = format!("/checkouts/{}", checkout["id"]);
    let kept = put_json(&client, &token, &path, json!({ "allow_shift": false })).await;
    assert!(kept["returned_time"].is_string());

    let reopened = put_json(&client, &token, &path, json!({ "returned_time": null })).await;
    assert!(reopened["returned_time"].is_null());
    assert_eq!(reopened["book_id"], book["id"]);

    let book = put_json(&client, &token, &format!("/books/{}", book["id"]), json!({ "category_id": null })).await;
    assert!(book["category_id"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_pages_refuse_non_staff_without_signing_in() {
    let client = Client::builder().redirect(Policy::none()).build().unwrap();
    let token = get_auth_token(&client).await;

    let username = format!("reader{}", short_id());
    let account = post_json(
        &client,
        &token,
        "/accounts",
        json!({ "username": username, "password": "reader-pass" }),
    )
    .await;

    let response = client
        .post(format!("{}/admin/login", SERVER_URL))
        .form(&[("username", username.as_str()), ("password", "reader-pass"), ("next", "/return")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("set-cookie").is_none());

    let response = client
        .get(format!("{}/accounts/{}", BASE_URL, account["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let account: Value = response.json().await.unwrap();
    assert!(account["last_login"].is_null());
}
