//! Product listing through the HTTP API.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use nordic_integration_tests::{MockBackend, TestClient};
use serde_json::{Value, json};

fn names(page: &Value) -> Vec<String> {
    page["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| {
            ["name", "title", "productName"]
                .iter()
                .find_map(|key| p[*key].as_str())
                .unwrap()
                .to_string()
        })
        .collect()
}

#[tokio::test]
async fn test_default_listing_sorted_by_name() {
    let backend = MockBackend::start().await;
    let mut client = TestClient::new(&backend.url);

    let page = client.get("/api/products").await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(names(&page.body), ["Cable", "Headphones", "Widget"]);
    assert_eq!(page.body["totalElements"], 3);
    assert_eq!(page.body["size"], 24);
    assert_eq!(page.body["first"], true);
    assert_eq!(page.body["last"], true);
}

#[tokio::test]
async fn test_category_filter_and_price_sort() {
    let backend = MockBackend::start().await;
    let mut client = TestClient::new(&backend.url);

    let page = client
        .get("/api/products?categoryId=c2&sortBy=price&sortDirection=desc")
        .await;
    assert_eq!(names(&page.body), ["Headphones", "Cable"]);

    let page = client.get("/api/products?category=c2&sort=price-asc").await;
    assert_eq!(names(&page.body), ["Cable", "Headphones"]);
}

#[tokio::test]
async fn test_search_matches_description() {
    let backend = MockBackend::start().await;
    let mut client = TestClient::new(&backend.url);

    let page = client.get("/api/products?search=WIRELESS").await;
    assert_eq!(names(&page.body), ["Headphones"]);
}

#[tokio::test]
async fn test_pagination() {
    let backend = MockBackend::start().await;
    let mut client = TestClient::new(&backend.url);

    let page = client.get("/api/products?page=1&size=2").await;
    assert_eq!(names(&page.body), ["Widget"]);
    assert_eq!(page.body["totalPages"], 2);
    assert_eq!(page.body["first"], false);
    assert_eq!(page.body["last"], true);

    let past_end = client.get("/api/products?page=5&size=2").await;
    assert_eq!(past_end.body["content"], json!([]));
    assert_eq!(past_end.body["totalElements"], 3);
}

#[tokio::test]
async fn test_product_lookup() {
    let backend = MockBackend::start().await;
    let mut client = TestClient::new(&backend.url);

    let product = client.get("/api/products/2").await;
    assert_eq!(product.status, StatusCode::OK);
    assert_eq!(product.body["title"], "Headphones");

    let missing = client.get("/api/products/999").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unreachable_backend_is_bad_gateway() {
    let mut client = TestClient::new("http://127.0.0.1:1");

    let response = client.get("/api/products").await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["error"], "External service error");
}

#[tokio::test]
async fn test_best_selling_and_best_reviewed_rows() {
    let backend = MockBackend::start().await;
    let mut client = TestClient::new(&backend.url);

    let row = client.get("/api/products/best-selling").await;
    assert_eq!(row.status, StatusCode::OK);
    let rows = row.body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["sku"], "A-1");
    assert_eq!(rows[2]["id"], "p1");

    let row = client.get("/api/products/best-reviewed").await;
    assert_eq!(row.body, json!([{
        "productId": 2,
        "title": "Headphones",
        "listPrice": 129,
        "description": "Over-ear, wireless",
        "categoryId": "c2",
    }]));
}

#[tokio::test]
async fn test_product_reviews_with_average() {
    let backend = MockBackend::start().await;
    let mut client = TestClient::new(&backend.url);

    let reviews = client.get("/api/products/p1/reviews").await;
    assert_eq!(reviews.status, StatusCode::OK);
    assert_eq!(reviews.body["count"], 2);
    assert_eq!(reviews.body["averageRating"], json!(4.5));
    assert_eq!(reviews.body["reviews"][0]["title"], "Great");

    let none = client.get("/api/products/A-1/reviews").await;
    assert_eq!(none.body, json!({"reviews": [], "count": 0, "averageRating": 0.0}));
}

#[tokio::test]
async fn test_categories_and_brands() {
    let backend = MockBackend::start().await;
    let mut client = TestClient::new(&backend.url);

    let categories = client.get("/api/categories").await;
    assert_eq!(categories.status, StatusCode::OK);
    assert_eq!(
        categories.body,
        json!([
            {"id": "c1", "name": "Gadgets"},
            {"id": "c2", "name": "Audio"},
            {"id": "3", "name": "Unnamed Category"},
        ])
    );

    let brands = client.get("/api/brands").await;
    assert_eq!(
        brands.body,
        json!([
            {"id": "b1", "name": "Nordisk"},
            {"id": "b2", "name": "Unnamed Brand"},
        ])
    );
}
