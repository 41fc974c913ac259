use super::*;

fn test_client(base_url: &str) -> CatalogClient {
    CatalogClient::new(base_url, 5, 5, "grubline-test/0.1")
        .expect("client construction should not fail")
}

#[test]
fn listing_resource_joins_base_and_path() {
    let client = test_client("http://localhost:5000/");
    assert_eq!(
        client.listing_resource().as_str(),
        "http://localhost:5000/api/restaurants"
    );
}

#[test]
fn menu_resource_appends_restaurant_id() {
    let client = test_client("http://localhost:5000");
    assert_eq!(
        client.menu_resource("229").as_str(),
        "http://localhost:5000/api/restaurant/menu/229"
    );
}

#[test]
fn menu_resource_encodes_id_as_single_segment() {
    let client = test_client("http://localhost:5000");
    assert_eq!(
        client.menu_resource("a/b c").as_str(),
        "http://localhost:5000/api/restaurant/menu/a%2Fb%20c"
    );
}

#[test]
fn with_paths_normalizes_slashes() {
    let client = test_client("https://catalog.example").with_paths("v2/list/", "/v2/menu/");
    assert_eq!(
        client.listing_resource().as_str(),
        "https://catalog.example/v2/list"
    );
    assert_eq!(
        client.menu_resource("7").as_str(),
        "https://catalog.example/v2/menu/7"
    );
}

#[test]
fn new_rejects_relative_base_url() {
    let err = CatalogClient::new("localhost:5000/api", 5, 5, "ua").unwrap_err();
    assert!(matches!(err, FetchError::InvalidUrl { .. }), "got {err:?}");
}

#[test]
fn new_rejects_non_http_scheme() {
    let err = CatalogClient::new("ftp://catalog.example", 5, 5, "ua").unwrap_err();
    assert!(matches!(err, FetchError::InvalidUrl { .. }), "got {err:?}");
}

#[tokio::test]
async fn fetch_document_rejects_malformed_resource() {
    let client = test_client("http://localhost:5000");
    let err = client
        .fetch_document(&ResourceId::new("not a url"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::InvalidUrl { .. }), "got {err:?}");
    assert_eq!(err.status(), None);
}
