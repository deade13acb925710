use super::*;

fn opts(max_body_bytes: u64) -> FetchOpts {
    FetchOpts {
        timeout_ms: 2_000,
        max_body_bytes,
        ..FetchOpts::default()
    }
}

#[tokio::test]
async fn http_fetch_returns_body_and_content_type() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/cover.png")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body([1u8, 2, 3, 4])
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(&opts(1024)).unwrap();
    let asset = fetcher
        .fetch(&format!("{}/cover.png", server.url()))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(asset.bytes, vec![1, 2, 3, 4]);
    assert_eq!(asset.content_type.as_deref(), Some("image/png"));
}

#[tokio::test]
async fn http_fetch_classifies_status_failures() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/missing.jpg")
        .with_status(404)
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(&opts(1024)).unwrap();
    let url = format!("{}/missing.jpg", server.url());
    let err = fetcher.fetch(&url).await.unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::Status(404));
    assert_eq!(err.url, url);
}

#[tokio::test]
async fn http_fetch_rejects_empty_and_oversized_bodies() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/empty")
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("GET", "/big")
        .with_status(200)
        .with_body(vec![7u8; 64])
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(&opts(16)).unwrap();
    let err = fetcher
        .fetch(&format!("{}/empty", server.url()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::EmptyBody);

    let err = fetcher
        .fetch(&format!("{}/big", server.url()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::TooLarge { limit: 16 });
}

#[tokio::test]
async fn http_fetch_rejects_blank_url_without_io() {
    let fetcher = HttpFetcher::new(&opts(16)).unwrap();
    let err = fetcher.fetch("   ").await.unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::EmptyUrl);
}

#[tokio::test]
async fn http_fetch_reports_connection_failures_as_network() {
    let fetcher = HttpFetcher::new(&opts(16)).unwrap();
    let err = fetcher.fetch("http://127.0.0.1:1/cover.png").await.unwrap_err();
    assert!(matches!(
        err.kind,
        FetchErrorKind::Network(_) | FetchErrorKind::Timeout
    ));
}

#[tokio::test]
async fn memory_fetcher_serves_known_urls_and_404s_the_rest() {
    let fetcher = MemoryFetcher::new().with(
        "https://img.example/a.png",
        FetchedAsset::new(vec![9u8], Some("image/png")),
    );
    let asset = fetcher.fetch("https://img.example/a.png").await.unwrap();
    assert_eq!(asset.bytes, vec![9]);

    let err = fetcher.fetch("https://img.example/b.png").await.unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::Status(404));
}
