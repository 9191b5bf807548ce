//! Converter client and poller against a mock server

use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;
use tazanews::{FeedCategory, FeedPoller, FeedUpdate, NewsClient, NewsFeed};
use tazasource::Notifier;

fn feed_body() -> String {
    json!({
        "status": "ok",
        "feed": { "title": "BBC News - World", "link": "https://www.bbc.co.uk/news/world" },
        "items": [
            {
                "title": "Summit opens",
                "link": "https://www.bbc.co.uk/news/world-1",
                "pubDate": "2024-03-05 14:07:00",
                "description": "<p>Leaders <b>meet</b> today</p>",
                "thumbnail": "https://ichef.bbci.co.uk/1.jpg"
            }
        ]
    })
    .to_string()
}

async fn client(server: &Server) -> NewsClient {
    NewsClient::builder()
        .converter_url(format!("{}/v1/api.json", server.url()))
        .build()
        .await
        .unwrap()
}

fn world() -> NewsFeed {
    NewsFeed::new(
        "BBC World",
        "http://feeds.bbci.co.uk/news/world/rss.xml",
        FeedCategory::International,
    )
}

#[tokio::test]
async fn test_fetch_passes_feed_url() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/api.json")
        .match_query(Matcher::UrlEncoded(
            "rss_url".into(),
            "http://feeds.bbci.co.uk/news/world/rss.xml".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(feed_body())
        .create_async()
        .await;

    let news = client(&server).await.fetch(&world().url).await.unwrap();
    mock.assert_async().await;

    assert_eq!(news.feed.title, "BBC News - World");
    assert_eq!(news.items.len(), 1);
    let article = &news.items[0];
    assert_eq!(article.plain_description(), "Leaders meet today");
    assert_eq!(article.formatted_date(), "Mar 5, 2024, 02:07 PM");
}

#[tokio::test]
async fn test_converter_error_status() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/api.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status":"error","message":"Cannot download this RSS feed"}"#)
        .create_async()
        .await;

    let err = client(&server).await.fetch(&world().url).await.unwrap_err();
    assert!(err.to_string().contains("Cannot download this RSS feed"));
}

#[tokio::test]
async fn test_http_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/api.json")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    assert!(client(&server).await.fetch(&world().url).await.is_err());
}

#[tokio::test]
async fn test_poller_loads_immediately_and_on_refresh() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/api.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(feed_body())
        .expect(2)
        .create_async()
        .await;

    let mut poller = FeedPoller::new(
        client(&server).await,
        Duration::from_secs(3600),
        Notifier::default(),
    );
    let mut updates = poller.activate(world());

    let first = tokio::time::timeout(Duration::from_secs(5), updates.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(first, FeedUpdate::Loaded { .. }));
    assert_eq!(first.feed().name, "BBC World");

    poller.refresh();
    let second = tokio::time::timeout(Duration::from_secs(5), updates.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(second, FeedUpdate::Loaded { .. }));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_poller_failure_notifies() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/api.json")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let notifier = Notifier::default();
    let mut notices = notifier.subscribe();
    let mut poller = FeedPoller::new(client(&server).await, Duration::from_secs(3600), notifier);
    let mut updates = poller.activate(world());

    let update = tokio::time::timeout(Duration::from_secs(5), updates.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(update, FeedUpdate::Failed { .. }));

    let notice = notices.recv().await.unwrap();
    assert_eq!(notice.title, "News Loading Error");
    assert_eq!(notice.description, "Failed to load news. Please try again.");
}

#[tokio::test]
async fn test_switching_feed_closes_previous_channel() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/api.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(feed_body())
        .create_async()
        .await;

    let mut poller = FeedPoller::new(
        client(&server).await,
        Duration::from_secs(3600),
        Notifier::default(),
    );
    let mut old = poller.activate(world());
    let _ = tokio::time::timeout(Duration::from_secs(5), old.recv()).await;

    let ndtv = NewsFeed::new(
        "NDTV",
        "https://feeds.feedburner.com/ndtvnews-top-stories",
        FeedCategory::IndianNews,
    );
    let mut current = poller.activate(ndtv);
    assert_eq!(poller.active_feed().map(|f| f.name.as_str()), Some("NDTV"));

    // The cancelled task drops its sender
    let closed = tokio::time::timeout(Duration::from_secs(5), old.recv())
        .await
        .unwrap();
    assert!(closed.is_none());

    let update = tokio::time::timeout(Duration::from_secs(5), current.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(update.feed().name, "NDTV");
}
