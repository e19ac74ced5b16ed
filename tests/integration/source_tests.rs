//! Playlist download tests

use iptv_probe::config::SourceConfig;
use iptv_probe::source::{fetch_playlist, load_channels, Channel};
use iptv_probe::SourceError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PLAYLIST: &str = "#EXTM3U\n\
#EXTINF:-1 tvg-id=\"one\" group-title=\"News\",One\n\
http://streams.example.com/one.m3u8\n\
#EXTINF:-1,Two\n\
http://streams.example.com/two.m3u8\n\
#EXTINF:-1,One again\n\
http://streams.example.com/one.m3u8\n";

fn create_test_config(max_retries: u32) -> SourceConfig {
    SourceConfig {
        fetch_timeout_seconds: 5,
        max_retries,
        retry_delay_seconds: 0,
        ..SourceConfig::default()
    }
}

#[tokio::test]
async fn test_load_remote_playlist() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.m3u"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PLAYLIST))
        .mount(&mock_server)
        .await;

    let url = format!("{}/index.m3u", mock_server.uri());
    let channels = load_channels(&url, &create_test_config(1)).await.unwrap();

    assert_eq!(
        channels,
        vec![
            Channel::new("One", "http://streams.example.com/one.m3u8"),
            Channel::new("Two", "http://streams.example.com/two.m3u8"),
        ]
    );
}

#[tokio::test]
async fn test_fetch_retries_after_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.m3u"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/index.m3u"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PLAYLIST))
        .mount(&mock_server)
        .await;

    let url = format!("{}/index.m3u", mock_server.uri());
    let body = fetch_playlist(&url, &create_test_config(3)).await.unwrap();
    assert_eq!(body, PLAYLIST);
}

#[tokio::test]
async fn test_fetch_gives_up_after_max_retries() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.m3u"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;

    let url = format!("{}/index.m3u", mock_server.uri());
    let result = fetch_playlist(&url, &create_test_config(2)).await;

    match result {
        Err(SourceError::Fetch {
            attempts, message, ..
        }) => {
            assert_eq!(attempts, 2);
            assert_eq!(message, "HTTP 503");
        }
        other => panic!("expected fetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_remote_playlist_without_channels() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/empty.m3u"))
        .respond_with(ResponseTemplate::new(200).set_body_string("#EXTM3U\n"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/empty.m3u", mock_server.uri());
    let result = load_channels(&url, &create_test_config(1)).await;
    assert!(matches!(result, Err(SourceError::Empty(_))));
}
