//! Probe and scheduler tests against mock stream servers

use iptv_probe::checker::{check_channels, HttpProber, ProbeStatus, Prober, RunOutcome, Scheduler};
use iptv_probe::config::{ProbeConfig, ProbeMethod};
use iptv_probe::output::{export_csv, export_m3u};
use iptv_probe::source::Channel;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a probe configuration with a short timeout for testing
fn create_test_config(timeout_seconds: f64) -> ProbeConfig {
    ProbeConfig {
        timeout_seconds,
        concurrency_limit: 10,
        ..ProbeConfig::default()
    }
}

fn channel(server: &MockServer, name: &str, route: &str) -> Channel {
    Channel::new(name, format!("{}{}", server.uri(), route))
}

#[tokio::test]
async fn test_reachable_stream() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/live/news.m3u8"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let prober = HttpProber::new(&create_test_config(2.0)).expect("Failed to build prober");
    let result = prober
        .probe(&channel(&mock_server, "News", "/live/news.m3u8"))
        .await;

    assert!(result.reachable());
    assert!(result.latency_ms().is_some());
    assert_eq!(result.status(), &ProbeStatus::Ok(200));
    assert_eq!(result.status_detail(), "HTTP 200");
}

#[tokio::test]
async fn test_bad_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let prober = HttpProber::new(&create_test_config(2.0)).unwrap();
    let result = prober.probe(&channel(&mock_server, "Gone", "/gone")).await;

    assert!(!result.reachable());
    assert_eq!(result.latency_ms(), None);
    assert_eq!(result.status(), &ProbeStatus::BadStatus(404));
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let prober = HttpProber::new(&create_test_config(0.3)).unwrap();
    let result = prober.probe(&channel(&mock_server, "Slow", "/slow")).await;

    assert!(!result.reachable());
    assert_eq!(result.status(), &ProbeStatus::Timeout);
    assert_eq!(result.latency_ms(), None);
}

#[tokio::test]
async fn test_redirect_counts_as_reachable_when_not_followed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/target"))
        .mount(&mock_server)
        .await;

    let prober = HttpProber::new(&create_test_config(2.0)).unwrap();
    let result = prober.probe(&channel(&mock_server, "Moved", "/moved")).await;

    assert!(result.reachable());
    assert_eq!(result.status(), &ProbeStatus::Ok(302));
}

#[tokio::test]
async fn test_redirect_followed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/target"))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/target"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = ProbeConfig {
        follow_redirects: true,
        ..create_test_config(2.0)
    };
    let prober = HttpProber::new(&config).unwrap();
    let result = prober.probe(&channel(&mock_server, "Moved", "/moved")).await;

    assert!(!result.reachable());
    assert_eq!(result.status(), &ProbeStatus::BadStatus(503));
}

#[tokio::test]
async fn test_head_refused_falls_back_to_range_get() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/stream"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stream"))
        .and(header("range", "bytes=0-0"))
        .respond_with(ResponseTemplate::new(206).set_body_string("#"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let prober = HttpProber::new(&create_test_config(2.0)).unwrap();
    let result = prober.probe(&channel(&mock_server, "Stream", "/stream")).await;

    assert!(result.reachable());
    assert_eq!(result.status(), &ProbeStatus::Ok(206));
}

#[tokio::test]
async fn test_range_get_fallback_shares_the_probe_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/stream"))
        .respond_with(ResponseTemplate::new(405).set_delay(Duration::from_millis(400)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stream"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(400)))
        .mount(&mock_server)
        .await;

    let prober = HttpProber::new(&create_test_config(0.6)).unwrap();
    let started = std::time::Instant::now();
    let result = prober.probe(&channel(&mock_server, "Stream", "/stream")).await;

    assert!(!result.reachable());
    assert_eq!(result.status(), &ProbeStatus::Timeout);
    assert_eq!(result.latency_ms(), None);
    assert!(
        started.elapsed() < Duration::from_millis(750),
        "probe took {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_range_get_fallback_latency_includes_head() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/stream"))
        .respond_with(ResponseTemplate::new(501).set_delay(Duration::from_millis(200)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stream"))
        .respond_with(ResponseTemplate::new(206))
        .mount(&mock_server)
        .await;

    let prober = HttpProber::new(&create_test_config(2.0)).unwrap();
    let result = prober.probe(&channel(&mock_server, "Stream", "/stream")).await;

    assert!(result.reachable());
    let latency = result.latency_ms().unwrap();
    assert!(latency >= 200, "latency was {}ms", latency);
}

#[tokio::test]
async fn test_range_get_method() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ts"))
        .and(header("range", "bytes=0-0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ProbeConfig {
        method: ProbeMethod::RangeGet,
        ..create_test_config(2.0)
    };
    let prober = HttpProber::new(&config).unwrap();
    let result = prober.probe(&channel(&mock_server, "TS", "/ts")).await;

    assert!(result.reachable());
}

#[tokio::test]
async fn test_unresolvable_host_is_unreachable() {
    let prober = HttpProber::new(&create_test_config(2.0)).unwrap();
    let result = prober
        .probe(&Channel::new("Nowhere", "http://nonexistent.invalid/live.m3u8"))
        .await;

    assert!(!result.reachable());
    assert!(
        matches!(
            result.status(),
            ProbeStatus::DnsFailure | ProbeStatus::ConnectionError | ProbeStatus::Timeout
        ),
        "unexpected status {:?}",
        result.status()
    );
}

#[tokio::test]
async fn test_two_reachable_one_timeout() {
    let mock_server = MockServer::start().await;
    for route in ["/a", "/b"] {
        Mock::given(method("HEAD"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("HEAD"))
        .and(path("/c"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let channels = vec![
        channel(&mock_server, "A", "/a"),
        channel(&mock_server, "B", "/b"),
        channel(&mock_server, "C", "/c"),
    ];

    let prober = HttpProber::new(&create_test_config(0.5)).unwrap();
    let results = Scheduler::new(prober, 3).run_all(&channels).await;
    let summary = results.summary();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.available, 2);
    assert_eq!(summary.unavailable, 1);
    assert_eq!(results.get(2).unwrap().status(), &ProbeStatus::Timeout);

    // Unreachable CSV row: empty latency, non-empty detail
    let csv = export_csv(results.as_slice(), true).unwrap();
    let last = csv.lines().last().unwrap();
    assert!(last.ends_with(",false,,timeout"), "row was {}", last);
}

#[tokio::test]
async fn test_serial_and_parallel_runs_agree() {
    let mock_server = MockServer::start().await;
    let mut channels = Vec::new();
    for i in 0..50 {
        let route = format!("/ch/{}", i);
        let status = if i % 3 == 0 { 404 } else { 200 };
        Mock::given(method("HEAD"))
            .and(path(route.as_str()))
            .respond_with(ResponseTemplate::new(status))
            .mount(&mock_server)
            .await;
        channels.push(channel(&mock_server, &format!("Channel {}", i), &route));
    }

    let config = create_test_config(5.0);
    let serial = Scheduler::new(HttpProber::new(&config).unwrap(), 1)
        .run_all(&channels)
        .await;
    let parallel = Scheduler::new(HttpProber::new(&config).unwrap(), 50)
        .run_all(&channels)
        .await;

    assert_eq!(serial.len(), 50);
    assert_eq!(parallel.len(), 50);
    for i in 0..50 {
        let a = serial.get(i).unwrap();
        let b = parallel.get(i).unwrap();
        assert_eq!(a.channel(), &channels[i]);
        assert_eq!(a.channel(), b.channel());
        assert_eq!(a.reachable(), b.reachable());
        assert_eq!(a.status_detail(), b.status_detail());
        assert_eq!(a.latency_ms().is_some(), b.latency_ms().is_some());
    }
    assert_eq!(serial.summary().available, parallel.summary().available);
}

#[tokio::test]
async fn test_duplicate_urls_are_each_tested() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/live/sports.m3u8"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&mock_server)
        .await;

    let channels = vec![
        channel(&mock_server, "Sports", "/live/sports.m3u8"),
        channel(&mock_server, "Sports HD", "/live/sports.m3u8"),
    ];
    let results = Scheduler::new(HttpProber::new(&create_test_config(2.0)).unwrap(), 2)
        .run_all(&channels)
        .await;

    assert_eq!(results.len(), 2);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.channel(), &channels[i]);
        assert!(result.reachable());
    }
}

#[tokio::test]
async fn test_check_and_export_available_playlist() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/up"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let channels = vec![
        channel(&mock_server, "Up", "/up"),
        channel(&mock_server, "Down", "/down"),
        Channel::new("Radio", "rtmp://radio.example.com/live"),
    ];

    let outcome = check_channels(&channels, &create_test_config(2.0), &CancellationToken::new())
        .await
        .expect("Failed to build prober");
    let results = match outcome {
        RunOutcome::Complete(results) => results,
        RunOutcome::Cancelled(_) => panic!("run was not cancelled"),
    };

    let summary = results.summary();
    assert_eq!(summary.available, 1);
    assert_eq!(summary.unsupported, 1);

    let first = export_m3u(results.as_slice(), false).unwrap();
    let second = export_m3u(results.as_slice(), false).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first,
        format!("#EXTM3U\n#EXTINF:-1,Up\n{}/up\n", mock_server.uri())
    );
}
