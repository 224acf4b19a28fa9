use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::Mutex;
use std::thread;

use flostats::config::ProviderConfig;
use flostats::error::FetchError;
use flostats::transport::{HttpSource, PageSource};

/// Serves one canned response on a loopback port and returns its URL.
fn serve_once(status_line: &'static str, body: Vec<u8>, with_length: bool) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    thread::spawn(move || {
        let Ok((stream, _)) = listener.accept() else {
            return;
        };
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        // Drain request headers.
        while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
            if line == "\r\n" {
                break;
            }
            line.clear();
        }
        let mut stream = reader.into_inner();
        let mut head = format!("HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nConnection: close\r\n");
        if with_length {
            head.push_str(&format!("Content-Length: {}\r\n", body.len()));
        }
        head.push_str("\r\n");
        let _ = stream.write_all(head.as_bytes());
        let _ = stream.write_all(&body);
        let _ = stream.flush();
    });
    format!("http://{addr}/bouts/")
}

fn large_body() -> Vec<u8> {
    let items: Vec<String> = (0..4_000)
        .map(|i| format!(r#"{{"id":"b{i}","type":"bout","attributes":{{}}}}"#))
        .collect();
    format!(r#"{{"data":[{}]}}"#, items.join(",")).into_bytes()
}

fn source() -> HttpSource {
    HttpSource::new(&ProviderConfig::default()).expect("client builds")
}

#[test]
fn known_length_reports_increasing_byte_progress_ending_at_100() {
    let body = large_body();
    let url = serve_once("200 OK", body.clone(), true);

    let seen = Mutex::new(Vec::new());
    let text = source()
        .get(&url, &|pct: f64| seen.lock().unwrap().push(pct))
        .expect("request succeeds");
    assert_eq!(text.len(), body.len());

    let seen = seen.into_inner().unwrap();
    assert!(seen.len() > 1, "{seen:?}");
    assert!(seen[0] < 100.0);
    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{seen:?}");
    assert_eq!(seen.last().copied(), Some(100.0));
}

#[test]
fn unknown_length_only_reports_completion() {
    let url = serve_once("200 OK", br#"{"data":[]}"#.to_vec(), false);

    let seen = Mutex::new(Vec::new());
    let text = source()
        .get(&url, &|pct: f64| seen.lock().unwrap().push(pct))
        .expect("request succeeds");
    assert_eq!(text, r#"{"data":[]}"#);
    assert_eq!(seen.into_inner().unwrap(), vec![100.0]);
}

#[test]
fn error_status_is_reported_without_progress() {
    let url = serve_once("503 Service Unavailable", b"busy".to_vec(), true);

    let seen = Mutex::new(Vec::new());
    let err = source()
        .get(&url, &|pct: f64| seen.lock().unwrap().push(pct))
        .expect_err("non-success status");
    assert!(matches!(err, FetchError::Status { status: 503, ref url } if url.ends_with("/bouts/")));
    assert!(seen.into_inner().unwrap().is_empty());
}
