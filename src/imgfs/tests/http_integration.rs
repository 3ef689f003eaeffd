//! End-to-end HTTP flow against a running `Server`: insert, read a derived
//! resolution, list, delete (spec.md §8 scenario 5).

use imgfs::http::Server;
use imgfs::ops;
use imgfs::store::Store;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;
use tempfile::NamedTempFile;

fn jpeg_bytes(w: u32, h: u32, fill: u8) -> Vec<u8> {
    let image = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        w,
        h,
        image::Rgb([fill, fill, fill]),
    ));
    let mut buf = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();
    buf
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Sends a raw request and reads back a full response (headers + the exact
/// `Content-Length` worth of body), mirroring how `RequestParser` frames a
/// message on the server side.
fn send_request(port: u16, request: &[u8]) -> (u16, String, Vec<u8>) {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.write_all(request).unwrap();

    let mut response = Vec::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        response.extend_from_slice(&buf[..n]);
        if let Some(pos) = find_subslice(&response, b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&response[..pos]).into_owned();
            let content_length: usize = headers
                .lines()
                .skip(1)
                .find_map(|line| {
                    let (key, value) = line.split_once(':')?;
                    key.trim()
                        .eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if response.len() >= pos + 4 + content_length {
                let status: u16 = headers
                    .lines()
                    .next()
                    .unwrap()
                    .split_whitespace()
                    .nth(1)
                    .unwrap()
                    .parse()
                    .unwrap();
                let body = response[pos + 4..pos + 4 + content_length].to_vec();
                return (status, headers, body);
            }
        }
    }
    panic!("connection closed before a full response was read");
}

#[test]
fn full_http_flow_insert_read_list_delete() {
    let tmp = NamedTempFile::new().unwrap();
    ops::create(tmp.path(), ops::CreateOptions::default())
        .unwrap()
        .close();
    let store = Store::open(tmp.path(), true).unwrap();

    let port = 18231;
    let server = Server::new(store, port);
    let shutdown = server.shutdown_flag();
    let handle = thread::spawn(move || server.run().unwrap());
    thread::sleep(Duration::from_millis(200));

    let bytes = jpeg_bytes(32, 32, 7);
    let mut insert_req = format!(
        "POST /imgfs/insert?name=cat.jpg HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
        bytes.len()
    )
    .into_bytes();
    insert_req.extend_from_slice(&bytes);
    let (status, headers, _) = send_request(port, &insert_req);
    assert_eq!(status, 302);
    assert!(headers.to_ascii_lowercase().contains("location:"));

    let (status, headers, body) = send_request(
        port,
        b"GET /imgfs/read?img_id=cat.jpg&res=small HTTP/1.1\r\n\r\n",
    );
    assert_eq!(status, 200);
    assert!(headers.contains("Content-Type: image/jpeg"));
    image::load_from_memory_with_format(&body, image::ImageFormat::Jpeg)
        .expect("the small resolution must decode as a JPEG");

    let (status, _, body) = send_request(port, b"GET /imgfs/list HTTP/1.1\r\n\r\n");
    assert_eq!(status, 200);
    let listing: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(listing["Images"], serde_json::json!(["cat.jpg"]));

    let (status, _, _) = send_request(port, b"GET /imgfs/delete?img_id=cat.jpg HTTP/1.1\r\n\r\n");
    assert_eq!(status, 302);

    let (status, _, body) = send_request(port, b"GET /imgfs/list HTTP/1.1\r\n\r\n");
    assert_eq!(status, 200);
    let listing: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(listing["Images"], serde_json::json!([]));

    shutdown.store(true, Ordering::SeqCst);
    handle.join().unwrap();
}

#[test]
fn unknown_route_maps_to_internal_server_error() {
    let tmp = NamedTempFile::new().unwrap();
    ops::create(tmp.path(), ops::CreateOptions::default())
        .unwrap()
        .close();
    let store = Store::open(tmp.path(), true).unwrap();

    let port = 18232;
    let server = Server::new(store, port);
    let shutdown = server.shutdown_flag();
    let handle = thread::spawn(move || server.run().unwrap());
    thread::sleep(Duration::from_millis(200));

    let (status, _, body) = send_request(port, b"GET /imgfs/unknown HTTP/1.1\r\n\r\n");
    assert_eq!(status, 500);
    assert!(String::from_utf8_lossy(&body).contains("invalid command"));

    shutdown.store(true, Ordering::SeqCst);
    handle.join().unwrap();
}
