//! The multi-threaded HTTP engine: accept loop, per-connection parsing, and
//! route dispatch (spec.md §4.4; the source's `imgfs_server_service.c` and
//! `http_net.c`'s `handle_connection`).

use crate::error::ImgFsError;
use crate::http::request::{get_var, match_uri, match_verb, RequestParser};
use crate::http::response::{self, HttpResponse};
use crate::http::transport;
use crate::ops::{self, ListMode};
use crate::store::{Resolution, Store};
use log::{error, info, warn};
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

const URI_ROOT: &str = "/imgfs";
const MAX_HEADER_SIZE: usize = 8192;
const RECV_BUFFER_SIZE: usize = 64 * 1024;
const LANDING_PAGE: &[u8] = include_bytes!("../../index.html");

/// Owns the shared store and the listening socket; `run` blocks the calling
/// thread in the accept loop until `shutdown` is requested (spec.md §4.4
/// "Concurrency model").
pub struct Server {
    store: Arc<Mutex<Store>>,
    port: u16,
    shutting_down: Arc<AtomicBool>,
}

impl Server {
    pub fn new(store: Store, port: u16) -> Server {
        Server {
            store: Arc::new(Mutex::new(store)),
            port,
            shutting_down: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A clone of the shutdown flag, meant to be flipped from a signal
    /// handler installed on the main thread (spec.md §4.4 "Graceful
    /// shutdown").
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutting_down)
    }

    /// Binds the listener and accepts connections until the shutdown flag
    /// is set, spawning one detached thread per connection.
    pub fn run(&self) -> std::io::Result<()> {
        let listener = transport::bind_listen(self.port)?;
        listener.set_nonblocking(true)?;
        info!("imgfs server listening on http://127.0.0.1:{}", self.port);

        while !self.shutting_down.load(Ordering::SeqCst) {
            match transport::accept(&listener) {
                Ok(conn) => {
                    let store = Arc::clone(&self.store);
                    let port = self.port;
                    thread::spawn(move || handle_connection(conn, store, port));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(std::time::Duration::from_millis(20));
                }
                Err(err) => return Err(err),
            }
        }

        info!("shutting down imgfs server");
        Ok(())
    }
}

/// One worker thread's life: pull requests off the connection until the
/// peer closes it, dispatching each to a route handler and writing back its
/// response. Residual bytes between pipelined requests are preserved by
/// `RequestParser` (spec.md §9).
fn handle_connection(mut conn: TcpStream, store: Arc<Mutex<Store>>, port: u16) {
    let mut parser = RequestParser::new(MAX_HEADER_SIZE);
    let mut buf = vec![0u8; RECV_BUFFER_SIZE];

    loop {
        let n = match transport::recv(&mut conn, &mut buf) {
            Ok(0) => return,
            Ok(n) => n,
            Err(err) => {
                warn!("connection read failed: {}", err);
                return;
            }
        };

        let message = match parser.feed(&buf[..n]) {
            Ok(Some(message)) => message,
            Ok(None) => continue,
            Err(err) => {
                warn!("malformed request: {}", err);
                return;
            }
        };

        let response = dispatch(&message.method, &message.uri, &message.body, &store, port);
        if response::send(&mut conn, &response).is_err() {
            return;
        }

        parser.advance_past_last_message();
    }
}

fn dispatch(method: &str, uri: &str, body: &[u8], store: &Arc<Mutex<Store>>, port: u16) -> HttpResponse {
    if match_verb(method, "GET") && (uri == "/" || match_uri(uri, "/index.html")) {
        return HttpResponse::ok("text/html; charset=utf-8", LANDING_PAGE.to_vec());
    }

    if match_uri(uri, &format!("{URI_ROOT}/list")) {
        return handle_list(store);
    }
    if match_uri(uri, &format!("{URI_ROOT}/insert")) && match_verb(method, "POST") {
        return handle_insert(uri, body, store, port);
    }
    if match_uri(uri, &format!("{URI_ROOT}/read")) {
        return handle_read(uri, store);
    }
    if match_uri(uri, &format!("{URI_ROOT}/delete")) {
        return handle_delete(uri, store, port);
    }

    reply_error(&ImgFsError::InvalidCommand)
}

/// Locks the shared store, recovering from a poisoned mutex rather than
/// panicking the worker thread. A panic mid-operation never leaves the store
/// itself inconsistent beyond the single field being written at the time
/// (every mutation persists one record via a single `write_all`), so the
/// guard's data is still safe to read and write; only the *panicking
/// request* failed, not the whole server (SPEC_FULL.md §9).
fn lock_store(store: &Arc<Mutex<Store>>) -> std::sync::MutexGuard<'_, Store> {
    store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn handle_list(store: &Arc<Mutex<Store>>) -> HttpResponse {
    let store = lock_store(store);
    let json = ops::list(&store, ListMode::Json);
    HttpResponse::ok("application/json", json.into_bytes())
}

fn handle_delete(uri: &str, store: &Arc<Mutex<Store>>, port: u16) -> HttpResponse {
    let Some(img_id) = get_var(uri, "img_id") else {
        return reply_error(&ImgFsError::NotEnoughArguments);
    };

    let mut store = lock_store(store);
    match ops::delete(&mut store, img_id) {
        Ok(()) => reply_302(port),
        Err(err) => reply_error(&err),
    }
}

fn handle_read(uri: &str, store: &Arc<Mutex<Store>>) -> HttpResponse {
    let Some(img_id) = get_var(uri, "img_id") else {
        return reply_error(&ImgFsError::NotEnoughArguments);
    };
    let Some(res) = get_var(uri, "res") else {
        return reply_error(&ImgFsError::NotEnoughArguments);
    };
    let Some(resolution) = Resolution::parse(res) else {
        return reply_error(&ImgFsError::Resolutions);
    };

    let mut store = lock_store(store);
    match ops::read(&mut store, img_id, resolution) {
        Ok(bytes) => HttpResponse::ok("image/jpeg", bytes),
        Err(err) => reply_error(&err),
    }
}

fn handle_insert(uri: &str, body: &[u8], store: &Arc<Mutex<Store>>, port: u16) -> HttpResponse {
    let Some(img_id) = get_var(uri, "name") else {
        return reply_error(&ImgFsError::NotEnoughArguments);
    };
    if body.is_empty() {
        return reply_error(&ImgFsError::NotEnoughArguments);
    }

    let mut store = lock_store(store);
    match ops::insert(&mut store, img_id, body) {
        Ok(()) => reply_302(port),
        Err(err) => reply_error(&err),
    }
}

fn reply_error(err: &ImgFsError) -> HttpResponse {
    error!("request failed: {}", err);
    HttpResponse::error(500, "Internal Server Error", &format!("Error: {}\n", err))
}

fn reply_302(port: u16) -> HttpResponse {
    HttpResponse::found(format!("http://localhost:{}/index.html", port))
}
