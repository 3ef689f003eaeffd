//! `imgfs_server`: opens an existing store and serves it over HTTP until a
//! termination signal requests graceful shutdown (spec.md §6 "Server CLI",
//! §5 "Cancellation").

use clap::Parser;
use imgfs::http::Server;
use imgfs::store::Store;
use log::error;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

const DEFAULT_PORT: u16 = 8000;

#[derive(Parser)]
#[command(name = "imgfs_server", about = "imgFS HTTP server")]
struct Cli {
    file: PathBuf,
    port: Option<u16>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let port = cli.port.unwrap_or(DEFAULT_PORT);

    let store = match Store::open(&cli.file, true) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(err.exit_code());
        }
    };

    let server = Server::new(store, port);

    // SIGINT/SIGTERM are handled on the main thread only; worker threads
    // never install a handler (spec.md §5). Flipping the flag here is all
    // `ctrlc`'s handler does — the accept loop observes it and exits.
    let shutdown = server.shutdown_flag();
    if let Err(err) = ctrlc::set_handler(move || {
        shutdown.store(true, Ordering::SeqCst);
    }) {
        error!("failed to install signal handler: {}", err);
        std::process::exit(imgfs::error::ImgFsError::Runtime.exit_code());
    }

    if let Err(err) = server.run() {
        eprintln!("ERROR: {}", err);
        std::process::exit(imgfs::error::ImgFsError::Io(err).exit_code());
    }
}
