//! The HTTP/1.1 subset engine: transport primitives, request parsing,
//! response writing, and route dispatch (spec.md §4.3, §4.4).

mod request;
mod response;
mod server;
mod transport;

pub use request::{get_var, match_uri, match_verb, HttpMessage, RequestParser};
pub use response::HttpResponse;
pub use server::Server;
