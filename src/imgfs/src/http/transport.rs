//! Connection-oriented byte stream primitives: bind/listen/accept/recv/send
//! (spec.md §4.4), built directly on `std::net`.

use socket2::{Domain, Socket, Type};
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};

/// Binds a loopback listener with address reuse enabled and the platform's
/// default backlog, mirroring the source's `tcp_server_init`.
pub fn bind_listen(port: u16) -> io::Result<TcpListener> {
    let addr: SocketAddr = ([127, 0, 0, 1], port).into();

    let socket = Socket::new(Domain::IPV4, Type::STREAM, None)?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(1024)?;

    Ok(socket.into())
}

/// Accepts one new connection off `listener` and puts it back into blocking
/// mode for the per-connection worker's `recv`/`send` loop. `listener`
/// itself is left in whatever blocking mode `Server::run`'s poll loop put it
/// in (non-blocking, so the accept loop can also observe the shutdown flag).
pub fn accept(listener: &TcpListener) -> io::Result<TcpStream> {
    let (stream, _peer) = listener.accept()?;
    stream.set_nonblocking(false)?;
    Ok(stream)
}

/// Blocking read of at most `buf.len()` bytes. Returns `0` on orderly peer
/// shutdown, matching `recv`'s semantics.
pub fn recv(conn: &mut TcpStream, buf: &mut [u8]) -> io::Result<usize> {
    conn.read(buf)
}

/// Blocking send of `buf`, looping until the whole buffer is flushed or a
/// socket error occurs (partial writes are re-attempted).
pub fn send(conn: &mut TcpStream, buf: &[u8]) -> io::Result<()> {
    conn.write_all(buf)
}
