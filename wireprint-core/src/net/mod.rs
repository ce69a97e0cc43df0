//! Connection Multiplexer: transparent ClientHello capture, TLS handshake
//! replay, and the two JSON query endpoints (spec §4.3, §4.8).

pub mod capture_stream;
pub mod endpoints;
pub mod guards;
pub mod handshake;
pub mod replay;
pub mod server;

pub use capture_stream::Http2CapturingStream;
pub use endpoints::route;
pub use guards::ConnectionGuard;
pub use handshake::read_client_hello_prefix;
pub use replay::ReplayStream;
pub use server::run;
