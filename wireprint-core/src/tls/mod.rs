pub mod acceptor;
pub mod reload;

pub use acceptor::{build_rustls, ServerCertsKeys};
pub use reload::{setup_tls_with_hot_reload, TlsHotReload};
