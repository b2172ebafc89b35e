//! Networking layer for discovery and session play.
//!
//! Packets are fixed-layout binary frames. The server side runs on tokio
//! with one task per connection; the client side is blocking.

/// Blocking TCP client that plays one session at a time.
pub mod client;

/// UDP offer beacon and listener.
pub mod discovery;

/// Codec and session error types.
pub mod errors;

/// Packet layouts and the codec trait.
pub mod messages;

/// TCP acceptor and per-connection session driver.
pub mod server;

/// Reading and writing whole packets over sync and async streams.
pub mod utils;
