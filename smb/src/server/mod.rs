//! Server-side state and the request-handling pipeline built on top of it:
//! connection/session bookkeeping, credit accounting, CHANGE_NOTIFY
//! registration, the command [`dispatcher`], and the async connection
//! [`driver`] and [`acceptor`] that drive it over a socket.

pub mod acceptor;
pub mod config;
pub mod connection;
pub mod credit;
pub mod dispatcher;
pub mod driver;
pub mod notify;
pub mod open;
pub mod session;
pub mod tree;
