mod error;
mod session;
mod transport;
