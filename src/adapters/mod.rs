// Adapters layer: concrete implementations of the domain ports (http transport, session storage).

pub mod http;
pub mod storage;
