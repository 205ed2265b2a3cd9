pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{http::ReqwestTransport, storage::FileSessionStore, storage::MemorySessionStore};
pub use config::{ClientConfig, Environment};
pub use core::client::{ResilientQueryClient, ResilientQueryClientBuilder};
pub use core::session::SessionManager;
pub use domain::model::{EndpointList, GraphqlError, GraphqlResponse, QueryRequest, Session};
pub use utils::error::{ClientError, EndpointError, Result};
