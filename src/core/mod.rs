pub mod auth;
pub mod client;
pub mod session;

pub use crate::domain::model::{EndpointList, GraphqlResponse, QueryRequest, Session};
pub use crate::domain::ports::{SessionStore, Transport};
pub use crate::utils::error::Result;
