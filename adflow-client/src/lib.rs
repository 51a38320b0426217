pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod session;
pub mod startup;

#[cfg(test)]
pub(crate) mod testing;

pub use error::ApiError;
pub use middleware::{Middleware, Next};
pub use services::{ApiClient, ApiClientBuilder, ApiRequest, ApiResponse, Transport};
pub use session::{
    FileSessionStore, MemorySessionStore, SessionError, SessionEvent, SessionKey, SessionStore,
};
