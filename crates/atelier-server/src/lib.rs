pub mod cache;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod pages;
pub mod reconcile;
pub mod routes;
pub mod sections;
pub mod server;

pub use config::AppConfig;
pub use observability::{apply_logging_level, init_tracing, shutdown_tracing};
pub use server::{AppState, AtelierServer, ServerBuilder, build_app, build_router};
