//! # loglens
//!
//! A small HTTP backend for a Docker dashboard. It lists, inspects, starts
//! and stops containers, pages through their logs, samples their resource
//! usage, and lists images, volumes and compose projects. Every response is
//! JSON except container logs, which are plain text.
//!
//! The service is stateless. Each request opens its own runtime client
//! through a [`Connector`](runtime::Connector), makes its engine calls and
//! drops the client before the response is sent.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use loglens::api::{AppState, create_router};
//! use loglens::runtime::DockerConnector;
//! use loglens::Server;
//!
//! #[tokio::main]
//! async fn main() {
//!     let state = Arc::new(AppState::new(Arc::new(DockerConnector::new()), "./static"));
//!     Server::bind("0.0.0.0:8080".parse().unwrap())
//!         .serve(create_router(state))
//!         .await
//!         .unwrap();
//! }
//! ```
//!
//! The two pieces with logic of their own are [`logs::page`], which serves
//! a log newest-page-first in windows of 100 lines, and the formatters in
//! [`format`].

mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod api;
pub mod assets;
pub mod config;
pub mod error;
pub mod format;
pub mod handlers;
pub mod health;
pub mod logs;
pub mod middleware;
pub mod runtime;

pub use error::{ApiError, Error, ErrorKind};
pub use handler::Handler;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Json, Response};
pub use router::Router;
pub use server::Server;
