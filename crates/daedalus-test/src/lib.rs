//! # Daedalus Test
//!
//! In-memory testing for Daedalus applications. Requests run through
//! [`Application::handle`](daedalus_server::Application::handle) directly, so
//! routing, binding, enrichment, execution and response rendering are all
//! exercised without binding a port.
//!
//! ## Example
//!
//! ```ignore
//! use daedalus_test::TestClient;
//! use http::StatusCode;
//!
//! #[tokio::test]
//! async fn creates_a_game() {
//!     let client = TestClient::new(app());
//!
//!     let response = client
//!         .post("/game")
//!         .json(&serde_json::json!({"name": "chess"}))
//!         .send()
//!         .await
//!         .unwrap();
//!
//!     response.assert_status(StatusCode::CREATED);
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus-test/0.1.0")]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
