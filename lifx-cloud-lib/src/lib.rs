//! # LIFX Cloud Client Library
//!
//! `lifx-cloud-lib` is a Rust client for the LIFX HTTP API. It turns typed
//! light-control operations into authenticated HTTP requests against the
//! cloud API and decodes the JSON responses into validated domain records.
//!
//! The library covers the stateless request/decode pipeline only: listing
//! lights and setting their power or color through a selector. Device
//! discovery, LAN protocols, and retry policy are left to callers.
//!
//! ## Features
//!
//! - Authenticated request construction against a configurable base URL
//! - Asynchronous dispatch that never blocks the calling task
//! - Strictly serialized completion delivery per client instance
//! - Schema-validated, all-or-nothing response decoding
//!
//! ## Example
//!
//! Listing every light visible to an access token:
//!
//! ```no_run
//! use lifx_cloud_lib::client::{ClientConfig, LifxClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LifxClient::new(ClientConfig::new("my-access-token"))?;
//!
//!     let (tx, rx) = tokio::sync::oneshot::channel();
//!     client.list_lights("all", move |completion| {
//!         let _ = tx.send(completion);
//!     });
//!
//!     for light in rx.await?.records {
//!         println!("{} is {}", light.label, if light.power { "on" } else { "off" });
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Disclaimer
//!
//! This project is not affiliated with, authorized by, endorsed by, or in any
//! way officially connected with LIFX or its affiliates.
//!
//! ## License
//!
//! This project is dual-licensed under the MIT License and the Apache License,
//! Version 2.0. You may choose to use either license, depending on your
//! project needs.

// The `client` module owns the HTTP session: connection configuration,
// request construction, asynchronous dispatch, and the ordered delivery of
// completions back to the caller.
//
// Example usage:
//
// ```
// use lifx_cloud_lib::client::{ClientConfig, LifxClient};
//
// #[tokio::main]
// async fn main() {
//     let client = LifxClient::new(ClientConfig::new("token")).unwrap();
//     client.set_lights_power("all", true, 1.0, |completion| {
//         println!("{} lights acknowledged", completion.records.len());
//     });
// }
// ```
pub mod client;

// The `decode` module turns raw response bytes into typed record batches. It
// normalizes the response root, validates every required field, and fails the
// whole batch on the first invalid element.
pub mod decode;

// The `error` module defines the closed error surface of the library: a
// transport failure passed through verbatim, or a structured decode failure.
pub mod error;

// The `model` module holds the decoded domain records: a light snapshot, its
// embedded color, and the per-device result of a control command.
pub mod model;
