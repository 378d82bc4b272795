//! The HTTP session against the LIFX cloud API.
//!
//! [`LifxClient`] owns the connection configuration and a dedicated, strictly
//! serial delivery context created at construction. Operations dispatch
//! asynchronously and report exactly once through a completion callback; two
//! completions for the same client never run concurrently, though they may
//! arrive out of issue order.

mod request;

use std::time::Duration;

use bytes::Bytes;
use log::debug;
use reqwest::{Client, Method};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::decode::{decode_batch, ResponseRecord};
use crate::error::ClientError;
use crate::model::{CommandResult, Light};

pub use request::{ApiRequest, ApiResponse, RequestBuilder};

/// Connection configuration, fixed for the lifetime of a [`LifxClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Personal access token, sent as `Authorization: Bearer <token>`.
    pub access_token: String,
    pub base_url: String,
    pub user_agent: String,
    /// Per-request bound enforced by the transport. A timed-out request is
    /// terminal; reissue it if desired.
    pub timeout: Duration,
}

impl ClientConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.lifx.com/v1beta1";
    pub const DEFAULT_USER_AGENT: &'static str =
        concat!("lifx-cloud/", env!("CARGO_PKG_VERSION"));
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(access_token: impl Into<String>) -> Self {
        ClientConfig {
            access_token: access_token.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            user_agent: Self::DEFAULT_USER_AGENT.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Outcome of one API call, delivered exactly once per operation.
///
/// `records` and `error` are mutually exclusive: a failed call always
/// carries an empty record list, and a partial batch is never surfaced.
#[derive(Debug)]
pub struct Completion<T> {
    /// The request as it went over the wire.
    pub request: ApiRequest,
    /// `None` when the transport failed before a response arrived.
    pub response: Option<ApiResponse>,
    pub records: Vec<T>,
    pub error: Option<ClientError>,
}

type DeliveryJob = Box<dyn FnOnce() + Send>;

/// Client for the LIFX cloud HTTP API.
#[derive(Debug, Clone)]
pub struct LifxClient {
    builder: RequestBuilder,
    http: Client,
    deliveries: mpsc::UnboundedSender<DeliveryJob>,
}

impl LifxClient {
    /// Creates a client and spawns its delivery task, so this must run
    /// inside a Tokio runtime. The task drains completions one at a time
    /// and ends once every clone of the client has been dropped.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        let (deliveries, mut queue) = mpsc::unbounded_channel::<DeliveryJob>();
        tokio::spawn(async move {
            while let Some(job) = queue.recv().await {
                job();
            }
        });

        Ok(LifxClient {
            builder: RequestBuilder::new(&config),
            http,
            deliveries,
        })
    }

    /// Fetches the current state of every light matched by `selector`.
    pub fn list_lights<F>(&self, selector: &str, completion: F)
    where
        F: FnOnce(Completion<Light>) + Send + 'static,
    {
        let request = self.builder.build(&format!("lights/{selector}"));
        self.dispatch(request, completion);
    }

    /// Turns the matched lights on or off, fading over `duration` seconds.
    pub fn set_lights_power<F>(&self, selector: &str, power: bool, duration: f64, completion: F)
    where
        F: FnOnce(Completion<CommandResult>) + Send + 'static,
    {
        let body = PowerBody {
            state: if power { "on" } else { "off" },
            duration,
        };
        let request = write_request(
            self.builder.build(&format!("lights/{selector}/power")),
            &body,
        );
        self.dispatch(request, completion);
    }

    /// Applies a server-side color expression (a named color, or something
    /// like `"hue:120 saturation:1.0"`) to the matched lights.
    pub fn set_lights_color<F>(
        &self,
        selector: &str,
        color: &str,
        duration: f64,
        power_on: bool,
        completion: F,
    ) where
        F: FnOnce(Completion<CommandResult>) + Send + 'static,
    {
        let body = ColorBody {
            color,
            duration,
            power_on,
        };
        let request = write_request(
            self.builder.build(&format!("lights/{selector}/color")),
            &body,
        );
        self.dispatch(request, completion);
    }

    /// Submits the request on a fresh task and funnels the finished
    /// completion through the delivery queue. The caller never blocks.
    fn dispatch<T, F>(&self, request: ApiRequest, completion: F)
    where
        T: ResponseRecord + Send + 'static,
        F: FnOnce(Completion<T>) + Send + 'static,
    {
        debug!("{} {}", request.method, request.url);
        let http = self.http.clone();
        let deliveries = self.deliveries.clone();

        tokio::spawn(async move {
            let outcome = round_trip(&http, request).await;
            let job: DeliveryJob = Box::new(move || completion(outcome));
            // Fails only when the client is gone and nobody is listening.
            let _ = deliveries.send(job);
        });
    }
}

/// Executes one request and folds transport and decode failures into a
/// completion. A transport error short-circuits with no response; once bytes
/// arrive they go to the decoder regardless of HTTP status, since the API
/// signals per-device trouble inside the records themselves.
async fn round_trip<T: ResponseRecord>(http: &Client, request: ApiRequest) -> Completion<T> {
    match send(http, &request).await {
        Err(error) => Completion {
            request,
            response: None,
            records: Vec::new(),
            error: Some(ClientError::Transport(error)),
        },
        Ok((response, bytes)) => match decode_batch::<T>(&bytes) {
            Ok(records) => Completion {
                request,
                response: Some(response),
                records,
                error: None,
            },
            Err(error) => Completion {
                request,
                response: Some(response),
                records: Vec::new(),
                error: Some(ClientError::Decode(error)),
            },
        },
    }
}

async fn send(http: &Client, request: &ApiRequest) -> Result<(ApiResponse, Bytes), reqwest::Error> {
    let mut builder = http.request(request.method.clone(), &request.url);
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    if let Some(body) = &request.body {
        builder = builder.body(body.clone());
    }

    let response = builder.send().await?;
    let status = response.status().as_u16();
    let bytes = response.bytes().await?;
    Ok((ApiResponse { status }, bytes))
}

/// Upgrades a built request to a PUT carrying a JSON body.
fn write_request<B: Serialize>(mut request: ApiRequest, body: &B) -> ApiRequest {
    request.method = Method::PUT;
    request
        .headers
        .push(("Content-Type".to_string(), "application/json".to_string()));
    // Fixed-shape bodies with plain string keys never fail to serialize.
    request.body = serde_json::to_string(body).ok();
    request
}

#[derive(Serialize)]
struct PowerBody<'a> {
    state: &'a str,
    duration: f64,
}

#[derive(Serialize)]
struct ColorBody<'a> {
    color: &'a str,
    duration: f64,
    power_on: bool,
}
