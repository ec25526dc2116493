//! Outbound request execution.
//!
//! [`RequestExecutor::execute`] never fails: DNS errors, refused connections,
//! timeouts and non-2xx answers all come back as an [`HttpResponse`]. A call
//! that produced no HTTP status at all is reported with status `0`.

use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

use reqwest::{Client, StatusCode, Url};

use crate::{
    domain::{history::now_millis, request::HttpRequest, response::HttpResponse},
    error::{RequestError, Result},
    utilities::{
        request::{convert_http_method, outbound_body},
        response::{build_response_data, collect_headers, status_text},
    },
};

struct RemoteReply {
    status: StatusCode,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct RequestExecutor {
    client: Client,
    timeout: Duration,
}

impl RequestExecutor {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    pub async fn execute(&self, request: &HttpRequest) -> HttpResponse {
        let outbound = match self.build(request) {
            Ok(outbound) => outbound,
            Err(e) => {
                tracing::warn!(url = %request.url, error = %e, "request could not be built");
                return HttpResponse::failed(&e, 0, now_millis());
            }
        };

        let started = Instant::now();
        let outcome = self.send(outbound).await;
        let response_time_ms = elapsed_ms(started.elapsed());
        let timestamp = now_millis();

        match outcome {
            Ok(reply) => {
                tracing::info!(
                    method = %request.method,
                    url = %request.url,
                    status = reply.status.as_u16(),
                    response_time_ms,
                    "request completed"
                );
                HttpResponse {
                    status: reply.status.as_u16(),
                    status_text: status_text(reply.status),
                    data: build_response_data(reply.status, &reply.body),
                    headers: reply.headers,
                    response_time_ms,
                    timestamp,
                }
            }
            Err(e) => {
                tracing::info!(
                    method = %request.method,
                    url = %request.url,
                    error = %e,
                    response_time_ms,
                    "request failed"
                );
                HttpResponse::failed(&e, response_time_ms, timestamp)
            }
        }
    }

    fn build(&self, request: &HttpRequest) -> std::result::Result<reqwest::Request, RequestError> {
        let url = validate_url(&request.url)?;
        let mut builder = self
            .client
            .request(convert_http_method(request.method), url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = outbound_body(request) {
            builder = builder.body(body.to_string());
        }
        builder
            .build()
            .map_err(|e| RequestError::from_reqwest(e, self.timeout))
    }

    async fn send(
        &self,
        outbound: reqwest::Request,
    ) -> std::result::Result<RemoteReply, RequestError> {
        let response = self
            .client
            .execute(outbound)
            .await
            .map_err(|e| RequestError::from_reqwest(e, self.timeout))?;
        let status = response.status();
        let headers = collect_headers(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| RequestError::from_reqwest(e, self.timeout))?
            .to_vec();
        Ok(RemoteReply {
            status,
            headers,
            body,
        })
    }
}

/// Only absolute http(s) URLs are sent.
pub fn validate_url(raw: &str) -> std::result::Result<Url, RequestError> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RequestError::UnsupportedProtocol(other.to_string())),
    }
}

/// Rounded up, so a reported time is never shorter than the real one.
fn elapsed_ms(elapsed: Duration) -> u64 {
    let micros = elapsed.as_micros();
    u64::try_from((micros + 999) / 1000).unwrap_or(u64::MAX)
}
