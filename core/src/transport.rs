//! Blocking execution of `HttpRequest` values.
//!
//! # Design
//! `Transport` is the I/O seam between the sans-IO `AwsAccountClient` and
//! the network. `UreqTransport` builds a fresh agent for every request, so
//! no connection state is shared between calls. Status codes are returned
//! as data (`http_status_as_error(false)`) and interpreted by the parser.

use std::time::Duration;

use ureq::{Agent, RequestBuilder};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes a request and returns the full response.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// `ureq`-backed transport with a per-request timeout.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    timeout: Duration,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn agent(&self) -> Agent {
        Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(self.timeout))
            .build()
            .new_agent()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = self.agent();
        let url = request.url.as_str();
        let headers = request.headers.as_slice();

        let mut response = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(agent.get(url), headers).call(),
            (HttpMethod::Delete, _) => with_headers(agent.delete(url), headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(agent.post(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(agent.post(url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(agent.put(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(agent.put(url), headers).send_empty(),
        }?;

        let status = response.status().as_u16();
        let response_headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status,
            headers: response_headers,
            body,
        })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    #[test]
    fn unresponsive_server_times_out_as_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            thread::sleep(Duration::from_millis(1500));
        });

        let transport = UreqTransport::new(Duration::from_millis(200));
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: format!("http://{addr}/aws_accounts/1?api_key=k"),
            headers: Vec::new(),
            body: None,
        };
        let err = transport.execute(request).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        server.join().unwrap();
    }

    #[test]
    fn refused_connection_is_transport_error() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let transport = UreqTransport::new(Duration::from_secs(2));
        let request = HttpRequest {
            method: HttpMethod::Delete,
            url: format!("http://{addr}/aws_accounts/1?api_key=k"),
            headers: Vec::new(),
            body: None,
        };
        assert!(matches!(transport.execute(request), Err(ApiError::Transport(_))));
    }
}
