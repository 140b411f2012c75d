use std::time::Duration;

use log::debug;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use serde::Serialize;

use crate::providers::dynect::error::DynectError;
use crate::providers::dynect::types::*;

#[derive(Debug)]
pub struct DynectConfig {
    pub api_url: String,
    pub retry_interval: Duration,
}

/// Session-scoped client for the Dynect REST API.
///
/// Authentication is a header-scoped session: `login` exchanges credentials
/// for a token which is attached as `Auth-Token` to every subsequent
/// request, including redirects and job polls. The API runs mutations as
/// asynchronous jobs; a response with status `incomplete` is polled via GET
/// against the final redirect location until the job settles.
#[derive(Debug)]
pub struct DynectClient {
    config: DynectConfig,
    client: Client,
    token: Option<HeaderValue>,
}

impl DynectClient {
    pub fn new(config: DynectConfig) -> Result<Self, DynectError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            config,
            client,
            token: None,
        })
    }

    /// Exchanges credentials for a session token. Must succeed before any
    /// other call; the token is only stored on a successful exchange.
    pub async fn login(
        &mut self,
        customer: &str,
        user: &str,
        password: &str,
    ) -> Result<(), DynectError> {
        let request = SessionRequest {
            customer_name: customer.to_string(),
            user_name: user.to_string(),
            password: password.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/Session/", self.config.api_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        // Any failed exchange is an auth error, with the provider's own
        // message when the body yields one and the status line otherwise.
        let session: Option<SessionResponse> = serde_json::from_slice(&body).ok();
        if !(status.is_success() || status.is_redirection()) {
            return Err(DynectError::Auth(match session {
                Some(session) if !session.envelope.msgs.is_empty() => {
                    session.envelope.first_message()
                }
                _ => status.to_string(),
            }));
        }

        let session =
            session.ok_or_else(|| DynectError::Auth("malformed session response".to_string()))?;
        if session.envelope.status != JobStatus::Success {
            return Err(DynectError::Auth(session.envelope.first_message()));
        }

        self.token = Some(
            HeaderValue::from_str(&session.data.token)
                .map_err(|_| DynectError::Auth("token is not a valid header value".to_string()))?,
        );
        Ok(())
    }

    /// Issues a request with session headers attached and returns the raw
    /// response body. A `failure` envelope is not an error here; callers
    /// branch on the status themselves. An `incomplete` envelope triggers
    /// the polling loop: sleep for the retry interval, then GET the final
    /// redirect location of the exchange, indefinitely until the job
    /// settles.
    pub async fn request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Vec<u8>, DynectError>
    where
        B: Serialize + ?Sized,
    {
        let headers = self.headers()?;
        let url = format!("{}/{}", self.config.api_url, path);

        debug!("{} {}", method, url);
        let mut builder = self.client.request(method, &url).headers(headers.clone());
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let mut response = builder.send().await?;

        loop {
            let status = response.status();
            let poll_url = response.url().clone();
            let body = response.bytes().await?;

            if !(status.is_success() || status.is_redirection()) {
                return Err(DynectError::Api(format!(
                    "{}: {}",
                    status,
                    String::from_utf8_lossy(&body)
                )));
            }

            let envelope: ResponseEnvelope = serde_json::from_slice(&body)?;
            if envelope.status != JobStatus::Incomplete {
                return Ok(body.to_vec());
            }

            debug!(
                "job {:?} incomplete, polling {} in {:?}",
                envelope.job_id, poll_url, self.config.retry_interval
            );
            tokio::time::sleep(self.config.retry_interval).await;
            response = self
                .client
                .get(poll_url)
                .headers(headers.clone())
                .send()
                .await?;
        }
    }

    /// `request` for callers that only care whether the call succeeded: a
    /// non-success envelope becomes an error carrying the first message.
    pub async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), DynectError>
    where
        B: Serialize + ?Sized,
    {
        let body = self.request(method, path, body).await?;
        let envelope: ResponseEnvelope = serde_json::from_slice(&body)?;
        if envelope.status != JobStatus::Success {
            return Err(DynectError::Api(envelope.first_message()));
        }
        Ok(())
    }

    /// Time to wait between polls of an incomplete job.
    #[allow(dead_code)]
    pub fn set_retry_interval(&mut self, interval: Duration) {
        self.config.retry_interval = interval;
    }

    fn headers(&self) -> Result<HeaderMap, DynectError> {
        let token = self.token.as_ref().ok_or(DynectError::NotAuthenticated)?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("Auth-Token", token.clone());
        Ok(headers)
    }

    #[cfg(test)]
    pub(crate) fn set_token(&mut self, token: &str) {
        self.token = Some(HeaderValue::from_str(token).unwrap());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use httpmock::prelude::*;

    fn test_config(server: &MockServer) -> DynectConfig {
        DynectConfig {
            api_url: server.url("/REST"),
            retry_interval: Duration::from_millis(10),
        }
    }

    async fn logged_in_client(server: &MockServer) -> DynectClient {
        let login_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/REST/Session/");
                then.status(200).json_body(serde_json::json!({
                    "job_id": 1,
                    "status": "success",
                    "msgs": [],
                    "data": {"version": "3.7.13", "token": "sesstoken"}
                }));
            })
            .await;

        let mut client = DynectClient::new(test_config(server)).unwrap();
        client.login("acme", "api-user", "hunter2").await.unwrap();
        login_mock.assert_async().await;
        client
    }

    #[tokio::test]
    async fn test_login_sends_credentials_and_stores_token() {
        let server = MockServer::start_async().await;
        let login_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/REST/Session/").json_body(
                    serde_json::json!({
                        "customer_name": "acme",
                        "user_name": "api-user",
                        "password": "hunter2"
                    }),
                );
                then.status(200).json_body(serde_json::json!({
                    "job_id": 1,
                    "status": "success",
                    "msgs": [],
                    "data": {"version": "3.7.13", "token": "sesstoken"}
                }));
            })
            .await;
        let zone_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/REST/Zone/example.com")
                    .header("Auth-Token", "sesstoken")
                    .header("Content-Type", "application/json");
                then.status(200).json_body(serde_json::json!({
                    "job_id": 2,
                    "status": "success",
                    "msgs": []
                }));
            })
            .await;

        let mut client = DynectClient::new(test_config(&server)).unwrap();
        client.login("acme", "api-user", "hunter2").await.unwrap();
        client
            .request::<()>(Method::GET, "Zone/example.com", None)
            .await
            .unwrap();

        login_mock.assert_async().await;
        zone_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_rejected_carries_provider_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/REST/Session/");
                then.status(400).json_body(serde_json::json!({
                    "job_id": 1,
                    "status": "failure",
                    "msgs": [{"SOURCE": "BLL", "LVL": "ERROR", "ERR_CD": "INVALID_DATA",
                              "INFO": "login: Bad or expired credentials"}]
                }));
            })
            .await;

        let mut client = DynectClient::new(test_config(&server)).unwrap();
        let err = client.login("acme", "api-user", "wrong").await.unwrap_err();
        assert_matches!(err, DynectError::Auth(msg) => {
            assert!(msg.contains("Bad or expired credentials"));
        });
    }

    #[tokio::test]
    async fn test_request_before_login_fails() {
        let server = MockServer::start_async().await;
        let client = DynectClient::new(test_config(&server)).unwrap();
        let err = client
            .request::<()>(Method::GET, "Zone/example.com", None)
            .await
            .unwrap_err();
        assert_matches!(err, DynectError::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_tampered_token_surfaces_server_rejection() {
        let server = MockServer::start_async().await;
        let mut client = logged_in_client(&server).await;

        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/REST/Zone/example.com")
                    .header("Auth-Token", "bogus");
                then.status(400).json_body(serde_json::json!({
                    "job_id": 3,
                    "status": "failure",
                    "msgs": [{"SOURCE": "API-B", "LVL": "ERROR", "ERR_CD": "INVALID_DATA",
                              "INFO": "login: IP address does not match current session"}]
                }));
            })
            .await;

        client.set_token("bogus");
        let err = client
            .request::<()>(Method::GET, "Zone/example.com", None)
            .await
            .unwrap_err();
        assert_matches!(err, DynectError::Api(msg) => {
            assert!(msg.contains("400"));
        });
    }

    #[tokio::test]
    async fn test_incomplete_job_polls_redirect_location_with_get() {
        let server = MockServer::start_async().await;
        let mut client = logged_in_client(&server).await;
        client.set_retry_interval(Duration::from_millis(5));

        let update_mock = server
            .mock_async(|when, then| {
                when.method(PUT).path("/REST/ARecord/example.com/host.example.com/");
                then.status(307).header("Location", server.url("/REST/Job/42"));
            })
            .await;
        // reqwest replays the PUT against the redirect target; the job is
        // still running there.
        let job_put_mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/REST/Job/42")
                    .header("Auth-Token", "sesstoken");
                then.status(200).json_body(serde_json::json!({
                    "job_id": 42,
                    "status": "incomplete",
                    "msgs": []
                }));
            })
            .await;
        let job_get_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/REST/Job/42")
                    .header("Auth-Token", "sesstoken");
                then.status(200).json_body(serde_json::json!({
                    "job_id": 42,
                    "status": "success",
                    "msgs": [{"SOURCE": "API-B", "LVL": "INFO", "ERR_CD": null,
                              "INFO": "update: Record updated"}]
                }));
            })
            .await;

        let body = client
            .request(
                Method::PUT,
                "ARecord/example.com/host.example.com/",
                Some(&UpdateRecordRequest::new("203.0.113.5", 0)),
            )
            .await
            .unwrap();

        update_mock.assert_async().await;
        job_put_mock.assert_async().await;
        // The poll goes to the Job URL, not the original ARecord path, and
        // uses GET even though the original method was PUT.
        job_get_mock.assert_async().await;

        let envelope: ResponseEnvelope = serde_json::from_slice(&body).unwrap();
        assert_eq!(envelope.status, JobStatus::Success);
    }

    #[tokio::test]
    async fn test_request_returns_failure_envelope_to_caller() {
        let server = MockServer::start_async().await;
        let client = logged_in_client(&server).await;

        server
            .mock_async(|when, then| {
                when.method(GET).path("/REST/Zone/example.com");
                then.status(200).json_body(serde_json::json!({
                    "job_id": 4,
                    "status": "failure",
                    "msgs": [{"SOURCE": "API-B", "LVL": "ERROR", "ERR_CD": "NOT_FOUND",
                              "INFO": "zone: No such zone"}]
                }));
            })
            .await;

        // request leaves failure interpretation to the caller
        let body = client
            .request::<()>(Method::GET, "Zone/example.com", None)
            .await
            .unwrap();
        let envelope: ResponseEnvelope = serde_json::from_slice(&body).unwrap();
        assert_eq!(envelope.status, JobStatus::Failure);

        // execute converts it into an error with the first message
        let err = client
            .execute::<()>(Method::GET, "Zone/example.com", None)
            .await
            .unwrap_err();
        assert_matches!(err, DynectError::Api(msg) => {
            assert_eq!(msg, "ERROR: zone: No such zone");
        });
    }

    #[tokio::test]
    async fn test_http_error_status_captured_for_diagnostics() {
        let server = MockServer::start_async().await;
        let client = logged_in_client(&server).await;

        server
            .mock_async(|when, then| {
                when.method(GET).path("/REST/Zone/missing.example.com");
                then.status(404).body("No such resource");
            })
            .await;

        let err = client
            .request::<()>(Method::GET, "Zone/missing.example.com", None)
            .await
            .unwrap_err();
        assert_matches!(err, DynectError::Api(msg) => {
            assert!(msg.contains("404"));
            assert!(msg.contains("No such resource"));
        });
    }
}
