//! Generic request/response pipeline.
//!
//! Every endpoint goes through [`Client::invoke_endpoint`]: resolve the URL,
//! encode the optional body as JSON, authorize, dispatch once, then classify
//! the response by status and decode it by declared content type.

use crate::client::Client;
use crate::error::{Error, ErrorResponse, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Request, Response};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use tracing::debug;

/// The only media type this client encodes or decodes.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP verbs used by the SuperHub API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Delete => Self::DELETE,
        }
    }
}

impl Client {
    /// Invoke an endpoint and decode its response as `T`.
    ///
    /// `Ok(None)` means the response declared no content type, which is how
    /// the API answers calls without a payload.
    ///
    /// # Errors
    ///
    /// Any [`Error`] variant except [`Error::EmptyResponse`] and
    /// [`Error::ConfigError`].
    pub async fn invoke_endpoint<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut url = self.resolve(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let mut request = Request::new(method.into(), url);
        request
            .headers_mut()
            .insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));

        if let Some(payload) = body {
            let encoded = serde_json::to_vec(payload).map_err(Error::Serialize)?;
            request
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
            *request.body_mut() = Some(encoded.into());
        }

        self.process_request(request).await
    }

    /// Invoke an endpoint whose response payload is irrelevant.
    ///
    /// Any JSON body or no body at all counts as success.
    ///
    /// # Errors
    ///
    /// Same as [`Client::invoke_endpoint`].
    pub async fn invoke_void_endpoint<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.invoke_endpoint::<B, IgnoredAny>(method, path, query, body)
            .await
            .map(|_| ())
    }

    /// Invoke an endpoint that must answer with a `T`.
    ///
    /// # Errors
    ///
    /// Same as [`Client::invoke_endpoint`], plus [`Error::EmptyResponse`] when
    /// the response carried no body.
    pub async fn fetch<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.invoke_endpoint(method, path, query, body)
            .await?
            .ok_or(Error::EmptyResponse)
    }

    /// `GET` an endpoint that must answer with a `T`.
    ///
    /// # Errors
    ///
    /// Same as [`Client::fetch`].
    pub async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.fetch(Method::Get, path, query, Option::<&()>::None)
            .await
    }

    /// Authorize and dispatch a prepared request, then decode the response.
    ///
    /// # Errors
    ///
    /// [`Error::Transport`] if dispatch fails, otherwise whatever
    /// [`handle_response`] reports.
    pub async fn process_request<T>(&self, mut request: Request) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        self.credentials().authorize(request.headers_mut());

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "SuperHub request");

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(Error::Transport)?;

        debug!(%method, %url, status = response.status().as_u16(), "SuperHub response");
        handle_response(response).await
    }
}

/// Classify a response by status and decode it.
///
/// - below 400: the body is decoded as `T`;
/// - 400 to 499: the body is decoded as [`ErrorResponse`], falling back to
///   [`Error::UnsuccessfulStatus`] when that fails;
/// - 500 and above: [`Error::ServerFault`] without looking at the body.
///
/// # Errors
///
/// See above, plus the decoding errors of [`decode_body`].
pub async fn handle_response<T>(response: Response) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    let status = response.status();

    if status.as_u16() >= 500 {
        return Err(Error::ServerFault(status));
    }

    if status.is_client_error() {
        return Err(match decode_body::<ErrorResponse>(response).await {
            Ok(Some(body)) => Error::from(body),
            Ok(None) | Err(_) => Error::UnsuccessfulStatus(status),
        });
    }

    decode_body(response).await
}

/// Decode a response body according to its declared content type.
///
/// # Errors
///
/// [`Error::UnsupportedContentType`] for anything but JSON or no content type,
/// [`Error::Transport`] if the body cannot be read, [`Error::Decode`] if it
/// does not match `T`.
pub async fn decode_body<T>(response: Response) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    let content_type = media_type(response.headers());

    if content_type.is_empty() {
        return Ok(None);
    }
    if content_type != JSON_CONTENT_TYPE {
        return Err(Error::UnsupportedContentType(content_type));
    }

    let body = response.bytes().await.map_err(Error::Transport)?;
    serde_json::from_slice(&body)
        .map(Some)
        .map_err(|source| Error::Decode {
            target: std::any::type_name::<T>(),
            source,
        })
}

/// Media type of the `Content-Type` header, lower-cased and without parameters.
fn media_type(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .and_then(|value| value.split(';').next().map(str::to_owned))
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_default()
}
