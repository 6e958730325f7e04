use super::{Request, TryIntoRequest};
use crate::{client::Client, error::Error, response::Response, routing::Route};
use accord_model::gateway::ConnectionInfo;

/// Discover the URL of the websocket gateway.
///
/// The response's `cache-control` header advertises how long the URL may be
/// reused; read it through [`Response::headers`] before consuming the body.
#[must_use = "requests must be configured and executed"]
pub struct GetGateway<'a> {
    http: &'a Client,
}

impl<'a> GetGateway<'a> {
    pub(crate) const fn new(http: &'a Client) -> Self {
        Self { http }
    }

    /// Execute the request, returning the response.
    pub async fn exec(self) -> Result<Response<ConnectionInfo>, Error> {
        let http = self.http;

        http.request(self.try_into_request()?).await
    }
}

impl TryIntoRequest for GetGateway<'_> {
    fn try_into_request(self) -> Result<Request, Error> {
        Ok(Request::from_route(&Route::GetGateway))
    }
}
