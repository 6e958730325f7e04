use super::{Request, TryIntoRequest};
use crate::{client::Client, error::Error, response::Response, routing::Route};
use accord_model::user::CurrentUser;

/// Get information about the user the token belongs to.
#[must_use = "requests must be configured and executed"]
pub struct GetCurrentUser<'a> {
    http: &'a Client,
}

impl<'a> GetCurrentUser<'a> {
    pub(crate) const fn new(http: &'a Client) -> Self {
        Self { http }
    }

    /// Execute the request, returning the response.
    pub async fn exec(self) -> Result<Response<CurrentUser>, Error> {
        let http = self.http;

        http.request(self.try_into_request()?).await
    }
}

impl TryIntoRequest for GetCurrentUser<'_> {
    fn try_into_request(self) -> Result<Request, Error> {
        Ok(Request::from_route(&Route::GetCurrentUser))
    }
}
