use crate::{
    client::Client,
    error::Error,
    request::{Request, TryIntoRequest},
    response::{marker::EmptyBody, Response},
    routing::Route,
};
use accord_model::id::{marker::ApplicationMarker, Id};
use serde::Serialize;

#[derive(Serialize)]
struct CreateGlobalCommandFields<'a> {
    description: &'a str,
    name: &'a str,
}

/// Create a global command for an application.
///
/// The application ID is the bot's own user ID as reported by the session
/// handshake.
#[must_use = "requests must be configured and executed"]
pub struct CreateGlobalCommand<'a> {
    application_id: Id<ApplicationMarker>,
    description: &'a str,
    http: &'a Client,
    name: &'a str,
}

impl<'a> CreateGlobalCommand<'a> {
    pub(crate) const fn new(
        http: &'a Client,
        application_id: Id<ApplicationMarker>,
        name: &'a str,
        description: &'a str,
    ) -> Self {
        Self {
            application_id,
            description,
            http,
            name,
        }
    }

    /// Execute the request, returning the response.
    pub async fn exec(self) -> Result<Response<EmptyBody>, Error> {
        let http = self.http;

        http.request(self.try_into_request()?).await
    }
}

impl TryIntoRequest for CreateGlobalCommand<'_> {
    fn try_into_request(self) -> Result<Request, Error> {
        Ok(Request::builder(&Route::CreateGlobalCommand {
            application_id: self.application_id.get(),
        })
        .json(&CreateGlobalCommandFields {
            description: self.description,
            name: self.name,
        })?
        .build())
    }
}

#[cfg(test)]
mod tests {
    use super::CreateGlobalCommand;
    use crate::{client::Client, request::TryIntoRequest};
    use accord_http_ratelimiting::Method;
    use accord_model::id::Id;

    #[test]
    fn request_shape() {
        let client = Client::new("token".to_owned());

        let request = CreateGlobalCommand::new(&client, Id::new(7), "ping", "measure latency")
            .try_into_request()
            .unwrap();

        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.path(), "applications/7/commands");
        assert_eq!(
            request.body(),
            Some(br#"{"description":"measure latency","name":"ping"}"# as &[u8]),
        );
    }
}
