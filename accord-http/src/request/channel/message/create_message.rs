use crate::{
    client::Client,
    error::Error,
    request::{Request, TryIntoRequest},
    response::Response,
    routing::Route,
};
use accord_model::{
    id::{marker::ChannelMarker, Id},
    message::Message,
};
use accord_validate::message::{content as validate_content, MessageValidationError};
use serde::Serialize;

#[derive(Serialize)]
struct CreateMessageFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

/// Send a message to a channel.
///
/// # Examples
///
/// ```no_run
/// use accord_http::Client;
/// use accord_model::id::Id;
///
/// # #[tokio::main] async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("my token".to_owned());
///
/// let channel_id = Id::new(123);
/// let message = client
///     .create_message(channel_id)
///     .content("good morning :)")?
///     .exec()
///     .await?;
/// # Ok(()) }
/// ```
#[must_use = "requests must be configured and executed"]
pub struct CreateMessage<'a> {
    channel_id: Id<ChannelMarker>,
    fields: CreateMessageFields,
    http: &'a Client,
}

impl<'a> CreateMessage<'a> {
    pub(crate) const fn new(http: &'a Client, channel_id: Id<ChannelMarker>) -> Self {
        Self {
            channel_id,
            fields: CreateMessageFields { content: None },
            http,
        }
    }

    /// Set the message's text content.
    ///
    /// # Errors
    ///
    /// Returns an error of type [`ContentInvalid`] if the content length is
    /// over the documented maximum.
    ///
    /// [`ContentInvalid`]: accord_validate::message::MessageValidationErrorType::ContentInvalid
    pub fn content(mut self, content: impl Into<String>) -> Result<Self, MessageValidationError> {
        let content = content.into();
        validate_content(&content)?;

        self.fields.content.replace(content);

        Ok(self)
    }

    /// Execute the request, returning the response.
    pub async fn exec(self) -> Result<Response<Message>, Error> {
        let http = self.http;

        http.request(self.try_into_request()?).await
    }
}

impl TryIntoRequest for CreateMessage<'_> {
    fn try_into_request(self) -> Result<Request, Error> {
        Ok(Request::builder(&Route::CreateMessage {
            channel_id: self.channel_id.get(),
        })
        .json(&self.fields)?
        .build())
    }
}

#[cfg(test)]
mod tests {
    use super::CreateMessage;
    use crate::{client::Client, request::TryIntoRequest};
    use accord_http_ratelimiting::Method;
    use accord_model::id::Id;

    #[test]
    fn request_shape() {
        let client = Client::new("token".to_owned());

        let request = CreateMessage::new(&client, Id::new(1))
            .content("hi")
            .unwrap()
            .try_into_request()
            .unwrap();

        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.path(), "channels/1/messages");
        assert_eq!(request.body(), Some(br#"{"content":"hi"}"# as &[u8]));
    }

    #[test]
    fn oversized_content_rejected() {
        let client = Client::new("token".to_owned());

        assert!(CreateMessage::new(&client, Id::new(1))
            .content("a".repeat(2001))
            .is_err());
    }
}
