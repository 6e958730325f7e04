use crate::{
    client::Client,
    error::Error,
    request::{Request, TryIntoRequest},
    response::Response,
    routing::Route,
};
use accord_model::{
    id::{
        marker::{ChannelMarker, MessageMarker},
        Id,
    },
    message::Message,
};
use accord_validate::message::{content as validate_content, MessageValidationError};
use serde::Serialize;

#[derive(Serialize)]
struct UpdateMessageFields {
    /// Wrapped in a double option so the field can be omitted (leave the
    /// content alone), null (clear the content), or a new value.
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<Option<String>>,
}

/// Edit a message in a channel, by ID.
#[must_use = "requests must be configured and executed"]
pub struct UpdateMessage<'a> {
    channel_id: Id<ChannelMarker>,
    fields: UpdateMessageFields,
    http: &'a Client,
    message_id: Id<MessageMarker>,
}

impl<'a> UpdateMessage<'a> {
    pub(crate) const fn new(
        http: &'a Client,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
    ) -> Self {
        Self {
            channel_id,
            fields: UpdateMessageFields { content: None },
            http,
            message_id,
        }
    }

    /// Set or clear the message's text content.
    ///
    /// Pass `None` to remove the content entirely.
    ///
    /// # Errors
    ///
    /// Returns an error of type [`ContentInvalid`] if the content length is
    /// over the documented maximum.
    ///
    /// [`ContentInvalid`]: accord_validate::message::MessageValidationErrorType::ContentInvalid
    pub fn content(mut self, content: Option<String>) -> Result<Self, MessageValidationError> {
        if let Some(content) = &content {
            validate_content(content)?;
        }

        self.fields.content.replace(content);

        Ok(self)
    }

    /// Execute the request, returning the response.
    pub async fn exec(self) -> Result<Response<Message>, Error> {
        let http = self.http;

        http.request(self.try_into_request()?).await
    }
}

impl TryIntoRequest for UpdateMessage<'_> {
    fn try_into_request(self) -> Result<Request, Error> {
        Ok(Request::builder(&Route::UpdateMessage {
            channel_id: self.channel_id.get(),
            message_id: self.message_id.get(),
        })
        .json(&self.fields)?
        .build())
    }
}

#[cfg(test)]
mod tests {
    use super::UpdateMessage;
    use crate::{client::Client, request::TryIntoRequest};
    use accord_model::id::Id;

    #[test]
    fn content_cleared_serializes_as_null() {
        let client = Client::new("token".to_owned());

        let request = UpdateMessage::new(&client, Id::new(1), Id::new(2))
            .content(None)
            .unwrap()
            .try_into_request()
            .unwrap();

        assert_eq!(request.body(), Some(br#"{"content":null}"# as &[u8]));
    }

    #[test]
    fn untouched_content_is_omitted() {
        let client = Client::new("token".to_owned());

        let request = UpdateMessage::new(&client, Id::new(1), Id::new(2))
            .try_into_request()
            .unwrap();

        assert_eq!(request.body(), Some(br#"{}"# as &[u8]));
    }
}
