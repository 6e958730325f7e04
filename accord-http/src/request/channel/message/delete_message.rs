use crate::{
    client::Client,
    error::Error,
    request::{self, AuditLogReason, Request, TryIntoRequest},
    response::{marker::EmptyBody, Response},
    routing::Route,
};
use accord_model::id::{
    marker::{ChannelMarker, MessageMarker},
    Id,
};
use accord_validate::request::{audit_reason as validate_audit_reason, ValidationError};

/// Delete a message in a channel, by ID.
#[must_use = "requests must be configured and executed"]
pub struct DeleteMessage<'a> {
    channel_id: Id<ChannelMarker>,
    http: &'a Client,
    message_id: Id<MessageMarker>,
    reason: Option<String>,
}

impl<'a> DeleteMessage<'a> {
    pub(crate) const fn new(
        http: &'a Client,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
    ) -> Self {
        Self {
            channel_id,
            http,
            message_id,
            reason: None,
        }
    }

    /// Execute the request, returning the response.
    pub async fn exec(self) -> Result<Response<EmptyBody>, Error> {
        let http = self.http;

        http.request(self.try_into_request()?).await
    }
}

impl AuditLogReason for DeleteMessage<'_> {
    fn reason(mut self, reason: impl Into<String>) -> Result<Self, ValidationError> {
        let reason = reason.into();
        validate_audit_reason(&reason)?;

        self.reason.replace(reason);

        Ok(self)
    }
}

impl TryIntoRequest for DeleteMessage<'_> {
    fn try_into_request(self) -> Result<Request, Error> {
        let mut request = Request::builder(&Route::DeleteMessage {
            channel_id: self.channel_id.get(),
            message_id: self.message_id.get(),
        });

        if let Some(reason) = &self.reason {
            request = request.headers(request::audit_header(reason)?);
        }

        Ok(request.build())
    }
}

#[cfg(test)]
mod tests {
    use super::DeleteMessage;
    use crate::{
        client::Client,
        request::{AuditLogReason, TryIntoRequest},
    };
    use accord_http_ratelimiting::Method;
    use accord_model::id::Id;

    #[test]
    fn request_shape() {
        let client = Client::new("token".to_owned());

        let request = DeleteMessage::new(&client, Id::new(1), Id::new(2))
            .reason("cleanup")
            .unwrap()
            .try_into_request()
            .unwrap();

        assert_eq!(request.method(), Method::Delete);
        assert_eq!(request.path(), "channels/1/messages/2");
        assert_eq!(request.ratelimit_path().route(), "channels/1/messages/{0}");

        let headers = request.headers().unwrap();
        assert_eq!(
            headers.get("x-audit-log-reason").unwrap().to_str().unwrap(),
            "cleanup",
        );
    }
}
