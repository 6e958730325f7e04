pub mod application;
pub mod channel;

mod audit_reason;
mod base;
mod get_current_user;
mod get_gateway;
mod try_into_request;

pub use self::{
    audit_reason::AuditLogReason,
    base::{Request, RequestBuilder},
    get_current_user::GetCurrentUser,
    get_gateway::GetGateway,
    try_into_request::TryIntoRequest,
};
pub use accord_http_ratelimiting::Method;

use crate::error::{Error, ErrorType};
use hyper::header::{HeaderName, HeaderValue};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use std::iter;

/// Name of the audit log reason header.
const REASON_HEADER_NAME: &str = "x-audit-log-reason";

fn audit_header(reason: &str) -> Result<impl Iterator<Item = (HeaderName, HeaderValue)>, Error> {
    let header_name = HeaderName::from_static(REASON_HEADER_NAME);
    let encoded_reason = utf8_percent_encode(reason, NON_ALPHANUMERIC).to_string();
    let header_value = HeaderValue::from_str(&encoded_reason).map_err(|source| Error {
        kind: ErrorType::CreatingHeader {
            name: REASON_HEADER_NAME.to_owned(),
        },
        source: Some(Box::new(source)),
    })?;

    Ok(iter::once((header_name, header_value)))
}

#[cfg(test)]
mod tests {
    use super::audit_header;

    #[test]
    fn audit_header_percent_encodes() {
        let mut headers = audit_header("spam & abuse").unwrap();

        let (name, value) = headers.next().unwrap();
        assert_eq!(name.as_str(), "x-audit-log-reason");
        assert_eq!(value.to_str().unwrap(), "spam%20%26%20abuse");
        assert!(headers.next().is_none());
    }
}
