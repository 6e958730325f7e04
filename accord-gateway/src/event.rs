//! The boundary between the session and user code.

use serde_json::value::RawValue;

/// Caller-supplied sink for dispatched events.
///
/// Invoked once per dispatch frame with the event's name and its raw JSON
/// payload. The payload reference is only valid for the duration of the
/// call; deserialize or copy it before returning if it's needed later.
///
/// Handlers should not panic. If one does anyway, the panic is caught at
/// the session boundary and logged: user code cannot take the session down.
pub trait EventHandler: Send + Sync {
    /// Handle one dispatched event.
    fn handle_event(&self, name: &str, data: &RawValue);
}

#[cfg(test)]
mod tests {
    use super::EventHandler;
    use static_assertions::assert_obj_safe;

    assert_obj_safe!(EventHandler);
}
