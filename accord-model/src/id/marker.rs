//! Markers for various resource types, such as channels or users.
//!
//! Markers themselves perform no logical action, and are only used to
//! ensure that IDs of incorrect types aren't used.

/// Marker for application IDs.
///
/// Types such as bot applications use this ID marker.
#[derive(Debug)]
#[non_exhaustive]
pub struct ApplicationMarker;

/// Marker for channel IDs.
#[derive(Debug)]
#[non_exhaustive]
pub struct ChannelMarker;

/// Marker for command IDs.
#[derive(Debug)]
#[non_exhaustive]
pub struct CommandMarker;

/// Marker for guild IDs.
#[derive(Debug)]
#[non_exhaustive]
pub struct GuildMarker;

/// Marker for message IDs.
#[derive(Debug)]
#[non_exhaustive]
pub struct MessageMarker;

/// Marker for user IDs.
#[derive(Debug)]
#[non_exhaustive]
pub struct UserMarker;
