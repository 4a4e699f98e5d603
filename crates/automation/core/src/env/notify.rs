use crate::state::ActorId;

/// How a notice is presented to the actor.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NoticeSeverity {
    Normal,
    Warning,
    Error,
    /// Spoken aloud by the actor rather than sent as a system message.
    Speech,
}

/// Player-facing message channel.
pub trait NotificationSink {
    fn notify(&self, actor: ActorId, severity: NoticeSeverity, text: &str);
}
