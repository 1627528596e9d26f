//! Audio stream categories.

use crate::VolumeError;

/// A platform audio stream with its own independent volume.
///
/// Discriminants are the Android `AudioManager.STREAM_*` values, which is the
/// integer tag hosts send over the method channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum StreamCategory {
    /// Phone calls.
    VoiceCall = 0,
    /// System sounds.
    System = 1,
    /// Phone ring.
    Ring = 2,
    /// Music and other media playback.
    Music = 3,
    /// Alarms.
    Alarm = 4,
    /// Notifications.
    Notification = 5,
    /// DTMF dial tones.
    DialTone = 8,
}

impl StreamCategory {
    /// Every known category.
    pub const ALL: [Self; 7] = [
        Self::Alarm,
        Self::DialTone,
        Self::Music,
        Self::Notification,
        Self::Ring,
        Self::System,
        Self::VoiceCall,
    ];

    /// Look up the category for an integer tag.
    #[must_use]
    pub fn from_tag(tag: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.tag() == tag)
    }

    /// The integer tag of this category.
    #[must_use]
    pub const fn tag(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for StreamCategory {
    type Error = VolumeError;

    fn try_from(tag: i32) -> Result<Self, Self::Error> {
        validate(tag)
    }
}

/// Check that `tag` names a known stream category.
///
/// # Errors
/// Returns [`VolumeError::InvalidStreamType`] for any tag outside the known set.
pub fn validate(tag: i32) -> Result<StreamCategory, VolumeError> {
    StreamCategory::from_tag(tag).ok_or(VolumeError::InvalidStreamType(tag))
}
