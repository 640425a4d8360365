//! Desktop notification sink.

use notify_rust::{Notification, Timeout};
use pomotec_core::{NotificationRequest, NotificationSink, NotifyError, Sound};

const APP_NAME: &str = "Pomotec";

/// Freedesktop sound theme name for a phase sound.
fn sound_name(sound: Sound) -> &'static str {
    match sound {
        Sound::Alarm => "alarm-clock-elapsed",
        Sound::Notification => "message-new-instant",
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn urgency(sound: Sound) -> notify_rust::Urgency {
    match sound {
        Sound::Alarm => notify_rust::Urgency::Critical,
        Sound::Notification => notify_rust::Urgency::Normal,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopSink;

impl NotificationSink for DesktopSink {
    fn deliver(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        let appearance = request.phase.appearance();
        let mut notification = Notification::new();
        notification
            .appname(APP_NAME)
            .summary(&request.title)
            .body(&request.message)
            .icon(appearance.icon)
            .sound_name(sound_name(appearance.sound))
            .timeout(Timeout::Default);
        #[cfg(all(unix, not(target_os = "macos")))]
        notification.urgency(urgency(appearance.sound));

        notification
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError::Backend(e.to_string()))
    }
}
