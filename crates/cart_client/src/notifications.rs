use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_DISPLAY: Duration = Duration::from_millis(3000);
/// Length of the fade-out before removal (jQuery's "slow").
pub const FADE_DURATION: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Position {
    pub fn css_tag(self) -> &'static str {
        match self {
            Self::TopLeft => "topleft",
            Self::TopRight => "topright",
            Self::BottomLeft => "bottomleft",
            Self::BottomRight => "bottomright",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn css_tag(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub position: Position,
    pub severity: Severity,
    pub display: Duration,
}

impl Notification {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            position: Position::default(),
            severity: Severity::default(),
            display: DEFAULT_DISPLAY,
        }
    }

    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// A zero duration falls back to [`DEFAULT_DISPLAY`].
    #[must_use]
    pub fn display(mut self, display: Duration) -> Self {
        self.display = if display.is_zero() {
            DEFAULT_DISPLAY
        } else {
            display
        };
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotification {
    pub class: String,
    pub text: String,
}

pub fn render(notification: &Notification) -> RenderedNotification {
    RenderedNotification {
        class: format!(
            "notification {} {}",
            notification.position.css_tag(),
            notification.severity.css_tag()
        ),
        text: notification.text.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Visible,
    Fading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNotification {
    pub id: NotificationId,
    pub element: RenderedNotification,
    pub phase: Phase,
}

#[derive(Debug, Default)]
struct Container {
    next_id: u64,
    entries: Vec<ActiveNotification>,
}

/// Shared handle to a notification container.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    container: Arc<Mutex<Container>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Container> {
        self.container.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends the rendered notification and schedules its fade and removal.
    ///
    /// Outside a tokio runtime the entry is kept until [`Self::dismiss`].
    pub fn show(&self, notification: Notification) -> NotificationId {
        let element = render(&notification);
        let id = {
            let mut container = self.lock();
            let id = NotificationId(container.next_id);
            container.next_id = container.next_id.wrapping_add(1);
            container.entries.push(ActiveNotification {
                id,
                element,
                phase: Phase::Visible,
            });
            id
        };
        debug!(notification_id = id.0, text = %notification.text, "notification shown");

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let center = self.clone();
                let display = notification.display;
                handle.spawn(async move {
                    tokio::time::sleep(display).await;
                    center.set_phase(id, Phase::Fading);
                    tokio::time::sleep(FADE_DURATION).await;
                    center.dismiss(id);
                });
            }
            Err(_) => {
                warn!(
                    notification_id = id.0,
                    "no async runtime available; notification will not auto-dismiss"
                );
            }
        }
        id
    }

    fn set_phase(&self, id: NotificationId, phase: Phase) {
        if let Some(entry) = self.lock().entries.iter_mut().find(|entry| entry.id == id) {
            entry.phase = phase;
        }
    }

    /// Removes an entry immediately. Returns true if it was still shown.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let mut container = self.lock();
        let before = container.entries.len();
        container.entries.retain(|entry| entry.id != id);
        before != container.entries.len()
    }

    pub fn active(&self) -> Vec<ActiveNotification> {
        self.lock().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}
