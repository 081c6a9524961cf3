// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification sink trait for surfacing outcomes to the user.

use tracing::{error, info};

use crate::types::{Notice, NoticeKind};

/// Presentation-side sink for user-visible outcomes.
///
/// Fire-and-forget: the core never waits on, nor fails because of, a
/// notification. Implementations decide rendering (console, toast, log).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// A sink that forwards notices to the tracing subscriber.
///
/// Useful as a default where no interactive surface is attached.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Error => {
                error!(title = notice.title.as_str(), detail = notice.detail.as_str(), "notice")
            }
            NoticeKind::Info | NoticeKind::Success => {
                info!(title = notice.title.as_str(), detail = notice.detail.as_str(), "notice")
            }
        }
    }
}
