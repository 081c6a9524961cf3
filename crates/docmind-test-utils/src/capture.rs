// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification sink that records every surfaced notice.

use std::sync::Mutex;

use docmind_core::{Notice, NoticeKind, NotificationSink};

/// Records notices for later assertions.
#[derive(Debug, Default)]
pub struct CaptureNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl CaptureNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything surfaced so far, in order.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    /// Only the notices of one kind.
    pub fn of_kind(&self, kind: NoticeKind) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.kind == kind)
            .cloned()
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn reset(&self) {
        self.notices.lock().unwrap().clear();
    }
}

impl NotificationSink for CaptureNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_filters_by_kind() {
        let capture = CaptureNotifier::new();
        capture.notify(Notice::info("Uploading...", "Processing a.pdf"));
        capture.notify(Notice::error("Error", "boom"));

        assert_eq!(capture.notices().len(), 2);
        assert_eq!(capture.of_kind(NoticeKind::Error).len(), 1);
        assert_eq!(capture.of_kind(NoticeKind::Success).len(), 0);

        capture.reset();
        assert!(capture.notices().is_empty());
    }
}
