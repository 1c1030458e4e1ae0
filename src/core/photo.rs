//! Simulated ToothScan photo analysis
//!
//! The upload is never inspected: any file yields the same "analyzing"
//! notice followed, after the analysis delay, by the same result.

use serde::{Deserialize, Serialize};

use crate::conversation::MessageId;

use super::chat::ChatSession;

/// A file picked in the chat view's photo control
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoUpload {
    pub file_name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing)]
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Default::default()
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.bytes = bytes;
        self
    }
}

impl ChatSession {
    /// Run a photo through the fake analyzer
    ///
    /// Returns the id of the "analyzing" message. A cancelled file picker
    /// (`None`) is ignored. Overlapping uploads each get their own pair of
    /// messages.
    pub fn submit_photo(&mut self, photo: Option<PhotoUpload>) -> Option<MessageId> {
        let photo = photo?;
        if self.scheduler.is_shut_down() {
            return None;
        }

        let scan = &self.catalog.photo;
        let mut analyzing_id = None;
        self.state.send_modify(|state| {
            analyzing_id = Some(state.conversation.add_analysis(&scan.analyzing));
            state.pending += 1;
        });

        let conversation_id = self.conversation_id();
        tracing::info!(
            %conversation_id,
            file_name = %photo.file_name,
            size = photo.bytes.len(),
            "Photo received for analysis"
        );

        let state = self.state.clone();
        let cancel = self.scheduler.token();
        let result = scan.result.clone();
        let quick_replies = Some(scan.quick_replies.clone()).filter(|r| !r.is_empty());

        self.scheduler.after(self.timings.analysis_delay, move || {
            let delivered = state.send_if_modified(|state| {
                if cancel.is_cancelled() {
                    return false;
                }
                state.conversation.add_assistant(&result, quick_replies);
                state.pending = state.pending.saturating_sub(1);
                true
            });
            if delivered {
                tracing::debug!(%conversation_id, "Photo analysis delivered");
            }
        });

        analyzing_id
    }
}
