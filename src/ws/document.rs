use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::DocumentSnapshot;

/// The single shared document: full body plus the time of the last accepted update.
#[derive(Debug, Default)]
pub struct DocumentCell {
    text: String,
    last_updated: Option<DateTime<Utc>>,
}

/// Render a timestamp in the fixed-width form sent to clients.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl DocumentCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            text: self.text.clone(),
            last_updated: self.last_updated.map(format_timestamp),
        }
    }

    /// Replace the body and stamp it with the current time.
    pub fn set_text(&mut self, text: String) -> String {
        self.set_text_at(text, Utc::now())
    }

    /// Replace the body, stamped with `now` unless the clock went backwards
    /// since the previous update, in which case the previous stamp is kept.
    pub fn set_text_at(&mut self, text: String, now: DateTime<Utc>) -> String {
        let stamp = match self.last_updated {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        self.text = text;
        self.last_updated = Some(stamp);
        format_timestamp(stamp)
    }
}
