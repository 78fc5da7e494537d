use crate::model::ActivityLogEntry;

/// How many entries survive truncation.
pub const RETENTION: usize = 50;
/// How many entries the dashboard shows.
pub const DISPLAY_WINDOW: usize = 10;

/// Bounded, most-recent-first audit log. Every mutating command records
/// exactly one entry per logical user action; bulk attendance marking logs
/// one aggregate entry, not one per student.
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: Vec<ActivityLogEntry>,
}

impl ActivityLog {
    pub fn from_entries(mut entries: Vec<ActivityLogEntry>) -> Self {
        entries.truncate(RETENTION);
        Self { entries }
    }

    pub fn record(&mut self, description: &str) {
        self.entries.insert(0, ActivityLogEntry::new(description));
        self.entries.truncate(RETENTION);
    }

    /// Display slice, independent of the retention bound.
    pub fn recent(&self) -> &[ActivityLogEntry] {
        let n = self.entries.len().min(DISPLAY_WINDOW);
        &self.entries[..n]
    }

    pub fn entries(&self) -> &[ActivityLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
