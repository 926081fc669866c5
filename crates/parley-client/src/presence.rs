//! Room roster.
//!
//! Membership arrives as full snapshots. The tracker replaces its list on
//! every update and keeps server order; it never diffs, merges, or reacts to
//! join/leave notices, so out-of-order notices cannot corrupt it.

/// Ordered list of participant display names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceTracker {
    members: Vec<String>,
}

impl PresenceTracker {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the roster wholesale. Returns `true` if it changed.
    pub fn replace_roster(&mut self, members: Vec<String>) -> bool {
        if self.members == members {
            return false;
        }
        self.members = members;
        true
    }

    /// Current members in server order.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Whether `name` is in the roster.
    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Roster is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Forget everyone.
    pub fn clear(&mut self) {
        self.members.clear();
    }
}
