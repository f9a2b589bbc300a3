use std::collections::HashMap;

use tracing::debug;

use pantry_types::models::{Profile, UserId};

/// Canonical account snapshots, one per user.
///
/// A `user_profile_updated` push lands here exactly once; views resolve
/// embedded author snapshots through the directory instead of every
/// collection patching its own copies in place.
#[derive(Debug, Default)]
pub struct ProfileDirectory {
    entries: HashMap<UserId, Profile>,
    version: u64,
}

impl ProfileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest snapshot. `true` when anything actually changed,
    /// in which case the version views memoize against is bumped.
    pub fn upsert(&mut self, profile: Profile) -> bool {
        if self.entries.get(&profile.id) == Some(&profile) {
            return false;
        }
        debug!(user = %profile.id, "profile snapshot updated");
        self.entries.insert(profile.id.clone(), profile);
        self.version += 1;
        true
    }

    pub fn get(&self, id: &UserId) -> Option<&Profile> {
        self.entries.get(id)
    }

    /// Resolve an embedded snapshot: the directory's copy wins when it has
    /// one, otherwise the snapshot the record arrived with stands.
    pub fn resolve<'a>(&'a self, snapshot: &'a Profile) -> &'a Profile {
        self.entries.get(&snapshot.id).unwrap_or(snapshot)
    }

    /// Monotonic change marker for memoized views.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, name: &str) -> Profile {
        Profile {
            id: id.into(),
            name: name.to_owned(),
            avatar_url: None,
        }
    }

    #[test]
    fn upsert_reports_change() {
        let mut dir = ProfileDirectory::new();
        assert!(dir.upsert(profile("u1", "Ada")));
        assert!(!dir.upsert(profile("u1", "Ada")));
        assert!(dir.upsert(profile("u1", "Ada L.")));
        assert_eq!(dir.version(), 2);
    }

    #[test]
    fn resolve_prefers_directory_copy() {
        let mut dir = ProfileDirectory::new();
        let embedded = profile("u1", "Old Name");
        assert_eq!(dir.resolve(&embedded).name, "Old Name");

        dir.upsert(profile("u1", "New Name"));
        assert_eq!(dir.resolve(&embedded).name, "New Name");

        // Users the directory never heard of fall back to the snapshot.
        let stranger = profile("u9", "Stranger");
        assert_eq!(dir.resolve(&stranger).name, "Stranger");
    }
}
