use std::time::{Duration, Instant};

use moka::sync::Cache;

use crate::models::Task;

/// How long a fetched list is served without refetching.
pub const STALE_AFTER: Duration = Duration::from_secs(5 * 60);
/// How long a list is kept at all. Any write to a user's list restarts it.
pub const EVICT_AFTER: Duration = Duration::from_secs(10 * 60);

/// Task lists keyed by the id of the user they were fetched for.
///
/// Partitions never mix: a list fetched for one user is never returned for
/// another. Eviction is handled by `moka` once an entry outlives the
/// eviction window.
#[derive(Clone)]
pub struct TaskCache {
    entries: Cache<i32, Entry>,
    stale_after: Duration,
}

#[derive(Debug, Clone)]
struct Entry {
    tasks: Vec<Task>,
    fetched_at: Instant,
    invalidated: bool,
}

impl Default for TaskCache {
    fn default() -> Self {
        Self::new(STALE_AFTER, EVICT_AFTER)
    }
}

impl TaskCache {
    pub fn new(stale_after: Duration, evict_after: Duration) -> Self {
        Self {
            entries: Cache::builder().time_to_live(evict_after).build(),
            stale_after,
        }
    }

    /// The cached list, if it was fetched within the stale window and not invalidated since.
    pub fn get_fresh(&self, user_id: i32) -> Option<Vec<Task>> {
        self.entries
            .get(&user_id)
            .filter(|entry| !entry.invalidated && entry.fetched_at.elapsed() < self.stale_after)
            .map(|entry| entry.tasks)
    }

    /// The cached list regardless of freshness, while it is within the eviction window.
    pub fn peek(&self, user_id: i32) -> Option<Vec<Task>> {
        self.entries.get(&user_id).map(|entry| entry.tasks)
    }

    pub fn put(&self, user_id: i32, tasks: Vec<Task>) {
        self.entries.insert(
            user_id,
            Entry {
                tasks,
                fetched_at: Instant::now(),
                invalidated: false,
            },
        );
    }

    /// Forces the next read for `user_id` to refetch. The old list stays peekable.
    pub fn invalidate(&self, user_id: i32) {
        self.modify(user_id, |entry| entry.invalidated = true);
    }

    /// Replaces the task with the same id, or appends it.
    pub fn upsert(&self, user_id: i32, task: Task) {
        self.modify(user_id, |entry| {
            match entry.tasks.iter_mut().find(|t| t.id == task.id) {
                Some(existing) => *existing = task,
                None => entry.tasks.push(task),
            }
        });
    }

    pub fn remove(&self, user_id: i32, task_id: i32) {
        self.modify(user_id, |entry| entry.tasks.retain(|t| t.id != task_id));
    }

    pub fn clear_user(&self, user_id: i32) {
        self.entries.invalidate(&user_id);
    }

    /// Number of users with a live list.
    pub fn user_count(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    /// Applies `f` to the user's list. Keeps `fetched_at`, so staleness is unchanged.
    fn modify<F: FnOnce(&mut Entry)>(&self, user_id: i32, f: F) {
        if let Some(mut entry) = self.entries.get(&user_id) {
            f(&mut entry);
            self.entries.insert(user_id, entry);
        }
    }
}
