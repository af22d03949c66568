//! The task store: sole owner of the task collection
//!
//! Every successful mutation snapshots the full collection through the
//! configured [`SnapshotStore`]. Snapshot failures are logged and never fail
//! the mutation itself.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::seed::seed_tasks;
use super::task::{NewTask, Task, TaskPatch, TaskStatus};
use crate::error::{AppError, Result};
use crate::storage::snapshot::SnapshotStore;

/// The one operation the drag protocol needs from a store
pub trait TaskMover {
    fn move_task(&mut self, id: &str, status: TaskStatus) -> Result<()>;
}

pub struct TaskStore {
    tasks: Vec<Task>,
    store_name: String,
    snapshots: Box<dyn SnapshotStore>,
}

impl TaskStore {
    /// Restore from the snapshot under `store_name`, or start from the seed list.
    ///
    /// An unreadable snapshot is an error; a missing one is not.
    pub fn open(store_name: impl Into<String>, snapshots: Box<dyn SnapshotStore>) -> Result<Self> {
        let store_name = store_name.into();
        let tasks = match snapshots.load(&store_name)? {
            Some(tasks) => {
                debug!(store = %store_name, count = tasks.len(), "restored task snapshot");
                tasks
            }
            None => {
                info!(store = %store_name, "no task snapshot, starting from seed tasks");
                seed_tasks(Utc::now())
            }
        };
        Ok(Self {
            tasks,
            store_name,
            snapshots,
        })
    }

    /// Store with an explicit starting collection (nothing is loaded)
    pub fn with_tasks(
        store_name: impl Into<String>,
        snapshots: Box<dyn SnapshotStore>,
        tasks: Vec<Task>,
    ) -> Self {
        Self {
            tasks,
            store_name: store_name.into(),
            snapshots,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Append a task with a fresh id and `created_at = now`. Always succeeds.
    pub fn add_task(&mut self, new: NewTask) -> &Task {
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            status: new.status,
            priority: new.priority,
            created_at: Utc::now(),
            due_date: new.due_date,
            assignee: new.assignee,
        };
        info!(id = %task.id, status = %task.status, "task added");
        self.tasks.push(task);
        self.persist();
        &self.tasks[self.tasks.len() - 1]
    }

    /// Shallow-merge `patch` into the task with `id`
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<&Task> {
        let index = self.index_of(id)?;
        patch.apply(&mut self.tasks[index]);
        debug!(id = %id, "task updated");
        self.persist();
        Ok(&self.tasks[index])
    }

    /// Remove exactly the task with `id`
    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        let index = self.index_of(id)?;
        let removed = self.tasks.remove(index);
        info!(id = %id, "task deleted");
        self.persist();
        Ok(removed)
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| AppError::not_found(format!("task {}", id)))
    }

    fn persist(&self) {
        if let Err(e) = self.snapshots.save(&self.store_name, &self.tasks) {
            warn!(store = %self.store_name, error = %e, "failed to snapshot tasks");
        }
    }
}

impl TaskMover for TaskStore {
    fn move_task(&mut self, id: &str, status: TaskStatus) -> Result<()> {
        self.update_task(id, TaskPatch::status(status))?;
        info!(id = %id, status = %status, "task moved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::snapshot::MemorySnapshotStore;
    use std::collections::HashSet;

    const KEY: &str = "admin-dashboard-tasks";

    fn empty_store() -> (TaskStore, MemorySnapshotStore) {
        let snapshots = MemorySnapshotStore::new();
        let store = TaskStore::with_tasks(KEY, Box::new(snapshots.clone()), Vec::new());
        (store, snapshots)
    }

    #[test]
    fn test_open_without_snapshot_uses_seed() {
        let store = TaskStore::open(KEY, Box::new(MemorySnapshotStore::new())).unwrap();
        assert_eq!(store.len(), 6);
        for status in TaskStatus::ALL {
            assert!(store.tasks().iter().any(|t| t.status == status));
        }
    }

    #[test]
    fn test_open_restores_snapshot() {
        let (mut store, snapshots) = empty_store();
        store.add_task(NewTask::new("Only task"));

        let reopened = TaskStore::open(KEY, Box::new(snapshots)).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.tasks()[0].title, "Only task");
    }

    #[test]
    fn test_add_assigns_unique_ids_and_created_at() {
        let (mut store, _) = empty_store();
        let before = Utc::now();
        for i in 0..20 {
            store.add_task(NewTask::new(format!("task {}", i)));
        }

        let ids: HashSet<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 20);
        assert!(store.tasks().iter().all(|t| t.created_at >= before));
    }

    #[test]
    fn test_every_mutation_snapshots() {
        let (mut store, snapshots) = empty_store();
        let id = store.add_task(NewTask::new("Draft")).id.clone();
        assert_eq!(snapshots.load(KEY).unwrap().unwrap().len(), 1);

        store.move_task(&id, TaskStatus::Review).unwrap();
        let saved = snapshots.load(KEY).unwrap().unwrap();
        assert_eq!(saved[0].status, TaskStatus::Review);

        store.delete_task(&id).unwrap();
        assert!(snapshots.load(KEY).unwrap().unwrap().is_empty());
    }

    #[test]
    fn test_update_then_move_same_status_is_idempotent() {
        let (mut store, _) = empty_store();
        let id = store.add_task(NewTask::new("Review PR")).id.clone();

        store
            .update_task(&id, TaskPatch::status(TaskStatus::Done))
            .unwrap();
        store.move_task(&id, TaskStatus::Done).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().status, TaskStatus::Done);
    }

    #[test]
    fn test_update_keeps_id_and_created_at() {
        let (mut store, _) = empty_store();
        let original = store.add_task(NewTask::new("Roadmap")).clone();

        let updated = store
            .update_task(
                &original.id,
                TaskPatch {
                    title: Some("Roadmap v2".to_string()),
                    assignee: Some(Some("kim".to_string())),
                    ..TaskPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.title, "Roadmap v2");
        assert_eq!(updated.status, original.status);
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let (mut store, _) = empty_store();
        let a = store.add_task(NewTask::new("A")).id.clone();
        store.add_task(NewTask::new("B"));
        store.add_task(NewTask::new("C"));

        let removed = store.delete_task(&a).unwrap();
        assert_eq!(removed.id, a);
        assert_eq!(store.len(), 2);
        assert!(store.get(&a).is_none());
    }

    #[test]
    fn test_missing_id_is_not_found_and_leaves_state() {
        let (mut store, snapshots) = empty_store();
        store.add_task(NewTask::new("Keep me"));
        let before = snapshots.load(KEY).unwrap();

        assert!(store.delete_task("nope").unwrap_err().is_not_found());
        assert!(store
            .update_task("nope", TaskPatch::status(TaskStatus::Done))
            .unwrap_err()
            .is_not_found());
        assert!(store
            .move_task("nope", TaskStatus::Done)
            .unwrap_err()
            .is_not_found());

        assert_eq!(store.len(), 1);
        assert_eq!(snapshots.load(KEY).unwrap(), before);
    }

    struct FailingSnapshots;

    impl SnapshotStore for FailingSnapshots {
        fn load(&self, _key: &str) -> Result<Option<Vec<Task>>> {
            Ok(None)
        }

        fn save(&self, _key: &str, _tasks: &[Task]) -> Result<()> {
            Err(AppError::storage("read-only"))
        }
    }

    #[test]
    fn test_snapshot_failure_does_not_fail_mutation() {
        let mut store = TaskStore::with_tasks(KEY, Box::new(FailingSnapshots), Vec::new());
        let id = store.add_task(NewTask::new("Still added")).id.clone();
        assert!(store.move_task(&id, TaskStatus::Done).is_ok());
        assert_eq!(store.get(&id).unwrap().status, TaskStatus::Done);
    }
}
