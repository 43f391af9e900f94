//! Assembles aggregates from flat rows and their batch-loaded relations.

use std::collections::HashMap;

use tracing::warn;
use uuid::Uuid;

use super::models::{Project, ProjectRow, Resource, Task, TaskRow, User, UserRole, UserRow};

pub fn users(rows: Vec<UserRow>, roles: &[UserRole]) -> Vec<User> {
    let roles: HashMap<i32, &UserRole> = roles.iter().map(|r| (r.id, r)).collect();
    rows.into_iter()
        .filter_map(|row| match roles.get(&row.role) {
            Some(role) => Some(User::from_row(row, (*role).clone())),
            None => {
                warn!("User {} references missing role {}", row.id, row.role);
                None
            }
        })
        .collect()
}

pub fn projects(rows: Vec<ProjectRow>, owners: &[Resource]) -> Vec<Project> {
    let owners = by_id(owners, |r| r.id);
    rows.into_iter()
        .map(|row| {
            let owner = row.owner.and_then(|id| owners.get(&id)).map(|r| (*r).clone());
            Project::from_row(row, owner)
        })
        .collect()
}

pub fn tasks(rows: Vec<TaskRow>, resources: &[Resource], users: &[User], projects: &[Project]) -> Vec<Task> {
    let resources = by_id(resources, |r| r.id);
    let users = by_id(users, |u| u.id);
    let projects = by_id(projects, |p| p.id);

    rows.into_iter()
        .filter_map(|row| {
            let Some(project) = projects.get(&row.project) else {
                warn!("Task {} references missing project {}", row.id, row.project);
                return None;
            };
            Some(Task {
                id: row.id,
                name: row.name,
                description: row.description,
                assignee: row.assigned_to.and_then(|id| resources.get(&id)).map(|r| (*r).clone()),
                assigner: row.assigned_by.and_then(|id| users.get(&id)).map(|u| (*u).clone()),
                start_date: row.start_date,
                end_date: row.end_date,
                project: (*project).clone(),
                created_date: row.created_date,
            })
        })
        .collect()
}

/// Ids of the relation targets a batch of rows refers to, without repeats.
pub fn related_ids<'a, R: 'a, K: Eq + std::hash::Hash + Copy>(
    rows: impl IntoIterator<Item = &'a R>,
    key: impl Fn(&R) -> Option<K>,
) -> Vec<K> {
    let mut seen = std::collections::HashSet::new();
    rows.into_iter().filter_map(|r| key(r)).filter(|k| seen.insert(*k)).collect()
}

fn by_id<T>(items: &[T], id: impl Fn(&T) -> Uuid) -> HashMap<Uuid, &T> {
    items.iter().map(|item| (id(item), item)).collect()
}
