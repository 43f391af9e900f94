use chrono::NaiveDate;
use uuid::Uuid;

use crate::database::manager::{MOCK_ROLE, MOCK_USER};
use crate::database::models::{Project, ProjectRow, Resource, Task, TaskRow, User, UserRole, UserRow};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

pub fn role() -> UserRole {
    UserRole { id: MOCK_ROLE.0, role_name: MOCK_ROLE.1.to_string(), priority: MOCK_ROLE.2 }
}

/// The development user, with a real hash of its password.
pub fn mock_user() -> User {
    User {
        id: Uuid::new_v4(),
        username: MOCK_USER.username.to_string(),
        email: MOCK_USER.email.to_string(),
        first_name: MOCK_USER.first_name.to_string(),
        last_name: MOCK_USER.last_name.to_string(),
        password_hash: bcrypt::hash(MOCK_USER.password, 4).expect("hash fixture password"),
        role: role(),
    }
}

pub fn user(username: &str, email: &str) -> User {
    User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: email.to_string(),
        first_name: "Urist".to_string(),
        last_name: "McTester".to_string(),
        password_hash: "$2b$04$not-a-real-hash".to_string(),
        role: role(),
    }
}

pub fn resource(email: &str, first_name: &str, last_name: &str) -> Resource {
    Resource {
        id: Uuid::new_v4(),
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    }
}

pub fn project(name: &str, owner: Option<Resource>) -> Project {
    Project {
        id: Uuid::new_v4(),
        name: name.to_string(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
        owner,
    }
}

pub fn task(name: &str, project: &Project, assignee: Option<Resource>) -> Task {
    Task {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: String::new(),
        assignee,
        assigner: None,
        start_date: date(2024, 2, 1),
        end_date: date(2024, 3, 1),
        project: project.clone(),
        created_date: date(2024, 1, 15),
    }
}

pub fn user_row(user: &User) -> UserRow {
    UserRow {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        password: user.password_hash.clone(),
        role: user.role.id,
    }
}

pub fn project_row(project: &Project) -> ProjectRow {
    ProjectRow {
        id: project.id,
        name: project.name.clone(),
        start_date: project.start_date,
        end_date: project.end_date,
        owner: project.owner.as_ref().map(|o| o.id),
    }
}

pub fn task_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id,
        name: task.name.clone(),
        description: task.description.clone(),
        assigned_to: task.assignee.as_ref().map(|r| r.id),
        assigned_by: task.assigner.as_ref().map(|u| u.id),
        start_date: task.start_date,
        end_date: task.end_date,
        project: task.project.id,
        created_date: task.created_date,
    }
}
