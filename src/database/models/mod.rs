pub mod project;
pub mod resource;
pub mod role;
pub mod task;
pub mod user;

pub use project::{Project, ProjectRow};
pub use resource::Resource;
pub use role::UserRole;
pub use task::{Task, TaskRow};
pub use user::{User, UserRow};
