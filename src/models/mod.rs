pub mod id;
pub mod project;
pub mod task;
pub mod user;

pub use id::RecordId;
pub use project::{
    NewProject, Project, ProjectInput, ProjectListing, ProjectPatch, ProjectSummary, ProjectView,
};
pub use task::{
    NewTask, StatusUpdateInput, Task, TaskDetail, TaskInput, TaskPatch, TaskStatus, UpdatedTask,
};
pub use user::{NewUser, Role, SigninRequest, SignupRequest, User, UserProfile, UserSummary};
