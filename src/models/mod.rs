pub mod task;
pub mod user;

pub use task::{CreateTaskInput, DeleteResponse, NewTask, Task, UpdateTaskInput};
pub use user::{User, UserProfile};
