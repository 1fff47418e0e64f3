pub mod assignments;

pub mod attachments;

pub mod auth;

pub mod classrooms;

pub mod comments;

pub mod storage;

pub mod subjects;

pub mod submissions;

pub mod users;

pub use assignments::configure_assignment_routes;
pub use attachments::configure_attachment_routes;
pub use auth::configure_auth_routes;
pub use classrooms::configure_classroom_routes;
pub use comments::configure_comment_routes;
pub use storage::configure_storage_routes;
pub use subjects::configure_subject_routes;
pub use submissions::configure_submission_routes;
pub use users::configure_user_routes;
