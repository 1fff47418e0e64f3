//! 预导入模块，方便使用

pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::attachments::{
    ActiveModel as AttachmentActiveModel, Entity as Attachments, Model as AttachmentModel,
};
pub use super::classroom_students::{
    ActiveModel as EnrollmentActiveModel, Entity as ClassroomStudents, Model as EnrollmentModel,
};
pub use super::classrooms::{
    ActiveModel as ClassroomActiveModel, Entity as Classrooms, Model as ClassroomModel,
};
pub use super::comments::{
    ActiveModel as CommentActiveModel, Entity as Comments, Model as CommentModel,
};
pub use super::ratings::{ActiveModel as RatingActiveModel, Entity as Ratings, Model as RatingModel};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
