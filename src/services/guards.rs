//! 授权守卫
//!
//! 守卫只读取数据，失败时在任何写操作之前返回错误。

use std::sync::Arc;

use crate::errors::{ClassroomError, Result};
use crate::models::assignments::entities::Assignment;
use crate::models::classrooms::entities::Classroom;
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::User;
use crate::storage::Storage;

pub fn assert_is_teacher(actor: &User) -> Result<()> {
    if actor.is_teacher() {
        Ok(())
    } else {
        Err(ClassroomError::authorization("Only teachers can do this"))
    }
}

pub fn assert_is_student(actor: &User) -> Result<()> {
    if actor.is_student() {
        Ok(())
    } else {
        Err(ClassroomError::authorization("Only students can do this"))
    }
}

async fn fetch_classroom(storage: &Arc<dyn Storage>, classroom_id: i64) -> Result<Classroom> {
    storage
        .get_classroom_by_id(classroom_id)
        .await?
        .ok_or_else(|| ClassroomError::not_found("Classroom not found"))
}

async fn fetch_assignment(storage: &Arc<dyn Storage>, assignment_id: i64) -> Result<Assignment> {
    storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| ClassroomError::not_found("Assignment not found"))
}

/// 教室必须属于当前用户
pub async fn assert_is_classroom_admin(
    storage: &Arc<dyn Storage>,
    actor: &User,
    classroom_id: i64,
) -> Result<Classroom> {
    let classroom = fetch_classroom(storage, classroom_id).await?;
    if !classroom.is_owned_by(actor.id) {
        return Err(ClassroomError::authorization(
            "You are not the owner of this classroom",
        ));
    }
    Ok(classroom)
}

/// 作业所在教室必须属于当前用户
pub async fn assert_is_assignment_admin(
    storage: &Arc<dyn Storage>,
    actor: &User,
    assignment_id: i64,
) -> Result<(Assignment, Classroom)> {
    let assignment = fetch_assignment(storage, assignment_id).await?;
    let classroom = fetch_classroom(storage, assignment.classroom_id).await?;
    if !classroom.is_owned_by(actor.id) {
        return Err(ClassroomError::authorization(
            "You are not the owner of this assignment",
        ));
    }
    Ok((assignment, classroom))
}

/// 教室拥有者或已加入的学生，返回教室以及是否为拥有者
pub async fn assert_is_classroom_member(
    storage: &Arc<dyn Storage>,
    actor: &User,
    classroom_id: i64,
) -> Result<(Classroom, bool)> {
    let classroom = fetch_classroom(storage, classroom_id).await?;
    if classroom.is_owned_by(actor.id) {
        return Ok((classroom, true));
    }
    if actor.is_student() && storage.is_enrolled(classroom_id, actor.id).await? {
        return Ok((classroom, false));
    }
    Err(ClassroomError::authorization(
        "You are not a member of this classroom",
    ))
}

pub async fn assert_is_enrolled(
    storage: &Arc<dyn Storage>,
    actor: &User,
    classroom_id: i64,
) -> Result<Classroom> {
    let classroom = fetch_classroom(storage, classroom_id).await?;
    if actor.is_student() && storage.is_enrolled(classroom_id, actor.id).await? {
        Ok(classroom)
    } else {
        Err(ClassroomError::authorization(
            "You are not enrolled in this classroom",
        ))
    }
}

/// 作业所在教室的成员，返回作业、教室以及是否为拥有者
pub async fn assert_is_assignment_member(
    storage: &Arc<dyn Storage>,
    actor: &User,
    assignment_id: i64,
) -> Result<(Assignment, Classroom, bool)> {
    let assignment = fetch_assignment(storage, assignment_id).await?;
    let (classroom, is_owner) =
        assert_is_classroom_member(storage, actor, assignment.classroom_id).await?;
    Ok((assignment, classroom, is_owner))
}

/// 提交者本人或作业管理者可访问提交
pub async fn assert_can_access_submission(
    storage: &Arc<dyn Storage>,
    actor: &User,
    submission_id: i64,
) -> Result<(Submission, Assignment)> {
    let submission = storage
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| ClassroomError::not_found("Submission not found"))?;

    if submission.student_id == actor.id {
        let assignment = fetch_assignment(storage, submission.assignment_id).await?;
        return Ok((submission, assignment));
    }

    let (assignment, _) = assert_is_assignment_admin(storage, actor, submission.assignment_id)
        .await
        .map_err(|e| match e {
            ClassroomError::NotFound(_) => e,
            _ => ClassroomError::authorization("You cannot access this submission"),
        })?;
    Ok((submission, assignment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classrooms::entities::ClassroomModifier;
    use crate::test_support;

    #[tokio::test]
    async fn test_role_guards() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teacher").await;
        let student = test_support::student(&storage, "student").await;
        let nobody = test_support::create_user(&storage, "nobody", None).await;

        assert!(assert_is_teacher(&teacher).is_ok());
        assert!(assert_is_teacher(&student).is_err());
        assert!(assert_is_student(&student).is_ok());
        assert!(assert_is_student(&teacher).is_err());

        let err = assert_is_teacher(&nobody).unwrap_err();
        assert_eq!(err.transport_code(), "UNAUTHORIZED");
        assert!(assert_is_student(&nobody).is_err());
    }

    #[tokio::test]
    async fn test_classroom_admin_guard() {
        let storage = test_support::storage().await;
        let owner = test_support::teacher(&storage, "owner").await;
        let other = test_support::teacher(&storage, "other").await;
        let classroom =
            test_support::classroom(&storage, &owner, ClassroomModifier::Public, None).await;

        let found = assert_is_classroom_admin(&storage, &owner, classroom.id)
            .await
            .unwrap();
        assert_eq!(found.id, classroom.id);

        let err = assert_is_classroom_admin(&storage, &other, classroom.id)
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "UNAUTHORIZED");

        let err = assert_is_classroom_admin(&storage, &owner, 9999)
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_assignment_admin_guard() {
        let storage = test_support::storage().await;
        let owner = test_support::teacher(&storage, "owner").await;
        let other = test_support::teacher(&storage, "other").await;
        let classroom =
            test_support::classroom(&storage, &owner, ClassroomModifier::Public, None).await;
        let assignment = test_support::assignment(&storage, classroom.id, None).await;

        let (a, c) = assert_is_assignment_admin(&storage, &owner, assignment.id)
            .await
            .unwrap();
        assert_eq!(a.id, assignment.id);
        assert_eq!(c.id, classroom.id);

        let err = assert_is_assignment_admin(&storage, &other, assignment.id)
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "UNAUTHORIZED");

        let err = assert_is_assignment_admin(&storage, &owner, 9999)
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_membership_guards() {
        let storage = test_support::storage().await;
        let owner = test_support::teacher(&storage, "owner").await;
        let member = test_support::student(&storage, "member").await;
        let outsider = test_support::student(&storage, "outsider").await;
        let classroom =
            test_support::classroom(&storage, &owner, ClassroomModifier::Public, None).await;
        test_support::enroll(&storage, classroom.id, member.id).await;

        let (_, is_owner) = assert_is_classroom_member(&storage, &owner, classroom.id)
            .await
            .unwrap();
        assert!(is_owner);
        let (_, is_owner) = assert_is_classroom_member(&storage, &member, classroom.id)
            .await
            .unwrap();
        assert!(!is_owner);
        assert!(
            assert_is_classroom_member(&storage, &outsider, classroom.id)
                .await
                .is_err()
        );

        assert!(assert_is_enrolled(&storage, &member, classroom.id).await.is_ok());
        assert!(assert_is_enrolled(&storage, &owner, classroom.id).await.is_err());
        assert!(
            assert_is_enrolled(&storage, &outsider, classroom.id)
                .await
                .is_err()
        );
    }
}
