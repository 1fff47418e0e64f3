use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};

use super::guards::{assert_can_access_submission, assert_is_assignment_member};
use super::{current_user, define_service, error_response, respond, respond_empty, respond_with};
use crate::errors::{ClassroomError, Result};
use crate::models::comments::{
    entities::{Comment, CommentTarget},
    requests::CreateCommentRequest,
};
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::validate::validate_text;

define_service!(CommentService);

/// 作业评论对教室成员开放，提交评论对提交者和作业管理者开放
async fn assert_can_comment(
    storage: &Arc<dyn Storage>,
    actor: &User,
    target: CommentTarget,
) -> Result<()> {
    match target {
        CommentTarget::Assignment(id) => {
            assert_is_assignment_member(storage, actor, id).await?;
        }
        CommentTarget::Submission(id) => {
            assert_can_access_submission(storage, actor, id).await?;
        }
    }
    Ok(())
}

pub async fn list_comments(
    storage: &Arc<dyn Storage>,
    actor: &User,
    target: CommentTarget,
) -> Result<Vec<Comment>> {
    assert_can_comment(storage, actor, target).await?;
    storage.list_comments(target).await
}

pub async fn create_comment(
    storage: &Arc<dyn Storage>,
    actor: &User,
    target: CommentTarget,
    request: CreateCommentRequest,
) -> Result<Comment> {
    assert_can_comment(storage, actor, target).await?;

    let content = validate_text("Comment", &request.content)?;
    if content.is_empty() {
        return Err(ClassroomError::validation("Comment must not be empty"));
    }
    storage.create_comment(actor.id, target, &content).await
}

pub async fn delete_comment(
    storage: &Arc<dyn Storage>,
    actor: &User,
    comment_id: i64,
) -> Result<()> {
    let comment = storage
        .get_comment_by_id(comment_id)
        .await?
        .ok_or_else(|| ClassroomError::not_found("Comment not found"))?;

    if comment.user_id != actor.id {
        return Err(ClassroomError::forbidden(
            "Only the author can delete this comment",
        ));
    }
    if !storage.delete_comment(comment.id).await? {
        return Err(ClassroomError::not_found("Comment not found"));
    }
    Ok(())
}

impl CommentService {
    pub async fn list_comments(
        &self,
        request: &HttpRequest,
        target: CommentTarget,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let actor = match current_user(request) {
            Ok(user) => user,
            Err(e) => return Ok(error_response(&e)),
        };
        respond(
            list_comments(&storage, &actor, target).await,
            "Comments retrieved successfully",
        )
    }

    pub async fn create_comment(
        &self,
        request: &HttpRequest,
        target: CommentTarget,
        body: CreateCommentRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let actor = match current_user(request) {
            Ok(user) => user,
            Err(e) => return Ok(error_response(&e)),
        };
        respond_with(
            StatusCode::CREATED,
            create_comment(&storage, &actor, target, body).await,
            "Comment created successfully",
        )
    }

    pub async fn delete_comment(
        &self,
        request: &HttpRequest,
        comment_id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let actor = match current_user(request) {
            Ok(user) => user,
            Err(e) => return Ok(error_response(&e)),
        };
        respond_empty(
            delete_comment(&storage, &actor, comment_id).await,
            "Comment deleted successfully",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classrooms::entities::ClassroomModifier;
    use crate::test_support;

    fn body(content: &str) -> CreateCommentRequest {
        CreateCommentRequest {
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_assignment_comments_for_members() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teacher").await;
        let member = test_support::student(&storage, "member").await;
        let outsider = test_support::student(&storage, "outsider").await;
        let classroom =
            test_support::classroom(&storage, &teacher, ClassroomModifier::Public, None).await;
        test_support::enroll(&storage, classroom.id, member.id).await;
        let assignment = test_support::assignment(&storage, classroom.id, None).await;
        let target = CommentTarget::Assignment(assignment.id);

        let comment = create_comment(&storage, &member, target, body("  When is it due? "))
            .await
            .unwrap();
        assert_eq!(comment.content, "When is it due?");
        assert_eq!(comment.target(), Some(target));
        create_comment(&storage, &teacher, target, body("Friday"))
            .await
            .unwrap();

        let err = create_comment(&storage, &member, target, body("   "))
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "BAD_REQUEST");

        let err = create_comment(&storage, &outsider, target, body("hi"))
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "UNAUTHORIZED");
        assert!(list_comments(&storage, &outsider, target).await.is_err());

        assert_eq!(list_comments(&storage, &member, target).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_submission_comments_and_delete() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teacher").await;
        let alice = test_support::student(&storage, "alice").await;
        let bob = test_support::student(&storage, "bob").await;
        let classroom =
            test_support::classroom(&storage, &teacher, ClassroomModifier::Public, None).await;
        test_support::enroll(&storage, classroom.id, alice.id).await;
        test_support::enroll(&storage, classroom.id, bob.id).await;
        let assignment = test_support::assignment(&storage, classroom.id, None).await;
        let submission =
            test_support::submission(&storage, &assignment, alice.id, "essay.pdf").await;
        let target = CommentTarget::Submission(submission.id);

        let feedback = create_comment(&storage, &teacher, target, body("Nice work"))
            .await
            .unwrap();
        create_comment(&storage, &alice, target, body("Thanks"))
            .await
            .unwrap();
        let err = list_comments(&storage, &bob, target).await.unwrap_err();
        assert_eq!(err.transport_code(), "UNAUTHORIZED");

        let err = delete_comment(&storage, &alice, feedback.id)
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "FORBIDDEN");
        assert_eq!(list_comments(&storage, &alice, target).await.unwrap().len(), 2);

        delete_comment(&storage, &teacher, feedback.id).await.unwrap();
        let remaining = list_comments(&storage, &teacher, target).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].user_id, alice.id);
    }
}
