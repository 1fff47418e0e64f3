pub mod attachments;
pub mod create;
pub mod delete;
pub mod get;
pub mod submissions;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::assignments::requests::{CreateAssignmentRequest, UpdateAssignmentRequest};
use crate::models::attachments::requests::CreateAttachmentRequest;
use crate::models::submissions::requests::CreateSubmissionRequest;

use super::define_service;

define_service!(AssignmentService);

impl AssignmentService {
    // 教室下的作业列表
    pub async fn list_assignments(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::handle_list_assignments(self, request, classroom_id).await
    }

    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
        body: CreateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::handle_create_assignment(self, request, classroom_id, body).await
    }

    pub async fn get_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::handle_get_assignment(self, request, assignment_id).await
    }

    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        body: UpdateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        update::handle_update_assignment(self, request, assignment_id, body).await
    }

    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::handle_delete_assignment(self, request, assignment_id).await
    }

    pub async fn list_attachments(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        attachments::handle_list_attachments(self, request, assignment_id).await
    }

    // 上传流程第一步：创建附件记录并签发对象键
    pub async fn create_attachment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        body: CreateAttachmentRequest,
    ) -> ActixResult<HttpResponse> {
        attachments::handle_create_attachment(self, request, assignment_id, body).await
    }

    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        submissions::handle_list_submissions(self, request, assignment_id).await
    }

    pub async fn list_my_submissions(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        submissions::handle_list_my_submissions(self, request, assignment_id).await
    }

    // 上传流程第一步：创建提交记录并签发对象键
    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        body: CreateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        submissions::handle_create_submission(self, request, assignment_id, body).await
    }
}
