pub mod create;
pub mod delete;
pub mod enrollments;
pub mod get;
pub mod list;
pub mod ratings;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::PaginationQuery;
use crate::models::classrooms::requests::{
    BrowseClassroomsParams, CreateClassroomRequest, EnrollRequest, UpdateClassroomRequest,
};
use crate::models::ratings::requests::SetRatingRequest;

use super::define_service;

define_service!(ClassroomService);

impl ClassroomService {
    // 当前用户的教室列表（教师：拥有的；学生：已加入的）
    pub async fn list_classrooms(
        &self,
        request: &HttpRequest,
        query: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        list::handle_list_classrooms(self, request, query).await
    }

    // 浏览可加入的教室
    pub async fn browse_classrooms(
        &self,
        request: &HttpRequest,
        params: BrowseClassroomsParams,
    ) -> ActixResult<HttpResponse> {
        list::handle_browse_classrooms(self, request, params).await
    }

    pub async fn create_classroom(
        &self,
        request: &HttpRequest,
        body: CreateClassroomRequest,
    ) -> ActixResult<HttpResponse> {
        create::handle_create_classroom(self, request, body).await
    }

    pub async fn get_classroom(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::handle_get_classroom(self, request, classroom_id).await
    }

    pub async fn update_classroom(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
        body: UpdateClassroomRequest,
    ) -> ActixResult<HttpResponse> {
        update::handle_update_classroom(self, request, classroom_id, body).await
    }

    pub async fn delete_classroom(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::handle_delete_classroom(self, request, classroom_id).await
    }

    // 学生加入教室
    pub async fn enroll(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
        body: EnrollRequest,
    ) -> ActixResult<HttpResponse> {
        enrollments::handle_enroll(self, request, classroom_id, body).await
    }

    // 学生退出教室
    pub async fn leave(&self, request: &HttpRequest, classroom_id: i64) -> ActixResult<HttpResponse> {
        enrollments::handle_leave(self, request, classroom_id).await
    }

    pub async fn list_students(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
        query: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        enrollments::handle_list_students(self, request, classroom_id, query).await
    }

    // 教师移除学生
    pub async fn remove_student(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        enrollments::handle_remove_student(self, request, classroom_id, student_id).await
    }

    pub async fn list_ratings(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
    ) -> ActixResult<HttpResponse> {
        ratings::handle_list_ratings(self, request, classroom_id).await
    }

    pub async fn set_rating(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
        student_id: i64,
        body: SetRatingRequest,
    ) -> ActixResult<HttpResponse> {
        ratings::handle_set_rating(self, request, classroom_id, student_id, body).await
    }

    pub async fn get_my_rating(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
    ) -> ActixResult<HttpResponse> {
        ratings::handle_get_my_rating(self, request, classroom_id).await
    }
}
