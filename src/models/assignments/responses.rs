use super::entities::Assignment;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AssignmentListResponse {
    pub items: Vec<Assignment>,
}
