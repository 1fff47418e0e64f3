use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SetRatingRequest {
    pub amount: i32,
}
