use serde::{Deserialize, Serialize};

use crate::domain::SwimmerId;

pub const SWIMMERS_ROUTE: &str = "/api/swimmers";

pub fn swimmer_route(id: SwimmerId) -> String {
    format!("{SWIMMERS_ROUTE}/{id}")
}

pub fn swimmer_reset_route(id: SwimmerId) -> String {
    format!("{SWIMMERS_ROUTE}/{id}/reset")
}

pub fn swimmer_increment_route(id: SwimmerId) -> String {
    format!("{SWIMMERS_ROUTE}/{id}/increment")
}

pub fn swimmer_decrement_route(id: SwimmerId) -> String {
    format!("{SWIMMERS_ROUTE}/{id}/decrement")
}

/// Body of `POST /api/swimmers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSwimmerRequest {
    pub name: String,
    #[serde(default)]
    pub lap_count: i64,
}

impl CreateSwimmerRequest {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lap_count: 0,
        }
    }
}

/// Partial body of `PATCH /api/swimmers/:id`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSwimmerRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lap_count: Option<i64>,
}
