use shared::{
    domain::{normalize_name, Swimmer, SwimmerId},
    error::ApiError,
    protocol::{CreateSwimmerRequest, UpdateSwimmerRequest},
};
use storage::{Storage, SwimmerPatch};
use tracing::info;

#[derive(Clone, Default)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn list_swimmers(ctx: &ApiContext) -> Result<Vec<Swimmer>, ApiError> {
    Ok(ctx.storage.list_swimmers().await)
}

pub async fn get_swimmer(ctx: &ApiContext, id: SwimmerId) -> Result<Swimmer, ApiError> {
    ctx.storage.get_swimmer(id).await.ok_or_else(|| not_found(id))
}

pub async fn create_swimmer(
    ctx: &ApiContext,
    req: CreateSwimmerRequest,
) -> Result<Swimmer, ApiError> {
    let name = validated_name(&req.name)?;
    let lap_count = validated_lap_count(req.lap_count)?;
    let swimmer = ctx.storage.create_swimmer(&name, lap_count).await;
    info!(swimmer_id = swimmer.id.0, "swimmer added");
    Ok(swimmer)
}

pub async fn update_swimmer(
    ctx: &ApiContext,
    id: SwimmerId,
    req: UpdateSwimmerRequest,
) -> Result<Swimmer, ApiError> {
    let patch = SwimmerPatch {
        name: req.name.as_deref().map(validated_name).transpose()?,
        lap_count: req.lap_count.map(validated_lap_count).transpose()?,
    };
    ctx.storage
        .update_swimmer(id, patch)
        .await
        .ok_or_else(|| not_found(id))
}

pub async fn delete_swimmer(ctx: &ApiContext, id: SwimmerId) -> Result<(), ApiError> {
    if !ctx.storage.delete_swimmer(id).await {
        return Err(not_found(id));
    }
    info!(swimmer_id = id.0, "swimmer removed");
    Ok(())
}

pub async fn reset_swimmer(ctx: &ApiContext, id: SwimmerId) -> Result<Swimmer, ApiError> {
    ctx.storage
        .reset_lap_count(id)
        .await
        .ok_or_else(|| not_found(id))
}

pub async fn increment_swimmer(ctx: &ApiContext, id: SwimmerId) -> Result<Swimmer, ApiError> {
    ctx.storage
        .increment_lap_count(id)
        .await
        .ok_or_else(|| not_found(id))
}

pub async fn decrement_swimmer(ctx: &ApiContext, id: SwimmerId) -> Result<Swimmer, ApiError> {
    ctx.storage
        .decrement_lap_count(id)
        .await
        .ok_or_else(|| not_found(id))
}

fn validated_name(raw: &str) -> Result<String, ApiError> {
    normalize_name(raw).ok_or_else(|| ApiError::validation("swimmer name must not be empty"))
}

fn validated_lap_count(raw: i64) -> Result<u32, ApiError> {
    u32::try_from(raw).map_err(|_| ApiError::validation("lapCount must be a non-negative integer"))
}

fn not_found(id: SwimmerId) -> ApiError {
    ApiError::not_found(format!("swimmer {id} not found"))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
