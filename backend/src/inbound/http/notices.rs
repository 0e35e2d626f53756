//! Notice CRUD handlers.
//!
//! ```text
//! GET    /api/notice        -> [NoticeRecord]
//! POST   /api/notice        -> 201 NoticeRecord           (Teacher only)
//! PUT    /api/notice/{id}   -> {"notice": NoticeRecord}   (Teacher only)
//! DELETE /api/notice/{id}   -> {"message": "..."}         (Teacher only)
//! ```
//!
//! Every mutation is also broadcast to all connected realtime channels by
//! the notice service.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use notice_sync::{NoticeDraftRecord, NoticeRecord};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::NoticeUpdate;
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Bearer;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::state::HttpState;

const DELETE_CONFIRMATION: &str = "Notice deleted successfully.";

/// Request body for `PUT /api/notice/{id}`: any subset of the notice fields.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateNoticeRequest {
    pub title: Option<String>,
    pub notice: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub time: Option<String>,
    pub user: Option<String>,
}

impl From<UpdateNoticeRequest> for NoticeUpdate {
    fn from(value: UpdateNoticeRequest) -> Self {
        Self {
            title: value.title,
            notice: value.notice,
            date: value.date,
            time: value.time,
            user: value.user,
        }
    }
}

/// Response wrapper for `PUT /api/notice/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct NoticeUpdated {
    pub notice: NoticeRecord,
}

/// Response body for `DELETE /api/notice/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteConfirmation {
    pub message: String,
}

/// List all notices.
#[utoipa::path(
    get,
    path = "/api/notice",
    responses(
        (status = 200, description = "All notices", body = [NoticeRecord]),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["notices"],
    operation_id = "listNotices"
)]
#[get("/notice")]
pub async fn list_notices(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<NoticeRecord>>> {
    let notices = state.notices.list().await?;
    Ok(web::Json(notices))
}

/// Create a notice. Requires a bearer token for the Teacher role.
#[utoipa::path(
    post,
    path = "/api/notice",
    request_body = NoticeDraftRecord,
    responses(
        (status = 201, description = "Created notice", body = NoticeRecord),
        (status = 400, description = "Invalid draft", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 403, description = "Not the authoring role", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["notices"],
    operation_id = "createNotice"
)]
#[post("/notice")]
pub async fn create_notice(
    state: web::Data<HttpState>,
    bearer: Bearer,
    payload: web::Json<NoticeDraftRecord>,
) -> ApiResult<HttpResponse> {
    state.auth.require_author(bearer.token()).await?;
    let record = state.notices.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(record))
}

/// Update a notice with a partial or full field set. Requires a bearer
/// token for the Teacher role.
#[utoipa::path(
    put,
    path = "/api/notice/{id}",
    request_body = UpdateNoticeRequest,
    params(("id" = String, Path, description = "Notice identifier")),
    responses(
        (status = 200, description = "Updated notice", body = NoticeUpdated),
        (status = 400, description = "Invalid draft", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 403, description = "Not the authoring role", body = ApiError),
        (status = 404, description = "Unknown identifier", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["notices"],
    operation_id = "updateNotice"
)]
#[put("/notice/{id}")]
pub async fn update_notice(
    state: web::Data<HttpState>,
    bearer: Bearer,
    path: web::Path<String>,
    payload: web::Json<UpdateNoticeRequest>,
) -> ApiResult<web::Json<NoticeUpdated>> {
    state.auth.require_author(bearer.token()).await?;
    let record = state
        .notices
        .replace(&path.into_inner(), payload.into_inner().into())
        .await?;
    Ok(web::Json(NoticeUpdated { notice: record }))
}

/// Delete a notice by identifier. Requires a bearer token for the Teacher role.
#[utoipa::path(
    delete,
    path = "/api/notice/{id}",
    params(("id" = String, Path, description = "Notice identifier")),
    responses(
        (status = 200, description = "Deletion confirmation", body = DeleteConfirmation),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 403, description = "Not the authoring role", body = ApiError),
        (status = 404, description = "Unknown identifier", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["notices"],
    operation_id = "deleteNotice"
)]
#[delete("/notice/{id}")]
pub async fn delete_notice(
    state: web::Data<HttpState>,
    bearer: Bearer,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteConfirmation>> {
    state.auth.require_author(bearer.token()).await?;
    state.notices.delete(&path.into_inner()).await?;
    Ok(web::Json(DeleteConfirmation {
        message: DELETE_CONFIRMATION.to_owned(),
    }))
}
