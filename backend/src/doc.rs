//! OpenAPI document served by Swagger UI in debug builds.

use utoipa::OpenApi;

/// Public OpenAPI surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "School-Connect notice service",
        description = "REST surface for school notices and accounts; realtime \
                       sync happens over the `/ws` channel."
    ),
    paths(
        crate::inbound::http::notices::list_notices,
        crate::inbound::http::notices::create_notice,
        crate::inbound::http::notices::update_notice,
        crate::inbound::http::notices::delete_notice,
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        notice_sync::NoticeRecord,
        notice_sync::NoticeDraftRecord,
        crate::inbound::http::notices::UpdateNoticeRequest,
        crate::inbound::http::notices::NoticeUpdated,
        crate::inbound::http::notices::DeleteConfirmation,
        crate::inbound::http::auth::RegisterRequest,
        crate::inbound::http::auth::LoginRequest,
        crate::inbound::http::auth::AuthResponse,
        crate::inbound::http::error::ApiError,
        crate::domain::ErrorCode,
        crate::domain::Profile,
        crate::domain::Role,
        crate::domain::Batch,
    )),
    tags(
        (name = "notices", description = "Notice CRUD"),
        (name = "auth", description = "Accounts and bearer tokens"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;
