//! Backend entry-point: wires the REST surface, the realtime channel, and
//! OpenAPI docs over the configured stores.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::Trace;
use backend::config::Config;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::domain::ports::{
    NoopPushGateway, NoticeRepository, PushGateway, PushTokenRegistry, TokenStore, UserRepository,
};
use backend::domain::{AuthService, NoticeService};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{auth, notices};
use backend::inbound::ws;
use backend::inbound::ws::hub::NoticeHub;
use backend::inbound::ws::state::WsState;
use backend::outbound::persistence::{
    InMemoryNoticeRepository, InMemoryPushTokenRegistry, InMemoryTokenStore,
    InMemoryUserRepository, MongoPersistence,
};
use backend::outbound::push::HttpPushGateway;

type Stores = (
    Arc<dyn NoticeRepository>,
    Arc<dyn UserRepository>,
    Arc<dyn TokenStore>,
    Arc<dyn PushTokenRegistry>,
);

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = Config::parse();

    let (notice_repo, user_repo, token_store, push_registry) = connect_stores(&config).await?;

    let push_gateway: Arc<dyn PushGateway> = match &config.push_gateway_url {
        Some(raw) => {
            let endpoint = url::Url::parse(raw).map_err(|e| {
                std::io::Error::other(format!("invalid push gateway URL {raw}: {e}"))
            })?;
            Arc::new(HttpPushGateway::new(endpoint).map_err(std::io::Error::other)?)
        }
        None => {
            warn!("no push gateway configured; remote pushes are dropped");
            Arc::new(NoopPushGateway)
        }
    };

    let hub = NoticeHub::new();
    let notices_service = Arc::new(NoticeService::new(
        notice_repo.clone(),
        Arc::new(hub.clone()),
        push_registry.clone(),
        push_gateway,
    ));
    let auth_service = Arc::new(AuthService::new(user_repo, token_store));

    #[cfg(feature = "example-data")]
    if let Some(seed) = config.seed_notices {
        backend::example_data::seed_notices_on_startup(
            &notice_repo,
            seed,
            config.seed_notice_count,
        )
        .await
        .map_err(std::io::Error::other)?;
    }

    let origins = ws::AllowedOrigins::parse(&config.allowed_origins)
        .map_err(|e| std::io::Error::other(format!("invalid allowed origin: {e}")))?;

    let http_state = web::Data::new(HttpState::new(
        notices_service.clone(),
        auth_service.clone(),
    ));
    let ws_state = web::Data::new(WsState::new(
        notices_service,
        auth_service,
        push_registry,
        hub,
    ));
    let origins_data = web::Data::new(origins);
    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness flip stays visible here.
    let server_health_state = health_state.clone();

    info!(bind = %config.bind_addr, "starting notice service");
    let server = HttpServer::new(move || {
        let api = web::scope("/api")
            .service(notices::list_notices)
            .service(notices::create_notice)
            .service(notices::update_notice)
            .service(notices::delete_notice)
            .service(auth::register)
            .service(auth::login);

        let mut app = App::new()
            .app_data(http_state.clone())
            .app_data(ws_state.clone())
            .app_data(origins_data.clone())
            .app_data(server_health_state.clone())
            .wrap(Trace)
            .service(api)
            .service(ws::ws_entry)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        {
            app = app.service(
                SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
            );
        }

        app
    })
    .bind(&config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}

async fn connect_stores(config: &Config) -> std::io::Result<Stores> {
    match &config.database_url {
        Some(url) => {
            let mongo = MongoPersistence::connect(url, &config.database_name)
                .await
                .map_err(|e| {
                    std::io::Error::other(format!("failed to connect to MongoDB: {e}"))
                })?;
            info!(database = %config.database_name, "connected to MongoDB");
            Ok((
                Arc::new(mongo.notices()),
                Arc::new(mongo.users()),
                Arc::new(mongo.tokens()),
                Arc::new(mongo.push_tokens()),
            ))
        }
        None => {
            warn!("no DATABASE_URL configured; using in-memory stores");
            Ok((
                Arc::new(InMemoryNoticeRepository::new()),
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryTokenStore::new()),
                Arc::new(InMemoryPushTokenRegistry::new()),
            ))
        }
    }
}
