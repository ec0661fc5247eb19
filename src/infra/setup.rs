use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{http::app_state::AppState, persistence::PostgresPersistence},
    application::ports::{clock::Clock, password::PasswordScheme},
    infra::{
        clock::SystemClock, config::AppConfig, db::init_db, error::InfraError,
        password::Argon2Passwords,
    },
    use_cases::{
        token::{TokenRepo, TokenService},
        user::{AuthUseCases, UserRepo},
    },
};

pub async fn init_app_state(config: AppConfig) -> Result<AppState, InfraError> {
    let pool = init_db(&config.database_url).await?;
    let postgres_arc = Arc::new(PostgresPersistence::new(pool));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let passwords: Arc<dyn PasswordScheme> = Arc::new(Argon2Passwords::new());

    let token_service = TokenService::new(
        postgres_arc.clone() as Arc<dyn TokenRepo>,
        Arc::new(config.tokens.clone()),
        clock,
    );

    let auth_use_cases = AuthUseCases::new(
        postgres_arc as Arc<dyn UserRepo>,
        passwords,
        token_service,
    );

    Ok(AppState {
        config: Arc::new(config),
        auth_use_cases: Arc::new(auth_use_cases),
    })
}

pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tokenauth=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        // Structured JSON lines for log shippers
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init()
            .ok();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false) // don't show target (module path)
                    .with_level(true)
                    .pretty(),
            )
            .try_init()
            .ok();
    }
}
