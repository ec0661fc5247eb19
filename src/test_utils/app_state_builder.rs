//! Test app state builder for HTTP-level testing.
//!
//! `TestAppStateBuilder` wires `AppState` with in-memory repos, a manual clock
//! and the plain password scheme, and hands the mocks back for assertions.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;

use crate::{
    adapters::http::app_state::AppState,
    application::use_cases::{
        token::{TokenRepo, TokenService},
        user::AuthUseCases,
    },
    domain::entities::user::User,
    infra::config::{AppConfig, TokenSettings},
    test_utils::{
        InMemoryTokenRepo, InMemoryUserRepo, ManualClock, PlainPasswordScheme, test_datetime,
        test_token_settings,
    },
};

/// Handles onto the mocks behind a built `AppState`.
pub struct TestHandles {
    pub users: Arc<InMemoryUserRepo>,
    pub tokens: Arc<InMemoryTokenRepo>,
    pub clock: Arc<ManualClock>,
}

/// Builder for `AppState` backed by in-memory mocks.
///
/// ```ignore
/// let (app_state, handles) = TestAppStateBuilder::new()
///     .with_user(create_test_user(|_| {}))
///     .build_with_handles();
/// handles.clock.advance(Duration::minutes(16));
/// ```
pub struct TestAppStateBuilder {
    users: Vec<User>,
    settings: TokenSettings,
    clock: Arc<ManualClock>,
    token_repo: Option<Arc<dyn TokenRepo>>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            users: vec![],
            settings: test_token_settings(),
            clock: Arc::new(ManualClock::at(test_datetime())),
            token_repo: None,
        }
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_settings(mut self, settings: TokenSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the token store, e.g. with a `FailingTokenRepo`.
    pub fn with_token_repo(mut self, repo: Arc<dyn TokenRepo>) -> Self {
        self.token_repo = Some(repo);
        self
    }

    pub fn build(self) -> AppState {
        self.build_with_handles().0
    }

    pub fn build_with_handles(self) -> (AppState, TestHandles) {
        let users = Arc::new(InMemoryUserRepo::with_users(self.users));
        let tokens = Arc::new(InMemoryTokenRepo::new());
        let token_repo: Arc<dyn TokenRepo> = self.token_repo.unwrap_or_else(|| tokens.clone());

        let token_service = TokenService::new(
            token_repo,
            Arc::new(self.settings.clone()),
            self.clock.clone(),
        );
        let auth_use_cases = Arc::new(AuthUseCases::new(
            users.clone(),
            Arc::new(PlainPasswordScheme),
            token_service,
        ));

        let config = Arc::new(AppConfig {
            tokens: self.settings,
            database_url: String::new(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            cors_origin: HeaderValue::from_static("http://localhost:3000"),
            log_json: false,
        });

        let app_state = AppState {
            config,
            auth_use_cases,
        };
        let handles = TestHandles {
            users,
            tokens,
            clock: self.clock,
        };
        (app_state, handles)
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
