use std::sync::Arc;

use crate::{
    auth::{AccessGuard, JwtService},
    config::Config,
    db::Database,
    errors::AppResult,
    mailer::Mailer,
    repositories::{
        MongoQuizRepository, MongoResultRepository, MongoUserRepository, QuizRepository,
        ResultRepository, UserRepository,
    },
    services::{quiz_service::QuizService, result_service::ResultService, user_service::UserService},
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub quiz_service: Arc<QuizService>,
    pub result_service: Arc<ResultService>,
    pub guard: Arc<AccessGuard>,
    pub jwt_service: JwtService,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config, db: &Database) -> AppResult<Self> {
        let user_repository = Arc::new(MongoUserRepository::new(db));
        user_repository.ensure_indexes().await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(db));
        quiz_repository.ensure_indexes().await?;

        let result_repository = Arc::new(MongoResultRepository::new(db));
        result_repository.ensure_indexes().await?;

        let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);
        let mailer = Arc::new(Mailer::new(config.mail.clone(), &config.frontend_url)?);

        Ok(Self::from_parts(
            user_repository,
            quiz_repository,
            result_repository,
            jwt_service,
            mailer,
            config,
        ))
    }

    /// Wire the services from already-built collaborators. Production
    /// goes through [`AppState::new`]; integration tests inject in-memory
    /// repositories and a disabled mailer here.
    pub fn from_parts(
        users: Arc<dyn UserRepository>,
        quizzes: Arc<dyn QuizRepository>,
        results: Arc<dyn ResultRepository>,
        jwt_service: JwtService,
        mailer: Arc<Mailer>,
        config: Config,
    ) -> Self {
        let user_service = Arc::new(UserService::new(
            users.clone(),
            jwt_service.clone(),
            mailer,
        ));
        let quiz_service = Arc::new(QuizService::new(quizzes.clone()));
        let result_service = Arc::new(ResultService::new(results, quizzes));
        let guard = Arc::new(AccessGuard::new(users));

        Self {
            user_service,
            quiz_service,
            result_service,
            guard,
            jwt_service,
            config: Arc::new(config),
        }
    }
}
