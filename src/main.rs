use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use quizweb_server::{
    app_state::AppState,
    config::Config,
    db::Database,
    handlers::{auth_handler, health_handler, quiz_handler, result_handler},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if config.production {
        config.validate_for_production();
    }

    let db = Database::connect(&config)
        .await
        .map_err(std::io::Error::other)?;
    let state = AppState::new(config.clone(), &db)
        .await
        .map_err(std::io::Error::other)?;

    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let frontend_url = config.frontend_url.clone();

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(state.jwt_service.clone()))
            .app_data(web::Data::new(db.clone()))
            .wrap(Logger::default())
            .wrap(cors)
            .service(health_handler::health_check)
            .service(health_handler::health_check_ready)
            .service(health_handler::health_check_live)
            .service(auth_handler::scope())
            .service(quiz_handler::scope())
            .service(result_handler::scope())
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
