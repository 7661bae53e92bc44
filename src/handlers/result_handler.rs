use actix_web::{get, post, web, HttpResponse};
use serde_json::json;

use crate::{
    app_state::AppState,
    auth::{guard, AuthenticatedUser},
    errors::AppError,
    models::dto::request::{HistoryQuery, SubmitQuizRequest},
};

#[post("/submit-quiz/{quiz_id}")]
async fn submit_quiz(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    payload: web::Json<SubmitQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = state.guard.resolve_user(&auth.0).await?;
    guard::ensure_verified(&user)?;

    let result = state
        .result_service
        .submit(&user, &quiz_id.into_inner(), payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Quiz submitted successfully",
        "success": true,
        "result": result,
    })))
}

#[get("/history")]
async fn history(
    state: web::Data<AppState>,
    query: web::Query<HistoryQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = state.guard.resolve_user(&auth.0).await?;

    let page = state
        .result_service
        .history(&user, query.page(), query.limit())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Quiz history fetched successfully",
        "success": true,
        "data": page,
    })))
}

#[get("/stats")]
async fn stats(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = state.guard.resolve_user(&auth.0).await?;

    let stats = state.result_service.stats(&user).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Performance stats fetched successfully",
        "success": true,
        "data": stats,
    })))
}

#[get("/attempt/{result_id}")]
async fn attempt_details(
    state: web::Data<AppState>,
    result_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = state.guard.resolve_user(&auth.0).await?;

    let details = state
        .result_service
        .attempt_details(&user, &result_id.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Quiz attempt details fetched successfully",
        "success": true,
        "data": details,
    })))
}

pub fn scope() -> actix_web::Scope {
    web::scope("/result")
        .service(submit_quiz)
        .service(history)
        .service(stats)
        .service(attempt_details)
}
