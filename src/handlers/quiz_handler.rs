use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::json;

use crate::{
    app_state::AppState,
    auth::{guard, AuthenticatedUser},
    errors::AppError,
    models::dto::request::SaveQuizRequest,
};

#[get("/all-quizes")]
async fn all_quizes(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let quizes = state.quiz_service.list_all().await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Quizes fetched successfully",
        "success": true,
        "quizes": quizes,
    })))
}

#[get("/quiz/{id}")]
async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = state.guard.resolve_user(&auth.0).await?;
    guard::ensure_verified(&user)?;

    let quiz = state.quiz_service.get(&id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Quiz fetched successfully",
        "success": true,
        "quiz": quiz,
    })))
}

#[post("/create-quize")]
async fn create_quiz(
    state: web::Data<AppState>,
    payload: web::Json<SaveQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = state.guard.resolve_user(&auth.0).await?;
    guard::ensure_verified(&user)?;

    let quiz = state
        .quiz_service
        .create(&user, payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Quiz created successfully",
        "success": true,
        "quiz": quiz,
    })))
}

#[get("/my-quizes")]
async fn my_quizes(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = state.guard.resolve_user(&auth.0).await?;
    guard::ensure_verified(&user)?;

    let quizes = state.quiz_service.list_mine(&user).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "User quizes fetched successfully",
        "success": true,
        "quizes": quizes,
    })))
}

#[put("/update-quize/{id}")]
async fn update_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: web::Json<SaveQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = state.guard.resolve_user(&auth.0).await?;
    guard::ensure_verified(&user)?;

    let quiz = state
        .quiz_service
        .update(&user, &id.into_inner(), payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Quiz updated successfully",
        "success": true,
        "quiz": quiz,
    })))
}

#[delete("/delete-quize/{id}")]
async fn delete_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = state.guard.resolve_user(&auth.0).await?;
    guard::ensure_verified(&user)?;

    state.quiz_service.delete(&user, &id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Quiz deleted successfully",
        "success": true,
    })))
}

pub fn scope() -> actix_web::Scope {
    web::scope("/quize")
        .service(all_quizes)
        .service(get_quiz)
        .service(create_quiz)
        .service(my_quizes)
        .service(update_quiz)
        .service(delete_quiz)
}
