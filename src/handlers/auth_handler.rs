use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    get, post, route, web, HttpResponse,
};
use serde_json::json;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{ForgetPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest},
        response::UserDto,
    },
};

/// HTTP-only session cookie. Cross-site in production (the frontend is
/// served from another origin), Lax in development so plain http works.
fn session_cookie(token: String, production: bool, hours: i64) -> Cookie<'static> {
    Cookie::build("token", token)
        .path("/")
        .http_only(true)
        .secure(production)
        .same_site(if production {
            SameSite::None
        } else {
            SameSite::Lax
        })
        .max_age(CookieDuration::hours(hours))
        .finish()
}

#[post("/register")]
async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.register(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Check your email for verification!",
        "success": true,
        "user": user,
    })))
}

#[get("/verify/{token}")]
async fn verify_email(
    state: web::Data<AppState>,
    token: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let (user, session) = state.user_service.verify_email(&token.into_inner()).await?;

    let cookie = session_cookie(
        session,
        state.config.production,
        state.jwt_service.expiration_hours(),
    );

    Ok(HttpResponse::Created().cookie(cookie).json(json!({
        "message": "User verified successfully!",
        "success": true,
        "user": user,
    })))
}

#[post("/login")]
async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let (user, session) = state.user_service.login(payload.into_inner()).await?;

    let cookie = session_cookie(
        session,
        state.config.production,
        state.jwt_service.expiration_hours(),
    );

    Ok(HttpResponse::Ok().cookie(cookie).json(json!({
        "message": "Logged in successfully",
        "success": true,
        "user": user,
    })))
}

/// Purely client-side: the cookie is cleared, the token itself stays
/// valid until its natural expiry.
#[get("/logout")]
async fn logout(
    state: web::Data<AppState>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let mut cookie = session_cookie(String::new(), state.config.production, 0);
    cookie.make_removal();

    Ok(HttpResponse::Ok().cookie(cookie).json(json!({
        "message": "User logged out successfully",
        "success": true,
    })))
}

#[get("/profile")]
async fn profile(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = state.guard.resolve_user(&auth.0).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "User profile fetched successfully",
        "success": true,
        "user": UserDto::from(user),
    })))
}

#[post("/forget-password")]
async fn forget_password(
    state: web::Data<AppState>,
    payload: web::Json<ForgetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    state
        .user_service
        .forget_password(payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Check your email to reset password!",
        "success": true,
    })))
}

#[route("/reset-password/{token}", method = "POST", method = "PUT")]
async fn reset_password(
    state: web::Data<AppState>,
    token: web::Path<String>,
    payload: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    state
        .user_service
        .reset_password(&token.into_inner(), payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Password reset successful",
        "success": true,
    })))
}

#[post("/resend-verification")]
async fn resend_verification(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = state.guard.resolve_user(&auth.0).await?;
    state.user_service.resend_verification(&user).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Verification email sent successfully! Please check your email.",
        "success": true,
    })))
}

pub fn scope() -> actix_web::Scope {
    web::scope("/auth")
        .service(register)
        .service(verify_email)
        .service(login)
        .service(logout)
        .service(profile)
        .service(forget_password)
        .service(reset_password)
        .service(resend_verification)
}
