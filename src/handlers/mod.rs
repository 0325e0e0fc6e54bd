pub mod auth;
pub mod dashboard;
pub mod payment;
pub mod portfolio;
pub mod providers;

use actix_web::web;

/// Raw upload bodies may exceed the portfolio limit so the limit is reported
/// as a `FileTooLarge` error rather than a bare 413 from the extractor.
pub const MAX_UPLOAD_BODY: usize = 10 * 1024 * 1024;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Accounts ──
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(auth::register))
            .route("/login", web::post().to(auth::login))
            .route("/logout", web::post().to(auth::logout))
            .route("/me", web::get().to(auth::me)),
    );
    cfg.service(web::resource("/payment/checkout").route(web::post().to(payment::checkout)));

    // ── Public provider pages (sign-in optional) ──
    cfg.service(
        web::scope("/providers")
            .route("", web::get().to(providers::search))
            .route("/featured", web::get().to(providers::featured))
            .route("/{owner_id}", web::get().to(providers::get_profile))
            .route("/{owner_id}/reviews", web::get().to(providers::get_reviews))
            .route("/{owner_id}/reviews", web::post().to(providers::submit_review)),
    );

    // ── Mitra dashboard (all protected, require valid JWT) ──
    cfg.service(
        web::scope("/dashboard")
            .app_data(web::PayloadConfig::new(MAX_UPLOAD_BODY))
            .route("", web::get().to(dashboard::overview))
            .route("/profile", web::put().to(dashboard::update_profile))
            .route("/profile/features", web::post().to(dashboard::add_feature))
            .route("/profile/features/{index}", web::put().to(dashboard::update_feature))
            .route("/profile/features/{index}", web::delete().to(dashboard::remove_feature))
            .route("/avatar", web::post().to(dashboard::upload_avatar))
            .route("/reviews/{id}", web::delete().to(dashboard::delete_review))
            .route("/portfolio", web::get().to(portfolio::list))
            .route("/portfolio", web::post().to(portfolio::upload))
            .route("/portfolio/{id}", web::delete().to(portfolio::delete)),
    );
}
