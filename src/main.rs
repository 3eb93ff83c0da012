use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpResponse, HttpServer, cookie::Key, middleware, web};

use kleiderspende::auth::{self, rate_limit::RateLimiter};
use kleiderspende::config::AppConfig;
use kleiderspende::{db, handlers};

fn session_key(raw: Option<&str>) -> Key {
    match raw {
        Some(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let pool = db::init_pool(&config.database_url)
        .await
        .map_err(std::io::Error::other)?;
    db::run_migrations(&pool).await.map_err(std::io::Error::other)?;
    db::seed(&pool, &config).await.map_err(|e| std::io::Error::other(e.to_string()))?;

    let secret_key = session_key(config.session_key.as_deref());
    let limiter = web::Data::new(RateLimiter::default());
    let bind_addr = config.bind_addr.clone();
    let config = web::Data::new(config);

    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(config.clone())
            .app_data(limiter.clone())
            .service(actix_files::Files::new("/static", "./static"))
            .route("/", web::get().to(|| async {
                HttpResponse::SeeOther()
                    .insert_header(("Location", "/donate"))
                    .finish()
            }))
            // Public registration form
            .route("/donate", web::get().to(handlers::donation_handlers::form))
            .route("/donate", web::post().to(handlers::donation_handlers::submit))
            .route("/login", web::get().to(handlers::auth_handlers::login_page))
            .route("/login", web::post().to(handlers::auth_handlers::login_submit))
            .route("/logout", web::post().to(handlers::auth_handlers::logout))
            // The export answers 403 itself instead of redirecting to /login
            .route("/admin/donations", web::get().to(handlers::admin_donation_handlers::list))
            .service(
                web::scope("/admin/settings")
                    .wrap(middleware::from_fn(auth::middleware::require_auth))
                    .route("", web::get().to(handlers::settings_handlers::form))
                    .route("", web::post().to(handlers::settings_handlers::save)),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
