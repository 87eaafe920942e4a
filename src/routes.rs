use crate::{
    api::{attendance, correction, employee, report},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use anyhow::{Result, anyhow};
use std::sync::Arc;

type Limiter = Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>;

/// Per-IP limiters, built once and shared by every worker.
#[derive(Clone)]
pub struct RateLimits {
    login: Limiter,
    clock: Limiter,
    protected: Limiter,
}

impl RateLimits {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            login: build_limiter("RATE_LOGIN_PER_MIN", config.rate_login_per_min)?,
            clock: build_limiter("RATE_CLOCK_PER_MIN", config.rate_clock_per_min)?,
            protected: build_limiter("RATE_PROTECTED_PER_MIN", config.rate_protected_per_min)?,
        })
    }
}

fn build_limiter(name: &str, requests_per_min: u32) -> Result<Limiter> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit for {name}: {requests_per_min}"))?;
    Ok(Arc::new(Governor::new(&cfg)))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limits: &RateLimits) {
    cfg.service(
        web::scope(&config.api_prefix)
            // Public: admin OTP login
            .service(
                web::resource("/admin/login")
                    .wrap(limits.login.clone())
                    .route(web::post().to(handlers::admin_login)),
            )
            // Public: kiosk endpoints
            .service(
                web::resource("/employee/login")
                    .wrap(limits.login.clone())
                    .route(web::post().to(attendance::employee_login)),
            )
            .service(
                web::resource("/employee/status")
                    .wrap(limits.clock.clone())
                    .route(web::post().to(attendance::employee_status)),
            )
            .service(
                web::resource("/employee/{id}/status")
                    .wrap(limits.clock.clone())
                    .route(web::get().to(attendance::employee_status_by_id)),
            )
            .service(
                web::resource("/employee/status/{id}")
                    .wrap(limits.clock.clone())
                    .route(web::get().to(attendance::today_attendance)),
            )
            .service(
                web::resource("/employee/clock-in")
                    .wrap(limits.clock.clone())
                    .route(web::post().to(attendance::clock_in)),
            )
            .service(
                web::resource("/employee/clock-out")
                    .wrap(limits.clock.clone())
                    .route(web::post().to(attendance::clock_out)),
            )
            .service(
                web::resource("/employee/break/start")
                    .wrap(limits.clock.clone())
                    .route(web::post().to(attendance::start_break)),
            )
            .service(
                web::resource("/employee/break/end")
                    .wrap(limits.clock.clone())
                    .route(web::post().to(attendance::end_break)),
            )
            // Protected: admin bearer token required
            // /employees
            .service(
                web::scope("/employees")
                    .wrap(from_fn(auth_middleware)) // authentication
                    .wrap(limits.protected.clone()) // rate limiting
                    .service(
                        web::resource("")
                            .route(web::get().to(employee::list_employees))
                            .route(web::post().to(employee::create_employee)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            // /employee/reports
            .service(
                web::resource("/employee/reports")
                    .wrap(from_fn(auth_middleware))
                    .wrap(limits.protected.clone())
                    .route(web::get().to(report::employee_reports)),
            )
            .service(
                web::scope("/attendance")
                    .wrap(from_fn(auth_middleware))
                    .wrap(limits.protected.clone())
                    // /attendance/daily
                    .service(
                        web::resource("/daily").route(web::get().to(report::daily_attendance)),
                    )
                    // /attendance/{id}
                    .service(
                        web::resource("/{id}").route(web::put().to(correction::update_attendance)),
                    )
                    // /attendance/{id}/breaks
                    .service(
                        web::resource("/{id}/breaks")
                            .route(web::put().to(correction::replace_breaks))
                            .route(web::post().to(correction::add_break)),
                    )
                    // /attendance/{id}/breaks/{break_id}
                    .service(
                        web::resource("/{id}/breaks/{break_id}")
                            .route(web::delete().to(correction::delete_break)),
                    ),
            ),
    );
}
