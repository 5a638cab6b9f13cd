use crate::{
    api::{attendance, leave, overtime, salary, shift},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let punch_limiter = Arc::new(build_limiter(config.rate_punch_per_min));
    let submit_limiter = Arc::new(build_limiter(config.rate_submit_per_min));
    let general_limiter = Arc::new(build_limiter(config.rate_general_per_min));

    cfg.service(
        web::scope(&format!("{}/v1", config.api_prefix))
            .wrap(general_limiter) // rate limiting
            .service(
                web::scope("/attendance")
                    // /attendance/punch
                    .service(
                        web::resource("/punch")
                            .wrap(punch_limiter.clone())
                            .route(web::post().to(attendance::punch)),
                    )
                    // /attendance/details
                    .service(web::resource("/details").route(web::get().to(attendance::details)))
                    // /attendance/abnormal
                    .service(web::resource("/abnormal").route(web::get().to(attendance::abnormal)))
                    // /attendance/adjust
                    .service(
                        web::resource("/adjust")
                            .wrap(submit_limiter.clone())
                            .route(web::post().to(attendance::submit_adjustment)),
                    )
                    // /attendance/adjustments/pending
                    .service(
                        web::resource("/adjustments/pending")
                            .route(web::get().to(attendance::pending_adjustments)),
                    )
                    // /attendance/adjustments/{id}/review
                    .service(
                        web::resource("/adjustments/{id}/review")
                            .route(web::put().to(attendance::review_adjustment)),
                    ),
            )
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .wrap(submit_limiter.clone())
                            .route(web::post().to(leave::submit_leave)),
                    )
                    // /leave/mine
                    .service(web::resource("/mine").route(web::get().to(leave::my_leaves)))
                    // /leave/balance
                    .service(web::resource("/balance").route(web::get().to(leave::balance)))
                    // /leave/pending
                    .service(web::resource("/pending").route(web::get().to(leave::pending_leaves)))
                    // /leave/{id}/review
                    .service(
                        web::resource("/{id}/review").route(web::put().to(leave::review_leave)),
                    ),
            )
            .service(
                web::scope("/overtime")
                    // /overtime
                    .service(
                        web::resource("")
                            .wrap(submit_limiter.clone())
                            .route(web::post().to(overtime::submit_overtime)),
                    )
                    // /overtime/mine
                    .service(web::resource("/mine").route(web::get().to(overtime::my_overtimes)))
                    // /overtime/pending
                    .service(
                        web::resource("/pending").route(web::get().to(overtime::pending_overtimes)),
                    )
                    // /overtime/{id}/review
                    .service(
                        web::resource("/{id}/review").route(web::put().to(overtime::review_overtime)),
                    ),
            )
            .service(
                web::scope("/shift")
                    // /shift
                    .service(
                        web::resource("")
                            .route(web::post().to(shift::add_shift))
                            .route(web::get().to(shift::list_shifts)),
                    )
                    // /shift/batch
                    .service(web::resource("/batch").route(web::post().to(shift::add_shifts_batch)))
                    // /shift/stats
                    .service(web::resource("/stats").route(web::get().to(shift::stats)))
                    // /shift/adherence
                    .service(
                        web::resource("/adherence").route(web::get().to(shift::my_adherence)),
                    )
                    // /shift/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(shift::update_shift))
                            .route(web::delete().to(shift::delete_shift)),
                    ),
            )
            .service(
                web::scope("/salary")
                    // /salary/profile
                    .service(
                        web::resource("/profile").route(web::put().to(salary::save_profile)),
                    )
                    // /salary/profile/{employee_id}
                    .service(
                        web::resource("/profile/{employee_id}")
                            .route(web::get().to(salary::get_profile)),
                    )
                    // /salary/calculate
                    .service(web::resource("/calculate").route(web::get().to(salary::calculate)))
                    // /salary/record
                    .service(web::resource("/record").route(web::post().to(salary::save_record)))
                    // /salary/all
                    .service(web::resource("/all").route(web::get().to(salary::all_records)))
                    // /salary/mine
                    .service(web::resource("/mine").route(web::get().to(salary::my_record)))
                    // /salary/history
                    .service(web::resource("/history").route(web::get().to(salary::history))),
            ),
    );
}
