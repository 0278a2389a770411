//! Course pipeline against a mock u:find site
//!
//! Resolve → discover → fan out → collect → report, with the real HTTP fetcher.

use std::sync::Arc;
use std::time::Duration;
use ufind_planner::course::Course;
use ufind_planner::crawler::{HttpFetcher, ProgressSnapshot};
use ufind_planner::report::{render_footer, render_lecture, ProgressReporter};
use ufind_planner::utils::error::ResolutionError;
use ufind_planner::utils::Clock;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{at, catalog_page, config_for, course_page, fixed_now, lecture_page};

async fn mount_page(server: &MockServer, page: &str, query: (&str, &str), body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .and(query_param(query.0, query.1))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/de/vvz.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalog_page(&[
            ("5.010 Bachelor Lehramt Informatik", "vvz_sub.html?path=5010"),
            ("5.01 Bachelor Informatik", "vvz_sub.html?path=501"),
            ("5.02 Master Informatik", "vvz_sub.html?path=502"),
        ])))
        .mount(server)
        .await;
}

/// Course 5.01 with three lecture references, one of which fails
async fn mount_site(server: &MockServer) {
    mount_catalog(server).await;

    mount_page(
        server,
        "/de/vvz_sub.html",
        ("path", "501"),
        course_page(&[
            "course.html?lv=250001",
            "course.html?lv=250002",
            "course.html?lv=250003",
            "course.html?lv=250001",
        ]),
    )
    .await;

    mount_page(
        server,
        "/de/course.html",
        ("lv", "250001"),
        lecture_page(
            "Algorithmen",
            &[
                ("13.01.", "09:45 - 11:15", "HS 1"),
                ("20.01.", "09:45 - 11:15", "HS 1"),
                ("09.01.", "09:45 - 11:15", "HS 1"),
            ],
        ),
    )
    .await;

    mount_page(
        server,
        "/de/course.html",
        ("lv", "250002"),
        lecture_page(
            "Datenbanken",
            &[
                ("14.01.", "11:30 - 13:00", "HS 2"),
                ("21.01.", "11:30 - 13:00", "HS 2"),
            ],
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/de/course.html"))
        .and(query_param("lv", "250003"))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
}

async fn resolve(server: &MockServer, id: &str) -> Result<Course, ResolutionError> {
    let config = config_for(&server.uri());
    let fetcher = Arc::new(HttpFetcher::new(&config.fetch).unwrap());
    Course::resolve(id, fetcher, &config)
        .await
        .map(|course| course.with_clock(Clock::Fixed(fixed_now())))
}

#[tokio::test]
async fn test_course_pipeline_end_to_end() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let course = resolve(&server, "5.01").await.unwrap();
    assert_eq!(
        course.url(),
        format!("{}/de/vvz_sub.html?path=501", server.uri())
    );

    let references = course.discover().await.unwrap();
    assert_eq!(references.len(), 3);

    let fanout = course.fan_out(references);
    let progress = fanout.progress();
    let events = fanout.subscribe();

    let mut printed = Vec::new();
    let (summary, last) = tokio::join!(
        course.collect(fanout),
        ProgressReporter::new(10.0).drive(events, &mut printed)
    );

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.panicked, 0);
    assert_eq!(summary.inserted, 4);

    assert_eq!(progress.completed(), 3);
    assert_eq!(progress.percentage(), 100.0);
    assert_eq!(last.unwrap(), ProgressSnapshot { completed: 3, total: 3 });
    assert!(String::from_utf8(printed).unwrap().contains("100.00% finished"));

    let top = course.report_top_n(10).await;
    let starts: Vec<_> = top.iter().map(|l| l.start_time()).collect();
    assert_eq!(
        starts,
        vec![
            at(13, 1, 9, 45),
            at(14, 1, 11, 30),
            at(20, 1, 9, 45),
            at(21, 1, 11, 30),
        ]
    );
    assert_eq!(top[0].name(), "Algorithmen");
    assert_eq!(top[1].location(), "HS 2");
    assert_eq!(course.len().await, 4);

    let rendered = render_lecture(&top[0], course.base_url());
    assert!(rendered.contains(&format!("{}/de/course.html?lv=250001", server.uri())));
    assert!(rendered.ends_with("At location: HS 1"));

    assert_eq!(
        render_footer(top.len(), course.len().await, Duration::from_millis(500)),
        "Showing 4 of 4 lectures in 0.50 secs"
    );
}

#[tokio::test]
async fn test_report_is_truncated_to_top_n() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let course = resolve(&server, "5.01").await.unwrap();
    course.run().await.unwrap();

    let top = course.report_top_n(2).await;
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].start_time(), at(13, 1, 9, 45));
    assert_eq!(top[1].start_time(), at(14, 1, 11, 30));
}

#[tokio::test]
async fn test_prefix_boundary_resolution() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let course = resolve(&server, "5.010").await.unwrap();
    assert!(course.url().ends_with("vvz_sub.html?path=5010"));

    let course = resolve(&server, "5.01").await.unwrap();
    assert!(course.url().ends_with("vvz_sub.html?path=501"));
}

#[tokio::test]
async fn test_unknown_course_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/de/vvz.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(catalog_page(&[("5.01 Bachelor Informatik", "vvz_sub.html?path=501")])),
        )
        .mount(&server)
        .await;

    let err = resolve(&server, "5.010").await.unwrap_err();
    assert!(matches!(err, ResolutionError::CourseNotFound { id } if id == "5.010"));
}

#[tokio::test]
async fn test_set_id_switches_course() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let mut course = resolve(&server, "5.01").await.unwrap();
    course.set_id("5.02").await.unwrap();
    assert_eq!(course.id(), "5.02");
    assert!(course.url().ends_with("vvz_sub.html?path=502"));

    assert!(course.set_id("9.99").await.is_err());
    assert_eq!(course.id(), "5.02");
}

#[tokio::test]
async fn test_equal_start_times_are_kept() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    mount_page(
        &server,
        "/de/vvz_sub.html",
        ("path", "501"),
        course_page(&["course.html?lv=1"]),
    )
    .await;
    mount_page(
        &server,
        "/de/course.html",
        ("lv", "1"),
        lecture_page(
            "Praktikum",
            &[
                ("15.01.", "10:00", "PC-Labor 1"),
                ("15.01.", "10:00", "PC-Labor 2"),
                ("15.01.", "10:00", "PC-Labor 1"),
            ],
        ),
    )
    .await;

    let course = resolve(&server, "5.01").await.unwrap();
    let summary = course.run().await.unwrap();
    assert_eq!(summary.inserted, 2);

    let top = course.report_top_n(10).await;
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].location(), "PC-Labor 1");
    assert_eq!(top[1].location(), "PC-Labor 2");
}
