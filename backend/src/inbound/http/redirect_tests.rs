//! Handler tests for the redirect endpoints.

use std::sync::Arc;

use actix_web::{App, test, web};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use super::*;
use crate::domain::ports::{ConsultantBalancePayload, MockRedirectCommand, MockRedirectQuery};
use crate::domain::{Error, Platform, ReservationToken};
use crate::inbound::http::state::HttpState;

fn default_platform() -> Platform {
    Platform::new("whatsapp").expect("valid tag")
}

fn sample_issue_response(platform: &Platform) -> IssueReservationResponse {
    let now = Utc
        .with_ymd_and_hms(2026, 8, 5, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    IssueReservationResponse {
        contact_number: "+5511911112222".to_owned(),
        platform: platform.clone(),
        consultant: Some(ConsultantIdentityPayload {
            id: Uuid::new_v4(),
            name: "ana".to_owned(),
            email: Some("ana@example.com".to_owned()),
        }),
        token: ReservationToken::generate(),
        expires_at: now + Duration::minutes(10),
        expires_in_minutes: 10,
    }
}

async fn init_app(
    command: MockRedirectCommand,
    query: MockRedirectQuery,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    let state = HttpState::new(Arc::new(command), Arc::new(query), default_platform());
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(next_redirect)
            .service(confirm_redirect)
            .service(redirect_stats),
    )
    .await
}

#[actix_web::test]
async fn next_redirect_returns_the_reservation_envelope() {
    let mut command = MockRedirectCommand::new();
    command
        .expect_issue_reservation()
        .withf(|request| request.platform.as_str() == "whatsapp")
        .times(1)
        .returning(|request| Ok(sample_issue_response(&request.platform)));

    let app = init_app(command, MockRedirectQuery::new()).await;
    let req = test::TestRequest::get().uri("/next-redirect").to_request();
    let res = test::call_service(&app, req).await;

    assert!(res.status().is_success());
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.get("success"), Some(&json!(true)));
    let data = body.get("data").expect("data object");
    assert_eq!(data.get("numero"), Some(&json!("+5511911112222")));
    assert_eq!(data.get("plataforma"), Some(&json!("whatsapp")));
    assert_eq!(data.get("expires_in_minutes"), Some(&json!(10)));
    assert_eq!(
        data.get("consultor").and_then(|c| c.get("name")),
        Some(&json!("ana"))
    );
    assert!(
        data.get("token")
            .and_then(Value::as_str)
            .is_some_and(|token| token.len() == 64)
    );
}

#[actix_web::test]
async fn next_redirect_forwards_the_explicit_platform() {
    let mut command = MockRedirectCommand::new();
    command
        .expect_issue_reservation()
        .withf(|request| request.platform.as_str() == "google")
        .times(1)
        .returning(|request| {
            Ok(IssueReservationResponse {
                consultant: None,
                ..sample_issue_response(&request.platform)
            })
        });

    let app = init_app(command, MockRedirectQuery::new()).await;
    let req = test::TestRequest::get()
        .uri("/next-redirect?platform=Google")
        .to_request();
    let res = test::call_service(&app, req).await;

    assert!(res.status().is_success());
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body.get("data").and_then(|d| d.get("plataforma")),
        Some(&json!("google"))
    );
    assert_eq!(
        body.get("data").and_then(|d| d.get("consultor")),
        Some(&Value::Null)
    );
}

#[actix_web::test]
async fn next_redirect_maps_no_consultant_to_404() {
    let mut command = MockRedirectCommand::new();
    command
        .expect_issue_reservation()
        .times(1)
        .returning(|_| Err(Error::no_consultant_available("nobody on whatsapp")));

    let app = init_app(command, MockRedirectQuery::new()).await;
    let req = test::TestRequest::get().uri("/next-redirect").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status().as_u16(), 404);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.get("success"), Some(&json!(false)));
    assert_eq!(body.get("code"), Some(&json!("no_consultant_available")));
    assert_eq!(body.get("error"), Some(&json!("nobody on whatsapp")));
}

#[actix_web::test]
async fn confirm_redirect_returns_the_confirmation_envelope() {
    let confirmed_at = Utc
        .with_ymd_and_hms(2026, 8, 5, 9, 5, 0)
        .single()
        .expect("valid timestamp");

    let mut command = MockRedirectCommand::new();
    command
        .expect_confirm_reservation()
        .withf(|request| {
            request.contact_number == "+5511911112222"
                && request.lead_payload == Some(json!({ "nome": "Lead" }))
        })
        .times(1)
        .returning(move |request| {
            Ok(ConfirmReservationResponse {
                contact_number: request.contact_number,
                platform: request.platform,
                confirmed_at,
            })
        });

    let app = init_app(command, MockRedirectQuery::new()).await;
    let req = test::TestRequest::post()
        .uri("/confirm-redirect")
        .set_json(json!({
            "token": "a".repeat(64),
            "numero": "+5511911112222",
            "plataforma": "whatsapp",
            "lead_data": { "nome": "Lead" },
        }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert!(res.status().is_success());
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.get("success"), Some(&json!(true)));
    assert_eq!(body.get("message"), Some(&json!("redirect confirmed")));
    assert_eq!(
        body.get("data").and_then(|d| d.get("confirmed_at")),
        Some(&json!(confirmed_at.to_rfc3339()))
    );
}

#[actix_web::test]
async fn confirm_redirect_rejects_a_missing_token() {
    let mut command = MockRedirectCommand::new();
    command.expect_confirm_reservation().times(0);

    let app = init_app(command, MockRedirectQuery::new()).await;
    let req = test::TestRequest::post()
        .uri("/confirm-redirect")
        .set_json(json!({ "numero": "+5511911112222" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status().as_u16(), 400);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.get("success"), Some(&json!(false)));
    assert_eq!(
        body.get("details").and_then(|d| d.get("field")),
        Some(&json!("token"))
    );
}

#[actix_web::test]
async fn confirm_redirect_surfaces_token_failures() {
    let cases = [
        (Error::token_expired("token has expired"), 400),
        (Error::token_already_used("token was already confirmed"), 409),
        (Error::invalid_token("token not found"), 404),
    ];

    for (error, expected_status) in cases {
        let mut command = MockRedirectCommand::new();
        {
            let error = error.clone();
            command
                .expect_confirm_reservation()
                .times(1)
                .returning(move |_| Err(error.clone()));
        }

        let app = init_app(command, MockRedirectQuery::new()).await;
        let req = test::TestRequest::post()
            .uri("/confirm-redirect")
            .set_json(json!({
                "token": "b".repeat(64),
                "numero": "+5511911112222",
            }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status().as_u16(), expected_status);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body.get("success"), Some(&json!(false)));
    }
}

#[actix_web::test]
async fn redirect_stats_reports_the_balance() {
    let mut query = MockRedirectQuery::new();
    query
        .expect_today_balance()
        .withf(|request| request.platform.as_str() == "whatsapp")
        .times(1)
        .returning(|request| {
            Ok(TodayBalanceResponse {
                platform: request.platform,
                consultants: vec![
                    ConsultantBalancePayload {
                        id: Uuid::new_v4(),
                        name: "ana".to_owned(),
                        contact_number: "+5511911112222".to_owned(),
                        today: 3,
                    },
                    ConsultantBalancePayload {
                        id: Uuid::new_v4(),
                        name: "bruno".to_owned(),
                        contact_number: "+5511933334444".to_owned(),
                        today: 2,
                    },
                ],
                min: 2,
                max: 3,
                spread: 1,
            })
        });

    let app = init_app(MockRedirectCommand::new(), query).await;
    let req = test::TestRequest::get().uri("/redirect-stats").to_request();
    let res = test::call_service(&app, req).await;

    assert!(res.status().is_success());
    let body: Value = test::read_body_json(res).await;
    let data = body.get("data").expect("data object");
    assert_eq!(data.get("plataforma"), Some(&json!("whatsapp")));
    assert_eq!(data.get("hoje_min"), Some(&json!(2)));
    assert_eq!(data.get("hoje_max"), Some(&json!(3)));
    assert_eq!(data.get("diferenca"), Some(&json!(1)));
    assert_eq!(
        data.get("consultores")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(2)
    );
}
