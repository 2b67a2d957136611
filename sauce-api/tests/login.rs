mod common;

use mockito::{Matcher, Server};
use reqwest::StatusCode;
use sauce_api::client::Client;
use sauce_api::portal::Portal;
use sauce_api::{AuthError, Error};
use url::Url;

use common::*;

#[tokio::test]
async fn login_relays_assertion_and_keeps_session_cookie() {
    let mut server = Server::new_async().await;
    let (sauce, mocks) = logged_in(&mut server).await;

    let lessons_page = server
        .mock("GET", "/events/7/sheets/5/assignments/31")
        .match_header("cookie", Matcher::Regex(SESSION_COOKIE.into()))
        .with_body(
            r#"<ul class="nav nav-list">
                 <li class="nav-header">Lessons</li>
                 <li><a href="/events/7/lessons/2/submissions">Lesson 2: Di 10-12</a></li>
               </ul>"#,
        )
        .create_async()
        .await;

    let lessons = sauce
        .get_lessons(&url(&server, "/events/7/sheets/5/assignments/31"))
        .await
        .unwrap();

    assert_eq!(lessons.labels().collect::<Vec<_>>(), ["Lesson 2"]);
    for mock in mocks {
        mock.assert_async().await;
    }
    lessons_page.assert_async().await;
}

#[tokio::test]
async fn rejected_credentials_skip_relay() {
    let mut server = Server::new_async().await;
    let _entry = login_entry(&mut server).await;
    let _credentials = server
        .mock("POST", "/adfs/ls/")
        .match_query(Matcher::Any)
        .with_status(401)
        .create_async()
        .await;
    let relay = server
        .mock("POST", "/Shibboleth.sso/SAML2/POST")
        .expect(0)
        .create_async()
        .await;

    let err = client(&server).login(&creds()).await.unwrap_err();

    match err {
        Error::Auth(AuthError::Rejected { status }) => {
            assert_eq!(status, StatusCode::UNAUTHORIZED)
        }
        other => panic!("expected rejected credentials, got {other:?}"),
    }
    relay.assert_async().await;
}

#[tokio::test]
async fn only_ok_counts_as_accepted_credentials() {
    let mut server = Server::new_async().await;
    let _entry = login_entry(&mut server).await;
    let _credentials = server
        .mock("POST", "/adfs/ls/")
        .match_query(Matcher::Any)
        .with_status(204)
        .create_async()
        .await;
    let relay = server
        .mock("POST", "/Shibboleth.sso/SAML2/POST")
        .expect(0)
        .create_async()
        .await;

    let err = client(&server).login(&creds()).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Auth(AuthError::Rejected { status }) if status == StatusCode::NO_CONTENT
    ));
    relay.assert_async().await;
}

#[tokio::test]
async fn login_form_without_assertion_is_auth_error() {
    let mut server = Server::new_async().await;
    let _entry = login_entry(&mut server).await;
    let _credentials = server
        .mock("POST", "/adfs/ls/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"<form><span id="errorText">Incorrect user ID or password.</span></form>"#)
        .create_async()
        .await;
    let relay = server
        .mock("POST", "/Shibboleth.sso/SAML2/POST")
        .expect(0)
        .create_async()
        .await;

    let err = client(&server).login(&creds()).await.unwrap_err();

    assert!(matches!(err, Error::Auth(AuthError::MissingAssertion)));
    relay.assert_async().await;
}

#[tokio::test]
async fn rejected_assertion_is_auth_error() {
    let mut server = Server::new_async().await;
    let _entry = login_entry(&mut server).await;
    let _credentials = server
        .mock("POST", "/adfs/ls/")
        .match_query(Matcher::Any)
        .with_body(assertion_form())
        .create_async()
        .await;
    let _relay = server
        .mock("POST", "/Shibboleth.sso/SAML2/POST")
        .with_status(500)
        .create_async()
        .await;

    let err = client(&server).login(&creds()).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Auth(AuthError::RelayRejected { status })
            if status == StatusCode::INTERNAL_SERVER_ERROR
    ));
}

#[tokio::test]
async fn unreachable_portal_is_auth_transport_error() {
    let portal = Portal::new(Url::parse("http://127.0.0.1:9").unwrap());
    let sauce = Client::new(portal, &settings()).unwrap();

    let err = sauce.login(&creds()).await.unwrap_err();

    assert!(matches!(err, Error::Auth(AuthError::Transport(_))));
}
