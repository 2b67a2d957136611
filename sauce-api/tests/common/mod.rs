#![allow(dead_code)]

use std::time::Duration;

use mockito::{Matcher, Mock, ServerGuard};
use sauce_api::client::{Auth, Client, ClientSettings, Init};
use sauce_api::creds::Creds;
use sauce_api::portal::Portal;
use url::Url;

pub const ASSERTION: &str = "PHNhbWxwOlJlc3BvbnNlIElEPSJfMSI+";
pub const SESSION_COOKIE: &str = "_shibsession_sauce=c0ffee";

pub fn settings() -> ClientSettings {
    ClientSettings {
        request_delay: Duration::ZERO,
        ..ClientSettings::default()
    }
}

pub fn portal(server: &ServerGuard) -> Portal {
    Portal::new(Url::parse(&server.url()).unwrap())
}

pub fn client(server: &ServerGuard) -> Client<Init> {
    Client::new(portal(server), &settings()).unwrap()
}

pub fn creds() -> Creds {
    Creds::new("jdoe".to_owned(), "secret".to_owned())
}

pub fn url(server: &ServerGuard, path: &str) -> Url {
    portal(server).resolve(path).unwrap()
}

/// The login entry point redirects to the identity provider's form.
pub async fn login_entry(server: &mut ServerGuard) -> Vec<Mock> {
    let entry = server
        .mock("GET", "/login")
        .match_query(Matcher::UrlEncoded("came_from".into(), "/".into()))
        .with_status(302)
        .with_header("location", "/adfs/ls/?SAMLRequest=fZJBT8Mw")
        .create_async()
        .await;
    let form = server
        .mock("GET", "/adfs/ls/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"<form method="post"><input name="UserName"></form>"#)
        .create_async()
        .await;
    vec![entry, form]
}

pub fn credential_form() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("UserName".into(), "jdoe@UNI-MAINZ".into()),
        Matcher::UrlEncoded("Password".into(), "secret".into()),
        Matcher::UrlEncoded("Kmsi".into(), "true".into()),
        Matcher::UrlEncoded("AuthMethod".into(), "FormsAuthentication".into()),
    ])
}

pub fn assertion_form() -> String {
    format!(
        r#"<html><body onload="document.forms[0].submit()">
             <form method="post" action="/Shibboleth.sso/SAML2/POST">
               <input type="hidden" name="SAMLResponse" value="{ASSERTION}" />
             </form>
           </body></html>"#
    )
}

/// Mocks a complete, successful handshake.
pub async fn identity_provider(server: &mut ServerGuard) -> Vec<Mock> {
    let mut mocks = login_entry(server).await;
    mocks.push(
        server
            .mock("POST", "/adfs/ls/")
            .match_query(Matcher::Any)
            .match_body(credential_form())
            .with_status(200)
            .with_body(assertion_form())
            .create_async()
            .await,
    );
    mocks.push(
        server
            .mock("POST", "/Shibboleth.sso/SAML2/POST")
            .match_body(Matcher::UrlEncoded("SAMLResponse".into(), ASSERTION.into()))
            .with_status(200)
            .with_header("set-cookie", &format!("{SESSION_COOKIE}; Path=/"))
            .create_async()
            .await,
    );
    mocks
}

pub async fn logged_in(server: &mut ServerGuard) -> (Client<Auth>, Vec<Mock>) {
    let mocks = identity_provider(server).await;
    let client = client(server).login(&creds()).await.unwrap();
    (client, mocks)
}

pub const LISTING: &str = r#"
<html><body>
  <table>
    <thead><tr><th class="col_1">Id</th><th class="col_10">Grade</th></tr></thead>
    <tbody>
      <tr>
        <td class="col_0">
          <a href="/submissions/4711/show" title="Show">show</a>
          <a href="/submissions/4711/delete" class="btn btn-danger">delete</a>
        </td>
        <td class="col_1">4711</td>
        <td class="col_2">J Doe</td>
        <td class="col_3">Team 3</td>
        <td class="col_4"><a href="/assignments/31">Aufgabe 1</a></td>
        <td class="col_5">Java</td>
        <td class="col_6">2016-05-02 14:03:11</td>
        <td class="col_7">2016-05-03 09:12:45</td>
        <td class="col_8"><span>ok</span></td>
        <td class="col_9"><a href="/submissions/4711/judgement">Yes</a></td>
        <td class="col_10"><span>8.5</span></td>
      </tr>
      <tr>
        <td class="col_0">
          <a href="/submissions/4712/show" title="Show">show</a>
          <a href="/submissions/4712/delete" class="btn btn-danger">delete</a>
        </td>
        <td class="col_1">4712</td>
        <td class="col_2">J Doe</td>
        <td class="col_3">Team 3</td>
        <td class="col_4"><a href="/assignments/31">Aufgabe 1</a></td>
        <td class="col_5">Java</td>
        <td class="col_6">2016-05-04 10:00:00</td>
        <td class="col_7">2016-05-04 10:00:00</td>
        <td class="col_8"><span>fail</span></td>
        <td class="col_9"><a href="/submissions/4712/judgement">No</a></td>
        <td class="col_10"></td>
      </tr>
    </tbody>
  </table>
</body></html>
"#;
