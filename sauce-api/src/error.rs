use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("authentication failed")]
    Auth(#[from] AuthError),

    #[error("could not fetch {url}")]
    Fetch {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("portal layout mismatch")]
    Layout(#[from] LayoutError),

    #[error("could not find {kind} \"{name}\"")]
    NotFound { kind: &'static str, name: String },

    #[error("could not write `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("invalid URL")]
    Url(#[from] url::ParseError),
}

/// Failures of the SAML login handshake. Kept apart from [`Error::Fetch`] so callers can tell a
/// bad password from a flaky page load.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity provider answered the credential form with status {status}")]
    Rejected { status: StatusCode },

    #[error("identity provider response carried no SAML assertion")]
    MissingAssertion,

    #[error("service provider rejected the SAML assertion with status {status}")]
    RelayRejected { status: StatusCode },

    #[error("network failure during login")]
    Transport(#[from] reqwest::Error),
}

/// The page did not have the shape the portal schema expects.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("{page} page has no element matching `{marker}`")]
    MissingElement {
        page: &'static str,
        marker: &'static str,
    },

    #[error("`{element}` has no `{attribute}` attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("could not read {field} from \"{value}\"")]
    InvalidValue { field: &'static str, value: String },
}
