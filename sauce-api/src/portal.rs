//! Everything that ties this crate to the current markup of the SAUCE portal lives here: URLs,
//! login form fields, CSS selectors, and the fixed column layout of the submissions table. When
//! the portal changes its pages, this is the only module that should need to change.

use std::ops::Deref;

use lazy_static::lazy_static;
use scraper::Selector;
use url::Url;

use crate::error::Result;

pub const BASE_URL: &str = "https://sauce.zdv.uni-mainz.de";

pub const LOGIN_PATH: &str = "/login?came_from=%2F";
pub const ASSERTION_CONSUMER_PATH: &str = "/Shibboleth.sso/SAML2/POST";
pub const EVENTS_PATH: &str = "/events";
pub const ASSIGNMENTS_SUFFIX: &str = "/assignments";
pub const SUBMISSIONS_SUFFIX: &str = "/submissions";
pub const DOWNLOAD_SUFFIX: &str = "/download";

/// Appended to the configured user name before it is sent to the identity provider.
pub const LOGIN_DOMAIN_SUFFIX: &str = "@UNI-MAINZ";
pub const USERNAME_FIELD: &str = "UserName";
pub const PASSWORD_FIELD: &str = "Password";
pub const KEEP_SIGNED_IN_FIELD: &str = "Kmsi";
pub const AUTH_METHOD_FIELD: &str = "AuthMethod";
pub const AUTH_METHOD: &str = "FormsAuthentication";
pub const SAML_RESPONSE_FIELD: &str = "SAMLResponse";

pub const CURRENT_EVENTS_HEADING: &str = "Current events:";
/// The event navigation lists the event overview links before the sheets.
pub const SHEET_NAV_SKIP: usize = 2;
pub const SHEET_NAV_CLASS: &str = "nav";
pub const LESSONS_HEADER: &str = "Lessons";
pub const LESSON_LABEL_SEPARATOR: char = ':';
pub const JUDGEMENT_YES: &str = "Yes";

/// Show links end in `/show`; cutting that off yields the submission's own URL. This assumes every
/// show link has exactly this shape, which the portal does not promise.
pub const SHOW_SUFFIX_LEN: usize = 5;

pub const EVENTS_PAGE: &str = "events";
pub const EVENT_PAGE: &str = "event";
pub const SHEET_PAGE: &str = "sheet";
pub const ASSIGNMENT_PAGE: &str = "assignment";
pub const SUBMISSIONS_PAGE: &str = "submissions";

/// A parsed selector that remembers its source text, so layout errors can say what was missing.
pub struct Marker {
    css: &'static str,
    selector: Selector,
}

impl Marker {
    fn new(css: &'static str) -> Self {
        let selector = Selector::parse(css).unwrap();
        Self { css, selector }
    }

    pub fn css(&self) -> &'static str {
        self.css
    }
}

impl Deref for Marker {
    type Target = Selector;

    fn deref(&self) -> &Selector {
        &self.selector
    }
}

macro_rules! selectors {
    ($name:ident = $x:expr $(,)?) => {
        lazy_static! { pub static ref $name: Marker = Marker::new($x); }
    };

    ($name:ident = $x:expr, $($names:ident = $xs:expr),+ $(,)?) => {
        selectors! { $name = $x }
        selectors! {
            $($names = $xs),+
        }
    };
}

selectors! {
    SAML_RESPONSE_INPUT = "input[name=SAMLResponse]",
    A = "a",
    LI = "li",
    DL = "dl",
    H2 = "h2",
    NAV_LIST = "ul.nav",
    PAGE_HEADER = "div.page-header",
    NAV_HEADER = "li.nav-header",
    LESSON_LINK = "a[href*='/lessons/']",
    TABLE_BODY = "tbody",
    TABLE_ROW = "tr",
    SHOW_LINK = ".col_0 a[title=Show]",
    ID_CELL = ".col_1",
    USER_CELL = ".col_2",
    TEAM_CELL = ".col_3",
    ASSIGNMENT_LINK = ".col_4 a",
    LANGUAGE_CELL = ".col_5",
    CREATED_CELL = ".col_6",
    MODIFIED_CELL = ".col_7",
    RESULT_SPAN = ".col_8 span",
    JUDGEMENT_LINK = ".col_9 a",
    GRADE_SPAN = ".col_10 span",
    DELETE_LINK = "a.btn.btn-danger",
}

/// The portal instance a client talks to. Production code uses [`Portal::default`]; tests point
/// it at a local server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Portal {
    base: Url,
}

impl Portal {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolves a link found on a portal page against the portal's base URL.
    pub fn resolve(&self, href: &str) -> Result<Url> {
        Ok(self.base.join(href)?)
    }

    pub fn login_url(&self) -> Result<Url> {
        self.resolve(LOGIN_PATH)
    }

    pub fn assertion_consumer_url(&self) -> Result<Url> {
        self.resolve(ASSERTION_CONSUMER_PATH)
    }

    pub fn events_url(&self) -> Result<Url> {
        self.resolve(EVENTS_PATH)
    }
}

impl Default for Portal {
    fn default() -> Self {
        Self::new(Url::parse(BASE_URL).unwrap())
    }
}

/// Appends a path suffix to a URL the way the portal builds its sub-pages, e.g.
/// `.../sheets/7` + `/assignments`.
pub fn append_path(url: &Url, suffix: &str) -> Result<Url> {
    let joined = format!("{}{suffix}", url.as_str().trim_end_matches('/'));
    Ok(Url::parse(&joined)?)
}
