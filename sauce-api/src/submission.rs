use std::fmt;

use scraper::{ElementRef, Html};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::client::{Auth, Client};
use crate::error::{LayoutError, Result};
use crate::portal::*;
use crate::util::{href, text};

#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubmissionId {
    id: String,
}

impl SubmissionId {
    pub fn new(id: String) -> Self {
        Self { id }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.id.fmt(f)
    }
}

/// One row of a submissions listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    id: SubmissionId,
    user: String,
    team: String,
    assignment: String,
    language: String,
    created: String,
    modified: String,
    grade: f64,
    judgement: bool,
    result: String,
    judgement_url: Url,
    delete_url: Url,
    show_url: Url,
    root_url: Url,
}

impl Submission {
    fn from_row(row: Row, portal: &Portal) -> Result<Self> {
        let show_url = portal.resolve(href(row.find(&SHOW_LINK)?, SHOW_LINK.css())?)?;
        let root_url = strip_show_suffix(&show_url)?;

        let judgement_link = row.find(&JUDGEMENT_LINK)?;
        let judgement = text(judgement_link) == JUDGEMENT_YES;
        let judgement_url = portal.resolve(href(judgement_link, JUDGEMENT_LINK.css())?)?;

        let delete_url = portal.resolve(href(row.find(&DELETE_LINK)?, DELETE_LINK.css())?)?;

        Ok(Self {
            id: SubmissionId::new(row.text(&ID_CELL)?),
            user: row.text(&USER_CELL)?,
            team: row.text(&TEAM_CELL)?,
            assignment: row.text(&ASSIGNMENT_LINK)?,
            language: row.text(&LANGUAGE_CELL)?,
            created: row.text(&CREATED_CELL)?,
            modified: row.text(&MODIFIED_CELL)?,
            grade: row.grade()?,
            judgement,
            result: row.text(&RESULT_SPAN)?,
            judgement_url,
            delete_url,
            show_url,
            root_url,
        })
    }

    pub fn id(&self) -> &SubmissionId {
        &self.id
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn team(&self) -> &str {
        &self.team
    }

    pub fn assignment(&self) -> &str {
        &self.assignment
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn created(&self) -> &str {
        &self.created
    }

    pub fn modified(&self) -> &str {
        &self.modified
    }

    pub fn grade(&self) -> f64 {
        self.grade
    }

    /// Whether the portal's automated judgement ran and reported "Yes".
    pub fn judgement(&self) -> bool {
        self.judgement
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn judgement_url(&self) -> &Url {
        &self.judgement_url
    }

    pub fn delete_url(&self) -> &Url {
        &self.delete_url
    }

    pub fn show_url(&self) -> &Url {
        &self.show_url
    }

    pub fn root_url(&self) -> &Url {
        &self.root_url
    }

    /// Where the submitted source can be fetched verbatim.
    pub fn download_url(&self) -> Result<Url> {
        append_path(&self.root_url, DOWNLOAD_SUFFIX)
    }
}

impl fmt::Display for Submission {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "#{} {} ({}) {} [{}] {}: {}",
            self.id, self.user, self.team, self.assignment, self.language, self.result, self.grade
        )
    }
}

// Relies on `SHOW_SUFFIX_LEN`; a show link of any other shape yields a wrong root URL.
fn strip_show_suffix(show_url: &Url) -> Result<Url> {
    let raw = show_url.as_str();
    let root = raw
        .len()
        .checked_sub(SHOW_SUFFIX_LEN)
        .and_then(|end| raw.get(..end))
        .ok_or_else(|| LayoutError::InvalidValue {
            field: "show URL",
            value: raw.to_owned(),
        })?;
    Ok(Url::parse(root)?)
}

#[derive(Clone, Copy)]
struct Row<'a> {
    element: ElementRef<'a>,
}

impl<'a> Row<'a> {
    fn find(&self, marker: &Marker) -> Result<ElementRef<'a>, LayoutError> {
        self.element
            .select(marker)
            .next()
            .ok_or(LayoutError::MissingElement {
                page: SUBMISSIONS_PAGE,
                marker: marker.css(),
            })
    }

    fn text(&self, marker: &Marker) -> Result<String, LayoutError> {
        self.find(marker).map(text)
    }

    /// Ungraded submissions have no grade badge; they count as zero.
    fn grade(&self) -> Result<f64, LayoutError> {
        match self.element.select(&GRADE_SPAN).next() {
            Some(span) => {
                let raw = text(span);
                raw.parse().map_err(|_| LayoutError::InvalidValue {
                    field: "grade",
                    value: raw,
                })
            }
            None => Ok(0.0),
        }
    }
}

/// Extracts every row of the listing's table body, in page order.
pub fn parse_submissions(document: &Html, portal: &Portal) -> Result<Vec<Submission>> {
    let body = document
        .select(&TABLE_BODY)
        .next()
        .ok_or(LayoutError::MissingElement {
            page: SUBMISSIONS_PAGE,
            marker: TABLE_BODY.css(),
        })?;

    body.select(&TABLE_ROW)
        .map(|element| Submission::from_row(Row { element }, portal))
        .collect()
}

impl Client<Auth> {
    #[tracing::instrument(skip_all, fields(%listing_url), err)]
    pub async fn get_submissions(&self, listing_url: &Url) -> Result<Vec<Submission>> {
        let page = self.get_html(listing_url).await?;
        let submissions = parse_submissions(&page, self.portal())?;
        debug!(count = submissions.len(), "parsed submissions");
        Ok(submissions)
    }
}
