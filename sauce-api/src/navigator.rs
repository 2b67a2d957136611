//! Walks the portal's page hierarchy: events → sheets → assignments → lessons. Each step turns one
//! page into a [`LinkMap`] from display names to the next level's URLs.

use itertools::Itertools;
use scraper::{ElementRef, Html};
use tracing::debug;
use url::Url;

use crate::client::{Auth, Client, ClientState};
use crate::error::{Error, LayoutError, Result};
use crate::links::LinkMap;
use crate::portal::*;
use crate::util::{following, href, link_map, own_text, text};

fn missing(page: &'static str, marker: &'static str) -> LayoutError {
    LayoutError::MissingElement { page, marker }
}

/// Event overview: the `dl` after the "Current events:" heading.
pub fn parse_events(document: &Html, portal: &Portal) -> Result<LinkMap> {
    let heading = document
        .select(&H2)
        .find(|h2| text(*h2) == CURRENT_EVENTS_HEADING)
        .ok_or(missing(EVENTS_PAGE, CURRENT_EVENTS_HEADING))?;
    let list = following(document, heading, &DL).ok_or(missing(EVENTS_PAGE, DL.css()))?;

    link_map(list.select(&A), portal, |label| label)
}

/// Event page: the plain `nav` list, whose first links lead back to the event itself.
pub fn parse_sheets(document: &Html, portal: &Portal) -> Result<LinkMap> {
    let nav = document
        .select(&NAV_LIST)
        .find(|ul| is_plain_nav(*ul))
        .ok_or(missing(EVENT_PAGE, NAV_LIST.css()))?;

    link_map(nav.select(&A).skip(SHEET_NAV_SKIP), portal, |label| label)
}

fn is_plain_nav(ul: ElementRef) -> bool {
    ul.value()
        .classes()
        .exactly_one()
        .is_ok_and(|class| class == SHEET_NAV_CLASS)
}

/// Sheet assignment list: the `dl` after the page header.
pub fn parse_assignments(document: &Html, portal: &Portal) -> Result<LinkMap> {
    let header = document
        .select(&PAGE_HEADER)
        .next()
        .ok_or(missing(SHEET_PAGE, PAGE_HEADER.css()))?;
    let list = following(document, header, &DL).ok_or(missing(SHEET_PAGE, DL.css()))?;

    link_map(list.select(&A), portal, |label| label)
}

/// Assignment page sidebar: lesson links under the "Lessons" header. Link texts look like
/// `Lesson 3: Tue 10-12`; only the part before the colon is kept.
pub fn parse_lessons(document: &Html, portal: &Portal) -> Result<LinkMap> {
    let header = document
        .select(&NAV_HEADER)
        .find(|li| text(*li) == LESSONS_HEADER)
        .ok_or(missing(ASSIGNMENT_PAGE, NAV_HEADER.css()))?;
    let container = header
        .parent()
        .and_then(ElementRef::wrap)
        .ok_or(missing(ASSIGNMENT_PAGE, NAV_HEADER.css()))?;

    link_map(container.select(&LESSON_LINK), portal, |label| {
        label
            .split(LESSON_LABEL_SEPARATOR)
            .next()
            .unwrap_or(label)
    })
}

/// Event page, authenticated view: the first list item whose own text mentions `lesson` and the
/// first link after it. Returns the URL of that lesson's submissions listing.
pub fn parse_event_lesson(document: &Html, portal: &Portal, lesson: &str) -> Result<Url> {
    let item = document
        .select(&LI)
        .find(|li| own_text(*li).contains(lesson))
        .ok_or_else(|| Error::NotFound {
            kind: "lesson",
            name: lesson.to_owned(),
        })?;
    let link = following(document, item, &A).ok_or(missing(EVENT_PAGE, A.css()))?;
    let lesson_url = portal.resolve(href(link, "a")?)?;

    append_path(&lesson_url, SUBMISSIONS_SUFFIX)
}

impl<State: ClientState> Client<State> {
    #[tracing::instrument(skip(self), err)]
    pub async fn get_events(&self) -> Result<LinkMap> {
        let page = self.get_html(&self.portal().events_url()?).await?;
        let events = parse_events(&page, self.portal())?;
        debug!(count = events.len(), "found events");
        Ok(events)
    }

    #[tracing::instrument(skip_all, fields(%event_url), err)]
    pub async fn get_sheets(&self, event_url: &Url) -> Result<LinkMap> {
        let page = self.get_html(event_url).await?;
        let sheets = parse_sheets(&page, self.portal())?;
        debug!(count = sheets.len(), "found sheets");
        Ok(sheets)
    }

    #[tracing::instrument(skip_all, fields(%sheet_url), err)]
    pub async fn get_assignments(&self, sheet_url: &Url) -> Result<LinkMap> {
        let url = append_path(sheet_url, ASSIGNMENTS_SUFFIX)?;
        let page = self.get_html(&url).await?;
        let assignments = parse_assignments(&page, self.portal())?;
        debug!(count = assignments.len(), "found assignments");
        Ok(assignments)
    }
}

impl Client<Auth> {
    /// Lesson links are only shown to students enrolled in them, so this needs a session.
    #[tracing::instrument(skip_all, fields(%assignment_url), err)]
    pub async fn get_lessons(&self, assignment_url: &Url) -> Result<LinkMap> {
        let page = self.get_html(assignment_url).await?;
        let lessons = parse_lessons(&page, self.portal())?;
        debug!(count = lessons.len(), "found lessons");
        Ok(lessons)
    }

    #[tracing::instrument(skip_all, fields(%event_url, lesson), err)]
    pub async fn get_event_lesson_url(&self, event_url: &Url, lesson: &str) -> Result<Url> {
        let page = self.get_html(event_url).await?;
        parse_event_lesson(&page, self.portal(), lesson)
    }
}
