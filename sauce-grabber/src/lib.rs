use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sauce_api::client::{Auth, Client};
use sauce_api::download::sanitize;
use sauce_api::score::ScoreLedger;
use sauce_api::submission::Submission;
use tracing::{info, warn};
use url::Url;

/// The signed-in student's submissions for `lesson` of `event`, found through the event page.
#[tracing::instrument(skip(sauce), err)]
pub async fn own_submissions(
    sauce: &Client<Auth>,
    event: &str,
    lesson: &str,
) -> Result<Vec<Submission>> {
    let events = sauce.get_events().await.context("could not list events")?;
    let event_url = events.find("event", event)?;

    let listing_url = sauce
        .get_event_lesson_url(event_url, lesson)
        .await
        .with_context(|| format!("could not find \"{lesson}\" on the page of \"{event}\""))?;
    let submissions = sauce
        .get_submissions(&listing_url)
        .await
        .context("could not read submissions")?;

    info!(count = submissions.len(), "found submissions");
    Ok(submissions)
}

pub async fn scores(sauce: &Client<Auth>, event: &str, lesson: &str) -> Result<ScoreLedger> {
    let submissions = own_submissions(sauce, event, lesson).await?;
    Ok(ScoreLedger::from_submissions(&submissions))
}

/// Submissions to one assignment, as listed for `lesson`.
pub async fn assignment_submissions(
    sauce: &Client<Auth>,
    assignment_url: &Url,
    lesson: &str,
) -> Result<Vec<Submission>> {
    let lessons = sauce.get_lessons(assignment_url).await?;
    let listing_url = lessons.find("lesson", lesson)?;
    let submissions = sauce.get_submissions(listing_url).await?;
    Ok(submissions)
}

/// `<root>/<event>/<sheet>/<assignment>/<team>`, each segment below `root` sanitised.
pub fn submission_dir(
    root: &Path,
    event: &str,
    sheet: &str,
    assignment: &str,
    team: &str,
) -> PathBuf {
    [event, sheet, assignment, team]
        .into_iter()
        .fold(root.to_owned(), |dir, segment| dir.join(sanitize(segment)))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub failed: usize,
}

/// Downloads every submission of every assignment on one sheet. A submission that cannot be
/// fetched or written is logged and counted, and the run carries on; failing to read any of the
/// portal's pages aborts it.
#[tracing::instrument(skip(sauce, root), err)]
pub async fn download_sheet(
    sauce: &Client<Auth>,
    event: &str,
    sheet: &str,
    lesson: &str,
    root: &Path,
) -> Result<DownloadSummary> {
    let events = sauce.get_events().await.context("could not list events")?;
    let event_url = events.find("event", event)?;
    let sheets = sauce.get_sheets(event_url).await?;
    let sheet_url = sheets.find("sheet", sheet)?;
    let assignments = sauce.get_assignments(sheet_url).await?;

    let mut summary = DownloadSummary::default();
    for (assignment, assignment_url) in assignments.iter() {
        info!(assignment, "downloading submissions for assignment");

        let submissions = assignment_submissions(sauce, assignment_url, lesson)
            .await
            .with_context(|| format!("could not list submissions for \"{assignment}\""))?;

        for submission in &submissions {
            let dir = submission_dir(root, event, sheet, assignment, submission.team());
            match sauce.download_submission(submission, &dir).await {
                Ok(_) => summary.downloaded += 1,
                Err(err) => {
                    warn!(id = %submission.id(), error = %err, "could not download submission");
                    summary.failed += 1;
                }
            }
        }
    }

    info!(?summary, "download finished");
    Ok(summary)
}
