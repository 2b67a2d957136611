use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::client::{Auth, Client};
use crate::error::{Error, Result};
use crate::submission::Submission;

pub const SOURCE_EXTENSION: &str = "java";

/// Removes whitespace and commas, which the portal allows in names and ids but which make awkward
/// path segments.
pub fn sanitize(segment: &str) -> String {
    segment
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect()
}

/// `<user><id>.java`, sanitised.
pub fn submission_file_name(submission: &Submission) -> String {
    let stem = format!("{}{}", submission.user(), submission.id());
    format!("{}.{SOURCE_EXTENSION}", sanitize(&stem))
}

pub fn submission_path(dir: &Path, submission: &Submission) -> PathBuf {
    dir.join(submission_file_name(submission))
}

impl Client<Auth> {
    /// Fetches the submitted source and writes it to `dir`, creating `dir` if needed and replacing
    /// any file already there. The file is written in place, so an interrupted write leaves a
    /// truncated file behind.
    #[tracing::instrument(skip_all, fields(id = %submission.id(), dir = %dir.display()), err)]
    pub async fn download_submission(
        &self,
        submission: &Submission,
        dir: &Path,
    ) -> Result<PathBuf> {
        let content = self.get_bytes(&submission.download_url()?).await?;

        fs::create_dir_all(dir).await.map_err(|source| Error::Io {
            path: dir.to_owned(),
            source,
        })?;

        let path = submission_path(dir, submission);
        fs::write(&path, &content).await.map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), bytes = content.len(), "downloaded submission");
        Ok(path)
    }
}
