//! HTML builders for tests, shaped like the portal's submissions listing.

use scraper::Html;

use crate::portal::Portal;
use crate::submission::{Submission, parse_submissions};

#[derive(Debug, Clone)]
pub struct RowFixture {
    id: String,
    user: String,
    team: String,
    grade: Option<String>,
    judgement: String,
}

impl RowFixture {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            user: "Max Mustermann".to_owned(),
            team: "Team 1".to_owned(),
            grade: None,
            judgement: "No".to_owned(),
        }
    }

    pub fn user(mut self, user: &str) -> Self {
        self.user = user.to_owned();
        self
    }

    pub fn team(mut self, team: &str) -> Self {
        self.team = team.to_owned();
        self
    }

    pub fn grade(mut self, grade: &str) -> Self {
        self.grade = Some(grade.to_owned());
        self
    }

    pub fn judgement(mut self, judgement: &str) -> Self {
        self.judgement = judgement.to_owned();
        self
    }

    fn html(&self) -> String {
        // The portal puts a comma inside multi-part ids; keep the raw id out of the URL.
        let slug: String = self.id.chars().filter(char::is_ascii_digit).collect();
        let grade = self
            .grade
            .as_ref()
            .map(|grade| format!(r#"<span class="badge">{grade}</span>"#))
            .unwrap_or_default();

        format!(
            r#"
            <tr>
              <td class="col_0">
                <a href="/submissions/{slug}/show" title="Show">show</a>
                <a href="/submissions/{slug}/edit" title="Edit">edit</a>
                <a href="/submissions/{slug}/delete" class="btn btn-danger">delete</a>
              </td>
              <td class="col_1">{id}</td>
              <td class="col_2">{user}</td>
              <td class="col_3">{team}</td>
              <td class="col_4"><a href="/events/7/sheets/5/assignments/31">Aufgabe 1</a></td>
              <td class="col_5">Java</td>
              <td class="col_6">2016-05-02 14:03:11</td>
              <td class="col_7">2016-05-03 09:12:45</td>
              <td class="col_8"><span class="label label-success">ok</span></td>
              <td class="col_9"><a href="/submissions/{slug}/judgement">{judgement}</a></td>
              <td class="col_10">{grade}</td>
            </tr>
            "#,
            id = self.id,
            user = self.user,
            team = self.team,
            judgement = self.judgement,
        )
    }
}

pub fn listing(rows: &[RowFixture]) -> String {
    let rows: String = rows.iter().map(RowFixture::html).collect();
    format!(
        r#"
        <html><body>
          <table class="table">
            <thead>
              <tr>
                <th class="col_0"></th><th class="col_1">Id</th><th class="col_2">User</th>
                <th class="col_3">Team</th><th class="col_4">Assignment</th>
                <th class="col_5">Language</th><th class="col_6">Created</th>
                <th class="col_7">Modified</th><th class="col_8">Result</th>
                <th class="col_9">Judgement</th><th class="col_10">Grade</th>
              </tr>
            </thead>
            <tbody>{rows}</tbody>
          </table>
        </body></html>
        "#
    )
}

pub fn submissions(rows: &[RowFixture]) -> Vec<Submission> {
    parse_submissions(&Html::parse_document(&listing(rows)), &Portal::default()).unwrap()
}
