use crate::error::SiteError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A checksummed ORCID iD in its canonical `dddd-dddd-dddd-dddX` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrcidId(String);

impl OrcidId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrcidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ISO 7064 MOD 11-2 over the first 15 digits.
fn check_digit(digits: &[u32]) -> char {
    let total = digits.iter().fold(0u32, |acc, d| (acc + d) * 2);
    match (12 - total % 11) % 11 {
        10 => 'X',
        r => char::from_digit(r, 10).unwrap_or('?'),
    }
}

impl FromStr for OrcidId {
    type Err = SiteError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let s = raw.trim();
        let s = s
            .strip_prefix("https://orcid.org/")
            .or_else(|| s.strip_prefix("http://orcid.org/"))
            .unwrap_or(s);
        let invalid = || SiteError::InvalidOrcid(raw.to_string());

        let groups: Vec<&str> = s.split('-').collect();
        if !s.is_ascii() || groups.len() != 4 || groups.iter().any(|g| g.len() != 4) {
            return Err(invalid());
        }
        let compact: Vec<char> = groups.concat().chars().collect();
        let (body, last) = compact.split_at(15);
        let digits = body
            .iter()
            .map(|c| c.to_digit(10))
            .collect::<Option<Vec<u32>>>()
            .ok_or_else(invalid)?;
        let last = last[0].to_ascii_uppercase();
        if check_digit(&digits) != last {
            return Err(invalid());
        }
        Ok(OrcidId(s.to_ascii_uppercase()))
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct WorksResponse {
    #[serde(default)]
    pub group: Vec<WorkGroup>,
}

#[derive(Debug, Deserialize, Default)]
pub struct WorkGroup {
    #[serde(rename = "work-summary", default)]
    pub work_summary: Vec<WorkSummary>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct WorkSummary {
    pub put_code: i64,
    #[serde(default)]
    pub title: Option<TitleBlock>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TitleBlock {
    #[serde(default)]
    pub title: Option<Value>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Value {
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct WorkDetail {
    #[serde(default)]
    pub put_code: Option<i64>,
    #[serde(default)]
    pub title: Option<TitleBlock>,
    #[serde(default)]
    pub publication_date: Option<PublicationDate>,
    #[serde(default)]
    pub contributors: Option<Contributors>,
    #[serde(default)]
    pub journal_title: Option<Value>,
    #[serde(default)]
    pub external_ids: Option<ExternalIds>,
    #[serde(default)]
    pub citation: Option<Citation>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PublicationDate {
    #[serde(default)]
    pub year: Option<Value>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Contributors {
    #[serde(default)]
    pub contributor: Vec<Contributor>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct Contributor {
    #[serde(default)]
    pub credit_name: Option<Value>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ExternalIds {
    #[serde(rename = "external-id", default)]
    pub external_id: Vec<ExternalId>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ExternalId {
    #[serde(default)]
    pub external_id_type: Option<String>,
    #[serde(default)]
    pub external_id_value: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct Citation {
    #[serde(default)]
    pub citation_type: Option<String>,
    #[serde(default)]
    pub citation_value: Option<String>,
}

impl TitleBlock {
    pub fn text(&self) -> Option<&str> {
        self.title.as_ref().and_then(|v| v.value.as_deref())
    }
}

impl WorkDetail {
    pub fn title_text(&self) -> Option<&str> {
        self.title.as_ref().and_then(TitleBlock::text)
    }

    pub fn year_text(&self) -> Option<&str> {
        self.publication_date
            .as_ref()
            .and_then(|d| d.year.as_ref())
            .and_then(|y| y.value.as_deref())
    }

    pub fn journal_text(&self) -> Option<&str> {
        self.journal_title.as_ref().and_then(|j| j.value.as_deref())
    }

    pub fn credit_names(&self) -> Vec<String> {
        self.contributors
            .as_ref()
            .map(|c| {
                c.contributor
                    .iter()
                    .filter_map(|c| c.credit_name.as_ref()?.value.clone())
                    .filter(|n| !n.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}
