use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::filter::FilterError;

/// Anything that can sit in a triage deck.
pub trait Listing {
    fn id(&self) -> &str;

    /// Text attributes the free-text search looks at.
    fn search_fields(&self) -> Vec<&str>;

    /// One-line label for lists and logs.
    fn headline(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Seeker,   // browses jobs
    Employer, // browses candidates
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Seeker => "seeker",
            Role::Employer => "employer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "seeker" | "jobs" => Ok(Role::Seeker),
            "employer" | "candidates" => Ok(Role::Employer),
            _ => Err(FilterError::UnknownRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company_name: String,
    pub company_industry: Option<String>,
    pub location: Option<String>,
    pub pay_range: Option<String>,
    pub job_type: Option<String>, // "Full-time", "Contract", "Part-time"
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub applicant_count: u32,
}

impl Job {
    /// Company shown before the job is unlocked. Anonymous postings hide the name.
    pub fn public_company(&self) -> String {
        if self.is_anonymous {
            format!(
                "[{} Business]",
                self.company_industry.as_deref().unwrap_or("Local")
            )
        } else {
            self.company_name.clone()
        }
    }
}

impl Listing for Job {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        if let Some(location) = &self.location {
            fields.push(location);
        }
        fields
    }

    fn headline(&self) -> String {
        format!("{} | {}", self.title, self.public_company())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    pub skills: Option<Vec<String>>,
    pub industries_interested: Option<Vec<String>>,
    #[serde(default)]
    pub years_experience: YearsOfExperience,
    pub education: Option<String>,
    pub preferred_pay_range: Option<String>,
    pub target_pay: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub display_title: Option<String>,
    pub title_descriptor: Option<String>,
    pub title_primary_skill: Option<String>,
    pub title_secondary_skill: Option<String>,
}

impl Candidate {
    pub fn display_title(&self) -> String {
        if let Some(title) = self.display_title.as_deref().filter(|t| !t.is_empty()) {
            return title.to_string();
        }

        let descriptor = self.title_descriptor.as_deref().unwrap_or("");
        let primary = self.title_primary_skill.as_deref().unwrap_or("");
        let secondary = self.title_secondary_skill.as_deref().unwrap_or("");

        if !descriptor.is_empty() || !primary.is_empty() || !secondary.is_empty() {
            let main = [descriptor, primary]
                .iter()
                .filter(|s| !s.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
            if !secondary.is_empty() {
                return format!("{} & {}", main, secondary);
            }
            return if main.is_empty() {
                "Professional Talent".to_string()
            } else {
                main
            };
        }

        let years = self.years_experience.years();
        let level = if years >= 5.0 {
            "Experienced"
        } else if years >= 2.0 {
            "Intermediate"
        } else if years > 0.0 {
            "Entry-Level"
        } else {
            "Professional"
        };
        let skill = self
            .skills
            .as_ref()
            .and_then(|s| s.first())
            .map(String::as_str)
            .unwrap_or("Specialist");

        format!("{} {}", level, skill)
    }

    pub fn skills(&self) -> &[String] {
        self.skills.as_deref().unwrap_or(&[])
    }
}

impl Listing for Candidate {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = Vec::with_capacity(1 + self.skills().len());
        if let Some(location) = &self.location {
            fields.push(location.as_str());
        }
        fields.extend(self.skills().iter().map(String::as_str));
        fields
    }

    fn headline(&self) -> String {
        format!(
            "{} | {}",
            self.display_title(),
            self.location.as_deref().unwrap_or("?")
        )
    }
}

/// Years of experience as stored: either a number or free text like "7 yrs".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearsOfExperience {
    Number(f64),
    Text(String),
}

impl Default for YearsOfExperience {
    fn default() -> Self {
        YearsOfExperience::Text(String::new())
    }
}

impl YearsOfExperience {
    /// Numeric years. Text yields its first run of digits, or 0 when there is none.
    pub fn years(&self) -> f64 {
        static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

        match self {
            YearsOfExperience::Number(n) if n.is_finite() => *n,
            YearsOfExperience::Number(_) => 0.0,
            YearsOfExperience::Text(s) => DIGITS_RE
                .find(s)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(0.0),
        }
    }
}

impl fmt::Display for YearsOfExperience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearsOfExperience::Number(n) => write!(f, "{}", n),
            YearsOfExperience::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EducationLevel {
    HighSchool,
    VocationalTraining,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    /// Ranks loosely formatted education text. Checked from the highest level down so
    /// "Master's Degree" is never mistaken for something lower.
    pub fn rank_of(text: &str) -> Option<Self> {
        if text.contains("Doctorate") {
            Some(EducationLevel::Doctorate)
        } else if text.contains("Master") {
            Some(EducationLevel::Master)
        } else if text.contains("Bachelor") {
            Some(EducationLevel::Bachelor)
        } else if text.contains("Associate") {
            Some(EducationLevel::Associate)
        } else if text.contains("Vocational") {
            Some(EducationLevel::VocationalTraining)
        } else if text.contains("High School") {
            Some(EducationLevel::HighSchool)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceBucket {
    ZeroToTwo,
    TwoToFive,
    FiveToTen,
    TenPlus,
}

impl ExperienceBucket {
    pub const ALL: [ExperienceBucket; 4] = [
        ExperienceBucket::ZeroToTwo,
        ExperienceBucket::TwoToFive,
        ExperienceBucket::FiveToTen,
        ExperienceBucket::TenPlus,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.label() == label)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceBucket::ZeroToTwo => "0-2 years",
            ExperienceBucket::TwoToFive => "2-5 years",
            ExperienceBucket::FiveToTen => "5-10 years",
            ExperienceBucket::TenPlus => "10+ years",
        }
    }

    pub fn contains(&self, years: f64) -> bool {
        match self {
            ExperienceBucket::ZeroToTwo => years <= 2.0,
            ExperienceBucket::TwoToFive => years > 2.0 && years <= 5.0,
            ExperienceBucket::FiveToTen => years > 5.0 && years <= 10.0,
            ExperienceBucket::TenPlus => years > 10.0,
        }
    }
}
