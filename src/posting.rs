use thiserror::Error;

use crate::models::Job;
use crate::vocabulary::{INDUSTRIES, JOB_PAY_RANGES, JOB_TYPES, LOCATIONS};

const MIN_DESCRIPTION_CHARS: usize = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostingError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("unknown {field} '{value}' (see `deck filters` for accepted values)")]
    NotInVocabulary { field: &'static str, value: String },
    #[error("description is too short (at least 20 characters)")]
    DescriptionTooShort,
}

/// A job an employer wants to publish, as entered on the command line.
#[derive(Debug, Clone, Default)]
pub struct JobPosting {
    pub title: String,
    pub company_name: String,
    pub industry: String,
    pub location: String,
    pub pay_range: String,
    pub job_type: String,
    pub description: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub is_anonymous: bool,
}

impl JobPosting {
    /// Validates the posting and turns it into a listing with the given id.
    /// Vocabulary fields are matched case-insensitively and stored in their canonical form.
    pub fn into_job(self, id: String) -> Result<Job, PostingError> {
        let title = required("title", &self.title)?;
        let company_name = required("company name", &self.company_name)?;
        let contact_email = required("contact email", &self.contact_email)?;
        let contact_phone = required("contact phone", &self.contact_phone)?;

        let industry = canonical("industry", &self.industry, &INDUSTRIES)?;
        let location = canonical("location", &self.location, &LOCATIONS)?;
        let pay_range = canonical("pay range", &self.pay_range, &JOB_PAY_RANGES)?;
        let job_type = canonical("job type", &self.job_type, &JOB_TYPES)?;

        let description = self.description.trim();
        if description.chars().count() < MIN_DESCRIPTION_CHARS {
            return Err(PostingError::DescriptionTooShort);
        }

        Ok(Job {
            id,
            title,
            company_name,
            company_industry: Some(industry),
            location: Some(location),
            pay_range: Some(pay_range),
            job_type: Some(job_type),
            description: Some(description.to_string()),
            contact_email: Some(contact_email),
            contact_phone: Some(contact_phone),
            is_anonymous: self.is_anonymous,
            applicant_count: 0,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, PostingError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PostingError::Missing(field));
    }
    Ok(value.to_string())
}

fn canonical(field: &'static str, value: &str, allowed: &[&str]) -> Result<String, PostingError> {
    let value = value.trim();
    allowed
        .iter()
        .find(|a| a.eq_ignore_ascii_case(value))
        .map(|a| a.to_string())
        .ok_or_else(|| PostingError::NotInVocabulary {
            field,
            value: value.to_string(),
        })
}
