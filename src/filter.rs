use std::collections::BTreeSet;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::models::{Candidate, EducationLevel, ExperienceBucket, Job, Listing};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error(
        "unknown filter category '{0}' \
         (expected industry, location, pay, experience, education or skill)"
    )]
    UnknownCategory(String),
    #[error("malformed filter '{0}', expected category=value")]
    Malformed(String),
    #[error("unknown role '{0}' (expected seeker or employer)")]
    UnknownRole(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCategory {
    Industries,
    Locations,
    PayRanges,
    ExperienceLevels,
    EducationLevels,
    Skills,
}

impl FilterCategory {
    pub const ALL: [FilterCategory; 6] = [
        FilterCategory::Industries,
        FilterCategory::Locations,
        FilterCategory::PayRanges,
        FilterCategory::ExperienceLevels,
        FilterCategory::EducationLevels,
        FilterCategory::Skills,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FilterCategory::Industries => "industry",
            FilterCategory::Locations => "location",
            FilterCategory::PayRanges => "pay",
            FilterCategory::ExperienceLevels => "experience",
            FilterCategory::EducationLevels => "education",
            FilterCategory::Skills => "skill",
        }
    }
}

impl FromStr for FilterCategory {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "industry" | "industries" => Ok(FilterCategory::Industries),
            "location" | "locations" => Ok(FilterCategory::Locations),
            "pay" | "pay_range" | "pay_ranges" => Ok(FilterCategory::PayRanges),
            "experience" | "experience_levels" => Ok(FilterCategory::ExperienceLevels),
            "education" | "education_levels" => Ok(FilterCategory::EducationLevels),
            "skill" | "skills" => Ok(FilterCategory::Skills),
            _ => Err(FilterError::UnknownCategory(s.to_string())),
        }
    }
}

/// Active filter values per category. An empty category constrains nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub industries: BTreeSet<String>,
    pub locations: BTreeSet<String>,
    pub pay_ranges: BTreeSet<String>,
    pub experience_levels: BTreeSet<String>,
    pub education_levels: BTreeSet<String>,
    pub skills: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self, category: FilterCategory) -> &BTreeSet<String> {
        match category {
            FilterCategory::Industries => &self.industries,
            FilterCategory::Locations => &self.locations,
            FilterCategory::PayRanges => &self.pay_ranges,
            FilterCategory::ExperienceLevels => &self.experience_levels,
            FilterCategory::EducationLevels => &self.education_levels,
            FilterCategory::Skills => &self.skills,
        }
    }

    fn values_mut(&mut self, category: FilterCategory) -> &mut BTreeSet<String> {
        match category {
            FilterCategory::Industries => &mut self.industries,
            FilterCategory::Locations => &mut self.locations,
            FilterCategory::PayRanges => &mut self.pay_ranges,
            FilterCategory::ExperienceLevels => &mut self.experience_levels,
            FilterCategory::EducationLevels => &mut self.education_levels,
            FilterCategory::Skills => &mut self.skills,
        }
    }

    /// Adds the value if absent, removes it if present. Returns whether it is now active.
    pub fn toggle(&mut self, category: FilterCategory, value: &str) -> bool {
        let values = self.values_mut(category);
        if values.remove(value) {
            false
        } else {
            values.insert(value.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        FilterCategory::ALL
            .iter()
            .all(|c| self.values(*c).is_empty())
    }

    pub fn active_count(&self) -> usize {
        FilterCategory::ALL.iter().map(|c| self.values(*c).len()).sum()
    }

    /// Parses a `category=value` pair, as given on the command line, and toggles it on.
    pub fn add_arg(&mut self, arg: &str) -> Result<(), FilterError> {
        let (category, value) = arg
            .split_once('=')
            .ok_or_else(|| FilterError::Malformed(arg.to_string()))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(FilterError::Malformed(arg.to_string()));
        }
        let category: FilterCategory = category.parse()?;
        self.values_mut(category).insert(value.to_string());
        Ok(())
    }
}

pub fn filter_jobs(jobs: &[Job], filters: &FilterSelection, query: &str) -> Vec<Job> {
    let query = query.to_lowercase();
    let result: Vec<Job> = jobs
        .iter()
        .filter(|job| job_matches(job, filters, &query))
        .cloned()
        .collect();
    debug!(total = jobs.len(), matched = result.len(), "filtered jobs");
    result
}

pub fn filter_candidates(
    candidates: &[Candidate],
    filters: &FilterSelection,
    query: &str,
) -> Vec<Candidate> {
    let query = query.to_lowercase();
    let result: Vec<Candidate> = candidates
        .iter()
        .filter(|c| candidate_matches(c, filters, &query))
        .cloned()
        .collect();
    debug!(total = candidates.len(), matched = result.len(), "filtered candidates");
    result
}

/// `query` must already be lowercased.
fn job_matches(job: &Job, filters: &FilterSelection, query: &str) -> bool {
    contains_scalar(&filters.industries, job.company_industry.as_deref())
        && contains_scalar(&filters.locations, job.location.as_deref())
        && contains_scalar(&filters.pay_ranges, job.pay_range.as_deref())
        && matches_query(job, query)
}

/// `query` must already be lowercased.
fn candidate_matches(candidate: &Candidate, filters: &FilterSelection, query: &str) -> bool {
    contains_scalar(&filters.locations, candidate.location.as_deref())
        && (filters.pay_ranges.is_empty()
            || contains_scalar(&filters.pay_ranges, candidate.preferred_pay_range.as_deref())
            || contains_scalar(&filters.pay_ranges, candidate.target_pay.as_deref()))
        && intersects(&filters.skills, candidate.skills.as_deref())
        && intersects(
            &filters.industries,
            candidate.industries_interested.as_deref(),
        )
        && matches_experience(candidate.years_experience.years(), &filters.experience_levels)
        && matches_education(candidate.education.as_deref(), &filters.education_levels)
        && matches_query(candidate, query)
}

fn contains_scalar(selected: &BTreeSet<String>, value: Option<&str>) -> bool {
    selected.is_empty() || value.is_some_and(|v| selected.contains(v))
}

fn intersects(selected: &BTreeSet<String>, values: Option<&[String]>) -> bool {
    selected.is_empty() || values.is_some_and(|vs| vs.iter().any(|v| selected.contains(v)))
}

fn matches_query(listing: &impl Listing, query: &str) -> bool {
    query.is_empty()
        || listing
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(query))
}

/// Years match when they fall in any selected bucket. Unknown labels match nothing.
pub fn matches_experience(years: f64, selected: &BTreeSet<String>) -> bool {
    selected.is_empty()
        || selected
            .iter()
            .filter_map(|label| ExperienceBucket::from_label(label))
            .any(|bucket| bucket.contains(years))
}

/// Selected levels act as floors: the candidate matches when their rank reaches any of them.
pub fn matches_education(education: Option<&str>, selected: &BTreeSet<String>) -> bool {
    if selected.is_empty() {
        return true;
    }
    let Some(rank) = education.and_then(EducationLevel::rank_of) else {
        return false;
    };
    selected
        .iter()
        .filter_map(|label| EducationLevel::rank_of(label))
        .any(|floor| rank >= floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::YearsOfExperience;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn job(id: &str, title: &str, industry: &str, location: &str, pay: &str) -> Job {
        Job {
            id: id.to_string(),
            title: title.to_string(),
            company_name: "Island Tech".to_string(),
            company_industry: Some(industry.to_string()),
            location: Some(location.to_string()),
            pay_range: Some(pay.to_string()),
            job_type: None,
            description: None,
            contact_email: None,
            contact_phone: None,
            is_anonymous: false,
            applicant_count: 0,
        }
    }

    fn candidate(id: &str, years: YearsOfExperience, education: Option<&str>) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: "Nani Wong".to_string(),
            location: Some("Kona, HI".to_string()),
            skills: Some(vec!["Cooking".to_string(), "Bartending".to_string()]),
            industries_interested: Some(vec!["Hospitality".to_string()]),
            years_experience: years,
            education: education.map(str::to_string),
            preferred_pay_range: Some("$20-25/hr".to_string()),
            target_pay: None,
            email: None,
            phone: None,
            bio: None,
            display_title: None,
            title_descriptor: None,
            title_primary_skill: None,
            title_secondary_skill: None,
        }
    }

    fn bare_candidate(id: &str) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: String::new(),
            location: None,
            skills: None,
            industries_interested: None,
            years_experience: YearsOfExperience::default(),
            education: None,
            preferred_pay_range: None,
            target_pay: None,
            email: None,
            phone: None,
            bio: None,
            display_title: None,
            title_descriptor: None,
            title_primary_skill: None,
            title_secondary_skill: None,
        }
    }

    fn sample_jobs() -> Vec<Job> {
        vec![
            job("job_1", "Tech Professional", "Tech", "Honolulu, HI", "$20-25/hr"),
            job("job_2", "Retail Associate", "Retail", "Hilo, HI", "$15-20/hr"),
            job("job_3", "Marine Deckhand", "Marine", "Kona, HI", "$25-30/hr"),
        ]
    }

    #[test]
    fn test_empty_filters_and_query_return_everything_in_order() {
        let jobs = sample_jobs();
        assert_eq!(filter_jobs(&jobs, &FilterSelection::new(), ""), jobs);

        let candidates = vec![
            candidate("cand_1", YearsOfExperience::Number(1.0), Some("Doctorate")),
            bare_candidate("cand_2"),
        ];
        assert_eq!(
            filter_candidates(&candidates, &FilterSelection::new(), ""),
            candidates
        );
    }

    #[test]
    fn test_or_within_category_and_across_categories() {
        let jobs = sample_jobs();
        let mut filters = FilterSelection::new();
        filters.toggle(FilterCategory::Industries, "Tech");
        filters.toggle(FilterCategory::Industries, "Marine");
        let ids: Vec<_> = filter_jobs(&jobs, &filters, "")
            .into_iter()
            .map(|j| j.id)
            .collect();
        assert_eq!(ids, vec!["job_1", "job_3"]);

        filters.toggle(FilterCategory::Locations, "Kona, HI");
        let ids: Vec<_> = filter_jobs(&jobs, &filters, "")
            .into_iter()
            .map(|j| j.id)
            .collect();
        assert_eq!(ids, vec!["job_3"]);
    }

    #[test]
    fn test_job_query_matches_title_or_location_case_insensitive() {
        let jobs = sample_jobs();
        let filters = FilterSelection::new();
        assert_eq!(filter_jobs(&jobs, &filters, "RETAIL").len(), 1);
        assert_eq!(filter_jobs(&jobs, &filters, "hilo")[0].id, "job_2");
        assert!(filter_jobs(&jobs, &filters, "island tech").is_empty());
    }

    #[test]
    fn test_candidate_query_matches_location_or_skill() {
        let candidates = vec![
            candidate("cand_1", YearsOfExperience::Number(4.0), None),
            bare_candidate("cand_2"),
        ];
        let filters = FilterSelection::new();
        assert_eq!(filter_candidates(&candidates, &filters, "bartend").len(), 1);
        assert_eq!(filter_candidates(&candidates, &filters, "kona").len(), 1);
        assert!(filter_candidates(&candidates, &filters, "welding").is_empty());
    }

    #[test]
    fn test_adding_filter_values_never_grows_result() {
        let candidates = vec![
            candidate("cand_1", YearsOfExperience::Number(1.0), Some("High School")),
            candidate("cand_2", YearsOfExperience::Number(7.0), Some("Master's Degree")),
            candidate("cand_3", YearsOfExperience::Text("12 years".into()), Some("Doctorate")),
            bare_candidate("cand_4"),
        ];
        let steps = [
            (FilterCategory::Locations, "Kona, HI"),
            (FilterCategory::Skills, "Cooking"),
            (FilterCategory::ExperienceLevels, "5-10 years"),
            (FilterCategory::EducationLevels, "Bachelor's Degree"),
        ];

        let mut filters = FilterSelection::new();
        let mut previous = filter_candidates(&candidates, &filters, "").len();
        for (category, value) in steps {
            filters.toggle(category, value);
            let now = filter_candidates(&candidates, &filters, "").len();
            assert!(now <= previous, "{:?}={} grew the result", category, value);
            previous = now;
        }
        assert_eq!(previous, 1);
    }

    #[test]
    fn test_education_filters_act_as_floors() {
        let masters = Some("Master's Degree");
        assert!(matches_education(masters, &set(&["High School"])));
        assert!(matches_education(masters, &set(&["Bachelor's Degree"])));
        assert!(matches_education(masters, &set(&["Master's Degree"])));
        assert!(!matches_education(masters, &set(&["Doctorate"])));
        assert!(matches_education(masters, &set(&["Doctorate", "High School"])));
    }

    #[test]
    fn test_unranked_education_never_matches_active_filter() {
        assert!(!matches_education(None, &set(&["High School"])));
        assert!(!matches_education(Some("GED"), &set(&["High School"])));
        assert!(!matches_education(Some("Doctorate"), &set(&["Unknown"])));
        assert!(matches_education(None, &BTreeSet::new()));
    }

    #[test]
    fn test_experience_bucket_boundaries() {
        let only = |years: f64| -> Vec<&'static str> {
            ExperienceBucket::ALL
                .iter()
                .filter(|b| matches_experience(years, &set(&[b.label()])))
                .map(|b| b.label())
                .collect()
        };
        assert_eq!(only(2.0), vec!["0-2 years"]);
        assert_eq!(only(2.0001), vec!["2-5 years"]);
        assert_eq!(only(3.0), vec!["2-5 years"]);
        assert_eq!(only(5.0), vec!["2-5 years"]);
        assert_eq!(only(5.5), vec!["5-10 years"]);
        assert_eq!(only(11.0), vec!["10+ years"]);
        assert_eq!(only(0.0), vec!["0-2 years"]);
    }

    #[test]
    fn test_experience_text_without_digits_counts_as_zero() {
        let c = candidate("cand_1", YearsOfExperience::Text("plenty".into()), None);
        let mut filters = FilterSelection::new();
        filters.toggle(FilterCategory::ExperienceLevels, "0-2 years");
        assert_eq!(filter_candidates(&[c], &filters, "").len(), 1);
    }

    #[test]
    fn test_missing_attributes_fail_only_active_categories() {
        let bare = bare_candidate("cand_1");
        let mut filters = FilterSelection::new();
        filters.toggle(FilterCategory::Skills, "Cooking");
        assert!(filter_candidates(std::slice::from_ref(&bare), &filters, "").is_empty());

        filters.clear();
        filters.toggle(FilterCategory::ExperienceLevels, "0-2 years");
        assert_eq!(filter_candidates(&[bare], &filters, "").len(), 1);
    }

    #[test]
    fn test_candidate_pay_matches_preferred_or_target() {
        let mut c = candidate("cand_1", YearsOfExperience::Number(1.0), None);
        c.preferred_pay_range = None;
        c.target_pay = Some("$60k+/year".to_string());

        let mut filters = FilterSelection::new();
        filters.toggle(FilterCategory::PayRanges, "$60k+/year");
        assert_eq!(filter_candidates(std::slice::from_ref(&c), &filters, "").len(), 1);

        filters.clear();
        filters.toggle(FilterCategory::PayRanges, "$20-25/hr");
        assert!(filter_candidates(&[c], &filters, "").is_empty());
    }

    #[test]
    fn test_candidate_industry_filter_intersects_interests() {
        let c = candidate("cand_1", YearsOfExperience::Number(1.0), None);
        let mut filters = FilterSelection::new();
        filters.toggle(FilterCategory::Industries, "Hospitality");
        filters.toggle(FilterCategory::Industries, "Tech");
        assert_eq!(filter_candidates(std::slice::from_ref(&c), &filters, "").len(), 1);

        filters.toggle(FilterCategory::Industries, "Hospitality");
        assert!(filter_candidates(&[c], &filters, "").is_empty());
    }

    #[test]
    fn test_toggle_and_clear() {
        let mut filters = FilterSelection::new();
        assert!(filters.toggle(FilterCategory::Skills, "Sales"));
        assert_eq!(filters.active_count(), 1);
        assert!(!filters.toggle(FilterCategory::Skills, "Sales"));
        assert!(filters.is_empty());

        filters.toggle(FilterCategory::Locations, "Hilo, HI");
        filters.clear();
        assert!(filters.is_empty());
    }

    #[test]
    fn test_add_arg_parses_category_value_pairs() {
        let mut filters = FilterSelection::new();
        filters.add_arg("skill=Cooking").unwrap();
        filters.add_arg("location=Kailua, HI").unwrap();
        assert!(filters.skills.contains("Cooking"));
        assert!(filters.locations.contains("Kailua, HI"));

        assert_eq!(
            filters.add_arg("colour=blue"),
            Err(FilterError::UnknownCategory("colour".to_string()))
        );
        assert_eq!(
            filters.add_arg("skill"),
            Err(FilterError::Malformed("skill".to_string()))
        );
        assert_eq!(
            filters.add_arg("skill= "),
            Err(FilterError::Malformed("skill= ".to_string()))
        );
    }
}
