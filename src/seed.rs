use rand::Rng;

use crate::models::{Candidate, Job, YearsOfExperience};
use crate::vocabulary::{EDUCATION_LEVELS, INDUSTRIES, LOCATIONS, SKILLS};

pub const SEED_COUNT: usize = 50;

const COMPANIES: [&str; 5] = [
    "Island Tech",
    "Mauka Logistics",
    "Hana Services",
    "Aloha Retail",
    "Pacific Hospitality",
];
const FIRST_NAMES: [&str; 10] = [
    "Keoni", "Leilani", "Maliko", "Nani", "Pua", "Kai", "Aulii", "Kanoa", "Nohea", "Ikaika",
];
const LAST_NAMES: [&str; 6] = ["Kahale", "Akana", "Mahi", "Lopes", "Wong", "Nakamura"];

pub fn generate_jobs() -> Vec<Job> {
    let mut rng = rand::thread_rng();

    (1..=SEED_COUNT)
        .map(|i| {
            let industry = INDUSTRIES[i % INDUSTRIES.len()];
            let company = COMPANIES[i % COMPANIES.len()];
            let domain = company.to_lowercase().replace(' ', "");

            Job {
                id: format!("job_{}", i),
                title: format!("{} Professional", industry),
                company_name: company.to_string(),
                company_industry: Some(industry.to_string()),
                location: Some(LOCATIONS[i % LOCATIONS.len()].to_string()),
                pay_range: Some(format!("${}-${}/hr", 18 + i % 12, 32 + i % 15)),
                job_type: Some(["Full-time", "Contract", "Part-time"][i % 3].to_string()),
                description: Some(format!(
                    "Seeking a skilled {} expert to handle high-volume operations at {}. \
                     Great growth potential in the Hawaii market.",
                    industry.to_lowercase(),
                    company
                )),
                contact_email: Some(format!("hiring@{}.com", domain)),
                contact_phone: Some(format!("(808) 555-{}", 2000 + i)),
                is_anonymous: i % 3 == 0,
                applicant_count: rng.gen_range(0..25),
            }
        })
        .collect()
}

pub fn generate_candidates() -> Vec<Candidate> {
    (1..=SEED_COUNT)
        .map(|i| {
            let first = FIRST_NAMES[i % FIRST_NAMES.len()];
            let last = LAST_NAMES[i % LAST_NAMES.len()];
            let primary = SKILLS[i % SKILLS.len()];
            let secondary = SKILLS[(i + 5) % SKILLS.len()];

            Candidate {
                id: format!("cand_{}", i),
                name: format!("{} {}", first, last),
                location: Some(LOCATIONS[i % LOCATIONS.len()].to_string()),
                skills: Some(vec![
                    primary.to_string(),
                    secondary.to_string(),
                    "Management".to_string(),
                    "Communication".to_string(),
                ]),
                industries_interested: Some(vec![INDUSTRIES[i % INDUSTRIES.len()].to_string()]),
                years_experience: YearsOfExperience::Number((3 + i % 12) as f64),
                education: Some(EDUCATION_LEVELS[i % EDUCATION_LEVELS.len()].to_string()),
                preferred_pay_range: Some(format!("${}/hr", 22 + i % 15)),
                target_pay: None,
                email: Some(format!(
                    "{}.{}{}@hawaiimail.com",
                    first.to_lowercase(),
                    last.to_lowercase(),
                    i
                )),
                phone: Some(format!("(808) 555-{}", 1000 + i)),
                bio: Some(format!(
                    "Professional with a strong background in {} and over {} years \
                     of local experience.",
                    primary.to_lowercase(),
                    3 + i % 8
                )),
                display_title: Some(format!("{} Expert", primary)),
                title_descriptor: Some("Experienced".to_string()),
                title_primary_skill: Some(primary.to_string()),
                title_secondary_skill: Some(secondary.to_string()),
            }
        })
        .collect()
}
