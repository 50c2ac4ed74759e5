// Fixed filter vocabularies offered by the marketplace.

/// Flat fee charged per unlocked listing, in cents.
pub const INTERACTION_FEE_CENTS: u32 = 200;

pub const INDUSTRIES: [&str; 25] = [
    "Food & Beverage", "Retail", "Tourism", "Hospitality", "Services", "Office",
    "Healthcare", "Marketing", "Accounting", "Real Estate", "Insurance", "Creative",
    "Tech", "Construction", "Manufacturing", "Automotive", "HVAC", "Electrical",
    "Plumbing", "Solar", "Logistics", "Agriculture", "Ranching", "Fishing", "Marine",
];

pub const LOCATIONS: [&str; 25] = [
    "Honolulu, HI", "Kailua, HI", "Kapolei, HI", "Pearl City, HI", "Aiea, HI",
    "Ewa Beach, HI", "Waipahu, HI", "Waikiki, HI", "Haleiwa, HI", "Kaneohe, HI",
    "Hilo, HI", "Kailua-Kona, HI", "Kona, HI", "Waimea, HI", "Kihei, HI",
    "Wailea, HI", "Lahaina, HI", "Wailuku, HI", "Kahului, HI", "Makawao, HI",
    "Pukalani, HI", "Lihue, HI", "Kapaa, HI", "Hanalei, HI", "Poipu, HI",
];

pub const JOB_PAY_RANGES: [&str; 11] = [
    "$15-20/hr", "$20-25/hr", "$25-30/hr", "$30-35/hr", "$35-40/hr", "$40+/hr",
    "$30-40k/year", "$40-50k/year", "$50-60k/year", "$60k+/year", "Commission-based",
];

pub const TARGET_PAY_RANGES: [&str; 10] = [
    "$15-20/hr", "$20-25/hr", "$25-30/hr", "$30-35/hr", "$35-40/hr", "$40+/hr",
    "$30-40k/year", "$40-50k/year", "$50-60k/year", "$60k+/year",
];

pub const SKILLS: [&str; 49] = [
    "Customer Service", "Sales", "Leadership", "Management", "Bilingual", "Cooking",
    "Bartending", "Hospitality", "Retail", "Inventory Management", "Cash Handling",
    "POS Systems", "Administrative", "Office Management", "Data Entry", "QuickBooks",
    "Microsoft Office", "Bookkeeping", "Marketing", "Social Media", "Graphic Design",
    "Adobe Creative Suite", "Photography", "Video Production", "Web Development",
    "React", "JavaScript", "TypeScript", "Construction", "Carpentry", "Electrical",
    "Plumbing", "HVAC", "Welding", "Mechanic", "Auto Repair", "Landscaping",
    "Equipment Operation", "Forklift Certified", "CDL License", "Nursing",
    "Medical", "Dental", "First Aid/CPR", "Lifeguard", "Teaching", "Childcare",
    "Tour Guide", "Ocean Safety",
];

pub const JOB_TYPES: [&str; 6] =
    ["Full-time", "Part-time", "Contract", "Seasonal", "Freelance", "Commission"];

pub const EXPERIENCE_LEVELS: [&str; 4] = ["0-2 years", "2-5 years", "5-10 years", "10+ years"];

// Seed order, not rank order. Ranking lives in `EducationLevel`.
pub const EDUCATION_LEVELS: [&str; 6] = [
    "High School", "Associate Degree", "Bachelor's Degree", "Master's Degree", "Doctorate",
    "Vocational Training",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EducationLevel, ExperienceBucket};

    #[test]
    fn test_every_education_label_is_ranked() {
        for label in EDUCATION_LEVELS {
            assert!(EducationLevel::rank_of(label).is_some(), "{}", label);
        }
    }

    #[test]
    fn test_every_experience_label_is_a_bucket() {
        for label in EXPERIENCE_LEVELS {
            assert!(ExperienceBucket::from_label(label).is_some(), "{}", label);
        }
    }
}
