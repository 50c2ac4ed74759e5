use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::models::{Candidate, Job, Listing, Role, YearsOfExperience};
use crate::seed;
use crate::unlock::{UnlockLedger, UnlockRecord, UnlockRequest};

pub struct Database {
    conn: Connection,
    path: PathBuf,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedStats {
    pub jobs: usize,
    pub candidates: usize,
}

impl Database {
    pub fn open() -> Result<Self> {
        Self::open_at(&Self::default_path())
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn default_path() -> PathBuf {
        // Use XDG data directory or fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "deck") {
            proj_dirs.data_dir().join("deck.db")
        } else {
            PathBuf::from("deck.db")
        }
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                company_name TEXT NOT NULL,
                company_industry TEXT,
                location TEXT,
                pay_range TEXT,
                job_type TEXT,
                description TEXT,
                contact_email TEXT,
                contact_phone TEXT,
                is_anonymous INTEGER NOT NULL DEFAULT 0,
                applicant_count INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS candidates (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                location TEXT,
                skills TEXT,
                industries_interested TEXT,
                years_experience TEXT,
                education TEXT,
                preferred_pay_range TEXT,
                target_pay TEXT,
                email TEXT,
                phone TEXT,
                bio TEXT,
                display_title TEXT,
                title_descriptor TEXT,
                title_primary_skill TEXT,
                title_secondary_skill TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS unlocks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                role TEXT NOT NULL CHECK (role IN ('seeker', 'employer')),
                listing_id TEXT NOT NULL,
                unlocked_at TEXT NOT NULL,
                fee_cents INTEGER NOT NULL DEFAULT 0,
                UNIQUE (role, listing_id)
            );

            CREATE INDEX IF NOT EXISTS idx_unlocks_role ON unlocks(role);
            "#,
        )?;

        // Stores created before fees were recorded per unlock
        let has_fee: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pragma_table_info('unlocks') WHERE name = 'fee_cents'",
            [],
            |row| row.get(0),
        )?;
        if has_fee == 0 {
            self.conn.execute(
                "ALTER TABLE unlocks ADD COLUMN fee_cents INTEGER NOT NULL DEFAULT 0",
                [],
            )?;
        }
        Ok(())
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        let tables: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type='table' AND name IN ('jobs', 'candidates', 'unlocks')",
            [],
            |row| row.get(0),
        )?;
        if tables < 3 {
            return Err(anyhow!("Database not initialized. Run 'deck init' first."));
        }
        Ok(())
    }

    pub fn is_empty(&self) -> Result<bool> {
        let jobs: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM jobs", [], |row| row.get(0))?;
        let candidates: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM candidates", [], |row| row.get(0))?;
        Ok(jobs == 0 || candidates == 0)
    }

    /// Fills the store with the generated marketplace listings when either table is empty,
    /// or unconditionally with `force`. Existing rows are replaced.
    pub fn seed(&self, force: bool) -> Result<SeedStats> {
        if !force && !self.is_empty()? {
            return Ok(SeedStats::default());
        }

        let jobs = seed::generate_jobs();
        let candidates = seed::generate_candidates();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM jobs", [])?;
        tx.execute("DELETE FROM candidates", [])?;
        for job in &jobs {
            Self::insert_job(&tx, job)?;
        }
        for candidate in &candidates {
            Self::insert_candidate(&tx, candidate)?;
        }
        tx.commit().context("Failed to seed listings")?;

        info!(jobs = jobs.len(), candidates = candidates.len(), "seeded listings");
        Ok(SeedStats {
            jobs: jobs.len(),
            candidates: candidates.len(),
        })
    }

    // --- Job operations ---

    /// Inserts a newly posted job. Fails if the id is taken.
    pub fn add_job(&self, job: &Job) -> Result<()> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM jobs WHERE id = ?1)",
            [&job.id],
            |row| row.get(0),
        )?;
        if exists {
            return Err(anyhow!("Job {} already exists", job.id));
        }
        Self::insert_job(&self.conn, job)
            .with_context(|| format!("Failed to add job {}", job.id))?;
        info!(id = %job.id, title = %job.title, "job posted");
        Ok(())
    }

    /// Next free `job_<n>` id, one past the highest numbered job.
    pub fn next_job_id(&self) -> Result<String> {
        let max: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(CAST(SUBSTR(id, 5) AS INTEGER)), 0)
             FROM jobs
             WHERE id LIKE 'job!_%' ESCAPE '!'",
            [],
            |row| row.get(0),
        )?;
        Ok(format!("job_{}", max + 1))
    }

    fn insert_job(conn: &Connection, job: &Job) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO jobs (id, title, company_name, company_industry, location,
                    pay_range, job_type, description, contact_email, contact_phone,
                    is_anonymous, applicant_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                job.id,
                job.title,
                job.company_name,
                job.company_industry,
                job.location,
                job.pay_range,
                job.job_type,
                job.description,
                job.contact_email,
                job.contact_phone,
                job.is_anonymous,
                job.applicant_count,
            ],
        )?;
        Ok(())
    }

    pub fn list_jobs(&self) -> Result<Vec<Job>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, company_name, company_industry, location, pay_range, job_type,
                    description, contact_email, contact_phone, is_anonymous, applicant_count
             FROM jobs
             ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], Self::row_to_job)?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list jobs")
    }

    fn row_to_job(row: &rusqlite::Row) -> rusqlite::Result<Job> {
        Ok(Job {
            id: row.get(0)?,
            title: row.get(1)?,
            company_name: row.get(2)?,
            company_industry: row.get(3)?,
            location: row.get(4)?,
            pay_range: row.get(5)?,
            job_type: row.get(6)?,
            description: row.get(7)?,
            contact_email: row.get(8)?,
            contact_phone: row.get(9)?,
            is_anonymous: row.get(10)?,
            applicant_count: row.get(11)?,
        })
    }

    // --- Candidate operations ---

    fn insert_candidate(conn: &Connection, candidate: &Candidate) -> Result<()> {
        let skills = candidate
            .skills
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let industries = candidate
            .industries_interested
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let years = serde_json::to_string(&candidate.years_experience)?;

        conn.execute(
            "INSERT OR REPLACE INTO candidates (id, name, location, skills, industries_interested,
                    years_experience, education, preferred_pay_range, target_pay, email, phone,
                    bio, display_title, title_descriptor, title_primary_skill,
                    title_secondary_skill)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                candidate.id,
                candidate.name,
                candidate.location,
                skills,
                industries,
                years,
                candidate.education,
                candidate.preferred_pay_range,
                candidate.target_pay,
                candidate.email,
                candidate.phone,
                candidate.bio,
                candidate.display_title,
                candidate.title_descriptor,
                candidate.title_primary_skill,
                candidate.title_secondary_skill,
            ],
        )?;
        Ok(())
    }

    pub fn list_candidates(&self) -> Result<Vec<Candidate>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, location, skills, industries_interested, years_experience,
                    education, preferred_pay_range, target_pay, email, phone, bio,
                    display_title, title_descriptor, title_primary_skill, title_secondary_skill
             FROM candidates
             ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], Self::row_to_candidate)?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list candidates")
    }

    fn row_to_candidate(row: &rusqlite::Row) -> rusqlite::Result<Candidate> {
        let id: String = row.get(0)?;
        let skills = parse_list(&id, "skills", row.get(3)?);
        let industries = parse_list(&id, "industries_interested", row.get(4)?);
        let years = parse_years(row.get(5)?);

        Ok(Candidate {
            id,
            name: row.get(1)?,
            location: row.get(2)?,
            skills,
            industries_interested: industries,
            years_experience: years,
            education: row.get(6)?,
            preferred_pay_range: row.get(7)?,
            target_pay: row.get(8)?,
            email: row.get(9)?,
            phone: row.get(10)?,
            bio: row.get(11)?,
            display_title: row.get(12)?,
            title_descriptor: row.get(13)?,
            title_primary_skill: row.get(14)?,
            title_secondary_skill: row.get(15)?,
        })
    }

    // --- Unlock operations ---

    /// Records each item of a paid request at `fee_cents`. Already unlocked ids are skipped.
    pub fn record_unlocks<T: Listing>(
        &self,
        request: &UnlockRequest<T>,
        fee_cents: u32,
    ) -> Result<usize> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.unchecked_transaction()?;
        let mut added = 0;
        for item in &request.items {
            added += tx.execute(
                "INSERT OR IGNORE INTO unlocks (role, listing_id, unlocked_at, fee_cents)
                 VALUES (?1, ?2, ?3, ?4)",
                params![request.role.as_str(), item.id(), now, fee_cents],
            )?;
        }
        tx.commit().context("Failed to record unlocks")?;
        info!(role = %request.role, added, "recorded unlocks");
        Ok(added)
    }

    /// Unlocks for a role, oldest first.
    pub fn list_unlocks(&self, role: Role) -> Result<Vec<UnlockRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT listing_id, unlocked_at, fee_cents FROM unlocks WHERE role = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map([role.as_str()], |row| {
            Ok(UnlockRecord {
                listing_id: row.get(0)?,
                unlocked_at: row.get(1)?,
                fee_cents: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list unlocks")
    }

    pub fn unlock_ledger(&self, role: Role) -> Result<UnlockLedger> {
        let ids = self
            .list_unlocks(role)?
            .into_iter()
            .map(|record| record.listing_id);
        Ok(UnlockLedger::from_ids(role, ids))
    }
}

// --- Helpers for JSON-encoded columns ---

/// A list column that fails to parse is treated as missing rather than failing the listing.
fn parse_list(id: &str, column: &str, raw: Option<String>) -> Option<Vec<String>> {
    let raw = raw?;
    match serde_json::from_str(&raw) {
        Ok(values) => Some(values),
        Err(e) => {
            warn!(id, column, error = %e, "ignoring malformed list column");
            None
        }
    }
}

fn parse_years(raw: Option<String>) -> YearsOfExperience {
    match raw {
        Some(raw) => serde_json::from_str(&raw).unwrap_or(YearsOfExperience::Text(raw)),
        None => YearsOfExperience::default(),
    }
}
