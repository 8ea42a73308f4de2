//! About page statistics and the certificates gallery.
//!
//! # Responsibility
//! - Count locally stored projects and certificates.
//! - Derive whole years of experience from a career start date.
//! - Read and replace the certificates gallery list.
//!
//! # Invariants
//! - Counters are list lengths; a list never stored counts as zero.
//! - Experience counts only completed anniversaries and is never negative.

use crate::model::certificate::Certificate;
use crate::repo::local_list_repo::{
    LocalListStore, RepoResult, CERTIFICATES_KEY, PROJECTS_KEY,
};
use chrono::{Datelike, NaiveDate};
use log::info;

/// Counters shown on the About page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AboutStats {
    pub total_projects: usize,
    pub total_certificates: usize,
    pub years_experience: u32,
}

/// One stat card as the shell renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub description: &'static str,
    pub value: u64,
}

impl AboutStats {
    pub fn cards(&self) -> Vec<StatCard> {
        vec![
            StatCard {
                label: "Total Projects",
                description: "Innovative web solutions crafted",
                value: self.total_projects as u64,
            },
            StatCard {
                label: "Certificates",
                description: "Professional skills validated",
                value: self.total_certificates as u64,
            },
            StatCard {
                label: "Years of Experience",
                description: "Continuous learning journey",
                value: u64::from(self.years_experience),
            },
        ]
    }
}

/// Service over the client-local store.
pub struct AboutService<S: LocalListStore> {
    store: S,
}

impl<S: LocalListStore> AboutService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn stats(&self, today: NaiveDate, career_start: NaiveDate) -> RepoResult<AboutStats> {
        let stats = AboutStats {
            total_projects: self.store.list_len(PROJECTS_KEY)?,
            total_certificates: self.store.list_len(CERTIFICATES_KEY)?,
            years_experience: years_between(career_start, today),
        };
        info!(
            "event=about_stats module=about status=ok projects={} certificates={} years={}",
            stats.total_projects, stats.total_certificates, stats.years_experience
        );
        Ok(stats)
    }

    pub fn certificates(&self) -> RepoResult<Vec<Certificate>> {
        self.store.read_typed(CERTIFICATES_KEY)
    }

    pub fn save_certificates(&self, certificates: &[Certificate]) -> RepoResult<()> {
        self.store.write_typed(CERTIFICATES_KEY, certificates)
    }
}

/// Completed years from `start` to `today`, clamped at zero.
///
/// A Feb 29 start counts its anniversary on Mar 1 in non-leap years.
pub fn years_between(start: NaiveDate, today: NaiveDate) -> u32 {
    let anniversary = NaiveDate::from_ymd_opt(today.year(), start.month(), start.day())
        .or_else(|| NaiveDate::from_ymd_opt(today.year(), 3, 1))
        .unwrap_or(today);
    let mut years = today.year() - start.year();
    if today < anniversary {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::years_between;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn counts_completed_anniversaries_only() {
        let start = date(2021, 11, 6);
        assert_eq!(years_between(start, date(2024, 11, 5)), 2);
        assert_eq!(years_between(start, date(2024, 11, 6)), 3);
        assert_eq!(years_between(start, date(2026, 10, 19)), 4);
    }

    #[test]
    fn future_start_clamps_to_zero() {
        assert_eq!(years_between(date(2030, 1, 1), date(2026, 1, 1)), 0);
    }

    #[test]
    fn leap_day_start_rolls_to_march_first() {
        let start = date(2020, 2, 29);
        assert_eq!(years_between(start, date(2021, 2, 28)), 0);
        assert_eq!(years_between(start, date(2021, 3, 1)), 1);
    }
}
