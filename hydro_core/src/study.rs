//! # Study Data Structures
//!
//! The `Study` struct is the root container for a river study: its
//! metadata plus the ordered list of surveyed sites. Studies serialize to
//! `.rsf` (river study file) files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Study
//! ├── meta: StudyMetadata (id, version, name, river, location, dates)
//! └── sites: Vec<Site> (kept sorted by site_number, upstream first)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::study::Study;
//! use hydro_core::site::Site;
//!
//! let mut study = Study::new("Loughton Brook 2026", "Loughton Brook", "Epping Forest");
//! study.add_site(Site::new(1, 3.2).unwrap()).unwrap();
//!
//! // Serialize to JSON for storage or transmission
//! let json = serde_json::to_string_pretty(&study).unwrap();
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{HydroError, HydroResult};
use crate::site::Site;

/// Current schema version for .rsf files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root study container.
///
/// This is the top-level struct that gets serialized to `.rsf` files.
/// Sites live in a Vec kept sorted by `site_number` because downstream
/// ordering is meaningful: trend classification and report layout both
/// walk the list upstream to downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Study {
    /// Study metadata (id, version, name, river, location, dates)
    pub meta: StudyMetadata,

    /// Surveyed sites, sorted ascending by site number
    #[serde(default)]
    pub sites: Vec<Site>,
}

impl Study {
    /// Create a new empty study.
    ///
    /// # Arguments
    ///
    /// * `name` - Study name (e.g., "Loughton Brook 2026")
    /// * `river` - River name
    /// * `location` - Where the study took place
    ///
    /// # Example
    ///
    /// ```rust
    /// use hydro_core::study::Study;
    ///
    /// let study = Study::new("GCSE Fieldwork", "River Lyn", "Exmoor");
    /// assert_eq!(study.meta.river, "River Lyn");
    /// assert_eq!(study.site_count(), 0);
    /// ```
    pub fn new(
        name: impl Into<String>,
        river: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Study {
            meta: StudyMetadata {
                id: Uuid::new_v4(),
                version: SCHEMA_VERSION.to_string(),
                name: name.into(),
                river: river.into(),
                location: location.into(),
                study_date: now.date_naive(),
                created: now,
                modified: now,
            },
            sites: Vec::new(),
        }
    }

    /// Add a site, keeping the list sorted by site number.
    ///
    /// Rejects duplicate site numbers: two cross-sections cannot share a
    /// position in the downstream sequence.
    pub fn add_site(&mut self, site: Site) -> HydroResult<()> {
        site.validate()?;
        if self.site(site.site_number).is_some() {
            return Err(HydroError::invalid_measurement(
                "site_number",
                site.site_number.to_string(),
                "A site with this number already exists in the study",
            ));
        }
        let index = self
            .sites
            .partition_point(|s| s.site_number < site.site_number);
        self.sites.insert(index, site);
        self.touch();
        Ok(())
    }

    /// Remove a site by number. Returns the removed site if it existed.
    pub fn remove_site(&mut self, site_number: u32) -> Option<Site> {
        let index = self.sites.iter().position(|s| s.site_number == site_number)?;
        let site = self.sites.remove(index);
        self.touch();
        Some(site)
    }

    /// Get a site by number.
    pub fn site(&self, site_number: u32) -> Option<&Site> {
        self.sites.iter().find(|s| s.site_number == site_number)
    }

    /// Get a mutable reference to a site by number.
    ///
    /// Marks the study as modified when the site exists, since the caller
    /// is assumed to be editing measurements.
    pub fn site_mut(&mut self, site_number: u32) -> Option<&mut Site> {
        if self.sites.iter().any(|s| s.site_number == site_number) {
            self.meta.modified = Utc::now();
            self.sites.iter_mut().find(|s| s.site_number == site_number)
        } else {
            None
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Number of sites recorded.
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Validate the whole study: every site, ordering, no duplicates.
    ///
    /// This is the input boundary for everything downstream; a study that
    /// passes here never causes a calculator or the report composer to
    /// fail.
    pub fn validate(&self) -> HydroResult<()> {
        if self.meta.name.trim().is_empty() {
            return Err(HydroError::missing_field("name"));
        }
        for site in &self.sites {
            site.validate()?;
        }
        for pair in self.sites.windows(2) {
            if pair[1].site_number <= pair[0].site_number {
                return Err(HydroError::invalid_measurement(
                    "site_number",
                    pair[1].site_number.to_string(),
                    "Sites must be sorted by unique site number",
                ));
            }
        }
        Ok(())
    }
}

impl Default for Study {
    fn default() -> Self {
        Study::new("", "", "")
    }
}

/// Study metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyMetadata {
    /// Stable identity for this study file
    pub id: Uuid,

    /// Schema version (for migration compatibility)
    pub version: String,

    /// Study name
    pub name: String,

    /// River name
    pub river: String,

    /// Location description (e.g., "Epping Forest, Essex")
    pub location: String,

    /// Date the fieldwork was carried out
    pub study_date: NaiveDate,

    /// When the study file was created
    pub created: DateTime<Utc>,

    /// When the study file was last modified
    pub modified: DateTime<Utc>,
}
