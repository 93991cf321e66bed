use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::models::{Member, PaymentEvent, Rehearsal, Section};
use crate::registry::MemberRegistry;

/// On-disk layout: the dataset's four collections plus when they were written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredData {
    #[serde(default)]
    pub members: BTreeMap<String, Member>,
    #[serde(default)]
    pub sections: BTreeMap<Section, Vec<String>>,
    #[serde(default)]
    pub payments: Vec<PaymentEvent>,
    #[serde(default)]
    pub rehearsals: Vec<Rehearsal>,
    pub saved_at: DateTime<Utc>,
}

impl StoredData {
    pub fn new(dataset: &Dataset) -> Self {
        Self {
            members: dataset.registry().members.clone(),
            sections: dataset.registry().sections.clone(),
            payments: dataset.payments().to_vec(),
            rehearsals: dataset.rehearsals().to_vec(),
            saved_at: Utc::now(),
        }
    }

    pub fn into_dataset(self) -> Dataset {
        let mut sections = self.sections;
        for section in Section::ALL {
            sections.entry(section).or_default();
        }
        let registry = MemberRegistry {
            members: self.members,
            sections,
        };
        Dataset::from_parts(registry, self.rehearsals, self.payments)
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.saved_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        age_display(self.age_minutes())
    }
}

/// Human-readable "how long ago" for a minute count.
pub fn age_display(minutes: i64) -> String {
    if minutes < 1 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

/// Whole-dataset load/save against one JSON file.
pub struct DataStore {
    path: PathBuf,
}

impl DataStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored envelope, or `None` if nothing has been saved yet.
    pub fn load_stored(&self) -> Result<Option<StoredData>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No data file yet");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read data file: {}", self.path.display()))?;

        let stored: StoredData = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse data file: {}", self.path.display()))?;

        Ok(Some(stored))
    }

    pub fn load(&self) -> Result<Option<Dataset>> {
        let dataset = self.load_stored()?.map(|stored| {
            info!(
                path = %self.path.display(),
                members = stored.members.len(),
                rehearsals = stored.rehearsals.len(),
                payments = stored.payments.len(),
                "Loaded from file"
            );
            stored.into_dataset()
        });
        Ok(dataset)
    }

    /// Write the dataset via a temporary sibling file and rename it into
    /// place, so an interrupted save leaves the previous file intact.
    pub fn save(&self, dataset: &Dataset) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }

        let stored = StoredData::new(dataset);
        let contents = serde_json::to_string_pretty(&stored)?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, contents)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace data file: {}", self.path.display()))?;

        debug!(path = %self.path.display(), "Saved data file");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
