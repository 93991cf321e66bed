use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a member arrived at a rehearsal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceCategory {
    Present,
    Late,
    VeryLate,
}

impl AttendanceCategory {
    /// Keyword typed at the swipe prompt to switch category.
    pub fn keyword(&self) -> &'static str {
        match self {
            AttendanceCategory::Present => "present",
            AttendanceCategory::Late => "late",
            AttendanceCategory::VeryLate => "very-late",
        }
    }
}

impl std::fmt::Display for AttendanceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceCategory::Present => write!(f, "present"),
            AttendanceCategory::Late => write!(f, "late"),
            AttendanceCategory::VeryLate => write!(f, "very late"),
        }
    }
}

impl FromStr for AttendanceCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(AttendanceCategory::Present),
            "late" => Ok(AttendanceCategory::Late),
            "very-late" | "very late" | "verylate" => Ok(AttendanceCategory::VeryLate),
            _ => Err(()),
        }
    }
}

/// Resolved attendance of one member at one rehearsal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Present,
    Late,
    VeryLate,
    Excused,
    Absent,
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "PRESENT"),
            AttendanceStatus::Late => write!(f, "LATE"),
            AttendanceStatus::VeryLate => write!(f, "VERY LATE"),
            AttendanceStatus::Excused => write!(f, "EXCUSED"),
            AttendanceStatus::Absent => write!(f, "ABSENT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rehearsal {
    pub name: String,
    #[serde(default)]
    pub present: Vec<String>,
    #[serde(default)]
    pub late: Vec<String>,
    #[serde(default)]
    pub very_late: Vec<String>,
    #[serde(default)]
    pub exempt: Vec<String>,
}

impl Rehearsal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            present: Vec::new(),
            late: Vec::new(),
            very_late: Vec::new(),
            exempt: Vec::new(),
        }
    }

    /// Record a member as attending. Repeated calls append repeated entries.
    pub fn mark_attendance(&mut self, member_name: &str, category: AttendanceCategory) {
        let list = match category {
            AttendanceCategory::Present => &mut self.present,
            AttendanceCategory::Late => &mut self.late,
            AttendanceCategory::VeryLate => &mut self.very_late,
        };
        list.push(member_name.to_string());
    }

    /// Excuse a member from this rehearsal.
    pub fn mark_exempt(&mut self, member_name: &str) {
        self.exempt.push(member_name.to_string());
    }

    /// Resolve a member's attendance.
    ///
    /// Lists are checked in the fixed order present, exempt, late, very-late;
    /// the first list containing the name decides. A member found in none of
    /// them is absent.
    pub fn status_of(&self, member_name: &str) -> AttendanceStatus {
        let contains = |list: &Vec<String>| list.iter().any(|n| n == member_name);

        if contains(&self.present) {
            AttendanceStatus::Present
        } else if contains(&self.exempt) {
            AttendanceStatus::Excused
        } else if contains(&self.late) {
            AttendanceStatus::Late
        } else if contains(&self.very_late) {
            AttendanceStatus::VeryLate
        } else {
            AttendanceStatus::Absent
        }
    }

    /// Number of recorded arrivals (all categories, duplicates included).
    pub fn attendance_count(&self) -> usize {
        self.present.len() + self.late.len() + self.very_late.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_of_each_category() {
        let mut r = Rehearsal::new("R1");
        r.mark_attendance("Alice", AttendanceCategory::Present);
        r.mark_attendance("Bob", AttendanceCategory::Late);
        r.mark_attendance("Carol", AttendanceCategory::VeryLate);
        r.mark_exempt("Dan");

        assert_eq!(r.status_of("Alice"), AttendanceStatus::Present);
        assert_eq!(r.status_of("Bob"), AttendanceStatus::Late);
        assert_eq!(r.status_of("Carol"), AttendanceStatus::VeryLate);
        assert_eq!(r.status_of("Dan"), AttendanceStatus::Excused);
        assert_eq!(r.status_of("Eve"), AttendanceStatus::Absent);
    }

    #[test]
    fn test_present_beats_exempt_regardless_of_insertion_order() {
        let mut r = Rehearsal::new("R1");
        r.mark_exempt("Alice");
        r.mark_attendance("Alice", AttendanceCategory::Present);
        assert_eq!(r.status_of("Alice"), AttendanceStatus::Present);
    }

    #[test]
    fn test_exempt_beats_late_and_late_beats_very_late() {
        let mut r = Rehearsal::new("R1");
        r.mark_attendance("Alice", AttendanceCategory::Late);
        r.mark_exempt("Alice");
        assert_eq!(r.status_of("Alice"), AttendanceStatus::Excused);

        r.mark_attendance("Bob", AttendanceCategory::VeryLate);
        r.mark_attendance("Bob", AttendanceCategory::Late);
        assert_eq!(r.status_of("Bob"), AttendanceStatus::Late);
    }

    #[test]
    fn test_repeated_marks_are_kept() {
        let mut r = Rehearsal::new("R1");
        r.mark_attendance("Alice", AttendanceCategory::Present);
        r.mark_attendance("Alice", AttendanceCategory::Present);
        assert_eq!(r.present.len(), 2);
        assert_eq!(r.attendance_count(), 2);
    }

    #[test]
    fn test_category_keywords() {
        assert_eq!("late".parse::<AttendanceCategory>(), Ok(AttendanceCategory::Late));
        assert_eq!("Very-Late".parse::<AttendanceCategory>(), Ok(AttendanceCategory::VeryLate));
        assert_eq!("present".parse::<AttendanceCategory>(), Ok(AttendanceCategory::Present));
        assert!("1234".parse::<AttendanceCategory>().is_err());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(AttendanceStatus::VeryLate.to_string(), "VERY LATE");
        assert_eq!(AttendanceStatus::Excused.to_string(), "EXCUSED");
    }
}
