//! # Target Record Model
//!
//! One record per host (or, after volume expansion, per host+volume). Stages add
//! fields incrementally; a field is either unset, a real value, a blank result from a
//! failed attempt, or the `"No Try"` sentinel meaning its gate was never satisfied.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::connectivity::ConnectivityStatus;

/// Placeholder written to a field whose gate was unmet.
pub const SENTINEL: &str = "No Try";

/// A pipeline field with explicit skip/failure states.
///
/// * `Unset` — no stage has touched the field yet.
/// * `NoTry` — the owning stage was skipped because its gate was unmet.
/// * `Blank` — the stage attempted a remote call and got nothing usable.
/// * `Value` — the stage produced a real value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Field<T> {
    #[default]
    Unset,
    NoTry,
    Blank,
    Value(T),
}

impl<T> Field<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_no_try(&self) -> bool {
        matches!(self, Field::NoTry)
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Field::Value(_))
    }
}

impl<T: fmt::Display> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Unset | Field::Blank => Ok(()),
            Field::NoTry => write!(f, "{SENTINEL}"),
            Field::Value(v) => v.fmt(f),
        }
    }
}

/// Logical-disk drive type, mapped from the numeric type code reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveType {
    Unknown,
    Removable,
    Fixed,
    Network,
    CdRom,
    RamDisk,
}

impl DriveType {
    pub fn from_code(code: u32) -> Self {
        match code {
            2 => DriveType::Removable,
            3 => DriveType::Fixed,
            4 => DriveType::Network,
            5 => DriveType::CdRom,
            6 => DriveType::RamDisk,
            _ => DriveType::Unknown,
        }
    }
}

impl fmt::Display for DriveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DriveType::Unknown => "Unknown",
            DriveType::Removable => "Removable",
            DriveType::Fixed => "Fixed",
            DriveType::Network => "Network",
            DriveType::CdRom => "CD-ROM",
            DriveType::RamDisk => "RAM",
        };
        write!(f, "{label}")
    }
}

/// One host's accumulated probe state.
///
/// Created by a source-list loader, threaded through the pipeline stage by stage,
/// and terminal once handed to an output sink. Only the volume expansion stage
/// changes cardinality (one input record, one row per discovered volume).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetRecord {
    pub computer_name: String,
    pub role: Option<String>,
    pub location: Option<String>,

    pub connectivity: ConnectivityStatus,
    pub boot_time: Field<DateTime<Utc>>,

    pub os_version: Field<String>,
    pub time_zone: Field<String>,
    pub culture: Field<String>,
    pub total_memory: Field<String>,
    pub machine_model: Field<String>,
    pub total_procs: Field<u32>,
    pub proc_name: Field<String>,
    pub cores: Field<u32>,
    pub data_width: Field<u16>,

    pub volume: Field<String>,
    pub drive_type: Field<DriveType>,
    pub capacity_gb: Field<u64>,
    pub pct_free: Field<String>,

    pub reg_path: Field<String>,
    pub reg_name: Field<String>,
    pub original_kind: Field<String>,
    pub original_value: Field<String>,
    pub reg_result: Field<String>,
}

impl TargetRecord {
    pub fn new(computer_name: impl Into<String>) -> Self {
        Self {
            computer_name: computer_name.into(),
            ..Self::default()
        }
    }

    pub fn with_provenance(
        computer_name: impl Into<String>,
        role: Option<String>,
        location: Option<String>,
    ) -> Self {
        Self {
            role,
            location,
            ..Self::new(computer_name)
        }
    }

    /// A row with no identity and every field unset. Used for the trailing
    /// separator rows the volume expansion emits and as the base for detached
    /// report-mode rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True for separator/blank rows emitted by volume expansion.
    pub fn is_separator(&self) -> bool {
        self.computer_name.is_empty() && !self.volume.is_value()
    }
}
