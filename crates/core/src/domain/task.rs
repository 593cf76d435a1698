//! Task identifiers and the fixed, ordered import pipeline.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One step of the backend's import pipeline
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskId {
    Metadata,
    FetchTree,
    InsertTree,
    Readme,
    Owner,
    /// A task the client does not know about; keeps the raw id
    Unknown(String),
}

impl TaskId {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "metadata" => TaskId::Metadata,
            "fetch_tree" => TaskId::FetchTree,
            "insert_tree" => TaskId::InsertTree,
            "readme" => TaskId::Readme,
            "owner" => TaskId::Owner,
            other => TaskId::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskId::Metadata => "metadata",
            TaskId::FetchTree => "fetch_tree",
            TaskId::InsertTree => "insert_tree",
            TaskId::Readme => "readme",
            TaskId::Owner => "owner",
            TaskId::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TaskId::Unknown(_))
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TaskId::parse(&raw))
    }
}

/// Display classification of a task relative to a job's current task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Completed,
    Active,
    Pending,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TaskStatus::Completed => "completed",
            TaskStatus::Active => "active",
            TaskStatus::Pending => "pending",
        };
        write!(f, "{}", label)
    }
}

struct CatalogEntry {
    id: TaskId,
    template: &'static str,
}

const PLATFORM_PLACEHOLDER: &str = "{platform}";

static PIPELINE: [CatalogEntry; 5] = [
    CatalogEntry {
        id: TaskId::Metadata,
        template: "Fetch metadata from {platform}",
    },
    CatalogEntry {
        id: TaskId::FetchTree,
        template: "Fetch tree from {platform}",
    },
    CatalogEntry {
        id: TaskId::InsertTree,
        template: "Add tree contents to database (potentially slow)",
    },
    CatalogEntry {
        id: TaskId::Readme,
        template: "Fetch README from {platform}",
    },
    CatalogEntry {
        id: TaskId::Owner,
        template: "Fetch owner profile from {platform}",
    },
];

/// Static registry of the canonical pipeline
///
/// Every job is expected to move through the same five tasks in the same
/// order. The catalog is compiled in and never changes at runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskCatalog;

impl TaskCatalog {
    /// Human-readable description with the platform name filled in.
    /// Unknown tasks have no description.
    pub fn describe(task_id: &TaskId, platform_display_name: &str) -> Option<String> {
        PIPELINE
            .iter()
            .find(|entry| &entry.id == task_id)
            .map(|entry| entry.template.replace(PLATFORM_PLACEHOLDER, platform_display_name))
    }

    pub fn pipeline_index_of(task_id: &TaskId) -> Option<usize> {
        PIPELINE.iter().position(|entry| &entry.id == task_id)
    }

    pub fn pipeline_length() -> usize {
        PIPELINE.len()
    }

    /// Canonical task ids in pipeline order
    pub fn pipeline() -> impl Iterator<Item = &'static TaskId> {
        PIPELINE.iter().map(|entry| &entry.id)
    }
}
