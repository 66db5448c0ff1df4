// src/entity/order.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Administrative,
    Installation,
    PreventiveMaintenance,
    #[default]
    CorrectiveMaintenance,
    PredictiveMaintenance,
    Inspection,
    TechnicalAssistance,
    WorkSafety,
    Budget,
    Events,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderType::Administrative => "administrative",
            OrderType::Installation => "installation",
            OrderType::PreventiveMaintenance => "preventive_maintenance",
            OrderType::CorrectiveMaintenance => "corrective_maintenance",
            OrderType::PredictiveMaintenance => "predictive_maintenance",
            OrderType::Inspection => "inspection",
            OrderType::TechnicalAssistance => "technical_assistance",
            OrderType::WorkSafety => "work_safety",
            OrderType::Budget => "budget",
            OrderType::Events => "events",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "administrative" => Ok(OrderType::Administrative),
            "installation" => Ok(OrderType::Installation),
            "preventive_maintenance" => Ok(OrderType::PreventiveMaintenance),
            "corrective_maintenance" => Ok(OrderType::CorrectiveMaintenance),
            "predictive_maintenance" => Ok(OrderType::PredictiveMaintenance),
            "inspection" => Ok(OrderType::Inspection),
            "technical_assistance" => Ok(OrderType::TechnicalAssistance),
            "work_safety" => Ok(OrderType::WorkSafety),
            "budget" => Ok(OrderType::Budget),
            "events" => Ok(OrderType::Events),
            _ => Err(format!("Invalid order type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Open => write!(f, "open"),
            OrderStatus::InProgress => write!(f, "in_progress"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "open" => Ok(OrderStatus::Open),
            "in_progress" | "inprogress" => Ok(OrderStatus::InProgress),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("Invalid order status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    #[default]
    Technical,
    Specialized,
    Consulting,
    AdministrativeProvider,
    Logistics,
    Operational,
    Technological,
    Commercial,
    MaintenanceProvider,
    Security,
    Educational,
    Communication,
    Other,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProviderType::Technical => "technical",
            ProviderType::Specialized => "specialized",
            ProviderType::Consulting => "consulting",
            ProviderType::AdministrativeProvider => "administrative_provider",
            ProviderType::Logistics => "logistics",
            ProviderType::Operational => "operational",
            ProviderType::Technological => "technological",
            ProviderType::Commercial => "commercial",
            ProviderType::MaintenanceProvider => "maintenance_provider",
            ProviderType::Security => "security",
            ProviderType::Educational => "educational",
            ProviderType::Communication => "communication",
            ProviderType::Other => "other",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "technical" => Ok(ProviderType::Technical),
            "specialized" => Ok(ProviderType::Specialized),
            "consulting" => Ok(ProviderType::Consulting),
            "administrative_provider" => Ok(ProviderType::AdministrativeProvider),
            "logistics" => Ok(ProviderType::Logistics),
            "operational" => Ok(ProviderType::Operational),
            "technological" => Ok(ProviderType::Technological),
            "commercial" => Ok(ProviderType::Commercial),
            "maintenance_provider" => Ok(ProviderType::MaintenanceProvider),
            "security" => Ok(ProviderType::Security),
            "educational" => Ok(ProviderType::Educational),
            "communication" => Ok(ProviderType::Communication),
            "other" => Ok(ProviderType::Other),
            _ => Err(format!("Invalid provider type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Critical => write!(f, "critical"),
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Priority::Critical),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

/// A trackable unit of service work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub id: Uuid,
    /// Globally unique external reference, immutable after creation
    pub protocol: String,
    pub so_number: String,
    pub kind: OrderType,
    pub status: OrderStatus,
    pub provider: ProviderType,
    pub priority: Priority,
    pub recipient_name: String,
    /// Normalized to 11 digits when present
    pub cpf: Option<String>,
    pub description: String,
    pub open_date: DateTime<Utc>,
    /// Always open_date + duration(priority); never supplied by the caller
    pub sla_deadline: Option<DateTime<Utc>>,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
}

/// Caller-supplied fields for creating an order
#[derive(Debug, Clone, Default)]
pub struct NewOrder {
    pub protocol: String,
    pub so_number: String,
    pub kind: OrderType,
    pub status: OrderStatus,
    pub provider: ProviderType,
    pub priority: Priority,
    pub recipient_name: String,
    pub cpf: Option<String>,
    pub description: String,
    pub open_date: Option<DateTime<Utc>>,
}

/// Update payload for an order
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub so_number: Option<String>,
    pub kind: Option<OrderType>,
    pub status: Option<OrderStatus>,
    pub provider: Option<ProviderType>,
    pub priority: Option<Priority>,
    pub recipient_name: Option<String>,
    pub cpf: Option<Option<String>>, // Some(None) to clear, Some(Some(s)) to set
    pub description: Option<String>,
    pub open_date: Option<DateTime<Utc>>,
}

impl OrderPatch {
    pub fn is_empty(&self) -> bool {
        self.so_number.is_none()
            && self.kind.is_none()
            && self.status.is_none()
            && self.provider.is_none()
            && self.priority.is_none()
            && self.recipient_name.is_none()
            && self.cpf.is_none()
            && self.description.is_none()
            && self.open_date.is_none()
    }
}
