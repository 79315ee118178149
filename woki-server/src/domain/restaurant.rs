//! Restaurant, Sector and Dining Table Entities

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::capacity::CapacityRange;
use super::window::ServiceWindow;

/// Restaurant aggregate root (营业时段挂在这里)
#[derive(Debug, Clone)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    /// Business timezone; all `HH:MM` configuration resolves against it
    pub timezone: Tz,
    /// Zero windows means open all day
    pub windows: Vec<ServiceWindow>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Restaurant {
    pub fn has_service_windows(&self) -> bool {
        !self.windows.is_empty()
    }

    /// Windows that bound allocation when the request carries no explicit ones
    pub fn effective_windows(&self) -> Vec<ServiceWindow> {
        if self.windows.is_empty() {
            vec![ServiceWindow::full_day()]
        } else {
            self.windows.clone()
        }
    }
}

/// Seating sector within a restaurant (大厅、露台等)
#[derive(Debug, Clone)]
pub struct Sector {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Physical dining table
#[derive(Debug, Clone)]
pub struct DiningTable {
    pub id: String,
    pub sector_id: String,
    pub name: String,
    pub capacity: CapacityRange,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DiningTable {
    pub fn accommodates(&self, party_size: u32) -> bool {
        self.capacity.accommodates(party_size)
    }
}
