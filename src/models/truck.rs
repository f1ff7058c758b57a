//! Truck (ground-service vehicle) model.

use serde::{Deserialize, Serialize};

use super::{Operation, TimeWindow};

/// A ground-service vehicle.
///
/// A truck performs at most one operation at any instant and needs
/// transition time to move between locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Truck {
    /// Unique truck identifier.
    pub id: String,
    /// Truck type; determines which operations it may perform.
    pub truck_type: String,
    /// Home/current location at the start of its availability.
    pub home: String,
    /// Availability window inside the horizon. Empty = never usable.
    pub availability: TimeWindow,
}

impl Truck {
    /// Creates a truck.
    pub fn new(
        id: impl Into<String>,
        truck_type: impl Into<String>,
        home: impl Into<String>,
        availability: TimeWindow,
    ) -> Self {
        Self {
            id: id.into(),
            truck_type: truck_type.into(),
            home: home.into(),
            availability,
        }
    }

    /// Whether this truck type matches the operation's requirement.
    #[inline]
    pub fn can_perform(&self, operation: &Operation) -> bool {
        self.truck_type == operation.truck_type
    }

    /// Whether the truck can ever be used.
    #[inline]
    pub fn is_usable(&self) -> bool {
        !self.availability.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truck_capability() {
        let t = Truck::new("F1", "fuel", "DEPOT", TimeWindow::new(0, 1000));
        assert!(t.can_perform(&Operation::new("fuel", 30, "fuel")));
        assert!(!t.can_perform(&Operation::new("bags", 30, "baggage")));
        assert!(t.is_usable());
    }

    #[test]
    fn test_zero_availability_truck_is_unusable() {
        let t = Truck::new("F2", "fuel", "DEPOT", TimeWindow::new(300, 300));
        assert!(!t.is_usable());
    }
}
