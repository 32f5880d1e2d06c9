//! Call-out to the notification collaborator on shift changes.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{ShiftNotification, ShiftType};

/// Failure reported by a gateway. The assigner logs and counts it, then carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("Notification delivery failed for {crew_id}: {reason}")]
    Delivery { crew_id: String, reason: String },
}

/// Delivery side of shift-change alerts (push, SMS, in-app).
///
/// Only the decision to notify belongs to the rota; transport and retries are
/// the implementor's concern.
pub trait NotificationGateway {
    fn notify_shift_change(
        &mut self,
        crew_id: &str,
        date: NaiveDate,
        new_shift: ShiftType,
        previous_shift: Option<ShiftType>,
    ) -> Result<(), NotifyError>;
}

/// Gateway that keeps every notification in memory.
#[derive(Clone, Debug, Default)]
pub struct RecordingGateway {
    pub notifications: Vec<ShiftNotification>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_notifications(self) -> Vec<ShiftNotification> {
        self.notifications
    }
}

impl NotificationGateway for RecordingGateway {
    fn notify_shift_change(
        &mut self,
        crew_id: &str,
        date: NaiveDate,
        new_shift: ShiftType,
        previous_shift: Option<ShiftType>,
    ) -> Result<(), NotifyError> {
        self.notifications.push(ShiftNotification {
            crew_id: crew_id.to_string(),
            date,
            new_shift,
            previous_shift,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_gateway() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let mut gateway = RecordingGateway::new();
        gateway
            .notify_shift_change("a", date, ShiftType::Night, Some(ShiftType::Morning))
            .unwrap();
        let notifications = gateway.into_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].previous_shift, Some(ShiftType::Morning));
        assert_eq!(notifications[0].new_shift, ShiftType::Night);
    }

    #[test]
    fn test_delivery_error_message() {
        let err = NotifyError::Delivery {
            crew_id: "a".to_string(),
            reason: "offline".to_string(),
        };
        assert_eq!(err.to_string(), "Notification delivery failed for a: offline");
    }
}
