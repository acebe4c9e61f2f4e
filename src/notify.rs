// ABOUTME: Fire-and-forget notification dispatch for booking lifecycle events
// ABOUTME: Failures are logged and swallowed; a notification outage never blocks a booking write
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

use serde_json::json;
use tracing::warn;

use crate::database::notifications::NewNotification;
use crate::database::Database;
use crate::models::{Booking, BookingStatus};

/// Dispatch a notification about `booking` to `recipient_id`
///
/// At-most-once: the insert runs on a detached task, errors are logged
/// at warn level, and nothing is retried or surfaced to the caller.
pub fn notify_booking_change(
    database: &Database,
    booking: &Booking,
    recipient_id: &str,
    actor_id: &str,
) {
    let (title, body) = notification_text(booking);

    let new = NewNotification {
        user_id: recipient_id.to_owned(),
        title,
        body,
        notification_type: format!("booking_{}", booking.status.as_str()),
        data: Some(json!({
            "bookingId": booking.id,
            "status": booking.status,
        })),
        created_by: Some(actor_id.to_owned()),
    };

    let notifications = database.notifications();
    let booking_id = booking.id.clone();
    tokio::spawn(async move {
        if let Err(e) = notifications.create(&new).await {
            warn!("Failed to store notification for booking {booking_id}: {e}");
        }
    });
}

/// Title and body for the booking's current status
fn notification_text(booking: &Booking) -> (String, String) {
    let when = booking.time.as_ref().map_or_else(
        || booking.date.clone(),
        |time| format!("{} at {time}", booking.date),
    );

    match booking.status {
        BookingStatus::Requested => (
            "New booking request".into(),
            format!(
                "You have a new {} booking request for {when}",
                booking.booking_type.as_str()
            ),
        ),
        BookingStatus::Accepted => (
            "Booking accepted".into(),
            format!("Your booking for {when} was accepted"),
        ),
        BookingStatus::Rejected => (
            "Booking rejected".into(),
            format!("Your booking for {when} was rejected"),
        ),
        BookingStatus::Completed => (
            "Booking completed".into(),
            format!("Your booking for {when} was marked completed"),
        ),
        BookingStatus::Cancelled => (
            "Booking cancelled".into(),
            format!("The booking for {when} was cancelled"),
        ),
    }
}
