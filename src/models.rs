// ABOUTME: Core domain types for the booking marketplace (users, bookings, notifications)
// ABOUTME: Owns the booking status state machine and role/type enums stored in the database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AppError, AppResult};

/// Account role; providers (academy, clinic) fulfill bookings, the rest request them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Individual athlete account
    Player,
    /// Guardian account managing bookings for a player
    Parent,
    /// Talent agent account
    Agent,
    /// Training academy offering programs
    Academy,
    /// Sports clinic offering services
    Clinic,
    /// Operations staff
    Admin,
}

impl UserRole {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Parent => "parent",
            Self::Agent => "agent",
            Self::Academy => "academy",
            Self::Clinic => "clinic",
            Self::Admin => "admin",
        }
    }

    /// Parse from a request string
    ///
    /// # Errors
    ///
    /// Returns a validation error if the string is not a known role
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "player" => Ok(Self::Player),
            "parent" => Ok(Self::Parent),
            "agent" => Ok(Self::Agent),
            "academy" => Ok(Self::Academy),
            "clinic" => Ok(Self::Clinic),
            "admin" => Ok(Self::Admin),
            other => Err(AppError::validation(format!("Invalid role: {other}"))),
        }
    }

    /// Parse from database string representation, defaulting unknown values
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Player)
    }

    /// Whether accounts with this role can be booked
    #[must_use]
    pub const fn is_provider(&self) -> bool {
        matches!(self, Self::Academy | Self::Clinic)
    }
}

/// Account standing; suspended accounts cannot authenticate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Normal account
    Active,
    /// Locked out by operations staff
    Suspended,
}

impl UserStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }

    /// Parse from database string representation, defaulting unknown values
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "suspended" => Self::Suspended,
            _ => Self::Active,
        }
    }
}

/// Account record. Internal only; route responses use dedicated DTOs
#[derive(Debug, Clone)]
pub struct User {
    /// Unique identifier (UUID string)
    pub id: String,
    /// Login email, unique
    pub email: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Account role
    pub role: UserRole,
    /// Account standing
    pub status: UserStatus,
    /// Optional public display name
    pub display_name: Option<String>,
    /// Account creation time
    pub created_at: DateTime<Utc>,
    /// Last successful authentication
    pub last_active: DateTime<Utc>,
}

/// Which kind of provider a booking targets; fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    /// Booking against a training academy
    Academy,
    /// Booking against a sports clinic
    Clinic,
}

impl BookingType {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Academy => "academy",
            Self::Clinic => "clinic",
        }
    }

    /// Parse from a request or database string
    ///
    /// # Errors
    ///
    /// Returns a validation error if the string is not a known booking type
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "academy" => Ok(Self::Academy),
            "clinic" => Ok(Self::Clinic),
            other => Err(AppError::validation(format!(
                "Invalid booking type: {other}"
            ))),
        }
    }

    /// Role the provider account must hold for this booking type
    #[must_use]
    pub const fn required_role(&self) -> UserRole {
        match self {
            Self::Academy => UserRole::Academy,
            Self::Clinic => UserRole::Clinic,
        }
    }
}

/// Booking lifecycle state
///
/// Transitions move monotonically toward a terminal state:
/// `requested` may become `accepted` or `rejected`, `accepted` may
/// become `completed`, and nothing leaves `cancelled` or `completed`.
/// Cancellation is a separate operation allowed from any non-terminal
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Created by the requester, awaiting the provider's decision
    Requested,
    /// Provider committed to the slot
    Accepted,
    /// Provider declined the request
    Rejected,
    /// Withdrawn by either party (terminal)
    Cancelled,
    /// Fulfilled by the provider (terminal)
    Completed,
}

impl BookingStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Parse from a request or database string
    ///
    /// # Errors
    ///
    /// Returns a validation error if the string is not a known status
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "requested" => Ok(Self::Requested),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(AppError::validation(format!("Invalid status: {other}"))),
        }
    }

    /// Whether no further transition is permitted out of this state
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Whether the provider may move a booking from this state to `next`
    ///
    /// Cancellation does not go through this table; see
    /// `BookingsManager::cancel`.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Requested, Self::Accepted | Self::Rejected)
                | (Self::Accepted, Self::Completed)
        )
    }
}

/// A service request from a requester account to a provider account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Unique identifier (UUID string), assigned on creation
    pub id: String,
    /// Requesting account
    pub user_id: String,
    /// Providing account; role matches `booking_type`
    pub provider_id: String,
    /// Kind of provider booked, immutable after creation
    pub booking_type: BookingType,
    /// Optional reference to a provider sub-offering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    /// Optional reference to a provider program
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_id: Option<String>,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Optional time of day; participates in slot conflict detection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Lifecycle state
    pub status: BookingStatus,
    /// Agreed amount, positive, immutable after creation
    pub price: f64,
    /// Optional free text from the requester
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Whether `account_id` is a party to this booking
    #[must_use]
    pub fn involves(&self, account_id: &str) -> bool {
        self.user_id == account_id || self.provider_id == account_id
    }
}

/// In-app notification produced as a side effect of booking changes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique identifier (UUID string)
    pub id: String,
    /// Recipient account
    pub user_id: String,
    /// Short headline shown in the client
    pub title: String,
    /// Longer description
    pub body: String,
    /// Category tag, e.g. `booking_accepted`
    #[serde(rename = "type")]
    pub notification_type: String,
    /// Whether the recipient has seen it
    pub read: bool,
    /// Opaque payload (booking id, status, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Account whose action produced the notification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}
