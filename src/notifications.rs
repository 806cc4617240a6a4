//! Notifications
//!
//! Per-session notification feed. Nothing here is persisted; a new session
//! starts from the seeds for the user's role.

use std::{cmp::Reverse, fmt};

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::{auth::Role, catalog::Catalog};

/// Notification errors
#[derive(Debug, Error)]
pub enum NotificationError {
    /// No notification with this id.
    #[error("notification {0} not found")]
    NotFound(Uuid),

    /// Seed timestamps could not be computed.
    #[error(transparent)]
    Time(#[from] jiff::Error),
}

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Order placed or updated
    Order,

    /// Sales and coupons
    Promotion,

    /// Inventory alerts
    Stock,

    /// Store operations
    System,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Order => "order",
            Self::Promotion => "promotion",
            Self::Stock => "stock",
            Self::System => "system",
        };

        f.write_str(label)
    }
}

/// How prominently a notification is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Informational
    Low,

    /// Default
    #[default]
    Medium,

    /// Needs attention
    High,
}

/// Notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Time-ordered id
    pub id: Uuid,
    /// What the notification is about
    pub kind: NotificationKind,
    /// Short headline
    pub title: String,
    /// Body text
    pub message: String,
    /// When it was raised
    pub timestamp: Timestamp,
    /// Whether the user has seen it
    pub read: bool,
    /// How prominently to show it
    pub priority: Priority,
    /// Product the notification refers to, if any
    #[serde(default)]
    pub product_id: Option<String>,
}

impl Notification {
    /// Create an unread notification stamped with the current time.
    pub fn new(
        kind: NotificationKind,
        priority: Priority,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind,
            title: title.into(),
            message: message.into(),
            timestamp: Timestamp::now(),
            read: false,
            priority,
            product_id: None,
        }
    }

    /// Attach the product the notification refers to.
    #[must_use]
    pub fn for_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// Override the timestamp.
    #[must_use]
    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// A session's notifications.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    notifications: Vec<Notification>,
}

struct Seed {
    kind: NotificationKind,
    priority: Priority,
    title: &'static str,
    message: &'static str,
    minutes_ago: i64,
    read: bool,
}

const CUSTOMER_SEEDS: [Seed; 3] = [
    Seed {
        kind: NotificationKind::Order,
        priority: Priority::Medium,
        title: "Pedido enviado",
        message: "Seu pedido saiu para entrega e chega em breve.",
        minutes_ago: 120,
        read: false,
    },
    Seed {
        kind: NotificationKind::Promotion,
        priority: Priority::Low,
        title: "Cupom de boas-vindas",
        message: "Use PRIMEIRA10 e ganhe 10% de desconto na primeira compra.",
        minutes_ago: 1_440,
        read: false,
    },
    Seed {
        kind: NotificationKind::Order,
        priority: Priority::Low,
        title: "Pedido entregue",
        message: "Seu pedido anterior foi entregue. Conte como ficou!",
        minutes_ago: 4_320,
        read: true,
    },
];

const ADMIN_SEEDS: [Seed; 3] = [
    Seed {
        kind: NotificationKind::Order,
        priority: Priority::High,
        title: "Novo pedido",
        message: "Um novo pedido aguarda confirmação de pagamento.",
        minutes_ago: 5,
        read: false,
    },
    Seed {
        kind: NotificationKind::Stock,
        priority: Priority::High,
        title: "Estoque baixo",
        message: "Alguns produtos estão com poucas unidades em estoque.",
        minutes_ago: 60,
        read: false,
    },
    Seed {
        kind: NotificationKind::System,
        priority: Priority::Low,
        title: "Backup concluído",
        message: "O backup diário dos dados da loja foi concluído.",
        minutes_ago: 1_440,
        read: true,
    },
];

impl NotificationCenter {
    /// Create an empty notification center.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the starting feed for a session.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Time`] if a seed timestamp falls outside the supported range.
    pub fn seeded(role: Role, now: Timestamp) -> Result<Self, NotificationError> {
        let seeds = match role {
            Role::Customer => &CUSTOMER_SEEDS,
            Role::Admin => &ADMIN_SEEDS,
        };

        let mut center = Self::new();

        for seed in seeds {
            let mut notification =
                Notification::new(seed.kind, seed.priority, seed.title, seed.message)
                    .at(now.checked_sub(SignedDuration::from_mins(seed.minutes_ago))?);

            notification.read = seed.read;

            center.push(notification);
        }

        Ok(center)
    }

    /// Add a notification and return its id.
    pub fn push(&mut self, notification: Notification) -> Uuid {
        let id = notification.id;

        debug!(%id, kind = %notification.kind, "notification added");

        self.notifications.push(notification);

        id
    }

    /// Look up a notification.
    pub fn get(&self, id: Uuid) -> Option<&Notification> {
        self.notifications.iter().find(|notification| notification.id == id)
    }

    /// Mark one notification as read.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::NotFound`] for an unknown id.
    pub fn mark_read(&mut self, id: Uuid) -> Result<(), NotificationError> {
        let notification = self
            .notifications
            .iter_mut()
            .find(|notification| notification.id == id)
            .ok_or(NotificationError::NotFound(id))?;

        notification.read = true;

        Ok(())
    }

    /// Mark every notification as read.
    pub fn mark_all_read(&mut self) {
        for notification in &mut self.notifications {
            notification.read = true;
        }
    }

    /// Remove a notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::NotFound`] for an unknown id.
    pub fn delete(&mut self, id: Uuid) -> Result<Notification, NotificationError> {
        let position = self
            .notifications
            .iter()
            .position(|notification| notification.id == id)
            .ok_or(NotificationError::NotFound(id))?;

        Ok(self.notifications.remove(position))
    }

    /// Number of unread notifications.
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|notification| !notification.read).count()
    }

    /// Notifications, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        let mut notifications: Vec<&Notification> = self.notifications.iter().rev().collect();

        notifications.sort_by_key(|notification| Reverse(notification.timestamp));

        notifications.into_iter()
    }

    /// Unread notifications, newest first.
    pub fn unread(&self) -> impl Iterator<Item = &Notification> {
        self.iter().filter(|notification| !notification.read)
    }

    /// Number of notifications.
    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    /// Whether there are no notifications.
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    /// Raise a high priority stock notification for every product at or below
    /// `threshold`. Products that still have an unread stock notification are
    /// skipped.
    ///
    /// Returns the number of notifications added.
    pub fn stock_alerts(&mut self, catalog: &Catalog, threshold: u32) -> usize {
        let alerts: Vec<Notification> = catalog
            .low_stock(threshold)
            .into_iter()
            .filter(|product| !self.has_unread_stock_alert(&product.id))
            .map(|product| {
                Notification::new(
                    NotificationKind::Stock,
                    Priority::High,
                    format!("Estoque baixo: {}", product.name),
                    format!("Restam {} unidades de {}.", product.stock, product.id),
                )
                .for_product(product.id.clone())
            })
            .collect();

        let count = alerts.len();

        for alert in alerts {
            self.push(alert);
        }

        count
    }

    fn has_unread_stock_alert(&self, product_id: &str) -> bool {
        self.unread().any(|notification| {
            notification.kind == NotificationKind::Stock
                && notification.product_id.as_deref() == Some(product_id)
        })
    }
}
