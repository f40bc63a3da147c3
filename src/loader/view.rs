//! Display contract
//!
//! Named text fields the loader writes into. On the browser these are DOM
//! elements owned by the page markup; natively they are held by a
//! [`TextPanel`].

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::RwLock;

/// Text fields the loader writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DisplayField {
    CriticalAlerts,
    PendingItems,
    CompletedItems,
    EfficiencyRate,
    LastUpdate,
}

impl DisplayField {
    pub const ALL: [DisplayField; 5] = [
        DisplayField::CriticalAlerts,
        DisplayField::PendingItems,
        DisplayField::CompletedItems,
        DisplayField::EfficiencyRate,
        DisplayField::LastUpdate,
    ];

    /// Element id in the page markup
    pub fn element_id(&self) -> &'static str {
        match self {
            DisplayField::CriticalAlerts => "criticalAlerts",
            DisplayField::PendingItems => "pendingItems",
            DisplayField::CompletedItems => "completedItems",
            DisplayField::EfficiencyRate => "efficiencyRate",
            DisplayField::LastUpdate => "lastUpdate",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            DisplayField::CriticalAlerts => "Critical alerts",
            DisplayField::PendingItems => "Pending",
            DisplayField::CompletedItems => "Completed",
            DisplayField::EfficiencyRate => "Efficiency",
            DisplayField::LastUpdate => "Last update",
        }
    }
}

/// Sink for dashboard text.
///
/// `write_text` returns `false` when the target field does not exist; the
/// loader treats that as a no-op.
pub trait DashboardView: Send + Sync {
    fn write_text(&self, field: DisplayField, text: &str) -> bool;
}

impl<V: DashboardView + ?Sized> DashboardView for std::sync::Arc<V> {
    fn write_text(&self, field: DisplayField, text: &str) -> bool {
        (**self).write_text(field, text)
    }
}

/// In-memory set of display fields
#[derive(Debug, Default)]
pub struct TextPanel {
    values: RwLock<BTreeMap<DisplayField, String>>,
    absent: HashSet<DisplayField>,
}

impl TextPanel {
    /// Panel with every field present
    pub fn new() -> Self {
        Self::default()
    }

    /// Panel missing the given fields, as a page without them would be
    pub fn without(fields: &[DisplayField]) -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            absent: fields.iter().copied().collect(),
        }
    }

    /// Current text of a field
    pub fn text(&self, field: DisplayField) -> Option<String> {
        self.values
            .read()
            .ok()
            .and_then(|values| values.get(&field).cloned())
    }

    /// All written fields in display order
    pub fn snapshot(&self) -> Vec<(DisplayField, String)> {
        self.values
            .read()
            .map(|values| values.iter().map(|(f, v)| (*f, v.clone())).collect())
            .unwrap_or_default()
    }
}

impl DashboardView for TextPanel {
    fn write_text(&self, field: DisplayField, text: &str) -> bool {
        if self.absent.contains(&field) {
            return false;
        }
        match self.values.write() {
            Ok(mut values) => {
                values.insert(field, text.to_string());
                true
            }
            Err(_) => false,
        }
    }
}

impl fmt::Display for TextPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, value) in self.snapshot() {
            writeln!(f, "{:<16} {}", field.label(), value)?;
        }
        Ok(())
    }
}
