//! Statistics input records and report types.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use worklio_shared::types::CurrencyCode;

use super::error::StatsError;

/// Client name shown when an entry references a deleted client.
pub const UNKNOWN_CLIENT: &str = "Unknown";

/// Reporting currency for a user: their preference, or USD when unset.
#[must_use]
pub fn reporting_currency(preference: Option<&CurrencyCode>) -> CurrencyCode {
    preference.cloned().unwrap_or_else(CurrencyCode::usd)
}

// ============================================================================
// Inputs
// ============================================================================

/// A client as far as reporting is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Client ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Hourly rate in the client's currency.
    pub hourly_rate: Decimal,
    /// Billing currency.
    pub currency: CurrencyCode,
}

/// A recorded block of billable time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntryRecord {
    /// Entry ID.
    pub id: i64,
    /// Client the time was spent for.
    pub client_id: i64,
    /// Day the work happened.
    pub date: NaiveDate,
    /// Hours worked.
    pub hours: Decimal,
}

/// One billed line of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Hours billed.
    pub hours: Decimal,
    /// Rate the hours were billed at.
    pub hourly_rate: Decimal,
}

impl InvoiceLine {
    /// Line amount, saturating at the decimal bounds.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.hours.saturating_mul(self.hourly_rate)
    }
}

/// An invoice with its billed lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Invoice ID.
    pub id: i64,
    /// Billed client.
    pub client_id: i64,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Lifecycle status.
    pub status: InvoiceStatus,
    /// Billed lines.
    pub lines: Vec<InvoiceLine>,
}

impl InvoiceRecord {
    /// Invoice total in the client's currency.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(InvoiceLine::amount)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Hours billed on the invoice.
    #[must_use]
    pub fn total_hours(&self) -> Decimal {
        self.lines
            .iter()
            .map(|line| line.hours)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}

/// Invoice lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Not yet sent.
    Draft,
    /// Sent and awaiting payment.
    Sent,
    /// Paid.
    Paid,
    /// Past due date and unpaid.
    Overdue,
}

impl InvoiceStatus {
    /// Returns the status as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
        }
    }

    /// Sent or overdue.
    #[must_use]
    pub const fn is_unpaid(&self) -> bool {
        matches!(self, Self::Sent | Self::Overdue)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            _ => Err(StatsError::InvalidStatus(s.to_string())),
        }
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Optional inclusive date bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First included day.
    pub from: Option<NaiveDate>,
    /// Last included day.
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Range with no bounds.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { from: None, to: None }
    }

    /// Creates a range, rejecting `from` after `to`.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, StatsError> {
        if let (Some(start), Some(end)) = (from, to)
            && start > end
        {
            return Err(StatsError::InvalidDateRange { start, end });
        }
        Ok(Self { from, to })
    }

    /// Returns true if `date` lies within the bounds.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// Granularity of the time-entry statistics window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// The given day.
    Daily,
    /// Monday through Sunday containing the given day.
    Weekly,
    /// Calendar month containing the given day.
    Monthly,
}

impl ViewMode {
    /// Returns the mode as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Inclusive first and last day of the window containing `date`.
    #[must_use]
    pub fn window(&self, date: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Daily => (date, date),
            Self::Weekly => {
                let start =
                    date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
                (start, start + Duration::days(6))
            }
            Self::Monthly => {
                let start = date - Duration::days(i64::from(date.day0()));
                let end = start
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(NaiveDate::MAX);
                (start, end)
            }
        }
    }

    /// The window as a [`DateRange`].
    #[must_use]
    pub fn range(&self, date: NaiveDate) -> DateRange {
        let (start, end) = self.window(date);
        DateRange {
            from: Some(start),
            to: Some(end),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(StatsError::InvalidViewMode(s.to_string())),
        }
    }
}

// ============================================================================
// Reports
// ============================================================================

/// Dashboard totals in the reporting currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Reporting currency.
    pub currency: CurrencyCode,
    /// Hours across all entries in range.
    pub total_hours: Decimal,
    /// Revenue of entries with a known client.
    pub total_revenue: Decimal,
    /// Sent and overdue invoice totals.
    pub unpaid_invoices: Decimal,
    /// Paid invoice totals.
    pub paid_invoices: Decimal,
    /// Currencies summed at 1:1.
    pub fallback_currencies: Vec<CurrencyCode>,
}

/// One invoice in the invoice statistics list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceSummary {
    /// Invoice ID.
    pub id: i64,
    /// Client ID.
    pub client_id: i64,
    /// Client name.
    pub client_name: String,
    /// Currency the invoice is billed in.
    pub client_currency: CurrencyCode,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Status.
    pub status: InvoiceStatus,
    /// Hours billed.
    pub total_hours: Decimal,
    /// Total in the client's currency.
    pub total_amount: Decimal,
}

/// Invoice statistics in the reporting currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceStats {
    /// Reporting currency.
    pub currency: CurrencyCode,
    /// Invoices matching the status filter.
    pub invoices: Vec<InvoiceSummary>,
    /// Number of listed invoices.
    pub total_invoices: usize,
    /// Total across all invoices, regardless of the filter.
    pub total_amount: Decimal,
    /// Paid total.
    pub paid_amount: Decimal,
    /// Sent and overdue total.
    pub unpaid_amount: Decimal,
    /// Currencies summed at 1:1.
    pub fallback_currencies: Vec<CurrencyCode>,
}

/// One entry in the time-entry statistics list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeEntrySummary {
    /// Entry ID.
    pub id: i64,
    /// Client ID.
    pub client_id: i64,
    /// Client name, or "Unknown".
    pub client_name: String,
    /// Client currency, or the reporting currency for unknown clients.
    pub client_currency: CurrencyCode,
    /// Day worked.
    pub date: NaiveDate,
    /// Hours worked.
    pub hours: Decimal,
    /// Client hourly rate, zero for unknown clients.
    pub hourly_rate: Decimal,
}

/// Time-entry statistics for one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeEntryStats {
    /// Reporting currency.
    pub currency: CurrencyCode,
    /// Window granularity.
    pub view_mode: ViewMode,
    /// First day of the window.
    pub start_date: NaiveDate,
    /// Last day of the window.
    pub end_date: NaiveDate,
    /// Entries in the window.
    pub entries: Vec<TimeEntrySummary>,
    /// Hours in the window.
    pub total_hours: Decimal,
    /// Revenue in the reporting currency.
    pub total_revenue: Decimal,
    /// Currencies summed at 1:1.
    pub fallback_currencies: Vec<CurrencyCode>,
}
