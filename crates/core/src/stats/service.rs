//! Statistics service.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;
use worklio_shared::types::CurrencyCode;

use super::types::{
    ClientRecord, DashboardStats, DateRange, InvoiceRecord, InvoiceStats, InvoiceStatus,
    InvoiceSummary, TimeEntryRecord, TimeEntryStats, TimeEntrySummary, UNKNOWN_CLIENT, ViewMode,
};
use crate::currency::CurrencyAggregator;

/// Builds reports in a user's reporting currency.
#[derive(Debug, Clone)]
pub struct StatsService {
    aggregator: CurrencyAggregator,
}

fn sum_hours(hours: impl Iterator<Item = Decimal>) -> Decimal {
    hours.fold(Decimal::ZERO, Decimal::saturating_add)
}

fn index_clients(clients: &[ClientRecord]) -> HashMap<i64, &ClientRecord> {
    clients.iter().map(|client| (client.id, client)).collect()
}

impl StatsService {
    /// Creates a service over `aggregator`.
    #[must_use]
    pub const fn new(aggregator: CurrencyAggregator) -> Self {
        Self { aggregator }
    }

    /// Dashboard totals for entries and invoices within `range`.
    ///
    /// Entries of unknown clients count toward hours but not revenue.
    /// Invoices of unknown clients and drafts are left out of both invoice
    /// totals.
    pub async fn dashboard(
        &self,
        reporting: &CurrencyCode,
        clients: &[ClientRecord],
        entries: &[TimeEntryRecord],
        invoices: &[InvoiceRecord],
        range: DateRange,
    ) -> DashboardStats {
        let by_id = index_clients(clients);

        let in_range: Vec<&TimeEntryRecord> =
            entries.iter().filter(|e| range.contains(e.date)).collect();
        let total_hours = sum_hours(in_range.iter().map(|e| e.hours));

        let revenue_items: Vec<(Decimal, &CurrencyCode)> = in_range
            .iter()
            .filter_map(|entry| {
                by_id.get(&entry.client_id).map(|client| {
                    (
                        entry.hours.saturating_mul(client.hourly_rate),
                        &client.currency,
                    )
                })
            })
            .collect();

        let invoice_items: Vec<(InvoiceStatus, Decimal, &CurrencyCode)> = invoices
            .iter()
            .filter(|invoice| range.contains(invoice.issue_date))
            .filter(|invoice| invoice.status != InvoiceStatus::Draft)
            .filter_map(|invoice| {
                by_id
                    .get(&invoice.client_id)
                    .map(|client| (invoice.status, invoice.total(), &client.currency))
            })
            .collect();

        let currencies = revenue_items
            .iter()
            .map(|(_, currency)| *currency)
            .chain(invoice_items.iter().map(|(_, _, currency)| *currency));
        let mut table = self.aggregator.conversion_table(currencies, reporting).await;

        let total_revenue = table.sum(revenue_items.iter().copied());
        let (by_status, _) = table.sum_partitioned(invoice_items.iter().copied());
        let subtotal = |status: InvoiceStatus| by_status.get(&status).copied().unwrap_or_default();

        debug!(
            reporting_currency = %reporting,
            entries = in_range.len(),
            invoices = invoice_items.len(),
            "Computed dashboard stats"
        );

        DashboardStats {
            currency: reporting.clone(),
            total_hours,
            total_revenue,
            unpaid_invoices: subtotal(InvoiceStatus::Sent)
                .saturating_add(subtotal(InvoiceStatus::Overdue)),
            paid_invoices: subtotal(InvoiceStatus::Paid),
            fallback_currencies: table.fallbacks(),
        }
    }

    /// Invoice totals in the reporting currency.
    ///
    /// Totals always cover every invoice; `status` only narrows the list.
    /// Invoices of unknown clients are listed under "Unknown" and treated as
    /// USD.
    pub async fn invoices(
        &self,
        reporting: &CurrencyCode,
        clients: &[ClientRecord],
        invoices: &[InvoiceRecord],
        status: Option<InvoiceStatus>,
    ) -> InvoiceStats {
        let by_id = index_clients(clients);
        let fallback_currency = CurrencyCode::usd();

        let summaries: Vec<InvoiceSummary> = invoices
            .iter()
            .map(|invoice| {
                let (client_name, client_currency) = by_id.get(&invoice.client_id).map_or_else(
                    || (UNKNOWN_CLIENT.to_string(), fallback_currency.clone()),
                    |client| (client.name.clone(), client.currency.clone()),
                );
                InvoiceSummary {
                    id: invoice.id,
                    client_id: invoice.client_id,
                    client_name,
                    client_currency,
                    issue_date: invoice.issue_date,
                    status: invoice.status,
                    total_hours: invoice.total_hours(),
                    total_amount: invoice.total(),
                }
            })
            .collect();

        let mut table = self
            .aggregator
            .conversion_table(summaries.iter().map(|s| &s.client_currency), reporting)
            .await;
        let (by_status, total_amount) = table.sum_partitioned(
            summaries
                .iter()
                .map(|s| (s.status, s.total_amount, &s.client_currency)),
        );
        let subtotal = |status: InvoiceStatus| by_status.get(&status).copied().unwrap_or_default();

        let listed: Vec<InvoiceSummary> = summaries
            .iter()
            .filter(|s| status.is_none_or(|wanted| s.status == wanted))
            .cloned()
            .collect();

        InvoiceStats {
            currency: reporting.clone(),
            total_invoices: listed.len(),
            invoices: listed,
            total_amount,
            paid_amount: subtotal(InvoiceStatus::Paid),
            unpaid_amount: subtotal(InvoiceStatus::Sent)
                .saturating_add(subtotal(InvoiceStatus::Overdue)),
            fallback_currencies: table.fallbacks(),
        }
    }

    /// Entries and totals for the `view_mode` window containing `date`.
    ///
    /// Entries of unknown clients are listed under "Unknown" with a zero
    /// rate, so they add hours but no revenue.
    pub async fn time_entries(
        &self,
        reporting: &CurrencyCode,
        clients: &[ClientRecord],
        entries: &[TimeEntryRecord],
        view_mode: ViewMode,
        date: NaiveDate,
    ) -> TimeEntryStats {
        let by_id = index_clients(clients);
        let (start_date, end_date) = view_mode.window(date);
        let range = view_mode.range(date);

        let mut summaries: Vec<TimeEntrySummary> = entries
            .iter()
            .filter(|entry| range.contains(entry.date))
            .map(|entry| {
                let (client_name, client_currency, hourly_rate) =
                    by_id.get(&entry.client_id).map_or_else(
                        || (UNKNOWN_CLIENT.to_string(), reporting.clone(), Decimal::ZERO),
                        |client| (client.name.clone(), client.currency.clone(), client.hourly_rate),
                    );
                TimeEntrySummary {
                    id: entry.id,
                    client_id: entry.client_id,
                    client_name,
                    client_currency,
                    date: entry.date,
                    hours: entry.hours,
                    hourly_rate,
                }
            })
            .collect();
        summaries.sort_by_key(|s| (s.date, s.id));

        let mut table = self
            .aggregator
            .conversion_table(summaries.iter().map(|s| &s.client_currency), reporting)
            .await;
        let total_hours = sum_hours(summaries.iter().map(|s| s.hours));
        let total_revenue = table.sum(
            summaries
                .iter()
                .map(|s| (s.hours.saturating_mul(s.hourly_rate), &s.client_currency)),
        );

        TimeEntryStats {
            currency: reporting.clone(),
            view_mode,
            start_date,
            end_date,
            entries: summaries,
            total_hours,
            total_revenue,
            fallback_currencies: table.fallbacks(),
        }
    }
}
