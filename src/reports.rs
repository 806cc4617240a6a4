//! Admin dashboard figures.

use std::io;

use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::{
    catalog::Catalog,
    orders::{Order, OrderStatus},
    prices::{Price, zero},
};

/// A product running out of stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowStockLine {
    /// Catalog id
    pub product_id: String,
    /// Product name
    pub name: String,
    /// Units left
    pub stock: u32,
}

/// Headline figures for the back-office dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// Sum of order totals, cancelled orders excluded
    pub revenue: Price,
    /// Orders placed, cancelled included
    pub order_count: usize,
    /// Revenue per non-cancelled order
    pub average_ticket: Price,
    /// Orders per status, in lifecycle order
    pub status_counts: Vec<(OrderStatus, usize)>,
    /// Units on non-cancelled orders
    pub units_sold: u64,
    /// Products at or below the threshold, lowest first
    pub low_stock: Vec<LowStockLine>,
}

impl DashboardSummary {
    /// Aggregate orders and inventory.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if an order total is in another currency.
    pub fn build(
        orders: &[Order],
        catalog: &Catalog,
        low_stock_threshold: u32,
        currency: &'static Currency,
    ) -> Result<Self, MoneyError> {
        let billable: Vec<&Order> = orders
            .iter()
            .filter(|order| order.status != OrderStatus::Cancelled)
            .collect();

        let revenue = billable
            .iter()
            .try_fold(zero(currency), |total, order| total.add(order.quote.total()))?;

        let average_ticket = match i64::try_from(billable.len()) {
            Ok(count) if count > 0 => Money::from_minor(revenue.to_minor_units() / count, currency),
            _ => zero(currency),
        };

        let status_counts = OrderStatus::ALL
            .iter()
            .map(|status| {
                let count = orders.iter().filter(|order| order.status == *status).count();

                (*status, count)
            })
            .collect();

        let low_stock = catalog
            .low_stock(low_stock_threshold)
            .into_iter()
            .map(|product| LowStockLine {
                product_id: product.id.clone(),
                name: product.name.clone(),
                stock: product.stock,
            })
            .collect();

        Ok(Self {
            revenue,
            order_count: orders.len(),
            average_ticket,
            status_counts,
            units_sold: billable.iter().map(|order| order.item_count()).sum(),
            low_stock,
        })
    }

    /// Number of orders with `status`.
    pub fn count_for(&self, status: OrderStatus) -> usize {
        self.status_counts
            .iter()
            .find(|(candidate, _)| *candidate == status)
            .map_or(0, |(_, count)| *count)
    }

    /// Write the summary as a table.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if writing fails.
    pub fn write_to(&self, out: &mut impl io::Write) -> io::Result<()> {
        let mut builder = Builder::default();

        builder.push_record(["Revenue".to_string(), format!("{}", self.revenue)]);
        builder.push_record(["Orders".to_string(), self.order_count.to_string()]);
        builder.push_record(["Average ticket".to_string(), format!("{}", self.average_ticket)]);
        builder.push_record(["Units sold".to_string(), self.units_sold.to_string()]);

        for (status, count) in &self.status_counts {
            builder.push_record([format!("  {status}"), count.to_string()]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(1..2), Alignment::right());

        writeln!(out, "{table}")?;

        if !self.low_stock.is_empty() {
            let mut builder = Builder::default();

            builder.push_record(["Low stock", "Name", "Units"]);

            for line in &self.low_stock {
                builder.push_record([
                    line.product_id.clone(),
                    line.name.clone(),
                    line.stock.to_string(),
                ]);
            }

            let mut table = builder.build();

            table.with(Style::modern_rounded());
            table.modify(Columns::new(2..3), Alignment::right());

            writeln!(out, "{table}")?;
        }

        Ok(())
    }
}
