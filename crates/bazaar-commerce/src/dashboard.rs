//! Admin dashboard figures and sales-chart scaling.

use crate::checkout::{Order, OrderStatus};
use crate::money::Money;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Sales total for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySales {
    pub year: i32,
    /// 1-based month.
    pub month: u32,
    pub total: Money,
}

impl MonthlySales {
    pub fn label(&self) -> &'static str {
        MONTH_LABELS[(self.month as usize).saturating_sub(1) % 12]
    }
}

/// One bar of the sales chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartBar {
    pub label: String,
    pub value: Money,
    /// Bar height as a percentage of the tallest bar, 0..=100.
    pub height_percent: u8,
}

/// Scale values to bar heights relative to the largest one.
///
/// A series whose maximum is zero (or negative) yields flat bars.
pub fn scale_bars(series: &[(String, Money)]) -> Vec<ChartBar> {
    let max = series.iter().map(|(_, v)| v.paisa()).max().unwrap_or(0);
    series
        .iter()
        .map(|(label, value)| {
            let height = if max <= 0 || value.paisa() <= 0 {
                0
            } else {
                ((value.paisa() as f64 / max as f64) * 100.0).round() as u8
            };
            ChartBar {
                label: label.clone(),
                value: *value,
                height_percent: height,
            }
        })
        .collect()
}

/// Sales per month for the `months` calendar months ending with `now`'s month,
/// oldest first. Cancelled orders are excluded.
pub fn monthly_sales(orders: &[Order], now: DateTime<Utc>, months: u32) -> Vec<MonthlySales> {
    let mut series: Vec<MonthlySales> = (0..months)
        .rev()
        .map(|back| {
            let (year, month) = months_before(now.year(), now.month(), back);
            MonthlySales {
                year,
                month,
                total: Money::zero(),
            }
        })
        .collect();

    for order in orders {
        if order.status == OrderStatus::Cancelled {
            continue;
        }
        let (year, month) = (order.placed_at.year(), order.placed_at.month());
        if let Some(bucket) = series
            .iter_mut()
            .find(|m| m.year == year && m.month == month)
        {
            bucket.total = bucket.total + order.total_amount;
        }
    }

    series
}

fn months_before(year: i32, month: u32, back: u32) -> (i32, u32) {
    let zero_based = year * 12 + (month as i32 - 1) - back as i32;
    (zero_based.div_euclid(12), zero_based.rem_euclid(12) as u32 + 1)
}

/// Aggregate figures shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_orders: usize,
    pub pending_orders: usize,
    pub revenue: Money,
    pub average_order_value: Money,
    pub product_count: usize,
    pub subscriber_count: usize,
    pub monthly_sales: Vec<MonthlySales>,
    pub chart: Vec<ChartBar>,
}

impl DashboardSummary {
    /// Months shown on the sales chart.
    pub const CHART_MONTHS: u32 = 6;

    pub fn compute(
        orders: &[Order],
        product_count: usize,
        subscriber_count: usize,
        now: DateTime<Utc>,
    ) -> Self {
        let revenue: Money = orders.iter().map(Order::counted_revenue).sum();
        let counted = orders
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .count();
        let average_order_value = if counted == 0 {
            Money::zero()
        } else {
            Money::from_paisa(revenue.paisa() / counted as i64)
        };

        let monthly_sales = monthly_sales(orders, now, Self::CHART_MONTHS);
        let labelled: Vec<(String, Money)> = monthly_sales
            .iter()
            .map(|m| (m.label().to_string(), m.total))
            .collect();

        Self {
            total_orders: orders.len(),
            pending_orders: orders
                .iter()
                .filter(|o| o.status == OrderStatus::Pending)
                .count(),
            revenue,
            average_order_value,
            product_count,
            subscriber_count,
            chart: scale_bars(&labelled),
            monthly_sales,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::checkout::{Cart, CartLine, CheckoutForm, Customer};
    use chrono::TimeZone;

    fn order_at(total_rupees: i64, placed_at: DateTime<Utc>, status: OrderStatus) -> Order {
        let product = Product::new("Kurta", "men", "kurta", Money::rupees(total_rupees));
        let cart: Cart = vec![CartLine::product(&product, 1)].into_iter().collect();
        let form = CheckoutForm {
            customer: Customer {
                full_name: "A".into(),
                phone: "1".into(),
                email: "a@b.com".into(),
                address: "x".into(),
                city: "y".into(),
                province: "z".into(),
                postal_code: "1".into(),
            },
            ..Default::default()
        };
        let mut order = Order::place(&form, &cart, Money::zero(), placed_at).unwrap();
        order.status = status;
        order
    }

    #[test]
    fn test_scale_bars() {
        let bars = scale_bars(&[
            ("Jan".into(), Money::rupees(50)),
            ("Feb".into(), Money::rupees(200)),
            ("Mar".into(), Money::zero()),
        ]);
        assert_eq!(bars[0].height_percent, 25);
        assert_eq!(bars[1].height_percent, 100);
        assert_eq!(bars[2].height_percent, 0);
    }

    #[test]
    fn test_scale_bars_all_zero() {
        let bars = scale_bars(&[("Jan".into(), Money::zero())]);
        assert_eq!(bars[0].height_percent, 0);
        assert!(scale_bars(&[]).is_empty());
    }

    #[test]
    fn test_months_before_wraps_year() {
        assert_eq!(months_before(2026, 2, 3), (2025, 11));
        assert_eq!(months_before(2026, 12, 0), (2026, 12));
    }

    #[test]
    fn test_summary() {
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
        let jan = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        let orders = vec![
            order_at(1000, now, OrderStatus::Pending),
            order_at(500, jan, OrderStatus::Delivered),
            order_at(700, jan, OrderStatus::Cancelled),
        ];

        let summary = DashboardSummary::compute(&orders, 12, 4, now);

        assert_eq!(summary.total_orders, 3);
        assert_eq!(summary.pending_orders, 1);
        assert_eq!(summary.revenue, Money::rupees(1500));
        assert_eq!(summary.average_order_value, Money::rupees(750));
        assert_eq!(summary.monthly_sales.len(), 6);

        let last = summary.monthly_sales.last().unwrap();
        assert_eq!((last.year, last.month), (2026, 3));
        assert_eq!(last.total, Money::rupees(1000));
        assert_eq!(summary.chart.last().unwrap().height_percent, 100);
        assert_eq!(summary.chart[3].label, "Jan");
        assert_eq!(summary.chart[3].height_percent, 50);
    }
}
