//! Stacked-bar layout for one year.
//!
//! Categories are discovered in first-seen order: months 0..11, and within a
//! month in bucket order. That order fixes legend order, stacking order and
//! the fallback color of each category, so identical input always produces
//! identical colors.
//!
//! Per month there are two independent stacks starting at zero: categories
//! with a non-negative sum grow upward from `bottom_positives`, categories
//! with a negative sum grow downward from `top_negatives`.

use crate::category::CategoryMaps;
use crate::ledger::{MONTHS, YearBuckets, round_cents};
use anyhow::Result;
use rust_decimal::Decimal;
use std::time::Duration;

/// Fallback palette ("tab10"), indexed by discovery position
pub const DEFAULT_CYCLE: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub category: String,
    pub color: String,
}

/// One category's contribution to one month's bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// 0-based month
    pub month: usize,
    pub category: String,
    pub color: String,
    /// Where the segment starts (top of the stack it sits on)
    pub bottom: Decimal,
    /// Signed sum; negative segments extend downward from `bottom`
    pub height: Decimal,
    /// Hover label, "<category>: <sum:.2>"
    pub label: String,
}

/// A configured color whose category never occurs in the year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedColor {
    pub category: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearLayout {
    pub year: i32,
    pub legend: Vec<LegendEntry>,
    /// Month-major, categories in discovery order within a month
    pub segments: Vec<Segment>,
    pub unused_colors: Vec<UnusedColor>,
}

/// Rendering collaborator: draws what the layout engine places.
pub trait ChartCanvas {
    fn legend(&mut self, entries: &[LegendEntry]) -> Result<()>;
    fn segment(&mut self, segment: &Segment) -> Result<()>;
    /// Cosmetic delay between segments
    fn pause(&mut self, interval: Duration) -> Result<()>;
}

impl Segment {
    pub fn top(&self) -> Decimal {
        self.bottom + self.height
    }

    /// (low, high) extent regardless of sign
    pub fn span(&self) -> (Decimal, Decimal) {
        let top = self.top();
        (self.bottom.min(top), self.bottom.max(top))
    }
}

/// Categories of a year in first-seen order
pub fn discover_categories(buckets: &YearBuckets<'_>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for txn in buckets.iter() {
        if !seen.iter().any(|c| *c == txn.category) {
            seen.push(txn.category.clone());
        }
    }
    seen
}

/// Lay out a year's buckets as stacked bars.
///
/// Color per category: configured color > `default_color` > `DEFAULT_CYCLE`
/// at the category's discovery index.
pub fn layout_year(
    buckets: &YearBuckets<'_>,
    maps: &CategoryMaps,
    default_color: Option<&str>,
) -> YearLayout {
    let categories = discover_categories(buckets);

    let legend: Vec<LegendEntry> = categories
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let color = maps
                .color_of(category)
                .or(default_color)
                .unwrap_or(DEFAULT_CYCLE[i % DEFAULT_CYCLE.len()]);
            LegendEntry {
                category: category.clone(),
                color: color.to_string(),
            }
        })
        .collect();

    let unused_colors: Vec<UnusedColor> = maps
        .colors()
        .iter()
        .filter(|(category, _)| !categories.contains(category))
        .map(|(category, color)| UnusedColor {
            category: category.clone(),
            color: color.clone(),
        })
        .collect();
    if !unused_colors.is_empty() {
        tracing::warn!("Categories for {}: {}", buckets.year, categories.join(", "));
        for unused in &unused_colors {
            tracing::warn!(
                "Unused category-color assignment? {}: {}",
                unused.category,
                unused.color
            );
        }
    }

    let mut segments = Vec::with_capacity(MONTHS * legend.len());
    for (month, txns) in buckets.months.iter().enumerate() {
        let mut bottom_positives = Decimal::ZERO;
        let mut top_negatives = Decimal::ZERO;

        for entry in &legend {
            let sum: Decimal = txns
                .iter()
                .filter(|t| t.category == entry.category)
                .map(|t| t.amount)
                .sum();

            let bottom = if sum >= Decimal::ZERO {
                bottom_positives
            } else {
                top_negatives
            };
            segments.push(Segment {
                month,
                category: entry.category.clone(),
                color: entry.color.clone(),
                bottom,
                height: sum,
                label: format!("{}: {:.2}", entry.category, round_cents(sum)),
            });

            if sum >= Decimal::ZERO {
                bottom_positives += sum;
            } else {
                top_negatives += sum;
            }
        }
    }

    YearLayout {
        year: buckets.year,
        legend,
        segments,
        unused_colors,
    }
}

impl YearLayout {
    /// Segments of a 0-based month
    pub fn month(&self, month: usize) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(move |s| s.month == month)
    }

    /// Lowest and highest stack extent over all months (always spans zero)
    pub fn extent(&self) -> (Decimal, Decimal) {
        self.segments
            .iter()
            .map(Segment::span)
            .fold((Decimal::ZERO, Decimal::ZERO), |(lo, hi), (l, h)| {
                (lo.min(l), hi.max(h))
            })
    }

    /// Hand legend and segments to `canvas`, pausing after every segment
    /// when `pacing` is set and non-zero.
    pub fn draw(&self, canvas: &mut dyn ChartCanvas, pacing: Option<Duration>) -> Result<()> {
        canvas.legend(&self.legend)?;
        let pacing = pacing.filter(|d| !d.is_zero());
        for segment in &self.segments {
            canvas.segment(segment)?;
            if let Some(interval) = pacing {
                canvas.pause(interval)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use crate::transaction::Transaction;
    use chrono::NaiveDate;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn txn(m: u32, day: u32, amount: &str, category: &str) -> Transaction {
        Transaction::new(NaiveDate::from_ymd_opt(2023, m, day).unwrap(), "x", d(amount))
            .with_category(category)
    }

    fn ledger(txns: Vec<Transaction>) -> Ledger {
        let mut ledger = Ledger::new();
        for t in txns {
            ledger.insert(t);
        }
        ledger
    }

    #[derive(Default)]
    struct Recorder {
        legend: usize,
        segments: Vec<String>,
        pauses: usize,
    }

    impl ChartCanvas for Recorder {
        fn legend(&mut self, entries: &[LegendEntry]) -> Result<()> {
            self.legend = entries.len();
            Ok(())
        }
        fn segment(&mut self, segment: &Segment) -> Result<()> {
            self.segments.push(segment.label.clone());
            Ok(())
        }
        fn pause(&mut self, _interval: Duration) -> Result<()> {
            self.pauses += 1;
            Ok(())
        }
    }

    #[test]
    fn test_salary_and_rent_stack_apart() {
        let l = ledger(vec![txn(1, 5, "100.00", "Salary"), txn(1, 10, "-40.00", "Rent")]);
        let layout = layout_year(&l.year(2023), &CategoryMaps::new(), None);

        let jan: Vec<_> = layout.month(0).collect();
        assert_eq!(jan.len(), 2);
        assert_eq!(jan[0].category, "Salary");
        assert_eq!((jan[0].bottom, jan[0].height), (Decimal::ZERO, d("100.00")));
        assert_eq!(jan[1].category, "Rent");
        assert_eq!((jan[1].bottom, jan[1].height), (Decimal::ZERO, d("-40.00")));
        assert_eq!(jan[0].label, "Salary: 100.00");
        assert_eq!(jan[1].label, "Rent: -40.00");
        assert_eq!(layout.extent(), (d("-40.00"), d("100.00")));
    }

    #[test]
    fn test_label_rounds_to_cents() {
        let l = ledger(vec![
            txn(2, 1, "1.2345", "Snacks"),
            txn(2, 2, "0.0045", "Snacks"),
            txn(2, 3, "-3.004", "Fees"),
        ]);
        let layout = layout_year(&l.year(2023), &CategoryMaps::new(), None);
        let feb: Vec<_> = layout.month(1).collect();
        assert_eq!(feb[0].label, "Snacks: 1.24");
        assert_eq!(feb[0].height, d("1.239"));
        assert_eq!(feb[1].label, "Fees: -3.00");
    }

    #[test]
    fn test_discovery_order_fixes_colors() {
        let l = ledger(vec![
            txn(3, 1, "1", "C"),
            txn(1, 1, "1", "A"),
            txn(1, 2, "1", "B"),
            txn(2, 1, "1", "A"),
        ]);
        let layout = layout_year(&l.year(2023), &CategoryMaps::new(), None);
        let order: Vec<_> = layout.legend.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
        assert_eq!(layout.legend[0].color, DEFAULT_CYCLE[0]);
        assert_eq!(layout.legend[2].color, DEFAULT_CYCLE[2]);
    }

    #[test]
    fn test_color_precedence() {
        let l = ledger(vec![txn(1, 1, "1", "A"), txn(1, 2, "1", "B")]);
        let maps = CategoryMaps::new().with_colors([("B", "navy")]);
        let layout = layout_year(&l.year(2023), &maps, Some("gray"));
        assert_eq!(layout.legend[0].color, "gray");
        assert_eq!(layout.legend[1].color, "navy");
        assert!(layout.unused_colors.is_empty());
    }

    #[test]
    fn test_unused_color_is_reported() {
        let l = ledger(vec![txn(1, 1, "1", "A")]);
        let maps = CategoryMaps::new().with_colors([("Travel", "orange")]);
        let layout = layout_year(&l.year(2023), &maps, None);
        assert_eq!(
            layout.unused_colors,
            vec![UnusedColor {
                category: "Travel".into(),
                color: "orange".into()
            }]
        );
        assert_eq!(layout.legend.len(), 1);
    }

    #[test]
    fn test_stacks_do_not_overlap() {
        let l = ledger(vec![
            txn(4, 1, "10", "A"),
            txn(4, 2, "-5", "B"),
            txn(4, 3, "0", "C"),
            txn(4, 4, "7.5", "D"),
            txn(4, 5, "-2.25", "E"),
            txn(5, 1, "3", "A"),
        ]);
        let layout = layout_year(&l.year(2023), &CategoryMaps::new(), None);
        let april: Vec<_> = layout.month(3).collect();
        assert_eq!(april.len(), 5);

        let pos: Vec<_> = april.iter().filter(|s| s.height >= Decimal::ZERO).collect();
        let neg: Vec<_> = april.iter().filter(|s| s.height < Decimal::ZERO).collect();

        // each segment starts where the previous one of its stack ended
        for w in pos.windows(2) {
            assert_eq!(w[1].bottom, w[0].top());
        }
        for w in neg.windows(2) {
            assert_eq!(w[1].bottom, w[0].top());
        }
        let pos_total: Decimal = pos.iter().map(|s| s.height).sum();
        let neg_total: Decimal = neg.iter().map(|s| s.height.abs()).sum();
        assert_eq!(pos_total, pos.last().unwrap().top());
        assert_eq!(neg_total, neg.last().unwrap().top().abs());
        assert_eq!(pos_total, d("17.5"));
        assert_eq!(neg_total, d("7.25"));

        // zero-height C sits on top of A and does not disturb D
        assert_eq!(april[2].category, "C");
        assert_eq!((april[2].bottom, april[2].height), (d("10"), Decimal::ZERO));
        assert_eq!(april[3].bottom, d("10"));
    }

    #[test]
    fn test_every_month_gets_every_category() {
        let l = ledger(vec![txn(1, 1, "1", "A"), txn(6, 1, "-1", "B")]);
        let layout = layout_year(&l.year(2023), &CategoryMaps::new(), None);
        assert_eq!(layout.segments.len(), 24);
        let feb: Vec<_> = layout.month(1).collect();
        assert!(feb.iter().all(|s| s.height.is_zero() && s.label.ends_with(": 0.00")));
    }

    #[test]
    fn test_conservation_per_month() {
        let l = ledger(vec![
            txn(2, 1, "12.34", "A"),
            txn(2, 2, "-1.11", "A"),
            txn(2, 3, "-9.99", "B"),
            txn(2, 4, "4.00", "C"),
        ]);
        let layout = layout_year(&l.year(2023), &CategoryMaps::new(), None);
        let segment_sum: Decimal = layout.month(1).map(|s| s.height).sum();
        let truth: Decimal = l.year(2023).months[1].iter().map(|t| t.amount).sum();
        assert_eq!(segment_sum, truth);
    }

    #[test]
    fn test_draw_paces_only_when_nonzero() {
        let l = ledger(vec![txn(1, 1, "1", "A")]);
        let layout = layout_year(&l.year(2023), &CategoryMaps::new(), None);

        let mut rec = Recorder::default();
        layout.draw(&mut rec, Some(Duration::ZERO)).unwrap();
        assert_eq!(rec.pauses, 0);
        assert_eq!(rec.segments.len(), 12);
        assert_eq!(rec.legend, 1);

        let mut rec = Recorder::default();
        layout.draw(&mut rec, Some(Duration::from_millis(5))).unwrap();
        assert_eq!(rec.pauses, 12);
    }

    #[test]
    fn test_empty_year_has_no_segments() {
        let l = Ledger::new();
        let layout = layout_year(&l.year(2023), &CategoryMaps::new(), None);
        assert!(layout.legend.is_empty());
        assert!(layout.segments.is_empty());
        assert_eq!(layout.extent(), (Decimal::ZERO, Decimal::ZERO));
    }
}
