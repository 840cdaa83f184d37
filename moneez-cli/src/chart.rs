//! SVG rendering of a year's stacked bars.
//!
//! Hovering a bar shows its `<title>`, "<category>: <sum>". With pacing on,
//! the partial chart is written to disk before every pause, so a viewer that
//! reloads the file watches the bars appear.

use anyhow::{Context, Result};
use moneez_core::{ChartCanvas, LegendEntry, MONTHS, Segment, YearLayout};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::path::{Path, PathBuf};
use std::time::Duration;
use svg::{
    Document, Node,
    node::Text as TextNode,
    node::element::{Line, Rectangle, Text, Title},
};

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 700.0;
const MARGIN: f64 = 50.0;
const LEGEND_WIDTH: f64 = 180.0;
const BAR_WIDTH: f64 = 0.8;

pub struct SvgCanvas {
    path: PathBuf,
    document: Document,
    ymin: f64,
    yrange: f64,
}

fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

impl SvgCanvas {
    /// Prepare an empty chart scaled to `layout`'s extent: title, axes,
    /// month labels and the zero line.
    pub fn new(path: impl Into<PathBuf>, layout: &YearLayout) -> Self {
        let (lo, hi) = layout.extent();
        let (ymin, ymax) = (to_f64(lo), to_f64(hi));
        let yrange = if ymax > ymin { ymax - ymin } else { 1.0 };

        let mut canvas = Self {
            path: path.into(),
            document: Document::new().set(
                "viewBox",
                (-MARGIN, -MARGIN, WIDTH + LEGEND_WIDTH + 2.0 * MARGIN, HEIGHT + 2.0 * MARGIN),
            ),
            ymin,
            yrange,
        };

        canvas.push(
            Text::new()
                .set("x", WIDTH / 2.0)
                .set("y", -MARGIN / 2.0)
                .set("text-anchor", "middle")
                .set("font-size", 20)
                .add(TextNode::new(layout.year.to_string())),
        );
        canvas.push(
            Line::new()
                .set("x1", 0.0)
                .set("x2", 0.0)
                .set("y1", 0.0)
                .set("y2", HEIGHT)
                .set("stroke", "black")
                .set("stroke-width", 1.0),
        );
        for month in 0..MONTHS {
            canvas.push(
                Text::new()
                    .set("x", canvas.x_center(month))
                    .set("y", HEIGHT + 20.0)
                    .set("text-anchor", "middle")
                    .set("font-size", 12)
                    .add(TextNode::new((month + 1).to_string())),
            );
        }
        let zero = canvas.y(0.0);
        canvas.push(
            Line::new()
                .set("x1", 0.0)
                .set("x2", WIDTH)
                .set("y1", zero)
                .set("y2", zero)
                .set("stroke", "red")
                .set("stroke-width", 1.5),
        );
        canvas
    }

    fn push<N: Node + 'static>(&mut self, node: N) {
        let document = std::mem::replace(&mut self.document, Document::new());
        self.document = document.add(node);
    }

    fn slot_width() -> f64 {
        WIDTH / (MONTHS as f64 + 1.0)
    }

    /// Month 0 sits at x = 1 slot, like a 1-based month axis
    fn x_center(&self, month: usize) -> f64 {
        (month as f64 + 1.0) * Self::slot_width()
    }

    fn y(&self, value: f64) -> f64 {
        HEIGHT - (value - self.ymin) / self.yrange * HEIGHT
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        svg::save(&self.path, &self.document)
            .with_context(|| format!("write {}", self.path.display()))
    }
}

impl ChartCanvas for SvgCanvas {
    fn legend(&mut self, entries: &[LegendEntry]) -> Result<()> {
        let x = WIDTH + 20.0;
        for (i, entry) in entries.iter().enumerate() {
            let y = i as f64 * 22.0;
            self.push(
                Rectangle::new()
                    .set("x", x)
                    .set("y", y)
                    .set("width", 14.0)
                    .set("height", 14.0)
                    .set("fill", entry.color.as_str()),
            );
            self.push(
                Text::new()
                    .set("x", x + 20.0)
                    .set("y", y + 12.0)
                    .set("font-size", 12)
                    .add(TextNode::new(entry.category.as_str())),
            );
        }
        Ok(())
    }

    fn segment(&mut self, segment: &Segment) -> Result<()> {
        let (lo, hi) = segment.span();
        let top = self.y(to_f64(hi));
        let bottom = self.y(to_f64(lo));
        let width = BAR_WIDTH * Self::slot_width();

        self.push(
            Rectangle::new()
                .set("x", self.x_center(segment.month) - width / 2.0)
                .set("y", top)
                .set("width", width)
                .set("height", bottom - top)
                .set("fill", segment.color.as_str())
                .add(Title::new().add(TextNode::new(segment.label.as_str()))),
        );
        Ok(())
    }

    fn pause(&mut self, interval: Duration) -> Result<()> {
        self.save()?;
        std::thread::sleep(interval);
        Ok(())
    }
}
