//! Bar Chart Generator for Class Distributions
//!
//! Produces one bar per class, in label order, with the bar height equal to the
//! class count. Two outputs are supported:
//! - PNG, rasterised with the `image` crate; text uses the bitmap fonts bundled
//!   with `embedded-graphics`, so no system fonts are needed
//! - SVG, with the same content as vector text
//!
//! Both carry the title, axis labels, a count above each bar and the class names.

use std::convert::Infallible;
use std::fs;
use std::path::Path;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_7X13};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::{DrawTarget, Drawable, OriginDimensions, Pixel, Point, Size};
use embedded_graphics::text::{Alignment, Text};
use image::{Rgb, RgbImage};
use tracing::debug;

use crate::dataset::ClassDistribution;
use crate::utils::error::{DistributionError, Result};

/// Chart styling constants
const CHART_WIDTH: f64 = 1000.0;
const CHART_HEIGHT: f64 = 600.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 100.0;
const MARGIN_LEFT: f64 = 80.0;

/// Headroom above the tallest bar
const Y_HEADROOM: f64 = 1.1;
const GRID_LINES: usize = 5;
const BAR_FILL: f64 = 0.8;

const COLOR_BAR: &str = "#87ceeb";
const COLOR_GRID: &str = "#ecf0f1";
const COLOR_AXIS: &str = "#2c3e50";
const COLOR_TEXT: &str = "#2c3e50";

const PNG_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const PNG_BAR: Rgb<u8> = Rgb([135, 206, 235]);
const PNG_GRID: Rgb<u8> = Rgb([236, 240, 241]);
const PNG_AXIS: Rgb<u8> = Rgb([44, 62, 80]);
const PNG_TEXT: Rgb<u8> = Rgb([33, 33, 33]);

const X_LABEL: &str = "Class Name";
const Y_LABEL: &str = "Number of Samples";

/// Bar chart data
#[derive(Debug, Clone)]
pub struct BarData {
    pub label: String,
    pub value: f64,
}

impl BarData {
    /// One bar per class, in label order
    pub fn from_distribution(dist: &ClassDistribution) -> Vec<BarData> {
        dist.iter()
            .map(|(label, count)| BarData {
                label: label.to_string(),
                value: count as f64,
            })
            .collect()
    }
}

/// Horizontal placement of bar `i`: (x of left edge, width)
struct BarLayout {
    slot: f64,
    width: f64,
}

impl BarLayout {
    fn new(plot_width: f64, n: usize) -> Self {
        let slot = plot_width / n as f64;
        Self {
            slot,
            width: (slot * BAR_FILL).max(1.0),
        }
    }

    fn left(&self, i: usize) -> f64 {
        MARGIN_LEFT + i as f64 * self.slot + (self.slot - self.width) / 2.0
    }
}

fn plot_size() -> (f64, f64) {
    (
        CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT,
        CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM,
    )
}

fn y_range(bars: &[BarData]) -> f64 {
    let max = bars.iter().map(|b| b.value).fold(0.0f64, f64::max);
    (max * Y_HEADROOM).max(1.0)
}

/// Integer tick step giving at most `GRID_LINES` intervals
fn tick_step(y_max: f64) -> f64 {
    (y_max / GRID_LINES as f64).ceil().max(1.0)
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn require_bars(dist: &ClassDistribution) -> Result<Vec<BarData>> {
    if dist.is_empty() {
        return Err(DistributionError::Chart(
            "no classes to plot in an empty distribution".to_string(),
        ));
    }
    Ok(BarData::from_distribution(dist))
}

/// Render a distribution as a PNG bar chart
pub fn render_png(title: &str, dist: &ClassDistribution, output_path: &Path) -> Result<()> {
    let bars = require_bars(dist)?;
    let img = draw_bar_chart(title, X_LABEL, Y_LABEL, &bars);

    ensure_parent(output_path)?;
    img.save(output_path)?;
    debug!("Wrote PNG chart {:?}", output_path);
    Ok(())
}

/// Render a distribution as a labelled SVG bar chart
pub fn render_svg(title: &str, dist: &ClassDistribution, output_path: &Path) -> Result<()> {
    let bars = require_bars(dist)?;
    let svg = bar_chart_svg(title, X_LABEL, Y_LABEL, &bars);

    ensure_parent(output_path)?;
    fs::write(output_path, svg)?;
    debug!("Wrote SVG chart {:?}", output_path);
    Ok(())
}

/// Rasterise a labelled bar chart
pub fn draw_bar_chart(title: &str, x_label: &str, y_label: &str, bars: &[BarData]) -> RgbImage {
    let (plot_width, plot_height) = plot_size();
    let mut img = RgbImage::from_pixel(CHART_WIDTH as u32, CHART_HEIGHT as u32, PNG_BACKGROUND);

    let y_max = y_range(bars);
    let step = tick_step(y_max);
    let baseline = MARGIN_TOP + plot_height;

    draw_text(&mut img, title, CHART_WIDTH / 2.0, 35.0, &FONT_10X20, Alignment::Center);

    // Grid with integer tick labels
    let mut tick = 0.0;
    while tick <= y_max {
        let y = baseline - tick / y_max * plot_height;
        if tick > 0.0 {
            fill_rect(&mut img, MARGIN_LEFT, y, MARGIN_LEFT + plot_width, y + 1.0, PNG_GRID);
        }
        draw_text(
            &mut img,
            &format!("{:.0}", tick),
            MARGIN_LEFT - 10.0,
            y + 4.0,
            &FONT_6X10,
            Alignment::Right,
        );
        tick += step;
    }

    if !bars.is_empty() {
        let layout = BarLayout::new(plot_width, bars.len());
        let max_chars = ((layout.slot / FONT_6X10.character_size.width as f64) as usize).max(1);

        for (i, bar) in bars.iter().enumerate() {
            let x = layout.left(i);
            let top = baseline - bar.value / y_max * plot_height;
            let center = x + layout.width / 2.0;
            fill_rect(&mut img, x, top, x + layout.width, baseline, PNG_BAR);

            draw_text(
                &mut img,
                &format!("{:.0}", bar.value),
                center,
                top - 6.0,
                &FONT_6X10,
                Alignment::Center,
            );

            let label: String = bar.label.chars().take(max_chars).collect();
            draw_text(&mut img, &label, center, baseline + 20.0, &FONT_6X10, Alignment::Center);
        }
    }

    // Axes
    fill_rect(
        &mut img,
        MARGIN_LEFT,
        baseline,
        MARGIN_LEFT + plot_width,
        baseline + 2.0,
        PNG_AXIS,
    );
    fill_rect(
        &mut img,
        MARGIN_LEFT - 2.0,
        MARGIN_TOP,
        MARGIN_LEFT,
        baseline + 2.0,
        PNG_AXIS,
    );

    draw_text(
        &mut img,
        x_label,
        MARGIN_LEFT + plot_width / 2.0,
        CHART_HEIGHT - 25.0,
        &FONT_7X13,
        Alignment::Center,
    );
    // Bitmap fonts cannot rotate, so the y label sits above the axis
    draw_text(&mut img, y_label, 10.0, MARGIN_TOP - 12.0, &FONT_7X13, Alignment::Left);

    img
}

/// `embedded-graphics` draw target over an `RgbImage`
struct Canvas<'a>(&'a mut RgbImage);

impl OriginDimensions for Canvas<'_> {
    fn size(&self) -> Size {
        let (w, h) = self.0.dimensions();
        Size::new(w, h)
    }
}

impl DrawTarget for Canvas<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> std::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (w, h) = self.0.dimensions();
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 || point.x as u32 >= w || point.y as u32 >= h {
                continue;
            }
            self.0
                .put_pixel(point.x as u32, point.y as u32, Rgb([color.r(), color.g(), color.b()]));
        }
        Ok(())
    }
}

/// Draw `text` with its baseline at `y`, aligned around `x`
fn draw_text(img: &mut RgbImage, text: &str, x: f64, y: f64, font: &MonoFont<'_>, alignment: Alignment) {
    let [r, g, b] = PNG_TEXT.0;
    let style = MonoTextStyle::new(font, Rgb888::new(r, g, b));
    let position = Point::new(x.round() as i32, y.round() as i32);
    let _ = Text::with_alignment(text, position, style, alignment).draw(&mut Canvas(img));
}

/// Fill the pixel rectangle [x0, x1) x [y0, y1), clamped to the image bounds.
fn fill_rect(img: &mut RgbImage, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgb<u8>) {
    let (w, h) = img.dimensions();
    let clamp = |v: f64, max: u32| -> u32 { v.round().max(0.0).min(max as f64) as u32 };
    let (x0, x1) = (clamp(x0, w), clamp(x1, w));
    let (y0, y1) = (clamp(y0, h), clamp(y1, h));

    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, color);
        }
    }
}

/// Build the SVG document for a bar chart
pub fn bar_chart_svg(title: &str, x_label: &str, y_label: &str, bars: &[BarData]) -> String {
    let (plot_width, plot_height) = plot_size();
    let y_max = y_range(bars);
    let step = tick_step(y_max);
    let baseline = MARGIN_TOP + plot_height;

    let mut svg = String::new();

    // SVG header
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">"#,
        CHART_WIDTH, CHART_HEIGHT, CHART_WIDTH, CHART_HEIGHT
    ));

    // Background
    svg.push_str(&format!(
        r#"<rect width="{}" height="{}" fill="white"/>"#,
        CHART_WIDTH, CHART_HEIGHT
    ));

    // Title
    svg.push_str(&format!(
        r#"<text x="{}" y="35" text-anchor="middle" font-family="DejaVu Sans, Arial, sans-serif" font-size="18" font-weight="bold" fill="{}">{}</text>"#,
        CHART_WIDTH / 2.0, COLOR_TEXT, escape_xml(title)
    ));

    // Grid lines with integer tick labels
    let mut tick = 0.0;
    while tick <= y_max {
        let y = baseline - tick / y_max * plot_height;

        svg.push_str(&format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="1"/>"#,
            MARGIN_LEFT, y, MARGIN_LEFT + plot_width, y, COLOR_GRID
        ));
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" text-anchor="end" font-family="DejaVu Sans, Arial, sans-serif" font-size="12" fill="{}">{:.0}</text>"#,
            MARGIN_LEFT - 10.0, y + 4.0, COLOR_TEXT, tick
        ));
        tick += step;
    }

    // Axes
    svg.push_str(&format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="2"/>"#,
        MARGIN_LEFT, baseline, MARGIN_LEFT + plot_width, baseline, COLOR_AXIS
    ));
    svg.push_str(&format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="2"/>"#,
        MARGIN_LEFT, MARGIN_TOP, MARGIN_LEFT, baseline, COLOR_AXIS
    ));

    // Axis labels
    svg.push_str(&format!(
        r#"<text x="{}" y="{}" text-anchor="middle" font-family="DejaVu Sans, Arial, sans-serif" font-size="14" fill="{}">{}</text>"#,
        MARGIN_LEFT + plot_width / 2.0, CHART_HEIGHT - 15.0, COLOR_TEXT, escape_xml(x_label)
    ));
    svg.push_str(&format!(
        r#"<text x="20" y="{}" text-anchor="middle" font-family="DejaVu Sans, Arial, sans-serif" font-size="14" fill="{}" transform="rotate(-90 20 {})">{}</text>"#,
        CHART_HEIGHT / 2.0, COLOR_TEXT, CHART_HEIGHT / 2.0, escape_xml(y_label)
    ));

    if !bars.is_empty() {
        let layout = BarLayout::new(plot_width, bars.len());

        for (i, bar) in bars.iter().enumerate() {
            let x = layout.left(i);
            let bar_height = bar.value / y_max * plot_height;
            let y = baseline - bar_height;
            let center = x + layout.width / 2.0;

            svg.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                x, y, layout.width, bar_height, COLOR_BAR
            ));

            // Count on top
            svg.push_str(&format!(
                r#"<text x="{}" y="{}" text-anchor="middle" font-family="DejaVu Sans, Arial, sans-serif" font-size="12" fill="{}">{:.0}</text>"#,
                center, y - 6.0, COLOR_TEXT, bar.value
            ));

            // Class name, rotated so long labels stay readable
            let label_y = baseline + 18.0;
            svg.push_str(&format!(
                r#"<text x="{}" y="{}" text-anchor="end" font-family="DejaVu Sans, Arial, sans-serif" font-size="11" fill="{}" transform="rotate(-35 {} {})">{}</text>"#,
                center, label_y, COLOR_TEXT, center, label_y, escape_xml(&bar.label)
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
