//! Chart rendering: observed window, dashed forecast path, and a vertical
//! marker where the display window opens.
//!
//! Charts are drawn into an in-memory RGB buffer and encoded to PNG, so
//! rendering works the same on headless hosts as on workstations. Captions
//! travel as structured payload fields rather than rasterized text.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use chrono::{Duration, NaiveDate};
use gram_price::NormalizedPoint;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::error::{ForecastError, Result};
use crate::models::ForecastResult;

/// Rendered chart width in pixels
pub const CHART_WIDTH: u32 = 1400;
/// Rendered chart height in pixels
pub const CHART_HEIGHT: u32 = 700;

const OBSERVED_COLOR: RGBColor = RGBColor(212, 175, 55);
const FORECAST_COLOR: RGBColor = RGBColor(46, 139, 87);
const MARKER_COLOR: RGBColor = RGBColor(128, 0, 128);
const GRID_COLOR: RGBColor = RGBColor(225, 225, 225);

/// Render the observed window and forecast into a PNG byte buffer.
///
/// `display_start` sets the left edge of the x-axis and the position of the
/// vertical marker. It only clamps what is drawn; the forecast handed in was
/// fitted on the full series upstream.
pub fn render_png(
    observed: &[NormalizedPoint],
    forecast: &ForecastResult,
    display_start: NaiveDate,
) -> Result<Vec<u8>> {
    let (y_min, y_max) = value_bounds(observed, forecast)?;

    let last_drawn = forecast
        .dates()
        .last()
        .copied()
        .or_else(|| observed.last().map(|p| p.date))
        .ok_or_else(|| ForecastError::Chart("nothing to draw".to_string()))?;
    let x_end = if last_drawn > display_start {
        last_drawn
    } else {
        display_start + Duration::days(1)
    };

    let mut buffer = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
    {
        let root =
            BitMapBackend::with_buffer(&mut buffer, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ForecastError::Chart(e.to_string()))?;

        let mut chart = ChartBuilder::on(&root)
            .margin(12)
            .build_cartesian_2d(display_start..x_end, y_min..y_max)
            .map_err(|e| ForecastError::Chart(e.to_string()))?;

        chart
            .configure_mesh()
            .bold_line_style(&GRID_COLOR)
            .draw()
            .map_err(|e| ForecastError::Chart(e.to_string()))?;

        if !observed.is_empty() {
            chart
                .draw_series(LineSeries::new(
                    observed.iter().map(|p| (p.date, p.gram_price)),
                    OBSERVED_COLOR.stroke_width(2),
                ))
                .map_err(|e| ForecastError::Chart(e.to_string()))?;
        }

        if !forecast.is_empty() {
            chart
                .draw_series(DashedLineSeries::new(
                    forecast.points(),
                    8,
                    4,
                    FORECAST_COLOR.stroke_width(2),
                ))
                .map_err(|e| ForecastError::Chart(e.to_string()))?;
        }

        chart
            .draw_series(DashedLineSeries::new(
                [(display_start, y_min), (display_start, y_max)],
                6,
                4,
                MARKER_COLOR.stroke_width(2),
            ))
            .map_err(|e| ForecastError::Chart(e.to_string()))?;

        root.present()
            .map_err(|e| ForecastError::Chart(e.to_string()))?;
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(&buffer, CHART_WIDTH, CHART_HEIGHT, ColorType::Rgb8)
        .map_err(|e| ForecastError::Chart(e.to_string()))?;

    Ok(png)
}

/// Base64 form of [`render_png`] output, ready for inline embedding
pub fn render_base64(
    observed: &[NormalizedPoint],
    forecast: &ForecastResult,
    display_start: NaiveDate,
) -> Result<String> {
    Ok(BASE64_STANDARD.encode(render_png(observed, forecast, display_start)?))
}

/// Padded y-axis bounds over everything that will be drawn
fn value_bounds(observed: &[NormalizedPoint], forecast: &ForecastResult) -> Result<(f64, f64)> {
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for value in observed
        .iter()
        .map(|p| p.gram_price)
        .chain(forecast.values().iter().copied())
    {
        y_min = y_min.min(value);
        y_max = y_max.max(value);
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        return Err(ForecastError::Chart("no finite values to draw".to_string()));
    }

    let padding = ((y_max - y_min) * 0.04)
        .max(y_max.abs() * 0.01)
        .max(1e-6);
    Ok((y_min - padding, y_max + padding))
}
