//! Volcano plots (L2FC against -log10 p) rendered to PNG with plotters.

use std::ops::Range;
use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use crate::analysis::{Comparison, Regulation};

const GREY: RGBColor = RGBColor(128, 128, 128);

/// Point groups and title of one volcano plot. Non-finite points are dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VolcanoFigure {
    pub title: String,
    pub up: Vec<(f64, f64)>,
    pub down: Vec<(f64, f64)>,
    pub rest: Vec<(f64, f64)>,
}

impl VolcanoFigure {
    pub fn from_comparison(comparison: &Comparison) -> Self {
        let finite = |points: Vec<(f64, f64)>| -> Vec<(f64, f64)> {
            points
                .into_iter()
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .collect()
        };
        VolcanoFigure {
            title: comparison.title(),
            up: finite(comparison.points(Regulation::Up)),
            down: finite(comparison.points(Regulation::Down)),
            rest: finite(comparison.points(Regulation::Unchanged)),
        }
    }

    pub fn n_points(&self) -> usize {
        self.up.len() + self.down.len() + self.rest.len()
    }

    fn all_points(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.up.iter().chain(&self.down).chain(&self.rest)
    }

    /// Axis ranges with 5% padding; x is symmetric about zero so up and down read alike.
    pub fn bounds(&self) -> (Range<f64>, Range<f64>) {
        let (x_abs, y_max) = self
            .all_points()
            .fold((0.0f64, 0.0f64), |(xa, ym), &(x, y)| (xa.max(x.abs()), ym.max(y)));

        let x_abs = if x_abs > 0.0 { x_abs * 1.05 } else { 1.0 };
        let y_max = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };
        (-x_abs..x_abs, 0.0..y_max)
    }
}

/// Where volcano figures go. The pipeline only talks to this trait.
pub trait FigureSink {
    fn render(&mut self, path: &Path, figure: &VolcanoFigure) -> Result<()>;
}

/// Renders PNG files through the plotters bitmap backend.
#[derive(Debug, Clone, Copy)]
pub struct PngRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for PngRenderer {
    fn default() -> Self {
        PngRenderer {
            width: 800,
            height: 600,
        }
    }
}

impl FigureSink for PngRenderer {
    fn render(&mut self, path: &Path, figure: &VolcanoFigure) -> Result<()> {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let (x_range, y_range) = figure.bounds();
        let mut chart = ChartBuilder::on(&root)
            .caption(&figure.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_desc("Log2 Fold Change")
            .y_desc("-Log10 P-Value")
            .disable_mesh()
            .draw()?;

        chart.draw_series(
            figure
                .rest
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, GREY.filled())),
        )?;

        chart
            .draw_series(
                figure
                    .up
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())),
            )?
            .label("Up Regulated")
            .legend(|(x, y)| Circle::new((x, y), 5, BLUE.filled()));

        chart
            .draw_series(
                figure
                    .down
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 3, RED.filled())),
            )?
            .label("Down Regulated")
            .legend(|(x, y)| Circle::new((x, y), 5, RED.filled()));

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .position(SeriesLabelPosition::UpperLeft)
            .draw()?;

        root.present()?;
        Ok(())
    }
}
