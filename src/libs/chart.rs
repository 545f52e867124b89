//! Scatter/spline chart of filtered Mash distances.
//!
//! One x position per reference chromosome (natural sort order), one series
//! per subgenome rank: a translucent trend line through the points (cubic
//! spline, dashed for even ranks), a dotted vertical connector per
//! chromosome, scatter markers and query-chromosome labels.

use crate::libs::dist::{natural_key, SubgRecord};
use itertools::Itertools;
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::error::Error;

const MARKER_SIZE: i32 = 6;
const SPLINE_SAMPLES: usize = 300;

/// Evenly hue-spaced colors with alternating saturation and brightness, one
/// per subgenome rank.
pub fn palette(n_subgenomes: usize) -> Vec<RGBColor> {
    (0..n_subgenomes)
        .map(|i| {
            let hue = i as f64 / n_subgenomes as f64;
            let sat = 0.7 + 0.3 * (i % 2) as f64;
            let val = 0.8 - 0.2 * (i % 3) as f64;
            hsv_to_rgb(hue, sat, val)
        })
        .collect()
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> RGBColor {
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    let (r, g, b) = match (i as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    RGBColor((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

/// Natural cubic spline over strictly increasing knots.
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    // second derivatives at the knots
    m: Vec<f64>,
}

impl CubicSpline {
    /// `xs` must be strictly increasing with at least two knots.
    pub fn new(xs: &[f64], ys: &[f64]) -> Self {
        assert_eq!(xs.len(), ys.len());
        assert!(xs.len() >= 2);

        let n = xs.len();
        let mut m = vec![0.0; n];

        if n > 2 {
            // tridiagonal system for the interior second derivatives,
            // natural boundary (m[0] = m[n-1] = 0), Thomas algorithm
            let mut diag = vec![0.0; n];
            let mut rhs = vec![0.0; n];
            for i in 1..n - 1 {
                let h0 = xs[i] - xs[i - 1];
                let h1 = xs[i + 1] - xs[i];
                diag[i] = 2.0 * (h0 + h1);
                rhs[i] = 6.0 * ((ys[i + 1] - ys[i]) / h1 - (ys[i] - ys[i - 1]) / h0);
            }
            for i in 2..n - 1 {
                let h = xs[i] - xs[i - 1];
                let w = h / diag[i - 1];
                diag[i] -= w * h;
                rhs[i] -= w * rhs[i - 1];
            }
            for i in (1..n - 1).rev() {
                let h = xs[i + 1] - xs[i];
                m[i] = (rhs[i] - h * m[i + 1]) / diag[i];
            }
        }

        Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            m,
        }
    }

    pub fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let i = match self.xs.partition_point(|&v| v <= x) {
            0 => 0,
            p if p >= n => n - 2,
            p => p - 1,
        };

        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a * a * a - a) * self.m[i] + (b * b * b - b) * self.m[i + 1]) * h * h / 6.0
    }
}

/// Renders the chart to a PNG file.
pub fn render(
    records: &[SubgRecord],
    n_subgenomes: usize,
    outfile: &str,
) -> Result<(), Box<dyn Error>> {
    if records.is_empty() {
        return Err("no rows to plot".into());
    }

    let chr_order: Vec<String> = records
        .iter()
        .map(|r| r.ref_chr.clone())
        .unique()
        .sorted_by_key(|s| natural_key(s))
        .collect();
    let x_of: BTreeMap<&str, f64> = chr_order
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i as f64))
        .collect();

    let max_d = records.iter().map(|r| r.distance).fold(0.0, f64::max);
    let y_max = if max_d > 0.0 { max_d * 1.2 } else { 1.0 };

    let colors = palette(n_subgenomes);

    let root = BitMapBackend::new(outfile, (1600, 900)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Chromosome Comparison ({} subgenomes)", n_subgenomes),
            ("sans-serif", 32),
        )
        .margin(20)
        .x_label_area_size(80)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5..(chr_order.len() as f64 - 0.5), 0.0..y_max)?;

    let labels = chr_order.clone();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(chr_order.len())
        .x_label_formatter(&move |x| {
            let i = x.round();
            if (x - i).abs() > 0.25 || i < 0.0 {
                return String::new();
            }
            labels
                .get(i as usize)
                .cloned()
                .unwrap_or_default()
        })
        .x_desc("Reference chromosome")
        .y_desc("Mash distance")
        .label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 20))
        .draw()?;

    // trend lines, under everything else
    for rank in 1..=n_subgenomes {
        let subg = format!("SG{}", rank);
        let points: Vec<(f64, f64)> = records
            .iter()
            .filter(|r| r.subg == subg)
            .map(|r| (x_of[r.ref_chr.as_str()], r.distance))
            .sorted_by(|a, b| a.0.total_cmp(&b.0))
            .collect();
        if points.len() < 2 {
            continue;
        }

        let line = trend_line(&points);
        let style = colors[rank - 1].mix(0.5).stroke_width(3);
        if rank % 2 == 1 {
            chart.draw_series(LineSeries::new(line, style))?;
        } else {
            chart.draw_series(DashedLineSeries::new(line, 8, 4, style))?;
        }
    }

    // per-chromosome connectors between the closest and farthest hit
    for chr_name in &chr_order {
        let ys: Vec<f64> = records
            .iter()
            .filter(|r| &r.ref_chr == chr_name)
            .map(|r| r.distance)
            .collect();
        if ys.len() < 2 {
            continue;
        }
        let lo = ys.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = ys.iter().cloned().fold(0.0, f64::max);
        let x = x_of[chr_name.as_str()];
        chart.draw_series(DashedLineSeries::new(
            vec![(x, lo), (x, hi)],
            2,
            4,
            RGBColor(102, 102, 102).mix(0.5).stroke_width(1),
        ))?;
    }

    // scatter markers and the legend
    for rank in 1..=n_subgenomes {
        let subg = format!("SG{}", rank);
        let color = colors[rank - 1];
        let points: Vec<(f64, f64)> = records
            .iter()
            .filter(|r| r.subg == subg)
            .map(|r| (x_of[r.ref_chr.as_str()], r.distance))
            .collect();
        if points.is_empty() {
            continue;
        }

        match (rank - 1) % 3 {
            0 => {
                chart
                    .draw_series(
                        points
                            .iter()
                            .map(|&(x, y)| Circle::new((x, y), MARKER_SIZE, color.filled())),
                    )?
                    .label(subg.clone())
                    .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
            }
            1 => {
                chart
                    .draw_series(points.iter().map(|&(x, y)| {
                        TriangleMarker::new((x, y), MARKER_SIZE + 1, color.filled())
                    }))?
                    .label(subg.clone())
                    .legend(move |(x, y)| TriangleMarker::new((x, y), 6, color.filled()));
            }
            _ => {
                chart
                    .draw_series(points.iter().map(|&(x, y)| {
                        Cross::new((x, y), MARKER_SIZE, color.filled().stroke_width(2))
                    }))?
                    .label(subg.clone())
                    .legend(move |(x, y)| Cross::new((x, y), 5, color.filled().stroke_width(2)));
            }
        }
    }

    // query-chromosome labels, staggered by rank so they don't overprint
    for rank in 1..=n_subgenomes {
        let subg = format!("SG{}", rank);
        let color = colors[rank - 1];
        let font = ("sans-serif", 13).into_font().color(&color);
        let offset = -(12 + 4 * rank as i32);

        chart.draw_series(records.iter().filter(|r| r.subg == subg).map(|r| {
            let x = x_of[r.ref_chr.as_str()];
            EmptyElement::at((x, r.distance))
                + Text::new(r.qry_chr.clone(), (0, offset), font.clone())
        }))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 16))
        .draw()?;

    root.present()?;

    Ok(())
}

// spline through >= 3 knots, straight segments otherwise
fn trend_line(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
    let spline = CubicSpline::new(&xs, &ys);

    let (lo, hi) = (xs[0], xs[xs.len() - 1]);
    (0..=SPLINE_SAMPLES)
        .map(|i| {
            let x = lo + (hi - lo) * i as f64 / SPLINE_SAMPLES as f64;
            (x, spline.eval(x))
        })
        .collect()
}
