//! Confusion matrix rendering: an annotated console table sent to the log
//! and an SVG heatmap written next to the other run outputs.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::config::NUM_CLASS;
use crate::error::{Error, Result};
use crate::metrics::{confusion_matrix, ConfusionMatrix};

/// Tick labels for the two classes.
pub const CLASS_NAMES: [&str; NUM_CLASS] = ["real", "fake"];

const CELL: usize = 110;
const LEFT: usize = 120;
const TOP: usize = 70;
const BOTTOM: usize = 60;

const BLUES_LOW: (f64, f64, f64) = (247.0, 251.0, 255.0);
const BLUES_HIGH: (f64, f64, f64) = (8.0, 48.0, 107.0);

/// Title used for both the table and the heatmap.
pub fn title(name: &str) -> String {
    format!("CNN {name} Classifier Confusion Matrix")
}

/// Build the confusion matrix for `predictions` against `labels`, log it as
/// an annotated table and write `out_dir/confusion_<name>.svg`.
pub fn show_confusion_matrix<P: AsRef<Path>>(
    name: &str,
    predictions: &[usize],
    labels: &[usize],
    out_dir: P,
) -> Result<(ConfusionMatrix, PathBuf)> {
    let cm = confusion_matrix(predictions, labels, NUM_CLASS)?;
    let normalized = cm.normalized();
    for line in render_table(name, &normalized) {
        info!("{line}");
    }

    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir).map_err(|e| Error::io(out_dir, e))?;
    let path = out_dir.join(format!("confusion_{name}.svg"));
    fs::write(&path, render_svg(name, &normalized)).map_err(|e| Error::io(&path, e))?;
    info!("confusion matrix heatmap written to {}", path.display());
    Ok((cm, path))
}

/// Format a normalized matrix as percentage rows with axis captions.
pub fn render_table(name: &str, normalized: &[Vec<f64>]) -> Vec<String> {
    let mut lines = vec![title(name)];
    let mut header = format!("{:>12}", "");
    for class in CLASS_NAMES {
        let _ = write!(header, "{class:>10}");
    }
    lines.push(format!("{:>12}{:^20}", "", "Predicted Labels"));
    lines.push(header);
    for (i, row) in normalized.iter().enumerate() {
        let label = CLASS_NAMES.get(i).copied().unwrap_or("?");
        let mut line = format!("{label:>12}");
        for v in row {
            let _ = write!(line, "{:>10}", format!("{:.2}%", v * 100.0));
        }
        lines.push(line);
    }
    lines.push("True Labels (rows)".to_string());
    lines
}

/// Render the heatmap as a standalone SVG document.
///
/// Cell colors follow a light-to-dark blue ramp scaled between the smallest
/// and largest finite entries. NaN cells are drawn grey.
pub fn render_svg(name: &str, normalized: &[Vec<f64>]) -> String {
    let n = normalized.len();
    let width = LEFT + n * CELL + 40;
    let height = TOP + n * CELL + BOTTOM;
    let (lo, hi) = finite_range(normalized);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" font-family="sans-serif">"#
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="30" text-anchor="middle" font-size="16">{}</text>"#,
        width / 2,
        escape(&title(name))
    );

    for (i, row) in normalized.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            let x = LEFT + j * CELL;
            let y = TOP + i * CELL;
            let (fill, text) = if v.is_finite() {
                let t = if hi > lo { (v - lo) / (hi - lo) } else { 0.0 };
                let ink = if t > 0.5 { "#ffffff" } else { "#000000" };
                (blues(t), ink)
            } else {
                ("#cccccc".to_string(), "#000000")
            };
            let _ = writeln!(
                svg,
                r##"<rect x="{x}" y="{y}" width="{CELL}" height="{CELL}" fill="{fill}" stroke="#ffffff"/>"##
            );
            let _ = writeln!(
                svg,
                r#"<text x="{}" y="{}" text-anchor="middle" font-size="14" fill="{text}">{:.2}%</text>"#,
                x + CELL / 2,
                y + CELL / 2 + 5,
                v * 100.0
            );
        }
    }

    for (k, class) in CLASS_NAMES.iter().take(n).enumerate() {
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="12">{class}</text>"#,
            LEFT + k * CELL + CELL / 2,
            TOP + n * CELL + 18
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="end" font-size="12">{class}</text>"#,
            LEFT - 8,
            TOP + k * CELL + CELL / 2 + 4
        );
    }
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="13">Predicted Labels</text>"#,
        LEFT + n * CELL / 2,
        TOP + n * CELL + 45
    );
    let cy = TOP + n * CELL / 2;
    let _ = writeln!(
        svg,
        r#"<text x="30" y="{cy}" text-anchor="middle" font-size="13" transform="rotate(-90 30 {cy})">True Labels</text>"#
    );
    svg.push_str("</svg>\n");
    svg
}

fn finite_range(normalized: &[Vec<f64>]) -> (f64, f64) {
    normalized
        .iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0.0, 0.0))
}

fn blues(t: f64) -> String {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        mix(BLUES_LOW.0, BLUES_HIGH.0),
        mix(BLUES_LOW.1, BLUES_HIGH.1),
        mix(BLUES_LOW.2, BLUES_HIGH.2)
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blues_endpoints() {
        assert_eq!(blues(0.0), "#f7fbff");
        assert_eq!(blues(1.0), "#08306b");
    }

    #[test]
    fn table_shows_percentages() {
        let lines = render_table("Strawman", &[vec![0.5, 0.5], vec![0.0, 1.0]]);
        assert_eq!(lines[0], "CNN Strawman Classifier Confusion Matrix");
        assert!(lines[3].contains("50.00%"));
        assert!(lines[4].contains("100.00%"));
        assert!(lines.iter().any(|l| l.contains("True Labels")));
    }

    #[test]
    fn range_skips_nan() {
        let (lo, hi) = finite_range(&[vec![f64::NAN, f64::NAN], vec![0.25, 0.75]]);
        assert_eq!((lo, hi), (0.25, 0.75));
    }
}
