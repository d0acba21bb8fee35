//! Deterministic category colors.
//!
//! Labels are colored by sampling a palette's two-endpoint gradient at
//! evenly spaced points, in the order the caller supplies them. The same
//! labels in the same order always get the same colors; a different order
//! gives a different assignment.

use std::collections::BTreeSet;

use incident_survey_analytics_models::{ColorAssignment, LabelColor, Palette, Rgb};

use crate::AnalyticsError;

/// Looks up a palette by name. Accepts `snake_case` or `kebab-case` in
/// any letter case.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownPalette`] if no palette has that name.
pub fn parse_palette(name: &str) -> Result<Palette, AnalyticsError> {
    name.trim()
        .replace('-', "_")
        .parse()
        .map_err(|_| AnalyticsError::UnknownPalette(name.to_string()))
}

/// Samples `n` evenly spaced colors from the palette's gradient, start
/// endpoint first. A single sample is the start endpoint.
#[must_use]
pub fn sample_gradient(palette: Palette, n: usize) -> Vec<Rgb> {
    let (start, end) = palette.endpoints();
    if n <= 1 {
        return vec![start; n];
    }

    #[allow(clippy::cast_precision_loss)]
    let steps = (n - 1) as f64;
    let step = |from: f64, to: f64| (to - from) / steps;
    let (dr, dg, db) = (step(start.r, end.r), step(start.g, end.g), step(start.b, end.b));

    (0..n)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let i = i as f64;
            Rgb::new(start.r + dr * i, start.g + dg * i, start.b + db * i)
        })
        .collect()
}

/// Assigns one color per distinct label.
///
/// Duplicate labels after the first occurrence are ignored, so the
/// gradient is sampled once per distinct label.
#[must_use]
pub fn assign_colors<S: AsRef<str>>(labels: &[S], palette: Palette) -> ColorAssignment {
    let mut seen = BTreeSet::new();
    let distinct: Vec<&str> = labels
        .iter()
        .map(AsRef::as_ref)
        .filter(|label| seen.insert(*label))
        .collect();

    let entries = distinct
        .iter()
        .zip(sample_gradient(palette, distinct.len()))
        .map(|(label, color)| LabelColor {
            label: (*label).to_string(),
            color,
        })
        .collect();

    ColorAssignment { palette, entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_is_deterministic() {
        let first = assign_colors(&["A", "B", "C"], Palette::Red);
        let second = assign_colors(&["A", "B", "C"], Palette::Red);
        assert_eq!(first, second);
        for (a, b) in first.entries.iter().zip(&second.entries) {
            assert_eq!(a.color.r.to_bits(), b.color.r.to_bits());
            assert_eq!(a.color.g.to_bits(), b.color.g.to_bits());
            assert_eq!(a.color.b.to_bits(), b.color.b.to_bits());
        }
    }

    #[test]
    fn assignment_depends_on_label_order() {
        let forward = assign_colors(&["A", "B", "C"], Palette::Red);
        let reverse = assign_colors(&["C", "B", "A"], Palette::Red);
        assert_ne!(forward.get("A"), reverse.get("A"));
        assert_eq!(forward.get("B"), reverse.get("B"));
        assert_eq!(forward.get("A"), Some(Palette::Red.endpoints().0));
    }

    #[test]
    fn gradient_runs_from_start_to_end() {
        let colors = sample_gradient(Palette::Blue, 3);
        let (start, end) = Palette::Blue.endpoints();
        assert_eq!(colors[0], start);
        assert!((colors[1].r - 127.5).abs() < 1e-9);
        assert!((colors[2].r - end.r).abs() < 1e-9);
        assert!((colors[2].b - end.b).abs() < 1e-9);
    }

    #[test]
    fn single_label_gets_start_color() {
        for palette in Palette::all() {
            let assignment = assign_colors(&["ONLY"], *palette);
            assert_eq!(assignment.len(), 1);
            assert_eq!(assignment.get("ONLY"), Some(palette.endpoints().0));
        }
    }

    #[test]
    fn empty_labels_give_empty_assignment() {
        let labels: [&str; 0] = [];
        assert!(assign_colors(&labels, Palette::Green).is_empty());
    }

    #[test]
    fn duplicate_labels_are_colored_once() {
        let assignment = assign_colors(&["A", "B", "A"], Palette::Yellow);
        let labels: Vec<&str> = assignment
            .entries
            .iter()
            .map(|e| e.label.as_str())
            .collect();
        assert_eq!(labels, vec!["A", "B"]);
        assert_eq!(assignment.get("A"), Some(Palette::Yellow.endpoints().0));
    }

    #[test]
    fn palette_lookup() {
        assert_eq!(parse_palette("dark-blue").unwrap(), Palette::DarkBlue);
        assert_eq!(parse_palette("Red_Alt").unwrap(), Palette::RedAlt);
        let err = parse_palette("viridis").unwrap_err();
        assert!(matches!(err, AnalyticsError::UnknownPalette(name) if name == "viridis"));
    }
}
