//! # Tide Clock Rendering
//!
//! Draws a reading as an ASCII tide clock for the `--stdout` development mode.
//! The dial mirrors the dashboard card: "High Tide" above the center, "Low
//! Tide" below it, the current height to the right, and an arm rotated
//! clockwise from 12 o'clock by the reading's `degree`.

use crate::sensor::{SensorReading, SensorState};

/// Dial radius in terminal rows.
const RADIUS: usize = 9;
/// Terminal cells are roughly twice as tall as wide.
const X_SCALE: f64 = 2.0;
const ROWS: usize = 2 * RADIUS + 1;
const COLS: usize = 4 * RADIUS + 1;

/// Render the tide clock and a short summary as a string.
pub fn render_clock(reading: &SensorReading) -> String {
    let mut grid = vec![vec![' '; COLS]; ROWS];
    let center = (RADIUS as f64, RADIUS as f64 * X_SCALE);
    let plot = |grid: &mut Vec<Vec<char>>, row: f64, col: f64, ch: char| {
        let (r, c) = (row.round(), col.round());
        if r >= 0.0 && c >= 0.0 && (r as usize) < ROWS && (c as usize) < COLS {
            grid[r as usize][c as usize] = ch;
        }
    };

    // Face: ticks every 10 degrees
    for step in 0..36 {
        let theta = (step as f64 * 10.0).to_radians();
        let row = center.0 - theta.cos() * RADIUS as f64;
        let col = center.1 + theta.sin() * RADIUS as f64 * X_SCALE;
        plot(&mut grid, row, col, '·');
    }

    write_text(&mut grid, RADIUS * 7 / 20 + 1, "High Tide");
    write_text(&mut grid, RADIUS * 2 - RADIUS * 7 / 20 - 1, "Low Tide");

    // Arm
    let theta = (reading.attributes.degree as f64).to_radians();
    let arm_len = RADIUS as f64 * 0.8;
    let steps = (arm_len * 2.0) as usize;
    for i in 1..=steps {
        let len = arm_len * i as f64 / steps as f64;
        let row = center.0 - theta.cos() * len;
        let col = center.1 + theta.sin() * len * X_SCALE;
        plot(&mut grid, row, col, '*');
    }
    grid[RADIUS][RADIUS * 2] = 'o';

    let label = match reading.state {
        SensorState::Height(h) => format!("{h:.2} m"),
        SensorState::Unknown => "? m".to_string(),
    };
    for (i, ch) in label.chars().enumerate() {
        let col = RADIUS * 2 + RADIUS / 2 + 2 + i;
        if col < COLS {
            grid[RADIUS][col] = ch;
        }
    }

    let mut out = String::new();
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    let a = &reading.attributes;
    out.push('\n');
    out.push_str(&format!("Location:  {}\n", a.location));
    if a.next_tide.is_empty() {
        out.push_str("Next tide: unknown\n");
    } else {
        out.push_str(&format!(
            "Next tide: {} {:.2} m at {} (in {} min)\n",
            a.next_tide, a.next_height, a.tide_time, a.time_in_min
        ));
    }
    out
}

/// Print the tide clock to stdout.
pub fn draw_ascii(reading: &SensorReading) {
    print!("{}", render_clock(reading));
}

fn write_text(grid: &mut [Vec<char>], row: usize, text: &str) {
    let start = (COLS.saturating_sub(text.chars().count())) / 2;
    for (i, ch) in text.chars().enumerate() {
        grid[row][start + i] = ch;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::SensorAttributes;

    fn reading(degree: i64, state: SensorState) -> SensorReading {
        SensorReading {
            entity_id: "sensor.tide".to_string(),
            state,
            attributes: SensorAttributes {
                unit_of_measurement: "m",
                friendly_name: None,
                icon: "mdi:waves",
                next_tide: "high-tide".to_string(),
                next_height: 1.8,
                tide_time: "2024-06-16T14:00:00+10:00".to_string(),
                time_in_min: 120,
                degree,
                location: "Sydney (Fort Denison) (3.1km)".to_string(),
            },
        }
    }

    fn arm_cells(rendered: &str) -> Vec<(usize, usize)> {
        rendered
            .lines()
            .take(ROWS)
            .enumerate()
            .flat_map(|(r, line)| {
                line.chars()
                    .enumerate()
                    .filter(|(_, ch)| *ch == '*')
                    .map(move |(c, _)| (r, c))
            })
            .collect()
    }

    #[test]
    fn test_labels_and_height() {
        let out = render_clock(&reading(302, SensorState::Height(0.73)));
        assert!(out.contains("High Tide"));
        assert!(out.contains("Low Tide"));
        assert!(out.contains("0.73 m"));
        assert!(out.contains("Next tide: high-tide 1.80 m at 2024-06-16T14:00:00+10:00 (in 120 min)"));
        assert!(out.contains("Sydney (Fort Denison) (3.1km)"));
    }

    #[test]
    fn test_arm_points_up_at_high_water() {
        let out = render_clock(&reading(360, SensorState::Height(1.8)));
        let cells = arm_cells(&out);
        assert!(!cells.is_empty());
        assert!(cells.iter().all(|(r, c)| *r < RADIUS && *c == RADIUS * 2));
    }

    #[test]
    fn test_arm_points_down_at_low_water() {
        let out = render_clock(&reading(180, SensorState::Height(0.2)));
        let cells = arm_cells(&out);
        assert!(!cells.is_empty());
        assert!(cells.iter().all(|(r, _)| *r > RADIUS));
    }

    #[test]
    fn test_unknown_state() {
        let mut r = reading(0, SensorState::Unknown);
        r.attributes.next_tide.clear();
        let out = render_clock(&r);
        assert!(out.contains("? m"));
        assert!(out.contains("Next tide: unknown"));
    }
}
