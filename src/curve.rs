// Natural cubic spline through a sequence of points, as Bézier path commands

use std::fmt::Write;

use crate::ir::PathCommand;

/// Path through `points` using a natural cubic spline.
///
/// Each axis is solved independently for the spline's Bézier control
/// points, so the curve passes through every point with continuous first
/// and second derivatives and zero curvature at both ends. Two points give
/// a straight line, one point a lone move, none an empty path.
pub fn natural_curve(points: &[(f64, f64)]) -> Vec<PathCommand> {
    let mut commands = Vec::with_capacity(points.len());
    let Some(&first) = points.first() else {
        return commands;
    };
    commands.push(PathCommand::MoveTo { to: first });

    match points.len() {
        1 => {}
        2 => commands.push(PathCommand::LineTo { to: points[1] }),
        _ => {
            let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
            let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
            let (ax, bx) = control_points(&xs);
            let (ay, by) = control_points(&ys);

            for i in 0..points.len() - 1 {
                commands.push(PathCommand::CurveTo {
                    c1: (ax[i], ay[i]),
                    c2: (bx[i], by[i]),
                    to: points[i + 1],
                });
            }
        }
    }

    commands
}

/// First and second control point coordinates of every segment, from a
/// tridiagonal solve over one axis. Needs at least three values.
fn control_points(x: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = x.len() - 1;
    let mut a = vec![0.0; n];
    let mut b = vec![0.0; n];
    let mut r = vec![0.0; n];

    b[0] = 2.0;
    r[0] = x[0] + 2.0 * x[1];
    for i in 1..n - 1 {
        a[i] = 1.0;
        b[i] = 4.0;
        r[i] = 4.0 * x[i] + 2.0 * x[i + 1];
    }
    a[n - 1] = 2.0;
    b[n - 1] = 7.0;
    r[n - 1] = 8.0 * x[n - 1] + x[n];

    // Forward elimination
    for i in 1..n {
        let m = a[i] / b[i - 1];
        b[i] -= m;
        r[i] -= m * r[i - 1];
    }

    // Back substitution; `a` becomes the first control points
    a[n - 1] = r[n - 1] / b[n - 1];
    for i in (0..n - 1).rev() {
        a[i] = (r[i] - a[i + 1]) / b[i];
    }

    // Second control points
    b[n - 1] = (x[n] + a[n - 1]) / 2.0;
    for i in 0..n - 1 {
        b[i] = 2.0 * x[i + 1] - a[i + 1];
    }

    (a, b)
}

/// Approximate a path with straight lines, `segments` per curve.
/// Returns one polyline per `MoveTo`.
pub fn flatten(commands: &[PathCommand], segments: usize) -> Vec<Vec<(f64, f64)>> {
    let segments = segments.max(1);
    let mut lines: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current = (0.0, 0.0);

    for command in commands {
        match *command {
            PathCommand::MoveTo { to } => {
                lines.push(vec![to]);
                current = to;
            }
            PathCommand::LineTo { to } => {
                push_point(&mut lines, current, to);
                current = to;
            }
            PathCommand::CurveTo { c1, c2, to } => {
                for step in 1..=segments {
                    let t = step as f64 / segments as f64;
                    push_point(&mut lines, current, cubic(current, c1, c2, to, t));
                }
                current = to;
            }
        }
    }

    lines
}

// A drawing command with no preceding move starts at the current point
fn push_point(lines: &mut Vec<Vec<(f64, f64)>>, current: (f64, f64), point: (f64, f64)) {
    match lines.last_mut() {
        Some(line) => line.push(point),
        None => lines.push(vec![current, point]),
    }
}

fn cubic(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), p3: (f64, f64), t: f64) -> (f64, f64) {
    let u = 1.0 - t;
    let w0 = u * u * u;
    let w1 = 3.0 * u * u * t;
    let w2 = 3.0 * u * t * t;
    let w3 = t * t * t;
    (
        w0 * p0.0 + w1 * p1.0 + w2 * p2.0 + w3 * p3.0,
        w0 * p0.1 + w1 * p1.1 + w2 * p2.1 + w3 * p3.1,
    )
}

/// SVG path data (`d` attribute) for the commands
pub fn to_svg_path(commands: &[PathCommand]) -> String {
    let mut d = String::new();
    for command in commands {
        // Writing to a String cannot fail
        let _ = match command {
            PathCommand::MoveTo { to } => write!(d, "M{},{}", to.0, to.1),
            PathCommand::LineTo { to } => write!(d, "L{},{}", to.0, to.1),
            PathCommand::CurveTo { c1, c2, to } => write!(
                d,
                "C{},{},{},{},{},{}",
                c1.0, c1.1, c2.0, c2.1, to.0, to.1
            ),
        };
    }
    d
}
