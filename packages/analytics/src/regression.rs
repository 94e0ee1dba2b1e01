//! Ordinary least squares for the monthly trend overlay.

use crime_report_analytics_models::TrendLine;

/// Fits `y = slope * x + intercept` to `points`.
///
/// Returns `None` with fewer than two points or when every `x` is the
/// same, since the slope is undefined.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn fit_ols(points: &[(f64, f64)]) -> Option<TrendLine> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (sxx, sxy, syy) = points.iter().fold((0.0, 0.0, 0.0), |(sxx, sxy, syy), (x, y)| {
        let dx = x - mean_x;
        let dy = y - mean_y;
        (dx.mul_add(dx, sxx), dx.mul_add(dy, sxy), dy.mul_add(dy, syy))
    });

    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = slope.mul_add(-mean_x, mean_y);

    let r_squared = (syy > 0.0).then(|| {
        let ss_res: f64 = points
            .iter()
            .map(|(x, y)| {
                let residual = y - slope.mul_add(*x, intercept);
                residual * residual
            })
            .sum();
        1.0 - ss_res / syy
    });

    Some(TrendLine {
        slope,
        intercept,
        r_squared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_exact_line() {
        let points: Vec<(f64, f64)> = (0..12).map(|x| (f64::from(x), 3.0 + 0.5 * f64::from(x))).collect();
        let line = fit_ols(&points).unwrap();
        assert!((line.slope - 0.5).abs() < 1e-9);
        assert!((line.intercept - 3.0).abs() < 1e-9);
        assert!((line.r_squared.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fits_noisy_points() {
        // Least-squares line through (0,1), (1,3), (2,2) is y = 0.5x + 1.5
        let line = fit_ols(&[(0.0, 1.0), (1.0, 3.0), (2.0, 2.0)]).unwrap();
        assert!((line.slope - 0.5).abs() < 1e-9);
        assert!((line.intercept - 1.5).abs() < 1e-9);
        assert!((line.r_squared.unwrap() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn flat_data_has_zero_slope_and_no_r_squared() {
        let line = fit_ols(&[(0.0, 4.0), (1.0, 4.0), (2.0, 4.0)]).unwrap();
        assert!(line.slope.abs() < 1e-12);
        assert!((line.intercept - 4.0).abs() < 1e-12);
        assert!(line.r_squared.is_none());
    }

    #[test]
    fn degenerate_inputs() {
        assert!(fit_ols(&[]).is_none());
        assert!(fit_ols(&[(1.0, 2.0)]).is_none());
        assert!(fit_ols(&[(1.0, 2.0), (1.0, 5.0)]).is_none());
    }
}
