/// Squared error, normalized by the number of output units.
///
/// Operates per output unit so the backward sweep can seed each output
/// node's `der_a` independently; `width` is the output layer's width.
pub struct SquareLoss;

impl SquareLoss {
    /// `(p - t)² / width`
    pub fn output(predicted: f64, target: f64, width: usize) -> f64 {
        (predicted - target).powi(2) / width as f64
    }

    /// `2 (p - t) / width`
    pub fn derivative(predicted: f64, target: f64, width: usize) -> f64 {
        2.0 * (predicted - target) / width as f64
    }

    /// Mean squared error over a whole prediction.
    pub fn total(predicted: &[f64], expected: &[f64]) -> f64 {
        let width = predicted.len();
        predicted.iter().zip(expected.iter())
            .map(|(&p, &t)| Self::output(p, t, width))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalizes_by_output_width() {
        assert_relative_eq!(SquareLoss::output(4.0, 0.0, 1), 16.0);
        assert_relative_eq!(SquareLoss::output(4.0, 0.0, 4), 4.0);
        assert_relative_eq!(SquareLoss::derivative(4.0, 0.0, 1), 8.0);
        assert_relative_eq!(SquareLoss::derivative(4.0, 0.0, 2), 4.0);
    }

    #[test]
    fn total_is_mean_squared_error() {
        let loss = SquareLoss::total(&[1.0, 0.0, 0.5], &[0.0, 0.0, 1.0]);
        assert_relative_eq!(loss, (1.0 + 0.0 + 0.25) / 3.0);
    }

    #[test]
    fn derivative_is_zero_on_target() {
        assert_eq!(SquareLoss::derivative(0.3, 0.3, 5), 0.0);
    }
}
