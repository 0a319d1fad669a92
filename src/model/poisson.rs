/// Poisson probability mass for `k` in `0..max_goals` at rate `lambda`.
///
/// The tail beyond the cutoff is dropped rather than folded into the last
/// bucket, so the result sums to `P(X < max_goals)`.
pub fn poisson_pmf(lambda: f64, max_goals: usize) -> Vec<f64> {
    let mut out = vec![0.0; max_goals];
    if max_goals == 0 {
        return out;
    }
    let lambda = lambda.max(0.0);

    // Recurrence p(k) = p(k-1) * λ / k avoids computing k! directly.
    out[0] = (-lambda).exp();
    for k in 1..max_goals {
        out[k] = out[k - 1] * lambda / k as f64;
    }
    out
}
