//! Probabilistic traffic split between the legacy pipeline and the provider.

use rand::Rng;

use crate::error::CoreError;

/// Tag appended to support calls routed into the provider pipeline.
pub const PROVIDER_TAG: &str = "deepgram";

/// Source of the uniform routing draw.
///
/// Implementations must return a value in `[0, 100)`.
pub trait RoutingDraw: Send + Sync {
    fn draw(&self) -> f64;
}

/// Production draw backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomDraw;

impl RoutingDraw for RandomDraw {
    fn draw(&self) -> f64 {
        rand::rng().random_range(0.0..100.0)
    }
}

/// Always returns the same value. Used to pin routing decisions.
#[derive(Debug, Clone, Copy)]
pub struct FixedDraw(pub f64);

impl RoutingDraw for FixedDraw {
    fn draw(&self) -> f64 {
        self.0
    }
}

/// Whether a draw routes the call to the provider.
pub fn routes_to_provider(draw: f64, percent: f64) -> bool {
    draw < percent
}

/// Validate a routing percentage (must be finite and within `0..=100`).
pub fn validate_percent(percent: f64) -> Result<f64, CoreError> {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(CoreError::Validation(format!(
            "Routing percentage must be between 0 and 100, got {percent}"
        )));
    }
    Ok(percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_draw_stays_in_range() {
        let draw = RandomDraw;
        for _ in 0..1000 {
            let v = draw.draw();
            assert!((0.0..100.0).contains(&v), "draw out of range: {v}");
        }
    }

    #[test]
    fn hundred_percent_routes_every_draw() {
        assert!(routes_to_provider(0.0, 100.0));
        assert!(routes_to_provider(99.999, 100.0));
    }

    #[test]
    fn zero_percent_routes_nothing() {
        assert!(!routes_to_provider(0.0, 0.0));
    }

    #[test]
    fn boundary_draw_is_not_routed() {
        assert!(!routes_to_provider(25.0, 25.0));
        assert!(routes_to_provider(24.9, 25.0));
    }

    #[test]
    fn percent_validation() {
        assert!(validate_percent(0.0).is_ok());
        assert!(validate_percent(100.0).is_ok());
        assert!(validate_percent(-1.0).is_err());
        assert!(validate_percent(100.5).is_err());
        assert!(validate_percent(f64::NAN).is_err());
    }
}
