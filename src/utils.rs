pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

pub fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(-1.0, 3.0, 0.0), -1.0);
        assert_eq!(lerp(-1.0, 3.0, 1.0), 3.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }

    #[test]
    fn fade_is_flat_at_the_cell_edges() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);

        // first derivative vanishes at both ends
        let h = 1e-6;
        assert!((fade(h) - fade(0.0)).abs() < 1e-10);
        assert!((fade(1.0) - fade(1.0 - h)).abs() < 1e-10);
    }
}
