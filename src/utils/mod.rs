pub mod date;

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round2;

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round2(300.0), 300.0);
        assert_eq!(round2(10.126), 10.13);
        assert_eq!(round2(-4.444), -4.44);
    }
}
