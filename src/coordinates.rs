/// Result of reading a combined `"lat,lon"` string.
///
/// Malformed input is not an error: it yields `Defaulted`, which callers
/// render as `(0.0, 0.0)` and the map treats as "no position".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coordinates {
    Parsed { latitude: f64, longitude: f64 },
    Defaulted,
}

impl Coordinates {
    pub fn lat_lon(&self) -> (f64, f64) {
        match *self {
            Coordinates::Parsed { latitude, longitude } => (latitude, longitude),
            Coordinates::Defaulted => (0.0, 0.0),
        }
    }
}

pub fn parse_coordinates(raw: &str) -> Coordinates {
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() != 2 {
        log::trace!("Coordinate string {:?} has {} parts, defaulting", raw, parts.len());
        return Coordinates::Defaulted;
    }

    Coordinates::Parsed {
        latitude: lenient_f64(parts[0]),
        longitude: lenient_f64(parts[1]),
    }
}

/// Parses the longest leading numeric prefix of `s` after trimming.
/// `"12.5abc"` gives `12.5`, `"abc"` gives `0.0`.
pub fn lenient_f64(s: &str) -> f64 {
    let s = s.trim();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }

    // Exponent only counts when it has at least one digit.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    // Overflowing input like "1e999" must not become an infinity.
    s[..end]
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_parts_with_whitespace() {
        assert_eq!(
            parse_coordinates(" -6.2 , 106.8 "),
            Coordinates::Parsed { latitude: -6.2, longitude: 106.8 }
        );
    }

    #[test]
    fn wrong_part_count_defaults() {
        for raw in ["", "-6.2", "1,2,3", "-6.2;106.8"] {
            assert_eq!(parse_coordinates(raw), Coordinates::Defaulted, "input {:?}", raw);
            assert_eq!(parse_coordinates(raw).lat_lon(), (0.0, 0.0));
        }
    }

    #[test]
    fn non_numeric_parts_parse_to_zero() {
        assert_eq!(parse_coordinates("abc,def").lat_lon(), (0.0, 0.0));
        assert_eq!(parse_coordinates(",").lat_lon(), (0.0, 0.0));
    }

    #[test]
    fn lenient_parse_takes_numeric_prefix() {
        assert_eq!(lenient_f64("12.5abc"), 12.5);
        assert_eq!(lenient_f64("-.5"), -0.5);
        assert_eq!(lenient_f64("3."), 3.0);
        assert_eq!(lenient_f64("1e3x"), 1000.0);
        assert_eq!(lenient_f64("7e"), 7.0);
        assert_eq!(lenient_f64("-"), 0.0);
        assert_eq!(lenient_f64("."), 0.0);
    }

    #[test]
    fn overflowing_values_parse_to_zero() {
        assert_eq!(
            parse_coordinates("1e999,106.8"),
            Coordinates::Parsed { latitude: 0.0, longitude: 106.8 }
        );
        assert_eq!(parse_coordinates("-1e999,0").lat_lon(), (0.0, 0.0));
        assert_eq!(lenient_f64("1e999"), 0.0);
    }

    #[test]
    fn round_trips_formatted_floats() {
        for (lat, lon) in [(-6.2, 106.8), (0.000123, -179.999), (89.5, 0.0)] {
            let raw = format!("{}, {}", lat, lon);
            assert_eq!(parse_coordinates(&raw).lat_lon(), (lat, lon));
        }
    }
}
