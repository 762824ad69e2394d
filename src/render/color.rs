//! The continuous red ramp used to shade quadrants, matching the ColorBrewer
//! "Reds" sequential scale.

pub(crate) const REDS: [(u8, u8, u8); 9] = [
    (255, 245, 240),
    (254, 224, 210),
    (252, 187, 161),
    (252, 146, 114),
    (251, 106, 74),
    (239, 59, 44),
    (203, 24, 29),
    (165, 15, 21),
    (103, 0, 13),
];

/// The ramp stops as a JS array literal of RGB triples, embedded into the
/// rendered page so the client-side recoloring uses the same scale.
pub(crate) fn stops_js() -> String {
    let stops: Vec<String> = REDS
        .iter()
        .map(|(r, g, b)| format!("[{},{},{}]", r, g, b))
        .collect();
    format!("[{}]", stops.join(","))
}

/// A CSS gradient over the ramp, bottom (minimum) to top (maximum), for the
/// legend bar.
pub(crate) fn gradient_css() -> String {
    let last = (REDS.len() - 1) as f64;
    let stops: Vec<String> = REDS
        .iter()
        .enumerate()
        .map(|(i, rgb)| format!("{} {:.1}%", hex(*rgb), i as f64 / last * 100.0))
        .collect();
    format!("linear-gradient(to top, {})", stops.join(", "))
}

fn hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_js_is_an_array_of_triples() {
        let js = stops_js();
        assert!(js.starts_with("[[255,245,240]"));
        assert!(js.ends_with("[103,0,13]]"));
    }

    #[test]
    fn test_gradient_runs_light_to_dark() {
        let css = gradient_css();
        assert!(css.starts_with("linear-gradient(to top, #fff5f0 0.0%"));
        assert!(css.contains("#67000d 100.0%"));
    }
}
