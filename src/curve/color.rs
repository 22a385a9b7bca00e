use super::types::Material;

/// Linear-light channel to sRGB gamma space
pub fn linear_to_srgb(ch: f64) -> f64 {
    if ch < 0.0031308 {
        if ch < 0.0 { 0.0 } else { ch * 12.92 }
    } else {
        ch.powf(1.0 / 2.4) * 1.055 - 0.055
    }
}

/// Convert a linear channel to a two-digit lowercase hex byte
pub fn to_hex(ch: f64) -> String {
    let value = (linear_to_srgb(ch) * 255.0 + 0.5).clamp(0.0, 255.0);
    // NaN casts to 0
    format!("{:02x}", value as u8)
}

/// Convert a linear RGB color to `#rrggbb`
pub fn col_to_hex(col: [f64; 3]) -> String {
    let mut hex = String::with_capacity(7);
    hex.push('#');
    for ch in col {
        hex.push_str(&to_hex(ch));
    }
    hex
}

/// Style attribute for a path filled with this material
pub fn material_style(material: &Material) -> String {
    format!("fill: {}", col_to_hex(material.diffuse_color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_hex_bounds() {
        assert_eq!(to_hex(0.0), "00");
        assert_eq!(to_hex(1.0), "ff");
    }

    #[test]
    fn test_to_hex_clamps_out_of_range() {
        assert_eq!(to_hex(-0.5), "00");
        assert_eq!(to_hex(2.0), "ff");
        assert_eq!(to_hex(f64::NAN), "00");
    }

    #[test]
    fn test_to_hex_linear_segment() {
        // 0.001 * 12.92 * 255 + 0.5 = 3.79
        assert_eq!(to_hex(0.001), "03");
    }

    #[test]
    fn test_to_hex_mid_gray() {
        // Linear 0.5 is sRGB ~0.7354
        assert_eq!(to_hex(0.5), "bc");
        assert_eq!(to_hex(0.2159), "80");
    }

    #[test]
    fn test_to_hex_always_two_lowercase_digits() {
        for i in 0..=100 {
            let hex = to_hex(i as f64 / 100.0);
            assert_eq!(hex.len(), 2);
            assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    #[test]
    fn test_col_to_hex() {
        assert_eq!(col_to_hex([1.0, 0.0, 0.0]), "#ff0000");
        assert_eq!(col_to_hex([0.0, 0.0, 0.0]), "#000000");
        assert_eq!(col_to_hex([1.0, 1.0, 1.0]), "#ffffff");
    }

    #[test]
    fn test_material_style() {
        let material = Material {
            name: "Blue".to_string(),
            diffuse_color: [0.0, 0.0, 1.0],
        };
        assert_eq!(material_style(&material), "fill: #0000ff");
    }
}
