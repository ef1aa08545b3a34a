use super::vehicle::VehicleInfo;

/// Piecewise age multiplier. The band boundaries and values are a pricing
/// contract shared with downstream consumers; do not tune them.
pub fn age_factor(age: u8) -> f64 {
    match age {
        0..=17 => 3.00,
        18..=19 => 2.50,
        20..=21 => 2.00,
        22..=24 => 1.60,
        25..=29 => 1.15,
        30..=39 => 1.00,
        40..=49 => 0.95,
        50..=59 => 0.92,
        60..=64 => 0.95,
        65..=69 => 1.00,
        70..=74 => 1.10,
        _ => 1.25,
    }
}

/// Depreciation-style multiplier keyed on vehicle age in years.
pub fn vehicle_year_factor(vehicle_age: u32) -> f64 {
    match vehicle_age {
        0 => 1.50,
        1 => 1.40,
        2 => 1.30,
        3 => 1.20,
        4..=5 => 1.10,
        6..=8 => 1.00,
        9..=10 => 0.90,
        11..=15 => 0.80,
        _ => 0.75,
    }
}

/// Make multiplier: luxury and performance marques rate up, economy marques
/// rate down, everything else is neutral. Matching is case-insensitive on the
/// trimmed make token.
pub fn vehicle_make_factor(make: &str) -> f64 {
    match make.trim().to_ascii_lowercase().as_str() {
        "ferrari" | "lamborghini" => 1.60,
        "porsche" => 1.50,
        "tesla" => 1.35,
        "bmw" => 1.30,
        "mercedes" | "mercedes-benz" => 1.28,
        "audi" => 1.25,
        "lexus" => 1.20,
        "acura" | "infiniti" => 1.18,
        "subaru" | "nissan" => 0.95,
        "mazda" => 0.93,
        "toyota" => 0.92,
        "honda" | "hyundai" | "kia" => 0.90,
        _ => 1.00,
    }
}

/// Combined vehicle factor for a parsed description.
pub fn vehicle_factor(vehicle: &VehicleInfo, current_year: i32) -> f64 {
    vehicle_year_factor(vehicle.age(current_year)) * vehicle_make_factor(&vehicle.make)
}
