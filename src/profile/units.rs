//! Imperial/metric conversions for biometric input. Non-positive input maps to 0 ("unset").

const LBS_PER_KG: f64 = 2.20462;
const CM_PER_INCH: f64 = 2.54;

pub fn lbs_to_kg(lbs: f64) -> f64 {
    if lbs > 0.0 {
        lbs / LBS_PER_KG
    } else {
        0.0
    }
}

/// Whole pounds, as shown in an imperial form.
pub fn kg_to_lbs(kg: f64) -> f64 {
    if kg > 0.0 {
        (kg * LBS_PER_KG).round()
    } else {
        0.0
    }
}

pub fn feet_inches_to_cm(feet: f64, inches: f64) -> f64 {
    let total_inches = feet.max(0.0) * 12.0 + inches.max(0.0);
    if total_inches > 0.0 {
        total_inches * CM_PER_INCH
    } else {
        0.0
    }
}

/// Height rounded to the nearest inch, split into feet and inches.
pub fn cm_to_feet_inches(cm: f64) -> (u32, u32) {
    if cm <= 0.0 {
        return (0, 0);
    }
    let total_inches = (cm / CM_PER_INCH).round() as u32;
    (total_inches / 12, total_inches % 12)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pounds_round_trip_to_whole_pounds() {
        let kg = lbs_to_kg(154.0);
        assert!((kg - 69.853).abs() < 0.001);
        assert_eq!(kg_to_lbs(kg), 154.0);
    }

    #[test]
    fn height_in_feet_and_inches() {
        let cm = feet_inches_to_cm(5.0, 10.0);
        assert!((cm - 177.8).abs() < 1e-9);
        assert_eq!(cm_to_feet_inches(cm), (5, 10));
        assert_eq!(cm_to_feet_inches(175.0), (5, 9));
        // 71.9 in rounds up to a full 6 ft
        assert_eq!(cm_to_feet_inches(182.6), (6, 0));
    }

    #[test]
    fn unset_values_stay_zero() {
        assert_eq!(lbs_to_kg(0.0), 0.0);
        assert_eq!(kg_to_lbs(-3.0), 0.0);
        assert_eq!(feet_inches_to_cm(0.0, 0.0), 0.0);
        assert_eq!(cm_to_feet_inches(0.0), (0, 0));
    }
}
