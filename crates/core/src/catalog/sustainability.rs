//! Sustainability scoring for providers and products.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::MONEY_PRECISION;

/// Certifications beyond this count do not raise the score.
pub const MAX_SCORED_CERTIFICATIONS: usize = 5;

pub const ENERGY_GRADES: [&str; 10] = ["A+++", "A++", "A+", "A", "B", "C", "D", "E", "F", "G"];

/// Inputs shared by providers and products.
#[derive(Debug, Clone, Copy)]
pub struct SustainabilityInputs<'a> {
    pub renewable_percentage: Decimal,
    /// Tonnes of CO2 avoided per year.
    pub co2_reduction: Decimal,
    pub energy_efficiency: Option<&'a str>,
    pub certification_count: usize,
}

/// Points for an efficiency grade; unknown or missing grades score 0.
pub fn grade_points(grade: Option<&str>) -> Decimal {
    match grade.map(str::trim) {
        Some("A+++") => dec!(100),
        Some("A++") => dec!(90),
        Some("A+") => dec!(80),
        Some("A") => dec!(70),
        Some("B") => dec!(60),
        Some("C") => dec!(50),
        Some("D") => dec!(40),
        Some("E") => dec!(30),
        Some("F") => dec!(20),
        Some("G") => dec!(10),
        _ => Decimal::ZERO,
    }
}

/// Weighted score in `[0, 100]`, rounded to 2 dp:
/// 40% renewable share, 30% CO2 reduction (saturating at 1000 t),
/// 20% efficiency grade, 10% certifications (saturating at 5).
pub fn sustainability_score(inputs: SustainabilityInputs<'_>) -> Decimal {
    let renewable = inputs
        .renewable_percentage
        .max(Decimal::ZERO)
        .min(dec!(100));
    let co2 = (inputs.co2_reduction / dec!(1000))
        .max(Decimal::ZERO)
        .min(Decimal::ONE)
        * dec!(100);
    let grade = grade_points(inputs.energy_efficiency);
    let certs = Decimal::from(inputs.certification_count.min(MAX_SCORED_CERTIFICATIONS))
        / Decimal::from(MAX_SCORED_CERTIFICATIONS)
        * dec!(100);

    let score = dec!(0.4) * renewable + dec!(0.3) * co2 + dec!(0.2) * grade + dec!(0.1) * certs;
    score
        .max(Decimal::ZERO)
        .min(dec!(100))
        .round_dp(MONEY_PRECISION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(renewable: Decimal, co2: Decimal, grade: Option<&str>, certs: usize) -> SustainabilityInputs<'_> {
        SustainabilityInputs {
            renewable_percentage: renewable,
            co2_reduction: co2,
            energy_efficiency: grade,
            certification_count: certs,
        }
    }

    #[test]
    fn test_perfect_inputs_score_100() {
        assert_eq!(
            sustainability_score(inputs(dec!(100), dec!(5000), Some("A+++"), 9)),
            dec!(100)
        );
    }

    #[test]
    fn test_mixed_inputs() {
        // 0.4*80 + 0.3*50 + 0.2*60 + 0.1*40 = 32 + 15 + 12 + 4
        assert_eq!(
            sustainability_score(inputs(dec!(80), dec!(500), Some("B"), 2)),
            dec!(63)
        );
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        assert_eq!(
            sustainability_score(inputs(dec!(-20), dec!(-10), Some("Z"), 0)),
            Decimal::ZERO
        );
        assert_eq!(
            sustainability_score(inputs(dec!(250), Decimal::ZERO, None, 0)),
            dec!(40)
        );
    }

    #[test]
    fn test_grade_table() {
        assert_eq!(grade_points(Some("A++")), dec!(90));
        assert_eq!(grade_points(Some("G")), dec!(10));
        assert_eq!(grade_points(None), Decimal::ZERO);
    }
}
