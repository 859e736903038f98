use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Discrete letter grade derived from an overall percentage.
///
/// Stored as its display form ("A-", "B+", ...) in the database.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum LetterGrade {
    #[sea_orm(string_value = "A")]
    A,
    #[sea_orm(string_value = "A-")]
    AMinus,
    #[sea_orm(string_value = "B+")]
    BPlus,
    #[sea_orm(string_value = "B")]
    B,
    #[sea_orm(string_value = "B-")]
    BMinus,
    #[sea_orm(string_value = "C+")]
    CPlus,
    #[sea_orm(string_value = "C")]
    C,
    #[sea_orm(string_value = "C-")]
    CMinus,
    #[sea_orm(string_value = "D")]
    D,
    #[sea_orm(string_value = "F")]
    F,
}

impl LetterGrade {
    /// Fixed percentage thresholds, highest match wins. Values below a
    /// cutoff fall through unrounded: 89.99 is an A-, not an A.
    pub fn from_percentage(percentage: f64) -> Self {
        match percentage {
            p if p >= 90.0 => Self::A,
            p if p >= 85.0 => Self::AMinus,
            p if p >= 80.0 => Self::BPlus,
            p if p >= 75.0 => Self::B,
            p if p >= 70.0 => Self::BMinus,
            p if p >= 65.0 => Self::CPlus,
            p if p >= 60.0 => Self::C,
            p if p >= 55.0 => Self::CMinus,
            p if p >= 50.0 => Self::D,
            _ => Self::F,
        }
    }

    /// Numeric weight used for GPA arithmetic
    pub const fn grade_points(self) -> f64 {
        match self {
            Self::A => 4.0,
            Self::AMinus => 3.7,
            Self::BPlus => 3.3,
            Self::B => 3.0,
            Self::BMinus => 2.7,
            Self::CPlus => 2.3,
            Self::C => 2.0,
            Self::CMinus => 1.7,
            Self::D => 1.0,
            Self::F => 0.0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::CMinus => "C-",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl Display for LetterGrade {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Overall percentage for a set of assessments. A section with no
/// assessments (zero possible points) scores 0.
pub fn overall_percentage(earned: f64, possible: f64) -> f64 {
    if possible <= 0.0 {
        0.0
    } else {
        earned / possible * 100.0
    }
}

/// Credit-weighted grade point average over `(letter, credits)` pairs.
/// Returns `None` when no credits are attempted.
pub fn grade_point_average<I>(entries: I) -> Option<f64>
where
    I: IntoIterator<Item = (LetterGrade, i32)>,
{
    let mut points = 0.0;
    let mut credits = 0i64;

    for (letter, course_credits) in entries {
        points += letter.grade_points() * f64::from(course_credits);
        credits += i64::from(course_credits);
    }

    if credits == 0 {
        None
    } else {
        Some(points / credits as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_letter(percentage: f64, expected: LetterGrade) {
        assert_eq!(
            LetterGrade::from_percentage(percentage),
            expected,
            "wrong letter for {percentage}"
        );
    }

    #[test]
    fn test_threshold_boundaries() {
        test_letter(100.0, LetterGrade::A);
        test_letter(90.0, LetterGrade::A);
        test_letter(89.99, LetterGrade::AMinus);
        test_letter(85.0, LetterGrade::AMinus);
        test_letter(80.0, LetterGrade::BPlus);
        test_letter(75.0, LetterGrade::B);
        test_letter(70.0, LetterGrade::BMinus);
        test_letter(65.0, LetterGrade::CPlus);
        test_letter(60.0, LetterGrade::C);
        test_letter(55.0, LetterGrade::CMinus);
        test_letter(50.0, LetterGrade::D);
        test_letter(49.99, LetterGrade::F);
        test_letter(0.0, LetterGrade::F);
    }

    #[test]
    fn test_two_assessments_average_to_b() {
        // Midterm 80/100 + Final 70/100
        let percentage = overall_percentage(80.0 + 70.0, 100.0 + 100.0);
        assert_eq!(percentage, 75.0);
        assert_eq!(LetterGrade::from_percentage(percentage), LetterGrade::B);
    }

    #[test]
    fn test_missing_score_counts_as_zero() {
        // Midterm 80/100, no Final recorded
        let percentage = overall_percentage(80.0, 200.0);
        assert_eq!(percentage, 40.0);
        assert_eq!(LetterGrade::from_percentage(percentage), LetterGrade::F);
    }

    #[test]
    fn test_no_assessments_scores_zero() {
        assert_eq!(overall_percentage(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_grade_points_table() {
        assert_eq!(LetterGrade::A.grade_points(), 4.0);
        assert_eq!(LetterGrade::AMinus.grade_points(), 3.7);
        assert_eq!(LetterGrade::BPlus.grade_points(), 3.3);
        assert_eq!(LetterGrade::F.grade_points(), 0.0);
    }

    #[test]
    fn test_gpa_weights_by_credits() {
        // A over 4 credits + B over 2 credits = (16 + 6) / 6
        let gpa = grade_point_average([(LetterGrade::A, 4), (LetterGrade::B, 2)]).unwrap();
        assert!((gpa - 22.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_gpa_empty_is_none() {
        let no_courses: [(LetterGrade, i32); 0] = [];
        assert_eq!(grade_point_average(no_courses), None);
    }

    #[test]
    fn test_display_matches_stored_form() {
        assert_eq!(LetterGrade::AMinus.to_string(), "A-");
        assert_eq!(LetterGrade::BPlus.to_string(), "B+");
        assert_eq!(LetterGrade::F.to_string(), "F");
    }
}
