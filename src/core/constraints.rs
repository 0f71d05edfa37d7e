//! Disposition ladder and the order-independent constraint combinator.
//!
//! Every advisory source (identity, posture, order/focus) expresses its
//! restrictions as a [`ConstraintSet`]. Sets are merged with
//! [`ConstraintSet::intersect`], which always keeps the stricter value, so the
//! merge result does not depend on the order sources are applied in.

use serde::{Deserialize, Serialize};
use strum::Display;

// Disposition — final action stance, ordered by strictness
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Disposition {
    Act,
    Ask,
    Pause,
    Defer,
    Decline,
}

impl Disposition {
    /// The stricter of two dispositions.
    pub fn stricter(self, other: Self) -> Self {
        self.max(other)
    }

    /// Length ceiling implied by the disposition alone.
    ///
    /// Not monotone in strictness: defer sits above ask and pause but keeps a
    /// medium ceiling for its constraints and next-step layout.
    pub fn length_ceiling(self) -> MaxLength {
        match self {
            Self::Act => MaxLength::Long,
            Self::Defer => MaxLength::Medium,
            Self::Ask | Self::Pause | Self::Decline => MaxLength::Short,
        }
    }
}

// MaxLength — ordered by strictness: long < medium < short
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MaxLength {
    Short,
    Medium,
    Long,
}

impl MaxLength {
    fn strictness(self) -> u8 {
        match self {
            Self::Long => 0,
            Self::Medium => 1,
            Self::Short => 2,
        }
    }

    pub fn stricter(self, other: Self) -> Self {
        if other.strictness() > self.strictness() {
            other
        } else {
            self
        }
    }

    pub fn is_stricter_than(self, other: Self) -> bool {
        self.strictness() > other.strictness()
    }
}

/// A set of output restrictions. `None` means "no opinion".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConstraintSet {
    #[serde(default)]
    pub max_options: Option<u32>,
    #[serde(default)]
    pub max_length: Option<MaxLength>,
    #[serde(default)]
    pub ask_single_question: bool,
    #[serde(default)]
    pub prefer_checklist: bool,
    #[serde(default)]
    pub require_concrete_dates: bool,
    #[serde(default)]
    pub require_explicit_assumptions: bool,
}

impl ConstraintSet {
    /// Stricter-wins merge: min of option counts, strictest length, OR of flags.
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            max_options: merge_opt(self.max_options, other.max_options, u32::min),
            max_length: merge_opt(self.max_length, other.max_length, MaxLength::stricter),
            ask_single_question: self.ask_single_question || other.ask_single_question,
            prefer_checklist: self.prefer_checklist || other.prefer_checklist,
            require_concrete_dates: self.require_concrete_dates || other.require_concrete_dates,
            require_explicit_assumptions: self.require_explicit_assumptions
                || other.require_explicit_assumptions,
        }
    }

    /// Fold any number of sets; an empty iterator yields the unrestricted set.
    pub fn intersect_all<'a>(sets: impl IntoIterator<Item = &'a Self>) -> Self {
        sets.into_iter()
            .fold(Self::default(), |acc, set| acc.intersect(set))
    }

    /// Restrictions a disposition carries on its own.
    pub fn for_disposition(disposition: Disposition) -> Self {
        let max_length = Some(disposition.length_ceiling());
        match disposition {
            Disposition::Act => Self::default(),
            Disposition::Ask => Self {
                max_options: Some(1),
                max_length,
                ask_single_question: true,
                ..Self::default()
            },
            Disposition::Pause | Disposition::Defer | Disposition::Decline => Self {
                max_length,
                ..Self::default()
            },
        }
    }
}

fn merge_opt<T: Copy>(a: Option<T>, b: Option<T>, pick: impl Fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(x), Some(y)) => Some(pick(x, y)),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loose() -> ConstraintSet {
        ConstraintSet {
            max_options: Some(5),
            max_length: Some(MaxLength::Long),
            require_concrete_dates: true,
            ..ConstraintSet::default()
        }
    }

    fn tight() -> ConstraintSet {
        ConstraintSet {
            max_options: Some(1),
            max_length: Some(MaxLength::Short),
            ask_single_question: true,
            prefer_checklist: true,
            ..ConstraintSet::default()
        }
    }

    #[test]
    fn defer_keeps_a_medium_ceiling() {
        assert_eq!(Disposition::Act.length_ceiling(), MaxLength::Long);
        assert_eq!(Disposition::Pause.length_ceiling(), MaxLength::Short);
        assert_eq!(Disposition::Defer.length_ceiling(), MaxLength::Medium);
        assert_eq!(Disposition::Decline.length_ceiling(), MaxLength::Short);
    }

    #[test]
    fn disposition_order_is_strictness() {
        assert!(Disposition::Act < Disposition::Ask);
        assert!(Disposition::Defer < Disposition::Decline);
        assert_eq!(Disposition::Pause.stricter(Disposition::Ask), Disposition::Pause);
        assert_eq!(Disposition::Act.stricter(Disposition::Decline), Disposition::Decline);
    }

    #[test]
    fn length_ceiling_is_monotone_in_strictness() {
        assert_eq!(Disposition::Act.length_ceiling(), MaxLength::Long);
        assert_eq!(Disposition::Defer.length_ceiling(), MaxLength::Medium);
        assert_eq!(Disposition::Decline.length_ceiling(), MaxLength::Short);
    }

    #[test]
    fn max_length_stricter_prefers_short() {
        assert_eq!(MaxLength::Long.stricter(MaxLength::Short), MaxLength::Short);
        assert_eq!(MaxLength::Medium.stricter(MaxLength::Long), MaxLength::Medium);
        assert!(MaxLength::Short.is_stricter_than(MaxLength::Medium));
    }

    #[test]
    fn intersect_takes_stricter_values() {
        let merged = loose().intersect(&tight());
        assert_eq!(merged.max_options, Some(1));
        assert_eq!(merged.max_length, Some(MaxLength::Short));
        assert!(merged.ask_single_question);
        assert!(merged.prefer_checklist);
        assert!(merged.require_concrete_dates);
    }

    #[test]
    fn intersect_is_commutative_and_idempotent() {
        assert_eq!(loose().intersect(&tight()), tight().intersect(&loose()));
        assert_eq!(tight().intersect(&tight()), tight());
    }

    #[test]
    fn intersect_keeps_single_sided_limits() {
        let only_len = ConstraintSet {
            max_length: Some(MaxLength::Medium),
            ..ConstraintSet::default()
        };
        let merged = only_len.intersect(&ConstraintSet::default());
        assert_eq!(merged.max_length, Some(MaxLength::Medium));
        assert_eq!(merged.max_options, None);
    }

    #[test]
    fn intersect_all_of_nothing_is_unrestricted() {
        assert_eq!(ConstraintSet::intersect_all(std::iter::empty()), ConstraintSet::default());
        let all = ConstraintSet::intersect_all([&loose(), &tight()]);
        assert_eq!(all, loose().intersect(&tight()));
    }

    #[test]
    fn ask_disposition_restricts_to_one_option() {
        let ask = ConstraintSet::for_disposition(Disposition::Ask);
        assert_eq!(ask.max_options, Some(1));
        assert_eq!(ask.max_length, Some(MaxLength::Short));
        assert_eq!(ConstraintSet::for_disposition(Disposition::Act), ConstraintSet::default());
    }
}
