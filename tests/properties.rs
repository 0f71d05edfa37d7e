use proptest::prelude::*;

use scing::ModulationConfig;
use scing::config::GradientsConfig;
use scing::core::attractors::default_policy;
use scing::core::constraints::{ConstraintSet, Disposition, MaxLength};
use scing::core::context::{Level, SensorReadings, TurnContext, UserIntent};
use scing::core::gradients::derive_gradients;
use scing::core::identity::{
    IdentityConstraints, IdentityDecision, OutputLimits, StyleOptions, apply_style_rules,
};
use scing::core::order_focus::DispositionBias;
use scing::core::pipeline::{TurnSnapshot, merge_dispositions, run_turn};
use scing::core::posture::{InteractionStats, PostureId, posture_to_user_intent};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Finite, out-of-range and non-finite scalars alike.
fn arb_scalar() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => -2.0..3.0f64,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
        1 => any::<f64>(),
    ]
}

fn arb_level() -> impl Strategy<Value = Level> {
    prop_oneof![Just(Level::Low), Just(Level::Medium), Just(Level::High)]
}

fn arb_intent() -> impl Strategy<Value = UserIntent> {
    prop_oneof![
        Just(UserIntent::Directive),
        Just(UserIntent::Exploratory),
        Just(UserIntent::Overloaded),
        Just(UserIntent::Unknown),
    ]
}

fn arb_disposition() -> impl Strategy<Value = Disposition> {
    prop_oneof![
        Just(Disposition::Act),
        Just(Disposition::Ask),
        Just(Disposition::Pause),
        Just(Disposition::Defer),
        Just(Disposition::Decline),
    ]
}

fn arb_bias() -> impl Strategy<Value = DispositionBias> {
    prop_oneof![
        Just(DispositionBias::Act),
        Just(DispositionBias::Ask),
        Just(DispositionBias::Pause),
        Just(DispositionBias::Defer),
    ]
}

fn arb_sensors() -> impl Strategy<Value = SensorReadings> {
    (
        proptest::option::of(arb_scalar()),
        proptest::option::of(arb_scalar()),
        proptest::option::of(arb_scalar()),
    )
        .prop_map(|(voice_tension, voice_rate, bio_stress)| SensorReadings {
            voice_tension,
            voice_rate,
            bio_stress,
        })
}

fn arb_context() -> impl Strategy<Value = TurnContext> {
    (
        arb_intent(),
        proptest::option::of(arb_level()),
        any::<bool>(),
        proptest::option::of(arb_level()),
        proptest::option::of(arb_scalar()),
        proptest::option::of(arb_scalar()),
        any::<bool>(),
        proptest::option::of(arb_level()),
        proptest::option::of(0u32..20),
    )
        .prop_map(
            |(
                user_intent,
                time_pressure,
                has_security_flags,
                request_impact,
                ambiguity,
                contradiction,
                disallowed,
                system_load,
                recent_errors,
            )| TurnContext {
                user_intent,
                time_pressure,
                has_security_flags,
                request_impact,
                ambiguity,
                contradiction,
                disallowed,
                domain: None,
                system_load,
                recent_errors,
            },
        )
}

fn arb_constraints() -> impl Strategy<Value = ConstraintSet> {
    (
        proptest::option::of(0u32..10),
        proptest::option::of(prop_oneof![
            Just(MaxLength::Short),
            Just(MaxLength::Medium),
            Just(MaxLength::Long),
        ]),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(
                max_options,
                max_length,
                ask_single_question,
                prefer_checklist,
                require_concrete_dates,
                require_explicit_assumptions,
            )| ConstraintSet {
                max_options,
                max_length,
                ask_single_question,
                prefer_checklist,
                require_concrete_dates,
                require_explicit_assumptions,
            },
        )
}

fn arb_snapshot() -> impl Strategy<Value = TurnSnapshot> {
    (
        "[a-zA-Z ?!.']{0,80}",
        arb_sensors(),
        arb_context(),
        0u32..10,
        proptest::option::of(0.0..1.0f64),
        prop::collection::vec("[a-z]{1,6}", 0..4),
    )
        .prop_map(|(text, sensors, context, burst, caps, words)| TurnSnapshot {
            text,
            interaction: InteractionStats {
                messages_last_2_min: burst,
                caps_ratio: caps,
                ..InteractionStats::default()
            },
            sensors,
            context,
            candidates: words.into_iter().map(serde_json::Value::String).collect(),
            now_ms: Some(1_000_000),
            ..TurnSnapshot::default()
        })
}

fn unit(v: f64) -> bool {
    v.is_finite() && (0.0..=1.0).contains(&v)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn gradients_stay_in_unit_range(ctx in arb_context(), sensors in arb_sensors()) {
        let g = derive_gradients(&ctx, &sensors, &GradientsConfig::default());
        prop_assert!(unit(g.stress));
        prop_assert!(unit(g.curiosity));
        prop_assert!(unit(g.urgency));
        prop_assert!(unit(g.confidence));
    }

    #[test]
    fn intersect_is_order_independent(
        a in arb_constraints(),
        b in arb_constraints(),
        c in arb_constraints(),
    ) {
        prop_assert_eq!(a.intersect(&b), b.intersect(&a));
        prop_assert_eq!(a.intersect(&b).intersect(&c), a.intersect(&b.intersect(&c)));
        prop_assert_eq!(a.intersect(&a), a);
    }

    #[test]
    fn merge_never_loosens_either_side(identity in arb_disposition(), bias in arb_bias()) {
        let merged = merge_dispositions(identity, bias);
        prop_assert!(merged >= identity);
        prop_assert!(merged >= Disposition::from(bias));
        prop_assert_eq!(merged, Disposition::from(bias).stricter(identity));
    }

    #[test]
    fn ask_output_has_at_most_one_question(draft in "[a-z ?.\n]{0,120}") {
        let decision = IdentityDecision {
            disposition: Disposition::Ask,
            confidence: 0.7,
            constraints: IdentityConstraints::default(),
            output_limits: OutputLimits::default(),
        };
        let styled = apply_style_rules(&draft, &decision, StyleOptions::default());
        prop_assert!(styled.matches('?').count() <= 1);
    }

    #[test]
    fn turns_are_bounded_and_repeatable(snapshot in arb_snapshot()) {
        let cfg = ModulationConfig::default();
        let first = run_turn(&snapshot, &cfg);
        let second = run_turn(&snapshot, &cfg);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );

        prop_assert!(unit(first.order_focus.coherence));
        prop_assert!(unit(first.order_focus.intent_stability));
        prop_assert!(unit(first.expression.telemetry.intensity));
        prop_assert!(unit(first.collapse.confidence));
        prop_assert!(first.decision.disposition >= first.identity.disposition);
        if snapshot.context.disallowed {
            prop_assert_eq!(first.decision.disposition, Disposition::Decline);
        }
    }

    #[test]
    fn attractor_policy_stays_within_one_step_of_default(snapshot in arb_snapshot()) {
        let outcome = run_turn(&snapshot, &ModulationConfig::default());
        let intent = match outcome.posture.id {
            PostureId::Unknown => snapshot.context.user_intent,
            id => posture_to_user_intent(id),
        };
        let default = default_policy(outcome.attractor.id);
        let policy = outcome.attractor.policy;
        if intent != UserIntent::Overloaded {
            prop_assert!((policy.verbosity as i32 - default.verbosity as i32).abs() <= 1);
        }
        prop_assert!((policy.risk_posture as i32 - default.risk_posture as i32).abs() <= 1);
    }
}
