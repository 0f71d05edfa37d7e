use scing::ModulationConfig;
use scing::config::{GradientsConfig, IdentityGateConfig, OrderFocusConfig, PostureConfig};
use scing::core::attractors::{
    AttractorId, AttractorResult, AttractorScore, collapse_to_attractor, default_policy,
    pick_by_tie_break,
};
use scing::core::cognition::CollapseResult;
use scing::core::constraints::{Disposition, MaxLength};
use scing::core::context::{Level, SensorReadings, TurnContext, UserIntent};
use scing::core::gradients::{Gradients, derive_gradients};
use scing::core::identity::{
    IdentityDecision, IdentityInput, StyleOptions, apply_style_rules,
    evaluate_identity_constraints,
};
use scing::core::order_focus::{
    DispositionBias, IntentEntry, OrderFocusHistory, OrderFocusInput, OrderFocusSignals,
    ReasonCode, gate_order_focus,
};
use scing::core::pipeline::{TurnSnapshot, run_turn};

const NOW: u64 = 1_000_000;

fn collapse(confidence: f64) -> CollapseResult {
    CollapseResult {
        confidence,
        ..CollapseResult::default()
    }
}

fn attractor(id: AttractorId, confidence: f64) -> AttractorResult {
    AttractorResult {
        id,
        confidence,
        policy: default_policy(id),
    }
}

fn decide(
    collapse: &CollapseResult,
    attractor: &AttractorResult,
    gradients: &Gradients,
    context: &TurnContext,
) -> IdentityDecision {
    evaluate_identity_constraints(
        &IdentityInput {
            collapse,
            attractor,
            gradients,
            context,
            posture_constraints: None,
        },
        &IdentityGateConfig::default(),
    )
}

fn turn(json: &str) -> scing::TurnOutcome {
    let snapshot = TurnSnapshot::from_json(json).unwrap();
    run_turn(&snapshot, &ModulationConfig::default())
}

mod gradients {
    use super::*;
    use scing::core::gradients::{apply_to_attractor_policy, effective_collapse_params};
    use scing::core::policy::{Policy, RiskPosture, Structure, Tone, Verbosity};

    #[test]
    fn curiosity_is_capped_under_risk() {
        let sensors = SensorReadings {
            voice_rate: Some(1.0),
            ..SensorReadings::default()
        };
        for ctx in [
            TurnContext {
                user_intent: UserIntent::Exploratory,
                has_security_flags: true,
                ..TurnContext::default()
            },
            TurnContext {
                user_intent: UserIntent::Exploratory,
                system_load: Some(Level::High),
                ..TurnContext::default()
            },
        ] {
            let g = derive_gradients(&ctx, &sensors, &GradientsConfig::default());
            assert!(g.curiosity <= 0.45 + 1e-12, "curiosity {} not capped", g.curiosity);
        }
    }

    #[test]
    fn policy_moves_at_most_one_step_under_extreme_gradients() {
        let base = Policy {
            verbosity: Verbosity::Expanded,
            tone: Tone::Creative,
            structure: Structure::Hybrid,
            risk_posture: RiskPosture::Open,
        };
        let extreme = Gradients::new(0.9, 0.95, 0.95, 0.5);
        let next = apply_to_attractor_policy(&base, &extreme, &TurnContext::default(), false);
        assert_eq!(next.verbosity, Verbosity::Standard);
        assert_ne!(next.risk_posture, RiskPosture::Restricted);
    }

    #[test]
    fn urgency_trims_evaluation_cycles() {
        let cfg = ModulationConfig::default();
        let urgent = effective_collapse_params(&Gradients::new(0.2, 0.2, 0.95, 0.5), &cfg.collapse);
        assert!(urgent.max_evaluation_cycles <= 3);
        assert!(urgent.max_evaluation_cycles >= 1);
    }

    #[test]
    fn derivation_is_repeatable() {
        let ctx = TurnContext {
            user_intent: UserIntent::Directive,
            time_pressure: Some(Level::High),
            recent_errors: Some(2),
            ..TurnContext::default()
        };
        let sensors = SensorReadings {
            bio_stress: Some(0.6),
            voice_tension: Some(f64::NAN),
            voice_rate: Some(7.0),
        };
        let cfg = GradientsConfig::default();
        let a = derive_gradients(&ctx, &sensors, &cfg);
        assert_eq!(a, derive_gradients(&ctx, &sensors, &cfg));
        for v in [a.stress, a.curiosity, a.urgency, a.confidence] {
            assert!((0.0..=1.0).contains(&v));
        }
    }
}

mod attractors {
    use super::*;

    #[test]
    fn four_way_tie_resolves_to_protection() {
        let scores: Vec<AttractorScore> = [
            AttractorId::Expression,
            AttractorId::Insight,
            AttractorId::Order,
            AttractorId::Protection,
        ]
        .into_iter()
        .map(|id| AttractorScore {
            id,
            score: 0.5,
            reasons: Vec::new(),
        })
        .collect();

        for _ in 0..5 {
            let picked = pick_by_tie_break(&scores).map(|s| s.id);
            assert_eq!(picked, Some(AttractorId::Protection));
        }
    }

    #[test]
    fn selection_is_stable_across_calls() {
        let ctx = TurnContext {
            user_intent: UserIntent::Exploratory,
            domain: Some("architecture".into()),
            ..TurnContext::default()
        };
        let c = collapse(0.7);
        let first = collapse_to_attractor(&c, &ctx);
        for _ in 0..5 {
            assert_eq!(collapse_to_attractor(&c, &ctx), first);
        }
    }
}

mod identity {
    use super::*;
    use scing::core::policy::Structure;

    #[test]
    fn directive_order_turn_acts_with_short_checklist() {
        let ctx = TurnContext {
            user_intent: UserIntent::Directive,
            time_pressure: Some(Level::Low),
            has_security_flags: false,
            ..TurnContext::default()
        };
        let d = decide(
            &collapse(0.9),
            &attractor(AttractorId::Order, 0.9),
            &Gradients::new(0.2, 0.2, 0.2, 0.8),
            &ctx,
        );
        assert_eq!(d.disposition, Disposition::Act);
        assert_eq!(d.constraints.enforce_structure, Some(Structure::Checklist));
        assert_eq!(d.output_limits.max_length, MaxLength::Short);
    }

    #[test]
    fn flagged_high_impact_low_confidence_defers() {
        let ctx = TurnContext {
            has_security_flags: true,
            request_impact: Some(Level::High),
            ..TurnContext::default()
        };
        let d = decide(
            &collapse(0.4),
            &attractor(AttractorId::Protection, 0.6),
            &Gradients::new(0.5, 0.2, 0.2, 0.4),
            &ctx,
        );
        assert_eq!(d.disposition, Disposition::Defer);
    }

    #[test]
    fn disallowed_always_declines() {
        let ctx = TurnContext {
            disallowed: true,
            user_intent: UserIntent::Directive,
            ..TurnContext::default()
        };
        for id in AttractorId::ALL {
            for g in [Gradients::new(0.0, 1.0, 0.0, 1.0), Gradients::new(1.0, 0.0, 1.0, 0.0)] {
                let d = decide(&collapse(0.95), &attractor(id, 0.9), &g, &ctx);
                assert_eq!(d.disposition, Disposition::Decline);
            }
        }
    }

    #[test]
    fn ask_draft_is_trimmed_to_one_question() {
        let ctx = TurnContext {
            user_intent: UserIntent::Exploratory,
            ambiguity: Some(0.72),
            ..TurnContext::default()
        };
        let d = decide(
            &collapse(0.8),
            &attractor(AttractorId::Insight, 0.8),
            &Gradients::new(0.2, 0.2, 0.2, 0.5),
            &ctx,
        );
        assert_eq!(d.disposition, Disposition::Ask);

        let draft = "Which environment should I target? And should I also migrate the data?";
        let styled = apply_style_rules(draft, &d, StyleOptions::default());
        assert_eq!(styled.matches('?').count(), 1);
    }
}

mod order_focus {
    use super::*;
    use scing::core::order_focus::OrderFocusState;

    fn gate(labels: &[&str], ctx: &TurnContext) -> OrderFocusState {
        let c = collapse(0.9);
        let a = attractor(AttractorId::Order, 0.8);
        let g = Gradients::new(0.2, 0.2, 0.3, 0.5);
        let signals = OrderFocusSignals {
            ambiguity: Some(0.1),
            ..OrderFocusSignals::default()
        };
        let history = OrderFocusHistory {
            intents: labels
                .iter()
                .zip(1u64..)
                .map(|(label, i)| IntentEntry {
                    ts: NOW - 60_000 + i * 10_000,
                    label: (*label).to_string(),
                })
                .collect(),
            constraints: Vec::new(),
        };
        let input = OrderFocusInput {
            collapse: &c,
            attractor: &a,
            gradients: &g,
            context: ctx,
            posture: None,
            signals: &signals,
            history: &history,
        };
        gate_order_focus(&input, NOW, &OrderFocusConfig::default())
    }

    #[test]
    fn alternating_intents_pause_as_oscillating() {
        let ctx = TurnContext {
            user_intent: UserIntent::Directive,
            ..TurnContext::default()
        };
        let state = gate(&["directive", "exploratory", "directive", "exploratory"], &ctx);
        assert_eq!(state.reason_code, ReasonCode::Oscillating);
        assert_eq!(state.disposition_bias, DispositionBias::Pause);
    }

    #[test]
    fn identical_input_gives_identical_state() {
        let ctx = TurnContext {
            user_intent: UserIntent::Directive,
            ..TurnContext::default()
        };
        let a = serde_json::to_string(&gate(&["directive"; 3], &ctx)).unwrap();
        let b = serde_json::to_string(&gate(&["directive"; 3], &ctx)).unwrap();
        assert_eq!(a, b);
    }
}

mod posture {
    use super::*;
    use scing::core::posture::{
        InteractionStats, PostureEntry, PostureHistory, PostureId, PostureInput, extract_signals,
        score_postures, select_posture_with_context,
    };

    #[test]
    fn recent_directive_resists_marginal_exploratory_turn() {
        let stats = InteractionStats::default();
        let sensors = SensorReadings::default();
        let input = PostureInput {
            text: "what if we compare options?",
            interaction: &stats,
            sensors: &sensors,
            time_pressure: Some(Level::High),
            has_security_flags: false,
            now_ms: Some(10_000),
        };
        let cfg = PostureConfig::default();
        let scores = score_postures(&extract_signals(&input, &cfg));

        let fresh = select_posture_with_context(
            &scores,
            &PostureHistory::default(),
            Some(10_000),
            Some(Level::High),
            &cfg,
        );
        assert_eq!(fresh.id, PostureId::Exploratory);

        let history = PostureHistory {
            last_postures: vec![PostureEntry {
                ts: 9_000,
                id: PostureId::Directive,
            }],
        };
        let held = select_posture_with_context(&scores, &history, Some(10_000), Some(Level::High), &cfg);
        assert_eq!(held.id, PostureId::Directive);
    }
}

mod pipeline {
    use super::*;
    use scing::core::expression::{SectionId, VisualState};
    use scing::core::policy::Verbosity;
    use scing::core::posture::PostureId;

    fn steps_apart(a: Verbosity, b: Verbosity) -> i32 {
        (a as i32 - b as i32).abs()
    }

    #[test]
    fn hurried_exploration_moves_verbosity_one_step_at_most() {
        let outcome = turn(
            r#"{"text": "what if we tried a different angle on this?",
                "context": {"user_intent": "exploratory", "time_pressure": "high",
                            "system_load": "high", "domain": "research"},
                "collapse": {"confidence": 0.6}, "now_ms": 1000000}"#,
        );
        let default = default_policy(outcome.attractor.id);
        assert_eq!(outcome.attractor.id, AttractorId::Insight);
        assert!(steps_apart(outcome.attractor.policy.verbosity, default.verbosity) <= 1);
        assert_eq!(outcome.attractor.policy.verbosity, Verbosity::Standard);
        assert!(
            (outcome.attractor.policy.risk_posture as i32 - default.risk_posture as i32).abs() <= 1
        );

        let plan = &outcome.expression.response_plan;
        if outcome.decision.disposition == Disposition::Act {
            assert!(steps_apart(plan.verbosity, default.verbosity) <= 1);
        }
    }

    #[test]
    fn flagged_high_impact_turn_defers_end_to_end() {
        let outcome = turn(
            r#"{"text": "wipe the production credentials store",
                "context": {"has_security_flags": true, "request_impact": "high"},
                "collapse": {"confidence": 0.4}, "now_ms": 1000000}"#,
        );
        assert_eq!(outcome.identity.disposition, Disposition::Defer);
        assert_eq!(outcome.decision.disposition, Disposition::Defer);
        assert_eq!(outcome.attractor.id, AttractorId::Protection);
        assert!(outcome.expression.telemetry.tags.contains(&"protection_mode".to_string()));
    }

    #[test]
    fn disallowed_turn_declines_with_safety_layout() {
        let outcome = turn(
            r#"{"text": "go ahead", "context": {"disallowed": true, "user_intent": "directive"},
                "collapse": {"confidence": 0.95}}"#,
        );
        let plan = &outcome.expression.response_plan;
        assert_eq!(outcome.decision.disposition, Disposition::Decline);
        assert_eq!(
            plan.enabled_sections().collect::<Vec<_>>(),
            vec![SectionId::Safety, SectionId::Next]
        );
        assert_eq!(outcome.expression.telemetry.state, VisualState::Declining);
    }

    #[test]
    fn oscillating_history_tightens_an_acting_turn() {
        let outcome = turn(
            r#"{"text": "fix this now", "now_ms": 1000000,
                "context": {"user_intent": "directive"},
                "collapse": {"confidence": 0.9},
                "signals": {"ambiguity": 0.1, "last_input_ts": 999000},
                "history": {"intents": [
                    {"ts": 950000, "label": "directive"},
                    {"ts": 960000, "label": "exploratory"},
                    {"ts": 970000, "label": "directive"},
                    {"ts": 980000, "label": "exploratory"}
                ]}}"#,
        );
        assert_eq!(outcome.order_focus.reason_code, ReasonCode::Oscillating);
        assert!(outcome.decision.disposition >= Disposition::Pause);
        assert!(outcome.decision.disposition >= outcome.identity.disposition);
        assert_eq!(outcome.expression.response_plan.disposition, outcome.decision.disposition);
    }

    #[test]
    fn overloaded_posture_keeps_plan_short() {
        let outcome = turn(
            r#"{"text": "I'm overwhelmed and can't track this",
                "interaction": {"messages_last_2_min": 6},
                "sensors": {"bio_stress": 0.9},
                "now_ms": 10000}"#,
        );
        assert_eq!(outcome.posture.id, PostureId::Overloaded);
        assert!(outcome.posture.constraints.ask_single_question);
        assert!(outcome.posture.constraints.prefer_checklist);
        let limits = outcome.expression.response_plan.limits;
        assert_eq!(limits.max_length, MaxLength::Short);
        assert!(limits.max_options <= outcome.posture.constraints.max_options);
    }

    #[test]
    fn degenerate_snapshot_still_produces_bounded_outcome() {
        let outcome = turn(
            r#"{"sensors": {"bio_stress": 1e308, "voice_tension": -4.0},
                "context": {"ambiguity": 3.0, "contradiction": -1.0}}"#,
        );
        let g = outcome.gradients;
        for v in [
            g.stress,
            g.curiosity,
            g.urgency,
            g.confidence,
            outcome.order_focus.coherence,
            outcome.order_focus.intent_stability,
            outcome.expression.telemetry.intensity,
        ] {
            assert!(v.is_finite() && (0.0..=1.0).contains(&v), "out of bounds: {v}");
        }
    }

    #[test]
    fn concurrent_turns_do_not_interfere() {
        let snapshot = TurnSnapshot::from_json(
            r#"{"text": "compare the two rollout plans", "now_ms": 5000,
                "candidates": [{"plan": "blue"}, {"plan": "green"}]}"#,
        )
        .unwrap();
        let cfg = ModulationConfig::default();
        let expected = run_turn(&snapshot, &cfg);

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| run_turn(&snapshot, &cfg))).collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
