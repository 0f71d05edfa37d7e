// Expression composer: response plan for the text layer and telemetry frame
// for the visual layer, both derived from the same turn decision.

pub mod compose;
pub mod language_plan;
pub mod telemetry_plan;
pub mod types;

pub use compose::compose_expression_bundle;
pub use language_plan::build_response_plan;
pub use telemetry_plan::build_telemetry;
pub use types::{
    BulletStyle, ColorChannel, EXPRESSION_EVENT_NAME, ExpressionBundle, ExpressionEvent,
    ExpressionInput, Formatting, HeadingStyle, LexicalRules, Motion, PlanLimits, PlanOptions,
    ResponsePlan, ResponseSection, SectionId, TelemetryFrame, VisualState,
};
