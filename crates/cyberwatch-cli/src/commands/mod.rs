pub mod assess;
pub mod dashboard;
pub mod replay;
pub mod scenarios;
pub mod tour;

use cyberwatch_core::Engine;

/// Build an engine on the reference topology and builtin scenarios, with the
/// requested scenario applied. Unknown ids silently use the default.
pub fn make_engine(scenario: &str, seed: Option<u64>) -> Engine {
    let mut engine = Engine::with_defaults(seed);
    if engine.scenario().id != scenario {
        engine.apply_scenario(scenario);
    }
    engine
}
