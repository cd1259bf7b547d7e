//! How to register an autonomous provider
//!
//! 1) Implement `DecisionProvider` for your type in its module.
//! 2) Add a new `AgentFactory` entry to the static list with stable `name`
//!    and `version`.
//! 3) Keep ordering stable; avoid side effects in constructors.
//! 4) Determinism: same seed, same behavior (where applicable).
//!
//! Only autonomous agents belong here; human and external seats are wired
//! with channels at game creation and are not constructible by name.

use std::sync::Arc;

use crate::providers::even_split::EvenSplitAgent;
use crate::providers::scripted::ScriptedAgent;
use crate::providers::trait_def::DecisionProvider;

/// Factory definition for constructing autonomous providers.
pub struct AgentFactory {
    pub name: &'static str,
    pub version: &'static str,
    pub make: fn(seed: Option<u64>) -> Arc<dyn DecisionProvider>,
}

static AGENT_FACTORIES: &[AgentFactory] = &[
    AgentFactory {
        name: ScriptedAgent::NAME,
        version: ScriptedAgent::VERSION,
        make: make_scripted,
    },
    AgentFactory {
        name: EvenSplitAgent::NAME,
        version: EvenSplitAgent::VERSION,
        make: make_even_split,
    },
];

/// Returns the statically registered agent factories.
pub fn registered_agents() -> &'static [AgentFactory] {
    AGENT_FACTORIES
}

/// Finds a registered agent factory by its name.
pub fn by_name(name: &str) -> Option<&'static AgentFactory> {
    registered_agents()
        .iter()
        .find(|factory| factory.name == name)
}

fn make_scripted(seed: Option<u64>) -> Arc<dyn DecisionProvider> {
    Arc::new(ScriptedAgent::new(seed))
}

fn make_even_split(_seed: Option<u64>) -> Arc<dyn DecisionProvider> {
    Arc::new(EvenSplitAgent::new())
}
