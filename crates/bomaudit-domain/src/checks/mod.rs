use crate::engine::Detection;
use crate::input::AuditInput;
use crate::model::UsageSet;
use crate::policy::AuditPolicy;
use bomaudit_types::ArtifactId;

mod incorrect_direct;
mod incorrect_transitive;
mod missing_direct;
mod missing_transitive;
mod utils;


/// The order is part of the output contract: it fixes the order of findings in every log.
pub fn run_all(ctx: &AuditContext<'_>, out: &mut Detection) {
    missing_direct::run(ctx, out);
    incorrect_direct::run(ctx, out);
    incorrect_transitive::run(ctx, out);
    missing_transitive::run(ctx, out);
}

/// A graph node whose reference parsed into an artifact id.
#[derive(Clone, Debug)]
pub struct Node<'a> {
    pub reference: &'a str,
    pub id: ArtifactId,
}

/// Graph levels and usage resolved once per run.
pub struct AuditContext<'a> {
    pub input: &'a AuditInput,
    pub policy: &'a AuditPolicy,
    pub root: Option<Node<'a>>,
    /// `None` without a unique root or without root metadata.
    pub root_usage: Option<UsageSet>,
    pub direct: Vec<Node<'a>>,
    pub second: Vec<Node<'a>>,
    pub all: Vec<ArtifactId>,
}

impl<'a> AuditContext<'a> {
    pub fn new(input: &'a AuditInput, policy: &'a AuditPolicy) -> Self {
        let graph = &input.graph;
        let root = graph.root().and_then(utils::resolve);
        let root_usage = match (&root, &input.root_metadata) {
            (Some(_), Some(meta)) => Some(meta.usage_set(&policy.skip_prefixes)),
            _ => None,
        };

        Self {
            input,
            policy,
            root,
            root_usage,
            direct: utils::resolve_all(graph.direct_dependencies()),
            second: utils::resolve_all(graph.second_level_nodes()),
            all: utils::resolve_all(graph.nodes())
                .into_iter()
                .map(|n| n.id)
                .collect(),
        }
    }

    pub fn children(&self, node: &Node<'a>) -> Vec<Node<'a>> {
        utils::resolve_all(self.input.graph.successors(node.reference))
    }

    pub fn usage_of(&self, id: &ArtifactId) -> Option<UsageSet> {
        self.input
            .metadata
            .get(id)
            .map(|meta| meta.usage_set(&self.policy.skip_prefixes))
    }
}
