//! Cross-stage claim resolution.
//!
//! Each specification consumes the claims named in its input claim and
//! produces new claims at the point its challenges bind. A derived claim is
//! sound only if some later specification consumes it. The tracker replays
//! the stages in order and reports every derived claim left outstanding.
//!
//! Ordering within one specification: all consumption happens before any
//! production, so a specification never discharges its own output.

use crate::arg::Arg;
use crate::digest::compute_report_id;
use crate::expr::{Expr, Leaf, Provenance};
use crate::format::Format;
use crate::name::PolyName;
use crate::spec::{ProducedClaim, Stage, StageSpec};
use crate::text::TextFormat;
use serde::{Serialize, Serializer};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

/// Identity of a claim: the name plus the fixed-point part of its
/// evaluation. Free variables never take part.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClaimKey {
    pub name: PolyName,
    pub point: String,
}

impl ClaimKey {
    pub fn new(name: &PolyName, args: &[Arg]) -> Self {
        let point: Vec<String> = args
            .iter()
            .filter_map(Arg::as_fixed)
            .map(|p| TextFormat.fixed_point(p))
            .collect();
        Self {
            name: name.clone(),
            point: point.join(", "),
        }
    }
}

impl fmt::Display for ClaimKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@({})", self.name, self.point)
    }
}

impl Serialize for ClaimKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A polynomial reference found in a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRef<'a> {
    pub kind: Provenance,
    pub leaf: &'a Leaf,
}

impl ClaimRef<'_> {
    pub fn key(&self) -> ClaimKey {
        ClaimKey::new(&self.leaf.name, &self.leaf.args)
    }
}

/// Unique polynomial references of `expr`, in order of first appearance.
pub fn collect_claims(expr: &Expr) -> Vec<ClaimRef<'_>> {
    let mut out: Vec<ClaimRef<'_>> = Vec::new();
    expr.visit_leaves(&mut |kind, leaf| {
        let claim = ClaimRef { kind, leaf };
        if !out.contains(&claim) {
            out.push(claim);
        }
    });
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Origin {
    pub stage: u32,
    pub spec: String,
}

impl Origin {
    fn new(stage: u32, spec: &str) -> Self {
        Self {
            stage,
            spec: spec.to_string(),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{} {}", self.stage, self.spec)
    }
}

/// A derived claim waiting for a consumer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outstanding {
    pub key: ClaimKey,
    pub kind: Provenance,
    pub args: Vec<Arg>,
    pub origin: Origin,
}

/// One consumption: `consumer` discharged the claim `producer` left.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub key: ClaimKey,
    pub kind: Provenance,
    pub producer: Origin,
    pub consumer: Origin,
    /// The family reference that matched, when resolved by wildcard.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via_family: Option<PolyName>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Production {
    pub key: ClaimKey,
    pub kind: Provenance,
    /// False when no leaf of that name occurs in the specification's own
    /// trees and the kind fell back to derived.
    pub kind_inferred: bool,
    pub origin: Origin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantifier: Option<String>,
}

/// Everything one specification did to the ledger.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub stage: u32,
    pub spec: String,
    pub resolved: Vec<Resolution>,
    /// References to committed polynomials, checked by the commitment scheme.
    pub committed_refs: Vec<ClaimKey>,
    /// References with no earlier producer: public inputs.
    pub unmatched: Vec<ClaimKey>,
    pub produced: Vec<Production>,
}

impl StepReport {
    pub fn consumed_count(&self) -> usize {
        self.resolved.len() + self.committed_refs.len() + self.unmatched.len()
    }

    pub fn kind_mismatches(&self) -> usize {
        self.produced.iter().filter(|p| !p.kind_inferred).count()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionReport {
    pub report_id: String,
    pub steps: Vec<StepReport>,
    pub log: Vec<Resolution>,
    /// Derived claims nobody consumed, sorted by key.
    pub unresolved: Vec<Outstanding>,
    /// Committed productions; informational.
    pub committed: Vec<Production>,
}

impl ResolutionReport {
    pub fn is_sound(&self) -> bool {
        self.unresolved.is_empty()
    }

    pub fn kind_mismatches(&self) -> usize {
        self.steps.iter().map(StepReport::kind_mismatches).sum()
    }
}

/// Stateful produce/consume ledger.
#[derive(Debug, Default)]
pub struct ClaimTracker {
    outstanding: BTreeMap<ClaimKey, Outstanding>,
    log: Vec<Resolution>,
    committed: Vec<Production>,
    steps: Vec<StepReport>,
}

impl ClaimTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outstanding(&self) -> impl Iterator<Item = &Outstanding> {
        self.outstanding.values()
    }

    pub fn log(&self) -> &[Resolution] {
        &self.log
    }

    pub fn process_stage(&mut self, stage: &Stage) {
        for spec in &stage.specs {
            self.process_spec(stage.index, spec);
        }
    }

    /// Consumes every reference of `spec`, then records its productions.
    pub fn process_spec(&mut self, stage: u32, spec: &StageSpec) -> &StepReport {
        let consumer = Origin::new(stage, spec.name());
        let mut step = StepReport {
            stage,
            spec: consumer.spec.clone(),
            resolved: Vec::new(),
            committed_refs: Vec::new(),
            unmatched: Vec::new(),
            produced: Vec::new(),
        };

        let mut refs: Vec<ClaimRef<'_>> = Vec::new();
        for tree in spec.consumed_trees() {
            for claim in collect_claims(tree) {
                if !refs.contains(&claim) {
                    refs.push(claim);
                }
            }
        }
        for claim in &refs {
            self.consume(claim, &consumer, &mut step);
        }

        for claim in spec.produces() {
            let production = self.produce(claim, spec, &consumer);
            step.produced.push(production);
        }

        self.steps.push(step);
        &self.steps[self.steps.len() - 1]
    }

    fn consume(&mut self, claim: &ClaimRef<'_>, consumer: &Origin, step: &mut StepReport) {
        let key = claim.key();
        match claim.kind {
            Provenance::Computable => return,
            Provenance::Committed => {
                debug!(key = %key, consumer = %consumer, "committed reference");
                step.committed_refs.push(key);
                return;
            }
            Provenance::Derived => {}
        }

        if let Some(entry) = self.outstanding.remove(&key) {
            self.record(entry, consumer, None, step);
            return;
        }

        if claim.leaf.name.is_family() {
            let members: Vec<ClaimKey> = self
                .outstanding
                .keys()
                .filter(|k| k.point == key.point && claim.leaf.name.covers(&k.name))
                .cloned()
                .collect();
            if !members.is_empty() {
                for member in members {
                    if let Some(entry) = self.outstanding.remove(&member) {
                        self.record(entry, consumer, Some(claim.leaf.name.clone()), step);
                    }
                }
                return;
            }
        }

        debug!(key = %key, consumer = %consumer, "unmatched reference");
        step.unmatched.push(key);
    }

    fn record(
        &mut self,
        entry: Outstanding,
        consumer: &Origin,
        via_family: Option<PolyName>,
        step: &mut StepReport,
    ) {
        debug!(
            key = %entry.key,
            producer = %entry.origin,
            consumer = %consumer,
            wildcard = via_family.is_some(),
            "claim resolved"
        );
        let resolution = Resolution {
            key: entry.key,
            kind: entry.kind,
            producer: entry.origin,
            consumer: consumer.clone(),
            via_family,
        };
        step.resolved.push(resolution.clone());
        self.log.push(resolution);
    }

    fn produce(&mut self, claim: &ProducedClaim, spec: &StageSpec, origin: &Origin) -> Production {
        let key = ClaimKey::new(&claim.name, &claim.point);
        let (kind, kind_inferred) = match infer_kind(spec, &claim.name) {
            Some(kind) => (kind, true),
            None => (Provenance::Derived, false),
        };
        let production = Production {
            key: key.clone(),
            kind,
            kind_inferred,
            origin: origin.clone(),
            quantifier: claim.quantifier.clone(),
        };

        match kind {
            Provenance::Committed => {
                debug!(key = %key, producer = %origin, "committed claim produced");
                // A committed re-production supersedes any stale derived entry.
                self.outstanding.remove(&key);
                self.committed.push(production.clone());
            }
            Provenance::Derived | Provenance::Computable => {
                if !kind_inferred {
                    warn!(key = %key, producer = %origin, "claim kind defaulted to derived");
                }
                self.outstanding.insert(
                    key.clone(),
                    Outstanding {
                        key,
                        kind,
                        args: claim.point.clone(),
                        origin: origin.clone(),
                    },
                );
            }
        }
        production
    }

    /// Closes the run. Remaining derived entries become the unresolved set.
    pub fn finish(self) -> ResolutionReport {
        let unresolved: Vec<Outstanding> = self
            .outstanding
            .into_values()
            .filter(|o| o.kind == Provenance::Derived)
            .collect();

        let payload = json!({
            "log": self
                .log
                .iter()
                .map(|r| json!([
                    r.key.to_string(),
                    r.producer.stage,
                    r.producer.spec,
                    r.consumer.stage,
                    r.consumer.spec,
                ]))
                .collect::<Vec<_>>(),
            "unresolved": unresolved
                .iter()
                .map(|o| json!([o.key.to_string(), o.origin.stage, o.origin.spec]))
                .collect::<Vec<_>>(),
        });
        let report_id = compute_report_id(&payload);

        info!(
            resolved = self.log.len(),
            unresolved = unresolved.len(),
            committed = self.committed.len(),
            report_id = %report_id,
            "claim resolution finished"
        );

        ResolutionReport {
            report_id,
            steps: self.steps,
            log: self.log,
            unresolved,
            committed: self.committed,
        }
    }
}

/// Provenance of a produced claim, found among the specification's own
/// leaves: exact name first, then any leaf of the same base.
fn infer_kind(spec: &StageSpec, name: &PolyName) -> Option<Provenance> {
    let mut leaves: Vec<(Provenance, &PolyName)> = Vec::new();
    for tree in spec.internal_trees() {
        tree.visit_leaves(&mut |kind, leaf| {
            if kind != Provenance::Computable {
                leaves.push((kind, &leaf.name));
            }
        });
    }
    leaves
        .iter()
        .find(|(_, leaf_name)| *leaf_name == name)
        .or_else(|| leaves.iter().find(|(_, leaf_name)| leaf_name.base == name.base))
        .map(|(kind, _)| *kind)
}

/// Replays `stages` in ascending index order.
pub fn resolve_stages(stages: &[Stage]) -> ResolutionReport {
    let mut ordered: Vec<&Stage> = stages.iter().collect();
    ordered.sort_by_key(|stage| stage.index);

    let mut tracker = ClaimTracker::new();
    for stage in ordered {
        tracker.process_stage(stage);
    }
    tracker.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::{Dim, FixedPoint, FreeVar};
    use crate::args;
    use crate::degree::DeclaredDegree;
    use crate::expr::*;
    use crate::spec::SumcheckSpec;

    fn cycle() -> Dim {
        Dim::new("T", "cycle", "cycle/timestep")
    }

    fn x_t() -> FreeVar {
        FreeVar::new("X_t", cycle())
    }

    fn point(stage: u32) -> FixedPoint {
        FixedPoint::new(stage, cycle())
    }

    fn spec(name: &str, integrand: Expr, input_claim: Expr, produces: Vec<ProducedClaim>) -> StageSpec {
        StageSpec::Sumcheck(SumcheckSpec {
            name: name.to_string(),
            sum_vars: vec![x_t()],
            integrand,
            input_claim,
            opening_point: Vec::new(),
            rounds: "log2(T)".to_string(),
            degree: DeclaredDegree::Exact(1),
            produces,
        })
    }

    #[test]
    fn claim_key_ignores_free_variables() {
        let key = ClaimKey::new(&PolyName::new("RamRa"), &args![x_t(), point(2)]);
        assert_eq!(key.to_string(), "RamRa@(r_cycle^(2))");
        let bare = ClaimKey::new(&PolyName::new("L"), &[]);
        assert_eq!(bare.to_string(), "L@()");
    }

    #[test]
    fn collect_claims_is_unique_and_ordered() {
        let a = derived("A", args![x_t()]);
        let tree = mul([a.clone(), add([a.clone(), committed("B", args![x_t()])]), a]);
        let names: Vec<String> = collect_claims(&tree)
            .iter()
            .map(|c| c.leaf.name.to_string())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn produced_kind_prefers_exact_then_base() {
        let family = derived(PolyName::family("InstructionRa", "i"), args![x_t()]);
        let inc = committed("RdInc", args![x_t()]);
        let s = spec("S", mul([family, inc]), int(0), Vec::new());
        assert_eq!(infer_kind(&s, &PolyName::new("RdInc")), Some(Provenance::Committed));
        assert_eq!(
            infer_kind(&s, &PolyName::member("InstructionRa", "3")),
            Some(Provenance::Derived)
        );
        assert_eq!(infer_kind(&s, &PolyName::new("Missing")), None);
    }

    #[test]
    fn own_output_is_not_consumed_in_same_step() {
        let a_at_1 = derived("A", args![point(1)]);
        let s = spec(
            "SelfLoop",
            derived("A", args![x_t()]),
            a_at_1,
            vec![ProducedClaim::new("A", args![point(1)])],
        );
        let mut tracker = ClaimTracker::new();
        let step = tracker.process_spec(1, &s);
        assert_eq!(step.unmatched.len(), 1);
        assert!(step.resolved.is_empty());
        assert_eq!(tracker.outstanding().count(), 1);
    }

    #[test]
    fn computable_references_are_skipped() {
        let s = spec("S", int(0), eq(&point(1), &x_t()), Vec::new());
        let mut tracker = ClaimTracker::new();
        let step = tracker.process_spec(1, &s);
        assert_eq!(step.consumed_count(), 0);
    }

    #[test]
    fn stages_are_replayed_in_index_order() {
        let producer = Stage::new(
            1,
            "first",
            vec![spec(
                "P",
                derived("X", args![x_t()]),
                int(0),
                vec![ProducedClaim::new("X", args![point(1)])],
            )],
        );
        let consumer = Stage::new(
            2,
            "second",
            vec![spec("C", int(0), derived("X", args![point(1)]), Vec::new())],
        );
        let report = resolve_stages(&[consumer, producer]);
        assert!(report.is_sound());
        assert_eq!(report.log.len(), 1);
        assert_eq!(report.log[0].consumer.spec, "C");
    }

    #[test]
    fn report_serializes_camel_case() {
        let report = ClaimTracker::new().finish();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["reportId"].as_str().unwrap().starts_with("r1_"));
        assert_eq!(json["unresolved"], serde_json::json!([]));
    }
}
