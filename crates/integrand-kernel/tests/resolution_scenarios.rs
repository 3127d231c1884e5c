//! Integration tests: claim resolution over small hand-built catalogs.
//!
//! Each scenario builds a few stages with the public constructors, runs the
//! tracker, and checks the resolution log, the unresolved set, and the
//! committed listing.

use integrand_kernel::expr::{committed, derived, eq, int, mul};
use integrand_kernel::{
    DeclaredDegree, Dim, Expr, FixedPoint, FreeVar, PolyName, ProducedClaim, Provenance, Stage,
    StageSpec, SumcheckSpec, args, resolve_stages,
};

fn cycle() -> Dim {
    Dim::new("T", "cycle", "cycle/timestep")
}

fn x_t() -> FreeVar {
    FreeVar::new("X_t", cycle())
}

fn at(stage: u32) -> FixedPoint {
    FixedPoint::new(stage, cycle())
}

fn sumcheck(name: &str, integrand: Expr, input_claim: Expr, produces: Vec<ProducedClaim>) -> StageSpec {
    StageSpec::Sumcheck(SumcheckSpec {
        name: name.to_string(),
        sum_vars: vec![x_t()],
        integrand,
        input_claim,
        opening_point: Vec::new(),
        rounds: "log2(T)".to_string(),
        degree: DeclaredDegree::Exact(2),
        produces,
    })
}

#[test]
fn simple_resolution() {
    let stage1 = Stage::new(
        1,
        "produce",
        vec![sumcheck(
            "ProduceX",
            mul([eq(&at(0), &x_t()), derived("X", args![x_t()])]),
            int(0),
            vec![ProducedClaim::new("X", args![at(1)])],
        )],
    );
    let stage2 = Stage::new(
        2,
        "consume",
        vec![sumcheck("ConsumeX", int(0), derived("X", args![at(1)]), Vec::new())],
    );

    let report = resolve_stages(&[stage1, stage2]);

    assert_eq!(report.log.len(), 1);
    let entry = &report.log[0];
    assert_eq!(entry.key.to_string(), "X@(r_cycle^(1))");
    assert_eq!((entry.producer.stage, entry.producer.spec.as_str()), (1, "ProduceX"));
    assert_eq!((entry.consumer.stage, entry.consumer.spec.as_str()), (2, "ConsumeX"));
    assert!(entry.via_family.is_none());
    assert!(report.unresolved.is_empty());
    assert!(report.is_sound());
}

#[test]
fn dangling_claim() {
    let stage1 = Stage::new(
        1,
        "produce",
        vec![sumcheck(
            "ProduceY",
            derived("Y", args![x_t()]),
            int(0),
            vec![ProducedClaim::new("Y", args![at(1)])],
        )],
    );
    let stage2 = Stage::new(
        2,
        "unrelated",
        vec![sumcheck("Other", int(0), derived("Z", args![at(1)]), Vec::new())],
    );

    let report = resolve_stages(&[stage1, stage2]);

    assert!(report.log.is_empty());
    assert_eq!(report.unresolved.len(), 1);
    let dangling = &report.unresolved[0];
    assert_eq!(dangling.key.to_string(), "Y@(r_cycle^(1))");
    assert_eq!(dangling.kind, Provenance::Derived);
    assert_eq!(dangling.origin.stage, 1);
    assert_eq!(dangling.origin.spec, "ProduceY");
    assert_eq!(report.steps[1].unmatched.len(), 1);
}

#[test]
fn family_wildcard() {
    let family = PolyName::family("F", "i");
    let stage_a = Stage::new(
        3,
        "members",
        vec![sumcheck(
            "ProduceF",
            derived(family.clone(), args![x_t()]),
            int(0),
            ["0", "1", "2"]
                .into_iter()
                .map(|i| ProducedClaim::new(PolyName::member("F", i), args![at(3)]))
                .collect(),
        )],
    );
    let stage_b = Stage::new(
        4,
        "family",
        vec![sumcheck("ConsumeF", int(0), derived(family.clone(), args![at(3)]), Vec::new())],
    );

    let report = resolve_stages(&[stage_a, stage_b]);

    let keys: Vec<String> = report.log.iter().map(|r| r.key.to_string()).collect();
    assert_eq!(
        keys,
        vec!["F(0)@(r_cycle^(3))", "F(1)@(r_cycle^(3))", "F(2)@(r_cycle^(3))"]
    );
    assert!(report.log.iter().all(|r| r.consumer.spec == "ConsumeF"));
    assert!(report.log.iter().all(|r| r.via_family.as_ref() == Some(&family)));
    assert_eq!(report.steps[1].resolved.len(), 3);
    assert!(report.unresolved.is_empty());
}

#[test]
fn family_wildcard_respects_point() {
    let stage_a = Stage::new(
        1,
        "members",
        vec![sumcheck(
            "ProduceFlags",
            derived(PolyName::family("OpFlags", "cf_i"), args![x_t()]),
            int(0),
            vec![
                ProducedClaim::new(PolyName::member("OpFlags", "Load"), args![at(1)]),
                ProducedClaim::new(PolyName::member("OpFlags", "Jump"), args![at(2)]),
            ],
        )],
    );
    let stage_b = Stage::new(
        2,
        "family",
        vec![sumcheck(
            "ConsumeFlags",
            int(0),
            derived(PolyName::family("OpFlags", "cf_i"), args![at(1)]),
            Vec::new(),
        )],
    );

    let report = resolve_stages(&[stage_a, stage_b]);

    assert_eq!(report.log.len(), 1);
    assert_eq!(report.log[0].key.to_string(), "OpFlags(Load)@(r_cycle^(1))");
    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(
        report.unresolved[0].key.to_string(),
        "OpFlags(Jump)@(r_cycle^(2))"
    );
}

#[test]
fn committed_claim_never_blocks() {
    let stage1 = Stage::new(
        1,
        "commit",
        vec![sumcheck(
            "ProduceInc",
            mul([eq(&at(0), &x_t()), committed("RdInc", args![x_t()])]),
            int(0),
            vec![ProducedClaim::new("RdInc", args![at(1)])],
        )],
    );
    let stage2 = Stage::new(
        2,
        "reference",
        vec![sumcheck("UseInc", int(0), committed("RdInc", args![at(1)]), Vec::new())],
    );

    let report = resolve_stages(&[stage1, stage2]);

    assert!(report.unresolved.is_empty());
    assert!(report.log.is_empty());
    assert_eq!(report.committed.len(), 1);
    assert_eq!(report.committed[0].key.to_string(), "RdInc@(r_cycle^(1))");
    assert_eq!(report.committed[0].kind, Provenance::Committed);
    assert_eq!(report.steps[1].committed_refs.len(), 1);
    assert!(report.steps[1].unmatched.is_empty());
}

fn producer(stage: u32, name: &str, integrand: Expr) -> Stage {
    Stage::new(
        stage,
        name,
        vec![sumcheck(
            name,
            integrand,
            int(0),
            vec![ProducedClaim::new("X", args![at(1)])],
        )],
    )
}

#[test]
fn derived_reproduction_replaces_origin() {
    let report = resolve_stages(&[
        producer(1, "P1", derived("X", args![x_t()])),
        producer(2, "P2", derived("X", args![x_t()])),
    ]);

    assert!(report.log.is_empty());
    assert_eq!(report.unresolved.len(), 1);
    let stale = &report.unresolved[0];
    assert_eq!(stale.key.to_string(), "X@(r_cycle^(1))");
    assert_eq!((stale.origin.stage, stale.origin.spec.as_str()), (2, "P2"));
}

#[test]
fn committed_reproduction_evicts_derived_entry() {
    let report = resolve_stages(&[
        producer(1, "P1", derived("X", args![x_t()])),
        producer(2, "P2", committed("X", args![x_t()])),
    ]);

    assert!(report.unresolved.is_empty());
    assert!(report.is_sound());
    assert_eq!(report.committed.len(), 1);
    assert_eq!(report.committed[0].origin.spec, "P2");
}

#[test]
fn empty_target() {
    let stage = Stage::new(
        1,
        "empty",
        vec![sumcheck("Nothing", int(0), int(0), Vec::new())],
    );

    let report = resolve_stages(&[stage]);

    assert_eq!(report.steps.len(), 1);
    assert_eq!(report.steps[0].consumed_count(), 0);
    assert_eq!(report.kind_mismatches(), 0);
    assert!(report.is_sound());
}

#[test]
fn defaulted_kind_is_flagged() {
    let stage = Stage::new(
        1,
        "orphan",
        vec![sumcheck(
            "Orphan",
            int(0),
            int(0),
            vec![ProducedClaim::new("Ghost", args![at(1)])],
        )],
    );

    let report = resolve_stages(&[stage]);

    assert_eq!(report.kind_mismatches(), 1);
    assert_eq!(report.unresolved.len(), 1);
    assert!(!report.steps[0].produced[0].kind_inferred);
}

#[test]
fn report_id_is_stable_and_sensitive() {
    let build = |consumer_name: &str| {
        vec![
            Stage::new(
                1,
                "p",
                vec![sumcheck(
                    "P",
                    derived("X", args![x_t()]),
                    int(0),
                    vec![ProducedClaim::new("X", args![at(1)])],
                )],
            ),
            Stage::new(
                2,
                "c",
                vec![sumcheck(consumer_name, int(0), derived("X", args![at(1)]), Vec::new())],
            ),
        ]
    };

    let first = resolve_stages(&build("C"));
    let second = resolve_stages(&build("C"));
    let renamed = resolve_stages(&build("D"));

    assert_eq!(first.report_id, second.report_id);
    assert_ne!(first.report_id, renamed.report_id);
}
