use zkp_k_coloring::config::ProtocolConfig;
use zkp_k_coloring::crypto::CommitmentScheme;
use zkp_k_coloring::graph::Coloring;
use zkp_k_coloring::protocol::orchestrator::{soundness_bound, Orchestrator};
use zkp_k_coloring::protocol::prover::Prover;
use zkp_k_coloring::protocol::verifier::Verifier;
use zkp_k_coloring::utils::random_graph::EXAMPLE_INSTANCE;
use zkp_k_coloring::utils::serialization::parse_instance;

const IMPROPER: [u32; 4] = [1, 1, 3, 2];

fn cheating_parties(seed: u64) -> (Prover, Verifier) {
    let instance = parse_instance(EXAMPLE_INSTANCE).unwrap();
    let coloring = Coloring::from_sequence(&IMPROPER).unwrap();
    let scheme = CommitmentScheme::default();
    let prover = Prover::with_seed(instance.graph.clone(), coloring, scheme, seed).unwrap();
    let verifier = Verifier::with_seed(instance.graph, scheme, seed.wrapping_mul(31).wrapping_add(7));
    (prover, verifier)
}

#[test]
fn single_round_pass_rate_is_one_minus_inverse_edge_count() {
    let trials = 5_000u32;
    let (mut prover, mut verifier) = cheating_parties(1);
    let mut passed = 0u32;
    for round in 1..=trials {
        let report = Orchestrator::run_round(&mut prover, &mut verifier, round).unwrap();
        let on_bad_edge = report.challenge.edge().endpoints() == (1, 2);
        assert_eq!(report.verdict.is_accepted(), !on_bad_edge);
        if report.verdict.is_accepted() {
            passed += 1;
        }
    }
    let rate = passed as f64 / trials as f64;
    // expected 0.8 with a standard deviation below 0.006
    assert!((0.77..=0.83).contains(&rate), "single-round pass rate {rate}");
    assert_eq!(verifier.stats().attempted, trials as u64);
}

#[test]
fn twenty_round_acceptance_stays_near_the_bound() {
    let sessions = 2_000u64;
    let config = ProtocolConfig::default();
    let orchestrator = Orchestrator::new(config.clone());
    let accepted = (0..sessions)
        .filter(|&seed| {
            let (mut prover, mut verifier) = cheating_parties(seed);
            orchestrator.run(&mut prover, &mut verifier).unwrap().accepted
        })
        .count();

    let rate = accepted as f64 / sessions as f64;
    let bound = soundness_bound(5, config.rounds);
    assert!((bound - 0.0115).abs() < 0.001);
    // standard deviation of the estimate is about 0.0024
    assert!(rate <= bound + 0.012, "acceptance rate {rate} exceeds bound {bound}");
    assert!(rate >= 0.002, "acceptance rate {rate} is implausibly far below {bound}");
}
