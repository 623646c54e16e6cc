use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use zkp_k_coloring::config::{AcceptancePolicy, ProtocolConfig};
use zkp_k_coloring::crypto::{CommitmentScheme, HashAlgorithm};
use zkp_k_coloring::graph::{Coloring, Graph};
use zkp_k_coloring::protocol::messages::Envelope;
use zkp_k_coloring::protocol::orchestrator::Orchestrator;
use zkp_k_coloring::protocol::prover::Prover;
use zkp_k_coloring::protocol::verifier::{Rejection, RoundVerdict, Verifier};
use zkp_k_coloring::utils::random_graph::{generate_colorable_instance, EXAMPLE_INSTANCE};
use zkp_k_coloring::utils::serialization::{load_graph_instance, parse_instance};
use zkp_k_coloring::ProtocolError;

fn example_parties(colors: &[u32], seed: u64) -> (Prover, Verifier) {
    let instance = parse_instance(EXAMPLE_INSTANCE).unwrap();
    let coloring = Coloring::from_sequence(colors).unwrap();
    let scheme = CommitmentScheme::default();
    let prover = Prover::with_seed(instance.graph.clone(), coloring, scheme, seed).unwrap();
    let verifier = Verifier::with_seed(instance.graph, scheme, seed ^ 0x5eed);
    (prover, verifier)
}

#[test]
fn example_graph_is_accepted_over_twenty_rounds() {
    for seed in 0..25 {
        let (mut prover, mut verifier) = example_parties(&[1, 2, 3, 2], seed);
        let report = Orchestrator::new(ProtocolConfig::default())
            .run(&mut prover, &mut verifier)
            .unwrap();
        assert!(report.accepted, "seed {seed} rejected: {:?}", report.first_failure());
        assert_eq!(report.passed, 20);
        assert_eq!(verifier.stats().accepted, 20);
    }
}

#[test]
fn every_hash_algorithm_completes() {
    let instance = parse_instance(EXAMPLE_INSTANCE).unwrap();
    let coloring = instance.require_coloring().unwrap().clone();
    for hash in [HashAlgorithm::Blake3, HashAlgorithm::Sha3, HashAlgorithm::Sha256] {
        let config = ProtocolConfig {
            hash,
            ..ProtocolConfig::default()
        };
        let mut prover = Prover::new(instance.graph.clone(), coloring.clone(), config.scheme()).unwrap();
        let mut verifier = Verifier::new(instance.graph.clone(), config.scheme());
        let report = Orchestrator::new(config).run(&mut prover, &mut verifier).unwrap();
        assert!(report.accepted, "{hash:?} rejected an honest prover");
    }
}

#[test]
fn mismatched_hash_algorithms_never_verify() {
    let instance = parse_instance(EXAMPLE_INSTANCE).unwrap();
    let coloring = instance.require_coloring().unwrap().clone();
    let mut prover = Prover::with_seed(
        instance.graph.clone(),
        coloring,
        CommitmentScheme::new(HashAlgorithm::Sha3),
        7,
    )
    .unwrap();
    let mut verifier =
        Verifier::with_seed(instance.graph, CommitmentScheme::new(HashAlgorithm::Blake3), 8);
    let report = Orchestrator::new(ProtocolConfig::default())
        .run(&mut prover, &mut verifier)
        .unwrap();
    assert!(!report.accepted);
    assert!(matches!(
        report.rounds[0].verdict,
        RoundVerdict::Rejected(Rejection::CommitmentMismatch { .. })
    ));
}

#[test]
fn tampered_nonce_fails_the_round() {
    let (mut prover, mut verifier) = example_parties(&[1, 2, 3, 2], 3);
    for round in 0..20 {
        verifier.receive(prover.prove().unwrap());
        let challenge = verifier.challenge().unwrap();
        let mut response = prover.respond(&challenge).unwrap();
        let byte = round % 16;
        response.nonce_u.0[byte] = response.nonce_u.0[byte].wrapping_add(1);
        let verdict = verifier.verify(&challenge, &response).unwrap();
        assert_eq!(
            verdict,
            RoundVerdict::Rejected(Rejection::CommitmentMismatch { vertex: challenge.u })
        );
    }
    assert_eq!(verifier.stats().accepted, 0);
    assert_eq!(verifier.stats().attempted, 20);
}

#[test]
fn messages_survive_both_wire_encodings() {
    let (mut prover, mut verifier) = example_parties(&[1, 2, 3, 2], 11);
    for round in 0..20 {
        let commit = Envelope::from(prover.prove().unwrap());
        let commit = if round % 2 == 0 {
            Envelope::from_json(&commit.to_json().unwrap()).unwrap()
        } else {
            Envelope::from_bytes(&commit.to_bytes().unwrap()).unwrap()
        };
        let Envelope::Commit(commit) = commit else {
            panic!("expected a commit message");
        };
        verifier.receive(commit);

        let challenge = Envelope::from(verifier.challenge().unwrap());
        let Envelope::Challenge(challenge) =
            Envelope::from_json(&challenge.to_json().unwrap()).unwrap()
        else {
            panic!("expected a challenge message");
        };

        let response = Envelope::from(prover.respond(&challenge).unwrap());
        let Envelope::Response(response) =
            Envelope::from_bytes(&response.to_bytes().unwrap()).unwrap()
        else {
            panic!("expected a response message");
        };

        assert!(verifier.verify(&challenge, &response).unwrap().is_accepted());
    }
}

#[test]
fn improper_coloring_is_caught_by_strict_policy() {
    let config = ProtocolConfig {
        rounds: 100,
        policy: AcceptancePolicy::Strict,
        ..ProtocolConfig::default()
    };
    let (mut prover, mut verifier) = example_parties(&[1, 1, 3, 2], 5);
    let report = Orchestrator::new(config).run(&mut prover, &mut verifier).unwrap();
    assert!(!report.accepted);
    let failure = report.first_failure().unwrap();
    assert_eq!(failure.challenge.edge().endpoints(), (1, 2));
    assert_eq!(
        failure.verdict,
        RoundVerdict::Rejected(Rejection::ColorsNotDistinct)
    );
}

#[test]
fn loads_instance_from_disk() {
    let path = std::env::temp_dir().join(format!("zkp-k-coloring-{}.txt", std::process::id()));
    fs::write(&path, EXAMPLE_INSTANCE).unwrap();
    let instance = load_graph_instance(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(instance.graph.vertex_count(), 4);
    assert!(instance.require_coloring().unwrap().is_proper(&instance.graph));
}

#[test]
fn missing_file_surfaces_io_error() {
    let path = std::env::temp_dir().join("zkp-k-coloring-does-not-exist.txt");
    assert!(matches!(load_graph_instance(&path), Err(ProtocolError::Io(_))));
}

#[test]
fn generated_instances_are_accepted() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..5 {
        let (instance, params) = generate_colorable_instance(24, 4, 0.5, &mut rng).unwrap();
        if params.edges == 0 {
            continue;
        }
        let coloring = instance.require_coloring().unwrap().clone();
        let scheme = CommitmentScheme::default();
        let mut prover = Prover::new(instance.graph.clone(), coloring, scheme).unwrap();
        let mut verifier = Verifier::new(instance.graph, scheme);
        let report = Orchestrator::new(ProtocolConfig::default())
            .run(&mut prover, &mut verifier)
            .unwrap();
        assert!(report.accepted);
    }
}

#[test]
fn edgeless_graph_aborts_with_empty_graph() {
    let graph = Graph::new(3);
    let coloring = Coloring::from_sequence(&[1, 1, 1]).unwrap();
    let scheme = CommitmentScheme::default();
    let mut prover = Prover::with_seed(graph.clone(), coloring, scheme, 1).unwrap();
    let mut verifier = Verifier::with_seed(graph, scheme, 2);
    let err = Orchestrator::new(ProtocolConfig::default())
        .run(&mut prover, &mut verifier)
        .unwrap_err();
    assert!(matches!(err, ProtocolError::EmptyGraph));
}
