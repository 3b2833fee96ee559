//! Integration tests for the estimation engine
//! Runs whole requirements and small sweeps with known seeds

use crate::config::{Denominator, DrawConvention, EngineConfig, Strategy};
use crate::requirement::Requirement;
use crate::simulation::{estimate, TrialSettings};
use crate::sweep::run_sweep;
use crate::table::{ResultTable, TableKey, TableMetadata, UNSET};

fn settings(trials: u32) -> TrialSettings {
    TrialSettings {
        trials,
        mulligan_floor: 2,
        draw_convention: DrawConvention::OnThePlay,
    }
}

fn small_config(strategy: Strategy) -> EngineConfig {
    EngineConfig {
        max_turn: 2,
        trials: 200,
        strategy,
        threads: 3,
        seed: Some(12345),
        ..EngineConfig::default()
    }
}

#[test]
fn test_mono_color_deck_always_castable() {
    let req = Requirement::new(40, 17, 1, [1, 0], [17, 0, 0], 54321).expect("valid");
    let est = estimate(&req, &settings(100_000));
    let p = est.probability(Denominator::Conditional).expect("defined");
    assert!((p - 1.0).abs() <= 0.01, "expected ~1.0, got {}", p);
}

#[test]
fn test_colorless_cost_always_castable() {
    for split in [[0, 0, 0], [8, 0, 0], [3, 7, 2]] {
        let req = Requirement::new(40, 17, 4, [0, 0], split, 99).expect("valid");
        let est = estimate(&req, &settings(10_000));
        assert!(est.applicable > 0);
        assert_eq!(est.probability(Denominator::Conditional), Some(1.0));
    }
}

#[test]
fn test_more_colored_sources_never_hurt() {
    let mut previous = 0.0;
    for land_a in [2, 6, 10] {
        let req = Requirement::new(40, 17, 3, [2, 1], [land_a, 5, 0], 777).expect("valid");
        let p = estimate(&req, &settings(30_000))
            .probability(Denominator::Conditional)
            .expect("defined");
        assert!(
            p + 0.01 >= previous,
            "{} A-lands gave {}, fewer gave {}",
            land_a,
            p,
            previous
        );
        previous = p;
    }
}

#[test]
fn test_unreachable_turn_does_not_crash() {
    let req = Requirement::new(40, 17, 41, [1, 0], [10, 0, 0], 1).expect("valid");
    let est = estimate(&req, &settings(1_000));
    assert_eq!(est.applicable, 0);
    assert_eq!(est.trials, 1_000);
    assert_eq!(est.probability(Denominator::Conditional), None);
}

#[test]
fn test_sweep_fills_every_requirement_cell() {
    let config = small_config(Strategy::Queue);
    let output = run_sweep(&config, false).expect("sweep");
    assert_eq!(output.requirements.len(), 1_190);
    assert_eq!(output.run_seed, 12345);
    for (req, est) in output.requirements.iter().zip(&output.estimates) {
        let est = est.expect("every requirement evaluated");
        assert!(est.successes <= est.applicable && est.applicable <= est.trials);
        let cell = output.table.get(&TableKey::from(req)).expect("in domain");
        assert_ne!(cell, UNSET, "cell for {} left unset", req);
    }
}

#[test]
fn test_strategies_agree_bit_for_bit() {
    let reference = run_sweep(&small_config(Strategy::Queue), false).expect("sweep");
    for strategy in [Strategy::Partitioned, Strategy::DataParallel] {
        let other = run_sweep(&small_config(strategy), false).expect("sweep");
        assert_eq!(other.estimates, reference.estimates, "{:?} differs", strategy);
        assert_eq!(other.table, reference.table);
    }
}

#[test]
fn test_sweep_files_reload() {
    let config = EngineConfig {
        max_turn: 1,
        ..small_config(Strategy::Partitioned)
    };
    let output = run_sweep(&config, false).expect("sweep");

    let dir = std::env::temp_dir().join(format!("mana-sources-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let stem = dir.join("table");
    output.write_files(&stem, &config).expect("write files");

    let meta_file = std::fs::File::open(stem.with_extension("json")).expect("metadata");
    let meta = TableMetadata::read_json(std::io::BufReader::new(meta_file)).expect("parse");
    assert_eq!(meta.requirements, 17);
    assert_eq!(meta.run_seed, 12345);

    let bin = std::fs::File::open(stem.with_extension("bin")).expect("binary");
    let table = ResultTable::read_binary(bin, meta.shape).expect("reload");
    assert_eq!(table, output.table);

    let csv = std::fs::read_to_string(stem.with_extension("csv")).expect("csv");
    assert_eq!(csv.lines().count(), 18);

    let _ = std::fs::remove_dir_all(&dir);
}
