use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use table_reconcile::output::render_tsv;
use table_reconcile::pipeline::{run, run_to_files, OutputPaths, PipelineOptions};
use table_reconcile::ReconcileError;

const SOURCES: [&str; 4] = [
    "tests/fixtures/xml_data.xml",
    "tests/fixtures/json_data.json",
    "tests/fixtures/csv_data_1.csv",
    "tests/fixtures/csv_data_2.csv",
];

const EXPECTED_BASIC: &str = "\
D1\tD2\tD3\tM1\tM2\tM3
a\tx\t\t1\t0\t10
a\tx\t\t4\t100\t0
a\tx\t\t1\t1\t1
a\t\tq\t0\t5\t0
b\ty\t\t2\t0\t20
b\ty\t\t6\t7\t8
c\tx\t\t3\t0\t30
c\tz\t\t5\t200\t0
d\t\tr\t0\t6\t0
";

const EXPECTED_ADVANCED: &str = "\
D1\tD2\tD3\tM1\tM2\tM3
a\t\tq\t0\t5\t0
a\tx\t\t6\t101\t11
b\ty\t\t8\t7\t28
c\tx\t\t3\t0\t30
c\tz\t\t5\t200\t0
d\t\tr\t0\t6\t0
";

fn tmp_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("table-reconcile-e2e-{tag}-{nanos}.tsv"))
}

#[test]
fn run_reconciles_all_four_sources() {
    let out = run(&SOURCES, &PipelineOptions::default()).unwrap();

    assert_eq!(out.loaded, 4);
    assert!(out.skipped.is_empty());
    assert_eq!(
        out.reconciled.schema.names().collect::<Vec<_>>(),
        vec!["D1", "D2", "D3", "M1", "M2", "M3"]
    );

    let basic = &out.reconciled.basic;
    assert_eq!(render_tsv(&basic.header, &basic.rows).unwrap(), EXPECTED_BASIC);
    let advanced = &out.reconciled.advanced;
    assert_eq!(
        render_tsv(&advanced.header, &advanced.rows).unwrap(),
        EXPECTED_ADVANCED
    );
}

#[test]
fn run_to_files_writes_both_outputs() {
    let outputs = OutputPaths {
        basic: tmp_path("basic"),
        advanced: tmp_path("advanced"),
    };

    run_to_files(&SOURCES, &PipelineOptions::default(), &outputs).unwrap();

    assert_eq!(fs::read_to_string(&outputs.basic).unwrap(), EXPECTED_BASIC);
    assert_eq!(fs::read_to_string(&outputs.advanced).unwrap(), EXPECTED_ADVANCED);
    let _ = fs::remove_file(&outputs.basic);
    let _ = fs::remove_file(&outputs.advanced);
}

#[test]
fn run_continues_with_fewer_datasets() {
    let out = run(
        &[
            "tests/fixtures/csv_data_2.csv",
            "tests/fixtures/notes.txt",
            "tests/fixtures/missing.xml",
        ],
        &PipelineOptions::default(),
    )
    .unwrap();

    assert_eq!(out.loaded, 1);
    assert_eq!(out.skipped.len(), 2);
    assert!(out.skipped[0].to_string().contains("notes.txt"));
    assert_eq!(out.reconciled.basic.row_count(), 2);
}

#[test]
fn run_orders_basic_output_by_measure() {
    let opts = PipelineOptions {
        order_by: "M2".to_string(),
        ..Default::default()
    };
    let out = run(&SOURCES, &opts).unwrap();

    let idx = out.reconciled.basic.index_of("M2").unwrap();
    let m2: Vec<i64> = out
        .reconciled
        .basic
        .rows
        .iter()
        .map(|r| r[idx].as_int().unwrap())
        .collect();
    assert!(m2.windows(2).all(|w| w[0] <= w[1]), "{m2:?}");
    // Ordering does not affect grouping.
    let advanced = &out.reconciled.advanced;
    assert_eq!(
        render_tsv(&advanced.header, &advanced.rows).unwrap(),
        EXPECTED_ADVANCED
    );
}

#[test]
fn run_fails_when_nothing_loads() {
    let err = run(&["tests/fixtures/notes.txt"], &PipelineOptions::default()).unwrap_err();
    assert!(matches!(err, ReconcileError::NoSources));
}

#[test]
fn failing_run_writes_no_output() {
    let outputs = OutputPaths {
        basic: tmp_path("basic-fail"),
        advanced: tmp_path("advanced-fail"),
    };
    let opts = PipelineOptions {
        order_by: "D9".to_string(),
        ..Default::default()
    };

    let err = run_to_files(&SOURCES, &opts, &outputs).unwrap_err();
    assert!(matches!(err, ReconcileError::UnknownOrderColumn { .. }));
    assert!(!outputs.basic.exists());
    assert!(!outputs.advanced.exists());
}
