use std::collections::HashSet;
use std::fs;
use std::path::Path;

use dataset_distribution::{
    ChartConfig, DistributionError, DistributionReporter, DistributionSummary, ManifestFormat,
    MalformedPolicy, ReporterConfig, Split,
};
use tempfile::tempdir;

fn write_manifests(dir: &Path, trainval: &str, test: &str) {
    fs::write(dir.join("trainval_data_list.txt"), trainval).unwrap();
    fs::write(dir.join("test_data_list.txt"), test).unwrap();
}

fn run(config: ReporterConfig) -> (dataset_distribution::Result<DistributionSummary>, String) {
    let mut out = Vec::new();
    let result = DistributionReporter::new(config).run_with_output(&mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn counts_both_splits_and_writes_png_charts() {
    let data = tempdir().unwrap();
    let charts = tempdir().unwrap();
    write_manifests(
        data.path(),
        "file_path,class_name\nimg1.png,cat\nimg2.png,dog\nimg3.png,cat\n",
        "img4.png,cat\nimg5.png,dog\n",
    );

    let config = ReporterConfig::new(data.path()).with_output_dir(charts.path());
    let (result, output) = run(config);
    let summary = result.unwrap();

    let train = summary.get(Split::TrainVal).unwrap();
    assert_eq!(train.distribution.get("cat"), 2);
    assert_eq!(train.distribution.get("dog"), 1);
    assert_eq!(train.distribution.total(), 3);

    let test = summary.get(Split::Test).unwrap();
    assert_eq!(test.distribution.total(), 2);

    let train_png = charts.path().join("train_distribution.png");
    let test_png = charts.path().join("test_distribution.png");
    assert!(train_png.is_file());
    assert!(test_png.is_file());
    assert_eq!(train.charts, vec![train_png.clone()]);

    let img = image::open(&train_png).unwrap();
    assert_eq!((img.width(), img.height()), (1000, 600));

    assert!(output.contains("--- [TrainVal set] Class Distribution ---"));
    assert!(output.contains("--- [Test set] Class Distribution ---"));
    assert!(output.contains("--- Analysis complete. ---"));
    assert_eq!(summary.comparison.as_ref().map(|c| c.is_consistent()), Some(true));
}

#[test]
fn png_chart_carries_text_beyond_chart_colours() {
    let data = tempdir().unwrap();
    let charts = tempdir().unwrap();
    write_manifests(data.path(), "img1.png,cat\nimg2.png,dog\nimg3.png,cat\n", "img4.png,cat\n");

    let config = ReporterConfig::new(data.path()).with_output_dir(charts.path());
    run(config).0.unwrap();

    let img = image::open(charts.path().join("train_distribution.png"))
        .unwrap()
        .to_rgb8();
    let colours: HashSet<[u8; 3]> = img.pixels().map(|p| p.0).collect();
    let chart_colours: HashSet<[u8; 3]> = [
        [255, 255, 255],
        [135, 206, 235],
        [236, 240, 241],
        [44, 62, 80],
    ]
    .into_iter()
    .collect();

    assert!(colours.difference(&chart_colours).count() > 0);
}

#[test]
fn charts_are_written_into_a_new_nested_directory() {
    let data = tempdir().unwrap();
    let root = tempdir().unwrap();
    write_manifests(data.path(), "a.png,cat\n", "b.png,cat\n");

    let out_dir = root.path().join("nested/out");
    assert!(!out_dir.exists());

    let config = ReporterConfig::new(data.path()).with_output_dir(&out_dir);
    let summary = run(config).0.unwrap();

    let train_png = out_dir.join("train_distribution.png");
    assert!(train_png.is_file());
    assert!(out_dir.join("test_distribution.png").is_file());
    assert_eq!(summary.get(Split::TrainVal).unwrap().charts, vec![train_png]);
}

#[test]
fn missing_manifest_fails_without_output() {
    let data = tempdir().unwrap();
    fs::write(data.path().join("trainval_data_list.txt"), "a.png,cat\n").unwrap();

    let config = ReporterConfig::new(data.path()).with_charts(ChartConfig::none());
    let (result, output) = run(config);

    match result {
        Err(DistributionError::ManifestNotFound(path)) => {
            assert!(path.ends_with("test_data_list.txt"));
        }
        other => panic!("expected missing manifest error, got {:?}", other),
    }
    assert!(output.is_empty());
}

#[test]
fn skip_missing_reports_remaining_split() {
    let data = tempdir().unwrap();
    fs::write(data.path().join("test_data_list.txt"), "a.png,cat\n").unwrap();

    let mut config = ReporterConfig::new(data.path()).with_charts(ChartConfig::none());
    config.skip_missing = true;
    let (result, output) = run(config);
    let summary = result.unwrap();

    assert!(!summary.get(Split::TrainVal).unwrap().found);
    assert_eq!(summary.get(Split::Test).unwrap().distribution.get("cat"), 1);
    assert!(summary.comparison.is_none());
    assert!(output.contains("Skipping 'TrainVal' set."));
}

#[test]
fn empty_manifest_reports_no_data_and_no_chart() {
    let data = tempdir().unwrap();
    let charts = tempdir().unwrap();
    write_manifests(data.path(), "a.png,cat\n", "");

    let config = ReporterConfig::new(data.path()).with_output_dir(charts.path());
    let (result, output) = run(config);
    let summary = result.unwrap();

    let test = summary.get(Split::Test).unwrap();
    assert!(test.found);
    assert!(test.distribution.is_empty());
    assert!(test.charts.is_empty());
    assert!(!charts.path().join("test_distribution.png").exists());
    assert!(output.contains("No data found."));

    let cmp = summary.comparison.unwrap();
    assert_eq!(cmp.missing_from_test, vec!["cat"]);
}

#[test]
fn strict_mode_rejects_malformed_lines() {
    let data = tempdir().unwrap();
    write_manifests(data.path(), "a.png,cat\nno_label_here\n", "b.png,cat\n");

    let format = ManifestFormat {
        on_malformed: MalformedPolicy::Error,
        ..Default::default()
    };
    let config = ReporterConfig::new(data.path())
        .with_format(format)
        .with_charts(ChartConfig::none());
    let (result, _) = run(config);

    match result {
        Err(DistributionError::MalformedLine { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected malformed line error, got {:?}", other),
    }
}

#[test]
fn lenient_mode_skips_malformed_lines() {
    let data = tempdir().unwrap();
    write_manifests(data.path(), "a.png,cat\nno_label_here\n", "b.png,cat\n");

    let config = ReporterConfig::new(data.path()).with_charts(ChartConfig::none());
    let (result, output) = run(config);
    let summary = result.unwrap();

    let train = summary.get(Split::TrainVal).unwrap();
    assert_eq!(train.distribution.total(), 1);
    assert_eq!(train.skipped_lines, 1);
    assert!(output.contains("(1 malformed lines skipped)"));
}

#[test]
fn empty_label_is_skipped_not_counted_as_a_class() {
    let data = tempdir().unwrap();
    write_manifests(data.path(), "a.png,cat\nb.png,\n", "c.png,cat\n");

    let config = ReporterConfig::new(data.path()).with_charts(ChartConfig::none());
    let summary = run(config).0.unwrap();

    let train = summary.get(Split::TrainVal).unwrap();
    assert_eq!(train.distribution.num_classes(), 1);
    assert!(!train.distribution.contains(""));
    assert_eq!(train.skipped_lines, 1);
}

#[test]
fn repeated_runs_give_identical_counts() {
    let data = tempdir().unwrap();
    write_manifests(
        data.path(),
        "a.png,x\nb.png,y\nc.png,x\nd.png,z\n",
        "e.png,y\n",
    );

    let config = ReporterConfig::new(data.path()).with_charts(ChartConfig::none());
    let first = run(config.clone()).0.unwrap();
    let second = run(config).0.unwrap();

    for split in Split::ALL {
        assert_eq!(
            first.get(split).unwrap().distribution,
            second.get(split).unwrap().distribution
        );
    }
}

#[test]
fn svg_and_json_outputs() {
    let data = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    write_manifests(data.path(), "a.png,cat\nb.png,dog\n", "c.png,cat\n");

    let json_path = out_dir.path().join("reports/summary.json");
    let mut config = ReporterConfig::new(data.path())
        .with_output_dir(out_dir.path())
        .with_charts(ChartConfig {
            png: false,
            svg: true,
        });
    config.json_output = Some(json_path.clone());

    let (result, _) = run(config);
    let summary = result.unwrap();

    let svg = fs::read_to_string(out_dir.path().join("train_distribution.svg")).unwrap();
    assert!(svg.contains("&apos;TrainVal&apos; Set - Sample Distribution per Class"));
    assert!(!out_dir.path().join("train_distribution.png").exists());

    let loaded = DistributionSummary::load(&json_path).unwrap();
    assert_eq!(loaded, summary);
    assert_eq!(loaded.comparison.unwrap().missing_from_test, vec!["dog"]);
}

#[test]
fn config_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut config = ReporterConfig::new("elsewhere").with_format(ManifestFormat {
        delimiter: ';',
        ..Default::default()
    });
    config.skip_missing = true;
    config.save(&path).unwrap();

    assert_eq!(ReporterConfig::load(&path).unwrap(), config);
}

#[test]
fn missing_data_dir_is_an_error() {
    let dir = tempdir().unwrap();
    let config = ReporterConfig::new(dir.path().join("absent"));
    let (result, _) = run(config);
    assert!(matches!(result, Err(DistributionError::DataDirNotFound(_))));
}
