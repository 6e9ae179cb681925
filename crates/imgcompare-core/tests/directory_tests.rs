mod common;

use imgcompare_core::query::{filter_comparisons, find_meta_files, FilterCriteria};
use imgcompare_core::{ComparisonKind, Config, Error, ImageComparer};
use std::fs;
use tempfile::tempdir;

use common::{mirrored_trees, solid_png};

fn comparer(config: Config) -> ImageComparer {
    ImageComparer::new(Config {
        show_progress: false,
        ..config
    })
    .unwrap()
}

#[test]
fn test_directory_compare_pairs_shared_names() {
    let dir = tempdir().unwrap();
    let (a, b) = mirrored_trees(dir.path());

    let comparer = comparer(Config {
        comparisons: vec![ComparisonKind::Pixel],
        ..Default::default()
    });

    let jobs = comparer.resolve(&a, &b).unwrap();
    let names: Vec<_> = jobs
        .iter()
        .map(|j| j.source_a.strip_prefix(&a).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        names,
        vec![
            std::path::PathBuf::from("diff.png"),
            std::path::PathBuf::from("nested/screen.png"),
            std::path::PathBuf::from("same.png"),
        ]
    );

    let comparisons = comparer.run(&a, &b).unwrap();
    assert_eq!(comparisons.len(), 3);
    assert_eq!(comparisons[0].results[0].num_failed, 64);
    assert_eq!(comparisons[1].results[0].num_failed, 25);
    assert_eq!(comparisons[2].results[0].index, 1.0);

    // Identical basenames get disambiguated
    assert_eq!(comparisons[0].source_a, "diff_A.png");
    assert_eq!(comparisons[0].source_b, "diff_B.png");
}

#[test]
fn test_directory_export_and_filter() {
    let dir = tempdir().unwrap();
    let (a, b) = mirrored_trees(dir.path());
    let export = dir.path().join("export");

    let comparer = comparer(Config {
        export_dir: Some(export.clone()),
        threads: 3,
        ..Default::default()
    });
    let comparisons = comparer.run(&a, &b).unwrap();
    assert_eq!(comparisons.len(), 3);

    let screen_dir = export.join("nested").join("screen");
    for name in [
        "pixel.png",
        "contrast.png",
        "quad.png",
        "ssim.png",
        "mse.png",
        "screen_A.png",
        "screen_B.png",
        "meta.json",
    ] {
        assert!(screen_dir.join(name).is_file(), "missing {}", name);
    }
    assert_eq!(
        fs::read(screen_dir.join("screen_A.png")).unwrap(),
        fs::read(a.join("nested/screen.png")).unwrap()
    );

    let found = find_meta_files(&[&export]).unwrap();
    assert_eq!(found.len(), 3);

    // Only the white/black pair falls this low
    let criteria = FilterCriteria {
        comparisons: vec![ComparisonKind::Pixel],
        max_index: 0.5,
        max_failed: 0,
    };
    let selected = filter_comparisons(&found, &criteria);
    assert_eq!(selected.len(), 1);
    assert_eq!(
        selected[0].location,
        export.join("diff").display().to_string()
    );
}

#[test]
fn test_file_against_directory_is_rejected() {
    let dir = tempdir().unwrap();
    let file = solid_png(dir.path(), "a.png", 4, 4, 0);
    let other = dir.path().join("tree");
    fs::create_dir(&other).unwrap();

    let result = comparer(Config::default()).run(&file, &other);
    assert!(matches!(result, Err(Error::MixedSources { .. })));
}

#[test]
fn test_corrupt_image_aborts_run() {
    let dir = tempdir().unwrap();
    let (a, b) = mirrored_trees(dir.path());
    fs::write(b.join("same.png"), b"definitely not a png").unwrap();

    let result = comparer(Config::default()).run(&a, &b);
    assert!(matches!(result, Err(Error::ImageLoad { .. })));
}
