use super::*;
use tempfile::tempdir;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let config = load_from_path(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, DashboardConfig::default());
    assert_eq!(config.training.seed, 42);
    assert_eq!(config.charts.discount_buckets, 5);
}

#[test]
fn partial_file_fills_remaining_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "[training]\nseed = 7\n\n[charts]\ntop_categories = 3\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.training.seed, 7);
    assert_eq!(config.training.max_iterations, 1_000);
    assert_eq!(config.charts.top_categories, 3);
    assert_eq!(config.charts.discount_buckets, 5);
    assert!(config.logging.file_logging);
}

#[test]
fn out_of_range_values_are_clamped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        "[training]\nholdout_fraction = 0.9\nlearning_rate = -1.0\nmax_iterations = 0\n\n[charts]\ndiscount_buckets = 0\n",
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.training.holdout_fraction, 0.5);
    assert_eq!(config.training.learning_rate, 0.5);
    assert_eq!(config.training.max_iterations, 1);
    assert_eq!(config.charts.discount_buckets, 1);
}

#[test]
fn invalid_toml_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "[training\nseed = ").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseToml { .. }));
    assert!(err.to_string().contains(CONFIG_FILE_NAME));
}

#[test]
fn save_then_load_preserves_settings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
    let mut config = DashboardConfig::default();
    config.dataset.path = Some("orders.csv".into());
    config.training.seed = 1234;
    config.logging.file_logging = false;

    save_to_path(&config, &path).unwrap();
    let loaded = load_from_path(&path).unwrap();
    assert_eq!(loaded, config);

    let leftovers = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp-"))
        .count();
    assert_eq!(leftovers, 0);
}
