use image::{ImageBuffer, Rgb};
use keskonmark::batch::{self, BatchError, TextError};
use keskonmark::{Config, selection, startup_checks};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a test configuration rooted in a temp directory
fn create_test_config(temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.output.directory = temp_dir.path().join("output");
    config.output.error_log = temp_dir.path().join("error_log.txt");
    config
}

fn font_available() -> bool {
    startup_checks::resolve_font_path(&Config::default()).is_some()
}

fn write_image(path: &Path, width: u32, height: u32) {
    let img = ImageBuffer::from_pixel(width, height, Rgb([120u8, 140, 160]));
    img.save(path).unwrap();
}

fn output_files(config: &Config) -> Vec<PathBuf> {
    if !config.output.directory.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&config.output.directory)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    files.sort();
    files
}

#[tokio::test]
async fn mixed_batch_collects_failures_and_writes_log() {
    if !font_available() {
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&temp_dir);

    let good_jpeg = temp_dir.path().join("one.jpg");
    let good_png = temp_dir.path().join("two.png");
    let bad = temp_dir.path().join("three.jpg");
    write_image(&good_jpeg, 120, 80);
    write_image(&good_png, 64, 64);
    std::fs::write(&bad, b"GIF89a not an image at all").unwrap();

    let paths = vec![good_jpeg.clone(), good_png.clone(), bad.clone()];
    let outcome = batch::run_batch(&paths, "watermark", &config).await.unwrap();

    // Every input yields exactly one record, in order
    assert_eq!(outcome.len(), 3);
    assert_eq!(outcome.records[0].input, good_jpeg);
    assert_eq!(outcome.records[2].input, bad);
    assert_eq!(outcome.success_count(), 2);
    assert_eq!(outcome.failure_count(), 1);

    // N - K outputs, all PNG-named
    let outputs = output_files(&config);
    assert_eq!(outputs.len(), 2);
    assert!(outputs.contains(&config.output.directory.join("one.png")));
    assert!(outputs.contains(&config.output.directory.join("two.png")));

    // K log lines, exactly the failed paths
    let log = std::fs::read_to_string(&config.output.error_log).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines, vec![bad.to_str().unwrap()]);
}

#[tokio::test]
async fn fully_valid_batch_leaves_no_log() {
    if !font_available() {
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&temp_dir);

    let input = temp_dir.path().join("photo.png");
    write_image(&input, 90, 45);

    let outcome = batch::run_batch(&[input], "ok", &config).await.unwrap();
    assert_eq!(outcome.failure_count(), 0);
    assert_eq!(output_files(&config).len(), 1);
    assert!(!config.output.error_log.exists());
}

#[tokio::test]
async fn missing_input_file_is_a_per_image_failure() {
    if !font_available() {
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&temp_dir);

    let present = temp_dir.path().join("here.png");
    let absent = temp_dir.path().join("gone.png");
    write_image(&present, 40, 40);

    let outcome = batch::run_batch(&[present, absent.clone()], "ok", &config)
        .await
        .unwrap();
    assert_eq!(outcome.success_count(), 1);
    assert_eq!(outcome.failure_count(), 1);
    assert_eq!(outcome.failed_paths(), vec![absent.as_path()]);
}

#[tokio::test]
async fn empty_text_rejects_batch_before_any_io() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&temp_dir);

    let input = temp_dir.path().join("photo.png");
    write_image(&input, 32, 32);

    let result = batch::run_batch(&[input], "", &config).await;
    assert!(matches!(
        result,
        Err(BatchError::InvalidText(TextError::Empty))
    ));

    // Rejected before the output directory was even created
    assert!(!config.output.directory.exists());
    assert!(!config.output.error_log.exists());
}

#[tokio::test]
async fn placeholder_text_rejects_batch() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&temp_dir);

    let result = batch::run_batch(&[], "-> Type Here <-", &config).await;
    assert!(matches!(
        result,
        Err(BatchError::InvalidText(TextError::Placeholder))
    ));
}

#[tokio::test]
async fn over_length_text_rejects_batch() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&temp_dir);

    let input = temp_dir.path().join("photo.png");
    write_image(&input, 32, 32);

    let text = "x".repeat(16);
    let result = batch::run_batch(&[input], &text, &config).await;
    assert!(matches!(
        result,
        Err(BatchError::InvalidText(TextError::TooLong { len: 16, max: 15 }))
    ));
    assert!(!config.output.directory.exists());
}

#[tokio::test]
async fn unwritable_output_directory_aborts_whole_batch() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = create_test_config(&temp_dir);

    // A plain file where the output directory should go
    let blocker = temp_dir.path().join("output");
    std::fs::write(&blocker, b"in the way").unwrap();
    config.output.directory = blocker.clone();

    let input = temp_dir.path().join("photo.png");
    write_image(&input, 32, 32);

    let result = batch::run_batch(&[input], "ok", &config).await;
    assert!(matches!(
        result,
        Err(BatchError::OutputDirectoryUnwritable { .. })
    ));
    // Nothing was processed
    assert!(!config.output.error_log.exists());
}

#[tokio::test]
async fn repeated_runs_produce_identical_bytes() {
    if !font_available() {
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&temp_dir);

    let input = temp_dir.path().join("photo.jpg");
    write_image(&input, 200, 150);
    let output_path = config.output.directory.join("photo.png");

    batch::run_batch(std::slice::from_ref(&input), "stable", &config)
        .await
        .unwrap();
    let first = std::fs::read(&output_path).unwrap();

    batch::run_batch(&[input], "stable", &config).await.unwrap();
    let second = std::fs::read(&output_path).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn selection_feeds_batch_in_order() {
    if !font_available() {
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&temp_dir);

    let dir = temp_dir.path().join("images");
    std::fs::create_dir(&dir).unwrap();
    write_image(&dir.join("b.png"), 20, 20);
    write_image(&dir.join("a.jpg"), 20, 20);
    std::fs::write(dir.join("skipped.txt"), b"hello").unwrap();

    let selected = selection::collect_image_paths(&[dir.clone()]).unwrap();
    assert_eq!(selected, vec![dir.join("a.jpg"), dir.join("b.png")]);

    let outcome = batch::run_batch(&selected, "mark", &config).await.unwrap();
    assert_eq!(outcome.success_count(), 2);
    assert_eq!(output_files(&config).len(), 2);
}
