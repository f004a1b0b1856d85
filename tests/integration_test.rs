//! End-to-end tests: scan on disk -> crop -> profiles -> figures

extern crate std;

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use filmkit::analysis::CropRequest;
use filmkit::overrides::prompt_overrides;
use filmkit::{Channel, FilmConfig, FilmError, FilmImage, FilmKit, FilmLoader, Overrides};

const WIDTH: u32 = 80;
const HEIGHT: u32 = 60;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("filmkit-it-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Gaussian beam spot at (40, 30) in red, flat green and blue
fn spot_value(x: u32, y: u32) -> u16 {
    let dx = x as f64 - 40.0;
    let dy = y as f64 - 30.0;
    (1000.0 + 30000.0 * (-(dx * dx + dy * dy) / 50.0).exp()) as u16
}

fn write_scan(dir: &PathBuf) -> String {
    let scan = image::ImageBuffer::<image::Rgb<u16>, Vec<u16>>::from_fn(WIDTH, HEIGHT, |x, y| {
        image::Rgb([spot_value(x, y), 500, 200])
    });
    let path = dir.join("film_scan.tif");
    scan.save(&path).unwrap();
    path.to_string_lossy().into_owned()
}

fn load_at_127_dpi(kit: &FilmKit, path: &str) -> FilmImage {
    let mut image = kit.load(path).unwrap();
    image.metadata.resolution_x = Some(127.0);
    image
}

fn argmax(values: &[f64]) -> usize {
    values.iter()
        .enumerate()
        .fold((0, f64::MIN), |best, (i, v)| if *v > best.1 { (i, *v) } else { best })
        .0
}

#[test]
fn test_scan_is_decoded_from_disk() {
    init_logging();
    let dir = scratch_dir("decode");
    let path = write_scan(&dir);

    let kit = FilmKit::with_config(FilmConfig::defaults());
    let metadata = kit.inspect(&path).unwrap();
    std::assert_eq!((metadata.width, metadata.height), (WIDTH, HEIGHT));
    std::assert_eq!(metadata.bits_per_sample, 16);
    std::assert_eq!(metadata.samples_per_pixel, 3);

    let image = FilmLoader::new().load(&path).unwrap();
    std::assert_eq!(image.channel(Channel::Red).unwrap().get(40, 30), spot_value(40, 30));
    std::assert_eq!(image.channel(Channel::Green).unwrap().get(3, 59), 500);
    std::assert_eq!(image.channel(Channel::Blue).unwrap().get(79, 0), 200);
}

#[test]
fn test_profiles_peak_at_beam_centre() {
    init_logging();
    let dir = scratch_dir("peak");
    let path = write_scan(&dir);

    let kit = FilmKit::with_config(FilmConfig::defaults());
    let image = load_at_127_dpi(&kit, &path);
    let overrides = Overrides { width: Some(21), height: Some(15), ..Overrides::with_center(40, 30) };

    let analysis = kit.analyze(&image, &overrides, Some(Channel::Red)).unwrap();
    std::assert_eq!(analysis.bounds.pixel_columns(), 29..50);
    std::assert_eq!(analysis.bounds.pixel_rows(), 22..37);
    std::assert_eq!((analysis.region.width(), analysis.region.height()), (21, 15));

    let profiles = &analysis.profiles;
    std::assert_eq!(profiles.y_sum.len(), 21);
    std::assert_eq!(profiles.x_sum.len(), 15);
    std::assert_eq!(argmax(&profiles.y_sum), 11);
    std::assert_eq!(argmax(&profiles.x_sum), 8);

    std::assert!((analysis.scale.mm_per_pixel() - 0.2).abs() < 1e-12);
    let (width_mm, height_mm) = analysis.extent_mm();
    std::assert!((width_mm - 4.0).abs() < 1e-9);
    std::assert!((height_mm - 2.8).abs() < 1e-9);
}

#[test]
fn test_flat_channel_gives_flat_profiles() {
    init_logging();
    let dir = scratch_dir("flat");
    let path = write_scan(&dir);

    let kit = FilmKit::with_config(FilmConfig::defaults());
    let image = load_at_127_dpi(&kit, &path);
    let analysis = kit.analyze(&image, &Overrides::with_center(40, 30), Some(Channel::Green)).unwrap();

    // No size override: the whole scan is analysed
    std::assert_eq!(analysis.bounds.pixel_columns(), 0..WIDTH as usize);
    std::assert_eq!(analysis.bounds.pixel_rows(), 0..HEIGHT as usize);
    for profile in [&analysis.profiles.x_sum, &analysis.profiles.y_sum,
                    &analysis.profiles.x_slice, &analysis.profiles.y_slice] {
        std::assert!(profile.iter().all(|v| *v == 500.0));
    }
}

#[test]
fn test_crop_near_corner_is_shifted_inside() {
    init_logging();
    let dir = scratch_dir("corner");
    let path = write_scan(&dir);

    let kit = FilmKit::with_config(FilmConfig::defaults());
    let image = load_at_127_dpi(&kit, &path);
    let overrides = Overrides { width: Some(20), height: Some(10), ..Overrides::with_center(2, 58) };

    let analysis = kit.analyze(&image, &overrides, None).unwrap();
    std::assert_eq!(analysis.channel, Channel::Red);
    std::assert_eq!((analysis.bounds.x_min, analysis.bounds.x_max), (0.0, 20.0));
    std::assert_eq!((analysis.bounds.y_min, analysis.bounds.y_max), (50.0, 60.0));
}

#[test]
fn test_default_centre_outside_small_scan() {
    init_logging();
    let dir = scratch_dir("default-centre");
    let path = write_scan(&dir);

    // Built-in centre (877, 1460) lies far outside an 80x60 scan
    let kit = FilmKit::with_config(FilmConfig::defaults());
    let image = load_at_127_dpi(&kit, &path);
    let request = kit.crop_request(&image, &Overrides { width: Some(10), height: Some(10), ..Overrides::default() });
    std::assert_eq!(request.center, (877.0, 1460.0));

    let analysis = kit.analyze(&image, &Overrides { width: Some(10), height: Some(10), ..Overrides::default() }, None)
        .unwrap();
    std::assert_eq!((analysis.bounds.x_min, analysis.bounds.x_max), (70.0, 80.0));
    std::assert_eq!((analysis.bounds.y_min, analysis.bounds.y_max), (50.0, 60.0));
}

#[test]
fn test_missing_resolution_stops_analysis() {
    init_logging();
    let dir = scratch_dir("no-dpi");
    let path = write_scan(&dir);

    let kit = FilmKit::with_config(FilmConfig::defaults());
    let mut image = kit.load(&path).unwrap();
    image.metadata.resolution_x = None;

    let result = kit.analyze(&image, &Overrides::default(), None);
    std::assert!(std::matches!(result, Err(FilmError::InvalidMetadata(_))));
}

#[test]
fn test_zero_size_region_is_rejected() {
    init_logging();
    let dir = scratch_dir("zero");
    let path = write_scan(&dir);

    let kit = FilmKit::with_config(FilmConfig::defaults());
    let image = load_at_127_dpi(&kit, &path);
    let overrides = Overrides { width: Some(0), ..Overrides::with_center(40, 30) };

    let result = kit.analyze(&image, &overrides, None);
    std::assert!(std::matches!(result, Err(FilmError::RegionTooSmall(_))));
}

#[test]
fn test_prompted_answers_drive_the_crop() {
    init_logging();
    let dir = scratch_dir("prompt");
    let path = write_scan(&dir);

    let mut input = Cursor::new("40\n30\n21\n\n");
    let mut output = Vec::new();
    let overrides = prompt_overrides(&mut input, &mut output).unwrap();

    let kit = FilmKit::with_config(FilmConfig::defaults());
    let image = load_at_127_dpi(&kit, &path);
    let request = kit.crop_request(&image, &overrides);
    std::assert_eq!(request, CropRequest { center: (40.0, 30.0), width: 21.0, height: HEIGHT as f64 });
}

#[test]
fn test_figures_are_written() {
    init_logging();
    let dir = scratch_dir("render");
    let path = write_scan(&dir);
    let output_dir = dir.join("figures");

    let kit = FilmKit::with_config(FilmConfig::defaults());
    let image = load_at_127_dpi(&kit, &path);
    let overrides = Overrides { width: Some(30), height: Some(24), ..Overrides::with_center(40, 30) };
    let analysis = kit.analyze(&image, &overrides, None).unwrap();

    let title = kit.default_title(&path);
    std::assert_eq!(title, "Film film_scan");

    let paths = kit.render(&analysis, &path, &output_dir, &title).unwrap();
    std::assert!(paths.region.ends_with("film_scan_region.png"));
    for figure in [&paths.summed, &paths.sliced] {
        let svg = fs::read_to_string(figure).unwrap();
        std::assert!(svg.contains("<svg"));
        std::assert!(svg.contains("Film film_scan"));
    }

    let region = image::open(&paths.region).unwrap();
    std::assert_eq!((region.width(), region.height()), (30, 24));

    let paths = kit.render_overview(&image, &analysis, (40.0, 30.0), &path, &output_dir).unwrap();
    let overview = image::open(&paths.overview).unwrap();
    std::assert_eq!((overview.width(), overview.height()), (WIDTH, HEIGHT));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_overview_before_analysis_marks_only_the_centre() {
    init_logging();
    let dir = scratch_dir("pre-overview");
    let path = write_scan(&dir);
    let output_dir = dir.join("figures");

    let kit = FilmKit::with_config(FilmConfig::defaults());
    let image = kit.load(&path).unwrap();
    let paths = kit.preview_overview(&image, None, (40.0, 30.0), &path, &output_dir).unwrap();

    let overview = image::open(&paths.overview).unwrap().to_rgb8();
    std::assert_eq!(overview.dimensions(), (WIDTH, HEIGHT));
    // Crosshair arm 10 px left of the centre, no crop outline anywhere
    std::assert_ne!(overview.get_pixel(30, 30), overview.get_pixel(30, 10));
    std::assert_eq!(overview.get_pixel(5, 5), overview.get_pixel(5, 50));

    fs::remove_dir_all(&dir).unwrap();
}
