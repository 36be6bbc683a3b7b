use bandscope::config::parse_config;
use bandscope::replay::{read_frames, write_levels};
use bandscope::{plan_bands, Session, SpectrumAggregator, SpectrumFrame};

#[test]
fn planned_bands_feed_the_aggregator() {
    let bands = plan_bands(250.0, 7, -24.0, 12.0).unwrap();
    let centers: Vec<f64> = bands.iter().map(|b| b.center_frequency).collect();
    assert_eq!(
        centers,
        vec![250.0, 500.0, 1000.0, 2000.0, 4000.0, 8000.0, 16000.0]
    );

    let mut aggregator = SpectrumAggregator::default();
    let plan = aggregator.configure(250.0, 512, &bands).unwrap();
    assert_eq!(plan.bucket_counts.len(), 7);
    assert!(plan.assigned_bins() <= 512);

    let frame = SpectrumFrame::new(1.5, 0.1, vec![-60.0; 512], -60.0);
    let levels = aggregator.aggregate(&frame).unwrap();
    assert_eq!(levels.values, vec![0.0; 7]);
}

#[test]
fn replayed_capture_produces_one_line_per_frame() {
    let cfg = parse_config("[spectrum]\nbands = 4\n").unwrap();
    let mut session = Session::from_config(&cfg).unwrap();
    assert_eq!(session.plan().bucket_counts, vec![1, 1, 1, 1, 0, 0, 0]);

    let capture = "\
{\"timestamp\": 0.0, \"duration\": 0.1, \"magnitudes_db\": [-60, -60, -60, -60]}
{\"timestamp\": 0.1, \"duration\": 0.1, \"magnitudes_db\": [-50, -60, -60, -60], \"noise_floor_db\": -60}
";
    let frames = read_frames(
        capture.as_bytes(),
        session.noise_floor_db(),
        session.interval(),
    )
    .unwrap();

    let mut out = Vec::new();
    for frame in &frames {
        let levels = session.process(frame).unwrap();
        write_levels(&mut out, frame.timestamp, &levels).unwrap();
    }

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["levels"].as_array().unwrap().len(), 7);

    let first_band = lines[1]["levels"][0].as_f64().unwrap();
    assert!((first_band - 10.0 / 1.05).abs() < 1e-9);
    assert_eq!(lines[1]["levels"][6].as_f64().unwrap(), 0.0);
}

#[test]
fn capture_with_wrong_bin_count_is_rejected() {
    let mut session = Session::from_config(&parse_config("").unwrap()).unwrap();
    let frames = read_frames(
        "{\"magnitudes_db\": [-60, -60]}\n".as_bytes(),
        session.noise_floor_db(),
        session.interval(),
    )
    .unwrap();
    assert!(session.process(&frames[0]).is_err());
}

#[test]
fn capture_on_an_inexact_floor_replays_as_silence() {
    let cfg = parse_config("[spectrum]\nbands = 4\n").unwrap();
    let mut session = Session::from_config(&cfg).unwrap();
    let capture = "{\"magnitudes_db\": [-60.1, -60.1, -60.1, -60.1], \"noise_floor_db\": -60.1}\n";
    let frames = read_frames(
        capture.as_bytes(),
        session.noise_floor_db(),
        session.interval(),
    )
    .unwrap();

    let levels = session.process(&frames[0]).unwrap();
    assert_eq!(levels.values, vec![0.0; 7]);
}
