use flate2::Compression;
use flate2::write::GzEncoder;
use logreport_cli::OutputFormat;
use logreport_core::analysis::UrlStat;
use logreport_cli::commands::stats::{analyze_file, execute, write_csv};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

const SAMPLE: &str = r#"1.196.116.32 -  - [29/Jun/2017:03:50:22 +0300] "GET /api/v2/banner/25019354 HTTP/1.1" 200 927 "-" "Lynx/2.8.8dev.9 libwww-FM/2.14 SSL-MM/1.4.1 GNUTLS/2.10.5" "-" "1498697422-2190034393-4708-9752759" "dc7161be3" 0.390
1.99.174.176 3b81f63526fa8  - [29/Jun/2017:03:50:22 +0300] "GET /api/1/photogenic_banners/list/?server_name=WIN7RB4 HTTP/1.1" 200 12 "-" "Python-urllib/2.7" "-" "1498697422-32900793-4708-9752770" "-" 0.133
1.169.137.128 -  - [29/Jun/2017:03:50:22 +0300] "GET /api/v2/banner/16852664 HTTP/1.1" 200 19415 "-" "Slotovod" "-" "1498697422-2118016444-4708-9752769" "712e90144abee9" 0.199
1.194.135.240 -  - [29/Jun/2017:03:50:22 +0300] "GET /api/v2/group/7786679/statistic/sites/?date_type=day&date_from=2017-06-28&date_to=2017-06-28 HTTP/1.1" 200 22 "-" "python-requests/2.13.0" "-" "1498697422-3979856266-4708-9752772" "8a7741a54297568b" 0.067
1.196.116.32 -  - [29/Jun/2017:03:50:22 +0300] "GET /api/v2/banner/25019354 HTTP/1.1" 200 927 "-" "Lynx/2.8.8dev.9 libwww-FM/2.14 SSL-MM/1.4.1 GNUTLS/2.10.5" "-" "1498697422-2190034393-4708-9752759" "dc7161be3" 0.410
1.194.135.240 -  - [29/Jun/2017:03:50:23 +0300] "0" 400 166 "-" "-" "-" "-" "-" 0.000"#;

/// Helper to write the sample log into a temp dir, optionally gzipped
fn sample_log(dir: &TempDir, gzip: bool) -> PathBuf {
    if gzip {
        let path = dir.path().join("access.log.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(SAMPLE.as_bytes()).unwrap();
        encoder.finish().unwrap();
        path
    } else {
        let path = dir.path().join("access.log");
        fs::write(&path, SAMPLE).unwrap();
        path
    }
}

/// Test that analyze_file aggregates per URL and sorts by total time
#[test]
fn test_analyze_file_sorted_by_time_sum() {
    // Arrange
    let temp_dir = TempDir::new().unwrap();
    let path = sample_log(&temp_dir, false);

    // Act
    let analysis = analyze_file(&path, None).unwrap();

    // Assert
    assert_eq!(analysis.counts.total, 6);
    assert_eq!(analysis.counts.parsed, 5);
    assert_eq!(analysis.stats.len(), 4);

    let banner = &analysis.stats[0];
    assert_eq!(banner.url, "/api/v2/banner/25019354");
    assert_eq!(banner.count, 2);
    assert_eq!(banner.count_perc, 40.0);
    assert_eq!(banner.time_sum, 0.8);
    assert_eq!(banner.time_avg, 0.4);
    assert_eq!(banner.time_max, 0.41);
    assert_eq!(banner.time_med, 0.4);

    let sums: Vec<f64> = analysis.stats.iter().map(|s| s.time_sum).collect();
    assert!(sums.windows(2).all(|w| w[0] >= w[1]));
}

/// Test that gzip input gives the same result as plain input
#[test]
fn test_analyze_gzip_file() {
    let temp_dir = TempDir::new().unwrap();
    let plain = analyze_file(&sample_log(&temp_dir, false), None).unwrap();
    let gzip = analyze_file(&sample_log(&temp_dir, true), None).unwrap();

    assert_eq!(plain, gzip);
}

/// Test that limit keeps only the slowest URLs, and 0 means no limit
#[test]
fn test_analyze_file_limit() {
    let temp_dir = TempDir::new().unwrap();
    let path = sample_log(&temp_dir, false);

    let limited = analyze_file(&path, Some(2)).unwrap();
    assert_eq!(limited.stats.len(), 2);
    assert_eq!(limited.stats[1].url, "/api/v2/banner/16852664");

    let unlimited = analyze_file(&path, Some(0)).unwrap();
    assert_eq!(unlimited.stats.len(), 4);
}

/// Test that a missing file is reported as an error
#[test]
fn test_analyze_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    assert!(analyze_file(&temp_dir.path().join("missing.log"), None).is_err());
}

/// Test that every output format runs
#[test]
fn test_execute_all_formats() {
    let temp_dir = TempDir::new().unwrap();
    let path = sample_log(&temp_dir, false);

    for format in [OutputFormat::Pretty, OutputFormat::Json, OutputFormat::Table] {
        assert!(
            execute(&path, Some(3), format).is_ok(),
            "format {} should succeed",
            format.as_str()
        );
    }
}

/// Test that the CSV table has a header and quotes URLs that need it
#[test]
fn test_write_csv_quotes_urls() {
    let stats = vec![UrlStat {
        url: "/search?q=a,b".to_string(),
        count: 2,
        count_perc: 40.0,
        time_sum: 0.8,
        time_perc: 50.5,
        time_avg: 0.4,
        time_max: 0.41,
        time_med: 0.4,
    }];
    let mut out = Vec::new();

    write_csv(&mut out, &stats).unwrap();

    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("url,count,count_perc,time_sum,time_perc,time_avg,time_max,time_med")
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("\"/search?q=a,b\",2,"));
    assert!(row.ends_with(",0.41,0.4"));
    assert_eq!(lines.next(), None);
}
