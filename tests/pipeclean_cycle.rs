//! End-to-end pipeclean cycles against the mock ODS API.

mod support;

use tempfile::TempDir;

use edfi_perf_test::config::{ApiArgs, OutputArgs};
use edfi_perf_test::pipeclean::{self, PipecleanArgs};
use perf_report::{LogLevel, OutputFormat};

use support::MockOds;

fn args_for(base_url: &str, out: &TempDir, resources: &[&str], delete: bool) -> PipecleanArgs {
    PipecleanArgs {
        api: ApiArgs {
            base_url: base_url.to_string(),
            key: "populated".to_string(),
            secret: "populatedSecret".to_string(),
            ignore_certificates: false,
            connection_limit: 1,
        },
        output: OutputArgs {
            output_dir: out.path().to_path_buf(),
            format: OutputFormat::Csv,
            resource_list: resources.iter().map(|r| r.to_string()).collect(),
            page_size: 25,
            log_level: LogLevel::Warning,
            description: String::new(),
        },
        delete_resources: delete,
    }
}

#[tokio::test]
async fn association_cycle_creates_prerequisites_first_and_cleans_up() {
    let mock = MockOds::new();
    let base_url = mock.start().await;
    let out = TempDir::new().unwrap();

    pipeclean::run(args_for(&base_url, &out, &["studentSchoolAssociations"], true))
        .await
        .unwrap();

    // The student must exist before the association referencing it.
    let posts = mock.post_order();
    assert_eq!(posts, vec!["students", "schools", "studentSchoolAssociations"]);

    let requests = mock.requests();
    assert!(requests.iter().any(|r| r.starts_with("PUT studentSchoolAssociations/")));
    // The association and its fresh student are deleted; the shared
    // school stays for later cycles.
    assert!(requests.iter().any(|r| r.starts_with("DELETE studentSchoolAssociations/")));
    assert!(requests.iter().any(|r| r.starts_with("DELETE students/")));
    assert!(!requests.iter().any(|r| r.starts_with("DELETE schools/")));

    // Five measured steps: list, create, detail, update, delete.
    let detail = std::fs::read_dir(out.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.to_string_lossy().ends_with(".detail.csv"))
        .unwrap();
    let detail = std::fs::read_to_string(detail).unwrap();
    assert_eq!(detail.lines().count(), 6, "header plus five steps:\n{detail}");
}

#[tokio::test]
async fn read_only_kind_gets_the_list_only_cycle() {
    let mock = MockOds::new();
    mock.seed_with("schoolYearTypes", 3, |n| {
        serde_json::json!({"id": format!("y-{n}"), "schoolYear": 2013 + n})
    });
    let base_url = mock.start().await;
    let out = TempDir::new().unwrap();

    pipeclean::run(args_for(&base_url, &out, &["schoolYearTypes"], true))
        .await
        .unwrap();

    assert!(mock.post_order().is_empty());
    let list_reads = mock
        .requests()
        .iter()
        .filter(|r| r.starts_with("GET schoolYearTypes?"))
        .count();
    assert_eq!(list_reads, 1);
}

#[tokio::test]
async fn create_step_reports_the_status_the_server_returned() {
    let mock = MockOds::new();
    mock.upsert_on_create("students");
    let base_url = mock.start().await;
    let out = TempDir::new().unwrap();

    pipeclean::run(args_for(&base_url, &out, &["students"], true))
        .await
        .unwrap();

    let detail = std::fs::read_dir(out.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.to_string_lossy().ends_with(".detail.csv"))
        .unwrap();
    let detail = std::fs::read_to_string(detail).unwrap();
    let statuses: Vec<&str> = detail
        .lines()
        .skip(1)
        .map(|line| line.rsplit(',').next().unwrap())
        .collect();
    // List, upserted create, detail, update, delete.
    assert_eq!(statuses, vec!["200", "200", "200", "204", "204"]);
}

#[tokio::test]
async fn delete_can_be_disabled() {
    let mock = MockOds::new();
    let base_url = mock.start().await;
    let out = TempDir::new().unwrap();

    pipeclean::run(args_for(&base_url, &out, &["students"], false))
        .await
        .unwrap();

    assert!(mock.post_order().contains(&"students".to_string()));
    assert!(!mock.requests().iter().any(|r| r.starts_with("DELETE ")));
}
