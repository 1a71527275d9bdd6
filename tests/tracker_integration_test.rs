use category_tracker::{CategoryTracker, LocalStorage, MediaWikiFetcher, RunSummary, TrackerError};
use httpmock::prelude::*;
use httpmock::Mock;
use tempfile::TempDir;

const DATA_FILE: &str = "mathematics_categories.csv";
const API_PATH: &str = "/w/api.php";

fn mock_members<'a>(server: &'a MockServer, category: &str, members: &[&str]) -> Mock<'a> {
    let members: Vec<serde_json::Value> = members
        .iter()
        .map(|name| serde_json::json!({"ns": 14, "title": format!("Category:{}", name)}))
        .collect();

    let cmtitle = format!("Category:{}", category);
    server.mock(move |when, then| {
        when.method(GET)
            .path(API_PATH)
            .query_param("action", "query")
            .query_param("list", "categorymembers")
            .query_param("cmtitle", cmtitle.as_str())
            .query_param("cmlimit", "500")
            .query_param("format", "json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "batchcomplete": "",
                "query": {"categorymembers": members}
            }));
    })
}

fn tracker_for(
    server: &MockServer,
    temp_dir: &TempDir,
) -> CategoryTracker<MediaWikiFetcher, LocalStorage> {
    let fetcher = MediaWikiFetcher::new(reqwest::Client::new(), server.url(API_PATH));
    let storage = LocalStorage::new(temp_dir.path());
    CategoryTracker::new(fetcher, storage, DATA_FILE, "Mathematics")
}

fn read_table(temp_dir: &TempDir) -> String {
    std::fs::read_to_string(temp_dir.path().join(DATA_FILE)).unwrap()
}

#[tokio::test]
async fn test_first_run_creates_sorted_table() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let root_mock = mock_members(&server, "Mathematics", &["Topology", "Algebra"]);

    let summary = tracker_for(&server, &temp_dir).run().await.unwrap();

    root_mock.assert();
    assert_eq!(
        summary.to_string(),
        "Initial file created with 2 subcategories of Mathematics."
    );
    assert_eq!(
        read_table(&temp_dir),
        "Category,Status\nAlgebra,Included\nTopology,Included\n"
    );
}

#[tokio::test]
async fn test_update_run_adds_next_level() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join(DATA_FILE),
        "Category,Status\nAlgebra,Included\nTopology,Included\n",
    )
    .unwrap();

    let server = MockServer::start();
    let algebra_mock = mock_members(&server, "Algebra", &["Linear algebra"]);
    let topology_mock = mock_members(&server, "Topology", &[]);

    let summary = tracker_for(&server, &temp_dir).run().await.unwrap();

    algebra_mock.assert();
    topology_mock.assert();
    assert_eq!(
        summary,
        RunSummary::Updated {
            total: 3,
            added: vec!["Linear algebra".to_string()],
            persisted: true,
        }
    );
    assert_eq!(
        read_table(&temp_dir),
        "Category,Status\nAlgebra,Included\nLinear algebra,Included\nTopology,Included\n"
    );
}

#[tokio::test]
async fn test_self_referencing_category_is_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let original = "Category,Status\nAlgebra,Included\n";
    std::fs::write(temp_dir.path().join(DATA_FILE), original).unwrap();

    let server = MockServer::start();
    let algebra_mock = mock_members(&server, "Algebra", &["Algebra"]);

    let summary = tracker_for(&server, &temp_dir).run().await.unwrap();

    algebra_mock.assert();
    assert_eq!(summary.to_string(), "Updated file. Now contains 1 categories.");
    assert_eq!(read_table(&temp_dir), original);
}

#[tokio::test]
async fn test_transport_failure_leaves_file_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    // Unsorted on purpose: a rewrite would reorder it
    let original = "Category,Status\nTopology,Included\nAlgebra,Included\n";
    std::fs::write(temp_dir.path().join(DATA_FILE), original).unwrap();

    let server = MockServer::start();
    let _algebra_mock = mock_members(&server, "Algebra", &["Linear algebra"]);
    let topology_mock = server.mock(|when, then| {
        when.method(GET)
            .path(API_PATH)
            .query_param("cmtitle", "Category:Topology");
        then.status(500);
    });

    let result = tracker_for(&server, &temp_dir).run().await;

    topology_mock.assert();
    assert!(matches!(result, Err(TrackerError::ApiError(_))));
    assert_eq!(read_table(&temp_dir), original);
}

#[tokio::test]
async fn test_unreachable_service_fails_first_run_without_creating_file() {
    let temp_dir = TempDir::new().unwrap();
    // Port 9 (discard) is not served by anything in the test environment
    let fetcher = MediaWikiFetcher::new(reqwest::Client::new(), "http://127.0.0.1:9/w/api.php");
    let tracker = CategoryTracker::new(
        fetcher,
        LocalStorage::new(temp_dir.path()),
        DATA_FILE,
        "Mathematics",
    );

    let result = tracker.run().await;

    assert!(matches!(result, Err(TrackerError::ApiError(_))));
    assert!(!temp_dir.path().join(DATA_FILE).exists());
}

#[tokio::test]
async fn test_malformed_table_aborts_before_fetching() {
    let temp_dir = TempDir::new().unwrap();
    let original = "Name,State\nAlgebra,Included\n";
    std::fs::write(temp_dir.path().join(DATA_FILE), original).unwrap();

    let server = MockServer::start();
    let any_mock = server.mock(|when, then| {
        when.method(GET).path(API_PATH);
        then.status(200)
            .json_body(serde_json::json!({"query": {"categorymembers": []}}));
    });

    let result = tracker_for(&server, &temp_dir).run().await;

    assert!(matches!(result, Err(TrackerError::TableFormatError { .. })));
    assert_eq!(any_mock.hits(), 0);
    assert_eq!(read_table(&temp_dir), original);
}

#[tokio::test]
async fn test_successive_runs_grow_until_converged() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    mock_members(&server, "Mathematics", &["Algebra"]);
    mock_members(&server, "Algebra", &["Linear algebra", "Algebra"]);
    mock_members(&server, "Linear algebra", &["Algebra"]);

    let tracker = tracker_for(&server, &temp_dir);

    let first = tracker.run().await.unwrap();
    assert!(matches!(first, RunSummary::Created { count: 1, .. }));

    let second = tracker.run().await.unwrap();
    assert_eq!(
        second,
        RunSummary::Updated {
            total: 2,
            added: vec!["Linear algebra".to_string()],
            persisted: true,
        }
    );
    let after_second = read_table(&temp_dir);

    let third = tracker.run().await.unwrap();
    assert_eq!(
        third,
        RunSummary::Updated {
            total: 2,
            added: vec![],
            persisted: true,
        }
    );
    assert_eq!(read_table(&temp_dir), after_second);
}
