use linkwatch::links::{ChangeRecord, DefinedChange, FailureReason, FailureRecord, LinkRecord};
use linkwatch::storage::{
    load_snapshot, load_url_list, CsvReportWriter, ReportWriter, RunContext, UrlRow,
};
use linkwatch::InputError;
use std::path::Path;
use tempfile::TempDir;

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn link(full_link: &str, text: &str) -> LinkRecord {
    LinkRecord {
        source_url: "https://www.website.com/news".to_string(),
        label: "News, daily".to_string(),
        domain: "www.website.com".to_string(),
        href: full_link.trim_start_matches("https://www.website.com").to_string(),
        full_link: full_link.to_string(),
        link_text: text.to_string(),
        link_class_name: "nav-item active".to_string(),
    }
}

#[test]
fn test_url_list_with_reordered_columns() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "urls.csv",
        "label,include_nav_links,url\n\
         News,Yes,https://www.website.com/news\n\
         Blog,0,https://blog.website.com\n\
         Partial\n",
    );

    let rows = load_url_list(Some(path.as_path())).unwrap();

    assert_eq!(
        rows,
        vec![
            UrlRow {
                url: "https://www.website.com/news".to_string(),
                label: "News".to_string(),
                include_nav_links: true,
            },
            UrlRow {
                url: "https://blog.website.com".to_string(),
                label: "Blog".to_string(),
                include_nav_links: false,
            },
            UrlRow {
                url: String::new(),
                label: "Partial".to_string(),
                include_nav_links: false,
            },
        ]
    );
}

#[test]
fn test_url_list_with_extra_column_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "urls.csv",
        "url,label,include_nav_links,notes\nhttps://www.website.com,News,1,x\n",
    );

    match load_url_list(Some(path.as_path())) {
        Err(InputError::InvalidColumns(columns)) => {
            assert_eq!(columns, vec!["url", "label", "include_nav_links", "notes"]);
        }
        other => panic!("Expected invalid columns, got {:?}", other),
    }
}

#[test]
fn test_missing_inputs() {
    let dir = TempDir::new().unwrap();
    let absent = dir.path().join("absent.csv");

    assert!(matches!(
        load_url_list(None),
        Err(InputError::MissingRequired)
    ));
    assert!(matches!(
        load_url_list(Some(absent.as_path())),
        Err(InputError::NotFound(_))
    ));
    assert!(matches!(load_snapshot(None), Ok(None)));
    assert!(matches!(
        load_snapshot(Some(absent.as_path())),
        Err(InputError::NotFound(_))
    ));
}

#[test]
fn test_reports_are_readable_as_next_snapshot() {
    let dir = TempDir::new().unwrap();
    let writer = CsvReportWriter::new(RunContext::new(dir.path().join("out")));
    let snapshot = vec![
        link("https://www.website.com/a", "say \"hi\", friend"),
        link("https://www.website.com/b", ""),
    ];

    let path = writer.write_snapshot(&snapshot).unwrap();

    assert_eq!(path, writer.context().output_path("all_links"));
    assert_eq!(load_snapshot(Some(path.as_path())).unwrap(), Some(snapshot));
}

#[test]
fn test_all_three_tables_share_the_run_timestamp() {
    let dir = TempDir::new().unwrap();
    let writer = CsvReportWriter::new(RunContext::new(dir.path()));
    let ts = writer.context().timestamp().to_string();

    let failed = writer
        .write_failures(&[FailureRecord::new(
            "https://www.website.com",
            FailureReason::HtmlParseFailure,
        )])
        .unwrap();
    let changes = writer
        .write_changes(&[ChangeRecord::new(
            link("https://www.website.com/a", "a"),
            DefinedChange::NewLink,
        )])
        .unwrap();
    let all = writer.write_snapshot(&[]).unwrap();

    for (path, prefix) in [(&failed, "failed"), (&changes, "new_links"), (&all, "all_links")] {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(name, format!("{}_{}.csv", prefix, ts));
    }
    assert!(!ts.contains(':'));
    assert_eq!(
        std::fs::read_to_string(&failed).unwrap(),
        "failure_reason,url\nHTML parse failure,https://www.website.com\n"
    );
    assert_eq!(
        std::fs::read_to_string(&all).unwrap(),
        "url,label,domain,link,full_link,link_text,link_class_name\n"
    );
}

#[test]
fn test_legacy_snapshot_is_blank_filled() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "all_links.csv",
        "full_link,domain,link_text\n\
         https://www.website.com/a,www.website.com,a\n\
         https://www.website.com/b\n",
    );

    let rows = load_snapshot(Some(path.as_path())).unwrap().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].domain, "www.website.com");
    assert_eq!(rows[0].link_text, "a");
    assert_eq!(rows[0].source_url, "");
    assert_eq!(rows[1].full_link, "https://www.website.com/b");
    assert_eq!(rows[1].domain, "");
}
