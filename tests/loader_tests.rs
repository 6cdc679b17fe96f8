// Tests for concurrent document loading and manifest handling.
use anyhow::anyhow;
use classgrid::context::{AppContext, TestContext};
use classgrid::loader::{self, fetch_documents, merge_results};
use classgrid::model::GroupRange;
use classgrid::schedule::Schedule;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn document(rows: &[[&str; 10]]) -> String {
    let mut html = String::from("<table><tr><th>#</th><th>Deň</th></tr>");
    for row in rows {
        html.push_str("<tr><td class=\"cell\">1</td>");
        for cell in row {
            html.push_str(&format!("<td class=\"cell\">{}</td>", cell));
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}

fn sources() -> HashMap<String, String> {
    let mut docs = HashMap::new();
    docs.insert(
        "inf1.html".to_string(),
        document(&[
            ["Po", "08:00-09:30", "2", "P", "MAT1", "Matematika", "A-101", "Novák", "", "TYZ"],
            ["Po", "10:00-11:30", "2", "C", "MAT1", "Matematika", "B-201", "Kováč", "1. skupina", "TYZ"],
        ]),
    );
    docs.insert(
        "inf2.html".to_string(),
        document(&[["Ut", "09:00-10:30", "2", "P", "FYZ1", "Fyzika", "A-102", "Horváth", "", "TYZ"]]),
    );
    docs.insert("broken.html".to_string(), "<p>no table here</p>".to_string());
    docs
}

#[tokio::test]
async fn test_fetch_keeps_source_order() {
    let docs = sources();
    let order = vec!["inf2.html".to_string(), "inf1.html".to_string()];

    let results = fetch_documents(order, 2, GroupRange::default(), |src| {
        let doc = docs.get(&src).cloned();
        async move { doc.ok_or_else(|| anyhow!("not found: {}", src)) }
    })
    .await;

    let names: Vec<&str> = results.iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(names, vec!["inf2.html", "inf1.html"]);
    assert_eq!(results[0].1.as_ref().unwrap().len(), 1);
    assert_eq!(results[1].1.as_ref().unwrap().len(), 2);
}

#[tokio::test]
async fn test_partial_failure_keeps_successful_sources() {
    let docs = sources();
    let calls = Arc::new(AtomicUsize::new(0));
    let order = vec![
        "inf1.html".to_string(),
        "missing.html".to_string(),
        "broken.html".to_string(),
        "inf2.html".to_string(),
    ];

    let counter = calls.clone();
    let results = fetch_documents(order, 3, GroupRange::default(), move |src| {
        counter.fetch_add(1, Ordering::SeqCst);
        let doc = docs.get(&src).cloned();
        async move { doc.ok_or_else(|| anyhow!("not found: {}", src)) }
    })
    .await;
    assert_eq!(calls.load(Ordering::SeqCst), 4);

    let mut schedule = Schedule::new();
    let report = merge_results(&mut schedule, results);

    assert!(report.is_partial());
    assert_eq!(report.loaded, vec!["inf1.html", "inf2.html"]);
    let failed: Vec<&str> = report.failed.iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(failed, vec!["missing.html", "broken.html"]);
    assert!(report.failed[0].1.contains("not found"));
    assert_eq!(report.lessons, 3);
    assert_eq!(schedule.len(), 3);
}

#[tokio::test]
async fn test_merge_results_invalidates_cache() {
    let docs = sources();
    let mut schedule = Schedule::new();
    assert!(schedule.sorted_table(None).is_empty());
    assert_eq!(schedule.cached_views(), 1);

    let results = fetch_documents(vec!["inf1.html".to_string()], 1, GroupRange::default(), |src| {
        let doc = docs.get(&src).cloned();
        async move { doc.ok_or_else(|| anyhow!("not found: {}", src)) }
    })
    .await;
    merge_results(&mut schedule, results);

    assert_eq!(schedule.cached_views(), 0);
    assert_eq!(schedule.sorted_table(None).len(), 2);
}

#[tokio::test]
async fn test_load_manifest_from_disk() {
    let ctx = TestContext::new();
    let dir = ctx.get_data_dir().unwrap().join("rozvrhy");
    std::fs::create_dir_all(&dir).unwrap();

    for (name, html) in sources() {
        std::fs::write(dir.join(name), html).unwrap();
    }
    std::fs::write(
        dir.join("zoznam.json"),
        r#"{"subory": ["/inf1.html", "inf2.html", "gone.html"]}"#,
    )
    .unwrap();

    let manifest = ctx.resolve_manifest(&dir.join("zoznam.json"));
    let (mut schedule, report) = loader::load_manifest(&manifest, 4, GroupRange::default())
        .await
        .unwrap();

    assert_eq!(report.loaded.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].0.ends_with("gone.html"));
    assert_eq!(schedule.len(), 3);
    assert_eq!(schedule.sorted_table(Some(2)).len(), 2);
}

#[tokio::test]
async fn test_missing_manifest_is_an_error() {
    let ctx = TestContext::new();
    let path = ctx.get_data_dir().unwrap().join("nope.json");
    assert!(loader::load_manifest(&path, 2, GroupRange::default()).await.is_err());
}
