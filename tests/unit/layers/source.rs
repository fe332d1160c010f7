use super::*;

#[test]
fn normalize_rel_path_rules() {
    assert_eq!(normalize_rel_path("data/./a.geojson").unwrap(), "data/a.geojson");
    assert_eq!(normalize_rel_path("data\\icons\\home.svg").unwrap(), "data/icons/home.svg");
    assert!(normalize_rel_path("/etc/passwd").is_err());
    assert!(normalize_rel_path("data/../secret").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn memory_fetcher_resolves_normalized_keys() {
    let f = MemoryFetcher::new().with("./data/a.geojson", "{}").unwrap();
    let bytes = futures::executor::block_on(f.fetch("data/a.geojson")).unwrap();
    assert_eq!(bytes, b"{}");
    assert!(futures::executor::block_on(f.fetch("data/missing.geojson")).is_err());
    assert_eq!(f.external_url("icons/x.svg"), "icons/x.svg");
}

#[test]
fn fs_fetcher_reads_under_root() {
    let root = std::env::temp_dir().join(format!("scrollmap-fetch-{}", std::process::id()));
    std::fs::create_dir_all(root.join("data")).unwrap();
    std::fs::write(root.join("data/x.geojson"), b"hello").unwrap();

    let f = FsFetcher::new(&root);
    let bytes = futures::executor::block_on(f.fetch("data/x.geojson")).unwrap();
    assert_eq!(bytes, b"hello");
    assert!(futures::executor::block_on(f.fetch("data/none.geojson")).is_err());
    assert_eq!(f.external_url("./data/x.geojson"), "data/x.geojson");

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn fs_fetcher_serves_joined_fetches() {
    let root = std::env::temp_dir().join(format!("scrollmap-join-{}", std::process::id()));
    std::fs::create_dir_all(&root).unwrap();
    for i in 0..4 {
        std::fs::write(root.join(format!("{i}.geojson")), format!("{i}")).unwrap();
    }

    let f = FsFetcher::new(&root);
    let names: Vec<String> = (0..4).map(|i| format!("{i}.geojson")).collect();
    let results = futures::executor::block_on(futures::future::join_all(
        names.iter().map(|n| f.fetch(n)),
    ));
    for (i, r) in results.into_iter().enumerate() {
        assert_eq!(r.unwrap(), i.to_string().into_bytes());
    }

    std::fs::remove_dir_all(&root).unwrap();
}
