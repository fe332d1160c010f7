use super::*;

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn csv_is_trimmed_and_empties_dropped() {
    let r = LayerRequest::from(" boundary, ,church ,");
    assert_eq!(r.names(), set(&["boundary", "church"]));
    assert!(LayerRequest::from("").names().is_empty());
}

#[test]
fn list_form_matches_csv_form() {
    let list: LayerRequest = ["boundary", " church", ""].into_iter().collect();
    assert_eq!(list.names(), LayerRequest::from("church,boundary").names());
}

#[test]
fn deserializes_both_forms() {
    let a: LayerRequest = serde_json::from_str(r#""a,b""#).unwrap();
    let b: LayerRequest = serde_json::from_str(r#"["b","a","a"]"#).unwrap();
    assert_eq!(a.names(), b.names());
    assert!(matches!(a, LayerRequest::Csv(_)));
    assert!(matches!(b, LayerRequest::List(_)));
}
