use super::*;
use serde_json::Value;

fn filters(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs.iter().map(|(c, f)| ((*c).to_string(), (*f).to_string())).collect()
}

// =============================================================
// build_url
// =============================================================

#[test]
fn build_url_select_with_eq_filter() {
    let url = build_url(
        "https://abcd.supabase.co/rest/v1",
        "Attendance",
        "*",
        &filters(&[("pdate", "eq.2024-03-07")]),
    )
    .unwrap();
    assert_eq!(url.as_str(), "https://abcd.supabase.co/rest/v1/Attendance?select=*&pdate=eq.2024-03-07");
}

#[test]
fn build_url_encodes_reserved_characters() {
    let url = build_url("http://localhost:54321/rest/v1", "my table", "*", &filters(&[("name", "eq.a&b=c")])).unwrap();
    assert_eq!(url.path(), "/rest/v1/my%20table");
    assert_eq!(url.query(), Some("select=*&name=eq.a%26b%3Dc"));
}

#[test]
fn build_url_without_filters() {
    let url = build_url("https://x.supabase.co/rest/v1", "Attendance", "id,std_name", &[]).unwrap();
    assert_eq!(url.query(), Some("select=id%2Cstd_name"));
}

#[test]
fn build_url_rejects_unparsable_base() {
    let err = build_url("not a url", "t", "*", &[]).unwrap_err();
    assert!(matches!(err, ClientError::InvalidUrl(_)));
}

// =============================================================
// parse_rows
// =============================================================

#[test]
fn parse_rows_decodes_array() {
    let rows: Vec<Value> = parse_rows(r#"[{"id":1},{"id":2}]"#).unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn parse_rows_empty_array() {
    let rows: Vec<Value> = parse_rows("[]").unwrap();
    assert!(rows.is_empty());
}

#[test]
fn parse_rows_rejects_object_body() {
    let err = parse_rows::<Value>(r#"{"id":1}"#).unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)));
}

// =============================================================
// api_error
// =============================================================

#[test]
fn api_error_uses_postgrest_message() {
    let body = r#"{"code":"42P01","details":null,"hint":null,"message":"relation \"public.Attendance\" does not exist"}"#;
    let err = api_error(StatusCode::NOT_FOUND, body);
    assert!(matches!(err, ClientError::Api { status: 404, .. }));
    assert_eq!(err.to_string(), "relation \"public.Attendance\" does not exist");
}

#[test]
fn api_error_falls_back_to_raw_body() {
    let err = api_error(StatusCode::BAD_GATEWAY, "upstream unavailable\n");
    assert_eq!(err.to_string(), "upstream unavailable");
}

#[test]
fn api_error_empty_body_uses_status() {
    let err = api_error(StatusCode::UNAUTHORIZED, "");
    assert_eq!(err.to_string(), "HTTP 401 Unauthorized");
}

#[test]
fn api_error_blank_message_uses_body() {
    let body = r#"{"message":"  "}"#;
    let err = api_error(StatusCode::BAD_REQUEST, body);
    assert_eq!(err.to_string(), body);
}
