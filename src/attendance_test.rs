use super::*;
use serde_json::json;

// =============================================================
// validate_date
// =============================================================

#[test]
fn validate_date_accepts_padded_dates() {
    assert!(validate_date("2024-03-07").is_ok());
    assert!(validate_date("1999-12-31").is_ok());
}

#[test]
fn validate_date_rejects_other_shapes() {
    for bad in ["", "2024-3-7", "2024/03/07", "24-03-07", "2024-03-07 ", " 2024-03-07", "2024-03-0a", "２０２４-03-07"] {
        let err = validate_date(bad).unwrap_err();
        assert!(matches!(err, AttendanceError::InvalidDate(_)), "{bad:?} should be rejected");
        assert_eq!(err.to_string(), "Invalid date format");
    }
}

#[test]
fn validate_date_checks_shape_not_calendar() {
    assert!(validate_date("2024-13-40").is_ok());
}

#[test]
fn format_date_zero_pads() {
    let date = time::Date::from_calendar_date(2024, time::Month::March, 7).unwrap();
    assert_eq!(format_date(date), "2024-03-07");
}

#[test]
fn today_passes_validation() {
    assert!(validate_date(&today()).is_ok());
}

// =============================================================
// AttendanceRow decoding
// =============================================================

#[test]
fn row_decodes_integer_id_and_string_presence() {
    let row: AttendanceRow = serde_json::from_value(json!({
        "id": 7, "std_name": "Ada Lovelace", "presence": "present", "pdate": "2024-03-07"
    }))
    .unwrap();
    assert_eq!(row.id, Some(RowId::Int(7)));
    assert_eq!(row.std_name, "Ada Lovelace");
    assert_eq!(row.presence.to_string(), "present");
}

#[test]
fn row_decodes_uuid_id_and_boolean_presence() {
    let row: AttendanceRow = serde_json::from_value(json!({
        "id": "0b5c6a9e-4a57-4a8e-9a53-3f1e7d3a8d10", "std_name": "Alan", "presence": true
    }))
    .unwrap();
    assert_eq!(row.id.unwrap().to_string(), "0b5c6a9e-4a57-4a8e-9a53-3f1e7d3a8d10");
    assert_eq!(row.presence.to_string(), "true");
}

#[test]
fn row_tolerates_null_name_and_missing_presence() {
    let row: AttendanceRow = serde_json::from_value(json!({ "id": 1, "std_name": null })).unwrap();
    assert_eq!(row.std_name, "");
    assert_eq!(row.presence.to_string(), "");
}

#[test]
fn row_with_null_or_missing_id_still_decodes() {
    let rows: Vec<AttendanceRow> = serde_json::from_value(json!([
        { "id": 1, "std_name": "Ada", "presence": "P" },
        { "id": null, "std_name": "Alan", "presence": "A" },
        { "std_name": "Grace", "presence": "P" },
        { "id": [1, 2], "std_name": "Edsger", "presence": "P" }
    ]))
    .unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].id, Some(RowId::Int(1)));
    assert_eq!(rows[1].id, None);
    assert_eq!(rows[1].std_name, "Alan");
    assert_eq!(rows[2].id, None);
    assert_eq!(rows[3].id, None);
}

#[test]
fn row_renders_non_string_name_as_text() {
    let row: AttendanceRow = serde_json::from_value(json!({ "id": 2, "std_name": 42, "presence": 1 })).unwrap();
    assert_eq!(row.std_name, "42");
    assert_eq!(row.presence.to_string(), "1");
}

#[test]
fn row_list_decodes_through_postgrest_parser() {
    let body = r#"[{"id":1,"std_name":"Ada","presence":"P"},{"id":null,"std_name":"Alan","presence":"A"}]"#;
    let rows = crate::supabase::query::parse_rows::<AttendanceRow>(body).unwrap();
    assert_eq!(rows.iter().map(|r| r.std_name.as_str()).collect::<Vec<_>>(), ["Ada", "Alan"]);
}
