use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use dtype_infer::data::loader::parse_csv_bytes;
use dtype_infer::data::normalize::normalize_table;
use dtype_infer::data::serialize::decode_value;
use dtype_infer::store::{DirectoryStore, MemoryStore, RecordStore};
use dtype_infer::{AnalysisError, Analyzer, DType, InferenceOptions};

const SIGNUPS: &[u8] = b"id,flag,amount,joined\n1,true,10,2024-01-01\n2,false,10.5,2024-01-02\n";

#[test]
fn upload_then_retrieve() {
    let store = Arc::new(MemoryStore::new());
    let analyzer = Analyzer::new(store.clone());

    let record = analyzer.analyze_upload("signups.csv", SIGNUPS).unwrap();
    assert_eq!(record.file_name, "signups.csv");
    assert_eq!(record.columns, vec!["id", "flag", "amount", "joined"]);
    assert_eq!(record.dtypes["id"], "integer");
    assert_eq!(record.dtypes["flag"], "boolean");
    assert_eq!(record.dtypes["amount"], "float");
    assert_eq!(record.dtypes["joined"], "datetime");

    let fetched = analyzer.fetch(&record.id.to_string()).unwrap();
    assert_eq!(fetched, record);

    let first = &fetched.data[0];
    assert_eq!(first["id"], json!(1));
    assert_eq!(first["flag"], json!(true));
    assert_eq!(first["amount"].as_f64(), Some(10.0));
    assert_eq!(first["joined"], json!("2024-01-01T00:00:00"));
    assert_eq!(fetched.data[1]["amount"].as_f64(), Some(10.5));
}

#[test]
fn stored_rows_decode_to_the_inferred_values() {
    let csv = b"z,when,kind,score\n\
        1+2j,2024-05-01 08:30:00,a,1.25\n\
        (3-4.5i),2024-05-02T09:00:00,b,\n\
        ,2024-05-03,a,-2\n";
    let analyzer = Analyzer::new(Arc::new(MemoryStore::new()));
    let record = analyzer.analyze_upload("mixed.csv", csv).unwrap();

    let raw = parse_csv_bytes(csv).unwrap();
    let typed = normalize_table(&raw, &InferenceOptions::default(), usize::MAX).unwrap();
    assert_eq!(typed.column("z").unwrap().dtype, DType::Complex);
    assert_eq!(record.data[1]["z"], json!("(3-4.5j)"));
    assert_eq!(record.data[2]["when"], json!("2024-05-03T00:00:00"));

    for col in &typed.columns {
        for (row, original) in record.data.iter().zip(&col.values) {
            let decoded = decode_value(col.dtype, &row[&col.name]).unwrap();
            assert_eq!(&decoded, original, "column {}", col.name);
        }
    }
}

#[test]
fn spreadsheet_upload_infers_native_cells() {
    let bytes = include_bytes!("fixtures/inventory.xlsx");
    let analyzer = Analyzer::new(Arc::new(MemoryStore::new()));
    let record = analyzer.analyze_upload("inventory.xlsx", bytes).unwrap();

    assert_eq!(record.dtypes["qty"], "integer");
    assert_eq!(record.dtypes["in_stock"], "boolean");
    assert_eq!(record.dtypes["received"], "datetime");
    assert_eq!(record.dtypes["2024.0"], "float");
    assert_eq!(record.data[0]["qty"], json!(3));
    assert_eq!(record.data[2]["qty"], json!(null));
    assert_eq!(record.data[1]["received"], json!("2024-01-02T12:00:00"));
    assert_eq!(record.data[1]["note"], json!(null));
}

#[test]
fn records_survive_a_restart_with_directory_store() {
    let dir = TempDir::new().unwrap();
    let id = {
        let store = Arc::new(DirectoryStore::open(dir.path()).unwrap());
        Analyzer::new(store).analyze_upload("signups.csv", SIGNUPS).unwrap().id
    };

    let reopened = Arc::new(DirectoryStore::open(dir.path()).unwrap());
    let analyzer = Analyzer::new(reopened);
    let record = analyzer.fetch(&id.to_string()).unwrap();
    assert_eq!(record.dtypes["joined"], "datetime");
    assert_eq!(analyzer.recent().unwrap().len(), 1);
}

#[test]
fn retrieval_failures() {
    let analyzer = Analyzer::new(Arc::new(MemoryStore::new()));
    let missing = "6f9619ff-8b86-4011-b42d-00c04fc964ff";
    assert!(matches!(analyzer.fetch(missing), Err(AnalysisError::RecordNotFound(_))));
    assert!(matches!(
        analyzer.fetch("not an id"),
        Err(AnalysisError::StorageFailure(_))
    ));
}

#[test]
fn unsupported_extension_persists_nothing() {
    let store = Arc::new(MemoryStore::new());
    let analyzer = Analyzer::new(store.clone());
    let err = analyzer.analyze_upload("report.pdf", SIGNUPS).unwrap_err();
    assert!(matches!(err, AnalysisError::UnsupportedFormat(_)));
    assert!(store.list().unwrap().is_empty());
}
