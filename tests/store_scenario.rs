use tabular_lens::data::inspect::describe_column;
use tabular_lens::plot::histogram::age_histogram;
use tabular_lens::{DataType, DatasetService, DatasetStore, ErrorKind};
use tempfile::TempDir;

const T1: &str = "Pclass,Survived,Age,Name,Cabin\n\
    3,0,22,\"Braund, Mr. Owen Harris\",\n\
    1,1,38,\"Cumings, Mrs. John Bradley\",C85\n\
    3,1,,\"Heikkinen, Miss. Laina\",\n";

#[test]
fn upload_list_load_describe() {
    let dir = TempDir::new().unwrap();
    let store = DatasetStore::open(dir.path().join("dataset")).unwrap();

    assert!(store.list_all().unwrap().is_empty());

    let stored = store.upload("t1.csv", T1.as_bytes()).unwrap();
    assert_eq!(stored, "t1.csv");
    assert_eq!(store.list_all().unwrap(), vec!["t1.csv"]);

    let table = store.load("t1.csv").unwrap();
    let pclass = describe_column(&table, "Pclass").unwrap();
    assert_eq!(pclass.datatype, DataType::Integer);
    assert_eq!(pclass.items, vec!["1", "3"]);

    let hist = age_histogram(&table).unwrap();
    assert_eq!(hist.total(), 2);
}

#[test]
fn service_round_trip_over_the_same_root() {
    let dir = TempDir::new().unwrap();
    let service = DatasetService::new(DatasetStore::open(dir.path()).unwrap());

    service.upload_dataset("t1.csv", T1.as_bytes()).unwrap();
    service.upload_dataset("t1.csv", T1.as_bytes()).unwrap();
    assert_eq!(service.list_datasets().unwrap(), vec!["t1.csv"]);

    let dump = service.describe_dataset("t1.csv").unwrap();
    let names: Vec<&str> = dump.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Pclass", "Survived", "Age", "Name", "Cabin"]);
    assert!(dump.iter().all(|c| c.items.len() == 3));

    let cabin = service.describe_column("t1.csv", "Cabin").unwrap();
    assert_eq!(cabin.items, vec!["C85", "nan"]);

    // a second store over the same directory sees the same datasets
    let reopened = DatasetStore::open(dir.path()).unwrap();
    assert_eq!(reopened.list_all().unwrap(), vec!["t1.csv"]);
}

#[test]
fn histogram_errors_are_distinguishable() {
    let dir = TempDir::new().unwrap();
    let service = DatasetService::new(DatasetStore::open(dir.path()).unwrap());

    service
        .upload_dataset("no_survived.csv", "Pclass,Age\n1,30\n".as_bytes())
        .unwrap();
    let err = service.age_histogram_png("no_survived.csv").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    service
        .upload_dataset("no_ages.csv", "Pclass,Survived,Age\n1,1,\n2,0,NA\n".as_bytes())
        .unwrap();
    let err = service.age_histogram_png("no_ages.csv").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Render);
}
