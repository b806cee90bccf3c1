use std::io::Read;

use log::{debug, info};

use crate::data::inspect::{self, ColumnSummary, TableSummary};
use crate::data::store::DatasetStore;
use crate::error::Result;
use crate::plot::histogram;

// ---------------------------------------------------------------------------
// Dataset service – the operations a request handler calls
// ---------------------------------------------------------------------------

/// Name-addressed operations over a [`DatasetStore`]. Every call re-reads the
/// dataset from disk and keeps nothing between calls.
#[derive(Debug, Clone)]
pub struct DatasetService {
    store: DatasetStore,
}

impl DatasetService {
    pub fn new(store: DatasetStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Store an uploaded file and return the name it is stored under.
    pub fn upload_dataset<R: Read>(&self, name: &str, content: R) -> Result<String> {
        let replacing = self.store.exists(name);
        let stored = self.store.upload(name, content)?;
        if replacing {
            info!("dataset '{stored}' replaced by a new upload");
        }
        if stored != name {
            info!("dataset '{name}' stored as '{stored}'");
        }
        Ok(stored)
    }

    pub fn list_datasets(&self) -> Result<Vec<String>> {
        self.store.list_all()
    }

    /// Every column with its datatype and all row values.
    pub fn describe_dataset(&self, name: &str) -> Result<TableSummary> {
        debug!("describe dataset {name}");
        let table = self.store.load(name)?;
        Ok(inspect::describe_table(&table))
    }

    /// Datatype and sorted distinct values of one column.
    pub fn describe_column(&self, name: &str, column: &str) -> Result<ColumnSummary> {
        debug!("describe column {name}/{column}");
        let table = self.store.load(name)?;
        inspect::describe_column(&table, column)
    }

    /// PNG histogram of passenger ages.
    pub fn age_histogram_png(&self, name: &str) -> Result<Vec<u8>> {
        debug!("age histogram for {name}");
        let table = self.store.load(name)?;
        histogram::render_age_histogram(&table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::features;
    use crate::data::model::DataType;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    const TITANIC: &str = "PassengerId,Survived,Pclass,Name,Sex,Age,Cabin\n\
        1,0,3,\"Braund, Mr. Owen Harris\",male,22,\n\
        2,1,1,\"Cumings, Mrs. John Bradley (Florence Briggs Thayer)\",female,38,C85\n\
        3,1,3,\"Heikkinen, Miss. Laina\",female,,\n";

    fn service() -> (TempDir, DatasetService) {
        let dir = TempDir::new().unwrap();
        let store = DatasetStore::open(dir.path()).unwrap();
        (dir, DatasetService::new(store))
    }

    #[test]
    fn describe_paths_share_the_stored_file() {
        let (_dir, svc) = service();
        let stored = svc.upload_dataset("titanic.csv", TITANIC.as_bytes()).unwrap();

        let dump = svc.describe_dataset(&stored).unwrap();
        let age = dump.iter().find(|c| c.name == "Age").unwrap();
        assert_eq!(age.datatype, DataType::Integer);
        assert_eq!(age.items, vec!["22", "38", "nan"]);

        let survived = svc.describe_column(&stored, "Survived").unwrap();
        assert_eq!(survived.items, vec!["0", "1"]);
    }

    #[test]
    fn errors_keep_their_kind() {
        let (_dir, svc) = service();
        let err = svc.describe_dataset("nope.csv").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        svc.upload_dataset("t.csv", TITANIC.as_bytes()).unwrap();
        let err = svc.describe_column("t.csv", "Fare").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = svc.upload_dataset("", TITANIC.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn histogram_and_features_over_stored_data() {
        let (_dir, svc) = service();
        svc.upload_dataset("t.csv", TITANIC.as_bytes()).unwrap();

        let png = svc.age_histogram_png("t.csv").unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let mut table = svc.store().load("t.csv").unwrap();
        features::passenger_features(&mut table).unwrap();
        assert!(table.has_column(features::IS_MARRIED));
        assert!(table.has_column(features::CABIN_TYPE));
    }

    #[test]
    fn reupload_replaces_stored_dataset() {
        let (_dir, svc) = service();
        svc.upload_dataset("t.csv", TITANIC.as_bytes()).unwrap();
        assert!(svc.store().exists("t.csv"));

        let stored = svc.upload_dataset("t.csv", "Age\n1.5\n".as_bytes()).unwrap();
        assert_eq!(stored, "t.csv");
        assert_eq!(svc.list_datasets().unwrap(), vec!["t.csv"]);
        let age = svc.describe_column("t.csv", "Age").unwrap();
        assert_eq!(age.datatype, DataType::Float);
        assert_eq!(age.items, vec!["1.5"]);
    }
}
