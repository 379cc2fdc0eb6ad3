/// A single timed operation from the benchmark CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub operation: String,
    pub time_us: f64,
}

impl Record {
    pub fn new(operation: impl Into<String>, time_us: f64) -> Self {
        Self {
            operation: operation.into(),
            time_us,
        }
    }
}

/// All rows of one input file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Header names as they appear in the file, including ignored extras.
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Dataset {
            columns: vec!["operation".to_string(), "time_us".to_string()],
            records: iter.into_iter().collect(),
        }
    }
}
