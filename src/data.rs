use crate::model::{Subject, TestTemplate};
use serde::Deserialize;

/// Offline bank bundled with the binary, one entry per subject.
#[derive(Deserialize, Debug, Clone)]
pub struct SubjectBank {
    pub id: String,
    pub name: String,
    pub tests: Vec<TestTemplate>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SampleBank {
    pub subjects: Vec<SubjectBank>,
}

impl SampleBank {
    pub fn subjects(&self) -> Vec<Subject> {
        self.subjects
            .iter()
            .map(|s| Subject {
                id: s.id.clone(),
                name: s.name.clone(),
            })
            .collect()
    }
}

/// Loads the embedded YAML bank.
pub fn read_sample_bank() -> SampleBank {
    let file_content = include_str!("data/sample_tests.yaml");
    serde_yaml::from_str(file_content).expect("embedded sample bank must parse")
}
