#![allow(dead_code)]

use challenge_import::{Catalog, ChallengeRecord};
use challenge_csvs::{AnswerKind, Category, Difficulty};
use std::collections::HashMap;
use thiserror::Error;

pub const HEADER: &str = "identifier,name,difficulty,category,question,answerKind,answers,rewards";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    Exists(String),
    Create(String),
    Index(String),
    Flush,
}

#[derive(Error, Debug)]
#[error("catalog unavailable: {0}")]
pub struct CatalogDown(pub String);

/// In-memory catalog that records every call made by the importer
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    pub records: HashMap<String, ChallengeRecord>,
    pub index: Vec<String>,
    pub events: Vec<CatalogEvent>,
    /// Number of `create` calls made before each flush
    pub flushed_at: Vec<usize>,
    pub fail_create_of: Option<String>,
    pub fail_index_of: Option<String>,
    pub fail_flush: bool,
    creates: usize,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_existing(records: impl IntoIterator<Item = ChallengeRecord>) -> Self {
        let mut catalog = Self::default();
        for record in records {
            catalog.index.push(record.identifier.clone());
            catalog.records.insert(record.identifier.clone(), record);
        }
        catalog
    }

    /// Identifiers passed to `create`, in call order
    pub fn created(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                CatalogEvent::Create(id) => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn flush_count(&self) -> usize {
        self.flushed_at.len()
    }
}

impl Catalog for MemoryCatalog {
    type Handle = String;
    type Error = CatalogDown;

    fn exists(&mut self, identifier: &str) -> Result<bool, CatalogDown> {
        self.events.push(CatalogEvent::Exists(identifier.to_string()));
        Ok(self.records.contains_key(identifier))
    }

    fn create(&mut self, record: &ChallengeRecord) -> Result<String, CatalogDown> {
        if self.fail_create_of.as_deref() == Some(record.identifier.as_str()) {
            return Err(CatalogDown(format!("cannot write '{}'", record.identifier)));
        }
        self.events.push(CatalogEvent::Create(record.identifier.clone()));
        self.creates += 1;
        self.records.insert(record.identifier.clone(), record.clone());
        Ok(record.identifier.clone())
    }

    fn add_to_index(&mut self, handle: &String) -> Result<(), CatalogDown> {
        if self.fail_index_of.as_ref() == Some(handle) {
            return Err(CatalogDown(format!("cannot index '{}'", handle)));
        }
        self.events.push(CatalogEvent::Index(handle.clone()));
        if !self.index.contains(handle) {
            self.index.push(handle.clone());
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CatalogDown> {
        if self.fail_flush {
            return Err(CatalogDown("flush failed".to_string()));
        }
        self.events.push(CatalogEvent::Flush);
        self.flushed_at.push(self.creates);
        Ok(())
    }
}

/// A valid data row for `identifier` in [`HEADER`] column order
pub fn valid_row(identifier: &str) -> String {
    format!(
        "{identifier},Challenge {identifier},Normal,Logic,What is {identifier}?,Text,{identifier}|alt,[]"
    )
}

/// Header plus `count` valid rows with identifiers `c1..=c{count}`
pub fn csv_with_rows(count: usize) -> String {
    let mut text = format!("{HEADER}\n");
    for i in 1..=count {
        text.push_str(&valid_row(&format!("c{}", i)));
        text.push('\n');
    }
    text
}

pub fn record(identifier: &str, name: &str) -> ChallengeRecord {
    ChallengeRecord {
        identifier: identifier.to_string(),
        name: name.to_string(),
        description: None,
        difficulty: Difficulty::Easy,
        category: Category::Math,
        question: "1+1=?".to_string(),
        answer_kind: AnswerKind::Number,
        answers: vec!["2".to_string()],
        hint: None,
        rewards: Vec::new(),
    }
}
