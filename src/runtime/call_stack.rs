use std::{collections::BTreeMap, fmt::Display};

use serde::Serialize;

use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordKind {
    Program,
    Function,
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Program => write!(f, "PROGRAM"),
            RecordKind::Function => write!(f, "FUNCTION"),
        }
    }
}

/// Storage for one running program or function invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivationRecord {
    pub name: String,
    pub kind: RecordKind,
    /// 1 for the program record.
    pub nesting_level: usize,
    pub members: BTreeMap<String, Value>,
}

impl ActivationRecord {
    pub fn new(name: &str, kind: RecordKind, nesting_level: usize) -> Self {
        ActivationRecord {
            name: String::from(name),
            kind,
            nesting_level,
            members: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.members.get(name)
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.members.insert(String::from(name), value);
    }
}

impl Display for ActivationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}: {} {}", self.nesting_level, self.kind, self.name)?;
        for (name, value) in &self.members {
            writeln!(f, "  {:<20}: {}", name, value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CallStack {
    records: Vec<ActivationRecord>,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack::default()
    }

    pub fn push(&mut self, record: ActivationRecord) {
        self.records.push(record);
    }

    pub fn pop(&mut self) -> Option<ActivationRecord> {
        self.records.pop()
    }

    pub fn peek(&self) -> Option<&ActivationRecord> {
        self.records.last()
    }

    pub fn peek_mut(&mut self) -> Option<&mut ActivationRecord> {
        self.records.last_mut()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolves a name against the live records.
    ///
    /// The top record is searched first. After that the search walks down
    /// from the top record's nesting level, looking at the record found at
    /// stack position `level - 1` for each lower level. Which function
    /// defined the name plays no part.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let top = self.peek()?;
        if let Some(value) = top.get(name) {
            return Some(value);
        }

        (1..top.nesting_level)
            .rev()
            .filter_map(|level| self.records.get(level - 1))
            .find_map(|record| record.get(name))
    }
}

impl Display for CallStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "CALL STACK")?;
        for record in self.records.iter().rev() {
            write!(f, "{}", record)?;
        }
        Ok(())
    }
}
