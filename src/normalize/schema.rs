use std::fmt;

/// One step of a JSON path into the storyboard document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathElem {
    /// Object field.
    Field(&'static str),
    /// Array index.
    Index(usize),
}

/// Fatal storyboard problem: the document cannot be read as a storyboard at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    /// Location of the problem (`$` is the document root).
    pub path: Vec<PathElem>,
    /// Human-readable description.
    pub message: String,
}

impl SchemaError {
    pub(crate) fn at(path: &[PathElem], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
        }
    }

    pub(crate) fn unparseable(detail: impl fmt::Display) -> Self {
        Self::at(&[], format!("storyboard is not valid JSON: {detail}"))
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.message);
        }
        write!(f, "{}: {}", format_path(&self.path), self.message)
    }
}

impl std::error::Error for SchemaError {}

fn format_path(path: &[PathElem]) -> String {
    let mut s = String::from("$");
    for p in path {
        match *p {
            PathElem::Field(name) => {
                s.push('.');
                s.push_str(name);
            }
            PathElem::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
        }
    }
    s
}
