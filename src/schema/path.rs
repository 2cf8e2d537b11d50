//! Paths locating a sub-value relative to the validated root.
//!
//! Rendering: the root is a bare name, keys render as `['key']` and list
//! indices as `[3]`, e.g. `client_json['items'][3]['id']`.

use std::fmt;

/// One step from a container to one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    /// Object member
    Key(String),
    /// Array element
    Index(usize),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(key) => write!(f, "[{}]", quote_key(key)),
            PathStep::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// Root name plus the steps taken from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    root: String,
    steps: Vec<PathStep>,
}

impl JsonPath {
    /// A path pointing at the root itself.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            root: name.into(),
            steps: Vec::new(),
        }
    }

    /// Returns a copy of this path extended by `step`.
    pub fn join(&self, step: PathStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self {
            root: self.root.clone(),
            steps,
        }
    }

    /// The root name supplied by the caller.
    pub fn root_name(&self) -> &str {
        &self.root
    }

    /// Steps from the root, outermost first.
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// True if the path has no steps.
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    pub(crate) fn push(&mut self, step: PathStep) {
        self.steps.push(step);
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)?;
        for step in &self.steps {
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

/// Quotes a key the way Python's `repr` does: single quotes, switching to
/// double quotes when the key holds a `'` but no `"`.
pub(crate) fn quote_key(key: &str) -> String {
    let quote = if key.contains('\'') && !key.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(key.len() + 2);
    out.push(quote);
    for c in key.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Renders a key group as `['a', 'b']`.
pub(crate) fn render_keys<S: AsRef<str>>(keys: &[S]) -> String {
    let quoted: Vec<String> = keys.iter().map(|k| quote_key(k.as_ref())).collect();
    format!("[{}]", quoted.join(", "))
}
