use crate::{analyzer::ProjectGraph, dependency_graph::DependencyGraph};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::{fs, io::Write as _, path::Path};

/// Fixed styling written at the top of every DOT graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphStyle {
    pub name: String,
    pub font_name: String,
    pub node_shape: String,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            name: "mygraph".to_string(),
            font_name: "Helvetica,Arial,sans-serif".to_string(),
            node_shape: "box".to_string(),
        }
    }
}

pub struct Emitter {
    style: GraphStyle,
}

impl Emitter {
    pub fn new(style: GraphStyle) -> Self {
        Self { style }
    }

    pub fn emit_dot(&self, graph: &DependencyGraph) -> String {
        let font = escape_label(&self.style.font_name);
        let mut out = String::with_capacity(4096);

        let _ = writeln!(out, "digraph {} {{", self.style.name);
        let _ = writeln!(out, "\tfontname=\"{font}\"");
        let _ = writeln!(out, "\tnode [fontName=\"{font}\"]");
        let _ = writeln!(out, "\tedge [fontName=\"{font}\"]");
        let _ = writeln!(out, "\tnode [shape={}];", self.style.node_shape);

        for (src, dst) in graph.edges() {
            let _ = writeln!(out, "\t\"{}\" -> \"{}\"", escape_label(src), escape_label(dst));
        }

        out.push_str("}\n");
        out
    }

    pub fn emit_json(&self, project: &ProjectGraph) -> Result<String> {
        let mut json = serde_json::to_string_pretty(project)?;
        json.push('\n');
        Ok(json)
    }

    /// Write rendered output to `path`, or to stdout when no path is given.
    pub fn write_output(&self, rendered: &str, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, rendered)?;
            }
            None => {
                let stdout = std::io::stdout();
                let mut lock = stdout.lock();
                lock.write_all(rendered.as_bytes())?;
                lock.flush()?;
            }
        }
        Ok(())
    }
}

/// Escape characters that would end a quoted DOT identifier early.
pub fn escape_label(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
