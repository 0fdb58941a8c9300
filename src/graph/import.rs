use std::path::PathBuf;

use csv::{ReaderBuilder, StringRecord};
use rustc_hash::FxHashMap;
use thiserror::Error;

use super::{GraphError, MemoryGraph, NodeId, Properties, PropertyValue};

type ExtIdMap = FxHashMap<String, NodeId>;

/// Configuration for importing nodes from a CSV file.
#[derive(Debug, Clone)]
pub struct NodeImportConfig {
    /// Path to the CSV file containing node data.
    pub path: PathBuf,
    /// Column containing unique node identifiers.
    pub id_column: String,
    /// Column containing pipe-separated labels.
    pub label_column: String,
    /// Property columns kept verbatim as strings, without type inference.
    pub string_columns: Vec<String>,
}

impl NodeImportConfig {
    /// Default column layout: `id`, `labels`, then properties, with `title`
    /// and `name` kept as strings.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            id_column: "id".into(),
            label_column: "labels".into(),
            string_columns: vec!["title".into(), "name".into()],
        }
    }
}

/// Configuration for importing edges from a CSV file.
#[derive(Debug, Clone)]
pub struct EdgeImportConfig {
    /// Path to the CSV file containing edge data.
    pub path: PathBuf,
    /// Column containing source node identifiers.
    pub src_column: String,
    /// Column containing destination node identifiers.
    pub dst_column: String,
    /// Column containing the relationship type.
    pub type_column: String,
    /// Property columns whose values are pipe-separated string lists.
    pub list_columns: Vec<String>,
}

impl EdgeImportConfig {
    /// Default column layout: `src`, `dst`, `type`, with `roles` as a list column.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            src_column: "src".into(),
            dst_column: "dst".into(),
            type_column: "type".into(),
            list_columns: vec!["roles".into()],
        }
    }
}

/// Counts from an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Nodes created.
    pub nodes_imported: u64,
    /// Edges created.
    pub edges_imported: u64,
}

/// Errors raised while importing CSV data.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Malformed input data.
    #[error("{0}")]
    Message(String),
    /// Reading or parsing the CSV failed.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// Graph rejected an insert.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl From<String> for ImportError {
    fn from(value: String) -> Self {
        ImportError::Message(value)
    }
}

/// Loads nodes and then edges into a fresh graph.
pub fn import_csv(
    nodes: &NodeImportConfig,
    edges: Option<&EdgeImportConfig>,
) -> Result<(MemoryGraph, ImportSummary), ImportError> {
    let mut graph = MemoryGraph::new();
    let mut id_map = ExtIdMap::default();
    let mut summary = ImportSummary {
        nodes_imported: import_nodes(&mut graph, nodes, &mut id_map)?,
        ..ImportSummary::default()
    };
    if let Some(edges) = edges {
        summary.edges_imported = import_edges(&mut graph, edges, &id_map)?;
    }
    tracing::debug!(
        nodes = summary.nodes_imported,
        edges = summary.edges_imported,
        "imported csv graph"
    );
    Ok((graph, summary))
}

fn import_nodes(
    graph: &mut MemoryGraph,
    cfg: &NodeImportConfig,
    id_map: &mut ExtIdMap,
) -> Result<u64, ImportError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_path(&cfg.path)?;
    let headers = reader.headers()?.clone();
    let id_index = find_column(&headers, &cfg.id_column)?;
    let label_index = find_column(&headers, &cfg.label_column)?;
    let prop_columns = prop_columns(&headers, &[id_index, label_index]);

    let mut imported = 0u64;
    for result in reader.records() {
        let record = result?;
        let ext_id = get_required(&record, id_index, &cfg.id_column)?;
        if id_map.contains_key(ext_id) {
            return Err(format!("duplicate node id '{ext_id}' in nodes file").into());
        }
        let labels = parse_list(record.get(label_index).unwrap_or_default());
        if labels.is_empty() {
            return Err(format!("row with id '{ext_id}' has no labels").into());
        }
        let properties = build_props(&record, &prop_columns, &cfg.string_columns, &[]);
        let node = graph.add_node(labels, properties);
        id_map.insert(ext_id.to_owned(), node);
        imported += 1;
    }
    Ok(imported)
}

fn import_edges(
    graph: &mut MemoryGraph,
    cfg: &EdgeImportConfig,
    id_map: &ExtIdMap,
) -> Result<u64, ImportError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_path(&cfg.path)?;
    let headers = reader.headers()?.clone();
    let src_index = find_column(&headers, &cfg.src_column)?;
    let dst_index = find_column(&headers, &cfg.dst_column)?;
    let ty_index = find_column(&headers, &cfg.type_column)?;
    let prop_columns = prop_columns(&headers, &[src_index, dst_index, ty_index]);

    let mut imported = 0u64;
    for result in reader.records() {
        let record = result?;
        let src_ext = get_required(&record, src_index, &cfg.src_column)?;
        let dst_ext = get_required(&record, dst_index, &cfg.dst_column)?;
        let src = *id_map
            .get(src_ext)
            .ok_or_else(|| format!("edge references unknown src id '{src_ext}'"))?;
        let dst = *id_map
            .get(dst_ext)
            .ok_or_else(|| format!("edge references unknown dst id '{dst_ext}'"))?;
        let ty = get_required(&record, ty_index, &cfg.type_column)?;
        let properties = build_props(&record, &prop_columns, &[], &cfg.list_columns);
        graph.add_edge(src, dst, ty, properties)?;
        imported += 1;
    }
    Ok(imported)
}

struct ColumnSpec {
    name: String,
    index: usize,
}

fn prop_columns(headers: &StringRecord, skip: &[usize]) -> Vec<ColumnSpec> {
    headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| !skip.contains(idx))
        .map(|(index, header)| ColumnSpec {
            name: header.to_owned(),
            index,
        })
        .collect()
}

fn find_column(headers: &StringRecord, name: &str) -> Result<usize, ImportError> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| ImportError::Message(format!("column '{name}' not found")))
}

fn get_required<'a>(
    record: &'a StringRecord,
    idx: usize,
    name: &str,
) -> Result<&'a str, ImportError> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ImportError::Message(format!("missing value for column '{name}'")))
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn build_props(
    record: &StringRecord,
    columns: &[ColumnSpec],
    strings: &[String],
    lists: &[String],
) -> Properties {
    let listed = |names: &[String], col: &str| names.iter().any(|n| n.eq_ignore_ascii_case(col));
    let mut props = Properties::new();
    for col in columns {
        let Some(raw) = record.get(col.index).map(str::trim) else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }
        let value = if listed(lists, &col.name) {
            PropertyValue::StringList(parse_list(raw))
        } else if listed(strings, &col.name) {
            PropertyValue::String(raw.to_owned())
        } else {
            parse_value(raw)
        };
        props.insert(col.name.clone(), value);
    }
    props
}

fn parse_value(raw: &str) -> PropertyValue {
    match raw.to_ascii_lowercase().as_str() {
        "true" => return PropertyValue::Bool(true),
        "false" => return PropertyValue::Bool(false),
        _ => {}
    }
    if let Ok(int_val) = raw.parse::<i64>() {
        return PropertyValue::Int(int_val);
    }
    if let Ok(float_val) = raw.parse::<f64>() {
        if float_val.is_finite() {
            return PropertyValue::Float(float_val);
        }
    }
    PropertyValue::String(raw.to_owned())
}
