//! Tab separated DAT format read by the scheduling solvers.
//!
//! ```text
//! S                                       node count
//! node(1..)  memory  u  [cost]            one line per node
//! N-1                                     last task index
//! task(0..)  C  T  D  a  M  allocation    one line per task, allocation 1-based or 0
//! N*N                                     precedence count
//! i  j  0|1                               one line per ordered task pair
//! S*S                                     delay count
//! i  j  delay                             one line per ordered node pair
//! ```
//!
//! Delays are all-pairs shortest paths over the directed links.

use std::io::Read;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};

use crate::domain::allocation::allocated_node;
use crate::domain::network::network::Network;
use crate::domain::schedule::schedule::Schedule;
use crate::error::{Error, Result};

/// Delay written for node pairs without a path.
pub const DAT_INFINITE_DELAY: i64 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct DatNode {
    /// 1-based
    pub index: usize,
    pub memory: i64,
    pub u: f64,
    pub cost: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatTask {
    /// 0-based
    pub index: usize,
    pub execution_time: i64,
    pub period: i64,
    pub deadline: i64,
    pub activation: i64,
    pub memory: i64,
    /// 1-based node index, 0 if unallocated.
    pub allocated_node: usize,
}

/// Plain tables read from a DAT file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatModel {
    pub nodes: Vec<DatNode>,
    pub tasks: Vec<DatTask>,
    /// 0-based task index pairs with a precedence.
    pub precedences: Vec<(usize, usize)>,
    /// `delays[i][j]` between 0-based node indices.
    pub delays: Vec<Vec<i64>>,
}

/// All-pairs shortest delays over every stored link record.
pub fn delay_matrix(network: &Network) -> Vec<Vec<i64>> {
    let n = network.len();
    let mut delays = vec![vec![DAT_INFINITE_DELAY; n]; n];
    for (i, row) in delays.iter_mut().enumerate() {
        row[i] = 0;
    }

    for node in network.nodes() {
        for link in node.links() {
            match (network.index_of(&link.source_id), network.index_of(&link.target_id)) {
                (Some(i), Some(j)) => delays[i][j] = link.delay,
                _ => log::warn!("Ignoring link {} with unknown endpoint.", link.id),
            }
        }
    }

    // Floyd-Warshall
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                if delays[i][k] < DAT_INFINITE_DELAY && delays[k][j] < DAT_INFINITE_DELAY {
                    let through_k = delays[i][k] + delays[k][j];
                    if through_k < delays[i][j] {
                        delays[i][j] = through_k;
                    }
                }
            }
        }
    }

    delays
}

pub fn model_to_dat(schedule: &Schedule, network: &Network) -> Result<String> {
    let mut writer = WriterBuilder::new().delimiter(b'\t').flexible(true).has_headers(false).from_writer(Vec::new());

    writer.write_record([network.len().to_string()])?;
    for (i, node) in network.nodes().enumerate() {
        writer.write_record([(i + 1).to_string(), node.memory.to_string(), node.u.to_string()])?;
    }

    let tasks: Vec<_> = schedule.tasks().collect();
    writer.write_record([(tasks.len() as i64 - 1).to_string()])?;
    for (i, task) in tasks.iter().enumerate() {
        let allocation = allocated_node(network, &task.id).and_then(|node| network.index_of(&node.id)).map_or(0, |index| index + 1);
        writer.write_record([
            i.to_string(),
            task.execution_time.to_string(),
            task.period.to_string(),
            task.deadline.to_string(),
            task.activation.to_string(),
            task.memory.to_string(),
            allocation.to_string(),
        ])?;
    }

    writer.write_record([(tasks.len() * tasks.len()).to_string()])?;
    for (i, from) in tasks.iter().enumerate() {
        for (j, to) in tasks.iter().enumerate() {
            let flag = if from.has_successor(&to.id) { "1" } else { "0" };
            writer.write_record([i.to_string(), j.to_string(), flag.to_string()])?;
        }
    }

    let delays = delay_matrix(network);
    writer.write_record([(delays.len() * delays.len()).to_string()])?;
    for (i, row) in delays.iter().enumerate() {
        for (j, delay) in row.iter().enumerate() {
            writer.write_record([(i + 1).to_string(), (j + 1).to_string(), delay.to_string()])?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| Error::IoError(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Reads the DAT layout back into tables.
pub fn parse_dat(text: &str) -> Result<DatModel> {
    let mut reader = ReaderBuilder::new().delimiter(b'\t').flexible(true).has_headers(false).trim(Trim::All).from_reader(text.as_bytes());
    let mut lines = DatLines { records: reader.records(), line: 0 };

    let node_count: usize = lines.next_count()?;
    let mut nodes = Vec::new();
    for i in 0..node_count {
        let record = lines.next_record(&[3, 4])?;
        let index: usize = lines.field(&record, 0)?;
        if index != i + 1 {
            return Err(lines.error(format!("expected node {}, found {}", i + 1, index)));
        }
        let cost = if record.len() == 4 { Some(lines.field(&record, 3)?) } else { None };
        nodes.push(DatNode { index, memory: lines.field(&record, 1)?, u: lines.field(&record, 2)?, cost });
    }

    let last_task: i64 = lines.next_count()?;
    let task_count = last_task
        .checked_add(1)
        .and_then(|count| usize::try_from(count).ok())
        .ok_or_else(|| lines.error(format!("invalid last task index {}", last_task)))?;
    let mut tasks = Vec::new();
    for i in 0..task_count {
        let record = lines.next_record(&[7])?;
        let index: usize = lines.field(&record, 0)?;
        if index != i {
            return Err(lines.error(format!("expected task {}, found {}", i, index)));
        }
        let allocated_node: usize = lines.field(&record, 6)?;
        if allocated_node > node_count {
            return Err(lines.error(format!("task {} is allocated to unknown node {}", i, allocated_node)));
        }
        tasks.push(DatTask {
            index,
            execution_time: lines.field(&record, 1)?,
            period: lines.field(&record, 2)?,
            deadline: lines.field(&record, 3)?,
            activation: lines.field(&record, 4)?,
            memory: lines.field(&record, 5)?,
            allocated_node,
        });
    }

    let pair_count: usize = lines.next_count()?;
    if task_count.checked_mul(task_count) != Some(pair_count) {
        return Err(lines.error(format!("expected {} x {} precedence entries, found {}", task_count, task_count, pair_count)));
    }
    let mut precedences = Vec::new();
    for _ in 0..pair_count {
        let record = lines.next_record(&[3])?;
        let (i, j): (usize, usize) = (lines.field(&record, 0)?, lines.field(&record, 1)?);
        if i >= task_count || j >= task_count {
            return Err(lines.error(format!("task pair ({}, {}) out of range", i, j)));
        }
        match lines.field::<u8>(&record, 2)? {
            0 => {}
            1 => precedences.push((i, j)),
            flag => return Err(lines.error(format!("precedence flag must be 0 or 1, found {}", flag))),
        }
    }

    let delay_count: usize = lines.next_count()?;
    if node_count.checked_mul(node_count) != Some(delay_count) {
        return Err(lines.error(format!("expected {} x {} delay entries, found {}", node_count, node_count, delay_count)));
    }
    let mut delays = vec![vec![DAT_INFINITE_DELAY; node_count]; node_count];
    for _ in 0..delay_count {
        let record = lines.next_record(&[3])?;
        let (i, j): (usize, usize) = (lines.field(&record, 0)?, lines.field(&record, 1)?);
        if i == 0 || j == 0 || i > node_count || j > node_count {
            return Err(lines.error(format!("node pair ({}, {}) out of range", i, j)));
        }
        delays[i - 1][j - 1] = lines.field(&record, 2)?;
    }

    if lines.records.next().is_some() {
        return Err(Error::DatFormat { line: lines.line + 1, reason: "unexpected content after delay table".to_string() });
    }

    log::debug!("Parsed DAT with {} nodes, {} tasks and {} precedences.", nodes.len(), tasks.len(), precedences.len());
    Ok(DatModel { nodes, tasks, precedences, delays })
}

struct DatLines<'r, R> {
    records: csv::StringRecordsIter<'r, R>,
    line: usize,
}

impl<R: Read> DatLines<'_, R> {
    fn error(&self, reason: String) -> Error {
        Error::DatFormat { line: self.line, reason }
    }

    fn next_record(&mut self, lengths: &[usize]) -> Result<StringRecord> {
        let record = match self.records.next() {
            Some(Ok(record)) => record,
            Some(Err(e)) => return Err(Error::DatFormat { line: self.line + 1, reason: e.to_string() }),
            None => return Err(Error::DatFormat { line: self.line + 1, reason: "unexpected end of input".to_string() }),
        };
        self.line = record.position().map_or(self.line + 1, |position| position.line() as usize);

        if !lengths.contains(&record.len()) {
            return Err(self.error(format!("expected {:?} fields, found {}", lengths, record.len())));
        }
        Ok(record)
    }

    fn next_count<T: FromStr>(&mut self) -> Result<T> {
        let record = self.next_record(&[1])?;
        self.field(&record, 0)
    }

    fn field<T: FromStr>(&self, record: &StringRecord, index: usize) -> Result<T> {
        let raw = record.get(index).unwrap_or_default();
        raw.parse().map_err(|_| self.error(format!("cannot parse field {} '{}'", index + 1, raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::network::node::{Node, NodeType};

    #[test]
    fn test_delay_matrix_uses_shortest_paths() {
        let mut network = Network::new();
        let ids: Vec<_> = (0..3)
            .map(|i| {
                let node = Node::new(format!("EDGE {}", i + 1), NodeType::Edge);
                let id = node.id.clone();
                network.add_node(node).unwrap();
                id
            })
            .collect();
        network.connect_nodes(&ids[0], &ids[1], 2).unwrap();
        network.connect_nodes(&ids[1], &ids[2], 3).unwrap();

        let delays = delay_matrix(&network);
        assert_eq!(delays[0], vec![0, 2, 5]);
        assert_eq!(delays[2], vec![5, 3, 0]);
    }

    #[test]
    fn test_unreachable_pairs_are_infinite() {
        let mut network = Network::new();
        let mist = Node::new("MIST 1", NodeType::Mist);
        let edge = Node::new("EDGE 1", NodeType::Edge);
        let (mist_id, edge_id) = (mist.id.clone(), edge.id.clone());
        network.add_node(mist).unwrap();
        network.add_node(edge).unwrap();
        network.connect_nodes(&mist_id, &edge_id, 4).unwrap();

        assert_eq!(delay_matrix(&network), vec![vec![0, 4], vec![DAT_INFINITE_DELAY, 0]]);
    }

    #[test]
    fn test_parse_accepts_cost_column() {
        let text = "1\n1\t4\t0.5\t2\n0\n0\t1\t10\t10\t0\t1\t1\n1\n0\t0\t0\n1\n1\t1\t0\n";
        let model = parse_dat(text).unwrap();

        assert_eq!(model.nodes[0].cost, Some(2.0));
        assert_eq!(model.tasks[0].allocated_node, 1);
        assert!(model.precedences.is_empty());
        assert_eq!(model.delays, vec![vec![0]]);
    }

    #[test]
    fn test_parse_reports_line_of_bad_field() {
        let text = "1\n1\t4\t0.5\n0\n0\t1\tten\t10\t0\t1\t0\n";
        match parse_dat(text) {
            Err(Error::DatFormat { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected DatFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_oversized_counts() {
        let huge = format!("{}\n", usize::MAX);
        assert!(matches!(parse_dat(&huge), Err(Error::DatFormat { line: 2, .. })));

        assert!(matches!(parse_dat("99999999999999999\n"), Err(Error::DatFormat { .. })));

        let last_task_overflow = format!("0\n{}\n", i64::MAX);
        assert!(matches!(parse_dat(&last_task_overflow), Err(Error::DatFormat { line: 2, .. })));

        let pair_overflow = format!("0\n0\n0\t1\t10\t10\t0\t1\t0\n{}\n", usize::MAX);
        assert!(matches!(parse_dat(&pair_overflow), Err(Error::DatFormat { line: 4, .. })));
    }

    #[test]
    fn test_parse_rejects_truncated_input() {
        assert!(matches!(parse_dat("2\n1\t4\t0.5\n"), Err(Error::DatFormat { .. })));
    }
}
