//! AMPL `data;` section for the allocation model.
//!
//! Tasks are numbered from 1 in schedule order, servers are named `s1..sN`
//! in network order. Nodes of type `UNDEFINED` are not servers.

use std::collections::HashMap;

use crate::domain::network::network::Network;
use crate::domain::network::node::NodeType;
use crate::domain::schedule::schedule::Schedule;
use crate::domain::schedule::task::Task;
use crate::domain::utils::id::{NodeId, TaskId};

pub const BIG_M: i64 = 100;

pub fn model_to_ampl(schedule: &Schedule, network: &Network) -> String {
    let tasks: Vec<_> = schedule.tasks().collect();
    let task_index: HashMap<&TaskId, usize> = tasks.iter().enumerate().map(|(i, task)| (&task.id, i + 1)).collect();

    let servers: Vec<_> = network.nodes().filter(|node| node.node_type != NodeType::Undefined).collect();
    let server_index: HashMap<&NodeId, usize> = servers.iter().enumerate().map(|(i, node)| (&node.id, i)).collect();
    let server_names: Vec<String> = (1..=servers.len()).map(|i| format!("s{}", i)).collect();

    let precedences: Vec<String> = schedule
        .get_precedences()
        .iter()
        .filter_map(|precedence| Some(format!("({},{})", task_index.get(&precedence.from.id)?, task_index.get(&precedence.to.id)?)))
        .collect();

    let mut delta = vec![vec![0_i64; servers.len()]; servers.len()];
    for connection in network.get_connections() {
        let (Some(&i), Some(&j)) = (server_index.get(&connection.from.id), server_index.get(&connection.to.id)) else {
            continue;
        };
        delta[i][j] = connection.link.delay;
        if connection.link.bidirectional {
            delta[j][i] = connection.link.delay;
        }
    }

    let per_task = |value: fn(&Task) -> i64| {
        let rows: Vec<String> = tasks.iter().enumerate().map(|(i, task)| format!("{} {}", i + 1, value(*task))).collect();
        rows.join("\n")
    };

    let mut out = String::new();
    out.push_str("data;\n\n");

    let task_numbers: Vec<String> = (1..=tasks.len()).map(|i| i.to_string()).collect();
    out.push_str(&format!("set TASKS := {};\n", task_numbers.join(" ")));
    out.push_str(&format!("set SERVERS := {};\n\n", server_names.join(" ")));

    out.push_str("# Precedences\n");
    out.push_str(&format!("set PRE := {};\n\n", precedences.join(" ")));

    out.push_str(&format!("param: C :=\n{}\n;\n\n", per_task(|task| task.execution_time)));
    out.push_str(&format!("param: T :=\n{}\n;\n\n", per_task(|task| task.period)));
    out.push_str(&format!("param: D :=\n{}\n;\n\n", per_task(|task| task.deadline)));
    out.push_str(&format!("param: Mreq :=\n{}\n;\n\n", per_task(|task| task.memory)));
    out.push_str(&format!("param: util :=\n{}\n;\n\n", per_task(|task| task.activation)));

    let utilization: Vec<String> = servers.iter().zip(&server_names).map(|(node, name)| format!("{} {}", name, node.u)).collect();
    let memory: Vec<String> = servers.iter().zip(&server_names).map(|(node, name)| format!("{} {}", name, node.memory)).collect();
    out.push_str(&format!("param: U :=\n{}\n;\n\n", utilization.join("\n")));
    out.push_str(&format!("param: MEM :=\n{}\n;\n\n", memory.join("\n")));

    out.push_str("param Delta:\n");
    out.push_str(&format!("      {} :=\n", server_names.join("   ")));
    for (name, row) in server_names.iter().zip(&delta) {
        let row: Vec<String> = row.iter().map(|delay| delay.to_string()).collect();
        out.push_str(&format!("{}   {}\n", name, row.join("   ")));
    }
    out.push_str(";\n\n");

    out.push_str(&format!("param BigM := {};\n\n", BIG_M));
    out.push_str("end;\n");

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::network::node::Node;

    #[test]
    fn test_ampl_sections() {
        let mut schedule = Schedule::new();
        let a = Task::new("A", false, 2, 10, 9, 1, 3);
        let b = Task::new("B", false, 4, 20, 20, 0, 5);
        let (a_id, b_id) = (a.id.clone(), b.id.clone());
        schedule.add_task(a).unwrap();
        schedule.add_task(b).unwrap();
        schedule.connect_tasks(&a_id, &b_id).unwrap();

        let mut network = Network::new();
        let edge = Node::new("EDGE 1", NodeType::Edge).with_capacity(8, 0.6);
        let cloud = Node::new("Cloud", NodeType::Cloud).with_capacity(10, 1.0);
        let (edge_id, cloud_id) = (edge.id.clone(), cloud.id.clone());
        network.add_node(edge).unwrap();
        network.add_node(cloud).unwrap();
        network.connect_nodes(&edge_id, &cloud_id, 7).unwrap();

        let ampl = model_to_ampl(&schedule, &network);

        assert!(ampl.starts_with("data;\n\nset TASKS := 1 2;\nset SERVERS := s1 s2;\n\n"));
        assert!(ampl.contains("set PRE := (1,2);"));
        assert!(ampl.contains("param: C :=\n1 2\n2 4\n;"));
        assert!(ampl.contains("param: util :=\n1 1\n2 0\n;"));
        assert!(ampl.contains("param: U :=\ns1 0.6\ns2 1\n;"));
        assert!(ampl.contains("s1   0   7\ns2   7   0\n"));
        assert!(ampl.ends_with("param BigM := 100;\n\nend;\n"));
    }
}
