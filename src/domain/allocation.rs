//! Placement of tasks on network nodes.
//!
//! The allocation lives on the nodes (`Node::tasks`) while the tasks stay in
//! their schedule. A task is held by at most one node and a mist node holds
//! at most one task.

use crate::domain::network::network::Network;
use crate::domain::network::node::{Node, NodeType};
use crate::domain::schedule::schedule::Schedule;
use crate::domain::utils::id::{NodeId, TaskId};
use crate::error::{Error, Result};

/// Places `task_id` on `node_id`, moving it off any node that held it before.
pub fn allocate_task(network: &mut Network, schedule: &Schedule, task_id: &TaskId, node_id: &NodeId) -> Result<()> {
    if !schedule.contains(task_id) {
        return Err(Error::UnknownTask(task_id.clone()));
    }
    let node = network.get_node(node_id).ok_or_else(|| Error::UnknownNode(node_id.clone()))?;

    if node.node_type == NodeType::Mist {
        if let Some(held) = node.tasks().find(|held| *held != task_id) {
            return Err(Error::MistNodeOccupied { node: node_id.clone(), task: held.clone() });
        }
    }

    release_task(network, task_id);
    if let Some(node) = network.get_node_mut(node_id) {
        node.tasks.insert(task_id.clone());
    }

    log::debug!("Allocated task {} to node {}.", task_id, node_id);
    Ok(())
}

/// Removes `task_id` from whichever node holds it and returns that node's id.
pub fn release_task(network: &mut Network, task_id: &TaskId) -> Option<NodeId> {
    let node = network.nodes_mut().find(|node| node.tasks.contains(task_id))?;
    node.tasks.shift_remove(task_id);
    Some(node.id.clone())
}

pub fn allocated_node<'a>(network: &'a Network, task_id: &TaskId) -> Option<&'a Node> {
    network.nodes().find(|node| node.holds_task(task_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schedule::task::Task;

    fn setup() -> (Network, Schedule, Vec<NodeId>, Vec<TaskId>) {
        let mut network = Network::new();
        let mist = Node::new("MIST 1", NodeType::Mist);
        let edge = Node::new("EDGE 1", NodeType::Edge);
        let node_ids = vec![mist.id.clone(), edge.id.clone()];
        network.add_node(mist).unwrap();
        network.add_node(edge).unwrap();

        let mut schedule = Schedule::new();
        let mut task_ids = Vec::new();
        for i in 0..2 {
            let task = Task::new(format!("Task {}", i), false, 1, 10, 10, 0, 1);
            task_ids.push(task.id.clone());
            schedule.add_task(task).unwrap();
        }

        (network, schedule, node_ids, task_ids)
    }

    #[test]
    fn test_mist_node_holds_one_task() {
        let (mut network, schedule, nodes, tasks) = setup();
        allocate_task(&mut network, &schedule, &tasks[0], &nodes[0]).unwrap();

        let result = allocate_task(&mut network, &schedule, &tasks[1], &nodes[0]);
        assert!(matches!(result, Err(Error::MistNodeOccupied { task, .. }) if task == tasks[0]));

        // Allocating the same task again is fine.
        assert!(allocate_task(&mut network, &schedule, &tasks[0], &nodes[0]).is_ok());
    }

    #[test]
    fn test_reallocation_moves_task() {
        let (mut network, schedule, nodes, tasks) = setup();
        allocate_task(&mut network, &schedule, &tasks[0], &nodes[0]).unwrap();
        allocate_task(&mut network, &schedule, &tasks[0], &nodes[1]).unwrap();

        assert_eq!(allocated_node(&network, &tasks[0]).unwrap().id, nodes[1]);
        assert!(!network.get_node(&nodes[0]).unwrap().holds_task(&tasks[0]));
    }

    #[test]
    fn test_release_and_unknown_ids() {
        let (mut network, schedule, nodes, tasks) = setup();
        allocate_task(&mut network, &schedule, &tasks[1], &nodes[1]).unwrap();

        assert_eq!(release_task(&mut network, &tasks[1]), Some(nodes[1].clone()));
        assert_eq!(release_task(&mut network, &tasks[1]), None);
        assert!(matches!(allocate_task(&mut network, &schedule, &TaskId::new("x"), &nodes[1]), Err(Error::UnknownTask(_))));
        assert!(matches!(allocate_task(&mut network, &schedule, &tasks[0], &NodeId::new("x")), Err(Error::UnknownNode(_))));
    }
}
