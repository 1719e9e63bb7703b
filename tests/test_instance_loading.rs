use std::fs;

use fog_taskgraph::domain::network::node::NodeType;
use fog_taskgraph::error::{Error, Result};
use fog_taskgraph::generate_instance;

#[test]
fn test_generate_instance() {
    let dir = tempfile::tempdir().unwrap();
    let task_path = dir.path().join("tasks.json");
    let network_path = dir.path().join("network.json");

    fs::write(
        &task_path,
        r#"{
            "numTasks": 12,
            "graphType": "fork-join",
            "forkJoinGroups": 3,
            "mistTaskRatio": 0.25,
            "T": { "strategy": "harmonic", "values": [25, 50, 100] },
            "D": { "strategy": "constrained", "min": 0.6, "max": 0.9 },
            "seed": 7
        }"#,
    )
    .unwrap();
    fs::write(&network_path, r#"{ "mistCount": 3, "edgeCount": 2, "topology": "star", "seed": 7 }"#).unwrap();

    let result: Result<_> = generate_instance(&task_path, &network_path);
    let (schedule, network) = result.unwrap();

    assert_eq!(schedule.len(), 12);
    assert_eq!(schedule.tasks().filter(|task| task.mist).count(), 3);
    for task in schedule.tasks() {
        assert!([25, 50, 100].contains(&task.period));
        assert!(task.deadline <= task.period);
    }

    assert_eq!(network.len(), 6);
    assert_eq!(network.nodes_of_type(NodeType::Mist).count(), 3);
    assert_eq!(network.get_connections().len(), 3 * 2 + 2);
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let network_path = dir.path().join("network.json");
    fs::write(&network_path, "{}").unwrap();

    let result = generate_instance(dir.path().join("missing.json"), &network_path);
    assert!(matches!(result, Err(Error::IoError(_))));
}

#[test]
fn test_malformed_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let task_path = dir.path().join("tasks.json");
    let network_path = dir.path().join("network.json");
    fs::write(&task_path, r#"{ "numTasks": "many" }"#).unwrap();
    fs::write(&network_path, "{}").unwrap();

    let result = generate_instance(&task_path, &network_path);
    assert!(matches!(result, Err(Error::DeserializationError(_))));
}

#[test]
fn test_invalid_network_config() {
    let dir = tempfile::tempdir().unwrap();
    let task_path = dir.path().join("tasks.json");
    let network_path = dir.path().join("network.json");
    fs::write(&task_path, "{}").unwrap();
    fs::write(&network_path, r#"{ "mistCount": 2, "edgeCount": 0 }"#).unwrap();

    let result = generate_instance(&task_path, &network_path);
    assert!(matches!(result, Err(Error::ConfigError(_))));
}
